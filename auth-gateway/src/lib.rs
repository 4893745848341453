pub mod app_state;
pub mod config;
pub mod middleware;
pub mod reload;
pub mod router;

pub use crate::app_state::AppState;
pub use crate::config::{GateFile, GatewayConfig};
pub use crate::reload::{reload_once, spawn_config_reload};
pub use crate::router::build_router;
