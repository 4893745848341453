use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{any, get};
use axum::{middleware, Router};
use tracing::warn;

use crate::app_state::AppState;
use crate::middleware::auth_middleware;

async fn health() -> &'static str {
    "ok"
}

async fn metrics(State(state): State<AppState>) -> Response {
    match state.metrics.render() {
        Ok(response) => response,
        Err(err) => {
            warn!(error = %err, "failed to render metrics");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

// Forward-auth answer for reverse proxies issuing auth subrequests.
async fn admitted() -> StatusCode {
    StatusCode::NO_CONTENT
}

/// Everything registered before the layer sits behind the gate.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/authorize", any(admitted))
        .fallback(admitted)
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .route("/healthz", get(health))
        .route("/metrics", get(metrics))
        .with_state(state)
}
