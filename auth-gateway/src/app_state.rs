use std::sync::Arc;

use common_auth::SharedAuthorizer;
use common_observability::GateMetrics;

#[derive(Clone)]
pub struct AppState {
    pub authorizer: SharedAuthorizer,
    pub metrics: Arc<GateMetrics>,
}

impl AppState {
    pub fn new(authorizer: SharedAuthorizer, metrics: Arc<GateMetrics>) -> Self {
        Self {
            authorizer,
            metrics,
        }
    }
}
