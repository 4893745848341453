use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use common_auth::AuthError;
use tracing::debug;

use crate::app_state::AppState;

/// Admit or reject before any handler runs. The request is passed on untouched.
pub async fn auth_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let authorizer = state.authorizer.current();
    match authorizer.evaluate(request.headers()) {
        Ok(()) => {
            state.metrics.record_admitted();
            Ok(next.run(request).await)
        }
        Err(err) => {
            state.metrics.record_rejected(err.code());
            debug!(
                reason = err.code(),
                error = %err,
                method = %request.method(),
                path = request.uri().path(),
                "request rejected"
            );
            Err(err)
        }
    }
}
