use axum::http::HeaderMap;
use tracing::debug;

use crate::error::AuthResult;

/// Outcome handed back to the host pipeline. Carries no claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthorizationResult {
    pub admitted: bool,
}

impl AuthorizationResult {
    pub const ADMITTED: Self = Self { admitted: true };
    pub const REJECTED: Self = Self { admitted: false };
}

/// A per-request admission check.
///
/// Implementations must be pure with respect to the request: no interior
/// mutability, no I/O, so a single instance can serve any number of
/// concurrent callers without locking.
pub trait Authorize: Send + Sync {
    /// Decide with the precise reason on rejection, for logs and metrics.
    fn evaluate(&self, headers: &HeaderMap) -> AuthResult<()>;

    /// Decide with a uniform outcome.
    fn authorize(&self, headers: &HeaderMap) -> AuthorizationResult {
        match self.evaluate(headers) {
            Ok(()) => AuthorizationResult::ADMITTED,
            Err(err) => {
                debug!(reason = err.code(), error = %err, "request rejected");
                AuthorizationResult::REJECTED
            }
        }
    }
}
