use std::mem;
use std::sync::{Arc, PoisonError, RwLock};

use axum::http::HeaderMap;

use crate::decision::Authorize;
use crate::error::AuthResult;

/// Swappable handle to the authorizer serving new requests.
///
/// The lock is held only to clone the inner `Arc`; decisions run on a
/// snapshot, so a swap never affects a request already being evaluated.
#[derive(Clone)]
pub struct SharedAuthorizer {
    inner: Arc<RwLock<Arc<dyn Authorize>>>,
}

impl SharedAuthorizer {
    pub fn new(authorizer: Arc<dyn Authorize>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(authorizer)),
        }
    }

    pub fn current(&self) -> Arc<dyn Authorize> {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Install `next` for subsequent calls and hand back the previous one.
    pub fn replace(&self, next: Arc<dyn Authorize>) -> Arc<dyn Authorize> {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        mem::replace(&mut *guard, next)
    }
}

impl Authorize for SharedAuthorizer {
    fn evaluate(&self, headers: &HeaderMap) -> AuthResult<()> {
        self.current().evaluate(headers)
    }
}
