use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use jsonwebtoken::DecodingKey;

/// Issuer → HMAC secret, built once from a validated config and never mutated.
///
/// Cloning shares the underlying map.
#[derive(Clone, Default)]
pub struct IssuerSecretIndex {
    inner: Arc<HashMap<String, DecodingKey>>,
}

impl IssuerSecretIndex {
    pub(crate) fn from_resolved<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, Vec<u8>)>,
    {
        let inner = entries
            .into_iter()
            .map(|(issuer, secret)| (issuer, DecodingKey::from_secret(&secret)))
            .collect();
        Self {
            inner: Arc::new(inner),
        }
    }

    pub fn decoding_key(&self, issuer: &str) -> Option<&DecodingKey> {
        self.inner.get(issuer)
    }

    pub fn contains(&self, issuer: &str) -> bool {
        self.inner.contains_key(issuer)
    }

    pub fn issuers(&self) -> impl Iterator<Item = &str> {
        self.inner.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl fmt::Debug for IssuerSecretIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut issuers: Vec<&str> = self.issuers().collect();
        issuers.sort_unstable();
        f.debug_struct("IssuerSecretIndex")
            .field("issuers", &issuers)
            .finish_non_exhaustive()
    }
}
