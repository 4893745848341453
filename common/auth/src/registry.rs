use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use crate::config::{AuthorizerConfig, SecretSource};
use crate::decision::Authorize;
use crate::error::{ConfigError, ConfigResult};
use crate::verifier::HmacAuthorizer;

/// Builds a named kind of authorizer from a host-supplied config mapping.
pub trait AuthorizerFactory: Send + Sync {
    fn name(&self) -> &'static str;

    fn build(&self, config: Value, secrets: &dyn SecretSource) -> ConfigResult<Arc<dyn Authorize>>;
}

/// Factory for [`HmacAuthorizer`], registered as `"jwt"`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JwtAuthorizerFactory;

impl AuthorizerFactory for JwtAuthorizerFactory {
    fn name(&self) -> &'static str {
        "jwt"
    }

    fn build(&self, config: Value, secrets: &dyn SecretSource) -> ConfigResult<Arc<dyn Authorize>> {
        let config = AuthorizerConfig::from_value(config)?;
        let authorizer = HmacAuthorizer::from_config(&config, secrets)?;
        Ok(Arc::new(authorizer))
    }
}

/// Explicit lookup table of authorizer factories, owned by the host.
#[derive(Default, Clone)]
pub struct AuthorizerRegistry {
    factories: HashMap<&'static str, Arc<dyn AuthorizerFactory>>,
}

impl AuthorizerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with the built-in factories.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(JwtAuthorizerFactory);
        registry
    }

    /// Later registrations under the same name replace earlier ones.
    pub fn register<F>(&mut self, factory: F) -> &mut Self
    where
        F: AuthorizerFactory + 'static,
    {
        self.factories.insert(factory.name(), Arc::new(factory));
        self
    }

    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.factories.keys().copied().collect();
        names.sort_unstable();
        names
    }

    pub fn build(
        &self,
        name: &str,
        config: Value,
        secrets: &dyn SecretSource,
    ) -> ConfigResult<Arc<dyn Authorize>> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| ConfigError::UnknownAuthorizer(name.to_owned()))?;
        factory.build(config, secrets)
    }
}
