use anyhow::{Context, Result};
use common_auth::{AuthorizerRegistry, Authorize, SecretSource};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub config_path: PathBuf,
    pub host: String,
    pub port: u16,
    pub reload_secs: Option<u64>,
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self> {
        let config_path = env::var("GATE_CONFIG_PATH")
            .map(PathBuf::from)
            .context("GATE_CONFIG_PATH must be set")?;
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(8080);
        let reload_secs = env::var("GATE_CONFIG_RELOAD_SECONDS")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .map(|secs| secs.max(10));

        Ok(Self {
            config_path,
            host,
            port,
            reload_secs,
        })
    }
}

/// On-disk gate configuration:
///
/// ```toml
/// [authorizer]
/// name = "jwt"
///
/// [authorizer.config]
/// algorithm = "HS256"
/// issuers = [{ iss = "svc-a", secret_env_path = "SVC_A_SECRET" }]
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct GateFile {
    pub authorizer: AuthorizerSection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthorizerSection {
    #[serde(default = "default_authorizer")]
    pub name: String,
    pub config: toml::Value,
}

fn default_authorizer() -> String {
    "jwt".to_string()
}

impl GateFile {
    pub fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).context("gate config is not valid TOML")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read gate config {}", path.display()))?;
        Self::parse(&text)
    }

    /// Hand the section to the named factory. Any validation failure is fatal.
    pub fn build(
        self,
        registry: &AuthorizerRegistry,
        secrets: &dyn SecretSource,
    ) -> Result<Arc<dyn Authorize>> {
        let AuthorizerSection { name, config } = self.authorizer;
        let mapping = serde_json::to_value(config).context("gate config is not a plain mapping")?;
        registry
            .build(&name, mapping, secrets)
            .with_context(|| format!("authorizer '{name}' rejected its configuration"))
    }
}
