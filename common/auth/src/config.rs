use std::collections::{HashMap, HashSet};
use std::env;
use std::fmt;

use jsonwebtoken::Algorithm;
use serde::Deserialize;

use crate::error::{ConfigError, ConfigResult};
use crate::index::IssuerSecretIndex;

/// HMAC variants an authorizer may be configured with.
pub const SUPPORTED_ALGORITHMS: &[Algorithm] = &[Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

/// Upper bound on `leeway_seconds`.
pub const MAX_LEEWAY_SECONDS: u32 = 300;

/// Looks up raw secret material by name.
pub trait SecretSource {
    fn resolve(&self, name: &str) -> Option<String>;
}

/// Reads secrets from the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvSecretSource;

impl SecretSource for EnvSecretSource {
    fn resolve(&self, name: &str) -> Option<String> {
        env::var(name).ok()
    }
}

impl SecretSource for HashMap<String, String> {
    fn resolve(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// One trusted issuer and the environment variable holding its secret.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IssuerSecret {
    #[serde(rename = "iss")]
    pub issuer: String,
    #[serde(rename = "secret_env_path")]
    pub secret_source: String,
}

impl IssuerSecret {
    pub fn new(issuer: impl Into<String>, secret_source: impl Into<String>) -> Self {
        Self {
            issuer: issuer.into(),
            secret_source: secret_source.into(),
        }
    }
}

/// Static configuration for the HMAC JWT authorizer, as read from the host.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthorizerConfig {
    pub algorithm: String,
    pub issuers: Vec<IssuerSecret>,
    /// Allowable clock skew in seconds when validating exp/nbf.
    #[serde(default)]
    pub leeway_seconds: u32,
}

impl AuthorizerConfig {
    pub fn new(algorithm: impl Into<String>, issuers: Vec<IssuerSecret>) -> Self {
        Self {
            algorithm: algorithm.into(),
            issuers,
            leeway_seconds: 0,
        }
    }

    pub fn with_leeway(mut self, seconds: u32) -> Self {
        self.leeway_seconds = seconds;
        self
    }

    /// Decode from a host-supplied mapping (TOML/YAML/JSON converted to a value).
    pub fn from_value(value: serde_json::Value) -> ConfigResult<Self> {
        serde_json::from_value(value).map_err(|err| ConfigError::Decode(err.to_string()))
    }

    /// Check every invariant and resolve each issuer's secret exactly once.
    ///
    /// The returned [`ValidatedConfig`] is the only way to construct an
    /// authorizer, so an unvalidated config can never serve a request.
    pub fn validate<S: SecretSource + ?Sized>(&self, secrets: &S) -> ConfigResult<ValidatedConfig> {
        if self.issuers.is_empty() {
            return Err(ConfigError::MissingIssuers);
        }

        let algorithm = parse_algorithm(&self.algorithm)?;

        let mut seen = HashSet::with_capacity(self.issuers.len());
        let mut resolved = Vec::with_capacity(self.issuers.len());
        for (index, entry) in self.issuers.iter().enumerate() {
            if entry.issuer.is_empty() {
                return Err(ConfigError::EmptyIssuer { index });
            }
            if !seen.insert(entry.issuer.as_str()) {
                return Err(ConfigError::DuplicateIssuer(entry.issuer.clone()));
            }

            let secret = secrets
                .resolve(&entry.secret_source)
                .filter(|value| !value.is_empty())
                .ok_or_else(|| ConfigError::SecretUnresolved {
                    issuer: entry.issuer.clone(),
                    source_name: entry.secret_source.clone(),
                })?;
            resolved.push((entry.issuer.clone(), secret.into_bytes()));
        }

        if self.leeway_seconds > MAX_LEEWAY_SECONDS {
            return Err(ConfigError::LeewayTooLarge {
                seconds: self.leeway_seconds,
                max: MAX_LEEWAY_SECONDS,
            });
        }

        Ok(ValidatedConfig {
            algorithm,
            leeway_seconds: self.leeway_seconds,
            index: IssuerSecretIndex::from_resolved(resolved),
        })
    }
}

/// Output of a successful validation: parsed algorithm plus resolved secrets.
#[derive(Clone)]
pub struct ValidatedConfig {
    pub(crate) algorithm: Algorithm,
    pub(crate) leeway_seconds: u32,
    pub(crate) index: IssuerSecretIndex,
}

impl ValidatedConfig {
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn index(&self) -> &IssuerSecretIndex {
        &self.index
    }
}

impl fmt::Debug for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatedConfig")
            .field("algorithm", &self.algorithm)
            .field("leeway_seconds", &self.leeway_seconds)
            .field("index", &self.index)
            .finish()
    }
}

fn parse_algorithm(name: &str) -> ConfigResult<Algorithm> {
    name.parse::<Algorithm>()
        .ok()
        .filter(|alg| SUPPORTED_ALGORITHMS.contains(alg))
        .ok_or_else(|| ConfigError::UnsupportedAlgorithm(name.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn secrets(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn valid_config_resolves_every_secret() {
        let config = AuthorizerConfig::new(
            "HS384",
            vec![
                IssuerSecret::new("svc-a", "SVC_A_SECRET"),
                IssuerSecret::new("svc-b", "SVC_B_SECRET"),
            ],
        );
        let env = secrets(&[("SVC_A_SECRET", "alpha"), ("SVC_B_SECRET", "beta")]);

        let validated = config.validate(&env).expect("valid config");
        assert_eq!(validated.algorithm(), Algorithm::HS384);
        assert_eq!(validated.index().len(), 2);
        assert!(validated.index().contains("svc-b"));
    }

    #[test]
    fn empty_issuer_list_is_rejected_first() {
        let config = AuthorizerConfig::new("RS256", Vec::new());
        assert_eq!(
            config.validate(&HashMap::<String, String>::new()).unwrap_err(),
            ConfigError::MissingIssuers
        );
    }

    #[test]
    fn asymmetric_algorithm_is_unsupported() {
        let config = AuthorizerConfig::new("RS256", vec![IssuerSecret::new("svc-a", "A")]);
        let err = config.validate(&secrets(&[("A", "x")])).unwrap_err();
        assert_eq!(err, ConfigError::UnsupportedAlgorithm("RS256".into()));
    }

    #[test]
    fn algorithm_names_are_case_sensitive() {
        let config = AuthorizerConfig::new("hs256", vec![IssuerSecret::new("svc-a", "A")]);
        assert!(matches!(
            config.validate(&secrets(&[("A", "x")])),
            Err(ConfigError::UnsupportedAlgorithm(_))
        ));
    }

    #[test]
    fn empty_issuer_reports_position() {
        let config = AuthorizerConfig::new(
            "HS256",
            vec![IssuerSecret::new("svc-a", "A"), IssuerSecret::new("", "B")],
        );
        let err = config.validate(&secrets(&[("A", "x"), ("B", "y")])).unwrap_err();
        assert_eq!(err, ConfigError::EmptyIssuer { index: 1 });
    }

    #[test]
    fn first_duplicate_issuer_is_reported() {
        let config = AuthorizerConfig::new(
            "HS256",
            vec![
                IssuerSecret::new("svc-a", "A"),
                IssuerSecret::new("svc-b", "B"),
                IssuerSecret::new("svc-b", "B"),
                IssuerSecret::new("svc-a", "A"),
            ],
        );
        let err = config.validate(&secrets(&[("A", "x"), ("B", "y")])).unwrap_err();
        assert_eq!(err, ConfigError::DuplicateIssuer("svc-b".into()));
    }

    #[test]
    fn missing_or_empty_secret_is_unresolved() {
        let config = AuthorizerConfig::new("HS512", vec![IssuerSecret::new("svc-a", "A")]);
        let missing = config.validate(&HashMap::<String, String>::new()).unwrap_err();
        assert_eq!(
            missing,
            ConfigError::SecretUnresolved {
                issuer: "svc-a".into(),
                source_name: "A".into()
            }
        );

        let empty = config.validate(&secrets(&[("A", "")])).unwrap_err();
        assert!(matches!(empty, ConfigError::SecretUnresolved { .. }));
    }

    #[test]
    fn leeway_is_capped() {
        let env = secrets(&[("A", "x")]);
        let issuers = vec![IssuerSecret::new("svc-a", "A")];

        let at_cap = AuthorizerConfig::new("HS256", issuers.clone()).with_leeway(MAX_LEEWAY_SECONDS);
        assert!(at_cap.validate(&env).is_ok());

        let huge = AuthorizerConfig::new("HS256", issuers).with_leeway(u32::MAX);
        assert_eq!(
            huge.validate(&env).unwrap_err(),
            ConfigError::LeewayTooLarge {
                seconds: u32::MAX,
                max: MAX_LEEWAY_SECONDS
            }
        );
    }

    #[test]
    fn decodes_host_mapping() {
        let value = json!({
            "algorithm": "HS256",
            "issuers": [
                { "iss": "svc-a", "secret_env_path": "SVC_A_SECRET" }
            ]
        });
        let config = AuthorizerConfig::from_value(value).expect("decode");
        assert_eq!(config.algorithm, "HS256");
        assert_eq!(config.issuers, vec![IssuerSecret::new("svc-a", "SVC_A_SECRET")]);
        assert_eq!(config.leeway_seconds, 0);
    }

    #[test]
    fn decode_failure_is_a_config_error() {
        let value = json!({ "algorithm": "HS256", "issuers": [{ "iss": 7 }] });
        assert!(matches!(
            AuthorizerConfig::from_value(value),
            Err(ConfigError::Decode(_))
        ));
    }

    #[test]
    fn validated_debug_output_redacts_secrets() {
        let config = AuthorizerConfig::new("HS256", vec![IssuerSecret::new("svc-a", "A")]);
        let validated = config.validate(&secrets(&[("A", "s3cr3t")])).unwrap();
        let rendered = format!("{validated:?}");
        assert!(rendered.contains("svc-a"));
        assert!(!rendered.contains("s3cr3t"));
    }
}
