pub mod claims;
pub mod config;
pub mod decision;
pub mod error;
pub mod extractors;
pub mod index;
pub mod registry;
pub mod shared;
pub mod verifier;

pub use claims::VerifiedClaims;
pub use config::{
    AuthorizerConfig, EnvSecretSource, IssuerSecret, SecretSource, ValidatedConfig,
    MAX_LEEWAY_SECONDS, SUPPORTED_ALGORITHMS,
};
pub use decision::{AuthorizationResult, Authorize};
pub use error::{AuthError, AuthResult, ConfigError, ConfigResult};
pub use extractors::bearer_token;
pub use index::IssuerSecretIndex;
pub use registry::{AuthorizerFactory, AuthorizerRegistry, JwtAuthorizerFactory};
pub use shared::SharedAuthorizer;
pub use verifier::HmacAuthorizer;
