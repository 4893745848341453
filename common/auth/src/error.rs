use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use jsonwebtoken::errors::ErrorKind;
use thiserror::Error;

pub type AuthResult<T> = Result<T, AuthError>;
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Problems that keep an authorizer from being built. Fatal at startup/reload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("at least one issuer must be configured")]
    MissingIssuers,
    #[error("signing algorithm '{0}' is not supported; supported algorithms: HS256, HS384, HS512")]
    UnsupportedAlgorithm(String),
    #[error("issuer {index} has an empty 'iss'")]
    EmptyIssuer { index: usize },
    #[error("iss must be unique; '{0}' is duplicated")]
    DuplicateIssuer(String),
    #[error("secret for issuer '{issuer}' not found in environment variable '{source_name}'")]
    SecretUnresolved { issuer: String, source_name: String },
    #[error("leeway_seconds {seconds} exceeds the maximum of {max}")]
    LeewayTooLarge { seconds: u32, max: u32 },
    #[error("authorizer config could not be decoded: {0}")]
    Decode(String),
    #[error("no authorizer registered under '{0}'")]
    UnknownAuthorizer(String),
}

/// Reasons a single request was rejected. Callers only ever see a 401.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("authorization header missing")]
    MissingAuthorization,
    #[error("authorization header malformed")]
    InvalidAuthorization,
    #[error("failed to decode token header: {0}")]
    InvalidHeader(String),
    #[error("signing algorithm {0} is outside the HMAC family")]
    UnsupportedAlgorithm(String),
    #[error("token signed with {found}, expected {expected}")]
    AlgorithmMismatch { expected: String, found: String },
    #[error("token has no string 'iss' claim")]
    MissingIssuer,
    #[error("malformed claim payload: {0}")]
    InvalidClaims(String),
    #[error("issuer '{0}' is not trusted")]
    UnknownIssuer(String),
    #[error("token expired")]
    Expired,
    #[error("token not yet valid")]
    NotYetValid,
    #[error("token verification failed: {0}")]
    Verification(String),
}

impl AuthError {
    /// Stable label for logs and metrics. Never sent to the client.
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::MissingAuthorization => "missing_header",
            AuthError::InvalidAuthorization => "malformed_header",
            AuthError::InvalidHeader(_) => "malformed_token",
            AuthError::UnsupportedAlgorithm(_) => "unsupported_alg",
            AuthError::AlgorithmMismatch { .. } => "alg_mismatch",
            AuthError::MissingIssuer => "missing_iss",
            AuthError::InvalidClaims(_) => "malformed_claims",
            AuthError::UnknownIssuer(_) => "unknown_iss",
            AuthError::Expired => "expired",
            AuthError::NotYetValid => "not_yet_valid",
            AuthError::Verification(_) => "bad_signature",
        }
    }
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(value: jsonwebtoken::errors::Error) -> Self {
        match value.kind() {
            ErrorKind::ExpiredSignature => Self::Expired,
            ErrorKind::ImmatureSignature => Self::NotYetValid,
            ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
                Self::UnsupportedAlgorithm(value.to_string())
            }
            ErrorKind::InvalidIssuer | ErrorKind::MissingRequiredClaim(_) => {
                Self::InvalidClaims(value.to_string())
            }
            ErrorKind::Json(_) | ErrorKind::Base64(_) | ErrorKind::Utf8(_) => {
                Self::InvalidClaims(value.to_string())
            }
            ErrorKind::InvalidToken => Self::InvalidHeader(value.to_string()),
            _ => Self::Verification(value.to_string()),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        // Every rejection looks the same on the wire.
        StatusCode::UNAUTHORIZED.into_response()
    }
}
