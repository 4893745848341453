use axum::http::HeaderMap;
use jsonwebtoken::{decode, decode_header, get_current_timestamp, Algorithm, DecodingKey, Validation};
use serde_json::Value;
use tracing::{debug, info};

use crate::claims::{check_time_claims, UnverifiedIssuer, VerifiedClaims};
use crate::config::{AuthorizerConfig, SecretSource, ValidatedConfig, SUPPORTED_ALGORITHMS};
use crate::decision::Authorize;
use crate::error::{AuthError, AuthResult, ConfigResult};
use crate::extractors::bearer_token;
use crate::index::IssuerSecretIndex;

/// Verifies HMAC-signed JWTs against the secret of the issuer they name.
#[derive(Clone)]
pub struct HmacAuthorizer {
    algorithm: Algorithm,
    index: IssuerSecretIndex,
    validation: Validation,
}

impl HmacAuthorizer {
    pub fn new(config: ValidatedConfig) -> Self {
        let mut validation = Validation::new(config.algorithm);
        validation.required_spec_claims.clear();
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.validate_aud = false;
        validation.leeway = config.leeway_seconds.into();

        info!(
            algorithm = ?config.algorithm,
            issuers = config.index.len(),
            "HMAC authorizer initialised"
        );

        Self {
            algorithm: config.algorithm,
            index: config.index,
            validation,
        }
    }

    /// Validate `config` and build an authorizer from the resolved secrets.
    pub fn from_config<S: SecretSource + ?Sized>(
        config: &AuthorizerConfig,
        secrets: &S,
    ) -> ConfigResult<Self> {
        config.validate(secrets).map(Self::new)
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn index(&self) -> &IssuerSecretIndex {
        &self.index
    }

    pub fn verify(&self, token: &str) -> AuthResult<VerifiedClaims> {
        let header =
            decode_header(token).map_err(|err| AuthError::InvalidHeader(err.to_string()))?;
        if !SUPPORTED_ALGORITHMS.contains(&header.alg) {
            return Err(AuthError::UnsupportedAlgorithm(format!("{:?}", header.alg)));
        }
        if header.alg != self.algorithm {
            return Err(AuthError::AlgorithmMismatch {
                expected: format!("{:?}", self.algorithm),
                found: format!("{:?}", header.alg),
            });
        }

        let issuer = peek_issuer(token, header.alg)?;
        let key = self
            .index
            .decoding_key(&issuer)
            .ok_or_else(|| AuthError::UnknownIssuer(issuer.clone()))?;

        // `validation` pins the configured algorithm, so the library re-checks
        // the header independently of the guard above.
        let token_data = decode::<Value>(token, key, &self.validation)?;
        check_time_claims(&token_data.claims, get_current_timestamp(), self.validation.leeway)?;
        debug!(iss = %issuer, "verified JWT successfully");
        Ok(VerifiedClaims {
            iss: issuer,
            raw: token_data.claims,
        })
    }
}

impl Authorize for HmacAuthorizer {
    fn evaluate(&self, headers: &HeaderMap) -> AuthResult<()> {
        let token = bearer_token(headers)?;
        self.verify(token).map(|_| ())
    }
}

/// Reads `iss` from the payload without trusting the signature.
fn peek_issuer(token: &str, alg: Algorithm) -> AuthResult<String> {
    let mut validation = Validation::new(alg);
    validation.insecure_disable_signature_validation();
    validation.required_spec_claims.clear();
    validation.validate_exp = false;
    validation.validate_nbf = false;
    validation.validate_aud = false;

    let unverified = decode::<UnverifiedIssuer>(token, &DecodingKey::from_secret(&[]), &validation)
        .map_err(|err| AuthError::InvalidClaims(err.to_string()))?;
    unverified.claims.into_issuer()
}
