use serde::Deserialize;
use serde_json::Value;

use crate::error::{AuthError, AuthResult};

/// Claims of a token whose signature has been checked.
///
/// Only used for diagnostics; nothing here is forwarded downstream. The
/// payload is kept as-is so claims the gate does not inspect never affect
/// the decision.
#[derive(Debug, Clone, PartialEq)]
pub struct VerifiedClaims {
    pub iss: String,
    pub raw: Value,
}

/// The `iss` claim as read before the signature is trusted.
#[derive(Debug, Deserialize)]
pub(crate) struct UnverifiedIssuer {
    #[serde(default)]
    iss: Option<Value>,
}

impl UnverifiedIssuer {
    pub(crate) fn into_issuer(self) -> AuthResult<String> {
        match self.iss {
            Some(Value::String(iss)) => Ok(iss),
            _ => Err(AuthError::MissingIssuer),
        }
    }
}

/// Checks `exp`/`nbf` when present, accepting any JSON number as a NumericDate.
///
/// jsonwebtoken only evaluates integer timestamps and skips the rest, so
/// fractional values are handled here.
pub(crate) fn check_time_claims(payload: &Value, now: u64, leeway: u64) -> AuthResult<()> {
    let now = now as f64;
    let leeway = leeway as f64;

    if let Some(exp) = numeric_date(payload, "exp")? {
        if exp + leeway < now {
            return Err(AuthError::Expired);
        }
    }
    if let Some(nbf) = numeric_date(payload, "nbf")? {
        if nbf > now + leeway {
            return Err(AuthError::NotYetValid);
        }
    }
    Ok(())
}

fn numeric_date(payload: &Value, claim: &'static str) -> AuthResult<Option<f64>> {
    match payload.get(claim) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_f64()
            .map(Some)
            .ok_or_else(|| AuthError::InvalidClaims(format!("'{claim}' is not a NumericDate"))),
        Some(_) => Err(AuthError::InvalidClaims(format!(
            "'{claim}' is not a NumericDate"
        ))),
    }
}
