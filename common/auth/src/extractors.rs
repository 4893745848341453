use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, HeaderValue};

use crate::error::{AuthError, AuthResult};

/// Pulls the compact JWS out of `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> AuthResult<&str> {
    let header_value = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingAuthorization)?;
    parse_bearer(header_value)
}

fn parse_bearer(value: &HeaderValue) -> AuthResult<&str> {
    let raw = value
        .to_str()
        .map_err(|_| AuthError::InvalidAuthorization)?
        .trim();

    let token = raw
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidAuthorization)?
        .trim();

    if token.is_empty() {
        return Err(AuthError::InvalidAuthorization);
    }

    Ok(token)
}
