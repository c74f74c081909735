//! Bearer identity for gateway requests.
//!
//! The backend verifies the credential's signature on every data call; the
//! gateway only needs to know *who* the token was issued to, so it decodes
//! the JWT payload without verifying it.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use base64::Engine as _;
use serde_json::Value;

use crate::errors::GatewayError;

/// Identity established by the caller's bearer credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub username: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = GatewayError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let username = username_from_headers(&parts.headers)?;
        Ok(AuthenticatedUser { username })
    }
}

fn unauthenticated(message: &str) -> GatewayError {
    GatewayError::Unauthenticated(message.to_string())
}

pub fn username_from_headers(headers: &HeaderMap) -> Result<String, GatewayError> {
    let header = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| unauthenticated("A bearer credential is required"))?
        .to_str()
        .map_err(|_| unauthenticated("The bearer credential could not be read"))?;

    let token = header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| unauthenticated("A bearer credential is required"))?;

    username_from_token(token)
}

/// Reads the identity from a JWT payload: `username`, then
/// `user_metadata.username`, then `sub`.
pub fn username_from_token(token: &str) -> Result<String, GatewayError> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err(unauthenticated("The bearer credential could not be read"));
    }

    let payload = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(parts[1].trim_end_matches('='))
        .map_err(|_| unauthenticated("The bearer credential could not be read"))?;
    let claims: Value = serde_json::from_slice(&payload)
        .map_err(|_| unauthenticated("The bearer credential could not be read"))?;

    let found = [
        claims.get("username"),
        claims.pointer("/user_metadata/username"),
        claims.get("sub"),
    ]
    .into_iter()
    .flatten()
    .filter_map(Value::as_str)
    .map(str::trim)
    .find(|s| !s.is_empty())
    .map(str::to_string)
    .ok_or_else(|| unauthenticated("The bearer credential does not name a user"));
    found
}

/// Unsigned test token carrying `claims`.
#[cfg(test)]
pub(crate) fn token_with_claims(claims: &Value) -> String {
    let engine = base64::engine::general_purpose::URL_SAFE_NO_PAD;
    let header = engine.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = engine.encode(claims.to_string());
    let signature = engine.encode("fake_sig");
    format!("{header}.{payload}.{signature}")
}

#[cfg(test)]
pub(crate) fn token_for(username: &str) -> String {
    token_with_claims(&serde_json::json!({ "username": username, "sub": "uuid-1" }))
}
