//! JWT issuance and verification (HS256).
//!
//! Tokens carry the user id in `sub` plus the email, and expire after
//! `auth.token_ttl_days` (7 by default). Protected handlers call
//! [`authenticate`] with the request headers.

use axum::http::HeaderMap;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::response::ApiError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id (UUIDv7 string).
    pub sub: String,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

/// Why a request failed authentication. Each variant maps to a distinct
/// client-facing message so callers can tell an expired session from a
/// missing header.
#[derive(Debug, PartialEq, Eq)]
pub enum AuthFailure {
    Missing,
    Malformed,
    Expired,
    Invalid,
}

impl AuthFailure {
    pub fn message(&self) -> &'static str {
        match self {
            AuthFailure::Missing => "Token not provided",
            AuthFailure::Malformed => "Invalid token format",
            AuthFailure::Expired => "Token expired",
            AuthFailure::Invalid => "Invalid token",
        }
    }
}

/// Sign a fresh token for a user.
pub fn issue_token(
    secret: &str,
    ttl_days: i64,
    user_id: &str,
    email: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        iat: now.timestamp(),
        exp: (now + Duration::days(ttl_days)).timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Verify a token's signature and expiry.
pub fn verify_token(secret: &str, token: &str) -> Result<Claims, AuthFailure> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthFailure::Expired,
        _ => AuthFailure::Invalid,
    })
}

/// Pull the bearer token out of `Authorization: Bearer <token>`.
pub fn extract_bearer(headers: &HeaderMap) -> Result<&str, AuthFailure> {
    let value = headers
        .get("authorization")
        .ok_or(AuthFailure::Missing)?
        .to_str()
        .map_err(|_| AuthFailure::Malformed)?;
    value.strip_prefix("Bearer ").ok_or(AuthFailure::Malformed)
}

/// Authenticate a request against the configured secret. Returns the claims
/// on success; a 401 envelope error otherwise.
pub fn authenticate(secret: &str, headers: &HeaderMap) -> Result<Claims, ApiError> {
    let token = extract_bearer(headers).map_err(|f| ApiError::unauthorized(f.message()))?;
    verify_token(secret, token).map_err(|f| ApiError::unauthorized(f.message()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn issue_and_verify_roundtrip() {
        let token = issue_token(SECRET, 7, "user-1", "ana@example.com").unwrap();
        let claims = verify_token(SECRET, &token).unwrap();
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.email, "ana@example.com");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn wrong_secret_is_invalid() {
        let token = issue_token(SECRET, 7, "user-1", "ana@example.com").unwrap();
        assert_eq!(verify_token("other-secret", &token), Err(AuthFailure::Invalid));
    }

    #[test]
    fn expired_token_is_reported_as_expired() {
        // Negative TTL puts exp a day into the past, well beyond the
        // default validation leeway.
        let token = issue_token(SECRET, -1, "user-1", "ana@example.com").unwrap();
        assert_eq!(verify_token(SECRET, &token), Err(AuthFailure::Expired));
    }

    #[test]
    fn garbage_token_is_invalid() {
        assert_eq!(
            verify_token(SECRET, "not.a.token"),
            Err(AuthFailure::Invalid)
        );
    }

    #[test]
    fn bearer_extraction() {
        let mut headers = HeaderMap::new();
        assert_eq!(extract_bearer(&headers), Err(AuthFailure::Missing));

        headers.insert("authorization", "Token abc".parse().unwrap());
        assert_eq!(extract_bearer(&headers), Err(AuthFailure::Malformed));

        headers.insert("authorization", "Bearer abc".parse().unwrap());
        assert_eq!(extract_bearer(&headers), Ok("abc"));
    }
}
