//! Password hashing and bearer-token authentication.

use std::sync::Arc;

use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::OsRng;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use axum::extract::FromRequestParts;
use axum::http::HeaderMap;
use axum::http::request::Parts;
use chrono::Utc;
use common::UserId;
use doc_store::DocumentStore;

use crate::AppState;
use crate::error::ApiError;

/// Minimum accepted password length, enforced before hashing.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Hashes a password with Argon2id and a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ApiError::Internal(format!("password hashing failed: {e}")))
}

/// Verifies a password against a stored hash.
///
/// A hash that fails to parse counts as a failed verification.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Extracts the token from an `Authorization: Bearer <token>` header.
pub(crate) fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(axum::http::header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Extractor that resolves the bearer token to the logged-in user.
///
/// Rejects with `401 Unauthorized` when the token is missing, unknown,
/// or expired.
pub struct RequireAuth(pub UserId);

impl<D> FromRequestParts<Arc<AppState<D>>> for RequireAuth
where
    D: DocumentStore + Clone + 'static,
{
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState<D>>,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(&parts.headers) else {
            return Err(reject("missing bearer token"));
        };

        let Some(session) = state.sessions.session_by_token(token).await? else {
            return Err(reject("invalid session token"));
        };

        if session.doc.is_expired_at(Utc::now()) {
            return Err(reject("session expired"));
        }

        Ok(RequireAuth(session.doc.user_id))
    }
}

fn reject(reason: &str) -> ApiError {
    metrics::counter!("auth_rejections_total").increment(1);
    ApiError::Unauthorized(reason.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_roundtrip() {
        let hash = hash_password("hunter2hunter2").unwrap();
        assert_ne!(hash, "hunter2hunter2");
        assert!(verify_password("hunter2hunter2", &hash));
        assert!(!verify_password("hunter2hunter3", &hash));
    }

    #[test]
    fn hashes_are_salted() {
        let a = hash_password("same password").unwrap();
        let b = hash_password("same password").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn malformed_hash_never_verifies() {
        assert!(!verify_password("anything", "not-a-phc-string"));
        assert!(!verify_password("anything", ""));
    }

    #[test]
    fn bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(
            axum::http::header::AUTHORIZATION,
            "Bearer abc-123".parse().unwrap(),
        );
        assert_eq!(bearer_token(&headers), Some("abc-123"));

        headers.insert(
            axum::http::header::AUTHORIZATION,
            "Basic dXNlcjpwdw==".parse().unwrap(),
        );
        assert_eq!(bearer_token(&headers), None);
    }
}
