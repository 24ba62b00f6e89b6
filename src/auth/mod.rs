use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use sha2::{Digest, Sha256};
use std::sync::Arc;

use crate::{config::Config, error::AppError, AppState};

/// Proof that a request may trigger schema initialization.
///
/// With no `INIT_DB_TOKEN` configured every request passes. Otherwise the
/// request must carry `Authorization: Bearer <token>`.
#[derive(Debug, Clone, Copy)]
pub struct InitAccess;

impl<S> FromRequestParts<S> for InitAccess
where
    Arc<Config>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = Arc::<Config>::from_ref(state);
        let Some(expected) = config.security.init_token.as_deref() else {
            return Ok(InitAccess);
        };

        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".to_string()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Unauthorized("Invalid Authorization header format".to_string()))?;

        // Compare digests so the comparison length never depends on the input
        if hash_token(token.trim()) != hash_token(expected) {
            return Err(AppError::Unauthorized("Invalid init token".to_string()));
        }

        Ok(InitAccess)
    }
}

impl FromRef<AppState> for Arc<Config> {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

/// Hash a token for comparison
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}
