//! Per-request identity resolution from `Authorization: Bearer` tokens.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use sqlx::SqlitePool;

use crate::constants::{ERR_COULD_NOT_VALIDATE, ERR_INACTIVE_USER, ERR_NOT_AUTHENTICATED};
use crate::db::users;
use crate::error::{AppError, Result};
use crate::models::User;
use crate::token::TokenService;
use crate::AppState;

/// Resolve a raw bearer token to an active user
///
/// The user is loaded fresh on every call, so deactivation takes effect on
/// the next request even while the token is still within its lifetime.
pub async fn resolve_identity(pool: &SqlitePool, tokens: &TokenService, token: &str) -> Result<User> {
    let username = tokens.verify(token)?;

    let user = users::find_by_username(pool, &username)
        .await?
        .ok_or_else(|| {
            tracing::warn!("Token subject no longer exists");
            AppError::Unauthorized(ERR_COULD_NOT_VALIDATE)
        })?;

    if !user.is_active {
        tracing::warn!(user_id = user.id, "Rejected request from inactive user");
        return Err(AppError::Unauthorized(ERR_INACTIVE_USER));
    }

    Ok(user)
}

/// Pull the token out of an `Authorization` header value
///
/// The scheme is matched case-insensitively. Returns `None` for any other
/// scheme or an empty token.
pub fn bearer_token(header_value: &str) -> Option<&str> {
    let (scheme, token) = header_value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Extractor for handlers that require an authenticated, active user
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(bearer_token)
            .ok_or(AppError::Unauthorized(ERR_NOT_AUTHENTICATED))?;

        let user = resolve_identity(&state.pool, &state.tokens, token).await?;
        Ok(AuthUser(user))
    }
}
