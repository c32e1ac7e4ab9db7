use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use serde_json::{json, Value};

use crate::auth::AuthUser;
use crate::constants::{ERR_INVALID_CREDENTIALS, TOKEN_TYPE_BEARER};
use crate::db::users;
use crate::error::{AppError, Result};
use crate::models::{LoginRequest, NewUser, SignupRequest, UserResponse};
use crate::routes::validation::ValidatedJson;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub user: UserResponse,
}

/// Register a new account
///
/// Returns 400 if the email or username is already taken. The password is
/// hashed on the blocking pool before anything is written.
pub async fn signup(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<SignupRequest>,
) -> Result<(StatusCode, Json<UserResponse>)> {
    let hashed_password = state.hasher.hash_blocking(payload.password).await?;

    let new_user = NewUser {
        email: payload.email,
        username: payload.username,
        full_name: payload.full_name,
        hashed_password,
    };
    let user = users::create_user(&state.pool, &new_user).await?;

    tracing::info!(user_id = user.id, "New user registered");
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Exchange username and password for an access token
///
/// Unknown usernames and wrong passwords get the same 401 after the same
/// amount of bcrypt work. The active flag is only checked once the password
/// matched.
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let Some(user) = users::find_by_username(&state.pool, &payload.username).await? else {
        state.hasher.verify_missing_blocking(payload.password).await?;
        tracing::warn!("Login attempt for unknown user");
        return Err(AppError::Unauthorized(ERR_INVALID_CREDENTIALS));
    };

    let valid = state
        .hasher
        .verify_blocking(payload.password, user.hashed_password.clone())
        .await?;
    if !valid {
        tracing::warn!(user_id = user.id, "Login attempt with wrong password");
        return Err(AppError::Unauthorized(ERR_INVALID_CREDENTIALS));
    }

    if !user.is_active {
        return Err(AppError::InactiveAccount);
    }

    let access_token = state.tokens.issue(&user.username)?;

    Ok(Json(LoginResponse {
        access_token,
        token_type: TOKEN_TYPE_BEARER,
        user: user.into(),
    }))
}

pub async fn profile(AuthUser(user): AuthUser) -> Json<UserResponse> {
    Json(user.into())
}

/// Tokens are stateless; clients discard theirs. Nothing is revoked.
pub async fn logout(AuthUser(user): AuthUser) -> Json<Value> {
    tracing::info!(user_id = user.id, "User logged out");
    Json(json!({ "message": "Successfully logged out" }))
}
