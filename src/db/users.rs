use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{info, instrument};

use crate::constants::ERR_ALREADY_REGISTERED;
use crate::error::{AppError, Result};
use crate::models::{NewUser, User};

/// Insert a new user
///
/// Email and username are compared exactly (case-sensitive). A duplicate on
/// either fails with `Conflict` and writes nothing.
#[instrument(skip(pool, new_user), fields(username = %new_user.username))]
pub async fn create_user(pool: &SqlitePool, new_user: &NewUser) -> Result<User> {
    info!("Creating new user");

    let existing: Option<i64> =
        sqlx::query_scalar("SELECT id FROM users WHERE email = ? OR username = ? LIMIT 1")
            .bind(&new_user.email)
            .bind(&new_user.username)
            .fetch_optional(pool)
            .await?;

    if existing.is_some() {
        info!("Email or username already taken");
        return Err(AppError::Conflict(ERR_ALREADY_REGISTERED));
    }

    let now = Utc::now();
    let inserted = sqlx::query_as::<_, User>(
        "INSERT INTO users (email, username, full_name, hashed_password, is_active, created_at, updated_at)
         VALUES (?, ?, ?, ?, 1, ?, ?)
         RETURNING *",
    )
    .bind(&new_user.email)
    .bind(&new_user.username)
    .bind(&new_user.full_name)
    .bind(&new_user.hashed_password)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await;

    match inserted {
        Ok(user) => Ok(user),
        // Lost a race with a concurrent signup for the same name
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            Err(AppError::Conflict(ERR_ALREADY_REGISTERED))
        }
        Err(e) => Err(e.into()),
    }
}

#[instrument(skip(pool))]
pub async fn find_by_username(pool: &SqlitePool, username: &str) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = ?")
        .bind(username)
        .fetch_optional(pool)
        .await?;

    Ok(user)
}

#[instrument(skip(pool))]
pub async fn find_by_id(pool: &SqlitePool, user_id: i64) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

    Ok(user)
}

/// Enable or disable an account. Returns false if the user does not exist.
#[instrument(skip(pool))]
pub async fn set_active(pool: &SqlitePool, user_id: i64, is_active: bool) -> Result<bool> {
    info!("Toggling user active status");

    let result = sqlx::query("UPDATE users SET is_active = ?, updated_at = ? WHERE id = ?")
        .bind(is_active)
        .bind(Utc::now())
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Permanently delete a user together with their routines and progress
///
/// Dependents go through the schema's `ON DELETE CASCADE` rules.
#[instrument(skip(pool))]
pub async fn delete_user(pool: &SqlitePool, user_id: i64) -> Result<bool> {
    info!("Deleting user and all associated data");

    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
