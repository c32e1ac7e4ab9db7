//! Routine persistence. Every query is filtered by the owning user's id, so a
//! routine that belongs to someone else looks exactly like a missing one.

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{info, instrument};

use crate::constants::ERR_ROUTINE_NOT_FOUND;
use crate::error::{AppError, Result};
use crate::models::{Routine, RoutineCreate, RoutineUpdate};

/// Insert a routine owned by `user_id`
///
/// The new routine starts active only when the user has no active routine
/// yet; the check and the insert are one statement.
#[instrument(skip(pool, routine), fields(title = %routine.title))]
pub async fn create_routine(
    pool: &SqlitePool,
    user_id: i64,
    routine: &RoutineCreate,
) -> Result<Routine> {
    info!("Creating routine");

    let now = Utc::now();
    let created = sqlx::query_as::<_, Routine>(
        "INSERT INTO routines
             (user_id, title, goal, description, yogasana_ids, duration_minutes, is_active, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?,
             NOT EXISTS (SELECT 1 FROM routines WHERE user_id = ? AND is_active = 1),
             ?, ?)
         RETURNING *",
    )
    .bind(user_id)
    .bind(&routine.title)
    .bind(&routine.goal)
    .bind(&routine.description)
    .bind(&routine.yogasana_ids)
    .bind(routine.duration_minutes)
    .bind(user_id)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(created)
}

#[instrument(skip(pool))]
pub async fn list_routines(
    pool: &SqlitePool,
    user_id: i64,
    skip: i64,
    limit: i64,
) -> Result<Vec<Routine>> {
    info!("Listing routines");

    let routines = sqlx::query_as::<_, Routine>(
        "SELECT * FROM routines
         WHERE user_id = ?
         ORDER BY id
         LIMIT ? OFFSET ?",
    )
    .bind(user_id)
    .bind(limit)
    .bind(skip)
    .fetch_all(pool)
    .await?;

    Ok(routines)
}

#[instrument(skip(pool))]
pub async fn get_routine(pool: &SqlitePool, routine_id: i64, user_id: i64) -> Result<Routine> {
    sqlx::query_as::<_, Routine>("SELECT * FROM routines WHERE id = ? AND user_id = ?")
        .bind(routine_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::NotFound(ERR_ROUTINE_NOT_FOUND))
}

/// Apply the fields present in `update`
///
/// An explicit `null` clears `description` or `duration_minutes`.
///
/// Setting `is_active` to true deactivates the user's other routines in the
/// same transaction.
#[instrument(skip(pool, update))]
pub async fn update_routine(
    pool: &SqlitePool,
    routine_id: i64,
    user_id: i64,
    update: &RoutineUpdate,
) -> Result<Routine> {
    info!("Updating routine");

    let now = Utc::now();
    let mut tx = pool.begin().await?;

    let updated = sqlx::query_as::<_, Routine>(
        "UPDATE routines SET
             title = COALESCE(?, title),
             goal = COALESCE(?, goal),
             description = CASE WHEN ? THEN ? ELSE description END,
             yogasana_ids = COALESCE(?, yogasana_ids),
             duration_minutes = CASE WHEN ? THEN ? ELSE duration_minutes END,
             is_active = COALESCE(?, is_active),
             updated_at = ?
         WHERE id = ? AND user_id = ?
         RETURNING *",
    )
    .bind(&update.title)
    .bind(&update.goal)
    .bind(update.description.is_some())
    .bind(update.description.clone().flatten())
    .bind(&update.yogasana_ids)
    .bind(update.duration_minutes.is_some())
    .bind(update.duration_minutes.flatten())
    .bind(update.is_active)
    .bind(now)
    .bind(routine_id)
    .bind(user_id)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(routine) = updated else {
        tx.rollback().await?;
        return Err(AppError::NotFound(ERR_ROUTINE_NOT_FOUND));
    };

    if update.is_active == Some(true) {
        deactivate_others(&mut *tx, user_id, routine_id, now).await?;
    }

    tx.commit().await?;

    Ok(routine)
}

#[instrument(skip(pool))]
pub async fn delete_routine(pool: &SqlitePool, routine_id: i64, user_id: i64) -> Result<()> {
    info!("Deleting routine");

    let result = sqlx::query("DELETE FROM routines WHERE id = ? AND user_id = ?")
        .bind(routine_id)
        .bind(user_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(ERR_ROUTINE_NOT_FOUND));
    }

    Ok(())
}

/// Make `routine_id` the user's only active routine
///
/// Clears every active flag of the user, then sets the target, inside one
/// transaction. If the target is not the user's, the clear is rolled back.
#[instrument(skip(pool))]
pub async fn activate_routine(pool: &SqlitePool, routine_id: i64, user_id: i64) -> Result<Routine> {
    info!("Activating routine");

    let now = Utc::now();
    let mut tx = pool.begin().await?;

    sqlx::query(
        "UPDATE routines SET is_active = 0, updated_at = ?
         WHERE user_id = ? AND is_active = 1",
    )
    .bind(now)
    .bind(user_id)
    .execute(&mut *tx)
    .await?;

    let activated = sqlx::query_as::<_, Routine>(
        "UPDATE routines SET is_active = 1, updated_at = ?
         WHERE id = ? AND user_id = ?
         RETURNING *",
    )
    .bind(now)
    .bind(routine_id)
    .bind(user_id)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(routine) = activated else {
        tx.rollback().await?;
        return Err(AppError::NotFound(ERR_ROUTINE_NOT_FOUND));
    };

    tx.commit().await?;

    Ok(routine)
}

/// Clear the active flag on every routine of `user_id` except `keep_id`
async fn deactivate_others(
    conn: &mut SqliteConnection,
    user_id: i64,
    keep_id: i64,
    now: DateTime<Utc>,
) -> Result<()> {
    sqlx::query(
        "UPDATE routines SET is_active = 0, updated_at = ?
         WHERE user_id = ? AND id != ? AND is_active = 1",
    )
    .bind(now)
    .bind(user_id)
    .bind(keep_id)
    .execute(conn)
    .await?;

    Ok(())
}
