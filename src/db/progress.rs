//! Progress persistence and the aggregate queries behind the statistics
//! endpoint. Reads and writes are always scoped to the owning user.

use chrono::{DateTime, Utc};
use sqlx::{SqliteExecutor, SqlitePool};
use tracing::{info, instrument};

use crate::constants::{ERR_PROGRESS_NOT_FOUND, ERR_ROUTINE_NOT_FOUND};
use crate::error::{AppError, Result};
use crate::models::{Progress, ProgressCreate, ProgressUpdate};

/// Record a practice session for `user_id`
///
/// A `routine_id`, when given, must name one of the user's own routines;
/// otherwise nothing is written and `NotFound` is returned.
#[instrument(skip(pool, progress), fields(yogasana_id = %progress.yogasana_id))]
pub async fn create_progress(
    pool: &SqlitePool,
    user_id: i64,
    progress: &ProgressCreate,
) -> Result<Progress> {
    info!("Logging progress");

    let now = Utc::now();
    let practice_date = progress.practice_date.unwrap_or(now);

    let created = sqlx::query_as::<_, Progress>(
        "INSERT INTO progress
             (user_id, routine_id, yogasana_id, yogasana_name, completion_time, is_completed,
              notes, practice_date, created_at, updated_at)
         SELECT ?, ?, ?, ?, ?, ?, ?, ?, ?, ?
         WHERE ? IS NULL
            OR EXISTS (SELECT 1 FROM routines WHERE id = ? AND user_id = ?)
         RETURNING *",
    )
    .bind(user_id)
    .bind(progress.routine_id)
    .bind(&progress.yogasana_id)
    .bind(&progress.yogasana_name)
    .bind(progress.completion_time)
    .bind(progress.is_completed)
    .bind(&progress.notes)
    .bind(practice_date)
    .bind(now)
    .bind(now)
    .bind(progress.routine_id)
    .bind(progress.routine_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    created.ok_or(AppError::NotFound(ERR_ROUTINE_NOT_FOUND))
}

/// Recently recorded sessions, newest first
#[instrument(skip(pool))]
pub async fn history(
    pool: &SqlitePool,
    user_id: i64,
    since: DateTime<Utc>,
    skip: i64,
    limit: i64,
) -> Result<Vec<Progress>> {
    info!("Getting progress history");

    let rows = sqlx::query_as::<_, Progress>(
        "SELECT * FROM progress
         WHERE user_id = ? AND created_at >= ?
         ORDER BY created_at DESC, id DESC
         LIMIT ? OFFSET ?",
    )
    .bind(user_id)
    .bind(since)
    .bind(limit)
    .bind(skip)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

#[instrument(skip(pool))]
pub async fn for_routine(pool: &SqlitePool, user_id: i64, routine_id: i64) -> Result<Vec<Progress>> {
    let rows = sqlx::query_as::<_, Progress>(
        "SELECT * FROM progress
         WHERE user_id = ? AND routine_id = ?
         ORDER BY created_at DESC, id DESC",
    )
    .bind(user_id)
    .bind(routine_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

#[instrument(skip(pool))]
pub async fn for_yogasana(
    pool: &SqlitePool,
    user_id: i64,
    yogasana_id: &str,
) -> Result<Vec<Progress>> {
    let rows = sqlx::query_as::<_, Progress>(
        "SELECT * FROM progress
         WHERE user_id = ? AND yogasana_id = ?
         ORDER BY created_at DESC, id DESC",
    )
    .bind(user_id)
    .bind(yogasana_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

#[instrument(skip(pool, update))]
pub async fn update_progress(
    pool: &SqlitePool,
    progress_id: i64,
    user_id: i64,
    update: &ProgressUpdate,
) -> Result<Progress> {
    info!("Updating progress");

    sqlx::query_as::<_, Progress>(
        "UPDATE progress SET
             is_completed = COALESCE(?, is_completed),
             notes = COALESCE(?, notes),
             completion_time = COALESCE(?, completion_time),
             updated_at = ?
         WHERE id = ? AND user_id = ?
         RETURNING *",
    )
    .bind(update.is_completed)
    .bind(&update.notes)
    .bind(update.completion_time)
    .bind(Utc::now())
    .bind(progress_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound(ERR_PROGRESS_NOT_FOUND))
}

#[instrument(skip(pool))]
pub async fn delete_progress(pool: &SqlitePool, progress_id: i64, user_id: i64) -> Result<()> {
    info!("Deleting progress");

    let result = sqlx::query("DELETE FROM progress WHERE id = ? AND user_id = ?")
        .bind(progress_id)
        .bind(user_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(ERR_PROGRESS_NOT_FOUND));
    }

    Ok(())
}

// =============================================================================
// Aggregates
// =============================================================================

pub async fn count_for_user<'e, E>(executor: E, user_id: i64) -> Result<i64>
where
    E: SqliteExecutor<'e>,
{
    let count = sqlx::query_scalar("SELECT COUNT(*) FROM progress WHERE user_id = ?")
        .bind(user_id)
        .fetch_one(executor)
        .await?;

    Ok(count)
}

/// Sum of `completion_time` in seconds; 0 when the user has no rows
pub async fn total_seconds<'e, E>(executor: E, user_id: i64) -> Result<i64>
where
    E: SqliteExecutor<'e>,
{
    let total = sqlx::query_scalar(
        "SELECT COALESCE(SUM(completion_time), 0) FROM progress WHERE user_id = ?",
    )
    .bind(user_id)
    .fetch_one(executor)
    .await?;

    Ok(total)
}

/// Completed sessions with `practice_date` in `[start, end)`
pub async fn completed_between<'e, E>(
    executor: E,
    user_id: i64,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<i64>
where
    E: SqliteExecutor<'e>,
{
    let count = sqlx::query_scalar(
        "SELECT COUNT(*) FROM progress
         WHERE user_id = ? AND is_completed = 1
           AND practice_date >= ? AND practice_date < ?",
    )
    .bind(user_id)
    .bind(start)
    .bind(end)
    .fetch_one(executor)
    .await?;

    Ok(count)
}

/// Most frequently logged pose name
pub async fn favorite_yogasana<'e, E>(executor: E, user_id: i64) -> Result<Option<String>>
where
    E: SqliteExecutor<'e>,
{
    let name = sqlx::query_scalar(
        "SELECT yogasana_name FROM progress
         WHERE user_id = ?
         GROUP BY yogasana_name
         ORDER BY COUNT(id) DESC
         LIMIT 1",
    )
    .bind(user_id)
    .fetch_optional(executor)
    .await?;

    Ok(name)
}

/// Practice dates of the `limit` most recent sessions, newest first
pub async fn recent_practice_dates<'e, E>(
    executor: E,
    user_id: i64,
    limit: i64,
) -> Result<Vec<DateTime<Utc>>>
where
    E: SqliteExecutor<'e>,
{
    let dates = sqlx::query_scalar(
        "SELECT practice_date FROM progress
         WHERE user_id = ?
         ORDER BY practice_date DESC
         LIMIT ?",
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(executor)
    .await?;

    Ok(dates)
}
