use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use chrono::{Duration, Utc};
use serde::Deserialize;

use crate::auth::AuthUser;
use crate::constants::{DEFAULT_HISTORY_DAYS, MAX_HISTORY_DAYS};
use crate::db::progress;
use crate::error::Result;
use crate::models::{Progress, ProgressCreate, ProgressStats, ProgressUpdate};
use crate::routes::validation::{page, Path, Query, ValidatedJson};
use crate::stats;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct HistoryParams {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
    /// Look-back window in days, counted from now
    pub days: Option<i64>,
}

pub async fn create_progress(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ValidatedJson(payload): ValidatedJson<ProgressCreate>,
) -> Result<(StatusCode, Json<Progress>)> {
    let created = progress::create_progress(&state.pool, user.id, &payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn history(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(params): Query<HistoryParams>,
) -> Result<Json<Vec<Progress>>> {
    let (skip, limit) = page(params.skip, params.limit);
    let days = params
        .days
        .unwrap_or(DEFAULT_HISTORY_DAYS)
        .clamp(0, MAX_HISTORY_DAYS);
    let since = Utc::now() - Duration::days(days);

    let rows = progress::history(&state.pool, user.id, since, skip, limit).await?;
    Ok(Json(rows))
}

pub async fn progress_stats(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<ProgressStats>> {
    let stats = stats::progress_stats(&state.pool, user.id, Utc::now()).await?;
    Ok(Json(stats))
}

pub async fn for_routine(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(routine_id): Path<i64>,
) -> Result<Json<Vec<Progress>>> {
    let rows = progress::for_routine(&state.pool, user.id, routine_id).await?;
    Ok(Json(rows))
}

pub async fn for_yogasana(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(yogasana_id): Path<String>,
) -> Result<Json<Vec<Progress>>> {
    let rows = progress::for_yogasana(&state.pool, user.id, &yogasana_id).await?;
    Ok(Json(rows))
}

pub async fn update_progress(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(progress_id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<ProgressUpdate>,
) -> Result<Json<Progress>> {
    let updated = progress::update_progress(&state.pool, progress_id, user.id, &payload).await?;
    Ok(Json(updated))
}

pub async fn delete_progress(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(progress_id): Path<i64>,
) -> Result<StatusCode> {
    progress::delete_progress(&state.pool, progress_id, user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
