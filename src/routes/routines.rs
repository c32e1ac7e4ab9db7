use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::auth::AuthUser;
use crate::db::routines;
use crate::error::Result;
use crate::models::{Routine, RoutineCreate, RoutineUpdate};
use crate::routes::validation::{page, Path, Query, ValidatedJson};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct ActivateResponse {
    pub message: &'static str,
    pub routine: Routine,
}

pub async fn create_routine(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ValidatedJson(payload): ValidatedJson<RoutineCreate>,
) -> Result<(StatusCode, Json<Routine>)> {
    let routine = routines::create_routine(&state.pool, user.id, &payload).await?;
    Ok((StatusCode::CREATED, Json(routine)))
}

pub async fn list_routines(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Routine>>> {
    let (skip, limit) = page(params.skip, params.limit);
    let routines = routines::list_routines(&state.pool, user.id, skip, limit).await?;
    Ok(Json(routines))
}

pub async fn get_routine(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(routine_id): Path<i64>,
) -> Result<Json<Routine>> {
    let routine = routines::get_routine(&state.pool, routine_id, user.id).await?;
    Ok(Json(routine))
}

pub async fn update_routine(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(routine_id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<RoutineUpdate>,
) -> Result<Json<Routine>> {
    let routine = routines::update_routine(&state.pool, routine_id, user.id, &payload).await?;
    Ok(Json(routine))
}

pub async fn delete_routine(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(routine_id): Path<i64>,
) -> Result<StatusCode> {
    routines::delete_routine(&state.pool, routine_id, user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Make this the user's single active routine
pub async fn activate_routine(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(routine_id): Path<i64>,
) -> Result<Json<ActivateResponse>> {
    let routine = routines::activate_routine(&state.pool, routine_id, user.id).await?;
    Ok(Json(ActivateResponse {
        message: "Routine activated successfully",
        routine,
    }))
}
