//! Handlers for shotlists: `/projects/{project_id}/shotlists` and `/shotlists/{id}`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use callsheet_core::shotlist_schedule::{plan_schedule, total_duration_minutes, ScheduleSlot};
use callsheet_core::types::{DbId, TimeOfDay};
use callsheet_core::validation::{
    validate_optional_required_text, validate_optional_text, validate_required_text,
    MAX_NAME_LENGTH, MAX_SHORT_TEXT_LENGTH,
};
use callsheet_db::models::shotlist::{
    CreateShotlist, ScheduleSummary, Shotlist, ShotlistWithItems, UpdateShotlist,
};
use callsheet_db::models::shotlist_item::ShotlistItem;
use callsheet_db::repositories::{ShotlistItemRepo, ShotlistRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::access::{ensure_project_owner, ensure_shotlist_owner};
use crate::middleware::auth::AuthUser;
use crate::query::PaginationParams;
use crate::state::AppState;

/// Derive counts, total runtime and the next free slot from the stored items.
pub fn summarize(call_time: Option<TimeOfDay>, items: &[ShotlistItem]) -> ScheduleSummary {
    let slots: Vec<ScheduleSlot> = items.iter().map(ShotlistItem::schedule_slot).collect();
    ScheduleSummary {
        item_count: items.len(),
        completed_count: items.iter().filter(|i| i.is_completed).count(),
        total_duration_minutes: total_duration_minutes(&slots),
        next_free_slot: plan_schedule(call_time, &slots).next_free_slot,
    }
}

/// GET /api/v1/projects/{project_id}/shotlists
pub async fn list_by_project(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(project_id): Path<DbId>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Vec<Shotlist>>> {
    ensure_project_owner(&state.pool, project_id, auth_user.user_id).await?;
    let (limit, offset) = params.resolve();
    let shotlists = ShotlistRepo::list_by_project(&state.pool, project_id, limit, offset).await?;
    Ok(Json(shotlists))
}

/// POST /api/v1/projects/{project_id}/shotlists
pub async fn create(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(project_id): Path<DbId>,
    Json(input): Json<CreateShotlist>,
) -> AppResult<(StatusCode, Json<Shotlist>)> {
    ensure_project_owner(&state.pool, project_id, auth_user.user_id).await?;
    validate_required_text("name", &input.name, MAX_NAME_LENGTH)?;
    validate_optional_text("location", input.location.as_deref(), MAX_SHORT_TEXT_LENGTH)?;

    let shotlist = ShotlistRepo::create(&state.pool, project_id, &input).await?;
    tracing::info!(shotlist_id = shotlist.id, project_id, "Shotlist created");
    Ok((StatusCode::CREATED, Json(shotlist)))
}

/// GET /api/v1/shotlists/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<ShotlistWithItems>> {
    ensure_shotlist_owner(&state.pool, id, auth_user.user_id).await?;
    let shotlist = ShotlistRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Shotlist", id))?;
    let items = ShotlistItemRepo::list_by_shotlist(&state.pool, id).await?;
    let schedule = summarize(shotlist.call_time, &items);
    Ok(Json(ShotlistWithItems {
        shotlist,
        items,
        schedule,
    }))
}

/// PUT /api/v1/shotlists/{id}
pub async fn update(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateShotlist>,
) -> AppResult<Json<Shotlist>> {
    ensure_shotlist_owner(&state.pool, id, auth_user.user_id).await?;
    validate_optional_required_text("name", input.name.as_deref(), MAX_NAME_LENGTH)?;
    validate_optional_text("location", input.location.as_deref(), MAX_SHORT_TEXT_LENGTH)?;

    let shotlist = ShotlistRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("Shotlist", id))?;
    Ok(Json(shotlist))
}

/// DELETE /api/v1/shotlists/{id}
pub async fn delete(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    ensure_shotlist_owner(&state.pool, id, auth_user.user_id).await?;
    if ShotlistRepo::delete(&state.pool, id).await? {
        tracing::info!(shotlist_id = id, user_id = auth_user.user_id, "Shotlist deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Shotlist", id))
    }
}
