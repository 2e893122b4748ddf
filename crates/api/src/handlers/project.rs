//! Handlers for the `/projects` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use callsheet_core::error::CoreError;
use callsheet_core::pagination::MAX_PAGE_LIMIT;
use callsheet_core::types::DbId;
use callsheet_core::validation::{
    validate_optional_required_text, validate_optional_text, validate_required_text,
    MAX_NAME_LENGTH,
};
use callsheet_db::models::project::{CreateProject, Project, ProjectWithShotlists, UpdateProject};
use callsheet_db::repositories::{ProjectRepo, ShotlistRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::access::{ensure_client_owner, ensure_project_owner};
use crate::middleware::auth::AuthUser;
use crate::query::ProjectListParams;
use crate::state::AppState;

fn validate_people(
    production_company: Option<&str>,
    director: Option<&str>,
    producer: Option<&str>,
) -> Result<(), CoreError> {
    validate_optional_text("production_company", production_company, MAX_NAME_LENGTH)?;
    validate_optional_text("director", director, MAX_NAME_LENGTH)?;
    validate_optional_text("producer", producer, MAX_NAME_LENGTH)
}

/// GET /api/v1/projects
pub async fn list(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(params): Query<ProjectListParams>,
) -> AppResult<Json<Vec<Project>>> {
    let (limit, offset) = params.pagination().resolve();
    let projects = ProjectRepo::list_by_user(
        &state.pool,
        auth_user.user_id,
        params.client_id,
        limit,
        offset,
    )
    .await?;
    Ok(Json(projects))
}

/// POST /api/v1/projects
pub async fn create(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(input): Json<CreateProject>,
) -> AppResult<(StatusCode, Json<Project>)> {
    validate_required_text("name", &input.name, MAX_NAME_LENGTH)?;
    validate_people(
        input.production_company.as_deref(),
        input.director.as_deref(),
        input.producer.as_deref(),
    )?;
    if let Some(client_id) = input.client_id {
        ensure_client_owner(&state.pool, client_id, auth_user.user_id).await?;
    }

    let project = ProjectRepo::create(&state.pool, auth_user.user_id, &input).await?;
    tracing::info!(project_id = project.id, user_id = auth_user.user_id, "Project created");
    Ok((StatusCode::CREATED, Json(project)))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<ProjectWithShotlists>> {
    let project = ensure_project_owner(&state.pool, id, auth_user.user_id).await?;
    let shotlists = ShotlistRepo::list_by_project(&state.pool, id, MAX_PAGE_LIMIT, 0).await?;
    Ok(Json(ProjectWithShotlists { project, shotlists }))
}

/// PUT /api/v1/projects/{id}
pub async fn update(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProject>,
) -> AppResult<Json<Project>> {
    ensure_project_owner(&state.pool, id, auth_user.user_id).await?;
    validate_optional_required_text("name", input.name.as_deref(), MAX_NAME_LENGTH)?;
    validate_people(
        input.production_company.as_deref(),
        input.director.as_deref(),
        input.producer.as_deref(),
    )?;
    if let Some(client_id) = input.client_id {
        ensure_client_owner(&state.pool, client_id, auth_user.user_id).await?;
    }

    let project = ProjectRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("Project", id))?;
    Ok(Json(project))
}

/// DELETE /api/v1/projects/{id}
pub async fn delete(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    ensure_project_owner(&state.pool, id, auth_user.user_id).await?;
    if ProjectRepo::delete(&state.pool, id).await? {
        tracing::info!(project_id = id, user_id = auth_user.user_id, "Project deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Project", id))
    }
}
