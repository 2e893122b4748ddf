//! Handlers for the `/clients` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use callsheet_core::error::CoreError;
use callsheet_core::types::DbId;
use callsheet_core::validation::{
    validate_optional_required_text, validate_optional_text, validate_required_text,
    MAX_NAME_LENGTH, MAX_SHORT_TEXT_LENGTH,
};
use callsheet_db::models::client::{Client, ClientWithProjects, CreateClient, UpdateClient};
use callsheet_db::repositories::{ClientRepo, ProjectRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::access::ensure_client_owner;
use crate::middleware::auth::AuthUser;
use crate::query::PaginationParams;
use crate::state::AppState;

fn validate_create(input: &CreateClient) -> Result<(), CoreError> {
    validate_required_text("name", &input.name, MAX_NAME_LENGTH)?;
    validate_optional_text("description", input.description.as_deref(), MAX_SHORT_TEXT_LENGTH)
}

fn validate_update(input: &UpdateClient) -> Result<(), CoreError> {
    validate_optional_required_text("name", input.name.as_deref(), MAX_NAME_LENGTH)?;
    validate_optional_text("description", input.description.as_deref(), MAX_SHORT_TEXT_LENGTH)
}

/// GET /api/v1/clients
pub async fn list(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Vec<Client>>> {
    let (limit, offset) = params.resolve();
    let clients = ClientRepo::list_by_user(&state.pool, auth_user.user_id, limit, offset).await?;
    Ok(Json(clients))
}

/// POST /api/v1/clients
pub async fn create(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(input): Json<CreateClient>,
) -> AppResult<(StatusCode, Json<Client>)> {
    validate_create(&input)?;
    let client = ClientRepo::create(&state.pool, auth_user.user_id, &input).await?;
    tracing::info!(client_id = client.id, user_id = auth_user.user_id, "Client created");
    Ok((StatusCode::CREATED, Json(client)))
}

/// GET /api/v1/clients/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<ClientWithProjects>> {
    let client = ensure_client_owner(&state.pool, id, auth_user.user_id).await?;
    let projects = ProjectRepo::list_by_client(&state.pool, id).await?;
    Ok(Json(ClientWithProjects { client, projects }))
}

/// PUT /api/v1/clients/{id}
pub async fn update(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateClient>,
) -> AppResult<Json<Client>> {
    ensure_client_owner(&state.pool, id, auth_user.user_id).await?;
    validate_update(&input)?;
    let client = ClientRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("Client", id))?;
    Ok(Json(client))
}

/// DELETE /api/v1/clients/{id}
///
/// Also deletes every project grouped under the client.
pub async fn delete(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    ensure_client_owner(&state.pool, id, auth_user.user_id).await?;
    if ClientRepo::delete(&state.pool, id).await? {
        tracing::info!(client_id = id, user_id = auth_user.user_id, "Client deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Client", id))
    }
}
