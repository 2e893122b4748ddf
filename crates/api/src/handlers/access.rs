//! Ownership checks shared by the resource handlers.
//!
//! Ownership is transitive: item -> shotlist -> project -> user. Each
//! helper answers `404` when the entity does not exist and `403` when it
//! belongs to another user, and must run before any mutation.

use callsheet_core::error::CoreError;
use callsheet_core::types::DbId;
use callsheet_db::models::client::Client;
use callsheet_db::models::project::Project;
use callsheet_db::repositories::{ClientRepo, ProjectRepo, ShotlistItemRepo, ShotlistRepo};
use sqlx::PgPool;

use crate::error::{AppError, AppResult};

fn check_owner(entity: &'static str, id: DbId, owner_id: DbId, user_id: DbId) -> AppResult<()> {
    if owner_id == user_id {
        Ok(())
    } else {
        tracing::warn!(entity, id, user_id, "Access to another user's resource denied");
        Err(AppError::Core(CoreError::Forbidden(format!(
            "{entity} {id} belongs to another user"
        ))))
    }
}

pub async fn ensure_client_owner(pool: &PgPool, client_id: DbId, user_id: DbId) -> AppResult<Client> {
    let client = ClientRepo::find_by_id(pool, client_id)
        .await?
        .ok_or_else(|| AppError::not_found("Client", client_id))?;
    check_owner("Client", client_id, client.user_id, user_id)?;
    Ok(client)
}

pub async fn ensure_project_owner(
    pool: &PgPool,
    project_id: DbId,
    user_id: DbId,
) -> AppResult<Project> {
    let project = ProjectRepo::find_by_id(pool, project_id)
        .await?
        .ok_or_else(|| AppError::not_found("Project", project_id))?;
    check_owner("Project", project_id, project.user_id, user_id)?;
    Ok(project)
}

pub async fn ensure_shotlist_owner(pool: &PgPool, shotlist_id: DbId, user_id: DbId) -> AppResult<()> {
    let owner_id = ShotlistRepo::find_owner_id(pool, shotlist_id)
        .await?
        .ok_or_else(|| AppError::not_found("Shotlist", shotlist_id))?;
    check_owner("Shotlist", shotlist_id, owner_id, user_id)
}

pub async fn ensure_item_owner(pool: &PgPool, item_id: DbId, user_id: DbId) -> AppResult<()> {
    let owner_id = ShotlistItemRepo::find_owner_id(pool, item_id)
        .await?
        .ok_or_else(|| AppError::not_found("ShotlistItem", item_id))?;
    check_owner("ShotlistItem", item_id, owner_id, user_id)
}
