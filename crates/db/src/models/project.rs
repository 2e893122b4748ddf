//! Project entity model and DTOs.

use callsheet_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::shotlist::Shotlist;

/// Production phase, stored as the `project_status` Postgres enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "project_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    #[default]
    PreProduction,
    Production,
    PostProduction,
    Completed,
}

/// A project row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub user_id: DbId,
    pub client_id: Option<DbId>,
    pub name: String,
    pub description: Option<String>,
    pub production_company: Option<String>,
    pub director: Option<String>,
    pub producer: Option<String>,
    pub status: ProjectStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A project together with its shotlists.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectWithShotlists {
    #[serde(flatten)]
    pub project: Project,
    pub shotlists: Vec<Shotlist>,
}

/// DTO for creating a new project. The owner comes from the auth context.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProject {
    pub name: String,
    pub client_id: Option<DbId>,
    pub description: Option<String>,
    pub production_company: Option<String>,
    pub director: Option<String>,
    pub producer: Option<String>,
    /// Defaults to `pre_production` if omitted.
    pub status: Option<ProjectStatus>,
}

/// DTO for updating an existing project. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProject {
    pub name: Option<String>,
    pub client_id: Option<DbId>,
    pub description: Option<String>,
    pub production_company: Option<String>,
    pub director: Option<String>,
    pub producer: Option<String>,
    pub status: Option<ProjectStatus>,
}
