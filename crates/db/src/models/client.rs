//! Client entity model and DTOs.

use callsheet_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::project::Project;

/// A row from the `clients` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Client {
    pub id: DbId,
    pub user_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A client together with the projects grouped under it.
#[derive(Debug, Clone, Serialize)]
pub struct ClientWithProjects {
    #[serde(flatten)]
    pub client: Client,
    pub projects: Vec<Project>,
}

/// DTO for creating a new client.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateClient {
    pub name: String,
    pub description: Option<String>,
}

/// DTO for updating an existing client. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateClient {
    pub name: Option<String>,
    pub description: Option<String>,
}
