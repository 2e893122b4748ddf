//! Repository for the `projects` table.

use callsheet_core::types::DbId;
use sqlx::PgPool;

use crate::models::project::{CreateProject, Project, UpdateProject};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, client_id, name, description, production_company, \
                       director, producer, status, created_at, updated_at";

/// Provides CRUD operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project owned by `user_id`, returning the created row.
    ///
    /// If `status` is `None` in the input, the column default
    /// (`pre_production`) applies.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateProject,
    ) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects
                (user_id, client_id, name, description, production_company, director, producer, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7, COALESCE($8, 'pre_production'::project_status))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(user_id)
            .bind(input.client_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.production_company)
            .bind(&input.director)
            .bind(&input.producer)
            .bind(input.status)
            .fetch_one(pool)
            .await
    }

    /// Find a project by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List the projects of one user, most recently created first,
    /// optionally narrowed to a single client.
    pub async fn list_by_user(
        pool: &PgPool,
        user_id: DbId,
        client_id: Option<DbId>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects
             WHERE user_id = $1 AND ($2::BIGINT IS NULL OR client_id = $2)
             ORDER BY created_at DESC, id DESC
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(user_id)
            .bind(client_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// All projects grouped under a client, most recently created first.
    pub async fn list_by_client(
        pool: &PgPool,
        client_id: DbId,
    ) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects
             WHERE client_id = $1
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(client_id)
            .fetch_all(pool)
            .await
    }

    /// Update a project. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                client_id = COALESCE($2, client_id),
                name = COALESCE($3, name),
                description = COALESCE($4, description),
                production_company = COALESCE($5, production_company),
                director = COALESCE($6, director),
                producer = COALESCE($7, producer),
                status = COALESCE($8, status)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(input.client_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.production_company)
            .bind(&input.director)
            .bind(&input.producer)
            .bind(input.status)
            .fetch_optional(pool)
            .await
    }

    /// Delete a project and its shotlists. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
