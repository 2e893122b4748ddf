//! Repository for the `shotlists` table.

use callsheet_core::types::DbId;
use sqlx::PgPool;

use crate::models::shotlist::{CreateShotlist, Shotlist, UpdateShotlist};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, name, shooting_date, call_time, wrap_time, \
                       location, notes, created_at, updated_at";

/// Provides CRUD operations for shotlists.
pub struct ShotlistRepo;

impl ShotlistRepo {
    /// Insert a new shotlist under `project_id`, returning the created row.
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        input: &CreateShotlist,
    ) -> Result<Shotlist, sqlx::Error> {
        let query = format!(
            "INSERT INTO shotlists
                (project_id, name, shooting_date, call_time, wrap_time, location, notes)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Shotlist>(&query)
            .bind(project_id)
            .bind(&input.name)
            .bind(input.shooting_date)
            .bind(input.call_time)
            .bind(input.wrap_time)
            .bind(&input.location)
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    /// Find a shotlist by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Shotlist>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM shotlists WHERE id = $1");
        sqlx::query_as::<_, Shotlist>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List the shotlists of a project by shooting date (undated last).
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Shotlist>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM shotlists
             WHERE project_id = $1
             ORDER BY shooting_date ASC NULLS LAST, id ASC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Shotlist>(&query)
            .bind(project_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Owner of the project a shotlist belongs to.
    ///
    /// Returns `None` if the shotlist does not exist.
    pub async fn find_owner_id(pool: &PgPool, id: DbId) -> Result<Option<DbId>, sqlx::Error> {
        let row: Option<(DbId,)> = sqlx::query_as(
            "SELECT p.user_id FROM shotlists s
             JOIN projects p ON p.id = s.project_id
             WHERE s.id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;
        Ok(row.map(|r| r.0))
    }

    /// Update a shotlist. Only non-`None` fields in `input` are applied.
    ///
    /// Changing `call_time` does not touch stored item start times; they
    /// are recomputed on the next reorder.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateShotlist,
    ) -> Result<Option<Shotlist>, sqlx::Error> {
        let query = format!(
            "UPDATE shotlists SET
                name = COALESCE($2, name),
                shooting_date = COALESCE($3, shooting_date),
                call_time = COALESCE($4, call_time),
                wrap_time = COALESCE($5, wrap_time),
                location = COALESCE($6, location),
                notes = COALESCE($7, notes)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Shotlist>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.shooting_date)
            .bind(input.call_time)
            .bind(input.wrap_time)
            .bind(&input.location)
            .bind(&input.notes)
            .fetch_optional(pool)
            .await
    }

    /// Delete a shotlist and its items. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM shotlists WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
