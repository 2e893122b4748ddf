//! Repository for the `shotlist_items` table.
//!
//! Every operation that changes `order_index` (create, delete, reorder)
//! first locks the parent shotlist row with `SELECT ... FOR UPDATE`, so
//! index assignment, compaction and reordering of one shotlist are
//! serialized.

use callsheet_core::error::CoreError;
use callsheet_core::shotlist_schedule::{self, ReorderEntry, ScheduleSlot};
use callsheet_core::types::{DbId, TimeOfDay};
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::shotlist_item::{CreateShotlistItem, ShotlistItem, UpdateShotlistItem};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, shotlist_id, shot_name, shot_type, shot_description, time_of_day, \
                       shot_duration, start_time, notes, shot_reference_image, camera_angle, \
                       aspect_ratio, fps, custom_properties, is_completed, duration_locked, \
                       order_index, created_at, updated_at";

/// Result of [`ShotlistItemRepo::reorder`].
#[derive(Debug)]
pub enum ReorderOutcome {
    /// Moves were applied and the transaction committed.
    Applied {
        /// Every item of the shotlist in final order.
        items: Vec<ShotlistItem>,
        /// Clock after the last timed item; `None` without a call time.
        next_free_slot: Option<TimeOfDay>,
    },
    /// The shotlist does not exist.
    ShotlistNotFound,
    /// The request was invalid (negative index, unknown item). Nothing
    /// was written.
    Rejected(CoreError),
}

/// Provides ordering-aware CRUD operations for shotlist items.
pub struct ShotlistItemRepo;

impl ShotlistItemRepo {
    /// Append a new item to the end of a shotlist.
    ///
    /// Returns `None` if the shotlist does not exist.
    pub async fn create(
        pool: &PgPool,
        shotlist_id: DbId,
        input: &CreateShotlistItem,
    ) -> Result<Option<ShotlistItem>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        if lock_shotlist(&mut tx, shotlist_id).await?.is_none() {
            return Ok(None);
        }

        let query = format!(
            "INSERT INTO shotlist_items
                (shotlist_id, shot_name, shot_type, shot_description, time_of_day,
                 shot_duration, start_time, notes, camera_angle, aspect_ratio, fps,
                 custom_properties, duration_locked, order_index)
             VALUES ($1, $2, COALESCE($3, 'Standard'), $4, $5, $6, $7, $8, $9, $10, $11,
                     $12, COALESCE($13, false),
                     (SELECT COUNT(*)::INTEGER FROM shotlist_items WHERE shotlist_id = $1))
             RETURNING {COLUMNS}"
        );
        let item = sqlx::query_as::<_, ShotlistItem>(&query)
            .bind(shotlist_id)
            .bind(&input.shot_name)
            .bind(&input.shot_type)
            .bind(&input.shot_description)
            .bind(&input.time_of_day)
            .bind(input.shot_duration)
            .bind(input.start_time)
            .bind(&input.notes)
            .bind(&input.camera_angle)
            .bind(&input.aspect_ratio)
            .bind(input.fps)
            .bind(&input.custom_properties)
            .bind(input.duration_locked)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(item))
    }

    /// Find an item by its internal ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ShotlistItem>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM shotlist_items WHERE id = $1");
        sqlx::query_as::<_, ShotlistItem>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All items of a shotlist in display order.
    pub async fn list_by_shotlist(
        pool: &PgPool,
        shotlist_id: DbId,
    ) -> Result<Vec<ShotlistItem>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM shotlist_items
             WHERE shotlist_id = $1
             ORDER BY order_index ASC, id ASC"
        );
        sqlx::query_as::<_, ShotlistItem>(&query)
            .bind(shotlist_id)
            .fetch_all(pool)
            .await
    }

    /// Owner of the project an item ultimately belongs to.
    ///
    /// Returns `None` if the item does not exist.
    pub async fn find_owner_id(pool: &PgPool, id: DbId) -> Result<Option<DbId>, sqlx::Error> {
        let row: Option<(DbId,)> = sqlx::query_as(
            "SELECT p.user_id FROM shotlist_items i
             JOIN shotlists s ON s.id = i.shotlist_id
             JOIN projects p ON p.id = s.project_id
             WHERE i.id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;
        Ok(row.map(|r| r.0))
    }

    /// Update an item. Only non-`None` fields in `input` are applied.
    ///
    /// `order_index` is not writable here; use [`Self::reorder`].
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateShotlistItem,
    ) -> Result<Option<ShotlistItem>, sqlx::Error> {
        let query = format!(
            "UPDATE shotlist_items SET
                shot_name = COALESCE($2, shot_name),
                shot_type = COALESCE($3, shot_type),
                shot_description = COALESCE($4, shot_description),
                time_of_day = COALESCE($5, time_of_day),
                shot_duration = COALESCE($6, shot_duration),
                start_time = COALESCE($7, start_time),
                notes = COALESCE($8, notes),
                shot_reference_image = COALESCE($9, shot_reference_image),
                camera_angle = COALESCE($10, camera_angle),
                aspect_ratio = COALESCE($11, aspect_ratio),
                fps = COALESCE($12, fps),
                custom_properties = COALESCE($13, custom_properties),
                is_completed = COALESCE($14, is_completed),
                duration_locked = COALESCE($15, duration_locked)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ShotlistItem>(&query)
            .bind(id)
            .bind(&input.shot_name)
            .bind(&input.shot_type)
            .bind(&input.shot_description)
            .bind(&input.time_of_day)
            .bind(input.shot_duration)
            .bind(input.start_time)
            .bind(&input.notes)
            .bind(&input.shot_reference_image)
            .bind(&input.camera_angle)
            .bind(&input.aspect_ratio)
            .bind(input.fps)
            .bind(&input.custom_properties)
            .bind(input.is_completed)
            .bind(input.duration_locked)
            .fetch_optional(pool)
            .await
    }

    /// Flip `is_completed`, returning the updated row.
    pub async fn toggle_completed(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ShotlistItem>, sqlx::Error> {
        let query = format!(
            "UPDATE shotlist_items SET is_completed = NOT is_completed
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ShotlistItem>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Store the relative path of an uploaded reference image.
    pub async fn set_reference_image(
        pool: &PgPool,
        id: DbId,
        path: &str,
    ) -> Result<Option<ShotlistItem>, sqlx::Error> {
        let query = format!(
            "UPDATE shotlist_items SET shot_reference_image = $2
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ShotlistItem>(&query)
            .bind(id)
            .bind(path)
            .fetch_optional(pool)
            .await
    }

    /// Delete an item and close the gap it leaves in its shotlist.
    ///
    /// Every later item moves up by one. Start times are not recomputed.
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let parent: Option<(DbId,)> =
            sqlx::query_as("SELECT shotlist_id FROM shotlist_items WHERE id = $1")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some((shotlist_id,)) = parent else {
            return Ok(false);
        };

        lock_shotlist(&mut tx, shotlist_id).await?;

        let removed: Option<(i32,)> =
            sqlx::query_as("DELETE FROM shotlist_items WHERE id = $1 RETURNING order_index")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some((removed_index,)) = removed else {
            return Ok(false);
        };

        let shifted = sqlx::query(
            "UPDATE shotlist_items SET order_index = order_index - 1
             WHERE shotlist_id = $1 AND order_index > $2",
        )
        .bind(shotlist_id)
        .bind(removed_index)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::debug!(
            item_id = id,
            shotlist_id,
            removed_index,
            shifted = shifted.rows_affected(),
            "Compacted shotlist after item delete"
        );
        Ok(true)
    }

    /// Apply `(item_id, new_index)` moves to a shotlist and recompute start
    /// times from its call time.
    ///
    /// Runs in one transaction holding the shotlist row lock. Indices are
    /// renumbered densely in `(requested index, id)` order, so a valid
    /// permutation is applied as-is and gapped or duplicated input still
    /// leaves `0..n`. A move naming an item outside the shotlist rejects
    /// the whole request and nothing is written.
    pub async fn reorder(
        pool: &PgPool,
        shotlist_id: DbId,
        entries: &[ReorderEntry],
    ) -> Result<ReorderOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let Some(call_time) = lock_shotlist(&mut tx, shotlist_id).await? else {
            return Ok(ReorderOutcome::ShotlistNotFound);
        };

        let stored: Vec<(DbId, i32, Option<i32>, Option<TimeOfDay>)> = sqlx::query_as(
            "SELECT id, order_index, shot_duration, start_time FROM shotlist_items
             WHERE shotlist_id = $1
             ORDER BY order_index ASC, id ASC",
        )
        .bind(shotlist_id)
        .fetch_all(&mut *tx)
        .await?;
        let slots: Vec<ScheduleSlot> = stored
            .into_iter()
            .map(|(item_id, order_index, shot_duration, start_time)| ScheduleSlot {
                item_id,
                order_index,
                shot_duration,
                start_time,
            })
            .collect();

        let plan = match shotlist_schedule::reorder_and_plan(call_time, &slots, entries) {
            Ok(plan) => plan,
            Err(err) => {
                tx.rollback().await?;
                return Ok(ReorderOutcome::Rejected(err));
            }
        };

        let mut written = 0usize;
        for slot in plan.changed() {
            sqlx::query(
                "UPDATE shotlist_items SET order_index = $2, start_time = $3
                 WHERE id = $1",
            )
            .bind(slot.item_id)
            .bind(slot.order_index)
            .bind(slot.start_time)
            .execute(&mut *tx)
            .await?;
            written += 1;
        }

        let query = format!(
            "SELECT {COLUMNS} FROM shotlist_items
             WHERE shotlist_id = $1
             ORDER BY order_index ASC, id ASC"
        );
        let items = sqlx::query_as::<_, ShotlistItem>(&query)
            .bind(shotlist_id)
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::debug!(
            shotlist_id,
            moves = entries.len(),
            written,
            "Reordered shotlist items"
        );
        Ok(ReorderOutcome::Applied {
            items,
            next_free_slot: plan.next_free_slot,
        })
    }
}

/// Lock a shotlist row for the rest of the transaction.
///
/// Returns `None` if the shotlist does not exist, otherwise its call time.
async fn lock_shotlist(
    tx: &mut Transaction<'_, Postgres>,
    shotlist_id: DbId,
) -> Result<Option<Option<TimeOfDay>>, sqlx::Error> {
    let row: Option<(Option<TimeOfDay>,)> =
        sqlx::query_as("SELECT call_time FROM shotlists WHERE id = $1 FOR UPDATE")
            .bind(shotlist_id)
            .fetch_optional(&mut **tx)
            .await?;
    Ok(row.map(|r| r.0))
}
