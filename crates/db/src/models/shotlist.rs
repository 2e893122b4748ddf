//! Shotlist entity model and DTOs.

use callsheet_core::types::{DbId, TimeOfDay, Timestamp};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::shotlist_item::ShotlistItem;

/// A row from the `shotlists` table: one shooting day within a project.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Shotlist {
    pub id: DbId,
    pub project_id: DbId,
    pub name: String,
    pub shooting_date: Option<NaiveDate>,
    /// Anchor for derived shot start times.
    pub call_time: Option<TimeOfDay>,
    pub wrap_time: Option<TimeOfDay>,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Totals derived from the items of a shotlist.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleSummary {
    pub item_count: usize,
    pub completed_count: usize,
    pub total_duration_minutes: i64,
    /// Clock value after the last timed shot, when a call time is set.
    pub next_free_slot: Option<TimeOfDay>,
}

/// A shotlist with its items in order and a schedule summary.
#[derive(Debug, Clone, Serialize)]
pub struct ShotlistWithItems {
    #[serde(flatten)]
    pub shotlist: Shotlist,
    pub items: Vec<ShotlistItem>,
    pub schedule: ScheduleSummary,
}

/// DTO for creating a new shotlist under a project.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateShotlist {
    pub name: String,
    pub shooting_date: Option<NaiveDate>,
    pub call_time: Option<TimeOfDay>,
    pub wrap_time: Option<TimeOfDay>,
    pub location: Option<String>,
    pub notes: Option<String>,
}

/// DTO for updating an existing shotlist. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateShotlist {
    pub name: Option<String>,
    pub shooting_date: Option<NaiveDate>,
    pub call_time: Option<TimeOfDay>,
    pub wrap_time: Option<TimeOfDay>,
    pub location: Option<String>,
    pub notes: Option<String>,
}
