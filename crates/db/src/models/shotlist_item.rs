//! Shotlist item entity model and DTOs.
//!
//! `order_index` is owned by the repository: it is assigned on create,
//! rewritten by reorder and compacted on delete. Neither DTO exposes it.

use callsheet_core::shotlist_schedule::{ReorderEntry, ScheduleSlot};
use callsheet_core::types::{DbId, TimeOfDay, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `shotlist_items` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ShotlistItem {
    pub id: DbId,
    pub shotlist_id: DbId,
    pub shot_name: String,
    pub shot_type: String,
    pub shot_description: Option<String>,
    pub time_of_day: Option<String>,
    /// Minutes.
    pub shot_duration: Option<i32>,
    /// Derived from the shotlist call time on reorder.
    pub start_time: Option<TimeOfDay>,
    pub notes: Option<String>,
    pub shot_reference_image: Option<String>,
    pub camera_angle: Option<String>,
    pub aspect_ratio: Option<String>,
    pub fps: Option<i32>,
    pub custom_properties: Option<serde_json::Value>,
    pub is_completed: bool,
    pub duration_locked: bool,
    pub order_index: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ShotlistItem {
    /// Project this row onto the fields the schedule planner needs.
    pub fn schedule_slot(&self) -> ScheduleSlot {
        ScheduleSlot {
            item_id: self.id,
            order_index: self.order_index,
            shot_duration: self.shot_duration,
            start_time: self.start_time,
        }
    }
}

/// DTO for creating a new item. It is appended at the end of the shotlist.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateShotlistItem {
    pub shot_name: String,
    pub shot_type: Option<String>,
    pub shot_description: Option<String>,
    pub time_of_day: Option<String>,
    pub shot_duration: Option<i32>,
    pub start_time: Option<TimeOfDay>,
    pub notes: Option<String>,
    pub camera_angle: Option<String>,
    pub aspect_ratio: Option<String>,
    pub fps: Option<i32>,
    pub custom_properties: Option<serde_json::Value>,
    pub duration_locked: Option<bool>,
}

/// DTO for updating an existing item. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateShotlistItem {
    pub shot_name: Option<String>,
    pub shot_type: Option<String>,
    pub shot_description: Option<String>,
    pub time_of_day: Option<String>,
    pub shot_duration: Option<i32>,
    pub start_time: Option<TimeOfDay>,
    pub notes: Option<String>,
    pub shot_reference_image: Option<String>,
    pub camera_angle: Option<String>,
    pub aspect_ratio: Option<String>,
    pub fps: Option<i32>,
    pub custom_properties: Option<serde_json::Value>,
    pub is_completed: Option<bool>,
    pub duration_locked: Option<bool>,
}

/// Request body for `PUT /shotlists/{id}/items/reorder`.
#[derive(Debug, Clone, Deserialize)]
pub struct ReorderRequest {
    pub items: Vec<ReorderEntry>,
}
