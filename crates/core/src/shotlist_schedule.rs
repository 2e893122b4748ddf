//! Reorder-and-reschedule planning for shotlist items.
//!
//! The repository loads the items of a shotlist (in stored order), hands
//! them to [`reorder_and_plan`] together with the requested moves, and
//! writes back every [`PlannedSlot`] whose index or start time changed.
//!
//! Scheduling walks the items in their final order starting at the
//! shotlist's call time. Each item with a duration starts at the running
//! clock and pushes the clock forward by its duration. Items without a
//! duration keep whatever start time they already had and do not move the
//! clock. The clock is a plain time of day, so a schedule that runs past
//! midnight wraps to `00:00`.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DbId, TimeOfDay};

/// A single `(item_id, new_index)` move requested by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReorderEntry {
    pub item_id: DbId,
    pub new_index: i32,
}

/// The scheduling-relevant projection of a stored shotlist item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleSlot {
    pub item_id: DbId,
    pub order_index: i32,
    /// Minutes. `None` (or a non-positive value) means "untimed".
    pub shot_duration: Option<i32>,
    pub start_time: Option<TimeOfDay>,
}

/// Final position and start time computed for one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedSlot {
    pub item_id: DbId,
    pub order_index: i32,
    pub start_time: Option<TimeOfDay>,
    /// `true` when either field differs from the stored row.
    pub changed: bool,
}

/// Result of a scheduling walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulePlan {
    /// One entry per item, in final order.
    pub slots: Vec<PlannedSlot>,
    /// Clock value after the last timed item; `None` without an anchor.
    pub next_free_slot: Option<TimeOfDay>,
}

impl SchedulePlan {
    /// Iterate only the slots that must be written back.
    pub fn changed(&self) -> impl Iterator<Item = &PlannedSlot> {
        self.slots.iter().filter(|s| s.changed)
    }
}

/// Advance a time of day by `minutes`, wrapping past midnight.
pub fn advance_clock(time: TimeOfDay, minutes: i32) -> TimeOfDay {
    let (next, _wrapped_secs) =
        time.overflowing_add_signed(chrono::Duration::minutes(i64::from(minutes)));
    next
}

/// Reject moves with a negative target index.
pub fn validate_reorder_entries(entries: &[ReorderEntry]) -> Result<(), CoreError> {
    if let Some(bad) = entries.iter().find(|e| e.new_index < 0) {
        return Err(CoreError::Validation(format!(
            "new_index must be >= 0 (item {} requested {})",
            bad.item_id, bad.new_index
        )));
    }
    Ok(())
}

/// Return the ids referenced by `entries` that are not among `known_ids`,
/// deduplicated and in request order.
pub fn find_unknown_items(known_ids: &[DbId], entries: &[ReorderEntry]) -> Vec<DbId> {
    let known: HashSet<DbId> = known_ids.iter().copied().collect();
    let mut seen = HashSet::new();
    entries
        .iter()
        .map(|e| e.item_id)
        .filter(|id| !known.contains(id) && seen.insert(*id))
        .collect()
}

/// Apply the requested moves to `stored` and compute the resulting plan.
///
/// Moves are applied in request order, so a repeated `item_id` is
/// last-write-wins. Items are then ordered by `(requested index, item_id)`
/// and renumbered densely from zero. Any move naming an item outside
/// `stored` aborts the whole operation with [`CoreError::NotFound`].
pub fn reorder_and_plan(
    anchor: Option<TimeOfDay>,
    stored: &[ScheduleSlot],
    entries: &[ReorderEntry],
) -> Result<SchedulePlan, CoreError> {
    validate_reorder_entries(entries)?;

    let known: Vec<DbId> = stored.iter().map(|s| s.item_id).collect();
    if let Some(&missing) = find_unknown_items(&known, entries).first() {
        return Err(CoreError::not_found("ShotlistItem", missing));
    }

    let mut requested: Vec<(i32, ScheduleSlot)> =
        stored.iter().map(|s| (s.order_index, *s)).collect();
    for entry in entries {
        if let Some((index, _)) = requested
            .iter_mut()
            .find(|(_, slot)| slot.item_id == entry.item_id)
        {
            *index = entry.new_index;
        }
    }
    requested.sort_by_key(|(index, slot)| (*index, slot.item_id));

    let ordered: Vec<ScheduleSlot> = requested.into_iter().map(|(_, slot)| slot).collect();
    Ok(plan_schedule(anchor, &ordered))
}

/// Walk `ordered` (already in final order) and assign dense indices and
/// start times.
pub fn plan_schedule(anchor: Option<TimeOfDay>, ordered: &[ScheduleSlot]) -> SchedulePlan {
    let mut clock = anchor;
    let mut slots = Vec::with_capacity(ordered.len());

    for (position, slot) in ordered.iter().enumerate() {
        let order_index = position as i32;
        let mut start_time = slot.start_time;

        if let (Some(now), Some(minutes)) = (clock, timed_duration(slot)) {
            start_time = Some(now);
            clock = Some(advance_clock(now, minutes));
        }

        slots.push(PlannedSlot {
            item_id: slot.item_id,
            order_index,
            start_time,
            changed: order_index != slot.order_index || start_time != slot.start_time,
        });
    }

    SchedulePlan {
        slots,
        next_free_slot: clock,
    }
}

/// Sum of all positive durations, in minutes.
pub fn total_duration_minutes(slots: &[ScheduleSlot]) -> i64 {
    slots
        .iter()
        .filter_map(timed_duration)
        .map(i64::from)
        .sum()
}

fn timed_duration(slot: &ScheduleSlot) -> Option<i32> {
    slot.shot_duration.filter(|m| *m > 0)
}
