//! Free time slots in a room between its occupied intervals.
//!
//! Sorts the occupied intervals, merges overlapping ones, then returns the gaps
//! between them inside the room's opening hours.

use serde::{Deserialize, Serialize};

use crate::time::{OccupiedInterval, TimeOfDay};

/// A bookable gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FreeSlot {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
    pub duration_minutes: i64,
}

impl FreeSlot {
    fn between(start: TimeOfDay, end: TimeOfDay) -> Self {
        Self {
            start,
            end,
            duration_minutes: end.minutes_since_midnight() - start.minutes_since_midnight(),
        }
    }
}

/// Merge overlapping or adjacent intervals, clipped to `[opening, closing)`.
///
/// Returns a sorted, non-overlapping list of (start, end) pairs.
fn merge_occupied(
    occupied: &[OccupiedInterval],
    opening: TimeOfDay,
    closing: TimeOfDay,
) -> Vec<(TimeOfDay, TimeOfDay)> {
    let mut intervals: Vec<(TimeOfDay, TimeOfDay)> = occupied
        .iter()
        .filter(|o| o.start < o.end && o.start < closing && o.end > opening)
        .map(|o| (o.start.max(opening), o.end.min(closing)))
        .collect();

    intervals.sort_unstable();

    let mut merged: Vec<(TimeOfDay, TimeOfDay)> = Vec::with_capacity(intervals.len());
    for (start, end) in intervals {
        if let Some(last) = merged.last_mut() {
            if start <= last.1 {
                last.1 = last.1.max(end);
                continue;
            }
        }
        merged.push((start, end));
    }

    merged
}

/// Free slots between `opening` and `closing`, sorted by start time.
///
/// Occupied intervals may overlap and arrive in any order. Returns nothing if
/// `closing` is not after `opening`.
pub fn find_free_slots(
    occupied: &[OccupiedInterval],
    opening: TimeOfDay,
    closing: TimeOfDay,
) -> Vec<FreeSlot> {
    if opening >= closing {
        return Vec::new();
    }

    let mut slots = Vec::new();
    let mut cursor = opening;

    for (busy_start, busy_end) in merge_occupied(occupied, opening, closing) {
        if cursor < busy_start {
            slots.push(FreeSlot::between(cursor, busy_start));
        }
        cursor = cursor.max(busy_end);
    }

    if cursor < closing {
        slots.push(FreeSlot::between(cursor, closing));
    }

    slots
}

/// The first free slot of at least `min_duration_minutes`.
pub fn find_first_free_slot(
    occupied: &[OccupiedInterval],
    opening: TimeOfDay,
    closing: TimeOfDay,
    min_duration_minutes: i64,
) -> Option<FreeSlot> {
    find_free_slots(occupied, opening, closing)
        .into_iter()
        .find(|slot| slot.duration_minutes >= min_duration_minutes)
}
