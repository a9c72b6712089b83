//! Detect overlaps between a proposed interval and already-occupied ones.
//!
//! Touching intervals (one ends exactly when the other starts) are NOT
//! conflicts; they are back-to-back bookings.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::interval::is_interval_consistent;
use crate::time::{OccupiedInterval, TimeOfDay};

/// Outcome of a conflict search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictReport {
    pub conflict: bool,
    /// `"HH:MM - HH:MM"` of the first occupied interval that overlaps, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conflicting_range: Option<String>,
}

impl ConflictReport {
    fn clear() -> Self {
        Self {
            conflict: false,
            conflicting_range: None,
        }
    }
}

/// Whether `[start, end)` collides with `other`.
///
/// Three explicit clauses: `start` falls in `[other.start, other.end)`, `end`
/// falls in `(other.start, other.end]`, or the proposal covers `other`
/// entirely. For well-formed intervals this equals the half-open test
/// `start < other.end && end > other.start`. Only the containment clause can
/// match an empty or inverted occupied entry; the half-open test never does.
pub(crate) fn overlaps(start: TimeOfDay, end: TimeOfDay, other: &OccupiedInterval) -> bool {
    let starts_inside = start >= other.start && start < other.end;
    let ends_inside = end > other.start && end <= other.end;
    let contains = start <= other.start && end >= other.end;
    starts_inside || ends_inside || contains
}

/// Find the first occupied interval overlapping `[start, end)`.
///
/// An inconsistent proposal (`end <= start`) is reported as a conflict with no
/// range. Otherwise `occupied` is scanned in the order given and the first
/// overlapping interval is reported; the list need not be sorted.
///
/// A zero-length entry (`10:00:00`-`10:00:45` truncates to `10:00 - 10:00`) or
/// an inverted one conflicts with any proposal starting at or before its start
/// and ending at or after its end.
pub fn find_conflict(start: TimeOfDay, end: TimeOfDay, occupied: &[OccupiedInterval]) -> ConflictReport {
    if !is_interval_consistent(start, end) {
        return ConflictReport {
            conflict: true,
            conflicting_range: None,
        };
    }

    match occupied.iter().find(|o| overlaps(start, end, o)) {
        Some(hit) => {
            trace!(%start, %end, occupied = %hit, "overlap found");
            ConflictReport {
                conflict: true,
                conflicting_range: Some(hit.to_string()),
            }
        }
        None => ConflictReport::clear(),
    }
}
