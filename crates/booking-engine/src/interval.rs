//! Start/end ordering for a single-day interval.

use crate::time::TimeOfDay;

/// Whether `end` is strictly after `start` on the same day.
///
/// Both times are read as wall-clock values on one shared day, so a range that
/// crosses midnight (`23:00` to `00:30`) is inconsistent, as is a zero-length
/// range. Overnight bookings are not supported.
pub fn is_interval_consistent(start: TimeOfDay, end: TimeOfDay) -> bool {
    start < end
}
