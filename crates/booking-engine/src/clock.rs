//! Injectable clock and the past-date check.
//!
//! "Today" is always derived from an explicit instant projected into the
//! institution's timezone, never cached, so the same inputs give the same
//! answer regardless of where or when the process runs.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::time::CalendarDate;

/// Timezone used when no other is configured.
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::America::Santiago;

/// Source of the current instant.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time from the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// The civil date of `instant` in `timezone`.
pub fn local_today(instant: DateTime<Utc>, timezone: Tz) -> CalendarDate {
    CalendarDate::from_naive(instant.with_timezone(&timezone).date_naive())
}

/// Whether `date` is today or later, with "today" taken from `reference_now`
/// in `timezone`.
///
/// The candidate date is already a civil date and is compared as-is; only the
/// reference instant is shifted into the timezone.
pub fn is_date_valid(date: CalendarDate, reference_now: DateTime<Utc>, timezone: Tz) -> bool {
    date >= local_today(reference_now, timezone)
}
