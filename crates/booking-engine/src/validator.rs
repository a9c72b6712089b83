//! Ordered reservation validation.
//!
//! Checks run in a fixed priority and stop at the first failure:
//!
//! 1. the date is not in the past ([`ReasonKind::PastDate`])
//! 2. the end time is after the start time ([`ReasonKind::InconsistentInterval`])
//! 3. the interval overlaps nothing already occupied ([`ReasonKind::ScheduleConflict`])
//!
//! A user fixing one problem at a time therefore always sees the most
//! fundamental one first.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::clock::{self, Clock, SystemClock};
use crate::config::ValidatorConfig;
use crate::conflict::find_conflict;
use crate::error::Result;
use crate::interval::is_interval_consistent;
use crate::time::{CalendarDate, OccupiedInterval, ReservationRequest, TimeOfDay};

const PAST_DATE_MESSAGE: &str = "cannot create reservations on past dates";
const INCONSISTENT_INTERVAL_MESSAGE: &str = "end time must be after start time";
const GENERIC_CONFLICT_MESSAGE: &str = "the requested time overlaps an existing reservation";

/// Why a reservation was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReasonKind {
    PastDate,
    InconsistentInterval,
    ScheduleConflict,
}

/// Details of a failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rejection {
    pub reason_kind: ReasonKind,
    /// Human-readable reason, suitable for a form error.
    pub message: String,
    /// The occupied range that collided. Only set for `ScheduleConflict`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conflicting_range: Option<String>,
}

/// Result of validating one reservation.
///
/// Serialises as `{"valid": true}` or
/// `{"valid": false, "reasonKind": ..., "message": ..., "conflictingRange": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationVerdict {
    pub valid: bool,
    #[serde(flatten)]
    pub rejection: Option<Rejection>,
}

impl ValidationVerdict {
    pub fn accepted() -> Self {
        Self {
            valid: true,
            rejection: None,
        }
    }

    pub fn rejected(reason_kind: ReasonKind, message: impl Into<String>) -> Self {
        Self {
            valid: false,
            rejection: Some(Rejection {
                reason_kind,
                message: message.into(),
                conflicting_range: None,
            }),
        }
    }

    fn conflict(message: String, conflicting_range: Option<String>) -> Self {
        Self {
            valid: false,
            rejection: Some(Rejection {
                reason_kind: ReasonKind::ScheduleConflict,
                message,
                conflicting_range,
            }),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn reason_kind(&self) -> Option<ReasonKind> {
        self.rejection.as_ref().map(|r| r.reason_kind)
    }

    pub fn message(&self) -> Option<&str> {
        self.rejection.as_ref().map(|r| r.message.as_str())
    }

    pub fn conflicting_range(&self) -> Option<&str> {
        self.rejection
            .as_ref()
            .and_then(|r| r.conflicting_range.as_deref())
    }
}

/// Validate a proposed reservation against the occupied intervals of its room
/// and date.
///
/// `occupied` must already be scoped to the same room and date and exclude
/// cancelled or rejected bookings. `reference_now` is projected into
/// `timezone` to decide what "today" is.
pub fn validate_reservation(
    date: CalendarDate,
    start: TimeOfDay,
    end: TimeOfDay,
    occupied: &[OccupiedInterval],
    reference_now: DateTime<Utc>,
    timezone: Tz,
) -> ValidationVerdict {
    let verdict = evaluate(date, start, end, occupied, reference_now, timezone);
    debug!(
        %date,
        %start,
        %end,
        occupied = occupied.len(),
        valid = verdict.valid,
        reason = ?verdict.reason_kind(),
        "reservation validated"
    );
    verdict
}

fn evaluate(
    date: CalendarDate,
    start: TimeOfDay,
    end: TimeOfDay,
    occupied: &[OccupiedInterval],
    reference_now: DateTime<Utc>,
    timezone: Tz,
) -> ValidationVerdict {
    if !clock::is_date_valid(date, reference_now, timezone) {
        return ValidationVerdict::rejected(ReasonKind::PastDate, PAST_DATE_MESSAGE);
    }

    if !is_interval_consistent(start, end) {
        return ValidationVerdict::rejected(
            ReasonKind::InconsistentInterval,
            INCONSISTENT_INTERVAL_MESSAGE,
        );
    }

    let report = find_conflict(start, end, occupied);
    if report.conflict {
        let message = match &report.conflicting_range {
            Some(range) => format!("{start}-{end} overlaps an existing reservation ({range})"),
            None => GENERIC_CONFLICT_MESSAGE.to_string(),
        };
        return ValidationVerdict::conflict(message, report.conflicting_range);
    }

    ValidationVerdict::accepted()
}

/// Validation bound to a timezone and a clock.
///
/// Production code uses the default [`SystemClock`]; tests inject a
/// [`FixedClock`](crate::FixedClock).
#[derive(Debug, Clone)]
pub struct Validator<C: Clock = SystemClock> {
    timezone: Tz,
    clock: C,
}

impl Validator<SystemClock> {
    pub fn new(timezone: Tz) -> Self {
        Self {
            timezone,
            clock: SystemClock,
        }
    }

    /// Build a wall-clock validator from configuration.
    ///
    /// # Errors
    /// Returns `BookingError::InvalidTimezone` if the configured timezone is
    /// not a valid IANA identifier.
    pub fn from_config(config: &ValidatorConfig) -> Result<Self> {
        Ok(Self::new(config.timezone()?))
    }
}

impl Default for Validator<SystemClock> {
    fn default() -> Self {
        Self::new(clock::DEFAULT_TIMEZONE)
    }
}

impl<C: Clock> Validator<C> {
    pub fn with_clock(timezone: Tz, clock: C) -> Self {
        Self { timezone, clock }
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Whether `date` is today or later according to this validator's clock.
    pub fn is_date_valid(&self, date: CalendarDate) -> bool {
        clock::is_date_valid(date, self.clock.now(), self.timezone)
    }

    /// Validate `request` against the occupied intervals of its room and date.
    pub fn validate(
        &self,
        request: &ReservationRequest,
        occupied: &[OccupiedInterval],
    ) -> ValidationVerdict {
        validate_reservation(
            request.date,
            request.start,
            request.end,
            occupied,
            self.clock.now(),
            self.timezone,
        )
    }
}
