//! Value types for reservation times and dates.
//!
//! Times arrive from pickers as `HH:MM` (or `HH:MM:SS`) strings and dates as
//! `YYYY-MM-DD`. They are parsed once at the boundary into the types below; the
//! checks in the rest of the crate only ever see well-formed values.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::{BookingError, Result};

/// A wall-clock time with minute precision and no timezone.
///
/// Seconds are accepted on input but dropped: `"09:15:42"` parses to the same
/// value as `"09:15"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay(NaiveTime);

impl TimeOfDay {
    /// Build a time from hour and minute, or `None` if out of range.
    pub fn from_hm_opt(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(TimeOfDay)
    }

    /// Truncate a `NaiveTime` to minute precision.
    pub fn from_naive(time: NaiveTime) -> Self {
        // from_hms_opt cannot fail for components taken from a valid NaiveTime.
        TimeOfDay(NaiveTime::from_hms_opt(time.hour(), time.minute(), 0).unwrap_or(time))
    }

    pub fn as_naive(&self) -> NaiveTime {
        self.0
    }

    /// Minutes elapsed since midnight.
    pub fn minutes_since_midnight(&self) -> i64 {
        i64::from(self.0.hour() * 60 + self.0.minute())
    }
}

impl FromStr for TimeOfDay {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self> {
        let format = match s.split(':').count() {
            2 => "%H:%M",
            3 => "%H:%M:%S",
            _ => return Err(BookingError::InvalidTime(s.to_string())),
        };
        NaiveTime::parse_from_str(s, format)
            .map(TimeOfDay::from_naive)
            .map_err(|_| BookingError::InvalidTime(s.to_string()))
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = BookingError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(value: TimeOfDay) -> Self {
        value.to_string()
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

/// A civil date (year, month, day) with no timezone attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    /// Build a date from its components, or `None` if it does not exist.
    pub fn from_ymd_opt(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(CalendarDate)
    }

    pub fn from_naive(date: NaiveDate) -> Self {
        CalendarDate(date)
    }

    pub fn as_naive(&self) -> NaiveDate {
        self.0
    }
}

impl FromStr for CalendarDate {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self> {
        if s.split('-').count() != 3 {
            return Err(BookingError::InvalidDate(s.to_string()));
        }
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(CalendarDate)
            .map_err(|_| BookingError::InvalidDate(s.to_string()))
    }
}

impl TryFrom<String> for CalendarDate {
    type Error = BookingError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<CalendarDate> for String {
    fn from(value: CalendarDate) -> Self {
        value.to_string()
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// A time range already taken by a pending or approved reservation.
///
/// Callers supply these pre-filtered to one room and one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupiedInterval {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

impl OccupiedInterval {
    pub fn new(start: TimeOfDay, end: TimeOfDay) -> Self {
        Self { start, end }
    }

    /// Parse an interval from two `HH:MM[:SS]` strings.
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Ok(Self {
            start: start.parse()?,
            end: end.parse()?,
        })
    }
}

/// Renders as `"HH:MM - HH:MM"`.
impl fmt::Display for OccupiedInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.start, self.end)
    }
}

/// The temporal extent of a proposed booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationRequest {
    pub date: CalendarDate,
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

impl ReservationRequest {
    pub fn new(date: CalendarDate, start: TimeOfDay, end: TimeOfDay) -> Self {
        Self { date, start, end }
    }

    /// Parse a request from `YYYY-MM-DD` and two `HH:MM[:SS]` strings.
    pub fn parse(date: &str, start: &str, end: &str) -> Result<Self> {
        Ok(Self {
            date: date.parse()?,
            start: start.parse()?,
            end: end.parse()?,
        })
    }
}
