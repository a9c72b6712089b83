//! # booking-engine
//!
//! Validation core for room reservations.
//!
//! Decides whether a proposed reservation (date, start, end) is legal given the
//! intervals already occupied in the same room on the same date, the current
//! date in the institution's timezone, and basic time-ordering rules. Every
//! check is a pure function of its inputs; "now" is injected through a
//! [`Clock`] so results are deterministic under test.
//!
//! ## Modules
//!
//! - [`time`] — `TimeOfDay`, `CalendarDate`, `OccupiedInterval`, `ReservationRequest`
//! - [`interval`] — start/end ordering check
//! - [`clock`] — injectable clock and the past-date check
//! - [`conflict`] — overlap detection against occupied intervals
//! - [`validator`] — ordered validation returning a `ValidationVerdict`
//! - [`schedule`] — weekly class schedules expanded into reservations
//! - [`freebusy`] — free slots between occupied intervals
//! - [`config`] — validator configuration
//! - [`error`] — Error types
//!
//! ## Known limitation
//!
//! The engine validates a snapshot of occupied intervals and takes no locks.
//! Two requests validated against the same snapshot can both pass; the
//! storage layer must re-check atomically (unique constraint or re-query in
//! the committing transaction) before persisting a reservation.

pub mod clock;
pub mod config;
pub mod conflict;
pub mod error;
pub mod freebusy;
pub mod interval;
pub mod schedule;
pub mod time;
pub mod validator;

pub use clock::{is_date_valid, Clock, FixedClock, SystemClock, DEFAULT_TIMEZONE};
pub use config::ValidatorConfig;
pub use conflict::{find_conflict, ConflictReport};
pub use error::BookingError;
pub use freebusy::{find_first_free_slot, find_free_slots, FreeSlot};
pub use interval::is_interval_consistent;
pub use schedule::{expand_schedule, AcademicPeriod, ClassSchedule, OccupancySource, SeriesEntry};
pub use time::{CalendarDate, OccupiedInterval, ReservationRequest, TimeOfDay};
pub use validator::{validate_reservation, ReasonKind, Rejection, ValidationVerdict, Validator};
