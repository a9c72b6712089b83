//! Error types for booking-engine operations.
//!
//! Rejected reservations are not errors; they come back as a
//! [`ValidationVerdict`](crate::ValidationVerdict). These variants cover
//! malformed input and configuration only.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BookingError {
    #[error("Invalid time of day: {0}")]
    InvalidTime(String),

    #[error("Invalid calendar date: {0}")]
    InvalidDate(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid class schedule: {0}")]
    InvalidSchedule(String),

    #[error("Invalid academic period: {0}")]
    InvalidPeriod(String),

    #[error("Expansion error: {0}")]
    Expansion(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, BookingError>;
