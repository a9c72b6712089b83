//! Validator configuration.
//!
//! Every field has a default, so an empty JSON object (or no config file at
//! all) yields the institution's standard settings.

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::clock::DEFAULT_TIMEZONE;
use crate::error::{BookingError, Result};
use crate::time::TimeOfDay;

/// Upper bound on reservations generated from one class schedule.
pub const DEFAULT_MAX_OCCURRENCES: u16 = 500;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidatorConfig {
    /// IANA timezone that decides what "today" is.
    pub timezone: String,
    /// Earliest bookable time in a room.
    pub opening: TimeOfDay,
    /// Latest bookable time in a room.
    pub closing: TimeOfDay,
    /// Cap on reservations expanded from a recurring schedule.
    pub max_occurrences: u16,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            timezone: DEFAULT_TIMEZONE.name().to_string(),
            opening: TimeOfDay::from_hm_opt(8, 0).expect("08:00 is a valid time of day"),
            closing: TimeOfDay::from_hm_opt(22, 0).expect("22:00 is a valid time of day"),
            max_occurrences: DEFAULT_MAX_OCCURRENCES,
        }
    }
}

impl ValidatorConfig {
    /// Parse a configuration from JSON, filling missing fields with defaults.
    ///
    /// # Errors
    /// Returns `BookingError::Config` for malformed JSON or unknown fields, and
    /// `BookingError::InvalidTimezone` for an unknown timezone.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| BookingError::Config(e.to_string()))?;
        config.timezone()?;
        Ok(config)
    }

    /// Resolve the configured timezone name.
    pub fn timezone(&self) -> Result<Tz> {
        self.timezone
            .parse()
            .map_err(|_| BookingError::InvalidTimezone(self.timezone.clone()))
    }
}
