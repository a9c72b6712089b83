//! Weekly class schedules expanded into concrete reservations.
//!
//! A class meets on fixed weekdays at a fixed time for the length of an
//! academic period. The schedule is turned into an RFC 5545 weekly rule and
//! expanded with the `rrule` crate; holidays are removed as EXDATEs. Every
//! generated reservation is then validated like a hand-made one.

use std::collections::{BTreeMap, HashMap};

use chrono::Weekday;
use rrule::RRuleSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::clock::Clock;
use crate::error::{BookingError, Result};
use crate::interval::is_interval_consistent;
use crate::time::{CalendarDate, OccupiedInterval, ReservationRequest, TimeOfDay};
use crate::validator::{ValidationVerdict, Validator};

/// A class meeting every week on `weekdays` from `start` to `end`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassSchedule {
    pub weekdays: Vec<Weekday>,
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

/// The date range a schedule applies to, both ends inclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcademicPeriod {
    pub start: CalendarDate,
    pub end: CalendarDate,
    /// Dates with no classes (holidays, recess).
    #[serde(default)]
    pub exclusions: Vec<CalendarDate>,
}

/// Storage-layer query for the occupied intervals of one room on one date.
///
/// Implementations return only non-cancelled, non-rejected bookings.
pub trait OccupancySource {
    fn occupied_on(&self, date: CalendarDate) -> Vec<OccupiedInterval>;
}

impl OccupancySource for BTreeMap<CalendarDate, Vec<OccupiedInterval>> {
    fn occupied_on(&self, date: CalendarDate) -> Vec<OccupiedInterval> {
        self.get(&date).cloned().unwrap_or_default()
    }
}

impl OccupancySource for HashMap<CalendarDate, Vec<OccupiedInterval>> {
    fn occupied_on(&self, date: CalendarDate) -> Vec<OccupiedInterval> {
        self.get(&date).cloned().unwrap_or_default()
    }
}

/// One generated reservation and its verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesEntry {
    pub request: ReservationRequest,
    pub verdict: ValidationVerdict,
}

fn byday(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "MO",
        Weekday::Tue => "TU",
        Weekday::Wed => "WE",
        Weekday::Thu => "TH",
        Weekday::Fri => "FR",
        Weekday::Sat => "SA",
        Weekday::Sun => "SU",
    }
}

/// Expand `schedule` over `period` into one reservation per meeting, in
/// chronological order.
///
/// Civil dates carry no timezone, so the rule is anchored in UTC where no DST
/// transition can move a meeting onto another day.
///
/// # Errors
/// Returns `BookingError::InvalidSchedule` if the schedule has no weekdays or
/// its end is not after its start, `BookingError::InvalidPeriod` if the period
/// ends before it starts, and `BookingError::Expansion` if the generated rule
/// is rejected by the `rrule` crate.
pub fn expand_schedule(
    schedule: &ClassSchedule,
    period: &AcademicPeriod,
    max_occurrences: u16,
) -> Result<Vec<ReservationRequest>> {
    if schedule.weekdays.is_empty() {
        return Err(BookingError::InvalidSchedule("no weekdays".to_string()));
    }
    if !is_interval_consistent(schedule.start, schedule.end) {
        return Err(BookingError::InvalidSchedule(format!(
            "end {} is not after start {}",
            schedule.end, schedule.start
        )));
    }
    if period.end < period.start {
        return Err(BookingError::InvalidPeriod(format!(
            "ends {} before it starts {}",
            period.end, period.start
        )));
    }
    if max_occurrences == 0 {
        return Ok(Vec::new());
    }

    let mut weekdays = schedule.weekdays.clone();
    weekdays.sort_by_key(|d| d.num_days_from_monday());
    weekdays.dedup();
    let byday_list: Vec<&str> = weekdays.iter().map(|d| byday(*d)).collect();

    // iCalendar local form, e.g. "20240304T080000".
    let ical_start = |date: CalendarDate| {
        format!(
            "{}T{}",
            date.as_naive().format("%Y%m%d"),
            schedule.start.as_naive().format("%H%M%S")
        )
    };

    let mut rrule_text = format!(
        "DTSTART;TZID=UTC:{}\nRRULE:FREQ=WEEKLY;BYDAY={};UNTIL={}T235959Z",
        ical_start(period.start),
        byday_list.join(","),
        period.end.as_naive().format("%Y%m%d"),
    );

    if !period.exclusions.is_empty() {
        let exdates: Vec<String> = period.exclusions.iter().map(|d| ical_start(*d)).collect();
        rrule_text.push_str(&format!("\nEXDATE;TZID=UTC:{}", exdates.join(",")));
    }

    let rrule_set: RRuleSet = rrule_text
        .parse()
        .map_err(|e| BookingError::Expansion(format!("{}", e)))?;

    // `.all(limit)` caps instances before EXDATE filtering, so leave room for
    // the excluded ones and truncate afterwards.
    let buffer = u16::try_from(period.exclusions.len()).unwrap_or(u16::MAX);
    let instances = rrule_set.all(max_occurrences.saturating_add(buffer));

    let mut requests: Vec<ReservationRequest> = instances
        .dates
        .into_iter()
        .map(|dt| {
            ReservationRequest::new(
                CalendarDate::from_naive(dt.date_naive()),
                schedule.start,
                schedule.end,
            )
        })
        .collect();

    if instances.limited || requests.len() > usize::from(max_occurrences) {
        warn!(
            max_occurrences,
            period_start = %period.start,
            period_end = %period.end,
            "schedule expansion truncated"
        );
    }
    requests.truncate(usize::from(max_occurrences));

    debug!(count = requests.len(), "schedule expanded");
    Ok(requests)
}

impl<C: Clock> Validator<C> {
    /// Validate a series of reservations, each against the occupancy of its
    /// own date.
    ///
    /// Reservations accepted earlier in the series count as occupied for later
    /// ones on the same date, so a series never double-books itself.
    pub fn validate_series(
        &self,
        requests: &[ReservationRequest],
        occupancy: &impl OccupancySource,
    ) -> Vec<SeriesEntry> {
        let mut accepted: BTreeMap<CalendarDate, Vec<OccupiedInterval>> = BTreeMap::new();

        requests
            .iter()
            .map(|request| {
                let mut occupied = occupancy.occupied_on(request.date);
                if let Some(own) = accepted.get(&request.date) {
                    occupied.extend_from_slice(own);
                }

                let verdict = self.validate(request, &occupied);
                if verdict.is_valid() {
                    accepted
                        .entry(request.date)
                        .or_default()
                        .push(OccupiedInterval::new(request.start, request.end));
                }

                SeriesEntry {
                    request: *request,
                    verdict,
                }
            })
            .collect()
    }
}
