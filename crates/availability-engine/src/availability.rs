//! Multi-calendar availability over a range of days.
//!
//! Fetches busy intervals for every configured calendar in one batch covering
//! the whole scanned range, merges them into a single busy timeline, then cuts
//! each day's working window against that timeline. Everything in the report
//! is expressed in the configured home timezone.

use chrono::{DateTime, Days, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::config::Config;
use crate::error::{AvailabilityError, Result};
use crate::freebusy::{self, Interval};
use crate::model::{CalendarSource, WorkHours};
use crate::source::{fetch_all, BusyIntervalSource};
use crate::window::{self, AvailabilityWindow, MAX_DAYS};

/// What to do when a calendar cannot be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Abort the whole computation with the first failing calendar.
    #[default]
    FailFast,
    /// Carry on without the failing calendars and flag the report incomplete.
    MarkIncomplete,
}

/// Parameters of one availability query.
#[derive(Debug, Clone, PartialEq)]
pub struct AvailabilityRequest {
    /// First candidate day.
    pub start_date: NaiveDate,
    /// Number of days to produce.
    pub days: u32,
    pub include_weekends: bool,
    pub failure_policy: FailurePolicy,
    /// Hide free slots shorter than this. Busy blocks are unaffected.
    pub min_duration_minutes: Option<i64>,
}

impl AvailabilityRequest {
    pub fn new(start_date: NaiveDate, days: u32) -> Self {
        Self {
            start_date,
            days,
            include_weekends: false,
            failure_policy: FailurePolicy::default(),
            min_duration_minutes: None,
        }
    }
}

/// A `[start, end)` span in the home timezone.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSpan {
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
    pub duration_minutes: i64,
}

impl TimeSpan {
    fn in_zone(start: DateTime<Utc>, end: DateTime<Utc>, tz: &Tz) -> Self {
        Self {
            start: start.with_timezone(tz),
            end: end.with_timezone(tz),
            duration_minutes: (end - start).num_minutes(),
        }
    }
}

/// Availability for one day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayAvailability {
    pub date: NaiveDate,
    /// The working window, or `None` when nothing of it is left (today, after
    /// working hours).
    pub window: Option<TimeSpan>,
    /// Merged busy blocks clipped to the window.
    pub busy: Vec<TimeSpan>,
    /// Free slots within the window, in chronological order.
    pub free: Vec<TimeSpan>,
}

/// A calendar that could not be read under [`FailurePolicy::MarkIncomplete`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceFailure {
    pub calendar_id: String,
    pub name: String,
    pub error: String,
}

/// The result of one availability query.
///
/// Serializes with an extra `complete` field derived from `missing_sources`.
#[derive(Debug, Clone, PartialEq)]
pub struct AvailabilityReport {
    /// IANA name of the home timezone.
    pub timezone: String,
    pub work_hours: WorkHours,
    pub calendars: Vec<CalendarSource>,
    /// Calendars left out of the result. Empty for a complete report.
    pub missing_sources: Vec<SourceFailure>,
    pub days: Vec<DayAvailability>,
}

impl AvailabilityReport {
    pub fn is_complete(&self) -> bool {
        self.missing_sources.is_empty()
    }
}

impl Serialize for AvailabilityReport {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("AvailabilityReport", 6)?;
        state.serialize_field("timezone", &self.timezone)?;
        state.serialize_field("work_hours", &self.work_hours)?;
        state.serialize_field("calendars", &self.calendars)?;
        state.serialize_field("complete", &self.is_complete())?;
        state.serialize_field("missing_sources", &self.missing_sources)?;
        state.serialize_field("days", &self.days)?;
        state.end()
    }
}

/// Compute free slots across every configured calendar.
///
/// `now` anchors "today": the day containing `now` in the home timezone has
/// its window start moved to the next quarter hour at or after `now`.
///
/// # Errors
/// - `AvailabilityError::InvalidRange` if `request.days` is zero or above
///   [`MAX_DAYS`], or the range runs off the end of the calendar.
/// - `AvailabilityError::Fetch` naming the first failing calendar, under
///   [`FailurePolicy::FailFast`].
pub fn compute_availability<S>(
    config: &Config,
    request: &AvailabilityRequest,
    source: &S,
    now: DateTime<Utc>,
) -> Result<AvailabilityReport>
where
    S: BusyIntervalSource + ?Sized,
{
    if request.days == 0 {
        return Err(AvailabilityError::InvalidRange(
            "at least one day must be scanned".to_string(),
        ));
    }
    if request.days > MAX_DAYS {
        return Err(AvailabilityError::InvalidRange(format!(
            "{} days requested, at most {MAX_DAYS} can be scanned",
            request.days
        )));
    }

    let tz = config.timezone;
    let dates =
        window::enumerate_days(request.start_date, request.days, request.include_weekends);
    let (range_start, range_end) = scan_range(&tz, &dates)?;

    tracing::debug!(
        from = %range_start,
        to = %range_end,
        days = dates.len(),
        calendars = config.calendars.len(),
        "querying busy intervals"
    );

    let mut busy = Vec::new();
    let mut missing_sources = Vec::new();

    for fetch in fetch_all(source, &config.calendars, range_start, range_end) {
        match fetch.result {
            Ok(intervals) => {
                for interval in intervals {
                    if interval.is_empty() {
                        tracing::warn!(
                            calendar = %fetch.calendar.id,
                            start = %interval.start,
                            end = %interval.end,
                            "discarding busy interval that ends before it starts"
                        );
                        continue;
                    }
                    busy.push(interval);
                }
            }
            Err(error) => match request.failure_policy {
                FailurePolicy::FailFast => {
                    return Err(AvailabilityError::Fetch {
                        name: fetch.calendar.display_name().to_string(),
                        id: fetch.calendar.id.clone(),
                        source: error,
                    });
                }
                FailurePolicy::MarkIncomplete => {
                    tracing::warn!(
                        calendar = %fetch.calendar.id,
                        error = %error,
                        "calendar unavailable, report will be incomplete"
                    );
                    missing_sources.push(SourceFailure {
                        calendar_id: fetch.calendar.id.clone(),
                        name: fetch.calendar.display_name().to_string(),
                        error: error.to_string(),
                    });
                }
            },
        }
    }

    let merged = freebusy::merge_busy_intervals(&busy);

    let days: Vec<DayAvailability> = dates
        .into_iter()
        .map(|date| {
            let window = window::day_window(date, config.work_hours, &tz, now);
            day_availability(date, window, &merged, &tz, request.min_duration_minutes)
        })
        .collect();

    tracing::info!(
        days = days.len(),
        busy_blocks = merged.len(),
        free_slots = days.iter().map(|d| d.free.len()).sum::<usize>(),
        complete = missing_sources.is_empty(),
        "availability computed"
    );

    Ok(AvailabilityReport {
        timezone: tz.name().to_string(),
        work_hours: config.work_hours,
        calendars: config.calendars.clone(),
        missing_sources,
        days,
    })
}

/// Local midnight before the first day to local midnight after the last.
fn scan_range(tz: &Tz, dates: &[NaiveDate]) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    let (first, last) = match (dates.first(), dates.last()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => {
            return Err(AvailabilityError::InvalidRange(
                "no days left to scan".to_string(),
            ))
        }
    };
    let after_last = last.checked_add_days(Days::new(1)).ok_or_else(|| {
        AvailabilityError::InvalidRange(format!("{last} is the last representable date"))
    })?;

    Ok((
        window::local_midnight(tz, first),
        window::local_midnight(tz, after_last),
    ))
}

fn day_availability(
    date: NaiveDate,
    window: Option<AvailabilityWindow>,
    merged: &[Interval],
    tz: &Tz,
    min_duration_minutes: Option<i64>,
) -> DayAvailability {
    let Some(window) = window else {
        tracing::debug!(%date, "no working window left");
        return DayAvailability {
            date,
            window: None,
            busy: Vec::new(),
            free: Vec::new(),
        };
    };

    let busy = freebusy::clip_to_window(merged, window.start, window.end)
        .into_iter()
        .map(|b| TimeSpan::in_zone(b.start, b.end, tz))
        .collect();

    let free = freebusy::find_free_slots(merged, window.start, window.end)
        .into_iter()
        .filter(|slot| min_duration_minutes.is_none_or(|min| slot.duration_minutes >= min))
        .map(|slot| TimeSpan::in_zone(slot.start, slot.end, tz))
        .collect();

    DayAvailability {
        date,
        window: Some(TimeSpan::in_zone(window.start, window.end, tz)),
        busy,
        free,
    }
}
