//! Where busy intervals come from.
//!
//! The calculator depends only on [`BusyIntervalSource`]. Two sources ship
//! with the crate:
//!
//! - [`FreeBusyDocument`]: a calendar provider's free/busy query response
//!   (Google Calendar `freebusy.query` shape), e.g. saved by another tool.
//! - [`MemorySource`]: intervals held in memory.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::SourceError;
use crate::model::{BusyInterval, CalendarSource};

/// Lists busy intervals for one calendar.
///
/// Implementations return intervals overlapping `[start, end)`, in UTC or
/// already normalised to UTC. They must be `Sync`: the calculator queries
/// every calendar concurrently.
pub trait BusyIntervalSource: Sync {
    fn busy_intervals(
        &self,
        calendar: &CalendarSource,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<BusyInterval>, SourceError>;
}

/// The outcome of querying one calendar.
#[derive(Debug, Clone)]
pub struct SourceFetch<'a> {
    pub calendar: &'a CalendarSource,
    pub result: Result<Vec<BusyInterval>, SourceError>,
}

/// Query every calendar over `[start, end)`, one request per calendar.
///
/// Requests run concurrently on scoped threads. The returned list is in the
/// same order as `calendars` and is only produced once every request has
/// finished.
pub fn fetch_all<'a, S>(
    source: &S,
    calendars: &'a [CalendarSource],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Vec<SourceFetch<'a>>
where
    S: BusyIntervalSource + ?Sized,
{
    std::thread::scope(|scope| {
        let handles: Vec<_> = calendars
            .iter()
            .map(|calendar| {
                let handle = scope.spawn(move || source.busy_intervals(calendar, start, end));
                (calendar, handle)
            })
            .collect();

        handles
            .into_iter()
            .map(|(calendar, handle)| {
                let result = handle.join().unwrap_or_else(|_| {
                    Err(SourceError::Unavailable("fetch thread panicked".to_string()))
                });
                match &result {
                    Ok(intervals) => tracing::debug!(
                        calendar = %calendar.id,
                        count = intervals.len(),
                        "fetched busy intervals"
                    ),
                    Err(e) => tracing::debug!(calendar = %calendar.id, error = %e, "fetch failed"),
                }
                SourceFetch { calendar, result }
            })
            .collect()
    })
}

// ── Free/busy response document ─────────────────────────────────────────────

/// A time period as reported by the provider. Timestamps may carry `Z` or an
/// explicit offset; both are normalised to UTC on parse.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TimePeriod {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// A per-calendar error entry (e.g. `{"domain": "global", "reason": "notFound"}`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProviderError {
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub reason: String,
}

/// Free/busy data for one calendar inside a [`FreeBusyDocument`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CalendarFreeBusy {
    #[serde(default)]
    pub busy: Vec<TimePeriod>,
    #[serde(default)]
    pub errors: Vec<ProviderError>,
}

/// A free/busy query response covering one or more calendars.
///
/// ```json
/// {
///   "timeMin": "2026-03-16T05:00:00Z",
///   "timeMax": "2026-03-21T05:00:00Z",
///   "calendars": {
///     "primary": {"busy": [{"start": "2026-03-16T15:00:00Z", "end": "2026-03-16T16:00:00Z"}]},
///     "team@example.com": {"errors": [{"domain": "global", "reason": "notFound"}]}
///   }
/// }
/// ```
///
/// When `timeMin`/`timeMax` are present, queries reaching outside them fail:
/// the document says nothing about that time, which is not the same as free.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FreeBusyDocument {
    #[serde(default)]
    pub time_min: Option<DateTime<Utc>>,
    #[serde(default)]
    pub time_max: Option<DateTime<Utc>>,
    #[serde(default)]
    pub calendars: BTreeMap<String, CalendarFreeBusy>,
}

impl FreeBusyDocument {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

impl BusyIntervalSource for FreeBusyDocument {
    fn busy_intervals(
        &self,
        calendar: &CalendarSource,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<BusyInterval>, SourceError> {
        let covered_start = self.time_min.unwrap_or(start);
        let covered_end = self.time_max.unwrap_or(end);
        if start < covered_start || end > covered_end {
            return Err(SourceError::OutOfRange {
                covered_start,
                covered_end,
                start,
                end,
            });
        }

        let entry = self
            .calendars
            .get(&calendar.id)
            .ok_or(SourceError::NotFound)?;

        if !entry.errors.is_empty() {
            let reasons: Vec<String> = entry
                .errors
                .iter()
                .map(|e| format!("{}/{}", e.domain, e.reason))
                .collect();
            return Err(SourceError::Provider(reasons.join(", ")));
        }

        Ok(entry
            .busy
            .iter()
            .filter(|p| p.start < end && p.end > start)
            .map(|p| BusyInterval::new(p.start, p.end, calendar.id.as_str()))
            .collect())
    }
}

// ── In-memory source ────────────────────────────────────────────────────────

/// Busy intervals held in memory, keyed by calendar id.
///
/// Calendars without entries are entirely free. Calendars registered with
/// [`MemorySource::failing`] return their error on every query.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    intervals: HashMap<String, Vec<BusyInterval>>,
    failures: HashMap<String, SourceError>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a busy interval for `calendar_id`.
    pub fn busy(
        mut self,
        calendar_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Self {
        self.push(BusyInterval::new(start, end, calendar_id));
        self
    }

    /// Make every query for `calendar_id` fail with `error`.
    pub fn failing(mut self, calendar_id: &str, error: SourceError) -> Self {
        self.failures.insert(calendar_id.to_string(), error);
        self
    }

    pub fn push(&mut self, interval: BusyInterval) {
        self.intervals
            .entry(interval.calendar_id.clone())
            .or_default()
            .push(interval);
    }
}

impl BusyIntervalSource for MemorySource {
    fn busy_intervals(
        &self,
        calendar: &CalendarSource,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<BusyInterval>, SourceError> {
        if let Some(error) = self.failures.get(&calendar.id) {
            return Err(error.clone());
        }

        Ok(self
            .intervals
            .get(&calendar.id)
            .map(|intervals| {
                intervals
                    .iter()
                    .filter(|b| b.start < end && b.end > start)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}
