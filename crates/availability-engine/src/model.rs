//! Core data model: calendars, busy intervals and the working-hours policy.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AvailabilityError, Result};

/// One calendar to query, as listed in the configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CalendarSource {
    /// Provider-side calendar identifier (e.g., "primary", "team@example.com").
    pub id: String,
    /// Opaque reference to the account that owns the calendar. Passed through
    /// to the provider untouched.
    pub account: String,
    /// Human-readable name used in reports and error messages.
    /// Falls back to `id` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl CalendarSource {
    pub fn new(id: impl Into<String>, account: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            account: account.into(),
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// The name to show a human: the configured name, or the id.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

/// A half-open `[start, end)` period during which a calendar is busy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusyInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Id of the [`CalendarSource`] that reported this interval.
    pub calendar_id: String,
}

impl BusyInterval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>, calendar_id: impl Into<String>) -> Self {
        Self {
            start,
            end,
            calendar_id: calendar_id.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// Working hours as whole local hours, `[start, end)`.
///
/// `end == 24` is allowed and means local midnight at the end of the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorkHours {
    pub start: u32,
    pub end: u32,
}

impl Default for WorkHours {
    fn default() -> Self {
        Self { start: 8, end: 17 }
    }
}

impl WorkHours {
    /// Build a validated policy.
    ///
    /// # Errors
    /// Returns `AvailabilityError::InvalidWorkHours` unless `start < end <= 24`.
    pub fn new(start: u32, end: u32) -> Result<Self> {
        let hours = Self { start, end };
        hours.validate()?;
        Ok(hours)
    }

    pub fn validate(&self) -> Result<()> {
        if self.end > 24 {
            return Err(AvailabilityError::InvalidWorkHours(format!(
                "end hour {} is past 24",
                self.end
            )));
        }
        if self.start >= self.end {
            return Err(AvailabilityError::InvalidWorkHours(format!(
                "start hour {} must be before end hour {}",
                self.start, self.end
            )));
        }
        Ok(())
    }
}
