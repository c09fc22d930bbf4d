//! Immutable run configuration: home timezone, calendars and working hours.
//!
//! Loaded once from a JSON file and passed explicitly to the calculator.
//!
//! ```json
//! {
//!   "timezone": "America/Chicago",
//!   "calendars": [
//!     {"id": "primary", "account": "personal", "name": "Personal"},
//!     {"id": "team@example.com", "account": "work"}
//!   ],
//!   "work_hours": {"start": 8, "end": 17},
//!   "include_weekends": false
//! }
//! ```

use std::collections::HashSet;
use std::path::Path;

use chrono_tz::Tz;
use serde::Deserialize;

use crate::error::{AvailabilityError, ConfigError, Result};
use crate::model::{CalendarSource, WorkHours};

const DEFAULT_TIMEZONE: &str = "UTC";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default = "default_timezone")]
    timezone: String,
    calendars: Vec<CalendarSource>,
    #[serde(default)]
    work_hours: WorkHours,
    #[serde(default)]
    include_weekends: bool,
}

fn default_timezone() -> String {
    DEFAULT_TIMEZONE.to_string()
}

/// Validated configuration for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// The home timezone: decides "today", day boundaries and display.
    pub timezone: Tz,
    /// Calendars to query, in configuration order.
    pub calendars: Vec<CalendarSource>,
    pub work_hours: WorkHours,
    /// Default for weekend inclusion; the CLI flag can only turn it on.
    pub include_weekends: bool,
}

impl Config {
    /// Build a validated configuration.
    ///
    /// # Errors
    /// - `ConfigError::NoCalendars` if `calendars` is empty.
    /// - `ConfigError::DuplicateCalendar` if two calendars share an id.
    /// - `AvailabilityError::InvalidWorkHours` if the hours are out of range.
    pub fn new(
        timezone: Tz,
        calendars: Vec<CalendarSource>,
        work_hours: WorkHours,
        include_weekends: bool,
    ) -> Result<Self> {
        if calendars.is_empty() {
            return Err(ConfigError::NoCalendars.into());
        }

        let mut seen = HashSet::new();
        for calendar in &calendars {
            if !seen.insert(calendar.id.as_str()) {
                return Err(ConfigError::DuplicateCalendar(calendar.id.clone()).into());
            }
        }

        work_hours.validate()?;

        Ok(Self {
            timezone,
            calendars,
            work_hours,
            include_weekends,
        })
    }

    /// Parse and validate a JSON configuration document.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawConfig = serde_json::from_str(json).map_err(ConfigError::Parse)?;
        let timezone = parse_timezone(&raw.timezone)?;
        Self::new(
            timezone,
            raw.calendars,
            raw.work_hours,
            raw.include_weekends,
        )
    }

    /// Read, parse and validate a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_json(&json)?;
        tracing::debug!(
            path = %path.display(),
            calendars = config.calendars.len(),
            timezone = %config.timezone,
            "configuration loaded"
        );
        Ok(config)
    }
}

/// Parse an IANA timezone name.
///
/// # Errors
/// Returns `AvailabilityError::InvalidTimezone` if the name is unknown.
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse()
        .map_err(|_| AvailabilityError::InvalidTimezone(name.to_string()))
}
