//! Error types for availability-engine operations.

use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AvailabilityError {
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid work hours: {0}")]
    InvalidWorkHours(String),

    #[error("Invalid date range: {0}")]
    InvalidRange(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to fetch busy intervals for calendar '{name}' ({id})")]
    Fetch {
        name: String,
        id: String,
        #[source]
        source: SourceError,
    },
}

/// Failure reported by a [`BusyIntervalSource`](crate::source::BusyIntervalSource).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SourceError {
    #[error("calendar not present in free/busy data")]
    NotFound,

    #[error("provider reported errors: {0}")]
    Provider(String),

    #[error(
        "free/busy data covers {covered_start} to {covered_end}, query needs {start} to {end}"
    )]
    OutOfRange {
        covered_start: DateTime<Utc>,
        covered_end: DateTime<Utc>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("{0}")]
    Unavailable(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read configuration file {path}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("malformed configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("configuration lists no calendars")]
    NoCalendars,

    #[error("calendar id '{0}' is listed more than once")]
    DuplicateCalendar(String),
}

pub type Result<T> = std::result::Result<T, AvailabilityError>;
