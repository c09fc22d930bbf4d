//! # availability-engine
//!
//! Deterministic free-slot computation across several calendars.
//!
//! Busy intervals from every configured calendar are fetched in one batch,
//! merged into a single timeline, and subtracted from each day's working
//! hours in the home timezone. The current time is always an explicit input,
//! so results are reproducible.
//!
//! ## Modules
//!
//! - [`model`]: Calendars, busy intervals, working hours
//! - [`config`]: Immutable run configuration loaded from JSON
//! - [`dst`]: Local wall-clock resolution across DST transitions
//! - [`window`]: Day enumeration and per-day working windows
//! - [`freebusy`]: Merge busy intervals and compute free slots
//! - [`source`]: The busy-interval source abstraction and its implementations
//! - [`availability`]: The multi-calendar calculator
//! - [`render`]: Text and JSON output
//! - [`error`]: Error types

pub mod availability;
pub mod config;
pub mod dst;
pub mod error;
pub mod freebusy;
pub mod model;
pub mod render;
pub mod source;
pub mod window;

pub use availability::{
    compute_availability, AvailabilityReport, AvailabilityRequest, DayAvailability,
    FailurePolicy, SourceFailure, TimeSpan,
};
pub use config::Config;
pub use error::{AvailabilityError, ConfigError, SourceError};
pub use freebusy::{find_free_slots, merge_busy_intervals, FreeSlot, Interval};
pub use model::{BusyInterval, CalendarSource, WorkHours};
pub use source::{BusyIntervalSource, FreeBusyDocument, MemorySource};
pub use window::MAX_DAYS;
