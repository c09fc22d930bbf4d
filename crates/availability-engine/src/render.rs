//! Render an [`AvailabilityReport`] for a human (text) or a program (JSON).

use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;

use crate::availability::AvailabilityReport;

/// Render the report as plain text.
///
/// ```text
/// Checking availability across 2 calendar(s)
/// Work hours: 8:00 AM - 5:00 PM (America/Chicago)
///
/// === Monday, March 16, 2026 ===
///   8:00 AM - 9:00 AM (1h)
///   10:30 AM - 5:00 PM (6h 30m)
///
/// ```
pub fn render_text(report: &AvailabilityReport) -> String {
    let mut out = String::new();

    if !report.is_complete() {
        out.push_str("WARNING: INCOMPLETE availability. These calendars could not be read:\n");
        for missing in &report.missing_sources {
            out.push_str(&format!(
                "  - {} ({}): {}\n",
                missing.name, missing.calendar_id, missing.error
            ));
        }
        out.push_str("Free slots below ignore those calendars.\n\n");
    }

    out.push_str(&format!(
        "Checking availability across {} calendar(s)\n",
        report.calendars.len()
    ));
    out.push_str(&format!(
        "Work hours: {} - {} ({})\n",
        format_hour(report.work_hours.start),
        format_hour(report.work_hours.end),
        report.timezone
    ));
    out.push('\n');

    for day in &report.days {
        out.push_str(&format!("=== {} ===\n", format_day(day.date)));
        if day.free.is_empty() {
            out.push_str("  No availability\n");
        } else {
            for slot in &day.free {
                out.push_str(&format!(
                    "  {} - {} ({})\n",
                    format_time(&slot.start),
                    format_time(&slot.end),
                    format_duration(slot.duration_minutes)
                ));
            }
        }
        out.push('\n');
    }

    out
}

/// Render the report as pretty-printed JSON.
pub fn render_json(report: &AvailabilityReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

/// `9:05 AM`, `12:30 PM`.
pub fn format_time(dt: &DateTime<Tz>) -> String {
    dt.format("%-I:%M %p").to_string()
}

/// `Monday, March 16, 2026`.
pub fn format_day(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}

/// A whole working hour on the 12-hour clock. 0 and 24 are both midnight.
pub fn format_hour(hour: u32) -> String {
    let hour = hour % 24;
    let meridiem = if hour < 12 { "AM" } else { "PM" };
    let display = match hour % 12 {
        0 => 12,
        h => h,
    };
    format!("{display}:00 {meridiem}")
}

/// `45m`, `2h`, `1h 30m`.
pub fn format_duration(minutes: i64) -> String {
    if minutes < 60 {
        return format!("{minutes}m");
    }
    let hours = minutes / 60;
    let remaining = minutes % 60;
    if remaining == 0 {
        format!("{hours}h")
    } else {
        format!("{hours}h {remaining}m")
    }
}
