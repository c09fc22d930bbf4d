//! Day enumeration and per-day working-hours windows in the home timezone.

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveTime, Utc, Weekday};
use chrono_tz::Tz;

use crate::dst::localize;
use crate::model::WorkHours;

const QUARTER_HOUR_SECS: i64 = 15 * 60;

/// Largest number of days a single query may scan.
pub const MAX_DAYS: u32 = 366;

/// One day's `[start, end)` working window, as UTC instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvailabilityWindow {
    /// The local calendar date this window belongs to.
    pub date: NaiveDate,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// List `count` days starting at `start`, skipping Saturday and Sunday unless
/// `include_weekends` is set.
///
/// The start date counts as the first day when it is eligible: five weekdays
/// from Friday 2026-03-13 are that Friday plus Monday to Thursday of the next
/// week. A weekend start with weekends excluded begins on the following Monday.
pub fn enumerate_days(start: NaiveDate, count: u32, include_weekends: bool) -> Vec<NaiveDate> {
    let mut days = Vec::with_capacity(count.min(MAX_DAYS) as usize);
    let mut current = Some(start);

    while let Some(date) = current {
        if days.len() >= count as usize {
            break;
        }
        if include_weekends || !is_weekend(date) {
            days.push(date);
        }
        current = date.checked_add_days(Days::new(1));
    }

    days
}

/// Round `now` up to the next quarter hour. A time already on a quarter hour
/// is returned unchanged.
///
/// Rounding happens on the UTC timeline; every UTC offset in the tz database
/// today is a multiple of 15 minutes, so the result is also a local quarter
/// hour.
pub fn next_quarter_hour(now: DateTime<Utc>) -> DateTime<Utc> {
    let secs = now.timestamp();
    let rem = secs.rem_euclid(QUARTER_HOUR_SECS);
    if rem == 0 && now.timestamp_subsec_nanos() == 0 {
        return now;
    }
    DateTime::from_timestamp(secs - rem + QUARTER_HOUR_SECS, 0).unwrap_or(now)
}

/// Local midnight at the start of `date` in `tz`, as a UTC instant.
pub fn local_midnight(tz: &Tz, date: NaiveDate) -> DateTime<Utc> {
    localize(tz, date.and_time(NaiveTime::MIN)).with_timezone(&Utc)
}

/// The instant local hour `hour` (0..=24) begins on `date`. Hour 24 is
/// midnight of the following day.
fn local_hour(tz: &Tz, date: NaiveDate, hour: u32) -> DateTime<Utc> {
    match NaiveTime::from_hms_opt(hour, 0, 0) {
        Some(time) => localize(tz, date.and_time(time)).with_timezone(&Utc),
        None => match date.checked_add_days(Days::new(1)) {
            Some(next) => local_midnight(tz, next),
            None => localize(tz, date.and_time(NaiveTime::MIN)).with_timezone(&Utc),
        },
    }
}

/// Compute the working window for `date` in `tz`.
///
/// If `date` is today in `tz`, the window start is moved forward to the next
/// quarter hour at or after `now`. Returns `None` when nothing of the window
/// is left.
pub fn day_window(
    date: NaiveDate,
    hours: WorkHours,
    tz: &Tz,
    now: DateTime<Utc>,
) -> Option<AvailabilityWindow> {
    let mut start = local_hour(tz, date, hours.start);
    let end = local_hour(tz, date, hours.end);

    if now.with_timezone(tz).date_naive() == date {
        start = start.max(next_quarter_hour(now));
    }

    if start >= end {
        return None;
    }

    Some(AvailabilityWindow { date, start, end })
}
