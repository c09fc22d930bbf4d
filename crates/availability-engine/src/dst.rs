//! Resolve local wall-clock times around DST transitions.

use chrono::{DateTime, Duration, LocalResult, NaiveDateTime, TimeZone};
use chrono_tz::Tz;

/// Longest gap we will step across. Real-world gaps are one or two hours.
const MAX_GAP_STEPS: i64 = 4 * 24;

/// Interpret `local` as wall-clock time in `tz`.
///
/// - Ambiguous times (fall back) resolve to the earliest instant.
/// - Nonexistent times (spring forward) shift forward to the first valid
///   quarter hour after the gap, i.e. the moment the clocks jumped to.
pub fn localize(tz: &Tz, local: NaiveDateTime) -> DateTime<Tz> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => {
            for step in 1..=MAX_GAP_STEPS {
                let probe = local + Duration::minutes(15 * step);
                if let Some(dt) = tz.from_local_datetime(&probe).earliest() {
                    return dt;
                }
            }
            // No zone has a gap this long; read the wall time as UTC.
            tz.from_utc_datetime(&local)
        }
    }
}
