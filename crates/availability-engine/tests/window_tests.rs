//! Tests for day enumeration, quarter-hour clipping and per-day windows,
//! including DST transitions in the home timezone.

use availability_engine::dst::localize;
use availability_engine::window::{
    day_window, enumerate_days, is_weekend, local_midnight, next_quarter_hour,
};
use availability_engine::WorkHours;
use chrono::{DateTime, NaiveDate, TimeZone, Utc, Weekday, Datelike};
use chrono_tz::America::Chicago;
use chrono_tz::Asia::Kathmandu;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
}

// ── enumerate_days ──────────────────────────────────────────────────────────

#[test]
fn five_weekdays_from_a_friday_skip_the_weekend() {
    // 2026-03-13 is a Friday.
    let days = enumerate_days(date(2026, 3, 13), 5, false);

    assert_eq!(
        days,
        vec![
            date(2026, 3, 13),
            date(2026, 3, 16),
            date(2026, 3, 17),
            date(2026, 3, 18),
            date(2026, 3, 19),
        ]
    );
    assert!(days.iter().all(|d| !is_weekend(*d)));
}

#[test]
fn weekends_included_when_requested() {
    let days = enumerate_days(date(2026, 3, 13), 3, true);

    assert_eq!(
        days,
        vec![date(2026, 3, 13), date(2026, 3, 14), date(2026, 3, 15)]
    );
}

#[test]
fn starting_on_a_saturday_begins_on_monday() {
    let days = enumerate_days(date(2026, 3, 14), 1, false);

    assert_eq!(days, vec![date(2026, 3, 16)]);
    assert_eq!(days[0].weekday(), Weekday::Mon);
}

#[test]
fn large_count_still_lists_every_day() {
    let days = enumerate_days(date(2026, 1, 1), 1000, true);

    assert_eq!(days.len(), 1000);
    assert_eq!(days[999], date(2028, 9, 26));
}

#[test]
fn zero_days_is_empty() {
    assert!(enumerate_days(date(2026, 3, 16), 0, false).is_empty());
}

#[test]
fn days_cross_month_and_year_boundaries() {
    let days = enumerate_days(date(2026, 12, 30), 4, true);

    assert_eq!(
        days,
        vec![
            date(2026, 12, 30),
            date(2026, 12, 31),
            date(2027, 1, 1),
            date(2027, 1, 2),
        ]
    );
}

// ── next_quarter_hour ───────────────────────────────────────────────────────

#[test]
fn rounds_up_to_the_next_quarter_hour() {
    assert_eq!(
        next_quarter_hour(utc(2026, 3, 16, 14, 7, 0)),
        utc(2026, 3, 16, 14, 15, 0)
    );
    assert_eq!(
        next_quarter_hour(utc(2026, 3, 16, 14, 15, 1)),
        utc(2026, 3, 16, 14, 30, 0)
    );
    assert_eq!(
        next_quarter_hour(utc(2026, 3, 16, 14, 59, 30)),
        utc(2026, 3, 16, 15, 0, 0)
    );
    assert_eq!(
        next_quarter_hour(utc(2026, 3, 16, 23, 50, 0)),
        utc(2026, 3, 17, 0, 0, 0)
    );
}

#[test]
fn exact_quarter_hour_is_kept() {
    let now = utc(2026, 3, 16, 14, 15, 0);
    assert_eq!(next_quarter_hour(now), now);
}

#[test]
fn sub_second_past_a_quarter_hour_rounds_up() {
    let now = utc(2026, 3, 16, 14, 15, 0) + chrono::Duration::milliseconds(1);
    assert_eq!(next_quarter_hour(now), utc(2026, 3, 16, 14, 30, 0));
}

// ── day_window ──────────────────────────────────────────────────────────────

#[test]
fn future_day_window_is_the_full_working_hours() {
    // 2026-03-16 in Chicago is CDT (UTC-5).
    let now = utc(2026, 3, 10, 12, 0, 0);
    let window = day_window(date(2026, 3, 16), WorkHours::default(), &Chicago, now).unwrap();

    assert_eq!(window.date, date(2026, 3, 16));
    assert_eq!(window.start, utc(2026, 3, 16, 13, 0, 0));
    assert_eq!(window.end, utc(2026, 3, 16, 22, 0, 0));
}

#[test]
fn today_window_starts_at_the_next_quarter_hour() {
    // 09:07 CDT
    let now = utc(2026, 3, 16, 14, 7, 0);
    let window = day_window(date(2026, 3, 16), WorkHours::default(), &Chicago, now).unwrap();

    // 09:15 CDT
    assert_eq!(window.start, utc(2026, 3, 16, 14, 15, 0));
    assert_eq!(window.end, utc(2026, 3, 16, 22, 0, 0));
}

#[test]
fn today_before_work_starts_keeps_the_full_window() {
    // 06:40 CDT
    let now = utc(2026, 3, 16, 11, 40, 0);
    let window = day_window(date(2026, 3, 16), WorkHours::default(), &Chicago, now).unwrap();

    assert_eq!(window.start, utc(2026, 3, 16, 13, 0, 0));
}

#[test]
fn today_after_work_has_no_window() {
    // 16:50 CDT rounds to 17:00, the end of the day.
    let now = utc(2026, 3, 16, 21, 50, 0);
    assert!(day_window(date(2026, 3, 16), WorkHours::default(), &Chicago, now).is_none());

    // 19:00 CDT
    let now = utc(2026, 3, 17, 0, 0, 0);
    assert!(day_window(date(2026, 3, 16), WorkHours::default(), &Chicago, now).is_none());
}

#[test]
fn today_is_decided_in_the_home_timezone() {
    // 2026-03-17 02:00 UTC is still 2026-03-16 21:00 in Chicago, so the 17th
    // is not today and keeps its full window.
    let now = utc(2026, 3, 17, 2, 0, 0);
    let window = day_window(date(2026, 3, 17), WorkHours::default(), &Chicago, now).unwrap();

    assert_eq!(window.start, utc(2026, 3, 17, 13, 0, 0));
}

#[test]
fn window_follows_dst_offset_change() {
    let now = utc(2026, 1, 1, 0, 0, 0);
    // Friday 2026-03-06 is CST (UTC-6); Monday 2026-03-09 is CDT (UTC-5).
    let before = day_window(date(2026, 3, 6), WorkHours::default(), &Chicago, now).unwrap();
    let after = day_window(date(2026, 3, 9), WorkHours::default(), &Chicago, now).unwrap();

    assert_eq!(before.start, utc(2026, 3, 6, 14, 0, 0));
    assert_eq!(after.start, utc(2026, 3, 9, 13, 0, 0));
}

#[test]
fn work_hours_ending_at_24_run_to_local_midnight() {
    let now = utc(2026, 1, 1, 0, 0, 0);
    let hours = WorkHours::new(20, 24).unwrap();
    let window = day_window(date(2026, 3, 16), hours, &Chicago, now).unwrap();

    assert_eq!(window.start, utc(2026, 3, 17, 1, 0, 0));
    assert_eq!(window.end, utc(2026, 3, 17, 5, 0, 0));
}

#[test]
fn work_start_in_a_dst_gap_shifts_forward() {
    // 2026-03-08 02:00 does not exist in Chicago; clocks jump to 03:00 CDT.
    let now = utc(2026, 1, 1, 0, 0, 0);
    let hours = WorkHours::new(2, 5).unwrap();
    let window = day_window(date(2026, 3, 8), hours, &Chicago, now).unwrap();

    assert_eq!(window.start, utc(2026, 3, 8, 8, 0, 0));
    assert_eq!(window.end, utc(2026, 3, 8, 10, 0, 0));
}

#[test]
fn quarter_hour_clipping_holds_in_offset_45_zones() {
    // Kathmandu is UTC+05:45; 09:07 local is 03:22 UTC.
    let now = utc(2026, 3, 16, 3, 22, 0);
    let window = day_window(date(2026, 3, 16), WorkHours::default(), &Kathmandu, now).unwrap();

    let local = window.start.with_timezone(&Kathmandu);
    assert_eq!(local.format("%H:%M").to_string(), "09:15");
}

// ── local_midnight / localize ───────────────────────────────────────────────

#[test]
fn local_midnight_is_expressed_in_utc() {
    assert_eq!(
        local_midnight(&Chicago, date(2026, 3, 16)),
        utc(2026, 3, 16, 5, 0, 0)
    );
    assert_eq!(
        local_midnight(&Chicago, date(2026, 1, 22)),
        utc(2026, 1, 22, 6, 0, 0)
    );
}

#[test]
fn ambiguous_local_time_resolves_to_the_earliest_instant() {
    // 2026-11-01 01:30 happens twice in Chicago: first as CDT (06:30 UTC).
    let local = date(2026, 11, 1).and_hms_opt(1, 30, 0).unwrap();
    assert_eq!(
        localize(&Chicago, local).with_timezone(&Utc),
        utc(2026, 11, 1, 6, 30, 0)
    );
}

#[test]
fn nonexistent_local_time_shifts_past_the_gap() {
    let local = date(2026, 3, 8).and_hms_opt(2, 30, 0).unwrap();
    assert_eq!(
        localize(&Chicago, local).with_timezone(&Utc),
        utc(2026, 3, 8, 8, 0, 0)
    );
}
