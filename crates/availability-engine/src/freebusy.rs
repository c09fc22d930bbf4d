//! Merge busy intervals and compute free slots within a window.
//!
//! Busy intervals from every calendar are merged once for the whole scanned
//! range. Each day's window is then cut against the merged list: the clipped
//! busy blocks and the gaps between them partition the window exactly.

use chrono::{DateTime, Utc};

use crate::model::BusyInterval;

/// A merged busy period. Produced sorted and non-overlapping by
/// [`merge_busy_intervals`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Interval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

/// A free time slot.
#[derive(Debug, Clone, PartialEq)]
pub struct FreeSlot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub duration_minutes: i64,
}

impl FreeSlot {
    fn between(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start,
            end,
            duration_minutes: (end - start).num_minutes(),
        }
    }
}

/// Merge busy intervals from any number of calendars.
///
/// Intervals that overlap or touch (`a.end == b.start`) are coalesced. Empty
/// intervals (`end <= start`) are discarded. Returns a sorted, non-overlapping
/// list.
pub fn merge_busy_intervals(intervals: &[BusyInterval]) -> Vec<Interval> {
    let mut sorted: Vec<Interval> = intervals
        .iter()
        .filter(|b| !b.is_empty())
        .map(|b| Interval::new(b.start, b.end))
        .collect();

    // Sort by start time (then by end time for stability).
    sorted.sort_by_key(|i| (i.start, i.end));

    let mut merged: Vec<Interval> = Vec::with_capacity(sorted.len());
    for interval in sorted {
        if let Some(last) = merged.last_mut() {
            if interval.start <= last.end {
                // Overlapping or adjacent, extend the current interval.
                last.end = last.end.max(interval.end);
                continue;
            }
        }
        merged.push(interval);
    }

    merged
}

/// Clip merged busy intervals to `[window_start, window_end)`, discarding
/// intervals entirely outside the window.
pub fn clip_to_window(
    merged: &[Interval],
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
) -> Vec<Interval> {
    merged
        .iter()
        .filter(|i| i.start < window_end && i.end > window_start)
        .map(|i| Interval::new(i.start.max(window_start), i.end.min(window_end)))
        .collect()
}

/// Find free time slots within `[window_start, window_end)`.
///
/// `merged` must be sorted by start time, as returned by
/// [`merge_busy_intervals`]. Returns free slots sorted by start time; a window
/// covered end to end yields an empty list.
pub fn find_free_slots(
    merged: &[Interval],
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
) -> Vec<FreeSlot> {
    if window_start >= window_end {
        return Vec::new();
    }

    let mut free_slots = Vec::new();
    let mut cursor = window_start;

    for busy in clip_to_window(merged, window_start, window_end) {
        if cursor < busy.start {
            free_slots.push(FreeSlot::between(cursor, busy.start));
        }
        cursor = cursor.max(busy.end);
    }

    // Trailing free slot after the last busy period.
    if cursor < window_end {
        free_slots.push(FreeSlot::between(cursor, window_end));
    }

    free_slots
}
