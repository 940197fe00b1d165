//! Window and guard policy shared by all four frequency generators.
//!
//! Pure, stateless helpers: permissive instant parsing with an
//! invalid-returns-`None` contract, half-open window membership, the
//! defensive iteration cap, and the calendar-date constructors the
//! generators build candidates with.

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime, Utc};

/// Hard upper bound on generator loop iterations per expansion call.
///
/// A well-formed rule/window pair stays far below this; reaching it means a
/// pathological combination (huge interval with a distant `until`, or an
/// implementation bug) and is logged as a warning rather than looping
/// forever.
pub const MAX_EXPANSION_STEPS: u32 = 20_000;

/// Parse an absolute instant, returning `None` for anything unparsable.
///
/// Accepts RFC 3339 (`2025-01-31T09:00:00Z`, offset forms normalized to UTC)
/// and naive `YYYY-MM-DDTHH:MM:SS[.fff]` interpreted as UTC. Never panics.
pub fn parse_instant(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|ndt| ndt.and_utc())
}

/// Half-open window membership: `start <= t < end`.
pub fn in_window(t: DateTime<Utc>, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
    start <= t && t < end
}

/// The Sunday that starts the week containing `t`, as a calendar date.
///
/// Week blocks are Sunday-aligned regardless of locale so that skipping
/// `interval` weeks always lands on a week with the anchor's weekday layout.
pub fn start_of_week_utc(t: DateTime<Utc>) -> NaiveDate {
    let date = t.date_naive();
    date - Days::new(u64::from(date.weekday().num_days_from_sunday()))
}

/// Construct a UTC instant from calendar parts, or `None` when the month has
/// no such day (Feb 31, Apr 31, Feb 29 off leap years). The invalid-date
/// policy for MONTHLY/YEARLY generators hangs off this: no clamping, no
/// rollover into the next month.
pub fn make_utc_instant(
    year: i32,
    month: u32,
    day: u32,
    time: NaiveTime,
) -> Option<DateTime<Utc>> {
    NaiveDate::from_ymd_opt(year, month, day).map(|d| d.and_time(time).and_utc())
}
