//! Occurrence expansion -- turns a series anchor and a recurrence rule into
//! the concrete start instants that intersect a query window.
//!
//! The entry point is [`expand_occurrences`]. It is a total, deterministic,
//! pure function: malformed instants or an inverted window return an empty
//! list, and every call owns only its local cursor and output. Each frequency
//! has its own generator, but all four share the same acceptance logic:
//! a candidate first advances the series ordinal (for `count` termination,
//! which is windowing-independent) and is only then tested against the
//! caller's half-open window.

use chrono::{DateTime, Datelike, Days, Duration, NaiveTime, SecondsFormat, Utc};

use crate::rule::{Frequency, RecurrenceEnd, RecurrenceRule};
use crate::window::{
    in_window, make_utc_instant, parse_instant, start_of_week_utc, MAX_EXPANSION_STEPS,
};

/// Expand a recurring series into the occurrence start instants falling
/// inside `[range_start_at, range_end_at)`.
///
/// Instants arrive as strings in their persisted form (see
/// [`crate::window::parse_instant`] for accepted shapes). The result is
/// ascending, deduplicated, and every entry carries the anchor's time of day.
///
/// Unparsable instants or `range_end_at <= range_start_at` yield an empty
/// vec; no input makes this function panic or error.
pub fn expand_occurrences(
    series_start_at: &str,
    rule: &RecurrenceRule,
    range_start_at: &str,
    range_end_at: &str,
) -> Vec<DateTime<Utc>> {
    let (Some(series_start), Some(range_start), Some(range_end)) = (
        parse_instant(series_start_at),
        parse_instant(range_start_at),
        parse_instant(range_end_at),
    ) else {
        return Vec::new();
    };
    if range_end <= range_start {
        return Vec::new();
    }
    Expansion::new(rule, series_start, range_start, range_end).run()
}

/// Render an occurrence the way the product's JS layer expects it:
/// RFC 3339 UTC with millisecond precision, e.g. `2025-01-31T09:00:00.000Z`.
pub fn format_occurrence(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Per-call expansion state: the resolved bounds plus the series ordinal,
/// the step budget, and the output being built.
struct Expansion<'r> {
    rule: &'r RecurrenceRule,
    series_start: DateTime<Utc>,
    range_start: DateTime<Utc>,
    range_end: DateTime<Utc>,
    /// Anchor's time of day, stamped onto every candidate.
    time_of_day: NaiveTime,
    /// Resolved `until` bound; `None` means unbounded. An unparsable
    /// persisted `until` string also lands here -- the permissive fallback.
    until: Option<DateTime<Utc>>,
    /// `count` termination bound; `None` means unbounded.
    max_count: Option<u32>,
    /// Series ordinal: occurrences produced so far counting from the anchor,
    /// whether or not they fell inside the window.
    produced: u32,
    steps: u32,
    out: Vec<DateTime<Utc>>,
}

impl<'r> Expansion<'r> {
    fn new(
        rule: &'r RecurrenceRule,
        series_start: DateTime<Utc>,
        range_start: DateTime<Utc>,
        range_end: DateTime<Utc>,
    ) -> Expansion<'r> {
        let until = match &rule.end {
            RecurrenceEnd::Until { until } => parse_instant(until),
            _ => None,
        };
        let max_count = match rule.end {
            RecurrenceEnd::Count { count } => Some(count),
            _ => None,
        };
        Expansion {
            rule,
            series_start,
            range_start,
            range_end,
            time_of_day: series_start.time(),
            until,
            max_count,
            produced: 0,
            steps: 0,
            out: Vec::new(),
        }
    }

    fn run(mut self) -> Vec<DateTime<Utc>> {
        match self.rule.frequency {
            Frequency::Daily => self.daily(),
            Frequency::Weekly => self.weekly(),
            Frequency::Monthly => self.monthly(),
            Frequency::Yearly => self.yearly(),
        }
        if self.steps >= MAX_EXPANSION_STEPS {
            log::warn!(
                "recurrence expansion hit the {}-step cap \
                 (frequency {:?}, interval {}, anchor {}); output truncated",
                MAX_EXPANSION_STEPS,
                self.rule.frequency,
                self.rule.interval,
                self.series_start,
            );
        }
        self.out
    }

    /// Consume one unit of the loop budget. `false` means the cap is hit and
    /// the generator must stop.
    fn step(&mut self) -> bool {
        if self.steps >= MAX_EXPANSION_STEPS {
            return false;
        }
        self.steps += 1;
        true
    }

    fn past_until(&self, t: DateTime<Utc>) -> bool {
        self.until.is_some_and(|u| t > u)
    }

    fn count_exhausted(&self) -> bool {
        self.max_count.is_some_and(|m| self.produced >= m)
    }

    /// With a `count` end, the ordinal must be counted from the anchor, so
    /// the cursor may not skip ahead.
    fn counts_from_anchor(&self) -> bool {
        matches!(self.rule.end, RecurrenceEnd::Count { .. })
    }

    /// Two-stage acceptance. A candidate at or after the anchor and within
    /// `until` advances the series ordinal; it reaches the output only if the
    /// ordinal is within `count` and the instant is inside the window.
    fn push_if_in_range(&mut self, t: DateTime<Utc>) {
        if t < self.series_start || self.past_until(t) {
            return;
        }
        self.produced += 1;
        if self.max_count.is_some_and(|m| self.produced > m) {
            return;
        }
        if in_window(t, self.range_start, self.range_end) {
            self.out.push(t);
        }
    }

    fn daily(&mut self) {
        let interval = i64::from(self.rule.interval.max(1));
        let mut cursor = self.series_start;

        // Jump whole interval-aligned periods when the window starts late.
        if !self.counts_from_anchor() && self.range_start > self.series_start {
            let diff_days = (self.range_start - self.series_start).num_days();
            let jump = diff_days / interval * interval;
            cursor = cursor + Duration::days(jump);
        }

        while self.step() {
            if self.past_until(cursor) || self.count_exhausted() || cursor >= self.range_end {
                break;
            }
            self.push_if_in_range(cursor);
            cursor = cursor + Duration::days(interval);
        }
    }

    fn weekly(&mut self) {
        let interval = i64::from(self.rule.interval.max(1));
        // BTreeSet iteration is ascending, which is also the required
        // emit order within a week block.
        let weekdays: Vec<u64> = match &self.rule.by_weekday {
            Some(days) if !days.is_empty() => {
                days.iter().map(|d| u64::from(d.days_from_sunday())).collect()
            }
            _ => vec![u64::from(
                self.series_start.weekday().num_days_from_sunday(),
            )],
        };

        let base_week = start_of_week_utc(self.series_start);
        let mut week = base_week;

        if !self.counts_from_anchor() && self.range_start > self.series_start {
            let diff_weeks = (start_of_week_utc(self.range_start) - base_week).num_days() / 7;
            let jump = diff_weeks / interval * interval;
            if jump > 0 {
                week = base_week + Days::new(jump as u64 * 7);
            }
        }

        while self.step() {
            let week_start = week.and_time(NaiveTime::MIN).and_utc();
            if self.past_until(week_start) || self.count_exhausted() {
                break;
            }
            if week_start >= self.range_end && week_start > self.series_start {
                break;
            }

            for &wd in &weekdays {
                let candidate = (week + Days::new(wd)).and_time(self.time_of_day).and_utc();
                if self.past_until(candidate) || self.count_exhausted() {
                    break;
                }
                if candidate >= self.range_end {
                    continue;
                }
                self.push_if_in_range(candidate);
            }

            week = week + Days::new(interval as u64 * 7);
        }
    }

    fn monthly(&mut self) {
        let interval = i64::from(self.rule.interval.max(1));
        let target_day = self.rule.by_month_day.unwrap_or_else(|| self.series_start.day());
        let mut year = self.series_start.year();
        let mut month = self.series_start.month();

        if !self.counts_from_anchor() && self.range_start > self.series_start {
            let diff_months = i64::from(self.range_start.year() - year) * 12
                + i64::from(self.range_start.month())
                - i64::from(month);
            if diff_months > 0 {
                let jump = diff_months / interval * interval;
                (year, month) = add_months(year, month, jump);
            }
        }

        while self.step() {
            // A month without the target day contributes nothing; the cursor
            // still advances.
            if let Some(candidate) = make_utc_instant(year, month, target_day, self.time_of_day) {
                if self.past_until(candidate) || self.count_exhausted() {
                    break;
                }
                if candidate >= self.range_end && candidate > self.series_start {
                    break;
                }
                self.push_if_in_range(candidate);
            }
            (year, month) = add_months(year, month, interval);
        }
    }

    fn yearly(&mut self) {
        let interval = self.rule.interval.max(1) as i32;
        let target_month = self.series_start.month();
        let target_day = self.rule.by_month_day.unwrap_or_else(|| self.series_start.day());
        let mut year = self.series_start.year();

        if !self.counts_from_anchor() && self.range_start > self.series_start {
            let diff_years = self.range_start.year() - year;
            if diff_years > 0 {
                year += diff_years / interval * interval;
            }
        }

        while self.step() {
            // Feb 29 anchors skip non-leap years entirely.
            if let Some(candidate) =
                make_utc_instant(year, target_month, target_day, self.time_of_day)
            {
                if self.past_until(candidate) || self.count_exhausted() {
                    break;
                }
                if candidate >= self.range_end && candidate > self.series_start {
                    break;
                }
                self.push_if_in_range(candidate);
            }
            year += interval;
        }
    }
}

/// Advance a (year, month) cursor by a signed number of months, month in 1-12.
fn add_months(year: i32, month: u32, months: i64) -> (i32, u32) {
    let zero_based = i64::from(year) * 12 + i64::from(month) - 1 + months;
    (
        zero_based.div_euclid(12) as i32,
        (zero_based.rem_euclid(12) + 1) as u32,
    )
}
