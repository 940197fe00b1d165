//! Recurrence rule model -- the persisted shape of "repeats every N days/weeks/months/years".
//!
//! Rules travel as strict camelCase JSON, the same form the product stores on
//! each calendar-event series record, e.g.
//! `{"frequency":"WEEKLY","interval":2,"byWeekday":["MO","WE"],"end":{"type":"count","count":10}}`.
//! [`parse_rule`] validates a persisted string back into a [`RecurrenceRule`];
//! a rule that fails validation is treated by callers as "this series does not
//! recur", never as a crash.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{CadenceError, Result};

/// Largest accepted repetition interval, in units of the rule's frequency.
pub const MAX_INTERVAL: u32 = 365;

/// Largest accepted `count` termination value.
pub const MAX_COUNT: u32 = 1000;

/// Day of week as stored in rules, using the RFC 5545 two-letter
/// abbreviations. Ordering is Sunday-first so that the `Ord` derive matches
/// the 0-6 ordinal used by week arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Weekday {
    #[serde(rename = "SU")]
    Sunday,
    #[serde(rename = "MO")]
    Monday,
    #[serde(rename = "TU")]
    Tuesday,
    #[serde(rename = "WE")]
    Wednesday,
    #[serde(rename = "TH")]
    Thursday,
    #[serde(rename = "FR")]
    Friday,
    #[serde(rename = "SA")]
    Saturday,
}

impl Weekday {
    /// Sunday=0 .. Saturday=6, matching [`chrono::Weekday::num_days_from_sunday`].
    pub fn days_from_sunday(self) -> u32 {
        match self {
            Weekday::Sunday => 0,
            Weekday::Monday => 1,
            Weekday::Tuesday => 2,
            Weekday::Wednesday => 3,
            Weekday::Thursday => 4,
            Weekday::Friday => 5,
            Weekday::Saturday => 6,
        }
    }

    /// Inverse of [`Weekday::days_from_sunday`].
    pub fn from_days_from_sunday(n: u32) -> Option<Weekday> {
        match n {
            0 => Some(Weekday::Sunday),
            1 => Some(Weekday::Monday),
            2 => Some(Weekday::Tuesday),
            3 => Some(Weekday::Wednesday),
            4 => Some(Weekday::Thursday),
            5 => Some(Weekday::Friday),
            6 => Some(Weekday::Saturday),
            _ => None,
        }
    }
}

/// How often a series repeats. Selects which generator runs during expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

/// When a series stops producing occurrences.
///
/// The `until` instant is kept as the raw persisted string: it is resolved at
/// expansion time, and an unparsable value degrades to [`RecurrenceEnd::Never`]
/// rather than invalidating the whole rule.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RecurrenceEnd {
    /// Unbounded; expansion is limited only by the query window.
    #[default]
    Never,
    /// Inclusive upper bound on occurrence start instants.
    Until { until: String },
    /// Caps the total number of occurrences counted from the series anchor,
    /// independent of any query window.
    Count { count: u32 },
}

/// A validated recurrence rule.
///
/// `by_weekday` is a set, so entries are unique and ascending (Sunday-first)
/// by construction; duplicate entries in persisted JSON collapse on
/// deserialization. `by_month_day` pins the day-of-month for MONTHLY/YEARLY;
/// months lacking that day simply produce no occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RecurrenceRule {
    pub frequency: Frequency,
    #[serde(default = "default_interval")]
    pub interval: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub by_weekday: Option<BTreeSet<Weekday>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub by_month_day: Option<u32>,
    #[serde(default)]
    pub end: RecurrenceEnd,
}

fn default_interval() -> u32 {
    1
}

impl RecurrenceRule {
    /// Check the bounds invariants that the JSON shape alone cannot express.
    ///
    /// # Errors
    /// Returns [`CadenceError::InvalidRule`] naming the first violated
    /// constraint.
    pub fn validate(&self) -> Result<()> {
        if self.interval < 1 || self.interval > MAX_INTERVAL {
            return Err(CadenceError::InvalidRule(format!(
                "interval must be within 1..={}, got {}",
                MAX_INTERVAL, self.interval
            )));
        }
        if let Some(days) = &self.by_weekday {
            if days.is_empty() {
                return Err(CadenceError::InvalidRule(
                    "byWeekday must not be empty when present".to_string(),
                ));
            }
        }
        if let Some(day) = self.by_month_day {
            if !(1..=31).contains(&day) {
                return Err(CadenceError::InvalidRule(format!(
                    "byMonthDay must be within 1..=31, got {day}"
                )));
            }
        }
        match &self.end {
            RecurrenceEnd::Never => {}
            RecurrenceEnd::Until { until } => {
                if until.is_empty() {
                    return Err(CadenceError::InvalidRule(
                        "until must not be empty".to_string(),
                    ));
                }
            }
            RecurrenceEnd::Count { count } => {
                if !(1..=MAX_COUNT).contains(count) {
                    return Err(CadenceError::InvalidRule(format!(
                        "count must be within 1..={}, got {}",
                        MAX_COUNT, count
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Parse a persisted rule string into a validated [`RecurrenceRule`].
///
/// # Errors
/// Returns [`CadenceError::JsonParse`] for malformed JSON and
/// [`CadenceError::InvalidRule`] for bounds/shape violations. Callers treat
/// either as the series being non-recurring.
pub fn parse_rule(raw: &str) -> Result<RecurrenceRule> {
    let rule: RecurrenceRule = serde_json::from_str(raw)?;
    rule.validate()?;
    Ok(rule)
}

/// Serialize a rule to its canonical persisted form.
///
/// Round-trips through [`parse_rule`] with semantic equality: key order and
/// weekday order are deterministic, defaults are written out explicitly.
///
/// # Errors
/// Returns [`CadenceError::JsonParse`] if encoding fails (practically
/// unreachable for this type).
pub fn serialize_rule(rule: &RecurrenceRule) -> Result<String> {
    Ok(serde_json::to_string(rule)?)
}
