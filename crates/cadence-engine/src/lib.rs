//! # cadence-engine
//!
//! Deterministic recurrence-rule expansion for the Cadence calendar.
//!
//! A calendar-event series stores one anchor instant and one serialized
//! recurrence rule; everything else is computed. This crate turns
//! `(anchor, rule, window)` into the concrete occurrence start instants
//! intersecting the window -- a pure, total function suitable for calling
//! from any number of threads or from the WASM boundary on every render.
//!
//! ```rust
//! use cadence_engine::{expand_occurrences, parse_rule};
//!
//! let rule = parse_rule(r#"{"frequency":"DAILY","interval":1,"end":{"type":"never"}}"#).unwrap();
//! let starts = expand_occurrences(
//!     "2025-01-01T09:00:00.000Z",
//!     &rule,
//!     "2025-01-01T00:00:00.000Z",
//!     "2025-01-04T00:00:00.000Z",
//! );
//! assert_eq!(starts.len(), 3);
//! ```
//!
//! ## Modules
//!
//! - [`rule`] — recurrence rule model, validation, (de)serialization
//! - [`expander`] — the four frequency generators behind [`expand_occurrences`]
//! - [`window`] — shared window membership / instant parsing / loop-cap policy
//! - [`error`] — error types

pub mod error;
pub mod expander;
pub mod rule;
pub mod window;

pub use error::CadenceError;
pub use expander::{expand_occurrences, format_occurrence};
pub use rule::{
    parse_rule, serialize_rule, Frequency, RecurrenceEnd, RecurrenceRule, Weekday,
};
