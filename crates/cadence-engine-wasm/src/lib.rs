//! WASM bindings for cadence-engine.
//!
//! Exposes recurrence-rule parsing and occurrence expansion to the
//! JavaScript app via `wasm-bindgen`. Rules cross the boundary in their
//! persisted JSON form; occurrence lists come back as JSON arrays of
//! RFC 3339 UTC strings with millisecond precision, the exact shape the
//! calendar client already renders.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p cadence-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target nodejs --out-dir packages/cadence-engine-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/cadence_engine_wasm.wasm
//! ```

use cadence_engine::{expand_occurrences as expand, format_occurrence, parse_rule, serialize_rule};
use wasm_bindgen::prelude::*;

/// Expand a recurring series into occurrence start instants within
/// `[rangeStartAt, rangeEndAt)`.
///
/// Returns a JSON array of RFC 3339 UTC strings, ascending. Malformed
/// instants or an inverted window produce `"[]"`, matching the engine's
/// total-function contract; only a malformed `ruleJson` is an error (the
/// caller then treats the series as non-recurring).
///
/// # Arguments
/// - `series_start_at` -- ISO 8601 anchor instant (e.g., "2025-01-06T09:00:00.000Z")
/// - `rule_json` -- persisted rule JSON (e.g., `{"frequency":"WEEKLY",...}`)
/// - `range_start_at` -- window start, inclusive
/// - `range_end_at` -- window end, exclusive
#[wasm_bindgen(js_name = "expandOccurrences")]
pub fn expand_occurrences(
    series_start_at: &str,
    rule_json: &str,
    range_start_at: &str,
    range_end_at: &str,
) -> Result<String, JsValue> {
    let rule = parse_rule(rule_json).map_err(|e| JsValue::from_str(&e.to_string()))?;

    let starts = expand(series_start_at, &rule, range_start_at, range_end_at);
    let strings: Vec<String> = starts.iter().copied().map(format_occurrence).collect();

    serde_json::to_string(&strings)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

/// Validate a rule and return its canonical serialized form.
///
/// This is what the app persists after the recurrence picker submits:
/// defaults filled in, weekdays deduplicated and ordered, unknown fields
/// rejected.
#[wasm_bindgen(js_name = "parseRule")]
pub fn parse_rule_json(rule_json: &str) -> Result<String, JsValue> {
    let rule = parse_rule(rule_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    serialize_rule(&rule).map_err(|e| JsValue::from_str(&e.to_string()))
}
