//! Series cleaning.
//!
//! Turns a raw, string-typed series into typed observations: timestamps
//! become UTC instants, values become finite floats, and every row that
//! fails either conversion is dropped and counted. Row failures never
//! propagate as errors; only the aggregate dropped count is surfaced.
//!
//! Source ordering is preserved. Consumers that need chronological order
//! (the chart does) must sort for themselves.

use chrono::{DateTime, SecondsFormat, Utc};
use chrono_tz::Tz;

use crate::model::{NormalizedSeries, Observation, SENTINEL_NO_DATA};

// ---------------------------------------------------------------------------
// Cleaning
// ---------------------------------------------------------------------------

/// Result of cleaning one normalized series.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanOutcome {
    /// Rows that survived, in the normalizer's order.
    pub observations: Vec<Observation>,
    /// Rows dropped for an unparseable timestamp, a missing or non-numeric
    /// value, or the no-data sentinel.
    pub dropped: usize,
}

/// Clean a normalized series. Infallible: bad rows are dropped, not raised.
pub fn clean(series: &NormalizedSeries) -> CleanOutcome {
    let mut observations = Vec::with_capacity(series.observations.len());
    let mut dropped = 0usize;

    for raw in &series.observations {
        let timestamp = match parse_timestamp(&raw.datetime) {
            Some(ts) => ts,
            None => {
                dropped += 1;
                continue;
            }
        };
        let discharge_cfs = match coerce_discharge(raw.value.as_deref()) {
            Some(v) => v,
            None => {
                dropped += 1;
                continue;
            }
        };
        observations.push(Observation {
            timestamp,
            discharge_cfs,
        });
    }

    CleanOutcome {
        observations,
        dropped,
    }
}

// ---------------------------------------------------------------------------
// Field conversions
// ---------------------------------------------------------------------------

/// Parse a source timestamp into a UTC instant.
///
/// The IV API emits full RFC 3339 with an offset
/// ("2024-05-01T12:00:00.000-06:00"); the OGC API sometimes omits the
/// seconds field ("2024-01-01T00:00Z"). Both are accepted.
fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    let canonical = match s.strip_suffix('Z') {
        Some(stripped) => format!("{}+00:00", stripped),
        None => s.to_string(),
    };
    DateTime::parse_from_str(&canonical, "%Y-%m-%dT%H:%M%:z")
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Coerce a raw value token to a finite discharge, or missing.
///
/// Missing: absent value, empty token, non-numeric token, non-finite
/// parse, or the USGS no-data sentinel.
fn coerce_discharge(raw: Option<&str>) -> Option<f64> {
    let token = raw?.trim();
    if token.is_empty() {
        return None;
    }
    let value: f64 = token.parse().ok()?;
    if !value.is_finite() || value == SENTINEL_NO_DATA {
        return None;
    }
    Some(value)
}

// ---------------------------------------------------------------------------
// Display formatting
// ---------------------------------------------------------------------------

/// Format an instant for user-facing output (summary, CSV).
///
/// With a display zone the instant is converted and rendered AM/PM, the
/// way the gauge's own webpage shows it. Without one it stays RFC 3339 UTC.
pub fn format_timestamp(timestamp: DateTime<Utc>, zone: Option<Tz>) -> String {
    match zone {
        Some(tz) => timestamp
            .with_timezone(&tz)
            .format("%Y-%m-%d %I:%M %p")
            .to_string(),
        None => timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
