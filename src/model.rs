//! Core data types for the discharge reporting pipeline.
//!
//! This module defines the domain model shared by every pipeline stage.
//! It contains no I/O, only types, constants, and the error taxonomy.

use chrono::{DateTime, Utc};

// ---------------------------------------------------------------------------
// Parameter codes and sentinels
// ---------------------------------------------------------------------------

/// USGS parameter code for discharge (streamflow), in cubic feet per second.
pub const PARAM_DISCHARGE: &str = "00060";

/// USGS parameter code for gage height (stage), in feet.
pub const PARAM_STAGE: &str = "00065";

/// The no-data code USGS instantaneous-values responses use in place of a
/// real measurement. Readings carrying this value are treated as missing,
/// never as a literal discharge.
pub const SENTINEL_NO_DATA: f64 = -999999.0;

// ---------------------------------------------------------------------------
// Observation types
// ---------------------------------------------------------------------------

/// One sample as extracted from the raw JSON response, before any parsing.
///
/// `datetime` is the verbatim timestamp string from the source. `value` is
/// the discharge token with JSON numbers stringified; a JSON null (or a
/// missing field) becomes `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct RawObservation {
    pub datetime: String,
    pub value: Option<String>,
}

/// One clean sample: a valid instant and a real, finite discharge value.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub timestamp: DateTime<Utc>,
    pub discharge_cfs: f64,
}

// ---------------------------------------------------------------------------
// Normalizer output
// ---------------------------------------------------------------------------

/// Which of the two known response layouts the normalizer detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    /// OGC API items response: `features[].properties.{time,value}`.
    GeoJsonFeatures,
    /// NWIS IV response: `value.timeSeries[0].values[0].value[]` with
    /// `dateTime`/`value` per element.
    NestedTimeSeries,
}

impl std::fmt::Display for ResponseShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResponseShape::GeoJsonFeatures => write!(f, "GeoJSON features"),
            ResponseShape::NestedTimeSeries => write!(f, "nested timeSeries"),
        }
    }
}

/// A flat, still-unparsed series in source order, plus whatever metadata
/// the response carried. Source order is NOT guaranteed chronological:
/// the IV API returns oldest-first, the OGC API newest-first, so nothing
/// downstream may assume a direction.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedSeries {
    pub shape: ResponseShape,
    /// Official site name when the response includes one (IV responses do).
    pub site_name: Option<String>,
    /// Unit code when the response includes one, e.g. "ft3/s".
    pub unit: Option<String>,
    pub observations: Vec<RawObservation>,
}

// ---------------------------------------------------------------------------
// Summary types
// ---------------------------------------------------------------------------

/// Aggregate statistics over a clean series. Derived output only; computed
/// once per run and never persisted.
///
/// `latest` is the observation with the greatest timestamp, found by
/// comparison, not taken from either end of the sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryStats {
    pub count: usize,
    pub min_cfs: f64,
    pub max_cfs: f64,
    pub mean_cfs: f64,
    pub latest: Observation,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that end a pipeline run. None of these are retried; each is
/// reported with a message and the process exits without writing the
/// chart or CSV. Per-row coercion failures are not errors; they are
/// absorbed into the cleaner's dropped count.
#[derive(Debug, PartialEq)]
pub enum PipelineError {
    /// Non-2xx HTTP response from the water-data API.
    HttpStatus(u16),
    /// The request could not be completed (DNS, TLS, timeout, ...).
    Transport(String),
    /// The response body was not valid JSON.
    InvalidJson(String),
    /// Neither recognized response layout was present, or the located
    /// observation array was empty.
    Schema(String),
    /// No usable rows survived cleaning.
    EmptySeries,
}

impl std::fmt::Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineError::HttpStatus(code) => write!(f, "HTTP error: {}", code),
            PipelineError::Transport(msg) => write!(f, "Request failed: {}", msg),
            PipelineError::InvalidJson(msg) => write!(f, "Invalid JSON body: {}", msg),
            PipelineError::Schema(msg) => write!(f, "Unexpected response structure: {}", msg),
            PipelineError::EmptySeries => {
                write!(f, "No usable observations after cleaning")
            }
        }
    }
}

impl std::error::Error for PipelineError {}
