//! USGS water-data API client.
//!
//! Builds request URLs for the two supported endpoint variants and issues
//! the run's single blocking GET. No retries: a failed fetch is terminal
//! for the run.
//!
//! API documentation:
//!   IV service: https://waterservices.usgs.gov/docs/instantaneous-values/
//!   OGC API:    https://api.waterdata.usgs.gov/ogcapi/v0/

use serde_json::Value;
use std::fs;

use crate::model::PipelineError;

const NWIS_IV_BASE_URL: &str = "https://nwis.waterservices.usgs.gov/nwis/iv/";
const OGC_ITEMS_BASE_URL: &str =
    "https://api.waterdata.usgs.gov/ogcapi/v0/collections/continuous/items";

// ============================================================================
// URL Construction
// ============================================================================

/// Build an NWIS instantaneous-values request URL.
///
/// # Parameters
/// - `site_id`: USGS site code (e.g. "08330000")
/// - `parameter_code`: USGS parameter code (e.g. "00060" for discharge)
/// - `period`: ISO-8601 lookback duration (e.g. "P30D")
pub fn build_iv_url(site_id: &str, parameter_code: &str, period: &str) -> String {
    format!(
        "{}?format=json&sites={}&parameterCd={}&period={}",
        NWIS_IV_BASE_URL, site_id, parameter_code, period
    )
}

/// Build an OGC API items request URL for the continuous collection.
///
/// The OGC API namespaces site codes as `USGS-<code>` and caps response
/// size with an explicit `limit`.
pub fn build_ogc_url(site_id: &str, parameter_code: &str, period: &str, limit: u32) -> String {
    format!(
        "{}?f=json&monitoring_location_id=USGS-{}&parameter_code={}&time={}&limit={}",
        OGC_ITEMS_BASE_URL, site_id, parameter_code, period, limit
    )
}

// ============================================================================
// Fetch
// ============================================================================

/// Issue one synchronous GET and decode the body as JSON.
///
/// Failure mapping:
/// - transport failure (DNS, TLS, timeout) → `PipelineError::Transport`
/// - non-2xx status → `PipelineError::HttpStatus`
/// - undecodable body → `PipelineError::InvalidJson`
pub fn fetch_raw(client: &reqwest::blocking::Client, url: &str) -> Result<Value, PipelineError> {
    let response = client
        .get(url)
        .header("Accept", "application/json")
        .send()
        .map_err(|e| PipelineError::Transport(e.to_string()))?;

    if !response.status().is_success() {
        return Err(PipelineError::HttpStatus(response.status().as_u16()));
    }

    let body = response
        .text()
        .map_err(|e| PipelineError::Transport(e.to_string()))?;

    serde_json::from_str(&body).map_err(|e| PipelineError::InvalidJson(e.to_string()))
}

/// Pretty-print the raw response body to a file before any transformation.
///
/// Audit hook only: callers should report a failure here as a warning and
/// keep going, since the in-memory body is still the pipeline's input.
pub fn save_raw_snapshot(body: &Value, path: &str) -> std::io::Result<()> {
    let pretty = serde_json::to_string_pretty(body)?;
    fs::write(path, pretty)
}

// ============================================================================
// Tests
// ============================================================================
