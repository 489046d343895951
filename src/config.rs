//! Run configuration for the discharge reporting tool.
//!
//! Settings come from three layers, later layers winning:
//!   1. built-in defaults (the Albuquerque discharge report),
//!   2. `rioflow.toml` (path overridable via `RIOFLOW_CONFIG`),
//!   3. environment variables (`RIOFLOW_SITE_ID`, `RIOFLOW_PARAMETER_CODE`,
//!      `RIOFLOW_PERIOD`, `RIOFLOW_API`), loaded after `.env`.
//!
//! A missing config file is not an error; a malformed one is.

use chrono_tz::Tz;
use serde::Deserialize;
use std::env;
use std::error::Error;
use std::fs;
use std::str::FromStr;

use crate::logging::LogLevel;
use crate::model::PARAM_DISCHARGE;

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

pub const DEFAULT_CONFIG_PATH: &str = "rioflow.toml";

const DEFAULT_SITE_ID: &str = "08330000"; // Rio Grande at Albuquerque, NM
const DEFAULT_PERIOD: &str = "P30D";
const DEFAULT_CHART_PATH: &str = "water_chart.png";
const DEFAULT_CSV_PATH: &str = "cleaned_water_data.csv";
const DEFAULT_OGC_LIMIT: u32 = 5000;

// ---------------------------------------------------------------------------
// API variant selection
// ---------------------------------------------------------------------------

/// Which water-data endpoint the fetcher queries. Both return the same
/// observations for a site; they differ in URL layout and response shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ApiVariant {
    /// NWIS instantaneous values service (nested timeSeries response).
    NwisIv,
    /// OGC API items collection (GeoJSON features response).
    OgcItems,
}

impl FromStr for ApiVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "nwis-iv" => Ok(ApiVariant::NwisIv),
            "ogc-items" => Ok(ApiVariant::OgcItems),
            other => Err(format!(
                "unknown api variant '{}' (expected 'nwis-iv' or 'ogc-items')",
                other
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// File schema
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    site_id: Option<String>,
    parameter_code: Option<String>,
    period: Option<String>,
    api: Option<ApiVariant>,
    /// IANA timezone name for display timestamps, e.g. "America/Denver".
    display_timezone: Option<String>,
    ogc_limit: Option<u32>,
    #[serde(default)]
    output: OutputSection,
    #[serde(default)]
    log: LogSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct OutputSection {
    /// When set, the raw JSON body is pretty-printed here before cleaning.
    raw_snapshot: Option<String>,
    chart: Option<String>,
    csv: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct LogSection {
    level: Option<String>,
    file: Option<String>,
    timestamps: Option<bool>,
}

// ---------------------------------------------------------------------------
// Resolved configuration
// ---------------------------------------------------------------------------

/// Fully-resolved settings for one pipeline run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub site_id: String,
    pub parameter_code: String,
    /// Lookback window as an ISO-8601 duration, e.g. "P30D" or "PT4H".
    pub period: String,
    pub api: ApiVariant,
    /// When set, all user-facing timestamps render in this zone with an
    /// AM/PM format; stored instants stay UTC either way.
    pub display_zone: Option<Tz>,
    pub ogc_limit: u32,
    pub raw_snapshot_path: Option<String>,
    pub chart_path: String,
    pub csv_path: String,
    pub log_level: LogLevel,
    pub log_file: Option<String>,
    pub log_timestamps: bool,
}

impl RunConfig {
    /// Load configuration from the config file plus environment overrides.
    pub fn load() -> Result<RunConfig, Box<dyn Error>> {
        let path = env::var("RIOFLOW_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let file = match fs::read_to_string(&path) {
            Ok(text) => {
                toml::from_str::<FileConfig>(&text).map_err(|e| format!("{}: {}", path, e))?
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => FileConfig::default(),
            Err(e) => return Err(format!("{}: {}", path, e).into()),
        };
        Self::resolve(file)
    }

    /// Parse configuration from TOML text plus environment overrides.
    pub fn from_toml_str(text: &str) -> Result<RunConfig, Box<dyn Error>> {
        let file = toml::from_str::<FileConfig>(text)?;
        Self::resolve(file)
    }

    fn resolve(file: FileConfig) -> Result<RunConfig, Box<dyn Error>> {
        let site_id = env::var("RIOFLOW_SITE_ID")
            .ok()
            .or(file.site_id)
            .unwrap_or_else(|| DEFAULT_SITE_ID.to_string());
        let parameter_code = env::var("RIOFLOW_PARAMETER_CODE")
            .ok()
            .or(file.parameter_code)
            .unwrap_or_else(|| PARAM_DISCHARGE.to_string());
        let period = env::var("RIOFLOW_PERIOD")
            .ok()
            .or(file.period)
            .unwrap_or_else(|| DEFAULT_PERIOD.to_string());
        let api = match env::var("RIOFLOW_API") {
            Ok(s) => s.parse::<ApiVariant>()?,
            Err(_) => file.api.unwrap_or(ApiVariant::NwisIv),
        };

        if site_id.trim().is_empty() {
            return Err("site_id must not be empty".into());
        }
        if parameter_code.trim().is_empty() {
            return Err("parameter_code must not be empty".into());
        }
        if !period.starts_with('P') {
            return Err(format!(
                "period '{}' is not an ISO-8601 duration (expected e.g. 'P30D' or 'PT4H')",
                period
            )
            .into());
        }

        let display_zone = match file.display_timezone {
            Some(name) => Some(
                name.parse::<Tz>()
                    .map_err(|e| format!("display_timezone: {}", e))?,
            ),
            None => None,
        };

        let log_level = match file.log.level {
            Some(name) => name.parse::<LogLevel>()?,
            None => LogLevel::Info,
        };

        Ok(RunConfig {
            site_id,
            parameter_code,
            period,
            api,
            display_zone,
            ogc_limit: file.ogc_limit.unwrap_or(DEFAULT_OGC_LIMIT),
            raw_snapshot_path: file.output.raw_snapshot,
            chart_path: file.output.chart.unwrap_or_else(|| DEFAULT_CHART_PATH.to_string()),
            csv_path: file.output.csv.unwrap_or_else(|| DEFAULT_CSV_PATH.to_string()),
            log_level,
            log_file: file.log.file,
            log_timestamps: file.log.timestamps.unwrap_or(false),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
