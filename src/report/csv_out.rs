//! CSV artifact.
//!
//! Writes the cleaned series as delimited text with a header row. Columns
//! are the display-formatted timestamp and the numeric discharge value, in
//! that order. Rows keep the series order; this artifact mirrors the data,
//! it does not re-sort it.

use chrono_tz::Tz;
use std::error::Error;

use crate::clean::format_timestamp;
use crate::model::{Observation, PipelineError};

/// Write the cleaned series to `path`, overwriting any existing file.
pub fn write(
    observations: &[Observation],
    zone: Option<Tz>,
    path: &str,
) -> Result<(), Box<dyn Error>> {
    if observations.is_empty() {
        return Err(Box::new(PipelineError::EmptySeries));
    }

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["timestamp", "discharge_cfs"])?;
    for obs in observations {
        writer.write_record([
            format_timestamp(obs.timestamp, zone),
            obs.discharge_cfs.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}
