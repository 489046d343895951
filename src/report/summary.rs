//! Aggregate statistics over the cleaned series.

use chrono_tz::Tz;

use crate::clean::format_timestamp;
use crate::model::{Observation, PipelineError, SummaryStats};

// ---------------------------------------------------------------------------
// Computation
// ---------------------------------------------------------------------------

/// Compute summary statistics over a cleaned series.
///
/// The latest reading is found by comparing timestamps, never by position:
/// the IV API returns oldest-first and the OGC API newest-first, so the
/// last element means nothing.
///
/// Refuses an empty series with `EmptySeries` rather than returning NaN
/// aggregates.
pub fn compute(observations: &[Observation]) -> Result<SummaryStats, PipelineError> {
    let first = observations.first().ok_or(PipelineError::EmptySeries)?;

    let mut min_cfs = first.discharge_cfs;
    let mut max_cfs = first.discharge_cfs;
    let mut sum = 0.0;
    let mut latest = first;

    for obs in observations {
        min_cfs = min_cfs.min(obs.discharge_cfs);
        max_cfs = max_cfs.max(obs.discharge_cfs);
        sum += obs.discharge_cfs;
        if obs.timestamp > latest.timestamp {
            latest = obs;
        }
    }

    Ok(SummaryStats {
        count: observations.len(),
        min_cfs,
        max_cfs,
        mean_cfs: sum / observations.len() as f64,
        latest: latest.clone(),
    })
}

// ---------------------------------------------------------------------------
// Console output
// ---------------------------------------------------------------------------

/// Print the banner-delimited summary block.
///
/// `unit` is the label printed after each flow value; IV responses carry
/// "ft3/s", and "cfs" is the fallback when the source has no unit field.
pub fn print(stats: &SummaryStats, unit: &str, zone: Option<Tz>) {
    println!();
    println!("{}", "=".repeat(40));
    println!("{:^40}", "DATA SUMMARY");
    println!("{}", "=".repeat(40));
    println!("Total Observations: {}", stats.count);
    println!("Minimum Flow:       {} {}", stats.min_cfs, unit);
    println!("Maximum Flow:       {} {}", stats.max_cfs, unit);
    println!("Average Flow:       {:.2} {}", stats.mean_cfs, unit);
    println!("Latest Reading:     {} {}", stats.latest.discharge_cfs, unit);
    println!(
        "Latest Time:        {}",
        format_timestamp(stats.latest.timestamp, zone)
    );
    println!("{}", "=".repeat(40));
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
