//! Chart artifact.
//!
//! Renders the cleaned series as a single-series PNG line plot. The
//! drawing area is created, drawn, and presented inside `render`; no
//! canvas state outlives the call.

use chrono::{DateTime, Duration, Utc};
use plotters::prelude::*;
use std::error::Error;

use crate::model::{Observation, PipelineError};

const CHART_WIDTH: u32 = 1000;
const CHART_HEIGHT: u32 = 600;

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Render discharge vs. time to a PNG at `path`.
///
/// The series is sorted ascending by timestamp into a private copy before
/// drawing, so either source ordering plots correctly. An empty series is
/// refused; the caller should never reach this with one.
pub fn render(
    observations: &[Observation],
    site_label: &str,
    period: &str,
    path: &str,
) -> Result<(), Box<dyn Error>> {
    if observations.is_empty() {
        return Err(Box::new(PipelineError::EmptySeries));
    }

    let mut points: Vec<(DateTime<Utc>, f64)> = observations
        .iter()
        .map(|o| (o.timestamp, o.discharge_cfs))
        .collect();
    points.sort_by_key(|(timestamp, _)| *timestamp);

    let t_min = points[0].0;
    let mut t_max = points[points.len() - 1].0;
    if t_max == t_min {
        // A one-point series still needs a non-degenerate axis.
        t_max = t_max + Duration::minutes(15);
    }

    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for (_, value) in &points {
        lo = lo.min(*value);
        hi = hi.max(*value);
    }
    let pad = ((hi - lo) * 0.05).max(1.0);

    let root = BitMapBackend::new(path, (CHART_WIDTH, CHART_HEIGHT)).into_drawing_area();
    root.fill(&WHITE)?;

    let caption = format!("{} ({})", site_label, period_label(period));
    let mut chart = ChartBuilder::on(&root)
        .caption(caption, ("sans-serif", 28))
        .margin(12)
        .x_label_area_size(44)
        .y_label_area_size(64)
        .build_cartesian_2d(t_min..t_max, (lo - pad)..(hi + pad))?;

    chart
        .configure_mesh()
        .x_desc("Date")
        .y_desc("Discharge (cubic feet per second)")
        .x_label_formatter(&|ts: &DateTime<Utc>| ts.format("%b %d").to_string())
        .draw()?;

    chart.draw_series(LineSeries::new(points.iter().copied(), &BLUE))?;

    root.present()?;
    Ok(())
}

/// Human-readable caption suffix for an ISO-8601 lookback duration.
pub fn period_label(period: &str) -> String {
    if let Some(days) = period
        .strip_prefix('P')
        .and_then(|rest| rest.strip_suffix('D'))
        .and_then(|n| n.parse::<u32>().ok())
    {
        if days == 1 {
            return "Last Day".to_string();
        }
        return format!("Last {} Days", days);
    }
    if let Some(hours) = period
        .strip_prefix("PT")
        .and_then(|rest| rest.strip_suffix('H'))
        .and_then(|n| n.parse::<u32>().ok())
    {
        if hours == 1 {
            return "Last Hour".to_string();
        }
        return format!("Last {} Hours", hours);
    }
    format!("Period {}", period)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
