//! Entry point: load configuration, run the pipeline once, exit.

use std::error::Error;
use std::process;
use std::time::Duration;

use rioflow_report::clean;
use rioflow_report::config::{ApiVariant, RunConfig};
use rioflow_report::ingest::usgs;
use rioflow_report::logging::{self, Stage};
use rioflow_report::normalize;
use rioflow_report::report::{chart, csv_out, summary};
use rioflow_report::sites;

fn main() {
    dotenv::dotenv().ok();

    let config = match RunConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            process::exit(1);
        }
    };

    logging::init_logger(
        config.log_level,
        config.log_file.as_deref(),
        config.log_timestamps,
    );

    if let Err(e) = run(&config) {
        logging::error(Stage::System, Some(&config.site_id), &e.to_string());
        process::exit(1);
    }
}

fn run(config: &RunConfig) -> Result<(), Box<dyn Error>> {
    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()?;

    let url = match config.api {
        ApiVariant::NwisIv => {
            usgs::build_iv_url(&config.site_id, &config.parameter_code, &config.period)
        }
        ApiVariant::OgcItems => usgs::build_ogc_url(
            &config.site_id,
            &config.parameter_code,
            &config.period,
            config.ogc_limit,
        ),
    };

    println!("Connecting to USGS API for site {}...", config.site_id);
    logging::debug(Stage::Fetch, Some(&config.site_id), &format!("GET {}", url));
    let body = usgs::fetch_raw(&client, &url)?;

    if let Some(ref path) = config.raw_snapshot_path {
        match usgs::save_raw_snapshot(&body, path) {
            Ok(()) => println!("Raw response saved to '{}'", path),
            Err(e) => logging::warn(
                Stage::Fetch,
                Some(&config.site_id),
                &format!("could not save raw snapshot to {}: {}", path, e),
            ),
        }
    }

    let normalized = normalize::normalize(&body)?;
    logging::info(
        Stage::Normalize,
        Some(&config.site_id),
        &format!(
            "{} raw observations ({} layout)",
            normalized.observations.len(),
            normalized.shape
        ),
    );

    let outcome = clean::clean(&normalized);
    println!("Found {} missing entries.", outcome.dropped);

    let stats = summary::compute(&outcome.observations)?;
    let unit = normalized.unit.as_deref().unwrap_or("cfs");
    summary::print(&stats, unit, config.display_zone);

    let site_label = sites::display_name(&config.site_id, normalized.site_name.as_deref());

    chart::render(
        &outcome.observations,
        &site_label,
        &config.period,
        &config.chart_path,
    )?;
    println!("Plot saved as '{}'", config.chart_path);

    csv_out::write(&outcome.observations, config.display_zone, &config.csv_path)?;
    println!("Cleaned dataset saved as '{}'", config.csv_path);

    Ok(())
}
