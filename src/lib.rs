//! Discharge reporting pipeline for a single USGS gauge.
//!
//! One run is a linear traversal with no feedback loops:
//!
//!   fetch → normalize → clean → report
//!
//! Each stage consumes the prior stage's output in full. A stage failure
//! ends the run with a reported error; no partial artifacts are written.

pub mod clean;
pub mod config;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod normalize;
pub mod report;
pub mod sites;
