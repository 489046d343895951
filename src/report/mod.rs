//! Run artifacts: summary block, chart image, cleaned CSV.
//!
//! Every entry point here refuses an empty series rather than producing a
//! misleading artifact. Nothing in this module mutates the series; the
//! chart sorts a private copy.
//!
//! Submodules:
//! - `summary`: aggregate statistics and the console summary block.
//! - `chart`: PNG line chart of discharge over time.
//! - `csv_out`: delimited text artifact with a header row.

pub mod chart;
pub mod csv_out;
pub mod summary;
