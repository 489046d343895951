//! Data-source clients.
//!
//! Submodules:
//! - `usgs`: URL construction and the single blocking fetch against the
//!   USGS water-data APIs.

pub mod usgs;
