//! Data ingestion
//!
//! CSV loading of raw match rows.

pub mod loader;

pub use loader::{LoadReport, RecordLoader};
