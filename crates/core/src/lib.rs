//! Domain types and pure logic for the spreadsheet ingestion pipeline.

pub mod chart;
pub mod error;
pub mod files;
pub mod generation;
pub mod notice;
pub mod preview;
pub mod selection;
pub mod types;

pub use error::CoreError;
