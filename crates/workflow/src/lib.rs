//! Controllers for the spreadsheet ingestion pipeline.
//!
//! - [`ChartFeed`]: fetch + normalize + publish into the reactive chart state.
//! - [`CatalogController`]: the file list and per-file lifecycle.
//! - [`IngestionWorkflow`]: selection, upload, preview, insert and delete.
//! - [`render`]: feeds chart updates into a renderer.

pub mod catalog;
pub mod chart;
pub mod config;
pub mod confirm;
pub mod error;
pub mod ingest;
pub mod progress;
pub mod render;

pub use catalog::{CatalogController, CatalogPhase};
pub use chart::ChartFeed;
pub use config::WorkflowConfig;
pub use confirm::{AssumeNo, AssumeYes, Confirm};
pub use error::WorkflowError;
pub use ingest::{IngestionWorkflow, PreviewOutcome, WorkflowSnapshot};
pub use render::{ChartRenderer, RenderError};
