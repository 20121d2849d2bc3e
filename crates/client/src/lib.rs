//! Transport client for the spreadsheet file backend.
//!
//! Provides the [`FileTransport`] trait, its reqwest-based
//! [`HttpTransport`] implementation, lenient response-envelope helpers,
//! and the client configuration.

pub mod api;
pub mod config;
pub mod envelope;
pub mod transport;
pub mod upload;

pub use api::HttpTransport;
pub use config::{ClientConfig, ConfigError};
pub use transport::{
    FileTransport, InsertReceipt, TransportError, UploadEvent, UploadReceipt, UploadStream,
};
