//! Transport abstraction over the file backend.
//!
//! [`FileTransport`] exposes one asynchronous operation per backend action.
//! Every call is one-shot: no retry, no caching. The controllers hold an
//! `Arc<dyn FileTransport>`, so they run unchanged against
//! [`HttpTransport`](crate::api::HttpTransport) or a test double.

use async_trait::async_trait;
use futures::stream::BoxStream;
use sheetflow_core::files::FileRecord;
use sheetflow_core::preview::SheetPreview;
use sheetflow_core::selection::SelectedFile;
use sheetflow_core::types::FileId;

/// Lazy stream of upload events.
///
/// Zero or more [`UploadEvent::Progress`] items followed by exactly one
/// terminal [`UploadEvent::Completed`] or [`UploadEvent::Failed`].
pub type UploadStream = BoxStream<'static, UploadEvent>;

#[derive(Debug)]
pub enum UploadEvent {
    /// Bytes handed to the connection so far.
    Progress { loaded: u64, total: Option<u64> },
    /// The backend accepted the upload.
    Completed(UploadReceipt),
    /// The upload failed. No retry is attempted.
    Failed(TransportError),
}

impl UploadEvent {
    /// Progress as a 0-100 percentage, when the total is known.
    pub fn percent(&self) -> Option<u8> {
        match self {
            Self::Progress {
                loaded,
                total: Some(total),
            } if *total > 0 => {
                let pct = (100.0 * *loaded as f64 / *total as f64).round();
                Some(pct.clamp(0.0, 100.0) as u8)
            }
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Progress { .. })
    }
}

/// What the backend said about an accepted upload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UploadReceipt {
    /// Identifier assigned to the new file, when reported.
    pub file_id: Option<FileId>,
    pub filename: Option<String>,
    pub message: Option<String>,
}

/// What the backend said about a completed insertion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InsertReceipt {
    pub total_inserted: Option<u64>,
    pub message: Option<String>,
}

/// Errors from the transport layer.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend returned a non-2xx status code.
    #[error("Backend error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The upload stream ended without a terminal event.
    #[error("Upload stream closed before completion")]
    StreamClosed,
}

/// One asynchronous operation per backend action.
#[async_trait]
pub trait FileTransport: Send + Sync {
    /// Upload a validated spreadsheet, reporting progress as it goes.
    ///
    /// Nothing is sent until the returned stream is first polled.
    fn upload(&self, file: &SelectedFile) -> UploadStream;

    /// Fetch the full catalog.
    async fn list_files(&self) -> Result<Vec<FileRecord>, TransportError>;

    /// Fetch the per-sheet preview of one file.
    async fn get_preview(&self, id: FileId) -> Result<Vec<SheetPreview>, TransportError>;

    /// Insert a file's rows into the backend store.
    async fn insert(&self, id: FileId) -> Result<InsertReceipt, TransportError>;

    /// Delete a file and its inserted rows.
    async fn delete(&self, id: FileId) -> Result<(), TransportError>;

    /// Fetch raw, unnormalized chart records.
    async fn get_chart_data(&self) -> Result<Vec<serde_json::Value>, TransportError>;
}
