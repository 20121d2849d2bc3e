//! File catalog controller.
//!
//! Holds the list of files known to the backend and the lifecycle history
//! of each one. The list is only ever replaced wholesale by
//! [`CatalogController::load_files`]; mutations elsewhere trigger a full
//! reload instead of patching entries locally.

use std::collections::HashMap;
use std::sync::Arc;

use sheetflow_client::FileTransport;
use sheetflow_core::files::{CatalogEntry, FileRecord, FileStatus};
use sheetflow_core::generation::RequestGeneration;
use sheetflow_core::notice::{Notice, MSG_LOAD_FAILED};
use sheetflow_core::types::FileId;
use sheetflow_events::NoticeBus;
use tokio::sync::RwLock;

/// Phase of the most recent refresh cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogPhase {
    Idle,
    Loading,
    Loaded,
    Failed,
}

struct CatalogState {
    phase: CatalogPhase,
    files: Vec<FileRecord>,
}

pub struct CatalogController {
    transport: Arc<dyn FileTransport>,
    notices: Arc<NoticeBus>,
    state: RwLock<CatalogState>,
    /// Completed milestones per file id.
    lifecycle: RwLock<HashMap<FileId, FileStatus>>,
    generation: RequestGeneration,
}

impl CatalogController {
    pub fn new(transport: Arc<dyn FileTransport>, notices: Arc<NoticeBus>) -> Self {
        Self {
            transport,
            notices,
            state: RwLock::new(CatalogState {
                phase: CatalogPhase::Idle,
                files: Vec::new(),
            }),
            lifecycle: RwLock::new(HashMap::new()),
            generation: RequestGeneration::new(),
        }
    }

    /// Reload the full catalog from the backend.
    ///
    /// On success the held list is replaced wholesale. On failure the
    /// previous list stays and the user is notified. A response that
    /// resolves after a newer reload was started is discarded; the phase
    /// then reflects the newer request.
    pub async fn load_files(&self) -> CatalogPhase {
        let ticket = self.generation.begin();
        self.state.write().await.phase = CatalogPhase::Loading;

        let result = self.transport.list_files().await;

        if !self.generation.is_current(ticket) {
            tracing::debug!("Discarding stale catalog response");
            return self.phase().await;
        }

        let mut state = self.state.write().await;
        match result {
            Ok(files) => {
                tracing::info!(count = files.len(), "Catalog loaded");
                state.files = files;
                state.phase = CatalogPhase::Loaded;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to load catalog");
                state.phase = CatalogPhase::Failed;
                self.notices.publish(Notice::error(MSG_LOAD_FAILED));
            }
        }
        state.phase
    }

    pub async fn phase(&self) -> CatalogPhase {
        self.state.read().await.phase
    }

    /// The records from the last successful load.
    pub async fn files(&self) -> Vec<FileRecord> {
        self.state.read().await.files.clone()
    }

    pub async fn find(&self, id: FileId) -> Option<FileRecord> {
        self.state
            .read()
            .await
            .files
            .iter()
            .find(|f| f.id == id)
            .cloned()
    }

    /// Catalog rows with their derived lifecycle status.
    ///
    /// Files without local history are reported as `Uploaded`, since
    /// being listed by the backend implies a completed upload.
    pub async fn entries(&self) -> Vec<CatalogEntry> {
        let files = self.files().await;
        let lifecycle = self.lifecycle.read().await;
        files
            .into_iter()
            .map(|record| {
                let status = lifecycle
                    .get(&record.id)
                    .copied()
                    .unwrap_or(FileStatus::Uploaded);
                CatalogEntry { record, status }
            })
            .collect()
    }

    /// Record a completed milestone for a file.
    pub async fn record_milestone(&self, id: FileId, milestone: FileStatus) -> FileStatus {
        let mut lifecycle = self.lifecycle.write().await;
        let status = lifecycle
            .get(&id)
            .copied()
            .unwrap_or(FileStatus::Uploaded)
            .advance(milestone);
        lifecycle.insert(id, status);
        tracing::debug!(file_id = id, status = %status, "File lifecycle advanced");
        status
    }

    /// Derived status of a file, if it is listed or has local history.
    pub async fn status_of(&self, id: FileId) -> Option<FileStatus> {
        if let Some(status) = self.lifecycle.read().await.get(&id) {
            return Some(*status);
        }
        self.find(id).await.map(|_| FileStatus::Uploaded)
    }
}
