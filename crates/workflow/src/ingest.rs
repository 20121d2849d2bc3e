//! Ingestion workflow controller.
//!
//! [`IngestionWorkflow`] is the top-level orchestrator behind every user
//! action: selecting a spreadsheet, uploading it with progress, previewing
//! its sheets, inserting its rows, and deleting it. Every mutation is
//! followed by a full reload of the catalog and/or the chart from the
//! backend; nothing is patched locally.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::StreamExt;
use sheetflow_client::{FileTransport, InsertReceipt, TransportError, UploadEvent, UploadReceipt};
use sheetflow_core::chart::ChartSeries;
use sheetflow_core::files::FileStatus;
use sheetflow_core::generation::RequestGeneration;
use sheetflow_core::notice::{
    Notice, MSG_DELETE_CANCELLED, MSG_DELETE_FAILED, MSG_DELETE_PROMPT, MSG_INSERT_FAILED,
    MSG_INSERT_OK, MSG_INVALID_FILE_TYPE, MSG_NO_SELECTION, MSG_PREVIEW_FAILED,
    MSG_UPLOAD_FAILED, MSG_UPLOAD_OK,
};
use sheetflow_core::preview::{empty_sheet_names, SheetPreview};
use sheetflow_core::selection::SelectedFile;
use sheetflow_core::types::FileId;
use sheetflow_core::CoreError;
use sheetflow_events::NoticeBus;
use tokio::sync::watch;

use crate::catalog::CatalogController;
use crate::chart::ChartFeed;
use crate::config::WorkflowConfig;
use crate::confirm::{AssumeNo, Confirm};
use crate::error::WorkflowError;
use crate::progress::SyntheticProgress;

/// Transient, UI-visible state owned by the workflow.
#[derive(Default)]
struct WorkflowState {
    selected: Option<SelectedFile>,
    selection_status: Option<FileStatus>,
    message: Option<Notice>,
    preview: Option<Vec<SheetPreview>>,
    preview_file: Option<FileId>,
    empty_sheets: Vec<String>,
    chart: Option<Arc<ChartSeries>>,
}

/// Point-in-time copy of the workflow state for display.
#[derive(Debug, Clone)]
pub struct WorkflowSnapshot {
    pub selected: Option<String>,
    pub selection_status: Option<FileStatus>,
    pub progress: u8,
    pub message: Option<Notice>,
    pub preview: Option<Vec<SheetPreview>>,
    pub preview_file: Option<FileId>,
    pub empty_sheets: Vec<String>,
    pub chart: Option<Arc<ChartSeries>>,
    pub inserting: bool,
}

/// Result of a successful preview.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewOutcome {
    pub file_id: FileId,
    pub sheets: Vec<SheetPreview>,
    pub empty_sheets: Vec<String>,
}

/// Holds the single-insertion flag for as long as it lives.
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

pub struct IngestionWorkflow {
    transport: Arc<dyn FileTransport>,
    catalog: Arc<CatalogController>,
    chart: Arc<ChartFeed>,
    notices: Arc<NoticeBus>,
    confirm: Arc<dyn Confirm>,
    config: WorkflowConfig,
    state: Mutex<WorkflowState>,
    /// Upload and insertion progress, 0-100.
    progress: Arc<watch::Sender<u8>>,
    inserting: AtomicBool,
    upload_generation: RequestGeneration,
    preview_generation: RequestGeneration,
}

impl IngestionWorkflow {
    /// Build a workflow with its own catalog, chart feed and notice bus.
    ///
    /// Deletions are declined until a confirmation source is supplied via
    /// [`with_confirm`](Self::with_confirm).
    pub fn new(transport: Arc<dyn FileTransport>, config: WorkflowConfig) -> Self {
        let notices = Arc::new(NoticeBus::default());
        let catalog = Arc::new(CatalogController::new(
            Arc::clone(&transport),
            Arc::clone(&notices),
        ));
        let chart = Arc::new(ChartFeed::new(Arc::clone(&transport)));
        let (progress, _) = watch::channel(0);

        Self {
            transport,
            catalog,
            chart,
            notices,
            confirm: Arc::new(AssumeNo),
            config,
            state: Mutex::new(WorkflowState::default()),
            progress: Arc::new(progress),
            inserting: AtomicBool::new(false),
            upload_generation: RequestGeneration::new(),
            preview_generation: RequestGeneration::new(),
        }
    }

    pub fn with_confirm(mut self, confirm: impl Confirm + 'static) -> Self {
        self.confirm = Arc::new(confirm);
        self
    }

    pub fn catalog(&self) -> &Arc<CatalogController> {
        &self.catalog
    }

    pub fn chart(&self) -> &Arc<ChartFeed> {
        &self.chart
    }

    pub fn notices(&self) -> &Arc<NoticeBus> {
        &self.notices
    }

    pub fn progress(&self) -> u8 {
        *self.progress.borrow()
    }

    pub fn subscribe_progress(&self) -> watch::Receiver<u8> {
        self.progress.subscribe()
    }

    pub fn is_inserting(&self) -> bool {
        self.inserting.load(Ordering::SeqCst)
    }

    pub fn snapshot(&self) -> WorkflowSnapshot {
        let state = self.lock();
        WorkflowSnapshot {
            selected: state.selected.as_ref().map(|f| f.filename().to_string()),
            selection_status: state.selection_status,
            progress: self.progress(),
            message: state.message.clone(),
            preview: state.preview.clone(),
            preview_file: state.preview_file,
            empty_sheets: state.empty_sheets.clone(),
            chart: state.chart.clone(),
            inserting: self.is_inserting(),
        }
    }

    /// Initial catalog load.
    pub async fn init(&self) {
        self.catalog.load_files().await;
    }

    // ---- selection ----

    /// Select a file for upload.
    ///
    /// Only `.xls` / `.xlsx` names are accepted. A rejected file leaves
    /// the previous selection in place.
    pub fn select_file(
        &self,
        filename: impl Into<String>,
        contents: Vec<u8>,
    ) -> Result<(), WorkflowError> {
        match SelectedFile::new(filename, contents) {
            Ok(file) => {
                tracing::info!(filename = file.filename(), bytes = file.len(), "File selected");
                let mut state = self.lock();
                state.selected = Some(file);
                state.selection_status = Some(FileStatus::Selected);
                Ok(())
            }
            Err(e) => {
                tracing::debug!(error = %e, "File selection rejected");
                self.notify(Notice::warning(MSG_INVALID_FILE_TYPE));
                Err(e.into())
            }
        }
    }

    // ---- upload ----

    /// Upload the selected file, tracking progress, then reload the catalog.
    ///
    /// On failure progress stays at the last reported value and the
    /// catalog is not reloaded.
    pub async fn upload_file(&self) -> Result<UploadReceipt, WorkflowError> {
        let selected = self.lock().selected.clone();
        let Some(file) = selected else {
            self.notify(Notice::warning(MSG_NO_SELECTION));
            return Err(CoreError::NoSelection.into());
        };

        {
            let mut state = self.lock();
            state.preview = None;
            state.preview_file = None;
            state.empty_sheets.clear();
            state.chart = None;
            state.message = None;
            state.selection_status = Some(FileStatus::Uploading);
        }
        self.progress.send_replace(0);

        let ticket = self.upload_generation.begin();
        let mut events = self.transport.upload(&file);

        while let Some(event) = events.next().await {
            if !self.upload_generation.is_current(ticket) {
                tracing::debug!(filename = file.filename(), "Discarding superseded upload events");
                return Err(WorkflowError::Superseded);
            }

            if let Some(percent) = event.percent() {
                self.progress.send_replace(percent);
                continue;
            }

            match event {
                UploadEvent::Progress { .. } => {}
                UploadEvent::Completed(receipt) => {
                    self.complete_upload(&receipt).await;
                    return Ok(receipt);
                }
                UploadEvent::Failed(e) => {
                    self.fail_upload(&e);
                    return Err(e.into());
                }
            }
        }

        let e = TransportError::StreamClosed;
        self.fail_upload(&e);
        Err(e.into())
    }

    async fn complete_upload(&self, receipt: &UploadReceipt) {
        self.notify(Notice::success(MSG_UPLOAD_OK));
        self.progress.send_replace(100);
        self.lock().selection_status = Some(FileStatus::Uploaded);

        if let Some(id) = receipt.file_id {
            self.catalog.record_milestone(id, FileStatus::Uploaded).await;
        }
        self.catalog.load_files().await;
    }

    fn fail_upload(&self, error: &TransportError) {
        tracing::warn!(error = %error, "Upload failed");
        self.lock().selection_status = Some(FileStatus::Selected);
        self.notify(Notice::error(MSG_UPLOAD_FAILED));
    }

    // ---- preview ----

    /// Fetch the per-sheet preview of a file.
    ///
    /// Prior preview and chart state is cleared before the request so a
    /// stale display is never shown. All empty sheets are reported in one
    /// consolidated notice.
    pub async fn show_preview(&self, id: FileId) -> Result<PreviewOutcome, WorkflowError> {
        {
            let mut state = self.lock();
            state.preview = None;
            state.preview_file = None;
            state.empty_sheets.clear();
            state.chart = None;
        }

        let ticket = self.preview_generation.begin();
        let result = self.transport.get_preview(id).await;

        if !self.preview_generation.is_current(ticket) {
            tracing::debug!(file_id = id, "Discarding stale preview response");
            return Err(WorkflowError::Superseded);
        }

        match result {
            Ok(sheets) => {
                let empty_sheets = empty_sheet_names(&sheets);
                {
                    let mut state = self.lock();
                    state.preview = Some(sheets.clone());
                    state.preview_file = Some(id);
                    state.empty_sheets = empty_sheets.clone();
                }
                self.catalog.record_milestone(id, FileStatus::Previewed).await;

                if !empty_sheets.is_empty() {
                    self.notify(Notice::empty_sheets(&empty_sheets));
                }

                tracing::info!(file_id = id, sheets = sheets.len(), "Preview loaded");
                Ok(PreviewOutcome {
                    file_id: id,
                    sheets,
                    empty_sheets,
                })
            }
            Err(e) => {
                tracing::warn!(file_id = id, error = %e, "Preview failed");
                self.notify(Notice::error(MSG_PREVIEW_FAILED));
                Err(e.into())
            }
        }
    }

    // ---- insert ----

    /// Insert a file's rows into the backend store.
    ///
    /// Only one insertion may be outstanding per workflow, whatever the
    /// target file; a second call while one is in flight returns
    /// [`WorkflowError::InsertInFlight`] without touching anything.
    pub async fn insert_data(&self, id: FileId) -> Result<InsertReceipt, WorkflowError> {
        let Some(guard) = InFlightGuard::acquire(&self.inserting) else {
            tracing::debug!(file_id = id, "Insert ignored: another insertion is in flight");
            return Err(WorkflowError::InsertInFlight);
        };

        self.progress.send_replace(0);
        let animation = SyntheticProgress::start(
            Arc::clone(&self.progress),
            self.config.insert_progress_step,
            self.config.insert_progress_interval(),
            self.config.insert_progress_cap,
        );

        let result = self.transport.insert(id).await;
        animation.finish().await;

        match result {
            Ok(receipt) => {
                self.progress.send_replace(100);
                drop(guard);

                let text = match receipt.total_inserted {
                    Some(rows) => format!("{MSG_INSERT_OK} ({rows} rows)"),
                    None => MSG_INSERT_OK.to_string(),
                };
                self.notify(Notice::success(text));
                self.catalog.record_milestone(id, FileStatus::Inserted).await;
                self.refresh_chart().await;
                Ok(receipt)
            }
            Err(e) => {
                tracing::warn!(file_id = id, error = %e, "Insert failed");
                self.notify(Notice::error(MSG_INSERT_FAILED));
                drop(guard);
                Err(e.into())
            }
        }
    }

    // ---- delete ----

    /// Delete a file after explicit confirmation, then reload the catalog
    /// and the chart.
    pub async fn delete_file(&self, id: FileId) -> Result<(), WorkflowError> {
        if !self.confirm.confirm(MSG_DELETE_PROMPT) {
            self.notify(Notice::info(MSG_DELETE_CANCELLED));
            return Err(CoreError::NotConfirmed(format!("delete file {id}")).into());
        }

        match self.transport.delete(id).await {
            Ok(()) => {
                tracing::info!(file_id = id, "File deleted");
                self.catalog.record_milestone(id, FileStatus::Deleted).await;
                self.catalog.load_files().await;
                self.refresh_chart().await;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(file_id = id, error = %e, "Delete failed");
                self.notify(Notice::error(MSG_DELETE_FAILED));
                Err(e.into())
            }
        }
    }

    // ---- chart ----

    /// Re-fetch the chart series and keep it as the workflow's display copy.
    ///
    /// Failures are swallowed by the feed; the previous copy is kept.
    pub async fn refresh_chart(&self) -> Option<Arc<ChartSeries>> {
        let series = self.chart.fetch_chart_data().await?;
        self.lock().chart = Some(Arc::clone(&series));
        Some(series)
    }

    // ---- private helpers ----

    fn lock(&self) -> MutexGuard<'_, WorkflowState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn notify(&self, notice: Notice) {
        self.lock().message = Some(notice.clone());
        self.notices.publish(notice);
    }
}
