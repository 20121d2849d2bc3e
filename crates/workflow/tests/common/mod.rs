#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use serde_json::Value;
use sheetflow_client::{
    FileTransport, InsertReceipt, TransportError, UploadEvent, UploadReceipt, UploadStream,
};
use sheetflow_core::files::FileRecord;
use sheetflow_core::preview::SheetPreview;
use sheetflow_core::selection::SelectedFile;
use sheetflow_core::types::FileId;
use sheetflow_workflow::{IngestionWorkflow, WorkflowConfig};

/// One scripted upload event.
#[derive(Debug, Clone)]
pub enum UploadStep {
    Progress(u64, u64),
    Complete(Option<FileId>),
    Fail(u16),
}

/// Per-operation call counters.
#[derive(Default)]
pub struct Calls {
    pub upload: AtomicUsize,
    pub list: AtomicUsize,
    pub preview: AtomicUsize,
    pub insert: AtomicUsize,
    pub delete: AtomicUsize,
    pub chart: AtomicUsize,
}

impl Calls {
    pub fn get(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

/// In-memory `FileTransport` with scripted responses.
///
/// Failure responses are expressed as HTTP status codes and surface as
/// `TransportError::Api`.
pub struct FakeTransport {
    pub calls: Calls,
    pub files: Mutex<Result<Vec<FileRecord>, u16>>,
    pub upload_steps: Mutex<Vec<UploadStep>>,
    pub previews: Mutex<HashMap<FileId, Result<Vec<SheetPreview>, u16>>>,
    pub preview_delays: Mutex<HashMap<FileId, Duration>>,
    pub insert_result: Mutex<Result<InsertReceipt, u16>>,
    pub insert_delay: Mutex<Duration>,
    pub delete_result: Mutex<Result<(), u16>>,
    pub chart: Mutex<Result<Vec<Value>, u16>>,
}

fn api_error(status: u16) -> TransportError {
    TransportError::Api {
        status,
        body: "boom".into(),
    }
}

impl FakeTransport {
    pub fn new() -> Self {
        Self {
            calls: Calls::default(),
            files: Mutex::new(Ok(Vec::new())),
            upload_steps: Mutex::new(vec![UploadStep::Complete(None)]),
            previews: Mutex::new(HashMap::new()),
            preview_delays: Mutex::new(HashMap::new()),
            insert_result: Mutex::new(Ok(InsertReceipt::default())),
            insert_delay: Mutex::new(Duration::from_millis(10)),
            delete_result: Mutex::new(Ok(())),
            chart: Mutex::new(Ok(Vec::new())),
        }
    }

    pub fn set_files(&self, files: Vec<FileRecord>) {
        *self.files.lock().unwrap() = Ok(files);
    }

    pub fn fail_list(&self, status: u16) {
        *self.files.lock().unwrap() = Err(status);
    }

    pub fn script_upload(&self, steps: Vec<UploadStep>) {
        *self.upload_steps.lock().unwrap() = steps;
    }

    pub fn set_preview(&self, id: FileId, result: Result<Vec<SheetPreview>, u16>) {
        self.previews.lock().unwrap().insert(id, result);
    }

    pub fn delay_preview(&self, id: FileId, delay: Duration) {
        self.preview_delays.lock().unwrap().insert(id, delay);
    }

    pub fn set_insert(&self, result: Result<InsertReceipt, u16>, delay: Duration) {
        *self.insert_result.lock().unwrap() = result;
        *self.insert_delay.lock().unwrap() = delay;
    }

    pub fn fail_delete(&self, status: u16) {
        *self.delete_result.lock().unwrap() = Err(status);
    }

    pub fn set_chart(&self, result: Result<Vec<Value>, u16>) {
        *self.chart.lock().unwrap() = result;
    }
}

#[async_trait]
impl FileTransport for FakeTransport {
    fn upload(&self, _file: &SelectedFile) -> UploadStream {
        self.calls.upload.fetch_add(1, Ordering::SeqCst);
        let events: Vec<UploadEvent> = self
            .upload_steps
            .lock()
            .unwrap()
            .iter()
            .map(|step| match step {
                UploadStep::Progress(loaded, total) => UploadEvent::Progress {
                    loaded: *loaded,
                    total: Some(*total),
                },
                UploadStep::Complete(file_id) => UploadEvent::Completed(UploadReceipt {
                    file_id: *file_id,
                    ..Default::default()
                }),
                UploadStep::Fail(status) => UploadEvent::Failed(api_error(*status)),
            })
            .collect();
        futures::stream::iter(events).boxed()
    }

    async fn list_files(&self) -> Result<Vec<FileRecord>, TransportError> {
        self.calls.list.fetch_add(1, Ordering::SeqCst);
        let result = self.files.lock().unwrap().clone();
        result.map_err(api_error)
    }

    async fn get_preview(&self, id: FileId) -> Result<Vec<SheetPreview>, TransportError> {
        self.calls.preview.fetch_add(1, Ordering::SeqCst);
        let delay = self.preview_delays.lock().unwrap().get(&id).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let result = self
            .previews
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .unwrap_or(Err(404));
        result.map_err(api_error)
    }

    async fn insert(&self, _id: FileId) -> Result<InsertReceipt, TransportError> {
        self.calls.insert.fetch_add(1, Ordering::SeqCst);
        let delay = *self.insert_delay.lock().unwrap();
        tokio::time::sleep(delay).await;
        let result = self.insert_result.lock().unwrap().clone();
        result.map_err(api_error)
    }

    async fn delete(&self, _id: FileId) -> Result<(), TransportError> {
        self.calls.delete.fetch_add(1, Ordering::SeqCst);
        let result = *self.delete_result.lock().unwrap();
        result.map_err(api_error)
    }

    async fn get_chart_data(&self) -> Result<Vec<Value>, TransportError> {
        self.calls.chart.fetch_add(1, Ordering::SeqCst);
        let result = self.chart.lock().unwrap().clone();
        result.map_err(api_error)
    }
}

/// A workflow wired to a fresh fake transport.
pub fn workflow() -> (Arc<FakeTransport>, IngestionWorkflow) {
    let fake = Arc::new(FakeTransport::new());
    let workflow = IngestionWorkflow::new(fake.clone(), WorkflowConfig::default());
    (fake, workflow)
}
