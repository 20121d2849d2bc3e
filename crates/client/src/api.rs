//! REST client for the file backend.
//!
//! Wraps the `/files` HTTP API (upload, list, preview, insert, delete,
//! chart) using [`reqwest`].

use async_trait::async_trait;
use futures::StreamExt;
use serde_json::Value;
use sheetflow_core::files::FileRecord;
use sheetflow_core::preview::SheetPreview;
use sheetflow_core::selection::SelectedFile;
use sheetflow_core::types::FileId;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

use crate::config::ClientConfig;
use crate::envelope;
use crate::transport::{FileTransport, InsertReceipt, TransportError, UploadEvent, UploadStream};
use crate::upload::progress_form;

/// HTTP client for a single backend.
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    upload_chunk_bytes: usize,
}

impl HttpTransport {
    /// Create a client for `base_url` (e.g. `http://host:8009`).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            upload_chunk_bytes: ClientConfig::default().upload_chunk_bytes,
        }
    }

    /// Build a client with the configured timeout and chunk size.
    pub fn from_config(config: &ClientConfig) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self {
            upload_chunk_bytes: config.upload_chunk_bytes,
            ..Self::with_client(client, config.base_url.clone())
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/files{}", self.base_url, path)
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or a [`TransportError::Api`]
    /// containing the status and body text on failure.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, TransportError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(TransportError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Read a successful response body as JSON.
    ///
    /// A body that is not JSON becomes `Value::Null`; the envelope
    /// helpers turn that into an empty result.
    async fn read_json(response: reqwest::Response) -> Result<Value, TransportError> {
        let response = Self::ensure_success(response).await?;
        let text = response.text().await?;
        Ok(serde_json::from_str(&text).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Response body is not JSON");
            Value::Null
        }))
    }
}

#[async_trait]
impl FileTransport for HttpTransport {
    /// Sends `POST /files/upload` as multipart field `file`.
    fn upload(&self, file: &SelectedFile) -> UploadStream {
        let client = self.client.clone();
        let url = self.url("/upload");
        let file = file.clone();
        let chunk_bytes = self.upload_chunk_bytes;

        // The request is only spawned once the stream is polled.
        futures::stream::once(async move {
            let (tx, rx) = mpsc::unbounded_channel();
            tokio::spawn(async move {
                let terminal = match send_upload(&client, &url, &file, chunk_bytes, &tx).await {
                    Ok(body) => {
                        tracing::info!(filename = file.filename(), "Upload accepted");
                        UploadEvent::Completed(envelope::parse_upload_receipt(&body))
                    }
                    Err(e) => {
                        tracing::warn!(filename = file.filename(), error = %e, "Upload failed");
                        UploadEvent::Failed(e)
                    }
                };
                let _ = tx.send(terminal);
            });
            UnboundedReceiverStream::new(rx)
        })
        .flatten()
        .boxed()
    }

    /// Sends `GET /files`.
    async fn list_files(&self) -> Result<Vec<FileRecord>, TransportError> {
        let response = self.client.get(self.url("")).send().await?;
        let body = Self::read_json(response).await?;
        Ok(envelope::parse_file_list(&body))
    }

    /// Sends `GET /files/preview/{id}`.
    async fn get_preview(&self, id: FileId) -> Result<Vec<SheetPreview>, TransportError> {
        let response = self
            .client
            .get(self.url(&format!("/preview/{id}")))
            .send()
            .await?;
        let body = Self::read_json(response).await?;
        Ok(envelope::parse_preview(&body))
    }

    /// Sends `POST /files/insert/{id}` with an empty JSON body.
    async fn insert(&self, id: FileId) -> Result<InsertReceipt, TransportError> {
        let response = self
            .client
            .post(self.url(&format!("/insert/{id}")))
            .json(&serde_json::json!({}))
            .send()
            .await?;
        let body = Self::read_json(response).await?;
        Ok(envelope::parse_insert_receipt(&body))
    }

    /// Sends `DELETE /files/{id}`, discarding the body.
    async fn delete(&self, id: FileId) -> Result<(), TransportError> {
        let response = self
            .client
            .delete(self.url(&format!("/{id}")))
            .send()
            .await?;
        Self::ensure_success(response).await?;
        Ok(())
    }

    /// Sends `GET /files/chart`.
    async fn get_chart_data(&self) -> Result<Vec<Value>, TransportError> {
        let response = self.client.get(self.url("/chart")).send().await?;
        let body = Self::read_json(response).await?;
        Ok(envelope::unwrap_array(&body, "chart"))
    }
}

async fn send_upload(
    client: &reqwest::Client,
    url: &str,
    file: &SelectedFile,
    chunk_bytes: usize,
    tx: &mpsc::UnboundedSender<UploadEvent>,
) -> Result<Value, TransportError> {
    let form = progress_form(file, chunk_bytes, tx.clone())?;
    let response = client.post(url).multipart(form).send().await?;
    HttpTransport::read_json(response).await
}
