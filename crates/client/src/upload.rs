//! Multipart upload with byte-level progress.
//!
//! reqwest has no upload progress callback, so the file is handed to the
//! request as a chunked body stream. Each time the connection pulls a
//! chunk, a [`UploadEvent::Progress`] is pushed to the caller's channel.

use futures::StreamExt;
use reqwest::multipart::{Form, Part};
use sheetflow_core::selection::SelectedFile;
use tokio::sync::mpsc;

use crate::transport::UploadEvent;

/// Multipart field name the backend reads the file from.
pub const UPLOAD_FIELD: &str = "file";

/// Build the multipart form for `file`, reporting progress on `progress_tx`.
pub fn progress_form(
    file: &SelectedFile,
    chunk_bytes: usize,
    progress_tx: mpsc::UnboundedSender<UploadEvent>,
) -> Result<Form, reqwest::Error> {
    let total = file.len();
    let chunks: Vec<Vec<u8>> = file
        .contents()
        .chunks(chunk_bytes.max(1))
        .map(<[u8]>::to_vec)
        .collect();

    let mut loaded = 0u64;
    let body = futures::stream::iter(chunks).map(move |chunk| {
        loaded += chunk.len() as u64;
        let _ = progress_tx.send(UploadEvent::Progress {
            loaded,
            total: Some(total),
        });
        Ok::<_, std::io::Error>(chunk)
    });

    let part = Part::stream_with_length(reqwest::Body::wrap_stream(body), total)
        .file_name(file.filename().to_string())
        .mime_str(file.kind().content_type())?;

    Ok(Form::new().part(UPLOAD_FIELD, part))
}
