//! Response envelope handling.
//!
//! The backend wraps most payloads in `{status, type, title, message,
//! data, errors}`, but not all deployments do. Everything here is lenient:
//! a missing or malformed envelope degrades to an empty result instead of
//! an error.

use serde::Deserialize;
use serde_json::Value;
use sheetflow_core::files::FileRecord;
use sheetflow_core::preview::SheetPreview;

use crate::transport::{InsertReceipt, UploadReceipt};

/// Standard backend response envelope. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiEnvelope {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub errors: Option<Value>,
}

impl ApiEnvelope {
    /// Read an envelope from an arbitrary body; non-objects yield the default.
    pub fn from_value(body: &Value) -> Self {
        if !body.is_object() {
            return Self::default();
        }
        serde_json::from_value(body.clone()).unwrap_or_default()
    }

    /// A field of `data`, if both exist.
    pub fn data_field(&self, key: &str) -> Option<&Value> {
        self.data.as_ref()?.get(key)
    }
}

/// Extract an array either from `data.<key>` or from a bare array body.
pub fn unwrap_array(body: &Value, key: &str) -> Vec<Value> {
    match body {
        Value::Array(items) => items.clone(),
        _ => body
            .get("data")
            .and_then(|data| data.get(key))
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default(),
    }
}

/// Parse the catalog list, skipping entries that are not file records.
pub fn parse_file_list(body: &Value) -> Vec<FileRecord> {
    unwrap_array(body, "files")
        .into_iter()
        .filter_map(|entry| match serde_json::from_value::<FileRecord>(entry) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping malformed file record");
                None
            }
        })
        .collect()
}

/// Parse a preview body: an array of `{nombre, mensaje?, datos}`.
///
/// A non-array body yields no sheets; malformed sheets are skipped.
pub fn parse_preview(body: &Value) -> Vec<SheetPreview> {
    let Some(sheets) = body.as_array() else {
        tracing::warn!("Preview response is not an array");
        return Vec::new();
    };

    sheets
        .iter()
        .filter_map(|sheet| match serde_json::from_value::<SheetPreview>(sheet.clone()) {
            Ok(preview) => Some(preview),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping malformed sheet preview");
                None
            }
        })
        .collect()
}

pub fn parse_upload_receipt(body: &Value) -> UploadReceipt {
    let envelope = ApiEnvelope::from_value(body);
    UploadReceipt {
        file_id: envelope.data_field("file_id").and_then(Value::as_i64),
        filename: envelope
            .data_field("filename")
            .and_then(Value::as_str)
            .map(str::to_string),
        message: envelope.message,
    }
}

pub fn parse_insert_receipt(body: &Value) -> InsertReceipt {
    let envelope = ApiEnvelope::from_value(body);
    InsertReceipt {
        total_inserted: envelope.data_field("total_inserted").and_then(Value::as_u64),
        message: envelope.message,
    }
}
