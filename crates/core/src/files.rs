//! File catalog records and their derived lifecycle status.

use serde::{Deserialize, Deserializer, Serialize};

use crate::types::{FileId, Timestamp};

/// One uploaded spreadsheet as reported by the backend.
///
/// Records are value objects: the catalog replaces the whole list on
/// every refresh instead of patching entries in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    pub id: FileId,
    pub filename: String,
    /// Size in bytes, when the backend reports it.
    #[serde(default)]
    pub filesize: Option<u64>,
    /// MIME type recorded at upload time.
    #[serde(default)]
    pub filetype: Option<String>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub upload_date: Option<Timestamp>,
}

impl FileRecord {
    pub fn new(id: FileId, filename: impl Into<String>) -> Self {
        Self {
            id,
            filename: filename.into(),
            filesize: None,
            filetype: None,
            upload_date: None,
        }
    }
}

/// Accept RFC 3339 timestamps and naive ISO-8601 timestamps (assumed UTC).
///
/// Anything else becomes `None` so one odd date never drops the record.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<Timestamp>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    let Some(serde_json::Value::String(text)) = raw else {
        return Ok(None);
    };

    if let Ok(parsed) = chrono::DateTime::parse_from_rfc3339(&text) {
        return Ok(Some(parsed.with_timezone(&chrono::Utc)));
    }

    Ok(
        chrono::NaiveDateTime::parse_from_str(&text, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc()),
    )
}

/// Lifecycle of a file as seen from the client.
///
/// The status is never stored by the backend. It is recomputed from the
/// operations that have completed for the file, and it only moves forward:
/// previewing an already inserted file leaves it `Inserted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    Selected,
    Uploading,
    Uploaded,
    Previewed,
    Inserted,
    Deleted,
}

impl FileStatus {
    /// Apply a completed milestone, keeping whichever status is further along.
    ///
    /// `Deleted` is terminal.
    pub fn advance(self, milestone: FileStatus) -> FileStatus {
        if self == Self::Deleted {
            return self;
        }
        self.max(milestone)
    }

    /// Stable string representation matching serde's `rename_all = "snake_case"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Selected => "selected",
            Self::Uploading => "uploading",
            Self::Uploaded => "uploaded",
            Self::Previewed => "previewed",
            Self::Inserted => "inserted",
            Self::Deleted => "deleted",
        }
    }
}

impl std::fmt::Display for FileStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A catalog row: the backend record plus its derived status.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogEntry {
    pub record: FileRecord,
    pub status: FileStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_only_moves_forward() {
        let status = FileStatus::Uploaded
            .advance(FileStatus::Inserted)
            .advance(FileStatus::Previewed);
        assert_eq!(status, FileStatus::Inserted);
    }

    #[test]
    fn deleted_is_terminal() {
        assert_eq!(
            FileStatus::Deleted.advance(FileStatus::Previewed),
            FileStatus::Deleted
        );
        assert_eq!(
            FileStatus::Previewed.advance(FileStatus::Deleted),
            FileStatus::Deleted
        );
    }

    #[test]
    fn record_parses_backend_shape() {
        let record: FileRecord = serde_json::from_value(json!({
            "id": 3,
            "filename": "ventas.xlsx",
            "filepath": "/app/uploads/ventas.xlsx",
            "filesize": 2048,
            "filetype": "application/vnd.ms-excel",
            "upload_date": "2024-05-01T10:00:00.123456+00:00"
        }))
        .unwrap();

        assert_eq!(record.id, 3);
        assert_eq!(record.filename, "ventas.xlsx");
        assert_eq!(record.filesize, Some(2048));
        assert!(record.upload_date.is_some());
    }

    #[test]
    fn naive_timestamp_is_read_as_utc() {
        let record: FileRecord = serde_json::from_value(json!({
            "id": 1,
            "filename": "a.xls",
            "upload_date": "2024-05-01T10:00:00"
        }))
        .unwrap();
        let date = record.upload_date.unwrap();
        assert_eq!(date.to_rfc3339(), "2024-05-01T10:00:00+00:00");
    }

    #[test]
    fn unparseable_timestamp_degrades_to_none() {
        let record: FileRecord = serde_json::from_value(json!({
            "id": 1,
            "filename": "a.xls",
            "upload_date": "yesterday"
        }))
        .unwrap();
        assert!(record.upload_date.is_none());
    }

    #[test]
    fn minimal_record_has_no_metadata() {
        let record: FileRecord =
            serde_json::from_value(json!({"id": 9, "filename": "b.xlsx"})).unwrap();
        assert_eq!(record, FileRecord::new(9, "b.xlsx"));
    }
}
