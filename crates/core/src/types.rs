/// Backend file identifiers are integer primary keys.
pub type FileId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// A single preview row: column name to scalar cell value.
pub type PreviewRow = serde_json::Map<String, serde_json::Value>;
