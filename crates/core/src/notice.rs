//! User-facing notices.
//!
//! Every workflow outcome the user should see (validation rejections,
//! transport failures, completions) is expressed as a [`Notice`]. The
//! presentation layer decides how to show it.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, text)
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, text)
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, text)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, text)
    }

    /// One consolidated warning naming every empty sheet.
    pub fn empty_sheets(names: &[String]) -> Self {
        Self::warning(format!(
            "The following sheets are empty:\n{}",
            names.join(", ")
        ))
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

pub const MSG_INVALID_FILE_TYPE: &str = "Only .xls or .xlsx files are allowed";
pub const MSG_NO_SELECTION: &str = "Select a file first";
pub const MSG_UPLOAD_OK: &str = "File uploaded successfully";
pub const MSG_UPLOAD_FAILED: &str = "Error uploading file";
pub const MSG_LOAD_FAILED: &str = "Error loading files";
pub const MSG_PREVIEW_FAILED: &str = "Error fetching preview";
pub const MSG_INSERT_OK: &str = "Data inserted successfully";
pub const MSG_INSERT_FAILED: &str = "Error inserting data";
pub const MSG_DELETE_PROMPT: &str = "Do you want to delete this file?";
pub const MSG_DELETE_CANCELLED: &str = "Deletion cancelled";
pub const MSG_DELETE_FAILED: &str = "Error deleting file";
