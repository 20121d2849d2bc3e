//! Client-side file selection rules.
//!
//! Only spreadsheet files may be selected for upload. The check is a
//! case-sensitive suffix match on the file name; the backend performs its
//! own validation of the actual content.

use crate::error::CoreError;

/// Spreadsheet formats accepted for upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpreadsheetKind {
    /// Legacy binary workbook (`.xls`).
    Xls,
    /// Office Open XML workbook (`.xlsx`).
    Xlsx,
}

impl SpreadsheetKind {
    /// Detect the spreadsheet kind from a file name suffix.
    ///
    /// Returns `None` for anything that does not end in `.xls` or `.xlsx`.
    /// The match is case-sensitive, so `REPORT.XLSX` is not accepted.
    pub fn from_filename(filename: &str) -> Option<Self> {
        if filename.ends_with(".xlsx") {
            Some(Self::Xlsx)
        } else if filename.ends_with(".xls") {
            Some(Self::Xls)
        } else {
            None
        }
    }

    /// MIME type sent with the multipart upload.
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Xls => "application/vnd.ms-excel",
            Self::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        }
    }
}

/// Validate that `filename` names a spreadsheet the backend accepts.
pub fn validate_spreadsheet_name(filename: &str) -> Result<SpreadsheetKind, CoreError> {
    SpreadsheetKind::from_filename(filename)
        .ok_or_else(|| CoreError::UnsupportedFileType(filename.to_string()))
}

/// A file that passed selection validation and is ready for upload.
///
/// Construction goes through [`SelectedFile::new`], so holding one is
/// proof that the name carries an accepted suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    filename: String,
    kind: SpreadsheetKind,
    contents: Vec<u8>,
}

impl SelectedFile {
    /// Validate the name and wrap the file contents.
    pub fn new(filename: impl Into<String>, contents: Vec<u8>) -> Result<Self, CoreError> {
        let filename = filename.into();
        let kind = validate_spreadsheet_name(&filename)?;
        Ok(Self {
            filename,
            kind,
            contents,
        })
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn kind(&self) -> SpreadsheetKind {
        self.kind
    }

    pub fn contents(&self) -> &[u8] {
        &self.contents
    }

    /// Size of the file contents in bytes.
    pub fn len(&self) -> u64 {
        self.contents.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }
}
