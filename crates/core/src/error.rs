#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("Unsupported file type: {0} (only .xls or .xlsx files are allowed)")]
    UnsupportedFileType(String),

    #[error("No file selected")]
    NoSelection,

    #[error("Not confirmed: {0}")]
    NotConfirmed(String),
}
