use sheetflow_client::TransportError;
use sheetflow_core::CoreError;

/// Errors returned by workflow operations.
///
/// Validation and transport errors are also surfaced to the user as a
/// notice. [`WorkflowError::InsertInFlight`] and
/// [`WorkflowError::Superseded`] are silent. The `Result` exists so callers
/// can branch on the outcome.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    /// Rejected locally before any network call.
    #[error(transparent)]
    Validation(#[from] CoreError),

    /// The backend call failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Another insertion is still outstanding; the call was a no-op.
    #[error("An insertion is already in progress")]
    InsertInFlight,

    /// A newer request of the same kind was issued; this response was dropped.
    #[error("Response discarded: superseded by a newer request")]
    Superseded,
}
