//! Parse errors for the closed record enums.

use thiserror::Error;

/// Errors raised when a textual value does not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("Unknown request type '{0}' (expected IR, CPR or REVISION)")]
    UnknownRequestType(String),

    #[error("Unknown revision subtype '{0}' (expected IR_REVISION or CPR_REVISION)")]
    UnknownRevisionSubtype(String),

    #[error("Unknown archiver '{0}' (expected dc or engineer)")]
    UnknownArchivedBy(String),
}

impl RecordError {
    /// Stable error code for this error type.
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownRequestType(_) => "UNKNOWN_REQUEST_TYPE",
            Self::UnknownRevisionSubtype(_) => "UNKNOWN_REVISION_SUBTYPE",
            Self::UnknownArchivedBy(_) => "UNKNOWN_ARCHIVED_BY",
        }
    }
}
