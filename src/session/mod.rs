//! Session core
//!
//! - `state`: per-session conversation state machine
//! - `orchestrator`: wires storage, extraction and generation together
//! - `registry`: per-session isolation and locking

pub mod orchestrator;
pub mod registry;
pub mod state;

pub use orchestrator::{SessionOrchestrator, UploadOutcome};
pub use registry::SessionRegistry;
pub use state::{SessionPhase, SessionState};

use crate::storage::StorageError;

/// Session error types
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Session not found: {0}")]
    NotFound(String),

    #[error("No document is loaded for this session")]
    NoDocument,

    #[error("An answer is already being generated")]
    AnswerPending,

    #[error("Question must not be empty")]
    EmptyQuestion,

    #[error("Could not extract any text from '{0}'")]
    ExtractionFailed(String),

    #[error("Only PDF uploads are accepted, got '{0}'")]
    InvalidFileType(String),

    #[error("Upload did not contain a file field")]
    MissingFile,

    #[error("Invalid upload: {0}")]
    InvalidUpload(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl SessionError {
    /// HTTP status code for this error
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::NoDocument => StatusCode::CONFLICT,
            Self::AnswerPending => StatusCode::CONFLICT,
            Self::EmptyQuestion => StatusCode::BAD_REQUEST,
            Self::ExtractionFailed(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::InvalidFileType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::MissingFile => StatusCode::BAD_REQUEST,
            Self::InvalidUpload(_) => StatusCode::BAD_REQUEST,
            Self::Storage(StorageError::EmptyFile) => StatusCode::BAD_REQUEST,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
