// Domain errors - Error types for the domain layer

use thiserror::Error;

/// Domain-specific error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Invalid arguments provided
    #[error("Bad arguments: {0}")]
    BadArgs(String),
    /// Source file could not be found or opened
    #[error("File not found: {0}")]
    FileNotFound(String),
    /// Media probing failed
    #[error("Probe failed: {0}")]
    ProbeFail(String),
    /// The transform engine reported a failure
    #[error("Transform failed: {0}")]
    TransformFail(String),
    /// The transform engine went away without reporting a result
    #[error("Transform engine stopped without reporting a result")]
    EngineDropped,
    /// Filesystem operation failed (temp artifact or destination copy)
    #[error("Filesystem error: {0}")]
    FsFail(String),
    /// Destination folder is missing or not writable
    #[error("Permission denied: {0}")]
    PermissionDenied(String),
    /// Playback handle could not be acquired
    #[error("Playback unavailable: {0}")]
    PlaybackFail(String),
    /// Share action could not be started
    #[error("Share failed: {0}")]
    ShareFail(String),
}

impl From<std::io::Error> for DomainError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => DomainError::FileNotFound(err.to_string()),
            std::io::ErrorKind::PermissionDenied => DomainError::PermissionDenied(err.to_string()),
            _ => DomainError::FsFail(err.to_string()),
        }
    }
}
