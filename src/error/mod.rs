//! Error handling module for QuickCut

use thiserror::Error;

use crate::domain::errors::DomainError;

/// Main error type for QuickCut operations outside the export flow
#[derive(Error, Debug)]
pub enum QuickCutError {
    /// Invalid time format
    #[error("Invalid time format: {time}. Expected HH:MM:SS.ms, MM:SS.ms, or seconds")]
    InvalidTimeFormat { time: String },

    /// Configuration could not be loaded or failed validation
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// Domain error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// TOML parse error
    #[error("Failed to parse config: {0}")]
    TomlError(#[from] toml::de::Error),
}

/// Result type alias for QuickCut operations
pub type QuickCutResult<T> = std::result::Result<T, QuickCutError>;
