//! Domain error types
//!
//! This module defines the error hierarchy for Tabula. All errors are
//! domain-specific and don't expose third-party types; adapter modules
//! convert storage and codec errors at the boundary.

use thiserror::Error;

/// Main Tabula error type
///
/// This is the primary error type used throughout the application.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum TabulaError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Malformed or unrecognized request (4xx-class)
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Missing job record or staged artifact (404-class)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Artifact store errors
    #[error("Artifact store error: {0}")]
    Artifact(#[from] ArtifactError),

    /// Spreadsheet codec errors
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    /// Destination table write errors
    #[error("Table write error: {0}")]
    Table(String),

    /// Job record store errors
    #[error("Job store error: {0}")]
    Job(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl TabulaError {
    /// HTTP-class status code for surfacing this error to a caller
    ///
    /// Protocol faults map to 400, missing jobs/artifacts to 404, and
    /// everything else to 500.
    pub fn status_code(&self) -> u16 {
        match self {
            TabulaError::Protocol(_) => 400,
            TabulaError::NotFound(_) => 404,
            TabulaError::Artifact(ArtifactError::NotFound(_)) => 404,
            _ => 500,
        }
    }
}

/// Artifact store errors
///
/// Errors that occur when interacting with the blob storage holding staged
/// source files and in-progress or finalized export artifacts.
#[derive(Debug, Error)]
pub enum ArtifactError {
    /// Object does not exist at the given path
    #[error("Artifact not found: {0}")]
    NotFound(String),

    /// Failed to read an object
    #[error("Failed to read artifact {path}: {message}")]
    ReadFailed { path: String, message: String },

    /// Failed to write an object
    #[error("Failed to write artifact {path}: {message}")]
    WriteFailed { path: String, message: String },

    /// Failed to delete an object
    #[error("Failed to delete artifact {path}: {message}")]
    DeleteFailed { path: String, message: String },

    /// Failed to list objects under a prefix
    #[error("Failed to list artifacts under {prefix}: {message}")]
    ListFailed { prefix: String, message: String },

    /// Path could not be mapped into the store's namespace
    #[error("Invalid artifact path: {0}")]
    InvalidPath(String),
}

/// Spreadsheet codec errors
///
/// Errors that occur while decoding bytes into a workbook or encoding a
/// workbook back into bytes.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The bytes are not a readable workbook
    #[error("Unreadable workbook: {0}")]
    UnreadableWorkbook(String),

    /// The workbook has no worksheet to read
    #[error("Workbook has no worksheet")]
    MissingWorksheet,

    /// Failed to serialize the workbook
    #[error("Failed to encode workbook: {0}")]
    EncodeFailed(String),
}

// Conversion from std::io::Error
impl From<std::io::Error> for TabulaError {
    fn from(err: std::io::Error) -> Self {
        TabulaError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for TabulaError {
    fn from(err: serde_json::Error) -> Self {
        TabulaError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for TabulaError {
    fn from(err: toml::de::Error) -> Self {
        TabulaError::Configuration(format!("TOML parse error: {err}"))
    }
}
