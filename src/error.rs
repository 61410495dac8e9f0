//! Error types for Chirpy
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

/// All error types that can occur in Chirpy
#[derive(Debug, Error)]
pub enum ChirpyError {
    /// Caller-supplied chirp body was rejected
    #[error("Validation failed: {0}")]
    Validation(String),

    /// No chirp with this id exists
    #[error("Chirp not found: {0}")]
    NotFound(u64),

    /// Backing file unreadable, unwritable or malformed
    #[error("Storage error: {0}")]
    Storage(String),

    /// IPC communication error
    #[error("IPC error: {0}")]
    Ipc(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ChirpyError {
    /// True for failures the caller caused (bad body, unknown id).
    pub fn is_client_error(&self) -> bool {
        matches!(self, ChirpyError::Validation(_) | ChirpyError::NotFound(_))
    }
}

/// Result type alias for Chirpy operations
pub type Result<T> = std::result::Result<T, ChirpyError>;
