//! Error types for the store module.

use thiserror::Error;

/// Errors that can occur during remote store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The request never produced a response (DNS, connect, timeout, ...).
    #[error("transport error on {path}: {message}")]
    Transport { path: String, message: String },

    /// An existence probe got a status that is neither "found" nor "not found".
    #[error("unexpected status {status} probing {path}")]
    UnexpectedStatus { path: String, status: u16 },

    /// The store refused a write. `body` is the response payload.
    #[error("write to {path} rejected with status {status}: {body}")]
    Rejected {
        path: String,
        status: u16,
        body: String,
    },

    /// The client could not be constructed.
    #[error("invalid store configuration: {0}")]
    InvalidConfig(String),
}

impl StoreError {
    /// Whether the failure happened below HTTP.
    pub fn is_transport(&self) -> bool {
        matches!(self, StoreError::Transport { .. })
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
