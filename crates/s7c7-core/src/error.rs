//! Error types for s7c7 core.

use thiserror::Error;

/// Errors raised by the pure pipeline and record primitives.
#[derive(Debug, Error)]
pub enum CoreError {
    /// zlib deflate failed.
    #[error("compression failed: {0}")]
    Compression(String),

    /// zlib inflate failed or the stream was truncated.
    #[error("decompression failed: {0}")]
    Decompression(String),

    /// Sealing a secretbox failed.
    #[error("encryption failed: {0}")]
    Encryption(String),

    /// Authentication of a secretbox failed (wrong key or tampered blob).
    #[error("decryption failed: {0}")]
    Decryption(String),

    /// Input was not valid standard or URL-safe base64.
    #[error("invalid base64: {0}")]
    InvalidBase64(String),

    /// Password material has the wrong length.
    #[error("invalid password: expected {expected} bytes, got {actual}")]
    InvalidPassword { expected: usize, actual: usize },

    /// Slug is empty, zero-length, or has non-alphanumeric characters.
    #[error("invalid slug: {0}")]
    InvalidSlug(String),

    /// Metadata record could not be serialized or parsed.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
