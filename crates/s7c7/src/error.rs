//! Error types for publishing.

use s7c7_core::CoreError;
use s7c7_store::StoreError;
use thiserror::Error;

/// Errors that can end a publish attempt.
#[derive(Debug, Error)]
pub enum PublishError {
    /// Pipeline or record error.
    #[error("core error: {0}")]
    Core(#[from] CoreError),

    /// Remote store error (probe or write).
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// Every slug candidate was taken.
    #[error("no free slug after {attempts} attempts")]
    SlugSpaceExhausted { attempts: u32 },

    /// A share link could not be parsed.
    #[error("invalid share link: {0}")]
    InvalidLink(String),

    /// Configuration is unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for publish operations.
pub type Result<T> = std::result::Result<T, PublishError>;
