//! RemoteStore trait: the abstract interface to a path-addressed file store.
//!
//! Implementations include the GitHub contents API (primary) and in-memory
//! (for tests).

use async_trait::async_trait;

use crate::error::Result;

/// Outcome of [`RemoteStoreExt::create_if_absent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upload {
    /// The file was written.
    Created,
    /// A file already exists at the path (idempotent, not an error).
    AlreadyExists,
}

/// Async interface to a remote store.
///
/// Paths are relative, `/`-separated, and never start with `/`.
/// Both calls must be safe to repeat with identical arguments.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Check whether a file exists at `path`.
    ///
    /// A failed probe is an error, not `false`.
    async fn exists(&self, path: &str) -> Result<bool>;

    /// Create a file at `path` with `content`.
    ///
    /// Non-success responses surface as `StoreError::Rejected`.
    async fn create(&self, path: &str, content: &[u8]) -> Result<()>;
}

/// Extension trait for common store patterns.
pub trait RemoteStoreExt: RemoteStore {
    /// Write `content` unless something already lives at `path`.
    ///
    /// Only safe for content-addressed paths, where an existing file is by
    /// construction identical to `content`.
    fn create_if_absent(
        &self,
        path: &str,
        content: &[u8],
    ) -> impl std::future::Future<Output = Result<Upload>> + Send;
}

impl<S: RemoteStore + ?Sized> RemoteStoreExt for S {
    async fn create_if_absent(&self, path: &str, content: &[u8]) -> Result<Upload> {
        if self.exists(path).await? {
            return Ok(Upload::AlreadyExists);
        }
        self.create(path, content).await?;
        Ok(Upload::Created)
    }
}
