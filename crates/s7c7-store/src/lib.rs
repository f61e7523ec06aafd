//! # s7c7 Store
//!
//! Remote storage abstraction for s7c7. Both the metadata store and the data
//! store are plain path-addressed file stores, reached through the
//! [`RemoteStore`] trait so the publisher never knows which backend it talks to.
//!
//! ## Key Types
//!
//! - [`RemoteStore`] - The async trait: `exists` and `create`
//! - [`GitHubStore`] - A repository reached through the GitHub contents API
//! - [`MemoryStore`] - In-memory store with call recording for tests
//! - [`Upload`] - Outcome of an idempotent write
//!
//! ## Usage
//!
//! ```rust,no_run
//! use s7c7_store::{Committer, GitHubStore, RemoteStore, RetryPolicy};
//!
//! async fn example() {
//!     let store = GitHubStore::new(
//!         "octocat/s7c7-meta",
//!         "ghp_example",
//!         Committer::default(),
//!         RetryPolicy::default(),
//!     )
//!     .unwrap();
//!
//!     if !store.exists("a/abc123.json").await.unwrap() {
//!         store.create("a/abc123.json", b"{}").await.unwrap();
//!     }
//! }
//! ```
//!
//! ## Design Notes
//!
//! - **Probe failures are errors**: a transport failure during `exists` is
//!   `StoreError::Transport`, never "absent".
//! - **No rollback**: a failed write leaves earlier writes in place.

pub mod error;
pub mod github;
pub mod memory;
pub mod traits;

pub use error::{Result, StoreError};
pub use github::{Committer, GitHubStore, RetryPolicy, DEFAULT_API_BASE};
pub use memory::{MemoryStore, ScriptedProbe, StoreCall};
pub use traits::{RemoteStore, RemoteStoreExt, Upload};
