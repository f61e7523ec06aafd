//! # s7c7
//!
//! Anonymous file sharing through public repositories used as free object
//! storage. A file is compressed, encrypted, and encoded; small results are
//! embedded in a metadata record, large ones stored separately under their
//! content address. The record lands at a random slug, and the share link
//! carries the slug plus the decryption key in its fragment:
//!
//! ```text
//! https://download.example/Qx7aZ0#<url-safe base64 of nonce || key>
//! ```
//!
//! The host serving the record never sees the key; holding the link is
//! necessary and sufficient to decrypt.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use s7c7::{PublishConfig, Publisher};
//! use s7c7::store::{Committer, GitHubStore, RetryPolicy};
//!
//! async fn example() {
//!     let meta = GitHubStore::new("me/meta", "token", Committer::default(), RetryPolicy::default()).unwrap();
//!     let data = GitHubStore::new("me/data", "token", Committer::default(), RetryPolicy::default()).unwrap();
//!     let config = PublishConfig::new(
//!         "https://raw.githubusercontent.com/me/meta/main",
//!         "https://raw.githubusercontent.com/me/data/main",
//!         "https://s7c7.example/d",
//!     );
//!
//!     let publisher = Publisher::new(meta, data, config).unwrap();
//!     let receipt = publisher.publish("hello.txt", b"hello world").await.unwrap();
//!     println!("{}", receipt.link);
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `s7c7::core` - Pipeline, addresses, slugs, records
//! - `s7c7::store` - Remote store trait and implementations

pub mod allocator;
pub mod config;
pub mod error;
pub mod link;
pub mod publisher;

// Re-export component crates
pub use s7c7_core as core;
pub use s7c7_store as store;

pub use allocator::{Probe, SlugAllocator};
pub use config::{PublishConfig, DEFAULT_SLUG_MAX_ATTEMPTS};
pub use error::{PublishError, Result};
pub use link::ShareLink;
pub use publisher::{BlobPlacement, PublishReceipt, Publisher};

// Re-export commonly used core types
pub use s7c7_core::{AlgorithmSpec, DataSection, MetadataRecord, Password, Slug, Stage};
