//! # s7c7 Core
//!
//! Pure primitives for s7c7: the cipher pipeline, content addressing,
//! share passwords, slugs, and metadata records.
//!
//! This crate contains no I/O, no storage, no networking. Everything here is
//! a deterministic function of its inputs, except for the two generators
//! ([`Password::generate`] and [`Slug::generate`]) which draw from the
//! thread-local CSPRNG.
//!
//! ## Key Types
//!
//! - [`AlgorithmSpec`] - Parsed, ordered list of pipeline [`Stage`]s
//! - [`Password`] - Ephemeral nonce + key material carried in the link fragment
//! - [`BlobPath`] - Content-addressed storage path of an encrypted blob
//! - [`Slug`] - Random public identifier of a metadata record
//! - [`MetadataRecord`] - The descriptor written to the metadata store
//!
//! ## Pipeline
//!
//! ```rust
//! use s7c7_core::{AlgorithmSpec, Password};
//!
//! let spec = AlgorithmSpec::parse("deflate+aes+base64");
//! let password = Password::generate();
//! let blob = spec.transform(b"hello world", &password).unwrap();
//! assert!(blob.is_ascii());
//! ```

pub mod address;
pub mod digest;
pub mod error;
pub mod metadata;
pub mod password;
pub mod pipeline;
pub mod slug;

pub use address::BlobPath;
pub use digest::{sha256_hex, sha512_hex, ContentDigests};
pub use error::{CoreError, Result};
pub use metadata::{DataSection, MetadataRecord, StorageDecision, INLINE_THRESHOLD, SCHEMA_VERSION};
pub use password::{Password, KEY_LEN, NONCE_LEN, PASSWORD_LEN};
pub use pipeline::{AlgorithmSpec, Stage, DEFAULT_ALGORITHMS};
pub use slug::{Slug, DEFAULT_SLUG_LEN};
