//! # s7c7 Testkit
//!
//! Testing utilities for s7c7.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Recipient**: the inverse pipeline a download page runs, used to prove
//!   that published links really decrypt
//! - **Fixtures**: fixed passwords, paired in-memory stores, sample content
//! - **Generators**: Proptest strategies for property-based testing
//! - **Golden vectors**: known digests and content addresses
//!
//! ## Recipient
//!
//! ```rust
//! use s7c7_core::AlgorithmSpec;
//! use s7c7_testkit::{fixed_password, open_blob};
//!
//! let spec = AlgorithmSpec::default();
//! let password = fixed_password();
//! let blob = spec.transform(b"round trip", &password).unwrap();
//! assert_eq!(open_blob(&blob, &password, &spec).unwrap(), b"round trip");
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use s7c7_testkit::generators::{content, password};
//!
//! proptest! {
//!     #[test]
//!     fn blob_is_deterministic(data in content(4096), pw in password()) {
//!         // ...
//!     }
//! }
//! ```

pub mod fixtures;
pub mod generators;
pub mod recipient;
pub mod vectors;

pub use fixtures::{fixed_password, sample_content, TestFixture, DATA_URL, DOWNLOAD_URL, META_URL};
pub use recipient::{open_blob, open_record, RecipientError};
pub use vectors::{all_vectors, verify_all_vectors, GoldenVector};
