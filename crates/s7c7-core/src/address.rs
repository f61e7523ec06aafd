//! Content-addressed storage paths for encrypted blobs.
//!
//! The path is the SHA-512 hex of the blob split into three segments,
//! `<2>/<8>/<118>.bin`, so no directory on the data store grows past 256
//! entries at the top level. Identical blobs land on identical paths, which
//! is how re-publishing the same ciphertext deduplicates.

use std::fmt;

use crate::digest::sha512_hex;

/// Width of the first path segment.
const FANOUT_PREFIX: usize = 2;

/// Width of the second path segment.
const FANOUT_MIDDLE: usize = 8;

/// File extension for stored blobs.
pub const BLOB_EXTENSION: &str = "bin";

/// Storage path of an encrypted blob on the data store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlobPath(String);

impl BlobPath {
    /// Address `blob` by its SHA-512 digest.
    pub fn of(blob: &[u8]) -> Self {
        let digest = sha512_hex(blob);
        let (prefix, rest) = digest.split_at(FANOUT_PREFIX);
        let (middle, tail) = rest.split_at(FANOUT_MIDDLE);
        Self(format!("{prefix}/{middle}/{tail}.{BLOB_EXTENSION}"))
    }

    /// Get the path as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The digest this path was derived from.
    pub fn digest_hex(&self) -> String {
        self.0
            .trim_end_matches(BLOB_EXTENSION)
            .trim_end_matches('.')
            .replace('/', "")
    }
}

impl fmt::Display for BlobPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for BlobPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
