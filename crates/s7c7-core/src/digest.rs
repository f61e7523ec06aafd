//! SHA-2 digests, rendered as lowercase hex.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256, Sha512};

/// Hex SHA-256 of `data`.
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Hex SHA-512 of `data`.
pub fn sha512_hex(data: &[u8]) -> String {
    hex::encode(Sha512::digest(data))
}

/// Integrity digests of the original (pre-pipeline) content.
///
/// Serializes as the record's `hash` object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentDigests {
    pub sha256: String,
    pub sha512: String,
}

impl ContentDigests {
    pub fn compute(data: &[u8]) -> Self {
        Self {
            sha256: sha256_hex(data),
            sha512: sha512_hex(data),
        }
    }

    /// Check `data` against both digests.
    pub fn matches(&self, data: &[u8]) -> bool {
        *self == Self::compute(data)
    }
}
