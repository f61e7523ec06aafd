//! Metadata records: the JSON descriptor a share link resolves to.
//!
//! ```text
//! {
//!   "schema": 1,
//!   "alg": "deflate+aes+base64",
//!   "size": 10,
//!   "filename": "aGVsbG8udHh0",
//!   "hash": {"sha256": "...", "sha512": "..."},
//!   "data": {"raw": "..."} | {"base64": "..."} | {"fetch": "https://..."}
//! }
//! ```
//!
//! Content whose ORIGINAL size is at most [`INLINE_THRESHOLD`] bytes has its
//! encrypted blob embedded in `data`; anything larger is stored separately
//! and referenced by URL.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::digest::ContentDigests;
use crate::error::{CoreError, Result};

/// Current record schema version.
pub const SCHEMA_VERSION: u32 = 1;

/// Largest original size (in bytes) whose blob is embedded in the record.
pub const INLINE_THRESHOLD: usize = 4096;

/// Where the blob lives, from the record's point of view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSection {
    /// Blob embedded as text; every byte is printable ASCII.
    Raw(String),
    /// Blob embedded as standard base64.
    Base64(String),
    /// Blob stored on the data store at this URL.
    Fetch(String),
}

impl DataSection {
    /// Embed `blob`, as raw text when it is printable ASCII.
    pub fn inline(blob: &[u8]) -> Self {
        if is_printable_ascii(blob) {
            DataSection::Raw(blob.iter().map(|&b| char::from(b)).collect())
        } else {
            DataSection::Base64(STANDARD.encode(blob))
        }
    }

    /// The embedded blob bytes, or `None` for a fetch reference.
    pub fn inline_bytes(&self) -> Result<Option<Vec<u8>>> {
        match self {
            DataSection::Raw(text) => Ok(Some(text.as_bytes().to_vec())),
            DataSection::Base64(text) => STANDARD
                .decode(text)
                .map(Some)
                .map_err(|e| CoreError::InvalidBase64(e.to_string())),
            DataSection::Fetch(_) => Ok(None),
        }
    }
}

fn is_printable_ascii(bytes: &[u8]) -> bool {
    bytes.iter().all(|&b| (0x20..=0x7e).contains(&b))
}

/// How the composer should describe the blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageDecision<'a> {
    /// Embed these encrypted bytes.
    Inline(&'a [u8]),
    /// The blob was written to the data store; this is its fetch URL.
    Remote(&'a str),
}

impl StorageDecision<'_> {
    /// Whether content of `original_len` bytes is embedded.
    pub const fn is_inline(original_len: usize) -> bool {
        original_len <= INLINE_THRESHOLD
    }
}

/// The descriptor written to the metadata store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataRecord {
    pub schema: u32,
    pub alg: String,
    pub size: u64,
    /// Standard base64 of the UTF-8 filename.
    pub filename: String,
    pub hash: ContentDigests,
    pub data: DataSection,
}

impl MetadataRecord {
    /// Build the record for `original` content.
    ///
    /// Digests are always over the original bytes, never the blob.
    pub fn compose(
        original: &[u8],
        filename: &str,
        alg: &str,
        storage: StorageDecision<'_>,
    ) -> Self {
        let data = match storage {
            StorageDecision::Inline(blob) => DataSection::inline(blob),
            StorageDecision::Remote(url) => DataSection::Fetch(url.to_string()),
        };

        Self {
            schema: SCHEMA_VERSION,
            alg: alg.to_string(),
            size: original.len() as u64,
            filename: STANDARD.encode(filename.as_bytes()),
            hash: ContentDigests::compute(original),
            data,
        }
    }

    /// Decode the filename field.
    pub fn decoded_filename(&self) -> Result<String> {
        let bytes = STANDARD
            .decode(&self.filename)
            .map_err(|e| CoreError::InvalidBase64(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| CoreError::Serialization(e.to_string()))
    }

    /// Serialize to JSON bytes.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| CoreError::Serialization(e.to_string()))
    }

    /// Parse from JSON bytes.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| CoreError::Serialization(e.to_string()))
    }
}
