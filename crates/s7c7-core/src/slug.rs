//! Slugs: short random public identifiers for metadata records.
//!
//! A slug carries no information about the content. Its only job is to be
//! unguessable enough and to name a free path on the metadata store; the
//! free-path check lives with the allocator, not here.

use rand::distributions::Alphanumeric;
use rand::{CryptoRng, Rng};
use std::fmt;

use crate::error::{CoreError, Result};

/// Slug length used when the configuration does not override it.
pub const DEFAULT_SLUG_LEN: usize = 6;

/// A random alphanumeric identifier (`[A-Za-z0-9]+`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Slug(String);

impl Slug {
    /// Generate a slug of `len` characters from the thread-local CSPRNG.
    pub fn generate(len: usize) -> Result<Self> {
        Self::generate_with(&mut rand::thread_rng(), len)
    }

    /// Generate a slug of `len` characters from `rng`.
    ///
    /// Each character is uniform over the 62-symbol alphanumeric alphabet.
    pub fn generate_with<R: Rng + CryptoRng + ?Sized>(rng: &mut R, len: usize) -> Result<Self> {
        if len == 0 {
            return Err(CoreError::InvalidSlug("length must be at least 1".into()));
        }
        let slug: String = (0..len).map(|_| char::from(rng.sample(Alphanumeric))).collect();
        Ok(Self(slug))
    }

    /// Parse an existing slug, e.g. from a share link.
    pub fn parse(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(CoreError::InvalidSlug("empty".into()));
        }
        if !s.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(CoreError::InvalidSlug(format!("non-alphanumeric slug {s:?}")));
        }
        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Path of the metadata record on the metadata store:
    /// `<first char>/<slug>.json`.
    pub fn metadata_path(&self) -> String {
        format!("{}/{}.json", &self.0[..1], self.0)
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
