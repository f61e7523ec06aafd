//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::sync::Arc;

use s7c7_core::{MetadataRecord, Password, PASSWORD_LEN};
use s7c7_store::MemoryStore;

/// Public base URL of the fixture metadata store.
pub const META_URL: &str = "https://meta.s7c7.test";

/// Public base URL of the fixture data store.
pub const DATA_URL: &str = "https://data.s7c7.test";

/// Base URL of the fixture download page.
pub const DOWNLOAD_URL: &str = "https://s7c7.test/d";

/// A deterministic password for reproducible blobs.
pub fn fixed_password() -> Password {
    let mut bytes = [0u8; PASSWORD_LEN];
    for (i, b) in bytes.iter_mut().enumerate() {
        *b = (i as u8).wrapping_mul(37).wrapping_add(11);
    }
    Password::from_bytes(bytes)
}

/// `len` bytes of deterministic, poorly compressible content.
pub fn sample_content(len: usize, seed: u64) -> Vec<u8> {
    // xorshift64*, seed 0 would stick at zero
    let mut state = seed | 1;
    (0..len)
        .map(|_| {
            state ^= state >> 12;
            state ^= state << 25;
            state ^= state >> 27;
            (state.wrapping_mul(0x2545_f491_4f6c_dd1d) >> 56) as u8
        })
        .collect()
}

/// A pair of in-memory stores standing in for the two repositories.
pub struct TestFixture {
    pub meta: Arc<MemoryStore>,
    pub data: Arc<MemoryStore>,
}

impl TestFixture {
    pub fn new() -> Self {
        Self {
            meta: Arc::new(MemoryStore::new()),
            data: Arc::new(MemoryStore::new()),
        }
    }

    /// Resolve a public URL against the fixture stores, as a browser would.
    pub fn fetch(&self, url: &str) -> Option<Vec<u8>> {
        if let Some(path) = url.strip_prefix(DATA_URL).and_then(|p| p.strip_prefix('/')) {
            return self.data.get(path);
        }
        if let Some(path) = url.strip_prefix(META_URL).and_then(|p| p.strip_prefix('/')) {
            return self.meta.get(path);
        }
        None
    }

    /// Parse the record stored at `path` on the metadata store.
    pub fn record_at(&self, path: &str) -> Option<MetadataRecord> {
        self.meta
            .get(path)
            .and_then(|bytes| MetadataRecord::from_json(&bytes).ok())
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use s7c7_store::RemoteStore;

    #[test]
    fn test_sample_content_is_deterministic() {
        assert_eq!(sample_content(64, 7), sample_content(64, 7));
        assert_ne!(sample_content(64, 7), sample_content(64, 8));
        assert_eq!(sample_content(1000, 0).len(), 1000);
    }

    #[tokio::test]
    async fn test_fetch_routes_by_prefix() {
        let fixture = TestFixture::new();
        fixture.data.create("ab/cd.bin", b"blob").await.unwrap();
        fixture.meta.create("q/qwe.json", b"{}").await.unwrap();

        assert_eq!(fixture.fetch(&format!("{DATA_URL}/ab/cd.bin")).unwrap(), b"blob");
        assert_eq!(fixture.fetch(&format!("{META_URL}/q/qwe.json")).unwrap(), b"{}");
        assert!(fixture.fetch("https://elsewhere/ab/cd.bin").is_none());
    }
}
