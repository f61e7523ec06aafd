//! Per-publish configuration.

use s7c7_core::{AlgorithmSpec, DEFAULT_SLUG_LEN};

use crate::error::{PublishError, Result};

/// Default bound on slug candidates tried before giving up.
pub const DEFAULT_SLUG_MAX_ATTEMPTS: u32 = 16;

/// Immutable settings for a [`Publisher`](crate::Publisher).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishConfig {
    /// Public base URL serving the metadata store.
    pub meta_url: String,
    /// Public base URL serving the data store; prefixes fetch references.
    pub data_url: String,
    /// Base URL of the download page; prefixes share links.
    pub download_url: String,
    /// Pipeline applied to content.
    pub algorithms: AlgorithmSpec,
    /// Slug length.
    pub slug_len: usize,
    /// Slug candidates tried before failing.
    pub slug_max_attempts: u32,
}

impl PublishConfig {
    /// Create a config with default pipeline and slug settings.
    ///
    /// Trailing slashes are stripped from the URLs.
    pub fn new(meta_url: &str, data_url: &str, download_url: &str) -> Self {
        Self {
            meta_url: meta_url.trim_end_matches('/').to_string(),
            data_url: data_url.trim_end_matches('/').to_string(),
            download_url: download_url.trim_end_matches('/').to_string(),
            algorithms: AlgorithmSpec::default(),
            slug_len: DEFAULT_SLUG_LEN,
            slug_max_attempts: DEFAULT_SLUG_MAX_ATTEMPTS,
        }
    }

    pub fn with_algorithms(mut self, algorithms: AlgorithmSpec) -> Self {
        self.algorithms = algorithms;
        self
    }

    pub fn with_slug_len(mut self, slug_len: usize) -> Self {
        self.slug_len = slug_len;
        self
    }

    pub fn with_slug_max_attempts(mut self, attempts: u32) -> Self {
        self.slug_max_attempts = attempts;
        self
    }

    /// Reject settings that can never publish.
    pub fn validate(&self) -> Result<()> {
        for (name, url) in [
            ("meta_url", &self.meta_url),
            ("data_url", &self.data_url),
            ("download_url", &self.download_url),
        ] {
            if url.is_empty() {
                return Err(PublishError::InvalidConfig(format!("{name} is empty")));
            }
        }
        if self.slug_len == 0 {
            return Err(PublishError::InvalidConfig("slug length must be at least 1".into()));
        }
        if self.slug_max_attempts == 0 {
            return Err(PublishError::InvalidConfig(
                "slug attempts must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
