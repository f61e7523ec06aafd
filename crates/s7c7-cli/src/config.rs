//! The on-disk client configuration (`config.json`).
//!
//! A missing file, or one with any connection field unset, is
//! *uninitialized*: the caller writes the current values back as a template
//! and stops before touching the network.

use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use s7c7::core::{AlgorithmSpec, DEFAULT_ALGORITHMS, DEFAULT_SLUG_LEN};
use s7c7::store::{Committer, GitHubStore, RetryPolicy, StoreError};
use s7c7::PublishConfig;

/// Errors loading or applying the client configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot serialize configuration: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("configuration is missing {0}")]
    Uninitialized(&'static str),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Client settings, as stored in `config.json`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub auth_token: Option<String>,
    /// Repository holding metadata records (`owner/name`).
    pub meta_repo: Option<String>,
    /// Repository holding large blobs (`owner/name`).
    pub data_repo: Option<String>,
    /// Public base URL of the metadata repository's files.
    pub meta_url: Option<String>,
    /// Public base URL of the data repository's files.
    pub data_url: Option<String>,
    /// Base URL of the download page.
    pub download_url: Option<String>,
    pub committer: Committer,
    pub encrypt_algorithms: String,
    pub meta_slug_len: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            auth_token: None,
            meta_repo: None,
            data_repo: None,
            meta_url: None,
            data_url: None,
            download_url: None,
            committer: Committer::default(),
            encrypt_algorithms: DEFAULT_ALGORITHMS.to_string(),
            meta_slug_len: DEFAULT_SLUG_LEN,
        }
    }
}

impl ClientConfig {
    /// Load from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write the current values to `path` as pretty-printed JSON.
    pub fn write_template(&self, path: &Path) -> Result<(), ConfigError> {
        let mut text = serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        text.push('\n');
        fs::write(path, text).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The first connection field that is unset or empty.
    pub fn missing_field(&self) -> Option<&'static str> {
        [
            ("auth_token", &self.auth_token),
            ("meta_repo", &self.meta_repo),
            ("data_repo", &self.data_repo),
            ("meta_url", &self.meta_url),
            ("data_url", &self.data_url),
            ("download_url", &self.download_url),
        ]
        .into_iter()
        .find(|(_, value)| value.as_deref().map_or(true, str::is_empty))
        .map(|(name, _)| name)
    }

    fn require<'a>(name: &'static str, value: &'a Option<String>) -> Result<&'a str, ConfigError> {
        value
            .as_deref()
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::Uninitialized(name))
    }

    /// Settings for the publisher.
    pub fn publish_config(&self) -> Result<PublishConfig, ConfigError> {
        let config = PublishConfig::new(
            Self::require("meta_url", &self.meta_url)?,
            Self::require("data_url", &self.data_url)?,
            Self::require("download_url", &self.download_url)?,
        )
        .with_algorithms(AlgorithmSpec::parse(&self.encrypt_algorithms))
        .with_slug_len(self.meta_slug_len);
        Ok(config)
    }

    /// Stores for the metadata and data repositories.
    pub fn stores(&self) -> Result<(GitHubStore, GitHubStore), ConfigError> {
        let token = Self::require("auth_token", &self.auth_token)?;
        let meta = GitHubStore::new(
            Self::require("meta_repo", &self.meta_repo)?,
            token,
            self.committer.clone(),
            RetryPolicy::default(),
        )?;
        let data = GitHubStore::new(
            Self::require("data_repo", &self.data_repo)?,
            token,
            self.committer.clone(),
            RetryPolicy::default(),
        )?;
        Ok((meta, data))
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("auth_token", &self.auth_token.as_ref().map(|_| "<redacted>"))
            .field("meta_repo", &self.meta_repo)
            .field("data_repo", &self.data_repo)
            .field("meta_url", &self.meta_url)
            .field("data_url", &self.data_url)
            .field("download_url", &self.download_url)
            .field("committer", &self.committer)
            .field("encrypt_algorithms", &self.encrypt_algorithms)
            .field("meta_slug_len", &self.meta_slug_len)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> ClientConfig {
        ClientConfig {
            auth_token: Some("ghp_token".into()),
            meta_repo: Some("me/meta".into()),
            data_repo: Some("me/data".into()),
            meta_url: Some("https://raw.example/me/meta/main".into()),
            data_url: Some("https://raw.example/me/data/main".into()),
            download_url: Some("https://s7c7.example/d".into()),
            ..ClientConfig::default()
        }
    }

    #[test]
    fn test_missing_file_is_uninitialized_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = ClientConfig::load(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.missing_field(), Some("auth_token"));
    }

    #[test]
    fn test_template_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        ClientConfig::default().write_template(&path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"auth_token\": null"));
        assert!(text.contains("\"encrypt_algorithms\": \"deflate+aes+base64\""));
        assert!(text.contains("\"meta_slug_len\": 6"));
        assert!(text.contains("github-actions[bot]"));

        assert_eq!(ClientConfig::load(&path).unwrap(), ClientConfig::default());
    }

    #[test]
    fn test_partial_file_takes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"auth_token": "t", "meta_repo": "me/meta"}"#).unwrap();

        let config = ClientConfig::load(&path).unwrap();
        assert_eq!(config.auth_token.as_deref(), Some("t"));
        assert_eq!(config.meta_slug_len, 6);
        assert_eq!(config.missing_field(), Some("data_repo"));
    }

    #[test]
    fn test_empty_string_counts_as_missing() {
        let mut config = complete();
        assert_eq!(config.missing_field(), None);
        config.download_url = Some(String::new());
        assert_eq!(config.missing_field(), Some("download_url"));
        assert!(matches!(
            config.publish_config(),
            Err(ConfigError::Uninitialized("download_url"))
        ));
    }

    #[test]
    fn test_publish_config_and_stores() {
        let mut config = complete();
        config.encrypt_algorithms = "aes+base64".into();
        config.meta_slug_len = 8;

        let publish = config.publish_config().unwrap();
        assert_eq!(publish.algorithms.as_str(), "aes+base64");
        assert_eq!(publish.slug_len, 8);
        assert_eq!(publish.download_url, "https://s7c7.example/d");

        let (meta, data) = config.stores().unwrap();
        assert_eq!(meta.repo(), "me/meta");
        assert_eq!(data.repo(), "me/data");
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(ClientConfig::load(&path), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_template_write_failure_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("config.json");
        let err = ClientConfig::default().write_template(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }), "got {err}");
    }

    #[test]
    fn test_serialize_error_names_no_file() {
        let source = serde_json::from_str::<u8>("x").unwrap_err();
        let err = ConfigError::Serialize(source);
        assert!(err.to_string().starts_with("cannot serialize configuration"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_debug_redacts_token() {
        let rendered = format!("{:?}", complete());
        assert!(!rendered.contains("ghp_token"));
    }
}
