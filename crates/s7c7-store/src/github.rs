//! GitHub repository store over the REST contents API.
//!
//! - `exists`: `HEAD /repos/{repo}/contents/{path}`; 200 found, 404 absent.
//! - `create`: `PUT /repos/{repo}/contents/{path}` with base64 content; 201 success.
//!
//! Every request has a bounded timeout. Transport failures and 5xx responses
//! are retried with exponential backoff up to [`RetryPolicy::max_attempts`].
//!
//! A PUT is not idempotent: when an earlier try committed but its response
//! was lost, the retry is answered 422. A retried `create` that ends in 422
//! checks the path and succeeds if the file is there.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};
use crate::traits::RemoteStore;

/// Public GitHub API endpoint.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

const ACCEPT_V3: &str = "application/vnd.github.v3+json";

/// Author recorded on commits made by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Committer {
    pub name: String,
    pub email: String,
}

impl Committer {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

impl Default for Committer {
    fn default() -> Self {
        Self::new(
            "github-actions[bot]",
            "github-actions[bot]@users.noreply.github.com",
        )
    }
}

/// Timeout and retry settings for the HTTP boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total tries per request, including the first.
    pub max_attempts: u32,
    /// Delay before the second try; doubles on each further try.
    pub base_delay: Duration,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
            timeout: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// Backoff after the given (1-based) failed attempt.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.base_delay.saturating_mul(factor)
    }
}

#[derive(Serialize)]
struct CreateFileRequest<'a> {
    message: String,
    content: String,
    committer: &'a Committer,
}

/// A repository on GitHub used as a path-addressed store.
pub struct GitHubStore {
    client: reqwest::Client,
    api_base: String,
    repo: String,
    auth_token: String,
    committer: Committer,
    retry: RetryPolicy,
}

impl GitHubStore {
    /// Create a store for `repo` (`owner/name`).
    pub fn new(
        repo: &str,
        auth_token: &str,
        committer: Committer,
        retry: RetryPolicy,
    ) -> Result<Self> {
        if repo.split('/').filter(|s| !s.is_empty()).count() != 2 {
            return Err(StoreError::InvalidConfig(format!(
                "repository must be owner/name, got {repo:?}"
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(retry.timeout)
            .user_agent(concat!("s7c7/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| StoreError::InvalidConfig(e.to_string()))?;

        Ok(Self {
            client,
            api_base: DEFAULT_API_BASE.to_string(),
            repo: repo.to_string(),
            auth_token: auth_token.to_string(),
            committer,
            retry,
        })
    }

    /// Point at a different API endpoint (GitHub Enterprise, test servers).
    pub fn with_api_base(mut self, api_base: &str) -> Self {
        self.api_base = api_base.trim_end_matches('/').to_string();
        self
    }

    pub fn repo(&self) -> &str {
        &self.repo
    }

    /// Contents API URL for `path`.
    pub fn contents_url(&self, path: &str) -> String {
        format!("{}/repos/{}/contents/{}", self.api_base, self.repo, path)
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header(AUTHORIZATION, format!("token {}", self.auth_token))
            .header(ACCEPT, ACCEPT_V3)
    }

    /// Send, retrying transport failures and 5xx. Returns the final
    /// response and the number of tries made.
    async fn send_with_retry<F>(&self, path: &str, build: F) -> Result<(Response, u32)>
    where
        F: Fn() -> RequestBuilder + Send + Sync,
    {
        let max_attempts = self.retry.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match build().send().await {
                Ok(response) if response.status().is_server_error() && attempt < max_attempts => {
                    tracing::warn!(
                        path,
                        status = response.status().as_u16(),
                        attempt,
                        "server error, retrying"
                    );
                }
                Ok(response) => return Ok((response, attempt)),
                Err(e) if attempt < max_attempts => {
                    tracing::warn!(path, attempt, error = %e, "request failed, retrying");
                }
                Err(e) => {
                    return Err(StoreError::Transport {
                        path: path.to_string(),
                        message: e.to_string(),
                    })
                }
            }

            tokio::time::sleep(self.retry.delay_after(attempt)).await;
            attempt += 1;
        }
    }
}

impl fmt::Debug for GitHubStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitHubStore")
            .field("api_base", &self.api_base)
            .field("repo", &self.repo)
            .field("auth_token", &"<redacted>")
            .field("committer", &self.committer)
            .field("retry", &self.retry)
            .finish()
    }
}

#[async_trait]
impl RemoteStore for GitHubStore {
    async fn exists(&self, path: &str) -> Result<bool> {
        let url = self.contents_url(path);
        let (response, _) = self
            .send_with_retry(path, || self.authorized(self.client.head(&url)))
            .await?;

        match response.status() {
            StatusCode::OK => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => Err(StoreError::UnexpectedStatus {
                path: path.to_string(),
                status: status.as_u16(),
            }),
        }
    }

    async fn create(&self, path: &str, content: &[u8]) -> Result<()> {
        let url = self.contents_url(path);
        let body = CreateFileRequest {
            message: format!("Create file {path}"),
            content: STANDARD.encode(content),
            committer: &self.committer,
        };

        let (response, attempts) = self
            .send_with_retry(path, || self.authorized(self.client.put(&url)).json(&body))
            .await?;

        let status = response.status();
        if status == StatusCode::CREATED {
            tracing::debug!(repo = %self.repo, path, "file created");
            return Ok(());
        }

        if status == StatusCode::UNPROCESSABLE_ENTITY && attempts > 1 && self.exists(path).await? {
            tracing::warn!(repo = %self.repo, path, attempts, "retried create found the file already written");
            return Ok(());
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => format!("<unreadable response body: {e}>"),
        };
        Err(StoreError::Rejected {
            path: path.to_string(),
            status: status.as_u16(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::sync::{Arc, Mutex};
    use std::thread;

    /// Answer one connection per entry of `replies`, in order, on a local
    /// port. Returns the API base and the `METHOD path` of each request seen.
    fn scripted_server(replies: Vec<(u16, &'static str)>) -> (String, Arc<Mutex<Vec<String>>>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&seen);

        thread::spawn(move || {
            for (status, body) in replies {
                let (stream, _) = listener.accept().unwrap();
                let mut reader = BufReader::new(stream);

                let mut request_line = String::new();
                reader.read_line(&mut request_line).unwrap();
                let mut content_length = 0;
                loop {
                    let mut line = String::new();
                    reader.read_line(&mut line).unwrap();
                    if line == "\r\n" || line.is_empty() {
                        break;
                    }
                    if let Some((name, value)) = line.split_once(':') {
                        if name.eq_ignore_ascii_case("content-length") {
                            content_length = value.trim().parse().unwrap();
                        }
                    }
                }
                let mut request_body = vec![0; content_length];
                reader.read_exact(&mut request_body).unwrap();

                let request: Vec<&str> = request_line.split_whitespace().take(2).collect();
                log.lock().unwrap().push(request.join(" "));

                let mut stream = reader.into_inner();
                write!(
                    stream,
                    "HTTP/1.1 {status} Scripted\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    body.len()
                )
                .unwrap();
                if request[0] != "HEAD" {
                    stream.write_all(body.as_bytes()).unwrap();
                }
                stream.flush().unwrap();
            }
        });

        (base, seen)
    }

    fn local_store(api_base: &str) -> GitHubStore {
        GitHubStore::new(
            "octocat/s7c7-meta",
            "t",
            Committer::default(),
            RetryPolicy {
                max_attempts: 3,
                base_delay: Duration::from_millis(1),
                timeout: Duration::from_secs(5),
            },
        )
        .unwrap()
        .with_api_base(api_base)
    }

    const CONTENTS: &str = "/repos/octocat/s7c7-meta/contents/a/abc.json";
    const SHA_MISSING: &str = r#"{"message":"Invalid request.\n\n\"sha\" wasn't supplied."}"#;

    fn store() -> GitHubStore {
        GitHubStore::new(
            "octocat/s7c7-meta",
            "ghp_secret",
            Committer::default(),
            RetryPolicy::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_contents_url() {
        let store = store();
        assert_eq!(
            store.contents_url("a/abc123.json"),
            "https://api.github.com/repos/octocat/s7c7-meta/contents/a/abc123.json"
        );
        let store = store.with_api_base("https://ghe.example/api/v3/");
        assert_eq!(
            store.contents_url("x.bin"),
            "https://ghe.example/api/v3/repos/octocat/s7c7-meta/contents/x.bin"
        );
    }

    #[test]
    fn test_repo_must_be_owner_slash_name() {
        let err = GitHubStore::new("justname", "t", Committer::default(), RetryPolicy::default())
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidConfig(_)));
    }

    #[test]
    fn test_debug_redacts_token() {
        let rendered = format!("{:?}", store());
        assert!(!rendered.contains("ghp_secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_backoff_doubles() {
        let policy = RetryPolicy {
            max_attempts: 4,
            base_delay: Duration::from_millis(100),
            timeout: Duration::from_secs(1),
        };
        assert_eq!(policy.delay_after(1), Duration::from_millis(100));
        assert_eq!(policy.delay_after(2), Duration::from_millis(200));
        assert_eq!(policy.delay_after(3), Duration::from_millis(400));
    }

    #[test]
    fn test_create_request_shape() {
        let committer = Committer::default();
        let body = CreateFileRequest {
            message: "Create file a/b.json".into(),
            content: STANDARD.encode(b"{}"),
            committer: &committer,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["message"], "Create file a/b.json");
        assert_eq!(json["content"], "e30=");
        assert_eq!(json["committer"]["name"], "github-actions[bot]");
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transport_error() {
        let store = GitHubStore::new(
            "octocat/s7c7-meta",
            "t",
            Committer::default(),
            RetryPolicy {
                max_attempts: 2,
                base_delay: Duration::from_millis(1),
                timeout: Duration::from_secs(2),
            },
        )
        .unwrap()
        .with_api_base("http://127.0.0.1:1");

        let err = store.exists("a/abc.json").await.unwrap_err();
        assert!(err.is_transport(), "got {err}");
    }

    #[tokio::test]
    async fn test_exists_maps_status() {
        let (base, seen) = scripted_server(vec![(200, ""), (404, ""), (403, "")]);
        let store = local_store(&base);

        assert!(store.exists("a/abc.json").await.unwrap());
        assert!(!store.exists("a/abc.json").await.unwrap());
        let err = store.exists("a/abc.json").await.unwrap_err();
        assert!(
            matches!(err, StoreError::UnexpectedStatus { status: 403, .. }),
            "got {err}"
        );
        assert_eq!(seen.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_exists_retries_server_error() {
        let (base, seen) = scripted_server(vec![(503, ""), (200, "")]);
        assert!(local_store(&base).exists("a/abc.json").await.unwrap());
        assert_eq!(
            *seen.lock().unwrap(),
            vec![format!("HEAD {CONTENTS}"), format!("HEAD {CONTENTS}")]
        );
    }

    #[tokio::test]
    async fn test_create_success_is_201() {
        let (base, seen) = scripted_server(vec![(201, "{}")]);
        local_store(&base).create("a/abc.json", b"{}").await.unwrap();
        assert_eq!(*seen.lock().unwrap(), vec![format!("PUT {CONTENTS}")]);
    }

    #[tokio::test]
    async fn test_create_rejection_carries_body() {
        let (base, seen) = scripted_server(vec![(422, SHA_MISSING)]);
        let err = local_store(&base).create("a/abc.json", b"{}").await.unwrap_err();
        match err {
            StoreError::Rejected { status, body, .. } => {
                assert_eq!(status, 422);
                assert!(body.contains("wasn't supplied"), "body {body:?}");
            }
            other => panic!("expected rejection, got {other}"),
        }
        // a first-try 422 is a genuine conflict, no existence check
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_retries_server_error() {
        let (base, seen) = scripted_server(vec![(502, ""), (201, "{}")]);
        local_store(&base).create("a/abc.json", b"{}").await.unwrap();
        assert_eq!(seen.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_retried_create_that_already_committed_succeeds() {
        let (base, seen) = scripted_server(vec![(502, ""), (422, SHA_MISSING), (200, "")]);
        local_store(&base).create("a/abc.json", b"{}").await.unwrap();
        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                format!("PUT {CONTENTS}"),
                format!("PUT {CONTENTS}"),
                format!("HEAD {CONTENTS}"),
            ]
        );
    }

    #[tokio::test]
    async fn test_retried_create_still_rejected_when_file_absent() {
        let (base, _) = scripted_server(vec![(502, ""), (422, SHA_MISSING), (404, "")]);
        let err = local_store(&base).create("a/abc.json", b"{}").await.unwrap_err();
        assert!(matches!(err, StoreError::Rejected { status: 422, .. }), "got {err}");
    }

    #[tokio::test]
    async fn test_server_error_after_last_attempt_is_rejected() {
        let (base, _) = scripted_server(vec![(500, "boom"), (500, "boom"), (500, "boom")]);
        let err = local_store(&base).create("a/abc.json", b"{}").await.unwrap_err();
        match err {
            StoreError::Rejected { status, body, .. } => {
                assert_eq!(status, 500);
                assert_eq!(body, "boom");
            }
            other => panic!("expected rejection, got {other}"),
        }
    }
}
