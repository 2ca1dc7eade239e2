//! GitHub provider - repository content via the REST contents API

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Response, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use super::{ContentProvider, DirEntry, EntryKind};
use crate::config::loader::Config;
use crate::error::ProviderError;

const RAW_MEDIA_TYPE: &str = "application/vnd.github.raw";
const JSON_MEDIA_TYPE: &str = "application/vnd.github+json";

/// GitHub provider for repository content
pub struct GitHubProvider {
    client: reqwest::Client,
    api_url: String,
    token: Option<String>,
}

/// One item of a contents API directory listing
#[derive(Debug, Deserialize)]
pub struct ContentItem {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub item_type: String,
}

impl ContentItem {
    /// Map the remote item to a directory entry; symlinks and submodules are dropped
    pub fn into_entry(self) -> Option<DirEntry> {
        let kind = match self.item_type.as_str() {
            "file" => EntryKind::File,
            "dir" => EntryKind::Dir,
            _ => return None,
        };
        Some(DirEntry {
            name: self.name,
            path: self.path,
            kind,
        })
    }
}

impl GitHubProvider {
    /// Create a provider against `api_url`, optionally authenticated.
    pub fn new(
        api_url: impl Into<String>,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let api_url = api_url.into().trim_end_matches('/').to_string();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::Network {
                url: api_url.clone(),
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            api_url,
            token: token.filter(|t| !t.trim().is_empty()),
        })
    }

    /// Create a provider from configuration, reading the token from the configured env var
    pub fn from_config(config: &Config) -> Result<Self, ProviderError> {
        let token = std::env::var(&config.github.token_env).ok();
        if token.is_none() {
            debug!(
                env = %config.github.token_env,
                "No GitHub token set, using unauthenticated requests"
            );
        }
        Self::new(
            config.github.api_url.clone(),
            token,
            Duration::from_secs(config.github.timeout_secs),
        )
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Contents API URL for a path
    pub fn contents_url(&self, owner: &str, repo: &str, path: &str) -> String {
        let path = path.trim_matches('/');
        if path.is_empty() {
            format!("{}/repos/{}/{}/contents", self.api_url, owner, repo)
        } else {
            format!("{}/repos/{}/{}/contents/{}", self.api_url, owner, repo, path)
        }
    }

    fn headers(&self, accept: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(accept));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("complyscan/", env!("CARGO_PKG_VERSION"))),
        );
        if let Some(token) = &self.token {
            if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", token)) {
                headers.insert(AUTHORIZATION, value);
            }
        }
        headers
    }

    async fn get(
        &self,
        url: &str,
        query: &[(&str, &str)],
        accept: &'static str,
    ) -> Result<Option<Response>, ProviderError> {
        let response = self
            .client
            .get(url)
            .query(query)
            .headers(self.headers(accept))
            .send()
            .await
            .map_err(|e| ProviderError::Network {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(Some(response));
        }
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if is_rate_limited(status, response.headers()) {
            let reset = header_i64(response.headers(), "x-ratelimit-reset");
            warn!(url, ?reset, "GitHub API rate limit exhausted");
            return Err(ProviderError::RateLimited { reset });
        }

        Err(ProviderError::Http {
            status: status.as_u16(),
            url: url.to_string(),
        })
    }
}

fn header_i64(headers: &HeaderMap, name: &str) -> Option<i64> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
}

/// 429, or 403 with the remaining quota at zero
pub fn is_rate_limited(status: StatusCode, headers: &HeaderMap) -> bool {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return true;
    }
    status == StatusCode::FORBIDDEN && header_i64(headers, "x-ratelimit-remaining") == Some(0)
}

#[async_trait::async_trait]
impl ContentProvider for GitHubProvider {
    async fn get_file_content(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        branch: &str,
    ) -> Result<Option<String>, ProviderError> {
        let url = self.contents_url(owner, repo, path);
        let Some(response) = self.get(&url, &[("ref", branch)], RAW_MEDIA_TYPE).await? else {
            return Ok(None);
        };

        let body = response.text().await.map_err(|e| ProviderError::Decode {
            url: url.clone(),
            message: e.to_string(),
        })?;
        Ok(Some(body))
    }

    async fn list_directory(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
    ) -> Result<Vec<DirEntry>, ProviderError> {
        let url = self.contents_url(owner, repo, path);
        let Some(response) = self.get(&url, &[], JSON_MEDIA_TYPE).await? else {
            return Ok(Vec::new());
        };

        let bytes = response.bytes().await.map_err(|e| ProviderError::Decode {
            url: url.clone(),
            message: e.to_string(),
        })?;
        parse_listing(&bytes).map_err(|e| ProviderError::Decode {
            url,
            message: e.to_string(),
        })
    }
}

/// Decode a contents API listing. A single-object payload means `path` is a file,
/// which lists as empty.
pub fn parse_listing(body: &[u8]) -> Result<Vec<DirEntry>, serde_json::Error> {
    let value: serde_json::Value = serde_json::from_slice(body)?;
    if !value.is_array() {
        return Ok(Vec::new());
    }
    let items: Vec<ContentItem> = serde_json::from_value(value)?;
    Ok(items
        .into_iter()
        .filter_map(ContentItem::into_entry)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_provider() -> GitHubProvider {
        GitHubProvider::new("https://api.github.com/", None, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_contents_url() {
        let provider = test_provider();
        assert_eq!(
            provider.contents_url("octocat", "hello", ""),
            "https://api.github.com/repos/octocat/hello/contents"
        );
        assert_eq!(
            provider.contents_url("octocat", "hello", "/src/app.py"),
            "https://api.github.com/repos/octocat/hello/contents/src/app.py"
        );
    }

    #[test]
    fn test_blank_token_is_unauthenticated() {
        let provider =
            GitHubProvider::new("https://api.github.com", Some("  ".into()), Duration::from_secs(5))
                .unwrap();
        assert!(!provider.is_authenticated());
    }

    #[test]
    fn test_rate_limit_detection() {
        let mut headers = HeaderMap::new();
        assert!(is_rate_limited(StatusCode::TOO_MANY_REQUESTS, &headers));
        assert!(!is_rate_limited(StatusCode::FORBIDDEN, &headers));

        headers.insert("x-ratelimit-remaining", HeaderValue::from_static("0"));
        assert!(is_rate_limited(StatusCode::FORBIDDEN, &headers));
        assert!(!is_rate_limited(StatusCode::INTERNAL_SERVER_ERROR, &headers));
    }

    #[test]
    fn test_parse_listing_drops_unknown_kinds() {
        let body = br#"[
            {"name": "app.py", "path": "app.py", "type": "file", "sha": "abc"},
            {"name": "src", "path": "src", "type": "dir"},
            {"name": "link", "path": "link", "type": "symlink"},
            {"name": "vendor", "path": "vendor", "type": "submodule"}
        ]"#;
        let entries = parse_listing(body).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], DirEntry::file("app.py"));
        assert_eq!(entries[1], DirEntry::dir("src"));
    }

    #[test]
    fn test_parse_listing_single_file_payload() {
        let body = br#"{"name": "app.py", "path": "app.py", "type": "file"}"#;
        assert!(parse_listing(body).unwrap().is_empty());
    }

    #[test]
    fn test_parse_listing_rejects_garbage() {
        assert!(parse_listing(b"not json").is_err());
    }

    #[test]
    #[serial_test::serial]
    fn test_from_config_reads_token_env() {
        let mut config = Config::default();
        config.github.token_env = "COMPLYSCAN_TEST_TOKEN".to_string();

        std::env::set_var("COMPLYSCAN_TEST_TOKEN", "ghp_example");
        assert!(GitHubProvider::from_config(&config).unwrap().is_authenticated());

        std::env::remove_var("COMPLYSCAN_TEST_TOKEN");
        assert!(!GitHubProvider::from_config(&config).unwrap().is_authenticated());
    }
}
