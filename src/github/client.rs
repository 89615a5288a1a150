//! Remote GitHub access.
//!
//! `RepoHost` is the seam between the aggregation core and the remote
//! services: a file listing service, a raw content service, and repository
//! metadata. `GitHubClient` is the production implementation backed by
//! ungh.cc (fast, cached) with transparent fallback to the GitHub trees API
//! when ungh signals a rate limit.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::models::{FilesResponse, RepoFile};

const UNGH_BASE: &str = "https://ungh.cc";
const RAW_GITHUB_BASE: &str = "https://raw.githubusercontent.com";
const GITHUB_API_BASE: &str = "https://api.github.com";
const USER_AGENT: &str = "repo2md";

const DEFAULT_CONTENT_RETRIES: u32 = 3;
const BACKOFF_BASE_MS: u64 = 100;

/// Failure modes of the remote services. `NotFound` doubles as a
/// control-flow signal during branch probing and is consumed internally
/// there; everything else propagates.
#[derive(Error, Debug)]
pub enum HostError {
    #[error("not found")]
    NotFound,

    #[error("rate limited")]
    RateLimited,

    #[error("transient upstream status {0}")]
    Transient(u16),

    #[error("upstream error: {0}")]
    Service(String),
}

impl From<reqwest::Error> for HostError {
    fn from(err: reqwest::Error) -> Self {
        HostError::Service(err.to_string())
    }
}

#[async_trait]
pub trait RepoHost: Send + Sync {
    /// Full recursive blob listing of `branch`. Fails with `NotFound` on an
    /// unknown branch and `RateLimited` only once both backends are out of
    /// quota.
    async fn list_files(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
    ) -> Result<Vec<RepoFile>, HostError>;

    /// Raw text content of one file.
    async fn get_file(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
        path: &str,
    ) -> Result<String, HostError>;

    /// Default branch of the repository; `"main"` whenever the metadata
    /// call fails, never an error.
    async fn default_branch(&self, owner: &str, repo: &str) -> String;
}

pub struct GitHubClient {
    http: reqwest::Client,
    token: Option<String>,
    content_retries: u32,
}

impl GitHubClient {
    pub fn new(token: Option<String>) -> Self {
        Self {
            http: reqwest::Client::builder()
                .user_agent(USER_AGENT)
                .build()
                .unwrap_or_default(),
            token,
            content_retries: DEFAULT_CONTENT_RETRIES,
        }
    }

    async fn list_files_from_ungh(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
    ) -> Result<Vec<RepoFile>, HostError> {
        let url = api_url(UNGH_BASE, &["repos", owner, repo, "files", branch])?;
        let response = self.http.get(url).send().await?;

        match response.status() {
            status if status.is_success() => {
                let data: FilesResponse = response.json().await?;
                Ok(data.files)
            }
            StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS => Err(HostError::RateLimited),
            StatusCode::NOT_FOUND => Err(HostError::NotFound),
            status => Err(HostError::Service(format!(
                "ungh listing failed: {}",
                status
            ))),
        }
    }

    async fn list_files_from_github(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
    ) -> Result<Vec<RepoFile>, HostError> {
        let mut url = api_url(GITHUB_API_BASE, &["repos", owner, repo, "git", "trees", branch])?;
        url.set_query(Some("recursive=1"));
        let response = self.http.get(url).send().await?;

        match response.status() {
            status if status.is_success() => {
                let data: GitHubTreeResponse = response.json().await?;
                Ok(data
                    .tree
                    .into_iter()
                    .filter(|item| item.kind == "blob")
                    .map(|item| RepoFile {
                        path: item.path,
                        mode: item.mode,
                        content_hash: item.sha,
                        size: item.size.unwrap_or(0),
                    })
                    .collect())
            }
            StatusCode::NOT_FOUND => Err(HostError::NotFound),
            StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS => Err(HostError::RateLimited),
            status => Err(HostError::Service(format!(
                "GitHub API error: {}",
                status
            ))),
        }
    }
}

#[async_trait]
impl RepoHost for GitHubClient {
    async fn list_files(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
    ) -> Result<Vec<RepoFile>, HostError> {
        match self.list_files_from_ungh(owner, repo, branch).await {
            Ok(files) => Ok(files),
            // Only a rate-limit signal falls back to the authoritative API.
            Err(HostError::RateLimited) => {
                debug!(owner, repo, branch, "ungh rate limited, falling back to GitHub API");
                self.list_files_from_github(owner, repo, branch).await
            }
            Err(other) => Err(other),
        }
    }

    async fn get_file(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
        path: &str,
    ) -> Result<String, HostError> {
        let mut segments = vec![owner, repo, branch];
        segments.extend(path.split('/'));
        let url = api_url(RAW_GITHUB_BASE, &segments)?;

        let mut last_status = 0u16;
        for attempt in 0..self.content_retries {
            let response = self.http.get(url.clone()).send().await?;
            let status = response.status();

            if status.is_success() {
                return Ok(response.text().await?);
            }
            if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
                last_status = status.as_u16();
                tokio::time::sleep(Duration::from_millis(BACKOFF_BASE_MS << attempt)).await;
                continue;
            }
            if status == StatusCode::NOT_FOUND {
                return Err(HostError::NotFound);
            }
            return Err(HostError::Service(format!(
                "failed to fetch {}: {}",
                path, status
            )));
        }
        Err(HostError::Transient(last_status))
    }

    async fn default_branch(&self, owner: &str, repo: &str) -> String {
        let Ok(url) = api_url(GITHUB_API_BASE, &["repos", owner, repo]) else {
            return "main".to_string();
        };
        let mut request = self.http.get(url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let Ok(response) = request.send().await else {
            return "main".to_string();
        };
        if !response.status().is_success() {
            return "main".to_string();
        }
        match response.json::<RepoMetadata>().await {
            Ok(meta) => meta.default_branch,
            Err(_) => "main".to_string(),
        }
    }
}

/// Build a URL from percent-encoded path segments. Branch names and file
/// paths can contain characters that need escaping.
fn api_url(base: &str, segments: &[&str]) -> Result<Url, HostError> {
    let mut url =
        Url::parse(base).map_err(|e| HostError::Service(format!("bad base url: {}", e)))?;
    {
        let mut parts = url
            .path_segments_mut()
            .map_err(|_| HostError::Service("base url cannot hold a path".to_string()))?;
        for segment in segments {
            parts.push(segment);
        }
    }
    Ok(url)
}

#[derive(Debug, Deserialize)]
struct GitHubTreeResponse {
    tree: Vec<GitHubTreeItem>,
}

#[derive(Debug, Deserialize)]
struct GitHubTreeItem {
    path: String,
    #[serde(default)]
    mode: String,
    sha: String,
    size: Option<u64>,
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Debug, Deserialize)]
struct RepoMetadata {
    default_branch: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_segments_are_percent_encoded() {
        let url = api_url(RAW_GITHUB_BASE, &["o", "r", "release/1.0", "a b.txt"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://raw.githubusercontent.com/o/r/release%2F1.0/a%20b.txt"
        );
    }

    #[test]
    fn slash_in_branch_stays_one_segment() {
        let url = api_url(UNGH_BASE, &["repos", "o", "r", "files", "release/1.0"]).unwrap();
        assert!(url.path().ends_with("/files/release%2F1.0"));
    }
}
