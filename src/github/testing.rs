//! In-memory `RepoHost` fake for unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::github::client::{HostError, RepoHost};
use crate::models::RepoFile;

const DEFAULT_REPO: &str = "o/r";

#[derive(Default)]
struct FakeRepo {
    default_branch: Option<String>,
    /// branch → listing
    branches: HashMap<String, Vec<RepoFile>>,
    /// (branch, path) → content override
    contents: HashMap<(String, String), String>,
    /// (branch, path) pairs whose fetch always fails
    broken: Vec<(String, String)>,
}

/// Deterministic in-memory host. Listings and contents are registered up
/// front with the builder methods; unregistered lookups are `NotFound`.
/// Files present in a listing without explicit content serve a synthetic
/// `// <path>` body.
#[derive(Default)]
pub struct FakeHost {
    repos: HashMap<String, FakeRepo>,
    /// One-shot error injected into the next `list_files` call.
    listing_error: Mutex<Option<HostError>>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a branch listing on the default test repo `o/r`.
    pub fn with_branch(self, branch: &str, paths: &[&str]) -> Self {
        self.with_repo_branch(DEFAULT_REPO, branch, paths)
    }

    /// Set the default branch of the default test repo `o/r`.
    pub fn with_default_branch(self, branch: &str) -> Self {
        self.with_repo_default_branch(DEFAULT_REPO, branch)
    }

    pub fn with_repo_branch(mut self, owner_repo: &str, branch: &str, paths: &[&str]) -> Self {
        let repo = self.repos.entry(owner_repo.to_string()).or_default();
        repo.branches.insert(
            branch.to_string(),
            paths.iter().map(|path| make_file(path)).collect(),
        );
        self
    }

    pub fn with_repo_default_branch(mut self, owner_repo: &str, branch: &str) -> Self {
        let repo = self.repos.entry(owner_repo.to_string()).or_default();
        repo.default_branch = Some(branch.to_string());
        self
    }

    pub fn with_content(
        mut self,
        owner_repo: &str,
        branch: &str,
        path: &str,
        content: &str,
    ) -> Self {
        let repo = self.repos.entry(owner_repo.to_string()).or_default();
        repo.contents.insert(
            (branch.to_string(), path.to_string()),
            content.to_string(),
        );
        self
    }

    /// Make every fetch of one file fail with a service error.
    pub fn with_broken_content(mut self, owner_repo: &str, branch: &str, path: &str) -> Self {
        let repo = self.repos.entry(owner_repo.to_string()).or_default();
        repo.broken.push((branch.to_string(), path.to_string()));
        self
    }

    pub fn with_listing_error(self, err: HostError) -> Self {
        *self.listing_error.lock().unwrap() = Some(err);
        self
    }
}

#[async_trait]
impl RepoHost for FakeHost {
    async fn list_files(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
    ) -> Result<Vec<RepoFile>, HostError> {
        if let Some(err) = self.listing_error.lock().unwrap().take() {
            return Err(err);
        }
        self.repos
            .get(&format!("{}/{}", owner, repo))
            .and_then(|r| r.branches.get(branch))
            .cloned()
            .ok_or(HostError::NotFound)
    }

    async fn get_file(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
        path: &str,
    ) -> Result<String, HostError> {
        let repo = self
            .repos
            .get(&format!("{}/{}", owner, repo))
            .ok_or(HostError::NotFound)?;
        let key = (branch.to_string(), path.to_string());
        if repo.broken.contains(&key) {
            return Err(HostError::Service("injected failure".to_string()));
        }
        if let Some(content) = repo.contents.get(&key) {
            return Ok(content.clone());
        }
        let listed = repo
            .branches
            .get(branch)
            .is_some_and(|files| files.iter().any(|f| f.path == path));
        if listed {
            Ok(format!("// {}", path))
        } else {
            Err(HostError::NotFound)
        }
    }

    async fn default_branch(&self, owner: &str, repo: &str) -> String {
        self.repos
            .get(&format!("{}/{}", owner, repo))
            .and_then(|r| r.default_branch.clone())
            .unwrap_or_else(|| "main".to_string())
    }
}

pub fn make_file(path: &str) -> RepoFile {
    RepoFile {
        path: path.to_string(),
        mode: "100644".to_string(),
        content_hash: format!("sha-{}", path),
        size: 1,
    }
}
