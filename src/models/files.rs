//! File listing DTOs.
//!
//! `RepoFile` is produced by the listing backends (ungh file listing or the
//! GitHub trees API) and never mutated afterwards.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoFile {
    /// Repo-relative path, `/`-separated.
    pub path: String,
    #[serde(default)]
    pub mode: String,
    /// Content hash of the blob (`sha` on the wire).
    #[serde(rename = "sha")]
    pub content_hash: String,
    #[serde(default)]
    pub size: u64,
}

/// Response shape of the ungh `files` endpoint.
#[derive(Debug, Deserialize)]
pub struct FilesResponse {
    pub files: Vec<RepoFile>,
}
