//! Submodule DTOs.

use serde::{Deserialize, Serialize};

/// One entry parsed out of `.gitmodules`, already resolved to a GitHub
/// identity. Entries whose URL does not point at GitHub are dropped during
/// parsing rather than kept as partial records.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Submodule {
    pub name: String,
    pub path: String,
    pub url: String,
    pub owner: String,
    pub repo: String,
}

/// A fetched file, path already prefixed with the submodule path chain.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContentFile {
    pub path: String,
    pub content: String,
}

/// Outcome for one submodule at one depth: either `files` (possibly empty)
/// or `error` is meaningful, never both.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmoduleContent {
    pub submodule: Submodule,
    pub files: Vec<ContentFile>,
    pub error: Option<String>,
}
