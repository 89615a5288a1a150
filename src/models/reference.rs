//! Reference types identifying what to render.
//!
//! - `Reference`: parsed from a raw URL or path, branch possibly unknown
//! - `ResolvedReference`: branch guaranteed known, path strictly the sub-path

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RefKind {
    Repo,
    Directory,
    File,
}

/// A possibly ambiguous reference: when `branch` is `None` the path segments
/// may still contain the branch name, which the resolver figures out.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Reference {
    pub owner: String,
    pub repo: String,
    pub branch: Option<String>,
    pub path: Option<String>,
    pub kind: RefKind,
}

/// A reference after branch/path disambiguation. `path` never contains a
/// branch fragment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResolvedReference {
    pub owner: String,
    pub repo: String,
    pub branch: String,
    pub path: Option<String>,
    pub kind: RefKind,
}

impl ResolvedReference {
    pub fn is_file(&self) -> bool {
        self.kind == RefKind::File
    }
}
