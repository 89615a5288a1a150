//! Branch/path disambiguation.
//!
//! Branch names may contain `/`, so a reference like `o/r/release/1.0/src`
//! is ambiguous: the branch could be `release/1.0` with path `src`, or
//! `release` with path `1.0/src`. Candidates are probed longest-first
//! against the listing service so the longest existing branch wins.

use tracing::debug;

use crate::github::client::{HostError, RepoHost};
use crate::models::{Reference, ResolvedReference};

/// Resolve a parsed reference into one with a definite branch and a path
/// that is strictly the sub-path.
///
/// Only `NotFound` from the listing probe moves on to the next candidate;
/// any other failure propagates immediately. When no candidate exists the
/// whole segment list is treated as a path on the default branch.
pub async fn resolve_reference<H: RepoHost + ?Sized>(
    host: &H,
    reference: &Reference,
) -> Result<ResolvedReference, HostError> {
    // An explicit branch with no sub-path is already unambiguous.
    if let (Some(branch), None) = (&reference.branch, &reference.path) {
        return Ok(resolved(reference, branch.clone(), None));
    }

    // The explicit branch segment (if any) may itself be only the first
    // segment of a slash-containing branch name, so it joins the pool.
    let mut segments: Vec<String> = Vec::new();
    if let Some(branch) = &reference.branch {
        segments.push(branch.clone());
    }
    if let Some(path) = &reference.path {
        segments.extend(path.split('/').map(str::to_string));
    }

    if segments.is_empty() {
        let branch = host.default_branch(&reference.owner, &reference.repo).await;
        return Ok(resolved(reference, branch, None));
    }

    for split in (1..=segments.len()).rev() {
        let candidate_branch = segments[..split].join("/");
        let candidate_path = if split == segments.len() {
            None
        } else {
            Some(segments[split..].join("/"))
        };

        match host
            .list_files(&reference.owner, &reference.repo, &candidate_branch)
            .await
        {
            Ok(_) => {
                debug!(branch = %candidate_branch, "branch candidate resolved");
                return Ok(resolved(reference, candidate_branch, candidate_path));
            }
            Err(HostError::NotFound) => continue,
            Err(other) => return Err(other),
        }
    }

    let branch = host.default_branch(&reference.owner, &reference.repo).await;
    Ok(resolved(reference, branch, Some(segments.join("/"))))
}

fn resolved(reference: &Reference, branch: String, path: Option<String>) -> ResolvedReference {
    ResolvedReference {
        owner: reference.owner.clone(),
        repo: reference.repo.clone(),
        branch,
        path,
        kind: reference.kind,
    }
}
