//! Recursive git-submodule aggregation.
//!
//! `.gitmodules` is parsed out of the current listing; each submodule that
//! resolves to a GitHub identity is fetched concurrently, and its own
//! submodules are followed up to a depth limit. A visited set keyed by
//! `owner/repo` guards against cycles for the lifetime of one top-level
//! request.

use std::collections::HashSet;
use std::sync::Mutex;

use futures::future::{BoxFuture, FutureExt, join_all};

use crate::concurrency::map_bounded;
use crate::github::client::{HostError, RepoHost};
use crate::github::textfile::is_text_file;
use crate::models::{ContentFile, RepoFile, Submodule, SubmoduleContent};

pub const DEFAULT_MAX_DEPTH: usize = 2;
pub const DEFAULT_FILE_CAP: usize = 100;
pub const FETCH_CONCURRENCY: usize = 10;

const FETCH_FAILED_PLACEHOLDER: &str = "*Failed to fetch*";
const CIRCULAR_REFERENCE: &str = "Circular reference detected";

#[derive(Debug, Clone)]
pub struct SubmoduleOptions {
    pub max_depth: usize,
    /// At most this many text files are fetched per submodule.
    pub file_cap: usize,
    pub concurrency: usize,
}

impl Default for SubmoduleOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            file_cap: DEFAULT_FILE_CAP,
            concurrency: FETCH_CONCURRENCY,
        }
    }
}

/// Fetch submodule content for one top-level repository. The visited set is
/// scoped to this call and dropped when it returns.
pub async fn fetch_submodules<H: RepoHost + ?Sized>(
    host: &H,
    owner: &str,
    repo: &str,
    branch: &str,
    files: &[RepoFile],
    options: &SubmoduleOptions,
) -> Vec<SubmoduleContent> {
    let visited = Mutex::new(HashSet::new());
    fetch_at(host, owner, repo, branch, files.to_vec(), options, 0, &visited).await
}

#[allow(clippy::too_many_arguments)]
fn fetch_at<'a, H: RepoHost + ?Sized>(
    host: &'a H,
    owner: &'a str,
    repo: &'a str,
    branch: &'a str,
    files: Vec<RepoFile>,
    options: &'a SubmoduleOptions,
    depth: usize,
    visited: &'a Mutex<HashSet<String>>,
) -> BoxFuture<'a, Vec<SubmoduleContent>> {
    async move {
        if depth >= options.max_depth {
            return Vec::new();
        }

        let repo_key = format!("{}/{}", owner, repo);
        {
            let mut seen = visited.lock().unwrap_or_else(|e| e.into_inner());
            if !seen.insert(repo_key) {
                return Vec::new();
            }
        }

        if !files.iter().any(|f| f.path == ".gitmodules") {
            return Vec::new();
        }
        let Ok(gitmodules) = host.get_file(owner, repo, branch, ".gitmodules").await else {
            return Vec::new();
        };

        let submodules = parse_gitmodules(&gitmodules);
        if submodules.is_empty() {
            return Vec::new();
        }

        let tasks = submodules.into_iter().map(|submodule| async move {
            match fetch_one(host, &submodule, options, depth, visited).await {
                Ok(results) => results,
                Err(err) => vec![SubmoduleContent {
                    submodule,
                    files: Vec::new(),
                    error: Some(err.to_string()),
                }],
            }
        });

        join_all(tasks).await.into_iter().flatten().collect()
    }
    .boxed()
}

/// One submodule's pipeline: cycle check, default-branch resolution, file
/// listing, capped content fetch, then recursion into its own submodules.
/// Every path prefixes file paths with the submodule's path, so depth-2
/// results reach the top-level caller with the full `outer/inner/...` chain.
async fn fetch_one<'a, H: RepoHost + ?Sized>(
    host: &'a H,
    submodule: &Submodule,
    options: &'a SubmoduleOptions,
    depth: usize,
    visited: &'a Mutex<HashSet<String>>,
) -> Result<Vec<SubmoduleContent>, HostError> {
    let submodule_key = format!("{}/{}", submodule.owner, submodule.repo);
    let already_visited = {
        let seen = visited.lock().unwrap_or_else(|e| e.into_inner());
        seen.contains(&submodule_key)
    };
    if already_visited {
        return Ok(vec![SubmoduleContent {
            submodule: submodule.clone(),
            files: Vec::new(),
            error: Some(CIRCULAR_REFERENCE.to_string()),
        }]);
    }

    let branch = host.default_branch(&submodule.owner, &submodule.repo).await;
    let all_files = host
        .list_files(&submodule.owner, &submodule.repo, &branch)
        .await?;

    let text_files: Vec<&RepoFile> = all_files
        .iter()
        .filter(|f| is_text_file(&f.path))
        .take(options.file_cap)
        .collect();

    let contents = map_bounded(&text_files, options.concurrency, |file| {
        let branch = branch.as_str();
        async move {
            let prefixed = format!("{}/{}", submodule.path, file.path);
            match host
                .get_file(&submodule.owner, &submodule.repo, branch, &file.path)
                .await
            {
                Ok(content) => ContentFile {
                    path: prefixed,
                    content,
                },
                Err(_) => ContentFile {
                    path: prefixed,
                    content: FETCH_FAILED_PLACEHOLDER.to_string(),
                },
            }
        }
    })
    .await;

    let mut results = vec![SubmoduleContent {
        submodule: submodule.clone(),
        files: contents,
        error: None,
    }];

    let nested = fetch_at(
        host,
        &submodule.owner,
        &submodule.repo,
        &branch,
        all_files,
        options,
        depth + 1,
        visited,
    )
    .await;

    for mut inner in nested {
        for file in &mut inner.files {
            file.path = format!("{}/{}", submodule.path, file.path);
        }
        results.push(inner);
    }

    Ok(results)
}

/// Parse `.gitmodules`: INI-style `[submodule "name"]` blocks with `path`
/// and `url` assignments. A record is emitted only when both are present
/// and the URL resolves to a GitHub identity.
pub fn parse_gitmodules(content: &str) -> Vec<Submodule> {
    let mut submodules = Vec::new();
    let mut current: Option<(String, Option<String>, Option<String>)> = None;

    let mut flush = |entry: Option<(String, Option<String>, Option<String>)>,
                     out: &mut Vec<Submodule>| {
        if let Some((name, Some(path), Some(url))) = entry {
            if let Some((owner, repo)) = github_identity(&url) {
                out.push(Submodule {
                    name,
                    path,
                    url,
                    owner,
                    repo,
                });
            }
        }
    };

    for line in content.lines() {
        let trimmed = line.trim();

        if let Some(name) = section_name(trimmed) {
            flush(current.take(), &mut submodules);
            current = Some((name.to_string(), None, None));
            continue;
        }

        if let Some(entry) = current.as_mut() {
            if let Some(value) = key_value(trimmed, "path") {
                entry.1 = Some(value.to_string());
            } else if let Some(value) = key_value(trimmed, "url") {
                entry.2 = Some(value.to_string());
            }
        }
    }
    flush(current.take(), &mut submodules);

    submodules
}

fn section_name(line: &str) -> Option<&str> {
    let rest = line.strip_prefix("[submodule")?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let rest = rest.trim_start().strip_prefix('"')?;
    let name = rest.strip_suffix("\"]")?;
    if name.is_empty() { None } else { Some(name) }
}

fn key_value<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(key)?;
    let rest = rest.trim_start().strip_prefix('=')?;
    let value = rest.trim();
    if value.is_empty() { None } else { Some(value) }
}

/// Extract the GitHub `(owner, repo)` identity from a submodule URL.
/// `git@github.com:` SSH forms are normalized to HTTPS and a trailing
/// `.git` is stripped; URLs not pointing at github.com yield `None`.
fn github_identity(url: &str) -> Option<(String, String)> {
    let normalized = match url.strip_prefix("git@github.com:") {
        Some(rest) => format!("https://github.com/{}", rest),
        None => url.to_string(),
    };
    let normalized = normalized.strip_suffix(".git").unwrap_or(&normalized);

    let (_, after) = normalized.split_once("github.com/")?;
    let mut segments = after.split('/');
    let owner = segments.next().filter(|s| !s.is_empty())?;
    let repo = segments.next().filter(|s| !s.is_empty())?;
    Some((owner.to_string(), repo.to_string()))
}
