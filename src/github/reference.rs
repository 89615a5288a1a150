//! Parsing raw GitHub-style URLs and paths into references.

use crate::error::{AppError, Result};
use crate::models::{RefKind, Reference};

/// Conventionally extensionless filenames, used to tell a shorthand file
/// reference apart from a directory one.
const KNOWN_FILES: &[&str] = &[
    "justfile",
    "dockerfile",
    "makefile",
    "rakefile",
    "gemfile",
    "procfile",
    "license",
    "readme",
    "changelog",
];

/// Parse a raw reference: either a bare `owner/repo[/...]` path or a full
/// `https://github.com/...` URL.
///
/// `/tree/` and `/blob/` markers carry an explicit branch segment (which may
/// still be only a prefix of a slash-containing branch name); the shorthand
/// form `owner/repo/some/path` leaves the branch for the resolver.
pub fn parse_reference(raw: &str) -> Result<Reference> {
    let cleaned = strip_github_prefix(raw.trim()).trim_end_matches('/');

    let parts: Vec<&str> = cleaned.split('/').collect();
    let owner = parts.first().copied().unwrap_or_default();
    let repo = parts.get(1).copied().unwrap_or_default();

    if owner.is_empty() || repo.is_empty() {
        return Err(AppError::InvalidReference(
            "missing owner or repo".to_string(),
        ));
    }

    let owner = owner.to_string();
    let repo = repo.to_string();

    if parts.len() == 2 {
        return Ok(Reference {
            owner,
            repo,
            branch: None,
            path: None,
            kind: RefKind::Repo,
        });
    }

    match parts[2] {
        "blob" => {
            let branch = parts.get(3).map(|s| s.to_string());
            let path = join_nonempty(parts.get(4..).unwrap_or(&[]));
            Ok(Reference {
                owner,
                repo,
                branch,
                path,
                kind: RefKind::File,
            })
        }
        "tree" => {
            let branch = parts.get(3).map(|s| s.to_string());
            let path = join_nonempty(parts.get(4..).unwrap_or(&[]));
            Ok(Reference {
                owner,
                repo,
                branch,
                path,
                kind: RefKind::Directory,
            })
        }
        _ => {
            let short_path = parts[2..].join("/");
            let basename = short_path.rsplit('/').next().unwrap_or("").to_lowercase();
            let is_file = basename.contains('.') || KNOWN_FILES.contains(&basename.as_str());
            Ok(Reference {
                owner,
                repo,
                branch: None,
                path: Some(short_path),
                kind: if is_file {
                    RefKind::File
                } else {
                    RefKind::Directory
                },
            })
        }
    }
}

fn strip_github_prefix(raw: &str) -> &str {
    let mut rest = raw;
    for prefix in ["https://", "http://"] {
        if let Some(stripped) = rest.strip_prefix(prefix) {
            rest = stripped;
            break;
        }
    }
    if let Some(stripped) = rest.strip_prefix("www.") {
        rest = stripped;
    }
    if let Some(stripped) = rest.strip_prefix("github.com/") {
        rest = stripped;
    }
    rest
}

fn join_nonempty(parts: &[&str]) -> Option<String> {
    if parts.is_empty() {
        return None;
    }
    let joined = parts.join("/");
    if joined.is_empty() { None } else { Some(joined) }
}
