//! Reversible clean-path slug codec.
//!
//! A resolved reference is flattened into a single URL segment usable as a
//! cache key, e.g. `gh_rust-lang_rust@master_src_lib.md`. Branch names may
//! contain `/` and `~`, so the branch is escaped (`~` → `~~`, `/` → `~s`)
//! before the tokens are joined with `_`.

use crate::models::{RefKind, ResolvedReference};

/// Extension carried by a slug. Both render to the same markdown body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlugExtension {
    Md,
    Txt,
}

impl SlugExtension {
    fn as_str(self) -> &'static str {
        match self {
            SlugExtension::Md => "md",
            SlugExtension::Txt => "txt",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanPath {
    pub owner: String,
    pub repo: String,
    pub branch: String,
    pub path: Option<String>,
    pub is_file: bool,
    pub extension: SlugExtension,
}

impl CleanPath {
    pub fn from_resolved(resolved: &ResolvedReference) -> Self {
        Self {
            owner: resolved.owner.clone(),
            repo: resolved.repo.clone(),
            branch: resolved.branch.clone(),
            path: resolved.path.clone(),
            is_file: resolved.is_file(),
            extension: SlugExtension::Md,
        }
    }

    pub fn to_resolved(&self) -> ResolvedReference {
        ResolvedReference {
            owner: self.owner.clone(),
            repo: self.repo.clone(),
            branch: self.branch.clone(),
            path: self.path.clone(),
            // A file slug with no path degrades to a whole-repo render.
            kind: if self.is_file && self.path.is_some() {
                RefKind::File
            } else if self.path.is_some() {
                RefKind::Directory
            } else {
                RefKind::Repo
            },
        }
    }

    /// Flatten into a slug: `gh[f]_owner_repo@branch[_path_segments].ext`.
    pub fn encode(&self) -> String {
        let prefix = if self.is_file { "ghf" } else { "gh" };
        let mut parts = vec![
            prefix.to_string(),
            self.owner.clone(),
            format!("{}@{}", self.repo, encode_branch(&self.branch)),
        ];
        if let Some(path) = &self.path {
            parts.extend(path.split('/').map(str::to_string));
        }
        format!("{}.{}", parts.join("_"), self.extension.as_str())
    }

    /// Invert `encode`. Returns `None` for anything that is not a
    /// well-formed slug; never panics.
    pub fn parse(slug: &str) -> Option<Self> {
        let is_file = slug.starts_with("ghf_");
        if !is_file && !slug.starts_with("gh_") {
            return None;
        }

        let (without_ext, extension) = if let Some(stripped) = slug.strip_suffix(".md") {
            (stripped, SlugExtension::Md)
        } else if let Some(stripped) = slug.strip_suffix(".txt") {
            (stripped, SlugExtension::Txt)
        } else {
            return None;
        };

        let parts: Vec<&str> = without_ext.split('_').collect();
        if parts.len() < 3 {
            return None;
        }
        let owner = parts[1];
        let repo_with_branch = parts[2];
        if owner.is_empty() || repo_with_branch.is_empty() {
            return None;
        }

        let (repo, encoded_branch) = match repo_with_branch.find('@') {
            Some(at) => (&repo_with_branch[..at], &repo_with_branch[at + 1..]),
            None => (repo_with_branch, "main"),
        };
        if repo.is_empty() {
            return None;
        }

        let rest = &parts[3..];
        let path = if rest.is_empty() {
            None
        } else {
            Some(rest.join("/"))
        };

        Some(Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
            branch: decode_branch(encoded_branch),
            path,
            is_file,
            extension,
        })
    }
}

/// Recognize a slug-shaped URL segment before attempting a full parse.
pub fn looks_like_slug(path: &str) -> bool {
    (path.starts_with("gh_") || path.starts_with("ghf_"))
        && (path.ends_with(".md") || path.ends_with(".txt"))
}

fn encode_branch(branch: &str) -> String {
    branch.replace('~', "~~").replace('/', "~s")
}

/// Undo the branch escaping. `~~` must be resolved before `~s`, otherwise
/// the second `~` of an escaped tilde could be misread as the start of a
/// slash escape; a sentinel unreachable by the encoding holds the place.
fn decode_branch(encoded: &str) -> String {
    const SENTINEL: char = '\u{0}';
    encoded
        .replace("~~", &SENTINEL.to_string())
        .replace("~s", "/")
        .replace(SENTINEL, "~")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clean(branch: &str, path: Option<&str>, is_file: bool) -> CleanPath {
        CleanPath {
            owner: "o-az".to_string(),
            repo: "2md".to_string(),
            branch: branch.to_string(),
            path: path.map(str::to_string),
            is_file,
            extension: SlugExtension::Md,
        }
    }

    #[test]
    fn encodes_repo_root() {
        assert_eq!(clean("main", None, false).encode(), "gh_o-az_2md@main.md");
    }

    #[test]
    fn encodes_file_with_path() {
        assert_eq!(
            clean("main", Some("src/index.ts"), true).encode(),
            "ghf_o-az_2md@main_src_index.ts.md"
        );
    }

    #[test]
    fn round_trips_plain_branches() {
        for branch in ["main", "develop", "v4.0.0"] {
            let original = clean(branch, Some("src"), false);
            assert_eq!(CleanPath::parse(&original.encode()), Some(original));
        }
    }

    #[test]
    fn round_trips_slash_and_tilde_branches() {
        for branch in [
            "release/1.0",
            "feat/a/b/c",
            "weird~branch",
            "~",
            "~~",
            "~s",
            "~/s",
            "a~s/b~~c",
            "~~s",
            "s~~~s",
        ] {
            let original = clean(branch, Some("docs/guide"), false);
            let decoded = CleanPath::parse(&original.encode());
            assert_eq!(decoded, Some(original), "branch {:?}", branch);
        }
    }

    #[test]
    fn missing_at_defaults_to_main() {
        let parsed = CleanPath::parse("gh_o-az_2md.md").unwrap();
        assert_eq!(parsed.branch, "main");
        assert_eq!(parsed.path, None);
    }

    #[test]
    fn txt_extension_is_accepted() {
        let parsed = CleanPath::parse("gh_o-az_2md@main_src.txt").unwrap();
        assert_eq!(parsed.extension, SlugExtension::Txt);
        assert_eq!(parsed.path.as_deref(), Some("src"));
    }

    #[test]
    fn rejects_malformed_slugs() {
        assert_eq!(CleanPath::parse("nope_o-az_2md.md"), None);
        assert_eq!(CleanPath::parse("gh_o-az_2md"), None);
        assert_eq!(CleanPath::parse("gh_o-az.md"), None);
        assert_eq!(CleanPath::parse("gh__2md@main.md"), None);
    }

    #[test]
    fn file_prefix_sets_kind() {
        let parsed = CleanPath::parse("ghf_o-az_2md@main_justfile.md").unwrap();
        assert!(parsed.is_file);
        assert_eq!(parsed.path.as_deref(), Some("justfile"));
    }
}
