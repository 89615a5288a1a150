//! Include/exclude filtering of file listings.
//!
//! Raw filter values come from repeatable `include=` / `exclude=` query
//! parameters, either as a bare pattern or a `{a,b,c}` brace list. Each
//! pattern string is compiled once into a `FilterPattern` and then applied
//! to every path, so globs are not rebuilt per file.
//!
//! Pattern precedence (first matching rule type decides):
//! 1. contains `*` → anchored glob against full path or basename
//! 2. starts with `.` → literal suffix match
//! 3. ends with `/` → directory prefix or embedded path segment
//! 4. contains `/` → same prefix-or-embedded-segment rule
//! 5. otherwise → basename equality or substring of the full path

use regex::Regex;

use crate::models::RepoFile;

#[derive(Debug, Clone)]
pub enum FilterPattern {
    Glob(Regex),
    Suffix(String),
    Directory(String),
    PathPrefix(String),
    Name(String),
}

impl FilterPattern {
    pub fn compile(raw: &str) -> Self {
        if raw.contains('*') {
            let source = format!(
                "^{}$",
                raw.split('*')
                    .map(regex::escape)
                    .collect::<Vec<_>>()
                    .join(".*")
            );
            match Regex::new(&source) {
                Ok(glob) => return FilterPattern::Glob(glob),
                // Escaped literals cannot produce an invalid pattern, but
                // degrade to a name match rather than panic if they ever do.
                Err(_) => return FilterPattern::Name(raw.to_string()),
            }
        }
        if raw.starts_with('.') {
            FilterPattern::Suffix(raw.to_string())
        } else if raw.ends_with('/') {
            FilterPattern::Directory(raw.to_string())
        } else if raw.contains('/') {
            FilterPattern::PathPrefix(raw.to_string())
        } else {
            FilterPattern::Name(raw.to_string())
        }
    }

    pub fn matches(&self, path: &str) -> bool {
        let basename = path.rsplit('/').next().unwrap_or("");
        match self {
            FilterPattern::Glob(glob) => glob.is_match(path) || glob.is_match(basename),
            FilterPattern::Suffix(suffix) => path.ends_with(suffix.as_str()),
            FilterPattern::Directory(dir) => {
                path.starts_with(dir.as_str()) || path.contains(&format!("/{}", dir))
            }
            FilterPattern::PathPrefix(prefix) => {
                path.starts_with(prefix.as_str()) || path.contains(&format!("/{}", prefix))
            }
            FilterPattern::Name(name) => basename == name || path.contains(name.as_str()),
        }
    }
}

/// Check one path against one raw pattern string.
pub fn matches_pattern(path: &str, pattern: &str) -> bool {
    FilterPattern::compile(pattern).matches(path)
}

/// Expand raw query values into a flat pattern list. Values are trimmed and
/// blanks dropped; `{a,b,c}` splits into multiple patterns; repeated values
/// concatenate in the order given.
pub fn parse_filter_params(values: &[String]) -> Vec<String> {
    let mut patterns = Vec::new();
    for value in values {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed.starts_with('{') && trimmed.ends_with('}') {
            patterns.extend(
                trimmed[1..trimmed.len() - 1]
                    .split(',')
                    .map(str::trim)
                    .filter(|part| !part.is_empty())
                    .map(str::to_string),
            );
        } else {
            patterns.push(trimmed.to_string());
        }
    }
    patterns
}

/// Apply include (allowlist) then exclude (denylist) filters, each an OR
/// over its patterns. The stages are sequential: a file is only considered
/// for exclusion after it survived inclusion.
pub fn apply_filters(
    files: Vec<RepoFile>,
    exclude_values: &[String],
    include_values: &[String],
) -> Vec<RepoFile> {
    let include: Vec<FilterPattern> = parse_filter_params(include_values)
        .iter()
        .map(|raw| FilterPattern::compile(raw))
        .collect();
    let exclude: Vec<FilterPattern> = parse_filter_params(exclude_values)
        .iter()
        .map(|raw| FilterPattern::compile(raw))
        .collect();

    let mut result = files;

    if !include.is_empty() {
        result.retain(|file| include.iter().any(|pattern| pattern.matches(&file.path)));
    }

    if !exclude.is_empty() {
        result.retain(|file| !exclude.iter().any(|pattern| pattern.matches(&file.path)));
    }

    result
}
