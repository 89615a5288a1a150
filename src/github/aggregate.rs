//! Document aggregation.
//!
//! Orchestrates a render: resolve the reference, list the repository,
//! narrow the listing (sub-path, include/exclude filters, ignore list,
//! text files), fetch the surviving contents with bounded concurrency, and
//! assemble one markdown document. Individual file failures become inline
//! placeholder sections; only reference resolution and the top-level
//! listing are allowed to fail the request.

use tracing::debug;

use crate::concurrency::map_bounded;
use crate::error::{AppError, Result};
use crate::filter::apply_filters;
use crate::github::client::RepoHost;
use crate::github::resolve::resolve_reference;
use crate::github::submodules::{SubmoduleOptions, fetch_submodules};
use crate::github::textfile::{filter_by_directory, filter_ignored, is_text_file};
use crate::models::{Reference, ResolvedReference, SubmoduleContent};

const FETCH_CONCURRENCY: usize = 10;
const FETCH_FAILED_PLACEHOLDER: &str = "*Failed to fetch*";

/// Render-time knobs, parsed from request parameters.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Raw repeatable `include=` values (bare pattern or `{a,b,c}`).
    pub include: Vec<String>,
    /// Raw repeatable `exclude=` values.
    pub exclude: Vec<String>,
    /// Recurse into git submodules.
    pub submodules: bool,
}

pub struct Aggregator<H> {
    host: H,
    concurrency: usize,
    submodule_options: SubmoduleOptions,
}

impl<H: RepoHost> Aggregator<H> {
    pub fn new(host: H) -> Self {
        Self {
            host,
            concurrency: FETCH_CONCURRENCY,
            submodule_options: SubmoduleOptions::default(),
        }
    }

    /// Disambiguate a parsed reference into a definite branch + sub-path.
    pub async fn resolve(&self, reference: &Reference) -> Result<ResolvedReference> {
        Ok(resolve_reference(&self.host, reference).await?)
    }

    /// Fetch a single file's raw content (the `File` kind short-circuit).
    pub async fn fetch_file(&self, resolved: &ResolvedReference) -> Result<String> {
        let path = resolved.path.as_deref().ok_or_else(|| {
            AppError::InvalidReference("file reference without a path".to_string())
        })?;
        Ok(self
            .host
            .get_file(&resolved.owner, &resolved.repo, &resolved.branch, path)
            .await?)
    }

    /// Render the aggregated markdown document for a resolved reference.
    pub async fn render(
        &self,
        resolved: &ResolvedReference,
        options: &RenderOptions,
    ) -> Result<String> {
        if resolved.is_file() {
            return self.fetch_file(resolved).await;
        }

        let all_files = self
            .host
            .list_files(&resolved.owner, &resolved.repo, &resolved.branch)
            .await?;

        let mut files = all_files.clone();
        if let Some(path) = &resolved.path {
            files = filter_by_directory(files, path);
        }
        files = apply_filters(files, &options.exclude, &options.include);
        files = filter_ignored(files);
        files.retain(|file| is_text_file(&file.path));

        debug!(
            owner = %resolved.owner,
            repo = %resolved.repo,
            branch = %resolved.branch,
            files = files.len(),
            "aggregating"
        );

        let mut sections = map_bounded(&files, self.concurrency, |file| async move {
            match self
                .host
                .get_file(&resolved.owner, &resolved.repo, &resolved.branch, &file.path)
                .await
            {
                Ok(content) => file_section(&file.path, &content),
                Err(err) => {
                    debug!(path = %file.path, %err, "file fetch failed");
                    placeholder_section(&file.path)
                }
            }
        })
        .await;

        // Submodule recursion only applies to whole-repo renders.
        if options.submodules && resolved.path.is_none() {
            let submodules = fetch_submodules(
                &self.host,
                &resolved.owner,
                &resolved.repo,
                &resolved.branch,
                &all_files,
                &self.submodule_options,
            )
            .await;
            sections.extend(submodules.iter().map(submodule_section));
        }

        let mut header = format!(
            "# {}/{}@{}",
            resolved.owner, resolved.repo, resolved.branch
        );
        if let Some(path) = &resolved.path {
            header.push('/');
            header.push_str(path);
        }

        Ok(format!("{}\n\n{}", header, sections.join("\n\n")))
    }
}

fn file_section(path: &str, content: &str) -> String {
    format!("## {}\n\n```\n{}\n```", path, content)
}

fn placeholder_section(path: &str) -> String {
    format!("## {}\n\n{}", path, FETCH_FAILED_PLACEHOLDER)
}

fn submodule_section(result: &SubmoduleContent) -> String {
    let heading = format!(
        "## Submodule: {} ({}/{})",
        result.submodule.path, result.submodule.owner, result.submodule.repo
    );
    if let Some(error) = &result.error {
        return format!("{}\n\n*{}*", heading, error);
    }
    let mut body = vec![heading];
    body.extend(
        result
            .files
            .iter()
            .map(|file| file_section(&file.path, &file.content)),
    );
    body.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::testing::FakeHost;
    use crate::models::RefKind;

    fn resolved(branch: &str, path: Option<&str>, kind: RefKind) -> ResolvedReference {
        ResolvedReference {
            owner: "o".to_string(),
            repo: "r".to_string(),
            branch: branch.to_string(),
            path: path.map(str::to_string),
            kind,
        }
    }

    #[tokio::test]
    async fn renders_whole_repo_document() {
        let host = FakeHost::new()
            .with_branch("main", &["README.md", "src/lib.rs", "logo.png"])
            .with_content("o/r", "main", "README.md", "hello");
        let aggregator = Aggregator::new(host);

        let doc = aggregator
            .render(&resolved("main", None, RefKind::Repo), &RenderOptions::default())
            .await
            .unwrap();

        assert!(doc.starts_with("# o/r@main\n\n"));
        assert!(doc.contains("## README.md\n\n```\nhello\n```"));
        assert!(doc.contains("## src/lib.rs"));
        // Binary files never make it into the document.
        assert!(!doc.contains("logo.png"));
    }

    #[tokio::test]
    async fn directory_render_scopes_and_includes_path_in_header() {
        let host = FakeHost::new().with_branch("main", &["src/a.rs", "src/b.rs", "top.md"]);
        let aggregator = Aggregator::new(host);

        let doc = aggregator
            .render(
                &resolved("main", Some("src"), RefKind::Directory),
                &RenderOptions::default(),
            )
            .await
            .unwrap();

        assert!(doc.starts_with("# o/r@main/src\n\n"));
        assert!(doc.contains("## src/a.rs"));
        assert!(!doc.contains("top.md"));
    }

    #[tokio::test]
    async fn failed_fetch_renders_placeholder_section() {
        let host = FakeHost::new()
            .with_branch("main", &["good.md", "bad.md"])
            .with_broken_content("o/r", "main", "bad.md");
        let aggregator = Aggregator::new(host);

        let doc = aggregator
            .render(&resolved("main", None, RefKind::Repo), &RenderOptions::default())
            .await
            .unwrap();

        assert!(doc.contains("## good.md\n\n```"));
        assert!(doc.contains("## bad.md\n\n*Failed to fetch*"));
    }

    #[tokio::test]
    async fn file_reference_returns_raw_content() {
        let host = FakeHost::new()
            .with_branch("main", &["src/main.rs"])
            .with_content("o/r", "main", "src/main.rs", "fn main() {}");
        let aggregator = Aggregator::new(host);

        let doc = aggregator
            .render(
                &resolved("main", Some("src/main.rs"), RefKind::File),
                &RenderOptions::default(),
            )
            .await
            .unwrap();

        assert_eq!(doc, "fn main() {}");
    }

    #[tokio::test]
    async fn file_reference_without_path_is_invalid() {
        let host = FakeHost::new();
        let aggregator = Aggregator::new(host);

        let result = aggregator
            .render(&resolved("main", None, RefKind::File), &RenderOptions::default())
            .await;

        assert!(matches!(result, Err(AppError::InvalidReference(_))));
    }

    #[tokio::test]
    async fn filters_apply_before_fetching() {
        let host = FakeHost::new().with_branch(
            "main",
            &["src/a.ts", "src/a.test.ts", "docs/guide.md"],
        );
        let aggregator = Aggregator::new(host);

        let options = RenderOptions {
            include: vec!["src/".to_string()],
            exclude: vec!["{.test.ts}".to_string()],
            submodules: false,
        };
        let doc = aggregator
            .render(&resolved("main", None, RefKind::Repo), &options)
            .await
            .unwrap();

        assert!(doc.contains("## src/a.ts"));
        assert!(!doc.contains("a.test.ts"));
        assert!(!doc.contains("docs/guide.md"));
    }

    #[tokio::test]
    async fn ignored_paths_are_dropped() {
        let host = FakeHost::new().with_branch(
            "main",
            &["src/a.rs", "node_modules/x/y.js", "yarn.lock"],
        );
        let aggregator = Aggregator::new(host);

        let doc = aggregator
            .render(&resolved("main", None, RefKind::Repo), &RenderOptions::default())
            .await
            .unwrap();

        assert!(doc.contains("## src/a.rs"));
        assert!(!doc.contains("node_modules"));
        assert!(!doc.contains("yarn.lock"));
    }

    #[tokio::test]
    async fn submodules_appended_for_whole_repo_renders() {
        let host = FakeHost::new()
            .with_branch("main", &[".gitmodules", "top.md"])
            .with_content(
                "o/r",
                "main",
                ".gitmodules",
                "[submodule \"s\"]\n\tpath = s\n\turl = https://github.com/x/s\n",
            )
            .with_repo_default_branch("x/s", "main")
            .with_repo_branch("x/s", "main", &["inner.md"]);
        let aggregator = Aggregator::new(host);

        let options = RenderOptions {
            submodules: true,
            ..RenderOptions::default()
        };
        let doc = aggregator
            .render(&resolved("main", None, RefKind::Repo), &options)
            .await
            .unwrap();

        assert!(doc.contains("## Submodule: s (x/s)"));
        assert!(doc.contains("## s/inner.md"));
    }

    #[tokio::test]
    async fn submodules_skipped_for_directory_renders() {
        let host = FakeHost::new()
            .with_branch("main", &[".gitmodules", "src/a.rs"])
            .with_content(
                "o/r",
                "main",
                ".gitmodules",
                "[submodule \"s\"]\n\tpath = s\n\turl = https://github.com/x/s\n",
            )
            .with_repo_default_branch("x/s", "main")
            .with_repo_branch("x/s", "main", &["inner.md"]);
        let aggregator = Aggregator::new(host);

        let options = RenderOptions {
            submodules: true,
            ..RenderOptions::default()
        };
        let doc = aggregator
            .render(&resolved("main", Some("src"), RefKind::Directory), &options)
            .await
            .unwrap();

        assert!(!doc.contains("Submodule"));
    }

    #[tokio::test]
    async fn resolve_then_render_via_shorthand() {
        let host = FakeHost::new()
            .with_branch("release/1.0", &["src/a.rs"])
            .with_branch("release", &["other.md"]);
        let aggregator = Aggregator::new(host);

        let reference = Reference {
            owner: "o".to_string(),
            repo: "r".to_string(),
            branch: None,
            path: Some("release/1.0/src".to_string()),
            kind: RefKind::Directory,
        };
        let resolved = aggregator.resolve(&reference).await.unwrap();
        assert_eq!(resolved.branch, "release/1.0");

        let doc = aggregator
            .render(&resolved, &RenderOptions::default())
            .await
            .unwrap();
        assert!(doc.starts_with("# o/r@release/1.0/src"));
    }
}
