//! Text-file classification and the conventional ignore list.

use crate::models::RepoFile;

/// Extensions rendered as text. Checked case-insensitively against the end
/// of the path.
const TEXT_EXTENSIONS: &[&str] = &[
    // Markdown & docs
    ".md",
    ".mdx",
    ".markdown",
    ".txt",
    ".rst",
    ".adoc",
    ".org",
    ".tex",
    // JavaScript/TypeScript
    ".js",
    ".ts",
    ".jsx",
    ".tsx",
    ".mjs",
    ".cjs",
    ".mts",
    ".cts",
    ".d.ts",
    ".d.cts",
    ".d.mts",
    // Python
    ".py",
    ".pyi",
    ".pyx",
    // Ruby
    ".rb",
    ".rake",
    ".gemspec",
    // Go
    ".go",
    ".mod",
    ".sum",
    // Rust
    ".rs",
    // JVM
    ".java",
    ".kt",
    ".kts",
    ".scala",
    ".groovy",
    ".gradle",
    ".clj",
    ".cljs",
    // C/C++
    ".c",
    ".cpp",
    ".cc",
    ".cxx",
    ".h",
    ".hpp",
    ".hxx",
    // C#/F#
    ".cs",
    ".fs",
    ".fsx",
    // Web
    ".html",
    ".htm",
    ".css",
    ".scss",
    ".sass",
    ".less",
    ".styl",
    // Data/Config
    ".json",
    ".jsonc",
    ".json5",
    ".yaml",
    ".yml",
    ".toml",
    ".xml",
    ".ini",
    ".cfg",
    ".conf",
    ".env",
    ".properties",
    // Shell
    ".sh",
    ".bash",
    ".zsh",
    ".fish",
    ".ps1",
    ".psm1",
    ".bat",
    ".cmd",
    // Database
    ".sql",
    ".prisma",
    // GraphQL
    ".graphql",
    ".gql",
    // Frontend frameworks
    ".vue",
    ".svelte",
    ".astro",
    // Mobile
    ".swift",
    ".m",
    ".mm",
    ".dart",
    // Other languages
    ".lua",
    ".php",
    ".pl",
    ".pm",
    ".r",
    ".jl",
    ".ex",
    ".exs",
    ".erl",
    ".hrl",
    ".hs",
    ".elm",
    ".ml",
    ".mli",
    ".nim",
    ".zig",
    ".v",
    ".sol",
    ".vy",
    ".move",
    ".cairo",
    // DevOps/CI
    ".dockerfile",
    ".makefile",
    ".tf",
    ".tfvars",
    ".hcl",
    ".nix",
    // Misc
    ".gitignore",
    ".editorconfig",
    ".csv",
    ".tsv",
    ".diff",
    ".patch",
    ".proto",
    ".thrift",
    ".wasm",
    ".wat",
];

/// Files treated as text regardless of extension, matched against the
/// lowercase basename.
const KNOWN_TEXT_FILES: &[&str] = &[
    "dockerfile",
    "makefile",
    "rakefile",
    "gemfile",
    "procfile",
    "justfile",
    "vagrantfile",
    "brewfile",
    "podfile",
    "cartfile",
    "fastfile",
    "appfile",
    "license",
    "licence",
    "readme",
    "changelog",
    "changes",
    "history",
    "contributing",
    "contributors",
    "authors",
    "maintainers",
    "codeowners",
    "security",
    "code_of_conduct",
    ".gitignore",
    ".gitattributes",
    ".gitmodules",
    ".editorconfig",
    ".prettierrc",
    ".prettierignore",
    ".eslintrc",
    ".eslintignore",
    ".babelrc",
    ".npmrc",
    ".nvmrc",
    ".node-version",
    ".python-version",
    ".ruby-version",
    ".tool-versions",
    ".env.example",
    ".env.local",
    ".env.development",
    ".env.production",
    ".dockerignore",
    ".stylelintrc",
    ".markdownlint",
];

/// Conventionally-ignored paths dropped from every aggregation.
/// Entries containing `/` match by path prefix or equality; bare entries
/// match any whole path segment (which covers basenames too).
const IGNORED_PATHS: &[&str] = &[
    "node_modules",
    ".git",
    "dist",
    "build",
    "out",
    "target",
    "vendor",
    "coverage",
    ".next",
    ".nuxt",
    ".cache",
    ".DS_Store",
    "package-lock.json",
    "yarn.lock",
    "pnpm-lock.yaml",
    "bun.lockb",
    "Cargo.lock",
    "Gemfile.lock",
    "composer.lock",
    "poetry.lock",
    "uv.lock",
];

pub fn is_text_file(path: &str) -> bool {
    let basename = path.rsplit('/').next().unwrap_or("").to_lowercase();
    if KNOWN_TEXT_FILES.contains(&basename.as_str()) {
        return true;
    }
    let lower = path.to_lowercase();
    TEXT_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// Drop files hit by the ignore list.
pub fn filter_ignored(files: Vec<RepoFile>) -> Vec<RepoFile> {
    files
        .into_iter()
        .filter(|file| {
            !IGNORED_PATHS.iter().any(|pattern| {
                if pattern.contains('/') {
                    file.path.starts_with(pattern) || file.path == *pattern
                } else {
                    file.path.split('/').any(|segment| segment == *pattern)
                }
            })
        })
        .collect()
}

/// Keep only files strictly under `directory`.
pub fn filter_by_directory(files: Vec<RepoFile>, directory: &str) -> Vec<RepoFile> {
    let normalized = directory.trim_end_matches('/');
    let prefix = format!("{}/", normalized);
    files
        .into_iter()
        .filter(|file| file.path.starts_with(&prefix))
        .collect()
}
