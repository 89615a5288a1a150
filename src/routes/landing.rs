use axum::{
    Router,
    http::StatusCode,
    response::Html,
    routing::get,
};

pub fn routes() -> Router {
    Router::new()
        .route("/", get(landing))
        .route("/ping", get(ping))
        .route("/favicon.ico", get(favicon))
}

async fn ping() -> &'static str {
    "ok"
}

async fn favicon() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn landing() -> Html<&'static str> {
    Html(
        r#"<html>
  <body style="font-family: monospace; max-width: 800px; margin: 0 auto; padding: 1rem;">
    <h1>repo2md</h1>
    <p>Convert GitHub repos, directories, or files to markdown.</p>

    <h2>Usage</h2>
    <pre style="background: #f4f4f4; padding: 1rem; overflow-x: auto;">
/github.com/owner/repo              &rarr; whole repo
/github.com/owner/repo/tree/branch  &rarr; repo at branch
/github.com/owner/repo/tree/b/path  &rarr; directory at branch
/github.com/owner/repo/blob/b/file  &rarr; single file at branch
/github.com/owner/repo/path         &rarr; shorthand (file or dir)
</pre>

    <h2>Query parameters</h2>
    <pre style="background: #f4f4f4; padding: 1rem; overflow-x: auto;">
?include=.rs or ?include={src/,docs/}   keep only matching files
?exclude=.test.ts                       drop matching files
?submodules=true                        recurse into git submodules
</pre>

    <h2>Clean path format</h2>
    <ul>
      <li><code>/gh_owner_repo@branch.md</code> &mdash; whole repo</li>
      <li><code>/gh_owner_repo@branch_src.md</code> &mdash; directory</li>
      <li><code>/ghf_owner_repo@branch_justfile.md</code> &mdash; single file</li>
    </ul>
  </body>
</html>"#,
    )
}
