//! The rendering endpoint.
//!
//! One wildcard route serves two addressing schemes:
//! - clean-path slugs (`gh_…`/`ghf_…` ending in `.md`/`.txt`) render the
//!   aggregated document directly, since the slug already carries a
//!   definite branch;
//! - `github.com/...` URLs are parsed, disambiguated, and redirected (301)
//!   to their clean path, preserving the query string.

use axum::{
    Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};

use super::SharedAggregator;
use crate::cleanpath::{CleanPath, looks_like_slug};
use crate::error::{AppError, Result};
use crate::github::{RenderOptions, parse_reference};

pub fn routes(aggregator: SharedAggregator) -> Router {
    Router::new()
        .route("/{*path}", get(render_path))
        .with_state(aggregator)
}

async fn render_path(
    State(aggregator): State<SharedAggregator>,
    Path(path): Path<String>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Response> {
    if looks_like_slug(&path) {
        let clean = CleanPath::parse(&path)
            .ok_or_else(|| AppError::InvalidSlug(path.clone()))?;
        let options = render_options(&params);
        let document = aggregator.render(&clean.to_resolved(), &options).await?;
        return Ok(markdown(document));
    }

    if path.starts_with("github.com/") || path.starts_with("https://github.com/") {
        let reference = parse_reference(&path)?;
        let resolved = aggregator.resolve(&reference).await?;
        let slug = CleanPath::from_resolved(&resolved).encode();
        let query = query_string(&params);
        return Ok((
            StatusCode::MOVED_PERMANENTLY,
            [(header::LOCATION, format!("/{}{}", slug, query))],
        )
            .into_response());
    }

    Err(AppError::NotFound(format!("/{} is not a valid path", path)))
}

fn render_options(params: &[(String, String)]) -> RenderOptions {
    let values = |name: &str| -> Vec<String> {
        params
            .iter()
            .filter(|(key, _)| key == name)
            .map(|(_, value)| value.clone())
            .collect()
    };
    RenderOptions {
        include: values("include"),
        exclude: values("exclude"),
        submodules: params
            .iter()
            .any(|(key, value)| key == "submodules" && value == "true"),
    }
}

fn query_string(params: &[(String, String)]) -> String {
    if params.is_empty() {
        return String::new();
    }
    let encoded: Vec<String> = params
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect();
    format!("?{}", encoded.join("&"))
}

fn markdown(body: String) -> Response {
    (
        [(header::CONTENT_TYPE, "text/markdown; charset=utf-8")],
        body,
    )
        .into_response()
}
