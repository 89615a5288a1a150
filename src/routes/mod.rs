//! HTTP route handlers.
//!
//! - `landing`: usage page, health check, favicon
//! - `render`: clean-path slugs and GitHub URL dispatch
//!
//! Everything else (reference resolution, fetching, document assembly)
//! lives in `crate::github`.

pub mod landing;
pub mod render;

use std::sync::Arc;

use axum::Router;

use crate::github::{Aggregator, GitHubClient};

pub type SharedAggregator = Arc<Aggregator<GitHubClient>>;

pub fn create_router(aggregator: SharedAggregator) -> Router {
    Router::new()
        .merge(landing::routes())
        .merge(render::routes(aggregator))
}
