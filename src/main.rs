//! repo2md - Render GitHub repos, directories, or files as one markdown document
//!
//! # Usage
//! ```bash
//! repo2md                      # Start server on 127.0.0.1:3001
//! repo2md --port 8080          # Custom port
//! GITHUB_TOKEN=... repo2md     # Authenticated metadata lookups
//! ```

mod cleanpath;
mod concurrency;
mod error;
mod filter;
mod github;
mod models;
mod routes;

use std::sync::Arc;

use clap::Parser;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use github::{Aggregator, GitHubClient};

/// Render GitHub repositories as aggregated markdown
#[derive(Parser)]
#[command(name = "repo2md")]
#[command(about = "Convert GitHub repos, directories, or files to markdown", long_about = None)]
struct Cli {
    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to run the server on
    #[arg(short, long, default_value = "3001")]
    port: u16,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing (quieter for production)
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let token = std::env::var("GITHUB_TOKEN").ok().filter(|t| !t.is_empty());
    let aggregator = Arc::new(Aggregator::new(GitHubClient::new(token)));

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = routes::create_router(aggregator)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", cli.host, cli.port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!("✗ Failed to bind to {}: {}", addr, e);
            eprintln!("  Try a different port with --port <PORT>");
            std::process::exit(1);
        }
    };

    println!();
    println!("  repo2md listening on http://{}", addr);
    println!("  Try: http://{}/github.com/o-az/2md", addr);
    println!();
    println!("  Press Ctrl+C to stop");
    println!();

    let shutdown = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to listen for Ctrl+C");
        println!("\n  Shutting down...");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}
