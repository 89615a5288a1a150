pub mod aggregate;
pub mod client;
pub mod reference;
pub mod resolve;
pub mod submodules;
pub mod textfile;

#[cfg(test)]
pub mod testing;

pub use aggregate::{Aggregator, RenderOptions};
pub use client::{GitHubClient, HostError, RepoHost};
pub use reference::parse_reference;
pub use resolve::resolve_reference;
