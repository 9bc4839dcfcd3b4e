//! Sitemapper: a concurrent single-domain web crawler
//!
//! This crate crawls every page of a single domain reachable from a seed URL
//! by following HTML anchor links, and builds a tree-shaped sitemap rooted at
//! the seed. Links to other hosts (including subdomains) and other schemes
//! are ignored.

pub mod crawler;
pub mod output;
pub mod sitemap;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for sitemapper operations
#[derive(Debug, Error)]
pub enum SitemapperError {
    #[error("invalid seed URL {url:?}: {source}")]
    InvalidSeed {
        url: String,
        source: ::url::ParseError,
    },

    #[error("seed URL {0:?} has no host")]
    MissingHost(String),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

/// Result type alias for sitemapper operations
pub type Result<T> = std::result::Result<T, SitemapperError>;

// Re-export commonly used types
pub use crawler::{crawl, crawl_with_policy, RetryPolicy};
pub use output::prettify_sitemap;
pub use sitemap::Node;
pub use url::{canonicalize_seed, normalize_url};
