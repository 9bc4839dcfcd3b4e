//! Sitemap tree for discovered pages
//!
//! # Components
//!
//! - `Node`: a single page and the pages first discovered through it
//! - `SitemapStore`: the tree plus the parent-of index used to locate nodes

mod node;
mod store;

pub use node::Node;
pub use store::{SitemapStore, ROOT};
