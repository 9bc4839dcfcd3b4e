//! Sitemap rendering
//!
//! Serializes a finished sitemap tree to the indented text format written
//! to `sitemap.txt`.

use crate::sitemap::Node;

/// Renders a sitemap tree as indented text
///
/// Depth-first, children sorted lexicographically by URL. The root URL is
/// emitted on its own unindented line; every child is indented one tab per
/// level below the root. The output ends with a newline.
///
/// # Examples
///
/// ```
/// use sitemapper::sitemap::Node;
/// use sitemapper::prettify_sitemap;
///
/// let mut root = Node::new("https://example.com");
/// root.links.insert(
///     "https://example.com/about".to_string(),
///     Node::new("https://example.com/about"),
/// );
/// assert_eq!(
///     prettify_sitemap(&root, 0),
///     "https://example.com\n\thttps://example.com/about\n"
/// );
/// ```
pub fn prettify_sitemap(node: &Node, depth: usize) -> String {
    let mut result = String::new();

    if depth == 0 {
        result.push_str(&node.url);
        result.push('\n');
    }

    let mut children: Vec<&String> = node.links.keys().collect();
    children.sort();

    for child in children {
        result.push_str(&"\t".repeat(depth + 1));
        result.push_str(child);
        result.push('\n');
        result.push_str(&prettify_sitemap(&node.links[child], depth + 1));
    }

    result
}
