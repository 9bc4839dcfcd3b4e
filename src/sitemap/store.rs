use super::Node;
use std::collections::HashMap;

/// Sentinel parent recorded for the seed URL
pub const ROOT: &str = "ROOT";

/// The sitemap tree plus the parent-of index
///
/// The parent-of index maps each canonical URL to the URL of the page that
/// first discovered it (`ROOT` for the seed). It is the authoritative way to
/// locate a node: walk parent pointers up to `ROOT`, then descend from the
/// tree root along that path in reverse.
///
/// Parentage is first-writer-wins: the page that first discovers a URL stays
/// its parent in the index, which is what keeps the structure a tree even
/// when many pages link to the same URL. A later discoverer still gets an
/// empty child entry in its own `links`, but that entry is never populated
/// because `locate` resolves through the first parent.
///
/// The store has no interior locking; the caller guards it with a single
/// mutex and holds that lock for the whole of each operation.
#[derive(Debug)]
pub struct SitemapStore {
    root: Node,
    parents: HashMap<String, String>,
}

impl SitemapStore {
    /// Creates a store whose tree root is the seed URL
    pub fn new(seed: &str) -> Self {
        let mut parents = HashMap::new();
        parents.insert(seed.to_string(), ROOT.to_string());
        Self {
            root: Node::new(seed),
            parents,
        }
    }

    /// Returns the tree root
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Consumes the store and returns the tree root
    pub fn into_root(self) -> Node {
        self.root
    }

    /// Returns the recorded parent URL for `url`, if any
    pub fn parent_of(&self, url: &str) -> Option<&str> {
        self.parents.get(url).map(String::as_str)
    }

    /// Locates the node for `url` by walking the parent-of index
    ///
    /// The path from `url` up to the seed is collected, then walked in
    /// reverse from the tree root. A URL whose parent chain is empty (the
    /// seed itself, the `ROOT` sentinel, or a URL that was never inserted)
    /// resolves to the tree root. Returns `None` only if the parent chain
    /// names a child the tree does not contain, which cannot happen for a
    /// URL inserted through [`insert_children`](Self::insert_children).
    pub fn locate(&self, url: &str) -> Option<&Node> {
        let mut node = &self.root;
        for segment in self.path_from_root(url) {
            node = node.links.get(segment)?;
        }
        Some(node)
    }

    /// Inserts `children` under the node for `parent_url`
    ///
    /// For each child: a fresh empty node is added to the parent's links
    /// unless the child is the parent itself (self-link) or already present
    /// there; the parent-of entry is recorded only if the child has never
    /// been parented before.
    pub fn insert_children(&mut self, parent_url: &str, children: &[String]) {
        let path: Vec<String> = self
            .path_from_root(parent_url)
            .into_iter()
            .map(String::from)
            .collect();

        let mut node = &mut self.root;
        for segment in &path {
            match node.links.get_mut(segment) {
                Some(child) => node = child,
                None => return,
            }
        }

        for child in children {
            if child != parent_url && !node.links.contains_key(child) {
                node.links.insert(child.clone(), Node::new(child.clone()));
            }
        }

        for child in children {
            self.parents
                .entry(child.clone())
                .or_insert_with(|| parent_url.to_string());
        }
    }

    /// Replaces a redirecting URL with its target in the tree
    ///
    /// If `from` has a recorded parent and `to` has none, `to` is parented
    /// where `from` was, a fresh empty node for `to` is inserted under that
    /// parent, and the `from` entry is removed from the parent's links. The
    /// `from` URL keeps its visit-state entry; it simply never owns a tree
    /// node again. Anything else is a no-op.
    pub fn rewrite_redirect(&mut self, from: &str, to: &str) {
        let Some(parent_url) = self.parents.get(from).cloned() else {
            return;
        };
        if self.parents.contains_key(to) {
            return;
        }

        self.parents.insert(to.to_string(), parent_url.clone());

        let path: Vec<String> = self
            .path_from_root(&parent_url)
            .into_iter()
            .map(String::from)
            .collect();

        let mut node = &mut self.root;
        for segment in &path {
            match node.links.get_mut(segment) {
                Some(child) => node = child,
                None => return,
            }
        }

        node.links.insert(to.to_string(), Node::new(to));
        node.links.remove(from);
    }

    /// Collects the root-to-node path for `url` from the parent-of index
    ///
    /// The returned path includes `url` itself as its last element and is
    /// empty when `url` resolves to the tree root: the seed, the `ROOT`
    /// sentinel, and URLs with no parent entry all have an empty path.
    fn path_from_root<'a>(&'a self, url: &'a str) -> Vec<&'a str> {
        let mut path = Vec::new();
        let mut cursor = url;
        while let Some(parent) = self.parents.get(cursor) {
            if parent == ROOT {
                break;
            }
            path.push(cursor);
            cursor = parent;
        }
        path.reverse();
        path
    }
}
