//! Fixed-depth prefix tree used to route lines to clusters.
//!
//! The first level below the root is keyed by token count, so lines of
//! different lengths never share a path. The next `depth` levels are keyed
//! by the leading tokens of the line. A node holding `max_children`
//! children routes any further unseen token into a single shared
//! [`WILDCARD`] child instead of growing.

use crate::domain::cluster::ClusterId;
use crate::domain::token::WILDCARD;
use ahash::AHashMap;

/// A node of the prefix tree.
///
/// A node reached at the end of a path may be bound to one cluster, which
/// makes it a leaf. Nodes only ever hold cluster identifiers.
#[derive(Debug, Default)]
pub struct Node {
    children: AHashMap<String, Node>,
    cluster_id: Option<ClusterId>,
}

impl Node {
    /// Check if this node is bound to a cluster.
    pub fn is_leaf(&self) -> bool {
        self.cluster_id.is_some()
    }

    /// The cluster bound to this node, if any.
    pub fn cluster_id(&self) -> Option<ClusterId> {
        self.cluster_id
    }

    /// Bind this node to a cluster.
    pub fn bind(&mut self, id: ClusterId) {
        self.cluster_id = Some(id);
    }

    /// Look up a child by its discriminator.
    pub fn child(&self, key: &str) -> Option<&Node> {
        self.children.get(key)
    }

    /// Number of direct children, the wildcard child included.
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Descend one level for `token`, creating the child if needed.
    ///
    /// An existing exact child always wins. Otherwise a new exact child is
    /// created while there is room, and once the node is full the token
    /// goes to the shared wildcard child.
    fn descend(&mut self, token: &str, max_children: usize) -> &mut Node {
        let key = if self.children.contains_key(token) || self.children.len() < max_children {
            token
        } else {
            WILDCARD
        };
        self.children.entry(key.to_owned()).or_default()
    }

    fn count_nodes(&self) -> usize {
        1 + self.children.values().map(Node::count_nodes).sum::<usize>()
    }
}

/// Prefix tree keyed by token count, then by up to `depth` leading tokens.
#[derive(Debug)]
pub struct PrefixTree {
    root: Node,
    depth: usize,
    max_children: usize,
}

impl PrefixTree {
    /// Create an empty tree.
    ///
    /// # Arguments
    /// * `depth` - Number of leading tokens used to discriminate paths
    /// * `max_children` - Fan-out cap per node before falling back to the wildcard child
    pub fn new(depth: usize, max_children: usize) -> Self {
        Self {
            root: Node::default(),
            depth,
            max_children,
        }
    }

    /// Locate or create the node that buckets `tokens`.
    ///
    /// The returned node is reached after `min(depth, tokens.len())` token
    /// steps below the length bucket. It may or may not be a leaf yet.
    /// Callers never pass an empty sequence; if they do, the node returned
    /// is the bucket for length zero.
    pub fn resolve(&mut self, tokens: &[&str]) -> &mut Node {
        let max_children = self.max_children;
        let path_depth = self.depth.min(tokens.len());

        let mut current = self
            .root
            .children
            .entry(tokens.len().to_string())
            .or_default();

        for token in &tokens[..path_depth] {
            current = current.descend(token, max_children);
        }

        current
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn max_children(&self) -> usize {
        self.max_children
    }

    /// Total number of nodes, the root included.
    pub fn node_count(&self) -> usize {
        self.root.count_nodes()
    }
}
