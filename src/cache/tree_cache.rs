//! Memoized relative lookups for a node tree.

use std::collections::HashMap;
use std::rc::Rc;

use crate::types::NodeId;

/// Cache for ancestor and descendant views.
///
/// Both views are derived from the tree structure only, so entries stay valid
/// until nodes are added (lazy child merge) or the tree is rebuilt. Selection,
/// expansion and search changes never invalidate it.
pub struct TreeCache {
    /// Maps node -> ancestors, nearest first.
    pub ancestors: HashMap<NodeId, Rc<[NodeId]>>,

    /// Maps node -> descendants in pre-order, excluding the node itself.
    pub descendants: HashMap<NodeId, Rc<[NodeId]>>,
}

impl TreeCache {
    /// Creates a new empty cache.
    pub fn new() -> Self {
        Self {
            ancestors: HashMap::new(),
            descendants: HashMap::new(),
        }
    }

    /// Invalidates all cached data.
    ///
    /// This should be called whenever children are attached to a node.
    pub fn invalidate(&mut self) {
        self.ancestors.clear();
        self.descendants.clear();
    }

    /// Number of cached entries across both views.
    pub fn len(&self) -> usize {
        self.ancestors.len() + self.descendants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for TreeCache {
    fn default() -> Self {
        Self::new()
    }
}
