//! Arena storage for nodes.
//!
//! Parent links are non-owning `NodeId`s into the arena, so there are no
//! reference cycles. Paths map back to ids through `by_path`.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::cache::TreeCache;
use crate::node::Node;
use crate::types::{NodeId, SelectionMode, TreeRecord, TreeSnapshot};

/// Owns every node of one build of the caller's data.
pub struct NodeTree {
    pub(crate) nodes: Vec<Node>,
    pub(crate) roots: Vec<NodeId>,
    pub(crate) by_path: HashMap<String, NodeId>,
    /// The mode-dependent working list: the pre-order flattening for the
    /// hierarchical modes, the root list otherwise.
    pub(crate) working: Vec<NodeId>,
    pub(crate) mode: SelectionMode,
    pub(crate) generation: u64,
    cache: RefCell<TreeCache>,
}

impl NodeTree {
    pub(crate) fn empty(mode: SelectionMode, generation: u64) -> Self {
        Self {
            nodes: Vec::new(),
            roots: Vec::new(),
            by_path: HashMap::new(),
            working: Vec::new(),
            mode,
            generation,
            cache: RefCell::new(TreeCache::new()),
        }
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    /// Build counter; child-load results carry it to detect staleness.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Nodes participating in selection for the current mode, in tree order.
    pub fn working_nodes(&self) -> &[NodeId] {
        &self.working
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Node by id. Ids handed out by this tree are always valid.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub fn id_of(&self, path: &str) -> Option<NodeId> {
        self.by_path.get(path).copied()
    }

    pub fn by_path(&self, path: &str) -> Option<&Node> {
        self.id_of(path).map(|id| self.node(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Ancestors of `id`, nearest first.
    pub fn ancestors(&self, id: NodeId) -> Rc<[NodeId]> {
        if let Some(cached) = self.cache.borrow().ancestors.get(&id) {
            return Rc::clone(cached);
        }

        let mut out = Vec::with_capacity(self.node(id).depth);
        let mut current = self.node(id).parent;
        while let Some(parent) = current {
            out.push(parent);
            current = self.node(parent).parent;
        }

        let view: Rc<[NodeId]> = Rc::from(out);
        self.cache.borrow_mut().ancestors.insert(id, Rc::clone(&view));
        view
    }

    /// Descendants of `id` in pre-order, excluding `id` itself.
    pub fn descendants(&self, id: NodeId) -> Rc<[NodeId]> {
        if let Some(cached) = self.cache.borrow().descendants.get(&id) {
            return Rc::clone(cached);
        }

        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.node(id).children.iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.node(next).children.iter().rev().copied());
        }

        let view: Rc<[NodeId]> = Rc::from(out);
        self.cache.borrow_mut().descendants.insert(id, Rc::clone(&view));
        view
    }

    /// Pre-order flattening of the whole tree.
    pub fn preorder(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        for &root in &self.roots {
            out.push(root);
            out.extend(self.descendants(root).iter().copied());
        }
        out
    }

    pub(crate) fn invalidate_cache(&self) {
        self.cache.borrow_mut().invalidate();
    }

    /// The caller's record for one node, with current state written back.
    pub fn record(&self, id: NodeId) -> TreeRecord {
        self.node(id).to_record()
    }

    /// Rebuilds the nested caller shape of the subtree rooted at `id`.
    pub fn record_with_children(&self, id: NodeId) -> TreeRecord {
        let node = self.node(id);
        let mut record = node.to_record();
        record.children = node
            .children
            .iter()
            .map(|&child| self.record_with_children(child))
            .collect();
        record
    }

    /// Rebuilds the whole tree in the caller's shape.
    pub fn to_records(&self) -> Vec<TreeRecord> {
        self.roots
            .iter()
            .map(|&root| self.record_with_children(root))
            .collect()
    }

    /// Selection snapshot handed to callbacks.
    pub fn snapshot(&self, selected: &[NodeId]) -> TreeSnapshot {
        TreeSnapshot {
            selected: selected.iter().map(|&id| self.record(id)).collect(),
            tree: self.to_records(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::builder::build_tree;
    use crate::types::{SelectionMode, TreeRecord};

    fn sample() -> Vec<TreeRecord> {
        vec![
            TreeRecord::new("a").with_children(vec![
                TreeRecord::new("a0").with_children(vec![TreeRecord::new("a00")]),
                TreeRecord::new("a1"),
            ]),
            TreeRecord::new("b"),
        ]
    }

    #[test]
    fn test_ancestors_nearest_first() {
        let tree = build_tree(&sample(), SelectionMode::Tree, 0);
        let leaf = tree.id_of("0.0.0").unwrap();
        let paths: Vec<_> = tree
            .ancestors(leaf)
            .iter()
            .map(|&id| tree.node(id).path().to_string())
            .collect();
        assert_eq!(paths, vec!["0.0", "0"]);
    }

    #[test]
    fn test_descendants_preorder_excludes_self() {
        let tree = build_tree(&sample(), SelectionMode::Tree, 0);
        let root = tree.id_of("0").unwrap();
        let paths: Vec<_> = tree
            .descendants(root)
            .iter()
            .map(|&id| tree.node(id).path().to_string())
            .collect();
        assert_eq!(paths, vec!["0.0", "0.0.0", "0.1"]);
    }

    #[test]
    fn test_views_are_cached_until_invalidated() {
        let tree = build_tree(&sample(), SelectionMode::Tree, 0);
        let root = tree.id_of("0").unwrap();
        let first = tree.descendants(root);
        let second = tree.descendants(root);
        assert!(std::rc::Rc::ptr_eq(&first, &second));

        tree.invalidate_cache();
        let third = tree.descendants(root);
        assert!(!std::rc::Rc::ptr_eq(&first, &third));
        assert_eq!(&*first, &*third);
    }

    #[test]
    fn test_to_records_round_trips_structure() {
        let records = sample();
        let tree = build_tree(&records, SelectionMode::Tree, 0);
        let out = tree.to_records();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].children.len(), 2);
        assert_eq!(out[0].children[0].children[0].label, "a00");
    }
}
