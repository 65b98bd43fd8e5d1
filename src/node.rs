//! The node record: one caller record plus its derived selection/UI state.
//!
//! Nodes are plain data. Everything that needs relatives (propagation,
//! ancestor walks, search reachability) lives in `domain` and goes through
//! the owning [`crate::NodeTree`].

use crate::types::{NodeId, TreeRecord};

/// A single entry of the tree.
///
/// Tri-state invariant: at most one of `selected` and `partially_selected` is
/// true at any time.
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) id: NodeId,
    pub(crate) path: String,
    pub(crate) name: String,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) depth: usize,
    pub(crate) disabled: bool,
    pub(crate) selected: bool,
    pub(crate) partially_selected: bool,
    pub(crate) expanded: bool,
    pub(crate) search_expanded: bool,
    pub(crate) matched: bool,
    pub(crate) filtered: bool,
    /// Children still to be fetched through the load-children hook.
    pub(crate) lazy: bool,
    pub(crate) loading: bool,
    pub(crate) init_record: TreeRecord,
}

impl Node {
    pub(crate) fn new(
        id: NodeId,
        path: String,
        parent: Option<NodeId>,
        depth: usize,
        record: &TreeRecord,
    ) -> Self {
        Self {
            id,
            path,
            name: record.label.clone(),
            parent,
            children: Vec::new(),
            depth,
            disabled: false,
            selected: false,
            partially_selected: false,
            expanded: record.expanded && (!record.children.is_empty() || record.lazy),
            search_expanded: false,
            matched: false,
            filtered: true,
            lazy: record.lazy && record.children.is_empty(),
            loading: false,
            init_record: record.shallow(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// True if the node can be expanded: it has children, or they are pending.
    pub fn is_expandable(&self) -> bool {
        self.has_children() || self.lazy
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn is_partially_selected(&self) -> bool {
        self.partially_selected
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn is_search_expanded(&self) -> bool {
        self.search_expanded
    }

    /// Expansion flag appropriate to the current mode.
    pub fn is_expanded_in(&self, search_mode: bool) -> bool {
        if search_mode {
            self.search_expanded
        } else {
            self.expanded
        }
    }

    pub fn is_matched(&self) -> bool {
        self.matched
    }

    pub fn is_filtered(&self) -> bool {
        self.filtered
    }

    pub fn is_lazy(&self) -> bool {
        self.lazy
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// The retained source record, without children and without write-back.
    pub fn init_record(&self) -> &TreeRecord {
        &self.init_record
    }

    /// The caller's record shape with current state written back.
    pub fn to_record(&self) -> TreeRecord {
        let mut record = self.init_record.clone();
        record.selected = self.selected;
        record.expanded = self.expanded;
        record.disabled = self.disabled;
        record.lazy = self.lazy;
        record
    }

    pub(crate) fn set_selected(&mut self, selected: bool, partially_selected: bool) {
        self.selected = selected;
        self.partially_selected = partially_selected && !selected;
    }
}
