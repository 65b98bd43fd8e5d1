//! Visibility strategy pattern for tree traversal.
//!
//! Traversal mechanics are implemented once (an explicit-stack pre-order
//! walk); strategies decide which nodes are yielded and which subtrees are
//! entered. The displayed list of the dropdown is the traversal under
//! [`ExpansionStrategy`].

use crate::domain::search;
use crate::tree::NodeTree;
use crate::types::NodeId;

/// Strategy for determining node visibility during tree traversal.
pub trait VisibilityStrategy {
    /// Should the node be yielded?
    fn include(&self, tree: &NodeTree, id: NodeId) -> bool;

    /// Should the traversal visit the node's children?
    ///
    /// Note: even when `include()` returns false the traversal may still
    /// descend to reach visible nodes deeper in the subtree.
    fn descend_into(&self, tree: &NodeTree, id: NodeId) -> bool;
}

/// Baseline strategy: include all nodes and always descend.
pub struct UnfilteredStrategy;

impl VisibilityStrategy for UnfilteredStrategy {
    fn include(&self, _tree: &NodeTree, _id: NodeId) -> bool {
        true
    }

    fn descend_into(&self, _tree: &NodeTree, _id: NodeId) -> bool {
        true
    }
}

/// Displayed-list strategy: filtered nodes under expanded ancestors.
///
/// Uses `search_expanded` while a search is active and `expanded` otherwise.
/// Flat modes never descend below the roots.
pub struct ExpansionStrategy {
    pub search_mode: bool,
    pub hierarchical: bool,
}

impl VisibilityStrategy for ExpansionStrategy {
    fn include(&self, tree: &NodeTree, id: NodeId) -> bool {
        tree.node(id).is_filtered()
    }

    fn descend_into(&self, tree: &NodeTree, id: NodeId) -> bool {
        self.hierarchical && tree.node(id).is_expanded_in(self.search_mode)
    }
}

/// A node yielded by the traversal with its layout context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayedNode {
    pub id: NodeId,
    /// Row index in the displayed list.
    pub row_index: usize,
    /// Depth in the tree hierarchy (0 for root).
    pub depth: usize,
    /// For each ancestor level, whether more siblings follow at that level.
    pub branch_context: Vec<bool>,
    /// Whether this is the last child of its parent.
    pub is_last_child: bool,
}

/// Stack frame for iterative depth-first traversal.
struct TraversalFrame {
    id: NodeId,
    branch_context: Vec<bool>,
    is_last_child: bool,
}

/// Iterator that yields visible nodes according to a visibility strategy.
pub struct TraversalIter<'t, S: VisibilityStrategy> {
    tree: &'t NodeTree,
    strategy: &'t S,
    stack: Vec<TraversalFrame>,
    next_row: usize,
}

impl<'t, S: VisibilityStrategy> TraversalIter<'t, S> {
    fn new(tree: &'t NodeTree, roots: &[NodeId], strategy: &'t S) -> Self {
        let count = roots.len();
        // Reverse for LIFO order.
        let stack = roots
            .iter()
            .enumerate()
            .rev()
            .map(|(i, &id)| TraversalFrame {
                id,
                branch_context: Vec::new(),
                is_last_child: i + 1 == count,
            })
            .collect();

        Self {
            tree,
            strategy,
            stack,
            next_row: 0,
        }
    }
}

impl<'t, S: VisibilityStrategy> Iterator for TraversalIter<'t, S> {
    type Item = DisplayedNode;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(frame) = self.stack.pop() {
            let node = self.tree.node(frame.id);

            if node.has_children() && self.strategy.descend_into(self.tree, frame.id) {
                let count = node.children.len();
                for (i, &child) in node.children.iter().enumerate().rev() {
                    let mut child_context = frame.branch_context.clone();
                    child_context.push(!frame.is_last_child);
                    self.stack.push(TraversalFrame {
                        id: child,
                        branch_context: child_context,
                        is_last_child: i + 1 == count,
                    });
                }
            }

            if self.strategy.include(self.tree, frame.id) {
                let row_index = self.next_row;
                self.next_row += 1;
                return Some(DisplayedNode {
                    id: frame.id,
                    row_index,
                    depth: node.depth,
                    branch_context: frame.branch_context,
                    is_last_child: frame.is_last_child,
                });
            }
        }

        None
    }
}

/// Lazily traverses `roots` under `strategy`.
///
/// # Example
/// ```ignore
/// let strategy = ExpansionStrategy { search_mode: false, hierarchical: true };
/// for row in traverse_visible(&tree, tree.roots(), &strategy) {
///     println!("{} at depth {}", tree.node(row.id).name(), row.depth);
/// }
/// ```
pub fn traverse_visible<'t, S: VisibilityStrategy>(
    tree: &'t NodeTree,
    roots: &[NodeId],
    strategy: &'t S,
) -> TraversalIter<'t, S> {
    TraversalIter::new(tree, roots, strategy)
}

/// Collects the displayed rows for the tree's mode.
pub fn collect_displayed(tree: &NodeTree, search_mode: bool) -> Vec<DisplayedNode> {
    let strategy = ExpansionStrategy {
        search_mode,
        hierarchical: tree.mode().is_hierarchical(),
    };
    let roots = if strategy.hierarchical {
        tree.roots().to_vec()
    } else {
        tree.working_nodes().to_vec()
    };
    traverse_visible(tree, &roots, &strategy).collect()
}

/// Reference definition of the displayed list: the working list filtered by
/// [`search::is_displayed`]. [`collect_displayed`] yields the same ids.
pub fn displayed_by_filter(tree: &NodeTree, search_mode: bool) -> Vec<NodeId> {
    tree.working_nodes()
        .iter()
        .copied()
        .filter(|&id| search::is_displayed(tree, id, search_mode))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build_tree;
    use crate::domain::search::{handle_expand, search_all};
    use crate::types::{SelectionMode, TreeRecord};

    fn sample() -> Vec<TreeRecord> {
        vec![
            TreeRecord::new("alpha").expanded(true).with_children(vec![
                TreeRecord::new("beta").with_children(vec![TreeRecord::new("gamma")]),
                TreeRecord::new("delta"),
            ]),
            TreeRecord::new("epsilon").with_children(vec![TreeRecord::new("zeta")]),
        ]
    }

    fn ids(rows: &[DisplayedNode]) -> Vec<NodeId> {
        rows.iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_unfiltered_visits_everything_in_preorder() {
        let tree = build_tree(&sample(), SelectionMode::Tree, 0);
        let rows: Vec<_> = traverse_visible(&tree, tree.roots(), &UnfilteredStrategy).collect();
        assert_eq!(ids(&rows), tree.preorder());
        assert_eq!(rows[2].depth, 2);
        assert_eq!(rows.last().unwrap().row_index, tree.len() - 1);
    }

    #[test]
    fn test_collapsed_subtrees_hidden() {
        let tree = build_tree(&sample(), SelectionMode::Tree, 0);
        let rows = collect_displayed(&tree, false);
        let paths: Vec<_> = rows.iter().map(|r| tree.node(r.id).path()).collect();
        assert_eq!(paths, vec!["0", "0.0", "0.1", "1"]);
        assert!(rows[2].is_last_child);
        assert!(!rows[1].is_last_child);
    }

    #[test]
    fn test_traversal_matches_filter_definition() {
        let mut tree = build_tree(&sample(), SelectionMode::TreeFlat, 0);
        assert_eq!(ids(&collect_displayed(&tree, false)), displayed_by_filter(&tree, false));

        let beta = tree.id_of("0.0").unwrap();
        handle_expand(&mut tree, beta, false, true);
        assert_eq!(ids(&collect_displayed(&tree, false)), displayed_by_filter(&tree, false));

        search_all(&mut tree, "ta");
        assert_eq!(ids(&collect_displayed(&tree, true)), displayed_by_filter(&tree, true));
    }

    #[test]
    fn test_flat_modes_show_roots_only() {
        let tree = build_tree(&sample(), SelectionMode::Multi, 0);
        let rows = collect_displayed(&tree, false);
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.depth == 0));
    }

    #[test]
    fn test_branch_context_tracks_open_levels() {
        let mut tree = build_tree(&sample(), SelectionMode::Tree, 0);
        let beta = tree.id_of("0.0").unwrap();
        handle_expand(&mut tree, beta, false, true);
        let rows = collect_displayed(&tree, false);
        let gamma = rows.iter().find(|r| tree.node(r.id).path() == "0.0.0").unwrap();
        // alpha has a following sibling, beta has a following sibling
        assert_eq!(gamma.branch_context, vec![true, true]);
    }
}
