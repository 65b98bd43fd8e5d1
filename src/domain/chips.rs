//! Chip derivation for the field.

use crate::tree::NodeTree;
use crate::types::{NodeId, SelectionMode};

/// Nodes shown as chips, in selection (tree) order.
///
/// In `Tree` mode only the topmost selected node of each selected subtree gets
/// a chip: a selected node whose parent is also selected is covered by the
/// parent's chip. Every other mode shows one chip per selected node.
pub fn chip_nodes(tree: &NodeTree, selected: &[NodeId]) -> Vec<NodeId> {
    if tree.mode() != SelectionMode::Tree {
        return selected.to_vec();
    }

    selected
        .iter()
        .copied()
        .filter(|&id| match tree.node(id).parent() {
            Some(parent) => !tree.node(parent).is_selected(),
            None => true,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build_tree;
    use crate::types::TreeRecord;

    fn selected(tree: &NodeTree) -> Vec<NodeId> {
        tree.working_nodes()
            .iter()
            .copied()
            .filter(|&id| tree.node(id).is_selected())
            .collect()
    }

    #[test]
    fn test_tree_mode_collapses_to_topmost() {
        let records = vec![TreeRecord::new("p").selected(true).with_children(vec![
            TreeRecord::new("c0"),
            TreeRecord::new("c1"),
        ])];
        let tree = build_tree(&records, SelectionMode::Tree, 0);
        let chips = chip_nodes(&tree, &selected(&tree));
        assert_eq!(chips.len(), 1);
        assert_eq!(tree.node(chips[0]).path(), "0");
    }

    #[test]
    fn test_partial_parent_shows_child_chip() {
        let records = vec![TreeRecord::new("p").with_children(vec![
            TreeRecord::new("c0"),
            TreeRecord::new("c1").selected(true),
        ])];
        let tree = build_tree(&records, SelectionMode::Tree, 0);
        let chips = chip_nodes(&tree, &selected(&tree));
        assert_eq!(chips.len(), 1);
        assert_eq!(tree.node(chips[0]).path(), "0.1");
    }

    #[test]
    fn test_flat_mode_chip_per_selected() {
        let records = vec![TreeRecord::new("p").selected(true).with_children(vec![
            TreeRecord::new("c0").selected(true),
        ])];
        let tree = build_tree(&records, SelectionMode::TreeFlat, 0);
        assert_eq!(chip_nodes(&tree, &selected(&tree)).len(), 2);
    }
}
