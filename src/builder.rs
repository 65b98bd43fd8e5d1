//! Tree construction from caller records.
//!
//! Builds the node arena depth-first, assigns positional paths, derives the
//! mode-dependent working list and applies the initial record flags in a
//! fixed order: selected first, then disabled, then an empty search to
//! normalize the filter state.

use tracing::debug;

use crate::domain::{search, selection};
use crate::node::Node;
use crate::tree::NodeTree;
use crate::types::{NodeId, SelectionMode, TreeRecord, PATH_DELIMITER};

/// Builds a fresh node tree for `records` under `mode`.
///
/// # Arguments
/// * `records` - The caller's nested records
/// * `mode` - Selection semantics; decides the working list
/// * `generation` - Build counter stamped on the tree
pub fn build_tree(records: &[TreeRecord], mode: SelectionMode, generation: u64) -> NodeTree {
    let mut tree = NodeTree::empty(mode, generation);

    for (index, record) in records.iter().enumerate() {
        let id = attach(&mut tree, record, index.to_string(), None, 0);
        tree.roots.push(id);
    }

    tree.working = if mode.is_hierarchical() {
        tree.preorder()
    } else {
        tree.roots.clone()
    };

    let working = tree.working.clone();
    apply_initial_selection(&mut tree, &working);
    apply_initial_disabled(&mut tree, &working);
    for &id in &working {
        search::handle_search(&mut tree, id, "");
    }

    debug!(
        nodes = tree.len(),
        working = tree.working.len(),
        ?mode,
        generation,
        "built node tree"
    );
    tree
}

/// Attaches loaded child records under `parent`.
///
/// New children continue the parent's sibling numbering. In the hierarchical
/// modes they are spliced into the working list right after the parent's
/// existing subtree. A selected parent in `Tree` mode passes its selection on;
/// a disabled one passes on `disabled`.
///
/// # Returns
/// Ids of the newly created nodes in pre-order.
pub fn merge_children(tree: &mut NodeTree, parent: NodeId, records: &[TreeRecord]) -> Vec<NodeId> {
    let mode = tree.mode;
    let offset = tree.node(parent).children.len();
    let parent_path = tree.node(parent).path.clone();
    let depth = tree.node(parent).depth + 1;

    let splice_at = tree
        .working
        .iter()
        .position(|&id| id == parent)
        .map(|pos| pos + 1 + tree.descendants(parent).len());

    let mut top_level = Vec::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        let path = format!("{parent_path}{PATH_DELIMITER}{}", offset + index);
        let id = attach(tree, record, path, Some(parent), depth);
        tree.node_mut(parent).children.push(id);
        top_level.push(id);
    }

    {
        let node = tree.node_mut(parent);
        node.lazy = false;
        node.loading = false;
    }
    tree.invalidate_cache();

    let mut added = Vec::new();
    for &id in &top_level {
        added.push(id);
        added.extend(tree.descendants(id).iter().copied());
    }

    if let (true, Some(at)) = (mode.is_hierarchical(), splice_at) {
        tree.working.splice(at..at, added.iter().copied());
    }

    if mode.is_hierarchical() {
        let parent_selected = tree.node(parent).selected;
        let parent_disabled = tree.node(parent).disabled;

        if mode.propagates() && parent_selected {
            for &id in &top_level {
                selection::handle_select(tree, id);
            }
        } else {
            apply_initial_selection(tree, &added);
        }

        if mode.propagates() && parent_disabled {
            for &id in &top_level {
                selection::handle_disable(tree, id);
            }
        }
        apply_initial_disabled(tree, &added);
    }

    debug!(parent = %parent_path, added = added.len(), "merged loaded children");
    added
}

fn attach(
    tree: &mut NodeTree,
    record: &TreeRecord,
    path: String,
    parent: Option<NodeId>,
    depth: usize,
) -> NodeId {
    let id = NodeId(tree.nodes.len());
    tree.nodes.push(Node::new(id, path.clone(), parent, depth, record));
    tree.by_path.insert(path.clone(), id);

    for (index, child) in record.children.iter().enumerate() {
        let child_path = format!("{path}{PATH_DELIMITER}{index}");
        let child_id = attach(tree, child, child_path, Some(id), depth + 1);
        tree.nodes[id.0].children.push(child_id);
    }

    id
}

fn apply_initial_selection(tree: &mut NodeTree, ids: &[NodeId]) {
    match tree.mode {
        SelectionMode::Tree => {
            for &id in ids {
                if tree.node(id).init_record.selected {
                    selection::handle_select(tree, id);
                }
            }
        }
        SelectionMode::TreeFlat | SelectionMode::Multi => {
            for &id in ids {
                if tree.node(id).init_record.selected {
                    tree.node_mut(id).set_selected(true, false);
                }
            }
        }
        SelectionMode::Single => {
            // Last flagged record in input order wins.
            let last = ids
                .iter()
                .rev()
                .copied()
                .find(|&id| tree.node(id).init_record.selected);
            if let Some(id) = last {
                selection::unselect_all_except(tree, id);
                tree.node_mut(id).set_selected(true, false);
            }
        }
    }
}

fn apply_initial_disabled(tree: &mut NodeTree, ids: &[NodeId]) {
    for &id in ids {
        if tree.node(id).init_record.disabled {
            selection::handle_disable(tree, id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_by_two() -> Vec<TreeRecord> {
        (0..3)
            .map(|i| {
                TreeRecord::new(format!("n{i}")).with_children(vec![
                    TreeRecord::new(format!("n{i}-a")),
                    TreeRecord::new(format!("n{i}-b")),
                ])
            })
            .collect()
    }

    #[test]
    fn test_paths_are_positional() {
        let tree = build_tree(&three_by_two(), SelectionMode::Tree, 0);
        assert_eq!(tree.len(), 9);
        assert_eq!(tree.by_path("1.1").unwrap().name(), "n1-b");
        assert_eq!(tree.by_path("2").unwrap().depth(), 0);
        assert_eq!(tree.by_path("2.0").unwrap().depth(), 1);
    }

    #[test]
    fn test_working_list_per_mode() {
        let tree = build_tree(&three_by_two(), SelectionMode::TreeFlat, 0);
        let paths: Vec<_> = tree.working_nodes().iter().map(|&id| tree.node(id).path()).collect();
        assert_eq!(paths, vec!["0", "0.0", "0.1", "1", "1.0", "1.1", "2", "2.0", "2.1"]);

        let tree = build_tree(&three_by_two(), SelectionMode::Multi, 0);
        let paths: Vec<_> = tree.working_nodes().iter().map(|&id| tree.node(id).path()).collect();
        assert_eq!(paths, vec!["0", "1", "2"]);
    }

    #[test]
    fn test_single_mode_last_selected_wins() {
        let records: Vec<_> = (0..5)
            .map(|i| TreeRecord::new(format!("r{i}")).selected(i == 1 || i == 3))
            .collect();
        let tree = build_tree(&records, SelectionMode::Single, 0);
        let selected: Vec<_> = tree.iter().filter(|n| n.is_selected()).map(|n| n.path()).collect();
        assert_eq!(selected, vec!["3"]);
    }

    #[test]
    fn test_born_selected_and_disabled() {
        let records = vec![TreeRecord::new("a").selected(true).disabled(true)];
        let tree = build_tree(&records, SelectionMode::Tree, 0);
        let node = tree.by_path("0").unwrap();
        assert!(node.is_selected());
        assert!(node.is_disabled());
    }

    #[test]
    fn test_initial_search_normalizes_filter() {
        let tree = build_tree(&three_by_two(), SelectionMode::Tree, 0);
        assert!(tree.iter().all(|n| n.is_filtered() && !n.is_matched()));
    }

    #[test]
    fn test_merge_children_splices_working_list() {
        let records = vec![
            TreeRecord::new("a").lazy(true),
            TreeRecord::new("b"),
        ];
        let mut tree = build_tree(&records, SelectionMode::Tree, 0);
        let a = tree.id_of("0").unwrap();
        assert!(tree.node(a).is_lazy());

        let added = merge_children(
            &mut tree,
            a,
            &[TreeRecord::new("a0"), TreeRecord::new("a1").with_children(vec![TreeRecord::new("a10")])],
        );
        assert_eq!(added.len(), 3);
        assert!(!tree.node(a).is_lazy());

        let paths: Vec<_> = tree.working_nodes().iter().map(|&id| tree.node(id).path()).collect();
        assert_eq!(paths, vec!["0", "0.0", "0.1", "0.1.0", "1"]);
    }

    #[test]
    fn test_merge_into_selected_parent_selects_children() {
        let records = vec![TreeRecord::new("a").lazy(true).selected(true)];
        let mut tree = build_tree(&records, SelectionMode::Tree, 0);
        let a = tree.id_of("0").unwrap();
        merge_children(&mut tree, a, &[TreeRecord::new("a0"), TreeRecord::new("a1")]);
        assert!(tree.by_path("0.0").unwrap().is_selected());
        assert!(tree.by_path("0.1").unwrap().is_selected());
        assert!(tree.node(a).is_selected());
    }
}
