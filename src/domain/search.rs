//! Search matching, expansion and display eligibility.

use crate::tree::NodeTree;
use crate::types::NodeId;

/// Applies `term` to a single node.
///
/// An empty term clears the search state and makes the node eligible. A
/// non-empty term is a case-insensitive substring match on the label; a match
/// force-expands the node if its children are loaded and marks every ancestor
/// filtered and expanded so the match stays reachable. A miss filters the node out, though a later
/// matching descendant will put it back.
pub fn handle_search(tree: &mut NodeTree, id: NodeId, term: &str) {
    if term.is_empty() {
        let node = tree.node_mut(id);
        node.search_expanded = false;
        node.matched = false;
        node.filtered = true;
        return;
    }

    let needle = term.to_lowercase();
    apply_search(tree, id, &needle);
}

/// Runs [`handle_search`] over the working list in tree order.
///
/// Pre-order matters: a node is visited before its descendants, so a
/// descendant's upward walk is never overwritten by its ancestor's miss.
pub fn search_all(tree: &mut NodeTree, term: &str) {
    let working = tree.working.clone();
    if term.is_empty() {
        for id in working {
            handle_search(tree, id, term);
        }
        return;
    }

    let needle = term.to_lowercase();
    for id in working {
        apply_search(tree, id, &needle);
    }
}

fn apply_search(tree: &mut NodeTree, id: NodeId, needle: &str) {
    let is_match = tree.node(id).name.to_lowercase().contains(needle);

    if !is_match {
        let node = tree.node_mut(id);
        node.matched = false;
        node.filtered = false;
        node.search_expanded = false;
        return;
    }

    {
        let node = tree.node_mut(id);
        node.matched = true;
        node.filtered = true;
        if node.has_children() {
            node.search_expanded = true;
        }
    }

    let ancestors = tree.ancestors(id);
    for &a in ancestors.iter() {
        let ancestor = tree.node_mut(a);
        ancestor.filtered = true;
        ancestor.search_expanded = true;
    }
}

/// Sets the mode-appropriate expansion flag. No-op for nodes that cannot
/// expand.
pub fn handle_expand(tree: &mut NodeTree, id: NodeId, search_mode: bool, expand: bool) {
    let node = tree.node_mut(id);
    if !node.is_expandable() {
        return;
    }
    if search_mode {
        node.search_expanded = expand;
    } else {
        node.expanded = expand;
    }
}

/// True if every ancestor is expanded in the current mode. Roots are visible.
pub fn is_visible(tree: &NodeTree, id: NodeId, search_mode: bool) -> bool {
    tree.ancestors(id)
        .iter()
        .all(|&a| tree.node(a).is_expanded_in(search_mode))
}

/// True if the node belongs in the displayed list.
pub fn is_displayed(tree: &NodeTree, id: NodeId, search_mode: bool) -> bool {
    tree.node(id).filtered && is_visible(tree, id, search_mode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build_tree;
    use crate::types::{SelectionMode, TreeRecord};

    fn deep() -> Vec<TreeRecord> {
        vec![
            TreeRecord::new("Fruits").with_children(vec![
                TreeRecord::new("Citrus").with_children(vec![
                    TreeRecord::new("Lemon"),
                    TreeRecord::new("Lime"),
                ]),
                TreeRecord::new("Berries").with_children(vec![TreeRecord::new("Strawberry")]),
            ]),
            TreeRecord::new("Vegetables").with_children(vec![TreeRecord::new("Leek")]),
        ]
    }

    #[test]
    fn test_deep_match_forces_ancestors() {
        let mut tree = build_tree(&deep(), SelectionMode::Tree, 0);
        search_all(&mut tree, "LIME");

        let lime = tree.id_of("0.0.1").unwrap();
        assert!(tree.node(lime).is_matched());
        for &a in tree.ancestors(lime).iter() {
            assert!(tree.node(a).is_filtered());
            assert!(tree.node(a).is_search_expanded());
            assert!(!tree.node(a).is_matched());
        }
        assert!(is_displayed(&tree, lime, true));

        assert!(!tree.by_path("0.0.0").unwrap().is_filtered());
        assert!(!tree.by_path("0.1").unwrap().is_filtered());
        assert!(!tree.by_path("1").unwrap().is_filtered());
    }

    #[test]
    fn test_match_reachable_even_when_collapsed() {
        let mut tree = build_tree(&deep(), SelectionMode::Tree, 0);
        let lime = tree.id_of("0.0.1").unwrap();
        assert!(!is_displayed(&tree, lime, false));

        search_all(&mut tree, "lim");
        assert!(is_displayed(&tree, lime, true));
    }

    #[test]
    fn test_matched_unloaded_node_stays_collapsed() {
        let records = vec![TreeRecord::new("Catalog").with_children(vec![
            TreeRecord::new("Remote limes").lazy(true),
        ])];
        let mut tree = build_tree(&records, SelectionMode::Tree, 0);
        search_all(&mut tree, "lime");

        let remote = tree.by_path("0.0").unwrap();
        assert!(remote.is_matched());
        assert!(!remote.is_search_expanded());
        assert!(tree.by_path("0").unwrap().is_search_expanded());
    }

    #[test]
    fn test_empty_term_resets() {
        let mut tree = build_tree(&deep(), SelectionMode::Tree, 0);
        search_all(&mut tree, "zzz");
        assert!(tree.iter().all(|n| !n.is_filtered()));

        search_all(&mut tree, "");
        assert!(tree.iter().all(|n| n.is_filtered() && !n.is_matched() && !n.is_search_expanded()));
    }

    #[test]
    fn test_expand_respects_mode_and_leaves() {
        let mut tree = build_tree(&deep(), SelectionMode::Tree, 0);
        let fruits = tree.id_of("0").unwrap();
        handle_expand(&mut tree, fruits, false, true);
        assert!(tree.node(fruits).is_expanded());
        assert!(!tree.node(fruits).is_search_expanded());

        handle_expand(&mut tree, fruits, true, true);
        assert!(tree.node(fruits).is_search_expanded());

        let lemon = tree.id_of("0.0.0").unwrap();
        handle_expand(&mut tree, lemon, false, true);
        assert!(!tree.node(lemon).is_expanded());
    }

    #[test]
    fn test_visibility_requires_every_ancestor_expanded() {
        let mut tree = build_tree(&deep(), SelectionMode::Tree, 0);
        let fruits = tree.id_of("0").unwrap();
        let citrus = tree.id_of("0.0").unwrap();
        let lemon = tree.id_of("0.0.0").unwrap();

        handle_expand(&mut tree, citrus, false, true);
        assert!(!is_visible(&tree, lemon, false));

        handle_expand(&mut tree, fruits, false, true);
        assert!(is_visible(&tree, lemon, false));
        assert!(!is_visible(&tree, lemon, true));
    }
}
