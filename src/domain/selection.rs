//! Selection engine: select, unselect, toggle, disable and select-all.
//!
//! Every operation mutates the tree in place. Propagation to relatives only
//! happens in [`SelectionMode::Tree`]; the other modes touch the target node
//! alone. Disabled nodes never change selection through these handlers.

use crate::tree::NodeTree;
use crate::types::{NodeId, SelectAllState, SelectionMode};

/// Selects `id`.
///
/// In `Tree` mode every non-disabled descendant is selected too, then the node
/// and its inner descendants are downgraded to partial where a disabled
/// descendant stays unselected, then every ancestor is recomputed.
pub fn handle_select(tree: &mut NodeTree, id: NodeId) {
    if tree.node(id).disabled {
        return;
    }
    tree.node_mut(id).set_selected(true, false);

    if !tree.mode.propagates() {
        return;
    }

    let descendants = tree.descendants(id);
    for &d in descendants.iter() {
        if !tree.node(d).disabled {
            tree.node_mut(d).set_selected(true, false);
        }
    }
    // Reverse pre-order visits every subtree before its root.
    for &d in descendants.iter().rev() {
        if tree.node(d).has_children() && !tree.node(d).disabled {
            refresh_from_descendants(tree, d);
        }
    }
    if !descendants.is_empty() {
        refresh_from_descendants(tree, id);
    }
    refresh_ancestors(tree, id);
}

/// Unselects `id`; in `Tree` mode clears the non-disabled subtree and
/// recomputes every ancestor.
pub fn handle_unselect(tree: &mut NodeTree, id: NodeId) {
    if tree.node(id).disabled {
        return;
    }
    tree.node_mut(id).set_selected(false, false);

    if !tree.mode.propagates() {
        return;
    }

    let descendants = tree.descendants(id);
    for &d in descendants.iter() {
        if !tree.node(d).disabled {
            tree.node_mut(d).set_selected(false, false);
        }
    }
    for &d in descendants.iter().rev() {
        if tree.node(d).has_children() && !tree.node(d).disabled {
            refresh_partial(tree, d);
        }
    }
    refresh_partial(tree, id);
    refresh_ancestors(tree, id);
}

/// Toggles `id` and returns whether it ended up selected.
///
/// The node toggles off when it "should be considered selected": it is
/// selected itself, or (in `Tree` mode) it has descendants and every
/// non-disabled one is selected. The second clause deliberately ignores the
/// node's own flag, so a partial node whose only unselected descendants are
/// disabled toggles off rather than on.
///
/// In `Single` mode selecting a node first unselects every other node.
pub fn handle_change(tree: &mut NodeTree, id: NodeId) -> bool {
    if tree.node(id).disabled {
        return tree.node(id).selected;
    }

    if is_considered_selected(tree, id) {
        handle_unselect(tree, id);
    } else {
        if tree.mode == SelectionMode::Single {
            unselect_all_except(tree, id);
        }
        handle_select(tree, id);
    }
    tree.node(id).selected
}

/// The toggle-off condition used by [`handle_change`].
pub fn is_considered_selected(tree: &NodeTree, id: NodeId) -> bool {
    let node = tree.node(id);
    if node.selected {
        return true;
    }
    if !tree.mode.propagates() || !node.has_children() {
        return false;
    }
    are_all_excluding_disabled_selected(tree, &tree.descendants(id))
}

/// Disables `id`; in `Tree` mode the whole subtree is disabled. Selection is
/// left as it is.
pub fn handle_disable(tree: &mut NodeTree, id: NodeId) {
    tree.node_mut(id).disabled = true;
    if tree.mode.propagates() {
        let descendants = tree.descendants(id);
        for &d in descendants.iter() {
            tree.node_mut(d).disabled = true;
        }
    }
}

/// Recompute-only pass for partial flags after a bulk change.
pub fn handle_check_and_set_partially_selected(tree: &mut NodeTree, id: NodeId) {
    let partial = tree.mode.propagates()
        && !tree.node(id).selected
        && tree.descendants(id).iter().any(|&d| tree.node(d).selected);
    tree.node_mut(id).partially_selected = partial;
}

/// True if every non-disabled node among `ids` is selected.
pub fn are_all_excluding_disabled_selected(tree: &NodeTree, ids: &[NodeId]) -> bool {
    ids.iter()
        .map(|&id| tree.node(id))
        .filter(|node| !node.disabled)
        .all(|node| node.selected)
}

/// Aggregate tri-state over the non-disabled nodes among `ids`.
pub fn select_all_state(tree: &NodeTree, ids: &[NodeId]) -> SelectAllState {
    let mut eligible = 0usize;
    let mut selected = 0usize;
    for &id in ids {
        let node = tree.node(id);
        if node.disabled {
            continue;
        }
        eligible += 1;
        if node.selected {
            selected += 1;
        }
    }

    if selected == 0 {
        SelectAllState::Unselected
    } else if selected == eligible {
        SelectAllState::Selected
    } else {
        SelectAllState::Partial
    }
}

/// Select-all toggle over the working list.
///
/// Unselects every non-disabled node when all of them are selected, selects
/// them otherwise, then fixes up partial flags everywhere.
///
/// # Returns
/// `true` if the toggle selected, `false` if it unselected.
pub fn toggle_select_all(tree: &mut NodeTree) -> bool {
    let working = tree.working.clone();
    let has_eligible = working.iter().any(|&id| !tree.node(id).disabled);
    let select = !(has_eligible && are_all_excluding_disabled_selected(tree, &working));

    for &id in &working {
        if !tree.node(id).disabled {
            tree.node_mut(id).set_selected(select, false);
        }
    }
    for &id in &working {
        handle_check_and_set_partially_selected(tree, id);
    }
    select
}

/// Unselects every non-disabled selected node of the working list.
pub fn clear_all(tree: &mut NodeTree) {
    let working = tree.working.clone();
    for id in working {
        let node = tree.node(id);
        if (node.selected || node.partially_selected) && !node.disabled {
            handle_unselect(tree, id);
        }
    }
}

/// Clears every node other than `keep`, disabled or not, so `Single` mode
/// never holds two selections.
pub fn unselect_all_except(tree: &mut NodeTree, keep: NodeId) {
    for node in tree.nodes.iter_mut() {
        if node.id != keep && (node.selected || node.partially_selected) {
            node.set_selected(false, false);
        }
    }
}

fn refresh_from_descendants(tree: &mut NodeTree, id: NodeId) {
    let descendants = tree.descendants(id);
    let all = descendants.iter().all(|&d| tree.node(d).selected);
    let any = descendants.iter().any(|&d| tree.node(d).selected);
    tree.node_mut(id).set_selected(all, any);
}

fn refresh_partial(tree: &mut NodeTree, id: NodeId) {
    let any = tree.descendants(id).iter().any(|&d| tree.node(d).selected);
    tree.node_mut(id).set_selected(false, any);
}

fn refresh_ancestors(tree: &mut NodeTree, id: NodeId) {
    let ancestors = tree.ancestors(id);
    for &a in ancestors.iter() {
        refresh_from_descendants(tree, a);
    }
}
