//! Derived selection state.
//!
//! Everything here is recomputed from the node tree after each mutation;
//! nothing is a source of truth on its own.

use crate::types::{NodeId, SelectAllState};

/// Selection views derived from the node tree.
///
/// Responsibilities:
/// - Holding the selected node list in tree order
/// - Holding the chip list shown in the field
/// - Holding the select-all tri-state
#[derive(Debug, Clone)]
pub struct SelectionState {
    selected: Vec<NodeId>,
    chips: Vec<NodeId>,
    select_all: SelectAllState,
}

impl SelectionState {
    pub fn new() -> Self {
        Self {
            selected: Vec::new(),
            chips: Vec::new(),
            select_all: SelectAllState::Unselected,
        }
    }

    // ===== Queries =====

    pub fn selected(&self) -> &[NodeId] {
        &self.selected
    }

    pub fn chips(&self) -> &[NodeId] {
        &self.chips
    }

    pub fn select_all(&self) -> SelectAllState {
        self.select_all
    }

    pub fn has_selection(&self) -> bool {
        !self.selected.is_empty()
    }

    // ===== Mutations =====

    /// Replaces all derived views at once.
    pub fn update(&mut self, selected: Vec<NodeId>, chips: Vec<NodeId>, select_all: SelectAllState) {
        self.selected = selected;
        self.chips = chips;
        self.select_all = select_all;
    }
}

impl Default for SelectionState {
    fn default() -> Self {
        Self::new()
    }
}
