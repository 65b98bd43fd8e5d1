//! State management modules for the tree-select controller.
//!
//! This module contains state-only logic (no UI concerns):
//! - Dropdown state (open flag, controlled vs uncontrolled)
//! - Focus state (focused target, widget focus)
//! - Search state (current search value)
//! - Selection state (derived selected list, chips, select-all tri-state)

mod dropdown;
mod interaction;
mod search;
mod selection;

pub use dropdown::DropdownState;
pub use interaction::FocusState;
pub use search::SearchState;
pub use selection::SelectionState;
