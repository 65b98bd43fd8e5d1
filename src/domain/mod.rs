//! Domain logic for the tree-select engine.
//!
//! This module contains the core algorithms, all operating on a `NodeTree`:
//! - Selection (propagating select/unselect, toggle, disable, select-all)
//! - Search (matching, ancestor reachability, expansion, display eligibility)
//! - Visibility strategies (displayed-list traversal)
//! - Chips (which selected nodes the field shows)
//! - Focus (focusable targets and keyboard traversal)

pub mod selection;
pub mod search;
pub mod visibility;
pub mod chips;
pub mod focus;
