//! Hierarchical multi-select tree widget engine.
//!
//! The crate is split into a backend-free core and an egui default
//! presentation:
//! - `types`, `node`, `tree`, `builder`, `cache` - the node model and its
//!   construction from caller records
//! - `domain` - selection propagation, search, visibility, chips and focus
//!   traversal
//! - `controller`, `state`, `callbacks`, `config` - the widget state machine
//! - `virtual_list` - virtualized row geometry
//! - `presentation` - the props contract and the render driver
//! - `widget` - default egui components and host
//! - `io`, `debounce` - data files, background child loading, timers

pub mod builder;
pub mod cache;
pub mod callbacks;
pub mod config;
pub mod controller;
pub mod debounce;
pub mod domain;
pub mod io;
pub mod node;
pub mod presentation;
pub mod state;
pub mod tree;
pub mod types;
pub mod virtual_list;
pub mod widget;

// Export the node model
pub use node::Node;
pub use tree::NodeTree;
pub use types::{
    records_from_value, NodeId, SelectAllState, SelectionMode, TreeRecord, TreeSnapshot,
    PATH_DELIMITER,
};

// Export the controller surface
pub use callbacks::{Callbacks, LoadChildren};
pub use config::{
    DropdownKeyboardConfig, FieldKeyboardConfig, FooterConfig, KeyboardConfig, OpenControl,
    TreeSelectConfig,
};
pub use controller::{DispatchOutcome, DropdownRow, Key, TreeSelectController, WidgetEvent};
pub use domain::focus::{FocusRegion, FocusTarget};
pub use domain::visibility::DisplayedNode;

// Export building blocks for custom hosts
pub use builder::{build_tree, merge_children};
pub use debounce::Debouncer;
pub use virtual_list::VirtualList;

// Export the default egui presentation
pub use widget::{default_components, TreeSelectWidget};
