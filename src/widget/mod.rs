//! Default egui presentation.
//!
//! - `components`: the default component table (`default_components`)
//! - `host`: `TreeSelectWidget`, which owns a controller and wires egui input
//!   (clicks, keys, outside presses, scrolling) into it
//! - `keys`: egui key translation

pub mod components;
pub mod host;
pub mod keys;

pub use components::{default_components, INDENT_WIDTH};
pub use host::TreeSelectWidget;
