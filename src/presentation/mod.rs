//! Presentation layer: the contract between the controller and pluggable
//! components.
//!
//! - Props envelopes and per-slot own props
//! - Render models assembled by the controller
//! - The component capability table with caller overrides
//! - The render driver that turns activations into widget events

pub mod components;
pub mod model;
pub mod props;
pub mod render;

pub use components::{
    component, container, text_input, Activated, Component, ComponentOverrides, Components,
    Container, RenderContext, Slot, TextInput, TextOutcome,
};
pub use model::{ChipModel, FieldModel, RowModel};
pub use props::{ComponentProps, ElementProps, RootAttributes, EMPTY_CUSTOM_PROPS};
pub use render::{render_field, render_row};
