//! Outbound callbacks.
//!
//! Every slot is optional; an empty slot makes the corresponding emit a no-op.
//! Callbacks always receive the caller's record shape, never internal nodes.

use std::sync::Arc;

use crate::types::{SelectAllState, TreeRecord, TreeSnapshot};

pub type NodeCallback = Box<dyn FnMut(&TreeRecord, &TreeSnapshot)>;
pub type ClearAllCallback = Box<dyn FnMut(&TreeSnapshot, Option<SelectAllState>)>;
pub type SelectAllCallback = Box<dyn FnMut(&TreeSnapshot, SelectAllState)>;
pub type ToggleCallback = Box<dyn FnMut(bool)>;
pub type NotifyCallback = Box<dyn FnMut()>;
pub type LastItemCallback = Box<dyn FnMut(&str, &[TreeRecord])>;

/// Async children provider, run off the UI thread by the child loader.
pub type LoadChildren = Arc<dyn Fn(&TreeRecord) -> anyhow::Result<Vec<TreeRecord>> + Send + Sync>;

/// The callback table of one widget instance.
#[derive(Default)]
pub struct Callbacks {
    on_node_change: Option<NodeCallback>,
    on_node_toggle: Option<NodeCallback>,
    on_clear_all: Option<ClearAllCallback>,
    on_select_all_change: Option<SelectAllCallback>,
    on_dropdown_toggle: Option<ToggleCallback>,
    on_focus: Option<NotifyCallback>,
    on_blur: Option<NotifyCallback>,
    on_last_item_reached: Option<LastItemCallback>,
    load_children: Option<LoadChildren>,
}

impl Callbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_node_change(mut self, f: impl FnMut(&TreeRecord, &TreeSnapshot) + 'static) -> Self {
        self.on_node_change = Some(Box::new(f));
        self
    }

    pub fn on_node_toggle(mut self, f: impl FnMut(&TreeRecord, &TreeSnapshot) + 'static) -> Self {
        self.on_node_toggle = Some(Box::new(f));
        self
    }

    pub fn on_clear_all(
        mut self,
        f: impl FnMut(&TreeSnapshot, Option<SelectAllState>) + 'static,
    ) -> Self {
        self.on_clear_all = Some(Box::new(f));
        self
    }

    pub fn on_select_all_change(
        mut self,
        f: impl FnMut(&TreeSnapshot, SelectAllState) + 'static,
    ) -> Self {
        self.on_select_all_change = Some(Box::new(f));
        self
    }

    pub fn on_dropdown_toggle(mut self, f: impl FnMut(bool) + 'static) -> Self {
        self.on_dropdown_toggle = Some(Box::new(f));
        self
    }

    pub fn on_focus(mut self, f: impl FnMut() + 'static) -> Self {
        self.on_focus = Some(Box::new(f));
        self
    }

    pub fn on_blur(mut self, f: impl FnMut() + 'static) -> Self {
        self.on_blur = Some(Box::new(f));
        self
    }

    pub fn on_last_item_reached(mut self, f: impl FnMut(&str, &[TreeRecord]) + 'static) -> Self {
        self.on_last_item_reached = Some(Box::new(f));
        self
    }

    pub fn load_children(
        mut self,
        f: impl Fn(&TreeRecord) -> anyhow::Result<Vec<TreeRecord>> + Send + Sync + 'static,
    ) -> Self {
        self.load_children = Some(Arc::new(f));
        self
    }

    pub fn children_provider(&self) -> Option<LoadChildren> {
        self.load_children.clone()
    }

    // ===== Guarded emits =====

    pub(crate) fn emit_node_change(&mut self, node: &TreeRecord, snapshot: &TreeSnapshot) {
        if let Some(f) = self.on_node_change.as_mut() {
            f(node, snapshot);
        }
    }

    pub(crate) fn emit_node_toggle(&mut self, node: &TreeRecord, snapshot: &TreeSnapshot) {
        if let Some(f) = self.on_node_toggle.as_mut() {
            f(node, snapshot);
        }
    }

    pub(crate) fn emit_clear_all(&mut self, snapshot: &TreeSnapshot, state: Option<SelectAllState>) {
        if let Some(f) = self.on_clear_all.as_mut() {
            f(snapshot, state);
        }
    }

    pub(crate) fn emit_select_all_change(&mut self, snapshot: &TreeSnapshot, state: SelectAllState) {
        if let Some(f) = self.on_select_all_change.as_mut() {
            f(snapshot, state);
        }
    }

    pub(crate) fn emit_dropdown_toggle(&mut self, open: bool) {
        if let Some(f) = self.on_dropdown_toggle.as_mut() {
            f(open);
        }
    }

    pub(crate) fn emit_focus(&mut self) {
        if let Some(f) = self.on_focus.as_mut() {
            f();
        }
    }

    pub(crate) fn emit_blur(&mut self) {
        if let Some(f) = self.on_blur.as_mut() {
            f();
        }
    }

    pub(crate) fn emit_last_item_reached(&mut self, search_value: &str, displayed: &[TreeRecord]) {
        if let Some(f) = self.on_last_item_reached.as_mut() {
            f(search_value, displayed);
        }
    }

    /// True if anything listens for node changes; lets the controller skip
    /// building snapshots nobody reads.
    pub(crate) fn wants_snapshots(&self) -> bool {
        self.on_node_change.is_some()
            || self.on_node_toggle.is_some()
            || self.on_clear_all.is_some()
            || self.on_select_all_change.is_some()
    }
}
