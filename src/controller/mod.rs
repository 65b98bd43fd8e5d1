//! The widget controller.
//!
//! `TreeSelectController` owns every piece of mutable widget state: the node
//! tree, the derived selection/display lists, the search value, the dropdown
//! flag and the focus pointer. [`TreeSelectController::dispatch`] is the
//! single mutation entry for user input; after every mutation the derived
//! state is recomputed in a fixed order (selected list, displayed list,
//! select-all state, chips, dropdown rows) and the focus pointer is
//! revalidated against what is still rendered.
//!
//! A disabled widget ignores every event: no state changes and no callbacks.

mod events;
mod keyboard;

pub use events::{DispatchOutcome, Key, WidgetEvent};

use std::ops::Range;
use std::time::Instant;

use tracing::{debug, warn};

use crate::builder::{build_tree, merge_children};
use crate::callbacks::Callbacks;
use crate::config::TreeSelectConfig;
use crate::debounce::Debouncer;
use crate::domain::chips::chip_nodes;
use crate::domain::focus::{dropdown_focusables, field_focusables, FocusRegion, FocusTarget};
use crate::domain::visibility::{collect_displayed, DisplayedNode};
use crate::domain::{search, selection};
use crate::io::child_loader::{ChildLoader, Waker};
use crate::node::Node;
use crate::presentation::model::{ChipModel, FieldModel, RowModel};
use crate::presentation::props::{
    ChipClearProps, ChipProps, ElementProps, ExpandToggleProps, FieldClearProps, FieldProps,
    FooterProps, InputProps, PlaceholderProps, RootAttributes, RowProps, SelectAllProps,
};
use crate::state::{DropdownState, FocusState, SearchState, SelectionState};
use crate::tree::NodeTree;
use crate::types::{NodeId, SelectAllState, SelectionMode, TreeRecord, TreeSnapshot};
use crate::virtual_list::VirtualList;

const SELECT_ALL_LABEL: &str = "Select all";

/// One row of the dropdown list, in render order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropdownRow {
    /// Search input pinned at the top (`with_dropdown_input`).
    Input,
    SelectAll,
    Node(DisplayedNode),
    /// The tree has no nodes at all.
    NoData,
    /// A search filtered every node out.
    NoMatches,
    Footer,
}

impl DropdownRow {
    fn is_sticky(&self) -> bool {
        matches!(self, DropdownRow::Input | DropdownRow::SelectAll)
    }
}

pub struct TreeSelectController {
    records: Vec<TreeRecord>,
    config: TreeSelectConfig,
    tree: NodeTree,
    generation: u64,
    callbacks: Callbacks,

    dropdown: DropdownState,
    focus: FocusState,
    search: SearchState,
    selection: SelectionState,

    displayed: Vec<DisplayedNode>,
    rows: Vec<DropdownRow>,
    list: VirtualList,
    scroll_request: bool,

    loader: ChildLoader,
    refocus: Debouncer,
    rendered: Option<Range<usize>>,
}

impl TreeSelectController {
    pub fn new(records: Vec<TreeRecord>, config: TreeSelectConfig) -> Self {
        let tree = build_tree(&records, config.mode, 0);
        let mut controller = Self {
            records,
            dropdown: DropdownState::new(config.open),
            list: VirtualList::new(config.row_height, config.overscan),
            config,
            tree,
            generation: 0,
            callbacks: Callbacks::default(),
            focus: FocusState::new(),
            search: SearchState::new(),
            selection: SelectionState::new(),
            displayed: Vec::new(),
            rows: Vec::new(),
            scroll_request: false,
            loader: ChildLoader::new(),
            refocus: Debouncer::default(),
            rendered: None,
        };
        controller.rederive();
        controller
    }

    pub fn with_callbacks(mut self, callbacks: Callbacks) -> Self {
        self.callbacks = callbacks;
        self
    }

    pub fn set_callbacks(&mut self, callbacks: Callbacks) {
        self.callbacks = callbacks;
    }

    /// Hook run from the loader thread when a child load finishes.
    pub fn set_waker(&mut self, waker: Waker) {
        self.loader.set_waker(waker);
    }

    // ===== Caller-driven updates =====

    /// Replaces the source records and rebuilds the tree.
    pub fn set_data(&mut self, records: Vec<TreeRecord>) {
        self.records = records;
        self.rebuild();
    }

    pub fn set_mode(&mut self, mode: SelectionMode) {
        if mode != self.config.mode {
            self.config.mode = mode;
            self.rebuild();
        }
    }

    pub fn set_config(&mut self, config: TreeSelectConfig) {
        let mode_changed = config.mode != self.config.mode;
        let disabled = config.disabled;

        self.dropdown.set_control(config.open);
        self.list.set_estimated_height(config.row_height);
        self.list.set_overscan(config.overscan);
        self.config = config;

        if !self.config.searchable && self.search.clear() {
            search::search_all(&mut self.tree, "");
        }
        self.set_disabled(disabled);

        if mode_changed {
            self.rebuild();
        } else {
            self.rederive();
        }
    }

    /// Answers a toggle request in controlled mode (or forces the flag).
    pub fn set_open(&mut self, open: bool) {
        if self.dropdown.set_open(open) {
            if !open && self.focus.is_dropdown() {
                self.focus.retarget(Some(FocusTarget::FieldInput));
            }
            self.rederive();
        }
    }

    /// Disabling drops focus and closes an uncontrolled dropdown quietly.
    pub fn set_disabled(&mut self, disabled: bool) {
        self.config.disabled = disabled;
        if disabled {
            if !self.dropdown.is_controlled() {
                self.dropdown.set_open(false);
            }
            self.focus.clear();
            self.refocus.cancel();
        }
    }

    // ===== Queries =====

    pub fn config(&self) -> &TreeSelectConfig {
        &self.config
    }

    pub fn tree(&self) -> &NodeTree {
        &self.tree
    }

    /// The working list: every node in hierarchical modes, roots otherwise.
    pub fn nodes(&self) -> &[NodeId] {
        self.tree.working_nodes()
    }

    pub fn node(&self, path: &str) -> Option<&Node> {
        self.tree.by_path(path)
    }

    pub fn displayed_nodes(&self) -> &[DisplayedNode] {
        &self.displayed
    }

    pub fn selected_nodes(&self) -> &[NodeId] {
        self.selection.selected()
    }

    pub fn chips(&self) -> &[NodeId] {
        self.selection.chips()
    }

    pub fn select_all_state(&self) -> SelectAllState {
        self.selection.select_all()
    }

    pub fn focused(&self) -> Option<&FocusTarget> {
        self.focus.target()
    }

    pub fn has_focus(&self) -> bool {
        self.focus.has_focus()
    }

    pub fn is_open(&self) -> bool {
        self.dropdown.is_open()
    }

    pub fn is_disabled(&self) -> bool {
        self.config.disabled
    }

    pub fn search_value(&self) -> &str {
        self.search.value()
    }

    pub fn is_search_mode(&self) -> bool {
        self.search.is_active()
    }

    pub fn is_loading(&self) -> bool {
        self.loader.is_loading()
    }

    pub fn dropdown_rows(&self) -> &[DropdownRow] {
        &self.rows
    }

    /// Leading dropdown rows pinned above the scrolling area.
    pub fn sticky_count(&self) -> usize {
        self.rows.iter().take_while(|row| row.is_sticky()).count()
    }

    pub fn virtual_list(&self) -> &VirtualList {
        &self.list
    }

    pub fn virtual_list_mut(&mut self) -> &mut VirtualList {
        &mut self.list
    }

    pub fn displayed_paths(&self) -> Vec<&str> {
        self.paths_of(self.displayed.iter().map(|d| d.id))
    }

    pub fn selected_paths(&self) -> Vec<&str> {
        self.paths_of(self.selection.selected().iter().copied())
    }

    pub fn chip_paths(&self) -> Vec<&str> {
        self.paths_of(self.selection.chips().iter().copied())
    }

    /// Selection plus the full tree in the caller's shape.
    pub fn snapshot(&self) -> TreeSnapshot {
        self.tree.snapshot(self.selection.selected())
    }

    /// The scroll offset to apply after keyboard navigation moved focus.
    pub fn take_scroll_request(&mut self) -> Option<f32> {
        if std::mem::take(&mut self.scroll_request) {
            Some(self.list.scroll_offset())
        } else {
            None
        }
    }

    /// True once when the dropdown search input should grab platform focus
    /// again after the rendered rows changed.
    pub fn take_input_refocus(&mut self, now: Instant) -> bool {
        self.refocus.fire_if_due(now) && self.focus.target() == Some(&FocusTarget::FieldInput)
    }

    fn paths_of(&self, ids: impl Iterator<Item = NodeId>) -> Vec<&str> {
        ids.map(|id| self.tree.node(id).path()).collect()
    }

    // ===== Visibility rules =====

    pub fn show_select_all(&self) -> bool {
        self.config.with_select_all
            && self.config.mode != SelectionMode::Single
            && !self.search.is_active()
            && !self.tree.working_nodes().is_empty()
    }

    pub fn show_clear_all(&self) -> bool {
        self.config.with_clear_all && !self.config.disabled && self.selection.has_selection()
    }

    pub fn show_footer(&self) -> bool {
        let footer = &self.config.footer;
        footer.enabled
            && (!self.search.is_active() || footer.show_when_searching)
            && (!self.displayed.is_empty() || footer.show_when_no_items)
    }

    fn input_in_dropdown(&self) -> bool {
        self.config.searchable && self.config.with_dropdown_input
    }

    fn field_targets(&self) -> Vec<FocusTarget> {
        field_focusables(self.chip_paths(), self.show_clear_all())
    }

    fn dropdown_targets(&self) -> Vec<FocusTarget> {
        dropdown_focusables(self.show_select_all(), self.displayed_paths(), self.show_footer())
    }

    // ===== Dispatch =====

    /// Applies one user event.
    pub fn dispatch(&mut self, event: WidgetEvent) -> DispatchOutcome {
        if self.config.disabled {
            debug!(event = event.name(), "widget disabled, event ignored");
            return DispatchOutcome::IGNORED;
        }
        debug!(event = event.name(), "dispatch");

        match event {
            WidgetEvent::FieldClick => self.on_field_click(),
            WidgetEvent::KeyDown(key) => self.handle_key(key),
            WidgetEvent::OutsideClick | WidgetEvent::Blur => {
                if self.reset() {
                    DispatchOutcome::HANDLED
                } else {
                    DispatchOutcome::IGNORED
                }
            }
            WidgetEvent::RowClick(path) => self.on_row_click(path),
            WidgetEvent::ChipClick(path) => self.on_chip_click(path),
            WidgetEvent::ChipClear(path) => self.on_chip_clear(path),
            WidgetEvent::ClearAll => self.on_clear_all(),
            WidgetEvent::SelectAllClick => self.on_select_all(),
            WidgetEvent::ExpandClick(path) => self.on_expand_click(path),
            WidgetEvent::SearchInput(value) => self.on_search_input(value),
            WidgetEvent::FooterClick => self.on_footer_click(),
        }
    }

    fn on_field_click(&mut self) -> DispatchOutcome {
        let open = !self.dropdown.is_open();
        self.request_open(open);
        self.focus_target(FocusTarget::FieldInput);
        self.rederive();
        DispatchOutcome::HANDLED
    }

    fn on_row_click(&mut self, path: String) -> DispatchOutcome {
        let Some(id) = self.tree.id_of(&path) else {
            return DispatchOutcome::IGNORED;
        };
        self.focus_target(FocusTarget::DropdownRow(path));
        if self.tree.node(id).is_disabled() {
            return DispatchOutcome::HANDLED;
        }

        selection::handle_change(&mut self.tree, id);
        if self.config.close_on_select {
            self.request_open(false);
        }
        self.rederive();
        self.emit_node_change(id);
        DispatchOutcome::HANDLED
    }

    fn on_chip_click(&mut self, path: String) -> DispatchOutcome {
        if self.tree.id_of(&path).is_none() {
            return DispatchOutcome::IGNORED;
        }
        self.focus_target(FocusTarget::FieldChip(path));
        if !self.dropdown.is_open() {
            self.request_open(true);
        }
        self.rederive();
        DispatchOutcome::HANDLED
    }

    fn on_chip_clear(&mut self, path: String) -> DispatchOutcome {
        if self.unselect_path(&path) {
            self.focus_target(FocusTarget::FieldInput);
            DispatchOutcome::HANDLED
        } else {
            DispatchOutcome::IGNORED
        }
    }

    fn on_clear_all(&mut self) -> DispatchOutcome {
        selection::clear_all(&mut self.tree);
        self.focus_target(FocusTarget::FieldInput);
        self.rederive();

        if self.callbacks.wants_snapshots() {
            let state = (self.config.with_select_all && self.config.mode != SelectionMode::Single)
                .then(|| self.selection.select_all());
            let snapshot = self.snapshot();
            self.callbacks.emit_clear_all(&snapshot, state);
        }
        DispatchOutcome::HANDLED
    }

    fn on_select_all(&mut self) -> DispatchOutcome {
        if !self.show_select_all() {
            return DispatchOutcome::IGNORED;
        }
        selection::toggle_select_all(&mut self.tree);
        self.focus_target(FocusTarget::DropdownSelectAll);
        self.rederive();

        if self.callbacks.wants_snapshots() {
            let snapshot = self.snapshot();
            let state = self.selection.select_all();
            self.callbacks.emit_select_all_change(&snapshot, state);
        }
        DispatchOutcome::HANDLED
    }

    fn on_expand_click(&mut self, path: String) -> DispatchOutcome {
        let Some(id) = self.tree.id_of(&path) else {
            return DispatchOutcome::IGNORED;
        };
        let expand = !self.tree.node(id).is_expanded_in(self.search.is_active());
        self.focus_target(FocusTarget::DropdownRow(path));
        if !self.set_expanded(id, expand) {
            self.revalidate_focus();
        }
        DispatchOutcome::HANDLED
    }

    fn on_search_input(&mut self, value: String) -> DispatchOutcome {
        if !self.config.searchable {
            return DispatchOutcome::IGNORED;
        }
        if self.search.set(&value) {
            search::search_all(&mut self.tree, &value);
            self.list.set_scroll_offset(0.0);
        }
        if !self.dropdown.is_open() {
            self.request_open(true);
        }
        self.focus_target(FocusTarget::FieldInput);
        self.rederive();
        DispatchOutcome::HANDLED
    }

    fn on_footer_click(&mut self) -> DispatchOutcome {
        if !self.show_footer() {
            return DispatchOutcome::IGNORED;
        }
        self.focus_target(FocusTarget::DropdownFooter);
        DispatchOutcome::HANDLED
    }

    // ===== Host notifications =====

    /// Reports which dropdown rows the host rendered this frame.
    ///
    /// Fires `on_last_item_reached` once per row count when the final row is
    /// within `range`, and arms the dropdown-input refocus when the rendered
    /// rows changed.
    pub fn on_rows_rendered(&mut self, range: Range<usize>, now: Instant) {
        if self.config.disabled {
            return;
        }

        if self.rendered.as_ref() != Some(&range) {
            self.rendered = Some(range.clone());
            if self.input_in_dropdown()
                && self.dropdown.is_open()
                && self.focus.target() == Some(&FocusTarget::FieldInput)
            {
                self.refocus.schedule(now);
            }
        }

        if self.list.take_last_item_reached(&range) && !self.displayed.is_empty() {
            let records: Vec<TreeRecord> = self
                .displayed
                .iter()
                .map(|d| self.tree.record(d.id))
                .collect();
            self.callbacks
                .emit_last_item_reached(self.search.value(), &records);
        }
    }

    /// Applies finished child loads.
    ///
    /// A result is discarded when the tree was rebuilt since the request or
    /// the node is gone or no longer waiting. A disabled widget applies
    /// nothing.
    ///
    /// # Returns
    /// Number of loads merged into the tree.
    pub fn poll_loaded_children(&mut self) -> usize {
        // Results wait in the channel until the widget is enabled again.
        if self.config.disabled {
            return 0;
        }
        let mut applied = 0;
        let mut changed = false;

        for loaded in self.loader.poll() {
            if loaded.generation != self.tree.generation() {
                debug!(path = %loaded.path, generation = loaded.generation, "discarding stale child load");
                continue;
            }
            let Some(id) = self.tree.id_of(&loaded.path) else {
                debug!(path = %loaded.path, "discarding child load for unknown node");
                continue;
            };
            if !self.tree.node(id).is_loading() {
                debug!(path = %loaded.path, "discarding child load for idle node");
                continue;
            }

            match loaded.result {
                Ok(records) => {
                    merge_children(&mut self.tree, id, &records);
                    applied += 1;
                }
                Err(err) => {
                    warn!(path = %loaded.path, error = %err, "loading children failed");
                    self.tree.node_mut(id).loading = false;
                }
            }
            changed = true;
        }

        if changed {
            if self.search.is_active() {
                search::search_all(&mut self.tree, self.search.value());
            }
            self.rederive();
        }
        applied
    }

    // ===== Presentation =====

    /// Props for the field and everything inside it.
    pub fn field_model(&self) -> FieldModel {
        let disabled = self.config.disabled;
        let focused = self.focus.target();

        let chips = self
            .selection
            .chips()
            .iter()
            .map(|&id| {
                let node = self.tree.node(id);
                let path = node.path().to_string();
                let target = FocusTarget::FieldChip(path.clone());
                let chip = ElementProps::new(
                    self.wire(
                        RootAttributes::new(format!("chip:{path}"))
                            .focusable(target.tag(), focused == Some(&target)),
                        WidgetEvent::ChipClick(path.clone()),
                    ),
                    ChipProps {
                        label: node.name().to_string(),
                        path: path.clone(),
                        disabled: disabled || node.is_disabled(),
                    },
                );
                let clear = (!disabled && !node.is_disabled()).then(|| {
                    ElementProps::new(
                        RootAttributes::new(format!("chip-clear:{path}"))
                            .on_activate(WidgetEvent::ChipClear(path.clone())),
                        ChipClearProps { path: path.clone() },
                    )
                });
                ChipModel { chip, clear }
            })
            .collect();

        let input = (self.config.searchable && !self.config.with_dropdown_input)
            .then(|| self.input_props(false));

        let clear = self.show_clear_all().then(|| {
            let target = FocusTarget::FieldClear;
            ElementProps::new(
                RootAttributes::new("clear")
                    .focusable(target.tag(), focused == Some(&target))
                    .on_activate(WidgetEvent::ClearAll),
                FieldClearProps { disabled },
            )
        });

        FieldModel {
            field: ElementProps::new(
                self.wire(RootAttributes::new("field"), WidgetEvent::FieldClick),
                FieldProps {
                    disabled,
                    open: self.dropdown.is_open(),
                    has_focus: self.focus.has_focus(),
                },
            ),
            chips,
            input,
            clear,
        }
    }

    /// Props for one dropdown row.
    pub fn dropdown_row_props(&self, index: usize) -> Option<RowModel> {
        let focused = self.focus.target();
        let model = match self.rows.get(index)? {
            DropdownRow::Input => RowModel::Input(self.input_props(true)),
            DropdownRow::SelectAll => {
                let target = FocusTarget::DropdownSelectAll;
                let state = self.selection.select_all();
                RowModel::SelectAll(ElementProps::new(
                    self.wire(
                        RootAttributes::new("select-all")
                            .focusable(target.tag(), focused == Some(&target)),
                        WidgetEvent::SelectAllClick,
                    ),
                    SelectAllProps {
                        label: SELECT_ALL_LABEL.to_string(),
                        checked: state == SelectAllState::Selected,
                        partial: state == SelectAllState::Partial,
                    },
                ))
            }
            DropdownRow::Node(displayed) => self.node_row(displayed, focused),
            DropdownRow::NoData => self.placeholder("no-data", &self.config.no_data_text),
            DropdownRow::NoMatches => self.placeholder("no-matches", &self.config.no_matches_text),
            DropdownRow::Footer => {
                let target = FocusTarget::DropdownFooter;
                RowModel::Footer(ElementProps::new(
                    self.wire(
                        RootAttributes::new("footer")
                            .focusable(target.tag(), focused == Some(&target)),
                        WidgetEvent::FooterClick,
                    ),
                    FooterProps {
                        searching: self.search.is_active(),
                        empty: self.displayed.is_empty(),
                    },
                ))
            }
        };
        Some(model)
    }

    fn node_row(&self, displayed: &DisplayedNode, focused: Option<&FocusTarget>) -> RowModel {
        let node = self.tree.node(displayed.id);
        let path = node.path().to_string();
        let target = FocusTarget::DropdownRow(path.clone());
        let search_mode = self.search.is_active();
        let expandable = self.tree.mode().is_hierarchical() && node.is_expandable();
        let expanded = node.is_expanded_in(search_mode);

        let toggle = expandable.then(|| {
            ElementProps::new(
                self.wire(
                    RootAttributes::new(format!("toggle:{path}")),
                    WidgetEvent::ExpandClick(path.clone()),
                ),
                ExpandToggleProps {
                    expanded,
                    loading: node.is_loading(),
                },
            )
        });

        RowModel::Node {
            row: ElementProps::new(
                self.wire(
                    RootAttributes::new(format!("row:{path}"))
                        .focusable(target.tag(), focused == Some(&target)),
                    WidgetEvent::RowClick(path.clone()),
                ),
                RowProps {
                    label: node.name().to_string(),
                    path,
                    depth: displayed.depth,
                    checked: node.is_selected(),
                    partial: node.is_partially_selected(),
                    disabled: node.is_disabled() || self.config.disabled,
                    expanded,
                    expandable,
                    matched: node.is_matched(),
                    single: self.tree.mode() == SelectionMode::Single,
                    hierarchical: self.tree.mode().is_hierarchical(),
                    branch_context: displayed.branch_context.clone(),
                },
            ),
            toggle,
        }
    }

    fn placeholder(&self, key: &str, text: &str) -> RowModel {
        RowModel::Placeholder(ElementProps::new(
            RootAttributes::new(key),
            PlaceholderProps {
                text: text.to_string(),
            },
        ))
    }

    fn input_props(&self, in_dropdown: bool) -> ElementProps<InputProps> {
        let target = FocusTarget::FieldInput;
        let mut attributes = RootAttributes::new("input")
            .focusable(target.tag(), self.focus.target() == Some(&target));
        if !in_dropdown {
            attributes = self.wire(attributes, WidgetEvent::FieldClick);
        }
        ElementProps::new(
            attributes,
            InputProps {
                value: self.search.value().to_string(),
                placeholder: self.config.input_placeholder.clone(),
                disabled: self.config.disabled,
                in_dropdown,
            },
        )
    }

    /// Attaches `event` unless the widget is disabled.
    fn wire(&self, attributes: RootAttributes, event: WidgetEvent) -> RootAttributes {
        if self.config.disabled {
            attributes
        } else {
            attributes.on_activate(event)
        }
    }

    // ===== Internals =====

    fn rebuild(&mut self) {
        self.generation += 1;
        self.tree = build_tree(&self.records, self.config.mode, self.generation);
        debug!(generation = self.generation, mode = ?self.config.mode, nodes = self.tree.len(), "tree rebuilt");
        if self.search.is_active() {
            search::search_all(&mut self.tree, self.search.value());
        }
        self.rendered = None;
        self.rederive();
    }

    /// Recomputes every derived list and revalidates focus.
    fn rederive(&mut self) {
        let search_mode = self.search.is_active();
        let working = self.tree.working_nodes();

        let selected: Vec<NodeId> = working
            .iter()
            .copied()
            .filter(|&id| self.tree.node(id).is_selected())
            .collect();
        self.displayed = collect_displayed(&self.tree, search_mode);
        let select_all = selection::select_all_state(&self.tree, working);
        let chips = chip_nodes(&self.tree, &selected);
        self.selection.update(selected, chips, select_all);

        self.rebuild_rows();
        self.revalidate_focus();
    }

    fn rebuild_rows(&mut self) {
        let mut rows = Vec::with_capacity(self.displayed.len() + 3);
        if self.input_in_dropdown() {
            rows.push(DropdownRow::Input);
        }
        if self.show_select_all() {
            rows.push(DropdownRow::SelectAll);
        }
        if self.tree.working_nodes().is_empty() {
            rows.push(DropdownRow::NoData);
        } else if self.displayed.is_empty() {
            rows.push(DropdownRow::NoMatches);
        } else {
            rows.extend(self.displayed.iter().cloned().map(DropdownRow::Node));
        }
        if self.show_footer() {
            rows.push(DropdownRow::Footer);
        }

        self.rows = rows;
        let sticky = self.sticky_count();
        self.list.set_item_count(self.rows.len());
        self.list.set_sticky_count(sticky);
    }

    fn revalidate_focus(&mut self) {
        let Some(target) = self.focus.target().cloned() else {
            return;
        };
        let valid = match target.region() {
            FocusRegion::Field => self.field_targets().contains(&target),
            FocusRegion::Dropdown => {
                self.dropdown.is_open() && self.dropdown_targets().contains(&target)
            }
        };
        if !valid {
            debug!(focus = %target, "focus target no longer rendered, resetting to input");
            self.focus.retarget(Some(FocusTarget::FieldInput));
        }
    }

    /// Opens or closes, notifying the caller; closing pulls dropdown focus
    /// back to the input.
    fn request_open(&mut self, open: bool) {
        if let Some(requested) = self.dropdown.request(open) {
            self.callbacks.emit_dropdown_toggle(requested);
        }
        if !open && self.focus.is_dropdown() {
            self.focus.retarget(Some(FocusTarget::FieldInput));
        }
    }

    fn focus_target(&mut self, target: FocusTarget) {
        if self.focus.focus(target) {
            self.callbacks.emit_focus();
        }
    }

    /// Focuses a dropdown target and scrolls its row into view.
    fn focus_dropdown_target(&mut self, target: FocusTarget) {
        let index = self.rows.iter().position(|row| match (row, &target) {
            (DropdownRow::SelectAll, FocusTarget::DropdownSelectAll) => true,
            (DropdownRow::Footer, FocusTarget::DropdownFooter) => true,
            (DropdownRow::Node(d), FocusTarget::DropdownRow(path)) => {
                self.tree.node(d.id).path() == path
            }
            _ => false,
        });
        if let Some(index) = index {
            self.list.scroll_to_index(index);
            self.scroll_request = true;
        }
        self.focus_target(target);
    }

    /// Outside-click reset: close, clear search, drop focus.
    ///
    /// # Returns
    /// `true` if there was anything to reset.
    fn reset(&mut self) -> bool {
        let active = self.focus.has_focus() || self.dropdown.is_open() || self.search.is_active();
        self.request_open(false);
        if self.search.clear() {
            search::search_all(&mut self.tree, "");
        }
        self.refocus.cancel();
        if self.focus.clear() {
            self.callbacks.emit_blur();
        }
        self.rederive();
        active
    }

    /// Unselects the node at `path` and notifies. Disabled nodes are left.
    fn unselect_path(&mut self, path: &str) -> bool {
        let Some(id) = self.tree.id_of(path) else {
            return false;
        };
        if self.tree.node(id).is_disabled() {
            return false;
        }
        selection::handle_unselect(&mut self.tree, id);
        self.rederive();
        self.emit_node_change(id);
        true
    }

    /// Expands or collapses `id` in the current mode, starting a child load
    /// for an unloaded lazy node.
    ///
    /// # Returns
    /// `true` if the expansion flag changed.
    fn set_expanded(&mut self, id: NodeId, expand: bool) -> bool {
        let search_mode = self.search.is_active();
        let node = self.tree.node(id);
        if !self.tree.mode().is_hierarchical() || !node.is_expandable() {
            return false;
        }
        if node.is_expanded_in(search_mode) == expand {
            return false;
        }

        search::handle_expand(&mut self.tree, id, search_mode, expand);
        if expand {
            self.start_child_load(id);
        }
        self.rederive();

        if self.callbacks.wants_snapshots() {
            let record = self.tree.record(id);
            let snapshot = self.snapshot();
            self.callbacks.emit_node_toggle(&record, &snapshot);
        }
        true
    }

    fn start_child_load(&mut self, id: NodeId) {
        let node = self.tree.node(id);
        if !node.is_lazy() || node.is_loading() || node.has_children() {
            return;
        }
        let Some(provider) = self.callbacks.children_provider() else {
            debug!(path = node.path(), "lazy node expanded without a children provider");
            return;
        };

        let path = node.path().to_string();
        let record = node.to_record();
        self.tree.node_mut(id).loading = true;
        self.loader
            .start(provider, self.tree.generation(), path, record);
    }

    fn emit_node_change(&mut self, id: NodeId) {
        if !self.callbacks.wants_snapshots() {
            return;
        }
        let record = self.tree.record(id);
        let snapshot = self.snapshot();
        self.callbacks.emit_node_change(&record, &snapshot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OpenControl;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    fn sample() -> Vec<TreeRecord> {
        vec![
            TreeRecord::new("fruits").with_children(vec![
                TreeRecord::new("apple"),
                TreeRecord::new("banana"),
            ]),
            TreeRecord::new("vegetables").with_children(vec![
                TreeRecord::new("carrot"),
                TreeRecord::new("potato"),
            ]),
        ]
    }

    fn controller(mode: SelectionMode) -> TreeSelectController {
        TreeSelectController::new(sample(), TreeSelectConfig::default().with_mode(mode))
    }

    fn key(controller: &mut TreeSelectController, key: Key) -> DispatchOutcome {
        controller.dispatch(WidgetEvent::KeyDown(key))
    }

    #[test]
    fn test_row_click_selects_subtree() {
        let mut c = controller(SelectionMode::Tree);
        c.dispatch(WidgetEvent::FieldClick);
        assert!(c.is_open());
        assert_eq!(c.displayed_paths(), vec!["0", "1"]);

        c.dispatch(WidgetEvent::RowClick("0".into()));
        assert_eq!(c.selected_paths(), vec!["0", "0.0", "0.1"]);
        assert_eq!(c.chip_paths(), vec!["0"]);
        assert_eq!(c.select_all_state(), SelectAllState::Partial);
        assert_eq!(c.focused(), Some(&FocusTarget::DropdownRow("0".into())));
    }

    #[test]
    fn test_expand_click_reveals_children() {
        let mut c = controller(SelectionMode::Tree);
        c.dispatch(WidgetEvent::ExpandClick("0".into()));
        assert_eq!(c.displayed_paths(), vec!["0", "0.0", "0.1", "1"]);

        c.dispatch(WidgetEvent::ExpandClick("0".into()));
        assert_eq!(c.displayed_paths(), vec!["0", "1"]);
    }

    #[test]
    fn test_expand_ignored_in_flat_modes() {
        let mut c = controller(SelectionMode::Multi);
        c.dispatch(WidgetEvent::ExpandClick("0".into()));
        assert_eq!(c.displayed_paths(), vec!["0", "1"]);
        assert!(!c.node("0").is_some_and(|n| n.is_expanded()));
    }

    #[test]
    fn test_single_mode_last_wins() {
        let mut c = controller(SelectionMode::Single);
        c.dispatch(WidgetEvent::RowClick("0".into()));
        c.dispatch(WidgetEvent::RowClick("1".into()));
        assert_eq!(c.selected_paths(), vec!["1"]);

        c.dispatch(WidgetEvent::RowClick("1".into()));
        assert!(c.selected_paths().is_empty());
    }

    #[test]
    fn test_search_filters_and_outside_click_restores() {
        let mut c = controller(SelectionMode::Tree);
        c.dispatch(WidgetEvent::SearchInput("carrot".into()));
        assert!(c.is_open());
        assert!(c.is_search_mode());
        assert_eq!(c.displayed_paths(), vec!["1", "1.0"]);

        c.dispatch(WidgetEvent::SearchInput("zzz".into()));
        assert!(c.displayed_paths().is_empty());
        assert_eq!(c.dropdown_rows(), &[DropdownRow::NoMatches]);

        let outcome = c.dispatch(WidgetEvent::OutsideClick);
        assert!(outcome.handled);
        assert!(!c.is_open());
        assert!(!c.has_focus());
        assert_eq!(c.search_value(), "");
        assert_eq!(c.displayed_paths(), vec!["0", "1"]);
    }

    #[test]
    fn test_outside_click_on_idle_widget_is_ignored() {
        let mut c = controller(SelectionMode::Tree);
        assert!(!c.dispatch(WidgetEvent::OutsideClick).handled);
    }

    #[test]
    fn test_empty_tree_shows_no_data() {
        let c = TreeSelectController::new(Vec::new(), TreeSelectConfig::default());
        assert_eq!(c.dropdown_rows(), &[DropdownRow::NoData]);
        assert!(!c.show_select_all());
    }

    #[test]
    fn test_disabled_widget_ignores_events() {
        let config = TreeSelectConfig {
            disabled: true,
            ..Default::default()
        };
        let mut c = TreeSelectController::new(sample(), config);
        assert!(!c.dispatch(WidgetEvent::FieldClick).handled);
        assert!(!c.dispatch(WidgetEvent::RowClick("0".into())).handled);
        assert!(!c.is_open());
        assert!(c.selected_paths().is_empty());
        assert!(c.field_model().field.attributes.on_activate.is_none());
    }

    #[test]
    fn test_disabling_drops_focus_quietly() {
        let blurs = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&blurs);
        let mut c = controller(SelectionMode::Tree)
            .with_callbacks(Callbacks::new().on_blur(move || *counter.borrow_mut() += 1));
        c.dispatch(WidgetEvent::FieldClick);

        c.set_disabled(true);
        assert!(!c.is_open());
        assert!(!c.has_focus());
        assert_eq!(*blurs.borrow(), 0);
    }

    #[test]
    fn test_rebuild_keeps_focus_only_while_it_resolves() {
        let mut c = controller(SelectionMode::Tree);
        c.dispatch(WidgetEvent::FieldClick);
        key(&mut c, Key::ArrowDown);
        key(&mut c, Key::ArrowDown);
        assert_eq!(c.focused(), Some(&FocusTarget::DropdownRow("1".into())));

        c.set_data(sample());
        assert_eq!(c.focused(), Some(&FocusTarget::DropdownRow("1".into())));

        c.set_data(vec![TreeRecord::new("fruits")]);
        assert_eq!(c.focused(), Some(&FocusTarget::FieldInput));
    }

    #[test]
    fn test_keyboard_walks_dropdown() {
        let mut c = controller(SelectionMode::Tree);
        c.dispatch(WidgetEvent::FieldClick);

        key(&mut c, Key::ArrowDown);
        assert_eq!(c.focused(), Some(&FocusTarget::DropdownRow("0".into())));
        key(&mut c, Key::ArrowDown);
        assert_eq!(c.focused(), Some(&FocusTarget::DropdownRow("1".into())));
        key(&mut c, Key::ArrowDown);
        assert_eq!(c.focused(), Some(&FocusTarget::DropdownRow("0".into())));

        key(&mut c, Key::ArrowRight);
        assert_eq!(c.displayed_paths().len(), 4);

        key(&mut c, Key::Enter);
        assert_eq!(c.selected_paths(), vec!["0", "0.0", "0.1"]);

        assert!(key(&mut c, Key::Escape).handled);
        assert!(!c.is_open());
        assert_eq!(c.focused(), Some(&FocusTarget::FieldInput));
    }

    #[test]
    fn test_arrow_up_from_field_enters_at_last_row() {
        let mut c = controller(SelectionMode::Tree);
        c.dispatch(WidgetEvent::FieldClick);
        c.dispatch(WidgetEvent::FieldClick);
        assert!(!c.is_open());

        key(&mut c, Key::ArrowUp);
        assert!(c.is_open());
        assert_eq!(c.focused(), Some(&FocusTarget::DropdownRow("1".into())));
    }

    #[test]
    fn test_tab_moves_to_clear_then_leaves() {
        let mut c = controller(SelectionMode::Tree);
        c.dispatch(WidgetEvent::RowClick("0.0".into()));
        c.dispatch(WidgetEvent::ChipClick("0.0".into()));
        c.dispatch(WidgetEvent::FieldClick);
        assert_eq!(c.focused(), Some(&FocusTarget::FieldInput));

        assert!(key(&mut c, Key::Tab { shift: false }).handled);
        assert_eq!(c.focused(), Some(&FocusTarget::FieldClear));
        assert!(key(&mut c, Key::Tab { shift: true }).handled);
        assert_eq!(c.focused(), Some(&FocusTarget::FieldInput));

        key(&mut c, Key::Tab { shift: false });
        assert!(!key(&mut c, Key::Tab { shift: false }).handled);
        assert!(!c.has_focus());
        assert!(!c.is_open());
    }

    #[test]
    fn test_backspace_removes_focused_chip() {
        let mut c = controller(SelectionMode::Tree);
        c.dispatch(WidgetEvent::RowClick("0.0".into()));
        c.dispatch(WidgetEvent::RowClick("1.0".into()));
        assert_eq!(c.chip_paths(), vec!["0.0", "1.0"]);

        c.dispatch(WidgetEvent::ChipClick("1.0".into()));
        assert!(key(&mut c, Key::Backspace).handled);
        assert_eq!(c.chip_paths(), vec!["0.0"]);
        assert_eq!(c.focused(), Some(&FocusTarget::FieldChip("0.0".into())));

        key(&mut c, Key::Backspace);
        assert!(c.chip_paths().is_empty());
        assert_eq!(c.focused(), Some(&FocusTarget::FieldInput));
    }

    #[test]
    fn test_left_right_yield_to_caret_while_typing() {
        let mut c = controller(SelectionMode::Tree);
        c.dispatch(WidgetEvent::RowClick("0".into()));
        c.dispatch(WidgetEvent::SearchInput("ap".into()));
        assert!(!key(&mut c, Key::ArrowLeft).handled);

        c.dispatch(WidgetEvent::SearchInput(String::new()));
        assert!(key(&mut c, Key::ArrowLeft).handled);
        assert_eq!(c.focused(), Some(&FocusTarget::FieldChip("0".into())));
    }

    #[test]
    fn test_controlled_open_waits_for_caller() {
        let requests = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&requests);
        let config = TreeSelectConfig {
            open: OpenControl::Controlled,
            ..Default::default()
        };
        let mut c = TreeSelectController::new(sample(), config)
            .with_callbacks(Callbacks::new().on_dropdown_toggle(move |open| log.borrow_mut().push(open)));

        c.dispatch(WidgetEvent::FieldClick);
        assert!(!c.is_open());
        assert_eq!(*requests.borrow(), vec![true]);

        c.set_open(true);
        assert!(c.is_open());
        key(&mut c, Key::ArrowDown);
        assert_eq!(c.focused(), Some(&FocusTarget::DropdownRow("0".into())));

        key(&mut c, Key::Escape);
        assert!(c.is_open());
        assert_eq!(*requests.borrow(), vec![true, false]);

        c.set_open(false);
        assert!(!c.is_open());
        assert_eq!(c.focused(), Some(&FocusTarget::FieldInput));
    }

    #[test]
    fn test_node_change_receives_snapshot() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&seen);
        let mut c = controller(SelectionMode::Tree).with_callbacks(Callbacks::new().on_node_change(
            move |node, snapshot| {
                let selected: Vec<String> =
                    snapshot.selected.iter().map(|r| r.label.clone()).collect();
                log.borrow_mut().push((node.label.clone(), node.selected, selected));
            },
        ));

        c.dispatch(WidgetEvent::RowClick("1".into()));
        let seen = seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, "vegetables");
        assert!(seen[0].1);
        assert_eq!(seen[0].2, vec!["vegetables", "carrot", "potato"]);
    }

    #[test]
    fn test_select_all_toggles_working_list() -> anyhow::Result<()> {
        let states = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&states);
        let config = TreeSelectConfig::from_json(r#"{ "with_select_all": true }"#)?;
        let mut c = TreeSelectController::new(sample(), config).with_callbacks(
            Callbacks::new().on_select_all_change(move |_, state| log.borrow_mut().push(state)),
        );

        assert_eq!(c.dropdown_rows()[0], DropdownRow::SelectAll);
        assert_eq!(c.sticky_count(), 1);

        c.dispatch(WidgetEvent::SelectAllClick);
        assert_eq!(c.selected_paths().len(), 6);
        c.dispatch(WidgetEvent::SelectAllClick);
        assert!(c.selected_paths().is_empty());
        assert_eq!(
            *states.borrow(),
            vec![SelectAllState::Selected, SelectAllState::Unselected]
        );
        Ok(())
    }

    #[test]
    fn test_clear_all_keeps_disabled_selection() {
        let records = vec![
            TreeRecord::new("locked").selected(true).disabled(true),
            TreeRecord::new("free").selected(true),
        ];
        let mut c = TreeSelectController::new(records, TreeSelectConfig::default());
        assert!(c.show_clear_all());

        c.dispatch(WidgetEvent::ClearAll);
        assert_eq!(c.selected_paths(), vec!["0"]);
        assert!(c.field_model().chips[0].clear.is_none());
    }

    #[test]
    fn test_field_model_and_row_props() {
        let mut c = controller(SelectionMode::Tree);
        c.dispatch(WidgetEvent::FieldClick);
        c.dispatch(WidgetEvent::RowClick("0".into()));

        let field = c.field_model();
        assert_eq!(field.chips.len(), 1);
        assert_eq!(field.chips[0].chip.own.label, "fruits");
        assert!(field.input.is_some());
        assert!(field.clear.is_some());

        match c.dropdown_row_props(0) {
            Some(RowModel::Node { row, toggle }) => {
                assert!(row.own.checked);
                assert!(row.own.expandable);
                assert!(row.attributes.focused);
                assert_eq!(row.attributes.on_activate, Some(WidgetEvent::RowClick("0".into())));
                assert!(toggle.is_some());
            }
            other => panic!("unexpected row {other:?}"),
        }
        assert!(c.dropdown_row_props(99).is_none());
    }

    #[test]
    fn test_dropdown_input_row_is_sticky() {
        let config = TreeSelectConfig {
            with_dropdown_input: true,
            ..Default::default()
        };
        let c = TreeSelectController::new(sample(), config);
        assert_eq!(c.dropdown_rows()[0], DropdownRow::Input);
        assert_eq!(c.sticky_count(), 1);
        assert!(c.field_model().input.is_none());
        assert!(matches!(c.dropdown_row_props(0), Some(RowModel::Input(_))));
    }

    #[test]
    fn test_last_item_reached_fires_once() {
        let hits = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&hits);
        let mut c = controller(SelectionMode::Tree).with_callbacks(
            Callbacks::new().on_last_item_reached(move |_, displayed| {
                assert_eq!(displayed.len(), 2);
                *counter.borrow_mut() += 1;
            }),
        );
        let now = Instant::now();
        c.on_rows_rendered(0..2, now);
        c.on_rows_rendered(0..2, now);
        assert_eq!(*hits.borrow(), 1);
    }

    fn wait_for_loads(c: &TreeSelectController) {
        for _ in 0..200 {
            if !c.is_loading() {
                return;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
    }

    fn lazy_controller() -> TreeSelectController {
        let records = vec![TreeRecord::new("remote").lazy(true)];
        TreeSelectController::new(records, TreeSelectConfig::default()).with_callbacks(
            Callbacks::new().load_children(|record: &TreeRecord| -> anyhow::Result<Vec<TreeRecord>> {
                Ok(vec![
                    TreeRecord::new(format!("{}-a", record.label)),
                    TreeRecord::new(format!("{}-b", record.label)),
                ])
            }),
        )
    }

    #[test]
    fn test_lazy_children_load_on_expand() {
        let mut c = lazy_controller();
        c.dispatch(WidgetEvent::ExpandClick("0".into()));
        assert!(c.node("0").is_some_and(|n| n.is_loading()));

        wait_for_loads(&c);
        assert_eq!(c.poll_loaded_children(), 1);
        assert_eq!(c.displayed_paths(), vec!["0", "0.0", "0.1"]);
        assert!(c.node("0").is_some_and(|n| !n.is_lazy() && !n.is_loading()));
    }

    #[test]
    fn test_disabled_widget_defers_child_loads() {
        let mut c = lazy_controller();
        c.dispatch(WidgetEvent::ExpandClick("0".into()));
        c.set_disabled(true);

        wait_for_loads(&c);
        assert_eq!(c.poll_loaded_children(), 0);
        assert_eq!(c.displayed_paths(), vec!["0"]);

        c.set_disabled(false);
        assert_eq!(c.poll_loaded_children(), 1);
        assert_eq!(c.displayed_paths(), vec!["0", "0.0", "0.1"]);
    }

    #[test]
    fn test_stale_child_load_discarded() {
        let mut c = lazy_controller();
        c.dispatch(WidgetEvent::ExpandClick("0".into()));
        c.set_data(vec![TreeRecord::new("remote").lazy(true)]);

        wait_for_loads(&c);
        assert_eq!(c.poll_loaded_children(), 0);
        assert_eq!(c.displayed_paths(), vec!["0"]);
    }
}
