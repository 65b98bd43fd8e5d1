//! The egui host: renders the field and dropdown from controller props and
//! feeds egui input back into the controller.

use std::hash::Hash;
use std::ops::Range;
use std::sync::Arc;
use std::time::Instant;

use egui::{Area, Context, Id, Order, Rect, ScrollArea, Ui};
use tracing::trace;

use super::components::default_components;
use super::keys;
use crate::controller::{TreeSelectController, WidgetEvent};
use crate::debounce::DEFAULT_DEBOUNCE;
use crate::presentation::components::{ComponentOverrides, Components};
use crate::presentation::render::{render_field, render_row};

/// Gap between the field and the dropdown.
const DROPDOWN_GAP: f32 = 2.0;

/// A tree-select widget bound to one controller.
pub struct TreeSelectWidget {
    id: Id,
    controller: TreeSelectController,
    components: Components<Ui>,
    waker_installed: bool,
    field_rect: Option<Rect>,
    dropdown_rect: Option<Rect>,
}

impl TreeSelectWidget {
    pub fn new(id_salt: impl Hash, controller: TreeSelectController) -> Self {
        Self {
            id: Id::new(id_salt),
            controller,
            components: default_components(),
            waker_installed: false,
            field_rect: None,
            dropdown_rect: None,
        }
    }

    /// Replaces individual default components.
    pub fn with_components(mut self, overrides: ComponentOverrides<Ui>) -> Self {
        self.components = Components::with_overrides(default_components(), overrides);
        self
    }

    pub fn controller(&self) -> &TreeSelectController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut TreeSelectController {
        &mut self.controller
    }

    /// Renders the widget and applies this frame's input.
    ///
    /// # Returns
    /// The field's response.
    pub fn show(&mut self, ui: &mut Ui) -> egui::Response {
        let ctx = ui.ctx().clone();
        self.install_waker(&ctx);
        self.controller.poll_loaded_children();

        self.handle_keys(&ctx);
        self.handle_outside_click(&ctx);

        let model = self.controller.field_model();
        let field = ui.scope(|ui| render_field(ui, &self.components, &model));
        let field_rect = field.response.rect;
        self.field_rect = Some(field_rect);
        let mut events = field.inner;

        if self.controller.is_open() {
            let area = Area::new(self.id.with("dropdown"))
                .order(Order::Foreground)
                .fixed_pos(field_rect.left_bottom() + egui::vec2(0.0, DROPDOWN_GAP))
                .show(&ctx, |ui| {
                    egui::Frame::popup(ui.style())
                        .show(ui, |ui| {
                            ui.set_width(field_rect.width());
                            self.show_dropdown(ui)
                        })
                        .inner
                });
            self.dropdown_rect = Some(area.response.rect);
            events.extend(area.inner);
        } else {
            self.dropdown_rect = None;
        }

        for event in events {
            self.controller.dispatch(event);
        }

        let now = Instant::now();
        if self.controller.take_input_refocus(now) {
            ctx.request_repaint();
        }
        if self.controller.is_loading() {
            ctx.request_repaint_after(DEFAULT_DEBOUNCE);
        }

        field.response
    }

    fn install_waker(&mut self, ctx: &Context) {
        if self.waker_installed {
            return;
        }
        let ctx = ctx.clone();
        self.controller
            .set_waker(Arc::new(move || ctx.request_repaint()));
        self.waker_installed = true;
    }

    /// Dispatches key presses while the widget holds focus; handled presses are
    /// consumed before any egui widget sees them.
    fn handle_keys(&mut self, ctx: &Context) {
        if !self.controller.has_focus() {
            return;
        }
        for press in keys::key_presses(ctx) {
            let outcome = self.controller.dispatch(WidgetEvent::KeyDown(press.key));
            if outcome.handled {
                keys::consume(ctx, &press);
            }
        }
    }

    fn handle_outside_click(&mut self, ctx: &Context) {
        if !self.controller.has_focus() && !self.controller.is_open() {
            return;
        }
        let Some(pos) = ctx.input(|i| {
            i.pointer
                .any_pressed()
                .then(|| i.pointer.interact_pos())
                .flatten()
        }) else {
            return;
        };

        let inside = self.field_rect.is_some_and(|r| r.contains(pos))
            || self.dropdown_rect.is_some_and(|r| r.contains(pos));
        if !inside {
            self.controller.dispatch(WidgetEvent::OutsideClick);
        }
    }

    fn show_dropdown(&mut self, ui: &mut Ui) -> Vec<WidgetEvent> {
        ui.spacing_mut().item_spacing.y = 0.0;
        let mut events = Vec::new();

        for index in self.controller.virtual_list().sticky_range() {
            events.extend(self.show_row(ui, index));
        }

        let config = self.controller.config();
        let list = self.controller.virtual_list();
        let max_height = (config.dropdown_height - list.sticky_height()).max(list.row_height(0));

        let mut scroll = ScrollArea::vertical()
            .id_salt(self.id.with("rows"))
            .max_height(max_height)
            .auto_shrink([false, true]);
        if let Some(offset) = self.controller.take_scroll_request() {
            scroll = scroll.vertical_scroll_offset(offset);
        }

        let output = scroll.show_viewport(ui, |ui, viewport| {
            let sticky_height = self.controller.virtual_list().sticky_height();
            let list = self.controller.virtual_list_mut();
            list.set_viewport_height(viewport.height() + sticky_height);
            list.set_scroll_offset(viewport.min.y);
            ui.set_min_height(list.content_height());

            let range = list.visible_range();
            let top = list.top_padding(&range);
            if top > 0.0 {
                ui.add_space(top);
            }

            let mut rendered = Vec::new();
            for index in range.clone() {
                rendered.extend(self.show_row(ui, index));
            }
            (range, rendered)
        });

        let (range, rendered): (Range<usize>, Vec<WidgetEvent>) = output.inner;
        trace!(?range, "dropdown rows rendered");
        events.extend(rendered);
        self.controller.on_rows_rendered(range, Instant::now());
        events
    }

    /// Renders one dropdown row and reports its measured height.
    fn show_row(&mut self, ui: &mut Ui, index: usize) -> Vec<WidgetEvent> {
        let Some(row) = self.controller.dropdown_row_props(index) else {
            return Vec::new();
        };
        let inner = ui.scope(|ui| render_row(ui, &self.components, &row));
        self.controller
            .virtual_list_mut()
            .report_row_height(index, inner.response.rect.height());
        inner.inner
    }
}
