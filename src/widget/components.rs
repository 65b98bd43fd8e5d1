//! Default egui components.
//!
//! Each component returns the response of its outermost element so the host
//! can dispatch the element's `on_activate` event.

use egui::{
    Button, Checkbox, CornerRadius, Frame, Margin, RadioButton, Response, RichText, Sense,
    StrokeKind, TextEdit, Ui, UiBuilder,
};
use serde_json::Value;

use crate::presentation::components::{
    component, container, text_input, Activated, Components, RenderContext, TextOutcome,
};
use crate::presentation::props::{
    ChipClearProps, ChipProps, ComponentProps, ExpandToggleProps, FieldClearProps, FieldProps,
    FooterProps, InputProps, PlaceholderProps, RowProps, SelectAllProps,
};

/// Width of one indentation step and of the expand toggle.
pub const INDENT_WIDTH: f32 = 18.0;

/// Minimum width of the search input inside the field.
const INPUT_MIN_WIDTH: f32 = 80.0;

const DEFAULT_FOOTER_TEXT: &str = "Load more...";

impl Activated for Response {
    fn activated(&self) -> bool {
        self.clicked()
    }
}

impl RenderContext for Ui {
    type Response = Response;

    fn group_horizontal(&mut self, add: &mut dyn FnMut(&mut Self)) {
        self.horizontal(|ui| add(ui));
    }

    fn indent(&mut self, levels: usize) {
        if levels > 0 {
            self.add_space(levels as f32 * INDENT_WIDTH);
        }
    }
}

/// Outlines the element holding logical keyboard focus.
fn paint_focus(ui: &Ui, response: &Response, focused: bool) {
    if focused {
        ui.painter().rect_stroke(
            response.rect.expand(1.0),
            3.0,
            ui.visuals().selection.stroke,
            StrokeKind::Outside,
        );
    }
}

/// Reads a string custom prop.
fn custom_text<'a>(custom: &'a Value, key: &str) -> Option<&'a str> {
    custom.get(key).and_then(Value::as_str)
}

fn field(
    ui: &mut Ui,
    props: &ComponentProps<'_, FieldProps>,
    children: &mut dyn FnMut(&mut Ui),
) -> Response {
    let own = &props.own;
    let visuals = ui.visuals();
    let stroke = if own.has_focus {
        visuals.selection.stroke
    } else {
        visuals.widgets.inactive.bg_stroke
    };
    let fill = visuals.extreme_bg_color;

    // Sensing the scope registers the field before its children, so chips and
    // buttons stay on top for hit testing.
    ui.scope_builder(UiBuilder::new().sense(Sense::click()), |ui| {
        Frame::new()
            .fill(fill)
            .stroke(stroke)
            .corner_radius(CornerRadius::same(4))
            .inner_margin(Margin::symmetric(6, 4))
            .show(ui, |ui| {
                ui.set_min_width(ui.available_width());
                ui.horizontal_wrapped(|ui| {
                    children(ui);
                    ui.weak(if own.open { "⏶" } else { "⏷" });
                });
            });
    })
    .response
}

fn chip(ui: &mut Ui, props: &ComponentProps<'_, ChipProps>) -> Response {
    let button = Button::new(RichText::new(&props.own.label).small())
        .corner_radius(CornerRadius::same(8))
        .selected(props.attributes.focused);
    let response = ui.add_enabled(!props.own.disabled, button);
    response.on_hover_text(props.own.path.as_str())
}

fn chip_clear(ui: &mut Ui, _props: &ComponentProps<'_, ChipClearProps>) -> Response {
    ui.add(Button::new(RichText::new("×").small()).frame(false))
        .on_hover_text("Remove")
}

fn field_clear(ui: &mut Ui, props: &ComponentProps<'_, FieldClearProps>) -> Response {
    let tooltip = custom_text(props.custom, "tooltip").unwrap_or("Clear all");
    let response = ui
        .add_enabled(!props.own.disabled, Button::new("✕").frame(false))
        .on_hover_text(tooltip);
    paint_focus(ui, &response, props.attributes.focused);
    response
}

fn input(ui: &mut Ui, props: &ComponentProps<'_, InputProps>) -> TextOutcome<Response> {
    let own = &props.own;
    let mut text = own.value.clone();
    let width = if own.in_dropdown {
        ui.available_width()
    } else {
        INPUT_MIN_WIDTH.max(ui.available_width() - 2.0 * INDENT_WIDTH)
    };
    let edit = TextEdit::singleline(&mut text)
        .hint_text(own.placeholder.as_str())
        .frame(own.in_dropdown)
        .desired_width(width);
    let response = ui.add_enabled(!own.disabled, edit);

    // Keyboard focus follows the controller's logical focus.
    if props.attributes.focused && !response.has_focus() {
        response.request_focus();
    }

    let edited = response.changed().then_some(text);
    TextOutcome { response, edited }
}

fn select_all(ui: &mut Ui, props: &ComponentProps<'_, SelectAllProps>) -> Response {
    let own = &props.own;
    let mut checked = own.checked;
    let response = ui.add(
        Checkbox::new(&mut checked, RichText::new(&own.label).strong()).indeterminate(own.partial),
    );
    paint_focus(ui, &response, props.attributes.focused);
    response
}

fn row(ui: &mut Ui, props: &ComponentProps<'_, RowProps>) -> Response {
    let own = &props.own;
    let mut label = RichText::new(&own.label);
    if own.matched {
        label = label.strong();
    }

    let response = if own.single {
        ui.add_enabled(!own.disabled, RadioButton::new(own.checked, label))
    } else {
        let mut checked = own.checked;
        ui.add_enabled(
            !own.disabled,
            Checkbox::new(&mut checked, label).indeterminate(own.partial),
        )
    };
    paint_focus(ui, &response, props.attributes.focused);
    response
}

fn expand_toggle(ui: &mut Ui, props: &ComponentProps<'_, ExpandToggleProps>) -> Response {
    let size = egui::vec2(INDENT_WIDTH, ui.spacing().interact_size.y);
    if props.own.loading {
        return ui.add_sized(size, egui::Spinner::new().size(INDENT_WIDTH * 0.6));
    }
    let icon = if props.own.expanded { "⏷" } else { "⏵" };
    ui.add_sized(size, Button::new(icon).frame(false))
}

fn footer(ui: &mut Ui, props: &ComponentProps<'_, FooterProps>) -> Response {
    let text = custom_text(props.custom, "text").unwrap_or(DEFAULT_FOOTER_TEXT);
    let response = ui.add(egui::Label::new(RichText::new(text).weak()).sense(Sense::click()));
    paint_focus(ui, &response, props.attributes.focused);
    response
}

fn placeholder(ui: &mut Ui, props: &ComponentProps<'_, PlaceholderProps>) -> Response {
    ui.weak(props.own.text.as_str())
}

/// The default component table for egui hosts.
pub fn default_components() -> Components<Ui> {
    Components {
        field: container(field),
        chip: component(chip),
        chip_clear: component(chip_clear),
        field_clear: component(field_clear),
        input: text_input(input),
        select_all: component(select_all),
        row: component(row),
        expand_toggle: component(expand_toggle),
        footer: component(footer),
        placeholder: component(placeholder),
    }
}
