//! Render driver.
//!
//! Walks a render model, hands each element to its slot and turns
//! activations of outermost elements into widget events. The driver knows
//! nothing about the backend beyond [`RenderContext`].

use super::components::{Activated, Components, RenderContext};
use super::model::{FieldModel, RowModel};
use super::props::RootAttributes;
use crate::controller::WidgetEvent;

fn collect<R: Activated>(response: &R, attributes: &RootAttributes, events: &mut Vec<WidgetEvent>) {
    if response.activated() {
        if let Some(event) = &attributes.on_activate {
            events.push(event.clone());
        }
    }
}

/// Renders the field with its chips, input and clear button.
///
/// # Returns
/// Events produced this pass, innermost first. The field's own activation
/// only counts when no child claimed the interaction.
pub fn render_field<C: RenderContext>(
    ctx: &mut C,
    components: &Components<C>,
    model: &FieldModel,
) -> Vec<WidgetEvent> {
    let mut events = Vec::new();
    let field_props = model.field.with_custom(&components.field.custom);

    let response = {
        let events = &mut events;
        let mut children = |ctx: &mut C| {
            for chip in &model.chips {
                ctx.group_horizontal(&mut |ctx| {
                    let props = chip.chip.with_custom(&components.chip.custom);
                    let response = components.chip.component.render(ctx, &props);
                    let mut chip_events = Vec::new();
                    collect(&response, &props.attributes, &mut chip_events);

                    if let Some(clear) = &chip.clear {
                        let props = clear.with_custom(&components.chip_clear.custom);
                        let response = components.chip_clear.component.render(ctx, &props);
                        let before = chip_events.len();
                        collect(&response, &props.attributes, &mut chip_events);
                        // The remove button sits inside the chip; it wins.
                        if chip_events.len() > before {
                            chip_events.drain(..before);
                        }
                    }
                    events.extend(chip_events);
                });
            }

            if let Some(input) = &model.input {
                let props = input.with_custom(&components.input.custom);
                let outcome = components.input.component.render(ctx, &props);
                collect(&outcome.response, &props.attributes, events);
                if let Some(text) = outcome.edited {
                    events.push(WidgetEvent::SearchInput(text));
                }
            }

            if let Some(clear) = &model.clear {
                let props = clear.with_custom(&components.field_clear.custom);
                let response = components.field_clear.component.render(ctx, &props);
                collect(&response, &props.attributes, events);
            }
        };
        components
            .field
            .component
            .render(ctx, &field_props, &mut children)
    };

    if events.is_empty() {
        collect(&response, &field_props.attributes, &mut events);
    }
    events
}

/// Renders one dropdown row.
pub fn render_row<C: RenderContext>(
    ctx: &mut C,
    components: &Components<C>,
    row: &RowModel,
) -> Vec<WidgetEvent> {
    let mut events = Vec::new();
    match row {
        RowModel::Input(input) => {
            let props = input.with_custom(&components.input.custom);
            let outcome = components.input.component.render(ctx, &props);
            collect(&outcome.response, &props.attributes, &mut events);
            if let Some(text) = outcome.edited {
                events.push(WidgetEvent::SearchInput(text));
            }
        }
        RowModel::SelectAll(select_all) => {
            let props = select_all.with_custom(&components.select_all.custom);
            let response = components.select_all.component.render(ctx, &props);
            collect(&response, &props.attributes, &mut events);
        }
        RowModel::Node { row, toggle } => {
            let events = &mut events;
            ctx.group_horizontal(&mut |ctx| {
                ctx.indent(row.own.depth);
                let mut toggled = false;
                match toggle {
                    Some(toggle) => {
                        let props = toggle.with_custom(&components.expand_toggle.custom);
                        let response = components.expand_toggle.component.render(ctx, &props);
                        let before = events.len();
                        collect(&response, &props.attributes, events);
                        toggled = events.len() > before;
                    }
                    None if row.own.hierarchical => ctx.indent(1),
                    None => {}
                }
                let props = row.with_custom(&components.row.custom);
                let response = components.row.component.render(ctx, &props);
                if !toggled {
                    collect(&response, &props.attributes, events);
                }
            });
        }
        RowModel::Placeholder(placeholder) => {
            let props = placeholder.with_custom(&components.placeholder.custom);
            let response = components.placeholder.component.render(ctx, &props);
            collect(&response, &props.attributes, &mut events);
        }
        RowModel::Footer(footer) => {
            let props = footer.with_custom(&components.footer.custom);
            let response = components.footer.component.render(ctx, &props);
            collect(&response, &props.attributes, &mut events);
        }
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::components::{
        component, container, text_input, ComponentOverrides, TextOutcome,
    };
    use crate::presentation::model::ChipModel;
    use crate::presentation::props::*;
    use std::collections::HashSet;

    /// Records what was rendered; "clicks" elements by key.
    #[derive(Default)]
    struct MockUi {
        clicked: HashSet<String>,
        typed: Option<String>,
        log: Vec<String>,
    }

    impl RenderContext for MockUi {
        type Response = bool;

        fn group_horizontal(&mut self, add: &mut dyn FnMut(&mut Self)) {
            self.log.push("[".to_string());
            add(self);
            self.log.push("]".to_string());
        }
    }

    fn hit(ui: &mut MockUi, attributes: &RootAttributes) -> bool {
        ui.log.push(attributes.key.clone());
        ui.clicked.contains(&attributes.key)
    }

    fn mock_components() -> Components<MockUi> {
        Components {
            field: container(|ui: &mut MockUi, props: &ComponentProps<'_, FieldProps>, children: &mut dyn FnMut(&mut MockUi)| {
                children(ui);
                hit(ui, &props.attributes)
            }),
            chip: component(|ui: &mut MockUi, props: &ComponentProps<'_, ChipProps>| hit(ui, &props.attributes)),
            chip_clear: component(|ui: &mut MockUi, props: &ComponentProps<'_, ChipClearProps>| hit(ui, &props.attributes)),
            field_clear: component(|ui: &mut MockUi, props: &ComponentProps<'_, FieldClearProps>| hit(ui, &props.attributes)),
            input: text_input(|ui: &mut MockUi, props: &ComponentProps<'_, InputProps>| TextOutcome {
                response: hit(ui, &props.attributes),
                edited: ui.typed.take(),
            }),
            select_all: component(|ui: &mut MockUi, props: &ComponentProps<'_, SelectAllProps>| hit(ui, &props.attributes)),
            row: component(|ui: &mut MockUi, props: &ComponentProps<'_, RowProps>| hit(ui, &props.attributes)),
            expand_toggle: component(|ui: &mut MockUi, props: &ComponentProps<'_, ExpandToggleProps>| hit(ui, &props.attributes)),
            footer: component(|ui: &mut MockUi, props: &ComponentProps<'_, FooterProps>| hit(ui, &props.attributes)),
            placeholder: component(|ui: &mut MockUi, props: &ComponentProps<'_, PlaceholderProps>| hit(ui, &props.attributes)),
        }
    }

    fn field_model() -> FieldModel {
        FieldModel {
            field: ElementProps::new(
                RootAttributes::new("field").on_activate(WidgetEvent::FieldClick),
                FieldProps::default(),
            ),
            chips: vec![ChipModel {
                chip: ElementProps::new(
                    RootAttributes::new("chip:0").on_activate(WidgetEvent::ChipClick("0".into())),
                    ChipProps {
                        label: "zero".into(),
                        path: "0".into(),
                        disabled: false,
                    },
                ),
                clear: Some(ElementProps::new(
                    RootAttributes::new("chip-clear:0").on_activate(WidgetEvent::ChipClear("0".into())),
                    ChipClearProps { path: "0".into() },
                )),
            }],
            input: Some(ElementProps::new(
                RootAttributes::new("input"),
                InputProps {
                    value: String::new(),
                    placeholder: "Search...".into(),
                    disabled: false,
                    in_dropdown: false,
                },
            )),
            clear: Some(ElementProps::new(
                RootAttributes::new("clear").on_activate(WidgetEvent::ClearAll),
                FieldClearProps::default(),
            )),
        }
    }

    #[test]
    fn test_render_order_and_grouping() {
        let mut ui = MockUi::default();
        let events = render_field(&mut ui, &mock_components(), &field_model());
        assert!(events.is_empty());
        assert_eq!(
            ui.log,
            vec!["[", "chip:0", "chip-clear:0", "]", "input", "clear", "field"]
        );
    }

    #[test]
    fn test_field_activation_only_without_child_events() {
        let mut ui = MockUi::default();
        ui.clicked.insert("field".into());
        let events = render_field(&mut ui, &mock_components(), &field_model());
        assert_eq!(events, vec![WidgetEvent::FieldClick]);

        let mut ui = MockUi::default();
        ui.clicked.insert("field".into());
        ui.clicked.insert("clear".into());
        let events = render_field(&mut ui, &mock_components(), &field_model());
        assert_eq!(events, vec![WidgetEvent::ClearAll]);
    }

    #[test]
    fn test_chip_clear_wins_over_chip() {
        let mut ui = MockUi::default();
        ui.clicked.insert("chip:0".into());
        ui.clicked.insert("chip-clear:0".into());
        let events = render_field(&mut ui, &mock_components(), &field_model());
        assert_eq!(events, vec![WidgetEvent::ChipClear("0".into())]);
    }

    #[test]
    fn test_typing_emits_search_input() {
        let mut ui = MockUi {
            typed: Some("ap".into()),
            ..Default::default()
        };
        let events = render_field(&mut ui, &mock_components(), &field_model());
        assert_eq!(events, vec![WidgetEvent::SearchInput("ap".into())]);
    }

    #[test]
    fn test_row_toggle_suppresses_row_activation() {
        let row = RowModel::Node {
            row: ElementProps::new(
                RootAttributes::new("row:1").on_activate(WidgetEvent::RowClick("1".into())),
                RowProps {
                    label: "one".into(),
                    path: "1".into(),
                    depth: 0,
                    checked: false,
                    partial: false,
                    disabled: false,
                    expanded: false,
                    expandable: true,
                    matched: false,
                    single: false,
                    hierarchical: true,
                    branch_context: Vec::new(),
                },
            ),
            toggle: Some(ElementProps::new(
                RootAttributes::new("toggle:1").on_activate(WidgetEvent::ExpandClick("1".into())),
                ExpandToggleProps {
                    expanded: false,
                    loading: false,
                },
            )),
        };

        let mut ui = MockUi::default();
        ui.clicked.insert("row:1".into());
        ui.clicked.insert("toggle:1".into());
        let events = render_row(&mut ui, &mock_components(), &row);
        assert_eq!(events, vec![WidgetEvent::ExpandClick("1".into())]);

        let mut ui = MockUi::default();
        ui.clicked.insert("row:1".into());
        let events = render_row(&mut ui, &mock_components(), &row);
        assert_eq!(events, vec![WidgetEvent::RowClick("1".into())]);
    }

    #[test]
    fn test_overrides_replace_only_given_slots() {
        let overrides = ComponentOverrides {
            footer: Some(
                component(|ui: &mut MockUi, props: &ComponentProps<'_, FooterProps>| {
                    ui.log.push(format!("custom-footer:{}", props.custom["text"]));
                    false
                })
                .with_custom(serde_json::json!({ "text": "load more" })),
            ),
            ..Default::default()
        };
        let components = Components::with_overrides(mock_components(), overrides);

        let footer = RowModel::Footer(ElementProps::new(
            RootAttributes::new("footer"),
            FooterProps::default(),
        ));
        let placeholder = RowModel::Placeholder(ElementProps::new(
            RootAttributes::new("placeholder"),
            PlaceholderProps {
                text: "No data".into(),
            },
        ));

        let mut ui = MockUi::default();
        render_row(&mut ui, &components, &footer);
        render_row(&mut ui, &components, &placeholder);
        assert_eq!(ui.log, vec!["custom-footer:\"load more\"", "placeholder"]);
    }
}
