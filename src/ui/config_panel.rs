//! Config panel UI rendering
//!
//! Edits the widget configuration live, plus the settings of the data
//! generator and the simulated children provider.

use eframe::egui;
use std::time::Duration;

use rtreeselect::{OpenControl, SelectionMode, TreeSelectConfig};

use crate::app::DemoState;

/// What the panel changed this frame.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ConfigPanelChanges {
    /// The widget configuration was edited
    pub config: bool,
    /// Generator or provider latency settings were edited
    pub provider: bool,
}

fn render_widget_config(ui: &mut egui::Ui, config: &mut TreeSelectConfig) -> bool {
    let before = config.clone();

    ui.label("Mode");
    for mode in SelectionMode::ALL {
        ui.radio_value(&mut config.mode, mode, mode.label());
    }
    ui.separator();

    ui.checkbox(&mut config.searchable, "Searchable");
    ui.checkbox(&mut config.with_select_all, "Select all");
    ui.checkbox(&mut config.with_clear_all, "Clear all");
    ui.checkbox(&mut config.close_on_select, "Close on select");
    ui.checkbox(&mut config.with_dropdown_input, "Input in dropdown");
    ui.checkbox(&mut config.disabled, "Disabled");

    let mut controlled = config.open == OpenControl::Controlled;
    if ui
        .checkbox(&mut controlled, "Caller owns open state")
        .on_hover_text("Open/close requests are answered by the demo one frame later")
        .changed()
    {
        config.open = if controlled {
            OpenControl::Controlled
        } else {
            OpenControl::Uncontrolled
        };
    }

    ui.collapsing("Keyboard", |ui| {
        ui.checkbox(&mut config.keyboard.field.loop_left, "Field loops left");
        ui.checkbox(&mut config.keyboard.field.loop_right, "Field loops right");
        ui.checkbox(&mut config.keyboard.dropdown.loop_up, "Dropdown loops up");
        ui.checkbox(&mut config.keyboard.dropdown.loop_down, "Dropdown loops down");
    });

    ui.collapsing("Footer", |ui| {
        ui.checkbox(&mut config.footer.enabled, "Enabled");
        ui.checkbox(&mut config.footer.show_when_searching, "While searching");
        ui.checkbox(&mut config.footer.show_when_no_items, "When empty");
    });

    ui.collapsing("Dropdown", |ui| {
        ui.add(egui::Slider::new(&mut config.dropdown_height, 80.0..=800.0).text("height"));
        ui.add(egui::Slider::new(&mut config.row_height, 12.0..=64.0).text("row estimate"));
        ui.add(egui::Slider::new(&mut config.overscan, 0.0..=400.0).text("overscan"));
    });

    ui.collapsing("Texts", |ui| {
        for (label, text) in [
            ("Placeholder", &mut config.input_placeholder),
            ("No data", &mut config.no_data_text),
            ("No matches", &mut config.no_matches_text),
        ] {
            ui.horizontal(|ui| {
                ui.label(label);
                ui.text_edit_singleline(text);
            });
        }
    });

    *config != before
}

fn render_provider_settings(ui: &mut egui::Ui, state: &mut DemoState) -> bool {
    let before = (state.generator, state.load_delay);
    let generator = &mut state.generator;

    ui.add(egui::DragValue::new(&mut generator.roots).range(0..=10_000).prefix("roots "));
    ui.add(egui::DragValue::new(&mut generator.depth).range(0..=8).prefix("depth "));
    ui.add(egui::DragValue::new(&mut generator.fanout).range(0..=50).prefix("fanout "));
    ui.add(egui::Slider::new(&mut generator.lazy_ratio, 0.0..=1.0).text("lazy ratio"));
    ui.add(egui::Slider::new(&mut generator.disabled_ratio, 0.0..=1.0).text("disabled ratio"));
    ui.add(egui::DragValue::new(&mut generator.seed).prefix("seed "));

    let mut delay_ms = state.load_delay.as_millis() as u64;
    if ui
        .add(egui::Slider::new(&mut delay_ms, 0..=3000).text("load delay (ms)"))
        .changed()
    {
        state.load_delay = Duration::from_millis(delay_ms);
    }

    (state.generator, state.load_delay) != before
}

/// Renders the configuration side panel
///
/// # Arguments
/// * `ui` - The egui UI context for drawing
/// * `state` - Mutable reference to demo state
///
/// # Returns
/// * `ConfigPanelChanges` - Which settings groups were edited
pub fn render_config_panel(ui: &mut egui::Ui, state: &mut DemoState) -> ConfigPanelChanges {
    let mut changes = ConfigPanelChanges::default();

    egui::ScrollArea::vertical().show(ui, |ui| {
        ui.heading("Widget");
        changes.config = render_widget_config(ui, &mut state.config);

        ui.separator();
        ui.heading("Data");
        changes.provider = render_provider_settings(ui, state);
    });

    changes
}
