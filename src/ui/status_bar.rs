//! Status bar UI rendering
//!
//! Summarizes the widget's state at the bottom of the window.

use eframe::egui;
use egui::RichText;

use crate::app::DemoState;

/// Renders the status bar
///
/// # Arguments
/// * `ui` - The egui UI context for drawing
/// * `state` - Reference to demo state
pub fn render_status_bar(ui: &mut egui::Ui, state: &DemoState) {
    let controller = state.widget.controller();

    ui.horizontal(|ui| {
        ui.label(RichText::new(format!("Mode: {}", controller.config().mode.label())).strong());
        ui.label(RichText::new("|").strong());
        ui.label(format!(
            "Nodes: {} | Working: {} | Displayed: {} | Selected: {} | Chips: {}",
            controller.tree().len(),
            controller.nodes().len(),
            controller.displayed_nodes().len(),
            controller.selected_nodes().len(),
            controller.chips().len(),
        ));

        if controller.is_search_mode() {
            ui.label(RichText::new("|").strong());
            ui.label(
                RichText::new(format!("Searching '{}'", controller.search_value()))
                    .color(egui::Color32::YELLOW),
            );
        }

        ui.label(RichText::new("|").strong());
        let focus = controller
            .focused()
            .map(|target| target.to_string())
            .unwrap_or_else(|| "none".to_string());
        ui.label(format!(
            "Dropdown: {} | Focus: {}",
            if controller.is_open() { "open" } else { "closed" },
            focus
        ));

        if controller.is_loading() {
            ui.spinner();
            ui.label("Loading children...");
        }
    });
}
