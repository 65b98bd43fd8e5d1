//! Event log UI rendering

use eframe::egui;
use egui::RichText;

use crate::app::DemoState;

/// Renders the callback log, newest entries at the bottom
pub fn render_event_log(ui: &mut egui::Ui, state: &DemoState) {
    ui.horizontal(|ui| {
        ui.label(RichText::new("Callbacks").strong());
        ui.label(format!("({})", state.event_log.len()));
        if ui.small_button("Clear").clicked() {
            state.event_log.clear();
        }
    });
    ui.separator();

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .stick_to_bottom(true)
        .show(ui, |ui| {
            for entry in state.event_log.entries() {
                ui.monospace(entry);
            }
        });
}
