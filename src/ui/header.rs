//! Header panel UI rendering
//!
//! Handles the top bar with data source controls and the theme toggle.

use eframe::egui;
use egui::Color32;
use std::path::PathBuf;

use crate::app::DemoState;

/// Result of user interaction with the header panel
pub enum HeaderInteraction {
    /// User picked a data file
    OpenFileRequested(PathBuf),
    /// User asked for the built-in sample
    SampleRequested,
    /// User asked for a generated tree
    GenerateRequested,
    /// User picked a destination for the current selection
    SaveSelectionRequested(PathBuf),
}

fn json_dialog() -> rfd::FileDialog {
    let dialog = rfd::FileDialog::new().add_filter("JSON records", &["json"]);
    match std::env::current_dir() {
        Ok(cwd) => dialog.set_directory(cwd),
        Err(_) => dialog,
    }
}

/// Renders the application header
///
/// # Arguments
/// * `ui` - The egui UI context for drawing
/// * `state` - Mutable reference to demo state
///
/// # Returns
/// * `Option<HeaderInteraction>` - User interaction result
pub fn render_header(ui: &mut egui::Ui, state: &mut DemoState) -> Option<HeaderInteraction> {
    let mut interaction = None;

    ui.horizontal(|ui| {
        if ui.button("📁 Open Data").clicked() {
            if let Some(path) = json_dialog().pick_file() {
                interaction = Some(HeaderInteraction::OpenFileRequested(path));
            }
        }

        if ui.button("🌳 Sample").clicked() {
            interaction = Some(HeaderInteraction::SampleRequested);
        }

        if ui.button("🎲 Generate").clicked() {
            interaction = Some(HeaderInteraction::GenerateRequested);
        }

        ui.separator();

        let has_selection = !state.widget.controller().selected_nodes().is_empty();
        if ui
            .add_enabled(has_selection, egui::Button::new("💾 Save Selection"))
            .clicked()
        {
            if let Some(path) = json_dialog().set_file_name("selection.json").save_file() {
                interaction = Some(HeaderInteraction::SaveSelectionRequested(path));
            }
        }

        ui.separator();
        ui.label(format!("Source: {}", state.source.describe()));

        // Push theme toggle to the right
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let label = if state.dark_mode { "🌙 Dark" } else { "☀ Light" };
            if ui.button(label).clicked() {
                state.dark_mode = !state.dark_mode;
            }
        });
    });

    if let Some(err) = &state.error_message {
        ui.colored_label(Color32::RED, err);
    }

    interaction
}
