//! Panel orchestration and layout management.
//!
//! Lays out the header, config side panel, event log and status bar around
//! the central panel hosting the tree-select widget.

use crate::app::DemoState;
use crate::ui::{config_panel, event_log, header, status_bar};

/// Result of panel interactions that need to be handled by the application coordinator.
pub enum PanelInteraction {
    /// User requested to open a file
    OpenFileRequested(std::path::PathBuf),
    /// User requested the built-in sample data
    SampleRequested,
    /// User requested generated data
    GenerateRequested,
    /// User requested to save the selection
    SaveSelectionRequested(std::path::PathBuf),
    /// The widget configuration was edited
    ConfigChanged,
    /// Generator or provider settings were edited
    ProviderChanged,
}

/// Manages the layout and rendering of all UI panels.
pub struct PanelManager;

impl PanelManager {
    /// Renders all panels in the application window.
    ///
    /// Called from the eframe::App::update() implementation.
    pub fn render_all_panels(ctx: &egui::Context, state: &mut DemoState) -> Vec<PanelInteraction> {
        let mut interactions = Vec::new();

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            if let Some(header_interaction) = header::render_header(ui, state) {
                interactions.push(match header_interaction {
                    header::HeaderInteraction::OpenFileRequested(path) => {
                        PanelInteraction::OpenFileRequested(path)
                    }
                    header::HeaderInteraction::SampleRequested => PanelInteraction::SampleRequested,
                    header::HeaderInteraction::GenerateRequested => {
                        PanelInteraction::GenerateRequested
                    }
                    header::HeaderInteraction::SaveSelectionRequested(path) => {
                        PanelInteraction::SaveSelectionRequested(path)
                    }
                });
            }
        });

        egui::TopBottomPanel::bottom("status_panel").show(ctx, |ui| {
            status_bar::render_status_bar(ui, state);
        });

        egui::TopBottomPanel::bottom("event_log")
            .default_height(180.0)
            .resizable(true)
            .show(ctx, |ui| {
                event_log::render_event_log(ui, state);
            });

        egui::SidePanel::left("config_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                let changes = config_panel::render_config_panel(ui, state);
                if changes.config {
                    interactions.push(PanelInteraction::ConfigChanged);
                }
                if changes.provider {
                    interactions.push(PanelInteraction::ProviderChanged);
                }
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Tree Select");
            ui.separator();

            ui.allocate_ui(egui::vec2(ui.available_width().min(480.0), 0.0), |ui| {
                state.widget.show(ui);
            });

            ui.add_space(12.0);
            render_selection(ui, state);
        });

        interactions
    }
}

/// Lists the selected nodes below the widget.
fn render_selection(ui: &mut egui::Ui, state: &DemoState) {
    let controller = state.widget.controller();
    let selected = controller.selected_nodes();

    ui.label(egui::RichText::new(format!("Selected ({})", selected.len())).strong());
    egui::ScrollArea::vertical()
        .id_salt("selected_list")
        .max_height(ui.available_height())
        .show(ui, |ui| {
            for &id in selected {
                let node = controller.tree().node(id);
                ui.horizontal(|ui| {
                    ui.monospace(node.path());
                    ui.label(node.name());
                    if node.is_disabled() {
                        ui.weak("(disabled)");
                    }
                });
            }
        });
}
