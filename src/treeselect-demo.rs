//! Tree-select demo application
//!
//! Hosts the default egui tree-select widget over a data file, the built-in
//! sample or generated data. The side panel edits the widget configuration
//! live (persisted between runs) and the bottom panel logs every callback.
//! Lazy nodes are served by a simulated provider with configurable latency.
//!
//! Usage: `treeselect-demo [DATA.json]`. Set `RUST_LOG` to control logging,
//! e.g. `RUST_LOG=rtreeselect=debug`.

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use eframe::egui;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod app;
mod ui;

use app::{ApplicationCoordinator, DemoState, SettingsCoordinator};
use ui::panel_manager::{PanelInteraction, PanelManager};

/// Initializes logging and launches the demo window.
fn main() -> eframe::Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let initial_file = std::env::args().nth(1).map(PathBuf::from);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 760.0])
            .with_title("Tree Select Demo"),
        ..Default::default()
    };

    eframe::run_native(
        "Tree Select Demo",
        options,
        Box::new(move |cc| Ok(Box::new(TreeSelectDemoApp::new(cc, initial_file)))),
    )
}

/// The demo application; delegates to the coordinators and the panel manager.
struct TreeSelectDemoApp {
    state: DemoState,
}

impl TreeSelectDemoApp {
    /// Creates the app with settings restored from persistent storage and
    /// the initial data loaded (a file from the command line, or the sample).
    fn new(cc: &eframe::CreationContext, initial_file: Option<PathBuf>) -> Self {
        let config = SettingsCoordinator::load_config(cc.storage);
        let dark_mode = SettingsCoordinator::load_dark_mode(cc.storage);

        let mut state = DemoState::new(config, dark_mode);
        ApplicationCoordinator::install_callbacks(&mut state);
        match initial_file {
            Some(path) => ApplicationCoordinator::open_file(&mut state, path),
            None => ApplicationCoordinator::load_sample(&mut state),
        }

        Self { state }
    }

    fn handle_panel_interaction(&mut self, interaction: PanelInteraction) {
        match interaction {
            PanelInteraction::OpenFileRequested(path) => {
                ApplicationCoordinator::open_file(&mut self.state, path);
            }
            PanelInteraction::SampleRequested => {
                ApplicationCoordinator::load_sample(&mut self.state);
            }
            PanelInteraction::GenerateRequested => {
                ApplicationCoordinator::generate(&mut self.state);
            }
            PanelInteraction::SaveSelectionRequested(path) => {
                ApplicationCoordinator::save_selection(&mut self.state, &path);
            }
            PanelInteraction::ConfigChanged => {
                ApplicationCoordinator::apply_config(&mut self.state);
            }
            PanelInteraction::ProviderChanged => {
                ApplicationCoordinator::install_callbacks(&mut self.state);
            }
        }
    }
}

impl eframe::App for TreeSelectDemoApp {
    /// Called when the app is being shut down - ensures preferences are saved.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        SettingsCoordinator::save_config(storage, &self.state.config);
        SettingsCoordinator::save_dark_mode(storage, self.state.dark_mode);
    }

    /// Main update loop:
    /// 1. Apply the theme
    /// 2. Render all panels (the widget runs inside the central panel)
    /// 3. Handle panel interactions
    /// 4. Answer open requests raised by the widget this frame
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.set_visuals(if self.state.dark_mode {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        });

        for interaction in PanelManager::render_all_panels(ctx, &mut self.state) {
            self.handle_panel_interaction(interaction);
        }

        let pending = self.state.open_request.get().is_some();
        ApplicationCoordinator::answer_open_request(&mut self.state);
        if pending {
            ctx.request_repaint();
        }
    }
}
