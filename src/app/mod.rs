//! Application-level modules for the tree-select demo.
//!
//! This module contains the application coordinator, settings persistence and
//! the centralized demo state.

mod app_state;
mod application_coordinator;
mod settings_coordinator;

pub use app_state::DemoState;
pub use application_coordinator::ApplicationCoordinator;
pub use settings_coordinator::SettingsCoordinator;
