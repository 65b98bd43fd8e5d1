//! UI panel rendering for the demo application:
//! - Header panel (data source controls, theme toggle)
//! - Config panel (live widget configuration and generator settings)
//! - Event log (callback emissions)
//! - Status bar (widget state summary)
//! - Panel manager (panel orchestration and layout)

pub mod config_panel;
pub mod event_log;
pub mod header;
pub mod panel_manager;
pub mod status_bar;
