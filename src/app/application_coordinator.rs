//! Application-level coordination and workflow management.
//!
//! Handles the demo's high-level operations: choosing a data source, applying
//! edited configuration, wiring widget callbacks into the event log and
//! answering the widget's requests when the demo owns the dropdown flag.

use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::thread;
use std::time::Duration;

use rand::Rng;
use rtreeselect::io::{generate, generate_children, load_records, save_records, GeneratorParams};
use rtreeselect::{Callbacks, OpenControl, SelectAllState, TreeRecord};
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::app::app_state::{DataSource, DemoState, EventLog};

/// Record flag that makes the simulated provider fail.
const FAIL_KEY: &str = "fail";

/// Coordinates application-level operations and workflows.
pub struct ApplicationCoordinator;

impl ApplicationCoordinator {
    /// Loads a record file into the widget, or reports why it could not.
    pub fn open_file(state: &mut DemoState, path: PathBuf) {
        match load_records(&path) {
            Ok(records) => {
                info!(path = %path.display(), roots = records.len(), "data file loaded");
                state.load_records(records, DataSource::File(path));
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "data file load failed");
                state.error_message = Some(format!("Error loading data: {e:#}"));
            }
        }
    }

    pub fn load_sample(state: &mut DemoState) {
        state.load_records(sample_records(), DataSource::Sample);
    }

    /// Generates a fresh tree from the current generator settings, advancing
    /// the seed so repeated requests differ.
    pub fn generate(state: &mut DemoState) {
        let params = state.generator;
        let records = generate(&params);
        info!(seed = params.seed, roots = records.len(), "generated data");
        state.load_records(records, DataSource::Generated { seed: params.seed });
        state.generator.seed = params.seed.wrapping_add(1);
    }

    /// Writes the current selection to `path`.
    pub fn save_selection(state: &mut DemoState, path: &Path) {
        let selected = state.widget.controller().snapshot().selected;
        match save_records(path, &selected) {
            Ok(()) => {
                state
                    .event_log
                    .push(format!("saved {} selected records to {}", selected.len(), path.display()));
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "saving selection failed");
                state.error_message = Some(format!("Error saving selection: {e:#}"));
            }
        }
    }

    /// Pushes the side panel's configuration into the widget.
    pub fn apply_config(state: &mut DemoState) {
        if state.widget.controller().config() != &state.config {
            state.widget.controller_mut().set_config(state.config.clone());
        }
    }

    /// Rebuilds the widget's callback table from the current demo settings.
    pub fn install_callbacks(state: &mut DemoState) {
        let callbacks = build_callbacks(
            &state.event_log,
            Rc::clone(&state.open_request),
            state.generator,
            state.load_delay,
        );
        state.widget.controller_mut().set_callbacks(callbacks);
    }

    /// Answers an open/close request raised during the last frame.
    ///
    /// Only meaningful while the demo owns the dropdown flag; uncontrolled
    /// widgets never wait for an answer.
    pub fn answer_open_request(state: &mut DemoState) {
        let Some(open) = state.open_request.take() else {
            return;
        };
        if state.config.open == OpenControl::Controlled {
            state.widget.controller_mut().set_open(open);
        }
    }
}

fn describe_state(state: Option<SelectAllState>) -> &'static str {
    match state {
        Some(SelectAllState::Selected) => "selected",
        Some(SelectAllState::Partial) => "partial",
        Some(SelectAllState::Unselected) => "unselected",
        None => "n/a",
    }
}

/// Builds callbacks that log every emission and serve lazy children from the
/// generator after `delay`.
pub fn build_callbacks(
    log: &EventLog,
    open_request: Rc<std::cell::Cell<Option<bool>>>,
    params: GeneratorParams,
    delay: Duration,
) -> Callbacks {
    let change_log = log.clone();
    let toggle_log = log.clone();
    let clear_log = log.clone();
    let select_all_log = log.clone();
    let dropdown_log = log.clone();
    let focus_log = log.clone();
    let blur_log = log.clone();
    let last_item_log = log.clone();

    Callbacks::new()
        .on_node_change(move |node, snapshot| {
            change_log.push(format!(
                "node change: {} -> {} ({} selected)",
                node.label,
                if node.selected { "selected" } else { "unselected" },
                snapshot.selected.len()
            ));
        })
        .on_node_toggle(move |node, _snapshot| {
            toggle_log.push(format!(
                "node toggle: {} {}",
                node.label,
                if node.expanded { "expanded" } else { "collapsed" }
            ));
        })
        .on_clear_all(move |snapshot, state| {
            clear_log.push(format!(
                "clear all: {} remain selected, select-all {}",
                snapshot.selected.len(),
                describe_state(state)
            ));
        })
        .on_select_all_change(move |snapshot, state| {
            select_all_log.push(format!(
                "select all: {} ({} selected)",
                describe_state(Some(state)),
                snapshot.selected.len()
            ));
        })
        .on_dropdown_toggle(move |open| {
            dropdown_log.push(format!("dropdown {}", if open { "open" } else { "close" }));
            open_request.set(Some(open));
        })
        .on_focus(move || focus_log.push("focus".to_string()))
        .on_blur(move || blur_log.push("blur".to_string()))
        .on_last_item_reached(move |search, displayed| {
            last_item_log.push(format!(
                "last item reached: search '{}', {} rows",
                search,
                displayed.len()
            ));
        })
        .load_children(move |parent| simulated_children(parent, &params, delay))
}

/// Simulated remote provider: waits, then generates children.
fn simulated_children(
    parent: &TreeRecord,
    params: &GeneratorParams,
    delay: Duration,
) -> anyhow::Result<Vec<TreeRecord>> {
    thread::sleep(delay);
    if parent.extra.get(FAIL_KEY) == Some(&Value::Bool(true)) {
        anyhow::bail!("{} is unreachable", parent.label);
    }
    let mut rng = rand::thread_rng();
    let mut children = generate_children(parent, params, &mut rng);
    // Occasionally an empty branch, to show a lazy node resolving to a leaf.
    if rng.gen_bool(0.1) {
        children.clear();
    }
    Ok(children)
}

/// A small hand-written tree exercising every node flag.
pub fn sample_records() -> Vec<TreeRecord> {
    let mut unreachable = TreeRecord::new("Unreachable mirror").lazy(true);
    unreachable.extra.insert(FAIL_KEY.to_string(), json!(true));

    vec![
        TreeRecord::new("Fruits").expanded(true).with_children(vec![
            TreeRecord::new("Apple"),
            TreeRecord::new("Banana").selected(true),
            TreeRecord::new("Citrus").with_children(vec![
                TreeRecord::new("Lemon"),
                TreeRecord::new("Lime"),
                TreeRecord::new("Grapefruit").disabled(true),
            ]),
        ]),
        TreeRecord::new("Vegetables").with_children(vec![
            TreeRecord::new("Carrot"),
            TreeRecord::new("Potato"),
            TreeRecord::new("Leek").disabled(true).selected(true),
        ]),
        TreeRecord::new("Remote catalog").lazy(true),
        unreachable,
        TreeRecord::new("Grains"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rtreeselect::{TreeSelectConfig, WidgetEvent};

    fn demo_state() -> DemoState {
        let mut state = DemoState::new(TreeSelectConfig::default(), true);
        ApplicationCoordinator::load_sample(&mut state);
        ApplicationCoordinator::install_callbacks(&mut state);
        state
    }

    #[test]
    fn test_sample_contains_every_flag() {
        let records = sample_records();
        assert!(records.iter().any(|r| r.lazy));
        assert!(records.iter().any(|r| r.expanded));
        assert!(records
            .iter()
            .flat_map(|r| r.children.iter())
            .any(|r| r.disabled && r.selected));
    }

    #[test]
    fn test_callbacks_write_event_log() {
        let mut state = demo_state();
        state.widget.controller_mut().dispatch(WidgetEvent::FieldClick);

        let entries = state.event_log.entries();
        assert!(entries.contains(&"focus".to_string()));
        assert!(entries.contains(&"dropdown open".to_string()));
    }

    #[test]
    fn test_controlled_open_waits_for_answer() {
        let mut state = demo_state();
        state.config.open = OpenControl::Controlled;
        ApplicationCoordinator::apply_config(&mut state);

        state.widget.controller_mut().dispatch(WidgetEvent::FieldClick);
        assert!(!state.widget.controller().is_open());

        ApplicationCoordinator::answer_open_request(&mut state);
        assert!(state.widget.controller().is_open());
        assert_eq!(state.open_request.get(), None);
    }

    #[test]
    fn test_generate_advances_seed() {
        let mut state = demo_state();
        let seed = state.generator.seed;
        ApplicationCoordinator::generate(&mut state);

        assert_eq!(state.source, DataSource::Generated { seed });
        assert_eq!(state.generator.seed, seed + 1);
        assert!(!state.widget.controller().nodes().is_empty());
    }

    #[test]
    fn test_open_missing_file_reports_error() {
        let mut state = demo_state();
        ApplicationCoordinator::open_file(&mut state, PathBuf::from("/nonexistent/tree.json"));

        assert_eq!(state.source, DataSource::Sample);
        assert!(state
            .error_message
            .as_deref()
            .is_some_and(|m| m.starts_with("Error loading data")));
    }

    #[test]
    fn test_simulated_provider_failure() {
        let params = GeneratorParams::default();
        let mut record = TreeRecord::new("x").lazy(true);
        record.extra.insert(FAIL_KEY.to_string(), json!(true));
        assert!(simulated_children(&record, &params, Duration::ZERO).is_err());

        let ok = simulated_children(&TreeRecord::new("y"), &params, Duration::ZERO);
        assert!(ok.is_ok());
    }
}
