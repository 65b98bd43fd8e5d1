//! Centralized state of the demo application.
//!
//! The widget owns the tree-select state; everything else here is demo
//! scaffolding around it: the editable configuration, where the data came
//! from, and the callback event log.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use rtreeselect::io::GeneratorParams;
use rtreeselect::{TreeRecord, TreeSelectConfig, TreeSelectController, TreeSelectWidget};

/// Oldest entries are dropped past this many.
const MAX_LOG_ENTRIES: usize = 200;

/// Default latency of the simulated children provider.
pub const DEFAULT_LOAD_DELAY: Duration = Duration::from_millis(600);

/// Where the widget's current records came from.
#[derive(Debug, Clone, PartialEq)]
pub enum DataSource {
    Sample,
    Generated { seed: u64 },
    File(PathBuf),
}

impl DataSource {
    pub fn describe(&self) -> String {
        match self {
            DataSource::Sample => "Built-in sample".to_string(),
            DataSource::Generated { seed } => format!("Generated (seed {seed})"),
            DataSource::File(path) => path.display().to_string(),
        }
    }
}

/// Shared, bounded log of callback invocations.
///
/// Callbacks run synchronously inside the widget on the UI thread, so a
/// single-threaded `Rc<RefCell<..>>` is enough.
#[derive(Clone, Default)]
pub struct EventLog {
    entries: Rc<RefCell<VecDeque<String>>>,
}

impl EventLog {
    pub fn push(&self, entry: String) {
        let mut entries = self.entries.borrow_mut();
        if entries.len() == MAX_LOG_ENTRIES {
            entries.pop_front();
        }
        entries.push_back(entry);
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries.borrow().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}

/// Main demo state.
pub struct DemoState {
    // ===== Widget =====
    /// The tree-select widget under demonstration
    pub widget: TreeSelectWidget,

    // ===== Editable Settings =====
    /// Configuration being edited in the side panel; applied on change
    pub config: TreeSelectConfig,

    /// Shape of generated data and of simulated lazy loads
    pub generator: GeneratorParams,

    /// Latency of the simulated children provider
    pub load_delay: Duration,

    // ===== Callback Plumbing =====
    pub event_log: EventLog,

    /// Latest open/close request from the widget while the caller owns the
    /// dropdown flag
    pub open_request: Rc<Cell<Option<bool>>>,

    // ===== Top-Level State =====
    pub source: DataSource,

    /// Current error message to display (if any)
    pub error_message: Option<String>,

    pub dark_mode: bool,
}

impl DemoState {
    pub fn new(config: TreeSelectConfig, dark_mode: bool) -> Self {
        let controller = TreeSelectController::new(Vec::new(), config.clone());
        Self {
            widget: TreeSelectWidget::new("demo_tree_select", controller),
            config,
            generator: GeneratorParams {
                lazy_ratio: 0.3,
                ..Default::default()
            },
            load_delay: DEFAULT_LOAD_DELAY,
            event_log: EventLog::default(),
            open_request: Rc::new(Cell::new(None)),
            source: DataSource::Sample,
            error_message: None,
            dark_mode,
        }
    }

    /// Replaces the widget's records and remembers their origin.
    pub fn load_records(&mut self, records: Vec<TreeRecord>, source: DataSource) {
        self.widget.controller_mut().set_data(records);
        self.source = source;
        self.error_message = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_log_is_bounded() {
        let log = EventLog::default();
        for i in 0..MAX_LOG_ENTRIES + 5 {
            log.push(format!("event {i}"));
        }
        let entries = log.entries();
        assert_eq!(entries.len(), MAX_LOG_ENTRIES);
        assert_eq!(entries[0], "event 5");
    }

    #[test]
    fn test_event_log_clones_share_entries() {
        let log = EventLog::default();
        let sink = log.clone();
        sink.push("focus".to_string());
        assert_eq!(log.len(), 1);
        log.clear();
        assert_eq!(sink.len(), 0);
    }

    #[test]
    fn test_load_records_replaces_data() {
        let mut state = DemoState::new(TreeSelectConfig::default(), true);
        state.error_message = Some("stale".to_string());
        state.load_records(vec![TreeRecord::new("a")], DataSource::Generated { seed: 3 });

        assert_eq!(state.widget.controller().nodes().len(), 1);
        assert_eq!(state.source.describe(), "Generated (seed 3)");
        assert!(state.error_message.is_none());
    }
}
