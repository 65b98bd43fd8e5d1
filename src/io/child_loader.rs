//! Asynchronous child loading.
//!
//! Expanding a lazy node hands its record to the caller's load-children
//! provider on a background thread, keeping the UI responsive. Results come
//! back through a channel tagged with the tree generation and node path they
//! were requested for; the controller drains them once per frame and decides
//! whether they are still applicable.

use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;

use tracing::debug;

use crate::callbacks::LoadChildren;
use crate::types::TreeRecord;

/// Shared count of loads still running.
///
/// Wrapped in an `Arc<Mutex<>>` so background threads can report completion.
#[derive(Debug, Default)]
pub struct LoadingState {
    pub in_flight: usize,
}

impl LoadingState {
    pub fn new() -> Self {
        Self { in_flight: 0 }
    }
}

/// A finished load, tagged with where it was requested.
pub struct LoadedChildren {
    /// Tree generation at request time.
    pub generation: u64,
    /// Path of the node the children belong to.
    pub path: String,
    pub result: anyhow::Result<Vec<TreeRecord>>,
}

/// Hook run after a result is sent, e.g. to wake the UI thread.
pub type Waker = Arc<dyn Fn() + Send + Sync>;

/// Runs load-children requests off the UI thread.
pub struct ChildLoader {
    loading_state: Arc<Mutex<LoadingState>>,
    sender: Sender<LoadedChildren>,
    receiver: Receiver<LoadedChildren>,
    waker: Option<Waker>,
}

impl ChildLoader {
    pub fn new() -> Self {
        let (sender, receiver) = channel();
        Self {
            loading_state: Arc::new(Mutex::new(LoadingState::new())),
            sender,
            receiver,
            waker: None,
        }
    }

    /// Installs a hook invoked from the worker thread after each result.
    pub fn set_waker(&mut self, waker: Waker) {
        self.waker = Some(waker);
    }

    /// Number of loads that have not reported back yet.
    pub fn in_flight(&self) -> usize {
        self.loading_state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .in_flight
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight() > 0
    }

    /// Starts loading the children of `record` in the background.
    ///
    /// # Arguments
    /// * `provider` - The caller's load-children hook
    /// * `generation` - Generation of the tree the node belongs to
    /// * `path` - Path of the node
    /// * `record` - The node's record as the caller knows it
    pub fn start(&self, provider: LoadChildren, generation: u64, path: String, record: TreeRecord) {
        self.loading_state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .in_flight += 1;

        let sender = self.sender.clone();
        let loading_state = Arc::clone(&self.loading_state);
        let waker = self.waker.clone();

        debug!(path = %path, generation, "starting child load");

        thread::spawn(move || {
            let result = provider(&record);

            // The receiver only goes away with the loader itself.
            let _ = sender.send(LoadedChildren {
                generation,
                path,
                result,
            });

            {
                let mut state = loading_state.lock().unwrap_or_else(PoisonError::into_inner);
                state.in_flight = state.in_flight.saturating_sub(1);
            }

            if let Some(wake) = waker {
                wake();
            }
        });
    }

    /// Drains every result that has arrived since the last call.
    ///
    /// Call once per frame; never blocks.
    pub fn poll(&self) -> Vec<LoadedChildren> {
        self.receiver.try_iter().collect()
    }
}

impl Default for ChildLoader {
    fn default() -> Self {
        Self::new()
    }
}
