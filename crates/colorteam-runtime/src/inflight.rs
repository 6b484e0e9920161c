//! Tracks review runs in progress, keyed by proposal and category.

use std::collections::HashSet;
use std::sync::Arc;

use colorteam_core::ReviewCategory;
use parking_lot::Mutex;

type RunKey = (String, ReviewCategory);

/// Set of runs currently executing.
#[derive(Debug, Clone, Default)]
pub struct InFlightRuns {
    active: Arc<Mutex<HashSet<RunKey>>>,
}

impl InFlightRuns {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim a run. `None` if the same run is already in flight.
    pub fn try_acquire(&self, proposal_id: &str, category: ReviewCategory) -> Option<RunGuard> {
        let key = (proposal_id.to_string(), category);
        if !self.active.lock().insert(key.clone()) {
            return None;
        }
        Some(RunGuard {
            active: Arc::clone(&self.active),
            key,
        })
    }

    pub fn is_active(&self, proposal_id: &str, category: ReviewCategory) -> bool {
        self.active
            .lock()
            .contains(&(proposal_id.to_string(), category))
    }

    pub fn len(&self) -> usize {
        self.active.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.lock().is_empty()
    }
}

/// Releases the run on drop, including when a run is cancelled.
#[derive(Debug)]
pub struct RunGuard {
    active: Arc<Mutex<HashSet<RunKey>>>,
    key: RunKey,
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        self.active.lock().remove(&self.key);
    }
}
