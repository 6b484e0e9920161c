//! Review persistence.
//!
//! Stores are append-only: every run adds one [`ReviewResult`] and prior
//! results are never rewritten. "Latest" means most recently saved.

mod jsonl;

pub use jsonl::JsonLinesReviewStore;

use parking_lot::RwLock;
use thiserror::Error;

use crate::types::{ReviewCategory, ReviewResult};

/// Errors raised by a review store. Never retried by the engine.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Review store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize review: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Corrupt review record at line {line}: {reason}")]
    Corrupt { line: usize, reason: String },

    #[error("Review store unavailable: {0}")]
    Unavailable(String),
}

/// Persistence for review results.
pub trait ReviewStore: Send + Sync {
    /// Append one result. Must be all-or-nothing.
    fn save(&self, result: &ReviewResult) -> Result<(), StoreError>;

    /// The most recently saved result for a proposal and category.
    fn latest_by_category(
        &self,
        proposal_id: &str,
        category: ReviewCategory,
    ) -> Result<Option<ReviewResult>, StoreError>;

    /// Every result for a proposal, newest first.
    fn all_for_proposal(&self, proposal_id: &str) -> Result<Vec<ReviewResult>, StoreError>;
}

/// A process-local store, mainly for tests and one-shot CLI runs.
#[derive(Debug, Default)]
pub struct InMemoryReviewStore {
    results: RwLock<Vec<ReviewResult>>,
}

impl InMemoryReviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.results.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.read().is_empty()
    }
}

impl ReviewStore for InMemoryReviewStore {
    fn save(&self, result: &ReviewResult) -> Result<(), StoreError> {
        self.results.write().push(result.clone());
        Ok(())
    }

    fn latest_by_category(
        &self,
        proposal_id: &str,
        category: ReviewCategory,
    ) -> Result<Option<ReviewResult>, StoreError> {
        Ok(self
            .results
            .read()
            .iter()
            .rev()
            .find(|r| r.proposal_id == proposal_id && r.category == category)
            .cloned())
    }

    fn all_for_proposal(&self, proposal_id: &str) -> Result<Vec<ReviewResult>, StoreError> {
        Ok(self
            .results
            .read()
            .iter()
            .rev()
            .filter(|r| r.proposal_id == proposal_id)
            .cloned()
            .collect())
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::review;
    use super::*;
    use crate::types::Verdict;

    #[test]
    fn test_latest_is_most_recently_saved() {
        let store = InMemoryReviewStore::new();
        store.save(&review("RV-1", "P-1", ReviewCategory::Pink, Verdict::Fail)).unwrap();
        store.save(&review("RV-2", "P-1", ReviewCategory::Pink, Verdict::Pass)).unwrap();
        store.save(&review("RV-3", "P-2", ReviewCategory::Pink, Verdict::Fail)).unwrap();

        let latest = store.latest_by_category("P-1", ReviewCategory::Pink).unwrap().unwrap();
        assert_eq!(latest.id, "RV-2");
        assert!(store.latest_by_category("P-1", ReviewCategory::Red).unwrap().is_none());
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_all_for_proposal_newest_first() {
        let store = InMemoryReviewStore::new();
        store.save(&review("RV-1", "P-1", ReviewCategory::Pink, Verdict::Fail)).unwrap();
        store.save(&review("RV-2", "P-1", ReviewCategory::Red, Verdict::Pass)).unwrap();

        let ids: Vec<String> = store
            .all_for_proposal("P-1")
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["RV-2", "RV-1"]);
        assert!(store.all_for_proposal("P-9").unwrap().is_empty());
    }
}
