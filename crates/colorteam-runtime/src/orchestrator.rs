//! Runtime orchestrator for parallel section scoring.
//!
//! The orchestrator wraps a [`ReviewEngine`] and implements:
//! - Fan-out of section scoring onto blocking workers, bounded by
//!   `max_parallel_sections`
//! - Deterministic fan-in in canonical section order
//! - An optional deadline around loading and scoring
//! - Rejection of overlapping identical runs unless allowed
//!
//! The deadline does not cover persistence: once every section is scored
//! the result is always written, so a run either stores one complete
//! result or nothing.

use std::sync::Arc;

use futures::stream::{self, StreamExt, TryStreamExt};
use tokio::task;

use colorteam_core::{
    DeficiencyEntry, PreparedRun, ReadinessSummary, ReviewCategory, ReviewEngine, ReviewResult,
    SectionOutcome,
};

use crate::config::RuntimeConfig;
use crate::inflight::InFlightRuns;
use crate::RuntimeError;

/// Runs reviews on tokio with parallel section scoring.
pub struct ReviewOrchestrator {
    engine: Arc<ReviewEngine>,
    config: RuntimeConfig,
    in_flight: InFlightRuns,
}

impl ReviewOrchestrator {
    pub fn new(engine: Arc<ReviewEngine>, config: RuntimeConfig) -> Result<Self, RuntimeError> {
        config.validate()?;
        Ok(Self {
            engine,
            config,
            in_flight: InFlightRuns::new(),
        })
    }

    pub fn engine(&self) -> &Arc<ReviewEngine> {
        &self.engine
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn in_flight(&self) -> &InFlightRuns {
        &self.in_flight
    }

    /// Run one review.
    ///
    /// # Execution Flow
    /// 1. Claim the run (unless concurrent runs are allowed)
    /// 2. Load the proposal, sections and context
    /// 3. Fan-out: score sections on blocking workers
    /// 4. Fan-in: merge outcomes in canonical order
    /// 5. Aggregate and persist
    pub async fn run_review(
        &self,
        proposal_id: &str,
        category: ReviewCategory,
    ) -> Result<ReviewResult, RuntimeError> {
        let _guard = if self.config.allow_concurrent_runs {
            None
        } else {
            let guard = self
                .in_flight
                .try_acquire(proposal_id, category)
                .ok_or_else(|| RuntimeError::RunInProgress {
                    proposal: proposal_id.to_string(),
                    category,
                })?;
            Some(guard)
        };

        let scoring = self.prepare_and_score(proposal_id, category);
        let (run, outcomes) = match self.config.run_deadline {
            Some(deadline) => tokio::time::timeout(deadline, scoring).await.map_err(|_| {
                tracing::warn!(
                    proposal_id = %proposal_id,
                    category = %category,
                    deadline = ?deadline,
                    "Review run exceeded its deadline"
                );
                RuntimeError::DeadlineExceeded(deadline)
            })??,
            None => scoring.await?,
        };

        let engine = Arc::clone(&self.engine);
        let result = task::spawn_blocking(move || engine.complete(&run, outcomes))
            .await
            .map_err(|e| RuntimeError::Worker(e.to_string()))??;

        Ok(result)
    }

    /// Run all four categories concurrently. Results are in pipeline order.
    pub async fn run_all(
        &self,
        proposal_id: &str,
    ) -> Vec<(ReviewCategory, Result<ReviewResult, RuntimeError>)> {
        let runs = ReviewCategory::ALL.into_iter().map(|category| async move {
            (category, self.run_review(proposal_id, category).await)
        });
        futures::future::join_all(runs).await
    }

    async fn prepare_and_score(
        &self,
        proposal_id: &str,
        category: ReviewCategory,
    ) -> Result<(Arc<PreparedRun>, Vec<SectionOutcome>), RuntimeError> {
        let engine = Arc::clone(&self.engine);
        let id = proposal_id.to_string();
        let run = task::spawn_blocking(move || engine.prepare(&id, category))
            .await
            .map_err(|e| RuntimeError::Worker(e.to_string()))??;
        let run = Arc::new(run);

        tracing::debug!(
            proposal_id = %proposal_id,
            category = %category,
            sections = run.sections.len(),
            parallelism = self.config.max_parallel_sections,
            "Scoring sections"
        );

        // `buffered` yields in submission order, which is canonical order.
        let outcomes: Vec<SectionOutcome> = stream::iter(0..run.sections.len())
            .map(|index| {
                let run = Arc::clone(&run);
                async move {
                    task::spawn_blocking(move || run.score_section(index))
                        .await
                        .map_err(|e| RuntimeError::Worker(e.to_string()))?
                        .ok_or_else(|| {
                            RuntimeError::Worker(format!("section index {} out of range", index))
                        })
                }
            })
            .buffered(self.config.max_parallel_sections)
            .try_collect()
            .await?;

        Ok((run, outcomes))
    }

    /// Stored results for a proposal, newest first.
    pub async fn get_reviews(
        &self,
        proposal_id: &str,
        category: Option<ReviewCategory>,
    ) -> Result<Vec<ReviewResult>, RuntimeError> {
        let engine = Arc::clone(&self.engine);
        let id = proposal_id.to_string();
        Ok(task::spawn_blocking(move || engine.get_reviews(&id, category))
            .await
            .map_err(|e| RuntimeError::Worker(e.to_string()))??)
    }

    /// Readiness across all four categories.
    pub async fn summarize(&self, proposal_id: &str) -> Result<ReadinessSummary, RuntimeError> {
        let engine = Arc::clone(&self.engine);
        let id = proposal_id.to_string();
        Ok(task::spawn_blocking(move || engine.summarize(&id))
            .await
            .map_err(|e| RuntimeError::Worker(e.to_string()))??)
    }

    /// Deficiencies and weaknesses across the review history.
    pub async fn list_deficiencies(
        &self,
        proposal_id: &str,
    ) -> Result<Vec<DeficiencyEntry>, RuntimeError> {
        let engine = Arc::clone(&self.engine);
        let id = proposal_id.to_string();
        Ok(task::spawn_blocking(move || engine.list_deficiencies(&id))
            .await
            .map_err(|e| RuntimeError::Worker(e.to_string()))??)
    }
}
