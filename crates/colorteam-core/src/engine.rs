//! The review engine: loads a proposal, runs one category review, persists
//! the result and answers history and readiness queries.

use std::sync::Arc;

use crate::aggregator::{SectionAggregator, SectionOutcome};
use crate::context::ReviewContext;
use crate::criteria::{ConfigError, ReviewConfig};
use crate::evaluators::EvaluatorRegistry;
use crate::provider::ProposalSource;
use crate::readiness::ReadinessAggregator;
use crate::store::ReviewStore;
use crate::types::{
    DeficiencyEntry, Proposal, ReadinessSummary, ReviewCategory, ReviewResult, Section,
};
use crate::ReviewError;

/// Everything needed to score one review, loaded up front.
///
/// Sections are in canonical order. Splitting preparation from scoring
/// lets a host fan section scoring out and hand the outcomes back to
/// [`ReviewEngine::complete`].
#[derive(Debug, Clone)]
pub struct PreparedRun {
    pub proposal: Proposal,
    pub sections: Vec<Section>,
    pub context: ReviewContext,
    pub aggregator: SectionAggregator,
}

impl PreparedRun {
    pub fn category(&self) -> ReviewCategory {
        self.aggregator.category()
    }

    /// Score one section of this run.
    pub fn score_section(&self, index: usize) -> Option<SectionOutcome> {
        self.sections
            .get(index)
            .map(|section| self.aggregator.score_section(section, &self.proposal, &self.context))
    }
}

/// Wires configuration, evaluators, the proposal source and the store.
pub struct ReviewEngine {
    config: Arc<ReviewConfig>,
    evaluators: EvaluatorRegistry,
    source: Arc<dyn ProposalSource>,
    store: Arc<dyn ReviewStore>,
    readiness: ReadinessAggregator,
}

impl ReviewEngine {
    /// An engine with the built-in evaluators.
    pub fn new(
        config: ReviewConfig,
        source: Arc<dyn ProposalSource>,
        store: Arc<dyn ReviewStore>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            evaluators: EvaluatorRegistry::builtin(),
            source,
            store,
            readiness: ReadinessAggregator::new(),
        }
    }

    /// Replace the evaluator registry.
    pub fn with_evaluators(mut self, evaluators: EvaluatorRegistry) -> Self {
        self.evaluators = evaluators;
        self
    }

    pub fn config(&self) -> &ReviewConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn ReviewStore> {
        &self.store
    }

    /// Load the proposal, its sections and category context.
    ///
    /// Fails with `NotFound` when the proposal is unknown or has no sections,
    /// and with `Provider` when the source itself fails.
    pub fn prepare(
        &self,
        proposal_id: &str,
        category: ReviewCategory,
    ) -> Result<PreparedRun, ReviewError> {
        let evaluator = self.evaluators.get(category).ok_or_else(|| {
            ConfigError::ValidationError {
                category,
                reason: "no evaluator registered".to_string(),
            }
        })?;
        let aggregator =
            SectionAggregator::new(self.config.criterion_set(category).clone(), evaluator)?;

        let proposal = self
            .source
            .load_proposal(proposal_id)?
            .ok_or_else(|| ReviewError::NotFound(format!("proposal {} not found", proposal_id)))?;

        let mut sections = self.source.load_sections(proposal_id)?;
        if sections.is_empty() {
            return Err(ReviewError::NotFound(format!(
                "proposal {} has no sections to review",
                proposal_id
            )));
        }
        sections.sort_by(|a, b| a.canonical_cmp(b));

        let mut context = self.source.load_context(&proposal, category)?;
        context.known_section_numbers = sections
            .iter()
            .map(|s| s.section_number.clone())
            .collect();

        Ok(PreparedRun {
            proposal,
            sections,
            context,
            aggregator,
        })
    }

    /// Run one review synchronously and persist it.
    pub fn run_review(
        &self,
        proposal_id: &str,
        category: ReviewCategory,
    ) -> Result<ReviewResult, ReviewError> {
        let run = self.prepare(proposal_id, category)?;
        let outcomes = (0..run.sections.len())
            .filter_map(|index| run.score_section(index))
            .collect();
        self.complete(&run, outcomes)
    }

    /// Finalize scored outcomes (in canonical order) and persist the result.
    ///
    /// Nothing is written unless the whole result was built.
    pub fn complete(
        &self,
        run: &PreparedRun,
        outcomes: Vec<SectionOutcome>,
    ) -> Result<ReviewResult, ReviewError> {
        let result = run.aggregator.finalize(&run.proposal.id, outcomes)?;
        self.store.save(&result)?;

        tracing::info!(
            target: "colorteam::audit",
            action = %format!("review.{}", result.category),
            review_id = %result.id,
            proposal_id = %result.proposal_id,
            category = %result.category,
            verdict = %result.verdict,
            overall_score = result.overall_score,
            sections = result.sections.len(),
            "{} review for {}: {} ({:.1}%)",
            result.category.team_name(),
            result.proposal_id,
            result.verdict,
            result.overall_score * 100.0
        );

        Ok(result)
    }

    /// Stored results for a proposal, newest first, optionally one category.
    pub fn get_reviews(
        &self,
        proposal_id: &str,
        category: Option<ReviewCategory>,
    ) -> Result<Vec<ReviewResult>, ReviewError> {
        let mut results = self.store.all_for_proposal(proposal_id)?;
        if let Some(category) = category {
            results.retain(|r| r.category == category);
        }
        Ok(results)
    }

    /// Readiness across all four categories.
    pub fn summarize(&self, proposal_id: &str) -> Result<ReadinessSummary, ReviewError> {
        Ok(self.readiness.summarize(proposal_id, self.store.as_ref())?)
    }

    /// Deficiencies and weaknesses across the proposal's review history.
    pub fn list_deficiencies(&self, proposal_id: &str) -> Result<Vec<DeficiencyEntry>, ReviewError> {
        let history = self.store.all_for_proposal(proposal_id)?;
        Ok(self.readiness.list_deficiencies(&history))
    }
}

impl std::fmt::Debug for ReviewEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReviewEngine")
            .field("evaluators", &self.evaluators)
            .finish_non_exhaustive()
    }
}
