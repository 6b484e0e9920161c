//! # colorteam-core
//!
//! Deterministic weighted review engine for Pink/Red/Gold/White proposal
//! reviews ("color team" reviews).
//!
//! A review scores every section of a proposal against the weighted
//! criteria of one category, classifies each criterion result into
//! strengths, weaknesses and deficiencies, and reduces the sections into
//! one overall score and a PASS/FAIL verdict. Readiness for submission is
//! derived from the latest review of each category.
//!
//! ## Key Guarantees
//!
//! 1. **Deterministic**: same sections, context and criteria give the same scores
//! 2. **Neutral on unknowns**: a criterion an evaluator cannot assess scores 0.5
//! 3. **Append-only**: every run stores a new result; nothing is rewritten
//! 4. **All-or-nothing**: a failed run persists nothing
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use colorteam_core::{
//!     InMemoryProposalSource, InMemoryReviewStore, ReviewCategory, ReviewConfig, ReviewEngine,
//! };
//!
//! let source = InMemoryProposalSource::from_yaml_file("proposal.yaml")?;
//! let engine = ReviewEngine::new(
//!     ReviewConfig::from_file("review_config.yaml")?,
//!     Arc::new(source),
//!     Arc::new(InMemoryReviewStore::new()),
//! );
//!
//! let result = engine.run_review("PROP-001", ReviewCategory::Pink)?;
//! println!("{} {:.3} {}", result.category, result.overall_score, result.verdict);
//! ```

pub mod aggregator;
pub mod context;
pub mod criteria;
pub mod engine;
pub mod evaluators;
pub mod findings;
pub mod provider;
pub mod readiness;
pub mod recommendations;
pub mod scoring;
pub mod store;
pub mod types;

// Re-export main types at crate root
pub use aggregator::{new_review_id, SectionAggregator, SectionOutcome};
pub use context::{
    AlertStatus, ComplianceRow, ComplianceStatus, ReviewContext, SecurityAlert, WinTheme,
};
pub use criteria::{default_criterion_set, ConfigError, Criterion, CriterionSet, ReviewConfig, Thresholds};
pub use engine::{PreparedRun, ReviewEngine};
pub use evaluators::{
    CriterionScores, Evaluator, EvaluatorRegistry, GoldEvaluator, PinkEvaluator, RedEvaluator,
    WhiteEvaluator, NEUTRAL_SCORE,
};
pub use findings::{Finding, FindingKind, Findings, FindingsClassifier};
pub use provider::{InMemoryProposalSource, ProposalRecord, ProposalSource, ProviderError};
pub use readiness::ReadinessAggregator;
pub use recommendations::RecommendationGenerator;
pub use scoring::{classify, WeightedScorer};
pub use store::{InMemoryReviewStore, JsonLinesReviewStore, ReviewStore, StoreError};
pub use types::{
    CategoryStatus, CriterionScore, DeficiencyEntry, FindingCounts, Proposal, Readiness,
    ReadinessSummary, Recommendation, ReviewCategory, ReviewResult, Section, SectionScoreResult,
    SectionStatus, Severity, TrafficLight, Verdict,
};

use thiserror::Error;

/// Errors that can occur during a review
#[derive(Error, Debug)]
pub enum ReviewError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Proposal source error: {0}")]
    Provider(#[from] ProviderError),
}

/// Score a set of sections against one criterion set without a store.
///
/// Uses the built-in evaluator for the set's category. Sections are put in
/// canonical order.
pub fn review_sections(
    criteria: &CriterionSet,
    proposal: &Proposal,
    sections: &[Section],
    context: &ReviewContext,
) -> Result<ReviewResult, ReviewError> {
    let evaluator = EvaluatorRegistry::builtin()
        .get(criteria.category)
        .ok_or_else(|| ConfigError::UnknownCategory(criteria.category.to_string()))?;
    let aggregator = SectionAggregator::new(criteria.clone(), evaluator)?;
    aggregator.aggregate(proposal, sections, context)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DRAFT: &str = "CUI // SP-PROPIN. Our technical approach delivers every requirement \
        in the performance work statement with a staffed, tested and measurable plan.";

    #[test]
    fn test_basic_review() {
        let sections = vec![
            Section::new("s1", "technical", "1", "Technical Approach", DRAFT),
            Section::new("s2", "technical", "2", "Staffing", ""),
        ];

        let result = review_sections(
            &default_criterion_set(ReviewCategory::Pink),
            &Proposal::new("PROP-001"),
            &sections,
            &ReviewContext::new(),
        )
        .unwrap();

        assert_eq!(result.category, ReviewCategory::Pink);
        assert_eq!(result.sections.len(), 2);
        assert!(result.sections[0].section_score > result.sections[1].section_score);
        assert!(!result.deficiencies.is_empty());
        assert_eq!(result.verdict, Verdict::Fail);
    }

    #[test]
    fn test_review_is_deterministic() {
        let sections = vec![Section::new("s1", "technical", "1", "Approach", DRAFT)];
        let set = default_criterion_set(ReviewCategory::Red);
        let proposal = Proposal::new("PROP-001");
        let context = ReviewContext::new();

        let first = review_sections(&set, &proposal, &sections, &context).unwrap();
        let second = review_sections(&set, &proposal, &sections, &context).unwrap();

        assert_eq!(first.overall_score, second.overall_score);
        assert_eq!(first.verdict, second.verdict);
        assert_eq!(first.sections, second.sections);
        assert_ne!(first.id, second.id);
    }
}
