//! Category evaluators.
//!
//! Each review category has one evaluator. An evaluator inspects a single
//! section plus the proposal and category context and returns a raw score
//! in [0, 1] per criterion id it knows how to assess:
//!
//! | Category | Evaluator | Focus |
//! |----------|-----------|-------|
//! | pink | [`PinkEvaluator`] | compliance |
//! | red | [`RedEvaluator`] | responsiveness |
//! | gold | [`GoldEvaluator`] | persuasiveness |
//! | white | [`WhiteEvaluator`] | final QC |
//!
//! Criterion ids missing from the returned map are scored at
//! [`NEUTRAL_SCORE`] by the caller, so evaluators never special-case
//! criteria they cannot assess. Evaluation is deterministic.

mod gold;
mod patterns;
mod pink;
mod red;
mod white;

pub use gold::GoldEvaluator;
pub use pink::PinkEvaluator;
pub use red::RedEvaluator;
pub use white::WhiteEvaluator;

use std::collections::HashMap;
use std::sync::Arc;

use crate::context::ReviewContext;
use crate::types::{Proposal, ReviewCategory, Section};

/// Score substituted for any criterion an evaluator did not return.
pub const NEUTRAL_SCORE: f64 = 0.5;

/// Raw per-criterion scores keyed by criterion id.
pub type CriterionScores = HashMap<String, f64>;

/// Trait implemented by each category evaluator.
pub trait Evaluator: Send + Sync {
    /// The category this evaluator serves.
    fn category(&self) -> ReviewCategory;

    /// Score one section. Must not fail on missing optional context.
    fn evaluate(
        &self,
        section: &Section,
        proposal: &Proposal,
        context: &ReviewContext,
    ) -> CriterionScores;
}

/// Evaluators keyed by category, built once at startup.
#[derive(Clone)]
pub struct EvaluatorRegistry {
    evaluators: HashMap<ReviewCategory, Arc<dyn Evaluator>>,
}

impl EvaluatorRegistry {
    /// An empty registry.
    pub fn empty() -> Self {
        Self {
            evaluators: HashMap::new(),
        }
    }

    /// The four built-in evaluators.
    pub fn builtin() -> Self {
        Self::empty()
            .with(Arc::new(PinkEvaluator::new()))
            .with(Arc::new(RedEvaluator::new()))
            .with(Arc::new(GoldEvaluator::new()))
            .with(Arc::new(WhiteEvaluator::new()))
    }

    /// Register (or replace) the evaluator for its category.
    pub fn with(mut self, evaluator: Arc<dyn Evaluator>) -> Self {
        self.evaluators.insert(evaluator.category(), evaluator);
        self
    }

    pub fn get(&self, category: ReviewCategory) -> Option<Arc<dyn Evaluator>> {
        self.evaluators.get(&category).cloned()
    }
}

impl Default for EvaluatorRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl std::fmt::Debug for EvaluatorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut categories: Vec<_> = self.evaluators.keys().collect();
        categories.sort();
        f.debug_struct("EvaluatorRegistry")
            .field("categories", &categories)
            .finish()
    }
}

/// `found / saturation`, capped at 1.0.
pub(crate) fn saturate(found: usize, saturation: f64) -> f64 {
    (found as f64 / saturation).min(1.0)
}

/// Count how many indicator phrases occur in already-lowercased text.
pub(crate) fn count_indicators(lower_content: &str, indicators: &[&str]) -> usize {
    indicators
        .iter()
        .filter(|indicator| lower_content.contains(*indicator))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_registry_covers_all_categories() {
        let registry = EvaluatorRegistry::builtin();
        for category in ReviewCategory::ALL {
            let evaluator = registry.get(category).expect("evaluator registered");
            assert_eq!(evaluator.category(), category);
        }
    }

    #[test]
    fn test_saturate_caps_at_one() {
        assert_eq!(saturate(0, 3.0), 0.0);
        assert!((saturate(1, 3.0) - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(saturate(3, 3.0), 1.0);
        assert_eq!(saturate(7, 2.0), 1.0);
    }

    #[test]
    fn test_count_indicators() {
        let text = "our proven approach demonstrated exceptional results";
        assert_eq!(count_indicators(text, &["proven", "demonstrated", "unique"]), 2);
    }

    #[test]
    fn test_custom_evaluator_replaces_builtin() {
        struct FixedPink;
        impl Evaluator for FixedPink {
            fn category(&self) -> ReviewCategory {
                ReviewCategory::Pink
            }
            fn evaluate(&self, _: &Section, _: &Proposal, _: &ReviewContext) -> CriterionScores {
                CriterionScores::from([("page_limits".to_string(), 0.25)])
            }
        }

        let registry = EvaluatorRegistry::builtin().with(Arc::new(FixedPink));
        let section = Section::new("s1", "technical", "1", "Approach", "text");
        let scores = registry.get(ReviewCategory::Pink).unwrap().evaluate(
            &section,
            &Proposal::new("P-1"),
            &ReviewContext::new(),
        );
        assert_eq!(scores.len(), 1);
        assert_eq!(scores["page_limits"], 0.25);
    }
}
