//! Red Team evaluator
//!
//! **Focus**: responsiveness. Does the section address the Section M
//! evaluation factors, articulate strengths, mitigate weaknesses, back its
//! claims with evidence and make its discriminators clear?

use crate::context::ReviewContext;
use crate::types::{Proposal, ReviewCategory, Section};

use super::patterns::{
    count_evidence, DIFFERENTIATION_INDICATORS, MITIGATION_INDICATORS, STRENGTH_INDICATORS,
};
use super::{count_indicators, saturate, CriterionScores, Evaluator};

/// Leading characters of a factor that must appear in the section text.
const FACTOR_PREFIX_CHARS: usize = 30;

const STRENGTH_SATURATION: f64 = 3.0;
const MITIGATION_SATURATION: f64 = 2.0;
const EVIDENCE_SATURATION: f64 = 3.0;
const DIFFERENTIATION_SATURATION: f64 = 2.0;

/// The Red Team (responsiveness) evaluator.
pub struct RedEvaluator;

impl RedEvaluator {
    pub fn new() -> Self {
        Self
    }

    /// Share of evaluation factors whose leading text appears in the section.
    /// `None` without parsed factors.
    fn eval_factor_coverage(&self, lower_content: &str, context: &ReviewContext) -> Option<f64> {
        let factors: Vec<&String> = context
            .evaluation_factors
            .iter()
            .filter(|f| !f.trim().is_empty())
            .collect();

        if factors.is_empty() {
            return None;
        }

        let addressed = factors
            .iter()
            .filter(|factor| {
                let prefix: String = factor
                    .trim()
                    .to_lowercase()
                    .chars()
                    .take(FACTOR_PREFIX_CHARS)
                    .collect();
                lower_content.contains(&prefix)
            })
            .count();

        Some(addressed as f64 / factors.len() as f64)
    }
}

impl Default for RedEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator for RedEvaluator {
    fn category(&self) -> ReviewCategory {
        ReviewCategory::Red
    }

    fn evaluate(
        &self,
        section: &Section,
        _proposal: &Proposal,
        context: &ReviewContext,
    ) -> CriterionScores {
        let mut scores = CriterionScores::new();
        let lower = section.content.to_lowercase();

        if let Some(score) = self.eval_factor_coverage(&lower, context) {
            scores.insert("eval_factor_coverage".to_string(), score);
        }

        scores.insert(
            "strengths_articulated".to_string(),
            saturate(count_indicators(&lower, STRENGTH_INDICATORS), STRENGTH_SATURATION),
        );
        scores.insert(
            "weaknesses_mitigated".to_string(),
            saturate(count_indicators(&lower, MITIGATION_INDICATORS), MITIGATION_SATURATION),
        );
        // Metric tokens like SLA/KPI are case-sensitive, so match on the raw content.
        scores.insert(
            "proof_points".to_string(),
            saturate(count_evidence(&section.content), EVIDENCE_SATURATION),
        );
        scores.insert(
            "discriminators_clear".to_string(),
            saturate(
                count_indicators(&lower, DIFFERENTIATION_INDICATORS),
                DIFFERENTIATION_SATURATION,
            ),
        );

        scores
    }
}
