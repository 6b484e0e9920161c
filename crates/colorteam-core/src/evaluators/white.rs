//! White Team evaluator
//!
//! **Focus**: final quality check before submission.
//!
//! | Criterion | Check |
//! |-----------|-------|
//! | `cross_references` | "Section X.Y" references resolve to known sections |
//! | `acronyms` | acronyms used are in the registry |
//! | `consistency` | no mixed "shall"/"will" voice |
//! | `classification_markings` | marking present in the text |
//! | `cag_clearance` | no open or quarantined alerts (any forces 0) |
//! | `file_packaging` | only a final section earns full credit |

use std::collections::BTreeSet;

use crate::context::ReviewContext;
use crate::types::{Proposal, ReviewCategory, Section, SectionStatus};

use super::patterns::{
    ACRONYM_PATTERN, CROSS_REFERENCE_PATTERN, DEFAULT_CLASSIFICATION_MARKING, NON_ACRONYMS,
};
use super::{CriterionScores, Evaluator};

/// Cross-reference score when references exist but cannot be resolved.
const UNVERIFIED_XREF_SCORE: f64 = 0.8;

/// Consistency score when "shall" and "will" are mixed.
const MIXED_VOICE_SCORE: f64 = 0.7;

/// Packaging credit for sections not yet final.
const NOT_FINAL_PACKAGING_SCORE: f64 = 0.5;

/// The White Team (final QC) evaluator.
pub struct WhiteEvaluator;

impl WhiteEvaluator {
    pub fn new() -> Self {
        Self
    }

    fn cross_references(&self, content: &str, context: &ReviewContext) -> f64 {
        let references: Vec<&str> = CROSS_REFERENCE_PATTERN
            .captures_iter(content)
            .filter_map(|c| c.get(1))
            .map(|m| m.as_str())
            .collect();

        if references.is_empty() {
            return 1.0;
        }

        if context.known_section_numbers.is_empty() {
            return UNVERIFIED_XREF_SCORE;
        }

        let resolved = references
            .iter()
            .filter(|r| context.known_section_numbers.contains(**r))
            .count();
        resolved as f64 / references.len() as f64
    }

    /// `None` when acronyms are used but no registry is available.
    fn acronyms(&self, content: &str, context: &ReviewContext) -> Option<f64> {
        let found: BTreeSet<&str> = ACRONYM_PATTERN
            .find_iter(content)
            .map(|m| m.as_str())
            .filter(|a| !NON_ACRONYMS.contains(a))
            .collect();

        if found.is_empty() {
            return Some(1.0);
        }

        let registry = context.acronym_registry.as_ref()?;
        let expanded = found.iter().filter(|a| registry.contains(**a)).count();
        Some(expanded as f64 / found.len() as f64)
    }

    fn consistency(&self, lower_content: &str) -> f64 {
        if lower_content.contains("shall") && lower_content.contains("will") {
            MIXED_VOICE_SCORE
        } else {
            1.0
        }
    }

    fn classification_markings(&self, lower_content: &str, proposal: &Proposal) -> f64 {
        let marking = proposal
            .classification
            .as_deref()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(DEFAULT_CLASSIFICATION_MARKING)
            .to_lowercase();

        if lower_content.contains(&marking) || lower_content.contains("cui") {
            1.0
        } else {
            0.0
        }
    }

    fn file_packaging(&self, section: &Section) -> f64 {
        if section.status == SectionStatus::Final {
            1.0
        } else {
            NOT_FINAL_PACKAGING_SCORE
        }
    }
}

impl Default for WhiteEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator for WhiteEvaluator {
    fn category(&self) -> ReviewCategory {
        ReviewCategory::White
    }

    fn evaluate(
        &self,
        section: &Section,
        proposal: &Proposal,
        context: &ReviewContext,
    ) -> CriterionScores {
        let mut scores = CriterionScores::new();
        let content = section.content.as_str();
        let lower = content.to_lowercase();

        scores.insert(
            "cross_references".to_string(),
            self.cross_references(content, context),
        );

        if let Some(score) = self.acronyms(content, context) {
            scores.insert("acronyms".to_string(), score);
        }

        scores.insert("consistency".to_string(), self.consistency(&lower));
        scores.insert(
            "classification_markings".to_string(),
            self.classification_markings(&lower, proposal),
        );

        let cag_clearance = if context.has_unresolved_alerts() { 0.0 } else { 1.0 };
        scores.insert("cag_clearance".to_string(), cag_clearance);

        scores.insert("file_packaging".to_string(), self.file_packaging(section));

        scores
    }
}
