//! Pink Team evaluator
//!
//! **Focus**: compliance. Is the section present and substantive, is it
//! mapped as addressed in the compliance matrix, does it respect its page
//! limit, and are the basic format attributes there?

use crate::context::ReviewContext;
use crate::types::{Proposal, ReviewCategory, Section};

use super::{CriterionScores, Evaluator};

/// Minimum trimmed content length for a section to count as substantive.
const MIN_SUBSTANTIVE_CHARS: usize = 50;

/// Score for format compliance when the section has no words at all.
const EMPTY_FORMAT_SCORE: f64 = 0.3;

/// The Pink Team (compliance) evaluator.
pub struct PinkEvaluator;

impl PinkEvaluator {
    pub fn new() -> Self {
        Self
    }

    fn section_coverage(&self, section: &Section) -> f64 {
        if section.content.trim().chars().count() > MIN_SUBSTANTIVE_CHARS {
            1.0
        } else {
            0.0
        }
    }

    /// Share of this section's compliance rows that are addressed.
    /// `None` when the matrix has no rows for the section.
    fn instruction_compliance(&self, section: &Section, context: &ReviewContext) -> Option<f64> {
        let matched: Vec<_> = context
            .compliance_rows
            .iter()
            .filter(|row| row.section_number.as_deref() == Some(section.section_number.as_str()))
            .collect();

        if matched.is_empty() {
            return None;
        }

        let addressed = matched
            .iter()
            .filter(|row| row.compliance_status.is_addressed())
            .count();
        Some(addressed as f64 / matched.len() as f64)
    }

    /// Full credit within the limit; degrades linearly with the overrun.
    fn page_limits(&self, section: &Section) -> f64 {
        match section.page_limit {
            Some(limit) if limit > 0.0 => {
                if section.page_count <= limit {
                    1.0
                } else {
                    let over = (section.page_count - limit) / limit;
                    (1.0 - over).max(0.0)
                }
            }
            _ => 1.0,
        }
    }

    fn format_compliance(&self, section: &Section) -> f64 {
        if section.word_count > 0 {
            1.0
        } else {
            EMPTY_FORMAT_SCORE
        }
    }
}

impl Default for PinkEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator for PinkEvaluator {
    fn category(&self) -> ReviewCategory {
        ReviewCategory::Pink
    }

    fn evaluate(
        &self,
        section: &Section,
        _proposal: &Proposal,
        context: &ReviewContext,
    ) -> CriterionScores {
        let mut scores = CriterionScores::new();

        scores.insert("section_coverage".to_string(), self.section_coverage(section));

        // No matrix rows for this section: left to the neutral default.
        if let Some(score) = self.instruction_compliance(section, context) {
            scores.insert("instruction_compliance".to_string(), score);
        }

        scores.insert("page_limits".to_string(), self.page_limits(section));
        scores.insert("format_compliance".to_string(), self.format_compliance(section));

        // Attachments are checked at proposal level, not per section.
        scores.insert("required_attachments".to_string(), 1.0);

        scores
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{ComplianceRow, ComplianceStatus};

    const LONG_TEXT: &str = "Our technical approach delivers every requirement in the \
        performance work statement with a staffed, tested and measurable plan.";

    fn row(section: &str, status: ComplianceStatus) -> ComplianceRow {
        ComplianceRow {
            requirement_id: format!("L-{}", section),
            requirement_text: "Describe the approach".to_string(),
            section_number: Some(section.to_string()),
            compliance_status: status,
        }
    }

    #[test]
    fn test_substantive_section_scores_full_coverage() {
        let section = Section::new("s1", "technical", "1.1", "Approach", LONG_TEXT);
        let scores =
            PinkEvaluator::new().evaluate(&section, &Proposal::new("P-1"), &ReviewContext::new());

        assert_eq!(scores["section_coverage"], 1.0);
        assert_eq!(scores["format_compliance"], 1.0);
        assert_eq!(scores["page_limits"], 1.0);
        assert_eq!(scores["required_attachments"], 1.0);
    }

    #[test]
    fn test_stub_section_has_no_coverage() {
        let section = Section::new("s1", "technical", "1.1", "Approach", "TBD");
        let scores =
            PinkEvaluator::new().evaluate(&section, &Proposal::new("P-1"), &ReviewContext::new());
        assert_eq!(scores["section_coverage"], 0.0);

        let empty = Section::new("s2", "technical", "1.2", "Staffing", "");
        let scores =
            PinkEvaluator::new().evaluate(&empty, &Proposal::new("P-1"), &ReviewContext::new());
        assert_eq!(scores["format_compliance"], EMPTY_FORMAT_SCORE);
    }

    #[test]
    fn test_instruction_compliance_from_matrix() {
        let section = Section::new("s1", "technical", "1.1", "Approach", LONG_TEXT);
        let context = ReviewContext::new().with_compliance_rows(vec![
            row("1.1", ComplianceStatus::FullyAddressed),
            row("1.1", ComplianceStatus::PartiallyAddressed),
            row("1.1", ComplianceStatus::NotAddressed),
            row("1.1", ComplianceStatus::NotAddressed),
            row("2.0", ComplianceStatus::NotAddressed),
        ]);

        let scores = PinkEvaluator::new().evaluate(&section, &Proposal::new("P-1"), &context);
        assert_eq!(scores["instruction_compliance"], 0.5);
    }

    #[test]
    fn test_missing_matrix_leaves_criterion_unscored() {
        let section = Section::new("s1", "technical", "1.1", "Approach", LONG_TEXT);
        let scores =
            PinkEvaluator::new().evaluate(&section, &Proposal::new("P-1"), &ReviewContext::new());
        assert!(!scores.contains_key("instruction_compliance"));
    }

    #[test]
    fn test_page_limit_degrades_linearly() {
        let mut section = Section::new("s1", "technical", "1.1", "Approach", LONG_TEXT);
        section.page_limit = Some(10.0);

        section.page_count = 10.0;
        assert_eq!(PinkEvaluator::new().page_limits(&section), 1.0);

        section.page_count = 12.0;
        assert!((PinkEvaluator::new().page_limits(&section) - 0.8).abs() < 1e-9);

        section.page_count = 25.0;
        assert_eq!(PinkEvaluator::new().page_limits(&section), 0.0);
    }

    #[test]
    fn test_zero_page_limit_is_ignored() {
        let mut section = Section::new("s1", "technical", "1.1", "Approach", LONG_TEXT);
        section.page_limit = Some(0.0);
        section.page_count = 40.0;
        assert_eq!(PinkEvaluator::new().page_limits(&section), 1.0);
    }
}
