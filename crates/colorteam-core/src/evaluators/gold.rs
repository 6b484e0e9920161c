//! Gold Team evaluator
//!
//! **Focus**: persuasiveness. Win theme integration, customer-centric
//! language, narrative quality and graphics support, with a dedicated
//! check for the executive summary.

use crate::context::{ReviewContext, WinTheme};
use crate::types::{Proposal, ReviewCategory, Section};

use super::patterns::{count_graphics, CUSTOMER_INDICATORS, NARRATIVE_INDICATORS};
use super::{count_indicators, saturate, CriterionScores, Evaluator};

/// Theme words shorter than this are too generic to signal a theme.
const MIN_THEME_WORD_CHARS: usize = 6;

/// Only the first few significant words of a theme are considered.
const MAX_THEME_WORDS: usize = 5;

/// Significant theme words that must appear for a theme to count as present.
const THEME_WORD_HITS: usize = 2;

const CUSTOMER_SATURATION: f64 = 3.0;
const NARRATIVE_SATURATION: f64 = 3.0;
const GRAPHICS_SATURATION: f64 = 2.0;

/// Executive summary credit for sections that are not the executive summary.
const NON_EXECUTIVE_SCORE: f64 = 0.7;

/// The Gold Team (persuasiveness) evaluator.
pub struct GoldEvaluator;

impl GoldEvaluator {
    pub fn new() -> Self {
        Self
    }

    fn theme_present(&self, lower_content: &str, theme: &WinTheme) -> bool {
        let theme_text = theme.theme_text.to_lowercase();
        let hits = theme_text
            .split_whitespace()
            .filter(|w| w.chars().count() >= MIN_THEME_WORD_CHARS)
            .take(MAX_THEME_WORDS)
            .filter(|w| lower_content.contains(*w))
            .count();
        hits >= THEME_WORD_HITS
    }

    /// Share of known win themes reinforced by the section.
    /// `None` when no win themes are known.
    fn theme_consistency(&self, lower_content: &str, context: &ReviewContext) -> Option<f64> {
        if context.win_themes.is_empty() {
            return None;
        }

        let hits = context
            .win_themes
            .iter()
            .filter(|theme| self.theme_present(lower_content, theme))
            .count();
        Some(hits as f64 / context.win_themes.len() as f64)
    }

    fn is_executive_summary(&self, section: &Section) -> bool {
        section.volume.to_lowercase().contains("executive")
            || section.section_title.to_lowercase().contains("executive")
    }
}

impl Default for GoldEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator for GoldEvaluator {
    fn category(&self) -> ReviewCategory {
        ReviewCategory::Gold
    }

    fn evaluate(
        &self,
        section: &Section,
        _proposal: &Proposal,
        context: &ReviewContext,
    ) -> CriterionScores {
        let mut scores = CriterionScores::new();
        let lower = section.content.to_lowercase();

        let theme_consistency = self.theme_consistency(&lower, context);
        if let Some(score) = theme_consistency {
            scores.insert("theme_consistency".to_string(), score);
        }

        scores.insert(
            "customer_focus".to_string(),
            saturate(count_indicators(&lower, CUSTOMER_INDICATORS), CUSTOMER_SATURATION),
        );
        scores.insert(
            "storytelling".to_string(),
            saturate(count_indicators(&lower, NARRATIVE_INDICATORS), NARRATIVE_SATURATION),
        );
        scores.insert(
            "graphics_support".to_string(),
            saturate(count_graphics(&section.content), GRAPHICS_SATURATION),
        );

        // The executive summary is judged on how well it carries the themes.
        if self.is_executive_summary(section) {
            if let Some(score) = theme_consistency {
                scores.insert("executive_summary".to_string(), score);
            }
        } else {
            scores.insert("executive_summary".to_string(), NON_EXECUTIVE_SCORE);
        }

        scores
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn themes() -> Vec<WinTheme> {
        vec![
            WinTheme {
                id: Some("WT-1".to_string()),
                theme_text: "Proven modernization delivering measurable savings".to_string(),
            },
            WinTheme {
                id: Some("WT-2".to_string()),
                theme_text: "Cleared workforce ready on contract award".to_string(),
            },
        ]
    }

    #[test]
    fn test_theme_consistency_counts_reinforced_themes() {
        let section = Section::new(
            "s1",
            "technical",
            "3.1",
            "Modernization",
            "Our modernization approach keeps delivering measurable outcomes.",
        );
        let context = ReviewContext::new().with_win_themes(themes());
        let scores = GoldEvaluator::new().evaluate(&section, &Proposal::new("P-1"), &context);

        assert_eq!(scores["theme_consistency"], 0.5);
        assert_eq!(scores["executive_summary"], NON_EXECUTIVE_SCORE);
    }

    #[test]
    fn test_executive_summary_tracks_themes() {
        let section = Section::new(
            "s0",
            "executive_summary",
            "0",
            "Executive Summary",
            "A cleared workforce ready at award, proven modernization with measurable savings.",
        );
        let context = ReviewContext::new().with_win_themes(themes());
        let scores = GoldEvaluator::new().evaluate(&section, &Proposal::new("P-1"), &context);

        assert_eq!(scores["theme_consistency"], 1.0);
        assert_eq!(scores["executive_summary"], 1.0);
    }

    #[test]
    fn test_missing_themes_fall_back_to_neutral() {
        let section = Section::new("s0", "executive_summary", "0", "Executive Summary", "Hello");
        let scores =
            GoldEvaluator::new().evaluate(&section, &Proposal::new("P-1"), &ReviewContext::new());

        assert!(!scores.contains_key("theme_consistency"));
        assert!(!scores.contains_key("executive_summary"));
    }

    #[test]
    fn test_customer_narrative_and_graphics() {
        let section = Section::new(
            "s1",
            "management",
            "4.2",
            "Transition",
            "Your mission drives our plan. For example, the outcome for each stakeholder \
             and customer is tracked, as shown in Figure 2 and Table 5. Consider the impact.",
        );
        let scores =
            GoldEvaluator::new().evaluate(&section, &Proposal::new("P-1"), &ReviewContext::new());

        assert_eq!(scores["customer_focus"], 1.0);
        assert_eq!(scores["storytelling"], 1.0);
        assert_eq!(scores["graphics_support"], 1.0);
    }
}
