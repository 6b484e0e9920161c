//! Recommendation synthesis.
//!
//! Templated text only: rules match keywords in the finding texts of one
//! review and never influence scoring. When no category rule fires, a
//! single summary recommendation is produced.

use crate::types::{Recommendation, ReviewCategory};

/// Which finding list a rule inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source {
    Deficiencies,
    Weaknesses,
}

/// A keyword-triggered recommendation.
struct Rule {
    source: Source,
    /// Any of these (lowercase) keywords triggers the rule
    keywords: &'static [&'static str],
    text: &'static str,
    blocking: bool,
}

const PINK_RULES: &[Rule] = &[
    Rule {
        source: Source::Deficiencies,
        keywords: &["section"],
        text: "Missing required sections must be added before advancing to Red Team review.",
        blocking: true,
    },
    Rule {
        source: Source::Deficiencies,
        keywords: &["page"],
        text: "Sections exceeding page limits need immediate editing to comply with \
               solicitation instructions.",
        blocking: true,
    },
    Rule {
        source: Source::Weaknesses,
        keywords: &["instruction"],
        text: "Review compliance matrix to ensure all Section L instructions have \
               corresponding content.",
        blocking: false,
    },
];

const RED_RULES: &[Rule] = &[
    Rule {
        source: Source::Deficiencies,
        keywords: &["eval"],
        text: "Critical: One or more evaluation factors are not explicitly addressed. \
               Map each factor to specific proposal content.",
        blocking: true,
    },
    Rule {
        source: Source::Weaknesses,
        keywords: &["evidence", "proof"],
        text: "Add specific past performance references, metrics, and case studies to \
               support claims.",
        blocking: false,
    },
];

const GOLD_RULES: &[Rule] = &[
    Rule {
        source: Source::Weaknesses,
        keywords: &["theme"],
        text: "Win themes are not consistently woven through sections. Each major section \
               should reinforce at least one theme.",
        blocking: false,
    },
    Rule {
        source: Source::Weaknesses,
        keywords: &["customer"],
        text: "Shift language from contractor-centric to customer-mission-centric.",
        blocking: false,
    },
];

const WHITE_RULES: &[Rule] = &[
    Rule {
        source: Source::Deficiencies,
        keywords: &["cag"],
        text: "CRITICAL: CAG alerts must be resolved before submission. Review with \
               Security Officer.",
        blocking: true,
    },
    Rule {
        source: Source::Deficiencies,
        keywords: &["marking"],
        text: "Classification markings missing on one or more sections. Apply CUI markings \
               to all pages.",
        blocking: true,
    },
    Rule {
        source: Source::Weaknesses,
        keywords: &["acronym"],
        text: "Update acronym list and ensure first-use expansion in all sections.",
        blocking: false,
    },
];

fn rules_for(category: ReviewCategory) -> &'static [Rule] {
    match category {
        ReviewCategory::Pink => PINK_RULES,
        ReviewCategory::Red => RED_RULES,
        ReviewCategory::Gold => GOLD_RULES,
        ReviewCategory::White => WHITE_RULES,
    }
}

/// Maps a review's findings to actionable recommendations.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecommendationGenerator;

impl RecommendationGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Generate recommendations from the full (uncapped) finding lists.
    pub fn generate(
        &self,
        category: ReviewCategory,
        deficiencies: &[String],
        weaknesses: &[String],
    ) -> Vec<Recommendation> {
        let deficiencies: Vec<String> = deficiencies.iter().map(|d| d.to_lowercase()).collect();
        let weaknesses: Vec<String> = weaknesses.iter().map(|w| w.to_lowercase()).collect();

        let mut recommendations: Vec<Recommendation> = rules_for(category)
            .iter()
            .filter(|rule| {
                let findings = match rule.source {
                    Source::Deficiencies => &deficiencies,
                    Source::Weaknesses => &weaknesses,
                };
                findings
                    .iter()
                    .any(|text| rule.keywords.iter().any(|k| text.contains(k)))
            })
            .map(|rule| Recommendation {
                text: rule.text.to_string(),
                blocking: rule.blocking,
            })
            .collect();

        if recommendations.is_empty() {
            recommendations.push(Recommendation {
                text: format!(
                    "Address all {} deficiencies and {} weaknesses identified in this review.",
                    deficiencies.len(),
                    weaknesses.len()
                ),
                blocking: !deficiencies.is_empty(),
            });
        }

        recommendations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_white_marking_is_blocking() {
        let recs = RecommendationGenerator::new().generate(
            ReviewCategory::White,
            &strings(&["1.1 - Markings on all pages: Classification marking missing"]),
            &[],
        );
        assert_eq!(recs.len(), 1);
        assert!(recs[0].blocking);
        assert!(recs[0].text.starts_with("Classification markings missing"));
    }

    #[test]
    fn test_white_cag_and_acronym() {
        let recs = RecommendationGenerator::new().generate(
            ReviewCategory::White,
            &strings(&["2 - CAG scan passes: Open CAG alert blocks release"]),
            &strings(&["2 - Acronym list complete: 50%"]),
        );
        assert_eq!(recs.len(), 2);
        assert!(recs[0].text.starts_with("CRITICAL: CAG alerts"));
        assert!(recs[0].blocking);
        assert!(!recs[1].blocking);
    }

    #[test]
    fn test_red_eval_factor_rule() {
        let recs = RecommendationGenerator::new().generate(
            ReviewCategory::Red,
            &strings(&["3.1 - Eval factors addressed: Evaluation factor not explicitly addressed"]),
            &strings(&["3.1 - Evidence backing claims: 33%"]),
        );
        assert_eq!(recs.len(), 2);
        assert!(recs[0].text.contains("Map each factor"));
        assert!(recs[1].text.contains("past performance references"));
    }

    #[test]
    fn test_rules_only_read_their_own_list() {
        // "theme" in a deficiency does not trigger the gold weakness rule.
        let recs = RecommendationGenerator::new().generate(
            ReviewCategory::Gold,
            &strings(&["1 - Win themes throughout: missing"]),
            &[],
        );
        assert_eq!(
            recs[0].text,
            "Address all 1 deficiencies and 0 weaknesses identified in this review."
        );
        assert!(recs[0].blocking);
    }

    #[test]
    fn test_fallback_without_findings() {
        let recs = RecommendationGenerator::new().generate(ReviewCategory::Pink, &[], &[]);
        assert_eq!(recs.len(), 1);
        assert_eq!(
            recs[0].text,
            "Address all 0 deficiencies and 0 weaknesses identified in this review."
        );
        assert!(!recs[0].blocking);
    }
}
