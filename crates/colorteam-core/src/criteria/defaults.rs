//! Built-in criterion sets, used when no criteria document covers a category.

use super::parser::{Criterion, CriterionSet};
use crate::types::ReviewCategory;

/// The built-in criterion set for a category.
///
/// Every default satisfies the loader invariants: non-empty criteria,
/// weights in (0, 1] summing to 1.0, and `yellow <= green`.
pub fn default_criterion_set(category: ReviewCategory) -> CriterionSet {
    match category {
        ReviewCategory::Pink => CriterionSet {
            category,
            description: "Verify every Section L instruction is addressed".to_string(),
            criteria: vec![
                Criterion::new("section_coverage", "All required sections present", 0.30)
                    .with_fail_condition("Required section missing or empty"),
                Criterion::new("instruction_compliance", "Each instruction addressed", 0.30),
                Criterion::new("page_limits", "Page limits respected", 0.15)
                    .with_fail_condition("Page count exceeds the declared limit"),
                Criterion::new("format_compliance", "Font, margins, spacing", 0.15),
                Criterion::new("required_attachments", "Attachments included", 0.10),
            ],
            pass_threshold: 0.90,
            green_threshold: 0.90,
            yellow_threshold: 0.70,
        },
        ReviewCategory::Red => CriterionSet {
            category,
            description: "Evaluate against Section M evaluation criteria".to_string(),
            criteria: vec![
                Criterion::new("eval_factor_coverage", "Eval factors addressed", 0.25)
                    .with_fail_condition("Evaluation factor not explicitly addressed"),
                Criterion::new("strengths_articulated", "Strengths tied to eval criteria", 0.20),
                Criterion::new("weaknesses_mitigated", "Weaknesses preemptively addressed", 0.15),
                Criterion::new("proof_points", "Evidence backing claims", 0.20),
                Criterion::new("discriminators_clear", "Differentiators clear", 0.20),
            ],
            pass_threshold: 0.80,
            green_threshold: 0.80,
            yellow_threshold: 0.65,
        },
        ReviewCategory::Gold => CriterionSet {
            category,
            description: "Evaluate win theme integration and persuasiveness".to_string(),
            criteria: vec![
                Criterion::new("theme_consistency", "Win themes throughout", 0.25),
                Criterion::new("customer_focus", "Customer mission centered", 0.25),
                Criterion::new("storytelling", "Compelling narrative", 0.20),
                Criterion::new("graphics_support", "Graphics reinforce messages", 0.15),
                Criterion::new("executive_summary", "Exec summary captures themes", 0.15),
            ],
            pass_threshold: 0.75,
            green_threshold: 0.75,
            yellow_threshold: 0.60,
        },
        ReviewCategory::White => CriterionSet {
            category,
            description: "Final quality check before submission".to_string(),
            criteria: vec![
                Criterion::new("cross_references", "All cross-refs resolve", 0.20),
                Criterion::new("acronyms", "Acronym list complete", 0.10),
                Criterion::new("consistency", "Consistent terminology", 0.15),
                Criterion::new("classification_markings", "Markings on all pages", 0.20)
                    .with_fail_condition("Classification marking missing"),
                Criterion::new("cag_clearance", "CAG scan passes", 0.20)
                    .with_fail_condition("Open CAG alert blocks release"),
                Criterion::new("file_packaging", "File names, sizes, volumes", 0.15),
            ],
            pass_threshold: 0.95,
            green_threshold: 0.95,
            yellow_threshold: 0.80,
        },
    }
}
