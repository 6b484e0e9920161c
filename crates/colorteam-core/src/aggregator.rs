//! Section aggregation: per-section scoring and the overall review result.
//!
//! Scoring a section runs the category evaluator, the weighted scorer and
//! the findings classifier. Sections are independent, so callers may score
//! them in any order or in parallel; [`SectionAggregator::finalize`] only
//! needs the outcomes back in canonical section order.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::context::ReviewContext;
use crate::criteria::{ConfigError, CriterionSet};
use crate::evaluators::Evaluator;
use crate::findings::{Findings, FindingsClassifier, DISPLAY_CAP};
use crate::recommendations::RecommendationGenerator;
use crate::scoring::{classify, raw_score, round_score, WeightedScorer};
use crate::types::{Proposal, ReviewCategory, ReviewResult, Section, SectionScoreResult, Verdict};
use crate::ReviewError;

/// Hex characters kept from a v4 UUID for review ids.
const REVIEW_ID_HEX_CHARS: usize = 12;

/// The scored result of one section plus the findings it raised.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionOutcome {
    pub result: SectionScoreResult,
    pub findings: Findings,
}

/// Scores sections for one category and reduces them into a [`ReviewResult`].
#[derive(Clone)]
pub struct SectionAggregator {
    criteria: Arc<CriterionSet>,
    evaluator: Arc<dyn Evaluator>,
    scorer: WeightedScorer,
    classifier: FindingsClassifier,
    recommender: RecommendationGenerator,
}

impl SectionAggregator {
    /// Pair a criterion set with the evaluator for the same category.
    pub fn new(criteria: CriterionSet, evaluator: Arc<dyn Evaluator>) -> Result<Self, ConfigError> {
        if evaluator.category() != criteria.category {
            return Err(ConfigError::ValidationError {
                category: criteria.category,
                reason: format!("evaluator serves the {} category", evaluator.category()),
            });
        }

        Ok(Self {
            scorer: WeightedScorer::new(criteria.thresholds()),
            criteria: Arc::new(criteria),
            evaluator,
            classifier: FindingsClassifier::new(),
            recommender: RecommendationGenerator::new(),
        })
    }

    pub fn category(&self) -> ReviewCategory {
        self.criteria.category
    }

    pub fn criterion_set(&self) -> &CriterionSet {
        &self.criteria
    }

    /// Evaluate, score and classify one section.
    pub fn score_section(
        &self,
        section: &Section,
        proposal: &Proposal,
        context: &ReviewContext,
    ) -> SectionOutcome {
        let raw = self.evaluator.evaluate(section, proposal, context);
        let (section_score, criteria) = self.scorer.score(&self.criteria.criteria, &raw);

        let mut findings = Findings::new();
        for criterion in &self.criteria.criteria {
            let score = raw_score(&raw, &criterion.id);
            if let Some(finding) = self
                .classifier
                .classify(&section.section_number, criterion, score)
            {
                findings.push(finding);
            }
        }

        let section_score = round_score(section_score);
        tracing::debug!(
            category = %self.category(),
            section_id = %section.id,
            section_number = %section.section_number,
            section_score,
            "Scored section"
        );

        SectionOutcome {
            result: SectionScoreResult {
                section_id: section.id.clone(),
                volume: section.volume.clone(),
                section_number: section.section_number.clone(),
                section_title: section.section_title.clone(),
                section_score,
                traffic_light: classify(section_score, self.scorer.thresholds()),
                criteria,
            },
            findings,
        }
    }

    /// Score every section sequentially and build the review result.
    ///
    /// Sections are put in canonical order first.
    pub fn aggregate(
        &self,
        proposal: &Proposal,
        sections: &[Section],
        context: &ReviewContext,
    ) -> Result<ReviewResult, ReviewError> {
        let mut ordered: Vec<&Section> = sections.iter().collect();
        ordered.sort_by(|a, b| a.canonical_cmp(b));

        let outcomes = ordered
            .into_iter()
            .map(|section| self.score_section(section, proposal, context))
            .collect();
        self.finalize(&proposal.id, outcomes)
    }

    /// Reduce section outcomes (already in canonical order) into a result.
    ///
    /// The overall score is the unweighted mean of the rounded section
    /// scores. Zero sections is an error, never a zero score.
    pub fn finalize(
        &self,
        proposal_id: &str,
        outcomes: Vec<SectionOutcome>,
    ) -> Result<ReviewResult, ReviewError> {
        if outcomes.is_empty() {
            return Err(ReviewError::NotFound(format!(
                "proposal {} has no sections to review",
                proposal_id
            )));
        }

        let mut sections = Vec::with_capacity(outcomes.len());
        let mut findings = Findings::new();
        for outcome in outcomes {
            sections.push(outcome.result);
            findings.extend(outcome.findings);
        }

        let total: f64 = sections.iter().map(|s| s.section_score).sum();
        let overall_score = round_score(total / sections.len() as f64);
        let pass_threshold = self.criteria.pass_threshold;
        let verdict = if overall_score >= pass_threshold {
            Verdict::Pass
        } else {
            Verdict::Fail
        };

        let recommendations =
            self.recommender
                .generate(self.category(), &findings.deficiencies, &findings.weaknesses);
        let finding_counts = findings.counts();
        let displayed = findings.capped(DISPLAY_CAP);

        Ok(ReviewResult {
            id: new_review_id(),
            proposal_id: proposal_id.to_string(),
            category: self.category(),
            overall_score,
            overall_traffic_light: classify(overall_score, self.scorer.thresholds()),
            pass_threshold,
            verdict,
            sections,
            strengths: displayed.strengths,
            weaknesses: displayed.weaknesses,
            deficiencies: displayed.deficiencies,
            finding_counts,
            recommendations,
            reviewed_at: Utc::now(),
        })
    }
}

impl std::fmt::Debug for SectionAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SectionAggregator")
            .field("category", &self.category())
            .field("criteria", &self.criteria.criteria.len())
            .finish()
    }
}

/// `RV-` followed by 12 lowercase hex characters.
pub fn new_review_id() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("RV-{}", &hex[..REVIEW_ID_HEX_CHARS])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::{default_criterion_set, Criterion, Thresholds};
    use crate::evaluators::{CriterionScores, PinkEvaluator, WhiteEvaluator};
    use crate::types::TrafficLight;

    /// Returns fixed scores keyed by section id.
    struct Scripted(Vec<(&'static str, CriterionScores)>);

    impl Evaluator for Scripted {
        fn category(&self) -> ReviewCategory {
            ReviewCategory::Pink
        }

        fn evaluate(&self, section: &Section, _: &Proposal, _: &ReviewContext) -> CriterionScores {
            self.0
                .iter()
                .find(|(id, _)| *id == section.id)
                .map(|(_, scores)| scores.clone())
                .unwrap_or_default()
        }
    }

    fn scores(coverage: f64, pages: f64) -> CriterionScores {
        CriterionScores::from([
            ("section_coverage".to_string(), coverage),
            ("page_limits".to_string(), pages),
        ])
    }

    fn two_criteria() -> CriterionSet {
        CriterionSet::new(
            ReviewCategory::Pink,
            "Compliance",
            vec![
                Criterion::new("section_coverage", "Section present", 0.5)
                    .with_fail_condition("Required section missing or empty"),
                Criterion::new("page_limits", "Within page limits", 0.5),
            ],
            0.9,
            Thresholds {
                green: 0.9,
                yellow: 0.7,
            },
        )
        .unwrap()
    }

    fn aggregator() -> SectionAggregator {
        let evaluator = Scripted(vec![
            ("a", scores(1.0, 1.0)),
            ("b", scores(0.0, 1.0)),
            ("c", scores(1.0, 0.5)),
        ]);
        SectionAggregator::new(two_criteria(), Arc::new(evaluator)).unwrap()
    }

    fn sections() -> Vec<Section> {
        vec![
            Section::new("c", "technical", "3", "Staffing", ""),
            Section::new("a", "technical", "1", "Approach", ""),
            Section::new("b", "technical", "2", "Management", ""),
        ]
    }

    #[test]
    fn test_overall_is_mean_of_sections() {
        let result = aggregator()
            .aggregate(&Proposal::new("P-1"), &sections(), &ReviewContext::new())
            .unwrap();

        let per: Vec<(String, f64, TrafficLight)> = result
            .sections
            .iter()
            .map(|s| (s.section_id.clone(), s.section_score, s.traffic_light))
            .collect();
        assert_eq!(
            per,
            vec![
                ("a".to_string(), 1.0, TrafficLight::Green),
                ("b".to_string(), 0.5, TrafficLight::Red),
                ("c".to_string(), 0.75, TrafficLight::Yellow),
            ]
        );
        assert_eq!(result.overall_score, 0.75);
        assert_eq!(result.overall_traffic_light, TrafficLight::Yellow);
        assert_eq!(result.verdict, Verdict::Fail);
        assert_eq!(result.pass_threshold, 0.9);
    }

    #[test]
    fn test_findings_and_recommendations() {
        let result = aggregator()
            .aggregate(&Proposal::new("P-1"), &sections(), &ReviewContext::new())
            .unwrap();

        assert_eq!(
            result.deficiencies,
            vec!["2 - Section present: Required section missing or empty".to_string()]
        );
        assert_eq!(
            result.weaknesses,
            vec!["3 - Within page limits: 50%".to_string()]
        );
        assert_eq!(result.finding_counts.strengths, 4);
        assert!(result.recommendations[0].text.starts_with("Missing required sections"));
        assert!(result.recommendations[0].blocking);
    }

    #[test]
    fn test_zero_sections_is_not_found() {
        let err = aggregator()
            .aggregate(&Proposal::new("P-1"), &[], &ReviewContext::new())
            .unwrap_err();
        assert!(matches!(err, ReviewError::NotFound(_)));
    }

    #[test]
    fn test_mismatched_evaluator_rejected() {
        let err = SectionAggregator::new(
            default_criterion_set(ReviewCategory::Pink),
            Arc::new(WhiteEvaluator::new()),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { .. }));
    }

    #[test]
    fn test_display_lists_are_capped() {
        let aggregator = SectionAggregator::new(
            default_criterion_set(ReviewCategory::Pink),
            Arc::new(PinkEvaluator::new()),
        )
        .unwrap();
        // Empty sections fail coverage, which carries a fail condition.
        let sections: Vec<Section> = (0..30)
            .map(|i| Section::new(format!("s{}", i), "technical", format!("{}", i), "Stub", ""))
            .collect();

        let result = aggregator
            .aggregate(&Proposal::new("P-1"), &sections, &ReviewContext::new())
            .unwrap();
        assert_eq!(result.deficiencies.len(), DISPLAY_CAP);
        assert_eq!(result.finding_counts.deficiencies, 30);
        assert_eq!(result.sections.len(), 30);
        assert_eq!(result.sections[2].section_number, "2");
    }

    #[test]
    fn test_review_id_format() {
        let id = new_review_id();
        assert!(id.starts_with("RV-"));
        assert_eq!(id.len(), 3 + REVIEW_ID_HEX_CHARS);
        assert!(id[3..].chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }
}
