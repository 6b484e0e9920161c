//! Readiness reduction across the four review categories.
//!
//! ```text
//! no category reviewed              -> NOT_STARTED
//! 1..=3 categories reviewed         -> IN_PROGRESS
//! all four reviewed, any FAIL       -> REVIEWS_COMPLETE_WITH_ISSUES
//! all four reviewed, all PASS       -> READY_FOR_SUBMISSION
//! ```
//!
//! Readiness is derived on demand from the latest stored result per
//! category. The stored verdict is used as-is; nothing is re-evaluated.

use std::collections::BTreeMap;

use crate::store::{ReviewStore, StoreError};
use crate::types::{
    CategoryStatus, DeficiencyEntry, Readiness, ReadinessSummary, ReviewCategory, ReviewResult,
    Severity,
};

/// Reduces per-category review results into a readiness summary.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadinessAggregator;

impl ReadinessAggregator {
    pub fn new() -> Self {
        Self
    }

    /// Fetch the latest result per category and reduce them.
    pub fn summarize(
        &self,
        proposal_id: &str,
        store: &dyn ReviewStore,
    ) -> Result<ReadinessSummary, StoreError> {
        let mut latest = BTreeMap::new();
        for category in ReviewCategory::ALL {
            latest.insert(category, store.latest_by_category(proposal_id, category)?);
        }
        Ok(self.reduce(proposal_id, &latest))
    }

    /// Pure reduction over the latest result (if any) per category.
    pub fn reduce(
        &self,
        proposal_id: &str,
        latest: &BTreeMap<ReviewCategory, Option<ReviewResult>>,
    ) -> ReadinessSummary {
        let by_category: BTreeMap<ReviewCategory, CategoryStatus> = ReviewCategory::ALL
            .iter()
            .map(|category| {
                let status = match latest.get(category).and_then(Option::as_ref) {
                    Some(result) => CategoryStatus::Reviewed {
                        review_id: result.id.clone(),
                        overall_score: result.overall_score,
                        pass_threshold: result.pass_threshold,
                        verdict: result.verdict,
                        reviewed_at: result.reviewed_at,
                        deficiency_count: result.finding_counts.deficiencies,
                    },
                    None => CategoryStatus::NotReviewed,
                };
                (*category, status)
            })
            .collect();

        let verdicts: Vec<_> = by_category.values().filter_map(|s| s.verdict()).collect();
        let categories_completed = verdicts.len();
        let categories_passed = verdicts.iter().filter(|v| v.is_pass()).count();
        let total_deficiencies = by_category
            .values()
            .map(|status| match status {
                CategoryStatus::Reviewed {
                    deficiency_count, ..
                } => *deficiency_count,
                CategoryStatus::NotReviewed => 0,
            })
            .sum();

        let readiness = match categories_completed {
            0 => Readiness::NotStarted,
            n if n == ReviewCategory::ALL.len() && categories_passed == n => {
                Readiness::ReadyForSubmission
            }
            n if n == ReviewCategory::ALL.len() => Readiness::ReviewsCompleteWithIssues,
            _ => Readiness::InProgress,
        };

        ReadinessSummary {
            proposal_id: proposal_id.to_string(),
            by_category,
            categories_completed,
            categories_passed,
            total_deficiencies,
            readiness,
        }
    }

    /// Flatten deficiencies and weaknesses from a newest-first history.
    ///
    /// Deficiencies sort before weaknesses, then pink -> white; the sort is
    /// stable so newer reviews stay ahead within a group.
    pub fn list_deficiencies(&self, history: &[ReviewResult]) -> Vec<DeficiencyEntry> {
        let mut entries: Vec<DeficiencyEntry> = history
            .iter()
            .flat_map(|result| {
                let entry = move |severity: Severity, text: &String| DeficiencyEntry {
                    category: result.category,
                    severity,
                    text: text.clone(),
                    reviewed_at: result.reviewed_at,
                };
                result
                    .deficiencies
                    .iter()
                    .map(move |d| entry(Severity::Deficiency, d))
                    .chain(result.weaknesses.iter().map(move |w| entry(Severity::Weakness, w)))
            })
            .collect();

        entries.sort_by_key(|e| (e.severity, e.category.pipeline_order()));
        entries
    }
}
