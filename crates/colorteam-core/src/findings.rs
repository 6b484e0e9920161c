//! Findings classification.
//!
//! Each criterion result is bucketed by its raw score:
//!
//! | Score | Finding |
//! |-------|---------|
//! | `>= 0.85` | strength |
//! | `0.70 ..< 0.85` | none |
//! | `0.50 ..< 0.70` | weakness |
//! | `< 0.50` | deficiency if the criterion has a fail condition, else weakness |

use serde::{Deserialize, Serialize};

use crate::criteria::Criterion;
use crate::types::FindingCounts;

/// Scores at or above this are strengths.
pub const STRENGTH_THRESHOLD: f64 = 0.85;

/// Scores below this are notable (weaknesses).
pub const ACCEPTABLE_THRESHOLD: f64 = 0.70;

/// Scores below this are failures (deficiencies when a fail condition is set).
pub const FAILURE_THRESHOLD: f64 = 0.50;

/// Findings kept on a stored review for display.
pub const DISPLAY_CAP: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FindingKind {
    Strength,
    Weakness,
    Deficiency,
}

/// A classified criterion result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub kind: FindingKind,
    pub text: String,
}

/// Stateless classifier for criterion results.
#[derive(Debug, Clone, Copy, Default)]
pub struct FindingsClassifier;

impl FindingsClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Bucket a raw score. `None` means acceptable but not notable.
    pub fn kind(&self, criterion: &Criterion, score: f64) -> Option<FindingKind> {
        if score >= STRENGTH_THRESHOLD {
            Some(FindingKind::Strength)
        } else if score < FAILURE_THRESHOLD {
            if criterion.fail_condition.is_some() {
                Some(FindingKind::Deficiency)
            } else {
                Some(FindingKind::Weakness)
            }
        } else if score < ACCEPTABLE_THRESHOLD {
            Some(FindingKind::Weakness)
        } else {
            None
        }
    }

    /// Classify a criterion result for the given section.
    ///
    /// Deficiencies quote the fail condition; everything else reports the
    /// score as a whole percentage.
    pub fn classify(&self, section_number: &str, criterion: &Criterion, score: f64) -> Option<Finding> {
        let kind = self.kind(criterion, score)?;
        let detail = match (kind, criterion.fail_condition.as_deref()) {
            (FindingKind::Deficiency, Some(condition)) => condition.to_string(),
            _ => format!("{:.0}%", score * 100.0),
        };

        Some(Finding {
            kind,
            text: format!("{} - {}: {}", section_number, criterion.label, detail),
        })
    }
}

/// Findings collected across every section of one review, in section order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Findings {
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub deficiencies: Vec<String>,
}

impl Findings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, finding: Finding) {
        match finding.kind {
            FindingKind::Strength => self.strengths.push(finding.text),
            FindingKind::Weakness => self.weaknesses.push(finding.text),
            FindingKind::Deficiency => self.deficiencies.push(finding.text),
        }
    }

    pub fn extend(&mut self, other: Findings) {
        self.strengths.extend(other.strengths);
        self.weaknesses.extend(other.weaknesses);
        self.deficiencies.extend(other.deficiencies);
    }

    /// Uncapped totals.
    pub fn counts(&self) -> FindingCounts {
        FindingCounts {
            strengths: self.strengths.len(),
            weaknesses: self.weaknesses.len(),
            deficiencies: self.deficiencies.len(),
        }
    }

    /// Copy of the findings truncated to the first `cap` of each kind.
    pub fn capped(&self, cap: usize) -> Findings {
        let take = |items: &Vec<String>| items.iter().take(cap).cloned().collect();
        Findings {
            strengths: take(&self.strengths),
            weaknesses: take(&self.weaknesses),
            deficiencies: take(&self.deficiencies),
        }
    }
}
