//! Core data model for color team reviews.
//!
//! Scores, findings and readiness are explicit records here; JSON is only
//! the boundary representation.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::criteria::ConfigError;

/// The four review categories, in pipeline order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewCategory {
    /// Compliance review
    Pink,
    /// Responsiveness review
    Red,
    /// Persuasiveness / win theme review
    Gold,
    /// Final quality check
    White,
}

impl ReviewCategory {
    /// All categories in pipeline order.
    pub const ALL: [ReviewCategory; 4] = [
        ReviewCategory::Pink,
        ReviewCategory::Red,
        ReviewCategory::Gold,
        ReviewCategory::White,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewCategory::Pink => "pink",
            ReviewCategory::Red => "red",
            ReviewCategory::Gold => "gold",
            ReviewCategory::White => "white",
        }
    }

    /// Human-readable team name ("Pink Team").
    pub fn team_name(&self) -> &'static str {
        match self {
            ReviewCategory::Pink => "Pink Team",
            ReviewCategory::Red => "Red Team",
            ReviewCategory::Gold => "Gold Team",
            ReviewCategory::White => "White Team",
        }
    }

    /// Position in the review pipeline (pink first).
    pub fn pipeline_order(&self) -> u8 {
        match self {
            ReviewCategory::Pink => 0,
            ReviewCategory::Red => 1,
            ReviewCategory::Gold => 2,
            ReviewCategory::White => 3,
        }
    }

    /// Resolve a config document key. Accepts both `pink` and `pink_team`.
    pub fn from_config_key(key: &str) -> Result<Self, ConfigError> {
        let trimmed = key.trim().to_lowercase();
        let name = trimmed.strip_suffix("_team").unwrap_or(&trimmed);
        name.parse()
    }
}

impl fmt::Display for ReviewCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReviewCategory {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pink" => Ok(ReviewCategory::Pink),
            "red" => Ok(ReviewCategory::Red),
            "gold" => Ok(ReviewCategory::Gold),
            "white" => Ok(ReviewCategory::White),
            _ => Err(ConfigError::UnknownCategory(s.to_string())),
        }
    }
}

/// Red/yellow/green classification of a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrafficLight {
    Red,
    Yellow,
    Green,
}

impl fmt::Display for TrafficLight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrafficLight::Red => f.write_str("red"),
            TrafficLight::Yellow => f.write_str("yellow"),
            TrafficLight::Green => f.write_str("green"),
        }
    }
}

/// Pass/fail verdict against a category's pass threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    Pass,
    Fail,
}

impl Verdict {
    pub fn is_pass(&self) -> bool {
        matches!(self, Verdict::Pass)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Pass => f.write_str("PASS"),
            Verdict::Fail => f.write_str("FAIL"),
        }
    }
}

/// Lifecycle status of a proposal section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionStatus {
    #[default]
    Outline,
    Drafting,
    Drafted,
    Reviewed,
    Revised,
    Final,
    Locked,
}

/// A proposal under review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Proposal {
    pub id: String,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub opportunity_id: Option<String>,

    /// Classification marking expected on every section
    #[serde(default)]
    pub classification: Option<String>,
}

impl Proposal {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: None,
            opportunity_id: None,
            classification: None,
        }
    }
}

/// One section of a proposal volume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,

    pub volume: String,

    pub section_number: String,

    pub section_title: String,

    #[serde(default)]
    pub content: String,

    #[serde(default)]
    pub word_count: u32,

    #[serde(default)]
    pub page_count: f64,

    /// Declared page limit, if the solicitation sets one
    #[serde(default)]
    pub page_limit: Option<f64>,

    #[serde(default)]
    pub status: SectionStatus,
}

impl Section {
    /// Build a section with content; word count is derived from the text.
    pub fn new(
        id: impl Into<String>,
        volume: impl Into<String>,
        section_number: impl Into<String>,
        section_title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        let content = content.into();
        let word_count = content.split_whitespace().count() as u32;
        Self {
            id: id.into(),
            volume: volume.into(),
            section_number: section_number.into(),
            section_title: section_title.into(),
            content,
            word_count,
            page_count: 0.0,
            page_limit: None,
            status: SectionStatus::default(),
        }
    }

    /// Canonical ordering: volume, then section number component-wise, then id.
    pub fn canonical_cmp(&self, other: &Section) -> Ordering {
        self.volume
            .cmp(&other.volume)
            .then_with(|| compare_section_numbers(&self.section_number, &other.section_number))
            .then_with(|| self.id.cmp(&other.id))
    }
}

/// Compare dotted section numbers so that "2" sorts before "10".
pub fn compare_section_numbers(a: &str, b: &str) -> Ordering {
    let mut left = a.split('.');
    let mut right = b.split('.');
    loop {
        match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) => {
                let ord = match (l.parse::<u64>(), r.parse::<u64>()) {
                    (Ok(ln), Ok(rn)) => ln.cmp(&rn),
                    _ => l.cmp(r),
                };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
        }
    }
}

/// Score for one criterion within one section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionScore {
    pub criterion_id: String,
    pub label: String,
    pub weight: f64,
    pub score: f64,
    pub traffic_light: TrafficLight,
}

/// Weighted result for one section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionScoreResult {
    pub section_id: String,
    pub volume: String,
    pub section_number: String,
    pub section_title: String,
    pub section_score: f64,
    pub traffic_light: TrafficLight,
    pub criteria: Vec<CriterionScore>,
}

/// Uncapped totals behind the displayed finding lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FindingCounts {
    pub strengths: usize,
    pub weaknesses: usize,
    pub deficiencies: usize,
}

/// An actionable recommendation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub text: String,

    /// Must be resolved before the proposal can advance
    #[serde(default)]
    pub blocking: bool,
}

/// The outcome of one review run. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewResult {
    pub id: String,
    pub proposal_id: String,
    pub category: ReviewCategory,
    pub overall_score: f64,
    pub overall_traffic_light: TrafficLight,
    pub pass_threshold: f64,
    pub verdict: Verdict,
    pub sections: Vec<SectionScoreResult>,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub deficiencies: Vec<String>,
    #[serde(default)]
    pub finding_counts: FindingCounts,
    pub recommendations: Vec<Recommendation>,
    pub reviewed_at: DateTime<Utc>,
}

/// Overall proposal readiness across all four categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Readiness {
    NotStarted,
    InProgress,
    ReviewsCompleteWithIssues,
    ReadyForSubmission,
}

impl fmt::Display for Readiness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Readiness::NotStarted => "NOT_STARTED",
            Readiness::InProgress => "IN_PROGRESS",
            Readiness::ReviewsCompleteWithIssues => "REVIEWS_COMPLETE_WITH_ISSUES",
            Readiness::ReadyForSubmission => "READY_FOR_SUBMISSION",
        };
        f.write_str(label)
    }
}

/// Per-category entry in a readiness summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CategoryStatus {
    NotReviewed,
    Reviewed {
        review_id: String,
        overall_score: f64,
        pass_threshold: f64,
        verdict: Verdict,
        reviewed_at: DateTime<Utc>,
        deficiency_count: usize,
    },
}

impl CategoryStatus {
    pub fn verdict(&self) -> Option<Verdict> {
        match self {
            CategoryStatus::NotReviewed => None,
            CategoryStatus::Reviewed { verdict, .. } => Some(*verdict),
        }
    }
}

/// Derived readiness; recomputed on demand, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadinessSummary {
    pub proposal_id: String,
    pub by_category: BTreeMap<ReviewCategory, CategoryStatus>,
    pub categories_completed: usize,
    pub categories_passed: usize,
    pub total_deficiencies: usize,
    pub readiness: Readiness,
}

/// Severity of a flattened finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Deficiency,
    Weakness,
}

/// One deficiency or weakness across the proposal's review history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeficiencyEntry {
    pub category: ReviewCategory,
    pub severity: Severity,
    pub text: String,
    pub reviewed_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parse_and_config_key() {
        assert_eq!("Pink".parse::<ReviewCategory>().unwrap(), ReviewCategory::Pink);
        assert_eq!(
            ReviewCategory::from_config_key("white_team").unwrap(),
            ReviewCategory::White
        );
        assert!(matches!(
            "purple".parse::<ReviewCategory>(),
            Err(ConfigError::UnknownCategory(_))
        ));
    }

    #[test]
    fn test_section_numbers_compare_numerically() {
        assert_eq!(compare_section_numbers("2", "10"), Ordering::Less);
        assert_eq!(compare_section_numbers("1.2", "1.10"), Ordering::Less);
        assert_eq!(compare_section_numbers("1", "1.1"), Ordering::Less);
        assert_eq!(compare_section_numbers("A.1", "A.1"), Ordering::Equal);
    }

    #[test]
    fn test_canonical_order_groups_by_volume() {
        let a = Section::new("s1", "management", "1", "Approach", "");
        let b = Section::new("s2", "technical", "1", "Approach", "");
        assert_eq!(a.canonical_cmp(&b), Ordering::Less);
    }

    #[test]
    fn test_serialized_labels() {
        assert_eq!(serde_json::to_string(&Verdict::Pass).unwrap(), "\"PASS\"");
        assert_eq!(
            serde_json::to_string(&Readiness::ReviewsCompleteWithIssues).unwrap(),
            "\"REVIEWS_COMPLETE_WITH_ISSUES\""
        );
        assert_eq!(serde_json::to_string(&TrafficLight::Yellow).unwrap(), "\"yellow\"");
    }
}
