//! Weighted scoring and traffic-light classification.
//!
//! A section score is the weight-normalized mean of its criterion scores:
//!
//! ```text
//! section_score = Σ(weight_i × score_i) / Σ(weight_i)
//! ```
//!
//! Dividing by the actual weight total keeps the result in [0, 1] even when
//! the declared weights drift from 1.0.

use crate::criteria::{Criterion, Thresholds};
use crate::evaluators::{CriterionScores, NEUTRAL_SCORE};
use crate::types::{CriterionScore, TrafficLight};

/// Decimal places kept on stored scores.
const SCORE_DECIMALS: i32 = 3;

/// Classify a score. Lower bounds are inclusive.
pub fn classify(score: f64, thresholds: Thresholds) -> TrafficLight {
    if score >= thresholds.green {
        TrafficLight::Green
    } else if score >= thresholds.yellow {
        TrafficLight::Yellow
    } else {
        TrafficLight::Red
    }
}

/// Round a score to the stored precision.
pub fn round_score(score: f64) -> f64 {
    let factor = 10f64.powi(SCORE_DECIMALS);
    (score * factor).round() / factor
}

/// Raw score for a criterion, clamped to [0, 1].
///
/// Missing or non-finite scores become [`NEUTRAL_SCORE`].
pub fn raw_score(raw: &CriterionScores, criterion_id: &str) -> f64 {
    match raw.get(criterion_id) {
        Some(score) if score.is_finite() => score.clamp(0.0, 1.0),
        _ => NEUTRAL_SCORE,
    }
}

/// Combines raw criterion scores with the criterion weights.
#[derive(Debug, Clone, Copy)]
pub struct WeightedScorer {
    thresholds: Thresholds,
}

impl WeightedScorer {
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    /// Score one section.
    ///
    /// Returns the unrounded section score and one [`CriterionScore`] per
    /// criterion, in criteria order. Each criterion's traffic light is
    /// informational and does not feed back into the weighted sum.
    pub fn score(&self, criteria: &[Criterion], raw: &CriterionScores) -> (f64, Vec<CriterionScore>) {
        let mut weighted_sum = 0.0;
        let mut total_weight = 0.0;
        let mut per_criterion = Vec::with_capacity(criteria.len());

        for criterion in criteria {
            let score = raw_score(raw, &criterion.id);
            let weight = if criterion.weight.is_finite() {
                criterion.weight.max(0.0)
            } else {
                0.0
            };

            weighted_sum += weight * score;
            total_weight += weight;

            per_criterion.push(CriterionScore {
                criterion_id: criterion.id.clone(),
                label: criterion.label.clone(),
                weight: criterion.weight,
                score: round_score(score),
                traffic_light: classify(score, self.thresholds),
            });
        }

        let section_score = if total_weight > 0.0 {
            (weighted_sum / total_weight).clamp(0.0, 1.0)
        } else {
            0.0
        };

        (section_score, per_criterion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const THRESHOLDS: Thresholds = Thresholds {
        green: 0.9,
        yellow: 0.7,
    };

    fn criteria() -> Vec<Criterion> {
        vec![
            Criterion::new("section_coverage", "Coverage", 0.5),
            Criterion::new("page_limits", "Page limits", 0.5),
        ]
    }

    fn raw(pairs: &[(&str, f64)]) -> CriterionScores {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_classify_boundaries_are_inclusive() {
        assert_eq!(classify(0.9, THRESHOLDS), TrafficLight::Green);
        assert_eq!(classify(0.9 - 1e-9, THRESHOLDS), TrafficLight::Yellow);
        assert_eq!(classify(0.7, THRESHOLDS), TrafficLight::Yellow);
        assert_eq!(classify(0.7 - 1e-9, THRESHOLDS), TrafficLight::Red);
    }

    #[test]
    fn test_weighted_mean() {
        let scorer = WeightedScorer::new(THRESHOLDS);

        let (score, per) = scorer.score(&criteria(), &raw(&[("section_coverage", 0.0), ("page_limits", 1.0)]));
        assert_eq!(score, 0.5);
        assert_eq!(per[0].traffic_light, TrafficLight::Red);
        assert_eq!(per[1].traffic_light, TrafficLight::Green);

        let (score, _) = scorer.score(&criteria(), &raw(&[("section_coverage", 1.0), ("page_limits", 0.5)]));
        assert_eq!(score, 0.75);
    }

    #[test]
    fn test_missing_criterion_is_neutral() {
        let scorer = WeightedScorer::new(THRESHOLDS);
        let (score, per) = scorer.score(&criteria(), &raw(&[("section_coverage", 1.0)]));
        assert_eq!(score, 0.75);
        assert_eq!(per[1].score, NEUTRAL_SCORE);
    }

    #[test]
    fn test_weight_drift_is_normalized() {
        let scorer = WeightedScorer::new(THRESHOLDS);
        let drifted = vec![
            Criterion::new("a", "A", 0.6),
            Criterion::new("b", "B", 0.6),
        ];
        let (score, _) = scorer.score(&drifted, &raw(&[("a", 1.0), ("b", 1.0)]));
        assert!((score - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_out_of_range_scores_are_clamped() {
        let scores = raw(&[("a", 3.0), ("b", f64::NAN)]);
        assert_eq!(raw_score(&scores, "a"), 1.0);
        assert_eq!(raw_score(&scores, "b"), NEUTRAL_SCORE);
    }

    #[test]
    fn test_round_score() {
        assert_eq!(round_score(0.66666), 0.667);
        assert_eq!(round_score(0.1234), 0.123);
    }

    proptest! {
        #[test]
        fn prop_section_score_in_unit_interval(
            entries in prop::collection::vec((0.001f64..=1.0, 0.0f64..=1.0), 1..8)
        ) {
            let criteria: Vec<Criterion> = entries
                .iter()
                .enumerate()
                .map(|(i, (w, _))| Criterion::new(format!("c{}", i), "C", *w))
                .collect();
            let scores: CriterionScores = entries
                .iter()
                .enumerate()
                .map(|(i, (_, s))| (format!("c{}", i), *s))
                .collect();

            let (score, per) = WeightedScorer::new(THRESHOLDS).score(&criteria, &scores);
            prop_assert!((0.0..=1.0).contains(&score));
            prop_assert_eq!(per.len(), criteria.len());
        }

        #[test]
        fn prop_traffic_light_is_monotonic(a in 0.0f64..=1.0, b in 0.0f64..=1.0) {
            let rank = |light: TrafficLight| match light {
                TrafficLight::Red => 0,
                TrafficLight::Yellow => 1,
                TrafficLight::Green => 2,
            };
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(rank(classify(lo, THRESHOLDS)) <= rank(classify(hi, THRESHOLDS)));
        }
    }
}
