//! Criterion set parsing from YAML/JSON.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::defaults::default_criterion_set;
use super::schema::validate_config_schema;
use crate::types::ReviewCategory;

/// Tolerance used when checking that weights sum to 1.0.
const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Pass threshold used when a document omits one.
const DEFAULT_PASS_THRESHOLD: f64 = 0.80;

/// Gap between the green and yellow thresholds when `scoring.yellow` is omitted.
const DEFAULT_YELLOW_GAP: f64 = 0.15;

/// Errors that can occur when loading review criteria.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read criteria file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Unknown review category '{0}' (expected one of: pink, red, gold, white)")]
    UnknownCategory(String),

    #[error("Criteria document failed schema validation: {}", .0.join("; "))]
    SchemaError(Vec<String>),

    #[error("Invalid criterion set for {category}: {reason}")]
    ValidationError {
        category: ReviewCategory,
        reason: String,
    },
}

/// A single weighted criterion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Criterion {
    /// Identifier the category evaluator scores against (e.g. "page_limits")
    pub id: String,

    /// Display label
    pub label: String,

    /// Relative weight in (0, 1]
    pub weight: f64,

    /// When set, a score below 0.50 is a deficiency rather than a weakness
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail_condition: Option<String>,
}

impl Criterion {
    pub fn new(id: impl Into<String>, label: impl Into<String>, weight: f64) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            weight,
            fail_condition: None,
        }
    }

    /// Attach a fail condition.
    pub fn with_fail_condition(mut self, condition: impl Into<String>) -> Self {
        self.fail_condition = Some(condition.into());
        self
    }
}

/// Traffic-light thresholds. Invariant: `0 <= yellow <= green <= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub green: f64,
    pub yellow: f64,
}

/// Weighted criteria and thresholds for one review category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionSet {
    pub category: ReviewCategory,
    pub description: String,
    pub criteria: Vec<Criterion>,
    pub pass_threshold: f64,
    pub green_threshold: f64,
    pub yellow_threshold: f64,
}

impl CriterionSet {
    /// Build and validate a criterion set.
    pub fn new(
        category: ReviewCategory,
        description: impl Into<String>,
        criteria: Vec<Criterion>,
        pass_threshold: f64,
        thresholds: Thresholds,
    ) -> Result<Self, ConfigError> {
        let set = Self {
            category,
            description: description.into(),
            criteria,
            pass_threshold,
            green_threshold: thresholds.green,
            yellow_threshold: thresholds.yellow,
        };
        set.validate()?;
        Ok(set)
    }

    pub fn thresholds(&self) -> Thresholds {
        Thresholds {
            green: self.green_threshold,
            yellow: self.yellow_threshold,
        }
    }

    pub fn total_weight(&self) -> f64 {
        self.criteria.iter().map(|c| c.weight).sum()
    }

    pub fn criterion(&self, id: &str) -> Option<&Criterion> {
        self.criteria.iter().find(|c| c.id == id)
    }

    /// Check the structural invariants. Weight drift only warns.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: String| ConfigError::ValidationError {
            category: self.category,
            reason,
        };

        if self.criteria.is_empty() {
            return Err(invalid("criteria list is empty".to_string()));
        }

        let mut seen = HashSet::new();
        for criterion in &self.criteria {
            if criterion.id.trim().is_empty() {
                return Err(invalid("criterion id must not be empty".to_string()));
            }
            if !seen.insert(criterion.id.as_str()) {
                return Err(invalid(format!("duplicate criterion id: {}", criterion.id)));
            }
            if !criterion.weight.is_finite() || criterion.weight <= 0.0 || criterion.weight > 1.0 {
                return Err(invalid(format!(
                    "weight {} for criterion '{}' is outside (0, 1]",
                    criterion.weight, criterion.id
                )));
            }
        }

        if !in_unit_range(self.pass_threshold) {
            return Err(invalid(format!(
                "pass_threshold {} is outside [0, 1]",
                self.pass_threshold
            )));
        }

        if !in_unit_range(self.yellow_threshold)
            || !in_unit_range(self.green_threshold)
            || self.yellow_threshold > self.green_threshold
        {
            return Err(invalid(format!(
                "thresholds must satisfy 0 <= yellow ({}) <= green ({}) <= 1",
                self.yellow_threshold, self.green_threshold
            )));
        }

        let total = self.total_weight();
        if (total - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            tracing::warn!(
                category = %self.category,
                total_weight = total,
                "Criterion weights do not sum to 1.0; scores are normalized by the declared total"
            );
        }

        Ok(())
    }
}

fn in_unit_range(value: f64) -> bool {
    value.is_finite() && (0.0..=1.0).contains(&value)
}

/// `scoring` block of a criteria document.
#[derive(Debug, Clone, Default, Deserialize)]
struct ScoringDocument {
    #[serde(default)]
    green: Option<f64>,

    #[serde(default)]
    yellow: Option<f64>,
}

/// One category entry of a criteria document, before validation.
#[derive(Debug, Clone, Deserialize)]
struct CriterionSetDocument {
    #[serde(default)]
    description: String,

    criteria: Vec<Criterion>,

    #[serde(default)]
    pass_threshold: Option<f64>,

    #[serde(default)]
    scoring: Option<ScoringDocument>,
}

impl CriterionSetDocument {
    fn into_criterion_set(self, category: ReviewCategory) -> Result<CriterionSet, ConfigError> {
        let pass_threshold = self.pass_threshold.unwrap_or(DEFAULT_PASS_THRESHOLD);
        let scoring = self.scoring.unwrap_or_default();
        let green = scoring.green.unwrap_or(pass_threshold);
        let yellow = scoring
            .yellow
            .unwrap_or_else(|| (green - DEFAULT_YELLOW_GAP).max(0.0));

        CriterionSet::new(
            category,
            self.description,
            self.criteria,
            pass_threshold,
            Thresholds { green, yellow },
        )
    }
}

/// The full review configuration: one criterion set per category.
///
/// Categories a document leaves out fall back to the built-in defaults, so
/// a configuration always covers all four categories.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewConfig {
    sets: BTreeMap<ReviewCategory, CriterionSet>,
}

impl ReviewConfig {
    /// Built-in defaults for every category.
    pub fn builtin() -> Self {
        let sets = ReviewCategory::ALL
            .iter()
            .map(|category| (*category, default_criterion_set(*category)))
            .collect();
        Self { sets }
    }

    /// Parse a criteria document from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let value: serde_json::Value = serde_yaml::from_str(yaml)?;
        Self::from_value(value)
    }

    /// Parse a criteria document from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Parse a criteria document from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Parse a criteria document from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Parse a file, choosing the format by extension (`.json`, else YAML).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        if is_json {
            Self::from_json_file(path)
        } else {
            Self::from_yaml_file(path)
        }
    }

    fn from_value(value: serde_json::Value) -> Result<Self, ConfigError> {
        // An empty document means "use the defaults".
        let value = if value.is_null() {
            serde_json::Value::Object(serde_json::Map::new())
        } else {
            value
        };

        validate_config_schema(&value).map_err(ConfigError::SchemaError)?;

        let documents: BTreeMap<String, CriterionSetDocument> = serde_json::from_value(value)?;
        let mut config = Self::builtin();
        let mut seen: BTreeMap<ReviewCategory, String> = BTreeMap::new();

        for (key, document) in documents {
            let category = ReviewCategory::from_config_key(&key)?;
            if let Some(previous) = seen.insert(category, key.clone()) {
                return Err(ConfigError::ValidationError {
                    category,
                    reason: format!("category defined more than once ({}, {})", previous, key),
                });
            }
            let set = document.into_criterion_set(category)?;
            tracing::debug!(
                category = %category,
                criteria = set.criteria.len(),
                pass_threshold = set.pass_threshold,
                "Loaded criterion set"
            );
            config.sets.insert(category, set);
        }

        Ok(config)
    }

    /// Replace one category's criterion set (used to inject fixtures).
    pub fn with_criterion_set(mut self, set: CriterionSet) -> Self {
        self.sets.insert(set.category, set);
        self
    }

    /// Look up a category by name.
    pub fn load(&self, category: &str) -> Result<&CriterionSet, ConfigError> {
        let category: ReviewCategory = category.parse()?;
        Ok(self.criterion_set(category))
    }

    pub fn criterion_set(&self, category: ReviewCategory) -> &CriterionSet {
        // Every category is populated by construction.
        &self.sets[&category]
    }

    pub fn iter(&self) -> impl Iterator<Item = &CriterionSet> {
        self.sets.values()
    }
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self::builtin()
    }
}
