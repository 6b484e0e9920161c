//! Supporting context consumed by the category evaluators.
//!
//! All of it is optional. An evaluator that lacks the context a criterion
//! needs leaves that criterion unscored, and the scorer substitutes the
//! neutral default.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Compliance status of one solicitation requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceStatus {
    #[default]
    NotAddressed,
    PartiallyAddressed,
    FullyAddressed,
    NotApplicable,
}

impl ComplianceStatus {
    /// Fully or partially addressed requirements count as covered.
    pub fn is_addressed(&self) -> bool {
        matches!(
            self,
            ComplianceStatus::FullyAddressed | ComplianceStatus::PartiallyAddressed
        )
    }
}

/// A compliance matrix row mapping a requirement to a section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceRow {
    pub requirement_id: String,

    #[serde(default)]
    pub requirement_text: String,

    #[serde(default)]
    pub section_number: Option<String>,

    #[serde(default)]
    pub compliance_status: ComplianceStatus,
}

/// A win theme the proposal aims to reinforce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WinTheme {
    #[serde(default)]
    pub id: Option<String>,

    pub theme_text: String,
}

/// Lifecycle status of a classification aggregation alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertStatus {
    #[default]
    Open,
    Acknowledged,
    Resolved,
    Overridden,
    Quarantined,
    FalsePositive,
}

impl AlertStatus {
    /// Open and quarantined alerts block release.
    pub fn is_unresolved(&self) -> bool {
        matches!(self, AlertStatus::Open | AlertStatus::Quarantined)
    }
}

/// A security/classification alert raised against the proposal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityAlert {
    pub id: String,

    #[serde(default)]
    pub severity: Option<String>,

    #[serde(default)]
    pub status: AlertStatus,
}

/// Category-specific context for one review run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewContext {
    /// Compliance matrix rows (pink)
    #[serde(default)]
    pub compliance_rows: Vec<ComplianceRow>,

    /// Parsed evaluation factors from Section M (red)
    #[serde(default)]
    pub evaluation_factors: Vec<String>,

    /// Win themes for the proposal or its opportunity (red, gold)
    #[serde(default)]
    pub win_themes: Vec<WinTheme>,

    /// Security/classification alerts tied to the proposal (white)
    #[serde(default)]
    pub security_alerts: Vec<SecurityAlert>,

    /// Known acronyms, uppercase; `None` when no registry is available (white)
    #[serde(default)]
    pub acronym_registry: Option<BTreeSet<String>>,

    /// Section numbers present in the proposal, for cross-reference checks (white)
    #[serde(default)]
    pub known_section_numbers: BTreeSet<String>,
}

impl ReviewContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_compliance_rows(mut self, rows: Vec<ComplianceRow>) -> Self {
        self.compliance_rows = rows;
        self
    }

    pub fn with_evaluation_factors(mut self, factors: Vec<String>) -> Self {
        self.evaluation_factors = factors;
        self
    }

    pub fn with_win_themes(mut self, themes: Vec<WinTheme>) -> Self {
        self.win_themes = themes;
        self
    }

    pub fn with_security_alerts(mut self, alerts: Vec<SecurityAlert>) -> Self {
        self.security_alerts = alerts;
        self
    }

    /// Set the acronym registry; entries are uppercased.
    pub fn with_acronyms<I, S>(mut self, acronyms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.acronym_registry = Some(
            acronyms
                .into_iter()
                .map(|a| a.as_ref().trim().to_uppercase())
                .collect(),
        );
        self
    }

    pub fn has_unresolved_alerts(&self) -> bool {
        self.security_alerts.iter().any(|a| a.status.is_unresolved())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acronyms_uppercased() {
        let ctx = ReviewContext::new().with_acronyms(["sla", " KPI "]);
        let registry = ctx.acronym_registry.unwrap();
        assert!(registry.contains("SLA"));
        assert!(registry.contains("KPI"));
    }

    #[test]
    fn test_unresolved_alerts() {
        let resolved = SecurityAlert {
            id: "CA-1".to_string(),
            severity: None,
            status: AlertStatus::Resolved,
        };
        let quarantined = SecurityAlert {
            id: "CA-2".to_string(),
            severity: Some("HIGH".to_string()),
            status: AlertStatus::Quarantined,
        };

        let ctx = ReviewContext::new().with_security_alerts(vec![resolved.clone()]);
        assert!(!ctx.has_unresolved_alerts());

        let ctx = ReviewContext::new().with_security_alerts(vec![resolved, quarantined]);
        assert!(ctx.has_unresolved_alerts());
    }
}
