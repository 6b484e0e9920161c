//! Proposal, section and context providers.
//!
//! The engine reads proposals through [`ProposalSource`]. The bundled
//! [`InMemoryProposalSource`] serves everything from one YAML document:
//!
//! ```yaml
//! acronyms: [SLA, PMO]
//! proposals:
//!   - id: PROP-001
//!     classification: "CUI // SP-PROPIN"
//!     sections:
//!       - id: s1
//!         volume: technical
//!         section_number: "1.1"
//!         section_title: Technical Approach
//!         content: "..."
//!     compliance: [...]
//!     evaluation_factors: [...]
//!     win_themes: [...]
//!     security_alerts: [...]
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::context::{ComplianceRow, ReviewContext, SecurityAlert, WinTheme};
use crate::types::{Proposal, ReviewCategory, Section};

/// Errors loading a proposal bundle.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Failed to read proposal file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse proposal YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Duplicate proposal id '{0}'")]
    DuplicateProposal(String),

    #[error("Proposal source unavailable: {0}")]
    Unavailable(String),
}

/// Source of proposals, their sections and category context.
///
/// `Err` means the backing source failed; an absent proposal is `Ok(None)`.
pub trait ProposalSource: Send + Sync {
    fn load_proposal(&self, proposal_id: &str) -> Result<Option<Proposal>, ProviderError>;

    /// Sections of a proposal, in any order.
    fn load_sections(&self, proposal_id: &str) -> Result<Vec<Section>, ProviderError>;

    /// Context needed by one category's evaluator.
    fn load_context(
        &self,
        proposal: &Proposal,
        category: ReviewCategory,
    ) -> Result<ReviewContext, ProviderError>;
}

/// One proposal with everything the evaluators may consult.
#[derive(Debug, Clone, Deserialize)]
pub struct ProposalRecord {
    #[serde(flatten)]
    pub proposal: Proposal,

    #[serde(default)]
    pub sections: Vec<Section>,

    #[serde(default)]
    pub compliance: Vec<ComplianceRow>,

    #[serde(default)]
    pub evaluation_factors: Vec<String>,

    #[serde(default)]
    pub win_themes: Vec<WinTheme>,

    #[serde(default)]
    pub security_alerts: Vec<SecurityAlert>,
}

#[derive(Debug, Deserialize)]
struct ProposalBundle {
    #[serde(default)]
    acronyms: Option<Vec<String>>,

    #[serde(default)]
    proposals: Vec<ProposalRecord>,
}

/// Proposals held in memory, optionally loaded from a YAML bundle.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProposalSource {
    records: BTreeMap<String, ProposalRecord>,
    acronyms: Option<BTreeSet<String>>,
}

impl InMemoryProposalSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, ProviderError> {
        let bundle: ProposalBundle = serde_yaml::from_str(yaml)?;
        let mut source = Self::new();
        if let Some(acronyms) = bundle.acronyms {
            source = source.with_acronyms(acronyms);
        }
        for mut record in bundle.proposals {
            for section in &mut record.sections {
                if section.word_count == 0 {
                    section.word_count = section.content.split_whitespace().count() as u32;
                }
            }
            if source.records.contains_key(&record.proposal.id) {
                return Err(ProviderError::DuplicateProposal(record.proposal.id));
            }
            source = source.with_record(record);
        }
        Ok(source)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ProviderError> {
        let contents = fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Add or replace a proposal.
    pub fn with_record(mut self, record: ProposalRecord) -> Self {
        self.records.insert(record.proposal.id.clone(), record);
        self
    }

    /// Add a proposal with sections and no other context.
    pub fn with_proposal(self, proposal: Proposal, sections: Vec<Section>) -> Self {
        self.with_record(ProposalRecord {
            proposal,
            sections,
            compliance: vec![],
            evaluation_factors: vec![],
            win_themes: vec![],
            security_alerts: vec![],
        })
    }

    /// Set the shared acronym registry (uppercased).
    pub fn with_acronyms<I, S>(mut self, acronyms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.acronyms = Some(
            acronyms
                .into_iter()
                .map(|a| a.as_ref().trim().to_uppercase())
                .collect(),
        );
        self
    }

    pub fn proposal_ids(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }
}

impl ProposalSource for InMemoryProposalSource {
    fn load_proposal(&self, proposal_id: &str) -> Result<Option<Proposal>, ProviderError> {
        Ok(self.records.get(proposal_id).map(|r| r.proposal.clone()))
    }

    fn load_sections(&self, proposal_id: &str) -> Result<Vec<Section>, ProviderError> {
        Ok(self
            .records
            .get(proposal_id)
            .map(|r| r.sections.clone())
            .unwrap_or_default())
    }

    fn load_context(
        &self,
        proposal: &Proposal,
        category: ReviewCategory,
    ) -> Result<ReviewContext, ProviderError> {
        let Some(record) = self.records.get(&proposal.id) else {
            return Ok(ReviewContext::new());
        };

        let mut context = ReviewContext::new();
        match category {
            ReviewCategory::Pink => {
                context.compliance_rows = record.compliance.clone();
            }
            ReviewCategory::Red => {
                context.evaluation_factors = record.evaluation_factors.clone();
                context.win_themes = record.win_themes.clone();
            }
            ReviewCategory::Gold => {
                context.win_themes = record.win_themes.clone();
            }
            ReviewCategory::White => {
                context.security_alerts = record.security_alerts.clone();
                context.acronym_registry = self.acronyms.clone();
            }
        }
        Ok(context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{AlertStatus, ComplianceStatus};
    use crate::types::SectionStatus;

    const BUNDLE: &str = r#"
acronyms: [sla, PMO]
proposals:
  - id: PROP-001
    title: Enterprise IT Modernization
    classification: "CUI // SP-PROPIN"
    sections:
      - id: s1
        volume: technical
        section_number: "1.1"
        section_title: Technical Approach
        content: "CUI // SP-PROPIN. Our approach."
        word_count: 4
        page_count: 3
        page_limit: 5
        status: final
    compliance:
      - requirement_id: L-1
        requirement_text: Describe the technical approach
        section_number: "1.1"
        compliance_status: fully_addressed
    evaluation_factors:
      - Technical Approach
    win_themes:
      - id: WT-1
        theme_text: Proven modernization delivering measurable savings
    security_alerts:
      - id: CA-1
        severity: HIGH
        status: quarantined
"#;

    #[test]
    fn test_load_bundle() {
        let source = InMemoryProposalSource::from_yaml(BUNDLE).unwrap();
        let proposal = source.load_proposal("PROP-001").unwrap().unwrap();
        assert_eq!(proposal.title.as_deref(), Some("Enterprise IT Modernization"));

        let sections = source.load_sections("PROP-001").unwrap();
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].status, SectionStatus::Final);
        assert_eq!(sections[0].page_limit, Some(5.0));

        assert!(source.load_proposal("PROP-404").unwrap().is_none());
        assert!(source.load_sections("PROP-404").unwrap().is_empty());
    }

    #[test]
    fn test_context_is_category_specific() {
        let source = InMemoryProposalSource::from_yaml(BUNDLE).unwrap();
        let proposal = source.load_proposal("PROP-001").unwrap().unwrap();

        let pink = source.load_context(&proposal, ReviewCategory::Pink).unwrap();
        assert_eq!(pink.compliance_rows.len(), 1);
        assert_eq!(pink.compliance_rows[0].compliance_status, ComplianceStatus::FullyAddressed);
        assert!(pink.win_themes.is_empty());

        let red = source.load_context(&proposal, ReviewCategory::Red).unwrap();
        assert_eq!(red.evaluation_factors, vec!["Technical Approach".to_string()]);
        assert_eq!(red.win_themes.len(), 1);

        let white = source.load_context(&proposal, ReviewCategory::White).unwrap();
        assert_eq!(white.security_alerts[0].status, AlertStatus::Quarantined);
        assert!(white.acronym_registry.unwrap().contains("SLA"));
    }

    #[test]
    fn test_word_count_derived_when_omitted() {
        let yaml = r#"
proposals:
  - id: P-1
    sections:
      - id: s1
        volume: technical
        section_number: "1"
        section_title: Approach
        content: "three words here"
"#;
        let source = InMemoryProposalSource::from_yaml(yaml).unwrap();
        assert_eq!(source.load_sections("P-1").unwrap()[0].word_count, 3);

        let explicit = InMemoryProposalSource::from_yaml(BUNDLE).unwrap();
        assert_eq!(explicit.load_sections("PROP-001").unwrap()[0].word_count, 4);
    }

    #[test]
    fn test_duplicate_proposal_rejected() {
        let yaml = r#"
proposals:
  - id: P-1
  - id: P-1
"#;
        assert!(matches!(
            InMemoryProposalSource::from_yaml(yaml),
            Err(ProviderError::DuplicateProposal(id)) if id == "P-1"
        ));
    }
}
