//! Shared detection patterns and indicator tables for the evaluators.
//!
//! Indicator phrases are matched against lowercased section text. Each
//! table is paired with a saturation count in the evaluator that uses it,
//! so a handful of hits already yields a full score.

use lazy_static::lazy_static;
use regex::Regex;

// =========================================================================
// RED TEAM INDICATORS
// =========================================================================

pub const STRENGTH_INDICATORS: &[&str] = &[
    "strength",
    "advantage",
    "proven",
    "demonstrated",
    "successfully",
    "exceeded",
    "exceptional",
];

pub const MITIGATION_INDICATORS: &[&str] = &[
    "mitigat",
    "address",
    "overcom",
    "resolv",
    "risk reduction",
    "contingency",
    "backup plan",
];

pub const DIFFERENTIATION_INDICATORS: &[&str] = &[
    "unique",
    "differentiator",
    "only provider",
    "unlike",
    "competitive advantage",
    "proprietary",
    "innovative",
];

// =========================================================================
// GOLD TEAM INDICATORS
// =========================================================================

pub const CUSTOMER_INDICATORS: &[&str] = &[
    "your mission",
    "your requirement",
    "agency's",
    "customer",
    "stakeholder",
    "mission success",
    "operational need",
    "your team",
];

pub const NARRATIVE_INDICATORS: &[&str] = &[
    "for example",
    "as demonstrated",
    "consider",
    "imagine",
    "result was",
    "outcome",
    "impact",
    "success story",
    "case study",
    "scenario",
];

// =========================================================================
// WHITE TEAM TABLES
// =========================================================================

/// Short uppercase words that are not acronyms.
pub const NON_ACRONYMS: &[&str] = &[
    "THE", "AND", "FOR", "NOT", "BUT", "ALL", "HAS", "WAS", "ARE", "CAN", "OUR", "HIS", "HER",
    "ITS", "MAY", "USE",
];

/// Marking assumed when the proposal declares none.
pub const DEFAULT_CLASSIFICATION_MARKING: &str = "CUI // SP-PROPIN";

lazy_static! {
    /// Knowledge base references (KB-1a2b)
    pub static ref KB_REFERENCE_PATTERN: Regex = Regex::new(
        r"(?i)\bKB-[a-f0-9]+"
    ).unwrap();

    /// Past performance references (PP-00ff)
    pub static ref PP_REFERENCE_PATTERN: Regex = Regex::new(
        r"(?i)\bPP-[a-f0-9]+"
    ).unwrap();

    /// Quantitative tokens: percentages, dollar amounts, SLA/KPI mentions
    pub static ref METRIC_PATTERN: Regex = Regex::new(
        r"\d+%|\$[\d,]+|\bSLA\b|\bKPI\b"
    ).unwrap();

    /// Figure, table and exhibit references
    pub static ref GRAPHIC_PATTERN: Regex = Regex::new(
        r"(?i)figure\s+\d+|table\s+\d+|exhibit\s+\d+|graphic"
    ).unwrap();

    /// "Section 3.2" style cross-references; group 1 is the section number
    pub static ref CROSS_REFERENCE_PATTERN: Regex = Regex::new(
        r"[Ss]ection\s+(\d+(?:\.\d+)*)"
    ).unwrap();

    /// Candidate acronyms: 2-6 uppercase letters
    pub static ref ACRONYM_PATTERN: Regex = Regex::new(
        r"\b[A-Z]{2,6}\b"
    ).unwrap();
}

/// Count evidentiary references: KB/PP identifiers plus quantitative tokens.
pub fn count_evidence(content: &str) -> usize {
    KB_REFERENCE_PATTERN.find_iter(content).count()
        + PP_REFERENCE_PATTERN.find_iter(content).count()
        + METRIC_PATTERN.find_iter(content).count()
}

/// Count figure/table/exhibit references.
pub fn count_graphics(content: &str) -> usize {
    GRAPHIC_PATTERN.find_iter(content).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evidence_detection() {
        assert_eq!(count_evidence("See KB-3f9a and PP-00c1."), 2);
        assert_eq!(count_evidence("Reduced cost by 23% saving $1,200,000"), 2);
        assert_eq!(count_evidence("We track every SLA and KPI monthly"), 2);
        assert_eq!(count_evidence("No references here"), 0);
    }

    #[test]
    fn test_reference_ids_must_be_hex() {
        assert_eq!(count_evidence("KB-zzzz"), 0);
        assert_eq!(count_evidence("kb-ab12"), 1);
    }

    #[test]
    fn test_graphics_detection() {
        assert_eq!(count_graphics("As shown in Figure 3 and Table 2"), 2);
        assert_eq!(count_graphics("Exhibit 12 summarizes the graphic"), 2);
        assert_eq!(count_graphics("figure it out"), 0);
    }

    #[test]
    fn test_cross_reference_capture() {
        let refs: Vec<&str> = CROSS_REFERENCE_PATTERN
            .captures_iter("See Section 2.1 and section 4")
            .filter_map(|c| c.get(1))
            .map(|m| m.as_str())
            .collect();
        assert_eq!(refs, vec!["2.1", "4"]);
    }
}
