//! JSON Schema validation for criteria documents.
//!
//! Documents are validated against schema/review-config.schema.json before
//! typed deserialization, so structural mistakes are reported with their
//! location instead of as a generic serde error.

use std::sync::OnceLock;
use thiserror::Error;

/// Embedded criteria schema (loaded at compile time).
const CONFIG_SCHEMA_JSON: &str = include_str!("../../../../schema/review-config.schema.json");

/// Compiled JSON Schema validator (initialized once, reused).
static COMPILED_SCHEMA: OnceLock<Result<jsonschema::Validator, String>> = OnceLock::new();

/// Errors from schema loading.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Failed to load schema: {0}")]
    LoadError(String),
}

fn get_validator() -> Result<&'static jsonschema::Validator, SchemaError> {
    let result = COMPILED_SCHEMA.get_or_init(|| {
        let schema_value: serde_json::Value = serde_json::from_str(CONFIG_SCHEMA_JSON)
            .map_err(|e| format!("Invalid schema JSON: {}", e))?;

        jsonschema::options()
            .build(&schema_value)
            .map_err(|e| format!("Failed to compile schema: {}", e))
    });

    result
        .as_ref()
        .map_err(|e| SchemaError::LoadError(e.clone()))
}

/// Validate a criteria document against the schema.
///
/// Returns every violation, each suffixed with its instance path.
pub fn validate_config_schema(document: &serde_json::Value) -> Result<(), Vec<String>> {
    let validator = get_validator().map_err(|e| vec![e.to_string()])?;

    let errors: Vec<String> = validator
        .iter_errors(document)
        .map(|e| format!("{} at {}", e, e.instance_path))
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_document_passes_schema() {
        let value = serde_json::json!({
            "pink_team": {
                "description": "Compliance",
                "criteria": [
                    { "id": "section_coverage", "label": "Sections present", "weight": 0.5,
                      "fail_condition": "Required section missing" },
                    { "id": "page_limits", "label": "Page limits", "weight": 0.5 }
                ],
                "pass_threshold": 0.9,
                "scoring": { "green": 0.9, "yellow": 0.7, "red": 0.7 }
            }
        });
        assert!(validate_config_schema(&value).is_ok());
    }

    #[test]
    fn test_missing_criteria_fails() {
        let value = serde_json::json!({ "red": { "pass_threshold": 0.8 } });
        let errors = validate_config_schema(&value).unwrap_err();
        assert!(!errors.is_empty());
    }

    #[test]
    fn test_non_numeric_weight_fails() {
        let value = serde_json::json!({
            "gold": { "criteria": [ { "id": "storytelling", "label": "Story", "weight": "high" } ] }
        });
        assert!(validate_config_schema(&value).is_err());
    }

    #[test]
    fn test_unknown_field_fails() {
        let value = serde_json::json!({
            "white": {
                "criteria": [ { "id": "acronyms", "label": "Acronyms", "weight": 1.0 } ],
                "reviewers": ["alice"]
            }
        });
        assert!(validate_config_schema(&value).is_err());
    }

    #[test]
    fn test_bad_criterion_id_fails() {
        let value = serde_json::json!({
            "white": { "criteria": [ { "id": "Has Spaces", "label": "X", "weight": 1.0 } ] }
        });
        assert!(validate_config_schema(&value).is_err());
    }
}
