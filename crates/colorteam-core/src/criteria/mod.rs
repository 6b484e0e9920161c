//! Review criteria configuration.
//!
//! Criterion sets are process-wide configuration: parsed from YAML/JSON,
//! validated against the embedded JSON Schema and semantic invariants,
//! then treated as immutable for the duration of a run.

mod defaults;
mod parser;
mod schema;

pub use defaults::default_criterion_set;
pub use parser::{ConfigError, Criterion, CriterionSet, ReviewConfig, Thresholds};
