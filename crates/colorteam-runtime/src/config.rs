//! Runtime configuration.
//!
//! ```yaml
//! max_parallel_sections: 8
//! run_deadline: 30s
//! allow_concurrent_runs: false
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::RuntimeError;

/// Orchestration settings for review runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Sections scored concurrently within one run
    pub max_parallel_sections: usize,

    /// Deadline for loading and scoring one run (e.g. "30s", "2m")
    #[serde(with = "humantime_opt", skip_serializing_if = "Option::is_none")]
    pub run_deadline: Option<Duration>,

    /// Whether two runs of the same proposal and category may overlap
    pub allow_concurrent_runs: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            max_parallel_sections: 4,
            run_deadline: None,
            allow_concurrent_runs: false,
        }
    }
}

impl RuntimeConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self, RuntimeError> {
        let config: Self =
            serde_yaml::from_str(yaml).map_err(|e| RuntimeError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, RuntimeError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|e| RuntimeError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_yaml(&contents)
    }

    pub fn with_max_parallel_sections(mut self, max: usize) -> Self {
        self.max_parallel_sections = max;
        self
    }

    pub fn with_run_deadline(mut self, deadline: Duration) -> Self {
        self.run_deadline = Some(deadline);
        self
    }

    pub fn with_concurrent_runs(mut self, allow: bool) -> Self {
        self.allow_concurrent_runs = allow;
        self
    }

    pub fn validate(&self) -> Result<(), RuntimeError> {
        if self.max_parallel_sections == 0 {
            return Err(RuntimeError::Config(
                "max_parallel_sections must be at least 1".to_string(),
            ));
        }
        if self.run_deadline == Some(Duration::ZERO) {
            return Err(RuntimeError::Config(
                "run_deadline must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

mod humantime_opt {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match duration {
            Some(d) => serializer.serialize_str(&humantime::format_duration(*d).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        raw.map(|s| humantime::parse_duration(s.trim()).map_err(serde::de::Error::custom))
            .transpose()
    }
}
