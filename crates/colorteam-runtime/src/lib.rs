//! # colorteam-runtime
//!
//! Async orchestration for colorteam reviews.
//!
//! `colorteam-core` runs a review as one synchronous call chain. This crate
//! hosts that engine on tokio: section scoring fans out across blocking
//! workers with bounded parallelism, outcomes merge back in canonical
//! section order, and an optional deadline bounds each run.
//!
//! Parallel and sequential runs produce identical scores.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use colorteam_runtime::{ReviewOrchestrator, RuntimeConfig};
//!
//! let config = RuntimeConfig::from_yaml_file("runtime.yaml")?;
//! let orchestrator = ReviewOrchestrator::new(Arc::new(engine), config)?;
//!
//! let result = orchestrator.run_review("PROP-001", ReviewCategory::Red).await?;
//! ```

pub mod config;
pub mod inflight;
pub mod orchestrator;

pub use config::RuntimeConfig;
pub use inflight::{InFlightRuns, RunGuard};
pub use orchestrator::ReviewOrchestrator;

use std::time::Duration;

use colorteam_core::{ReviewCategory, ReviewError};
use thiserror::Error;

/// Errors from the runtime.
#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error(transparent)]
    Review(#[from] ReviewError),

    #[error("Review run exceeded its deadline of {0:?}")]
    DeadlineExceeded(Duration),

    #[error("A {category} review of {proposal} is already running")]
    RunInProgress {
        proposal: String,
        category: ReviewCategory,
    },

    #[error("Worker failed: {0}")]
    Worker(String),

    #[error("Invalid runtime config: {0}")]
    Config(String),
}
