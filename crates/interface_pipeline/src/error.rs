//! Pipeline error handling

use thiserror::Error;

use core_kernel::MoneyError;
use domain_guiding::GuidingFailure;
use domain_metering::ImportError;
use domain_rating::RatingError;

/// Errors raised while running the pipeline
///
/// Per-record failures (`Import`, `Guiding`, `Rating`) are reported next to
/// the successful records of a batch; they never abort the batch.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Import failed: {0}")]
    Import(#[from] ImportError),

    #[error(transparent)]
    Guiding(#[from] GuidingFailure),

    #[error("Rating failed: {0}")]
    Rating(#[from] RatingError),

    #[error("Summary error: {0}")]
    Money(#[from] MoneyError),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Worker task failed: {0}")]
    Worker(String),
}

impl PipelineError {
    pub fn configuration(message: impl Into<String>) -> Self {
        PipelineError::Configuration(message.into())
    }

    /// Short name of the stage that failed, for logs and summaries
    pub fn stage(&self) -> &'static str {
        match self {
            PipelineError::Import(_) => "import",
            PipelineError::Guiding(_) => "guiding",
            PipelineError::Rating(_) => "rating",
            PipelineError::Money(_) => "summary",
            PipelineError::Configuration(_) => "configuration",
            PipelineError::Worker(_) => "worker",
        }
    }
}

impl From<config::ConfigError> for PipelineError {
    fn from(err: config::ConfigError) -> Self {
        PipelineError::Configuration(err.to_string())
    }
}

impl From<validator::ValidationErrors> for PipelineError {
    fn from(err: validator::ValidationErrors) -> Self {
        PipelineError::Configuration(err.to_string())
    }
}

impl From<tokio::task::JoinError> for PipelineError {
    fn from(err: tokio::task::JoinError) -> Self {
        PipelineError::Worker(err.to_string())
    }
}
