//! Billing Pipeline Runner
//!
//! This crate wires the metering, guiding and rating domains into a runnable
//! pipeline.
//!
//! # Architecture
//!
//! - **Config**: `PipelineConfig`, loaded from `billing.toml` and `BILLING_*`
//!   environment variables
//! - **Pipeline**: `BillingPipeline`, sequential and parallel batch processing
//! - **Summary**: per-batch totals
//! - **Telemetry**: tracing subscriber setup
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_pipeline::{BillingPipeline, PipelineConfig};
//!
//! let config = PipelineConfig::load()?;
//! let pipeline = BillingPipeline::from_config(&config)?;
//! let results = pipeline.process_batch_parallel(records).await?;
//! ```

pub mod config;
pub mod error;
pub mod pipeline;
pub mod summary;
pub mod telemetry;

pub use config::{CustomerEntry, LogFormat, PipelineConfig, ProductEntry};
pub use error::PipelineError;
pub use pipeline::{BillingPipeline, RecordResult};
pub use summary::BatchSummary;
pub use telemetry::init_tracing;
