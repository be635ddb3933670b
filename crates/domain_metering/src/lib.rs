//! Metering Domain - Raw usage records
//!
//! This crate covers the first stage of the billing pipeline: turning
//! observations from a metering source into validated raw records.
//!
//! # Observations
//!
//! Every record carries exactly one observation:
//! - **Value**: a metered magnitude (memory, network traffic, ...)
//! - **Interval**: a start timestamp plus a duration (compute hours, pod time, ...)
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_metering::{RawRecordBuilder, RecordFieldSetters};
//!
//! let record = RawRecordBuilder::new()
//!     .metered_duration(Duration::minutes(15))
//!     .tag("cluster", "abbot1")
//!     .tag("product", "POD")
//!     .build()?;
//! ```

pub mod record;
pub mod builder;
pub mod tags;
pub mod import;
pub mod error;

pub use record::{BillingRecord, Observation, RawRecord, RecordBase};
pub use builder::{RawRecordBuilder, RecordFieldSetters, RecordFields};
pub use tags::{tags_from_pairs, Tags};
pub use import::ImportRow;
pub use error::ImportError;
