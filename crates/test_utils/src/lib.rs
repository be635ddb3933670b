//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! billing pipeline test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built records, customers, products and tariffs
//! - `builders`: Builders for usage data with sensible defaults
//! - `assertions`: Custom assertion helpers for billing types
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use assertions::*;
pub use generators::*;
