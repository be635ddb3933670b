//! Guiding Domain - Customer and product resolution
//!
//! Guiding is the second stage of the billing pipeline. A raw record only
//! carries the tags its metering source reported; guiding decides which
//! customer the usage belongs to and which product was consumed.
//!
//! The decision itself is delegated to two resolver ports:
//! - [`ProductResolver`] maps a raw record to a catalog product and the
//!   product-specific tag values
//! - [`CustomerResolver`] maps a raw record to the billed customer
//!
//! [`GuidingExecutor`] combines both into a [`GuidedRecord`] while preserving
//! the record's observation kind. [`TagSchemaResolver`] is a configuration
//! driven implementation of both ports.
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_guiding::{GuidingExecutor, TagSchemaResolver};
//!
//! let resolver = TagSchemaResolver::new("product", "customer")
//!     .with_product(ProductInfo::new("CPU", ["cluster", "pod"]))
//!     .with_customer("982341", Customer::new("customer", "customer-costcenter"));
//!
//! let guided = GuidingExecutor.guide(&raw, &resolver, &resolver)?;
//! ```

pub mod customer;
pub mod product;
pub mod ports;
pub mod guided;
pub mod executor;
pub mod schema;
pub mod error;

pub use customer::Customer;
pub use product::{ProductInfo, ProductRecordInfo};
pub use ports::{CustomerResolver, ProductResolver};
pub use guided::{GuidedRecord, GuidedRecordBuilder};
pub use executor::GuidingExecutor;
pub use schema::TagSchemaResolver;
pub use error::{GuidingFailure, GuidingFailureReason};
