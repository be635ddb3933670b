//! Resolver ports
//!
//! Guiding asks these collaborators who a record belongs to. Implementations
//! may consult configuration, a customer directory or an inventory service;
//! the executor only sees the result.

use domain_metering::RawRecord;

use crate::customer::Customer;
use crate::error::GuidingFailure;
use crate::product::ProductRecordInfo;

/// Resolves the product consumed by a raw record
pub trait ProductResolver: Send + Sync {
    /// # Errors
    ///
    /// Returns a `GuidingFailure` if the record's tags do not identify exactly
    /// one product
    fn resolve(&self, record: &RawRecord) -> Result<ProductRecordInfo, GuidingFailure>;
}

/// Resolves the customer billed for a raw record
pub trait CustomerResolver: Send + Sync {
    /// # Errors
    ///
    /// Returns a `GuidingFailure` if the record's tags do not identify exactly
    /// one customer
    fn resolve(&self, record: &RawRecord) -> Result<Customer, GuidingFailure>;
}

impl<F> ProductResolver for F
where
    F: Fn(&RawRecord) -> Result<ProductRecordInfo, GuidingFailure> + Send + Sync,
{
    fn resolve(&self, record: &RawRecord) -> Result<ProductRecordInfo, GuidingFailure> {
        self(record)
    }
}

impl<F> CustomerResolver for F
where
    F: Fn(&RawRecord) -> Result<Customer, GuidingFailure> + Send + Sync,
{
    fn resolve(&self, record: &RawRecord) -> Result<Customer, GuidingFailure> {
        self(record)
    }
}
