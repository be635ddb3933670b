//! Guiding domain errors

use thiserror::Error;

use core_kernel::InvalidRecordState;
use domain_metering::{BillingRecord, RawRecord};

/// Why a raw record could not be guided
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GuidingFailureReason {
    /// No catalog product matches the record's tags
    #[error("Unknown product: {0}")]
    UnknownProduct(String),

    /// No customer matches the record's tags
    #[error("Unknown customer: {0}")]
    UnknownCustomer(String),

    /// The tags match more than one product or customer
    #[error("Ambiguous tags: {0}")]
    AmbiguousTags(String),

    /// A tag needed for the decision is absent
    #[error("Missing tag: {0}")]
    MissingTag(String),

    /// The guided record could not be assembled
    #[error("Invalid record state: {0}")]
    InvalidRecordState(#[from] InvalidRecordState),
}

/// A raw record that could not be guided, with the reason
///
/// Carries the offending record so callers can park or re-queue it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Guiding failed for record {record_id}: {reason}", record_id = .record.id())]
pub struct GuidingFailure {
    record: Box<RawRecord>,
    reason: GuidingFailureReason,
}

impl GuidingFailure {
    pub fn new(record: &RawRecord, reason: GuidingFailureReason) -> Self {
        Self {
            record: Box::new(record.clone()),
            reason,
        }
    }

    /// Creates an UnknownProduct failure
    pub fn unknown_product(record: &RawRecord, product: impl Into<String>) -> Self {
        Self::new(record, GuidingFailureReason::UnknownProduct(product.into()))
    }

    /// Creates an UnknownCustomer failure
    pub fn unknown_customer(record: &RawRecord, customer: impl Into<String>) -> Self {
        Self::new(record, GuidingFailureReason::UnknownCustomer(customer.into()))
    }

    /// Creates an AmbiguousTags failure
    pub fn ambiguous(record: &RawRecord, message: impl Into<String>) -> Self {
        Self::new(record, GuidingFailureReason::AmbiguousTags(message.into()))
    }

    /// Creates a MissingTag failure
    pub fn missing_tag(record: &RawRecord, key: impl Into<String>) -> Self {
        Self::new(record, GuidingFailureReason::MissingTag(key.into()))
    }

    /// The record that failed guiding
    pub fn record(&self) -> &RawRecord {
        &self.record
    }

    pub fn reason(&self) -> &GuidingFailureReason {
        &self.reason
    }

    /// Hands the record back, e.g. for a retry with other resolvers
    pub fn into_record(self) -> RawRecord {
        *self.record
    }
}
