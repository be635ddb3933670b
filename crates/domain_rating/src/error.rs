//! Rating domain errors

use thiserror::Error;

use core_kernel::{InvalidRecordState, MoneyError};

/// Errors that can occur while building the catalog or rating a record
#[derive(Debug, Error)]
pub enum RatingError {
    /// No tariff is configured for the record's product
    #[error("No tariff for product '{product}' (customer: {customer})")]
    TariffNotFound {
        customer: String,
        product: String,
    },

    /// The rated record could not be assembled
    #[error("Invalid record state: {0}")]
    InvalidRecordState(#[from] InvalidRecordState),

    /// A tariff definition is unusable
    #[error("Invalid tariff: {0}")]
    InvalidTariff(String),

    /// Two tariffs were registered for the same product
    #[error("Duplicate tariff for product: {0}")]
    DuplicateTariff(String),

    /// The amount could not be computed
    #[error("Calculation error: {0}")]
    Calculation(String),
}

impl RatingError {
    /// Creates a TariffNotFound error
    pub fn tariff_not_found(customer: impl Into<String>, product: impl Into<String>) -> Self {
        RatingError::TariffNotFound {
            customer: customer.into(),
            product: product.into(),
        }
    }

    /// Creates an InvalidTariff error
    pub fn invalid_tariff(message: impl Into<String>) -> Self {
        RatingError::InvalidTariff(message.into())
    }

    /// Creates a Calculation error
    pub fn calculation(message: impl Into<String>) -> Self {
        RatingError::Calculation(message.into())
    }
}

impl From<MoneyError> for RatingError {
    fn from(e: MoneyError) -> Self {
        RatingError::Calculation(e.to_string())
    }
}
