//! Core error types used across the system

use thiserror::Error;
use crate::money::MoneyError;
use crate::temporal::TemporalError;

/// A record builder was asked to build from an inconsistent set of fields
///
/// Raised before any record is constructed; no partial record exists.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InvalidRecordState {
    #[error("Record carries both a metered value and a metered duration")]
    AmbiguousObservation,

    #[error("Record carries neither a metered value nor a metered duration")]
    MissingObservation,

    #[error("Metered start timestamp given without a metered duration")]
    StartWithoutDuration,

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid interval: {0}")]
    InvalidInterval(#[from] TemporalError),
}

/// Core error type for the kernel
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Money error: {0}")]
    Money(#[from] MoneyError),

    #[error("Temporal error: {0}")]
    Temporal(#[from] TemporalError),

    #[error("Invalid record state: {0}")]
    InvalidRecordState(#[from] InvalidRecordState),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl CoreError {
    pub fn validation(message: impl Into<String>) -> Self {
        CoreError::Validation(message.into())
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        CoreError::Configuration(message.into())
    }
}
