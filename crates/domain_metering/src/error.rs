//! Metering domain errors

use core_kernel::InvalidRecordState;
use thiserror::Error;

/// Errors raised while importing a raw observation
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ImportError {
    /// Tag titles and tag values cannot be paired positionally
    #[error("Tag arity mismatch: {titles} tag titles but {values} tag values")]
    TagArityMismatch {
        titles: usize,
        values: usize,
    },

    /// Metered duration does not fit a duration
    #[error("Metered duration out of range: {0}s")]
    DurationOutOfRange(i64),

    /// The imported fields do not form a valid record
    #[error("Invalid record: {0}")]
    InvalidRecord(#[from] InvalidRecordState),
}
