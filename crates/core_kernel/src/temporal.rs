//! Temporal types for metering records
//!
//! This module provides the timestamp handling shared by every billing stage:
//! - Record timestamps: imported, recorded and value (pricing) time, with the
//!   default cascade imported → recorded → value
//! - Metered intervals: a start timestamp plus a non-negative duration

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors related to temporal operations
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TemporalError {
    #[error("Negative duration: {seconds}s")]
    NegativeDuration {
        seconds: i64,
    },

    #[error("Interval bound {start} is out of the representable range")]
    OutOfRange {
        start: String,
    },
}

/// The three timestamps every billing record carries
///
/// Unset timestamps cascade: imported defaults to "now", recorded defaults to
/// imported and value defaults to recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordTimestamps {
    /// When the metering source recorded the observation
    pub recorded_at: DateTime<Utc>,
    /// When the observation entered the billing system
    pub imported_at: DateTime<Utc>,
    /// The date the record is priced at
    pub value_at: DateTime<Utc>,
}

impl RecordTimestamps {
    /// Applies the default cascade using the current time for a missing import timestamp
    pub fn cascade(
        imported_at: Option<DateTime<Utc>>,
        recorded_at: Option<DateTime<Utc>>,
        value_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self::cascade_at(Utc::now(), imported_at, recorded_at, value_at)
    }

    /// Applies the default cascade against an explicit "now"
    pub fn cascade_at(
        now: DateTime<Utc>,
        imported_at: Option<DateTime<Utc>>,
        recorded_at: Option<DateTime<Utc>>,
        value_at: Option<DateTime<Utc>>,
    ) -> Self {
        let imported_at = imported_at.unwrap_or(now);
        let recorded_at = recorded_at.unwrap_or(imported_at);
        let value_at = value_at.unwrap_or(recorded_at);

        Self {
            recorded_at,
            imported_at,
            value_at,
        }
    }
}

/// A metered time span: start plus duration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeteredInterval {
    /// Start of the metered span
    pub started_at: DateTime<Utc>,
    /// Length of the metered span
    #[serde(with = "duration_secs")]
    pub duration: Duration,
}

impl MeteredInterval {
    /// Creates an interval, rejecting negative durations
    pub fn new(started_at: DateTime<Utc>, duration: Duration) -> Result<Self, TemporalError> {
        if duration < Duration::zero() {
            return Err(TemporalError::NegativeDuration {
                seconds: duration.num_seconds(),
            });
        }
        Ok(Self { started_at, duration })
    }

    /// Creates the interval that ends at `ended_at`
    pub fn ending_at(ended_at: DateTime<Utc>, duration: Duration) -> Result<Self, TemporalError> {
        let started_at = ended_at
            .checked_sub_signed(duration)
            .ok_or_else(|| TemporalError::OutOfRange {
                start: ended_at.to_string(),
            })?;
        Self::new(started_at, duration)
    }

    /// End of the metered span
    ///
    /// Fails with `TemporalError::OutOfRange` if the end lies past the last
    /// representable timestamp.
    pub fn ended_at(&self) -> Result<DateTime<Utc>, TemporalError> {
        self.started_at
            .checked_add_signed(self.duration)
            .ok_or_else(|| TemporalError::OutOfRange {
                start: self.started_at.to_string(),
            })
    }

    /// Duration in whole seconds (sub-second parts are truncated)
    pub fn whole_seconds(&self) -> i64 {
        self.duration.num_seconds()
    }
}

/// Serde adapter writing a `chrono::Duration` as whole seconds
pub mod duration_secs {
    use chrono::Duration;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(duration.num_seconds())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let seconds = i64::deserialize(deserializer)?;
        Duration::try_seconds(seconds)
            .ok_or_else(|| serde::de::Error::custom(format!("Duration out of range: {}s", seconds)))
    }
}
