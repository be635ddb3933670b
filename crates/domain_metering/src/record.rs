//! Billing record types
//!
//! `RecordBase` holds the fields every pipeline stage shares. Raw, guided and
//! rated records each wrap it and expose it through the `BillingRecord` trait.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{MeteredInterval, RecordId, RecordTimestamps};

use crate::tags::Tags;

/// What the metering source observed
///
/// Exactly one kind per record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Observation {
    /// A metered magnitude, for quantity-based products
    Value {
        metered_value: Decimal,
    },
    /// A metered time span, for time-based products
    Interval(MeteredInterval),
}

impl Observation {
    /// Short name of the observation kind
    pub fn kind(&self) -> &'static str {
        match self {
            Observation::Value { .. } => "value",
            Observation::Interval(_) => "interval",
        }
    }

    /// The metered magnitude of a value observation
    pub fn metered_value(&self) -> Option<Decimal> {
        match self {
            Observation::Value { metered_value } => Some(*metered_value),
            Observation::Interval(_) => None,
        }
    }

    /// The metered span of an interval observation
    pub fn interval(&self) -> Option<&MeteredInterval> {
        match self {
            Observation::Value { .. } => None,
            Observation::Interval(interval) => Some(interval),
        }
    }
}

/// Fields shared by raw, guided and rated records
///
/// Only constructed through the record builders, which apply the defaults
/// and validation; there are no setters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordBase {
    id: RecordId,
    metering_id: String,
    #[serde(flatten)]
    timestamps: RecordTimestamps,
    observation: Observation,
    tags: Tags,
}

impl RecordBase {
    pub(crate) fn new(
        id: RecordId,
        metering_id: String,
        timestamps: RecordTimestamps,
        observation: Observation,
        tags: Tags,
    ) -> Self {
        Self {
            id,
            metering_id,
            timestamps,
            observation,
            tags,
        }
    }
}

/// Read access to the base fields of a record at any pipeline stage
pub trait BillingRecord {
    /// The shared base fields
    fn base(&self) -> &RecordBase;

    /// Unique identifier
    fn id(&self) -> RecordId {
        self.base().id
    }

    /// Identifier assigned by the metering source
    fn metering_id(&self) -> &str {
        &self.base().metering_id
    }

    /// When the metering source recorded the observation
    fn recorded_at(&self) -> DateTime<Utc> {
        self.base().timestamps.recorded_at
    }

    /// When the observation was imported
    fn imported_at(&self) -> DateTime<Utc> {
        self.base().timestamps.imported_at
    }

    /// The date the record is priced at
    fn value_at(&self) -> DateTime<Utc> {
        self.base().timestamps.value_at
    }

    /// All three timestamps
    fn timestamps(&self) -> RecordTimestamps {
        self.base().timestamps
    }

    /// The metered observation
    fn observation(&self) -> &Observation {
        &self.base().observation
    }

    /// Tags reported with the observation
    fn tags(&self) -> &Tags {
        &self.base().tags
    }
}

impl BillingRecord for RecordBase {
    fn base(&self) -> &RecordBase {
        self
    }
}

/// An imported observation that has not been guided yet
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawRecord {
    #[serde(flatten)]
    base: RecordBase,
}

impl RawRecord {
    pub(crate) fn new(base: RecordBase) -> Self {
        Self { base }
    }

    /// Consumes the record, returning its base fields
    pub fn into_base(self) -> RecordBase {
        self.base
    }
}

impl BillingRecord for RawRecord {
    fn base(&self) -> &RecordBase {
        &self.base
    }
}
