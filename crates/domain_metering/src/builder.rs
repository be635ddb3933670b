//! Record construction
//!
//! Builders accumulate optional fields and validate them in a single
//! `build(self)` call. Building consumes the builder, so nothing carries over
//! from one record to the next; start again from `new()` for the next record.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;

use core_kernel::{InvalidRecordState, MeteredInterval, RecordId, RecordTimestamps};

use crate::record::{BillingRecord, Observation, RawRecord, RecordBase};
use crate::tags::Tags;

/// Field values accumulated by a record builder
///
/// Shared by the raw, guided and rated builders; `resolve` applies the
/// defaults and checks the observation invariants.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFields {
    pub id: Option<RecordId>,
    pub metering_id: Option<String>,
    pub recorded_at: Option<DateTime<Utc>>,
    pub imported_at: Option<DateTime<Utc>>,
    pub value_at: Option<DateTime<Utc>>,
    pub metered_value: Option<Decimal>,
    pub metered_start: Option<DateTime<Utc>>,
    pub metered_duration: Option<Duration>,
    pub tags: Tags,
}

impl RecordFields {
    /// Seeds every field from an existing record
    ///
    /// The tag map is cloned; the new fields share nothing with the source.
    pub fn from_record<R: BillingRecord + ?Sized>(record: &R) -> Self {
        let (metered_value, metered_start, metered_duration) = match record.observation() {
            Observation::Value { metered_value } => (Some(*metered_value), None, None),
            Observation::Interval(interval) => {
                (None, Some(interval.started_at), Some(interval.duration))
            }
        };

        Self {
            id: Some(record.id()),
            metering_id: Some(record.metering_id().to_string()),
            recorded_at: Some(record.recorded_at()),
            imported_at: Some(record.imported_at()),
            value_at: Some(record.value_at()),
            metered_value,
            metered_start,
            metered_duration,
            tags: record.tags().clone(),
        }
    }

    /// Applies the defaults and validates the observation
    ///
    /// Defaults, in order: a random id, imported = now, recorded = imported,
    /// value = recorded, interval start = value − duration, metering id =
    /// the id's UUID string.
    pub fn resolve(self) -> Result<RecordBase, InvalidRecordState> {
        let id = self.id.unwrap_or_default();
        let timestamps =
            RecordTimestamps::cascade(self.imported_at, self.recorded_at, self.value_at);

        let observation = match (self.metered_value, self.metered_duration) {
            (Some(_), Some(_)) => return Err(InvalidRecordState::AmbiguousObservation),
            (None, None) => return Err(InvalidRecordState::MissingObservation),
            (Some(_), None) if self.metered_start.is_some() => {
                return Err(InvalidRecordState::StartWithoutDuration)
            }
            (Some(metered_value), None) => Observation::Value { metered_value },
            (None, Some(duration)) => {
                let interval = match self.metered_start {
                    Some(started_at) => MeteredInterval::new(started_at, duration)?,
                    None => MeteredInterval::ending_at(timestamps.value_at, duration)?,
                };
                Observation::Interval(interval)
            }
        };

        let metering_id = self
            .metering_id
            .unwrap_or_else(|| id.as_uuid().to_string());

        Ok(RecordBase::new(id, metering_id, timestamps, observation, self.tags))
    }
}

/// Chainable setters for the base record fields
///
/// Implemented by every record builder; only `fields_mut` is required.
pub trait RecordFieldSetters: Sized {
    fn fields_mut(&mut self) -> &mut RecordFields;

    fn id(mut self, id: RecordId) -> Self {
        self.fields_mut().id = Some(id);
        self
    }

    fn metering_id(mut self, metering_id: impl Into<String>) -> Self {
        self.fields_mut().metering_id = Some(metering_id.into());
        self
    }

    fn recorded_at(mut self, recorded_at: DateTime<Utc>) -> Self {
        self.fields_mut().recorded_at = Some(recorded_at);
        self
    }

    fn imported_at(mut self, imported_at: DateTime<Utc>) -> Self {
        self.fields_mut().imported_at = Some(imported_at);
        self
    }

    fn value_at(mut self, value_at: DateTime<Utc>) -> Self {
        self.fields_mut().value_at = Some(value_at);
        self
    }

    fn metered_value(mut self, metered_value: Decimal) -> Self {
        self.fields_mut().metered_value = Some(metered_value);
        self
    }

    fn metered_start(mut self, metered_start: DateTime<Utc>) -> Self {
        self.fields_mut().metered_start = Some(metered_start);
        self
    }

    fn metered_duration(mut self, metered_duration: Duration) -> Self {
        self.fields_mut().metered_duration = Some(metered_duration);
        self
    }

    /// Sets the observation fields from an already validated observation
    fn observation(mut self, observation: &Observation) -> Self {
        let fields = self.fields_mut();
        match observation {
            Observation::Value { metered_value } => {
                fields.metered_value = Some(*metered_value);
                fields.metered_start = None;
                fields.metered_duration = None;
            }
            Observation::Interval(interval) => {
                fields.metered_value = None;
                fields.metered_start = Some(interval.started_at);
                fields.metered_duration = Some(interval.duration);
            }
        }
        self
    }

    /// Adds a single tag, replacing an existing value for the key
    fn tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields_mut().tags.insert(key.into(), value.into());
        self
    }

    /// Replaces all tags
    fn tags(mut self, tags: Tags) -> Self {
        self.fields_mut().tags = tags;
        self
    }
}

/// Builder for raw records
///
/// # Example
///
/// ```rust,ignore
/// let record = RawRecordBuilder::new()
///     .imported_at(imported)
///     .metered_value(dec!(500))
///     .tag("product", "CPU")
///     .build()?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct RawRecordBuilder {
    fields: RecordFields,
}

impl RawRecordBuilder {
    /// Creates an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder from already collected fields
    pub fn from_fields(fields: RecordFields) -> Self {
        Self { fields }
    }

    /// Creates a builder seeded from an existing record
    pub fn copy_from<R: BillingRecord + ?Sized>(record: &R) -> Self {
        Self {
            fields: RecordFields::from_record(record),
        }
    }

    /// Builds the raw record
    ///
    /// # Errors
    ///
    /// Returns `InvalidRecordState` if the observation fields are
    /// inconsistent
    pub fn build(self) -> Result<RawRecord, InvalidRecordState> {
        self.fields.resolve().map(RawRecord::new)
    }
}

impl RecordFieldSetters for RawRecordBuilder {
    fn fields_mut(&mut self) -> &mut RecordFields {
        &mut self.fields
    }
}
