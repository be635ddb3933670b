//! Raw import representation
//!
//! The shape in which a metering source hands over one observation. Parsing
//! the source format (CSV, exporter JSON, ...) into rows happens upstream.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::RecordId;

use crate::builder::{RawRecordBuilder, RecordFields};
use crate::error::ImportError;
use crate::record::{BillingRecord, RawRecord};
use crate::tags::tags_from_pairs;

/// One imported observation, before validation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportRow {
    pub id: Option<RecordId>,
    pub metering_id: Option<String>,
    pub recorded_at: Option<DateTime<Utc>>,
    pub imported_at: Option<DateTime<Utc>>,
    pub value_at: Option<DateTime<Utc>>,
    pub metered_value: Option<Decimal>,
    pub metered_start: Option<DateTime<Utc>>,
    /// Metered duration in seconds
    pub metered_duration_secs: Option<i64>,
    /// Tag titles, paired positionally with `tags`
    #[serde(default)]
    pub tag_titles: Vec<String>,
    /// Tag values, paired positionally with `tag_titles`
    #[serde(default)]
    pub tags: Vec<String>,
}

impl ImportRow {
    /// Validates the row into a raw record
    ///
    /// # Errors
    ///
    /// * `ImportError::TagArityMismatch` - titles and values differ in length
    /// * `ImportError::DurationOutOfRange` - the duration cannot be represented
    /// * `ImportError::InvalidRecord` - the observation fields are inconsistent
    pub fn into_record(self) -> Result<RawRecord, ImportError> {
        let tags = tags_from_pairs(&self.tag_titles, &self.tags)?;

        let metered_duration = self
            .metered_duration_secs
            .map(|secs| Duration::try_seconds(secs).ok_or(ImportError::DurationOutOfRange(secs)))
            .transpose()?;

        let fields = RecordFields {
            id: self.id,
            metering_id: self.metering_id,
            recorded_at: self.recorded_at,
            imported_at: self.imported_at,
            value_at: self.value_at,
            metered_value: self.metered_value,
            metered_start: self.metered_start,
            metered_duration,
            tags,
        };

        let record = RawRecordBuilder::from_fields(fields).build()?;
        tracing::trace!(record_id = %record.id(), "Imported raw record");
        Ok(record)
    }
}
