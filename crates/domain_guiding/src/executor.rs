//! Guiding executor

use tracing::{debug, instrument};

use domain_metering::{BillingRecord, Observation, RawRecord, RecordFieldSetters, RecordFields};

use crate::error::{GuidingFailure, GuidingFailureReason};
use crate::guided::{GuidedRecord, GuidedRecordBuilder};
use crate::ports::{CustomerResolver, ProductResolver};

/// Turns raw records into guided records
///
/// Stateless; one executor can serve any number of threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct GuidingExecutor;

impl GuidingExecutor {
    pub fn new() -> Self {
        Self
    }

    /// Resolves customer and product for a raw record
    ///
    /// The guided record keeps the raw record's identity, timestamps, tags and
    /// observation kind.
    ///
    /// # Errors
    ///
    /// Resolver failures are returned unchanged. No guided record is produced
    /// for a failed record.
    #[instrument(skip_all, fields(record_id = %record.id(), kind = record.observation().kind()))]
    pub fn guide(
        &self,
        record: &RawRecord,
        products: &dyn ProductResolver,
        customers: &dyn CustomerResolver,
    ) -> Result<GuidedRecord, GuidingFailure> {
        let product = products.resolve(record)?;
        let customer = customers.resolve(record)?;

        debug!(
            product = product.product_name(),
            customer = %customer.name,
            "Resolved record"
        );

        let mut fields = RecordFields::from_record(record);
        fields.metered_value = None;
        fields.metered_start = None;
        fields.metered_duration = None;

        let builder = GuidedRecordBuilder::from_fields(fields)
            .customer(customer)
            .product(product);

        let builder = match record.observation() {
            Observation::Value { metered_value } => builder.metered_value(*metered_value),
            Observation::Interval(interval) => builder
                .metered_start(interval.started_at)
                .metered_duration(interval.duration),
        };

        builder.build().map_err(|e| {
            GuidingFailure::new(record, GuidingFailureReason::InvalidRecordState(e))
        })
    }
}
