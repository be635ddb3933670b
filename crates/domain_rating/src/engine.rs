//! Rating engine

use tracing::{debug, instrument};

use domain_guiding::GuidedRecord;
use domain_metering::BillingRecord;

use crate::catalog::TariffCatalog;
use crate::error::RatingError;
use crate::rated::{RatedRecord, RatedRecordBuilder};

/// Prices guided records against a tariff catalog
#[derive(Debug, Clone, Copy)]
pub struct RatingEngine<'a> {
    catalog: &'a TariffCatalog,
}

impl<'a> RatingEngine<'a> {
    pub fn new(catalog: &'a TariffCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &'a TariffCatalog {
        self.catalog
    }

    /// Looks up the tariff for the record's product and computes the amount
    ///
    /// # Errors
    ///
    /// * `RatingError::TariffNotFound` - no tariff covers the product
    /// * `RatingError::Calculation` - the amount overflows
    #[instrument(skip_all, fields(record_id = %record.id(), product = record.product_name()))]
    pub fn rate(&self, record: &GuidedRecord) -> Result<RatedRecord, RatingError> {
        let tariff = self.catalog.lookup(record.product_name(), record.customer())?;

        let rated = RatedRecordBuilder::from_guided(record).tariff(tariff).build()?;
        debug!(amount = %rated.amount(), tariff = rated.tariff().name(), "Rated record");
        Ok(rated)
    }
}
