//! Guided records
//!
//! A guided record is a raw record that has been assigned a customer and a
//! product. The observation is carried over unchanged.

use serde::Serialize;

use core_kernel::InvalidRecordState;
use domain_metering::{BillingRecord, RawRecord, RecordBase, RecordFieldSetters, RecordFields};

use crate::customer::Customer;
use crate::product::ProductRecordInfo;

/// A record with its customer and product resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuidedRecord {
    #[serde(flatten)]
    base: RecordBase,
    customer: Customer,
    product: ProductRecordInfo,
}

impl GuidedRecord {
    pub fn customer(&self) -> &Customer {
        &self.customer
    }

    pub fn product(&self) -> &ProductRecordInfo {
        &self.product
    }

    /// Name of the product the record was guided to
    pub fn product_name(&self) -> &str {
        self.product.product_name()
    }
}

impl BillingRecord for GuidedRecord {
    fn base(&self) -> &RecordBase {
        &self.base
    }
}

/// Builder for guided records
///
/// Applies the same defaults and observation checks as the raw record
/// builder; customer and product are mandatory.
#[derive(Debug, Clone, Default)]
pub struct GuidedRecordBuilder {
    fields: RecordFields,
    customer: Option<Customer>,
    product: Option<ProductRecordInfo>,
}

impl GuidedRecordBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder from already collected fields
    pub fn from_fields(fields: RecordFields) -> Self {
        Self {
            fields,
            ..Self::default()
        }
    }

    /// Seeds the base fields from a raw record
    pub fn from_raw(record: &RawRecord) -> Self {
        Self::from_fields(RecordFields::from_record(record))
    }

    /// Seeds every field, including customer and product, from a guided record
    pub fn copy_from(record: &GuidedRecord) -> Self {
        Self {
            fields: RecordFields::from_record(record),
            customer: Some(record.customer.clone()),
            product: Some(record.product.clone()),
        }
    }

    pub fn customer(mut self, customer: Customer) -> Self {
        self.customer = Some(customer);
        self
    }

    pub fn product(mut self, product: ProductRecordInfo) -> Self {
        self.product = Some(product);
        self
    }

    /// Builds the guided record
    ///
    /// # Errors
    ///
    /// Returns `InvalidRecordState` if customer or product is missing or the
    /// observation fields are inconsistent
    pub fn build(self) -> Result<GuidedRecord, InvalidRecordState> {
        let customer = self.customer.ok_or(InvalidRecordState::MissingField("customer"))?;
        let product = self.product.ok_or(InvalidRecordState::MissingField("product"))?;
        let base = self.fields.resolve()?;

        Ok(GuidedRecord {
            base,
            customer,
            product,
        })
    }
}

impl RecordFieldSetters for GuidedRecordBuilder {
    fn fields_mut(&mut self) -> &mut RecordFields {
        &mut self.fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::ProductInfo;
    use chrono::Duration;
    use domain_metering::RawRecordBuilder;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn product() -> ProductRecordInfo {
        let info = Arc::new(ProductInfo::new("Cluster CPU Usage", ["cluster"]));
        ProductRecordInfo::from_record_tags(info, &Default::default())
    }

    fn customer() -> Customer {
        Customer::new("customer", "customer-costcenter")
    }

    #[test]
    fn test_missing_customer_rejected() {
        let result = GuidedRecordBuilder::new()
            .product(product())
            .metered_value(dec!(1))
            .build();

        assert_eq!(result, Err(InvalidRecordState::MissingField("customer")));
    }

    #[test]
    fn test_missing_product_rejected() {
        let result = GuidedRecordBuilder::new()
            .customer(customer())
            .metered_value(dec!(1))
            .build();

        assert_eq!(result, Err(InvalidRecordState::MissingField("product")));
    }

    #[test]
    fn test_from_raw_keeps_base_fields() {
        let raw = RawRecordBuilder::new()
            .metered_duration(Duration::minutes(15))
            .tag("cluster", "abbot1")
            .build()
            .unwrap();

        let guided = GuidedRecordBuilder::from_raw(&raw)
            .customer(customer())
            .product(product())
            .build()
            .unwrap();

        assert_eq!(guided.base(), raw.base());
        assert_eq!(guided.product_name(), "Cluster CPU Usage");
    }

    #[test]
    fn test_copy_from_is_field_equal() {
        let guided = GuidedRecordBuilder::new()
            .customer(customer())
            .product(product())
            .metered_value(dec!(7))
            .build()
            .unwrap();

        let copy = GuidedRecordBuilder::copy_from(&guided).build().unwrap();
        assert_eq!(copy, guided);
    }
}
