//! Test Data Builders
//!
//! Provides builder patterns for constructing usage data with sensible
//! defaults. Tests specify only the relevant fields; pod names and metering
//! ids are random unless set.

use chrono::{DateTime, Duration, Utc};
use fake::faker::company::en::CompanyName;
use fake::faker::lorem::en::Word;
use fake::Fake;
use rust_decimal::Decimal;

use domain_guiding::{Customer, GuidedRecord, GuidedRecordBuilder, ProductRecordInfo};
use domain_metering::{ImportRow, RawRecord, RawRecordBuilder, RecordFieldSetters, Tags};

use crate::fixtures::{CustomerFixtures, ProductFixtures, TagFixtures, TimestampFixtures};

#[derive(Debug, Clone, Copy)]
enum Metered {
    Value(Decimal),
    Duration(Duration),
}

/// Builder for usage records in any pipeline representation
#[derive(Debug, Clone)]
pub struct TestUsageBuilder {
    product: String,
    customer_tag: String,
    metering_id: String,
    imported_at: DateTime<Utc>,
    metered: Metered,
    tags: Tags,
}

impl TestUsageBuilder {
    /// Creates a builder for a value record of the given product
    pub fn new(product: impl Into<String>) -> Self {
        let product = product.into();
        let pod: String = Word().fake();
        let mut tags = TagFixtures::for_product(&product);
        tags.insert("pod".to_string(), format!("{pod}-{}", (1000..9999u32).fake::<u32>()));

        Self {
            product,
            customer_tag: CustomerFixtures::TAG_VALUE.to_string(),
            metering_id: format!("exporter-{}", (1..1_000_000u32).fake::<u32>()),
            imported_at: TimestampFixtures::imported_at(),
            metered: Metered::Value(Decimal::ONE),
            tags,
        }
    }

    /// Sets the metered value (replaces a duration)
    pub fn with_value(mut self, value: Decimal) -> Self {
        self.metered = Metered::Value(value);
        self
    }

    /// Sets the metered duration (replaces a value)
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.metered = Metered::Duration(duration);
        self
    }

    /// Sets the customer tag value
    pub fn with_customer_tag(mut self, value: impl Into<String>) -> Self {
        self.customer_tag = value.into();
        self
    }

    pub fn with_metering_id(mut self, id: impl Into<String>) -> Self {
        self.metering_id = id.into();
        self
    }

    pub fn with_imported_at(mut self, at: DateTime<Utc>) -> Self {
        self.imported_at = at;
        self
    }

    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    fn tags(&self) -> Tags {
        let mut tags = self.tags.clone();
        tags.insert("customer".to_string(), self.customer_tag.clone());
        tags
    }

    fn record_builder<B: RecordFieldSetters>(&self, builder: B) -> B {
        let builder = builder
            .metering_id(self.metering_id.clone())
            .imported_at(self.imported_at)
            .tags(self.tags());

        match self.metered {
            Metered::Value(value) => builder.metered_value(value),
            Metered::Duration(duration) => builder.metered_duration(duration),
        }
    }

    /// Builds a raw record
    pub fn raw(&self) -> RawRecord {
        self.record_builder(RawRecordBuilder::new()).build().unwrap()
    }

    /// Builds a guided record for the standard customer
    pub fn guided(&self) -> GuidedRecord {
        self.guided_for(CustomerFixtures::standard())
    }

    /// Builds a guided record for the given customer
    pub fn guided_for(&self, customer: Customer) -> GuidedRecord {
        let product: ProductRecordInfo = ProductFixtures::catalog_record(&self.product);
        self.record_builder(GuidedRecordBuilder::new())
            .customer(customer)
            .product(product)
            .build()
            .unwrap()
    }

    /// Builds the import row a metering source would deliver
    pub fn import_row(&self) -> ImportRow {
        let (titles, values) = self.tags().into_iter().unzip();
        let (metered_value, metered_duration_secs) = match self.metered {
            Metered::Value(value) => (Some(value), None),
            Metered::Duration(duration) => (None, Some(duration.num_seconds())),
        };

        ImportRow {
            metering_id: Some(self.metering_id.clone()),
            imported_at: Some(self.imported_at),
            metered_value,
            metered_duration_secs,
            tag_titles: titles,
            tags: values,
            ..Default::default()
        }
    }
}

/// A customer with a random company name
pub fn fake_customer() -> Customer {
    let name: String = CompanyName().fake();
    let cost_reference = format!("CC-{}", (10_000..99_999u32).fake::<u32>());
    Customer::new(name, cost_reference)
}
