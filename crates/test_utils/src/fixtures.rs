//! Pre-built Test Fixtures
//!
//! Provides ready-to-use test data for the billing pipeline. These fixtures
//! are consistent and predictable for unit tests.

use chrono::{DateTime, Duration, TimeZone, Utc};
use once_cell::sync::Lazy;
use rust_decimal_macros::dec;
use std::sync::Arc;

use core_kernel::{Currency, Money};
use domain_guiding::{Customer, ProductInfo, ProductRecordInfo, TagSchemaResolver};
use domain_metering::Tags;
use domain_rating::{build_catalog, Tariff, TariffCatalog};

/// The standard cluster catalog in EUR, built once per test binary
pub static STANDARD_CATALOG: Lazy<Arc<TariffCatalog>> =
    Lazy::new(|| Arc::new(build_catalog(Currency::EUR)));

/// Fixture for record timestamps
pub struct TimestampFixtures;

impl TimestampFixtures {
    /// Import time used across fixtures (Mar 1, 2024 12:00 UTC)
    pub fn imported_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    /// Recording time, shortly before import
    pub fn recorded_at() -> DateTime<Utc> {
        Self::imported_at() - Duration::minutes(5)
    }

    /// Pricing date, the start of the import day
    pub fn value_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()
    }

    pub fn one_day() -> Duration {
        Duration::hours(24)
    }
}

/// Fixture for record tags
pub struct TagFixtures;

impl TagFixtures {
    pub fn titles() -> Vec<String> {
        ["cluster", "project", "pod", "customer"]
            .into_iter()
            .map(String::from)
            .collect()
    }

    pub fn values() -> Vec<String> {
        ["abbot1", "billing", "princeps-8fdg2", "982341"]
            .into_iter()
            .map(String::from)
            .collect()
    }

    /// Cluster, project, pod and customer tags of a cluster workload
    pub fn cluster() -> Tags {
        Self::titles().into_iter().zip(Self::values()).collect()
    }

    /// Cluster tags plus the product tag the tag-schema resolver reads
    pub fn for_product(product: &str) -> Tags {
        let mut tags = Self::cluster();
        tags.insert("product".to_string(), product.to_string());
        tags
    }
}

/// Fixture for customers
pub struct CustomerFixtures;

impl CustomerFixtures {
    /// Customer tag value of the standard customer
    pub const TAG_VALUE: &'static str = "982341";

    pub fn standard() -> Customer {
        Customer::new("customer", "customer-costcenter")
    }
}

/// Fixture for products
pub struct ProductFixtures;

impl ProductFixtures {
    pub fn cluster_cpu() -> ProductInfo {
        ProductInfo::new("Cluster CPU Usage", TagFixtures::titles())
    }

    pub fn cluster_cpu_record() -> ProductRecordInfo {
        ProductRecordInfo::from_record_tags(Arc::new(Self::cluster_cpu()), &TagFixtures::cluster())
    }

    /// Product record info for a standard catalog product
    pub fn catalog_record(name: &str) -> ProductRecordInfo {
        let product = Arc::new(ProductInfo::new(name, ["cluster", "project", "pod"]));
        ProductRecordInfo::from_record_tags(product, &TagFixtures::cluster())
    }
}

/// Fixture for tariffs
pub struct TariffFixtures;

impl TariffFixtures {
    /// 1.00 EUR per GB and day, metered in seconds
    pub fn disk_usage() -> Arc<Tariff> {
        Arc::new(
            Tariff::builder()
                .name("DISK usage")
                .unit("EUR/GB d")
                .unit_divisor(dec!(86400))
                .rate(Money::new(dec!(1.00), Currency::EUR))
                .build()
                .unwrap(),
        )
    }

    pub fn standard_catalog() -> Arc<TariffCatalog> {
        Arc::clone(&STANDARD_CATALOG)
    }
}

/// Fixture for resolvers
pub struct ResolverFixtures;

impl ResolverFixtures {
    /// Tag-schema resolver that knows every standard catalog product and the
    /// standard customer
    pub fn standard() -> TagSchemaResolver {
        let mut resolver = TagSchemaResolver::new("product", "customer")
            .with_customer(CustomerFixtures::TAG_VALUE, CustomerFixtures::standard());
        for name in STANDARD_CATALOG.products() {
            resolver = resolver.with_product(ProductInfo::new(name, ["cluster", "project", "pod"]));
        }
        resolver
    }
}
