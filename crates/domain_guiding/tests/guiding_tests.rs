//! Tests for guiding raw records to customers and products

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use domain_guiding::{
    Customer, CustomerResolver, GuidedRecordBuilder, GuidingExecutor, GuidingFailure,
    GuidingFailureReason, ProductInfo, ProductRecordInfo, ProductResolver, TagSchemaResolver,
};
use domain_metering::{BillingRecord, RawRecord, RawRecordBuilder, RecordFieldSetters};

fn resolver() -> TagSchemaResolver {
    TagSchemaResolver::new("product", "customer")
        .with_product(ProductInfo::new("Cluster CPU Usage", ["cluster", "project", "pod"]))
        .with_customer("982341", Customer::new("customer", "customer-costcenter"))
}

fn raw_record() -> RawRecordBuilder {
    RawRecordBuilder::new()
        .metering_id("metered-id")
        .imported_at(Utc.with_ymd_and_hms(2024, 4, 2, 6, 30, 0).unwrap())
        .tag("cluster", "abbot1")
        .tag("project", "billing")
        .tag("pod", "princeps-8fdg2")
        .tag("customer", "982341")
        .tag("product", "Cluster CPU Usage")
}

// ============================================================================
// Executor Tests
// ============================================================================

mod executor_tests {
    use super::*;

    #[test]
    fn test_guide_with_tag_schema() {
        let resolver = resolver();
        let raw = raw_record().metered_value(dec!(500)).build().unwrap();

        let guided = GuidingExecutor::new().guide(&raw, &resolver, &resolver).unwrap();

        assert_eq!(guided.id(), raw.id());
        assert_eq!(guided.metering_id(), "metered-id");
        assert_eq!(guided.tags(), raw.tags());
        assert_eq!(guided.customer().name, "customer");
        assert_eq!(guided.product_name(), "Cluster CPU Usage");
        assert_eq!(guided.product().tag("pod"), Some("princeps-8fdg2"));
        assert_eq!(guided.product().tag("customer"), None);
    }

    #[test]
    fn test_guided_records_share_the_catalog_product() {
        let resolver = resolver();
        let first = raw_record().metered_value(dec!(1)).build().unwrap();
        let second = raw_record().metered_duration(Duration::hours(1)).build().unwrap();

        let a = GuidingExecutor.guide(&first, &resolver, &resolver).unwrap();
        let b = GuidingExecutor.guide(&second, &resolver, &resolver).unwrap();

        assert!(Arc::ptr_eq(a.product().product(), b.product().product()));
    }

    #[test]
    fn test_failure_keeps_the_raw_record() {
        let resolver = resolver();
        let raw = raw_record()
            .tag("customer", "unknown")
            .metered_value(dec!(1))
            .build()
            .unwrap();

        let failure = GuidingExecutor.guide(&raw, &resolver, &resolver).unwrap_err();

        assert_eq!(
            failure.reason(),
            &GuidingFailureReason::UnknownCustomer("unknown".to_string())
        );
        assert_eq!(failure.into_record(), raw);
    }

    #[test]
    fn test_failure_message_names_the_record() {
        let raw = raw_record().metered_value(dec!(1)).build().unwrap();
        let failure = GuidingFailure::ambiguous(&raw, "two products match");

        let message = failure.to_string();
        assert!(message.contains(&raw.id().to_string()));
        assert!(message.contains("two products match"));
    }

    #[test]
    fn test_resolvers_can_be_shared_as_trait_objects() {
        let products: Arc<dyn ProductResolver> = Arc::new(resolver());
        let customers: Arc<dyn CustomerResolver> = Arc::new(resolver());
        let raw = raw_record().metered_value(dec!(1)).build().unwrap();

        let guided = GuidingExecutor.guide(&raw, products.as_ref(), customers.as_ref());
        assert!(guided.is_ok());
    }
}

// ============================================================================
// Builder Tests
// ============================================================================

mod builder_tests {
    use super::*;

    #[test]
    fn test_copy_can_change_customer_without_touching_source() {
        let resolver = resolver();
        let raw = raw_record().metered_value(dec!(3)).build().unwrap();
        let guided = GuidingExecutor.guide(&raw, &resolver, &resolver).unwrap();

        let moved = GuidedRecordBuilder::copy_from(&guided)
            .customer(Customer::new("other", "other-costcenter"))
            .build()
            .unwrap();

        assert_eq!(guided.customer().name, "customer");
        assert_eq!(moved.customer().name, "other");
        assert_eq!(moved.product(), guided.product());
        assert_eq!(moved.id(), guided.id());
    }

    #[test]
    fn test_guided_record_serializes_customer_and_product() {
        let info = Arc::new(ProductInfo::new("Cluster CPU Usage", ["pod"]));
        let guided = GuidedRecordBuilder::new()
            .customer(Customer::new("customer", "customer-costcenter"))
            .product(ProductRecordInfo::new(info, Default::default()))
            .metered_value(dec!(2))
            .build()
            .unwrap();

        let json = serde_json::to_value(&guided).unwrap();
        assert_eq!(json["customer"]["cost_reference"], "customer-costcenter");
        assert_eq!(json["product"]["product"]["name"], "Cluster CPU Usage");
        assert_eq!(json["observation"]["kind"], "value");
    }
}

// ============================================================================
// Property Tests
// ============================================================================

mod proptests {
    use super::*;

    fn unknown(record: &RawRecord) -> Result<Customer, GuidingFailure> {
        Err(GuidingFailure::unknown_customer(record, "nobody"))
    }

    proptest! {
        #[test]
        fn guiding_preserves_the_metered_value(units in 0i64..10_000_000, scale in 0u32..6) {
            let resolver = resolver();
            let value = Decimal::new(units, scale);
            let raw = raw_record().metered_value(value).build().unwrap();

            let guided = GuidingExecutor.guide(&raw, &resolver, &resolver).unwrap();
            prop_assert_eq!(guided.observation().metered_value(), Some(value));
        }

        #[test]
        fn resolver_failures_pass_through(seconds in 0i64..1_000_000) {
            let resolver = resolver();
            let raw = raw_record()
                .metered_duration(Duration::seconds(seconds))
                .build()
                .unwrap();

            let err = GuidingExecutor.guide(&raw, &resolver, &unknown).unwrap_err();
            prop_assert_eq!(err, GuidingFailure::unknown_customer(&raw, "nobody"));
        }
    }
}
