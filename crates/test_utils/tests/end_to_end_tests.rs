//! End-to-end Tests for the billing pipeline
//!
//! These tests run usage data through import, guiding and rating with the
//! shared fixtures, and check properties that span several crates.

use std::sync::Arc;

use chrono::Duration;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use core_kernel::{Currency, Money};
use domain_guiding::{GuidingExecutor, GuidingFailureReason};
use domain_metering::{tags_from_pairs, BillingRecord, ImportError, RawRecordBuilder};
use domain_rating::{rate_quantity, RatingEngine, RatingError, Tariff};
use interface_pipeline::{BatchSummary, BillingPipeline, PipelineError};
use test_utils::*;

fn pipeline() -> BillingPipeline {
    let resolver = Arc::new(ResolverFixtures::standard());
    BillingPipeline::new(resolver.clone(), resolver, TariffFixtures::standard_catalog())
}

mod usage_to_rated_record {
    use super::*;

    #[test]
    fn test_cpu_usage_is_rated() {
        let raw = TestUsageBuilder::new("CPU").with_value(dec!(500)).raw();

        let rated = pipeline().process(&raw).unwrap();

        assert_rated(&rated, "CPU Usage", dec!(0.25));
        assert_same_base(&rated, &raw);
        assert_eq!(rated.customer(), &CustomerFixtures::standard());
    }

    #[test]
    fn test_storage_usage_keeps_rate_precision() {
        let raw = TestUsageBuilder::new("Storage").with_value(dec!(720)).raw();

        let rated = pipeline().process(&raw).unwrap();

        // 720 / 1440 = 0.5 days
        assert_rated(&rated, "Storage Usage", dec!(0.00138888885));
    }

    #[test]
    fn test_pod_interval_is_rated_by_seconds() {
        let raw = TestUsageBuilder::new("POD")
            .with_duration(Duration::minutes(15))
            .raw();

        let rated = pipeline().process(&raw).unwrap();

        assert_rated(&rated, "Base Rate Single POD", dec!(1.5));
        assert_eq!(
            rated.observation().interval().unwrap().ended_at(),
            Ok(TimestampFixtures::imported_at())
        );
    }

    #[test]
    fn test_import_row_through_pipeline() {
        let usage = TestUsageBuilder::new("Memory").with_value(dec!(256));

        let rated = pipeline().process_row(usage.import_row()).unwrap();

        assert_rated(&rated, "RAM Usage", dec!(2.56));
        assert_eq!(rated.tags(), usage.raw().tags());
    }

    #[test]
    fn test_disk_tariff_over_one_day() {
        let guided = TestUsageBuilder::new("Cluster CPU Usage")
            .with_duration(TimestampFixtures::one_day())
            .guided();

        let amount = rate_quantity(
            Decimal::from(guided.observation().interval().unwrap().whole_seconds()),
            &TariffFixtures::disk_usage(),
        )
        .unwrap();

        assert_eq!(amount, Money::new(dec!(1), Currency::EUR));
    }

    #[test]
    fn test_unknown_customer_fails_guiding() {
        let raw = TestUsageBuilder::new("CPU").with_customer_tag("000000").raw();

        match pipeline().process(&raw) {
            Err(PipelineError::Guiding(failure)) => {
                assert_eq!(
                    failure.reason(),
                    &GuidingFailureReason::UnknownCustomer("000000".to_string())
                );
                assert_eq!(failure.record(), &raw);
            }
            other => panic!("expected a guiding failure, got {other:?}"),
        }
    }

    #[test]
    fn test_product_without_tariff_fails_rating() {
        let resolver = ResolverFixtures::standard()
            .with_product(ProductFixtures::cluster_cpu());
        let raw = TestUsageBuilder::new("Cluster CPU Usage").raw();

        let guided = GuidingExecutor.guide(&raw, &resolver, &resolver).unwrap();
        let result = RatingEngine::new(&STANDARD_CATALOG).rate(&guided);

        assert!(matches!(result, Err(RatingError::TariffNotFound { .. })));
    }

    #[test]
    fn test_fake_customer_can_be_billed() {
        let customer = fake_customer();
        let guided = TestUsageBuilder::new("CPU").with_value(dec!(2000)).guided_for(customer.clone());

        let rated = RatingEngine::new(&STANDARD_CATALOG).rate(&guided).unwrap();

        assert_eq!(rated.customer(), &customer);
        assert_money_approx_eq(&rated.amount(), &Money::new(dec!(1), Currency::EUR), dec!(0));
    }
}

mod batch_processing {
    use super::*;

    #[tokio::test]
    async fn test_parallel_batch_summary() {
        let mut records = Vec::new();
        for i in 0..20 {
            records.push(TestUsageBuilder::new("CPU").with_value(Decimal::from(i * 100)).raw());
        }
        records.push(TestUsageBuilder::new("GPU").raw());

        let results = pipeline().with_workers(4).process_batch_parallel(records).await.unwrap();
        let summary = BatchSummary::from_results(&results, Currency::EUR).unwrap();

        // sum(0..20) * 100 / 1000 * 0.5
        assert_eq!(summary.rated, 20);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.total, Money::new(dec!(9.5), Currency::EUR));
        assert_eq!(summary.by_product.len(), 1);
    }

    #[test]
    fn test_summary_of_empty_batch() {
        let summary = BatchSummary::from_results(&[], Currency::EUR).unwrap();

        assert_eq!(summary.records, 0);
        assert_money_zero(&summary.total);
    }
}

mod proptests {
    use super::*;

    proptest! {
        #[test]
        fn copies_equal_their_source(record in raw_record_strategy()) {
            let copy = RawRecordBuilder::copy_from(&record).build().unwrap();
            prop_assert_eq!(copy, record);
        }

        #[test]
        fn timestamps_cascade_from_import(record in raw_record_strategy()) {
            prop_assert_eq!(record.recorded_at(), record.imported_at());
            prop_assert_eq!(record.value_at(), record.recorded_at());
        }

        #[test]
        fn import_rows_with_paired_tags_are_accepted(row in import_row_strategy()) {
            let expected = tags_from_pairs(&row.tag_titles, &row.tags).unwrap();
            let record = row.into_record().unwrap();
            prop_assert_eq!(record.tags(), &expected);
        }

        #[test]
        fn unpaired_tags_are_rejected(
            (titles, values) in tag_pairs_strategy(),
            extra in "[a-z]{1,8}",
        ) {
            let mut titles = titles;
            titles.push(extra);
            let result = tags_from_pairs(&titles, &values);
            let is_arity_mismatch = matches!(result, Err(ImportError::TagArityMismatch { .. }));
            prop_assert!(is_arity_mismatch);
        }

        #[test]
        fn rated_amount_is_within_rounding_bound(
            quantity in metered_value_strategy(),
            divisor in divisor_strategy(),
            rate in rate_strategy(),
            currency in currency_strategy(),
        ) {
            let tariff = Tariff::builder()
                .name("generated")
                .unit_divisor(divisor)
                .rate(Money::new(rate, currency))
                .build()
                .unwrap();

            let amount = rate_quantity(quantity, &tariff).unwrap();
            let exact = quantity / divisor * rate;

            prop_assert_eq!(amount.currency(), currency);
            prop_assert!((amount.amount() - exact).abs() <= rate * dec!(0.000005) + dec!(0.000000001));
        }
    }
}
