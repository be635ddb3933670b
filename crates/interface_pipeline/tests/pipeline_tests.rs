//! Tests for configuration and batch processing

use chrono::Duration;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use core_kernel::{Currency, Money};
use domain_metering::{BillingRecord, ImportRow, RawRecord, RawRecordBuilder, RecordFieldSetters};
use interface_pipeline::{BatchSummary, BillingPipeline, LogFormat, PipelineConfig, PipelineError};

const CONFIG: &str = r#"
currency = "CHF"
workers = 3
log_format = "json"

[[products]]
name = "Cluster CPU Usage"
tag_keys = ["cluster", "project", "pod"]

[[products]]
name = "POD"
tag_keys = ["cluster", "pod"]

[[customers]]
tag_value = "982341"
name = "customer"
cost_reference = "customer-costcenter"

[[tariffs]]
product = "Cluster CPU Usage"
name = "CPU Usage"
unit = "mCore"
unit_divisor = "1000"
rate = "0.5"

[[tariffs]]
product = "POD"
id = "451dd39a-a8bf-4063-acf5-e3c89ad98287"
name = "Base Rate Single POD"
unit = "Hourly Usage"
unit_divisor = "60"
rate = "0.1"
"#;

fn pipeline() -> BillingPipeline {
    let config = PipelineConfig::from_toml(CONFIG).unwrap();
    BillingPipeline::from_config(&config).unwrap()
}

fn record(product: &str, customer: &str, value: Decimal) -> RawRecord {
    RawRecordBuilder::new()
        .metered_value(value)
        .tag("product", product)
        .tag("customer", customer)
        .tag("cluster", "abbot1")
        .tag("project", "billing")
        .tag("pod", "princeps-8fdg2")
        .build()
        .unwrap()
}

fn mixed_batch(size: usize) -> Vec<RawRecord> {
    (0..size)
        .map(|i| match i % 4 {
            0 => record("Cluster CPU Usage", "982341", Decimal::from(i * 10)),
            1 => RawRecordBuilder::new()
                .metered_duration(Duration::minutes(i as i64))
                .tag("product", "POD")
                .tag("customer", "982341")
                .build()
                .unwrap(),
            2 => record("GPU", "982341", dec!(1)),
            _ => record("Cluster CPU Usage", "nobody", dec!(1)),
        })
        .collect()
}

// ============================================================================
// Configuration Tests
// ============================================================================

mod config_tests {
    use super::*;

    #[test]
    fn test_toml_configuration() {
        let config = PipelineConfig::from_toml(CONFIG).unwrap();

        assert_eq!(config.currency().unwrap(), Currency::CHF);
        assert_eq!(config.workers, 3);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.product_tag, "product");
        assert_eq!(config.products.len(), 2);
        assert_eq!(config.customers[0].cost_reference, "customer-costcenter");
    }

    #[test]
    fn test_configured_catalog_replaces_standard() {
        let pipeline = pipeline();

        assert_eq!(pipeline.catalog().len(), 2);
        assert!(pipeline.catalog().get("CPU").is_none());
        assert_eq!(
            pipeline.catalog().get("POD").unwrap().id().as_uuid().to_string(),
            "451dd39a-a8bf-4063-acf5-e3c89ad98287"
        );
        assert_eq!(pipeline.workers(), 3);
    }

    #[test]
    fn test_duplicate_tariffs_rejected() {
        let source = format!(
            "{CONFIG}\n[[tariffs]]\nproduct = \"POD\"\nname = \"again\"\nunit_divisor = \"1\"\nrate = \"1\"\n"
        );
        let config = PipelineConfig::from_toml(&source).unwrap();

        assert!(matches!(
            BillingPipeline::from_config(&config),
            Err(PipelineError::Rating(_))
        ));
    }

    #[test]
    fn test_invalid_worker_count_rejected() {
        let result = PipelineConfig::from_toml("workers = 0");
        assert!(matches!(result, Err(PipelineError::Configuration(_))));
    }
}

// ============================================================================
// Processing Tests
// ============================================================================

mod processing_tests {
    use super::*;

    #[test]
    fn test_cpu_record_in_configured_currency() {
        let rated = pipeline()
            .process(&record("Cluster CPU Usage", "982341", dec!(500)))
            .unwrap();

        assert_eq!(rated.amount(), Money::new(dec!(0.25), Currency::CHF));
        assert_eq!(rated.product().tags().len(), 3);
        assert_eq!(rated.customer().name, "customer");
    }

    #[test]
    fn test_import_row_end_to_end() {
        let row = ImportRow {
            metering_id: Some("exporter-1".to_string()),
            metered_duration_secs: Some(3600),
            tag_titles: vec!["product".to_string(), "customer".to_string()],
            tags: vec!["POD".to_string(), "982341".to_string()],
            ..Default::default()
        };

        let rated = pipeline().process_row(row).unwrap();

        assert_eq!(rated.metering_id(), "exporter-1");
        // 3600 s / 60 * 0.1
        assert_eq!(rated.amount().amount(), dec!(6));
    }

    #[test]
    fn test_failures_name_their_stage() {
        let pipeline = pipeline();

        let unknown_product = pipeline.process(&record("GPU", "982341", dec!(1))).unwrap_err();
        assert_eq!(unknown_product.stage(), "guiding");

        let bad_row = ImportRow {
            tag_titles: vec!["product".to_string()],
            ..Default::default()
        };
        assert_eq!(pipeline.process_row(bad_row).unwrap_err().stage(), "import");
    }

    #[test]
    fn test_summary_totals() {
        let pipeline = pipeline();
        let results = pipeline.process_batch(&mixed_batch(8));
        let summary = BatchSummary::from_results(&results, Currency::CHF).unwrap();

        // CPU: 0 and 40 units of value, POD: 1 and 5 minutes
        assert_eq!(summary.records, 8);
        assert_eq!(summary.rated, 4);
        assert_eq!(summary.failed, 4);
        assert_eq!(summary.failures["guiding"], 4);
        assert_eq!(summary.by_product["Cluster CPU Usage"].amount(), dec!(0.02));
        assert_eq!(summary.by_product["POD"].amount(), dec!(0.6));
        assert_eq!(summary.total, Money::new(dec!(0.62), Currency::CHF));
    }

    #[test]
    fn test_summary_rejects_other_currency() {
        let results = pipeline().process_batch(&mixed_batch(1));
        let summary = BatchSummary::from_results(&results, Currency::EUR);

        assert!(matches!(summary, Err(PipelineError::Money(_))));
    }
}

// ============================================================================
// Parallel Processing Tests
// ============================================================================

mod parallel_tests {
    use super::*;

    fn outcome(result: &Result<domain_rating::RatedRecord, PipelineError>) -> Result<(String, Money), String> {
        result
            .as_ref()
            .map(|r| (r.id().to_string(), r.amount()))
            .map_err(|e| e.to_string())
    }

    #[tokio::test]
    async fn test_parallel_matches_sequential() {
        let pipeline = pipeline();
        let records = mixed_batch(37);

        let sequential = pipeline.process_batch(&records);
        let parallel = pipeline.process_batch_parallel(records).await.unwrap();

        assert_eq!(parallel.len(), sequential.len());
        for (p, s) in parallel.iter().zip(sequential.iter()) {
            assert_eq!(outcome(p), outcome(s));
        }
    }

    #[tokio::test]
    async fn test_more_workers_than_records() {
        let pipeline = pipeline().with_workers(16);
        let records = mixed_batch(3);
        let ids: Vec<_> = records.iter().map(|r| r.id()).collect();

        let results = pipeline.process_batch_parallel(records).await.unwrap();

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap().id(), ids[0]);
        assert_eq!(results[1].as_ref().unwrap().id(), ids[1]);
        assert!(results[2].is_err());
    }

    #[tokio::test]
    async fn test_parallel_rows_keep_import_failures_in_place() {
        let good = ImportRow {
            metered_value: Some(dec!(500)),
            tag_titles: vec!["product".to_string(), "customer".to_string()],
            tags: vec!["Cluster CPU Usage".to_string(), "982341".to_string()],
            ..Default::default()
        };
        let bad = ImportRow {
            tags: vec!["extra".to_string()],
            ..good.clone()
        };

        let results = pipeline()
            .process_rows_parallel(vec![good.clone(), bad, good])
            .await
            .unwrap();

        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(PipelineError::Import(_))));
        assert!(results[2].is_ok());

        let summary = BatchSummary::from_results(&results, Currency::CHF).unwrap();
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.failures.get("import"), Some(&1));
    }
}
