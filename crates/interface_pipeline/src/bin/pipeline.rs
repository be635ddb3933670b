//! Billing Pipeline - Batch Runner Binary
//!
//! Reads import rows as JSON lines from stdin, guides and rates them, and
//! writes the rated records as JSON lines to stdout. Records that fail are
//! logged, counted in the summary and left out of the output.
//!
//! # Usage
//!
//! ```bash
//! billing-pipeline < usage.jsonl > rated.jsonl
//!
//! BILLING_CURRENCY=CHF BILLING_WORKERS=8 billing-pipeline < usage.jsonl
//! ```
//!
//! # Environment Variables
//!
//! * `BILLING_CURRENCY` - ISO currency of the tariffs (default: EUR)
//! * `BILLING_WORKERS` - Parallel workers (default: 4)
//! * `BILLING_LOG_LEVEL` - Log level (default: info); `RUST_LOG` wins if set
//! * `BILLING_LOG_FORMAT` - `pretty` or `json` (default: pretty)
//! * `BILLING_PRODUCT_TAG` / `BILLING_CUSTOMER_TAG` - tag keys used for guiding

use std::io::Write;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};

use domain_metering::ImportRow;
use interface_pipeline::{init_tracing, BatchSummary, BillingPipeline, PipelineConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = PipelineConfig::load().context("loading configuration")?;
    init_tracing(&config.log_level, config.log_format)?;

    let pipeline = BillingPipeline::from_config(&config)?;
    let rows = read_rows().await?;
    tracing::info!(rows = rows.len(), "Read import rows");

    let results = pipeline.process_rows_parallel(rows).await?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for rated in results.iter().flatten() {
        serde_json::to_writer(&mut out, rated)?;
        writeln!(out)?;
    }
    out.flush()?;

    let summary = BatchSummary::from_results(&results, config.currency()?)?;
    tracing::info!(
        records = summary.records,
        rated = summary.rated,
        failed = summary.failed,
        total = %summary.total,
        "Batch complete"
    );

    Ok(())
}

/// Reads import rows from stdin, skipping blank lines
///
/// Lines that are not valid JSON are logged and skipped; rows that fail
/// validation are reported by the pipeline.
async fn read_rows() -> anyhow::Result<Vec<ImportRow>> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut rows = Vec::new();
    let mut line_no = 0usize;

    while let Some(line) = lines.next_line().await.context("reading stdin")? {
        line_no += 1;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<ImportRow>(&line) {
            Ok(row) => rows.push(row),
            Err(e) => tracing::warn!(line = line_no, error = %e, "Skipping malformed row"),
        }
    }

    Ok(rows)
}
