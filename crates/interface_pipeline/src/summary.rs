//! Batch totals

use serde::Serialize;
use std::collections::BTreeMap;

use core_kernel::{Currency, Money};

use crate::error::PipelineError;
use crate::pipeline::RecordResult;

/// Totals over one processed batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub records: usize,
    pub rated: usize,
    pub failed: usize,
    /// Failed records per pipeline stage
    pub failures: BTreeMap<&'static str, usize>,
    /// Sum of all rated amounts, at full precision
    pub total: Money,
    /// Rated amounts per product
    pub by_product: BTreeMap<String, Money>,
}

impl BatchSummary {
    /// Sums the rated amounts of a batch
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::Money` if a record is priced in another
    /// currency or the sum overflows
    pub fn from_results(results: &[RecordResult], currency: Currency) -> Result<Self, PipelineError> {
        let mut summary = Self {
            records: results.len(),
            rated: 0,
            failed: 0,
            failures: BTreeMap::new(),
            total: Money::zero(currency),
            by_product: BTreeMap::new(),
        };

        for result in results {
            match result {
                Ok(rated) => {
                    summary.rated += 1;
                    summary.total = summary.total.checked_add(&rated.amount())?;
                    let product = summary
                        .by_product
                        .entry(rated.product().product_name().to_string())
                        .or_insert_with(|| Money::zero(currency));
                    *product = product.checked_add(&rated.amount())?;
                }
                Err(e) => {
                    summary.failed += 1;
                    *summary.failures.entry(e.stage()).or_default() += 1;
                }
            }
        }

        Ok(summary)
    }
}
