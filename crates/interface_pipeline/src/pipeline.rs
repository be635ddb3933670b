//! The billing pipeline
//!
//! import → guiding → rating, one record at a time. Batches never stop at a
//! failed record; every input gets a result in the same position.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use domain_guiding::{CustomerResolver, GuidedRecord, GuidingExecutor, ProductResolver};
use domain_metering::{BillingRecord, ImportRow, RawRecord};
use domain_rating::{RatedRecord, RatingEngine, TariffCatalog};

use crate::config::PipelineConfig;
use crate::error::PipelineError;

/// Outcome of processing a single record
pub type RecordResult = Result<RatedRecord, PipelineError>;

/// Guides and rates usage records
///
/// Cheap to clone; resolvers and catalog are shared.
#[derive(Clone)]
pub struct BillingPipeline {
    products: Arc<dyn ProductResolver>,
    customers: Arc<dyn CustomerResolver>,
    catalog: Arc<TariffCatalog>,
    executor: GuidingExecutor,
    workers: usize,
}

impl std::fmt::Debug for BillingPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BillingPipeline")
            .field("tariffs", &self.catalog.len())
            .field("workers", &self.workers)
            .finish_non_exhaustive()
    }
}

impl BillingPipeline {
    pub const DEFAULT_WORKERS: usize = 4;

    pub fn new(
        products: Arc<dyn ProductResolver>,
        customers: Arc<dyn CustomerResolver>,
        catalog: Arc<TariffCatalog>,
    ) -> Self {
        Self {
            products,
            customers,
            catalog,
            executor: GuidingExecutor::new(),
            workers: Self::DEFAULT_WORKERS,
        }
    }

    /// Builds the catalog and tag-schema resolver described by the configuration
    pub fn from_config(config: &PipelineConfig) -> Result<Self, PipelineError> {
        config.check()?;
        let catalog = config.tariff_catalog()?;
        let resolver = Arc::new(config.resolver(&catalog));

        info!(
            tariffs = catalog.len(),
            currency = %config.currency,
            workers = config.workers,
            "Pipeline configured"
        );

        Ok(Self::new(resolver.clone(), resolver, Arc::new(catalog)).with_workers(config.workers))
    }

    /// Sets the number of parallel workers (at least one)
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn catalog(&self) -> &TariffCatalog {
        &self.catalog
    }

    pub fn guide(&self, record: &RawRecord) -> Result<GuidedRecord, PipelineError> {
        Ok(self
            .executor
            .guide(record, self.products.as_ref(), self.customers.as_ref())?)
    }

    pub fn rate(&self, record: &GuidedRecord) -> Result<RatedRecord, PipelineError> {
        Ok(RatingEngine::new(&self.catalog).rate(record)?)
    }

    /// Guides and rates one raw record
    pub fn process(&self, record: &RawRecord) -> RecordResult {
        let guided = self.guide(record)?;
        self.rate(&guided)
    }

    /// Imports, guides and rates one import row
    pub fn process_row(&self, row: ImportRow) -> RecordResult {
        let record = row.into_record()?;
        self.process(&record)
    }

    /// Processes records in order on the current thread
    #[instrument(skip_all, fields(records = records.len()))]
    pub fn process_batch(&self, records: &[RawRecord]) -> Vec<RecordResult> {
        let results: Vec<RecordResult> = records
            .iter()
            .map(|record| {
                let result = self.process(record);
                if let Err(e) = &result {
                    warn!(record_id = %record.id(), stage = e.stage(), error = %e, "Record not rated");
                }
                result
            })
            .collect();

        debug!(
            rated = results.iter().filter(|r| r.is_ok()).count(),
            "Batch processed"
        );
        results
    }

    /// Imports and processes rows in order on the current thread
    pub fn process_rows(&self, rows: Vec<ImportRow>) -> Vec<RecordResult> {
        rows.into_iter()
            .map(|row| {
                let result = self.process_row(row);
                if let Err(e) = &result {
                    warn!(stage = e.stage(), error = %e, "Row not rated");
                }
                result
            })
            .collect()
    }

    /// Processes records on the blocking thread pool
    ///
    /// The batch is split into at most `workers` chunks. Results come back in
    /// input order and equal those of [`process_batch`](Self::process_batch).
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::Worker` if a worker task panicked
    pub async fn process_batch_parallel(
        &self,
        records: Vec<RawRecord>,
    ) -> Result<Vec<RecordResult>, PipelineError> {
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let chunk_size = records.len().div_ceil(self.workers);
        let mut remaining = records;
        let mut handles = Vec::with_capacity(self.workers);

        while !remaining.is_empty() {
            let rest = remaining.split_off(chunk_size.min(remaining.len()));
            let chunk = std::mem::replace(&mut remaining, rest);
            let pipeline = self.clone();
            handles.push(tokio::task::spawn_blocking(move || pipeline.process_batch(&chunk)));
        }

        debug!(chunks = handles.len(), chunk_size, "Dispatched batch to workers");

        let mut results = Vec::new();
        for handle in handles {
            results.extend(handle.await?);
        }
        Ok(results)
    }

    /// Imports rows, then processes the valid records on the blocking pool
    ///
    /// Rows that fail import keep their position as `PipelineError::Import`,
    /// so summaries count them under the import stage.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::Worker` if a worker task panicked
    pub async fn process_rows_parallel(
        &self,
        rows: Vec<ImportRow>,
    ) -> Result<Vec<RecordResult>, PipelineError> {
        let mut slots: Vec<Option<RecordResult>> = Vec::with_capacity(rows.len());
        let mut records = Vec::new();

        for row in rows {
            match row.into_record() {
                Ok(record) => {
                    records.push(record);
                    slots.push(None);
                }
                Err(e) => {
                    warn!(stage = "import", error = %e, "Row not rated");
                    slots.push(Some(Err(e.into())));
                }
            }
        }

        let mut rated = self.process_batch_parallel(records).await?.into_iter();
        Ok(slots
            .into_iter()
            .filter_map(|slot| slot.or_else(|| rated.next()))
            .collect())
    }
}
