//! Resolver facade
//!
//! The fixed set of operations offered to front-ends: one lookup, one lookup
//! shaped as an output row, a batch of rows, and a raw table.

use std::sync::Arc;
use tracing::info;

use super::batch_resolver::BatchResolver;
use super::resolution_strategy::{ResolutionError, ResolutionStrategy};
use crate::domain::identifier::is_all_digits;
use crate::domain::{BatchError, BatchRow, BatchRowInput, BatchTable, CatalogSource, ResolutionResult};
use crate::infrastructure::catalog_client::CatalogClient;
use crate::infrastructure::config::AppConfig;

pub struct ResolverService {
    strategy: Arc<ResolutionStrategy>,
    batch: BatchResolver,
}

impl ResolverService {
    /// Build the engine over any catalog source
    pub fn new(catalog: Arc<dyn CatalogSource>, config: &AppConfig) -> Self {
        let strategy = Arc::new(ResolutionStrategy::from_config(catalog, &config.catalog));
        let batch = BatchResolver::new(Arc::clone(&strategy), &config.batch);
        Self { strategy, batch }
    }

    /// Build the engine over the HTTP catalog client. `context_label` tags
    /// every catalog request in the logs.
    pub fn from_config(config: &AppConfig, context_label: &str) -> anyhow::Result<Self> {
        let client =
            CatalogClient::from_catalog_config(&config.catalog)?.with_context_label(context_label);
        info!("Catalog client ({}) ready for {}", context_label, config.catalog.base_url);
        Ok(Self::new(Arc::new(client), config))
    }

    /// Resolve one free-text query, scored against itself
    pub async fn resolve_one(&self, query: &str) -> Result<ResolutionResult, ResolutionError> {
        self.strategy.resolve(query, query).await
    }

    /// Resolve one query into an output row. `EAN` holds the query only when
    /// it is numeric.
    pub async fn lookup_row(&self, query: &str) -> Result<BatchRow, ResolutionError> {
        let query = query.trim();
        let result = self.resolve_one(query).await?;
        let code = if is_all_digits(query) {
            query.to_string()
        } else {
            String::new()
        };
        Ok(BatchRow::new(code, query.to_string(), result))
    }

    pub async fn resolve_batch(&self, inputs: Vec<BatchRowInput>) -> Vec<BatchRow> {
        self.batch.resolve_rows(inputs).await
    }

    /// Recognize the identifying columns, then resolve every row.
    /// Fails before any lookup when neither column can be found.
    pub async fn resolve_table(&self, table: BatchTable) -> Result<Vec<BatchRow>, BatchError> {
        let inputs = table.into_row_inputs()?;
        Ok(self.resolve_batch(inputs).await)
    }
}
