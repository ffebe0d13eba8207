//! Batch reconciliation
//!
//! Rows are resolved code-first, then by name, through an ordered buffered
//! stream. Each row runs in its own task; whatever happens inside it ends up
//! as that row's `Observacao`.

use futures::stream::{self, StreamExt};
use std::any::Any;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinError;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::normalizer;
use super::resolution_strategy::ResolutionStrategy;
use crate::domain::{BatchRow, BatchRowInput, ResolutionResult};
use crate::infrastructure::config::BatchConfig;

pub struct BatchResolver {
    strategy: Arc<ResolutionStrategy>,
    row_pause: Duration,
    max_concurrent_rows: usize,
}

impl BatchResolver {
    pub fn new(strategy: Arc<ResolutionStrategy>, config: &BatchConfig) -> Self {
        Self {
            strategy,
            row_pause: Duration::from_millis(config.row_pause_ms),
            max_concurrent_rows: config.max_concurrent_rows.max(1),
        }
    }

    /// Resolve every row. The output has one row per input, in input order.
    pub async fn resolve_rows(&self, inputs: Vec<BatchRowInput>) -> Vec<BatchRow> {
        let total = inputs.len();
        let started = Instant::now();
        info!(
            "📋 Resolving batch of {} rows (concurrency {}, pause {:?})",
            total, self.max_concurrent_rows, self.row_pause
        );

        let rows: Vec<BatchRow> = stream::iter(inputs.into_iter().enumerate())
            .map(|(index, input)| self.process_row(index, input))
            .buffered(self.max_concurrent_rows)
            .collect()
            .await;

        let priced = rows.iter().filter(|r| r.result.has_price()).count();
        info!(
            "✅ Batch finished: {}/{} rows priced in {:.1}s",
            priced,
            total,
            started.elapsed().as_secs_f64()
        );
        rows
    }

    async fn process_row(&self, index: usize, input: BatchRowInput) -> BatchRow {
        let code = normalizer::clean(input.code.as_deref());
        let name = normalizer::clean(input.name.as_deref());

        if code.is_empty() && name.is_empty() {
            debug!("Row {}: empty, skipped", index + 1);
            return BatchRow::new(code, name, ResolutionResult::empty_row());
        }

        let strategy = Arc::clone(&self.strategy);
        let (task_code, task_name) = (code.clone(), name.clone());
        let task = tokio::spawn(async move { resolve_row(&strategy, &task_code, &task_name).await });

        let result = match task.await {
            Ok(result) => result,
            Err(join_error) => {
                let message = join_error_message(join_error);
                warn!("❌ Row {} aborted: {}", index + 1, message);
                ResolutionResult::error(message)
            }
        };
        debug!("Row {}: {} / {}", index + 1, result.price, result.observation);

        if !self.row_pause.is_zero() {
            tokio::time::sleep(self.row_pause).await;
        }

        let display_name = if name.is_empty() { code.clone() } else { name };
        BatchRow::new(code, display_name, result)
    }
}

/// Code attempt first; the name is tried when the code gave no price
async fn resolve_row(strategy: &ResolutionStrategy, code: &str, name: &str) -> ResolutionResult {
    let mut result = None;

    if !code.is_empty() {
        let reference = if name.is_empty() { code } else { name };
        result = Some(contain(strategy.resolve(code, reference).await, code));
    }

    let priced = result.as_ref().is_some_and(ResolutionResult::has_price);
    if !priced && !name.is_empty() {
        result = Some(contain(strategy.resolve(name, name).await, name));
    }

    result.unwrap_or_else(ResolutionResult::no_results)
}

fn contain<E: std::fmt::Display>(outcome: Result<ResolutionResult, E>, term: &str) -> ResolutionResult {
    outcome.unwrap_or_else(|e| {
        warn!("⚠️ Resolution of '{}' failed: {}", term, e);
        ResolutionResult::error(e)
    })
}

fn join_error_message(error: JoinError) -> String {
    match error.try_into_panic() {
        Ok(payload) => panic_message(payload.as_ref()),
        Err(error) => error.to_string(),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "row task panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::extractor::FieldExtractor;
    use crate::application::test_support::{Reply, ScriptedCatalog, product, timeout};
    use crate::domain::{CandidateProduct, CatalogError, CatalogSource};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn resolver(catalog: &Arc<ScriptedCatalog>, row_pause_ms: u64, concurrency: usize) -> BatchResolver {
        let source: Arc<dyn CatalogSource> = catalog.clone();
        let strategy = ResolutionStrategy::new(source, FieldExtractor::new("https://loja.test"));
        BatchResolver::new(
            Arc::new(strategy),
            &BatchConfig {
                row_pause_ms,
                max_concurrent_rows: concurrency,
            },
        )
    }

    fn priced(name: &str, slug: &str, price: f64) -> Reply {
        Reply::Products(vec![product(name, slug, price)])
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_row_skips_network() {
        let catalog = Arc::new(ScriptedCatalog::new());
        let rows = resolver(&catalog, 500, 1)
            .resolve_rows(vec![BatchRowInput::new(Some("  "), Some("nan"))])
            .await;

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].code, "");
        assert_eq!(rows[0].name, "");
        assert_eq!(rows[0].result.observation, "Linha vazia");
        assert_eq!(rows[0].result.price, "Produto não encontrado");
        assert!(catalog.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_code_first_then_name() {
        let catalog = Arc::new(
            ScriptedCatalog::new().on_term("Dipirona 500mg", priced("Dipirona 500mg", "dip", 16.31)),
        );

        let rows = resolver(&catalog, 0, 1)
            .resolve_rows(vec![BatchRowInput::new(
                Some("7891058014684"),
                Some("Dipirona 500mg"),
            )])
            .await;

        assert_eq!(rows[0].result.price, "R$ 16,31");
        assert_eq!(
            catalog.calls(),
            vec![
                "term:7891058014684",
                "code:7891058014684",
                "term:Dipirona 500mg"
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_priced_code_attempt_is_kept() {
        let catalog = Arc::new(
            ScriptedCatalog::new().on_code("7891058014684", priced("Dipirona 500mg", "dip", 16.31)),
        );

        let rows = resolver(&catalog, 0, 1)
            .resolve_rows(vec![BatchRowInput::new(Some("7891058014684"), Some("Dipirona"))])
            .await;

        assert_eq!(rows[0].result.price, "R$ 16,31");
        assert!(!catalog.calls().iter().any(|c| c == "term:Dipirona"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_name_defaults_to_code() {
        let catalog = Arc::new(ScriptedCatalog::new());
        let rows = resolver(&catalog, 0, 1)
            .resolve_rows(vec![BatchRowInput::from_code("7891058014684")])
            .await;

        assert_eq!(rows[0].code, "7891058014684");
        assert_eq!(rows[0].name, "7891058014684");
        assert_eq!(rows[0].result.observation, "Sem resultados");
    }

    #[tokio::test(start_paused = true)]
    async fn test_failing_row_does_not_stop_the_batch() {
        let catalog = Arc::new(
            ScriptedCatalog::new()
                .on_term("quebrado", Reply::Panic)
                .on_term(
                    "invalido",
                    Reply::Fail(CatalogError::InvalidRequest {
                        reason: "bad base url".into(),
                    }),
                )
                .on_term("Soro", priced("Soro Fisiológico", "soro", 5.5)),
        );

        let rows = resolver(&catalog, 0, 1)
            .resolve_rows(vec![
                BatchRowInput::from_name("quebrado"),
                BatchRowInput::from_name("invalido"),
                BatchRowInput::from_name("Soro"),
            ])
            .await;

        assert_eq!(rows.len(), 3);
        assert!(rows[0].result.observation.starts_with("Erro: "));
        assert!(rows[0].result.observation.contains("scripted panic"));
        assert_eq!(
            rows[1].result.observation,
            "Erro: invalid catalog request: bad base url"
        );
        assert_eq!(rows[2].result.price, "R$ 5,50");
    }

    #[tokio::test(start_paused = true)]
    async fn test_errors_in_code_attempt_fall_back_to_name() {
        let catalog = Arc::new(
            ScriptedCatalog::new()
                .on_term(
                    "78910580146",
                    Reply::Fail(CatalogError::InvalidRequest { reason: "x".into() }),
                )
                .on_term("Soro", priced("Soro Fisiológico", "soro", 5.5)),
        );

        let rows = resolver(&catalog, 0, 1)
            .resolve_rows(vec![BatchRowInput::new(Some("78910580146"), Some("Soro"))])
            .await;

        assert_eq!(rows[0].result.price, "R$ 5,50");
        assert_eq!(rows[0].result.observation, "—");
    }

    #[tokio::test(start_paused = true)]
    async fn test_order_is_preserved_with_concurrency() {
        let mut catalog = ScriptedCatalog::new();
        for i in 0_i32..8 {
            let name = format!("Produto {i}");
            catalog = catalog.on_term(&name, priced(&name, &format!("produto-{i}"), f64::from(i)));
        }
        let catalog = Arc::new(catalog.on_term("Produto 3", Reply::Fail(timeout())));

        let inputs = (0_i32..8)
            .map(|i| BatchRowInput::from_name(&format!("Produto {i}")))
            .collect();
        let rows = resolver(&catalog, 500, 4).resolve_rows(inputs).await;

        assert_eq!(rows.len(), 8);
        for (i, row) in rows.iter().enumerate() {
            assert_eq!(row.name, format!("Produto {i}"));
        }
        assert_eq!(rows[5].result.link, "https://loja.test/produto-5/p");
        assert_eq!(rows[3].result.observation, "Sem resultados");
    }

    /// Slow source that tracks how many searches run at once
    #[derive(Default)]
    struct SlowCatalog {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    impl SlowCatalog {
        async fn visit(&self) -> Result<Vec<CandidateProduct>, CatalogError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(100)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(Vec::new())
        }
    }

    #[async_trait]
    impl CatalogSource for SlowCatalog {
        async fn search_by_term(
            &self,
            _term: &str,
            _from: u32,
            _to: u32,
        ) -> Result<Vec<CandidateProduct>, CatalogError> {
            self.visit().await
        }

        async fn search_by_code(&self, _code: &str) -> Result<Vec<CandidateProduct>, CatalogError> {
            self.visit().await
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_rows_stay_within_limit() {
        let catalog = Arc::new(SlowCatalog::default());
        let source: Arc<dyn CatalogSource> = catalog.clone();
        let strategy = ResolutionStrategy::new(source, FieldExtractor::new("https://loja.test"));
        let resolver = BatchResolver::new(
            Arc::new(strategy),
            &BatchConfig {
                row_pause_ms: 0,
                max_concurrent_rows: 3,
            },
        );

        let inputs = (0..12)
            .map(|i| BatchRowInput::from_name(&format!("Produto {i}")))
            .collect();
        let rows = resolver.resolve_rows(inputs).await;

        assert_eq!(rows.len(), 12);
        assert_eq!(catalog.peak.load(Ordering::SeqCst), 3);
        assert_eq!(catalog.in_flight.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_follows_resolved_rows_only() {
        let catalog = Arc::new(ScriptedCatalog::new());
        let started = Instant::now();

        resolver(&catalog, 500, 1)
            .resolve_rows(vec![
                BatchRowInput::from_name("a"),
                BatchRowInput::default(),
                BatchRowInput::from_name("b"),
            ])
            .await;

        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(1000), "{elapsed:?}");
        assert!(elapsed < Duration::from_millis(1500), "{elapsed:?}");
    }
}
