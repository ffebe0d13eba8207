//! Ordered search fallback for one identifier
//!
//! term search → code search (numeric terms only) → simplified-term search.
//! The first non-empty candidate list is scored and extracted. Remote
//! failures count as "no candidates" and the chain moves on.

use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

use super::extractor::FieldExtractor;
use super::{normalizer, scorer};
use crate::domain::constants::site;
use crate::domain::{CandidateProduct, CatalogError, CatalogSource, Identifier, ResolutionResult};
use crate::infrastructure::config::CatalogConfig;

/// Errors that escape the fallback chain
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    #[error("search term is empty")]
    EmptyTerm,

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Step of the fallback chain, for logs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStep {
    Term,
    Code,
    Simplified,
}

impl fmt::Display for SearchStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Term => "term",
            Self::Code => "code",
            Self::Simplified => "simplified term",
        };
        f.write_str(label)
    }
}

pub struct ResolutionStrategy {
    catalog: Arc<dyn CatalogSource>,
    extractor: FieldExtractor,
    search_from: u32,
    search_to: u32,
}

impl ResolutionStrategy {
    pub fn new(catalog: Arc<dyn CatalogSource>, extractor: FieldExtractor) -> Self {
        Self {
            catalog,
            extractor,
            search_from: site::DEFAULT_SEARCH_FROM,
            search_to: site::DEFAULT_SEARCH_TO,
        }
    }

    /// Strategy using the base URL and result window of the catalog config
    pub fn from_config(catalog: Arc<dyn CatalogSource>, config: &CatalogConfig) -> Self {
        Self::new(catalog, FieldExtractor::new(&config.base_url))
            .with_search_window(config.search_from, config.search_to)
    }

    pub const fn with_search_window(mut self, from: u32, to: u32) -> Self {
        self.search_from = from;
        self.search_to = to;
        self
    }

    /// Resolve `term`, scoring candidates against `reference` (or `term`
    /// itself when `reference` is blank).
    ///
    /// "Not found" outcomes are returned as values. Only an empty term or a
    /// non-remote catalog error is an `Err`.
    pub async fn resolve(
        &self,
        term: &str,
        reference: &str,
    ) -> Result<ResolutionResult, ResolutionError> {
        let term = term.trim();
        if term.is_empty() {
            return Err(ResolutionError::EmptyTerm);
        }

        let mut candidates = self.search(SearchStep::Term, term).await?;

        if candidates.is_empty() {
            if let Identifier::Code(code) = Identifier::classify(term) {
                candidates = self.search(SearchStep::Code, &code).await?;
            }
        }

        if candidates.is_empty() {
            let simplified = normalizer::simplify(term);
            if simplified != term {
                candidates = self.search(SearchStep::Simplified, &simplified).await?;
            }
        }

        if candidates.is_empty() {
            debug!("🔍 No candidates for '{}' after all search steps", term);
            return Ok(ResolutionResult::no_results());
        }

        let reference = match reference.trim() {
            "" => term,
            r => r,
        };

        match scorer::best_match(&candidates, reference) {
            Some(chosen) => {
                debug!(
                    "✅ '{}' matched '{}' (product {})",
                    term,
                    chosen.name,
                    chosen.product_id.as_deref().unwrap_or("?")
                );
                Ok(self.extractor.extract(chosen))
            }
            None => Ok(ResolutionResult::no_match()),
        }
    }

    async fn search(
        &self,
        step: SearchStep,
        query: &str,
    ) -> Result<Vec<CandidateProduct>, ResolutionError> {
        let outcome = match step {
            SearchStep::Code => self.catalog.search_by_code(query).await,
            SearchStep::Term | SearchStep::Simplified => {
                self.catalog
                    .search_by_term(query, self.search_from, self.search_to)
                    .await
            }
        };

        match outcome {
            Ok(candidates) => {
                debug!("Search by {} '{}': {} candidates", step, query, candidates.len());
                Ok(candidates)
            }
            Err(e) if e.is_remote() => {
                warn!("⚠️ Search by {} '{}' failed, continuing: {}", step, query, e);
                Ok(Vec::new())
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::{Reply, ScriptedCatalog, product, timeout};

    fn strategy(catalog: &Arc<ScriptedCatalog>) -> ResolutionStrategy {
        let source: Arc<dyn CatalogSource> = catalog.clone();
        ResolutionStrategy::new(source, FieldExtractor::new("https://loja.test"))
    }

    #[tokio::test]
    async fn test_term_hit_skips_other_steps() {
        let catalog = Arc::new(ScriptedCatalog::new().on_term(
            "7891058014684",
            Reply::Products(vec![product("Dipirona 500mg", "dipirona-500mg", 16.31)]),
        ));

        let result = strategy(&catalog)
            .resolve("7891058014684", "Dipirona 500mg")
            .await
            .unwrap();

        assert_eq!(result.price, "R$ 16,31");
        assert_eq!(result.link, "https://loja.test/dipirona-500mg/p");
        assert_eq!(result.classification, "Medicamentos");
        assert_eq!(catalog.calls(), vec!["term:7891058014684"]);
    }

    #[tokio::test]
    async fn test_code_search_after_empty_term_search() {
        let catalog = Arc::new(ScriptedCatalog::new().on_code(
            "7891058014684",
            Reply::Products(vec![product("Dipirona 500mg", "dipirona-500mg", 16.31)]),
        ));

        let result = strategy(&catalog).resolve("7891058014684", "").await.unwrap();

        assert_eq!(result.price, "R$ 16,31");
        // digits-only terms simplify to themselves, so no third call
        assert_eq!(
            catalog.calls(),
            vec!["term:7891058014684", "code:7891058014684"]
        );
    }

    #[tokio::test]
    async fn test_short_numbers_are_not_codes() {
        let catalog = Arc::new(ScriptedCatalog::new());

        let result = strategy(&catalog).resolve("1234567", "").await.unwrap();

        assert_eq!(result, ResolutionResult::no_results());
        assert_eq!(catalog.calls(), vec!["term:1234567"]);
    }

    #[tokio::test]
    async fn test_simplified_term_is_last_resort() {
        let catalog = Arc::new(ScriptedCatalog::new().on_term(
            "dipirona sódica",
            Reply::Products(vec![
                product("Dipirona Sódica Gotas 20ml", "dipirona-gotas", 9.9),
                product("Dipirona Sódica 500mg", "dipirona-500mg", 12.0),
            ]),
        ));

        let result = strategy(&catalog)
            .resolve("Dipirona Sódica 500mg 10 comprimidos", "")
            .await
            .unwrap();

        assert_eq!(
            catalog.calls(),
            vec![
                "term:Dipirona Sódica 500mg 10 comprimidos",
                "term:dipirona sódica"
            ]
        );
        // scored against the original term: "500mg" decides
        assert_eq!(result.link, "https://loja.test/dipirona-500mg/p");
    }

    #[tokio::test]
    async fn test_remote_failures_are_absorbed() {
        let catalog = Arc::new(
            ScriptedCatalog::new()
                .on_term("7891058014684", Reply::Fail(timeout()))
                .on_code(
                    "7891058014684",
                    Reply::Products(vec![product("Soro Fisiológico", "soro", 5.5)]),
                ),
        );

        let result = strategy(&catalog).resolve("7891058014684", "").await.unwrap();
        assert_eq!(result.price, "R$ 5,50");
    }

    #[tokio::test]
    async fn test_all_failures_mean_no_results() {
        let catalog = Arc::new(
            ScriptedCatalog::new()
                .on_term("Dipirona 500mg", Reply::Fail(timeout()))
                .on_term(
                    "dipirona",
                    Reply::Fail(CatalogError::HttpStatus {
                        status: 500,
                        url: "u".into(),
                    }),
                ),
        );

        let result = strategy(&catalog).resolve("Dipirona 500mg", "").await.unwrap();
        assert_eq!(result.observation, "Sem resultados");
        assert_eq!(catalog.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_invalid_request_is_not_absorbed() {
        let catalog = Arc::new(ScriptedCatalog::new().on_term(
            "x",
            Reply::Fail(CatalogError::InvalidRequest {
                reason: "bad base url".into(),
            }),
        ));

        let err = strategy(&catalog).resolve("x", "").await.unwrap_err();
        assert!(matches!(err, ResolutionError::Catalog(_)));
        assert_eq!(err.to_string(), "invalid catalog request: bad base url");
    }

    #[tokio::test]
    async fn test_empty_term_is_rejected() {
        let catalog = Arc::new(ScriptedCatalog::new());
        let err = strategy(&catalog).resolve("   ", "ref").await.unwrap_err();
        assert_eq!(err, ResolutionError::EmptyTerm);
        assert!(catalog.calls().is_empty());
    }

    #[tokio::test]
    async fn test_reference_drives_the_choice() {
        let catalog = Arc::new(ScriptedCatalog::new().on_term(
            "7891058014684",
            Reply::Products(vec![
                product("Paracetamol 750mg Extra Forte", "extra-forte", 20.0),
                product("Paracetamol 750mg", "paracetamol-750mg", 10.0),
            ]),
        ));

        let result = strategy(&catalog)
            .resolve("7891058014684", "paracetamol 750mg")
            .await
            .unwrap();
        assert_eq!(result.link, "https://loja.test/paracetamol-750mg/p");
    }

    #[tokio::test]
    async fn test_same_term_twice_gives_same_result() {
        let catalog = Arc::new(ScriptedCatalog::new().on_term(
            "dipirona",
            Reply::Products(vec![product("Dipirona 500mg", "dipirona-500mg", 16.31)]),
        ));
        let strategy = strategy(&catalog);

        let first = strategy.resolve("dipirona", "").await.unwrap();
        let second = strategy.resolve("dipirona", "").await.unwrap();
        assert_eq!(first, second);
    }
}
