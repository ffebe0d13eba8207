//! HTTP client for the VTEX catalog search API
//!
//! One request per call, bounded by the configured timeout. Retries and
//! fallbacks are the caller's business.

use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, header};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use super::catalog_schema_adapter::CatalogSchemaAdapter;
use super::config::CatalogConfig;
use crate::domain::constants::site;
use crate::domain::{CandidateProduct, CatalogError, CatalogSource};

/// Configuration for catalog client behavior
#[derive(Debug, Clone)]
pub struct CatalogClientConfig {
    /// Storefront base URL
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// User agent string
    pub user_agent: String,
}

impl CatalogClientConfig {
    pub fn from_catalog_config(catalog: &CatalogConfig) -> Self {
        Self {
            base_url: catalog.base_url.clone(),
            timeout_seconds: catalog.request_timeout_seconds,
            user_agent: catalog.user_agent.clone(),
        }
    }
}

impl Default for CatalogClientConfig {
    fn default() -> Self {
        Self::from_catalog_config(&CatalogConfig::default())
    }
}

/// reqwest-backed `CatalogSource`
#[derive(Clone)]
pub struct CatalogClient {
    client: Client,
    config: CatalogClientConfig,
    /// Optional context label for provenance in logs (e.g., "batch", "lookup")
    context_label: Option<String>,
}

impl CatalogClient {
    /// Create a client from the catalog section of the app config
    pub fn from_catalog_config(catalog: &CatalogConfig) -> anyhow::Result<Self> {
        Self::with_config(CatalogClientConfig::from_catalog_config(catalog))
    }

    /// Create a client with custom configuration
    pub fn with_config(config: CatalogClientConfig) -> anyhow::Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(&config.user_agent)
            .default_headers(headers)
            .gzip(true)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create catalog HTTP client: {}", e))?;

        Ok(Self {
            client,
            config,
            context_label: None,
        })
    }

    /// Set a human-readable context label for logging provenance (returns self for chaining)
    pub fn with_context_label(mut self, label: &str) -> Self {
        self.context_label = Some(label.to_string());
        self
    }

    /// URL of a free-text search over the window `[from, to]`
    pub fn term_search_url(&self, term: &str, from: u32, to: u32) -> Result<Url, CatalogError> {
        self.search_url(&format!(
            "ft={}&_from={}&_to={}",
            urlencoding::encode(term),
            from,
            to
        ))
    }

    /// URL of an exact EAN lookup
    pub fn code_search_url(&self, code: &str) -> Result<Url, CatalogError> {
        self.search_url(&format!(
            "fq={}{}",
            site::EAN_FILTER_PREFIX,
            urlencoding::encode(code)
        ))
    }

    fn search_url(&self, query: &str) -> Result<Url, CatalogError> {
        let base = self.config.base_url.trim_end_matches('/');
        let raw = format!("{}{}?{}", base, site::SEARCH_PATH, query);
        Url::parse(&raw).map_err(|e| CatalogError::InvalidRequest {
            reason: format!("cannot build catalog URL from base '{base}': {e}"),
        })
    }

    /// Single GET, decoded into candidates
    async fn fetch_candidates(&self, url: Url) -> Result<Vec<CandidateProduct>, CatalogError> {
        let url_str = url.to_string();
        match &self.context_label {
            Some(label) => debug!("🌐 Catalog GET ({}): {}", label, url_str),
            None => debug!("🌐 Catalog GET: {}", url_str),
        }

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.transport_error(&e, &url_str))?;

        let status = response.status();
        if !status.is_success() {
            warn!("❌ Catalog HTTP error {}: {}", status, url_str);
            return Err(CatalogError::HttpStatus {
                status: status.as_u16(),
                url: url_str,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(&e, &url_str))?;

        let candidates = CatalogSchemaAdapter::decode_search_response(&body, &url_str)?;
        debug!("Catalog returned {} candidates: {}", candidates.len(), url_str);
        Ok(candidates)
    }

    fn transport_error(&self, error: &reqwest::Error, url: &str) -> CatalogError {
        if error.is_timeout() {
            CatalogError::Timeout {
                seconds: self.config.timeout_seconds,
                url: url.to_string(),
            }
        } else {
            CatalogError::Network {
                message: error.to_string(),
                url: url.to_string(),
            }
        }
    }
}

#[async_trait]
impl CatalogSource for CatalogClient {
    async fn search_by_term(
        &self,
        term: &str,
        from: u32,
        to: u32,
    ) -> Result<Vec<CandidateProduct>, CatalogError> {
        let url = self.term_search_url(term, from, to)?;
        self.fetch_candidates(url).await
    }

    async fn search_by_code(&self, code: &str) -> Result<Vec<CandidateProduct>, CatalogError> {
        let url = self.code_search_url(code)?;
        self.fetch_candidates(url).await
    }
}
