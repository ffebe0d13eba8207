//! Catalog source interface
//!
//! The two remote query shapes the resolution engine needs. The HTTP
//! implementation lives in `infrastructure::catalog_client`.

use async_trait::async_trait;
use thiserror::Error;

use super::candidate::CandidateProduct;

/// Failures of a single catalog query
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("catalog request timed out after {seconds}s: {url}")]
    Timeout { seconds: u64, url: String },

    #[error("catalog request failed: {message}")]
    Network { message: String, url: String },

    #[error("catalog returned HTTP {status}: {url}")]
    HttpStatus { status: u16, url: String },

    #[error("malformed catalog response: {reason}")]
    MalformedResponse { reason: String, url: String },

    #[error("invalid catalog request: {reason}")]
    InvalidRequest { reason: String },
}

impl CatalogError {
    /// Remote failures (timeout, transport, status, body) are recoverable by
    /// trying the next search strategy. Anything else is a setup problem.
    pub const fn is_remote(&self) -> bool {
        !matches!(self, Self::InvalidRequest { .. })
    }
}

#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Free-text search over the result window `[from, to]`
    async fn search_by_term(
        &self,
        term: &str,
        from: u32,
        to: u32,
    ) -> Result<Vec<CandidateProduct>, CatalogError>;

    /// Exact product-code (EAN) lookup
    async fn search_by_code(&self, code: &str) -> Result<Vec<CandidateProduct>, CatalogError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_invalid_requests_are_not_remote() {
        let timeout = CatalogError::Timeout {
            seconds: 25,
            url: "u".into(),
        };
        let status = CatalogError::HttpStatus {
            status: 503,
            url: "u".into(),
        };
        let invalid = CatalogError::InvalidRequest {
            reason: "bad base url".into(),
        };
        assert!(timeout.is_remote());
        assert!(status.is_remote());
        assert!(!invalid.is_remote());
        assert_eq!(status.to_string(), "catalog returned HTTP 503: u");
    }
}
