//! Application layer module
//!
//! The resolution engine: normalization, scoring, field extraction, the
//! per-identifier fallback chain and the batch loop on top of it.

pub mod normalizer;
pub mod scorer;
pub mod extractor;
pub mod resolution_strategy;
pub mod batch_resolver;
pub mod resolver_service;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used items
pub use batch_resolver::BatchResolver;
pub use extractor::FieldExtractor;
pub use resolution_strategy::{ResolutionError, ResolutionStrategy, SearchStep};
pub use resolver_service::ResolverService;
