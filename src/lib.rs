//! Product Resolver - catalog price and category lookup
//!
//! Resolves product identifiers (EAN codes or free-text names) against a VTEX
//! storefront catalog and reports price, product link and category breadcrumb,
//! one at a time or for a whole spreadsheet-like batch.

// Module declarations
pub mod domain;
pub mod application;
pub mod infrastructure;

// Re-export the engine entry points for easier access
pub use application::{ResolutionError, ResolverService};
pub use domain::{BatchError, BatchRow, BatchRowInput, BatchTable, ResolutionResult};
pub use infrastructure::{AppConfig, CatalogClient, ConfigManager};
