//! Domain module - catalog candidates, resolution results and batch rows
//!
//! Value objects shared by the resolution engine and its callers.
//! Nothing in here performs I/O.

pub mod batch;
pub mod candidate;
pub mod catalog_source;
pub mod constants;
pub mod identifier;
pub mod resolution;

pub use batch::{BatchError, BatchRow, BatchRowInput, BatchTable};
pub use candidate::CandidateProduct;
pub use catalog_source::{CatalogError, CatalogSource};
pub use identifier::Identifier;
pub use resolution::ResolutionResult;
