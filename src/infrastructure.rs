//! Infrastructure layer for the remote catalog, configuration and logging

pub mod catalog_client;
pub mod catalog_schema_adapter;
pub mod config;
pub mod logging;

// Re-export commonly used items
pub use catalog_client::{CatalogClient, CatalogClientConfig};
pub use catalog_schema_adapter::CatalogSchemaAdapter;
pub use config::{AppConfig, BatchConfig, CatalogConfig, ConfigManager, LoggingConfig};
pub use logging::{init_logging, init_logging_with_config, log_system_info};
