//! Infrastructure layer for storage, page retrieval, parsing and process setup
//!
//! Implements the domain ports (`PageFetcher`, `PurchaseRepository`) and owns
//! configuration loading and logging initialization.

pub mod config;
pub mod database_connection;
pub mod http_client;
pub mod logging;
pub mod parsing;
pub mod purchase_repository;

// Re-export commonly used items
pub use config::{AppConfig, ConfigError, LoggingConfig, ScraperConfig};
pub use database_connection::DatabaseConnection;
pub use http_client::{HttpClient, HttpClientConfig};
pub use logging::{LogGuard, init_logging_with_config};
pub use parsing::PriceExtractor;
pub use purchase_repository::SqlitePurchaseRepository;
