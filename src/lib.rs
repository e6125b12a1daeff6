//! Odonto Monitor - dental supplies price tracking and purchase logging
//!
//! Scrapes product pages for their current price, flags drops against what
//! was paid, stores purchases in SQLite and aggregates monthly spending.

// Module declarations
pub mod api;
pub mod application;
pub mod domain;
pub mod infrastructure;

#[doc(hidden)]
pub mod test_utils;

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::api::AppState;
use crate::infrastructure::{AppConfig, DatabaseConnection, HttpClient, PriceExtractor, SqlitePurchaseRepository};

/// Wire the production state: HTTP fetcher, configured extractor and a
/// migrated SQLite repository.
pub async fn build_state(config: &AppConfig) -> Result<AppState> {
    let fetcher = HttpClient::from_scraper_config(&config.scraper)?;
    let extractor = PriceExtractor::with_selectors(&config.scraper.price_selectors)
        .context("Invalid scraper.price_selectors")?;

    let database = DatabaseConnection::with_max_connections(&config.database.url, config.database.max_connections)
        .await?;
    database.migrate().await?;
    let repository = SqlitePurchaseRepository::new(database.pool().clone());

    Ok(AppState::new(Arc::new(fetcher), Arc::new(extractor), Arc::new(repository)))
}
