//! Test utilities for odonto-monitor
//!
//! Provides an isolated in-memory database, a scripted page fetcher and a
//! ready-made application state so unit and integration tests share one
//! setup pattern.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Result;
use async_trait::async_trait;

use crate::api::AppState;
use crate::domain::errors::{ScrapeError, ScrapeOutcome};
use crate::domain::repositories::{PageFetcher, PurchaseRepository};
use crate::infrastructure::parsing::PriceExtractor;
use crate::infrastructure::{DatabaseConnection, SqlitePurchaseRepository};

/// Test database configuration
pub struct TestDatabase {
    pub connection: DatabaseConnection,
}

impl TestDatabase {
    /// Fresh, migrated in-memory database. Every call is fully isolated.
    pub async fn new() -> Result<Self> {
        let db = DatabaseConnection::in_memory().await?;
        db.migrate().await?;
        Ok(Self { connection: db })
    }

    pub fn pool(&self) -> sqlx::Pool<sqlx::Sqlite> {
        self.connection.pool().clone()
    }

    pub fn repository(&self) -> Arc<dyn PurchaseRepository> {
        Arc::new(SqlitePurchaseRepository::new(self.pool()))
    }
}

/// Scripted [`PageFetcher`]: registered URLs return their HTML, registered
/// failures return `PageUnreachable` with that status, anything else is a 404.
/// Clones share the request counter.
#[derive(Clone, Default)]
pub struct StubFetcher {
    pages: Arc<HashMap<String, String>>,
    failures: Arc<HashMap<String, Option<u16>>>,
    requests: Arc<AtomicUsize>,
}

impl StubFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_page(mut self, url: &str, html: String) -> Self {
        Arc::make_mut(&mut self.pages).insert(url.to_string(), html);
        self
    }

    /// `status: None` simulates a transport failure (timeout, refused).
    #[must_use]
    pub fn with_failure(mut self, url: &str, status: Option<u16>) -> Self {
        Arc::make_mut(&mut self.failures).insert(url.to_string(), status);
        self
    }

    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageFetcher for StubFetcher {
    async fn fetch_page(&self, url: &str) -> ScrapeOutcome<String> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        if let Some(status) = self.failures.get(url) {
            return Err(ScrapeError::unreachable(url, *status, "scripted failure"));
        }
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| ScrapeError::unreachable(url, Some(404), "Not Found"))
    }
}

/// Complete test context: database, fetcher and handler state wired together
pub struct TestContext {
    pub database: TestDatabase,
    pub fetcher: StubFetcher,
    pub state: AppState,
}

impl TestContext {
    pub async fn new(fetcher: StubFetcher) -> Result<Self> {
        let database = TestDatabase::new().await?;
        let extractor = Arc::new(PriceExtractor::new()?);
        let state = AppState::new(Arc::new(fetcher.clone()), extractor, database.repository());
        Ok(Self {
            database,
            fetcher,
            state,
        })
    }
}

/// Product page with a single `.price` element.
pub fn price_page(price_text: &str) -> String {
    format!(r#"<html><body><h1>Produto</h1><div class="price">R$ {price_text}</div></body></html>"#)
}
