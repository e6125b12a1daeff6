//! Ports the application layer depends on
//!
//! Storage and page retrieval sit behind these traits so the price and
//! purchase services can be exercised without a network or a database file.

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::purchase::{DateWindow, NewPurchase, PurchaseFilter, PurchaseRecord};
use crate::domain::report::{CategoryTotals, ItemSummary};
use crate::domain::errors::ScrapeOutcome;

/// Retrieves raw HTML for a product page.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// One GET, no retries. Any transport failure or status >= 400 comes
    /// back as `ScrapeError::PageUnreachable`.
    async fn fetch_page(&self, url: &str) -> ScrapeOutcome<String>;
}

#[async_trait]
pub trait PurchaseRepository: Send + Sync {
    /// Store every purchase or none of them.
    async fn insert_batch(&self, purchases: &[NewPurchase]) -> Result<usize>;

    /// Newest first.
    async fn list(&self, filter: PurchaseFilter) -> Result<Vec<PurchaseRecord>>;

    async fn total_spent(&self, window: DateWindow) -> Result<f64>;

    /// Grouped by (item, category), highest spend first.
    async fn item_summaries(&self, window: DateWindow) -> Result<Vec<ItemSummary>>;

    async fn category_totals(&self, window: DateWindow) -> Result<CategoryTotals>;
}
