//! Price lookups and drop detection
//!
//! Pages are fetched one at a time. A batch check never fails as a whole:
//! an item that cannot be scraped is logged and left out of the result.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::errors::{ScrapeError, ScrapeOutcome};
use crate::domain::price_watch::{PriceDrop, ScrapeResult, WatchedItem};
use crate::domain::repositories::PageFetcher;
use crate::infrastructure::parsing::PriceExtractor;

#[derive(Clone)]
pub struct PriceMonitor {
    fetcher: Arc<dyn PageFetcher>,
    extractor: Arc<PriceExtractor>,
}

impl PriceMonitor {
    pub fn new(fetcher: Arc<dyn PageFetcher>, extractor: Arc<PriceExtractor>) -> Self {
        Self { fetcher, extractor }
    }

    /// Fetch and parse one page. A page without a price is still `Ok`, with
    /// `current_price` left empty.
    pub async fn scrape(&self, url: &str) -> ScrapeOutcome<ScrapeResult> {
        let html = self.fetcher.fetch_page(url).await?;
        Ok(self.extractor.scrape(url, &html))
    }

    /// Single-price lookup: a page without a price is `PriceNotFound`.
    pub async fn current_price(&self, url: &str) -> ScrapeOutcome<ScrapeResult> {
        let result = self.scrape(url).await?;
        if result.has_price() {
            Ok(result)
        } else {
            info!(url = %url, "Price not found on page");
            Err(ScrapeError::price_not_found(url))
        }
    }

    /// Drops for `items`, in input order. Items without a URL and items whose
    /// page cannot be fetched or parsed are skipped.
    pub async fn detect_drops(&self, items: &[WatchedItem]) -> Vec<PriceDrop> {
        let mut drops = Vec::new();

        for (index, item) in items.iter().enumerate() {
            let Some(url) = item.scrape_url() else {
                debug!(index, "Skipping item without URL");
                continue;
            };

            let scrape = match self.scrape(url).await {
                Ok(scrape) => scrape,
                Err(e) => {
                    warn!(index, url = %url, error = %e, "Skipping item: page could not be scraped");
                    continue;
                }
            };

            match PriceDrop::evaluate(item, &scrape) {
                Some(drop) => {
                    info!(
                        url = %url,
                        paid = item.paid_price,
                        current = drop.current_price,
                        difference = drop.difference,
                        "📉 Price drop detected"
                    );
                    drops.push(drop);
                }
                None => debug!(index, url = %url, price = ?scrape.current_price, "No drop"),
            }
        }

        info!("Checked {} items, {} drops", items.len(), drops.len());
        drops
    }
}
