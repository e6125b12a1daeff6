//! Watched items, scrape outcomes and detected price drops
//!
//! All three are request-scoped values: built once, never mutated, dropped
//! after the response goes out.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::site::SiteTag;

/// A product being price-monitored.
///
/// Only reachable through validated construction at the API boundary, so
/// `paid_price` is always finite and positive and `quantity` is at least 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchedItem {
    #[serde(rename = "url")]
    pub url: Option<String>,
    #[serde(rename = "preco_pago")]
    pub paid_price: f64,
    #[serde(rename = "produto")]
    pub product: Option<String>,
    #[serde(rename = "marca")]
    pub brand: Option<String>,
    #[serde(rename = "tamanho")]
    pub size: Option<String>,
    #[serde(rename = "quantidade")]
    pub quantity: u32,
    #[serde(rename = "fornecedor")]
    pub supplier: Option<String>,
    pub site: SiteTag,
    #[serde(rename = "data")]
    pub purchase_date: Option<NaiveDate>,
}

impl WatchedItem {
    /// Minimal item, mostly for tests and internal callers.
    pub fn new(url: Option<String>, paid_price: f64) -> Self {
        let site = SiteTag::classify(url.as_deref());
        Self {
            url,
            paid_price,
            product: None,
            brand: None,
            size: None,
            quantity: 1,
            supplier: None,
            site,
            purchase_date: None,
        }
    }

    /// URL to scrape, if any. Blank URLs count as missing.
    pub fn scrape_url(&self) -> Option<&str> {
        self.url.as_deref().map(str::trim).filter(|url| !url.is_empty())
    }
}

/// Outcome of fetching and parsing one product page.
///
/// `current_price` is `None` when extraction found nothing. Absence means
/// "no result", never "costs zero".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapeResult {
    pub url: String,
    pub site: SiteTag,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "preco_atual", skip_serializing_if = "Option::is_none", default)]
    pub current_price: Option<f64>,
}

impl ScrapeResult {
    /// Record stamped with `timestamp`; the caller owns the clock.
    pub fn at(url: &str, current_price: Option<f64>, timestamp: DateTime<Utc>) -> Self {
        Self {
            url: url.to_string(),
            site: SiteTag::classify(Some(url)),
            timestamp,
            current_price,
        }
    }

    pub const fn has_price(&self) -> bool {
        self.current_price.is_some()
    }
}

/// A current price strictly below what was paid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceDrop {
    pub item: WatchedItem,
    #[serde(rename = "preco_atual")]
    pub current_price: f64,
    #[serde(rename = "diferenca")]
    pub difference: f64,
    pub url: String,
    pub site: SiteTag,
}

impl PriceDrop {
    /// Compare a fresh scrape against the paid price.
    ///
    /// Emits a drop only for `0 < current < paid`. Zero is rejected so that
    /// stray `0,00` artifacts (free shipping banners and the like) never
    /// register as a drop.
    pub fn evaluate(item: &WatchedItem, scrape: &ScrapeResult) -> Option<Self> {
        let current = scrape.current_price?;
        if current <= 0.0 || current >= item.paid_price {
            return None;
        }
        Some(Self {
            item: item.clone(),
            current_price: current,
            difference: round_cents(item.paid_price - current),
            url: scrape.url.clone(),
            site: scrape.site,
        })
    }
}

/// Round to 2 decimal places, half away from zero.
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
