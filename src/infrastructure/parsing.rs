//! HTML price extraction
//!
//! Selector-driven scanning of product pages with a whole-page fallback.
//! Documents are parsed synchronously; `scraper::Html` is not `Send`, so it
//! never lives across an `.await`.

pub mod config;
pub mod price_extractor;

pub use config::{DEFAULT_PRICE_SELECTORS, default_price_selectors};
pub use price_extractor::PriceExtractor;
