//! Domain module - core business rules and entities
//!
//! Everything in here is pure: no I/O and no clock reads. Timestamps and
//! "today" are passed in by the infrastructure and application layers.

pub mod currency;
pub mod errors;
pub mod price_watch;
pub mod purchase;
pub mod report;
pub mod repositories;
pub mod site;

// Re-export commonly used items for convenience
pub use currency::parse_brl_price;
pub use errors::{ScrapeError, ScrapeOutcome};
pub use price_watch::{PriceDrop, ScrapeResult, WatchedItem};
pub use purchase::{Category, NewPurchase, PurchaseFilter, PurchaseRecord};
pub use report::{CategoryTotals, ItemSummary, MonthlyReport};
pub use repositories::{PageFetcher, PurchaseRepository};
pub use site::SiteTag;
