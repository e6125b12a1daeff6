//! HTTP API
//!
//! Route paths and JSON field names are kept in Portuguese so existing
//! clients of the service keep working.

pub mod error;
pub mod handlers;
pub mod routes;

use std::sync::Arc;

use crate::application::{PriceMonitor, PurchaseService};
use crate::domain::repositories::{PageFetcher, PurchaseRepository};
use crate::infrastructure::parsing::PriceExtractor;

pub use error::ApiError;
pub use routes::build_router;

/// Shared handler state. Cheap to clone; every field is reference counted.
#[derive(Clone)]
pub struct AppState {
    pub price_monitor: PriceMonitor,
    pub purchases: PurchaseService,
}

impl AppState {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        extractor: Arc<PriceExtractor>,
        repository: Arc<dyn PurchaseRepository>,
    ) -> Self {
        Self {
            price_monitor: PriceMonitor::new(fetcher, extractor),
            purchases: PurchaseService::new(repository),
        }
    }
}
