//! Purchase registration, listing and monthly reporting

use std::sync::Arc;

use anyhow::{Result, anyhow};
use tracing::info;

use crate::domain::purchase::{DateWindow, NewPurchase, PurchaseFilter, PurchaseRecord};
use crate::domain::report::MonthlyReport;
use crate::domain::repositories::PurchaseRepository;

#[derive(Clone)]
pub struct PurchaseService {
    repository: Arc<dyn PurchaseRepository>,
}

impl PurchaseService {
    pub fn new(repository: Arc<dyn PurchaseRepository>) -> Self {
        Self { repository }
    }

    /// Store the whole batch or nothing. Returns the number inserted.
    pub async fn register(&self, purchases: &[NewPurchase]) -> Result<usize> {
        let inserted = self.repository.insert_batch(purchases).await?;
        info!("Registered {} purchases", inserted);
        Ok(inserted)
    }

    pub async fn list(&self, filter: PurchaseFilter) -> Result<Vec<PurchaseRecord>> {
        self.repository.list(filter).await
    }

    pub async fn monthly_report(&self, year: i32, month: u32) -> Result<MonthlyReport> {
        let window = DateWindow::month(year, month).ok_or_else(|| anyhow!("Invalid month {year}-{month:02}"))?;

        let total_spent = self.repository.total_spent(window).await?;
        let by_item = self.repository.item_summaries(window).await?;
        let by_category = self.repository.category_totals(window).await?;

        Ok(MonthlyReport {
            year,
            month,
            total_spent,
            by_item,
            by_category,
        })
    }
}
