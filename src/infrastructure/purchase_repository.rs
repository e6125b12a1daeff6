//! SQLite-backed purchase storage and spending aggregation

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::{debug, info};

use crate::domain::purchase::{Category, DateWindow, NewPurchase, PurchaseFilter, PurchaseRecord};
use crate::domain::report::{CategoryTotals, ItemSummary};
use crate::domain::repositories::PurchaseRepository;
use crate::domain::site::SiteTag;

const LIST_ALL_SQL: &str = r"
    SELECT id, product, brand, size, category, quantity, unit_price, total_price, supplier, url, site, purchase_date
    FROM purchases
    ORDER BY purchase_date DESC, id DESC
";

const LIST_WINDOW_SQL: &str = r"
    SELECT id, product, brand, size, category, quantity, unit_price, total_price, supplier, url, site, purchase_date
    FROM purchases
    WHERE purchase_date >= ? AND purchase_date < ?
    ORDER BY purchase_date DESC, id DESC
";

#[derive(Clone)]
pub struct SqlitePurchaseRepository {
    pool: SqlitePool,
}

impl SqlitePurchaseRepository {
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_record(row: &SqliteRow) -> Result<PurchaseRecord> {
        let quantity: i64 = row.try_get("quantity")?;
        let category: Option<String> = row.try_get("category")?;
        let site: Option<String> = row.try_get("site")?;
        let purchase_date: NaiveDate = row.try_get("purchase_date")?;

        Ok(PurchaseRecord {
            id: row.try_get("id")?,
            product: row.try_get("product")?,
            brand: row.try_get("brand")?,
            size: row.try_get("size")?,
            category: Category::from_label(category.as_deref()),
            quantity: u32::try_from(quantity).context("stored quantity out of range")?,
            unit_price: row.try_get("unit_price")?,
            total_price: row.try_get("total_price")?,
            supplier: row.try_get("supplier")?,
            url: row.try_get("url")?,
            site: site.as_deref().map_or(SiteTag::Unknown, SiteTag::from_stored),
            purchase_date,
        })
    }
}

#[async_trait]
impl PurchaseRepository for SqlitePurchaseRepository {
    async fn insert_batch(&self, purchases: &[NewPurchase]) -> Result<usize> {
        // Dropping `tx` on an early return rolls the whole batch back
        let mut tx = self.pool.begin().await.context("Failed to open transaction")?;

        for purchase in purchases {
            sqlx::query(
                r"
                INSERT INTO purchases
                (product, brand, size, category, quantity, unit_price, total_price, supplier, url, site, purchase_date)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                ",
            )
            .bind(&purchase.product)
            .bind(&purchase.brand)
            .bind(&purchase.size)
            .bind(purchase.category.label())
            .bind(i64::from(purchase.quantity))
            .bind(purchase.unit_price)
            .bind(purchase.total_price)
            .bind(&purchase.supplier)
            .bind(&purchase.url)
            .bind(purchase.site.as_str())
            .bind(purchase.purchase_date)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Failed to insert purchase '{}'", purchase.product))?;
        }

        tx.commit().await.context("Failed to commit purchase batch")?;
        info!("💾 Stored {} purchases", purchases.len());
        Ok(purchases.len())
    }

    async fn list(&self, filter: PurchaseFilter) -> Result<Vec<PurchaseRecord>> {
        let rows = match filter {
            PurchaseFilter::All => sqlx::query(LIST_ALL_SQL).fetch_all(&self.pool).await?,
            PurchaseFilter::Window(window) => {
                sqlx::query(LIST_WINDOW_SQL)
                    .bind(window.start)
                    .bind(window.end)
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        debug!("Loaded {} purchase rows", rows.len());
        rows.iter().map(Self::row_to_record).collect()
    }

    async fn total_spent(&self, window: DateWindow) -> Result<f64> {
        let total: f64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(total_price), 0.0) FROM purchases WHERE purchase_date >= ? AND purchase_date < ?",
        )
        .bind(window.start)
        .bind(window.end)
        .fetch_one(&self.pool)
        .await?;
        Ok(total)
    }

    async fn item_summaries(&self, window: DateWindow) -> Result<Vec<ItemSummary>> {
        let rows = sqlx::query(
            r"
            SELECT product AS item,
                   category,
                   COALESCE(SUM(quantity), 0) AS total_qty,
                   COALESCE(SUM(total_price), 0.0) AS total_spent
            FROM purchases
            WHERE purchase_date >= ? AND purchase_date < ?
            GROUP BY product, category
            ORDER BY total_spent DESC
            ",
        )
        .bind(window.start)
        .bind(window.end)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                let category: Option<String> = row.try_get("category")?;
                let total_qty: i64 = row.try_get("total_qty")?;
                Ok(ItemSummary::new(
                    row.try_get("item")?,
                    Category::from_label(category.as_deref()),
                    u64::try_from(total_qty).unwrap_or(0),
                    row.try_get("total_spent")?,
                ))
            })
            .collect()
    }

    async fn category_totals(&self, window: DateWindow) -> Result<CategoryTotals> {
        let rows = sqlx::query(
            r"
            SELECT COALESCE(category, 'Outros') AS category,
                   COALESCE(SUM(total_price), 0.0) AS total_spent
            FROM purchases
            WHERE purchase_date >= ? AND purchase_date < ?
            GROUP BY COALESCE(category, 'Outros')
            ",
        )
        .bind(window.start)
        .bind(window.end)
        .fetch_all(&self.pool)
        .await?;

        let mut totals = CategoryTotals::new();
        for row in &rows {
            let category: String = row.try_get("category")?;
            let spent: f64 = row.try_get("total_spent")?;
            *totals.entry(category).or_insert(0.0) += spent;
        }
        Ok(totals)
    }
}
