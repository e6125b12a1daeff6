//! Monthly spending report shapes

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::purchase::Category;

/// Spend per category label, sorted by label for stable output.
pub type CategoryTotals = BTreeMap<String, f64>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemSummary {
    pub item: String,
    #[serde(rename = "categoria")]
    pub category: Category,
    pub total_qty: u64,
    #[serde(rename = "total_gasto")]
    pub total_spent: f64,
    #[serde(rename = "gasto_medio")]
    pub average_spent: f64,
}

impl ItemSummary {
    /// Average is spend over quantity, or zero when nothing was bought.
    pub fn new(item: String, category: Category, total_qty: u64, total_spent: f64) -> Self {
        #[allow(clippy::cast_precision_loss)]
        let average_spent = if total_qty == 0 { 0.0 } else { total_spent / total_qty as f64 };
        Self {
            item,
            category,
            total_qty,
            total_spent,
            average_spent,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyReport {
    #[serde(rename = "ano")]
    pub year: i32,
    #[serde(rename = "mes")]
    pub month: u32,
    #[serde(rename = "total_gasto")]
    pub total_spent: f64,
    #[serde(rename = "por_item")]
    pub by_item: Vec<ItemSummary>,
    #[serde(rename = "por_categoria")]
    pub by_category: CategoryTotals,
}
