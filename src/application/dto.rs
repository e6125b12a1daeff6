//! Data Transfer Objects for the HTTP boundary
//!
//! Request payloads are validated exactly once here and turned into domain
//! values; nothing past this module sees an unchecked field.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;
use url::Url;

use crate::domain::price_watch::{PriceDrop, WatchedItem};
use crate::domain::purchase::{NewPurchase, PurchaseFilter, PurchaseRecord};
use crate::domain::report::MonthlyReport;
use crate::domain::site::SiteTag;

pub const REPORT_YEARS: std::ops::RangeInclusive<i32> = 2000..=2100;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid {field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

// ============================================================================
// Item payloads
// ============================================================================

/// One item as sent by clients, shared by drop checks and registrations.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemInput {
    #[serde(default)]
    pub url: Option<String>,
    pub preco_pago: f64,
    #[serde(default)]
    pub produto: Option<String>,
    #[serde(default)]
    pub marca: Option<String>,
    #[serde(default)]
    pub tamanho: Option<String>,
    #[serde(default)]
    pub quantidade: Option<u32>,
    #[serde(default)]
    pub fornecedor: Option<String>,
    #[serde(default)]
    pub site: Option<SiteTag>,
    /// `YYYY-MM-DD`
    #[serde(default)]
    pub data: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn parse_date(raw: Option<&str>) -> Option<NaiveDate> {
    raw.and_then(|value| NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok())
}

impl ItemInput {
    /// Validate for price monitoring. The paid price must be positive.
    pub fn into_watched_item(self, field: &str) -> Result<WatchedItem, ValidationError> {
        if !self.preco_pago.is_finite() || self.preco_pago <= 0.0 {
            return Err(ValidationError::new(
                format!("{field}.preco_pago"),
                "must be a number greater than 0",
            ));
        }

        let url = non_blank(self.url);
        let site = self.site.unwrap_or_else(|| SiteTag::classify(url.as_deref()));
        Ok(WatchedItem {
            purchase_date: parse_date(self.data.as_deref()),
            url,
            paid_price: self.preco_pago,
            product: non_blank(self.produto),
            brand: non_blank(self.marca),
            size: non_blank(self.tamanho),
            quantity: self.quantidade.unwrap_or(1).max(1),
            supplier: non_blank(self.fornecedor),
            site,
        })
    }

    /// Validate for registration. A missing or malformed date becomes `today`.
    pub fn into_new_purchase(self, field: &str, today: NaiveDate) -> Result<NewPurchase, ValidationError> {
        let Some(product) = non_blank(self.produto) else {
            return Err(ValidationError::new(format!("{field}.produto"), "must not be blank"));
        };
        if !self.preco_pago.is_finite() || self.preco_pago < 0.0 {
            return Err(ValidationError::new(
                format!("{field}.preco_pago"),
                "must be a number greater than or equal to 0",
            ));
        }

        let purchase_date = match self.data.as_deref() {
            None => today,
            Some(raw) => parse_date(Some(raw)).unwrap_or_else(|| {
                warn!(field = %field, value = %raw, "Unparseable purchase date, using today");
                today
            }),
        };

        Ok(NewPurchase::derive(
            product,
            non_blank(self.marca),
            non_blank(self.tamanho),
            self.quantidade.unwrap_or(1),
            self.preco_pago,
            non_blank(self.fornecedor),
            non_blank(self.url),
            self.site,
            purchase_date,
        ))
    }
}

fn require_items(items: &[ItemInput]) -> Result<(), ValidationError> {
    if items.is_empty() {
        return Err(ValidationError::new("itens", "at least one item is required"));
    }
    Ok(())
}

// ============================================================================
// Price checks
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct PriceQuery {
    pub url: String,
}

impl PriceQuery {
    /// Trimmed URL, which must be an absolute `http`/`https` URL.
    pub fn validated_url(&self) -> Result<&str, ValidationError> {
        let url = self.url.trim();
        if url.is_empty() {
            return Err(ValidationError::new("url", "must not be blank"));
        }
        let parsed = Url::parse(url).map_err(|e| ValidationError::new("url", e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ValidationError::new("url", "only http and https are supported"));
        }
        Ok(url)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CheckDropsRequest {
    pub itens: Vec<ItemInput>,
}

impl CheckDropsRequest {
    pub fn into_items(self) -> Result<Vec<WatchedItem>, ValidationError> {
        require_items(&self.itens)?;
        self.itens
            .into_iter()
            .enumerate()
            .map(|(index, item)| item.into_watched_item(&format!("itens[{index}]")))
            .collect()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckDropsResponse {
    pub baixas: Vec<PriceDrop>,
}

// ============================================================================
// Purchases
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterPurchasesRequest {
    pub itens: Vec<ItemInput>,
}

impl RegisterPurchasesRequest {
    pub fn into_purchases(self, today: NaiveDate) -> Result<Vec<NewPurchase>, ValidationError> {
        require_items(&self.itens)?;
        self.itens
            .into_iter()
            .enumerate()
            .map(|(index, item)| item.into_new_purchase(&format!("itens[{index}]"), today))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterPurchasesResponse {
    pub status: String,
    pub inseridos: usize,
}

impl RegisterPurchasesResponse {
    pub fn ok(inserted: usize) -> Self {
        Self {
            status: "ok".to_string(),
            inseridos: inserted,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PurchaseListQuery {
    pub mes: Option<u32>,
    pub ano: Option<i32>,
}

impl PurchaseListQuery {
    pub fn to_filter(self, today: NaiveDate) -> Result<PurchaseFilter, ValidationError> {
        if let Some(month) = self.mes {
            if !(1..=12).contains(&month) {
                return Err(ValidationError::new("mes", "must be between 1 and 12"));
            }
        }
        if let Some(year) = self.ano {
            if !REPORT_YEARS.contains(&year) {
                return Err(ValidationError::new("ano", "must be between 2000 and 2100"));
            }
        }
        PurchaseFilter::resolve(self.mes, self.ano, today)
            .ok_or_else(|| ValidationError::new("ano", "is not a representable year"))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PurchaseListResponse {
    pub total_registros: usize,
    pub compras: Vec<PurchaseRecord>,
}

impl From<Vec<PurchaseRecord>> for PurchaseListResponse {
    fn from(compras: Vec<PurchaseRecord>) -> Self {
        Self {
            total_registros: compras.len(),
            compras,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct MonthlyReportQuery {
    pub ano: i32,
    pub mes: u32,
}

impl MonthlyReportQuery {
    pub fn validate(self) -> Result<(i32, u32), ValidationError> {
        if !REPORT_YEARS.contains(&self.ano) {
            return Err(ValidationError::new("ano", "must be between 2000 and 2100"));
        }
        if !(1..=12).contains(&self.mes) {
            return Err(ValidationError::new("mes", "must be between 1 and 12"));
        }
        Ok((self.ano, self.mes))
    }
}

pub type MonthlyReportResponse = MonthlyReport;
