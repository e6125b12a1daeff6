//! Purchase records and their categorisation

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::site::SiteTag;

/// Spending category derived from the product name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Endodontia")]
    Endodontics,
    #[serde(rename = "Básico")]
    Basic,
    #[serde(rename = "Higiene")]
    Hygiene,
    #[serde(rename = "Anestesia")]
    Anesthesia,
    #[serde(rename = "Outros")]
    Other,
}

/// Keyword table, checked top to bottom.
const CATEGORY_KEYWORDS: [(&str, Category); 13] = [
    ("lima", Category::Endodontics),
    ("k-file", Category::Endodontics),
    ("hedstroem", Category::Endodontics),
    ("guta", Category::Endodontics),
    ("cone", Category::Endodontics),
    ("algodão", Category::Basic),
    ("gaze", Category::Basic),
    ("luva", Category::Basic),
    ("mascara", Category::Basic),
    ("máscara", Category::Basic),
    ("escova", Category::Hygiene),
    ("fio dental", Category::Hygiene),
    ("anest", Category::Anesthesia),
];

impl Category {
    /// First keyword contained in the lowercased name wins.
    pub fn infer(product_name: &str) -> Self {
        let lowered = product_name.to_lowercase();
        CATEGORY_KEYWORDS
            .iter()
            .find(|(keyword, _)| lowered.contains(keyword))
            .map_or(Self::Other, |(_, category)| *category)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Endodontics => "Endodontia",
            Self::Basic => "Básico",
            Self::Hygiene => "Higiene",
            Self::Anesthesia => "Anestesia",
            Self::Other => "Outros",
        }
    }

    /// Stored label back to a category; unknown or missing labels read as `Other`.
    pub fn from_label(label: Option<&str>) -> Self {
        match label {
            Some("Endodontia") => Self::Endodontics,
            Some("Básico") => Self::Basic,
            Some("Higiene") => Self::Hygiene,
            Some("Anestesia") => Self::Anesthesia,
            _ => Self::Other,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A validated purchase ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPurchase {
    pub product: String,
    pub brand: Option<String>,
    pub size: Option<String>,
    pub category: Category,
    pub quantity: u32,
    pub unit_price: f64,
    pub total_price: f64,
    pub supplier: Option<String>,
    pub url: Option<String>,
    pub site: SiteTag,
    pub purchase_date: NaiveDate,
}

impl NewPurchase {
    /// Derive category, total and site from the raw fields.
    ///
    /// A quantity of zero is treated as one.
    pub fn derive(
        product: String,
        brand: Option<String>,
        size: Option<String>,
        quantity: u32,
        unit_price: f64,
        supplier: Option<String>,
        url: Option<String>,
        site: Option<SiteTag>,
        purchase_date: NaiveDate,
    ) -> Self {
        let quantity = quantity.max(1);
        let category = Category::infer(&product);
        let site = site.unwrap_or_else(|| SiteTag::classify(url.as_deref()));
        Self {
            product,
            brand,
            size,
            category,
            quantity,
            unit_price,
            total_price: unit_price * f64::from(quantity),
            supplier,
            url,
            site,
            purchase_date,
        }
    }
}

/// A stored purchase row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseRecord {
    pub id: i64,
    #[serde(rename = "produto")]
    pub product: String,
    #[serde(rename = "marca")]
    pub brand: Option<String>,
    #[serde(rename = "tamanho")]
    pub size: Option<String>,
    #[serde(rename = "categoria")]
    pub category: Category,
    #[serde(rename = "quantidade")]
    pub quantity: u32,
    #[serde(rename = "valor_unitario")]
    pub unit_price: f64,
    #[serde(rename = "valor_total")]
    pub total_price: f64,
    #[serde(rename = "fornecedor")]
    pub supplier: Option<String>,
    pub url: Option<String>,
    pub site: SiteTag,
    #[serde(rename = "data_compra")]
    pub purchase_date: NaiveDate,
}

/// Half-open date window used by listings and reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    /// `[first of month, first of next month)`. `None` for an invalid month.
    pub fn month(year: i32, month: u32) -> Option<Self> {
        let start = NaiveDate::from_ymd_opt(year, month, 1)?;
        let end = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)?
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)?
        };
        Some(Self { start, end })
    }

    pub fn year(year: i32) -> Option<Self> {
        Some(Self {
            start: NaiveDate::from_ymd_opt(year, 1, 1)?,
            end: NaiveDate::from_ymd_opt(year + 1, 1, 1)?,
        })
    }
}

/// Listing filter, resolved from optional month/year parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PurchaseFilter {
    #[default]
    All,
    Window(DateWindow),
}

impl PurchaseFilter {
    /// Month and year → that month; month only → that month of `today`'s
    /// year; year only → the whole year; neither → everything.
    pub fn resolve(month: Option<u32>, year: Option<i32>, today: NaiveDate) -> Option<Self> {
        let window = match (month, year) {
            (Some(month), Some(year)) => DateWindow::month(year, month)?,
            (Some(month), None) => DateWindow::month(today.year(), month)?,
            (None, Some(year)) => DateWindow::year(year)?,
            (None, None) => return Some(Self::All),
        };
        Some(Self::Window(window))
    }
}
