//! Price extractor for product pages
//!
//! Candidates are gathered in a fixed order: every configured selector in
//! list order, the matching elements of each in document order, and finally
//! the raw HTML. The first candidate holding a positive amount wins and
//! scanning stops there; a `0,00` (free shipping, empty mini-cart) is
//! skipped like any other non-price.

use chrono::Utc;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use super::config::default_price_selectors;
use crate::domain::currency::parse_brl_price;
use crate::domain::errors::{ScrapeError, ScrapeOutcome};
use crate::domain::price_watch::ScrapeResult;

#[derive(Debug, Clone)]
pub struct PriceExtractor {
    selectors: Vec<Selector>,
}

impl PriceExtractor {
    /// Extractor with the built-in selector list.
    pub fn new() -> ScrapeOutcome<Self> {
        Self::with_selectors(&default_price_selectors())
    }

    /// Extractor with a custom ordered selector list.
    pub fn with_selectors(selector_strings: &[String]) -> ScrapeOutcome<Self> {
        Ok(Self {
            selectors: Self::compile_selectors(selector_strings)?,
        })
    }

    /// Compile selector strings, rejecting the whole list on the first bad
    /// entry so a typo in configuration surfaces at startup.
    fn compile_selectors(selector_strings: &[String]) -> ScrapeOutcome<Vec<Selector>> {
        selector_strings
            .iter()
            .map(|selector_str| {
                Selector::parse(selector_str).map_err(|e| {
                    warn!("Failed to compile selector '{}': {}", selector_str, e);
                    ScrapeError::InvalidSelector {
                        selector: selector_str.clone(),
                        reason: e.to_string(),
                    }
                })
            })
            .collect()
    }

    pub fn selector_count(&self) -> usize {
        self.selectors.len()
    }

    /// First positive price in scan order, or `None`.
    pub fn extract(&self, html: &str) -> Option<f64> {
        let document = Html::parse_document(html);
        let from_selectors = self
            .selectors
            .iter()
            .flat_map(|selector| document.select(selector))
            .filter_map(visible_text)
            .find_map(|text| positive_price(&text));

        match from_selectors {
            Some(price) => Some(price),
            None => {
                debug!("No selector candidate held a price; scanning full page");
                positive_price(html)
            }
        }
    }

    /// Build the scrape record for a page fetched from `url`.
    pub fn scrape(&self, url: &str, html: &str) -> ScrapeResult {
        let current_price = self.extract(html);
        let result = ScrapeResult::at(url, current_price, Utc::now());
        debug!(
            url = %url,
            site = %result.site,
            price = ?result.current_price,
            "Price extraction finished"
        );
        result
    }
}

fn positive_price(text: &str) -> Option<f64> {
    parse_brl_price(text).filter(|price| *price > 0.0)
}

/// Trimmed text nodes joined by single spaces; `None` when nothing is left.
fn visible_text(element: ElementRef<'_>) -> Option<String> {
    let text = element
        .text()
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    (!text.is_empty()).then_some(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::site::SiteTag;

    fn extractor() -> PriceExtractor {
        PriceExtractor::new().expect("default selectors compile")
    }

    #[test]
    fn default_selectors_all_compile() {
        assert_eq!(extractor().selector_count(), 10);
    }

    #[test]
    fn extracts_price_from_price_class() {
        let html = r#"<html><body><div class="price">R$ 89,90</div></body></html>"#;
        assert_eq!(extractor().extract(html), Some(89.90));
    }

    #[test]
    fn selector_order_beats_document_order() {
        // `.valor` appears first in the document but `.price` is listed earlier
        let html = r#"
            <div class="valor">R$ 10,00</div>
            <div class="price">R$ 20,00</div>
        "#;
        assert_eq!(extractor().extract(html), Some(20.0));
    }

    #[test]
    fn document_order_within_one_selector() {
        let html = r#"
            <span class="price">De R$ 1.234,56</span>
            <span class="price">Por R$ 999,00</span>
        "#;
        assert_eq!(extractor().extract(html), Some(1234.56));
    }

    #[test]
    fn data_attribute_hint_has_top_priority() {
        let html = r#"
            <div class="price">R$ 50,00</div>
            <div data-testid="product-price-final">R$ 45,10</div>
        "#;
        assert_eq!(extractor().extract(html), Some(45.10));
    }

    #[test]
    fn skips_matching_elements_without_a_price() {
        let html = r#"
            <div class="price">Consulte</div>
            <div class="preco">  R$   <b>7,25</b> </div>
        "#;
        assert_eq!(extractor().extract(html), Some(7.25));
    }

    #[test]
    fn falls_back_to_whole_page() {
        let html = r#"<p>Oferta: apenas 12,34 no boleto</p>"#;
        assert_eq!(extractor().extract(html), Some(12.34));
    }

    #[test]
    fn no_price_anywhere_is_none() {
        let html = "<html><body><h1>Produto indisponível</h1></body></html>";
        assert_eq!(extractor().extract(html), None);
    }

    #[test]
    fn empty_and_later_listed_elements_follow_scan_order() {
        // `.price` is listed before `.amount`; the empty `.price` is passed over
        let html = r#"<div class="amount">3,00</div><div class="price"></div><div class="price"> 1,00 </div>"#;
        assert_eq!(extractor().extract(html), Some(1.0));
    }

    #[test]
    fn zero_amount_does_not_hide_real_price() {
        let html = r#"
            <div class="price">Frete R$ 0,00</div>
            <div class="preco">R$ 79,90</div>
        "#;
        assert_eq!(extractor().extract(html), Some(79.90));
    }

    #[test]
    fn zero_only_page_has_no_price() {
        let html = r#"<div class="price">R$ 0,00</div><p>Carrinho: 0,00</p>"#;
        assert_eq!(extractor().extract(html), None);
        assert!(!extractor().scrape("https://www.dentalspeed.com/kit", html).has_price());
    }

    #[test]
    fn custom_selectors_replace_defaults() {
        let extractor = PriceExtractor::with_selectors(&["#buy-box .now".to_string()]).unwrap();
        let html = r#"<div class="price">9,99</div><div id="buy-box"><span class="now">8,49</span></div>"#;
        assert_eq!(extractor.extract(html), Some(8.49));
    }

    #[test]
    fn invalid_selector_is_rejected() {
        let err = PriceExtractor::with_selectors(&[".price".to_string(), "[[nope".to_string()]).unwrap_err();
        assert!(matches!(err, ScrapeError::InvalidSelector { ref selector, .. } if selector == "[[nope"));
    }

    #[test]
    fn scrape_tags_site_and_price() {
        let html = r#"<span class="final-price">R$ 1.050,00</span>"#;
        let result = extractor().scrape("https://www.suryadental.com.br/kit", html);
        assert_eq!(result.site, SiteTag::SuryaDental);
        assert_eq!(result.current_price, Some(1050.0));
        assert!(result.has_price());
    }
}
