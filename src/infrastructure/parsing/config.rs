//! Selector configuration for price extraction

/// Ordered e-commerce price hints. Earlier entries win over later ones.
pub const DEFAULT_PRICE_SELECTORS: [&str; 10] = [
    r#"[data-testid*="price"]"#,
    r#"[data-test*="price"]"#,
    ".price",
    ".value",
    ".sale-price",
    ".final-price",
    ".product-price",
    ".preco",
    ".valor",
    ".amount",
];

pub fn default_price_selectors() -> Vec<String> {
    DEFAULT_PRICE_SELECTORS.iter().map(ToString::to_string).collect()
}
