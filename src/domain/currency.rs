//! Brazilian Real amount parsing
//!
//! Recognises `1.234,56`, `12,34` and `1234,56`: optional `.` thousands
//! separators, a `,` decimal separator and exactly two fractional digits.

use once_cell::sync::Lazy;
use regex::Regex;

/// First BRL-formatted amount in a string, scanning left to right.
///
/// ASCII digits only; other Unicode digit classes never appear in vendor
/// price markup and would not survive `f64` parsing anyway.
static BRL_AMOUNT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([0-9]{1,3}(?:\.[0-9]{3})*|[0-9]+),[0-9]{2}").expect("BRL amount pattern is a valid regex")
});

/// Extract the first BRL amount found in `text`.
///
/// Returns `None` when nothing matches; never zero-as-sentinel and never
/// an error. Pure and side-effect free.
pub fn parse_brl_price(text: &str) -> Option<f64> {
    if text.is_empty() {
        return None;
    }
    let raw = BRL_AMOUNT.find(text)?.as_str();
    raw.replace('.', "").replace(',', ".").parse::<f64>().ok()
}
