//! Scraping error types
//!
//! Fetch failures and extraction misses share one enum so callers can match
//! on the kind without caring which stage produced it.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScrapeError {
    /// Transport failure or an HTTP status >= 400. `status` is `None` when
    /// no response arrived at all (timeout, DNS, refused connection).
    #[error("Page unreachable: {url}{}", status.map(|s| format!(" (status {s})")).unwrap_or_default())]
    PageUnreachable {
        url: String,
        status: Option<u16>,
        reason: String,
    },

    #[error("Price not found on page: {url}")]
    PriceNotFound { url: String },

    #[error("Invalid CSS selector: {selector} - {reason}")]
    InvalidSelector { selector: String, reason: String },
}

impl ScrapeError {
    pub fn unreachable(url: &str, status: Option<u16>, reason: impl Into<String>) -> Self {
        Self::PageUnreachable {
            url: url.to_string(),
            status,
            reason: reason.into(),
        }
    }

    pub fn price_not_found(url: &str) -> Self {
        Self::PriceNotFound { url: url.to_string() }
    }

    /// Whether re-invoking later could succeed.
    pub const fn is_recoverable(&self) -> bool {
        match self {
            Self::PageUnreachable { .. } | Self::PriceNotFound { .. } => true,
            Self::InvalidSelector { .. } => false,
        }
    }

    /// Upstream HTTP status, when one was received.
    pub const fn upstream_status(&self) -> Option<u16> {
        match self {
            Self::PageUnreachable { status, .. } => *status,
            _ => None,
        }
    }
}

pub type ScrapeOutcome<T> = Result<T, ScrapeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreachable_message_mentions_status_when_known() {
        let err = ScrapeError::unreachable("https://x.test/p", Some(503), "Service Unavailable");
        assert_eq!(err.to_string(), "Page unreachable: https://x.test/p (status 503)");
        assert_eq!(err.upstream_status(), Some(503));

        let err = ScrapeError::unreachable("https://x.test/p", None, "timed out");
        assert_eq!(err.to_string(), "Page unreachable: https://x.test/p");
        assert_eq!(err.upstream_status(), None);
    }

    #[test]
    fn recoverability() {
        assert!(ScrapeError::price_not_found("u").is_recoverable());
        assert!(ScrapeError::unreachable("u", Some(404), "nf").is_recoverable());
        let invalid = ScrapeError::InvalidSelector {
            selector: "[[".into(),
            reason: "bad".into(),
        };
        assert!(!invalid.is_recoverable());
    }
}
