//! Vendor classification for product URLs

use serde::{Deserialize, Serialize};
use std::fmt;

/// Known dental-supply vendors plus a catch-all.
///
/// The wire form is the lowercase vendor name. `desconhecido` is still
/// accepted on input for clients that predate the `unknown` spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SiteTag {
    DentalCremer,
    DentalSpeed,
    SuryaDental,
    #[default]
    #[serde(alias = "desconhecido")]
    Unknown,
}

/// Domain fragments checked in priority order; first hit wins.
const VENDOR_FRAGMENTS: [(&str, SiteTag); 3] = [
    ("dentalcremer", SiteTag::DentalCremer),
    ("dentalspeed", SiteTag::DentalSpeed),
    ("suryadental", SiteTag::SuryaDental),
];

impl SiteTag {
    /// Classify a URL by case-insensitive substring match.
    ///
    /// Never fails: `None`, empty or malformed input all yield `Unknown`.
    pub fn classify(url: Option<&str>) -> Self {
        let lowered = url.unwrap_or_default().to_lowercase();
        VENDOR_FRAGMENTS
            .iter()
            .find(|(fragment, _)| lowered.contains(fragment))
            .map_or(Self::Unknown, |(_, tag)| *tag)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DentalCremer => "dentalcremer",
            Self::DentalSpeed => "dentalspeed",
            Self::SuryaDental => "suryadental",
            Self::Unknown => "unknown",
        }
    }

    /// Parse a stored tag; anything unrecognised maps to `Unknown`.
    pub fn from_stored(value: &str) -> Self {
        match value {
            "dentalcremer" => Self::DentalCremer,
            "dentalspeed" => Self::DentalSpeed,
            "suryadental" => Self::SuryaDental,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for SiteTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
