use serde::{Deserialize, Serialize};

/// Language/country pair used by every provider call and cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locale {
    pub language: String,
    pub country: String,
}

impl Locale {
    #[must_use]
    pub fn new(language: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            language: language.into().to_ascii_lowercase(),
            country: country.into().to_ascii_lowercase(),
        }
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::new("en", "us")
    }
}

/// Maps an ISO country code to the geo location code shared by DataForSEO and
/// Google Ads. Unknown countries fall back to the United States.
#[must_use]
pub fn location_code(country: &str) -> u32 {
    match country.to_ascii_lowercase().as_str() {
        "uk" | "gb" => 2826,
        "ca" => 2124,
        "au" => 2036,
        "in" => 2356,
        _ => 2840,
    }
}
