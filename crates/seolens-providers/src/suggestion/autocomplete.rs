//! Keyless public autocomplete endpoints (Google suggest, DuckDuckGo).
//!
//! Both answer with the OpenSearch suggestion shape `[query, [suggestion, ...]]`.

use reqwest::{Client, Url};
use serde_json::Value;
use seolens_core::{KeywordSuggestion, Locale, SuggestionSource};

use crate::error::ProviderError;
use crate::http::{build_client, endpoint, send_json, HttpSettings};
use crate::retry::retry_with_backoff;

const GOOGLE: &str = "google_autocomplete";
const DUCKDUCKGO: &str = "duckduckgo_autocomplete";
const GOOGLE_BASE_URL: &str = "https://suggestqueries.google.com/";
const DUCKDUCKGO_BASE_URL: &str = "https://duckduckgo.com/";

pub struct PublicAutocompleteClient {
    client: Client,
    google_url: Url,
    duckduckgo_url: Url,
    settings: HttpSettings,
}

impl PublicAutocompleteClient {
    /// # Errors
    ///
    /// Returns [`ProviderError::Configuration`] if the HTTP client cannot be built.
    pub fn new(settings: HttpSettings) -> Result<Self, ProviderError> {
        Self::with_base_urls(settings, GOOGLE_BASE_URL, DUCKDUCKGO_BASE_URL)
    }

    /// # Errors
    ///
    /// Returns [`ProviderError::Configuration`] if the HTTP client cannot be
    /// built or either base URL is invalid.
    pub fn with_base_urls(
        settings: HttpSettings,
        google_base_url: &str,
        duckduckgo_base_url: &str,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            client: build_client(GOOGLE, &settings)?,
            google_url: endpoint(GOOGLE, google_base_url, "complete/search")?,
            duckduckgo_url: endpoint(DUCKDUCKGO, duckduckgo_base_url, "ac/")?,
            settings,
        })
    }

    /// # Errors
    ///
    /// See [`ProviderError`].
    pub async fn google(
        &self,
        seed: &str,
        locale: &Locale,
    ) -> Result<Vec<KeywordSuggestion>, ProviderError> {
        let body = retry_with_backoff(
            self.settings.max_retries,
            self.settings.retry_backoff_ms,
            || {
                let request = self.client.get(self.google_url.clone()).query(&[
                    ("client", "firefox"),
                    ("q", seed),
                    ("hl", locale.language.as_str()),
                    ("gl", locale.country.as_str()),
                ]);
                send_json(GOOGLE, request)
            },
        )
        .await?;
        Ok(parse_opensearch(GOOGLE, &body, SuggestionSource::GoogleAutocomplete))
    }

    /// # Errors
    ///
    /// See [`ProviderError`].
    pub async fn duckduckgo(
        &self,
        seed: &str,
        locale: &Locale,
    ) -> Result<Vec<KeywordSuggestion>, ProviderError> {
        let region = format!("{}-{}", locale.country, locale.language);
        let body = retry_with_backoff(
            self.settings.max_retries,
            self.settings.retry_backoff_ms,
            || {
                let request = self.client.get(self.duckduckgo_url.clone()).query(&[
                    ("q", seed),
                    ("type", "list"),
                    ("kl", region.as_str()),
                ]);
                send_json(DUCKDUCKGO, request)
            },
        )
        .await?;
        Ok(parse_opensearch(
            DUCKDUCKGO,
            &body,
            SuggestionSource::DuckduckgoAutocomplete,
        ))
    }
}

fn parse_opensearch(
    provider: &'static str,
    body: &Value,
    source: SuggestionSource,
) -> Vec<KeywordSuggestion> {
    let Some(items) = body.get(1).and_then(Value::as_array) else {
        tracing::warn!(provider, "response is not an OpenSearch suggestion list");
        return Vec::new();
    };
    items
        .iter()
        .filter_map(Value::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(|text| KeywordSuggestion::new(text, source))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_opensearch_pairs() {
        let body = json!(["seo", ["seo tools", "seo meaning", 7, ""]]);
        let parsed = parse_opensearch(GOOGLE, &body, SuggestionSource::GoogleAutocomplete);
        let keywords: Vec<&str> = parsed.iter().map(|k| k.keyword.as_str()).collect();
        assert_eq!(keywords, vec!["seo tools", "seo meaning"]);
    }

    #[test]
    fn object_body_yields_empty() {
        let body = json!({ "phrase": "seo tools" });
        assert!(parse_opensearch(DUCKDUCKGO, &body, SuggestionSource::DuckduckgoAutocomplete)
            .is_empty());
    }
}
