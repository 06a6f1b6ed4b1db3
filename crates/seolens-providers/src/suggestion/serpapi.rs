//! SerpApi `google_autocomplete` engine (secondary, free tier).

use reqwest::{Client, Url};
use serde_json::Value;
use seolens_core::{KeywordSuggestion, Locale, SuggestionSource};

use crate::error::ProviderError;
use crate::http::{build_client, endpoint, send_json, HttpSettings};
use crate::retry::retry_with_backoff;

const PROVIDER: &str = "serpapi_autocomplete";
const DEFAULT_BASE_URL: &str = "https://serpapi.com/";

pub struct SerpApiAutocompleteClient {
    client: Client,
    api_key: String,
    url: Url,
    settings: HttpSettings,
}

impl SerpApiAutocompleteClient {
    /// # Errors
    ///
    /// Returns [`ProviderError::Configuration`] if the HTTP client cannot be built.
    pub fn new(api_key: &str, settings: HttpSettings) -> Result<Self, ProviderError> {
        Self::with_base_url(api_key, settings, DEFAULT_BASE_URL)
    }

    /// # Errors
    ///
    /// Returns [`ProviderError::Configuration`] if the HTTP client cannot be
    /// built or `base_url` is not a valid URL.
    pub fn with_base_url(
        api_key: &str,
        settings: HttpSettings,
        base_url: &str,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            client: build_client(PROVIDER, &settings)?,
            api_key: api_key.to_owned(),
            url: endpoint(PROVIDER, base_url, "search")?,
            settings,
        })
    }

    /// # Errors
    ///
    /// See [`ProviderError`].
    pub async fn suggest(
        &self,
        seed: &str,
        locale: &Locale,
    ) -> Result<Vec<KeywordSuggestion>, ProviderError> {
        let body = retry_with_backoff(
            self.settings.max_retries,
            self.settings.retry_backoff_ms,
            || {
                let request = self.client.get(self.url.clone()).query(&[
                    ("engine", "google_autocomplete"),
                    ("q", seed),
                    ("hl", locale.language.as_str()),
                    ("gl", locale.country.as_str()),
                    ("api_key", self.api_key.as_str()),
                ]);
                send_json(PROVIDER, request)
            },
        )
        .await?;

        Ok(parse_response(&body))
    }
}

fn parse_response(body: &Value) -> Vec<KeywordSuggestion> {
    let Some(items) = body.get("suggestions").and_then(Value::as_array) else {
        tracing::warn!(provider = PROVIDER, "response has no suggestions array");
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| item.get("value").and_then(Value::as_str))
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(|text| KeywordSuggestion::new(text, SuggestionSource::SerpapiAutocomplete))
        .collect()
}
