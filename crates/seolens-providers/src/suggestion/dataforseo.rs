//! DataForSEO `keywords_for_keywords` adapter (paid, primary tier).

use reqwest::{Client, Url};
use serde_json::{json, Value};
use seolens_core::{
    bounded_score, location_code, CompetitionLevel, DataForSeoCredentials, KeywordSuggestion,
    Locale, MetricsSource, SuggestionSource,
};

use crate::error::ProviderError;
use crate::http::{build_client, endpoint, json_f64, json_u64, send_json, HttpSettings};
use crate::retry::retry_with_backoff;

const PROVIDER: &str = "dataforseo";
const DEFAULT_BASE_URL: &str = "https://api.dataforseo.com/";
const KEYWORDS_PATH: &str = "v3/keywords_data/google/keywords_for_keywords/live";
const TASK_OK: u64 = 20_000;

pub struct DataForSeoClient {
    client: Client,
    credentials: DataForSeoCredentials,
    url: Url,
    settings: HttpSettings,
}

impl DataForSeoClient {
    /// # Errors
    ///
    /// Returns [`ProviderError::Configuration`] if the HTTP client cannot be built.
    pub fn new(
        credentials: DataForSeoCredentials,
        settings: HttpSettings,
    ) -> Result<Self, ProviderError> {
        Self::with_base_url(credentials, settings, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Configuration`] if the HTTP client cannot be
    /// built or `base_url` is not a valid URL.
    pub fn with_base_url(
        credentials: DataForSeoCredentials,
        settings: HttpSettings,
        base_url: &str,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            client: build_client(PROVIDER, &settings)?,
            credentials,
            url: endpoint(PROVIDER, base_url, KEYWORDS_PATH)?,
            settings,
        })
    }

    /// Fetches keyword ideas related to `seed`, with volume and competition.
    ///
    /// # Errors
    ///
    /// See [`ProviderError`]. A valid JSON body with an unexpected shape yields
    /// an empty list rather than an error.
    pub async fn suggest(
        &self,
        seed: &str,
        locale: &Locale,
        limit: usize,
    ) -> Result<Vec<KeywordSuggestion>, ProviderError> {
        let payload = json!([{
            "keywords": [seed],
            "location_code": location_code(&locale.country),
            "language_code": locale.language,
            "limit": limit,
        }]);

        let body = retry_with_backoff(
            self.settings.max_retries,
            self.settings.retry_backoff_ms,
            || {
                let request = self
                    .client
                    .post(self.url.clone())
                    .basic_auth(&self.credentials.login, Some(&self.credentials.password))
                    .json(&payload);
                send_json(PROVIDER, request)
            },
        )
        .await?;

        Ok(parse_response(&body))
    }
}

/// Extracts suggestions from `tasks[0].result[]`.
///
/// Items either nest their metrics under `keyword_data` or carry them inline.
pub(crate) fn parse_response(body: &Value) -> Vec<KeywordSuggestion> {
    let Some(task) = body
        .get("tasks")
        .and_then(Value::as_array)
        .and_then(|tasks| tasks.first())
    else {
        tracing::warn!(provider = PROVIDER, "response has no tasks");
        return Vec::new();
    };

    if let Some(code) = task.get("status_code").and_then(Value::as_u64) {
        if code != TASK_OK {
            let message = task
                .get("status_message")
                .and_then(Value::as_str)
                .unwrap_or("");
            tracing::warn!(
                provider = PROVIDER,
                status_code = code,
                status_message = message,
                "task did not succeed"
            );
            return Vec::new();
        }
    }

    let Some(items) = task.get("result").and_then(Value::as_array) else {
        tracing::warn!(provider = PROVIDER, "task has no result array");
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| parse_item(item.get("keyword_data").unwrap_or(item)))
        .collect()
}

fn parse_item(item: &Value) -> Option<KeywordSuggestion> {
    let keyword = item.get("keyword").and_then(Value::as_str)?.trim();
    if keyword.is_empty() {
        return None;
    }
    // Newer payloads nest metrics under `keyword_info`.
    let info = item.get("keyword_info").unwrap_or(item);

    let mut suggestion = KeywordSuggestion::new(keyword, SuggestionSource::Dataforseo);
    suggestion.search_volume = info.get("search_volume").and_then(json_u64);
    if suggestion.search_volume.is_some() {
        suggestion.metrics_source = Some(MetricsSource::Dataforseo);
    }

    let competition = info.get("competition");
    if let Some(label) = competition.and_then(Value::as_str) {
        suggestion.competition = CompetitionLevel::from_label(label);
    }
    suggestion.competition_score = info
        .get("competition_index")
        .and_then(json_f64)
        .map(|index| index / 100.0)
        .or_else(|| competition.and_then(Value::as_f64))
        .and_then(bounded_score);
    suggestion.cpc = info
        .get("cpc")
        .and_then(json_f64)
        .filter(|cpc| *cpc >= 0.0);

    Some(suggestion)
}
