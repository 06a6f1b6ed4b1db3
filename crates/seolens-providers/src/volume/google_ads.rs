//! Google Ads `KeywordPlanIdeaService.GenerateKeywordIdeas` over REST.
//!
//! Authenticates with an OAuth2 refresh token. The short-lived access token
//! is memoized until shortly before it expires.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use reqwest::{Client, Url};
use serde_json::{json, Value};
use seolens_core::{
    bounded_score, location_code, CompetitionLevel, GoogleAdsCredentials, KeywordSuggestion,
    Locale, SuggestionSource,
};
use tokio::sync::Mutex;

use crate::error::ProviderError;
use crate::http::{build_client, endpoint, json_f64, json_u64, send_json, HttpSettings};
use crate::retry::retry_with_backoff;

const PROVIDER: &str = "google_ads";
const DEFAULT_API_BASE_URL: &str = "https://googleads.googleapis.com/";
const DEFAULT_OAUTH_BASE_URL: &str = "https://oauth2.googleapis.com/";
const API_VERSION: &str = "v17";
/// `keywordSeed.keywords` accepts at most 20 entries per request.
const MAX_SEEDS_PER_REQUEST: usize = 20;
const TOKEN_REFRESH_MARGIN: Duration = Duration::from_secs(60);

struct AccessToken {
    value: String,
    expires_at: Instant,
}

pub struct GoogleAdsClient {
    client: Client,
    credentials: GoogleAdsCredentials,
    ideas_url: Url,
    token_url: Url,
    settings: HttpSettings,
    token: Mutex<Option<AccessToken>>,
}

impl GoogleAdsClient {
    /// # Errors
    ///
    /// Returns [`ProviderError::Configuration`] if the HTTP client cannot be built.
    pub fn new(
        credentials: GoogleAdsCredentials,
        settings: HttpSettings,
    ) -> Result<Self, ProviderError> {
        Self::with_base_urls(
            credentials,
            settings,
            DEFAULT_API_BASE_URL,
            DEFAULT_OAUTH_BASE_URL,
        )
    }

    /// # Errors
    ///
    /// Returns [`ProviderError::Configuration`] if the HTTP client cannot be
    /// built or either base URL is invalid.
    pub fn with_base_urls(
        credentials: GoogleAdsCredentials,
        settings: HttpSettings,
        api_base_url: &str,
        oauth_base_url: &str,
    ) -> Result<Self, ProviderError> {
        let ideas_path = format!(
            "{API_VERSION}/customers/{}:generateKeywordIdeas",
            credentials.customer_id
        );
        Ok(Self {
            client: build_client(PROVIDER, &settings)?,
            ideas_url: endpoint(PROVIDER, api_base_url, &ideas_path)?,
            token_url: endpoint(PROVIDER, oauth_base_url, "token")?,
            credentials,
            settings,
            token: Mutex::new(None),
        })
    }

    /// Looks up historical metrics for `keywords`.
    ///
    /// The returned map is keyed by lowercased keyword text, as Google
    /// normalises idea text to lowercase.
    ///
    /// # Errors
    ///
    /// - [`ProviderError::CredentialsMissing`] if the token refresh or the API
    ///   call is rejected.
    /// - Any other [`ProviderError`] from the underlying calls.
    pub async fn keyword_metrics(
        &self,
        keywords: &[String],
        locale: &Locale,
    ) -> Result<HashMap<String, KeywordSuggestion>, ProviderError> {
        let mut metrics = HashMap::new();
        for chunk in keywords.chunks(MAX_SEEDS_PER_REQUEST) {
            let token = self.access_token().await?;
            let payload = json!({
                "language": format!("languageConstants/{}", language_constant(&locale.language)),
                "geoTargetConstants": [format!("geoTargetConstants/{}", location_code(&locale.country))],
                "includeAdultKeywords": false,
                "keywordPlanNetwork": "GOOGLE_SEARCH",
                "keywordSeed": { "keywords": chunk },
            });

            let body = retry_with_backoff(
                self.settings.max_retries,
                self.settings.retry_backoff_ms,
                || {
                    let request = self
                        .client
                        .post(self.ideas_url.clone())
                        .bearer_auth(&token)
                        .header("developer-token", &self.credentials.developer_token)
                        .json(&payload);
                    send_json(PROVIDER, request)
                },
            )
            .await?;

            for (text, record) in parse_ideas(&body) {
                metrics.entry(text).or_insert(record);
            }
        }
        Ok(metrics)
    }

    async fn access_token(&self) -> Result<String, ProviderError> {
        {
            let guard = self.token.lock().await;
            if let Some(token) = guard.as_ref() {
                if Instant::now() + TOKEN_REFRESH_MARGIN < token.expires_at {
                    return Ok(token.value.clone());
                }
            }
        }

        let request = self.client.post(self.token_url.clone()).form(&[
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.as_str()),
            ("refresh_token", self.credentials.refresh_token.as_str()),
            ("grant_type", "refresh_token"),
        ]);
        let body = send_json(PROVIDER, request).await.map_err(|e| match e {
            ProviderError::RequestFailed {
                transient: false, ..
            } => ProviderError::CredentialsMissing { provider: PROVIDER },
            other => other,
        })?;

        let Some(value) = body.get("access_token").and_then(Value::as_str) else {
            return Err(ProviderError::CredentialsMissing { provider: PROVIDER });
        };
        let expires_in = body.get("expires_in").and_then(json_u64).unwrap_or(3_600);

        let value = value.to_owned();
        *self.token.lock().await = Some(AccessToken {
            value: value.clone(),
            expires_at: Instant::now() + Duration::from_secs(expires_in),
        });
        tracing::debug!(provider = PROVIDER, expires_in, "refreshed access token");
        Ok(value)
    }
}

/// Google Ads language criterion ids for common ISO 639-1 codes.
fn language_constant(language: &str) -> u32 {
    match language {
        "de" => 1001,
        "fr" => 1002,
        "es" => 1003,
        "it" => 1004,
        "ja" => 1005,
        "nl" => 1010,
        "pt" => 1014,
        _ => 1000,
    }
}

fn parse_ideas(body: &Value) -> Vec<(String, KeywordSuggestion)> {
    let Some(results) = body.get("results").and_then(Value::as_array) else {
        // An empty idea list is serialised as `{}`.
        tracing::debug!(provider = PROVIDER, "response has no results");
        return Vec::new();
    };

    results
        .iter()
        .filter_map(|idea| {
            let text = idea.get("text").and_then(Value::as_str)?.trim();
            if text.is_empty() {
                return None;
            }
            let metrics = idea.get("keywordIdeaMetrics")?;

            let mut record = KeywordSuggestion::new(text, SuggestionSource::Generated);
            record.search_volume = metrics.get("avgMonthlySearches").and_then(json_u64);
            record.competition = metrics
                .get("competition")
                .and_then(Value::as_str)
                .map(CompetitionLevel::from_label)
                .unwrap_or_default();
            record.competition_score = metrics
                .get("competitionIndex")
                .and_then(json_f64)
                .map(|index| index / 100.0)
                .and_then(bounded_score);
            #[allow(clippy::cast_precision_loss)]
            let cpc = metrics
                .get("averageCpcMicros")
                .and_then(json_u64)
                .map(|micros| micros as f64 / 1_000_000.0);
            record.cpc = cpc;

            Some((text.to_lowercase(), record))
        })
        .collect()
}
