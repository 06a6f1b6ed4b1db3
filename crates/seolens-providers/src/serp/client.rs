//! SERP adapters. SerpApi and ValueSERP share one request shape and one
//! response parser, differing only in endpoint and a couple of fixed params.

use reqwest::{Client, Url};
use seolens_core::{SerpAnalysis, SerpProvider};

use super::parse::parse_serp;
use super::SerpRequest;
use crate::error::ProviderError;
use crate::http::{build_client, endpoint, send_json, HttpSettings};
use crate::retry::retry_with_backoff;

const SERPAPI_BASE_URL: &str = "https://serpapi.com/";
const VALUESERP_BASE_URL: &str = "https://api.valueserp.com/";

pub struct SerpClient {
    provider: SerpProvider,
    client: Client,
    api_key: String,
    url: Url,
    settings: HttpSettings,
}

impl SerpClient {
    /// # Errors
    ///
    /// Returns [`ProviderError::Configuration`] if the HTTP client cannot be built.
    pub fn serpapi(api_key: &str, settings: HttpSettings) -> Result<Self, ProviderError> {
        Self::with_base_url(SerpProvider::Serpapi, api_key, settings, SERPAPI_BASE_URL)
    }

    /// # Errors
    ///
    /// Returns [`ProviderError::Configuration`] if the HTTP client cannot be built.
    pub fn valueserp(api_key: &str, settings: HttpSettings) -> Result<Self, ProviderError> {
        Self::with_base_url(SerpProvider::Valueserp, api_key, settings, VALUESERP_BASE_URL)
    }

    /// Creates a client for `provider` against a custom base URL (for testing
    /// with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Configuration`] if the HTTP client cannot be
    /// built or `base_url` is not a valid URL.
    pub fn with_base_url(
        provider: SerpProvider,
        api_key: &str,
        settings: HttpSettings,
        base_url: &str,
    ) -> Result<Self, ProviderError> {
        let name = provider.as_str();
        Ok(Self {
            provider,
            client: build_client(name, &settings)?,
            api_key: api_key.to_owned(),
            url: endpoint(name, base_url, "search")?,
            settings,
        })
    }

    #[must_use]
    pub fn provider(&self) -> SerpProvider {
        self.provider
    }

    /// Fetches and parses one results page.
    ///
    /// # Errors
    ///
    /// See [`ProviderError`].
    pub async fn fetch(&self, request: &SerpRequest) -> Result<SerpAnalysis, ProviderError> {
        let name = self.provider.as_str();
        let num = request.num_results.to_string();
        let mut params: Vec<(&str, &str)> = vec![
            ("q", request.keyword.as_str()),
            ("gl", request.locale.country.as_str()),
            ("hl", request.locale.language.as_str()),
            ("device", request.device.as_str()),
            ("num", num.as_str()),
            ("api_key", self.api_key.as_str()),
        ];
        match self.provider {
            SerpProvider::Serpapi => params.push(("engine", "google")),
            SerpProvider::Valueserp => params.push(("output", "json")),
            SerpProvider::None => {}
        }

        let body = retry_with_backoff(
            self.settings.max_retries,
            self.settings.retry_backoff_ms,
            || send_json(name, self.client.get(self.url.clone()).query(&params)),
        )
        .await?;

        let limit = usize::try_from(request.num_results).unwrap_or(usize::MAX);
        Ok(parse_serp(&request.keyword, &body, self.provider, limit))
    }
}
