//! SERP fetching: SerpApi → ValueSERP, memoized per keyword/locale/device/size.
//!
//! Unlike suggestions and volume, this chain has no local last-resort tier.
//! With no provider configured it answers with a placeholder analysis; with
//! providers configured and all failing it surfaces the last error.

mod client;
mod domain;
mod parse;

use std::time::Duration;

use seolens_core::{Device, Locale, ProviderSettings, SerpAnalysis};

pub use client::SerpClient;
pub use domain::extract_domain;

use crate::cache::TtlCache;
use crate::error::ProviderError;
use crate::http::HttpSettings;

/// Parameters of a single SERP lookup.
#[derive(Debug, Clone)]
pub struct SerpRequest {
    pub keyword: String,
    pub locale: Locale,
    pub device: Device,
    pub num_results: u32,
}

impl SerpRequest {
    #[must_use]
    pub fn new(keyword: impl Into<String>, locale: Locale) -> Self {
        Self {
            keyword: keyword.into(),
            locale,
            device: Device::Desktop,
            num_results: 10,
        }
    }

    #[must_use]
    pub fn device(mut self, device: Device) -> Self {
        self.device = device;
        self
    }

    #[must_use]
    pub fn num_results(mut self, num_results: u32) -> Self {
        self.num_results = num_results;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct SerpKey {
    keyword: String,
    language: String,
    country: String,
    device: Device,
    num_results: u32,
}

impl From<&SerpRequest> for SerpKey {
    fn from(request: &SerpRequest) -> Self {
        Self {
            keyword: request.keyword.clone(),
            language: request.locale.language.clone(),
            country: request.locale.country.clone(),
            device: request.device,
            num_results: request.num_results,
        }
    }
}

pub struct SerpChain {
    providers: Vec<SerpClient>,
    cache: TtlCache<SerpKey, SerpAnalysis>,
}

impl SerpChain {
    #[must_use]
    pub fn new(cache_ttl: Duration) -> Self {
        Self {
            providers: Vec::new(),
            cache: TtlCache::new(cache_ttl),
        }
    }

    /// Appends a provider tier. Tiers are tried in insertion order.
    #[must_use]
    pub fn with_provider(mut self, client: SerpClient) -> Self {
        self.providers.push(client);
        self
    }

    /// # Errors
    ///
    /// Returns [`ProviderError::Configuration`] if an adapter's HTTP client
    /// cannot be built.
    pub fn from_settings(settings: &ProviderSettings) -> Result<Self, ProviderError> {
        let http = HttpSettings::from(settings);
        let mut chain = Self::new(Duration::from_secs(settings.cache_ttl_secs));
        if let Some(key) = &settings.serpapi_key {
            chain = chain.with_provider(SerpClient::serpapi(key, http.clone())?);
        }
        if let Some(key) = &settings.valueserp_key {
            chain = chain.with_provider(SerpClient::valueserp(key, http)?);
        }
        Ok(chain)
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.providers.is_empty()
    }

    /// Returns the SERP for `request`, from cache when possible.
    ///
    /// # Errors
    ///
    /// Returns the last provider's [`ProviderError`] when every configured
    /// provider fails.
    pub async fn analyze(&self, request: &SerpRequest) -> Result<SerpAnalysis, ProviderError> {
        if !self.is_configured() {
            tracing::warn!(keyword = %request.keyword, "no SERP provider configured");
            return Ok(SerpAnalysis::unconfigured(&request.keyword));
        }

        let key = SerpKey::from(request);
        if let Some(mut cached) = self.cache.get(&key).await {
            tracing::debug!(keyword = %request.keyword, "returning cached SERP");
            cached.cached = true;
            return Ok(cached);
        }

        let mut last_error = None;
        for client in &self.providers {
            match client.fetch(request).await {
                Ok(analysis) => {
                    tracing::info!(
                        provider = client.provider().as_str(),
                        keyword = %request.keyword,
                        organic = analysis.organic_results.len(),
                        "SERP fetched"
                    );
                    self.cache.insert(key, analysis.clone()).await;
                    return Ok(analysis);
                }
                Err(e) => {
                    tracing::warn!(
                        provider = client.provider().as_str(),
                        error = %e,
                        "SERP tier failed, falling through"
                    );
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or(ProviderError::RequestFailed {
            provider: "serp",
            detail: "no SERP provider answered".to_owned(),
            transient: false,
        }))
    }
}
