//! Search-volume enrichment: Google Ads, then the hash-seeded estimate.

mod estimate;
mod google_ads;

use seolens_core::{KeywordSuggestion, Locale, MetricsSource, ProviderSettings};

pub use estimate::{estimate, keyword_hash};
pub use google_ads::GoogleAdsClient;

use crate::error::ProviderError;
use crate::http::HttpSettings;

#[derive(Default)]
pub struct VolumeChain {
    google_ads: Option<GoogleAdsClient>,
}

impl VolumeChain {
    /// A chain with only the estimate tier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_google_ads(mut self, client: GoogleAdsClient) -> Self {
        self.google_ads = Some(client);
        self
    }

    /// # Errors
    ///
    /// Returns [`ProviderError::Configuration`] if the Google Ads HTTP client
    /// cannot be built.
    pub fn from_settings(settings: &ProviderSettings) -> Result<Self, ProviderError> {
        let mut chain = Self::new();
        if let Some(credentials) = &settings.google_ads {
            chain = chain.with_google_ads(GoogleAdsClient::new(
                credentials.clone(),
                HttpSettings::from(settings),
            )?);
        }
        Ok(chain)
    }

    #[must_use]
    pub fn has_google_ads(&self) -> bool {
        self.google_ads.is_some()
    }

    /// Fills absent volume, competition and CPC fields.
    ///
    /// Present non-zero values are never overwritten. Every keyword leaves
    /// with a volume: anything Google Ads could not price is estimated and
    /// tagged [`MetricsSource::Estimated`].
    pub async fn enrich(
        &self,
        mut keywords: Vec<KeywordSuggestion>,
        locale: &Locale,
    ) -> Vec<KeywordSuggestion> {
        if keywords.is_empty() {
            return keywords;
        }

        if let Some(client) = &self.google_ads {
            let missing: Vec<String> = keywords
                .iter()
                .filter(|kw| !kw.has_volume())
                .map(|kw| kw.keyword.clone())
                .collect();
            if !missing.is_empty() {
                match client.keyword_metrics(&missing, locale).await {
                    Ok(metrics) => {
                        let mut matched = 0usize;
                        for kw in keywords.iter_mut().filter(|kw| !kw.has_volume()) {
                            if let Some(record) = metrics.get(&kw.keyword.to_lowercase()) {
                                kw.fill_missing(record, MetricsSource::GoogleAds);
                                matched += 1;
                            }
                        }
                        tracing::debug!(
                            provider = "google_ads",
                            requested = missing.len(),
                            matched,
                            "volume tier answered"
                        );
                    }
                    Err(e) => {
                        tracing::warn!(
                            provider = "google_ads",
                            error = %e,
                            "volume tier failed, falling back to estimates"
                        );
                    }
                }
            }
        }

        let mut estimated = 0usize;
        for kw in keywords.iter_mut().filter(|kw| !kw.has_volume()) {
            let record = estimate(&kw.keyword);
            kw.fill_missing(&record, MetricsSource::Estimated);
            estimated += 1;
        }
        if estimated > 0 {
            tracing::debug!(estimated, "estimated volume for unpriced keywords");
        }

        keywords
    }
}
