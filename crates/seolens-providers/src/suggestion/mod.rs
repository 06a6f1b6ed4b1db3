//! Keyword suggestion adapters and the fallback chain that orders them.
//!
//! Tiers, in order: DataForSEO → SerpApi autocomplete → public autocomplete
//! (Google, then DuckDuckGo) → local generation. A tier only runs while the
//! accumulated list is shorter than the requested limit. The generation tier
//! cannot fail, so the chain always produces output for a non-blank seed.

mod autocomplete;
mod dataforseo;
mod generated;
mod serpapi;

use std::collections::HashSet;
use std::time::Duration;

use seolens_core::{KeywordSuggestion, Locale, ProviderSettings};

pub use autocomplete::PublicAutocompleteClient;
pub use dataforseo::DataForSeoClient;
pub use generated::{generate_variations, MODIFIERS};
pub use serpapi::SerpApiAutocompleteClient;

use crate::cache::TtlCache;
use crate::error::ProviderError;
use crate::http::HttpSettings;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct SuggestionKey {
    seed: String,
    language: String,
    country: String,
    limit: usize,
}

/// Suggestions plus whether they came from the chain's memo.
#[derive(Debug, Clone)]
pub struct SuggestionOutcome {
    pub suggestions: Vec<KeywordSuggestion>,
    pub cached: bool,
}

pub struct SuggestionChain {
    dataforseo: Option<DataForSeoClient>,
    serpapi: Option<SerpApiAutocompleteClient>,
    public: Option<PublicAutocompleteClient>,
    cache: TtlCache<SuggestionKey, Vec<KeywordSuggestion>>,
}

impl SuggestionChain {
    /// A chain with only the generation tier. Add remote tiers with the
    /// `with_*` builders.
    #[must_use]
    pub fn new(cache_ttl: Duration) -> Self {
        Self {
            dataforseo: None,
            serpapi: None,
            public: None,
            cache: TtlCache::new(cache_ttl),
        }
    }

    #[must_use]
    pub fn with_dataforseo(mut self, client: DataForSeoClient) -> Self {
        self.dataforseo = Some(client);
        self
    }

    #[must_use]
    pub fn with_serpapi(mut self, client: SerpApiAutocompleteClient) -> Self {
        self.serpapi = Some(client);
        self
    }

    #[must_use]
    pub fn with_public_autocomplete(mut self, client: PublicAutocompleteClient) -> Self {
        self.public = Some(client);
        self
    }

    /// Builds every tier whose credentials are present in `settings`.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Configuration`] if an adapter's HTTP client
    /// cannot be built.
    pub fn from_settings(settings: &ProviderSettings) -> Result<Self, ProviderError> {
        let http = HttpSettings::from(settings);
        let mut chain = Self::new(Duration::from_secs(settings.cache_ttl_secs));
        if let Some(credentials) = &settings.dataforseo {
            chain = chain.with_dataforseo(DataForSeoClient::new(credentials.clone(), http.clone())?);
        }
        if let Some(key) = &settings.serpapi_key {
            chain = chain.with_serpapi(SerpApiAutocompleteClient::new(key, http.clone())?);
        }
        if settings.public_autocomplete {
            chain = chain.with_public_autocomplete(PublicAutocompleteClient::new(http)?);
        }
        Ok(chain)
    }

    /// Names of the remote tiers this chain will try, in order.
    #[must_use]
    pub fn configured_tiers(&self) -> Vec<&'static str> {
        let mut tiers = Vec::new();
        if self.dataforseo.is_some() {
            tiers.push("dataforseo");
        }
        if self.serpapi.is_some() {
            tiers.push("serpapi_autocomplete");
        }
        if self.public.is_some() {
            tiers.push("google_autocomplete");
            tiers.push("duckduckgo_autocomplete");
        }
        tiers.push("generated");
        tiers
    }

    /// Returns up to `limit` de-duplicated suggestions for `seed`.
    ///
    /// Tier failures are logged and swallowed; this never errors. A result
    /// assembled after any tier failed is not memoized, so the next caller
    /// retries the remote tiers.
    pub async fn suggest(&self, seed: &str, locale: &Locale, limit: usize) -> SuggestionOutcome {
        let seed = seed.trim();
        let key = SuggestionKey {
            seed: seed.to_owned(),
            language: locale.language.clone(),
            country: locale.country.clone(),
            limit,
        };

        if let Some(suggestions) = self.cache.get(&key).await {
            tracing::debug!(seed, "returning cached suggestions");
            return SuggestionOutcome {
                suggestions,
                cached: true,
            };
        }

        let mut acc = Accumulator::new(limit);

        if let Some(client) = &self.dataforseo {
            if !acc.is_full() {
                acc.absorb("dataforseo", client.suggest(seed, locale, limit).await);
            }
        }

        if let Some(client) = &self.serpapi {
            if !acc.is_full() {
                acc.absorb("serpapi_autocomplete", client.suggest(seed, locale).await);
            }
        }

        if let Some(client) = &self.public {
            if !acc.is_full() {
                acc.absorb("google_autocomplete", client.google(seed, locale).await);
            }
            if !acc.is_full() {
                acc.absorb("duckduckgo_autocomplete", client.duckduckgo(seed, locale).await);
            }
        }

        if !acc.is_full() {
            let added = acc.extend(generate_variations(seed));
            tracing::debug!(seed, added, "generated keyword variations");
        }

        let failed_tiers = acc.failed_tiers();
        let suggestions = acc.finish();
        tracing::info!(seed, count = suggestions.len(), "keyword suggestions assembled");
        if failed_tiers == 0 {
            self.cache.insert(key, suggestions.clone()).await;
        } else {
            tracing::debug!(seed, failed_tiers, "not caching suggestions after tier failures");
        }

        SuggestionOutcome {
            suggestions,
            cached: false,
        }
    }
}

/// Ordered, de-duplicated collector. The first source to produce a keyword wins.
struct Accumulator {
    limit: usize,
    seen: HashSet<String>,
    items: Vec<KeywordSuggestion>,
    failures: usize,
}

impl Accumulator {
    fn new(limit: usize) -> Self {
        Self {
            limit,
            seen: HashSet::new(),
            items: Vec::new(),
            failures: 0,
        }
    }

    fn failed_tiers(&self) -> usize {
        self.failures
    }

    fn is_full(&self) -> bool {
        self.items.len() >= self.limit
    }

    fn extend(&mut self, items: Vec<KeywordSuggestion>) -> usize {
        let before = self.items.len();
        for item in items {
            if self.seen.insert(item.keyword.clone()) {
                self.items.push(item);
            }
        }
        self.items.len() - before
    }

    fn absorb(
        &mut self,
        tier: &'static str,
        result: Result<Vec<KeywordSuggestion>, ProviderError>,
    ) {
        match result {
            Ok(items) => {
                let added = self.extend(items);
                tracing::debug!(tier, added, "suggestion tier answered");
            }
            Err(e) => {
                self.failures += 1;
                tracing::warn!(tier, error = %e, "suggestion tier failed, falling through");
            }
        }
    }

    fn finish(mut self) -> Vec<KeywordSuggestion> {
        self.items.truncate(self.limit);
        self.items
    }
}
