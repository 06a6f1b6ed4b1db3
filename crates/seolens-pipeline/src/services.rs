use std::sync::Arc;

use seolens_core::AppConfig;
use seolens_insight::{GeminiClient, Interpreter, LanguageModel};
use seolens_providers::{SerpChain, SuggestionChain, VolumeChain};

use crate::error::PipelineError;

/// Provider chains and the interpreter, built once at process start and
/// shared by every request.
pub struct AppServices {
    pub suggestions: SuggestionChain,
    pub volume: VolumeChain,
    pub serp: SerpChain,
    pub interpreter: Interpreter,
}

impl AppServices {
    #[must_use]
    pub fn new(
        suggestions: SuggestionChain,
        volume: VolumeChain,
        serp: SerpChain,
        model: Arc<dyn LanguageModel>,
    ) -> Self {
        Self {
            suggestions,
            volume,
            serp,
            interpreter: Interpreter::new(model),
        }
    }

    /// Builds every configured adapter from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Configuration`] if an HTTP client cannot be
    /// constructed.
    pub fn from_config(config: &AppConfig) -> Result<Self, PipelineError> {
        let providers = &config.providers;
        let suggestions = SuggestionChain::from_settings(providers)?;
        let volume = VolumeChain::from_settings(providers)?;
        let serp = SerpChain::from_settings(providers)?;
        let gemini = GeminiClient::new(&config.gemini, providers.http_timeout_secs)
            .map_err(|e| PipelineError::Configuration(e.to_string()))?;

        tracing::info!(
            suggestion_tiers = ?suggestions.configured_tiers(),
            google_ads = volume.has_google_ads(),
            serp = serp.is_configured(),
            model = gemini.model(),
            "services initialised"
        );

        Ok(Self::new(suggestions, volume, serp, Arc::new(gemini)))
    }
}
