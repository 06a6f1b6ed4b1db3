//! Shared data model and configuration for SEOLens.
//!
//! Every other crate in the workspace speaks in these types: provider
//! adapters produce [`KeywordSuggestion`]s and [`SerpAnalysis`] values, the
//! interpretation stage decorates them into [`KeywordMetrics`] and
//! [`KeywordCluster`]s, and the orchestrator assembles the final payloads.

pub mod app_config;
pub mod config;
pub mod keywords;
pub mod locale;
pub mod serp;

use thiserror::Error;

pub use app_config::{
    ApiSettings, AppConfig, DataForSeoCredentials, Environment, GeminiSettings, GoogleAdsCredentials,
    ProviderSettings,
};
pub use config::{load_app_config, load_app_config_from_env};
pub use keywords::{
    bounded_difficulty, bounded_score, CompetitionLevel, DifficultyLevel, KeywordCluster,
    KeywordMetrics, KeywordSuggestion, MetricsSource, SearchIntent, SuggestionSource,
};
pub use locale::{location_code, Locale};
pub use serp::{
    Device, OrganicResult, PeopleAlsoAsk, RelatedSearch, SerpAnalysis, SerpFeature, SerpFeatureType,
    SerpProvider,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
