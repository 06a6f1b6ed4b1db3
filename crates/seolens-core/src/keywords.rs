//! Keyword records produced by the suggestion, volume and interpretation stages.

use serde::{Deserialize, Serialize};

/// Searcher goal behind a keyword.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchIntent {
    Informational,
    Commercial,
    Transactional,
    Navigational,
    #[default]
    Unknown,
}

impl SearchIntent {
    /// Parses a model-supplied label (`"INFORMATIONAL"`, `"commercial"`, ...).
    ///
    /// Anything unrecognised maps to [`SearchIntent::Unknown`].
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "informational" => Self::Informational,
            "commercial" => Self::Commercial,
            "transactional" => Self::Transactional,
            "navigational" => Self::Navigational,
            _ => Self::Unknown,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Informational => "informational",
            Self::Commercial => "commercial",
            Self::Transactional => "transactional",
            Self::Navigational => "navigational",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for SearchIntent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ranking difficulty band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DifficultyLevel {
    VeryEasy,
    Easy,
    Medium,
    Hard,
    VeryHard,
}

impl DifficultyLevel {
    /// Parses `"VERY_EASY"`, `"very easy"`, `"Hard"`, etc.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        let normalised = label.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        match normalised.as_str() {
            "very_easy" => Some(Self::VeryEasy),
            "easy" => Some(Self::Easy),
            "medium" => Some(Self::Medium),
            "hard" => Some(Self::Hard),
            "very_hard" => Some(Self::VeryHard),
            _ => None,
        }
    }
}

/// Advertiser competition band.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompetitionLevel {
    Low,
    Medium,
    High,
    #[default]
    Unknown,
}

impl CompetitionLevel {
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_uppercase().as_str() {
            "LOW" => Self::Low,
            "MEDIUM" => Self::Medium,
            "HIGH" => Self::High,
            _ => Self::Unknown,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for CompetitionLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which strategy produced a keyword. One value per provider and per fallback tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionSource {
    Dataforseo,
    SerpapiAutocomplete,
    GoogleAutocomplete,
    DuckduckgoAutocomplete,
    Generated,
    Seed,
}

impl SuggestionSource {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dataforseo => "dataforseo",
            Self::SerpapiAutocomplete => "serpapi_autocomplete",
            Self::GoogleAutocomplete => "google_autocomplete",
            Self::DuckduckgoAutocomplete => "duckduckgo_autocomplete",
            Self::Generated => "generated",
            Self::Seed => "seed",
        }
    }
}

/// Marks whether a keyword's numeric fields are real provider data or synthetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricsSource {
    GoogleAds,
    Dataforseo,
    Estimated,
}

impl MetricsSource {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::GoogleAds => "google_ads",
            Self::Dataforseo => "dataforseo",
            Self::Estimated => "estimated",
        }
    }

    #[must_use]
    pub fn is_real(self) -> bool {
        !matches!(self, Self::Estimated)
    }
}

/// Returns `value` if it is a finite number in `[0, 1]`, otherwise `None`.
#[must_use]
pub fn bounded_score(value: f64) -> Option<f64> {
    (value.is_finite() && (0.0..=1.0).contains(&value)).then_some(value)
}

/// Returns `value` if it is a finite number in `[0, 100]`, otherwise `None`.
#[must_use]
pub fn bounded_difficulty(value: f64) -> Option<f64> {
    (value.is_finite() && (0.0..=100.0).contains(&value)).then_some(value)
}

/// A keyword candidate with whatever metrics its producer could supply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordSuggestion {
    pub keyword: String,
    pub search_volume: Option<u64>,
    #[serde(default)]
    pub competition: CompetitionLevel,
    pub competition_score: Option<f64>,
    pub cpc: Option<f64>,
    pub source: SuggestionSource,
    pub metrics_source: Option<MetricsSource>,
}

impl KeywordSuggestion {
    #[must_use]
    pub fn new(keyword: impl Into<String>, source: SuggestionSource) -> Self {
        Self {
            keyword: keyword.into(),
            search_volume: None,
            competition: CompetitionLevel::Unknown,
            competition_score: None,
            cpc: None,
            source,
            metrics_source: None,
        }
    }

    /// `true` when a non-zero search volume is already present.
    #[must_use]
    pub fn has_volume(&self) -> bool {
        self.search_volume.is_some_and(|v| v > 0)
    }

    /// Fills absent or zero fields from `metrics`, leaving present values untouched.
    ///
    /// `metrics_source` is only recorded when this call supplied the volume.
    pub fn fill_missing(&mut self, metrics: &KeywordSuggestion, source: MetricsSource) {
        if !self.has_volume() {
            if let Some(volume) = metrics.search_volume.filter(|v| *v > 0) {
                self.search_volume = Some(volume);
                self.metrics_source = Some(source);
            }
        }
        if self.competition == CompetitionLevel::Unknown {
            self.competition = metrics.competition;
        }
        if self.competition_score.is_none_or(|s| s == 0.0) {
            if let Some(score) = metrics.competition_score.and_then(bounded_score) {
                self.competition_score = Some(score);
            }
        }
        if self.cpc.is_none_or(|c| c == 0.0) {
            if let Some(cpc) = metrics.cpc.filter(|c| c.is_finite() && *c >= 0.0) {
                self.cpc = Some(cpc);
            }
        }
    }
}

/// A keyword decorated with model judgments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordMetrics {
    pub keyword: String,
    pub search_volume: Option<u64>,
    #[serde(default)]
    pub competition: CompetitionLevel,
    pub competition_score: Option<f64>,
    pub cpc: Option<f64>,
    pub source: SuggestionSource,
    pub metrics_source: Option<MetricsSource>,
    #[serde(default)]
    pub intent: SearchIntent,
    pub difficulty: Option<DifficultyLevel>,
    pub difficulty_score: Option<f64>,
}

impl From<KeywordSuggestion> for KeywordMetrics {
    fn from(s: KeywordSuggestion) -> Self {
        Self {
            keyword: s.keyword,
            search_volume: s.search_volume,
            competition: s.competition,
            competition_score: s.competition_score,
            cpc: s.cpc,
            source: s.source,
            metrics_source: s.metrics_source,
            intent: SearchIntent::Unknown,
            difficulty: None,
            difficulty_score: None,
        }
    }
}

/// A named semantic group of keywords.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordCluster {
    pub cluster_id: u32,
    pub cluster_name: String,
    pub primary_keyword: String,
    pub keywords: Vec<String>,
    #[serde(default)]
    pub intent: SearchIntent,
    pub avg_search_volume: Option<u64>,
    pub recommendation: Option<String>,
}

impl KeywordCluster {
    /// Integer mean of the volumes of `members` that appear in this cluster
    /// and carry a known volume. `None` when no member has one.
    #[must_use]
    pub fn average_volume(keywords: &[String], members: &[KeywordMetrics]) -> Option<u64> {
        let volumes: Vec<u64> = members
            .iter()
            .filter(|m| keywords.iter().any(|k| k == &m.keyword))
            .filter_map(|m| m.search_volume)
            .collect();
        if volumes.is_empty() {
            return None;
        }
        let count = u64::try_from(volumes.len()).ok()?;
        Some(volumes.iter().sum::<u64>() / count)
    }
}
