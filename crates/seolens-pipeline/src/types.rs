use serde::{Deserialize, Serialize};
use serde_json::Value;
use seolens_core::{
    Device, KeywordCluster, KeywordMetrics, KeywordSuggestion, Locale, SerpAnalysis,
    SerpFeatureType,
};

/// Inputs for the suggestions-only pipeline.
#[derive(Debug, Clone)]
pub struct SuggestOptions {
    pub seed_keyword: String,
    pub locale: Locale,
    pub limit: usize,
    pub include_volume: bool,
}

impl SuggestOptions {
    pub fn new(seed_keyword: impl Into<String>, locale: Locale) -> Self {
        Self {
            seed_keyword: seed_keyword.into(),
            locale,
            limit: 20,
            include_volume: true,
        }
    }
}

/// Inputs for the full analysis pipeline. Every stage is on by default.
#[derive(Debug, Clone)]
pub struct AnalyzeOptions {
    pub seed_keyword: String,
    pub locale: Locale,
    pub limit: usize,
    pub include_suggestions: bool,
    pub include_volume: bool,
    pub include_serp: bool,
    pub include_clustering: bool,
}

impl AnalyzeOptions {
    pub fn new(seed_keyword: impl Into<String>, locale: Locale) -> Self {
        Self {
            seed_keyword: seed_keyword.into(),
            locale,
            limit: 20,
            include_suggestions: true,
            include_volume: true,
            include_serp: true,
            include_clustering: true,
        }
    }
}

/// Inputs for SERP analysis and competitor mining.
#[derive(Debug, Clone)]
pub struct SerpOptions {
    pub keyword: String,
    pub locale: Locale,
    pub device: Device,
    pub num_results: u32,
}

impl SerpOptions {
    pub fn new(keyword: impl Into<String>, locale: Locale) -> Self {
        Self {
            keyword: keyword.into(),
            locale,
            device: Device::Desktop,
            num_results: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionsReport {
    pub seed_keyword: String,
    pub total_suggestions: usize,
    pub suggestions: Vec<KeywordSuggestion>,
    pub data_sources: Vec<String>,
    pub cached: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordAnalysis {
    pub seed_keyword: String,
    pub keywords: Vec<KeywordMetrics>,
    pub clusters: Option<Vec<KeywordCluster>>,
    pub serp_analysis: Option<SerpAnalysis>,
    pub insights: Option<Value>,
    pub total_keywords: usize,
    pub data_sources: Vec<String>,
    pub cached: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterReport {
    pub total_keywords: usize,
    pub num_clusters: usize,
    pub clusters: Vec<KeywordCluster>,
    /// Input keywords that appear in no cluster; `None` when all were placed.
    pub unclustered_keywords: Option<Vec<String>>,
}

/// One domain's footprint in the top organic results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitorDomain {
    pub domain: String,
    pub ranking_positions: Vec<u32>,
    pub avg_position: f64,
    pub num_rankings: usize,
    pub urls: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompetitorReport {
    pub keyword: String,
    pub total_competitors: usize,
    pub top_competitors: Vec<CompetitorDomain>,
    pub common_serp_features: Vec<SerpFeatureType>,
    pub content_gaps: Option<Vec<Value>>,
    pub recommendations: Option<String>,
    pub cached: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityReport {
    pub plagiarism_percent: f64,
    pub originality_percent: f64,
    pub verdict: String,
}

/// Originality summary attached to generated content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlagiarismSummary {
    pub is_unique: bool,
    pub plagiarism_score: f64,
    pub originality_score: f64,
    pub sources_found: usize,
}

/// Model-written product copy plus its originality check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedContent {
    /// The model's JSON object, or its plain-text reply.
    pub generated_content: Value,
    pub plagiarism: PlagiarismSummary,
    pub data_sources: Vec<String>,
}
