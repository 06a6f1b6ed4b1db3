//! Search engine results page model.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Closed set of SERP features we detect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SerpFeatureType {
    FeaturedSnippet,
    PeopleAlsoAsk,
    KnowledgePanel,
    LocalPack,
    ImagePack,
    VideoCarousel,
    TopStories,
    RelatedSearches,
    SiteLinks,
    Shopping,
}

impl SerpFeatureType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FeaturedSnippet => "featured_snippet",
            Self::PeopleAlsoAsk => "people_also_ask",
            Self::KnowledgePanel => "knowledge_panel",
            Self::LocalPack => "local_pack",
            Self::ImagePack => "image_pack",
            Self::VideoCarousel => "video_carousel",
            Self::TopStories => "top_stories",
            Self::RelatedSearches => "related_searches",
            Self::SiteLinks => "site_links",
            Self::Shopping => "shopping",
        }
    }
}

/// Which SERP provider answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SerpProvider {
    Serpapi,
    Valueserp,
    None,
}

impl SerpProvider {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Serpapi => "serpapi",
            Self::Valueserp => "valueserp",
            Self::None => "none",
        }
    }
}

/// Device profile a SERP is fetched for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    #[default]
    Desktop,
    Mobile,
    Tablet,
}

impl Device {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Desktop => "desktop",
            Self::Mobile => "mobile",
            Self::Tablet => "tablet",
        }
    }
}

impl std::str::FromStr for Device {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "desktop" => Ok(Self::Desktop),
            "mobile" => Ok(Self::Mobile),
            "tablet" => Ok(Self::Tablet),
            other => Err(format!("unknown device '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganicResult {
    pub position: u32,
    pub title: String,
    pub url: String,
    pub displayed_url: String,
    pub domain: String,
    pub snippet: String,
    pub date: Option<String>,
    pub rich_snippet: Option<Value>,
    pub sitelinks: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerpFeature {
    pub feature_type: SerpFeatureType,
    pub title: Option<String>,
    pub snippet: Option<String>,
    pub source_url: Option<String>,
    pub source_domain: Option<String>,
    pub data: Option<Value>,
}

impl SerpFeature {
    #[must_use]
    pub fn bare(feature_type: SerpFeatureType) -> Self {
        Self {
            feature_type,
            title: None,
            snippet: None,
            source_url: None,
            source_domain: None,
            data: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeopleAlsoAsk {
    pub question: String,
    pub answer: Option<String>,
    pub source_url: Option<String>,
    pub source_domain: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelatedSearch {
    pub keyword: String,
}

/// A fetched (or memoized) SERP for one keyword.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerpAnalysis {
    pub keyword: String,
    pub total_results: u64,
    pub organic_results: Vec<OrganicResult>,
    pub features: Vec<SerpFeature>,
    pub people_also_ask: Vec<PeopleAlsoAsk>,
    pub related_searches: Vec<RelatedSearch>,
    pub provider: SerpProvider,
    pub cached: bool,
    pub insights: Option<Value>,
}

impl SerpAnalysis {
    /// Placeholder returned when no SERP provider is configured at all.
    #[must_use]
    pub fn unconfigured(keyword: &str) -> Self {
        Self {
            keyword: keyword.to_owned(),
            total_results: 0,
            organic_results: Vec::new(),
            features: Vec::new(),
            people_also_ask: Vec::new(),
            related_searches: Vec::new(),
            provider: SerpProvider::None,
            cached: false,
            insights: Some(serde_json::json!({
                "warning": "No SERP API configured. Configure SerpAPI or ValueSERP for real data."
            })),
        }
    }

    #[must_use]
    pub fn feature_names(&self) -> Vec<&'static str> {
        self.features.iter().map(|f| f.feature_type.as_str()).collect()
    }
}
