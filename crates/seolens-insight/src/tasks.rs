//! The interpretation tasks.
//!
//! Each analysis task renders its template, makes at most one model call, and
//! parses the reply as a JSON object. Any failure (transport, non-JSON reply,
//! wrong shape) is logged and replaced by the task's default result, so
//! callers always get a usable value. Content generation is the exception: it
//! has no meaningful default and returns the model error.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use seolens_core::{
    bounded_difficulty, DifficultyLevel, KeywordCluster, KeywordMetrics, SearchIntent,
};

use crate::error::InsightError;
use crate::model::{LanguageModel, Part};
use crate::parse::{parse_object, strip_fences};
use crate::prompts::{
    render, CONTENT_GAPS, DIFFICULTY_ANALYSIS, INTENT_CLASSIFICATION, KEYWORD_CLUSTERING,
    PRODUCT_CONTENT, RECOMMENDATIONS,
};

/// Keywords beyond this are left out of the recommendation prompt.
const RECOMMENDATION_KEYWORD_LIMIT: usize = 20;

/// Model judgment of how hard a keyword is to rank for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifficultyAssessment {
    pub keyword: String,
    pub difficulty_level: Option<DifficultyLevel>,
    pub difficulty_score: Option<f64>,
    pub reasoning: String,
    #[serde(default)]
    pub ranking_factors: Vec<String>,
    pub estimated_time_to_rank: Option<String>,
}

impl DifficultyAssessment {
    /// Used when the model cannot be reached or its reply cannot be read.
    #[must_use]
    pub fn fallback(keyword: &str) -> Self {
        Self {
            keyword: keyword.to_owned(),
            difficulty_level: Some(DifficultyLevel::Medium),
            difficulty_score: Some(50.0),
            reasoning: "Unable to analyze difficulty".to_owned(),
            ranking_factors: Vec::new(),
            estimated_time_to_rank: None,
        }
    }
}

/// Default cluster count for `n` keywords: `max(2, min(8, n / 5))`.
#[must_use]
pub fn default_cluster_count(n: usize) -> usize {
    (n / 5).clamp(2, 8)
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default()
}

fn fmt_opt<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| "N/A".to_owned(), |v| v.to_string())
}

/// Runs interpretation tasks against a [`LanguageModel`].
#[derive(Clone)]
pub struct Interpreter {
    model: Arc<dyn LanguageModel>,
}

impl Interpreter {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    #[must_use]
    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    async fn ask(
        &self,
        task: &'static str,
        prompt: String,
    ) -> Result<Map<String, Value>, InsightError> {
        let reply = self
            .model
            .generate(&[Part::Text(prompt)])
            .await
            .inspect_err(|e| {
                tracing::warn!(task, error = %e, "model call failed, using task default");
            })?;
        parse_object(task, &reply).inspect_err(|e| {
            tracing::error!(task, error = %e, "could not parse model reply, using task default");
        })
    }

    /// Labels each keyword with a search intent.
    ///
    /// An empty input makes no model call. On failure every keyword maps to
    /// [`SearchIntent::Unknown`]. Keywords the model skipped are absent.
    pub async fn classify_intent(&self, keywords: &[String]) -> HashMap<String, SearchIntent> {
        if keywords.is_empty() {
            return HashMap::new();
        }

        let list = keywords
            .iter()
            .map(|kw| format!("- {kw}"))
            .collect::<Vec<_>>()
            .join("\n");
        let prompt = render(INTENT_CLASSIFICATION, &[("keywords", &list)]);

        let Ok(reply) = self.ask("intent", prompt).await else {
            return keywords
                .iter()
                .map(|kw| (kw.clone(), SearchIntent::Unknown))
                .collect();
        };

        reply
            .get("classifications")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| {
                        let keyword = item.get("keyword").and_then(Value::as_str)?;
                        let intent = item
                            .get("intent")
                            .and_then(Value::as_str)
                            .map_or(SearchIntent::Unknown, SearchIntent::from_label);
                        Some((keyword.to_owned(), intent))
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Groups keywords into semantic clusters.
    ///
    /// Fewer than two keywords makes no model call and yields no clusters.
    /// `num_clusters` defaults to [`default_cluster_count`].
    pub async fn cluster_keywords(
        &self,
        keywords: &[KeywordMetrics],
        num_clusters: Option<usize>,
    ) -> Vec<KeywordCluster> {
        if keywords.len() < 2 {
            return Vec::new();
        }
        let num_clusters = num_clusters.unwrap_or_else(|| default_cluster_count(keywords.len()));

        let mut list = String::new();
        for kw in keywords {
            let _ = writeln!(
                list,
                "- {} (volume: {}, competition: {})",
                kw.keyword,
                fmt_opt(kw.search_volume),
                kw.competition
            );
        }
        let count = num_clusters.to_string();
        let prompt = render(
            KEYWORD_CLUSTERING,
            &[("keywords", list.trim_end()), ("num_clusters", &count)],
        );

        let Ok(reply) = self.ask("clustering", prompt).await else {
            return Vec::new();
        };

        let Some(items) = reply.get("clusters").and_then(Value::as_array) else {
            tracing::warn!(task = "clustering", "reply has no clusters array");
            return Vec::new();
        };

        items
            .iter()
            .enumerate()
            .map(|(idx, item)| {
                let position = u32::try_from(idx + 1).unwrap_or(u32::MAX);
                let members = string_list(item.get("keywords"));
                let primary_keyword = item
                    .get("primary_keyword")
                    .and_then(Value::as_str)
                    .map(str::to_owned)
                    .or_else(|| members.first().cloned())
                    .unwrap_or_default();
                KeywordCluster {
                    cluster_id: item
                        .get("cluster_id")
                        .and_then(Value::as_u64)
                        .and_then(|id| u32::try_from(id).ok())
                        .unwrap_or(position),
                    cluster_name: item
                        .get("cluster_name")
                        .and_then(Value::as_str)
                        .map_or_else(|| format!("Cluster {position}"), str::to_owned),
                    primary_keyword,
                    intent: item
                        .get("intent")
                        .and_then(Value::as_str)
                        .map_or(SearchIntent::Unknown, SearchIntent::from_label),
                    avg_search_volume: KeywordCluster::average_volume(&members, keywords),
                    recommendation: item
                        .get("recommendation")
                        .and_then(Value::as_str)
                        .map(str::to_owned),
                    keywords: members,
                }
            })
            .collect()
    }

    /// Estimates ranking difficulty for one keyword given its SERP features.
    ///
    /// A score outside 0–100 is dropped to `None`; an unrecognised level
    /// becomes [`DifficultyLevel::Medium`].
    pub async fn analyze_difficulty(
        &self,
        keyword: &str,
        serp_features: &[&str],
        competition_score: Option<f64>,
        search_volume: Option<u64>,
    ) -> DifficultyAssessment {
        let features = if serp_features.is_empty() {
            "None".to_owned()
        } else {
            serp_features.join(", ")
        };
        let volume = fmt_opt(search_volume);
        let competition = fmt_opt(competition_score);
        let prompt = render(
            DIFFICULTY_ANALYSIS,
            &[
                ("keyword", keyword),
                ("serp_features", &features),
                ("competition_score", &competition),
                ("search_volume", &volume),
            ],
        );

        let Ok(reply) = self.ask("difficulty", prompt).await else {
            return DifficultyAssessment::fallback(keyword);
        };

        let difficulty_level = Some(
            reply
                .get("difficulty_level")
                .and_then(Value::as_str)
                .and_then(DifficultyLevel::from_label)
                .unwrap_or(DifficultyLevel::Medium),
        );
        let difficulty_score = match reply.get("difficulty_score") {
            None => Some(50.0),
            Some(value) => value.as_f64().and_then(bounded_difficulty),
        };

        DifficultyAssessment {
            keyword: keyword.to_owned(),
            difficulty_level,
            difficulty_score,
            reasoning: reply
                .get("reasoning")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_owned(),
            ranking_factors: string_list(reply.get("ranking_factors")),
            estimated_time_to_rank: reply
                .get("estimated_time_to_rank")
                .and_then(Value::as_str)
                .map(str::to_owned),
        }
    }

    /// Produces a free-form strategy object.
    pub async fn generate_recommendations(
        &self,
        keywords: &[KeywordMetrics],
        clusters: &[KeywordCluster],
        serp_insights: Option<&Value>,
    ) -> Value {
        let keyword_data = keywords
            .iter()
            .take(RECOMMENDATION_KEYWORD_LIMIT)
            .map(|kw| {
                format!(
                    "- {}: volume={}, competition={}, intent={}",
                    kw.keyword,
                    fmt_opt(kw.search_volume),
                    kw.competition,
                    kw.intent
                )
            })
            .collect::<Vec<_>>()
            .join("\n");
        let cluster_data = clusters
            .iter()
            .map(|c| {
                format!(
                    "- {}: {} keywords, intent={}",
                    c.cluster_name,
                    c.keywords.len(),
                    c.intent
                )
            })
            .collect::<Vec<_>>()
            .join("\n");
        let serp_data = serp_insights.map_or_else(
            || "No SERP data available".to_owned(),
            Value::to_string,
        );

        let prompt = render(
            RECOMMENDATIONS,
            &[
                ("keyword_data", &keyword_data),
                ("clusters", &cluster_data),
                ("serp_insights", &serp_data),
            ],
        );

        match self.ask("recommendations", prompt).await {
            Ok(reply) => Value::Object(reply),
            Err(_) => json!({ "overall_strategy": "Unable to generate recommendations" }),
        }
    }

    /// Compares top-ranking titles and snippets to find uncovered topics.
    pub async fn analyze_content_gaps(
        &self,
        keyword: &str,
        titles: &[String],
        snippets: &[String],
    ) -> Value {
        let numbered = |items: &[String]| {
            items
                .iter()
                .enumerate()
                .map(|(i, s)| format!("{}. {s}", i + 1))
                .collect::<Vec<_>>()
                .join("\n")
        };
        let titles = numbered(titles);
        let snippets = numbered(snippets);
        let prompt = render(
            CONTENT_GAPS,
            &[
                ("keyword", keyword),
                ("competitor_titles", &titles),
                ("competitor_snippets", &snippets),
            ],
        );

        match self.ask("content_gaps", prompt).await {
            Ok(reply) => Value::Object(reply),
            Err(_) => json!({ "common_themes": [], "content_gaps": [] }),
        }
    }

    /// Writes product copy from `prompt` and the product `images`.
    ///
    /// A reply that is not a JSON object is returned as plain text.
    ///
    /// # Errors
    ///
    /// Returns the model's [`InsightError`] when the call itself fails.
    pub async fn generate_content(
        &self,
        prompt: &str,
        images: Vec<Part>,
    ) -> Result<Value, InsightError> {
        let mut parts = Vec::with_capacity(images.len() + 1);
        parts.push(Part::Text(render(PRODUCT_CONTENT, &[("prompt", prompt.trim())])));
        parts.extend(images);

        let reply = self.model.generate(&parts).await.inspect_err(|e| {
            tracing::warn!(task = "product_content", error = %e, "content generation failed");
        })?;
        match parse_object("product_content", &reply) {
            Ok(object) => Ok(Value::Object(object)),
            Err(e) => {
                tracing::debug!(error = %e, "content reply is not a JSON object, keeping text");
                Ok(Value::String(strip_fences(&reply).trim().to_owned()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cluster_count_is_clamped() {
        assert_eq!(default_cluster_count(2), 2);
        assert_eq!(default_cluster_count(14), 2);
        assert_eq!(default_cluster_count(20), 4);
        assert_eq!(default_cluster_count(100), 8);
    }

    #[test]
    fn fallback_difficulty_is_medium_fifty() {
        let fallback = DifficultyAssessment::fallback("seo");
        assert_eq!(fallback.difficulty_level, Some(DifficultyLevel::Medium));
        assert_eq!(fallback.difficulty_score, Some(50.0));
        assert_eq!(fallback.reasoning, "Unable to analyze difficulty");
    }

    #[test]
    fn fmt_opt_renders_missing_as_na() {
        assert_eq!(fmt_opt::<u64>(None), "N/A");
        assert_eq!(fmt_opt(Some(12)), "12");
    }
}
