//! Translation of SerpApi/ValueSERP JSON into [`SerpAnalysis`].
//!
//! Both providers use the same top-level keys for the parts we read.

use serde_json::Value;
use seolens_core::{
    OrganicResult, PeopleAlsoAsk, RelatedSearch, SerpAnalysis, SerpFeature, SerpFeatureType,
    SerpProvider,
};

use super::domain::extract_domain;
use crate::http::json_u64;

fn str_field(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

/// `true` for a non-empty object or array.
fn present(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Object(map)) => !map.is_empty(),
        _ => false,
    }
}

pub(crate) fn parse_serp(
    keyword: &str,
    body: &Value,
    provider: SerpProvider,
    num_results: usize,
) -> SerpAnalysis {
    if let Some(message) = body.get("error").and_then(Value::as_str) {
        tracing::warn!(
            provider = provider.as_str(),
            keyword,
            detail = message,
            "provider reported no results"
        );
    }

    let organic_results = parse_organic(body, num_results);
    let people_also_ask = parse_people_also_ask(body);
    let related_searches = parse_related_searches(body);
    let features = parse_features(body, &organic_results);

    let total_results = body
        .get("search_information")
        .and_then(|info| info.get("total_results"))
        .and_then(json_u64)
        .unwrap_or(0);

    SerpAnalysis {
        keyword: keyword.to_owned(),
        total_results,
        organic_results,
        features,
        people_also_ask,
        related_searches,
        provider,
        cached: false,
        insights: None,
    }
}

fn parse_organic(body: &Value, num_results: usize) -> Vec<OrganicResult> {
    let Some(items) = body.get("organic_results").and_then(Value::as_array) else {
        return Vec::new();
    };

    items
        .iter()
        .take(num_results)
        .enumerate()
        .filter_map(|(idx, item)| {
            let Some(url) = str_field(item, "link") else {
                tracing::debug!(position = idx + 1, "skipping organic result without link");
                return None;
            };
            Some(OrganicResult {
                position: u32::try_from(idx + 1).unwrap_or(u32::MAX),
                title: str_field(item, "title").unwrap_or_default(),
                displayed_url: str_field(item, "displayed_link").unwrap_or_else(|| url.clone()),
                domain: extract_domain(&url),
                snippet: str_field(item, "snippet").unwrap_or_default(),
                date: str_field(item, "date"),
                rich_snippet: item.get("rich_snippet").filter(|v| !v.is_null()).cloned(),
                sitelinks: item.get("sitelinks").filter(|v| !v.is_null()).cloned(),
                url,
            })
        })
        .collect()
}

fn parse_people_also_ask(body: &Value) -> Vec<PeopleAlsoAsk> {
    body.get("related_questions")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|q| {
                    let question = str_field(q, "question")?;
                    let source_url = str_field(q, "link");
                    Some(PeopleAlsoAsk {
                        question,
                        answer: str_field(q, "snippet").or_else(|| str_field(q, "answer")),
                        source_domain: source_url.as_deref().map(extract_domain),
                        source_url,
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

fn parse_related_searches(body: &Value) -> Vec<RelatedSearch> {
    body.get("related_searches")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|rs| str_field(rs, "query"))
                .map(|keyword| RelatedSearch { keyword })
                .collect()
        })
        .unwrap_or_default()
}

fn parse_features(body: &Value, organic: &[OrganicResult]) -> Vec<SerpFeature> {
    let mut features = Vec::new();

    if let Some(answer) = body.get("answer_box").filter(|v| v.is_object()) {
        let source_url = str_field(answer, "link");
        features.push(SerpFeature {
            feature_type: SerpFeatureType::FeaturedSnippet,
            title: str_field(answer, "title"),
            snippet: str_field(answer, "answer").or_else(|| str_field(answer, "snippet")),
            source_domain: source_url.as_deref().map(extract_domain),
            source_url,
            data: None,
        });
    }

    if present(body.get("related_questions")) {
        features.push(SerpFeature::bare(SerpFeatureType::PeopleAlsoAsk));
    }

    if let Some(graph) = body.get("knowledge_graph").filter(|v| present(Some(v))) {
        features.push(SerpFeature {
            title: str_field(graph, "title"),
            data: Some(graph.clone()),
            ..SerpFeature::bare(SerpFeatureType::KnowledgePanel)
        });
    }

    if let Some(local) = body.get("local_results").filter(|v| present(Some(v))) {
        features.push(SerpFeature {
            data: Some(serde_json::json!({ "local_results": local })),
            ..SerpFeature::bare(SerpFeatureType::LocalPack)
        });
    }

    let simple = [
        ("inline_images", SerpFeatureType::ImagePack),
        ("inline_videos", SerpFeatureType::VideoCarousel),
        ("top_stories", SerpFeatureType::TopStories),
        ("related_searches", SerpFeatureType::RelatedSearches),
        ("shopping_results", SerpFeatureType::Shopping),
    ];
    for (key, feature_type) in simple {
        if present(body.get(key)) {
            features.push(SerpFeature::bare(feature_type));
        }
    }

    if organic.iter().any(|r| r.sitelinks.is_some()) {
        features.push(SerpFeature::bare(SerpFeatureType::SiteLinks));
    }

    features
}
