//! `Interpreter` task behaviour against a scripted model.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use seolens_core::{
    DifficultyLevel, KeywordMetrics, KeywordSuggestion, SearchIntent, SuggestionSource,
};
use seolens_insight::{InsightError, Interpreter, LanguageModel, Part};

/// Replays canned replies in order and records every prompt it receives.
#[derive(Default)]
struct ScriptedModel {
    replies: Mutex<VecDeque<Result<String, InsightError>>>,
    prompts: Mutex<Vec<String>>,
    part_counts: Mutex<Vec<usize>>,
    calls: AtomicUsize,
}

impl ScriptedModel {
    fn replying(replies: Vec<Result<String, InsightError>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            ..Self::default()
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn last_prompt(&self) -> String {
        self.prompts.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, parts: &[Part]) -> Result<String, InsightError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.part_counts.lock().unwrap().push(parts.len());
        if let Some(Part::Text(text)) = parts.first() {
            self.prompts.lock().unwrap().push(text.clone());
        }
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok("{}".to_owned()))
    }
}

fn interpreter(model: &Arc<ScriptedModel>) -> Interpreter {
    Interpreter::new(Arc::clone(model) as Arc<dyn LanguageModel>)
}

fn metrics(keyword: &str, volume: Option<u64>) -> KeywordMetrics {
    let mut suggestion = KeywordSuggestion::new(keyword, SuggestionSource::Generated);
    suggestion.search_volume = volume;
    KeywordMetrics::from(suggestion)
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_owned()).collect()
}

#[tokio::test]
async fn intent_parses_fenced_reply() {
    let model = ScriptedModel::replying(vec![Ok(r#"```json
{"classifications": [
  {"keyword": "buy seo tools", "intent": "TRANSACTIONAL", "confidence": 0.9},
  {"keyword": "what is seo", "intent": "informational"}
]}
```"#
        .to_owned())]);
    let keywords = strings(&["buy seo tools", "what is seo"]);

    let intents = interpreter(&model).classify_intent(&keywords).await;

    assert_eq!(intents["buy seo tools"], SearchIntent::Transactional);
    assert_eq!(intents["what is seo"], SearchIntent::Informational);
    assert!(model.last_prompt().contains("- buy seo tools\n- what is seo"));
}

#[tokio::test]
async fn intent_skips_model_for_empty_input() {
    let model = ScriptedModel::replying(vec![]);
    let intents = interpreter(&model).classify_intent(&[]).await;
    assert!(intents.is_empty());
    assert_eq!(model.calls(), 0);
}

#[tokio::test]
async fn intent_defaults_to_unknown_on_prose_reply() {
    let model = ScriptedModel::replying(vec![Ok("I think these are mostly commercial.".to_owned())]);
    let keywords = strings(&["seo audit", "seo agency"]);

    let intents = interpreter(&model).classify_intent(&keywords).await;

    assert_eq!(intents.len(), 2);
    assert!(intents.values().all(|i| *i == SearchIntent::Unknown));
}

#[tokio::test]
async fn intent_defaults_to_unknown_on_transport_error() {
    let model = ScriptedModel::replying(vec![Err(InsightError::Transport("reset".to_owned()))]);
    let keywords = strings(&["seo audit"]);

    let intents = interpreter(&model).classify_intent(&keywords).await;

    assert_eq!(intents["seo audit"], SearchIntent::Unknown);
}

#[tokio::test]
async fn clustering_skips_model_below_two_keywords() {
    let model = ScriptedModel::replying(vec![]);
    let clusters = interpreter(&model)
        .cluster_keywords(&[metrics("seo", Some(10))], None)
        .await;
    assert!(clusters.is_empty());
    assert_eq!(model.calls(), 0);
}

#[tokio::test]
async fn clustering_fills_missing_fields_and_averages_volume() {
    let model = ScriptedModel::replying(vec![Ok(r#"{"clusters": [
        {"cluster_id": 7, "cluster_name": "Tools", "primary_keyword": "seo tools",
         "keywords": ["seo tools", "free seo tools"], "intent": "COMMERCIAL"},
        {"keywords": ["seo guide", "seo tutorial"]}
    ]}"#
    .to_owned())]);
    let keywords = vec![
        metrics("seo tools", Some(1000)),
        metrics("free seo tools", Some(501)),
        metrics("seo guide", None),
        metrics("seo tutorial", None),
    ];

    let clusters = interpreter(&model).cluster_keywords(&keywords, None).await;

    assert_eq!(clusters.len(), 2);
    assert_eq!(clusters[0].cluster_id, 7);
    assert_eq!(clusters[0].intent, SearchIntent::Commercial);
    assert_eq!(clusters[0].avg_search_volume, Some(750));

    assert_eq!(clusters[1].cluster_id, 2);
    assert_eq!(clusters[1].cluster_name, "Cluster 2");
    assert_eq!(clusters[1].primary_keyword, "seo guide");
    assert_eq!(clusters[1].intent, SearchIntent::Unknown);
    assert_eq!(clusters[1].avg_search_volume, None);

    let prompt = model.last_prompt();
    assert!(prompt.contains("into 2 clusters"));
    assert!(prompt.contains("- seo guide (volume: N/A, competition: unknown)"));
}

#[tokio::test]
async fn clustering_honours_requested_count() {
    let model = ScriptedModel::replying(vec![Ok(r#"{"clusters": []}"#.to_owned())]);
    let keywords = vec![metrics("a b", None), metrics("c d", None)];

    interpreter(&model).cluster_keywords(&keywords, Some(5)).await;

    assert!(model.last_prompt().contains("into 5 clusters"));
}

#[tokio::test]
async fn clustering_returns_empty_on_non_object_reply() {
    let model = ScriptedModel::replying(vec![Ok("[1, 2, 3]".to_owned())]);
    let keywords = vec![metrics("a", None), metrics("b", None)];

    let clusters = interpreter(&model).cluster_keywords(&keywords, None).await;

    assert!(clusters.is_empty());
}

#[tokio::test]
async fn difficulty_reads_reply_fields() {
    let model = ScriptedModel::replying(vec![Ok(r#"{
        "difficulty_level": "HARD",
        "difficulty_score": 72,
        "reasoning": "Big brands dominate.",
        "ranking_factors": ["authority: high", ""],
        "estimated_time_to_rank": "6-12 months"
    }"#
    .to_owned())]);

    let assessment = interpreter(&model)
        .analyze_difficulty("seo tools", &["featured_snippet", "people_also_ask"], Some(0.8), Some(12_000))
        .await;

    assert_eq!(assessment.difficulty_level, Some(DifficultyLevel::Hard));
    assert_eq!(assessment.difficulty_score, Some(72.0));
    assert_eq!(assessment.ranking_factors, vec!["authority: high".to_owned()]);
    assert_eq!(assessment.estimated_time_to_rank.as_deref(), Some("6-12 months"));

    let prompt = model.last_prompt();
    assert!(prompt.contains("SERP features present: featured_snippet, people_also_ask"));
    assert!(prompt.contains("Monthly search volume: 12000"));
}

#[tokio::test]
async fn difficulty_drops_out_of_range_score() {
    let model = ScriptedModel::replying(vec![Ok(
        r#"{"difficulty_level": "banana", "difficulty_score": 140}"#.to_owned(),
    )]);

    let assessment = interpreter(&model)
        .analyze_difficulty("seo", &[], None, None)
        .await;

    assert_eq!(assessment.difficulty_level, Some(DifficultyLevel::Medium));
    assert_eq!(assessment.difficulty_score, None);
    assert!(model.last_prompt().contains("SERP features present: None"));
    assert!(model.last_prompt().contains("Monthly search volume: N/A"));
}

#[tokio::test]
async fn difficulty_falls_back_on_bad_reply() {
    let model = ScriptedModel::replying(vec![Ok("not json".to_owned())]);

    let assessment = interpreter(&model)
        .analyze_difficulty("seo", &[], None, None)
        .await;

    assert_eq!(assessment.difficulty_level, Some(DifficultyLevel::Medium));
    assert_eq!(assessment.difficulty_score, Some(50.0));
    assert_eq!(assessment.reasoning, "Unable to analyze difficulty");
}

#[tokio::test]
async fn recommendations_limit_keywords_and_describe_missing_serp() {
    let model = ScriptedModel::replying(vec![Ok(r#"{"overall_strategy": "Go long-tail."}"#.to_owned())]);
    let keywords: Vec<KeywordMetrics> = (0..25).map(|i| metrics(&format!("kw{i:02}"), None)).collect();

    let value = interpreter(&model)
        .generate_recommendations(&keywords, &[], None)
        .await;

    assert_eq!(value["overall_strategy"], "Go long-tail.");
    let prompt = model.last_prompt();
    assert!(prompt.contains("- kw19: volume=N/A"));
    assert!(!prompt.contains("kw20"));
    assert!(prompt.contains("No SERP data available"));
}

#[tokio::test]
async fn recommendations_fall_back_on_bad_reply() {
    let model = ScriptedModel::replying(vec![Ok("```\nnope\n```".to_owned())]);

    let value = interpreter(&model)
        .generate_recommendations(&[], &[], Some(&serde_json::json!({"serp_features": []})))
        .await;

    assert_eq!(
        value,
        serde_json::json!({"overall_strategy": "Unable to generate recommendations"})
    );
}

#[tokio::test]
async fn content_gaps_number_titles_and_fall_back() {
    let model = ScriptedModel::replying(vec![
        Ok(r#"{"common_themes": ["pricing"], "content_gaps": [{"gap": "setup"}]}"#.to_owned()),
        Err(InsightError::Status {
            status: 500,
            body: "boom".to_owned(),
        }),
    ]);
    let interp = interpreter(&model);
    let titles = strings(&["Best SEO tools", "SEO tools compared"]);
    let snippets = strings(&["A list.", "A table."]);

    let value = interp.analyze_content_gaps("seo tools", &titles, &snippets).await;
    assert_eq!(value["common_themes"][0], "pricing");
    assert!(model.last_prompt().contains("1. Best SEO tools\n2. SEO tools compared"));

    let fallback = interp.analyze_content_gaps("seo tools", &titles, &snippets).await;
    assert_eq!(
        fallback,
        serde_json::json!({"common_themes": [], "content_gaps": []})
    );
    assert_eq!(model.calls(), 2);
}

#[tokio::test]
async fn model_name_comes_from_backend() {
    let model = ScriptedModel::replying(vec![]);
    assert_eq!(interpreter(&model).model_name(), "scripted");
}

#[tokio::test]
async fn generate_content_sends_prompt_then_images() {
    let model = ScriptedModel::replying(vec![Ok(
        "```json\n{\"seo_title\": \"Ceramic pour-over kettle\"}\n```".to_owned(),
    )]);
    let images = vec![
        Part::image("image/png", b"front"),
        Part::image("image/jpeg", b"side"),
    ];

    let value = interpreter(&model)
        .generate_content("  matte black kettle  ", images)
        .await
        .expect("model answered");

    assert_eq!(value["seo_title"], "Ceramic pour-over kettle");
    assert!(model.last_prompt().contains("Instructions:\nmatte black kettle\n"));
    assert_eq!(*model.part_counts.lock().unwrap(), vec![3]);
}

#[tokio::test]
async fn generate_content_keeps_plain_text_and_surfaces_model_errors() {
    let model = ScriptedModel::replying(vec![
        Ok("A sturdy kettle for slow mornings.".to_owned()),
        Err(InsightError::Status {
            status: 429,
            body: "quota".to_owned(),
        }),
    ]);
    let interp = interpreter(&model);
    let image = || vec![Part::image("image/png", b"front")];

    let text = interp
        .generate_content("kettle", image())
        .await
        .expect("text reply is kept");
    assert_eq!(text, serde_json::json!("A sturdy kettle for slow mornings."));

    let err = interp.generate_content("kettle", image()).await.unwrap_err();
    assert!(matches!(err, InsightError::Status { status: 429, .. }));
}
