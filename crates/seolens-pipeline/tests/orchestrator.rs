//! Orchestrator sequencing and degradation against a scripted model and
//! wiremock SERP providers.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use seolens_core::{
    DifficultyLevel, Locale, MetricsSource, SearchIntent, SerpFeatureType, SerpProvider,
    SuggestionSource,
};
use seolens_insight::{InsightError, LanguageModel, Part};
use seolens_pipeline::{
    AnalyzeOptions, AppServices, Orchestrator, PipelineError, SerpOptions, SuggestOptions,
};
use seolens_providers::{HttpSettings, SerpChain, SerpClient, SuggestionChain, VolumeChain};
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Answers each interpretation task by recognising its prompt.
#[derive(Default)]
struct RoutingModel {
    intent: Option<String>,
    clustering: Option<String>,
    difficulty: Option<String>,
    recommendations: Option<String>,
    content_gaps: Option<String>,
    product_content: Option<String>,
    tasks: Mutex<Vec<&'static str>>,
    calls: AtomicUsize,
}

impl RoutingModel {
    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn tasks(&self) -> Vec<&'static str> {
        self.tasks.lock().unwrap().clone()
    }
}

#[async_trait]
impl LanguageModel for RoutingModel {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, parts: &[Part]) -> Result<String, InsightError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let Some(Part::Text(prompt)) = parts.first() else {
            return Ok("{}".to_owned());
        };
        let (task, reply) = if prompt.contains("labelling search intent") {
            ("intent", &self.intent)
        } else if prompt.contains("grouping keywords") {
            ("clustering", &self.clustering)
        } else if prompt.contains("how hard a keyword is") {
            ("difficulty", &self.difficulty)
        } else if prompt.contains("turning research into a plan") {
            ("recommendations", &self.recommendations)
        } else if prompt.contains("writing product copy") {
            ("product_content", &self.product_content)
        } else {
            ("content_gaps", &self.content_gaps)
        };
        self.tasks.lock().unwrap().push(task);
        Ok(reply.clone().unwrap_or_else(|| "not json".to_owned()))
    }
}

fn fast_http() -> HttpSettings {
    HttpSettings {
        timeout_secs: 5,
        max_retries: 0,
        retry_backoff_ms: 0,
        ..HttpSettings::default()
    }
}

fn serp_body() -> serde_json::Value {
    serde_json::json!({
        "search_information": { "total_results": 1_000 },
        "organic_results": [
            { "position": 1, "title": "SEO tools", "link": "https://www.moz.com/tools", "snippet": "Moz tools." },
            { "position": 2, "title": "Ahrefs", "link": "https://ahrefs.com/", "snippet": "Ahrefs suite." },
            { "position": 3, "title": "Moz guide", "link": "https://moz.com/guide", "snippet": "Beginner guide." }
        ],
        "related_questions": [{ "question": "What are SEO tools?" }]
    })
}

fn services(model: &Arc<RoutingModel>, serp: SerpChain) -> Arc<AppServices> {
    Arc::new(AppServices::new(
        SuggestionChain::new(Duration::from_secs(60)),
        VolumeChain::new(),
        serp,
        Arc::clone(model) as Arc<dyn LanguageModel>,
    ))
}

fn unconfigured_serp() -> SerpChain {
    SerpChain::new(Duration::from_secs(60))
}

async fn serp_server(status: u16) -> (MockServer, SerpChain) {
    let server = MockServer::start().await;
    let template = if status == 200 {
        ResponseTemplate::new(200).set_body_json(serp_body())
    } else {
        ResponseTemplate::new(status)
    };
    Mock::given(method("GET"))
        .respond_with(template)
        .mount(&server)
        .await;
    let client = SerpClient::with_base_url(SerpProvider::Serpapi, "key", fast_http(), &server.uri())
        .expect("client construction should not fail");
    let chain = SerpChain::new(Duration::from_secs(60)).with_provider(client);
    (server, chain)
}

#[tokio::test]
async fn suggestions_only_makes_no_model_calls() {
    let model = Arc::new(RoutingModel::default());
    let orchestrator = Orchestrator::new(services(&model, unconfigured_serp()));

    let mut options = SuggestOptions::new("seo tools", Locale::default());
    options.limit = 10;
    let report = orchestrator.suggest(&options).await;

    assert_eq!(report.total_suggestions, 10);
    assert!(report
        .suggestions
        .iter()
        .all(|s| s.source == SuggestionSource::Generated && s.search_volume.is_some()));
    assert_eq!(report.data_sources, vec!["generated", "estimated"]);
    assert_eq!(model.calls(), 0);
}

#[tokio::test]
async fn suggestions_without_volume_leave_metrics_empty() {
    let model = Arc::new(RoutingModel::default());
    let orchestrator = Orchestrator::new(services(&model, unconfigured_serp()));

    let mut options = SuggestOptions::new("seo tools", Locale::default());
    options.include_volume = false;
    let report = orchestrator.suggest(&options).await;

    assert!(report.suggestions.iter().all(|s| s.search_volume.is_none()));
    assert_eq!(report.data_sources, vec!["generated"]);
}

#[tokio::test]
async fn full_analysis_runs_every_stage_in_order() {
    let (_server, serp) = serp_server(200).await;
    let model = Arc::new(RoutingModel {
        intent: Some(
            r#"{"classifications": [{"keyword": "best seo tools", "intent": "commercial"}]}"#
                .to_owned(),
        ),
        clustering: Some(
            r#"```json
{"clusters": [{"cluster_name": "Tools", "primary_keyword": "best seo tools", "keywords": ["best seo tools", "seo tools best"], "intent": "commercial"}]}
```"#
                .to_owned(),
        ),
        recommendations: Some(r#"{"overall_strategy": "Publish comparisons."}"#.to_owned()),
        ..RoutingModel::default()
    });
    let orchestrator = Orchestrator::new(services(&model, serp));

    let mut options = AnalyzeOptions::new("seo tools", Locale::default());
    options.limit = 6;
    let analysis = orchestrator.analyze(&options).await;

    assert_eq!(analysis.total_keywords, 6);
    let best = analysis
        .keywords
        .iter()
        .find(|k| k.keyword == "best seo tools")
        .expect("generated keyword present");
    assert_eq!(best.intent, SearchIntent::Commercial);
    assert!(analysis
        .keywords
        .iter()
        .filter(|k| k.keyword != "best seo tools")
        .all(|k| k.intent == SearchIntent::Unknown));

    let serp = analysis.serp_analysis.as_ref().expect("SERP section present");
    assert_eq!(serp.provider, SerpProvider::Serpapi);

    let clusters = analysis.clusters.as_ref().expect("clusters requested");
    assert_eq!(clusters.len(), 1);
    assert_eq!(clusters[0].cluster_id, 1);
    assert!(clusters[0].avg_search_volume.is_some());

    assert_eq!(
        analysis.insights.as_ref().and_then(|i| i["overall_strategy"].as_str()),
        Some("Publish comparisons.")
    );
    assert_eq!(
        analysis.data_sources,
        vec!["generated", "estimated", "serpapi", "gemini"]
    );
    // The seed itself is not among generated variations, so no difficulty call.
    assert_eq!(model.tasks(), vec!["intent", "clustering", "recommendations"]);
}

#[tokio::test]
async fn seed_only_analysis_scores_difficulty() {
    let (_server, serp) = serp_server(200).await;
    let model = Arc::new(RoutingModel {
        difficulty: Some(
            r#"{"difficulty_level": "HARD", "difficulty_score": 71, "reasoning": "Big brands."}"#
                .to_owned(),
        ),
        ..RoutingModel::default()
    });
    let orchestrator = Orchestrator::new(services(&model, serp));

    let mut options = AnalyzeOptions::new("seo tools", Locale::default());
    options.include_suggestions = false;
    let analysis = orchestrator.analyze(&options).await;

    assert_eq!(analysis.total_keywords, 1);
    let seed = &analysis.keywords[0];
    assert_eq!(seed.source, SuggestionSource::Seed);
    assert_eq!(seed.metrics_source, Some(MetricsSource::Estimated));
    assert_eq!(seed.difficulty, Some(DifficultyLevel::Hard));
    assert_eq!(seed.difficulty_score, Some(71.0));
    assert_eq!(seed.intent, SearchIntent::Unknown, "non-JSON intent reply defaults");
    assert!(analysis.clusters.is_none(), "one keyword is never clustered");
    assert_eq!(
        analysis.insights.as_ref().and_then(|i| i["overall_strategy"].as_str()),
        Some("Unable to generate recommendations")
    );
    assert_eq!(model.tasks(), vec!["intent", "difficulty", "recommendations"]);
}

#[tokio::test]
async fn serp_failure_is_omitted_from_full_analysis() {
    let (_server, serp) = serp_server(503).await;
    let model = Arc::new(RoutingModel::default());
    let orchestrator = Orchestrator::new(services(&model, serp));

    let mut options = AnalyzeOptions::new("seo tools", Locale::default());
    options.include_suggestions = false;
    let analysis = orchestrator.analyze(&options).await;

    assert!(analysis.serp_analysis.is_none());
    assert!(!analysis.data_sources.iter().any(|s| s == "serpapi"));
    assert_eq!(model.tasks(), vec!["intent", "recommendations"]);
}

#[tokio::test]
async fn serp_with_insights_attaches_content_gaps() {
    let (_server, serp) = serp_server(200).await;
    let model = Arc::new(RoutingModel {
        content_gaps: Some(
            r#"{"common_themes": ["tool lists"], "content_gaps": [{"gap": "pricing"}], "recommended_format": "comparison"}"#
                .to_owned(),
        ),
        ..RoutingModel::default()
    });
    let orchestrator = Orchestrator::new(services(&model, serp));

    let analysis = orchestrator
        .serp_with_insights(&SerpOptions::new("seo tools", Locale::default()))
        .await
        .expect("SERP should succeed");

    let insights = analysis.insights.expect("content gaps attached");
    assert_eq!(insights["common_themes"][0], "tool lists");
    assert_eq!(model.tasks(), vec!["content_gaps"]);
}

#[tokio::test]
async fn serp_with_insights_maps_rate_limit() {
    let (_server, serp) = serp_server(429).await;
    let model = Arc::new(RoutingModel::default());
    let orchestrator = Orchestrator::new(services(&model, serp));

    let err = orchestrator
        .serp_with_insights(&SerpOptions::new("seo tools", Locale::default()))
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::RateLimited(_)), "got {err:?}");
    assert_eq!(model.calls(), 0);
}

#[tokio::test]
async fn unconfigured_serp_skips_content_gaps() {
    let model = Arc::new(RoutingModel::default());
    let orchestrator = Orchestrator::new(services(&model, unconfigured_serp()));

    let analysis = orchestrator
        .serp_with_insights(&SerpOptions::new("seo tools", Locale::default()))
        .await
        .expect("placeholder is not an error");
    assert_eq!(analysis.provider, SerpProvider::None);
    assert!(analysis.insights.is_some_and(|i| i.get("warning").is_some()));
    assert_eq!(model.calls(), 0);
}

#[tokio::test]
async fn competitors_group_domains_and_lift_gaps() {
    let (_server, serp) = serp_server(200).await;
    let model = Arc::new(RoutingModel {
        content_gaps: Some(
            r#"{"content_gaps": [{"gap": "pricing"}], "recommended_format": "comparison"}"#
                .to_owned(),
        ),
        ..RoutingModel::default()
    });
    let orchestrator = Orchestrator::new(services(&model, serp));

    let report = orchestrator
        .competitors(&SerpOptions::new("seo tools", Locale::default()))
        .await
        .expect("competitor mining should succeed");

    assert_eq!(report.total_competitors, 2);
    assert_eq!(report.top_competitors[0].domain, "moz.com");
    assert_eq!(report.top_competitors[0].ranking_positions, vec![1, 3]);
    assert_eq!(report.common_serp_features, vec![SerpFeatureType::PeopleAlsoAsk]);
    assert_eq!(report.content_gaps.as_ref().map(Vec::len), Some(1));
    assert_eq!(report.recommendations.as_deref(), Some("comparison"));
    assert!(!report.cached);
}

#[tokio::test]
async fn standalone_clustering_reports_unclustered_keywords() {
    let model = Arc::new(RoutingModel {
        clustering: Some(
            r#"{"clusters": [{"cluster_id": 3, "cluster_name": "Audit", "keywords": ["seo audit", "site audit"]}]}"#
                .to_owned(),
        ),
        ..RoutingModel::default()
    });
    let orchestrator = Orchestrator::new(services(&model, unconfigured_serp()));

    let keywords = vec![
        "seo audit".to_owned(),
        "site audit".to_owned(),
        "link building".to_owned(),
    ];
    let report = orchestrator.cluster(&keywords, Some(2)).await;

    assert_eq!(report.total_keywords, 3);
    assert_eq!(report.num_clusters, 1);
    assert_eq!(report.clusters[0].cluster_id, 3);
    assert_eq!(report.clusters[0].avg_search_volume, None);
    assert_eq!(
        report.unclustered_keywords,
        Some(vec!["link building".to_owned()])
    );
}

#[tokio::test]
async fn standalone_clustering_below_two_keywords_skips_model() {
    let model = Arc::new(RoutingModel::default());
    let orchestrator = Orchestrator::new(services(&model, unconfigured_serp()));

    let report = orchestrator.cluster(&["seo".to_owned()], None).await;
    assert!(report.clusters.is_empty());
    assert_eq!(model.calls(), 0);
}

#[tokio::test]
async fn keyword_metrics_returns_seed_record() {
    let model = Arc::new(RoutingModel {
        intent: Some(
            r#"{"classifications": [{"keyword": "best seo tools guide", "intent": "informational"}]}"#
                .to_owned(),
        ),
        ..RoutingModel::default()
    });
    let orchestrator = Orchestrator::new(services(&model, unconfigured_serp()));

    let metrics = orchestrator
        .keyword_metrics("best seo tools guide", Locale::default())
        .await
        .expect("seed metrics");

    assert_eq!(metrics.intent, SearchIntent::Informational);
    let volume = metrics.search_volume.expect("estimated volume");
    assert!((100..1_000).contains(&volume));
    assert_eq!(metrics.competition.as_str(), "low");
}

/// Fails every call with a quota error.
struct QuotaExhaustedModel;

#[async_trait]
impl LanguageModel for QuotaExhaustedModel {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, _parts: &[Part]) -> Result<String, InsightError> {
        Err(InsightError::Status {
            status: 429,
            body: "quota exceeded".to_owned(),
        })
    }
}

#[tokio::test]
async fn generated_content_carries_originality_summary() {
    let model = Arc::new(RoutingModel {
        product_content: Some(
            r#"{"seo_title": "Walnut desk organiser", "bullet_features": ["solid wood"]}"#
                .to_owned(),
        ),
        ..RoutingModel::default()
    });
    let orchestrator = Orchestrator::new(services(&model, unconfigured_serp()));

    let report = orchestrator
        .generate_content("desk organiser", vec![Part::image("image/png", b"desk")])
        .await
        .expect("content generated");

    assert_eq!(model.tasks(), vec!["product_content"]);
    assert_eq!(report.generated_content["seo_title"], "Walnut desk organiser");
    assert!(report.plagiarism.is_unique);
    assert_eq!(report.plagiarism.sources_found, 0);
    assert!((report.plagiarism.originality_score - 100.0).abs() < f64::EPSILON);
    assert_eq!(report.data_sources, vec!["gemini"]);
}

#[tokio::test]
async fn generate_content_requires_an_image() {
    let model = Arc::new(RoutingModel::default());
    let orchestrator = Orchestrator::new(services(&model, unconfigured_serp()));

    let err = orchestrator
        .generate_content("desk organiser", Vec::new())
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::InvalidInput(_)));
    assert_eq!(model.calls(), 0);
}

#[tokio::test]
async fn generate_content_maps_model_quota_errors() {
    let services = Arc::new(AppServices::new(
        SuggestionChain::new(Duration::from_secs(60)),
        VolumeChain::new(),
        unconfigured_serp(),
        Arc::new(QuotaExhaustedModel),
    ));
    let err = Orchestrator::new(services)
        .generate_content("desk organiser", vec![Part::image("image/png", b"desk")])
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::RateLimited(_)));
}
