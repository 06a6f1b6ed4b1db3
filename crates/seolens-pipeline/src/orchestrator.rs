//! Named end-to-end pipelines.
//!
//! Stages within one call run strictly in sequence: each stage's output is
//! fully materialised before the next begins. Optional stages (volume, SERP
//! in the full analysis) degrade by omission; mandatory stages surface a
//! [`PipelineError`].

use std::sync::Arc;

use serde_json::{json, Value};
use seolens_core::{
    KeywordMetrics, KeywordSuggestion, Locale, SerpAnalysis, SerpProvider, SuggestionSource,
};
use seolens_insight::Part;
use seolens_providers::SerpRequest;

use crate::competitors::{common_features, group_by_domain};
use crate::error::PipelineError;
use crate::services::AppServices;
use crate::similarity::check_similarity;
use crate::types::{
    AnalyzeOptions, ClusterReport, CompetitorReport, GeneratedContent, KeywordAnalysis,
    PlagiarismSummary, SerpOptions, SuggestOptions, SuggestionsReport,
};

/// Organic results beyond this are not sent to content-gap analysis.
const CONTENT_GAP_RESULTS: usize = 10;

/// Collects the names of data sources that actually contributed, in order.
#[derive(Default)]
struct SourceLedger(Vec<String>);

impl SourceLedger {
    fn push(&mut self, name: &str) {
        if !self.0.iter().any(|s| s == name) {
            self.0.push(name.to_owned());
        }
    }

    fn record_keywords(&mut self, keywords: &[KeywordSuggestion]) {
        for kw in keywords {
            self.push(kw.source.as_str());
        }
        for kw in keywords {
            if let Some(source) = kw.metrics_source {
                self.push(source.as_str());
            }
        }
    }

    fn record_serp(&mut self, analysis: &SerpAnalysis) {
        if analysis.provider != SerpProvider::None {
            self.push(analysis.provider.as_str());
        }
    }

    fn finish(self) -> Vec<String> {
        self.0
    }
}

#[derive(Clone)]
pub struct Orchestrator {
    services: Arc<AppServices>,
}

impl Orchestrator {
    #[must_use]
    pub fn new(services: Arc<AppServices>) -> Self {
        Self { services }
    }

    /// Suggestion chain, then optional volume enrichment. No model calls.
    ///
    /// The suggestion chain ends in local generation, so this cannot fail.
    pub async fn suggest(&self, options: &SuggestOptions) -> SuggestionsReport {
        let seed = options.seed_keyword.trim();
        tracing::info!(seed, limit = options.limit, "suggestions pipeline started");

        let outcome = self
            .services
            .suggestions
            .suggest(seed, &options.locale, options.limit)
            .await;

        let mut suggestions = outcome.suggestions;
        if options.include_volume {
            suggestions = self.services.volume.enrich(suggestions, &options.locale).await;
        }

        let mut sources = SourceLedger::default();
        sources.record_keywords(&suggestions);

        SuggestionsReport {
            seed_keyword: seed.to_owned(),
            total_suggestions: suggestions.len(),
            suggestions,
            data_sources: sources.finish(),
            cached: outcome.cached,
        }
    }

    /// Full analysis: suggestions → volume → intent → SERP + seed difficulty
    /// → clustering → recommendations.
    pub async fn analyze(&self, options: &AnalyzeOptions) -> KeywordAnalysis {
        let seed = options.seed_keyword.trim();
        let locale = &options.locale;
        let interpreter = &self.services.interpreter;
        tracing::info!(seed, "full analysis started");

        let (mut suggestions, cached) = if options.include_suggestions {
            let outcome = self
                .services
                .suggestions
                .suggest(seed, locale, options.limit)
                .await;
            tracing::info!(seed, count = outcome.suggestions.len(), "keyword suggestions found");
            (outcome.suggestions, outcome.cached)
        } else {
            (vec![KeywordSuggestion::new(seed, SuggestionSource::Seed)], false)
        };

        if options.include_volume {
            suggestions = self.services.volume.enrich(suggestions, locale).await;
            tracing::debug!(seed, "volume enrichment finished");
        }

        let mut sources = SourceLedger::default();
        sources.record_keywords(&suggestions);

        let mut keywords: Vec<KeywordMetrics> =
            suggestions.into_iter().map(KeywordMetrics::from).collect();

        let texts: Vec<String> = keywords.iter().map(|kw| kw.keyword.clone()).collect();
        let intents = interpreter.classify_intent(&texts).await;
        for kw in &mut keywords {
            kw.intent = intents.get(&kw.keyword).copied().unwrap_or_default();
        }
        tracing::debug!(seed, "intent classification finished");

        let serp_analysis = if options.include_serp {
            self.optional_serp(seed, locale, &mut keywords).await
        } else {
            None
        };
        if let Some(analysis) = &serp_analysis {
            sources.record_serp(analysis);
        }

        let clusters = if options.include_clustering && keywords.len() >= 2 {
            let clusters = interpreter.cluster_keywords(&keywords, None).await;
            tracing::info!(seed, clusters = clusters.len(), "keywords clustered");
            Some(clusters)
        } else {
            None
        };

        let serp_insights = serp_analysis
            .as_ref()
            .map(|analysis| json!({ "serp_features": analysis.feature_names() }));
        let insights = interpreter
            .generate_recommendations(
                &keywords,
                clusters.as_deref().unwrap_or_default(),
                serp_insights.as_ref(),
            )
            .await;
        sources.push(interpreter.model_name());
        tracing::info!(seed, keywords = keywords.len(), "full analysis finished");

        KeywordAnalysis {
            seed_keyword: seed.to_owned(),
            total_keywords: keywords.len(),
            keywords,
            clusters,
            serp_analysis,
            insights: Some(insights),
            data_sources: sources.finish(),
            cached,
        }
    }

    /// SERP fetch plus seed difficulty. Failures are logged and omitted.
    async fn optional_serp(
        &self,
        seed: &str,
        locale: &Locale,
        keywords: &mut [KeywordMetrics],
    ) -> Option<SerpAnalysis> {
        let request = SerpRequest::new(seed, locale.clone());
        let analysis = match self.services.serp.analyze(&request).await {
            Ok(analysis) => analysis,
            Err(e) => {
                tracing::warn!(seed, error = %e, "SERP stage failed, omitting from analysis");
                return None;
            }
        };

        if let Some(seed_metrics) = keywords.iter_mut().find(|kw| kw.keyword == seed) {
            let assessment = self
                .services
                .interpreter
                .analyze_difficulty(
                    seed,
                    &analysis.feature_names(),
                    seed_metrics.competition_score,
                    seed_metrics.search_volume,
                )
                .await;
            seed_metrics.difficulty = assessment.difficulty_level;
            seed_metrics.difficulty_score = assessment.difficulty_score;
        }

        Some(analysis)
    }

    /// Clusters a caller-supplied keyword list.
    ///
    /// Fewer than two keywords yields an empty report without a model call.
    pub async fn cluster(&self, keywords: &[String], num_clusters: Option<usize>) -> ClusterReport {
        let metrics: Vec<KeywordMetrics> = keywords
            .iter()
            .map(|kw| KeywordMetrics::from(KeywordSuggestion::new(kw.trim(), SuggestionSource::Seed)))
            .collect();

        let clusters = self
            .services
            .interpreter
            .cluster_keywords(&metrics, num_clusters)
            .await;

        let unclustered: Vec<String> = metrics
            .iter()
            .map(|m| &m.keyword)
            .filter(|kw| !clusters.iter().any(|c| c.keywords.contains(*kw)))
            .cloned()
            .collect();

        ClusterReport {
            total_keywords: metrics.len(),
            num_clusters: clusters.len(),
            clusters,
            unclustered_keywords: (!unclustered.is_empty()).then_some(unclustered),
        }
    }

    /// Metrics for one keyword: the full analysis with suggestions and
    /// clustering turned off.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::NotFound`] if the analysis produced no record
    /// for `keyword` (a blank keyword).
    pub async fn keyword_metrics(
        &self,
        keyword: &str,
        locale: Locale,
    ) -> Result<KeywordMetrics, PipelineError> {
        let mut options = AnalyzeOptions::new(keyword, locale);
        options.include_suggestions = false;
        options.include_clustering = false;
        let analysis = self.analyze(&options).await;
        let keyword = keyword.trim();
        analysis
            .keywords
            .into_iter()
            .find(|kw| kw.keyword == keyword)
            .ok_or_else(|| PipelineError::NotFound(format!("no metrics for keyword '{keyword}'")))
    }

    /// SERP fetch, then content-gap analysis over the top organic results.
    ///
    /// # Errors
    ///
    /// Propagates the SERP chain's failure, mapped into a [`PipelineError`].
    pub async fn serp_with_insights(
        &self,
        options: &SerpOptions,
    ) -> Result<SerpAnalysis, PipelineError> {
        let keyword = options.keyword.trim();
        tracing::info!(keyword, "SERP analysis started");
        let mut analysis = self.services.serp.analyze(&serp_request(options)).await?;

        if let Some(gaps) = self.content_gaps(keyword, &analysis).await {
            analysis.insights = Some(gaps);
        }
        Ok(analysis)
    }

    /// Groups the top organic results by domain and summarises content gaps.
    ///
    /// # Errors
    ///
    /// Propagates the SERP chain's failure, mapped into a [`PipelineError`].
    pub async fn competitors(
        &self,
        options: &SerpOptions,
    ) -> Result<CompetitorReport, PipelineError> {
        let keyword = options.keyword.trim();
        tracing::info!(keyword, top_n = options.num_results, "competitor mining started");
        let analysis = self.services.serp.analyze(&serp_request(options)).await?;

        let mut competitors = group_by_domain(&analysis.organic_results);
        let total_competitors = competitors.len();
        competitors.truncate(usize::try_from(options.num_results).unwrap_or(usize::MAX));

        let gaps = self.content_gaps(keyword, &analysis).await;
        let content_gaps = gaps
            .as_ref()
            .and_then(|g| g.get("content_gaps"))
            .and_then(Value::as_array)
            .cloned();
        let recommendations = gaps
            .as_ref()
            .and_then(|g| g.get("recommended_format"))
            .and_then(Value::as_str)
            .map(str::to_owned);

        Ok(CompetitorReport {
            keyword: keyword.to_owned(),
            total_competitors,
            top_competitors: competitors,
            common_serp_features: common_features(&analysis.features),
            content_gaps,
            recommendations,
            cached: analysis.cached,
        })
    }

    /// Product copy from a prompt and product images, then a similarity check
    /// of the generated text.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::InvalidInput`] when `images` is empty.
    /// - The model call's failure, mapped into a [`PipelineError`].
    pub async fn generate_content(
        &self,
        prompt: &str,
        images: Vec<Part>,
    ) -> Result<GeneratedContent, PipelineError> {
        if images.is_empty() {
            return Err(PipelineError::InvalidInput(
                "at least one image is required".to_owned(),
            ));
        }
        tracing::info!(images = images.len(), "content generation started");
        let generated = self
            .services
            .interpreter
            .generate_content(prompt, images)
            .await?;

        let text = match &generated {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        };
        // No reference corpus is searched, so nothing can be found.
        let plagiarism = PlagiarismSummary::from_report(&check_similarity(&text, &[]), 0);

        Ok(GeneratedContent {
            generated_content: generated,
            plagiarism,
            data_sources: vec![self.services.interpreter.model_name().to_owned()],
        })
    }

    async fn content_gaps(&self, keyword: &str, analysis: &SerpAnalysis) -> Option<Value> {
        if analysis.organic_results.is_empty() {
            tracing::debug!(keyword, "no organic results, skipping content-gap analysis");
            return None;
        }
        let top = analysis.organic_results.iter().take(CONTENT_GAP_RESULTS);
        let titles: Vec<String> = top.clone().map(|r| r.title.clone()).collect();
        let snippets: Vec<String> = top.map(|r| r.snippet.clone()).collect();
        Some(
            self.services
                .interpreter
                .analyze_content_gaps(keyword, &titles, &snippets)
                .await,
        )
    }
}

fn serp_request(options: &SerpOptions) -> SerpRequest {
    SerpRequest::new(options.keyword.trim(), options.locale.clone())
        .device(options.device)
        .num_results(options.num_results)
}
