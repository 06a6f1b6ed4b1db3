//! Keyword research handlers: suggestions, full analysis, clustering and
//! single-keyword metrics.

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;
use seolens_core::KeywordMetrics;
use seolens_pipeline::{
    AnalyzeOptions, ClusterReport, KeywordAnalysis, SuggestOptions, SuggestionsReport,
};

use crate::middleware::RequestId;

use super::{
    check_keyword, check_range, locale, map_pipeline_error, ApiError, ApiResponse, AppState,
};

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(super) struct SuggestRequest {
    pub seed_keyword: String,
    pub limit: Option<usize>,
    pub language: Option<String>,
    pub country: Option<String>,
    pub include_volume: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub(super) struct AnalyzeRequest {
    pub seed_keyword: String,
    pub limit: Option<usize>,
    pub language: Option<String>,
    pub country: Option<String>,
    pub include_suggestions: Option<bool>,
    pub include_volume: Option<bool>,
    pub include_serp: Option<bool>,
    pub include_clustering: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ClusterRequest {
    pub keywords: Vec<String>,
    pub num_clusters: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub(super) struct LocaleQuery {
    pub language: Option<String>,
    pub country: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/keywords/suggest
pub(super) async fn suggest(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<SuggestRequest>,
) -> Result<Json<ApiResponse<SuggestionsReport>>, ApiError> {
    let rid = &req_id.0;
    let seed = check_keyword(rid, "seed_keyword", &body.seed_keyword)?;
    let limit = check_range(rid, "limit", body.limit.unwrap_or(20), 1..=100)?;

    let mut options = SuggestOptions::new(
        seed,
        locale(body.language.as_deref(), body.country.as_deref()),
    );
    options.limit = limit;
    options.include_volume = body.include_volume.unwrap_or(true);

    let report = state.orchestrator.suggest(&options).await;
    Ok(ApiResponse::new(&req_id, report))
}

/// POST /api/v1/keywords/analyze
pub(super) async fn analyze(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<AnalyzeRequest>,
) -> Result<Json<ApiResponse<KeywordAnalysis>>, ApiError> {
    let rid = &req_id.0;
    let seed = check_keyword(rid, "seed_keyword", &body.seed_keyword)?;
    let limit = check_range(rid, "limit", body.limit.unwrap_or(20), 1..=100)?;

    let mut options = AnalyzeOptions::new(
        seed,
        locale(body.language.as_deref(), body.country.as_deref()),
    );
    options.limit = limit;
    options.include_suggestions = body.include_suggestions.unwrap_or(true);
    options.include_volume = body.include_volume.unwrap_or(true);
    options.include_serp = body.include_serp.unwrap_or(true);
    options.include_clustering = body.include_clustering.unwrap_or(true);

    let analysis = state.orchestrator.analyze(&options).await;
    Ok(ApiResponse::new(&req_id, analysis))
}

/// POST /api/v1/keywords/cluster
pub(super) async fn cluster(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<ClusterRequest>,
) -> Result<Json<ApiResponse<ClusterReport>>, ApiError> {
    let rid = &req_id.0;
    let keywords: Vec<String> = body
        .keywords
        .iter()
        .map(|kw| kw.trim())
        .filter(|kw| !kw.is_empty())
        .map(str::to_owned)
        .collect();
    check_range(rid, "keywords count", keywords.len(), 2..=200)?;
    let num_clusters = body
        .num_clusters
        .map(|n| check_range(rid, "num_clusters", n, 2..=20))
        .transpose()?;

    let report = state.orchestrator.cluster(&keywords, num_clusters).await;
    Ok(ApiResponse::new(&req_id, report))
}

/// GET /api/v1/keywords/{keyword}/metrics
pub(super) async fn keyword_metrics(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(keyword): Path<String>,
    Query(query): Query<LocaleQuery>,
) -> Result<Json<ApiResponse<KeywordMetrics>>, ApiError> {
    let rid = &req_id.0;
    let keyword = check_keyword(rid, "keyword", &keyword)?;

    let metrics = state
        .orchestrator
        .keyword_metrics(
            keyword,
            locale(query.language.as_deref(), query.country.as_deref()),
        )
        .await
        .map_err(|e| map_pipeline_error(rid, &e))?;
    Ok(ApiResponse::new(&req_id, metrics))
}
