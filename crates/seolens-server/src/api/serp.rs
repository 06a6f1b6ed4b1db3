//! SERP analysis and competitor mining handlers.

use axum::{extract::State, Extension, Json};
use serde::Deserialize;
use seolens_core::{Device, SerpAnalysis};
use seolens_pipeline::{CompetitorReport, SerpOptions};

use crate::middleware::RequestId;

use super::{
    check_keyword, check_range, locale, map_pipeline_error, ApiError, ApiResponse, AppState,
};

#[derive(Debug, Deserialize)]
pub(super) struct SerpAnalysisRequest {
    pub keyword: String,
    pub language: Option<String>,
    pub country: Option<String>,
    #[serde(default)]
    pub device: Device,
    pub num_results: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub(super) struct CompetitorRequest {
    pub keyword: String,
    pub language: Option<String>,
    pub country: Option<String>,
    pub top_n: Option<u32>,
}

/// POST /api/v1/serp/analyze
pub(super) async fn analyze_serp(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<SerpAnalysisRequest>,
) -> Result<Json<ApiResponse<SerpAnalysis>>, ApiError> {
    let rid = &req_id.0;
    let keyword = check_keyword(rid, "keyword", &body.keyword)?;

    let mut options = SerpOptions::new(
        keyword,
        locale(body.language.as_deref(), body.country.as_deref()),
    );
    options.device = body.device;
    options.num_results = check_range(rid, "num_results", body.num_results.unwrap_or(10), 1..=100)?;

    let analysis = state
        .orchestrator
        .serp_with_insights(&options)
        .await
        .map_err(|e| map_pipeline_error(rid, &e))?;
    Ok(ApiResponse::new(&req_id, analysis))
}

/// POST /api/v1/serp/competitors
pub(super) async fn competitors(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<CompetitorRequest>,
) -> Result<Json<ApiResponse<CompetitorReport>>, ApiError> {
    let rid = &req_id.0;
    let keyword = check_keyword(rid, "keyword", &body.keyword)?;

    let mut options = SerpOptions::new(
        keyword,
        locale(body.language.as_deref(), body.country.as_deref()),
    );
    options.num_results = check_range(rid, "top_n", body.top_n.unwrap_or(10), 1..=20)?;

    let report = state
        .orchestrator
        .competitors(&options)
        .await
        .map_err(|e| map_pipeline_error(rid, &e))?;
    Ok(ApiResponse::new(&req_id, report))
}
