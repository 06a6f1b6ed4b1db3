use axum::{extract::State, Extension, Json};
use serde::Deserialize;
use seolens_insight::Part;
use seolens_pipeline::{check_similarity, GeneratedContent, SimilarityReport};

use crate::middleware::RequestId;

use super::{map_pipeline_error, ApiError, ApiResponse, AppState};

/// Base64 inflates images by a third; this leaves room for several photos.
pub(super) const GENERATE_BODY_LIMIT: usize = 20 * 1024 * 1024;

const MAX_IMAGES: usize = 10;
const MAX_PROMPT_CHARS: usize = 2_000;

#[derive(Debug, Deserialize)]
pub(super) struct SimilarityRequest {
    pub text: String,
    #[serde(default)]
    pub references: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ImagePayload {
    pub mime_type: String,
    /// Base64 bytes, bare or as a `data:` URL.
    pub data: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct GenerateContentRequest {
    pub prompt: String,
    #[serde(default)]
    pub images: Vec<ImagePayload>,
}

/// POST /api/v1/content/similarity
pub(super) async fn similarity(
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<SimilarityRequest>,
) -> Result<Json<ApiResponse<SimilarityReport>>, ApiError> {
    if body.text.trim().is_empty() {
        return Err(ApiError::validation(&req_id.0, "text must not be empty"));
    }
    let report = check_similarity(&body.text, &body.references);
    Ok(ApiResponse::new(&req_id, report))
}

/// POST /api/v1/content/generate
pub(super) async fn generate(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<GenerateContentRequest>,
) -> Result<Json<ApiResponse<GeneratedContent>>, ApiError> {
    let prompt_chars = body.prompt.trim().chars().count();
    if prompt_chars == 0 || prompt_chars > MAX_PROMPT_CHARS {
        return Err(ApiError::validation(
            &req_id.0,
            format!("prompt must be 1–{MAX_PROMPT_CHARS} characters"),
        ));
    }
    if body.images.is_empty() || body.images.len() > MAX_IMAGES {
        return Err(ApiError::validation(
            &req_id.0,
            format!("images must contain 1–{MAX_IMAGES} entries"),
        ));
    }

    let images = body
        .images
        .iter()
        .enumerate()
        .map(|(idx, image)| {
            Part::inline_base64(&image.mime_type, &image.data)
                .map_err(|e| ApiError::validation(&req_id.0, format!("images[{idx}]: {e}")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let generated = state
        .orchestrator
        .generate_content(&body.prompt, images)
        .await
        .map_err(|e| map_pipeline_error(&req_id.0, &e))?;
    Ok(ApiResponse::new(&req_id, generated))
}
