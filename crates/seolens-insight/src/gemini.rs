//! Gemini `generateContent` client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use seolens_core::GeminiSettings;

use crate::error::InsightError;
use crate::model::{LanguageModel, Part};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/";
const API_VERSION: &str = "v1beta";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<WirePart<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum WirePart<'a> {
    Text { text: &'a str },
    Inline { inline_data: InlineData<'a> },
}

#[derive(Debug, Serialize)]
struct InlineData<'a> {
    mime_type: &'a str,
    data: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

/// [`LanguageModel`] backed by the Gemini REST API.
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    temperature: f32,
    url: Url,
}

impl GeminiClient {
    /// # Errors
    ///
    /// Returns [`InsightError::Configuration`] if the HTTP client cannot be built.
    pub fn new(settings: &GeminiSettings, timeout_secs: u64) -> Result<Self, InsightError> {
        Self::with_base_url(settings, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`InsightError::Configuration`] if the HTTP client cannot be
    /// built or `base_url` is not a valid URL.
    pub fn with_base_url(
        settings: &GeminiSettings,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, InsightError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| InsightError::Configuration(e.to_string()))?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let path = format!("{API_VERSION}/models/{}:generateContent", settings.model);
        let url = Url::parse(&normalised)
            .and_then(|base| base.join(&path))
            .map_err(|e| InsightError::Configuration(format!("invalid base URL '{base_url}': {e}")))?;

        Ok(Self {
            client,
            api_key: settings.api_key.clone(),
            model: settings.model.clone(),
            temperature: settings.temperature,
            url,
        })
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl LanguageModel for GeminiClient {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, parts: &[Part]) -> Result<String, InsightError> {
        let wire_parts = parts
            .iter()
            .map(|part| match part {
                Part::Text(text) => WirePart::Text { text },
                Part::InlineImage { mime_type, data } => WirePart::Inline {
                    inline_data: InlineData { mime_type, data },
                },
            })
            .collect();
        let request = GenerateRequest {
            contents: [Content {
                role: "user",
                parts: wire_parts,
            }],
            generation_config: GenerationConfig {
                temperature: self.temperature,
            },
        };

        tracing::debug!(model = %self.model, parts = parts.len(), "gemini generateContent");

        let response = self
            .client
            .post(self.url.clone())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| InsightError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(InsightError::Status {
                status: status.as_u16(),
                body: body.chars().take(300).collect(),
            });
        }

        let reply: GenerateResponse = response
            .json()
            .await
            .map_err(|e| InsightError::Transport(e.to_string()))?;
        extract_text(reply)
    }
}

fn extract_text(reply: GenerateResponse) -> Result<String, InsightError> {
    if let Some(reason) = reply.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(InsightError::EmptyReply {
            reason: format!("prompt blocked: {reason}"),
        });
    }
    let Some(candidate) = reply.candidates.into_iter().next() else {
        return Err(InsightError::EmptyReply {
            reason: "no candidates".to_owned(),
        });
    };
    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();
    if text.trim().is_empty() {
        return Err(InsightError::EmptyReply {
            reason: candidate
                .finish_reason
                .unwrap_or_else(|| "empty content".to_owned()),
        });
    }
    Ok(text)
}
