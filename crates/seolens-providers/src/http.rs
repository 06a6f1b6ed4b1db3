//! Shared HTTP plumbing for provider adapters.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Url};
use seolens_core::ProviderSettings;

use crate::error::ProviderError;

/// Transport settings every adapter is built with.
#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub timeout_secs: u64,
    pub user_agent: String,
    pub max_retries: u32,
    pub retry_backoff_ms: u64,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self::from(&ProviderSettings::default())
    }
}

impl From<&ProviderSettings> for HttpSettings {
    fn from(settings: &ProviderSettings) -> Self {
        Self {
            timeout_secs: settings.http_timeout_secs,
            user_agent: settings.user_agent.clone(),
            max_retries: settings.max_retries,
            retry_backoff_ms: settings.retry_backoff_ms,
        }
    }
}

/// Builds the connection-pooled client owned by one adapter.
pub(crate) fn build_client(
    provider: &'static str,
    settings: &HttpSettings,
) -> Result<Client, ProviderError> {
    Client::builder()
        .timeout(Duration::from_secs(settings.timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .user_agent(settings.user_agent.as_str())
        .build()
        .map_err(|e| ProviderError::Configuration {
            provider,
            detail: e.to_string(),
        })
}

/// Resolves `path` against `base_url`.
///
/// The base is normalised to end with exactly one slash so that `path` is
/// appended rather than replacing the last segment.
pub(crate) fn endpoint(
    provider: &'static str,
    base_url: &str,
    path: &str,
) -> Result<Url, ProviderError> {
    let normalised = format!("{}/", base_url.trim_end_matches('/'));
    Url::parse(&normalised)
        .and_then(|base| base.join(path))
        .map_err(|e| ProviderError::Configuration {
            provider,
            detail: format!("invalid base URL '{base_url}': {e}"),
        })
}

/// Sends `request`, maps the status, and parses the body as JSON.
///
/// # Errors
///
/// - [`ProviderError::CredentialsMissing`] on 401/403.
/// - [`ProviderError::RateLimited`] on 429.
/// - [`ProviderError::RequestFailed`] on any other non-2xx status, network
///   failure, or a body that is not valid JSON.
pub(crate) async fn send_json(
    provider: &'static str,
    request: RequestBuilder,
) -> Result<serde_json::Value, ProviderError> {
    let response = request
        .send()
        .await
        .map_err(|e| ProviderError::from_reqwest(provider, &e))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let detail: String = body.chars().take(200).collect();
        return Err(ProviderError::from_status(provider, status, detail));
    }

    let body = response
        .text()
        .await
        .map_err(|e| ProviderError::from_reqwest(provider, &e))?;
    serde_json::from_str(&body).map_err(|e| ProviderError::RequestFailed {
        provider,
        detail: format!("response body is not JSON: {e}"),
        transient: false,
    })
}

/// Reads a non-negative integer that may be encoded as a JSON number or string.
///
/// Google APIs serialise int64 fields as strings.
pub(crate) fn json_u64(value: &serde_json::Value) -> Option<u64> {
    match value {
        serde_json::Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0)
                .map(|f| {
                    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                    let v = f as u64;
                    v
                })
        }),
        serde_json::Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }
}

/// Reads a float that may be encoded as a JSON number or string.
pub(crate) fn json_f64(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|f| f.is_finite())
}
