use thiserror::Error;

/// Errors returned by a single provider adapter call.
///
/// Every `reqwest` failure is folded into one of these variants at the adapter
/// boundary so fallback chains can decide whether to retry, fall through, or
/// surface the failure.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Credentials are absent, or the provider rejected them (HTTP 401/403).
    #[error("{provider}: credentials missing or rejected")]
    CredentialsMissing { provider: &'static str },

    /// The provider answered HTTP 429.
    #[error("{provider}: rate limit exceeded")]
    RateLimited { provider: &'static str },

    /// Network failure, unexpected status, or a body that is not JSON.
    ///
    /// `transient` is set for 5xx responses, timeouts and connect failures.
    #[error("{provider}: request failed: {detail}")]
    RequestFailed {
        provider: &'static str,
        detail: String,
        transient: bool,
    },

    /// The adapter could not be constructed (bad base URL, TLS backend failure).
    #[error("{provider}: invalid client configuration: {detail}")]
    Configuration {
        provider: &'static str,
        detail: String,
    },
}

impl ProviderError {
    #[must_use]
    pub fn provider(&self) -> &'static str {
        match self {
            Self::CredentialsMissing { provider }
            | Self::RateLimited { provider }
            | Self::RequestFailed { provider, .. }
            | Self::Configuration { provider, .. } => provider,
        }
    }

    pub(crate) fn from_reqwest(provider: &'static str, err: &reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return Self::from_status(provider, status, err.to_string());
        }
        Self::RequestFailed {
            provider,
            detail: err.to_string(),
            transient: err.is_timeout() || err.is_connect() || err.is_request(),
        }
    }

    pub(crate) fn from_status(
        provider: &'static str,
        status: reqwest::StatusCode,
        detail: String,
    ) -> Self {
        match status.as_u16() {
            401 | 403 => Self::CredentialsMissing { provider },
            429 => Self::RateLimited { provider },
            _ => Self::RequestFailed {
                provider,
                detail: format!("HTTP {status}: {detail}"),
                transient: status.is_server_error(),
            },
        }
    }
}
