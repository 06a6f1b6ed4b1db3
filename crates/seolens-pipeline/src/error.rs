use seolens_insight::InsightError;
use seolens_providers::ProviderError;
use thiserror::Error;

/// Failure of a mandatory pipeline stage.
///
/// Optional stages never produce these; their failures are logged and the
/// corresponding response section is omitted.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("provider rejected credentials: {0}")]
    Unauthorized(String),

    #[error("provider rate limit reached: {0}")]
    RateLimited(String),

    #[error("provider unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("service construction failed: {0}")]
    Configuration(String),
}

impl From<ProviderError> for PipelineError {
    fn from(err: ProviderError) -> Self {
        let detail = err.to_string();
        match err {
            ProviderError::CredentialsMissing { .. } => Self::Unauthorized(detail),
            ProviderError::RateLimited { .. } => Self::RateLimited(detail),
            ProviderError::RequestFailed { .. } => Self::ServiceUnavailable(detail),
            ProviderError::Configuration { .. } => Self::Configuration(detail),
        }
    }
}

impl From<InsightError> for PipelineError {
    fn from(err: InsightError) -> Self {
        let detail = err.to_string();
        match err {
            InsightError::Status {
                status: 401 | 403, ..
            } => Self::Unauthorized(detail),
            InsightError::Status { status: 429, .. } => Self::RateLimited(detail),
            InsightError::InvalidImage(_) => Self::InvalidInput(detail),
            InsightError::Configuration(_) => Self::Configuration(detail),
            InsightError::Transport(_)
            | InsightError::Status { .. }
            | InsightError::EmptyReply { .. }
            | InsightError::Parse { .. }
            | InsightError::NotAnObject { .. } => Self::ServiceUnavailable(detail),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_errors_map_to_pipeline_kinds() {
        let unauthorized = PipelineError::from(ProviderError::CredentialsMissing { provider: "serpapi" });
        assert!(matches!(unauthorized, PipelineError::Unauthorized(_)));

        let limited = PipelineError::from(ProviderError::RateLimited { provider: "valueserp" });
        assert!(matches!(limited, PipelineError::RateLimited(_)));

        let failed = PipelineError::from(ProviderError::RequestFailed {
            provider: "serpapi",
            detail: "timeout".to_owned(),
            transient: true,
        });
        match failed {
            PipelineError::ServiceUnavailable(detail) => assert!(detail.contains("serpapi")),
            other => panic!("expected ServiceUnavailable, got {other:?}"),
        }
    }

    #[test]
    fn model_errors_map_to_pipeline_kinds() {
        let status = |status| InsightError::Status {
            status,
            body: String::new(),
        };
        assert!(matches!(
            PipelineError::from(status(403)),
            PipelineError::Unauthorized(_)
        ));
        assert!(matches!(
            PipelineError::from(status(429)),
            PipelineError::RateLimited(_)
        ));
        assert!(matches!(
            PipelineError::from(status(500)),
            PipelineError::ServiceUnavailable(_)
        ));
        assert!(matches!(
            PipelineError::from(InsightError::Transport("reset".to_owned())),
            PipelineError::ServiceUnavailable(_)
        ));
        assert!(matches!(
            PipelineError::from(InsightError::InvalidImage("empty".to_owned())),
            PipelineError::InvalidInput(_)
        ));
    }
}
