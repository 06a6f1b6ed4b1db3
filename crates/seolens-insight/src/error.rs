use thiserror::Error;

/// Errors from the language model client or from reading its replies.
#[derive(Debug, Error)]
pub enum InsightError {
    /// Network or TLS failure talking to the model endpoint.
    #[error("model request failed: {0}")]
    Transport(String),

    /// The model endpoint answered with a non-2xx status.
    #[error("model endpoint returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The model produced no text (blocked prompt, empty candidate list).
    #[error("model returned no text: {reason}")]
    EmptyReply { reason: String },

    /// The reply was not valid JSON after fence stripping.
    #[error("reply for {task} is not valid JSON: {source}")]
    Parse {
        task: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// The reply parsed, but is not a JSON object.
    #[error("reply for {task} is not a JSON object")]
    NotAnObject { task: &'static str },

    /// An inline image payload was rejected before sending.
    #[error("invalid image: {0}")]
    InvalidImage(String),

    /// The client could not be constructed.
    #[error("invalid model client configuration: {0}")]
    Configuration(String),
}
