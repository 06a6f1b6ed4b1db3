use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::error::InsightError;

/// One piece of a multimodal prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Part {
    Text(String),
    /// Base64-encoded image bytes with their MIME type.
    InlineImage { mime_type: String, data: String },
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Encodes raw image bytes for inline transport.
    #[must_use]
    pub fn image(mime_type: &str, bytes: &[u8]) -> Self {
        Self::InlineImage {
            mime_type: mime_type.to_owned(),
            data: STANDARD.encode(bytes),
        }
    }

    /// Accepts a client-supplied base64 image, optionally as a `data:` URL.
    ///
    /// The payload is decoded and re-encoded so only well-formed image bytes
    /// reach the model.
    ///
    /// # Errors
    ///
    /// Returns [`InsightError::InvalidImage`] for a non-image MIME type, a
    /// payload that is not base64, or an empty payload.
    pub fn inline_base64(mime_type: &str, data: &str) -> Result<Self, InsightError> {
        let mime_type = mime_type.trim().to_ascii_lowercase();
        if !mime_type.starts_with("image/") || mime_type.len() == "image/".len() {
            return Err(InsightError::InvalidImage(format!(
                "unsupported MIME type '{mime_type}'"
            )));
        }
        let data = data.trim();
        let payload = data.split_once("base64,").map_or(data, |(_, rest)| rest);
        let bytes = STANDARD
            .decode(payload)
            .map_err(|e| InsightError::InvalidImage(format!("payload is not base64: {e}")))?;
        if bytes.is_empty() {
            return Err(InsightError::InvalidImage("payload is empty".to_owned()));
        }
        Ok(Self::image(&mime_type, &bytes))
    }
}

/// A text-generation backend.
///
/// Implementations must not block the async executor; every call is a single
/// awaited request.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Short identifier reported in response `data_sources`.
    fn name(&self) -> &str;

    /// Sends `parts` as one user turn and returns the concatenated reply text.
    async fn generate(&self, parts: &[Part]) -> Result<String, InsightError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_part_is_base64_encoded() {
        let part = Part::image("image/png", b"hello");
        assert_eq!(
            part,
            Part::InlineImage {
                mime_type: "image/png".to_owned(),
                data: "aGVsbG8=".to_owned(),
            }
        );
    }

    #[test]
    fn inline_base64_accepts_plain_and_data_url_payloads() {
        let plain = Part::inline_base64("image/PNG", "aGVsbG8=").expect("valid payload");
        let data_url =
            Part::inline_base64("image/png", "data:image/png;base64,aGVsbG8=").expect("data url");
        assert_eq!(plain, Part::image("image/png", b"hello"));
        assert_eq!(data_url, plain);
    }

    #[test]
    fn inline_base64_rejects_bad_payloads() {
        for (mime, data) in [
            ("text/plain", "aGVsbG8="),
            ("image/", "aGVsbG8="),
            ("image/png", "not base64!"),
            ("image/png", ""),
        ] {
            assert!(
                matches!(
                    Part::inline_base64(mime, data),
                    Err(InsightError::InvalidImage(_))
                ),
                "{mime} / {data:?} should be rejected"
            );
        }
    }
}
