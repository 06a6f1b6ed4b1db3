use serde_json::{Map, Value};

use crate::error::InsightError;

/// Removes a surrounding Markdown code fence (```` ```json ```` or ```` ``` ````).
#[must_use]
pub fn strip_fences(reply: &str) -> &str {
    let trimmed = reply.trim();
    let body = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```JSON"))
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    body.strip_suffix("```").unwrap_or(body).trim()
}

/// Parses a model reply as a strict JSON object.
///
/// # Errors
///
/// - [`InsightError::Parse`] if the fence-stripped text is not JSON.
/// - [`InsightError::NotAnObject`] if it is JSON but not an object.
pub fn parse_object(task: &'static str, reply: &str) -> Result<Map<String, Value>, InsightError> {
    match serde_json::from_str::<Value>(strip_fences(reply)) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(InsightError::NotAnObject { task }),
        Err(source) => Err(InsightError::Parse { task, source }),
    }
}
