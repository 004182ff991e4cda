//! Non-success response classification.

use serde_json::Value;

use crate::error::AdapterError;

/// Turn a non-2xx status and its body into an `ApiError`.
///
/// The message is the backend's `error` text when the body is JSON
/// (`{"error": "..."}` or `{"error": {"message": "..."}}`), otherwise the
/// raw body.
pub fn api_error_from_body(status: u16, body: &str) -> AdapterError {
    let details = serde_json::from_str::<Value>(body).ok();
    let message = details
        .as_ref()
        .and_then(extract_message)
        .unwrap_or_else(|| body.trim().to_string());
    AdapterError::ApiError {
        code: status,
        message,
        details,
    }
}

fn extract_message(value: &Value) -> Option<String> {
    match value.get("error")? {
        Value::String(s) => Some(s.clone()),
        Value::Object(obj) => obj
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    }
}

/// Read the body of a failed response and classify it.
pub async fn classify_response(response: reqwest::Response) -> AdapterError {
    let status = response.status().as_u16();
    match response.text().await {
        Ok(body) => api_error_from_body(status, &body),
        Err(e) => AdapterError::api_error(status, format!("failed to read error body: {e}")),
    }
}
