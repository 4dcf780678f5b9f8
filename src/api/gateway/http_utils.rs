//! Shared HTTP utilities for gateway implementations.

use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::api::error::ReviewError;

use super::error_mapping::{map_http_error, map_transport_error};

const MAX_ERROR_BODY_CHARS: usize = 160;

/// Sends a request and converts non-success statuses into errors.
pub(super) async fn send(
    operation: &str,
    request: RequestBuilder,
) -> Result<Response, ReviewError> {
    let response = request
        .send()
        .await
        .map_err(|error| map_transport_error(operation, &error))?;

    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    tracing::debug!("{operation} returned {status}");
    Err(map_http_error(operation, status, error_message(&body)))
}

/// Decodes a JSON response body.
pub(super) async fn decode<T: DeserializeOwned>(
    operation: &str,
    response: Response,
) -> Result<T, ReviewError> {
    response
        .json::<T>()
        .await
        .map_err(|error| map_transport_error(operation, &error))
}

/// Extracts a human-readable message from an error body.
///
/// Prefers the JSON `message` field, then `error`, and falls back to the
/// truncated raw body.
pub(super) fn error_message(body: &str) -> Option<String> {
    if let Ok(value) = serde_json::from_str::<Value>(body)
        && let Some(text) = message_field(&value)
    {
        return Some(text.to_owned());
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(truncate_for_message(trimmed, MAX_ERROR_BODY_CHARS))
    }
}

/// Image hosts nest the message under an `error` object.
fn message_field(value: &Value) -> Option<&str> {
    ["message", "error"]
        .into_iter()
        .find_map(|key| match value.get(key)? {
            Value::String(text) if !text.trim().is_empty() => Some(text.as_str()),
            nested @ Value::Object(_) => message_field(nested),
            _ => None,
        })
}

fn truncate_for_message(message: &str, max_chars: usize) -> String {
    let mut output = String::new();
    let mut chars = message.chars();

    for _ in 0..max_chars {
        let Some(character) = chars.next() else {
            return output;
        };
        output.push(character);
    }

    if chars.next().is_some() {
        output.push_str("...");
    }

    output
}
