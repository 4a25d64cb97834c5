//! Decoding of loosely typed create payloads.
//!
//! Bodies are parsed as free-form JSON first so that each bad field gets its
//! own message instead of a generic deserialization error.

use serde_json::{Map, Value};
use ttlbin_core::service::{CONTENT_REQUIRED, MAX_VIEWS_INVALID, TTL_INVALID};
use ttlbin_core::{AppError, CreatePasteRequest};

pub(super) const INVALID_JSON: &str = "Invalid JSON in request body";

/// Decode a `POST /api/pastes` body.
///
/// Only shapes are checked here; ranges and emptiness are left to
/// [`ttlbin_core::PasteService::submit`].
///
/// # Errors
/// [`AppError::MalformedRequestBody`] when the body is not JSON, otherwise
/// [`AppError::InvalidInput`] naming the offending field.
pub(super) fn parse_create_request(body: &[u8]) -> Result<CreatePasteRequest, AppError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|_| AppError::MalformedRequestBody(INVALID_JSON.to_string()))?;
    let Value::Object(fields) = value else {
        return Err(AppError::InvalidInput(CONTENT_REQUIRED.to_string()));
    };

    let content = match fields.get("content") {
        Some(Value::String(content)) => content.clone(),
        _ => return Err(AppError::InvalidInput(CONTENT_REQUIRED.to_string())),
    };

    Ok(CreatePasteRequest {
        content,
        ttl_seconds: optional_integer(&fields, "ttl_seconds", TTL_INVALID)?,
        max_views: optional_integer(&fields, "max_views", MAX_VIEWS_INVALID)?,
    })
}

/// Read an optional integer field; `null` counts as absent.
///
/// Whole-valued floats such as `60.0` are accepted since JSON does not
/// distinguish them from integers.
fn optional_integer(
    fields: &Map<String, Value>,
    key: &str,
    message: &str,
) -> Result<Option<i64>, AppError> {
    let number = match fields.get(key) {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(number)) => number,
        Some(_) => return Err(AppError::InvalidInput(message.to_string())),
    };

    if let Some(value) = number.as_i64() {
        return Ok(Some(value));
    }
    match number.as_f64() {
        Some(value)
            if value.fract() == 0.0 && value >= i64::MIN as f64 && value < i64::MAX as f64 =>
        {
            Ok(Some(value as i64))
        }
        _ => Err(AppError::InvalidInput(message.to_string())),
    }
}
