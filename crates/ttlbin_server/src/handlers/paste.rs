//! Paste HTTP handlers.

use super::normalize::parse_create_request;
use super::request_now;
use crate::{error::HttpError, request_body_limit, AppState};
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, Path, State},
    http::{header, HeaderMap, StatusCode},
    Json,
};
use ttlbin_core::{AppError, CreatePasteResponse, PasteResponse};

const FORWARDED_PROTO: &str = "x-forwarded-proto";

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// Build the shareable page URL for `id` from the request's proxy headers.
fn share_url(headers: &HeaderMap, port: u16, id: &str) -> String {
    // Proxies may append their own scheme; the first entry is the client's.
    let proto = header_str(headers, FORWARDED_PROTO)
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or("http");
    let host = header_str(headers, header::HOST.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| format!("localhost:{}", port));

    format!("{}://{}/p/{}", proto, host, id)
}

fn body_rejection(rejection: BytesRejection, body_limit: usize) -> AppError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::InvalidInput(format!(
            "request body exceeds maximum of {} bytes",
            body_limit
        ))
    } else {
        tracing::debug!("Failed to read request body: {}", rejection);
        AppError::MalformedRequestBody(super::normalize::INVALID_JSON.to_string())
    }
}

/// Create a new paste.
///
/// # Returns
/// `201` with the new id and its share URL.
///
/// # Errors
/// `400` for malformed or invalid payloads, `500` for storage faults.
pub async fn create_paste(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<(StatusCode, Json<CreatePasteResponse>), HttpError> {
    let body = body.map_err(|rejection| {
        body_rejection(rejection, request_body_limit(state.config.max_paste_size))
    })?;
    let req = parse_create_request(&body)?;
    let id = state.service.submit(req).await?;
    let url = share_url(&headers, state.config.port, &id);

    Ok((StatusCode::CREATED, Json(CreatePasteResponse { id, url })))
}

/// Fetch a paste by id, counting the view.
///
/// # Returns
/// The content plus the remaining quota and expiry, `null` when unlimited.
///
/// # Errors
/// `404` when the paste is missing, expired or out of views (all three look
/// the same), `500` for storage faults.
pub async fn get_paste(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<PasteResponse>, HttpError> {
    let now = request_now(&state, &headers);
    let view = state
        .service
        .consume(&id, now)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(view.into()))
}
