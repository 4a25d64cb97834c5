//! HTTP request handlers.

/// Storage health probe.
pub mod health;
pub(crate) mod normalize;
/// Paste-related JSON endpoints.
pub mod paste;

use crate::AppState;
use axum::http::HeaderMap;
use ttlbin_core::{clock, constants::TEST_NOW_HEADER};

/// Reference time for availability checks on this request.
///
/// Honours the `x-test-now-ms` header only when the server runs in test mode.
pub(crate) fn request_now(state: &AppState, headers: &HeaderMap) -> i64 {
    let override_ms = headers
        .get(TEST_NOW_HEADER)
        .and_then(|value| value.to_str().ok());
    clock::resolve_now(state.config.test_mode, override_ms)
}
