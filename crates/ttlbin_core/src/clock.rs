//! Wall-clock access for availability checks.

use chrono::{DateTime, SecondsFormat, Utc};

/// Current wall-clock time in epoch milliseconds.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Resolve the reference "now" for a request.
///
/// With `test_mode` enabled, a parseable integer override (the
/// `x-test-now-ms` header value) replaces the wall clock. Anything else falls
/// back to [`now_millis`]. The whole trimmed value must be an integer, so
/// `"1700000000000abc"` is ignored rather than read as its leading digits.
pub fn resolve_now(test_mode: bool, override_ms: Option<&str>) -> i64 {
    if test_mode {
        if let Some(parsed) = override_ms.and_then(|raw| raw.trim().parse::<i64>().ok()) {
            return parsed;
        }
    }
    now_millis()
}

/// Render epoch milliseconds as an ISO-8601 UTC timestamp with millisecond
/// precision (`2024-01-01T00:00:00.000Z`).
pub fn to_iso8601(millis: i64) -> Option<String> {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|ts| ts.to_rfc3339_opts(SecondsFormat::Millis, true))
}
