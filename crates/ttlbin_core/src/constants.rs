//! Shared constants used across ttlbin crates.

/// Default HTTP port for the ttlbin server.
pub const DEFAULT_PORT: u16 = 38421;

/// Default maximum paste size accepted by the API layer.
pub const DEFAULT_MAX_PASTE_SIZE: usize = 10 * 1024 * 1024;

/// Default connection pool size for the Postgres backend.
pub const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 5;

/// Default base URL for CLI/API clients.
pub const DEFAULT_CLI_SERVER_URL: &str = "http://localhost:38421";

/// Length of generated paste identifiers.
pub const PASTE_ID_LEN: usize = 21;

/// Upper bound for `ttl_seconds` (100 years).
///
/// Keeps `created_at + ttl_seconds * 1000` inside the range chrono can
/// render as an ISO-8601 timestamp.
pub const MAX_TTL_SECONDS: i64 = 100 * 365 * 24 * 60 * 60;

/// Request header carrying the test-mode "now" override in milliseconds.
pub const TEST_NOW_HEADER: &str = "x-test-now-ms";

/// File name for the redb database within the configured DB directory.
pub const REDB_FILE_NAME: &str = "pastes.redb";
