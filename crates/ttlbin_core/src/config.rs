//! Configuration loading from environment variables.

use crate::constants::{
    DEFAULT_DATABASE_MAX_CONNECTIONS, DEFAULT_MAX_PASTE_SIZE, DEFAULT_PORT, REDB_FILE_NAME,
};
use std::env;
use std::fmt;
use std::path::PathBuf;

/// Which storage backend the process runs against.
///
/// Resolved once at startup; the choice never changes for the lifetime of
/// the process.
#[derive(Clone, PartialEq, Eq)]
pub enum StorageConfig {
    /// Single-file redb store rooted at `db_path`.
    Embedded { db_path: String },
    /// Networked Postgres store.
    Postgres { url: String, max_connections: u32 },
}

impl StorageConfig {
    /// Path of the redb file for the embedded backend.
    ///
    /// # Returns
    /// `Some(path)` for [`StorageConfig::Embedded`], `None` otherwise.
    pub fn redb_file_path(&self) -> Option<PathBuf> {
        match self {
            Self::Embedded { db_path } => Some(PathBuf::from(db_path).join(REDB_FILE_NAME)),
            Self::Postgres { .. } => None,
        }
    }
}

impl fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Embedded { db_path } => f
                .debug_struct("Embedded")
                .field("db_path", db_path)
                .finish(),
            // Connection strings usually carry credentials.
            Self::Postgres {
                max_connections, ..
            } => f
                .debug_struct("Postgres")
                .field("url", &"<redacted>")
                .field("max_connections", max_connections)
                .finish(),
        }
    }
}

/// Runtime configuration for ttlbin.
#[derive(Debug, Clone)]
pub struct Config {
    pub storage: StorageConfig,
    pub port: u16,
    pub max_paste_size: usize,
    /// Honour the `x-test-now-ms` request header when evaluating expiry.
    pub test_mode: bool,
}

/// Expand tilde (~) in paths to the user's home directory
fn expand_tilde(path: String) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = resolve_home_dir() {
            return home.join(rest).to_string_lossy().to_string();
        }
    }
    path
}

fn resolve_home_dir() -> Option<PathBuf> {
    for key in ["HOME", "USERPROFILE"] {
        if let Ok(home) = env::var(key) {
            if !home.trim().is_empty() {
                return Some(PathBuf::from(home));
            }
        }
    }
    env::current_dir().ok()
}

fn default_db_path() -> String {
    let home = resolve_home_dir().unwrap_or_else(|| PathBuf::from("."));
    home.join(".cache")
        .join("ttlbin")
        .join("db")
        .to_string_lossy()
        .to_string()
}

fn non_blank_env(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Parse a boolean-like environment flag value.
///
/// Truthy: `1`, `true`, `yes`, `on`. Falsy: `0`, `false`, `no`, `off`, empty.
/// Matching is case-insensitive and ignores surrounding whitespace.
///
/// # Returns
/// `Some(bool)` when the value is recognized, otherwise `None`.
pub fn parse_env_flag(value: &str) -> Option<bool> {
    let normalized = value.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "" | "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Read a boolean flag from the environment.
///
/// Missing or unrecognized values are treated as `false`.
pub fn env_flag_enabled(name: &str) -> bool {
    env::var(name)
        .ok()
        .and_then(|value| parse_env_flag(&value))
        .unwrap_or(false)
}

impl StorageConfig {
    /// Select the backend from the environment.
    ///
    /// A non-blank `DATABASE_URL` selects Postgres; otherwise the embedded
    /// store at `DB_PATH` (or the per-user cache directory) is used.
    pub fn from_env() -> Self {
        match non_blank_env("DATABASE_URL") {
            Some(url) => Self::Postgres {
                url,
                max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                    .ok()
                    .and_then(|value| value.trim().parse().ok())
                    .filter(|value| *value > 0)
                    .unwrap_or(DEFAULT_DATABASE_MAX_CONNECTIONS),
            },
            None => Self::Embedded {
                db_path: non_blank_env("DB_PATH")
                    .map(expand_tilde)
                    .unwrap_or_else(default_db_path),
            },
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Returns
    /// A populated [`Config`] with defaults applied when env vars are missing.
    pub fn from_env() -> Self {
        Self {
            storage: StorageConfig::from_env(),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            max_paste_size: env::var("MAX_PASTE_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_MAX_PASTE_SIZE),
            test_mode: env_flag_enabled("TEST_MODE"),
        }
    }
}
