//! Core domain library for ttlbin (config, storage, availability, service).

/// Availability policy for stored pastes.
pub mod availability;
/// Wall-clock helpers and the test-mode clock override.
pub mod clock;
/// Configuration loading and defaults.
pub mod config;
/// Shared constants.
pub mod constants;
/// Storage adapter trait and its backends.
pub mod db;
/// Test-only environment mutation helpers.
pub mod env;
/// Application error types (storage/domain).
pub mod error;
/// Paste identifier generation.
pub mod ids;
/// Data models for API requests and persistence.
pub mod models;
/// Paste lifecycle orchestration.
pub mod service;

pub use availability::{Availability, UnavailableReason};
pub use config::{Config, StorageConfig};
pub use constants::{DEFAULT_CLI_SERVER_URL, DEFAULT_PORT};
pub use db::{Backend, Database, PasteStore, ViewOutcome};
pub use error::AppError;
pub use models::paste::{CreatePasteRequest, CreatePasteResponse, PasteResponse};
pub use service::{PasteService, PasteView};
