//! Storage adapter contract and the backends that implement it.

/// Embedded single-file backend (redb).
pub mod embedded;
/// Networked backend (Postgres).
pub mod postgres;
/// redb table definitions.
pub mod tables;

pub use embedded::EmbeddedStore;
pub use postgres::PostgresStore;

use crate::availability::UnavailableReason;
use crate::config::StorageConfig;
use crate::error::AppError;
use crate::models::paste::{NewPaste, Paste};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

/// How many fresh identifiers `create` tries before giving up.
pub(crate) const MAX_ID_ATTEMPTS: usize = 8;

/// Concrete storage implementation behind a [`Database`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Embedded,
    Postgres,
}

impl Backend {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Embedded => "embedded",
            Self::Postgres => "postgres",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of an attempt to record a view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewOutcome {
    /// The view was counted; carries the record after the increment.
    Recorded(Paste),
    /// No paste has this identifier.
    Missing,
    /// The paste exists but may no longer be served; nothing was changed.
    Unavailable(UnavailableReason),
}

/// Persistence contract shared by every backend.
///
/// All implementations must behave identically; the HTTP layer never knows
/// which one it is talking to.
#[async_trait]
pub trait PasteStore: Send + Sync {
    /// Which backend this is.
    fn backend(&self) -> Backend;

    /// Persist a new paste with `current_views = 0` and `created_at` set to
    /// the current wall-clock time.
    ///
    /// # Returns
    /// The freshly generated identifier.
    ///
    /// # Errors
    /// Returns an error when the backend cannot be reached or no unused
    /// identifier was found.
    async fn create(&self, paste: NewPaste) -> Result<String, AppError>;

    /// Fetch the current record.
    ///
    /// # Returns
    /// `Ok(None)` when the identifier is unknown.
    async fn get(&self, id: &str) -> Result<Option<Paste>, AppError>;

    /// Atomically add one to `current_views`.
    ///
    /// # Returns
    /// `Ok(false)` (and no write) when the identifier is unknown.
    async fn increment_views(&self, id: &str) -> Result<bool, AppError>;

    /// Count a view only if the paste is servable at `now_ms`.
    ///
    /// The availability check and the increment happen as one atomic step,
    /// so concurrent readers can never push `current_views` past
    /// `max_views`.
    async fn record_view(&self, id: &str, now_ms: i64) -> Result<ViewOutcome, AppError>;
}

/// Storage handle selected once at startup and shared across requests.
#[derive(Clone)]
pub struct Database {
    pub pastes: Arc<dyn PasteStore>,
}

impl Database {
    /// Open and initialize the backend described by `config`.
    ///
    /// This is the single initialization step: the redb file and table, or
    /// the Postgres schema, are created here if they do not exist yet.
    ///
    /// # Errors
    /// Returns an error when the backend cannot be opened or initialized.
    pub async fn open(config: &StorageConfig) -> Result<Self, AppError> {
        let pastes: Arc<dyn PasteStore> = match config {
            StorageConfig::Embedded { db_path } => Arc::new(EmbeddedStore::open(db_path)?),
            StorageConfig::Postgres {
                url,
                max_connections,
            } => Arc::new(PostgresStore::connect(url, *max_connections).await?),
        };
        tracing::info!(backend = %pastes.backend(), "Storage initialized");
        Ok(Self { pastes })
    }

    /// Wrap an already constructed store.
    pub fn from_store(pastes: Arc<dyn PasteStore>) -> Self {
        Self { pastes }
    }

    /// Open the embedded backend at `db_path`.
    ///
    /// # Errors
    /// Returns an error if the redb file cannot be created or opened.
    pub fn embedded(db_path: &str) -> Result<Self, AppError> {
        Ok(Self::from_store(Arc::new(EmbeddedStore::open(db_path)?)))
    }

    pub fn backend(&self) -> Backend {
        self.pastes.backend()
    }
}
