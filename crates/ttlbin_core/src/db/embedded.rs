//! Embedded single-file backend built on redb.
//!
//! redb allows one write transaction at a time, so every read-modify-write
//! below runs inside a single write transaction and cannot lose updates.
//! Transactions block, so each operation is moved to tokio's blocking pool.

use super::tables::PASTES;
use super::{Backend, PasteStore, ViewOutcome, MAX_ID_ATTEMPTS};
use crate::availability::Availability;
use crate::clock::now_millis;
use crate::constants::REDB_FILE_NAME;
use crate::error::AppError;
use crate::ids::generate_id;
use crate::models::paste::{NewPaste, Paste};
use async_trait::async_trait;
use redb::{ReadableDatabase, ReadableTable};
use std::path::Path;
use std::sync::Arc;

/// Accessor for the redb `pastes` table.
pub struct EmbeddedStore {
    db: Arc<redb::Database>,
}

fn deserialize_paste(bytes: &[u8]) -> Result<Paste, AppError> {
    Ok(bincode::deserialize(bytes)?)
}

impl EmbeddedStore {
    /// Create the data directory and redb file if needed, then initialize
    /// the table.
    ///
    /// # Errors
    /// Returns an error when the directory cannot be created, the file is
    /// already open elsewhere, or table initialization fails.
    pub fn open(db_path: &str) -> Result<Self, AppError> {
        let dir = Path::new(db_path);
        std::fs::create_dir_all(dir).map_err(|err| {
            AppError::StorageUnavailable(format!(
                "Failed to create data directory '{}': {}",
                dir.display(),
                err
            ))
        })?;
        let db = redb::Database::create(dir.join(REDB_FILE_NAME))?;
        Self::from_shared(Arc::new(db))
    }

    /// Initialize the paste table on an already open database.
    ///
    /// Safe to call repeatedly; an existing table is left untouched.
    ///
    /// # Errors
    /// Returns an error when redb transaction/table initialization fails.
    pub fn from_shared(db: Arc<redb::Database>) -> Result<Self, AppError> {
        let write_txn = db.begin_write()?;
        write_txn.open_table(PASTES)?;
        write_txn.commit()?;
        Ok(Self { db })
    }

    async fn run_blocking<T, F>(&self, op: F) -> Result<T, AppError>
    where
        T: Send + 'static,
        F: FnOnce(&redb::Database) -> Result<T, AppError> + Send + 'static,
    {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || op(&db)).await?
    }
}

/// Insert `paste` unless its id is taken.
///
/// # Returns
/// `Ok(false)` when the id already exists.
fn insert_if_absent(db: &redb::Database, paste: &Paste) -> Result<bool, AppError> {
    let encoded = bincode::serialize(paste)?;
    let write_txn = db.begin_write()?;
    {
        let mut pastes = write_txn.open_table(PASTES)?;
        if pastes.get(paste.id.as_str())?.is_some() {
            return Ok(false);
        }
        pastes.insert(paste.id.as_str(), encoded.as_slice())?;
    }
    write_txn.commit()?;
    Ok(true)
}

fn read_paste(db: &redb::Database, id: &str) -> Result<Option<Paste>, AppError> {
    let read_txn = db.begin_read()?;
    let pastes = read_txn.open_table(PASTES)?;
    match pastes.get(id)? {
        Some(value) => Ok(Some(deserialize_paste(value.value())?)),
        None => Ok(None),
    }
}

/// Load, optionally gate, and bump the view counter in one write transaction.
fn bump_views(
    db: &redb::Database,
    id: &str,
    now_ms: Option<i64>,
) -> Result<ViewOutcome, AppError> {
    let write_txn = db.begin_write()?;
    let outcome = {
        let mut pastes = write_txn.open_table(PASTES)?;
        let mut paste = match pastes.get(id)? {
            Some(value) => deserialize_paste(value.value())?,
            None => return Ok(ViewOutcome::Missing),
        };

        if let Some(now_ms) = now_ms {
            if let Availability::Unavailable(reason) = paste.availability(now_ms) {
                return Ok(ViewOutcome::Unavailable(reason));
            }
        }

        paste.current_views = paste.current_views.saturating_add(1);
        let encoded = bincode::serialize(&paste)?;
        pastes.insert(id, encoded.as_slice())?;
        ViewOutcome::Recorded(paste)
    };
    write_txn.commit()?;
    Ok(outcome)
}

#[async_trait]
impl PasteStore for EmbeddedStore {
    fn backend(&self) -> Backend {
        Backend::Embedded
    }

    async fn create(&self, new: NewPaste) -> Result<String, AppError> {
        self.run_blocking(move |db| {
            let created_at = now_millis();
            for _ in 0..MAX_ID_ATTEMPTS {
                let paste = Paste::new(generate_id(), new.clone(), created_at);
                if insert_if_absent(db, &paste)? {
                    return Ok(paste.id);
                }
                tracing::warn!(id = %paste.id, "Paste id collision; regenerating");
            }
            tracing::error!("Failed to generate an unused paste id");
            Err(AppError::Internal)
        })
        .await
    }

    async fn get(&self, id: &str) -> Result<Option<Paste>, AppError> {
        let id = id.to_string();
        self.run_blocking(move |db| read_paste(db, &id)).await
    }

    async fn increment_views(&self, id: &str) -> Result<bool, AppError> {
        let id = id.to_string();
        let outcome = self.run_blocking(move |db| bump_views(db, &id, None)).await?;
        Ok(matches!(outcome, ViewOutcome::Recorded(_)))
    }

    async fn record_view(&self, id: &str, now_ms: i64) -> Result<ViewOutcome, AppError> {
        let id = id.to_string();
        self.run_blocking(move |db| bump_views(db, &id, Some(now_ms)))
            .await
    }
}
