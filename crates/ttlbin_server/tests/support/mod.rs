//! Shared integration-test server bootstrap helpers.

use async_trait::async_trait;
use axum_test::TestServer;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use ttlbin_core::db::{Backend, PasteStore, ViewOutcome};
use ttlbin_core::models::paste::{NewPaste, Paste};
use ttlbin_server::{create_app, AppError, AppState, Config, Database, StorageConfig};

pub(crate) const TEST_MAX_PASTE_SIZE: usize = 64 * 1024;

pub(crate) fn test_config_for_db_path(db_path: &Path, test_mode: bool) -> Config {
    Config {
        storage: StorageConfig::Embedded {
            db_path: db_path.to_str().expect("db path").to_string(),
        },
        port: 0,
        max_paste_size: TEST_MAX_PASTE_SIZE,
        test_mode,
    }
}

pub(crate) fn test_server_for(config: Config, db: Database) -> TestServer {
    let state = AppState::new(config, db);
    let app = create_app(state, false);
    TestServer::new(app).expect("server")
}

/// Test server over a fresh embedded store, plus a handle to that store.
pub(crate) fn setup_server(test_mode: bool) -> (TestServer, TempDir, Database) {
    let temp_dir = TempDir::new().expect("temp dir");
    let db_path = temp_dir.path().join("db");
    let config = test_config_for_db_path(&db_path, test_mode);
    let db = Database::embedded(db_path.to_str().expect("db path")).expect("open db");
    let server = test_server_for(config, db.clone());
    (server, temp_dir, db)
}

pub(crate) fn setup_test_server() -> (TestServer, TempDir, Database) {
    setup_server(true)
}

/// Store whose every operation fails as if the backend were unreachable.
pub(crate) struct OfflineStore;

fn offline() -> AppError {
    AppError::StorageUnavailable("connection refused (10.0.0.7:5432)".to_string())
}

#[async_trait]
impl PasteStore for OfflineStore {
    fn backend(&self) -> Backend {
        Backend::Postgres
    }

    async fn create(&self, _paste: NewPaste) -> Result<String, AppError> {
        Err(offline())
    }

    async fn get(&self, _id: &str) -> Result<Option<Paste>, AppError> {
        Err(offline())
    }

    async fn increment_views(&self, _id: &str) -> Result<bool, AppError> {
        Err(offline())
    }

    async fn record_view(&self, _id: &str, _now_ms: i64) -> Result<ViewOutcome, AppError> {
        Err(offline())
    }
}

pub(crate) fn setup_offline_server() -> (TestServer, TempDir) {
    let temp_dir = TempDir::new().expect("temp dir");
    let config = test_config_for_db_path(&temp_dir.path().join("unused"), false);
    let db = Database::from_store(Arc::new(OfflineStore));
    (test_server_for(config, db), temp_dir)
}
