//! Paste lifecycle: validated creation and view-counting reads.

use crate::clock::to_iso8601;
use crate::constants::MAX_TTL_SECONDS;
use crate::db::{Database, ViewOutcome};
use crate::error::AppError;
use crate::ids::is_well_formed;
use crate::models::paste::{CreatePasteRequest, NewPaste, PasteResponse};

/// Lookup key for the health probe; never a valid paste id.
const HEALTH_PROBE_ID: &str = "healthz-probe";

/// Rejection message for missing, non-string or blank content.
pub const CONTENT_REQUIRED: &str = "content is required and must be a non-empty string";
pub const TTL_INVALID: &str = "ttl_seconds must be an integer >= 1";
pub const MAX_VIEWS_INVALID: &str = "max_views must be an integer >= 1";

/// What a successful read hands back to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasteView {
    pub content: String,
    /// Views left after this one, `None` when the paste has no quota.
    pub remaining_views: Option<i64>,
    /// Absolute expiry in epoch milliseconds, `None` without a TTL.
    pub expires_at_ms: Option<i64>,
}

impl From<PasteView> for PasteResponse {
    fn from(view: PasteView) -> Self {
        Self {
            content: view.content,
            remaining_views: view.remaining_views,
            expires_at: view.expires_at_ms.and_then(to_iso8601),
        }
    }
}

/// Orchestrates validation and storage for the presentation layer.
#[derive(Clone)]
pub struct PasteService {
    db: Database,
    max_paste_size: usize,
}

impl PasteService {
    pub fn new(db: Database, max_paste_size: usize) -> Self {
        Self { db, max_paste_size }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Check a create request without touching storage.
    ///
    /// Content is kept exactly as submitted; trimming only decides whether
    /// it counts as empty.
    ///
    /// # Errors
    /// Returns [`AppError::InvalidInput`] describing the first bad field.
    pub fn validate(&self, req: CreatePasteRequest) -> Result<NewPaste, AppError> {
        if req.content.trim().is_empty() {
            return Err(AppError::InvalidInput(CONTENT_REQUIRED.to_string()));
        }
        if req.content.len() > self.max_paste_size {
            return Err(AppError::InvalidInput(format!(
                "content exceeds maximum of {} bytes",
                self.max_paste_size
            )));
        }
        if let Some(ttl) = req.ttl_seconds {
            if ttl < 1 {
                return Err(AppError::InvalidInput(TTL_INVALID.to_string()));
            }
            if ttl > MAX_TTL_SECONDS {
                return Err(AppError::InvalidInput(format!(
                    "ttl_seconds must be at most {}",
                    MAX_TTL_SECONDS
                )));
            }
        }
        if matches!(req.max_views, Some(views) if views < 1) {
            return Err(AppError::InvalidInput(MAX_VIEWS_INVALID.to_string()));
        }

        Ok(NewPaste {
            content: req.content,
            ttl_seconds: req.ttl_seconds,
            max_views: req.max_views,
        })
    }

    /// Validate and persist a new paste.
    ///
    /// # Returns
    /// The new paste id.
    ///
    /// # Errors
    /// [`AppError::InvalidInput`] for bad payloads (nothing is stored), or a
    /// storage error.
    pub async fn submit(&self, req: CreatePasteRequest) -> Result<String, AppError> {
        let new = self.validate(req)?;
        let id = self.db.pastes.create(new).await?;
        tracing::debug!(%id, "Paste created");
        Ok(id)
    }

    /// Read a paste and count the view.
    ///
    /// Availability is judged on the record as it was before this read; the
    /// check and the increment are one atomic storage step.
    ///
    /// # Returns
    /// `Ok(None)` when the paste is missing, expired or out of views. The
    /// three cases are deliberately indistinguishable to callers.
    ///
    /// # Errors
    /// Propagates storage failures.
    pub async fn consume(&self, id: &str, now_ms: i64) -> Result<Option<PasteView>, AppError> {
        if !is_well_formed(id) {
            tracing::debug!(id, "Rejecting malformed paste id");
            return Ok(None);
        }

        match self.db.pastes.record_view(id, now_ms).await? {
            ViewOutcome::Recorded(paste) => Ok(Some(PasteView {
                remaining_views: paste.remaining_views(),
                expires_at_ms: paste.expires_at_ms(),
                content: paste.content,
            })),
            ViewOutcome::Missing => {
                tracing::debug!(id, "Paste not found");
                Ok(None)
            }
            ViewOutcome::Unavailable(reason) => {
                tracing::debug!(id, %reason, "Paste no longer available");
                Ok(None)
            }
        }
    }

    /// Perform a trivial storage read.
    ///
    /// # Errors
    /// Returns the storage error when the backend is unreachable.
    pub async fn check_health(&self) -> Result<(), AppError> {
        self.db.pastes.get(HEALTH_PROBE_ID).await.map(|_| ())
    }
}
