//! Paste-related data models.

use serde::{Deserialize, Serialize};

/// A stored paste and its view counter.
///
/// Timestamps are milliseconds since the Unix epoch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Paste {
    pub id: String,
    pub content: String,
    pub created_at: i64,
    pub ttl_seconds: Option<i64>,
    pub max_views: Option<i64>,
    pub current_views: i64,
}

/// Validated input for [`crate::db::PasteStore::create`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPaste {
    pub content: String,
    pub ttl_seconds: Option<i64>,
    pub max_views: Option<i64>,
}

/// Request payload for creating a paste.
///
/// Fields are only type-checked here; range and emptiness checks happen in
/// [`crate::service::PasteService::submit`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePasteRequest {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl_seconds: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_views: Option<i64>,
}

/// Response body for `POST /api/pastes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePasteResponse {
    pub id: String,
    /// Shareable HTML page URL.
    pub url: String,
}

/// Response body for `GET /api/pastes/:id`.
///
/// Absent limits serialize as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasteResponse {
    pub content: String,
    pub remaining_views: Option<i64>,
    /// ISO-8601 UTC expiry.
    pub expires_at: Option<String>,
}

impl Paste {
    /// Build a fresh record with a zero view count.
    pub fn new(id: String, new: NewPaste, created_at: i64) -> Self {
        Self {
            id,
            content: new.content,
            created_at,
            ttl_seconds: new.ttl_seconds,
            max_views: new.max_views,
            current_views: 0,
        }
    }

    /// Absolute expiry in epoch milliseconds, if the paste has a TTL.
    pub fn expires_at_ms(&self) -> Option<i64> {
        self.ttl_seconds
            .map(|ttl| self.created_at.saturating_add(ttl.saturating_mul(1000)))
    }

    /// Views left before the quota is exhausted, clamped at zero.
    pub fn remaining_views(&self) -> Option<i64> {
        self.max_views
            .map(|max| max.saturating_sub(self.current_views).max(0))
    }
}
