//! Decides whether a stored paste may still be served.

use crate::models::paste::Paste;
use std::fmt;

/// Why a paste can no longer be served.
///
/// Only used for diagnostics; callers see a plain not-found outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnavailableReason {
    Expired,
    ViewLimitExceeded,
}

impl UnavailableReason {
    /// Stable snake_case label used in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Expired => "expired",
            Self::ViewLimitExceeded => "view_limit_exceeded",
        }
    }
}

impl fmt::Display for UnavailableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of evaluating a paste against a reference time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Available,
    Unavailable(UnavailableReason),
}

impl Availability {
    pub fn is_available(self) -> bool {
        matches!(self, Self::Available)
    }

    pub fn reason(self) -> Option<UnavailableReason> {
        match self {
            Self::Available => None,
            Self::Unavailable(reason) => Some(reason),
        }
    }
}

/// Evaluate `paste` at `now_ms` (epoch milliseconds).
///
/// The view quota is checked before the TTL, so a paste that is both
/// exhausted and expired reports [`UnavailableReason::ViewLimitExceeded`].
/// Expiry is inclusive: at exactly `created_at + ttl_seconds * 1000` the
/// paste is already gone.
pub fn evaluate(paste: &Paste, now_ms: i64) -> Availability {
    if let Some(max_views) = paste.max_views {
        if paste.current_views >= max_views {
            return Availability::Unavailable(UnavailableReason::ViewLimitExceeded);
        }
    }

    if let Some(expires_at) = paste.expires_at_ms() {
        if now_ms >= expires_at {
            return Availability::Unavailable(UnavailableReason::Expired);
        }
    }

    Availability::Available
}

impl Paste {
    /// Shorthand for [`evaluate`].
    pub fn availability(&self, now_ms: i64) -> Availability {
        evaluate(self, now_ms)
    }
}
