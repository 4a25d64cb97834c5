//! Domain and API models.

/// Paste models and request payloads.
pub mod paste;
