//! redb table definitions for the embedded backend.

use redb::TableDefinition;

/// Paste rows keyed by id (`Paste`, bincode-encoded).
pub const PASTES: TableDefinition<&str, &[u8]> = TableDefinition::new("pastes");
