//! Player identifiers and metadata rows.

use std::fmt;

use uuid::Uuid;

/// The identifier a metadata row is keyed by. Historically a player name,
/// after migration the hyphenated UUID string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn from_uuid(id: Uuid) -> Self {
        Self(id.hyphenated().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this identifier is already in stable (UUID) form.
    pub fn is_stable(&self) -> bool {
        Uuid::parse_str(&self.0).is_ok()
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Uuid> for PlayerId {
    fn from(id: Uuid) -> Self {
        Self::from_uuid(id)
    }
}

/// One `PlayerMeta` row as read during migration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaEntry {
    pub player_name: String,
    pub meta_key: String,
    pub meta_value: String,
}

/// A row that needs rewriting from a legacy name to a stable identifier.
/// Computed in memory, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyConversion {
    pub old_name: String,
    pub new_id: PlayerId,
    pub meta_key: String,
    pub meta_value: String,
}
