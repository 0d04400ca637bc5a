//! `PlayerIdResolver`: maps stored player names to stable identifiers.

use std::collections::HashMap;

use uuid::Uuid;

use crate::types::player::PlayerId;

/// Resolves legacy player names. Implemented by the host over its player
/// registry.
pub trait PlayerIdResolver {
    /// Whether the server runs with stable identifiers. When `false` the
    /// migration does nothing (legacy mode).
    fn supports_stable_ids(&self) -> bool;

    /// Stable identifier for a stored name, `None` if it cannot be resolved.
    /// A name that already is a stable identifier resolves to itself.
    fn resolve(&self, stored_name: &str) -> Option<PlayerId>;
}

/// Resolver over a fixed name table. Name lookup ignores case.
#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
    names: HashMap<String, Uuid>,
    legacy_mode: bool,
}

impl StaticResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// A resolver that reports no stable identifier support.
    pub fn legacy() -> Self {
        Self {
            names: HashMap::new(),
            legacy_mode: true,
        }
    }

    pub fn with_player(mut self, name: &str, id: Uuid) -> Self {
        self.insert(name, id);
        self
    }

    pub fn insert(&mut self, name: &str, id: Uuid) {
        self.names.insert(name.to_lowercase(), id);
    }
}

impl PlayerIdResolver for StaticResolver {
    fn supports_stable_ids(&self) -> bool {
        !self.legacy_mode
    }

    fn resolve(&self, stored_name: &str) -> Option<PlayerId> {
        if let Ok(id) = Uuid::parse_str(stored_name) {
            return Some(PlayerId::from_uuid(id));
        }
        self.names
            .get(&stored_name.to_lowercase())
            .copied()
            .map(PlayerId::from_uuid)
    }
}
