//! Entity handles and id allocation.
//!
//! Ids are minted by the foreign component store and never handed out twice
//! within a process, so an id still held by an auxiliary store cannot come
//! back as somebody else's entity.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A handle to a row in the world.
///
/// Carries no data; whatever components any tier holds under its id give it
/// meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Entity(pub u64);

impl Entity {
    /// Never minted. Used as the zero value of entity-typed attributes.
    pub const INVALID: Entity = Entity(0);

    /// Rebuild a handle from a bare id.
    #[must_use]
    pub const fn from_raw(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }

    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 != Self::INVALID.0
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

impl From<Entity> for u64 {
    fn from(entity: Entity) -> Self {
        entity.0
    }
}

/// Mints entity ids for a store. Ids start at 1 and only go up.
#[derive(Debug, Default)]
pub struct EntityAllocator {
    issued: u64,
}

impl EntityAllocator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self) -> Entity {
        self.issued += 1;
        Entity(self.issued)
    }

    /// How many ids have been minted.
    #[must_use]
    pub fn issued(&self) -> u64 {
        self.issued
    }

    /// `true` if `entity` came from this allocator, live or not.
    #[must_use]
    pub fn was_issued(&self, entity: Entity) -> bool {
        entity.is_valid() && entity.id() <= self.issued
    }
}
