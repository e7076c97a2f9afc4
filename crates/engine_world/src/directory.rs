//! The entity directory.
//!
//! Tracks which entities hold auxiliary-tier data so a handle can be rebuilt
//! from a bare id, and keeps the per-tick despawn log. Only the world writes
//! to it.

use std::collections::BTreeSet;

use engine_component::Entity;

#[derive(Debug, Default)]
pub struct EntityDirectory {
    known: BTreeSet<u64>,
    despawned: Vec<Entity>,
}

impl EntityDirectory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the entity was not already registered.
    pub fn register(&mut self, entity: Entity) -> bool {
        self.known.insert(entity.id())
    }

    /// Returns `true` if the entity was registered.
    pub fn unregister(&mut self, entity: Entity) -> bool {
        self.known.remove(&entity.id())
    }

    #[must_use]
    pub fn contains(&self, id: u64) -> bool {
        self.known.contains(&id)
    }

    /// Rebuild the handle for a registered id.
    #[must_use]
    pub fn entity(&self, id: u64) -> Option<Entity> {
        self.contains(id).then(|| Entity::from_raw(id))
    }

    /// Registered ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.known.iter().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.known.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.known.is_empty()
    }

    pub fn record_despawn(&mut self, entity: Entity) {
        self.despawned.push(entity);
    }

    /// Entities despawned since the log was last drained.
    #[must_use]
    pub fn despawned(&self) -> &[Entity] {
        &self.despawned
    }

    /// Take the despawn log, leaving it empty.
    pub fn drain_despawned(&mut self) -> Vec<Entity> {
        std::mem::take(&mut self.despawned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_rebuild_handle() {
        let mut dir = EntityDirectory::new();
        assert!(dir.register(Entity(4)));
        assert!(!dir.register(Entity(4)));
        assert_eq!(dir.entity(4), Some(Entity(4)));
        assert_eq!(dir.entity(5), None);

        assert!(dir.unregister(Entity(4)));
        assert!(!dir.contains(4));
        assert!(dir.is_empty());
    }

    #[test]
    fn test_drain_despawned_clears_log() {
        let mut dir = EntityDirectory::new();
        dir.record_despawn(Entity(1));
        dir.record_despawn(Entity(1));
        assert_eq!(dir.despawned(), &[Entity(1), Entity(1)]);
        assert_eq!(dir.drain_despawned(), vec![Entity(1), Entity(1)]);
        assert!(dir.despawned().is_empty());
    }
}
