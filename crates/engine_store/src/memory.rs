//! In-memory [`ForeignStore`] backend.
//!
//! Records are kept MessagePack-encoded and decoded on every read, so the
//! backend pays the same marshaling cost a cross-runtime store would.

use std::collections::BTreeMap;

use engine_component::{Entity, EntityAllocator, ForeignRecord, TypeKey};
use tracing::trace;

use crate::codec;
use crate::error::StoreError;
use crate::store::ForeignStore;

type EncodedRecords = BTreeMap<TypeKey, Vec<u8>>;

#[derive(Debug, Default)]
pub struct InMemoryStore {
    allocator: EntityAllocator,
    entities: BTreeMap<Entity, EncodedRecords>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    fn records(&self, entity: Entity) -> Result<&EncodedRecords, StoreError> {
        self.entities
            .get(&entity)
            .ok_or(StoreError::EntityNotFound(entity))
    }
}

impl ForeignStore for InMemoryStore {
    fn spawn(&mut self) -> Result<Entity, StoreError> {
        self.spawn_with(Vec::new())
    }

    fn spawn_with(&mut self, records: Vec<ForeignRecord>) -> Result<Entity, StoreError> {
        // Encode everything before allocating so a bad record leaves no entity behind.
        let encoded = records
            .iter()
            .map(|record| codec::encode(record).map(|bytes| (record.key().clone(), bytes)))
            .collect::<Result<EncodedRecords, StoreError>>()?;

        let entity = self.allocator.allocate();
        trace!(entity = %entity, records = encoded.len(), "foreign spawn");
        self.entities.insert(entity, encoded);
        Ok(entity)
    }

    fn despawn(&mut self, entity: Entity) -> Result<bool, StoreError> {
        let removed = self.entities.remove(&entity).is_some();
        trace!(entity = %entity, removed, "foreign despawn");
        Ok(removed)
    }

    fn contains(&self, entity: Entity) -> Result<bool, StoreError> {
        Ok(self.entities.contains_key(&entity))
    }

    fn insert(&mut self, entity: Entity, record: ForeignRecord) -> Result<(), StoreError> {
        let bytes = codec::encode(&record)?;
        let Some(records) = self.entities.get_mut(&entity) else {
            trace!(
                entity = %entity,
                despawned = self.allocator.was_issued(entity),
                "insert on missing entity"
            );
            return Err(StoreError::EntityNotFound(entity));
        };
        trace!(entity = %entity, key = %record.key(), "foreign insert");
        records.insert(record.key().clone(), bytes);
        Ok(())
    }

    fn remove(&mut self, entity: Entity, key: &str) -> Result<Option<ForeignRecord>, StoreError> {
        let Some(records) = self.entities.get_mut(&entity) else {
            return Ok(None);
        };
        records
            .remove(key)
            .map(|bytes| codec::decode(&bytes))
            .transpose()
    }

    fn get(&self, entity: Entity, key: &str) -> Result<ForeignRecord, StoreError> {
        let bytes = self
            .records(entity)?
            .get(key)
            .ok_or_else(|| StoreError::ComponentNotFound {
                entity,
                key: TypeKey::new(key),
            })?;
        codec::decode(bytes)
    }

    fn has(&self, entity: Entity, key: &str) -> Result<bool, StoreError> {
        Ok(self
            .entities
            .get(&entity)
            .is_some_and(|records| records.contains_key(key)))
    }

    fn query(&self, keys: &[TypeKey]) -> Result<Vec<Entity>, StoreError> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self
            .entities
            .iter()
            .filter(|(_, records)| keys.iter().all(|key| records.contains_key(key)))
            .map(|(&entity, _)| entity)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use engine_component::Value;

    use super::*;

    fn score(points: i64) -> ForeignRecord {
        ForeignRecord::new("Score").with_field("points", points)
    }

    #[test]
    fn test_spawn_allocates_unique_ids() {
        let mut store = InMemoryStore::new();
        let a = store.spawn().unwrap();
        let b = store.spawn_with(vec![score(1)]).unwrap();
        assert_ne!(a, b);
        assert!(a.is_valid() && b.is_valid());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_get_decodes_stored_record() {
        let mut store = InMemoryStore::new();
        let e = store.spawn_with(vec![score(7)]).unwrap();
        let record = store.get(e, "Score").unwrap();
        assert_eq!(record.fields().get("points"), Some(&Value::Int(7)));
    }

    #[test]
    fn test_get_missing_component_and_entity() {
        let mut store = InMemoryStore::new();
        let e = store.spawn().unwrap();
        assert!(matches!(
            store.get(e, "Score"),
            Err(StoreError::ComponentNotFound { .. })
        ));
        assert!(matches!(
            store.get(Entity(99), "Score"),
            Err(StoreError::EntityNotFound(Entity(99)))
        ));
    }

    #[test]
    fn test_insert_replaces_and_requires_entity() {
        let mut store = InMemoryStore::new();
        let e = store.spawn_with(vec![score(1)]).unwrap();
        store.insert(e, score(2)).unwrap();
        assert_eq!(store.get(e, "Score").unwrap(), score(2));

        let err = store.insert(Entity(42), score(3)).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_remove_returns_previous_value() {
        let mut store = InMemoryStore::new();
        let e = store.spawn_with(vec![score(5)]).unwrap();
        assert_eq!(store.remove(e, "Score").unwrap(), Some(score(5)));
        assert_eq!(store.remove(e, "Score").unwrap(), None);
        assert_eq!(store.remove(Entity(42), "Score").unwrap(), None);
        assert!(!store.has(e, "Score").unwrap());
    }

    #[test]
    fn test_double_despawn_reports_not_found() {
        let mut store = InMemoryStore::new();
        let e = store.spawn().unwrap();
        assert!(store.despawn(e).unwrap());
        assert!(!store.despawn(e).unwrap());
        assert!(!store.contains(e).unwrap());
    }

    #[test]
    fn test_query_requires_every_key() {
        let mut store = InMemoryStore::new();
        let tag = ForeignRecord::new("Tag");
        let both = store.spawn_with(vec![score(1), tag.clone()]).unwrap();
        let only_score = store.spawn_with(vec![score(2)]).unwrap();

        let keys = [TypeKey::new("Score"), TypeKey::new("Tag")];
        assert_eq!(store.query(&keys).unwrap(), vec![both]);
        assert_eq!(
            store.query(&keys[..1]).unwrap(),
            vec![both, only_score]
        );
        assert!(store.query(&[]).unwrap().is_empty());
    }
}
