//! The foreign component store boundary.

use engine_component::{Entity, ForeignRecord, TypeKey};

use crate::error::StoreError;

/// An opaque, entity-indexed component store on the far side of a runtime
/// boundary.
///
/// The store is authoritative for entity id allocation. Every call is
/// synchronous and may fail; implementations do not retry.
pub trait ForeignStore {
    /// Allocate a new, empty entity.
    fn spawn(&mut self) -> Result<Entity, StoreError>;

    /// Allocate a new entity carrying `records`.
    fn spawn_with(&mut self, records: Vec<ForeignRecord>) -> Result<Entity, StoreError>;

    /// Destroy `entity` and every record on it.
    ///
    /// Returns `Ok(false)` when the entity does not exist, so a double
    /// despawn is not an error.
    fn despawn(&mut self, entity: Entity) -> Result<bool, StoreError>;

    fn contains(&self, entity: Entity) -> Result<bool, StoreError>;

    /// Attach `record` to `entity`, replacing any record with the same key.
    fn insert(&mut self, entity: Entity, record: ForeignRecord) -> Result<(), StoreError>;

    /// Detach and return the record stored under `key`, if any.
    fn remove(&mut self, entity: Entity, key: &str) -> Result<Option<ForeignRecord>, StoreError>;

    /// Fetch the record stored under `key`.
    ///
    /// Fails with [`StoreError::ComponentNotFound`] when the entity lacks it.
    fn get(&self, entity: Entity, key: &str) -> Result<ForeignRecord, StoreError>;

    fn has(&self, entity: Entity, key: &str) -> Result<bool, StoreError>;

    /// Entities that carry a record for every key in `keys`.
    ///
    /// An empty key list matches nothing.
    fn query(&self, keys: &[TypeKey]) -> Result<Vec<Entity>, StoreError>;
}
