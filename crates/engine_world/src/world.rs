//! The world facade.
//!
//! [`World`] presents one entity/component surface over three storage tiers:
//! the foreign store (authoritative for ids, built-in and natively backed
//! components), the shape store, and the hierarchy store. Every operation
//! resolves its component kind first and then touches exactly one tier.

use std::sync::Arc;

use engine_component::{
    AsDescriptor, Component, ComponentDecl, ComponentKind, Entity, ForeignRecord, Mesh, Tier,
};
use engine_store::{ForeignStore, InMemoryStore, StoreError};
use tracing::{debug, warn};

use crate::auxiliary::AuxStore;
use crate::config::WorldConfig;
use crate::directory::EntityDirectory;
use crate::error::WorldError;
use crate::hierarchy::Relation;
use crate::hydrate::{Lowered, hydrate_foreign, hydrate_relation, hydrate_shape, lower};
use crate::registry::DeclarationRegistry;

/// The tiered entity-component world.
///
/// Single-threaded and synchronous. The world is the only writer to the
/// auxiliary stores and the entity directory.
#[derive(Debug)]
pub struct World<S = InMemoryStore> {
    pub(crate) store: S,
    pub(crate) shapes: AuxStore<Mesh>,
    pub(crate) hierarchy: AuxStore<Relation>,
    pub(crate) directory: EntityDirectory,
    pub(crate) declarations: DeclarationRegistry,
    pub(crate) config: WorldConfig,
}

impl World<InMemoryStore> {
    /// A world over a fresh in-memory foreign store.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(WorldConfig::default())
    }

    #[must_use]
    pub fn with_config(config: WorldConfig) -> Self {
        Self::with_store(InMemoryStore::new(), config)
    }
}

impl Default for World<InMemoryStore> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: ForeignStore> World<S> {
    pub fn with_store(store: S, config: WorldConfig) -> Self {
        Self {
            store,
            shapes: AuxStore::new(),
            hierarchy: AuxStore::new(),
            directory: EntityDirectory::new(),
            declarations: DeclarationRegistry::new(),
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// The foreign store backing this world.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    // -- Entity lifecycle --

    /// Spawn an entity carrying `components`.
    ///
    /// Every component is resolved before anything is written. The foreign
    /// store mints the id even when no component belongs to it.
    pub fn spawn<I>(&mut self, components: I) -> Result<Entity, WorldError>
    where
        I: IntoIterator<Item = Component>,
    {
        let mut declarations = Vec::new();
        let mut foreign = Vec::new();
        let mut shapes = Vec::new();
        let mut relations = Vec::new();

        for component in components {
            declarations.extend(declaration_of(&component));
            let (kind, lowered) = lower(component)?;
            match lowered {
                Lowered::Foreign(record) => foreign.push(record),
                Lowered::Shape(mesh) => shapes.push((kind.type_key(), mesh)),
                Lowered::Hierarchy(relation) => relations.push((kind.type_key(), relation)),
            }
        }

        let foreign_count = foreign.len();
        let entity = if foreign.is_empty() {
            self.store.spawn()?
        } else {
            self.store.spawn_with(foreign)?
        };

        for decl in &declarations {
            self.declarations.register(decl);
        }

        let has_aux = !shapes.is_empty() || !relations.is_empty();
        let (shape_count, relation_count) = (shapes.len(), relations.len());
        for (key, mesh) in shapes {
            self.shapes.put(entity.id(), key, mesh);
        }
        for (key, relation) in relations {
            self.hierarchy.put(entity.id(), key, relation);
        }
        if has_aux {
            self.directory.register(entity);
        }

        debug!(
            entity = %entity,
            foreign = foreign_count,
            shapes = shape_count,
            relations = relation_count,
            "entity spawned"
        );
        Ok(entity)
    }

    /// Remove `entity` from every tier.
    ///
    /// Local cleanup always runs. Returns `false` only when the foreign store
    /// reported a failure; an entity it no longer knows is not a failure.
    pub fn despawn(&mut self, entity: Entity) -> bool {
        let foreign_ok = match self.store.despawn(entity) {
            Ok(found) => {
                if !found {
                    debug!(entity = %entity, "entity not present in foreign store");
                }
                true
            }
            Err(err) => {
                warn!(
                    entity = %entity,
                    error = %err,
                    "foreign despawn failed, cleaning up locally"
                );
                false
            }
        };

        self.detach_links(entity);
        self.shapes.delete_entity(entity.id());
        self.hierarchy.delete_entity(entity.id());
        self.directory.unregister(entity);
        if self.config.record_despawns {
            self.directory.record_despawn(entity);
        }

        debug!(entity = %entity, foreign_ok, "entity despawned");
        foreign_ok
    }

    /// `true` if `entity` exists in any tier.
    pub fn contains(&self, entity: Entity) -> Result<bool, WorldError> {
        Ok(self.directory.contains(entity.id()) || self.store.contains(entity)?)
    }

    // -- Component operations --

    /// Attach `component` to `entity`, replacing any value of the same kind.
    pub fn insert_component(
        &mut self,
        entity: Entity,
        component: impl Into<Component>,
    ) -> Result<(), WorldError> {
        let component = component.into();
        let decl = declaration_of(&component);
        let (kind, lowered) = lower(component)?;

        match lowered {
            Lowered::Foreign(record) => self.store.insert(entity, record)?,
            Lowered::Shape(mesh) => {
                self.require(entity)?;
                self.shapes.put(entity.id(), kind.type_key(), mesh);
                self.directory.register(entity);
            }
            Lowered::Hierarchy(relation) => {
                self.require(entity)?;
                self.hierarchy.put(entity.id(), kind.type_key(), relation);
                self.directory.register(entity);
            }
        }
        if let Some(decl) = decl {
            self.declarations.register(&decl);
        }

        debug!(entity = %entity, key = %kind, tier = ?kind.tier(), "component inserted");
        Ok(())
    }

    /// Detach the component of kind `kind`, returning it if it was present.
    pub fn remove_component(
        &mut self,
        entity: Entity,
        kind: impl AsDescriptor,
    ) -> Result<Option<Component>, WorldError> {
        let kind = kind.resolve()?;
        let removed = match kind.tier() {
            Tier::Foreign => {
                // Hydrate before removing so a record that cannot be rebuilt stays put.
                if !self.store.has(entity, kind.key())? {
                    None
                } else {
                    let component = self.hydrate(self.store.get(entity, kind.key())?)?;
                    self.store.remove(entity, kind.key())?;
                    Some(component)
                }
            }
            Tier::Shape => self.shapes.delete(entity.id(), kind.key()).map(Component::Mesh),
            Tier::Hierarchy => self
                .hierarchy
                .delete(entity.id(), kind.key())
                .map(Component::from),
        };
        if kind.tier().is_auxiliary() {
            self.sync_directory(entity);
        }

        debug!(entity = %entity, key = %kind, removed = removed.is_some(), "component removed");
        Ok(removed)
    }

    /// Fetch and hydrate the component of kind `kind`.
    pub fn get_component(
        &self,
        entity: Entity,
        kind: impl AsDescriptor,
    ) -> Result<Component, WorldError> {
        let kind = kind.resolve()?;
        self.fetch(entity, &kind)
    }

    pub fn has(&self, entity: Entity, kind: impl AsDescriptor) -> Result<bool, WorldError> {
        let kind = kind.resolve()?;
        self.has_kind(entity, &kind)
    }

    // -- Declarations --

    /// Record a declared component schema so stored instances can be
    /// rebuilt by key. Returns the schema it replaced, if any.
    pub fn register_declaration(
        &mut self,
        decl: &Arc<ComponentDecl>,
    ) -> Result<Option<Arc<ComponentDecl>>, WorldError> {
        decl.resolve()?;
        Ok(self.declarations.register(decl))
    }

    #[must_use]
    pub fn declaration(&self, key: &str) -> Option<&Arc<ComponentDecl>> {
        self.declarations.get(key)
    }

    // -- Despawn log --

    /// Entities despawned since the log was last drained.
    #[must_use]
    pub fn despawned(&self) -> &[Entity] {
        self.directory.despawned()
    }

    pub fn drain_despawned(&mut self) -> Vec<Entity> {
        self.directory.drain_despawned()
    }

    /// Entities holding data in either auxiliary tier, in id order.
    #[must_use]
    pub fn entity_ids_with_aux_data(&self) -> Vec<Entity> {
        self.directory.ids().map(Entity::from_raw).collect()
    }

    // -- Tier dispatch --

    pub(crate) fn fetch(
        &self,
        entity: Entity,
        kind: &ComponentKind,
    ) -> Result<Component, WorldError> {
        let not_found = || WorldError::ComponentNotFound {
            entity,
            key: kind.type_key(),
        };
        match kind.tier() {
            Tier::Foreign => match self.store.get(entity, kind.key()) {
                Ok(record) => self.hydrate(record),
                Err(StoreError::EntityNotFound(_)) => Err(not_found()),
                Err(err) => Err(err.into()),
            },
            Tier::Shape => self
                .shapes
                .get(entity.id(), kind.key())
                .map(hydrate_shape)
                .ok_or_else(not_found),
            Tier::Hierarchy => self
                .hierarchy
                .get(entity.id(), kind.key())
                .map(hydrate_relation)
                .ok_or_else(not_found),
        }
    }

    pub(crate) fn has_kind(
        &self,
        entity: Entity,
        kind: &ComponentKind,
    ) -> Result<bool, WorldError> {
        Ok(match kind.tier() {
            Tier::Foreign => self.store.has(entity, kind.key())?,
            Tier::Shape => self.shapes.has(entity.id(), kind.key()),
            Tier::Hierarchy => self.hierarchy.has(entity.id(), kind.key()),
        })
    }

    fn hydrate(&self, record: ForeignRecord) -> Result<Component, WorldError> {
        hydrate_foreign(record, &self.declarations, self.config.strict_attributes)
    }

    pub(crate) fn require(&self, entity: Entity) -> Result<(), WorldError> {
        if self.contains(entity)? {
            Ok(())
        } else {
            Err(WorldError::EntityNotFound(entity))
        }
    }

    /// Keep the directory in step with the auxiliary stores for `entity`.
    pub(crate) fn sync_directory(&mut self, entity: Entity) {
        let id = entity.id();
        if self.shapes.contains_entity(id) || self.hierarchy.contains_entity(id) {
            self.directory.register(entity);
        } else {
            self.directory.unregister(entity);
        }
    }
}

fn declaration_of(component: &Component) -> Option<Arc<ComponentDecl>> {
    match component {
        Component::Declared(declared) => Some(Arc::clone(declared.declaration())),
        _ => None,
    }
}
