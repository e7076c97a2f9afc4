//! Scene-graph links and the world operations that keep them consistent.
//!
//! `Parent` and `Children` live in the hierarchy tier. Inserting either one
//! directly stores it verbatim; the helpers here update both ends of a link
//! together.

use std::collections::BTreeSet;

use engine_component::{Builtin, Children, Component, Entity, Parent, TypeKey};
use engine_store::ForeignStore;
use tracing::debug;

use crate::error::WorldError;
use crate::world::World;

/// A value stored in the hierarchy tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Relation {
    Parent(Parent),
    Children(Children),
}

impl Relation {
    #[must_use]
    pub fn parent(&self) -> Option<Entity> {
        match self {
            Relation::Parent(Parent(parent)) => Some(*parent),
            Relation::Children(_) => None,
        }
    }

    #[must_use]
    pub fn children(&self) -> Option<&Children> {
        match self {
            Relation::Children(children) => Some(children),
            Relation::Parent(_) => None,
        }
    }
}

impl From<Relation> for Component {
    fn from(relation: Relation) -> Self {
        match relation {
            Relation::Parent(parent) => Component::Parent(parent),
            Relation::Children(children) => Component::Children(children),
        }
    }
}

fn parent_key() -> TypeKey {
    TypeKey::from_static(Builtin::Parent.key())
}

fn children_key() -> TypeKey {
    TypeKey::from_static(Builtin::Children.key())
}

impl<S: ForeignStore> World<S> {
    #[must_use]
    pub fn parent(&self, entity: Entity) -> Option<Entity> {
        self.hierarchy
            .get(entity.id(), Builtin::Parent.key())?
            .parent()
    }

    /// Direct children in attachment order.
    #[must_use]
    pub fn children(&self, entity: Entity) -> Vec<Entity> {
        self.hierarchy
            .get(entity.id(), Builtin::Children.key())
            .and_then(Relation::children)
            .map(|children| children.iter().collect())
            .unwrap_or_default()
    }

    /// Every entity below `entity`, depth first, parents before children.
    ///
    /// Only follows links confirmed from both ends: a listed child must name
    /// the entity as its parent and still exist.
    #[must_use]
    pub fn descendants(&self, entity: Entity) -> Vec<Entity> {
        let mut out = Vec::new();
        let mut visited = BTreeSet::from([entity]);
        let mut stack: Vec<(Entity, Entity)> = self.linked_children(entity);
        while let Some((parent, next)) = stack.pop() {
            if self.parent(next) != Some(parent) || !visited.insert(next) {
                continue;
            }
            out.push(next);
            stack.extend(self.linked_children(next));
        }
        out
    }

    /// `(parent, child)` pairs for the live children of `parent`, reversed
    /// so popping yields attachment order.
    fn linked_children(&self, parent: Entity) -> Vec<(Entity, Entity)> {
        self.children(parent)
            .into_iter()
            .rev()
            .filter(|child| matches!(self.contains(*child), Ok(true)))
            .map(|child| (parent, child))
            .collect()
    }

    /// Attach `child` under `parent`, detaching it from any previous parent.
    ///
    /// Fails when either entity does not exist or the link would make an
    /// entity its own ancestor.
    pub fn set_parent(&mut self, child: Entity, parent: Entity) -> Result<(), WorldError> {
        if child == parent || self.ancestors(parent).contains(&child) {
            return Err(WorldError::InvalidHierarchy { child, parent });
        }
        self.require(child)?;
        self.require(parent)?;

        match self.parent(child) {
            Some(old) if old == parent => return Ok(()),
            Some(old) => self.unlink_child(old, child),
            None => {}
        }

        self.hierarchy
            .put(child.id(), parent_key(), Relation::Parent(Parent(parent)));
        let mut children = match self.hierarchy.delete(parent.id(), Builtin::Children.key()) {
            Some(Relation::Children(children)) => children,
            _ => Children::default(),
        };
        children.push(child);
        self.hierarchy
            .put(parent.id(), children_key(), Relation::Children(children));
        self.directory.register(child);
        self.directory.register(parent);

        debug!(child = %child, parent = %parent, "parent set");
        Ok(())
    }

    /// Detach `child` from its parent. Returns the former parent.
    pub fn remove_parent(&mut self, child: Entity) -> Option<Entity> {
        let parent = self.parent(child)?;
        self.hierarchy.delete(child.id(), Builtin::Parent.key());
        self.unlink_child(parent, child);
        self.sync_directory(child);

        debug!(child = %child, parent = %parent, "parent removed");
        Some(parent)
    }

    /// Despawn `entity` and everything below it, deepest first.
    ///
    /// Every despawned entity is logged. Returns `false` if any foreign
    /// despawn failed.
    pub fn despawn_recursive(&mut self, entity: Entity) -> bool {
        let mut ok = true;
        for descendant in self.descendants(entity).into_iter().rev() {
            ok &= self.despawn(descendant);
        }
        self.despawn(entity) && ok
    }

    /// Drop every link that points at `entity` from another entity.
    pub(crate) fn detach_links(&mut self, entity: Entity) {
        if let Some(parent) = self.parent(entity) {
            self.unlink_child(parent, entity);
        }
        for child in self.children(entity) {
            if self.parent(child) == Some(entity) {
                self.hierarchy.delete(child.id(), Builtin::Parent.key());
                self.sync_directory(child);
            }
        }
    }

    fn ancestors(&self, entity: Entity) -> BTreeSet<Entity> {
        let mut seen = BTreeSet::new();
        let mut cursor = self.parent(entity);
        while let Some(ancestor) = cursor {
            if !seen.insert(ancestor) {
                break;
            }
            cursor = self.parent(ancestor);
        }
        seen
    }

    fn unlink_child(&mut self, parent: Entity, child: Entity) {
        let key = Builtin::Children.key();
        if let Some(Relation::Children(children)) = self.hierarchy.get_mut(parent.id(), key) {
            children.remove(child);
            if children.is_empty() {
                self.hierarchy.delete(parent.id(), key);
            }
        }
        self.sync_directory(parent);
    }
}

#[cfg(test)]
mod tests {
    use engine_component::Mesh;
    use engine_math::Transform;

    use super::*;

    fn spawn_empty(world: &mut World) -> Entity {
        world.spawn(Vec::new()).unwrap()
    }

    #[test]
    fn test_set_parent_links_both_ends() {
        let mut world = World::new();
        let parent = spawn_empty(&mut world);
        let a = spawn_empty(&mut world);
        let b = spawn_empty(&mut world);

        world.set_parent(a, parent).unwrap();
        world.set_parent(b, parent).unwrap();
        world.set_parent(a, parent).unwrap();

        assert_eq!(world.children(parent), vec![a, b]);
        assert_eq!(world.parent(a), Some(parent));
        assert_eq!(
            world.get_component(b, Builtin::Parent).unwrap(),
            Component::Parent(Parent(parent))
        );
        assert_eq!(world.entity_ids_with_aux_data(), vec![parent, a, b]);
    }

    #[test]
    fn test_reparenting_moves_child() {
        let mut world = World::new();
        let first = spawn_empty(&mut world);
        let second = spawn_empty(&mut world);
        let child = spawn_empty(&mut world);

        world.set_parent(child, first).unwrap();
        world.set_parent(child, second).unwrap();

        assert!(world.children(first).is_empty());
        assert!(!world.has(first, Builtin::Children).unwrap());
        assert_eq!(world.children(second), vec![child]);
    }

    #[test]
    fn test_set_parent_rejects_cycles() {
        let mut world = World::new();
        let root = spawn_empty(&mut world);
        let mid = spawn_empty(&mut world);
        let leaf = spawn_empty(&mut world);
        world.set_parent(mid, root).unwrap();
        world.set_parent(leaf, mid).unwrap();

        assert!(matches!(
            world.set_parent(root, leaf),
            Err(WorldError::InvalidHierarchy { .. })
        ));
        assert!(matches!(
            world.set_parent(root, root),
            Err(WorldError::InvalidHierarchy { .. })
        ));
        assert_eq!(world.parent(root), None);
    }

    #[test]
    fn test_set_parent_requires_live_entities() {
        let mut world = World::new();
        let child = spawn_empty(&mut world);
        assert!(matches!(
            world.set_parent(child, Entity(404)),
            Err(WorldError::EntityNotFound(Entity(404)))
        ));
    }

    #[test]
    fn test_remove_parent() {
        let mut world = World::new();
        let parent = spawn_empty(&mut world);
        let child = spawn_empty(&mut world);
        world.set_parent(child, parent).unwrap();

        assert_eq!(world.remove_parent(child), Some(parent));
        assert_eq!(world.remove_parent(child), None);
        assert!(world.children(parent).is_empty());
        assert!(world.entity_ids_with_aux_data().is_empty());
    }

    #[test]
    fn test_despawn_detaches_from_parent_and_orphans_children() {
        let mut world = World::new();
        let root = spawn_empty(&mut world);
        let mid = spawn_empty(&mut world);
        let leaf = spawn_empty(&mut world);
        world.set_parent(mid, root).unwrap();
        world.set_parent(leaf, mid).unwrap();

        world.despawn(mid);

        assert!(world.children(root).is_empty());
        assert_eq!(world.parent(leaf), None);
        assert!(world.contains(leaf).unwrap());
    }

    #[test]
    fn test_despawn_recursive_logs_every_entity() {
        let mut world = World::new();
        let root = world.spawn(vec![Transform::IDENTITY.into()]).unwrap();
        let a = world.spawn(vec![Mesh::circle(1.0).into()]).unwrap();
        let b = spawn_empty(&mut world);
        let a1 = spawn_empty(&mut world);
        let keep = spawn_empty(&mut world);
        world.set_parent(a, root).unwrap();
        world.set_parent(b, root).unwrap();
        world.set_parent(a1, a).unwrap();

        assert_eq!(world.descendants(root), vec![a, a1, b]);
        assert!(world.despawn_recursive(root));

        let mut logged = world.drain_despawned();
        logged.sort();
        assert_eq!(logged, vec![root, a, b, a1]);
        for e in [root, a, b, a1] {
            assert!(!world.contains(e).unwrap());
        }
        assert!(world.contains(keep).unwrap());
        assert!(world.entity_ids_with_aux_data().is_empty());
    }

    #[test]
    fn test_despawn_recursive_skips_unlinked_children() {
        let mut world = World::new();
        let dangling = world
            .spawn(vec![Children(vec![Entity(99)]).into()])
            .unwrap();
        assert!(world.descendants(dangling).is_empty());
        assert!(world.despawn_recursive(dangling));
        assert_eq!(world.drain_despawned(), vec![dangling]);

        let bystander = spawn_empty(&mut world);
        let stale = world
            .spawn(vec![Children(vec![bystander]).into()])
            .unwrap();
        assert!(world.descendants(stale).is_empty());
        assert!(world.despawn_recursive(stale));
        assert_eq!(world.drain_despawned(), vec![stale]);
        assert!(world.contains(bystander).unwrap());
    }
}
