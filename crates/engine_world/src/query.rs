//! Multi-tier queries.
//!
//! A [`Query`] names the component kinds to fetch plus optional `with` /
//! `without` filters. Planning partitions the required kinds by tier and
//! picks a driving collection:
//!
//! 1. Only foreign kinds: the foreign store answers the whole query.
//! 2. Any shape kinds: walk the shape store, check the other tiers per id.
//! 3. Otherwise hierarchy kinds drive the same way.
//!
//! The driving id set is snapshotted when the query starts. Results come out
//! in the driver's order; nothing orders them across tiers.

use engine_component::{
    AsDescriptor, Component, ComponentKind, Entity, ResolveError, Tier, TypeKey,
};
use engine_store::ForeignStore;
use serde::Serialize;
use tracing::trace;

use crate::error::WorldError;
use crate::world::World;

/// Which components a query fetches and which entities it admits.
#[derive(Debug, Clone, Default)]
pub struct Query {
    fetch: Vec<ComponentKind>,
    with: Vec<ComponentKind>,
    without: Vec<ComponentKind>,
    /// First descriptor that failed to resolve. Reported when the query runs.
    error: Option<ResolveError>,
}

impl Query {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A query fetching every kind in `kinds`, in order.
    #[must_use]
    pub fn fetching<I>(kinds: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsDescriptor,
    {
        kinds.into_iter().fold(Self::new(), |query, kind| query.fetch(kind))
    }

    /// Require and fetch a component kind.
    #[must_use]
    pub fn fetch(mut self, kind: impl AsDescriptor) -> Self {
        if let Some(kind) = self.resolve(kind) {
            self.fetch.push(kind);
        }
        self
    }

    /// Require a component kind without fetching it.
    #[must_use]
    pub fn with(mut self, kind: impl AsDescriptor) -> Self {
        if let Some(kind) = self.resolve(kind) {
            self.with.push(kind);
        }
        self
    }

    /// Exclude entities carrying a component kind.
    #[must_use]
    pub fn without(mut self, kind: impl AsDescriptor) -> Self {
        if let Some(kind) = self.resolve(kind) {
            self.without.push(kind);
        }
        self
    }

    /// The kinds each result row carries, in row order.
    #[must_use]
    pub fn fetched(&self) -> &[ComponentKind] {
        &self.fetch
    }

    fn resolve(&mut self, kind: impl AsDescriptor) -> Option<ComponentKind> {
        match kind.resolve() {
            Ok(kind) => Some(kind),
            Err(err) => {
                self.error.get_or_insert(err);
                None
            }
        }
    }

    fn plan(self) -> Result<QueryPlan, ResolveError> {
        if let Some(err) = self.error {
            return Err(err);
        }
        let mut plan = QueryPlan {
            fetch: Vec::new(),
            foreign: Vec::new(),
            shape: Vec::new(),
            hierarchy: Vec::new(),
            without: self.without,
        };
        for kind in self.fetch.iter().chain(&self.with) {
            let keys = match kind.tier() {
                Tier::Foreign => &mut plan.foreign,
                Tier::Shape => &mut plan.shape,
                Tier::Hierarchy => &mut plan.hierarchy,
            };
            let key = kind.type_key();
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
        plan.fetch = self.fetch;
        Ok(plan)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Driver {
    Foreign,
    Shape,
    Hierarchy,
    /// Nothing is required, so nothing matches.
    Empty,
}

/// Required keys partitioned by tier.
#[derive(Debug)]
struct QueryPlan {
    fetch: Vec<ComponentKind>,
    foreign: Vec<TypeKey>,
    shape: Vec<TypeKey>,
    hierarchy: Vec<TypeKey>,
    without: Vec<ComponentKind>,
}

impl QueryPlan {
    fn driver(&self) -> Driver {
        if !self.shape.is_empty() {
            Driver::Shape
        } else if !self.hierarchy.is_empty() {
            Driver::Hierarchy
        } else if !self.foreign.is_empty() {
            Driver::Foreign
        } else {
            Driver::Empty
        }
    }
}

/// One query result: an entity and its fetched components in request order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryRow {
    pub entity: Entity,
    pub components: Vec<Component>,
}

impl QueryRow {
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Component> {
        self.components.get(index)
    }

    #[must_use]
    pub fn into_components(self) -> Vec<Component> {
        self.components
    }
}

/// Lazily matches and hydrates the snapshotted candidates of a query.
#[derive(Debug)]
pub struct QueryIter<'w, S> {
    world: &'w World<S>,
    plan: QueryPlan,
    candidates: std::vec::IntoIter<Entity>,
}

impl<S: ForeignStore> Iterator for QueryIter<'_, S> {
    type Item = Result<QueryRow, WorldError>;

    fn next(&mut self) -> Option<Self::Item> {
        for entity in self.candidates.by_ref() {
            match self.world.matches(entity, &self.plan) {
                Ok(true) => return Some(self.world.fetch_row(entity, &self.plan.fetch)),
                Ok(false) => {}
                Err(err) => return Some(Err(err)),
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.candidates.len()))
    }
}

impl<S: ForeignStore> World<S> {
    /// Entities carrying every kind in `kinds`, with those components
    /// hydrated in the same order.
    ///
    /// Every kind is resolved before any tier is consulted.
    pub fn query<I>(&self, kinds: I) -> Result<QueryIter<'_, S>, WorldError>
    where
        I: IntoIterator,
        I::Item: AsDescriptor,
    {
        self.query_with(Query::fetching(kinds))
    }

    pub fn query_with(&self, query: Query) -> Result<QueryIter<'_, S>, WorldError> {
        let plan = query.plan()?;
        let candidates = self.candidates(&plan)?;
        trace!(
            driver = ?plan.driver(),
            candidates = candidates.len(),
            foreign = plan.foreign.len(),
            shape = plan.shape.len(),
            hierarchy = plan.hierarchy.len(),
            "query planned"
        );
        Ok(QueryIter {
            world: self,
            plan,
            candidates: candidates.into_iter(),
        })
    }

    /// The matching entities only, collected up front so the caller may
    /// mutate the world while walking them.
    pub fn query_entities(&self, query: Query) -> Result<Vec<Entity>, WorldError> {
        let plan = query.plan()?;
        let mut matched = Vec::new();
        for entity in self.candidates(&plan)? {
            if self.matches(entity, &plan)? {
                matched.push(entity);
            }
        }
        Ok(matched)
    }

    fn candidates(&self, plan: &QueryPlan) -> Result<Vec<Entity>, WorldError> {
        Ok(match plan.driver() {
            Driver::Foreign => self.store.query(&plan.foreign)?,
            Driver::Shape => self
                .shapes
                .entity_ids()
                .into_iter()
                .filter_map(|id| self.directory.entity(id))
                .collect(),
            Driver::Hierarchy => self
                .hierarchy
                .entity_ids()
                .into_iter()
                .filter_map(|id| self.directory.entity(id))
                .collect(),
            Driver::Empty => Vec::new(),
        })
    }

    fn matches(&self, entity: Entity, plan: &QueryPlan) -> Result<bool, WorldError> {
        let id = entity.id();
        if !self.shapes.has_all(id, &plan.shape) || !self.hierarchy.has_all(id, &plan.hierarchy) {
            return Ok(false);
        }
        if plan.driver() != Driver::Foreign {
            for key in &plan.foreign {
                if !self.store.has(entity, key.as_str())? {
                    return Ok(false);
                }
            }
        }
        for kind in &plan.without {
            if self.has_kind(entity, kind)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn fetch_row(&self, entity: Entity, kinds: &[ComponentKind]) -> Result<QueryRow, WorldError> {
        let components = kinds
            .iter()
            .map(|kind| self.fetch(entity, kind))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(QueryRow { entity, components })
    }
}
