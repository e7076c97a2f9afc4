//! Errors surfaced by the world facade.

use engine_component::{AttributeError, Entity, ResolveError, TypeKey};
use engine_store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// A component kind could not be mapped to a type key. Raised before any
    /// tier is touched.
    #[error("unresolvable component descriptor: {0}")]
    UnresolvableDescriptor(#[from] ResolveError),

    #[error("component '{key}' not found on {entity}")]
    ComponentNotFound { entity: Entity, key: TypeKey },

    #[error("{0} does not exist")]
    EntityNotFound(Entity),

    /// The foreign store failed.
    #[error("foreign store operation failed: {0}")]
    EntityOperation(#[source] StoreError),

    #[error(transparent)]
    Attribute(#[from] AttributeError),

    /// A stored record could not be rebuilt into its component value.
    #[error("failed to hydrate '{key}': {source}")]
    Hydration {
        key: TypeKey,
        #[source]
        source: AttributeError,
    },

    #[error("cannot make {parent} the parent of {child}")]
    InvalidHierarchy { child: Entity, parent: Entity },
}

impl From<StoreError> for WorldError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::ComponentNotFound { entity, key } => {
                WorldError::ComponentNotFound { entity, key }
            }
            StoreError::EntityNotFound(entity) => WorldError::EntityNotFound(entity),
            other => WorldError::EntityOperation(other),
        }
    }
}
