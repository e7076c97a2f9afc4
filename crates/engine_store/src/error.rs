//! Errors reported across the foreign store boundary.

use engine_component::{Entity, TypeKey};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{0} not found")]
    EntityNotFound(Entity),

    #[error("component '{key}' not found on {entity}")]
    ComponentNotFound { entity: Entity, key: TypeKey },

    /// Failed to marshal a record on its way into the store.
    #[error("failed to encode component: {0}")]
    Encode(#[from] rmp_serde::encode::Error),

    /// Failed to unmarshal a record on its way out of the store.
    #[error("failed to decode component: {0}")]
    Decode(#[from] rmp_serde::decode::Error),

    /// The store could not be reached at all.
    #[error("foreign store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Returns `true` for failures that mean "the thing asked for is absent"
    /// rather than "the store misbehaved".
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StoreError::EntityNotFound(_) | StoreError::ComponentNotFound { .. }
        )
    }
}
