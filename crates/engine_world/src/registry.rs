//! Registry of declared component schemas.
//!
//! The foreign store only keeps field bags. To hand a declared component
//! back to the caller the world needs its schema, so every declaration it
//! has seen is kept here under its type key.

use std::collections::HashMap;
use std::sync::Arc;

use engine_component::{ComponentDecl, TypeKey};
use tracing::debug;

#[derive(Debug, Default)]
pub struct DeclarationRegistry {
    declarations: HashMap<TypeKey, Arc<ComponentDecl>>,
}

impl DeclarationRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `decl` under its key.
    ///
    /// Re-registering the same schema is a no-op. A different schema under
    /// the same key replaces the old one, which is returned.
    pub fn register(&mut self, decl: &Arc<ComponentDecl>) -> Option<Arc<ComponentDecl>> {
        if let Some(existing) = self.declarations.get(decl.key())
            && (Arc::ptr_eq(existing, decl) || **existing == **decl)
        {
            return None;
        }
        debug!(key = %decl.key(), attributes = decl.attributes().len(), "declaration registered");
        self.declarations.insert(decl.key().clone(), Arc::clone(decl))
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Arc<ComponentDecl>> {
        self.declarations.get(key)
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.declarations.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use engine_component::ScalarType;

    use super::*;

    #[test]
    fn test_register_is_idempotent() {
        let mut registry = DeclarationRegistry::new();
        let decl = ComponentDecl::builder("Health")
            .attribute("hp", ScalarType::Integer, 100)
            .build()
            .unwrap();
        assert!(registry.register(&decl).is_none());
        assert!(registry.register(&decl).is_none());
        assert_eq!(registry.len(), 1);
        assert!(registry.contains("Health"));
    }

    #[test]
    fn test_register_replaces_changed_schema() {
        let mut registry = DeclarationRegistry::new();
        let v1 = ComponentDecl::builder("Health").build().unwrap();
        let v2 = ComponentDecl::builder("Health")
            .attribute_zeroed("hp", ScalarType::Integer)
            .build()
            .unwrap();
        registry.register(&v1);
        let previous = registry.register(&v2).unwrap();
        assert!(previous.is_marker());
        assert_eq!(registry.get("Health").unwrap().attributes().len(), 1);
    }
}
