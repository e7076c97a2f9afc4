//! User-declared components.
//!
//! A [`ComponentDecl`] is the schema a DSL layer hands the engine: a name plus
//! an ordered list of typed attributes with defaults. Declarations are built
//! once through [`ComponentDeclBuilder`] and shared behind an [`Arc`]; every
//! [`DeclaredComponent`] instance points back at its declaration, so attribute
//! access is a positional lookup instead of reflection.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::access::AttributeAccess;
use crate::error::AttributeError;
use crate::key::TypeKey;
use crate::resolve::validate_user_key;
use crate::value::{ScalarType, Value};

/// One attribute of a declared component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeDecl {
    pub name: String,
    pub ty: ScalarType,
    pub default: Value,
}

/// The schema of a user-declared component kind.
///
/// The canonical type key of every instance is the declaration's name.
/// Declarations without attributes are marker components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentDecl {
    key: TypeKey,
    attributes: Vec<AttributeDecl>,
}

impl ComponentDecl {
    #[must_use]
    pub fn builder(name: impl Into<String>) -> ComponentDeclBuilder {
        ComponentDeclBuilder {
            name: name.into(),
            attributes: Vec::new(),
        }
    }

    #[must_use]
    pub fn key(&self) -> &TypeKey {
        &self.key
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.key.as_str()
    }

    #[must_use]
    pub fn attributes(&self) -> &[AttributeDecl] {
        &self.attributes
    }

    /// Position and declaration of the attribute called `name`.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<(usize, &AttributeDecl)> {
        self.attributes
            .iter()
            .enumerate()
            .find(|(_, attr)| attr.name == name)
    }

    #[must_use]
    pub fn is_marker(&self) -> bool {
        self.attributes.is_empty()
    }

    /// A fresh instance with every attribute at its default.
    #[must_use]
    pub fn instantiate(self: &Arc<Self>) -> DeclaredComponent {
        DeclaredComponent {
            decl: Arc::clone(self),
            values: self.attributes.iter().map(|a| a.default.clone()).collect(),
        }
    }
}

/// Builder for [`ComponentDecl`].
#[derive(Debug, Clone)]
pub struct ComponentDeclBuilder {
    name: String,
    attributes: Vec<AttributeDecl>,
}

impl ComponentDeclBuilder {
    #[must_use]
    pub fn attribute(
        mut self,
        name: impl Into<String>,
        ty: ScalarType,
        default: impl Into<Value>,
    ) -> Self {
        self.attributes.push(AttributeDecl {
            name: name.into(),
            ty,
            default: default.into(),
        });
        self
    }

    /// Declare an attribute whose default is the zero value of `ty`.
    #[must_use]
    pub fn attribute_zeroed(self, name: impl Into<String>, ty: ScalarType) -> Self {
        self.attribute(name, ty, ty.zero())
    }

    /// Validate and freeze the declaration.
    ///
    /// # Errors
    ///
    /// Fails when the name is not a valid user key, an attribute is declared
    /// twice, or a default does not match its attribute's type.
    pub fn build(self) -> Result<Arc<ComponentDecl>, AttributeError> {
        validate_user_key(&self.name)?;

        let mut attributes = Vec::with_capacity(self.attributes.len());
        for attr in self.attributes {
            if attributes.iter().any(|a: &AttributeDecl| a.name == attr.name) {
                return Err(AttributeError::Duplicate {
                    component: self.name,
                    attribute: attr.name,
                });
            }
            let default = attr
                .default
                .coerce(attr.ty)
                .map_err(|found| AttributeError::TypeMismatch {
                    component: self.name.clone(),
                    attribute: attr.name.clone(),
                    expected: attr.ty,
                    found: found.type_name(),
                })?;
            attributes.push(AttributeDecl { default, ..attr });
        }

        Ok(Arc::new(ComponentDecl {
            key: TypeKey::new(self.name),
            attributes,
        }))
    }
}

/// An instance of a declared component.
#[derive(Debug, Clone, PartialEq)]
pub struct DeclaredComponent {
    decl: Arc<ComponentDecl>,
    values: Vec<Value>,
}

impl DeclaredComponent {
    #[must_use]
    pub fn declaration(&self) -> &Arc<ComponentDecl> {
        &self.decl
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        let (index, _) = self.decl.attribute(name)?;
        self.values.get(index)
    }

    /// Builder-style [`AttributeAccess::set_attr`].
    ///
    /// # Errors
    ///
    /// See [`AttributeAccess::set_attr`].
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Result<Self, AttributeError> {
        self.set_attr(name, value.into())?;
        Ok(self)
    }

    /// Attribute values keyed by name.
    #[must_use]
    pub fn to_fields(&self) -> BTreeMap<String, Value> {
        self.decl
            .attributes
            .iter()
            .zip(&self.values)
            .map(|(attr, value)| (attr.name.clone(), value.clone()))
            .collect()
    }
}

impl AttributeAccess for DeclaredComponent {
    fn type_key(&self) -> &TypeKey {
        &self.decl.key
    }

    fn attribute_names(&self) -> Vec<&str> {
        self.decl.attributes.iter().map(|a| a.name.as_str()).collect()
    }

    fn get_attr(&self, name: &str) -> Option<&Value> {
        self.get(name)
    }

    fn set_attr(&mut self, name: &str, value: Value) -> Result<(), AttributeError> {
        let (index, attr) = self.decl.attribute(name).ok_or_else(|| AttributeError::Unknown {
            component: self.decl.name().to_string(),
            attribute: name.to_string(),
        })?;
        let value = value.coerce(attr.ty).map_err(|found| AttributeError::TypeMismatch {
            component: self.decl.name().to_string(),
            attribute: name.to_string(),
            expected: attr.ty,
            found: found.type_name(),
        })?;
        self.values[index] = value;
        Ok(())
    }
}

impl Serialize for DeclaredComponent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (attr, value) in self.decl.attributes.iter().zip(&self.values) {
            map.serialize_entry(&attr.name, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ResolveError;

    fn velocity() -> Arc<ComponentDecl> {
        ComponentDecl::builder("Velocity")
            .attribute("x", ScalarType::Float, 0.0)
            .attribute("y", ScalarType::Float, 0.0)
            .build()
            .unwrap()
    }

    #[test]
    fn test_instantiate_uses_defaults() {
        let v = velocity().instantiate();
        assert_eq!(v.get("x"), Some(&Value::Float(0.0)));
        assert_eq!(v.type_key().as_str(), "Velocity");
    }

    #[test]
    fn test_set_attr_widens_integers() {
        let v = velocity().instantiate().with("x", 5).unwrap().with("y", 10).unwrap();
        assert_eq!(v.get("x").and_then(Value::as_f64), Some(5.0));
        assert_eq!(v.get("y").and_then(Value::as_f64), Some(10.0));
    }

    #[test]
    fn test_set_attr_rejects_wrong_type() {
        let err = velocity().instantiate().with("x", "fast").unwrap_err();
        assert!(matches!(err, AttributeError::TypeMismatch { expected: ScalarType::Float, .. }));
    }

    #[test]
    fn test_set_attr_rejects_unknown_attribute() {
        let err = velocity().instantiate().with("z", 1.0).unwrap_err();
        assert!(matches!(err, AttributeError::Unknown { .. }));
    }

    #[test]
    fn test_marker_declaration() {
        let player = ComponentDecl::builder("Player").build().unwrap();
        assert!(player.is_marker());
        assert!(player.instantiate().to_fields().is_empty());
    }

    #[test]
    fn test_build_rejects_duplicate_attribute() {
        let err = ComponentDecl::builder("Health")
            .attribute_zeroed("hp", ScalarType::Integer)
            .attribute_zeroed("hp", ScalarType::Integer)
            .build()
            .unwrap_err();
        assert!(matches!(err, AttributeError::Duplicate { .. }));
    }

    #[test]
    fn test_build_rejects_mistyped_default() {
        let err = ComponentDecl::builder("Health")
            .attribute("hp", ScalarType::Integer, "full")
            .build()
            .unwrap_err();
        assert!(matches!(err, AttributeError::TypeMismatch { .. }));
    }

    #[test]
    fn test_build_rejects_builtin_name() {
        let err = ComponentDecl::builder("Transform").build().unwrap_err();
        assert_eq!(
            err,
            AttributeError::InvalidDeclaration(ResolveError::BuiltinKey("Transform".into()))
        );
    }

    #[test]
    fn test_serializes_as_attribute_map() {
        let v = velocity().instantiate().with("x", 2.5).unwrap();
        let bytes = rmp_serde::to_vec_named(&v).unwrap();
        let fields: BTreeMap<String, Value> = rmp_serde::from_slice(&bytes).unwrap();
        assert_eq!(fields, v.to_fields());
    }
}
