//! Moving component values in and out of the storage tiers.
//!
//! [`lower`] turns a [`Component`] into the representation its tier stores.
//! The `hydrate_*` functions go the other way. Foreign records are rebuilt
//! through [`FOREIGN_HYDRATORS`], a table keyed by built-in kind; records
//! with any other key become declared components when a schema is on record
//! and dynamic components otherwise.

use std::sync::Arc;

use engine_component::{
    AsDescriptor, AttributeAccess, AttributeError, Builtin, Camera2d, Component, ComponentDecl,
    ComponentKind, DeclaredComponent, FieldCodec, ForeignRecord, Mesh, ResolveError, Sprite,
    Text2d,
};
use engine_math::Transform;
use tracing::trace;

use crate::error::WorldError;
use crate::hierarchy::Relation;
use crate::registry::DeclarationRegistry;

/// A component in the form its owning tier stores it.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Lowered {
    Foreign(ForeignRecord),
    Shape(Mesh),
    Hierarchy(Relation),
}

/// Resolve `component` and convert it for storage.
///
/// Pure: nothing is written anywhere, so callers can validate a whole batch
/// before mutating.
pub(crate) fn lower(component: Component) -> Result<(ComponentKind, Lowered), WorldError> {
    let kind = component.resolve()?;
    let lowered = match component {
        Component::Transform(transform) => Lowered::Foreign(transform.to_record()),
        Component::Sprite(sprite) => Lowered::Foreign(sprite.to_record()),
        Component::Camera2d(camera) => Lowered::Foreign(camera.to_record()),
        Component::Text2d(text) => Lowered::Foreign(text.to_record()),
        Component::Mesh(mesh) => Lowered::Shape(mesh),
        Component::Parent(parent) => Lowered::Hierarchy(Relation::Parent(parent)),
        Component::Children(children) => Lowered::Hierarchy(Relation::Children(children)),
        Component::Declared(declared) => Lowered::Foreign(
            ForeignRecord::new(declared.type_key().clone()).with_fields(declared.to_fields()),
        ),
        Component::Dynamic(record) => {
            // A bare record may not impersonate a built-in.
            if !matches!(kind, ComponentKind::Dynamic(_)) {
                return Err(ResolveError::BuiltinKey(record.key().to_string()).into());
            }
            Lowered::Foreign(record)
        }
    };
    Ok((kind, lowered))
}

type HydrateFn = fn(&ForeignRecord) -> Result<Component, AttributeError>;

fn hydrate_as<T: FieldCodec + Into<Component>>(
    record: &ForeignRecord,
) -> Result<Component, AttributeError> {
    T::from_record(record).map(Into::into)
}

/// How each foreign built-in is rebuilt from its record.
const FOREIGN_HYDRATORS: &[(Builtin, HydrateFn)] = &[
    (Builtin::Transform, hydrate_as::<Transform> as HydrateFn),
    (Builtin::Sprite, hydrate_as::<Sprite> as HydrateFn),
    (Builtin::Camera2d, hydrate_as::<Camera2d> as HydrateFn),
    (Builtin::Text2d, hydrate_as::<Text2d> as HydrateFn),
];

fn foreign_hydrator(key: &str) -> Option<HydrateFn> {
    FOREIGN_HYDRATORS
        .iter()
        .find(|(builtin, _)| builtin.key() == key)
        .map(|&(_, hydrate)| hydrate)
}

/// Rebuild a component read back from the foreign store.
pub(crate) fn hydrate_foreign(
    record: ForeignRecord,
    declarations: &DeclarationRegistry,
    strict: bool,
) -> Result<Component, WorldError> {
    let key = record.key().clone();
    let hydrated = if let Some(hydrate) = foreign_hydrator(key.as_str()) {
        hydrate(&record)
    } else if let Some(decl) = declarations.get(key.as_str()) {
        hydrate_declared(decl, &record, strict).map(Component::Declared)
    } else {
        return Ok(Component::Dynamic(record));
    };
    hydrated.map_err(|source| WorldError::Hydration { key, source })
}

/// Copy a record's fields onto a fresh instance of `decl`.
///
/// Attributes the record lacks, or carries with the wrong type, keep their
/// declared default unless `strict` is set.
pub(crate) fn hydrate_declared(
    decl: &Arc<ComponentDecl>,
    record: &ForeignRecord,
    strict: bool,
) -> Result<DeclaredComponent, AttributeError> {
    let mut instance = decl.instantiate();
    for attr in decl.attributes() {
        let Some(value) = record.get_attr(&attr.name) else {
            if strict {
                return Err(AttributeError::Missing {
                    component: decl.name().to_string(),
                    attribute: attr.name.clone(),
                });
            }
            continue;
        };
        if let Err(err) = instance.set_attr(&attr.name, value.clone()) {
            if strict {
                return Err(err);
            }
            trace!(key = %decl.key(), attribute = %attr.name, error = %err, "keeping default");
        }
    }
    Ok(instance)
}

pub(crate) fn hydrate_shape(mesh: &Mesh) -> Component {
    Component::Mesh(mesh.clone())
}

pub(crate) fn hydrate_relation(relation: &Relation) -> Component {
    relation.clone().into()
}

#[cfg(test)]
mod tests {
    use engine_component::{Entity, Parent, ScalarType, TypeKey, Value};
    use engine_math::Color;

    use super::*;

    fn velocity() -> Arc<ComponentDecl> {
        ComponentDecl::builder("Velocity")
            .attribute("x", ScalarType::Float, 0.0)
            .attribute("y", ScalarType::Float, 0.0)
            .build()
            .unwrap()
    }

    #[test]
    fn test_lower_routes_by_tier() {
        let (kind, lowered) = lower(Transform::IDENTITY.into()).unwrap();
        assert_eq!(kind, ComponentKind::Foreign(Builtin::Transform));
        assert!(matches!(lowered, Lowered::Foreign(ref r) if r.key().as_str() == "Transform"));

        let (kind, lowered) = lower(Mesh::circle(2.0).into()).unwrap();
        assert_eq!(kind.key(), "Mesh::Circle");
        assert!(matches!(lowered, Lowered::Shape(_)));

        let (_, lowered) = lower(Parent(Entity(1)).into()).unwrap();
        assert_eq!(lowered, Lowered::Hierarchy(Relation::Parent(Parent(Entity(1)))));
    }

    #[test]
    fn test_lower_rejects_record_with_builtin_key() {
        let err = lower(ForeignRecord::new("Sprite").into()).unwrap_err();
        assert!(matches!(
            err,
            WorldError::UnresolvableDescriptor(ResolveError::BuiltinKey(_))
        ));
    }

    #[test]
    fn test_lower_declared_flattens_attributes() {
        let v = velocity().instantiate().with("x", 5).unwrap();
        let (kind, lowered) = lower(v.into()).unwrap();
        assert_eq!(kind, ComponentKind::Declared(TypeKey::new("Velocity")));
        let Lowered::Foreign(record) = lowered else {
            panic!("declared components live in the foreign tier");
        };
        assert_eq!(record.fields().get("x"), Some(&Value::Float(5.0)));
    }

    #[test]
    fn test_hydrate_builtin_through_table() {
        let sprite = Sprite {
            color: Color::rgb(1.0, 0.0, 0.0),
            ..Sprite::default()
        };
        let component =
            hydrate_foreign(sprite.to_record(), &DeclarationRegistry::new(), false).unwrap();
        assert_eq!(component, Component::Sprite(sprite));
    }

    #[test]
    fn test_hydrate_unknown_key_is_dynamic() {
        let record = ForeignRecord::new("Score").with_field("points", 3);
        let declarations = DeclarationRegistry::new();
        let component = hydrate_foreign(record.clone(), &declarations, false).unwrap();
        assert_eq!(component, Component::Dynamic(record));
    }

    #[test]
    fn test_hydrate_declared_lenient_and_strict() {
        let decl = velocity();
        let mut registry = DeclarationRegistry::new();
        registry.register(&decl);
        let record = ForeignRecord::new("Velocity")
            .with_field("x", 5)
            .with_field("y", "fast");

        let Component::Declared(v) = hydrate_foreign(record.clone(), &registry, false).unwrap()
        else {
            panic!("expected a declared component");
        };
        assert_eq!(v.get("x"), Some(&Value::Float(5.0)));
        assert_eq!(v.get("y"), Some(&Value::Float(0.0)));

        let err = hydrate_foreign(record, &registry, true).unwrap_err();
        assert!(matches!(err, WorldError::Hydration { .. }));
    }

    #[test]
    fn test_strict_hydration_reports_missing_attribute() {
        let decl = velocity();
        let record = ForeignRecord::new("Velocity").with_field("x", 1.0);
        let err = hydrate_declared(&decl, &record, true).unwrap_err();
        assert!(matches!(err, AttributeError::Missing { ref attribute, .. } if attribute == "y"));
    }
}
