//! The type key resolver.
//!
//! Resolution happens in two steps. [`classify`] sorts a [`Descriptor`] into
//! exactly one of {foreign built-in, derived built-in, declared, raw name}
//! using the static built-in table. [`ComponentKind::from`] then produces the
//! canonical key and tier. Both steps are pure functions of the descriptor.

use std::fmt;
use std::sync::Arc;

use crate::builtin::{Builtin, SHAPE_NAMESPACE, Tier};
use crate::declared::ComponentDecl;
use crate::error::ResolveError;
use crate::key::TypeKey;

/// Anything a caller may pass where a component kind is expected.
#[derive(Debug, Clone, Copy)]
pub enum Descriptor<'a> {
    Builtin(Builtin),
    Declared(&'a ComponentDecl),
    Name(&'a str),
}

/// The class a descriptor falls into, before a key is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification<'a> {
    ForeignBuiltin(Builtin),
    DerivedBuiltin(Builtin),
    Declared(&'a TypeKey),
    Raw(&'a str),
}

/// A resolved component kind: its canonical key plus the tier that owns it.
///
/// Declared and dynamic kinds are natively backed, so they live in the
/// foreign tier alongside the foreign built-ins.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    Foreign(Builtin),
    Derived(Builtin),
    Declared(TypeKey),
    Dynamic(TypeKey),
}

impl ComponentKind {
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            ComponentKind::Foreign(b) | ComponentKind::Derived(b) => b.key(),
            ComponentKind::Declared(key) | ComponentKind::Dynamic(key) => key.as_str(),
        }
    }

    #[must_use]
    pub fn type_key(&self) -> TypeKey {
        match self {
            ComponentKind::Foreign(b) | ComponentKind::Derived(b) => TypeKey::from_static(b.key()),
            ComponentKind::Declared(key) | ComponentKind::Dynamic(key) => key.clone(),
        }
    }

    #[must_use]
    pub fn tier(&self) -> Tier {
        match self {
            ComponentKind::Derived(b) => b.tier(),
            ComponentKind::Foreign(_) | ComponentKind::Declared(_) | ComponentKind::Dynamic(_) => {
                Tier::Foreign
            }
        }
    }

    #[must_use]
    pub fn builtin(&self) -> Option<Builtin> {
        match self {
            ComponentKind::Foreign(b) | ComponentKind::Derived(b) => Some(*b),
            ComponentKind::Declared(_) | ComponentKind::Dynamic(_) => None,
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl From<Classification<'_>> for ComponentKind {
    fn from(class: Classification<'_>) -> Self {
        match class {
            Classification::ForeignBuiltin(b) => ComponentKind::Foreign(b),
            Classification::DerivedBuiltin(b) => ComponentKind::Derived(b),
            Classification::Declared(key) => ComponentKind::Declared(key.clone()),
            Classification::Raw(name) => ComponentKind::Dynamic(TypeKey::new(name)),
        }
    }
}

/// Classify a descriptor without producing its key.
///
/// # Errors
///
/// Returns [`ResolveError`] for malformed names, names in the reserved shape
/// namespace that are not built-in shapes, and declarations that claim a
/// built-in key.
pub fn classify<'a>(descriptor: Descriptor<'a>) -> Result<Classification<'a>, ResolveError> {
    match descriptor {
        Descriptor::Builtin(b) => Ok(classify_builtin(b)),
        Descriptor::Declared(decl) => {
            validate_user_key(decl.name())?;
            Ok(Classification::Declared(decl.key()))
        }
        Descriptor::Name(name) => {
            validate_name(name)?;
            if let Some(entry) = Builtin::lookup(name) {
                return Ok(classify_builtin(entry.builtin));
            }
            if name.starts_with(SHAPE_NAMESPACE) {
                return Err(ResolveError::UnknownShape(name.to_string()));
            }
            Ok(Classification::Raw(name))
        }
    }
}

/// Resolve a descriptor to its component kind.
///
/// # Errors
///
/// See [`classify`].
pub fn resolve(descriptor: Descriptor<'_>) -> Result<ComponentKind, ResolveError> {
    classify(descriptor).map(ComponentKind::from)
}

fn classify_builtin(b: Builtin) -> Classification<'static> {
    if b.tier().is_auxiliary() {
        Classification::DerivedBuiltin(b)
    } else {
        Classification::ForeignBuiltin(b)
    }
}

/// Names are identifiers, optionally `::`-qualified.
///
/// # Errors
///
/// [`ResolveError::EmptyName`] for an empty name and
/// [`ResolveError::InvalidName`] for anything else that is not an identifier.
pub fn validate_name(name: &str) -> Result<(), ResolveError> {
    let mut chars = name.chars();
    let first = chars.next().ok_or(ResolveError::EmptyName)?;
    let valid = (first.is_alphabetic() || first == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == ':');
    if valid {
        Ok(())
    } else {
        Err(ResolveError::InvalidName(name.to_string()))
    }
}

/// A name that user code may claim for a declared or dynamic component.
///
/// # Errors
///
/// Everything [`validate_name`] rejects, plus [`ResolveError::BuiltinKey`]
/// for a built-in key or any name in the shape namespace.
pub fn validate_user_key(name: &str) -> Result<(), ResolveError> {
    validate_name(name)?;
    if Builtin::lookup(name).is_some() || name.starts_with(SHAPE_NAMESPACE) {
        return Err(ResolveError::BuiltinKey(name.to_string()));
    }
    Ok(())
}

/// Conversion into a [`Descriptor`].
pub trait AsDescriptor {
    fn as_descriptor(&self) -> Descriptor<'_>;

    /// # Errors
    ///
    /// See [`classify`].
    fn resolve(&self) -> Result<ComponentKind, ResolveError> {
        resolve(self.as_descriptor())
    }
}

impl AsDescriptor for Descriptor<'_> {
    fn as_descriptor(&self) -> Descriptor<'_> {
        *self
    }
}

impl AsDescriptor for Builtin {
    fn as_descriptor(&self) -> Descriptor<'_> {
        Descriptor::Builtin(*self)
    }
}

impl AsDescriptor for str {
    fn as_descriptor(&self) -> Descriptor<'_> {
        Descriptor::Name(self)
    }
}

impl AsDescriptor for String {
    fn as_descriptor(&self) -> Descriptor<'_> {
        Descriptor::Name(self)
    }
}

impl AsDescriptor for TypeKey {
    fn as_descriptor(&self) -> Descriptor<'_> {
        Descriptor::Name(self.as_str())
    }
}

impl AsDescriptor for ComponentDecl {
    fn as_descriptor(&self) -> Descriptor<'_> {
        Descriptor::Declared(self)
    }
}

impl AsDescriptor for Arc<ComponentDecl> {
    fn as_descriptor(&self) -> Descriptor<'_> {
        Descriptor::Declared(self)
    }
}

impl<T: AsDescriptor + ?Sized> AsDescriptor for &T {
    fn as_descriptor(&self) -> Descriptor<'_> {
        (**self).as_descriptor()
    }
}

impl From<Builtin> for Descriptor<'_> {
    fn from(b: Builtin) -> Self {
        Descriptor::Builtin(b)
    }
}

impl<'a> From<&'a str> for Descriptor<'a> {
    fn from(name: &'a str) -> Self {
        Descriptor::Name(name)
    }
}

impl<'a> From<&'a ComponentDecl> for Descriptor<'a> {
    fn from(decl: &'a ComponentDecl) -> Self {
        Descriptor::Declared(decl)
    }
}

impl<'a> From<&'a Arc<ComponentDecl>> for Descriptor<'a> {
    fn from(decl: &'a Arc<ComponentDecl>) -> Self {
        Descriptor::Declared(decl)
    }
}
