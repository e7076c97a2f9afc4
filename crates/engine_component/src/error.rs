//! Errors raised while classifying descriptors and manipulating attributes.

use crate::value::ScalarType;

/// A component descriptor could not be mapped to a type key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("component name is empty")]
    EmptyName,

    #[error("'{0}' is not a valid component name")]
    InvalidName(String),

    /// The name sits in the reserved shape namespace but names no built-in shape.
    #[error("'{0}' is not a built-in shape")]
    UnknownShape(String),

    /// A declared or dynamic component tried to claim a built-in key.
    #[error("'{0}' is reserved for a built-in component")]
    BuiltinKey(String),
}

/// A declared schema or a field-addressed value was used inconsistently.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AttributeError {
    #[error("invalid declaration: {0}")]
    InvalidDeclaration(#[from] ResolveError),

    #[error("component '{component}' declares attribute '{attribute}' more than once")]
    Duplicate { component: String, attribute: String },

    #[error("component '{component}' has no attribute '{attribute}'")]
    Unknown { component: String, attribute: String },

    #[error("component '{component}' is missing attribute '{attribute}'")]
    Missing { component: String, attribute: String },

    #[error("attribute '{attribute}' of '{component}' expects {expected:?}, got {found}")]
    TypeMismatch {
        component: String,
        attribute: String,
        expected: ScalarType,
        found: &'static str,
    },
}
