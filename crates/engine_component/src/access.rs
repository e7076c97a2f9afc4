//! The field-access capability shared by every field-addressed component.

use crate::error::AttributeError;
use crate::key::TypeKey;
use crate::value::Value;

/// Read and write attributes by name.
///
/// Implemented by [`DeclaredComponent`](crate::DeclaredComponent), which
/// type-checks writes against its schema, and by
/// [`ForeignRecord`](crate::ForeignRecord), which accepts any field. Hydration
/// copies fields from one implementor to the other without knowing which
/// concrete types are involved.
pub trait AttributeAccess {
    fn type_key(&self) -> &TypeKey;

    fn attribute_names(&self) -> Vec<&str>;

    fn get_attr(&self, name: &str) -> Option<&Value>;

    /// # Errors
    ///
    /// Implementors with a fixed schema reject unknown names and values of the
    /// wrong type.
    fn set_attr(&mut self, name: &str, value: Value) -> Result<(), AttributeError>;
}
