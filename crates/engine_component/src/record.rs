//! The raw value shape that crosses the foreign store boundary.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::access::AttributeAccess;
use crate::error::AttributeError;
use crate::key::TypeKey;
use crate::value::Value;

/// A component as the foreign store sees it: a type key and a bag of named
/// fields.
///
/// Records with a key that has no declaration and no built-in meaning are
/// surfaced to callers as dynamic components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForeignRecord {
    key: TypeKey,
    fields: BTreeMap<String, Value>,
}

impl ForeignRecord {
    #[must_use]
    pub fn new(key: impl Into<TypeKey>) -> Self {
        Self {
            key: key.into(),
            fields: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_fields(mut self, fields: BTreeMap<String, Value>) -> Self {
        self.fields.extend(fields);
        self
    }

    #[must_use]
    pub fn key(&self) -> &TypeKey {
        &self.key
    }

    #[must_use]
    pub fn fields(&self) -> &BTreeMap<String, Value> {
        &self.fields
    }

    #[must_use]
    pub fn into_fields(self) -> BTreeMap<String, Value> {
        self.fields
    }

    /// Look up a field that must be present.
    ///
    /// # Errors
    ///
    /// Returns [`AttributeError::Missing`] when the field is absent.
    pub fn require(&self, name: &str) -> Result<&Value, AttributeError> {
        self.fields.get(name).ok_or_else(|| AttributeError::Missing {
            component: self.key.to_string(),
            attribute: name.to_string(),
        })
    }
}

impl AttributeAccess for ForeignRecord {
    fn type_key(&self) -> &TypeKey {
        &self.key
    }

    fn attribute_names(&self) -> Vec<&str> {
        self.fields.keys().map(String::as_str).collect()
    }

    fn get_attr(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    fn set_attr(&mut self, name: &str, value: Value) -> Result<(), AttributeError> {
        self.fields.insert(name.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_attr_accepts_any_field() {
        let mut record = ForeignRecord::new("Score");
        record.set_attr("points", Value::Int(10)).unwrap();
        record.set_attr("label", "high".into()).unwrap();
        assert_eq!(record.get_attr("points"), Some(&Value::Int(10)));
        assert_eq!(record.attribute_names(), vec!["label", "points"]);
    }

    #[test]
    fn test_require_reports_missing_field() {
        let record = ForeignRecord::new("Score");
        assert_eq!(
            record.require("points"),
            Err(AttributeError::Missing {
                component: "Score".into(),
                attribute: "points".into(),
            })
        );
    }
}
