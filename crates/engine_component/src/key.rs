//! Canonical component type keys.
//!
//! A [`TypeKey`] is the single source of truth for which storage slot a
//! component occupies. The same string indexes every tier: the foreign store,
//! the shape store, and the hierarchy store.

use std::borrow::{Borrow, Cow};
use std::fmt;

use serde::{Deserialize, Serialize};

/// The canonical string key of a component kind.
///
/// Built-in keys are borrowed from the static built-in table; declared and
/// dynamic keys are owned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeKey(Cow<'static, str>);

impl TypeKey {
    #[must_use]
    pub const fn from_static(key: &'static str) -> Self {
        Self(Cow::Borrowed(key))
    }

    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(Cow::Owned(key.into()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for TypeKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TypeKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for TypeKey {
    fn from(key: String) -> Self {
        Self::new(key)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn test_static_and_owned_keys_are_equal() {
        assert_eq!(TypeKey::from_static("Transform"), TypeKey::new("Transform"));
    }

    #[test]
    fn test_map_lookup_by_str() {
        let mut map = BTreeMap::new();
        map.insert(TypeKey::new("Velocity"), 1);
        assert_eq!(map.get("Velocity"), Some(&1));
        assert_eq!(map.get("Position"), None);
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let bytes = rmp_serde::to_vec(&TypeKey::new("Health")).unwrap();
        let name: String = rmp_serde::from_slice(&bytes).unwrap();
        assert_eq!(name, "Health");
    }
}
