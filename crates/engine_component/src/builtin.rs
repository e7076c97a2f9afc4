//! Built-in component kinds and the storage tier each one lives in.
//!
//! [`BUILTINS`] is the only place a built-in kind is tied to its key and
//! tier. Adding a new shape or hierarchy component is one enum variant plus
//! one table row.

use serde::{Deserialize, Serialize};

/// Prefix reserved for shape-tier keys. A name under this prefix that is not
/// in [`BUILTINS`] cannot be resolved.
pub const SHAPE_NAMESPACE: &str = "Mesh::";

/// The storage backend that owns a component kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tier {
    /// The opaque, entity-indexed store reached through the foreign boundary.
    Foreign,
    /// Locally owned shape / mesh components.
    Shape,
    /// Locally owned scene-graph components.
    Hierarchy,
}

impl Tier {
    /// Returns `true` for the locally owned tiers.
    #[must_use]
    pub const fn is_auxiliary(self) -> bool {
        !matches!(self, Tier::Foreign)
    }
}

/// Every component kind the engine knows about natively.
///
/// Discriminants index [`BUILTINS`]; keep the two in the same order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Builtin {
    Transform,
    Sprite,
    Camera2d,
    Text2d,
    Rectangle,
    Circle,
    RegularPolygon,
    Line,
    Ellipse,
    Parent,
    Children,
}

/// One row of the built-in table.
#[derive(Debug)]
pub struct BuiltinEntry {
    pub builtin: Builtin,
    pub key: &'static str,
    pub tier: Tier,
}

pub const BUILTINS: &[BuiltinEntry] = &[
    BuiltinEntry {
        builtin: Builtin::Transform,
        key: "Transform",
        tier: Tier::Foreign,
    },
    BuiltinEntry {
        builtin: Builtin::Sprite,
        key: "Sprite",
        tier: Tier::Foreign,
    },
    BuiltinEntry {
        builtin: Builtin::Camera2d,
        key: "Camera2d",
        tier: Tier::Foreign,
    },
    BuiltinEntry {
        builtin: Builtin::Text2d,
        key: "Text2d",
        tier: Tier::Foreign,
    },
    BuiltinEntry {
        builtin: Builtin::Rectangle,
        key: "Mesh::Rectangle",
        tier: Tier::Shape,
    },
    BuiltinEntry {
        builtin: Builtin::Circle,
        key: "Mesh::Circle",
        tier: Tier::Shape,
    },
    BuiltinEntry {
        builtin: Builtin::RegularPolygon,
        key: "Mesh::RegularPolygon",
        tier: Tier::Shape,
    },
    BuiltinEntry {
        builtin: Builtin::Line,
        key: "Mesh::Line",
        tier: Tier::Shape,
    },
    BuiltinEntry {
        builtin: Builtin::Ellipse,
        key: "Mesh::Ellipse",
        tier: Tier::Shape,
    },
    BuiltinEntry {
        builtin: Builtin::Parent,
        key: "Parent",
        tier: Tier::Hierarchy,
    },
    BuiltinEntry {
        builtin: Builtin::Children,
        key: "Children",
        tier: Tier::Hierarchy,
    },
];

impl Builtin {
    #[must_use]
    pub fn entry(self) -> &'static BuiltinEntry {
        &BUILTINS[self as usize]
    }

    #[must_use]
    pub fn key(self) -> &'static str {
        self.entry().key
    }

    #[must_use]
    pub fn tier(self) -> Tier {
        self.entry().tier
    }

    /// Find the built-in registered under `key`, if any.
    #[must_use]
    pub fn lookup(key: &str) -> Option<&'static BuiltinEntry> {
        BUILTINS.iter().find(|entry| entry.key == key)
    }
}
