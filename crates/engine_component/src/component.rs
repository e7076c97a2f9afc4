//! The unified component value and the built-in component payloads.
//!
//! [`Component`] is a closed union over every shape a component can take once
//! hydrated: foreign built-ins, derived built-ins (shapes and hierarchy
//! links), declared components, and dynamic records. Which tier a value is
//! routed to is decided by resolving its [`Descriptor`], never by inspecting
//! the payload.

use engine_math::{Color, Transform, Vec2};
use serde::{Deserialize, Serialize};

use crate::builtin::Builtin;
use crate::declared::DeclaredComponent;
use crate::entity::Entity;
use crate::record::ForeignRecord;
use crate::resolve::{AsDescriptor, Descriptor};

/// A 2D sprite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sprite {
    pub color: Color,
    /// Overrides the image size when set.
    pub custom_size: Option<Vec2>,
    pub flip_x: bool,
    pub flip_y: bool,
}

impl Default for Sprite {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            custom_size: None,
            flip_x: false,
            flip_y: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera2d {
    /// Cameras render in ascending order.
    pub order: i64,
    /// Orthographic projection scale.
    pub scale: f32,
}

impl Default for Camera2d {
    fn default() -> Self {
        Self { order: 0, scale: 1.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text2d {
    pub text: String,
    pub font_size: f32,
    pub color: Color,
}

impl Text2d {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            font_size: 24.0,
            color: Color::WHITE,
        }
    }
}

/// Geometry of a shape component. Each variant is its own component kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Rectangle { width: f32, height: f32 },
    Circle { radius: f32 },
    RegularPolygon { radius: f32, sides: u32 },
    Line { start: Vec2, end: Vec2, thickness: f32 },
    Ellipse { half_width: f32, half_height: f32 },
}

impl Shape {
    #[must_use]
    pub fn builtin(&self) -> Builtin {
        match self {
            Shape::Rectangle { .. } => Builtin::Rectangle,
            Shape::Circle { .. } => Builtin::Circle,
            Shape::RegularPolygon { .. } => Builtin::RegularPolygon,
            Shape::Line { .. } => Builtin::Line,
            Shape::Ellipse { .. } => Builtin::Ellipse,
        }
    }
}

/// A shape plus how to draw it. Lives in the shape tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    pub shape: Shape,
    pub color: Color,
    pub fill: bool,
}

impl Mesh {
    #[must_use]
    pub fn new(shape: Shape) -> Self {
        Self {
            shape,
            color: Color::WHITE,
            fill: true,
        }
    }

    #[must_use]
    pub fn rectangle(width: f32, height: f32) -> Self {
        Self::new(Shape::Rectangle { width, height })
    }

    #[must_use]
    pub fn circle(radius: f32) -> Self {
        Self::new(Shape::Circle { radius })
    }

    #[must_use]
    pub fn regular_polygon(radius: f32, sides: u32) -> Self {
        Self::new(Shape::RegularPolygon { radius, sides })
    }

    #[must_use]
    pub fn line(start: Vec2, end: Vec2, thickness: f32) -> Self {
        Self::new(Shape::Line { start, end, thickness })
    }

    #[must_use]
    pub fn ellipse(half_width: f32, half_height: f32) -> Self {
        Self::new(Shape::Ellipse { half_width, half_height })
    }

    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Draw the outline only.
    #[must_use]
    pub fn outlined(mut self) -> Self {
        self.fill = false;
        self
    }

    #[must_use]
    pub fn builtin(&self) -> Builtin {
        self.shape.builtin()
    }
}

/// Scene-graph link from a child to its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parent(pub Entity);

/// Scene-graph links from a parent to its children, in attachment order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Children(pub Vec<Entity>);

impl Children {
    #[must_use]
    pub fn contains(&self, entity: Entity) -> bool {
        self.0.contains(&entity)
    }

    /// Append `entity` unless it is already present.
    pub fn push(&mut self, entity: Entity) {
        if !self.contains(entity) {
            self.0.push(entity);
        }
    }

    /// Returns `true` if `entity` was present.
    pub fn remove(&mut self, entity: Entity) -> bool {
        let before = self.0.len();
        self.0.retain(|&e| e != entity);
        self.0.len() != before
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Entity> + '_ {
        self.0.iter().copied()
    }
}

/// Any component value, hydrated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Component {
    Transform(Transform),
    Sprite(Sprite),
    Camera2d(Camera2d),
    Text2d(Text2d),
    Mesh(Mesh),
    Parent(Parent),
    Children(Children),
    Declared(DeclaredComponent),
    /// A natively backed component with no declaration on record.
    Dynamic(ForeignRecord),
}

impl AsDescriptor for Component {
    fn as_descriptor(&self) -> Descriptor<'_> {
        match self {
            Component::Transform(_) => Descriptor::Builtin(Builtin::Transform),
            Component::Sprite(_) => Descriptor::Builtin(Builtin::Sprite),
            Component::Camera2d(_) => Descriptor::Builtin(Builtin::Camera2d),
            Component::Text2d(_) => Descriptor::Builtin(Builtin::Text2d),
            Component::Mesh(mesh) => Descriptor::Builtin(mesh.builtin()),
            Component::Parent(_) => Descriptor::Builtin(Builtin::Parent),
            Component::Children(_) => Descriptor::Builtin(Builtin::Children),
            Component::Declared(declared) => Descriptor::Declared(declared.declaration()),
            Component::Dynamic(record) => Descriptor::Name(record.key().as_str()),
        }
    }
}

macro_rules! impl_from_for_component {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Component {
                fn from(v: $ty) -> Self {
                    Component::$variant(v)
                }
            }
        )*
    };
}

impl_from_for_component! {
    Transform => Transform,
    Sprite => Sprite,
    Camera2d => Camera2d,
    Text2d => Text2d,
    Mesh => Mesh,
    Parent => Parent,
    Children => Children,
    DeclaredComponent => Declared,
    ForeignRecord => Dynamic,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::Tier;
    use crate::resolve::ComponentKind;

    #[test]
    fn test_each_shape_is_its_own_kind() {
        assert_eq!(Mesh::circle(1.0).builtin(), Builtin::Circle);
        assert_eq!(Mesh::rectangle(1.0, 2.0).builtin(), Builtin::Rectangle);
        assert_eq!(
            Component::from(Mesh::ellipse(1.0, 2.0)).resolve().unwrap(),
            ComponentKind::Derived(Builtin::Ellipse)
        );
    }

    #[test]
    fn test_component_tiers() {
        let tier = |c: Component| c.resolve().unwrap().tier();
        assert_eq!(tier(Transform::IDENTITY.into()), Tier::Foreign);
        assert_eq!(tier(Mesh::circle(3.0).into()), Tier::Shape);
        assert_eq!(tier(Parent(Entity(1)).into()), Tier::Hierarchy);
        assert_eq!(tier(ForeignRecord::new("Score").into()), Tier::Foreign);
    }

    #[test]
    fn test_children_push_is_idempotent() {
        let mut children = Children::default();
        children.push(Entity(2));
        children.push(Entity(2));
        children.push(Entity(3));
        assert_eq!(children.0, vec![Entity(2), Entity(3)]);
        assert!(children.remove(Entity(2)));
        assert!(!children.remove(Entity(2)));
    }
}
