//! Attribute values exchanged through the field-access protocol.

use engine_math::{Color, Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::entity::Entity;

/// The scalar type tag a declared attribute is constrained to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScalarType {
    Integer,
    Float,
    Boolean,
    String,
    Vec2,
    Vec3,
    Quat,
    Color,
    Entity,
}

impl ScalarType {
    /// The zero value of this type, used when a declaration omits a default.
    #[must_use]
    pub fn zero(self) -> Value {
        match self {
            ScalarType::Integer => Value::Int(0),
            ScalarType::Float => Value::Float(0.0),
            ScalarType::Boolean => Value::Bool(false),
            ScalarType::String => Value::Str(String::new()),
            ScalarType::Vec2 => Value::Vec2(Vec2::ZERO),
            ScalarType::Vec3 => Value::Vec3(Vec3::ZERO),
            ScalarType::Quat => Value::Quat(Quat::IDENTITY),
            ScalarType::Color => Value::Color(Color::WHITE),
            ScalarType::Entity => Value::Entity(Entity::INVALID),
        }
    }
}

/// A dynamically typed attribute or field value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Vec2(Vec2),
    Vec3(Vec3),
    Quat(Quat),
    Color(Color),
    Entity(Entity),
    List(Vec<Value>),
}

impl Value {
    /// Short type name used in error messages.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "bool",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::Vec2(_) => "vec2",
            Value::Vec3(_) => "vec3",
            Value::Quat(_) => "quat",
            Value::Color(_) => "color",
            Value::Entity(_) => "entity",
            Value::List(_) => "list",
        }
    }

    /// The scalar tag of this value, or `None` for `Nil` and lists.
    #[must_use]
    pub fn scalar_type(&self) -> Option<ScalarType> {
        Some(match self {
            Value::Bool(_) => ScalarType::Boolean,
            Value::Int(_) => ScalarType::Integer,
            Value::Float(_) => ScalarType::Float,
            Value::Str(_) => ScalarType::String,
            Value::Vec2(_) => ScalarType::Vec2,
            Value::Vec3(_) => ScalarType::Vec3,
            Value::Quat(_) => ScalarType::Quat,
            Value::Color(_) => ScalarType::Color,
            Value::Entity(_) => ScalarType::Entity,
            Value::Nil | Value::List(_) => return None,
        })
    }

    /// Convert to `ty`, widening integers to floats. Hands the value back
    /// unchanged when it cannot be represented as `ty`.
    pub fn coerce(self, ty: ScalarType) -> Result<Value, Value> {
        match (self, ty) {
            (Value::Int(i), ScalarType::Float) => Ok(Value::Float(i as f64)),
            (value, ty) if value.scalar_type() == Some(ty) => Ok(value),
            (value, _) => Err(value),
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Reads floats and integers alike.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_vec2(&self) -> Option<Vec2> {
        match self {
            Value::Vec2(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_vec3(&self) -> Option<Vec3> {
        match self {
            Value::Vec3(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_quat(&self) -> Option<Quat> {
        match self {
            Value::Quat(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_color(&self) -> Option<Color> {
        match self {
            Value::Color(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_entity(&self) -> Option<Entity> {
        match self {
            Value::Entity(v) => Some(*v),
            _ => None,
        }
    }
}

macro_rules! impl_from_for_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v.into())
                }
            }
        )*
    };
}

impl_from_for_value! {
    bool => Bool,
    i32 => Int,
    i64 => Int,
    u32 => Int,
    f32 => Float,
    f64 => Float,
    String => Str,
    &str => Str,
    Vec2 => Vec2,
    Vec3 => Vec3,
    Quat => Quat,
    Color => Color,
    Entity => Entity,
    Vec<Value> => List,
}
