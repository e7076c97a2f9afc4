//! Field encodings of the foreign built-in components.
//!
//! The foreign store only understands [`ForeignRecord`]s. Each foreign
//! built-in implements [`FieldCodec`] to flatten itself into named fields and
//! to rebuild itself from a record read back across the boundary.

use std::collections::BTreeMap;

use engine_math::Transform;

use crate::builtin::Builtin;
use crate::component::{Camera2d, Sprite, Text2d};
use crate::error::AttributeError;
use crate::key::TypeKey;
use crate::record::ForeignRecord;
use crate::value::{ScalarType, Value};

pub trait FieldCodec: Sized {
    const BUILTIN: Builtin;

    fn to_fields(&self) -> BTreeMap<String, Value>;

    /// # Errors
    ///
    /// Returns [`AttributeError`] when a required field is missing or has the
    /// wrong type.
    fn from_record(record: &ForeignRecord) -> Result<Self, AttributeError>;

    fn to_record(&self) -> ForeignRecord {
        ForeignRecord::new(TypeKey::from_static(Self::BUILTIN.key())).with_fields(self.to_fields())
    }
}

fn read<T>(
    record: &ForeignRecord,
    name: &str,
    expected: ScalarType,
    get: impl Fn(&Value) -> Option<T>,
) -> Result<T, AttributeError> {
    let value = record.require(name)?;
    get(value).ok_or_else(|| AttributeError::TypeMismatch {
        component: record.key().to_string(),
        attribute: name.to_string(),
        expected,
        found: value.type_name(),
    })
}

fn fields<const N: usize>(pairs: [(&str, Value); N]) -> BTreeMap<String, Value> {
    pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}

impl FieldCodec for Transform {
    const BUILTIN: Builtin = Builtin::Transform;

    fn to_fields(&self) -> BTreeMap<String, Value> {
        fields([
            ("translation", self.translation.into()),
            ("rotation", self.rotation.into()),
            ("scale", self.scale.into()),
        ])
    }

    fn from_record(record: &ForeignRecord) -> Result<Self, AttributeError> {
        Ok(Transform {
            translation: read(record, "translation", ScalarType::Vec3, Value::as_vec3)?,
            rotation: read(record, "rotation", ScalarType::Quat, Value::as_quat)?,
            scale: read(record, "scale", ScalarType::Vec3, Value::as_vec3)?,
        })
    }
}

impl FieldCodec for Sprite {
    const BUILTIN: Builtin = Builtin::Sprite;

    fn to_fields(&self) -> BTreeMap<String, Value> {
        fields([
            ("color", self.color.into()),
            ("custom_size", self.custom_size.map_or(Value::Nil, Value::from)),
            ("flip_x", self.flip_x.into()),
            ("flip_y", self.flip_y.into()),
        ])
    }

    fn from_record(record: &ForeignRecord) -> Result<Self, AttributeError> {
        let custom_size = match record.fields().get("custom_size") {
            None | Some(Value::Nil) => None,
            Some(_) => Some(read(record, "custom_size", ScalarType::Vec2, Value::as_vec2)?),
        };
        Ok(Sprite {
            color: read(record, "color", ScalarType::Color, Value::as_color)?,
            custom_size,
            flip_x: read(record, "flip_x", ScalarType::Boolean, Value::as_bool)?,
            flip_y: read(record, "flip_y", ScalarType::Boolean, Value::as_bool)?,
        })
    }
}

impl FieldCodec for Camera2d {
    const BUILTIN: Builtin = Builtin::Camera2d;

    fn to_fields(&self) -> BTreeMap<String, Value> {
        fields([("order", self.order.into()), ("scale", self.scale.into())])
    }

    fn from_record(record: &ForeignRecord) -> Result<Self, AttributeError> {
        Ok(Camera2d {
            order: read(record, "order", ScalarType::Integer, Value::as_i64)?,
            scale: read(record, "scale", ScalarType::Float, Value::as_f64)? as f32,
        })
    }
}

impl FieldCodec for Text2d {
    const BUILTIN: Builtin = Builtin::Text2d;

    fn to_fields(&self) -> BTreeMap<String, Value> {
        fields([
            ("text", self.text.as_str().into()),
            ("font_size", self.font_size.into()),
            ("color", self.color.into()),
        ])
    }

    fn from_record(record: &ForeignRecord) -> Result<Self, AttributeError> {
        Ok(Text2d {
            text: read(record, "text", ScalarType::String, |v| v.as_str().map(str::to_string))?,
            font_size: read(record, "font_size", ScalarType::Float, Value::as_f64)? as f32,
            color: read(record, "color", ScalarType::Color, Value::as_color)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use engine_math::{Color, Vec2};

    use super::*;

    #[test]
    fn test_transform_record_uses_builtin_key() {
        let record = Transform::from_xyz(1.0, 2.0, 3.0).to_record();
        assert_eq!(record.key().as_str(), "Transform");
        assert_eq!(Transform::from_record(&record).unwrap(), Transform::from_xyz(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_sprite_optional_size() {
        let sized = Sprite {
            custom_size: Some(Vec2::new(16.0, 32.0)),
            ..Sprite::default()
        };
        assert_eq!(Sprite::from_record(&sized.to_record()).unwrap(), sized);

        let unsized_sprite = Sprite::default();
        assert_eq!(Sprite::from_record(&unsized_sprite.to_record()).unwrap(), unsized_sprite);
    }

    #[test]
    fn test_missing_field_is_reported() {
        let record = ForeignRecord::new("Camera2d").with_field("order", 1);
        let err = Camera2d::from_record(&record).unwrap_err();
        assert_eq!(
            err,
            AttributeError::Missing {
                component: "Camera2d".into(),
                attribute: "scale".into(),
            }
        );
    }

    #[test]
    fn test_mistyped_field_is_reported() {
        let record = Text2d::new("hi")
            .to_record()
            .with_field("color", "red");
        assert!(matches!(
            Text2d::from_record(&record),
            Err(AttributeError::TypeMismatch { expected: ScalarType::Color, .. })
        ));
    }

    #[test]
    fn test_text_reads_integer_font_size() {
        let record = ForeignRecord::new("Text2d")
            .with_field("text", "score")
            .with_field("font_size", 18)
            .with_field("color", Color::BLACK);
        assert_eq!(Text2d::from_record(&record).unwrap().font_size, 18.0);
    }
}
