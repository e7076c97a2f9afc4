//! Spatial transform.
//!
//! [`Transform`] holds translation, rotation, and per-axis scale. Most scenes
//! are 2D, so the helpers favour rotation about the Z axis, but the storage is
//! a full quaternion and round-trips losslessly.

use glam::{EulerRot, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Translation, rotation, and scale of an entity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Transform {
    /// Position relative to the parent (or the world when unparented).
    pub translation: Vec3,
    /// Rotation as a unit quaternion.
    pub rotation: Quat,
    /// Per-axis scale.
    pub scale: Vec3,
}

impl Transform {
    /// Origin, no rotation, unit scale.
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    /// A transform placed at `(x, y, z)`.
    #[must_use]
    pub fn from_xyz(x: f32, y: f32, z: f32) -> Self {
        Self::from_translation(Vec3::new(x, y, z))
    }

    #[must_use]
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    /// Replace the rotation with `angle` radians about the Z axis.
    #[must_use]
    pub fn with_rotation_z(mut self, angle: f32) -> Self {
        self.rotation = Quat::from_rotation_z(angle);
        self
    }

    #[must_use]
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// The Z component of the rotation expressed as XYZ Euler angles.
    #[must_use]
    pub fn rotation_z(&self) -> f32 {
        let (_, _, z) = self.rotation.to_euler(EulerRot::XYZ);
        z
    }

    /// Move the transform by `offset`.
    #[must_use]
    pub fn translated(mut self, offset: Vec3) -> Self {
        self.translation += offset;
        self
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_transform() {
        let t = Transform::default();
        assert_eq!(t.translation, Vec3::ZERO);
        assert_eq!(t.rotation, Quat::IDENTITY);
        assert_eq!(t.scale, Vec3::ONE);
    }

    #[test]
    fn test_from_xyz() {
        let t = Transform::from_xyz(1.0, 2.0, 3.0);
        assert_eq!(t.translation, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(t.scale, Vec3::ONE);
    }

    #[test]
    fn test_rotation_z_reads_back() {
        let t = Transform::IDENTITY.with_rotation_z(0.5);
        assert!((t.rotation_z() - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_translated() {
        let t = Transform::from_xyz(1.0, 0.0, 0.0).translated(Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(t.translation, Vec3::new(1.0, 2.0, 0.0));
    }

    #[test]
    fn test_msgpack_roundtrip_keeps_full_rotation() {
        let t = Transform::from_xyz(4.0, 5.0, 6.0)
            .with_scale(Vec3::new(2.0, 2.0, 1.0));
        let t = Transform {
            rotation: Quat::from_rotation_x(0.25) * t.rotation,
            ..t
        };
        let bytes = rmp_serde::to_vec(&t).unwrap();
        let restored: Transform = rmp_serde::from_slice(&bytes).unwrap();
        assert_eq!(t, restored);
    }
}
