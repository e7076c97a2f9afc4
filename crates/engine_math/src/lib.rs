//! # engine_math
//!
//! Math primitives for the engine's world model. Re-exports [`glam`] for
//! linear algebra and defines the small value types that built-in components
//! wrap: [`Transform`] and [`Color`].

pub mod color;
pub mod transform;

// Re-export glam types for convenience.
pub use glam::{EulerRot, Quat, Vec2, Vec3, Vec4};

pub use color::Color;
pub use transform::Transform;
