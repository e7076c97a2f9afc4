//! # engine_component
//!
//! The "C" in ECS: what a component is, how its kind is named, and which
//! storage tier it belongs to.
//!
//! This crate provides:
//!
//! - [`Entity`] / [`EntityAllocator`]: `u64` handles and their allocator.
//! - [`TypeKey`]: the canonical string key of a component kind.
//! - [`Builtin`] / [`BUILTINS`]: the static table of built-in kinds and tiers.
//! - [`resolve`] / [`ComponentKind`]: the type key resolver.
//! - [`Value`] / [`ScalarType`]: dynamically typed attribute values.
//! - [`ComponentDecl`] / [`DeclaredComponent`]: user-declared schemas and instances.
//! - [`ForeignRecord`]: the field-addressed form that crosses the foreign boundary.
//! - [`Component`]: the unified, hydrated component value.

pub mod access;
pub mod builtin;
pub mod codec;
pub mod component;
pub mod declared;
pub mod entity;
pub mod error;
pub mod key;
pub mod record;
pub mod resolve;
pub mod value;

pub use access::AttributeAccess;
pub use builtin::{BUILTINS, Builtin, BuiltinEntry, SHAPE_NAMESPACE, Tier};
pub use codec::FieldCodec;
pub use component::{Camera2d, Children, Component, Mesh, Parent, Shape, Sprite, Text2d};
pub use declared::{AttributeDecl, ComponentDecl, ComponentDeclBuilder, DeclaredComponent};
pub use entity::{Entity, EntityAllocator};
pub use error::{AttributeError, ResolveError};
pub use key::TypeKey;
pub use record::ForeignRecord;
pub use resolve::{AsDescriptor, Classification, ComponentKind, Descriptor, classify, resolve};
pub use value::{ScalarType, Value};
