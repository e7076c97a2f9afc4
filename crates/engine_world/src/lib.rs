//! # engine_world
//!
//! The tiered entity-component world.
//!
//! Components live in one of three tiers, picked by resolving their kind:
//!
//! - the **foreign store** ([`engine_store::ForeignStore`]): built-in
//!   transform / sprite / camera / text components, declared components,
//!   and dynamic records. It also mints every entity id.
//! - the **shape store**: `Mesh::*` components, held locally.
//! - the **hierarchy store**: `Parent` / `Children` links, held locally.
//!
//! [`World`] hides the split: spawn, despawn, insert, remove, get, has, and
//! [`World::query`] behave the same whichever tier a kind lives in.

pub mod auxiliary;
pub mod config;
pub mod directory;
pub mod error;
pub mod hierarchy;
mod hydrate;
pub mod query;
pub mod registry;
pub mod world;

pub use auxiliary::AuxStore;
pub use config::WorldConfig;
pub use directory::EntityDirectory;
pub use error::WorldError;
pub use hierarchy::Relation;
pub use query::{Query, QueryIter, QueryRow};
pub use registry::DeclarationRegistry;
pub use world::World;
