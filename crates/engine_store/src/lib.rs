//! # engine_store
//!
//! The foreign component store: the authoritative, entity-indexed store that
//! owns entity id allocation, the foreign built-in components, and every
//! natively backed dynamic component.
//!
//! This crate provides:
//!
//! - [`ForeignStore`]: the synchronous boundary the world talks to.
//! - [`InMemoryStore`]: a backend that marshals every record through
//!   MessagePack, the way a cross-runtime store would.
//! - [`codec`]: MessagePack helpers for records.
//! - [`StoreError`]: failures reported across the boundary.

pub mod codec;
pub mod error;
pub mod memory;
pub mod store;

pub use error::StoreError;
pub use memory::InMemoryStore;
pub use store::ForeignStore;
