//! # telecore
//!
//! The wire-level data model for the telerun remote-object layer.
//!
//! ## Architecture
//!
//! Remote objects are described, not shipped. A [`Definition`] is the
//! serializable shape of an exported object (stable id, owning peer,
//! member metadata), a [`Reference`] is a bare handle standing in for an
//! already-known definition, and [`Value`] is the sum type everything on
//! the wire is expressed in. [`Schema`] is the member metadata a local
//! type declares when it opts into being exportable.
//!
//! This crate is pure data: no async, no I/O, no registries. The runtime
//! half (proxies, marshalling, export tables) lives in `telerun`.

pub mod definition;
pub mod schema;
pub mod value;

pub use definition::DefId;
pub use definition::Definition;
pub use definition::PeerId;
pub use definition::Reference;

pub use schema::Member;
pub use schema::Schema;
pub use schema::SchemaBuilder;

pub use value::Value;

#[cfg(test)]
mod tests;
