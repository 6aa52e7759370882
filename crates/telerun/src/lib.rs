//! # telerun
//!
//! A capability-passing remote-object runtime over the telecore data model.
//!
//! ## Architecture
//!
//! Local objects opt into export by implementing [`Context`]; the
//! [`ExportTable`] promotes them into addressable, revocable
//! [`Definition`](telecore::Definition)s on demand. On the consuming side,
//! the [`InterfaceFactory`] turns a `(Definition, Peer)` pair into an
//! [`Interface`] proxy whose members forward to the peer's `get`/`set`
//! primitives, cached so at most one proxy exists per (peer, definition).
//! The marshaller rewrites every value heading toward a peer boundary:
//! proxies become references, exportable objects become fresh definitions,
//! batches recurse element-wise, and everything else passes through
//! untouched.
//!
//! ## Invariants
//!
//! - Proxy construction performs no I/O; the first network activity is the
//!   first member invocation.
//! - Marshalling is synchronous and completes before a call is dispatched.
//! - A revoked definition fails fast with a distinct error; stale handles
//!   never silently hang.

pub mod context;
pub mod error;
pub mod exports;
pub mod factory;
pub mod interface;
pub mod marshal;
pub mod peer;
pub mod runtime;

pub use context::CallError;
pub use context::Context;

pub use error::Error;
pub use error::Result;

pub use exports::ExportTable;
pub use exports::Stub;

pub use factory::InterfaceCache;
pub use factory::InterfaceFactory;

pub use interface::Interface;
pub use interface::Property;

pub use marshal::Inbound;
pub use marshal::Outbound;
pub use marshal::marshal;
pub use marshal::marshal_args;
pub use marshal::resolve;

pub use peer::Peer;

pub use runtime::Runtime;
