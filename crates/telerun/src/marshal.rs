//! # Marshalling
//!
//! Translates capability-bearing values at the boundary, in both directions.
//! Outbound, an [`Interface`] collapses to the [`Reference`] it proxies and
//! a [`Context`] is exported to the destination peer as a fresh
//! [`Definition`]. Inbound, a definition becomes a proxy and a reference
//! resolves against what is already known.
//!
//! ## Invariants
//!
//! - Shallow only. Capabilities are translated at the top level (and
//!   element-wise inside a [`Outbound::Batch`]); a capability buried inside
//!   a list or map crosses as plain data, untouched.
//! - Outbound marshalling is synchronous and infallible. No I/O happens
//!   here; exporting is a table insert.
//! - Plain values pass through without copying or coercion.

use std::sync::Arc;

use telecore::DefId;
use telecore::PeerId;
use telecore::Value;

use crate::context::Context;
use crate::error::Error;
use crate::error::Result;
use crate::exports::ExportTable;
use crate::factory::InterfaceFactory;
use crate::interface::Interface;
use crate::peer::Peer;

/// A value about to cross to a peer, with capabilities still explicit.
pub enum Outbound {
    /// Plain data, passed through untouched.
    Value(Value),
    /// A proxy going back where it can be named by reference.
    Interface(Interface),
    /// A live local object, exported on the way out.
    Context(Arc<dyn Context>),
    /// An ordered batch, marshalled element-wise.
    Batch(Vec<Outbound>),
}

impl From<Value> for Outbound {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<Interface> for Outbound {
    fn from(iface: Interface) -> Self {
        Self::Interface(iface)
    }
}

impl From<Arc<dyn Context>> for Outbound {
    fn from(instance: Arc<dyn Context>) -> Self {
        Self::Context(instance)
    }
}

/// A value that arrived from a peer, with capabilities resolved.
pub enum Inbound {
    /// Plain data.
    Value(Value),
    /// A definition arrived; this proxy now fronts it.
    Interface(Interface),
    /// A reference arrived that names an object this side exported.
    Local(Arc<dyn Context>),
    /// An ordered batch, resolved element-wise.
    Batch(Vec<Inbound>),
}

/// Marshals one outbound value for `dest`.
pub fn marshal(exports: &ExportTable, dest: &PeerId, value: Outbound) -> Value {
    match value {
        Outbound::Value(v) => v,
        Outbound::Interface(iface) => Value::Reference(iface.definition().reference()),
        Outbound::Context(instance) => Value::Definition(Box::new(exports.export(dest, instance))),
        Outbound::Batch(items) => Value::Definitions(
            items
                .into_iter()
                .map(|item| marshal(exports, dest, item))
                .collect(),
        ),
    }
}

/// Marshals an outbound result whose exported capabilities hang off
/// `parent` for cascaded revocation.
pub fn marshal_child(
    exports: &ExportTable,
    dest: &PeerId,
    parent: DefId,
    value: Outbound,
) -> Value {
    match value {
        Outbound::Value(v) => v,
        Outbound::Interface(iface) => Value::Reference(iface.definition().reference()),
        Outbound::Context(instance) => {
            Value::Definition(Box::new(exports.export_child(dest, parent, instance)))
        }
        Outbound::Batch(items) => Value::Definitions(
            items
                .into_iter()
                .map(|item| marshal_child(exports, dest, parent, item))
                .collect(),
        ),
    }
}

/// Marshals a positional argument list, preserving order and arity.
pub fn marshal_args(exports: &ExportTable, dest: &PeerId, args: Vec<Outbound>) -> Vec<Value> {
    args.into_iter()
        .map(|arg| marshal(exports, dest, arg))
        .collect()
}

/// Resolves one inbound value received from `peer`.
///
/// A reference to a definition this side exported resolves to the live
/// instance. A reference to a definition minted by `peer` resolves to the
/// cached proxy. A reference neither side knows is stale and fails.
pub fn resolve(
    factory: &InterfaceFactory,
    peer: &Arc<dyn Peer>,
    value: Value,
) -> Result<Inbound> {
    match value {
        Value::Definition(def) => Ok(Inbound::Interface(factory.create(*def, peer))),
        Value::Reference(reference) => {
            let id = reference.def_id();
            if let Some(stub) = factory.exports().stub(id) {
                return Ok(Inbound::Local(stub.instance().clone()));
            }
            if let Some(iface) = peer.interfaces().get(id) {
                return Ok(Inbound::Interface(iface));
            }
            Err(Error::UnknownDefinition(id))
        }
        Value::Definitions(items) => Ok(Inbound::Batch(
            items
                .into_iter()
                .map(|item| resolve(factory, peer, item))
                .collect::<Result<Vec<_>>>()?,
        )),
        other => Ok(Inbound::Value(other)),
    }
}
