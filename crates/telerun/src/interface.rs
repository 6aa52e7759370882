//! # Interface
//!
//! The caller-side proxy for a remote definition. An interface holds the
//! definition it fronts and the peer that serves it; invoking a member
//! checks the definition's metadata locally, marshals the arguments, and
//! delegates the wire round trip to the peer.
//!
//! ## Invariants
//!
//! - Construction is side-effect free. No I/O happens until the first
//!   invocation.
//! - Member existence and kind are checked against the definition before
//!   any peer traffic.
//! - A property without a setter capability rejects writes locally.
//! - Once revoked, every invocation fails fast with a stale-reference
//!   error; revocation never reverses.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use telecore::Definition;
use telecore::Member;
use telecore::PeerId;
use telecore::Value;

use crate::error::Error;
use crate::error::Result;
use crate::exports::ExportTable;
use crate::marshal;
use crate::marshal::Outbound;
use crate::peer::Peer;

struct Shared {
    definition: Definition,
    peer: Arc<dyn Peer>,
    exports: ExportTable,
    revoked: AtomicBool,
}

/// Proxy for one definition on one peer. Cheap to clone; clones share
/// identity and revocation state.
#[derive(Clone)]
pub struct Interface {
    shared: Arc<Shared>,
}

impl Interface {
    pub(crate) fn new(definition: Definition, peer: Arc<dyn Peer>, exports: ExportTable) -> Self {
        Self {
            shared: Arc::new(Shared {
                definition,
                peer,
                exports,
                revoked: AtomicBool::new(false),
            }),
        }
    }

    /// The definition this proxy fronts.
    pub fn definition(&self) -> &Definition {
        &self.shared.definition
    }

    /// The peer that serves invocations.
    pub fn peer_id(&self) -> &PeerId {
        self.shared.peer.id()
    }

    /// True when `a` and `b` are the same proxy, not merely proxies for
    /// the same definition.
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.shared, &b.shared)
    }

    pub fn is_revoked(&self) -> bool {
        self.shared.revoked.load(Ordering::Acquire)
    }

    pub(crate) fn revoke(&self) {
        self.shared.revoked.store(true, Ordering::Release);
    }

    fn ensure_live(&self) -> Result<()> {
        if self.is_revoked() {
            return Err(Error::Revoked {
                def_id: self.shared.definition.id(),
                peer_id: self.shared.peer.id().clone(),
            });
        }
        Ok(())
    }

    fn member(&self, name: &str) -> Result<&Member> {
        self.shared.definition.member(name).ok_or_else(|| {
            Error::UnknownMember {
                def_id: self.shared.definition.id(),
                member: name.to_string(),
            }
        })
    }

    /// Invokes a method and waits for its marshalled result.
    pub async fn call(&self, method: &str, args: Vec<Outbound>) -> Result<Value> {
        self.ensure_live()?;
        if !self.member(method)?.is_method() {
            return Err(Error::NotAMethod(method.to_string()));
        }
        let args = marshal::marshal_args(&self.shared.exports, self.peer_id(), args);
        self.shared
            .peer
            .get(self.shared.definition.id(), method, args)
            .await
    }

    /// Invokes a method for effect only; any result is discarded remotely.
    pub async fn call_void(&self, method: &str, args: Vec<Outbound>) -> Result<()> {
        self.ensure_live()?;
        if !self.member(method)?.is_method() {
            return Err(Error::NotAMethod(method.to_string()));
        }
        let args = marshal::marshal_args(&self.shared.exports, self.peer_id(), args);
        self.shared
            .peer
            .set(self.shared.definition.id(), method, args)
            .await
    }

    /// Accessor for a declared property.
    pub fn property(&self, name: &str) -> Result<Property> {
        let member = self.member(name)?;
        if member.is_method() {
            return Err(Error::NotAProperty(name.to_string()));
        }
        Ok(Property {
            iface: self.clone(),
            name: name.to_string(),
            readonly: member.is_readonly(),
        })
    }
}

impl std::fmt::Debug for Interface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interface")
            .field("definition", &self.shared.definition.id())
            .field("peer", self.shared.peer.id())
            .field("revoked", &self.is_revoked())
            .finish()
    }
}

/// One property of a proxied definition.
pub struct Property {
    iface: Interface,
    name: String,
    readonly: bool,
}

impl Property {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// False when the setter capability was withheld at export time.
    pub fn is_settable(&self) -> bool {
        !self.readonly
    }

    /// Reads the remote value.
    pub async fn get(&self) -> Result<Value> {
        self.iface.ensure_live()?;
        self.iface
            .shared
            .peer
            .get(self.iface.shared.definition.id(), &self.name, Vec::new())
            .await
    }

    /// Reads the remote value, substituting `default` when it is unset.
    pub async fn get_or(&self, default: Outbound) -> Result<Value> {
        self.iface.ensure_live()?;
        let default = marshal::marshal(&self.iface.shared.exports, self.iface.peer_id(), default);
        self.iface
            .shared
            .peer
            .get(self.iface.shared.definition.id(), &self.name, vec![default])
            .await
    }

    /// Writes the remote value. Fails locally, without peer traffic, when
    /// the setter capability is absent.
    pub async fn set(&self, value: Outbound) -> Result<()> {
        self.iface.ensure_live()?;
        if self.readonly {
            return Err(Error::ReadonlySet(self.name.clone()));
        }
        let value = marshal::marshal(&self.iface.shared.exports, self.iface.peer_id(), value);
        self.iface
            .shared
            .peer
            .set(self.iface.shared.definition.id(), &self.name, vec![value])
            .await
    }
}
