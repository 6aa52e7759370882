//! # Runtime
//!
//! Ties the pieces together for one participant: the export table it
//! publishes through, the factory it mints proxies with, and the named
//! contexts it offers. The runtime is also the server half of dispatch;
//! a peer implementation turns incoming frames into [`Runtime::dispatch_get`]
//! and [`Runtime::dispatch_set`] calls.
//!
//! ## Architecture
//!
//! Cloning a [`Runtime`] clones a handle; all clones share one export
//! table and one context registry. The loopback peer returned by
//! [`Runtime::own_peer`] routes invocations straight back into dispatch,
//! so local and remote consumers of a context go through the same path.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use telecore::DefId;
use telecore::Definition;
use telecore::PeerId;
use telecore::Value;

use crate::context::Context;
use crate::error::Error;
use crate::error::Result;
use crate::exports::ExportTable;
use crate::factory::InterfaceCache;
use crate::factory::InterfaceFactory;
use crate::interface::Interface;
use crate::peer::Peer;

struct RuntimeInner {
    exports: ExportTable,
    factory: InterfaceFactory,
    contexts: DashMap<String, DefId>,
    own_interfaces: InterfaceCache,
}

/// One participant's capability state.
#[derive(Clone)]
pub struct Runtime {
    inner: Arc<RuntimeInner>,
}

impl Runtime {
    pub fn new(local_id: PeerId) -> Self {
        let exports = ExportTable::new(local_id);
        let factory = InterfaceFactory::new(exports.clone());
        Self {
            inner: Arc::new(RuntimeInner {
                exports,
                factory,
                contexts: DashMap::new(),
                own_interfaces: InterfaceCache::new(),
            }),
        }
    }

    pub fn local_id(&self) -> &PeerId {
        self.inner.exports.owner()
    }

    pub fn exports(&self) -> &ExportTable {
        &self.inner.exports
    }

    pub fn factory(&self) -> &InterfaceFactory {
        &self.inner.factory
    }

    /// Publishes a context under a unique name. The definition id it
    /// receives is never reused, even across detach and re-attach.
    pub fn attach_context(
        &self,
        name: impl Into<String>,
        instance: Arc<dyn Context>,
    ) -> Result<DefId> {
        let name = name.into();
        match self.inner.contexts.entry(name.clone()) {
            Entry::Occupied(_) => Err(Error::ContextExists(name)),
            Entry::Vacant(slot) => {
                let stub = self.inner.exports.insert_root(instance);
                let id = stub.definition().id();
                slot.insert(id);
                tracing::info!(context = %name, %id, "attached context");
                Ok(id)
            }
        }
    }

    /// Unpublishes a named context and every definition derived from it.
    pub fn detach_context(&self, name: &str) -> Result<DefId> {
        let Some((_, id)) = self.inner.contexts.remove(name) else {
            return Err(Error::UnknownContext(name.to_string()));
        };
        self.inner.exports.revoke(id);
        self.inner.own_interfaces.revoke(id);
        tracing::info!(context = %name, %id, "detached context");
        Ok(id)
    }

    pub fn detach_all_contexts(&self) {
        let names: Vec<String> = self.inner.contexts.iter().map(|e| e.key().clone()).collect();
        for name in names {
            let _ = self.detach_context(&name);
        }
    }

    pub fn has_context(&self, name: &str) -> bool {
        self.inner.contexts.contains_key(name)
    }

    pub fn context_names(&self) -> Vec<String> {
        self.inner.contexts.iter().map(|e| e.key().clone()).collect()
    }

    /// The definition a named context was published under.
    pub fn definition_by_name(&self, name: &str) -> Result<Definition> {
        let id = self
            .inner
            .contexts
            .get(name)
            .map(|e| *e.value())
            .ok_or_else(|| Error::UnknownContext(name.to_string()))?;
        let stub = self
            .inner
            .exports
            .stub(id)
            .ok_or(Error::UnknownDefinition(id))?;
        Ok(stub.definition().clone())
    }

    /// A loopback proxy for a named context.
    pub fn interface_by_name(&self, name: &str) -> Result<Interface> {
        let definition = self.definition_by_name(name)?;
        Ok(self.inner.factory.create(definition, &self.own_peer()))
    }

    /// Unpublishes every definition backed by this instance, across all
    /// peers and names. Returns the number of definitions removed.
    pub fn release_context(&self, instance: &Arc<dyn Context>) -> usize {
        let removed = self.inner.exports.release_instance(instance);
        self.inner
            .contexts
            .retain(|_, id| self.inner.exports.contains(*id));
        removed
    }

    /// A peer that serves this runtime's own exports. Local consumers go
    /// through it so that published objects behave identically regardless
    /// of which side holds the proxy.
    pub fn own_peer(&self) -> Arc<dyn Peer> {
        Arc::new(LoopbackPeer {
            runtime: self.clone(),
        })
    }

    /// Serves a value-returning invocation from `from`.
    pub async fn dispatch_get(
        &self,
        from: &PeerId,
        def_id: DefId,
        member: &str,
        args: Vec<Value>,
    ) -> Result<Value> {
        let stub = self
            .inner
            .exports
            .stub(def_id)
            .ok_or(Error::UnknownDefinition(def_id))?;
        stub.get(member, args, &self.inner.exports, from).await
    }

    /// Serves an effect-only invocation from `from`.
    pub async fn dispatch_set(
        &self,
        _from: &PeerId,
        def_id: DefId,
        member: &str,
        args: Vec<Value>,
    ) -> Result<()> {
        let stub = self
            .inner
            .exports
            .stub(def_id)
            .ok_or(Error::UnknownDefinition(def_id))?;
        stub.set(member, args).await
    }

    /// Tears down all state tied to a departed peer: its exports are
    /// revoked and every proxy minted against it is marked stale.
    pub fn peer_disconnected(&self, peer: &dyn Peer) {
        let revoked_exports = self.inner.exports.revoke_peer(peer.id());
        let revoked_proxies = peer.interfaces().revoke_all();
        tracing::info!(
            peer = %peer.id(),
            revoked_exports,
            revoked_proxies,
            "peer disconnected"
        );
    }
}

struct LoopbackPeer {
    runtime: Runtime,
}

#[async_trait]
impl Peer for LoopbackPeer {
    fn id(&self) -> &PeerId {
        self.runtime.local_id()
    }

    fn interfaces(&self) -> &InterfaceCache {
        &self.runtime.inner.own_interfaces
    }

    async fn get(&self, def_id: DefId, member: &str, args: Vec<Value>) -> Result<Value> {
        let from = self.runtime.local_id().clone();
        self.runtime.dispatch_get(&from, def_id, member, args).await
    }

    async fn set(&self, def_id: DefId, member: &str, args: Vec<Value>) -> Result<()> {
        let from = self.runtime.local_id().clone();
        self.runtime.dispatch_set(&from, def_id, member, args).await
    }
}
