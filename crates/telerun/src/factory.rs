//! # Interface factory
//!
//! Mints proxies and guarantees there is at most one per definition per
//! peer. The cache lives on the peer, so two peers serving definitions
//! that happen to share an id never collide; the factory only supplies the
//! export table the proxy needs to marshal its own arguments.

use std::sync::Arc;

use dashmap::DashMap;
use telecore::DefId;
use telecore::Definition;

use crate::exports::ExportTable;
use crate::interface::Interface;
use crate::peer::Peer;

/// Proxies minted for one peer, keyed by definition id.
#[derive(Default)]
pub struct InterfaceCache {
    entries: DashMap<DefId, Interface>,
}

impl InterfaceCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: DefId) -> Option<Interface> {
        self.entries.get(&id).map(|e| e.clone())
    }

    pub fn contains(&self, id: DefId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Marks one proxy stale and drops it from the cache.
    pub fn revoke(&self, id: DefId) -> bool {
        match self.entries.remove(&id) {
            Some((_, iface)) => {
                iface.revoke();
                true
            }
            None => false,
        }
    }

    /// Marks every cached proxy stale and empties the cache. Clones held
    /// by callers keep failing from then on.
    pub fn revoke_all(&self) -> usize {
        let mut revoked = 0;
        for entry in self.entries.iter() {
            entry.value().revoke();
            revoked += 1;
        }
        self.entries.clear();
        revoked
    }

    fn get_or_mint(
        &self,
        definition: Definition,
        peer: &Arc<dyn Peer>,
        exports: &ExportTable,
    ) -> Interface {
        self.entries
            .entry(definition.id())
            .or_insert_with(|| Interface::new(definition, peer.clone(), exports.clone()))
            .clone()
    }
}

/// Mints interfaces bound to one export table.
#[derive(Clone)]
pub struct InterfaceFactory {
    exports: ExportTable,
}

impl InterfaceFactory {
    pub fn new(exports: ExportTable) -> Self {
        Self { exports }
    }

    pub fn exports(&self) -> &ExportTable {
        &self.exports
    }

    /// Returns the proxy for `definition` on `peer`, minting it on first
    /// use. Concurrent callers racing on the same id serialize on the
    /// cache entry and all receive clones of one proxy.
    pub fn create(&self, definition: Definition, peer: &Arc<dyn Peer>) -> Interface {
        peer.interfaces().get_or_mint(definition, peer, &self.exports)
    }
}
