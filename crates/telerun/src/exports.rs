//! # Export table
//!
//! The publishing side of the capability model. Exporting a [`Context`]
//! mints a [`Definition`] with a fresh id, wraps the instance in a
//! [`Stub`], and records which peer the definition was handed to. Incoming
//! invocations resolve through the table; anything not in it is unreachable,
//! so revocation is removal.
//!
//! ## Invariants
//!
//! - Definition ids are minted from a monotone counter and never reused,
//!   even after revocation.
//! - Exporting the same instance to the same peer twice yields the same
//!   definition. Distinct peers get distinct definitions for one instance.
//! - Revoking a definition revokes every definition derived from it
//!   (exported as a child of a result it produced).

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use dashmap::DashMap;
use telecore::DefId;
use telecore::Definition;
use telecore::PeerId;
use telecore::Value;

use crate::context::Context;
use crate::error::Error;
use crate::error::Result;
use crate::marshal;

/// A published context: the live instance plus the definition minted for it.
pub struct Stub {
    instance: Arc<dyn Context>,
    definition: Definition,
}

impl Stub {
    fn new(instance: Arc<dyn Context>, definition: Definition) -> Self {
        Self { instance, definition }
    }

    pub fn definition(&self) -> &Definition {
        &self.definition
    }

    pub fn instance(&self) -> &Arc<dyn Context> {
        &self.instance
    }

    /// Serves a value-returning invocation against the live instance.
    ///
    /// Methods receive `args` positionally. Property reads treat the first
    /// argument, when present, as the caller's default for an unset value.
    /// Capability results are exported to `dest` as children of this stub's
    /// definition before crossing back.
    pub async fn get(
        &self,
        member: &str,
        args: Vec<Value>,
        exports: &ExportTable,
        dest: &PeerId,
    ) -> Result<Value> {
        let Some(kind) = self.definition.member(member) else {
            return Err(Error::UnknownMember {
                def_id: self.definition.id(),
                member: member.to_string(),
            });
        };
        if kind.is_method() {
            let out = self.instance.call(member, args).await?;
            Ok(marshal::marshal_child(exports, dest, self.definition.id(), out))
        } else {
            let out = self.instance.read(member).await?;
            let value = marshal::marshal_child(exports, dest, self.definition.id(), out);
            match (value, args.into_iter().next()) {
                (Value::Unit, Some(default)) => Ok(default),
                (value, _) => Ok(value),
            }
        }
    }

    /// Serves an effect-only invocation against the live instance.
    ///
    /// On a method this invokes it and discards the result. On a property
    /// it writes the first argument; writes to a readonly property are
    /// rejected here, before the instance is touched.
    pub async fn set(&self, member: &str, args: Vec<Value>) -> Result<()> {
        let Some(kind) = self.definition.member(member) else {
            return Err(Error::UnknownMember {
                def_id: self.definition.id(),
                member: member.to_string(),
            });
        };
        if kind.is_method() {
            self.instance.call(member, args).await?;
            Ok(())
        } else if kind.is_readonly() {
            Err(Error::ReadonlySet(member.to_string()))
        } else {
            let value = args.into_iter().next().unwrap_or(Value::Unit);
            self.instance.write(member, value).await?;
            Ok(())
        }
    }
}

struct ExportsInner {
    owner: PeerId,
    stubs: DashMap<DefId, Arc<Stub>>,
    by_peer: DashMap<PeerId, Vec<Arc<Stub>>>,
    next_id: AtomicU64,
}

/// Thread-safe registry of everything this side has published.
#[derive(Clone)]
pub struct ExportTable {
    inner: Arc<ExportsInner>,
}

impl ExportTable {
    pub fn new(owner: PeerId) -> Self {
        Self {
            inner: Arc::new(ExportsInner {
                owner,
                stubs: DashMap::new(),
                by_peer: DashMap::new(),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    /// The peer id stamped into every definition this table mints.
    pub fn owner(&self) -> &PeerId {
        &self.inner.owner
    }

    fn mint_id(&self) -> DefId {
        DefId(self.inner.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Publishes `instance` to `dest`, reusing the existing definition if
    /// this exact instance was already exported there.
    pub fn export(&self, dest: &PeerId, instance: Arc<dyn Context>) -> Definition {
        self.export_inner(dest, instance, None)
    }

    /// Publishes a result object whose lifetime hangs off `parent`.
    pub fn export_child(
        &self,
        dest: &PeerId,
        parent: DefId,
        instance: Arc<dyn Context>,
    ) -> Definition {
        self.export_inner(dest, instance, Some(parent))
    }

    fn export_inner(
        &self,
        dest: &PeerId,
        instance: Arc<dyn Context>,
        parent: Option<DefId>,
    ) -> Definition {
        let mut bucket = self.inner.by_peer.entry(dest.clone()).or_default();
        if let Some(stub) = bucket
            .iter()
            .find(|stub| same_instance(stub.instance(), &instance))
        {
            return stub.definition().clone();
        }
        let id = self.mint_id();
        let definition = Definition::new(id, self.inner.owner.clone(), instance.schema(), parent);
        let stub = Arc::new(Stub::new(instance, definition.clone()));
        tracing::debug!(%id, peer = %dest, name = definition.name(), "exported context");
        self.inner.stubs.insert(id, stub.clone());
        bucket.push(stub);
        definition
    }

    /// Publishes an attached context without tying it to a peer. The stub
    /// is reachable by id; per-peer bookkeeping starts when a definition
    /// derived from it is handed out.
    pub(crate) fn insert_root(&self, instance: Arc<dyn Context>) -> Arc<Stub> {
        let id = self.mint_id();
        let definition = Definition::new(id, self.inner.owner.clone(), instance.schema(), None);
        let stub = Arc::new(Stub::new(instance, definition));
        self.inner.stubs.insert(id, stub.clone());
        stub
    }

    pub fn stub(&self, id: DefId) -> Option<Arc<Stub>> {
        self.inner.stubs.get(&id).map(|s| s.clone())
    }

    pub fn contains(&self, id: DefId) -> bool {
        self.inner.stubs.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.inner.stubs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.stubs.is_empty()
    }

    /// Unpublishes a definition and everything derived from it. Returns the
    /// number of definitions removed. Unknown ids remove nothing.
    pub fn revoke(&self, id: DefId) -> usize {
        let mut doomed = vec![id];
        let mut i = 0;
        while i < doomed.len() {
            let parent = doomed[i];
            for entry in self.inner.stubs.iter() {
                if entry.value().definition().parent_id() == Some(parent) {
                    doomed.push(*entry.key());
                }
            }
            i += 1;
        }
        let doomed: HashSet<DefId> = doomed.into_iter().collect();
        let mut removed = 0;
        for id in &doomed {
            if self.inner.stubs.remove(id).is_some() {
                removed += 1;
                tracing::debug!(%id, "revoked definition");
            }
        }
        for mut bucket in self.inner.by_peer.iter_mut() {
            bucket.retain(|stub| !doomed.contains(&stub.definition().id()));
        }
        removed
    }

    /// Unpublishes everything that was exported to `peer`. Returns the
    /// number of definitions removed.
    pub fn revoke_peer(&self, peer: &PeerId) -> usize {
        let Some((_, bucket)) = self.inner.by_peer.remove(peer) else {
            return 0;
        };
        let mut removed = 0;
        for stub in bucket {
            removed += self.revoke(stub.definition().id());
        }
        tracing::debug!(peer = %peer, removed, "revoked peer exports");
        removed
    }

    /// Unpublishes every definition backed by this exact instance, across
    /// all peers. Returns the number of definitions removed.
    pub fn release_instance(&self, instance: &Arc<dyn Context>) -> usize {
        let ids: Vec<DefId> = self
            .inner
            .stubs
            .iter()
            .filter(|entry| same_instance(entry.value().instance(), instance))
            .map(|entry| *entry.key())
            .collect();
        ids.into_iter().map(|id| self.revoke(id)).sum()
    }
}

fn same_instance(a: &Arc<dyn Context>, b: &Arc<dyn Context>) -> bool {
    std::ptr::eq(Arc::as_ptr(a) as *const (), Arc::as_ptr(b) as *const ())
}
