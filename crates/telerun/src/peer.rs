//! # Peer
//!
//! The seam between proxies and whatever carries invocations to the other
//! side. A proxy never talks to a transport directly; it hands the peer a
//! definition id, a member name, and already-marshalled arguments, and the
//! peer returns the already-marshalled reply.
//!
//! ## Architecture
//!
//! Each peer owns one [`InterfaceCache`], so "at most one proxy per
//! definition per peer" falls out of cache placement rather than bookkeeping.
//! The runtime's loopback peer implements this trait over its own dispatch
//! table; a networked implementation would frame `get`/`set` onto a wire.

use async_trait::async_trait;
use telecore::DefId;
use telecore::PeerId;
use telecore::Value;

use crate::error::Result;
use crate::factory::InterfaceCache;

/// One remote (or loopback) party that serves definitions.
#[async_trait]
pub trait Peer: Send + Sync + 'static {
    /// Stable identity of the party behind this peer.
    fn id(&self) -> &PeerId;

    /// Proxies minted against this peer, keyed by definition id.
    fn interfaces(&self) -> &InterfaceCache;

    /// Invokes a member and waits for the reply value.
    ///
    /// Argument conventions: methods send their positional arguments;
    /// property reads send `[]` or `[default]`.
    async fn get(&self, def_id: DefId, member: &str, args: Vec<Value>) -> Result<Value>;

    /// Invokes a member for effect only.
    ///
    /// Property writes send `[value]`; fire-and-forget method calls send
    /// their positional arguments and discard any result.
    async fn set(&self, def_id: DefId, member: &str, args: Vec<Value>) -> Result<()>;
}
