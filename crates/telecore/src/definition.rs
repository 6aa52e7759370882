//! # Definitions and references
//!
//! A [`Definition`] is the serializable description of a remotely exposed
//! object: a process-unique id, the identity of the peer that hosts the
//! real object, and an ordered member table. A [`Reference`] is the
//! lightweight handle used to pass an *already known* remote object across
//! a boundary without re-shipping its shape.
//!
//! ## Invariants
//!
//! - A definition id is never reused within the exporting table's lifetime.
//! - A definition is immutable once handed out; if the underlying object's
//!   shape changes, a new id must be minted.

use serde::Deserialize;
use serde::Serialize;

use crate::schema::Member;
use crate::schema::Schema;

/// Strong type for definition identifiers.
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DefId(pub u64);

impl std::fmt::Display for DefId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "def-{}", self.0)
    }
}

/// Stable peer identity (base58-style string).
#[derive(Clone, Debug, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerId(String);

impl PeerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PeerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PeerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for PeerId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A bare handle to a definition the receiving side can already resolve.
///
/// Carries no state beyond the id; its validity is entirely derived from
/// the referenced definition's validity.
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    def_id: DefId,
}

impl Reference {
    pub fn new(def_id: DefId) -> Self {
        Self { def_id }
    }

    pub fn def_id(&self) -> DefId {
        self.def_id
    }
}

/// The serializable shape of an exported object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Definition {
    id: DefId,
    peer_id: PeerId,
    name: String,
    /// Set when this definition was minted while marshalling a result of
    /// another definition's member; used for cascading release.
    parent_id: Option<DefId>,
    members: Vec<(String, Member)>,
}

impl Definition {
    /// Mints a definition from a schema.
    ///
    /// `peer_id` is the identity of the *exporting* peer (the object's
    /// host), stamped at marshalling time.
    pub fn new(id: DefId, peer_id: PeerId, schema: Schema, parent_id: Option<DefId>) -> Self {
        let (name, members) = schema.into_parts();
        Self {
            id,
            peer_id,
            name,
            parent_id,
            members,
        }
    }

    pub fn id(&self) -> DefId {
        self.id
    }

    pub fn peer_id(&self) -> &PeerId {
        &self.peer_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent_id(&self) -> Option<DefId> {
        self.parent_id
    }

    /// Looks up one member's metadata.
    pub fn member(&self, name: &str) -> Option<&Member> {
        self.members
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, m)| m)
    }

    /// Members in declaration order.
    pub fn members(&self) -> impl Iterator<Item = (&str, &Member)> {
        self.members.iter().map(|(n, m)| (n.as_str(), m))
    }

    /// A reference standing in for this definition.
    pub fn reference(&self) -> Reference {
        Reference::new(self.id)
    }
}
