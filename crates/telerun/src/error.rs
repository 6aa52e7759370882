//! Runtime errors.
//!
//! Every failure is reported to the immediate caller; nothing here retries
//! or recovers. Transport failures are carried verbatim so callers can
//! distinguish "gone" (revoked/unknown definition) from "slow" (transport).

use telecore::DefId;
use telecore::PeerId;

use crate::context::CallError;

#[derive(Debug)]
pub enum Error {
    /// No stub is published under this id (never exported, or revoked).
    UnknownDefinition(DefId),
    /// The proxy's backing peer disconnected or the definition was revoked.
    Revoked { def_id: DefId, peer_id: PeerId },
    /// The definition has no member with this name.
    UnknownMember { def_id: DefId, member: String },
    /// The member exists but is a property, not a method.
    NotAMethod(String),
    /// The member exists but is a method, not a property.
    NotAProperty(String),
    /// Write attempted on a property whose setter capability is absent.
    ReadonlySet(String),
    /// A context with this name is already attached.
    ContextExists(String),
    /// No context with this name is attached.
    UnknownContext(String),
    /// The exported object's own dispatch failed.
    Call(CallError),
    /// Failure underneath `peer.get`/`peer.set`, propagated unchanged.
    Transport(Box<dyn std::error::Error + Send + Sync>),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownDefinition(id) => write!(f, "Unknown definition: {}", id),
            Self::Revoked { def_id, peer_id } => {
                write!(f, "Stale reference: {} revoked (peer '{}' gone)", def_id, peer_id)
            }
            Self::UnknownMember { def_id, member } => {
                write!(f, "No member '{}' on {}", member, def_id)
            }
            Self::NotAMethod(name) => write!(f, "Member '{}' is not a method", name),
            Self::NotAProperty(name) => write!(f, "Member '{}' is not a property", name),
            Self::ReadonlySet(name) => write!(f, "Property '{}' has no setter", name),
            Self::ContextExists(id) => write!(f, "Context '{}' already attached", id),
            Self::UnknownContext(id) => write!(f, "Context '{}' not attached", id),
            Self::Call(e) => write!(f, "Context dispatch failed: {}", e),
            Self::Transport(e) => write!(f, "Transport failure: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Call(e) => Some(e),
            Self::Transport(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

impl From<CallError> for Error {
    fn from(e: CallError) -> Self {
        Self::Call(e)
    }
}

impl Error {
    /// Wraps a peer-layer failure for propagation.
    pub fn transport(e: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Transport(e.into())
    }

    /// True when the failure means "gone", not "slow".
    pub fn is_stale(&self) -> bool {
        matches!(self, Self::UnknownDefinition(_) | Self::Revoked { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
