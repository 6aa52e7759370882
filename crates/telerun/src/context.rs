//! # Context
//!
//! The trait an object implements to be exported. A context describes its
//! surface with a [`Schema`] and serves calls against that surface. Nothing
//! here knows about peers or definitions; the export table wraps a context
//! in a stub and mints the identity.
//!
//! ## Invariants
//!
//! - `schema()` must be stable for the lifetime of the object. The stub
//!   captures it once at export time.
//! - `call`/`read`/`write` are only reached for members the schema declares;
//!   unknown names are rejected before dispatch.

use async_trait::async_trait;
use telecore::Schema;
use telecore::Value;

use crate::marshal::Outbound;

/// An exportable object.
#[async_trait]
pub trait Context: Send + Sync + 'static {
    /// The members this object serves.
    fn schema(&self) -> Schema;

    /// Invokes a declared method with positional arguments.
    async fn call(&self, method: &str, args: Vec<Value>) -> std::result::Result<Outbound, CallError>;

    /// Reads a declared property. Returning `Outbound::Value(Value::Unit)`
    /// means "unset"; the caller's default applies.
    async fn read(&self, property: &str) -> std::result::Result<Outbound, CallError>;

    /// Writes a declared writable property.
    async fn write(&self, property: &str, value: Value) -> std::result::Result<(), CallError>;
}

/// Failure inside an exported object's own dispatch.
#[derive(Debug, Clone)]
pub enum CallError {
    /// The schema declares the member but the object does not serve it.
    UnknownMember(String),
    /// The arguments did not match what the method expects.
    BadArguments { method: String, details: String },
    /// The object's own logic failed.
    Failed(String),
}

impl std::fmt::Display for CallError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownMember(name) => write!(f, "Unknown member: {}", name),
            Self::BadArguments { method, details } => {
                write!(f, "Bad arguments for '{}': {}", method, details)
            }
            Self::Failed(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for CallError {}
