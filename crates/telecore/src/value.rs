//! The wire value model.
//!
//! Everything that crosses a peer boundary is a [`Value`]. The plain
//! variants (scalars, lists, maps) pass through marshalling untouched;
//! the capability variants (`Reference`, `Definition`, `Definitions`) are
//! what the marshaller produces when an object handle crosses a boundary.

use serde::Deserialize;
use serde::Serialize;

use crate::definition::Definition;
use crate::definition::Reference;

/// A single wire-representable value.
///
/// The marshaller is a switch over this type plus the local-only handle
/// kinds; anything it does not recognize stays a plain value. Nested
/// containers are *not* rewritten: a capability variant inside a `List`
/// or `Map` is carried as data, by design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Unit,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
    List(Vec<Value>),
    Map(Vec<(String, Value)>),
    /// A handle to a definition both sides already know.
    Reference(Reference),
    /// A freshly exported object's full shape.
    Definition(Box<Definition>),
    /// A batch of definition-bearing values, order-preserving.
    Definitions(Vec<Value>),
}

impl Value {
    /// True for the capability-bearing variants the resolver acts on.
    pub fn is_capability(&self) -> bool {
        matches!(
            self,
            Value::Reference(_) | Value::Definition(_) | Value::Definitions(_)
        )
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl From<Reference> for Value {
    fn from(v: Reference) -> Self {
        Value::Reference(v)
    }
}

impl From<Definition> for Value {
    fn from(v: Definition) -> Self {
        Value::Definition(Box::new(v))
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::List(v)
    }
}
