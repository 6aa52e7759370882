//! # Member metadata for exportable objects
//!
//! A [`Schema`] enumerates which members of a local object are remotely
//! visible, whether each is a method or a property, and whether a property
//! can be written. It is declared once per type (the export marker) and
//! consulted when a [`Definition`](crate::Definition) is minted.
//!
//! A property with no setter recorded is implicitly read-only; read-only
//! enforcement on the proxy side works by *omitting* the setter
//! capability, not by a runtime check.

use serde::Deserialize;
use serde::Serialize;

/// Remotely visible member metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Member {
    /// Callable; forwarded positionally.
    Method,
    /// Readable, and writable unless `readonly`.
    Property { readonly: bool },
}

impl Member {
    pub fn is_method(&self) -> bool {
        matches!(self, Member::Method)
    }

    pub fn is_readonly(&self) -> bool {
        matches!(self, Member::Property { readonly: true })
    }
}

/// The ordered member table an exportable object declares.
///
/// Insertion order is preserved; definitions minted from a schema list
/// members in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    name: String,
    members: Vec<(String, Member)>,
}

impl Schema {
    /// Starts building a schema for the named context type.
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            name: name.into(),
            members: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
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

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub(crate) fn into_parts(self) -> (String, Vec<(String, Member)>) {
        (self.name, self.members)
    }
}

/// Fluent builder for [`Schema`].
///
/// Re-declaring a member name replaces the earlier declaration in place,
/// keeping its original position.
pub struct SchemaBuilder {
    name: String,
    members: Vec<(String, Member)>,
}

impl SchemaBuilder {
    /// Declares a callable method member.
    pub fn method(self, name: impl Into<String>) -> Self {
        self.push(name.into(), Member::Method)
    }

    /// Declares a property with a getter only: implicitly read-only.
    pub fn property(self, name: impl Into<String>) -> Self {
        self.push(name.into(), Member::Property { readonly: true })
    }

    /// Declares a property with both a getter and a setter.
    pub fn property_mut(self, name: impl Into<String>) -> Self {
        self.push(name.into(), Member::Property { readonly: false })
    }

    pub fn build(self) -> Schema {
        Schema {
            name: self.name,
            members: self.members,
        }
    }

    fn push(mut self, name: String, member: Member) -> Self {
        match self.members.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = member,
            None => self.members.push((name, member)),
        }
        self
    }
}
