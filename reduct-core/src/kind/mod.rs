//! Expression kinds.
//!
//! Every node of an expression tree has a kind, which is a type implementing [`Kind`]. The kind
//! names the node (through its tag), and decides which shapes the node can take: how many
//! children it can have, where children can be inserted or removed, and which attributes it
//! carries.
//!
//! Kinds are registered in a [`Registry`](crate::registry::Registry) under their tag, which acts
//! as the factory used to create nodes from a tag at runtime. The kinds provided by this crate are
//! in the [`builtin`] module, and their tags in the [`tag`] module.

pub mod builtin;
pub mod tag;

use crate::number::Number;
use std::fmt;

/// The intrinsic data carried by a node, in addition to its children.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// The node carries no data.
    Empty,

    /// The values of the node's attributes, in the order given by [`Kind::attribute_names`].
    Attributes(Vec<String>),

    /// A number in its internal representation.
    Number(Number),
}

/// The values given for the attributes of a kind were rejected by it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidAttributes {
    /// Why the values were rejected.
    pub reason: String,
}

impl InvalidAttributes {
    /// Creates a new rejection with the given reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

impl fmt::Display for InvalidAttributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.reason)
    }
}

/// A trait implemented by all expression kinds.
///
/// All methods except [`Kind::tag`] and [`Kind::can_have_children`] have default
/// implementations, describing a kind without attributes whose children can be inserted or
/// removed anywhere as long as the resulting number of children is accepted.
pub trait Kind: fmt::Debug + Send + Sync {
    /// Returns the tag of the kind.
    // NOTE: this is a `&self` method and not an associated constant to make the trait object-safe
    fn tag(&self) -> &str;

    /// Returns true if a node of this kind can have the given number of children.
    fn can_have_children(&self, count: usize) -> bool;

    /// Returns true if a child can be inserted at `index` (zero-based) into a node of this kind
    /// that currently has `count` children.
    fn can_insert_child_at(&self, count: usize, index: usize) -> bool {
        index <= count && self.can_have_children(count + 1)
    }

    /// Returns true if the child at `index` (zero-based) can be removed from a node of this kind
    /// that currently has `count` children.
    fn can_remove_child_at(&self, count: usize, index: usize) -> bool {
        index < count && self.can_have_children(count - 1)
    }

    /// The names of the attributes a node of this kind carries. This list is fixed for each kind,
    /// and checked when the kind is registered.
    fn attribute_names(&self) -> &'static [&'static str] {
        &[]
    }

    /// Validates a set of attribute values, given in the order of [`Kind::attribute_names`].
    /// This is the kind-specific setter check; the number of values has already been checked.
    fn check_attributes(&self, _values: &[String]) -> Result<(), InvalidAttributes> {
        Ok(())
    }

    /// The payload of a freshly created node of this kind.
    fn default_payload(&self) -> Payload {
        match self.attribute_names().len() {
            0 => Payload::Empty,
            n => Payload::Attributes(vec![String::new(); n]),
        }
    }

    /// Returns false if nodes of this kind have no portable representation, and thus cannot be
    /// serialized.
    fn is_serializable(&self) -> bool {
        true
    }

    /// If nodes of this kind stand for an expression stored elsewhere, returns the name of the
    /// attribute holding its location. Such nodes are resolved when a tree is deserialized.
    fn reference_attribute(&self) -> Option<&'static str> {
        None
    }
}
