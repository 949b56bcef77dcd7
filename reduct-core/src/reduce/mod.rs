//! Reducers: the rewrite rules applied by the session.
//!
//! A [`Reducer`] is registered for a tag and a [`Stage`]. When the session reaches a node with
//! that tag, it calls the reducer, which either rewrites the node (replacing it in its parent
//! with [`Tree::replace`](crate::tree::Tree::replace)) and returns `Ok(true)`, declines by
//! returning `Ok(false)`, or fails with an [`Error`] that aborts the whole evaluation.
//!
//! Validation always precedes mutation: a reducer that fails leaves the tree as it found it.

pub mod arithmetic;
pub mod child;
pub mod create;
pub mod edit;
pub mod group;
pub mod relation;
pub mod serial;
pub mod utility;

use async_trait::async_trait;
use crate::{error::Error, kind::tag, registry::Registry, session::Session, tree::NodeId};
use std::fmt::Debug;

/// When a reducer is tried, relative to the reduction of the node's children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Tried before the children of the node are reduced.
    Special,

    /// Tried after the children of the node are reduced.
    Normal,
}

/// A rewrite rule.
#[async_trait(?Send)]
pub trait Reducer: Debug {
    /// The name of the reducer, used in logs.
    fn name(&self) -> &'static str;

    /// Tries to rewrite the node. Returns `Ok(true)` if the node was replaced, and `Ok(false)` if
    /// the reducer does not apply to it.
    async fn reduce(&self, node: NodeId, session: &mut Session) -> Result<bool, Error>;
}

/// Registers every reducer of this crate.
pub fn register_all(registry: &mut Registry) {
    use Stage::*;

    registry.add_reducer(tag::CHILD, Normal, child::Child);
    registry.add_reducer(tag::CARDINALITY, Normal, utility::Cardinality);
    registry.add_reducer(tag::TAG, Normal, utility::Tag);
    registry.add_reducer(tag::REPLACE_TAG, Normal, utility::ReplaceTag);
    registry.add_reducer(tag::PROTECT, Special, utility::Protect);
    registry.add_reducer(tag::REDUCE, Normal, utility::Reduce);
    registry.add_reducer(tag::PARENTHESES, Normal, utility::Parentheses);
    registry.add_reducer(tag::LAST_RESULT, Normal, utility::LastResult);
    registry.add_reducer(tag::APPEND, Normal, edit::Append);
    registry.add_reducer(tag::PREPEND, Normal, edit::Prepend);
    registry.add_reducer(tag::INSERT, Normal, edit::Insert);
    registry.add_reducer(tag::DELETE, Normal, edit::Delete);
    registry.add_reducer(tag::GROUP, Normal, group::Group);
    registry.add_reducer(tag::SERIALIZE, Normal, serial::Serialize);
    registry.add_reducer(tag::DESERIALIZE, Normal, serial::Deserialize);
    registry.add_reducer(tag::CREATE_EXPRESSION, Normal, create::CreateExpression);
    registry.add_reducer(tag::CREATE_EXPRESSION_TREE, Normal, create::CreateExpression);
    registry.add_reducer(tag::COMPARE, Normal, relation::Compare);
    registry.add_reducer(tag::ADDITION, Normal, arithmetic::Addition);
}
