//! Small reducers that inspect or reshape a single expression.

use async_trait::async_trait;
use crate::{
    error::{kind::{InvalidSubexpressionCount, UnknownTag}, Error},
    kind::tag,
    number,
    session::Session,
    tree::NodeId,
};
use super::Reducer;
use tracing::debug;

/// `Expression.Cardinality(e)`: the number of children of `e`.
#[derive(Debug)]
pub struct Cardinality;

#[async_trait(?Send)]
impl Reducer for Cardinality {
    fn name(&self) -> &'static str {
        "cardinality"
    }

    async fn reduce(&self, node: NodeId, session: &mut Session) -> Result<bool, Error> {
        let count = session.tree.child_count(session.tree.child(node, 0));
        let result = session.integer(count as i64);
        session.tree.replace(node, result);
        Ok(true)
    }
}

/// `Expression.Tag(e)`: the tag of `e`, as a string.
#[derive(Debug)]
pub struct Tag;

#[async_trait(?Send)]
impl Reducer for Tag {
    fn name(&self) -> &'static str {
        "tag"
    }

    async fn reduce(&self, node: NodeId, session: &mut Session) -> Result<bool, Error> {
        let name = session.tree.tag(session.tree.child(node, 0)).to_string();
        let result = session.string(name);
        session.tree.replace(node, result);
        Ok(true)
    }
}

/// `Expression.ReplaceTag(e, tag)`: moves the children of `e` into a new node of the given tag.
///
/// `tag` is either a string holding the tag, or any expression whose tag is used. The new node is
/// reduced in turn.
#[derive(Debug)]
pub struct ReplaceTag;

#[async_trait(?Send)]
impl Reducer for ReplaceTag {
    fn name(&self) -> &'static str {
        "replace tag"
    }

    async fn reduce(&self, node: NodeId, session: &mut Session) -> Result<bool, Error> {
        let (source, tag_node) = (session.tree.child(node, 0), session.tree.child(node, 1));
        let tag_name = match session.tree.tag(tag_node) {
            tag::STRING => session.tree.attribute(tag_node, "Value").unwrap_or_default().to_string(),
            other => other.to_string(),
        };

        let kind = session.registry().create_by_tag(&tag_name).ok_or_else(|| {
            let suggestions = session.registry().similar_tags(&tag_name);
            Error::at(tag_node, UnknownTag { tag: tag_name.clone(), suggestions })
        })?;
        let count = session.tree.child_count(source);
        if !kind.can_have_children(count) {
            return Err(Error::at(tag_node, InvalidSubexpressionCount { tag: tag_name, count }));
        }

        let tree = &mut session.tree;
        let result = tree.alloc(kind);
        for child in tree.children(source).to_vec() {
            tree.detach(child);
            tree.add_child(result, child);
        }
        tree.replace(node, result);
        debug!(tag = %tag_name, %result, "tag replaced");
        Ok(true)
    }
}

/// `Expression.Protect(e)`: `e`, which will not be reduced.
///
/// Tried before `e` is reduced.
#[derive(Debug)]
pub struct Protect;

#[async_trait(?Send)]
impl Reducer for Protect {
    fn name(&self) -> &'static str {
        "protect"
    }

    async fn reduce(&self, node: NodeId, session: &mut Session) -> Result<bool, Error> {
        let operand = session.tree.child(node, 0);
        session.tree.set_reduced(operand, true);
        session.tree.replace(node, operand);
        Ok(true)
    }
}

/// `Expression.Reduce(e)`: `e`, reduced to its normal form even if it was protected.
#[derive(Debug)]
pub struct Reduce;

#[async_trait(?Send)]
impl Reducer for Reduce {
    fn name(&self) -> &'static str {
        "reduce"
    }

    async fn reduce(&self, node: NodeId, session: &mut Session) -> Result<bool, Error> {
        let operand = session.tree.child(node, 0);
        session.tree.set_reduced(operand, false);
        let result = session.reduce_and_get(node, 0).await?;
        session.tree.replace(node, result);
        Ok(true)
    }
}

/// `Expression.Parentheses(e)`: `e`.
#[derive(Debug)]
pub struct Parentheses;

#[async_trait(?Send)]
impl Reducer for Parentheses {
    fn name(&self) -> &'static str {
        "parentheses"
    }

    async fn reduce(&self, node: NodeId, session: &mut Session) -> Result<bool, Error> {
        let operand = session.tree.child(node, 0);
        session.tree.replace(node, operand);
        Ok(true)
    }
}

/// `Expression.LastResult()`: a copy of the result of the last successful evaluation. Does not
/// apply if there is none.
#[derive(Debug)]
pub struct LastResult;

#[async_trait(?Send)]
impl Reducer for LastResult {
    fn name(&self) -> &'static str {
        "last result"
    }

    async fn reduce(&self, node: NodeId, session: &mut Session) -> Result<bool, Error> {
        let Some(last) = session.last_result() else {
            return Ok(false);
        };

        let precision = session.options().precision;
        let copy = session.tree.clone_subtree(last);
        let copy = number::internalize(&mut session.tree, copy, precision);
        session.tree.replace(node, copy);
        Ok(true)
    }
}
