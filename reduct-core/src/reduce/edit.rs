//! Structural edits: `Expression.Append`, `Expression.Prepend`, `Expression.Insert` and
//! `Expression.Delete`.
//!
//! Positions are 1-based. A negative position counts from the end: for an insertion `-1` is after
//! the last child, and for a deletion `-1` is the last child. Every edit replaces the whole
//! editing expression with the edited container, which keeps its identity.

use async_trait::async_trait;
use crate::{
    error::{kind::{CannotEdit, ExpectedInteger, IndexOutOfRange}, Error},
    number::native_integer,
    session::Session,
    tree::NodeId,
};
use super::Reducer;
use tracing::debug;

/// Reads the position operand of an edit.
fn position(session: &Session, node: NodeId) -> Result<i64, Error> {
    native_integer(session.tree(), node).ok_or_else(|| Error::at(node, ExpectedInteger))
}

/// `Expression.Append(container, item)`: adds `item` as the last child of `container`.
#[derive(Debug)]
pub struct Append;

#[async_trait(?Send)]
impl Reducer for Append {
    fn name(&self) -> &'static str {
        "append"
    }

    async fn reduce(&self, node: NodeId, session: &mut Session) -> Result<bool, Error> {
        let tree = &mut session.tree;
        let (container, item) = (tree.child(node, 0), tree.child(node, 1));

        let n = tree.child_count(container);
        if !tree.can_insert_child_at(container, n) {
            return Err(Error::at(container, CannotEdit { operation: "appended" }));
        }

        tree.detach(item);
        tree.add_child(container, item);
        tree.replace(node, container);
        debug!(%container, "child appended");
        Ok(true)
    }
}

/// `Expression.Prepend(container, item)`: adds `item` as the first child of `container`.
#[derive(Debug)]
pub struct Prepend;

#[async_trait(?Send)]
impl Reducer for Prepend {
    fn name(&self) -> &'static str {
        "prepend"
    }

    async fn reduce(&self, node: NodeId, session: &mut Session) -> Result<bool, Error> {
        let tree = &mut session.tree;
        let (container, item) = (tree.child(node, 0), tree.child(node, 1));

        if !tree.can_insert_child_at(container, 0) {
            return Err(Error::at(container, CannotEdit { operation: "prepended" }));
        }

        tree.detach(item);
        tree.insert_child(container, 0, item);
        tree.replace(node, container);
        debug!(%container, "child prepended");
        Ok(true)
    }
}

/// `Expression.Insert(container, item, position?)`: inserts a copy of `item` so that it ends up at
/// `position`, which defaults to after the last child.
#[derive(Debug)]
pub struct Insert;

#[async_trait(?Send)]
impl Reducer for Insert {
    fn name(&self) -> &'static str {
        "insert"
    }

    async fn reduce(&self, node: NodeId, session: &mut Session) -> Result<bool, Error> {
        let (container, item) = (session.tree.child(node, 0), session.tree.child(node, 1));
        let n = session.tree.child_count(container);

        let pos_node = session.tree.children(node).get(2).copied();
        let pos = match pos_node {
            Some(pos_node) => {
                let given = position(session, pos_node)?;
                let pos = if given < 0 { n as i64 + given + 2 } else { given };
                if pos < 1 || pos > n as i64 + 1 {
                    return Err(Error::at(pos_node, IndexOutOfRange { index: given, max: n + 1 }));
                }
                pos as usize
            },
            None => n + 1,
        };

        let tree = &mut session.tree;
        if !tree.can_insert_child_at(container, pos - 1) {
            let nodes = pos_node.into_iter().chain([container]).collect();
            return Err(Error::new(nodes, CannotEdit { operation: "inserted" }));
        }

        let copy = tree.clone_subtree(item);
        tree.insert_child(container, pos - 1, copy);
        tree.replace(node, container);
        debug!(%container, pos, "child inserted");
        Ok(true)
    }
}

/// `Expression.Delete(container, position)`: removes the child at `position`.
#[derive(Debug)]
pub struct Delete;

#[async_trait(?Send)]
impl Reducer for Delete {
    fn name(&self) -> &'static str {
        "delete"
    }

    async fn reduce(&self, node: NodeId, session: &mut Session) -> Result<bool, Error> {
        let (container, pos_node) = (session.tree.child(node, 0), session.tree.child(node, 1));
        let n = session.tree.child_count(container);

        let given = position(session, pos_node)?;
        let pos = if given < 0 { n as i64 + given + 1 } else { given };
        if pos < 1 || pos > n as i64 {
            return Err(Error::at(pos_node, IndexOutOfRange { index: given, max: n }));
        }
        let index = pos as usize - 1;

        let tree = &mut session.tree;
        if !tree.can_remove_child_at(container, index) {
            return Err(Error::new(vec![pos_node, container], CannotEdit { operation: "deleted" }));
        }

        let removed = tree.remove_child(container, index);
        tree.free(removed);
        tree.replace(node, container);
        debug!(%container, pos, "child deleted");
        Ok(true)
    }
}
