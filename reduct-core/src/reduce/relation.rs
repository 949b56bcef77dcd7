use async_trait::async_trait;
use crate::{
    error::Error,
    kind::{builtin, Kind},
    session::Session,
    tree::NodeId,
};
use std::{cmp::Ordering, sync::Arc};
use super::Reducer;

/// `Relation.Compare(a, b)`: compares two expressions. Numbers are compared by value, resulting
/// in `Equals`, `Less` or `Greater`. Any other expressions are `Equals` if they are structurally
/// equal, and `Different` otherwise.
#[derive(Debug)]
pub struct Compare;

#[async_trait(?Send)]
impl Reducer for Compare {
    fn name(&self) -> &'static str {
        "compare"
    }

    async fn reduce(&self, node: NodeId, session: &mut Session) -> Result<bool, Error> {
        let tree = &mut session.tree;
        let (a, b) = (tree.child(node, 0), tree.child(node, 1));

        let kind: &Arc<dyn Kind> = match (tree.number(a), tree.number(b)) {
            (Some(a), Some(b)) => match a.partial_cmp(b) {
                Some(Ordering::Equal) => &builtin::EQUALS,
                Some(Ordering::Less) => &builtin::LESS,
                Some(Ordering::Greater) => &builtin::GREATER,
                None => &builtin::DIFFERENT,
            },
            _ if tree.structurally_equal(a, b) => &builtin::EQUALS,
            _ => &builtin::DIFFERENT,
        };

        let result = tree.alloc(kind.clone());
        tree.replace(node, result);
        Ok(true)
    }
}
