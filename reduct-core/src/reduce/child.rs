use async_trait::async_trait;
use crate::{error::Error, path::resolve_by_spec, session::Session, tree::NodeId};
use super::Reducer;
use tracing::debug;

/// `Expression.Child(expression, path)`: a copy of the node of `expression` addressed by `path`.
#[derive(Debug)]
pub struct Child;

#[async_trait(?Send)]
impl Reducer for Child {
    fn name(&self) -> &'static str {
        "child"
    }

    async fn reduce(&self, node: NodeId, session: &mut Session) -> Result<bool, Error> {
        let spec = session.reduce_and_get(node, 1).await?;
        let source = session.tree.child(node, 0);
        let target = resolve_by_spec(&session.tree, source, spec)?;

        let copy = session.tree.clone_subtree(target);
        session.tree.replace(node, copy);
        debug!(%target, "child extracted");
        Ok(true)
    }
}
