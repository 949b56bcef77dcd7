use async_trait::async_trait;
use crate::{
    error::Error,
    kind::{builtin, Payload},
    number::Number,
    oracle,
    session::Session,
    tree::NodeId,
};
use super::Reducer;
use tracing::debug;

/// `Expression.Group(expression)`: partitions the children of `expression` into classes of equal
/// expressions, and counts them.
///
/// The result is a list of pairs `{representative, count}`, one per class, in order of first
/// occurrence. The representative is a copy of the first child of the class. Children are
/// compared with [`oracle::equals`], one comparison at a time, against every representative found
/// so far. If a comparison exceeds its step budget, the whole grouping fails.
#[derive(Debug)]
pub struct Group;

#[async_trait(?Send)]
impl Reducer for Group {
    fn name(&self) -> &'static str {
        "group"
    }

    async fn reduce(&self, node: NodeId, session: &mut Session) -> Result<bool, Error> {
        let operand = session.tree.child(node, 0);
        let items = session.tree.children(operand).to_vec();

        let mut classes: Vec<(NodeId, i64)> = Vec::new();
        'items: for item in items {
            for i in 0..classes.len() {
                match oracle::equals(session, item, classes[i].0).await {
                    Ok(true) => {
                        classes[i].1 += 1;
                        continue 'items;
                    },
                    Ok(false) => (),
                    Err(err) => {
                        for (representative, _) in classes {
                            session.tree.free(representative);
                        }
                        return Err(err);
                    },
                }
            }

            let representative = session.tree.clone_subtree(item);
            classes.push((representative, 1));
        }

        debug!(classes = classes.len(), "children grouped");
        let tree = &mut session.tree;
        let result = tree.alloc(builtin::LIST.clone());
        for (representative, count) in classes {
            let pair = tree.alloc(builtin::LIST.clone());
            let count = tree.alloc_with(builtin::INTERNAL_NUMBER.clone(), Payload::Number(Number::from(count)));
            tree.add_child(pair, representative);
            tree.add_child(pair, count);
            tree.add_child(result, pair);
        }
        tree.replace(node, result);
        Ok(true)
    }
}
