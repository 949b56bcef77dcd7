//! Addressing nodes by path.
//!
//! A path is either a single position or a list of positions applied one after the other, each
//! selecting a child of the node selected so far. Positions are 1-based integers; negative
//! positions count from the end, so `-1` is the last child. An empty list addresses the node
//! itself.

use crate::{
    error::{kind::InvalidPath, Error},
    kind::tag,
    number::native_integer,
    tree::{NodeId, Tree},
};

/// Selects one child of `node` by position.
fn step(tree: &Tree, node: NodeId, position: i64) -> Option<NodeId> {
    let n = tree.child_count(node) as i64;
    let index = match position {
        p if p >= 1 && p <= n => p - 1,
        p if p <= -1 && p >= -n => n + p,
        _ => return None,
    };
    Some(tree.child(node, index as usize))
}

/// Returns the node addressed by the path `spec`, starting at `node`.
///
/// Errors are reported on `spec`.
pub fn resolve_by_spec(tree: &Tree, node: NodeId, spec: NodeId) -> Result<NodeId, Error> {
    let invalid = |reason: String| Error::at(spec, InvalidPath { reason });

    let positions = match tree.tag(spec) {
        tag::INTERNAL_NUMBER => vec![spec],
        tag::LIST => tree.children(spec).to_vec(),
        _ => return Err(invalid("a path is a position, or a list of positions".to_string())),
    };

    let mut current = node;
    for (depth, position_node) in positions.into_iter().enumerate() {
        let position = native_integer(tree, position_node)
            .ok_or_else(|| invalid(format!("step {} of the path is not an integer", depth + 1)))?;
        current = step(tree, current, position).ok_or_else(|| invalid(format!(
            "step {} of the path selects position {}, but the expression there has {} subexpression(s)",
            depth + 1,
            position,
            tree.child_count(current),
        )))?;
    }

    Ok(current)
}

#[cfg(test)]
mod tests {
    use crate::session::Session;
    use pretty_assertions::assert_eq;
    use super::*;

    /// Builds `{"a", {"b", "c"}}`.
    fn sample(session: &mut Session) -> NodeId {
        let (a, b, c) = (session.string("a"), session.string("b"), session.string("c"));
        let inner = session.list([b, c]);
        session.list([a, inner])
    }

    #[test]
    fn single_position() {
        let mut session = Session::default();
        let root = sample(&mut session);
        let two = session.integer(2);
        let minus_two = session.integer(-2);

        let tree = session.tree();
        assert_eq!(resolve_by_spec(tree, root, two).unwrap(), tree.child(root, 1));
        assert_eq!(resolve_by_spec(tree, root, minus_two).unwrap(), tree.child(root, 0));
    }

    #[test]
    fn list_of_positions() {
        let mut session = Session::default();
        let root = sample(&mut session);
        let steps = [2, -1].map(|p| session.integer(p));
        let path = session.list(steps);
        let empty = session.list([]);

        let tree = session.tree();
        let found = resolve_by_spec(tree, root, path).unwrap();
        assert_eq!(session.display(found), r#""c""#);
        assert_eq!(resolve_by_spec(tree, root, empty).unwrap(), root);
    }

    #[test]
    fn invalid_paths() {
        let mut session = Session::default();
        let root = sample(&mut session);
        let zero = session.integer(0);
        let three = session.integer(3);
        let most_negative = session.integer(i64::MIN);
        let text = session.string("1");
        let steps = [1, 1].map(|p| session.integer(p));
        let too_deep = session.list(steps);

        for spec in [zero, three, most_negative, text, too_deep] {
            let err = resolve_by_spec(session.tree(), root, spec).unwrap_err();
            assert!(err.is::<InvalidPath>());
            assert_eq!(err.node(), Some(spec));
        }
    }
}
