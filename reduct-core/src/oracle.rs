//! Semantic equality of expressions.
//!
//! Two expressions are equal if comparing them with `Relation.Compare` reduces to
//! `Relation.Comparison.Equals`. This is a broader notion than structural equality: the
//! comparison is reduced by the session, so any reducer registered for the compared expressions
//! (or for the comparison itself) takes part in the decision.

use crate::{
    error::{kind::StepLimitExceeded, Error},
    kind::{builtin, tag},
    session::Session,
    tree::NodeId,
};
use tracing::trace;

/// Returns true if `a` and `b` are equal. Neither is modified; the comparison works on copies.
///
/// Each comparison is reduced on a step budget of its own, so grouping many expressions does not
/// exhaust the budget of the evaluation. A comparison that fails to reduce counts as "not equal",
/// unless it fails by exceeding that budget. That error is returned, reported on `a`.
pub async fn equals(session: &mut Session, a: NodeId, b: NodeId) -> Result<bool, Error> {
    let tree = session.tree_mut();
    let compare = tree.alloc(builtin::COMPARE.clone());
    for operand in [a, b] {
        let copy = tree.clone_subtree(operand);
        tree.add_child(compare, copy);
    }

    match session.reduce_apart(compare).await {
        Ok(result) => {
            let equal = session.tree().tag(result) == tag::EQUALS;
            session.tree_mut().free(result);
            Ok(equal)
        },
        Err(err) if err.is::<StepLimitExceeded>() => Err(Error { nodes: vec![a], ..err }),
        Err(err) => {
            trace!(error = %err.message(), "comparison failed");
            Ok(false)
        },
    }
}

#[cfg(test)]
mod tests {
    use crate::number::float;
    use futures::executor::block_on;
    use super::*;

    #[test]
    fn numbers_compare_by_value() {
        let mut session = Session::default();
        let two = session.integer(2);
        let also_two = session.number(float(2));
        let three = session.integer(3);

        assert!(block_on(equals(&mut session, two, also_two)).unwrap());
        assert!(!block_on(equals(&mut session, two, three)).unwrap());
        // only the operands are left
        assert_eq!(session.tree().live_count(), 3);
    }

    #[test]
    fn nested_reduction() {
        let mut session = Session::default();
        let (one, other_one) = (session.integer(1), session.integer(1));
        let sum = session.node(tag::ADDITION, [one, other_one]).unwrap();
        let two = session.integer(2);
        assert!(block_on(equals(&mut session, sum, two)).unwrap());
        assert_eq!(session.display(sum), "Math.Arithmetic.Addition(1, 1)");
    }

    #[test]
    fn structural_fallback() {
        let mut session = Session::default();
        let a = session.string("a");
        let b = session.string("b");
        let other_a = session.string("a");
        let list = session.list([a]);
        let other_list = session.list([other_a]);
        assert!(block_on(equals(&mut session, list, other_list)).unwrap());
        assert!(!block_on(equals(&mut session, list, b)).unwrap());
    }
}
