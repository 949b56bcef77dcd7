use async_trait::async_trait;
use crate::{
    error::Error,
    kind::{builtin, Payload},
    number::Number,
    session::Session,
    tree::NodeId,
};
use super::Reducer;

/// `Math.Arithmetic.Addition(a, b, ...)`: the sum of its operands, when they are all numbers.
#[derive(Debug)]
pub struct Addition;

#[async_trait(?Send)]
impl Reducer for Addition {
    fn name(&self) -> &'static str {
        "addition"
    }

    async fn reduce(&self, node: NodeId, session: &mut Session) -> Result<bool, Error> {
        let precision = session.options().precision;
        let tree = &mut session.tree;

        let mut sum = Number::from(0);
        for &operand in tree.children(node) {
            let Some(number) = tree.number(operand) else {
                return Ok(false);
            };
            sum = sum.add(number, precision);
        }

        let result = tree.alloc_with(builtin::INTERNAL_NUMBER.clone(), Payload::Number(sum));
        tree.replace(node, result);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use crate::kind::tag;
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn sums_numbers() {
        let mut session = Session::default();
        let operands = [1, 2, 3].map(|n| session.integer(n));
        let half = session.float(0.5);
        let expr = session.node(tag::ADDITION, operands.into_iter().chain([half])).unwrap();
        let result = block_on(session.evaluate(expr)).unwrap();
        assert_eq!(session.display(result), "6.5");
    }

    #[test]
    fn not_applicable_to_symbols() {
        let mut session = Session::default();
        let (one, x) = (session.integer(1), session.symbol("x"));
        let expr = session.node(tag::ADDITION, [one, x]).unwrap();
        let result = block_on(session.evaluate(expr)).unwrap();
        assert_eq!(session.display(result), "Math.Arithmetic.Addition(1, x)");
    }
}
