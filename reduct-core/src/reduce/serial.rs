//! `Expression.Serialize(e)` and `Expression.Deserialize(s)`: conversion between expressions and
//! markup documents held in strings.

use async_trait::async_trait;
use crate::{
    error::{kind::ExpectedString, Error},
    kind::tag,
    markup,
    number,
    session::Session,
    tree::NodeId,
};
use super::Reducer;
use tracing::debug;

/// Renders its operand as a markup document.
#[derive(Debug)]
pub struct Serialize;

#[async_trait(?Send)]
impl Reducer for Serialize {
    fn name(&self) -> &'static str {
        "serialize"
    }

    async fn reduce(&self, node: NodeId, session: &mut Session) -> Result<bool, Error> {
        let operand = session.tree.child(node, 0);
        let copy = session.tree.clone_subtree(operand);
        let copy = number::externalize(&mut session.tree, copy);
        let document = markup::serialize(&session.tree, copy);
        session.tree.free(copy);

        let document = document.map_err(|err| Error::at(operand, err))?;
        debug!(len = document.len(), "expression serialized");
        let result = session.string(document);
        session.tree.replace(node, result);
        Ok(true)
    }
}

/// Parses a string operand as a markup document, resolving the references it contains.
#[derive(Debug)]
pub struct Deserialize;

#[async_trait(?Send)]
impl Reducer for Deserialize {
    fn name(&self) -> &'static str {
        "deserialize"
    }

    async fn reduce(&self, node: NodeId, session: &mut Session) -> Result<bool, Error> {
        let operand = session.tree.child(node, 0);
        if session.tree.tag(operand) != tag::STRING {
            return Err(Error::at(operand, ExpectedString));
        }

        let document = session.tree.attribute(operand, "Value").unwrap_or_default().to_string();
        let result = markup::deserialize(session, Some(operand), &document).await?;
        session.tree.replace(node, result);
        debug!(%result, "expression deserialized");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        error::kind::{InvalidMarkup, NotSerializable, UnknownTag},
        kind::builtin,
        oracle,
        session::MapResolver,
    };
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;
    use super::*;

    fn serialize(session: &mut Session, expr: NodeId) -> String {
        let expr = session.node(tag::SERIALIZE, [expr]).unwrap();
        let result = block_on(session.evaluate(expr)).unwrap();
        assert_eq!(session.tree().tag(result), tag::STRING);
        session.tree().attribute(result, "Value").unwrap().to_string()
    }

    fn deserialize(session: &mut Session, document: &str) -> Result<NodeId, Error> {
        let text = session.string(document);
        let expr = session.node(tag::DESERIALIZE, [text]).unwrap();
        block_on(session.evaluate(expr)).map_err(|failure| failure.error)
    }

    /// Builds `{"a&b", x, {1, 2.5, -3}, Null}`, inside a `Protect` so that it stays as is.
    fn sample(session: &mut Session) -> NodeId {
        let text = session.string("a&b");
        let x = session.symbol("x");
        let numbers = [session.integer(1), session.float(2.5), session.integer(-3)];
        let numbers = session.list(numbers);
        let null = session.null();
        let list = session.list([text, x, numbers, null]);
        session.node(tag::PROTECT, [list]).unwrap()
    }

    #[test]
    fn serialized_document() {
        let mut session = Session::default();
        let x = session.symbol("x");
        let one = session.integer(1);
        let list = session.list([x, one]);
        assert_eq!(
            serialize(&mut session, list),
            concat!(
                r#"<expression tag="List.List">"#,
                r#"<expression tag="Symbol" Name="x"/>"#,
                r#"<expression tag="Math.Number" Value="1"/>"#,
                r#"</expression>"#,
            ),
        );
    }

    #[test]
    fn round_trip() {
        let mut session = Session::default();
        let expr = sample(&mut session);
        let document = serialize(&mut session, expr);

        let result = deserialize(&mut session, &document).unwrap();
        let expected = sample(&mut session);
        let expected = block_on(session.evaluate(expected)).unwrap();
        assert!(session.tree().structurally_equal(result, expected));
        assert!(block_on(oracle::equals(&mut session, result, expected)).unwrap());
        assert_eq!(session.display(result), r#"{"a&b", x, {1, 2.5, -3}, Null}"#);
    }

    #[test]
    fn serialize_leaves_no_garbage() {
        let options = crate::session::SessionOptionsBuilder::new().record_last_result(false).build();
        let mut session = Session::new(crate::registry::Registry::default(), options);
        let expr = sample(&mut session);
        let result = session.node(tag::SERIALIZE, [expr]).unwrap();
        let result = block_on(session.evaluate(result)).unwrap();
        assert_eq!(session.tree().live_count(), 1);
        assert_eq!(session.tree().tag(result), tag::STRING);
    }

    #[test]
    fn not_serializable() {
        let mut session = Session::default();
        let handler = session.tree_mut().alloc(builtin::HANDLER.clone());
        let x = session.symbol("x");
        session.tree_mut().add_child(handler, x);
        let list = session.list([handler]);
        let protected = session.node(tag::PROTECT, [list]).unwrap();
        let expr = session.node(tag::SERIALIZE, [protected]).unwrap();

        let failure = block_on(session.evaluate(expr)).unwrap_err();
        assert!(failure.error.is::<NotSerializable>());
        assert_eq!(failure.error.node(), Some(list));
    }

    #[test]
    fn invalid_documents() {
        let mut session = Session::default();
        let err = deserialize(&mut session, "<expression").unwrap_err();
        assert!(err.is::<InvalidMarkup>());

        let err = deserialize(&mut session, r#"<expression tag="Symbl" Name="x"/>"#).unwrap_err();
        let unknown = err.downcast_ref::<UnknownTag>().unwrap();
        assert_eq!(unknown.suggestions, vec![tag::SYMBOL.to_string()]);
    }

    #[test]
    fn operand_must_be_a_string() {
        let mut session = Session::default();
        let x = session.symbol("x");
        let expr = session.node(tag::DESERIALIZE, [x]).unwrap();
        let failure = block_on(session.evaluate(expr)).unwrap_err();
        assert!(failure.error.is::<ExpectedString>());
        assert_eq!(failure.error.node(), Some(x));
    }

    #[test]
    fn deserialized_expression_is_reduced() {
        let mut session = Session::default();
        session.set_resolver(MapResolver::new().with("two", r#"<expression tag="Math.Number" Value="2"/>"#));
        let document = concat!(
            r#"<expression tag="Math.Arithmetic.Addition">"#,
            r#"<expression tag="Expression.Reference" Source="two"/>"#,
            r#"<expression tag="Math.Number" Value="3"/>"#,
            r#"</expression>"#,
        );
        let result = deserialize(&mut session, document).unwrap();
        assert_eq!(session.display(result), "5");
    }
}
