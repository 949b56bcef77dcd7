//! `Expression.CreateExpression(tag, attributes?)` and
//! `Expression.CreateExpressionTree(tag, [attributes,] subexpressions)`: builds a node of any
//! registered kind.
//!
//! Attributes are given either as a single pair `{"Name", "value"}`, or as a list of pairs
//! `{{"Name", "value"}, ...}`. `Null` stands for absent attributes or subexpressions. The
//! subexpressions are moved into the new node.

use async_trait::async_trait;
use crate::{
    error::{kind::*, Error},
    kind::tag,
    session::Session,
    tree::{NodeId, Tree},
};
use super::Reducer;
use tracing::debug;

/// The attributes given to a constructor, in the order they were given.
type Attributes = Vec<(String, String)>;

/// Returns the value of a string node, or an error on the node if it is not a string.
fn string_value(tree: &Tree, node: NodeId) -> Result<String, Error> {
    if tree.tag(node) != tag::STRING {
        return Err(Error::at(node, ExpectedString));
    }
    Ok(tree.attribute(node, "Value").unwrap_or_default().to_string())
}

/// Reads a `{name, value}` pair.
fn read_pair(tree: &Tree, pair: NodeId) -> Result<(NodeId, String, String), Error> {
    if tree.child_count(pair) != 2 {
        return Err(Error::at(pair, InvalidPair));
    }
    let (key, value) = (tree.child(pair, 0), tree.child(pair, 1));
    Ok((key, string_value(tree, key)?, string_value(tree, value)?))
}

/// Reads the attributes operand.
fn read_attributes(tree: &Tree, node: NodeId) -> Result<Attributes, Error> {
    if tree.tag(node) != tag::LIST {
        return Err(Error::at(node, ExpectedList));
    }

    let Some(&first) = tree.children(node).first() else {
        return Ok(Vec::new());
    };

    match tree.tag(first) {
        tag::STRING => {
            let (_, key, value) = read_pair(tree, node)?;
            Ok(vec![(key, value)])
        },
        tag::LIST => {
            let mut attributes = Attributes::new();
            for &pair in tree.children(node) {
                if tree.tag(pair) != tag::LIST {
                    return Err(Error::at(pair, ExpectedList));
                }

                let (key_node, key, value) = read_pair(tree, pair)?;
                if attributes.iter().any(|(k, _)| *k == key) {
                    return Err(Error::at(key_node, DuplicatedAttribute { name: key }));
                }
                attributes.push((key, value));
            }
            Ok(attributes)
        },
        _ => Err(Error::at(node, InvalidAttributeShape)),
    }
}

/// Builds a node of the kind named by its first operand.
#[derive(Debug)]
pub struct CreateExpression;

#[async_trait(?Send)]
impl Reducer for CreateExpression {
    fn name(&self) -> &'static str {
        "create expression"
    }

    async fn reduce(&self, node: NodeId, session: &mut Session) -> Result<bool, Error> {
        let tree = &session.tree;
        let tag_node = tree.child(node, 0);
        let tag_name = string_value(tree, tag_node)?;
        let kind = session.registry().create_by_tag(&tag_name).ok_or_else(|| {
            let suggestions = session.registry().similar_tags(&tag_name);
            Error::at(tag_node, UnknownTag { tag: tag_name.clone(), suggestions })
        })?;

        let operands = tree.children(node);
        let (attributes, subexpressions) = if tree.tag(node) == tag::CREATE_EXPRESSION_TREE {
            match operands.len() {
                3 => (Some(operands[1]), Some(operands[2])),
                _ => (None, operands.get(1).copied()),
            }
        } else {
            (operands.get(1).copied(), None)
        };
        let present = |id: Option<NodeId>| id.filter(|&id| tree.tag(id) != tag::NULL);
        let (attributes, subexpressions) = (present(attributes), present(subexpressions));

        // subexpressions
        if let Some(list) = subexpressions {
            if tree.tag(list) != tag::LIST {
                return Err(Error::at(list, ExpectedList));
            }
        }
        let count = subexpressions.map_or(0, |list| tree.child_count(list));
        if !kind.can_have_children(count) {
            return Err(Error::at(node, InvalidSubexpressionCount { tag: tag_name, count }));
        }

        // attributes
        let attributes = attributes.map(|list| read_attributes(tree, list)).transpose()?;
        let names = kind.attribute_names();
        let mismatch = match &attributes {
            Some(attributes) => names.is_empty() && !attributes.is_empty(),
            None => !names.is_empty(),
        };
        if mismatch {
            let expected = names.iter().map(|name| name.to_string()).collect();
            return Err(Error::at(node, AttributeCountMismatch { tag: tag_name, expected }));
        }

        let values = names.iter()
            .map(|&name| {
                attributes.iter()
                    .flatten()
                    .find(|(key, _)| key == name)
                    .map(|(_, value)| value.clone())
                    .ok_or_else(|| Error::at(node, RequiredAttribute { name: name.to_string() }))
            })
            .collect::<Result<Vec<_>, _>>()?;
        if !names.is_empty() {
            kind.check_attributes(&values)
                .map_err(|err| Error::at(node, InvalidAttributeValues { reason: err.reason }))?;
        }

        // everything is valid, build the node
        let children = subexpressions.map(|list| tree.children(list).to_vec()).unwrap_or_default();
        let tree = &mut session.tree;
        let result = tree.alloc(kind);
        if !names.is_empty() {
            tree.set_attributes(result, values);
        }
        for child in children {
            tree.detach(child);
            tree.add_child(result, child);
        }
        tree.replace(node, result);
        debug!(tag = %tag_name, %result, "expression created");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use crate::session::Failure;
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;
    use super::*;

    fn pair(session: &mut Session, key: &str, value: &str) -> NodeId {
        let (key, value) = (session.string(key), session.string(value));
        session.list([key, value])
    }

    fn create(session: &mut Session, tag_name: &str, attributes: Option<NodeId>) -> Result<NodeId, Failure> {
        let tag_node = session.string(tag_name);
        let expr = session.node(tag::CREATE_EXPRESSION, [tag_node].into_iter().chain(attributes)).unwrap();
        block_on(session.evaluate(expr))
    }

    #[test]
    fn tree_with_subexpressions() {
        let mut session = Session::default();
        let tag_node = session.string(tag::LIST);
        let (x, y) = (session.string("x"), session.integer(2));
        let subexpressions = session.list([x, y]);
        let expr = session.node(tag::CREATE_EXPRESSION_TREE, [tag_node, subexpressions]).unwrap();

        let result = block_on(session.evaluate(expr)).unwrap();
        assert_eq!(session.tree().tag(result), tag::LIST);
        assert_eq!(session.tree().children(result), &[x, y]);
    }

    #[test]
    fn tree_with_null_attributes() {
        let mut session = Session::default();
        let tag_node = session.string(tag::APPEND);
        let null = session.null();
        let (a, b) = (session.symbol("a"), session.symbol("b"));
        let subexpressions = session.list([a, b]);
        let expr = session.node(tag::CREATE_EXPRESSION_TREE, [tag_node, null, subexpressions]).unwrap();

        // the created node is reduced in turn, but symbols cannot be edited
        let failure = block_on(session.evaluate(expr)).unwrap_err();
        assert!(failure.error.is::<CannotEdit>());
        assert_eq!(session.display(failure.root), "Expression.Append(a, b)");
    }

    #[test]
    fn single_pair() {
        let mut session = Session::default();
        let attributes = pair(&mut session, "Name", "x");
        let result = create(&mut session, tag::SYMBOL, Some(attributes)).unwrap();
        assert_eq!(session.tree().tag(result), tag::SYMBOL);
        assert_eq!(session.display(result), "x");
    }

    #[test]
    fn list_of_pairs() {
        let mut session = Session::default();
        let value = pair(&mut session, "Value", "12.5");
        let attributes = session.list([value]);
        let result = create(&mut session, tag::NUMBER, Some(attributes)).unwrap();
        assert_eq!(session.tree().tag(result), tag::NUMBER);
        assert_eq!(session.tree().attribute(result, "Value"), Some("12.5"));
    }

    #[test]
    fn duplicated_attribute() {
        let mut session = Session::default();
        let first = pair(&mut session, "Name", "x");
        let second = pair(&mut session, "Name", "y");
        let duplicated_key = session.tree().child(second, 0);
        let attributes = session.list([first, second]);
        let failure = create(&mut session, tag::SYMBOL, Some(attributes)).unwrap_err();

        assert!(failure.error.is::<DuplicatedAttribute>());
        assert_eq!(failure.error.node(), Some(duplicated_key));
        assert_eq!(
            session.display(failure.root),
            r#"Expression.CreateExpression("Symbol", {{"Name", "x"}, {"Name", "y"}})"#,
        );
        // no node was created
        assert_eq!(session.tree().live_count(), 9);
    }

    #[test]
    fn unknown_tag() {
        let mut session = Session::default();
        let failure = create(&mut session, "List.Lst", None).unwrap_err();
        let err = failure.error.downcast_ref::<UnknownTag>().unwrap();
        assert_eq!(err.suggestions, vec![tag::LIST.to_string()]);
    }

    #[test]
    fn tag_must_be_a_string() {
        let mut session = Session::default();
        let tag_node = session.symbol("List.List");
        let expr = session.node(tag::CREATE_EXPRESSION, [tag_node]).unwrap();
        let failure = block_on(session.evaluate(expr)).unwrap_err();
        assert!(failure.error.is::<ExpectedString>());
    }

    #[test]
    fn attribute_count_mismatch() {
        let mut session = Session::default();
        let attributes = pair(&mut session, "Name", "x");
        let failure = create(&mut session, tag::LIST, Some(attributes)).unwrap_err();
        assert!(failure.error.is::<AttributeCountMismatch>());

        // strings need their value
        let failure = create(&mut session, tag::STRING, None).unwrap_err();
        assert!(failure.error.is::<AttributeCountMismatch>());
    }

    #[test]
    fn required_attribute() {
        let mut session = Session::default();
        let attributes = pair(&mut session, "Nam", "x");
        let failure = create(&mut session, tag::SYMBOL, Some(attributes)).unwrap_err();
        assert!(failure.error.is::<RequiredAttribute>());
        assert_eq!(failure.error.message(), "attribute [Name] is required");
    }

    #[test]
    fn invalid_attribute_values() {
        let mut session = Session::default();
        let attributes = pair(&mut session, "Value", "twelve");
        let failure = create(&mut session, tag::NUMBER, Some(attributes)).unwrap_err();
        assert!(failure.error.is::<InvalidAttributeValues>());
    }

    #[test]
    fn invalid_shapes() {
        let mut session = Session::default();
        let (a, b, c) = (session.string("a"), session.string("b"), session.string("c"));
        let triple = session.list([a, b, c]);
        let failure = create(&mut session, tag::SYMBOL, Some(triple)).unwrap_err();
        assert!(failure.error.is::<InvalidPair>());

        let one = session.integer(1);
        let numbers = session.list([one]);
        let failure = create(&mut session, tag::SYMBOL, Some(numbers)).unwrap_err();
        assert!(failure.error.is::<InvalidAttributeShape>());

        let tag_node = session.string(tag::LIST);
        let not_a_list = session.string("x");
        let expr = session.node(tag::CREATE_EXPRESSION_TREE, [tag_node, not_a_list]).unwrap();
        let failure = block_on(session.evaluate(expr)).unwrap_err();
        assert!(failure.error.is::<ExpectedList>());
    }

    #[test]
    fn invalid_subexpression_count() {
        let mut session = Session::default();
        let tag_node = session.string(tag::COMPARE);
        let x = session.string("x");
        let subexpressions = session.list([x]);
        let expr = session.node(tag::CREATE_EXPRESSION_TREE, [tag_node, subexpressions]).unwrap();
        let failure = block_on(session.evaluate(expr)).unwrap_err();
        assert!(failure.error.is::<InvalidSubexpressionCount>());
        assert_eq!(failure.error.node(), Some(failure.root));
    }
}
