//! Textual rendering of expression trees.
//!
//! The rendering is meant for humans: lists are written `{a, b}`, strings are quoted, numbers and
//! symbols are written as-is, and every other node is written as its tag followed by its
//! attributes in brackets and its children in parentheses, e.g.
//! `Expression.Child({1, 2}, 1)` or `Expression.Reference[Source="x"]`.
//!
//! Besides the text, [`render`] records the region of the text each node was written to, which is
//! what reduction errors are reported against.

use crate::{
    kind::{tag, Payload},
    number::Number,
};
use std::{collections::HashMap, fmt::Write, ops::Range};
use super::{NodeId, Tree};

/// The rendering of an expression tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rendered {
    /// The rendered text.
    pub text: String,

    /// The region of [`Rendered::text`] that each node of the tree was rendered to.
    pub spans: HashMap<NodeId, Range<usize>>,
}

impl Rendered {
    /// Returns the region of the text the node was rendered to, if it is part of the rendering.
    pub fn span(&self, id: NodeId) -> Option<Range<usize>> {
        self.spans.get(&id).cloned()
    }
}

/// Renders the subtree rooted at the node, recording the span of every node.
pub fn render(tree: &Tree, root: NodeId) -> Rendered {
    let mut rendered = Rendered::default();
    write_node(tree, root, &mut rendered);
    rendered
}

/// Renders the subtree rooted at the node to a string.
pub fn display(tree: &Tree, root: NodeId) -> String {
    render(tree, root).text
}

fn write_number(out: &mut String, number: &Number) {
    // writing to a `String` cannot fail
    let _ = match number {
        Number::Integer(int) => write!(out, "{}", int),
        Number::Float(float) => write!(out, "{}", float.to_f64()),
    };
}

fn write_node(tree: &Tree, id: NodeId, rendered: &mut Rendered) {
    let start = rendered.text.len();
    let node = &tree[id];
    let out = &mut rendered.text;

    match (node.tag(), node.payload()) {
        (tag::LIST, _) => {
            out.push('{');
            write_children(tree, node.children(), rendered);
            rendered.text.push('}');
        },
        (tag::STRING, _) => {
            let value = tree.attribute(id, "Value").unwrap_or_default();
            let _ = write!(out, "{:?}", value);
        },
        (tag::SYMBOL, _) => out.push_str(tree.attribute(id, "Name").unwrap_or_default()),
        (tag::NUMBER, _) => out.push_str(tree.attribute(id, "Value").unwrap_or_default()),
        (_, Payload::Number(number)) => write_number(out, number),
        (tag, payload) => {
            out.push_str(tag);
            if let Payload::Attributes(values) = payload {
                out.push('[');
                let names = node.kind().attribute_names();
                for (i, (name, value)) in names.iter().zip(values).enumerate() {
                    if i != 0 {
                        out.push_str(", ");
                    }
                    let _ = write!(out, "{}={:?}", name, value);
                }
                out.push(']');
            }

            if !node.children().is_empty() || node.kind().can_have_children(1) {
                rendered.text.push('(');
                write_children(tree, node.children(), rendered);
                rendered.text.push(')');
            }
        },
    }

    let end = rendered.text.len();
    rendered.spans.insert(id, start..end);
}

fn write_children(tree: &Tree, children: &[NodeId], rendered: &mut Rendered) {
    for (i, &child) in children.iter().enumerate() {
        if i != 0 {
            rendered.text.push_str(", ");
        }
        write_node(tree, child, rendered);
    }
}

#[cfg(test)]
mod tests {
    use crate::{kind::builtin, number::float};
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn render_nested() {
        let mut tree = Tree::new();
        let child = tree.alloc(builtin::all().into_iter().find(|k| k.tag() == tag::CHILD).unwrap());
        let list = tree.alloc(builtin::LIST.clone());
        let one = tree.alloc_with(builtin::INTERNAL_NUMBER.clone(), Payload::Number(Number::from(1)));
        let half = tree.alloc_with(builtin::INTERNAL_NUMBER.clone(), Payload::Number(Number::Float(float(0.5))));
        let text = tree.alloc_with(builtin::STRING.clone(), Payload::Attributes(vec!["a \"b\"".to_string()]));
        let index = tree.alloc_with(builtin::INTERNAL_NUMBER.clone(), Payload::Number(Number::from(-1)));
        for item in [one, half, text] {
            tree.add_child(list, item);
        }
        tree.add_child(child, list);
        tree.add_child(child, index);

        let rendered = render(&tree, child);
        assert_eq!(rendered.text, r#"Expression.Child({1, 0.5, "a \"b\""}, -1)"#);
        assert_eq!(rendered.span(list), Some(17..36));
        assert_eq!(&rendered.text[rendered.span(index).unwrap()], "-1");
    }

    #[test]
    fn render_leaves_and_attributes() {
        let mut tree = Tree::new();
        let null = tree.alloc(builtin::NULL.clone());
        assert_eq!(display(&tree, null), "Null");

        let reference = tree.alloc_with(builtin::REFERENCE.clone(), Payload::Attributes(vec!["x".to_string()]));
        assert_eq!(display(&tree, reference), r#"Expression.Reference[Source="x"]"#);

        let symbol = tree.alloc_with(builtin::SYMBOL.clone(), Payload::Attributes(vec!["y".to_string()]));
        assert_eq!(display(&tree, symbol), "y");

        let empty = tree.alloc(builtin::LIST.clone());
        assert_eq!(display(&tree, empty), "{}");
    }
}
