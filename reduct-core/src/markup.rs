//! Conversion between expression trees and the markup format of [`reduct_markup`].
//!
//! Every node becomes one element: its tag, its attributes (by name), and its children, in order.
//! Nodes of non-serializable kinds, such as internal numbers, cannot be converted; numbers must be
//! externalized first (see [`number::externalize`]).
//!
//! Building a tree from markup validates each element against the registered kinds. Elements of a
//! kind that stands for an expression stored elsewhere (`Expression.Reference`) are resolved with
//! the session's [`ReferenceResolver`](crate::session::ReferenceResolver) once the whole document
//! has been built, one after the other, and the retrieved document is built in their place.

use crate::{
    error::{kind::*, Error},
    kind::Payload,
    number,
    session::Session,
    tree::{NodeId, Tree},
};
use futures::future::{FutureExt, LocalBoxFuture};
use reduct_error::ErrorKind;
use reduct_markup::{parser::{error::NestingTooDeep, Parser}, Element};
use tracing::debug;

/// A reference found while building a tree, and not yet resolved.
#[derive(Debug)]
struct Pending {
    node: NodeId,
    source: String,
}

/// Converts the subtree rooted at the node into an [`Element`].
pub fn to_element(tree: &Tree, root: NodeId) -> Result<Element, NotSerializable> {
    let node = &tree[root];
    let kind = node.kind();
    if !kind.is_serializable() {
        return Err(NotSerializable { tag: node.tag().to_string() });
    }

    let mut element = Element::new(node.tag());
    if let Payload::Attributes(values) = node.payload() {
        for (name, value) in kind.attribute_names().iter().zip(values) {
            element = element.with_attribute(*name, value.as_str());
        }
    }
    for &child in node.children() {
        element = element.with_child(to_element(tree, child)?);
    }
    Ok(element)
}

/// Renders the subtree rooted at the node as a markup document.
pub fn serialize(tree: &Tree, root: NodeId) -> Result<String, NotSerializable> {
    to_element(tree, root).map(|element| reduct_markup::render(&element))
}

fn error_at(origin: Option<NodeId>, kind: impl ErrorKind + 'static) -> Error {
    Error::new(origin.into_iter().collect(), kind)
}

/// Creates the nodes for an element and its descendants, recording the references to resolve.
/// `depth` is the nesting depth of the element, 1 for the root.
fn from_element(
    session: &mut Session,
    origin: Option<NodeId>,
    element: &Element,
    depth: usize,
    pending: &mut Vec<Pending>,
) -> Result<NodeId, Error> {
    let limit = session.options().max_nesting_depth;
    if depth > limit {
        return Err(error_at(origin, NestingDepthExceeded { limit }));
    }

    let tag = element.tag.as_str();
    let kind = session.registry().create_by_tag(tag).ok_or_else(|| {
        let suggestions = session.registry().similar_tags(tag);
        error_at(origin, UnknownTag { tag: tag.to_string(), suggestions })
    })?;
    if !kind.is_serializable() {
        return Err(error_at(origin, NotSerializable { tag: tag.to_string() }));
    }

    let count = element.children.len();
    if !kind.can_have_children(count) {
        return Err(error_at(origin, InvalidSubexpressionCount { tag: tag.to_string(), count }));
    }

    let names = kind.attribute_names();
    if let Some((name, _)) = element.attributes.iter().find(|(name, _)| !names.contains(&name.as_str())) {
        return Err(error_at(origin, InvalidMarkup {
            message: format!("expressions tagged `{}` have no attribute `{}`", tag, name),
        }));
    }
    let values = names.iter()
        .map(|&name| {
            element.attribute(name)
                .map(str::to_string)
                .ok_or_else(|| error_at(origin, RequiredAttribute { name: name.to_string() }))
        })
        .collect::<Result<Vec<_>, _>>()?;
    if !names.is_empty() {
        kind.check_attributes(&values)
            .map_err(|err| error_at(origin, InvalidAttributeValues { reason: err.reason }))?;
    }

    let mut children = Vec::with_capacity(count);
    for child in &element.children {
        match from_element(session, origin, child, depth + 1, pending) {
            Ok(id) => children.push(id),
            Err(err) => {
                for id in children {
                    session.tree_mut().free(id);
                }
                return Err(err);
            },
        }
    }

    let source = kind.reference_attribute().and_then(|attr| element.attribute(attr)).map(str::to_string);
    let tree = session.tree_mut();
    let id = tree.alloc(kind);
    if !names.is_empty() {
        tree.set_attributes(id, values);
    }
    for child in children {
        tree.add_child(id, child);
    }
    if let Some(source) = source {
        pending.push(Pending { node: id, source });
    }
    Ok(id)
}

/// Parses a document and builds its tree, resolving its references. `depth` is the number of
/// references followed to reach the document.
async fn parse_tree(session: &mut Session, origin: Option<NodeId>, text: &str, depth: usize) -> Result<NodeId, Error> {
    let limit = session.options().max_nesting_depth;
    let element = Parser::new(text).with_max_depth(limit).parse_document().map_err(|err| {
        if err.is::<NestingTooDeep>() {
            return error_at(origin, NestingDepthExceeded { limit });
        }
        let at = err.spans.first().map_or(0, |span| span.start);
        error_at(origin, InvalidMarkup { message: format!("{} (at offset {})", err.kind.message(), at) })
    })?;
    build_at_depth(session, origin, &element, depth).await
}

async fn build_at_depth(session: &mut Session, origin: Option<NodeId>, element: &Element, depth: usize) -> Result<NodeId, Error> {
    let mut pending = Vec::new();
    let root = from_element(session, origin, element, 1, &mut pending)?;
    resolve_pending(session, origin, root, pending, depth).await
}

/// Resolves the references of the tree rooted at `root`, in document order. Returns the new root,
/// which differs from `root` only if the root itself was a reference.
///
/// On failure, the whole tree is freed.
fn resolve_pending<'a>(
    session: &'a mut Session,
    origin: Option<NodeId>,
    root: NodeId,
    pending: Vec<Pending>,
    depth: usize,
) -> LocalBoxFuture<'a, Result<NodeId, Error>> {
    async move {
        if pending.is_empty() {
            return Ok(root);
        }

        let limit = session.options().max_reference_depth;
        if depth >= limit {
            session.tree_mut().free(root);
            return Err(error_at(origin, ReferenceDepthExceeded { limit }));
        }

        let resolver = session.resolver();
        let mut root = root;
        for Pending { node, source } in pending {
            debug!(%source, depth, "resolving reference");
            let resolved = match resolver.resolve(&source).await {
                Ok(document) => parse_tree(session, origin, &document, depth + 1).await,
                Err(reason) => Err(error_at(origin, UnresolvedReference { source, reason })),
            };

            let target = match resolved {
                Ok(target) => target,
                Err(err) => {
                    session.tree_mut().free(root);
                    return Err(err);
                },
            };

            if node == root {
                root = target;
            }
            session.tree_mut().replace(node, target);
        }
        Ok(root)
    }.boxed_local()
}

/// Builds the tree described by an element, resolving its references. Errors are reported on
/// `origin`, if given.
pub async fn build(session: &mut Session, origin: Option<NodeId>, element: &Element) -> Result<NodeId, Error> {
    build_at_depth(session, origin, element, 0).await
}

/// Parses a markup document into a detached tree with internal numbers. Errors are reported on
/// `origin`, if given.
pub async fn deserialize(session: &mut Session, origin: Option<NodeId>, text: &str) -> Result<NodeId, Error> {
    let root = parse_tree(session, origin, text, 0).await?;
    let precision = session.options().precision;
    Ok(number::internalize(session.tree_mut(), root, precision))
}
