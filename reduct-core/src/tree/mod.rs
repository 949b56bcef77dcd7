//! The expression tree.
//!
//! All nodes of all expressions handled by a [`Session`](crate::session::Session) live in a
//! single arena, the [`Tree`], and are addressed by [`NodeId`] handles. A node is either
//! *attached* (it is the child of exactly one other node) or *detached* (it is the root of its own
//! subtree). Handles of freed nodes are recycled, so a handle must not be used after the node it
//! refers to has been freed.
//!
//! The primitive that the reducers are built on is [`Tree::replace`], which puts a node in the
//! place another node occupies in its parent, and frees the replaced subtree.

pub mod fmt;
mod iter;

use crate::{
    kind::{Kind, Payload},
    number::Number,
};
use std::{ops::Index, sync::Arc};

pub use iter::PostOrder;

/// A handle to a node in a [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A single expression node.
#[derive(Debug, Clone)]
pub struct Node {
    kind: Arc<dyn Kind>,
    payload: Payload,
    children: Vec<NodeId>,
    parent: Option<NodeId>,

    /// Set when no reducer should be applied to the node anymore.
    reduced: bool,
}

impl Node {
    /// The tag of the node.
    pub fn tag(&self) -> &str {
        self.kind.tag()
    }

    /// The kind of the node.
    pub fn kind(&self) -> &Arc<dyn Kind> {
        &self.kind
    }

    /// The payload of the node.
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// The children of the node, in order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// The parent of the node, if it is attached.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Returns true if the node is marked as reduced.
    pub fn is_reduced(&self) -> bool {
        self.reduced
    }
}

/// The arena holding every node.
#[derive(Debug, Default)]
pub struct Tree {
    slots: Vec<Option<Node>>,
    free: Vec<u32>,
}

impl Index<NodeId> for Tree {
    type Output = Node;

    /// Panics if the node was freed.
    fn index(&self, id: NodeId) -> &Node {
        match self.slots.get(id.index()) {
            Some(Some(node)) => node,
            _ => panic!("use of freed node {}", id),
        }
    }
}

impl Tree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        match self.slots.get_mut(id.index()) {
            Some(Some(node)) => node,
            _ => panic!("use of freed node {}", id),
        }
    }

    /// Allocates a detached node of the given kind, without children, carrying the kind's default
    /// payload.
    pub fn alloc(&mut self, kind: Arc<dyn Kind>) -> NodeId {
        let payload = kind.default_payload();
        self.alloc_with(kind, payload)
    }

    /// Allocates a detached node of the given kind with the given payload.
    pub fn alloc_with(&mut self, kind: Arc<dyn Kind>, payload: Payload) -> NodeId {
        let node = Node {
            kind,
            payload,
            children: Vec::new(),
            parent: None,
            reduced: false,
        };

        match self.free.pop() {
            Some(index) => {
                self.slots[index as usize] = Some(node);
                NodeId(index)
            },
            None => {
                self.slots.push(Some(node));
                NodeId((self.slots.len() - 1) as u32)
            },
        }
    }

    /// Returns true if the handle refers to a live node.
    pub fn contains(&self, id: NodeId) -> bool {
        matches!(self.slots.get(id.index()), Some(Some(_)))
    }

    /// The number of live nodes.
    pub fn live_count(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn tag(&self, id: NodeId) -> &str {
        self[id].tag()
    }

    pub fn kind(&self, id: NodeId) -> &Arc<dyn Kind> {
        self[id].kind()
    }

    pub fn payload(&self, id: NodeId) -> &Payload {
        self[id].payload()
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self[id].children()
    }

    /// Returns the child at the given zero-based index. Panics if there is no such child.
    pub fn child(&self, id: NodeId, index: usize) -> NodeId {
        self[id].children[index]
    }

    pub fn child_count(&self, id: NodeId) -> usize {
        self[id].children.len()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self[id].parent
    }

    /// Returns the parent of the node, and the zero-based index of the node among its children.
    pub fn position(&self, id: NodeId) -> Option<(NodeId, usize)> {
        let parent = self[id].parent?;
        let index = self[parent].children.iter().position(|&c| c == id)?;
        Some((parent, index))
    }

    pub fn is_reduced(&self, id: NodeId) -> bool {
        self[id].reduced
    }

    pub fn set_reduced(&mut self, id: NodeId, reduced: bool) {
        self.node_mut(id).reduced = reduced;
    }

    /// Returns the value of the named attribute of the node.
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        let node = &self[id];
        let index = node.kind.attribute_names().iter().position(|&n| n == name)?;
        match &node.payload {
            Payload::Attributes(values) => values.get(index).map(String::as_str),
            _ => None,
        }
    }

    /// Returns the internal number carried by the node.
    pub fn number(&self, id: NodeId) -> Option<&Number> {
        match &self[id].payload {
            Payload::Number(number) => Some(number),
            _ => None,
        }
    }

    /// Replaces the attribute values of the node. The values must be in the order of the kind's
    /// attribute names, and must have been checked by the kind.
    pub fn set_attributes(&mut self, id: NodeId, values: Vec<String>) {
        self.node_mut(id).payload = Payload::Attributes(values);
    }

    /// Returns true if a child could be inserted at the given zero-based index by the node's kind.
    pub fn can_insert_child_at(&self, id: NodeId, index: usize) -> bool {
        let node = &self[id];
        node.kind.can_insert_child_at(node.children.len(), index)
    }

    /// Returns true if the child at the given zero-based index could be removed by the node's
    /// kind.
    pub fn can_remove_child_at(&self, id: NodeId, index: usize) -> bool {
        let node = &self[id];
        node.kind.can_remove_child_at(node.children.len(), index)
    }

    /// Appends a detached node to the children of `parent`.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) {
        let len = self.child_count(parent);
        self.insert_child(parent, len, child);
    }

    /// Inserts a detached node at the given zero-based index of the children of `parent`.
    pub fn insert_child(&mut self, parent: NodeId, index: usize, child: NodeId) {
        debug_assert!(self[child].parent.is_none(), "node {} is already attached", child);
        self.node_mut(parent).children.insert(index, child);
        self.node_mut(child).parent = Some(parent);
    }

    /// Removes the child at the given zero-based index, and returns it detached.
    pub fn remove_child(&mut self, parent: NodeId, index: usize) -> NodeId {
        let child = self.node_mut(parent).children.remove(index);
        self.node_mut(child).parent = None;
        child
    }

    /// Detaches the node from its parent, if any.
    pub fn detach(&mut self, id: NodeId) {
        if let Some((parent, index)) = self.position(id) {
            self.remove_child(parent, index);
        }
    }

    /// Puts `new` in the place of `old`, then frees the subtree rooted at `old`.
    ///
    /// `new` is detached first, so it can be a descendant of `old`. If `old` is detached, `new`
    /// simply ends up detached as well.
    pub fn replace(&mut self, old: NodeId, new: NodeId) {
        if old == new {
            return;
        }

        self.detach(new);
        if let Some((parent, index)) = self.position(old) {
            self.node_mut(parent).children[index] = new;
            self.node_mut(new).parent = Some(parent);
            self.node_mut(old).parent = None;
        }
        self.free(old);
    }

    /// Detaches the node and frees the whole subtree rooted at it.
    pub fn free(&mut self, id: NodeId) {
        self.detach(id);
        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            if let Some(node) = self.slots[id.index()].take() {
                stack.extend(node.children);
                self.free.push(id.0);
            }
        }
    }

    /// Creates a detached deep copy of the subtree rooted at the node. The reduced flags are not
    /// copied.
    pub fn clone_subtree(&mut self, id: NodeId) -> NodeId {
        let node = &self[id];
        let (kind, payload, children) = (node.kind.clone(), node.payload.clone(), node.children.clone());

        let copy = self.alloc_with(kind, payload);
        for child in children {
            let child_copy = self.clone_subtree(child);
            self.add_child(copy, child_copy);
        }
        copy
    }

    /// Returns true if both subtrees have the same shape, tags and payloads.
    pub fn structurally_equal(&self, a: NodeId, b: NodeId) -> bool {
        let (a, b) = (&self[a], &self[b]);
        a.tag() == b.tag()
            && a.payload == b.payload
            && a.children.len() == b.children.len()
            && a.children.iter()
                .zip(&b.children)
                .all(|(&a, &b)| self.structurally_equal(a, b))
    }

    /// Returns an iterator over the subtree rooted at the node, in left-to-right post-order.
    pub fn post_order(&self, root: NodeId) -> PostOrder<'_> {
        PostOrder::new(self, root)
    }
}

#[cfg(test)]
mod tests {
    use crate::kind::builtin;
    use pretty_assertions::assert_eq;
    use super::*;

    fn string(tree: &mut Tree, value: &str) -> NodeId {
        tree.alloc_with(builtin::STRING.clone(), Payload::Attributes(vec![value.to_string()]))
    }

    /// Builds `{"a", {"b"}, "c"}`.
    fn sample(tree: &mut Tree) -> NodeId {
        let list = tree.alloc(builtin::LIST.clone());
        let inner = tree.alloc(builtin::LIST.clone());
        for (parent, value) in [(list, "a"), (inner, "b")] {
            let s = string(tree, value);
            tree.add_child(parent, s);
        }
        tree.add_child(list, inner);
        let c = string(tree, "c");
        tree.add_child(list, c);
        list
    }

    #[test]
    fn attach_and_detach() {
        let mut tree = Tree::new();
        let list = sample(&mut tree);
        let inner = tree.child(list, 1);
        assert_eq!(tree.position(inner), Some((list, 1)));

        tree.detach(inner);
        assert_eq!(tree.parent(inner), None);
        assert_eq!(tree.child_count(list), 2);
        assert_eq!(tree.attribute(tree.child(list, 1), "Value"), Some("c"));
    }

    #[test]
    fn replace_frees_old_subtree() {
        let mut tree = Tree::new();
        let list = sample(&mut tree);
        assert_eq!(tree.live_count(), 5);

        let inner = tree.child(list, 1);
        let x = string(&mut tree, "x");
        tree.replace(inner, x);
        assert_eq!(tree.child(list, 1), x);
        assert_eq!(tree.parent(x), Some(list));
        assert!(!tree.contains(inner));
        assert_eq!(tree.live_count(), 4);
    }

    #[test]
    fn replace_with_descendant() {
        let mut tree = Tree::new();
        let list = sample(&mut tree);
        let inner = tree.child(list, 1);
        let b = tree.child(inner, 0);

        tree.replace(inner, b);
        assert_eq!(tree.children(list), &[tree.child(list, 0), b, tree.child(list, 2)]);
        assert_eq!(tree.parent(b), Some(list));
        assert_eq!(tree.live_count(), 4);
    }

    #[test]
    fn freed_slots_are_recycled() {
        let mut tree = Tree::new();
        let list = sample(&mut tree);
        tree.free(list);
        assert_eq!(tree.live_count(), 0);

        let again = sample(&mut tree);
        assert_eq!(tree.live_count(), 5);
        assert!(tree.contains(again));
    }

    #[test]
    fn clone_is_deep_and_detached() {
        let mut tree = Tree::new();
        let list = sample(&mut tree);
        tree.set_reduced(list, true);

        let copy = tree.clone_subtree(list);
        assert_ne!(copy, list);
        assert_eq!(tree.parent(copy), None);
        assert!(!tree.is_reduced(copy));
        assert!(tree.structurally_equal(list, copy));
        assert_eq!(tree.live_count(), 10);

        let inner_copy = tree.child(copy, 1);
        tree.free(inner_copy);
        assert!(!tree.structurally_equal(list, copy));
        assert_eq!(tree.child_count(list), 3);
    }

    #[test]
    fn post_order_visits_children_first() {
        let mut tree = Tree::new();
        let list = sample(&mut tree);
        let values = tree.post_order(list)
            .map(|id| tree.attribute(id, "Value").unwrap_or(tree.tag(id)).to_string())
            .collect::<Vec<_>>();
        assert_eq!(values, vec!["a", "b", "List.List", "c", "List.List"]);
    }
}
