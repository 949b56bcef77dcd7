use super::{NodeId, Tree};

/// An iterator that iteratively traverses a subtree in left-to-right post-order (i.e.
/// depth-first).
///
/// This iterator is created by [`Tree::post_order`].
pub struct PostOrder<'a> {
    tree: &'a Tree,
    stack: Vec<NodeId>,
    last_visited: Option<NodeId>,
}

impl<'a> PostOrder<'a> {
    /// Creates a new iterator that traverses the subtree rooted at `root` in left-to-right
    /// post-order (i.e. depth-first).
    pub fn new(tree: &'a Tree, root: NodeId) -> Self {
        Self {
            tree,
            stack: vec![root],
            last_visited: None,
        }
    }

    /// Pops the current node in the stack and marks it as the last visited node.
    fn visit(&mut self) -> Option<NodeId> {
        self.last_visited = Some(self.stack.pop()?);
        self.last_visited
    }
}

impl<'a> Iterator for PostOrder<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let tree = self.tree;
        loop {
            let id = *self.stack.last()?;
            let children = tree.children(id);
            if children.is_empty() || children.last().copied() == self.last_visited {
                return self.visit();
            }
            self.stack.extend(children.iter().rev());
        }
    }
}
