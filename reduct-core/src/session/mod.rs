//! The reduction session.
//!
//! A [`Session`] owns the [`Tree`] holding every expression it works on, the [`Registry`] of
//! kinds and reducers, and the state shared by reducers (last result, step counter,
//! diagnostics). Reduction is asynchronous: reducers receive `&mut Session`, so only one
//! reduction chain can be active at a time, and every nested reduction a reducer starts is awaited
//! before it continues.
//!
//! ```
//! use futures::executor::block_on;
//! use reduct_core::{kind::tag, Session};
//!
//! let mut session = Session::default();
//! let list = session.list([]);
//! let item = session.string("x");
//! let append = session.node(tag::APPEND, [list, item]).unwrap();
//!
//! let result = block_on(session.evaluate(append)).unwrap();
//! assert_eq!(session.display(result), r#"{"x"}"#);
//! ```

mod options;
mod resolver;

use crate::{
    error::{kind::StepLimitExceeded, Error},
    kind::{builtin, Payload},
    number::{self, Number},
    reduce::Stage,
    registry::Registry,
    tree::{fmt, NodeId, Tree},
};
use futures::future::{FutureExt, LocalBoxFuture};
use rug::Float;
use std::{ops::Range, rc::Rc, sync::Arc};
use tracing::{debug, trace};

pub use options::{SessionOptions, SessionOptionsBuilder};
pub use resolver::{MapResolver, NoReferences, ReferenceResolver};

/// A diagnostic recorded when an evaluation fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// The node the error was reported on. It may have been freed since.
    pub node: Option<NodeId>,

    /// The message of the error.
    pub message: String,

    /// The rendering of the expression being evaluated, at the time of the error.
    pub expression: String,

    /// The region of [`Diagnostic::expression`] occupied by the node.
    pub span: Option<Range<usize>>,
}

/// An evaluation failed.
#[derive(Debug)]
pub struct Failure {
    /// The expression as it was when the error occurred, detached.
    pub root: NodeId,

    /// The error.
    pub error: Error,
}

/// The state of a series of evaluations.
#[derive(Debug)]
pub struct Session {
    pub(crate) tree: Tree,
    registry: Arc<Registry>,
    options: SessionOptions,
    resolver: Rc<dyn ReferenceResolver>,

    /// The number of reducers applied during the current evaluation.
    steps: usize,

    /// A detached copy of the last result, with its numbers externalized.
    last_result: Option<NodeId>,

    diagnostics: Vec<Diagnostic>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Registry::default(), SessionOptions::default())
    }
}

impl Session {
    /// Creates a new session with the given registry and options.
    pub fn new(registry: Registry, options: SessionOptions) -> Self {
        Self {
            tree: Tree::new(),
            registry: Arc::new(registry),
            options,
            resolver: Rc::new(NoReferences),
            steps: 0,
            last_result: None,
            diagnostics: Vec::new(),
        }
    }

    /// Sets the resolver used for references found while deserializing.
    pub fn set_resolver(&mut self, resolver: impl ReferenceResolver + 'static) {
        self.resolver = Rc::new(resolver);
    }

    pub(crate) fn resolver(&self) -> Rc<dyn ReferenceResolver> {
        self.resolver.clone()
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut Tree {
        &mut self.tree
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// Allocates a detached node of the kind registered under the given tag.
    pub fn create_by_tag(&mut self, tag: &str) -> Option<NodeId> {
        let kind = self.registry.create_by_tag(tag)?;
        Some(self.tree.alloc(kind))
    }

    /// Creates a node of the kind registered under the given tag, with the given detached nodes as
    /// children.
    ///
    /// Returns [`None`] if the tag is unknown, or if its kind cannot have that many children.
    pub fn node(&mut self, tag: &str, children: impl IntoIterator<Item = NodeId>) -> Option<NodeId> {
        let children = children.into_iter().collect::<Vec<_>>();
        let kind = self.registry.create_by_tag(tag)?;
        if !kind.can_have_children(children.len()) {
            return None;
        }

        let id = self.tree.alloc(kind);
        for child in children {
            self.tree.add_child(id, child);
        }
        Some(id)
    }

    /// Creates a list with the given detached nodes as children.
    pub fn list(&mut self, children: impl IntoIterator<Item = NodeId>) -> NodeId {
        let id = self.tree.alloc(builtin::LIST.clone());
        for child in children {
            self.tree.add_child(id, child);
        }
        id
    }

    pub fn string(&mut self, value: impl Into<String>) -> NodeId {
        self.tree.alloc_with(builtin::STRING.clone(), Payload::Attributes(vec![value.into()]))
    }

    /// Creates a symbol. The name should not be empty.
    pub fn symbol(&mut self, name: impl Into<String>) -> NodeId {
        self.tree.alloc_with(builtin::SYMBOL.clone(), Payload::Attributes(vec![name.into()]))
    }

    pub fn null(&mut self) -> NodeId {
        self.tree.alloc(builtin::NULL.clone())
    }

    /// Creates an internal number.
    pub fn number(&mut self, number: impl Into<Number>) -> NodeId {
        self.tree.alloc_with(builtin::INTERNAL_NUMBER.clone(), Payload::Number(number.into()))
    }

    /// Creates an internal integer.
    pub fn integer(&mut self, n: i64) -> NodeId {
        self.number(n)
    }

    /// Creates an internal float, with the session's precision.
    pub fn float(&mut self, n: f64) -> NodeId {
        self.number(Float::with_val(self.options.precision, n))
    }

    /// Renders the subtree rooted at the node.
    pub fn display(&self, id: NodeId) -> String {
        fmt::display(&self.tree, id)
    }

    /// Renders the subtree rooted at the node, recording the span of every node.
    pub fn render(&self, id: NodeId) -> fmt::Rendered {
        fmt::render(&self.tree, id)
    }

    /// The diagnostics of the failed evaluations, oldest first.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Returns the result of the last successful evaluation, if it was recorded. Its numbers are
    /// in portable form.
    pub fn last_result(&self) -> Option<NodeId> {
        self.last_result
    }

    /// Records a copy of the given expression as the last result.
    pub fn set_last_result(&mut self, id: NodeId) {
        let copy = self.tree.clone_subtree(id);
        let copy = number::externalize(&mut self.tree, copy);
        if let Some(previous) = self.last_result.replace(copy) {
            self.tree.free(previous);
        }
    }

    /// Attaches a diagnostic to the given node, rendering it as part of the expression rooted at
    /// `root`.
    pub fn report(&mut self, root: NodeId, error: &Error) {
        let rendered = self.render(root);
        let node = error.node();
        self.diagnostics.push(Diagnostic {
            node,
            message: error.message(),
            span: node.and_then(|id| rendered.span(id)),
            expression: rendered.text,
        });
    }

    /// Evaluates an expression: converts its numbers to their internal form, then reduces it.
    ///
    /// The expression must be detached; it is consumed. On success, returns the detached result.
    /// On failure, records a [`Diagnostic`] and returns the expression as it was when the error
    /// occurred.
    pub async fn evaluate(&mut self, expr: NodeId) -> Result<NodeId, Failure> {
        self.steps = 0;
        self.tree.detach(expr);
        let expr = number::internalize(&mut self.tree, expr, self.options.precision);

        let handler = self.tree.alloc(builtin::HANDLER.clone());
        self.tree.add_child(handler, expr);
        let result = self.reduce_and_get(handler, 0).await;
        debug!(steps = self.steps, ok = result.is_ok(), "evaluation finished");

        let root = self.tree.remove_child(handler, 0);
        self.tree.free(handler);
        match result {
            Ok(_) => {
                if self.options.record_last_result {
                    self.set_last_result(root);
                }
                Ok(root)
            },
            Err(error) => {
                self.report(root, &error);
                Err(Failure { root, error })
            },
        }
    }

    /// Reduces the node to its normal form, returning the node that ends up in its place.
    ///
    /// An attached node is reduced in place in its parent. A detached node is reduced on its own;
    /// if the reduction fails, the subtree is freed.
    pub fn reduce(&mut self, id: NodeId) -> LocalBoxFuture<'_, Result<NodeId, Error>> {
        async move {
            if let Some((parent, index)) = self.tree.position(id) {
                return self.reduce_and_get(parent, index).await;
            }

            let handler = self.tree.alloc(builtin::HANDLER.clone());
            self.tree.add_child(handler, id);
            let result = self.reduce_and_get(handler, 0).await;
            if result.is_ok() {
                self.tree.remove_child(handler, 0);
            }
            self.tree.free(handler);
            result
        }.boxed_local()
    }

    /// Reduces a detached node like [`Session::reduce`], but on a step budget of its own. The steps
    /// taken are not counted toward the evaluation in progress.
    pub(crate) async fn reduce_apart(&mut self, id: NodeId) -> Result<NodeId, Error> {
        let outer = std::mem::replace(&mut self.steps, 0);
        let result = self.reduce(id).await;
        self.steps = outer;
        result
    }

    /// Reduces the child at the given zero-based index of `parent`, and returns the node that ends
    /// up in its place.
    pub fn reduce_and_get(&mut self, parent: NodeId, index: usize) -> LocalBoxFuture<'_, Result<NodeId, Error>> {
        async move {
            let registry = self.registry.clone();
            'restart: loop {
                let current = self.tree.child(parent, index);
                if self.tree.is_reduced(current) {
                    return Ok(current);
                }

                let tag = self.tree.tag(current).to_string();
                for reducer in registry.reducers(&tag, Stage::Special) {
                    if reducer.reduce(current, self).await? {
                        self.count_step(parent, index, reducer.name())?;
                        continue 'restart;
                    }
                }

                for i in 0..self.tree.child_count(current) {
                    self.reduce_and_get(current, i).await?;
                }

                for reducer in registry.reducers(&tag, Stage::Normal) {
                    if reducer.reduce(current, self).await? {
                        self.count_step(parent, index, reducer.name())?;
                        continue 'restart;
                    }
                }

                return Ok(current);
            }
        }.boxed_local()
    }

    fn count_step(&mut self, parent: NodeId, index: usize, reducer: &str) -> Result<(), Error> {
        self.steps += 1;
        let current = self.tree.child(parent, index);
        trace!(reducer, step = self.steps, result = %current, "reducer applied");
        if self.steps > self.options.max_steps {
            return Err(Error::at(current, StepLimitExceeded { limit: self.options.max_steps }));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use crate::{error::kind::ExpectedList, kind::tag, reduce::Reducer};
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;
    use super::*;

    /// Rewrites `Expression.Parentheses(x)` into `Expression.Parentheses(Expression.Parentheses(x))`
    /// forever.
    #[derive(Debug)]
    struct Grow;

    #[async_trait(?Send)]
    impl Reducer for Grow {
        fn name(&self) -> &'static str {
            "grow"
        }

        async fn reduce(&self, node: NodeId, session: &mut Session) -> Result<bool, Error> {
            let copy = session.tree.clone_subtree(node);
            let wrapper = session.create_by_tag(tag::PARENTHESES).ok_or_else(|| Error::at(node, ExpectedList))?;
            session.tree.add_child(wrapper, copy);
            session.tree.replace(node, wrapper);
            Ok(true)
        }
    }

    #[test]
    fn evaluate_records_last_result() {
        let mut session = Session::default();
        let a = session.integer(1);
        let b = session.integer(2);
        let sum = session.node(tag::ADDITION, [a, b]).unwrap();
        let result = block_on(session.evaluate(sum)).unwrap();
        assert_eq!(session.display(result), "3");

        let last = session.last_result().unwrap();
        assert_eq!(session.tree().tag(last), tag::NUMBER);
        assert_eq!(session.display(last), "3");
    }

    #[test]
    fn evaluate_reduces_nested_operators() {
        let mut session = Session::default();
        let list = session.list([]);
        let x = session.string("x");
        let inner = session.node(tag::PARENTHESES, [list]).unwrap();
        let append = session.node(tag::APPEND, [inner, x]).unwrap();
        let result = block_on(session.evaluate(append)).unwrap();
        assert_eq!(session.display(result), r#"{"x"}"#);
        assert!(session.diagnostics().is_empty());
    }

    #[test]
    fn step_limit() {
        let mut registry = Registry::default();
        registry.add_reducer(tag::PARENTHESES, Stage::Special, Grow);
        let options = SessionOptionsBuilder::new().max_steps(5).build();
        let mut session = Session::new(registry, options);

        let x = session.string("x");
        let expr = session.node(tag::PARENTHESES, [x]).unwrap();
        let failure = block_on(session.evaluate(expr)).unwrap_err();
        assert!(failure.error.is::<StepLimitExceeded>());
        assert_eq!(session.diagnostics().len(), 1);
        assert_eq!(session.diagnostics()[0].message, "maximum number of reduction steps exceeded");
        assert_eq!(session.diagnostics()[0].span, Some(0..session.diagnostics()[0].expression.len()));
    }

    #[test]
    fn reduce_apart_keeps_the_step_count() {
        let mut registry = Registry::default();
        registry.add_reducer(tag::PARENTHESES, Stage::Special, Grow);
        let options = SessionOptionsBuilder::new().max_steps(5).build();
        let mut session = Session::new(registry, options);
        session.steps = 3;

        let a = session.integer(1);
        let b = session.integer(2);
        let sum = session.node(tag::ADDITION, [a, b]).unwrap();
        let result = block_on(session.reduce_apart(sum)).unwrap();
        assert_eq!(session.display(result), "3");
        assert_eq!(session.steps, 3);

        // the budget still applies to the reduction itself
        let x = session.string("x");
        let expr = session.node(tag::PARENTHESES, [x]).unwrap();
        let err = block_on(session.reduce_apart(expr)).unwrap_err();
        assert!(err.is::<StepLimitExceeded>());
        assert_eq!(session.steps, 3);
    }

    #[test]
    fn reduce_detached_node() {
        let mut session = Session::default();
        let x = session.string("x");
        let expr = session.node(tag::PARENTHESES, [x]).unwrap();
        let result = block_on(session.reduce(expr)).unwrap();
        assert_eq!(result, x);
        assert_eq!(session.tree().parent(x), None);
        assert_eq!(session.tree().live_count(), 1);
    }
}
