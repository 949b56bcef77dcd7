//! Reduction errors.
//!
//! A reducer that cannot proceed returns an [`Error`] naming the nodes it refers to, most
//! specific first. The error aborts the whole reduction chain and is surfaced by
//! [`Session::evaluate`](crate::session::Session::evaluate), which renders the expression with
//! [`tree::fmt::render`](crate::tree::fmt::render) and reports the error against the regions of
//! the rendered text its nodes occupy.

pub mod kind;

use ariadne::{Report, Source};
use crate::tree::{fmt::Rendered, NodeId};
use reduct_error::ErrorKind;
use std::{io, ops::Range};

/// An error that occurred while reducing an expression.
#[derive(Debug)]
pub struct Error {
    /// The nodes this error refers to. The first one is the node the error is reported on.
    pub nodes: Vec<NodeId>,

    /// The kind of error that occurred.
    pub kind: Box<dyn ErrorKind>,
}

impl Error {
    /// Creates a new error with the given nodes and kind.
    pub fn new(nodes: Vec<NodeId>, kind: impl ErrorKind + 'static) -> Self {
        Self { nodes, kind: Box::new(kind) }
    }

    /// Creates a new error reported on a single node.
    pub fn at(node: NodeId, kind: impl ErrorKind + 'static) -> Self {
        Self::new(vec![node], kind)
    }

    /// Returns the node this error is reported on.
    pub fn node(&self) -> Option<NodeId> {
        self.nodes.first().copied()
    }

    /// Returns true if the kind of this error is `T`.
    pub fn is<T: ErrorKind + 'static>(&self) -> bool {
        self.kind.as_any().is::<T>()
    }

    /// Returns the kind of this error, if it is `T`.
    pub fn downcast_ref<T: ErrorKind + 'static>(&self) -> Option<&T> {
        self.kind.as_any().downcast_ref::<T>()
    }

    /// The one-line message of this error.
    pub fn message(&self) -> String {
        self.kind.message()
    }

    /// Returns the regions of the rendered text occupied by the nodes of this error. Nodes that
    /// are not part of the rendering are skipped.
    pub fn spans(&self, rendered: &Rendered) -> Vec<Range<usize>> {
        self.nodes.iter().filter_map(|&id| rendered.span(id)).collect()
    }

    /// Build a report from this error kind.
    pub fn build_report<'a>(&self, src_id: &'a str, rendered: &Rendered) -> Report<(&'a str, Range<usize>)> {
        self.kind.build_report(src_id, &self.spans(rendered))
    }

    /// Writes the report of this error to the given writer, highlighting the rendered expression.
    pub fn write_report(&self, src_id: &str, rendered: &Rendered, writer: impl io::Write) -> io::Result<()> {
        self.build_report(src_id, rendered).write((src_id, Source::from(&rendered.text)), writer)
    }

    /// Report this error to stderr.
    pub fn report_to_stderr(&self, src_id: &str, rendered: &Rendered) -> io::Result<()> {
        self.build_report(src_id, rendered).eprint((src_id, Source::from(&rendered.text)))
    }
}
