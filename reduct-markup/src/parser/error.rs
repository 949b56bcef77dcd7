use ariadne::Fmt;
use reduct_attrs::ErrorKind;
use reduct_error::{ErrorKind, EXPR};
use crate::tokenizer::TokenKind;

/// The end of the markup was reached unexpectedly.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "unexpected end of markup",
    labels = ["I expected to see more markup here"],
)]
pub struct UnexpectedEof;

/// The end of the markup was expected, but something else was found.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "expected end of markup",
    labels = ["I could not understand the remaining markup here"],
    help = "a document holds exactly one top-level expression",
)]
pub struct ExpectedEof;

/// An unexpected token was encountered.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "unexpected token",
    labels = [format!("expected one of: {}", self.expected.iter().map(|t| format!("{:?}", t)).collect::<Vec<_>>().join(", "))],
    help = format!("found {:?}", self.found),
)]
pub struct UnexpectedToken {
    /// The token(s) that were expected.
    pub expected: &'static [TokenKind],

    /// The token that was found.
    pub found: TokenKind,
}

/// An element other than an expression element was found.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("unknown element `{}`", self.name),
    labels = ["this element"],
    help = format!("expressions are stored in `{}` elements", crate::ELEMENT_NAME.fg(EXPR)),
)]
pub struct UnknownElement {
    /// The name of the element.
    pub name: String,
}

/// An expression element has no `tag` attribute.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "missing expression tag",
    labels = ["this element"],
    help = format!("add a `{}` attribute naming the kind of the expression", crate::TAG_ATTRIBUTE.fg(EXPR)),
)]
pub struct MissingTag;

/// The same attribute was given twice on one element.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("duplicated attribute `{}`", self.name),
    labels = ["first defined here", "defined again here"],
)]
pub struct DuplicateAttribute {
    /// The name of the attribute.
    pub name: String,
}

/// An attribute value contains an entity reference that cannot be decoded.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("invalid entity `{}`", self.entity),
    labels = ["this entity"],
    help = "the supported entities are `&amp;`, `&lt;`, `&gt;`, `&quot;`, `&apos;`, and numeric character references",
)]
pub struct InvalidEntity {
    /// The raw text of the entity.
    pub entity: String,
}

/// Elements are nested deeper than the parser allows.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "elements are nested too deeply",
    labels = ["this element"],
    help = format!("elements can be nested at most {} levels deep", self.limit),
)]
pub struct NestingTooDeep {
    /// The maximum nesting depth.
    pub limit: usize,
}
