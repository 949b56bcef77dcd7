use ariadne::Fmt;
use reduct_attrs::ErrorKind;
use reduct_error::{ErrorKind, EXPR};

/// An operand was expected to be a string.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(message = "expression must be a string", labels = ["this expression"])]
pub struct ExpectedString;

/// An operand was expected to be a list.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(message = "expression must be a list", labels = ["this expression"])]
pub struct ExpectedList;

/// An operand was expected to be an integer small enough to be used as a position.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "expression must be an integer number",
    labels = ["this expression"],
    help = "positions are counted from 1, or from -1 backwards from the end",
)]
pub struct ExpectedInteger;

/// No kind is registered under the given tag.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("unknown tag `{}`", self.tag),
    labels = ["this tag"],
    help = if self.suggestions.is_empty() {
        "no registered tag is similar to this one".to_string()
    } else if self.suggestions.len() == 1 {
        format!("did you mean `{}`?", (&*self.suggestions[0]).fg(EXPR))
    } else {
        format!(
            "did you mean one of these tags? {}",
            self.suggestions
                .iter()
                .map(|s| format!("`{}`", s.fg(EXPR)))
                .collect::<Vec<_>>()
                .join(", ")
        )
    },
)]
pub struct UnknownTag {
    /// The tag that was not found.
    pub tag: String,

    /// Registered tags that are similar to the one given.
    pub suggestions: Vec<String>,
}

/// The kind of the expression being built cannot have the given number of children.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "invalid number of subexpressions",
    labels = ["this expression"],
    help = format!("an expression tagged `{}` cannot have {} subexpression(s)", (&*self.tag).fg(EXPR), self.count),
)]
pub struct InvalidSubexpressionCount {
    pub tag: String,
    pub count: usize,
}

/// The attributes given to a constructor are neither a pair of strings nor a list of such pairs.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "invalid expression",
    labels = ["these attributes"],
    help = "attributes are given either as a single pair {name, value}, or as a list of such pairs",
)]
pub struct InvalidAttributeShape;

/// An attribute pair does not have exactly two elements.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "invalid number of subexpressions",
    labels = ["this pair"],
    help = "an attribute is given as a pair {name, value}",
)]
pub struct InvalidPair;

/// The same attribute name was given more than once.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(message = format!("duplicated attribute `{}`", self.name), labels = ["this name"])]
pub struct DuplicatedAttribute {
    pub name: String,
}

/// Attributes were given for a kind that has none, or were missing for a kind that has some.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "number of attributes does not match",
    labels = ["this expression"],
    help = if self.expected.is_empty() {
        format!("expressions tagged `{}` have no attributes", (&*self.tag).fg(EXPR))
    } else {
        format!("expressions tagged `{}` require the attributes: {}", (&*self.tag).fg(EXPR), self.expected.join(", "))
    },
)]
pub struct AttributeCountMismatch {
    pub tag: String,

    /// The names of the attributes the kind requires.
    pub expected: Vec<String>,
}

/// A required attribute was not given.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(message = format!("attribute [{}] is required", self.name), labels = ["this expression"])]
pub struct RequiredAttribute {
    pub name: String,
}

/// The kind rejected the values given for its attributes.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "invalid values for attributes",
    labels = ["this expression"],
    help = &self.reason,
)]
pub struct InvalidAttributeValues {
    pub reason: String,
}

/// A position does not address an existing child.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "index out of range",
    labels = ["this position"],
    help = format!("the position {} is outside of the valid range [1, {}]", self.index, self.max),
)]
pub struct IndexOutOfRange {
    /// The position, as given.
    pub index: i64,

    /// The largest valid position.
    pub max: usize,
}

/// The kind of the edited expression does not allow the edit.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("expression cannot be {}", self.operation),
    labels = ["this expression"],
)]
pub struct CannotEdit {
    /// What was being done, as a past participle (`appended`, `deleted`, ...).
    pub operation: &'static str,
}

/// A path specification does not address a node.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(message = "invalid path", labels = ["this path"], help = &self.reason)]
pub struct InvalidPath {
    pub reason: String,
}

/// An expression of a kind without portable representation was serialized.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("expressions tagged `{}` cannot be serialized", self.tag),
    labels = ["this expression"],
)]
pub struct NotSerializable {
    pub tag: String,
}

/// A document could not be turned into an expression.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(message = "invalid serialized expression", labels = ["this string"], help = &self.message)]
pub struct InvalidMarkup {
    /// What was wrong with the document.
    pub message: String,
}

/// A referenced expression could not be retrieved.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("cannot resolve the reference to `{}`", self.source),
    labels = ["while deserializing this"],
    help = &self.reason,
)]
pub struct UnresolvedReference {
    pub source: String,
    pub reason: String,
}

/// References were nested too deeply, possibly in a cycle.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "maximum reference depth exceeded",
    labels = ["while deserializing this"],
    help = format!("references can be nested at most {} levels deep; check for cycles", self.limit),
)]
pub struct ReferenceDepthExceeded {
    pub limit: usize,
}

/// A document nests expressions deeper than the session allows.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "maximum nesting depth exceeded",
    labels = ["while deserializing this"],
    help = format!("expressions can be nested at most {} levels deep", limit),
)]
pub struct NestingDepthExceeded {
    pub limit: usize,
}

/// Reduction applied too many reducers, possibly looping forever.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "maximum number of reduction steps exceeded",
    labels = ["while reducing this"],
    help = format!("a single evaluation can apply at most {} reducers", self.limit),
)]
pub struct StepLimitExceeded {
    pub limit: usize,
}
