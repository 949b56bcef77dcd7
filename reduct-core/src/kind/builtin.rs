//! The kinds built into every [`Registry`](crate::registry::Registry) created with
//! [`Default`].

use crate::number::{Number, PRECISION};
use once_cell::sync::Lazy;
use std::sync::Arc;
use super::{tag, InvalidAttributes, Kind, Payload};

/// A kind identified by its tag, whose nodes take a number of children in a fixed range and carry
/// no attributes. All operator kinds are function kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FunctionKind {
    pub tag: &'static str,
    pub min: usize,

    /// The maximum number of children, or [`None`] if unbounded.
    pub max: Option<usize>,
}

impl FunctionKind {
    /// A kind whose nodes take exactly `n` children.
    pub const fn exact(tag: &'static str, n: usize) -> Self {
        Self { tag, min: n, max: Some(n) }
    }

    /// A kind whose nodes take between `min` and `max` children, inclusive.
    pub const fn range(tag: &'static str, min: usize, max: usize) -> Self {
        Self { tag, min, max: Some(max) }
    }

    /// A kind whose nodes take at least `min` children.
    pub const fn at_least(tag: &'static str, min: usize) -> Self {
        Self { tag, min, max: None }
    }
}

impl Kind for FunctionKind {
    fn tag(&self) -> &str {
        self.tag
    }

    fn can_have_children(&self, count: usize) -> bool {
        count >= self.min && self.max.map_or(true, |max| count <= max)
    }
}

/// `List.List`: an ordered sequence of any length.
#[derive(Debug)]
pub struct ListKind;

impl Kind for ListKind {
    fn tag(&self) -> &str {
        tag::LIST
    }

    fn can_have_children(&self, _: usize) -> bool {
        true
    }
}

/// `String.String`: a piece of text, stored in the `Value` attribute.
#[derive(Debug)]
pub struct StringKind;

impl Kind for StringKind {
    fn tag(&self) -> &str {
        tag::STRING
    }

    fn can_have_children(&self, count: usize) -> bool {
        count == 0
    }

    fn attribute_names(&self) -> &'static [&'static str] {
        &["Value"]
    }
}

/// `Symbol`: a named unknown.
#[derive(Debug)]
pub struct SymbolKind;

impl Kind for SymbolKind {
    fn tag(&self) -> &str {
        tag::SYMBOL
    }

    fn can_have_children(&self, count: usize) -> bool {
        count == 0
    }

    fn attribute_names(&self) -> &'static [&'static str] {
        &["Name"]
    }

    fn check_attributes(&self, values: &[String]) -> Result<(), InvalidAttributes> {
        match values.first() {
            Some(name) if !name.trim().is_empty() => Ok(()),
            _ => Err(InvalidAttributes::new("the name of a symbol cannot be empty")),
        }
    }
}

/// `Math.Number`: the portable form of a number, as a decimal literal in the `Value` attribute.
#[derive(Debug)]
pub struct NumberKind;

impl Kind for NumberKind {
    fn tag(&self) -> &str {
        tag::NUMBER
    }

    fn can_have_children(&self, count: usize) -> bool {
        count == 0
    }

    fn attribute_names(&self) -> &'static [&'static str] {
        &["Value"]
    }

    fn check_attributes(&self, values: &[String]) -> Result<(), InvalidAttributes> {
        let value = values.first().map(String::as_str).unwrap_or_default();
        match Number::parse(value, PRECISION) {
            Some(_) => Ok(()),
            None => Err(InvalidAttributes::new(format!("`{}` is not a decimal number", value))),
        }
    }

    fn default_payload(&self) -> Payload {
        Payload::Attributes(vec!["0".to_string()])
    }
}

/// `Math.InternalNumber`: a number in its internal representation. Only exists while a tree is
/// being reduced.
#[derive(Debug)]
pub struct InternalNumberKind;

impl Kind for InternalNumberKind {
    fn tag(&self) -> &str {
        tag::INTERNAL_NUMBER
    }

    fn can_have_children(&self, count: usize) -> bool {
        count == 0
    }

    fn default_payload(&self) -> Payload {
        Payload::Number(Number::from(0))
    }

    fn is_serializable(&self) -> bool {
        false
    }
}

/// A kind whose nodes never have children nor attributes, such as `Null` and the results of a
/// comparison.
#[derive(Debug)]
pub struct LeafKind(pub &'static str);

impl Kind for LeafKind {
    fn tag(&self) -> &str {
        self.0
    }

    fn can_have_children(&self, count: usize) -> bool {
        count == 0
    }
}

/// `Expression.Reference`: an expression stored elsewhere, located by its `Source` attribute.
#[derive(Debug)]
pub struct ReferenceKind;

impl Kind for ReferenceKind {
    fn tag(&self) -> &str {
        tag::REFERENCE
    }

    fn can_have_children(&self, count: usize) -> bool {
        count == 0
    }

    fn attribute_names(&self) -> &'static [&'static str] {
        &["Source"]
    }

    fn check_attributes(&self, values: &[String]) -> Result<(), InvalidAttributes> {
        match values.first() {
            Some(source) if !source.is_empty() => Ok(()),
            _ => Err(InvalidAttributes::new("a reference needs a source")),
        }
    }

    fn reference_attribute(&self) -> Option<&'static str> {
        Some("Source")
    }
}

/// The holder of a top-level expression being evaluated. Its single child can be replaced like
/// any other, which lets reducers replace the root of the expression.
#[derive(Debug)]
pub struct HandlerKind;

impl Kind for HandlerKind {
    fn tag(&self) -> &str {
        tag::HANDLER
    }

    fn can_have_children(&self, count: usize) -> bool {
        count == 1
    }

    fn is_serializable(&self) -> bool {
        false
    }
}

pub static NULL: Lazy<Arc<dyn Kind>> = Lazy::new(|| Arc::new(LeafKind(tag::NULL)));
pub static LIST: Lazy<Arc<dyn Kind>> = Lazy::new(|| Arc::new(ListKind));
pub static STRING: Lazy<Arc<dyn Kind>> = Lazy::new(|| Arc::new(StringKind));
pub static SYMBOL: Lazy<Arc<dyn Kind>> = Lazy::new(|| Arc::new(SymbolKind));
pub static NUMBER: Lazy<Arc<dyn Kind>> = Lazy::new(|| Arc::new(NumberKind));
pub static INTERNAL_NUMBER: Lazy<Arc<dyn Kind>> = Lazy::new(|| Arc::new(InternalNumberKind));
pub static REFERENCE: Lazy<Arc<dyn Kind>> = Lazy::new(|| Arc::new(ReferenceKind));
pub static HANDLER: Lazy<Arc<dyn Kind>> = Lazy::new(|| Arc::new(HandlerKind));

pub static COMPARE: Lazy<Arc<dyn Kind>> = Lazy::new(|| Arc::new(FunctionKind::exact(tag::COMPARE, 2)));
pub static EQUALS: Lazy<Arc<dyn Kind>> = Lazy::new(|| Arc::new(LeafKind(tag::EQUALS)));
pub static DIFFERENT: Lazy<Arc<dyn Kind>> = Lazy::new(|| Arc::new(LeafKind(tag::DIFFERENT)));
pub static LESS: Lazy<Arc<dyn Kind>> = Lazy::new(|| Arc::new(LeafKind(tag::LESS)));
pub static GREATER: Lazy<Arc<dyn Kind>> = Lazy::new(|| Arc::new(LeafKind(tag::GREATER)));

/// The operator kinds, with the number of operands they accept.
const FUNCTIONS: &[FunctionKind] = &[
    FunctionKind::at_least(tag::ADDITION, 2),
    FunctionKind::exact(tag::CHILD, 2),
    FunctionKind::exact(tag::CARDINALITY, 1),
    FunctionKind::exact(tag::TAG, 1),
    FunctionKind::exact(tag::REPLACE_TAG, 2),
    FunctionKind::exact(tag::APPEND, 2),
    FunctionKind::exact(tag::PREPEND, 2),
    FunctionKind::range(tag::INSERT, 2, 3),
    FunctionKind::exact(tag::DELETE, 2),
    FunctionKind::exact(tag::PROTECT, 1),
    FunctionKind::exact(tag::GROUP, 1),
    FunctionKind::exact(tag::SERIALIZE, 1),
    FunctionKind::exact(tag::DESERIALIZE, 1),
    FunctionKind::range(tag::CREATE_EXPRESSION, 1, 2),
    FunctionKind::range(tag::CREATE_EXPRESSION_TREE, 2, 3),
    FunctionKind::exact(tag::REDUCE, 1),
    FunctionKind::exact(tag::PARENTHESES, 1),
    FunctionKind::exact(tag::LAST_RESULT, 0),
];

/// Returns all the built-in kinds, except the handler kind, which is never registered.
pub fn all() -> Vec<Arc<dyn Kind>> {
    let mut kinds = vec![
        NULL.clone(),
        LIST.clone(),
        STRING.clone(),
        SYMBOL.clone(),
        NUMBER.clone(),
        INTERNAL_NUMBER.clone(),
        REFERENCE.clone(),
        COMPARE.clone(),
        EQUALS.clone(),
        DIFFERENT.clone(),
        LESS.clone(),
        GREATER.clone(),
    ];
    kinds.extend(FUNCTIONS.iter().map(|&kind| Arc::new(kind) as Arc<dyn Kind>));
    kinds
}
