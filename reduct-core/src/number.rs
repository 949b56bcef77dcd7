//! Internal numeric representation, and the passes that convert it to and from the portable,
//! textual representation used by the markup format.
//!
//! Numbers inside an expression tree being reduced are stored as [`tag::INTERNAL_NUMBER`] nodes,
//! whose payload is a [`Number`] backed by [`rug`]. These nodes cannot be serialized. Before a
//! tree is rendered to markup, [`externalize`] rewrites each of them into a
//! [`tag::NUMBER`] node carrying the number as a decimal `Value` attribute, and [`internalize`]
//! performs the opposite conversion after parsing.
//!
//! [`tag::INTERNAL_NUMBER`]: crate::kind::tag::INTERNAL_NUMBER
//! [`tag::NUMBER`]: crate::kind::tag::NUMBER

use crate::{
    kind::{builtin, tag, Payload},
    tree::{NodeId, Tree},
};
use rug::{Assign, Float, Integer};
use std::{cmp::Ordering, fmt};

/// The number of bits of precision to use for floating-point numbers, unless configured otherwise.
pub const PRECISION: u32 = 1 << 9;

/// Creates an [`Integer`] with the given value.
pub fn int<T>(n: T) -> Integer
where
    Integer: From<T>,
{
    Integer::from(n)
}

/// Creates a [`Float`] with the given value, using the default precision.
pub fn float<T>(n: T) -> Float
where
    Float: Assign<T>,
{
    Float::with_val(PRECISION, n)
}

/// A number in its internal representation.
#[derive(Debug, Clone, PartialEq)]
pub enum Number {
    /// An arbitrary-precision integer.
    Integer(Integer),

    /// A finite floating-point number.
    Float(Float),
}

impl Number {
    /// Parses a decimal literal. Literals without a fractional part or exponent become
    /// [`Number::Integer`]s; anything else becomes a [`Number::Float`] with the given precision.
    ///
    /// Returns [`None`] if the text is not a decimal literal, or denotes a non-finite value.
    pub fn parse(text: &str, precision: u32) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() || text.contains('_') {
            return None;
        }

        if let Ok(int) = Integer::from_str_radix(text, 10) {
            return Some(Self::Integer(int));
        }

        let float = Float::with_val(precision, Float::parse(text).ok()?);
        float.is_finite().then_some(Self::Float(float))
    }

    /// Returns the decimal text of this number, which [`Number::parse`] reads back into an equal
    /// number (given the same precision).
    pub fn to_text(&self) -> String {
        match self {
            Self::Integer(int) => int.to_string(),
            Self::Float(float) => trim_float(&float.to_string_radix(10, None)),
        }
    }

    /// If the number is an integer that fits in an [`i64`], returns it.
    pub fn to_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(int) => int.to_i64(),
            Self::Float(_) => None,
        }
    }

    /// Adds two numbers. The result is an integer only if both operands are integers.
    pub fn add(&self, rhs: &Self, precision: u32) -> Self {
        match (self, rhs) {
            (Self::Integer(lhs), Self::Integer(rhs)) => Self::Integer(Integer::from(lhs + rhs)),
            (Self::Float(lhs), Self::Float(rhs)) => Self::Float(Float::with_val(precision, lhs + rhs)),
            (Self::Float(lhs), Self::Integer(rhs)) | (Self::Integer(rhs), Self::Float(lhs)) => {
                Self::Float(Float::with_val(precision, lhs + rhs))
            },
        }
    }
}

/// Numbers are compared by value, so an integer and a float can compare equal.
impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Integer(lhs), Self::Integer(rhs)) => Some(lhs.cmp(rhs)),
            (Self::Integer(lhs), Self::Float(rhs)) => lhs.partial_cmp(rhs),
            (Self::Float(lhs), Self::Integer(rhs)) => lhs.partial_cmp(rhs),
            (Self::Float(lhs), Self::Float(rhs)) => lhs.partial_cmp(rhs),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_text())
    }
}

impl From<i64> for Number {
    fn from(n: i64) -> Self {
        Self::Integer(int(n))
    }
}

impl From<Integer> for Number {
    fn from(n: Integer) -> Self {
        Self::Integer(n)
    }
}

impl From<Float> for Number {
    fn from(n: Float) -> Self {
        Self::Float(n)
    }
}

/// Removes the trailing zeros of the mantissa of a formatted float, and a zero exponent.
///
/// The result always contains a decimal point or an exponent, so that it is never mistaken for
/// an integer literal.
fn trim_float(text: &str) -> String {
    let (mantissa, exponent) = match text.find('e') {
        Some(i) => text.split_at(i),
        None => (text, ""),
    };

    let mut mantissa = if mantissa.contains('.') {
        mantissa.trim_end_matches('0').to_string()
    } else {
        mantissa.to_string()
    };
    if mantissa.ends_with('.') {
        mantissa.push('0');
    }

    let exponent = if exponent == "e0" { "" } else { exponent };
    if !mantissa.contains('.') && exponent.is_empty() {
        mantissa.push_str(".0");
    }
    mantissa + exponent
}

/// If the node is an internal integer that fits in an [`i64`], returns it.
pub fn native_integer(tree: &Tree, node: NodeId) -> Option<i64> {
    tree.number(node)?.to_i64()
}

/// Replaces every internal number in the subtree rooted at `root` with its portable,
/// textual form. Returns the new root of the subtree, which differs from `root` only if `root`
/// itself was an internal number.
pub fn externalize(tree: &mut Tree, root: NodeId) -> NodeId {
    let targets = tree.post_order(root)
        .filter(|&id| tree.tag(id) == tag::INTERNAL_NUMBER)
        .collect::<Vec<_>>();

    let mut root = root;
    for id in targets {
        let text = tree.number(id).map(Number::to_text).unwrap_or_else(|| "0".to_string());
        let external = tree.alloc_with(builtin::NUMBER.clone(), Payload::Attributes(vec![text]));
        if id == root {
            root = external;
            tree.free(id);
        } else {
            tree.replace(id, external);
        }
    }

    root
}

/// Replaces every portable number in the subtree rooted at `root` with its internal form.
/// Returns the new root of the subtree, which differs from `root` only if `root` itself was a
/// portable number.
///
/// Portable numbers can only be constructed with a valid decimal `Value`; should one fail to
/// parse anyway, it is left untouched.
pub fn internalize(tree: &mut Tree, root: NodeId, precision: u32) -> NodeId {
    let targets = tree.post_order(root)
        .filter(|&id| tree.tag(id) == tag::NUMBER)
        .collect::<Vec<_>>();

    let mut root = root;
    for id in targets {
        let Some(number) = tree.attribute(id, "Value").and_then(|text| Number::parse(text, precision)) else {
            continue;
        };
        let internal = tree.alloc_with(builtin::INTERNAL_NUMBER.clone(), Payload::Number(number));
        if id == root {
            root = internal;
            tree.free(id);
        } else {
            tree.replace(id, internal);
        }
    }

    root
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn parse_integers_and_floats() {
        assert_eq!(Number::parse("42", PRECISION), Some(Number::Integer(int(42))));
        assert_eq!(Number::parse("-7", PRECISION), Some(Number::Integer(int(-7))));
        assert_eq!(Number::parse("2.5", PRECISION), Some(Number::Float(float(2.5))));
        assert_eq!(Number::parse("1e3", PRECISION), Some(Number::Float(float(1000))));
        assert_eq!(Number::parse("abc", PRECISION), None);
        assert_eq!(Number::parse("", PRECISION), None);
        assert_eq!(Number::parse("inf", PRECISION), None);
    }

    #[test]
    fn text_reads_back() {
        for number in [
            Number::Integer(int(0)),
            Number::Integer(int(-123456789)),
            Number::Float(float(2.5)),
            Number::Float(float(-0.125)),
            Number::Float(float(3)),
            Number::Float(float(1e40)),
        ] {
            let text = number.to_text();
            assert_eq!(Number::parse(&text, PRECISION), Some(number), "{}", text);
        }
    }

    #[test]
    fn whole_float_stays_float() {
        let text = Number::Float(float(3)).to_text();
        assert!(matches!(Number::parse(&text, PRECISION), Some(Number::Float(_))), "{}", text);
    }

    #[test]
    fn mixed_comparison() {
        assert_eq!(Number::from(2).partial_cmp(&Number::Float(float(2))), Some(Ordering::Equal));
        assert_eq!(Number::from(2).partial_cmp(&Number::Float(float(2.5))), Some(Ordering::Less));
        assert_eq!(Number::Float(float(3)).partial_cmp(&Number::from(1)), Some(Ordering::Greater));
    }

    #[test]
    fn addition_keeps_integers() {
        assert_eq!(Number::from(2).add(&Number::from(3), PRECISION), Number::from(5));
        assert_eq!(
            Number::from(2).add(&Number::Float(float(0.5)), PRECISION),
            Number::Float(float(2.5)),
        );
    }

    #[test]
    fn passes_convert_every_number() {
        let mut tree = Tree::new();
        let list = tree.alloc(builtin::LIST.clone());
        let one = tree.alloc_with(builtin::INTERNAL_NUMBER.clone(), Payload::Number(Number::from(1)));
        let half = tree.alloc_with(builtin::INTERNAL_NUMBER.clone(), Payload::Number(Number::Float(float(0.5))));
        tree.add_child(list, one);
        tree.add_child(list, half);

        let root = externalize(&mut tree, list);
        assert_eq!(root, list);
        let tags = tree.children(list).iter().map(|&c| tree.tag(c).to_string()).collect::<Vec<_>>();
        assert_eq!(tags, vec![tag::NUMBER, tag::NUMBER]);
        assert_eq!(tree.attribute(tree.child(list, 0), "Value"), Some("1"));
        let half_text = tree.attribute(tree.child(list, 1), "Value").unwrap();
        assert_eq!(Number::parse(half_text, PRECISION), Some(Number::Float(float(0.5))));

        let root = internalize(&mut tree, list, PRECISION);
        assert_eq!(native_integer(&tree, tree.child(root, 0)), Some(1));
        assert_eq!(tree.number(tree.child(root, 1)), Some(&Number::Float(float(0.5))));
        assert_eq!(tree.live_count(), 3);
    }

    #[test]
    fn passes_replace_a_number_root() {
        let mut tree = Tree::new();
        let seven = tree.alloc_with(builtin::INTERNAL_NUMBER.clone(), Payload::Number(Number::from(7)));
        let root = externalize(&mut tree, seven);
        assert_eq!(tree.tag(root), tag::NUMBER);
        let root = internalize(&mut tree, root, PRECISION);
        assert_eq!(native_integer(&tree, root), Some(7));
        assert_eq!(tree.live_count(), 1);
    }
}
