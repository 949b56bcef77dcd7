#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single parsed (or to-be-rendered) expression element.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Element {
    /// The tag of the expression.
    pub tag: String,

    /// The attributes of the expression, other than the tag, in document order.
    pub attributes: Vec<(String, String)>,

    /// The subexpressions, in order.
    pub children: Vec<Element>,
}

impl Element {
    /// Creates an element with the given tag, no attributes, and no children.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Adds an attribute to the element.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Adds a child to the element.
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    /// Returns the value of the attribute with the given name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value.as_str())
    }
}
