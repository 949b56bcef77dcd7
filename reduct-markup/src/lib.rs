//! The markup format used to persist expression trees.
//!
//! A serialized tree is a single `expression` element, whose `tag` attribute names the kind of the
//! expression. Kinds that carry intrinsic data (strings, numbers, symbols) store it as additional
//! attributes, and subexpressions are nested elements, in order:
//!
//! ```text
//! <expression tag="List.List">
//!     <expression tag="Math.Number" Value="1"/>
//!     <expression tag="String.String" Value="a &amp; b"/>
//! </expression>
//! ```
//!
//! This crate only knows about [`Element`]s; turning them into expression nodes (and validating
//! tags and attributes against the registered kinds) is done by `reduct-core`.
//!
//! ```
//! use reduct_markup::{parse, render, Element};
//!
//! let element = Element::new("List.List")
//!     .with_child(Element::new("String.String").with_attribute("Value", "<hi>"));
//! let text = render(&element);
//! assert_eq!(
//!     text,
//!     r#"<expression tag="List.List"><expression tag="String.String" Value="&lt;hi&gt;"/></expression>"#,
//! );
//! assert_eq!(parse(&text).unwrap(), element);
//! ```

pub mod element;
pub mod parser;
pub mod render;
pub mod tokenizer;

pub use element::Element;
pub use parser::{parse, Parser};
pub use render::render;

/// The name of the markup element that holds an expression.
pub const ELEMENT_NAME: &str = "expression";

/// The name of the attribute holding the tag of the expression.
pub const TAG_ATTRIBUTE: &str = "tag";
