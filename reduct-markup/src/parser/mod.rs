pub mod error;

use crate::{
    element::Element,
    tokenizer::{tokenize_complete, Token, TokenKind},
    ELEMENT_NAME,
    TAG_ATTRIBUTE,
};
use reduct_error::{Error, ErrorKind};
use std::ops::Range;

/// How deeply a [`Parser`] lets elements nest by default. The top-level element is at depth 1.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// A parser for markup documents, holding the complete token stream of the source text.
#[derive(Debug, Clone)]
pub struct Parser<'source> {
    /// The tokens that this parser is currently parsing.
    tokens: Box<[Token<'source>]>,

    /// The index of the **next** token to be parsed.
    cursor: usize,

    /// The number of elements currently open.
    depth: usize,

    /// The maximum number of elements that can be open at once.
    max_depth: usize,
}

impl<'source> Parser<'source> {
    /// Create a new parser for the given source.
    pub fn new(source: &'source str) -> Self {
        Self {
            tokens: tokenize_complete(source),
            cursor: 0,
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Sets how deeply elements can nest. Deeper documents fail with
    /// [`NestingTooDeep`](error::NestingTooDeep).
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Creates an error that points at the current token, or the end of the source text if the
    /// cursor is at the end of the stream.
    pub fn error(&self, kind: impl ErrorKind + 'static) -> Error {
        Error::new(vec![self.span()], kind)
    }

    /// Returns a span pointing at the end of the source text.
    pub fn eof_span(&self) -> Range<usize> {
        self.tokens.last().map_or(0..0, |token| token.span.end..token.span.end)
    }

    /// Returns the span of the current token, or the end of the source text if the cursor is at
    /// the end of the stream.
    pub fn span(&self) -> Range<usize> {
        self.tokens
            .get(self.cursor)
            .map_or(self.eof_span(), |token| token.span.clone())
    }

    /// Advances the cursor past any whitespace and prolog tokens.
    fn skip_ignored(&mut self) {
        while self.tokens.get(self.cursor).is_some_and(Token::is_ignored) {
            self.cursor += 1;
        }
    }

    /// Returns the next meaningful token to be parsed, then advances the cursor.
    ///
    /// Returns an EOF error if there are no more tokens.
    pub fn next_token(&mut self) -> Result<Token<'source>, Error> {
        self.skip_ignored();
        match self.tokens.get(self.cursor) {
            Some(token) => {
                self.cursor += 1;
                // cloning is cheap: only Range<_> is cloned
                Ok(token.clone())
            },
            None => Err(self.error(error::UnexpectedEof)),
        }
    }

    /// Returns the next meaningful token if it is one of the `expected` kinds.
    fn expect(&mut self, expected: &'static [TokenKind]) -> Result<Token<'source>, Error> {
        let token = self.next_token()?;
        if expected.contains(&token.kind) {
            Ok(token)
        } else {
            Err(Error::new(vec![token.span], error::UnexpectedToken {
                expected,
                found: token.kind,
            }))
        }
    }

    /// Parses the name of an element, which must be the expression element.
    fn parse_element_name(&mut self) -> Result<Token<'source>, Error> {
        let name = self.expect(&[TokenKind::Name])?;
        if name.lexeme != ELEMENT_NAME {
            return Err(Error::new(vec![name.span], error::UnknownElement {
                name: name.lexeme.to_string(),
            }));
        }
        Ok(name)
    }

    /// Parses a single expression element, including all of its children.
    pub fn parse_element(&mut self) -> Result<Element, Error> {
        if self.depth >= self.max_depth {
            self.skip_ignored();
            return Err(self.error(error::NestingTooDeep { limit: self.max_depth }));
        }

        self.depth += 1;
        let element = self.parse_element_contents();
        self.depth -= 1;
        element
    }

    fn parse_element_contents(&mut self) -> Result<Element, Error> {
        let open = self.expect(&[TokenKind::OpenTag])?;
        self.parse_element_name()?;

        let mut tag = None;
        let mut attributes = Vec::new();
        let mut seen: Vec<(&str, Range<usize>)> = Vec::new();

        let self_closing = loop {
            let token = self.expect(&[TokenKind::Name, TokenKind::SelfClose, TokenKind::Close])?;
            match token.kind {
                TokenKind::SelfClose => break true,
                TokenKind::Close => break false,
                _ => {
                    self.expect(&[TokenKind::Eq])?;
                    let value = self.expect(&[TokenKind::Quoted])?;

                    if let Some((_, first)) = seen.iter().find(|(name, _)| *name == token.lexeme) {
                        return Err(Error::new(vec![first.clone(), token.span], error::DuplicateAttribute {
                            name: token.lexeme.to_string(),
                        }));
                    }
                    seen.push((token.lexeme, token.span.clone()));

                    // skip the opening quote
                    let value = unescape(value.unquoted(), value.span.start + 1)?;
                    if token.lexeme == TAG_ATTRIBUTE {
                        tag = Some(value);
                    } else {
                        attributes.push((token.lexeme.to_string(), value));
                    }
                },
            }
        };

        let Some(tag) = tag else {
            return Err(Error::new(vec![open.span.start..self.span().start], error::MissingTag));
        };

        let mut children = Vec::new();
        if !self_closing {
            loop {
                self.skip_ignored();
                match self.tokens.get(self.cursor).map(|token| token.kind) {
                    Some(TokenKind::OpenEndTag) => {
                        self.cursor += 1;
                        self.parse_element_name()?;
                        self.expect(&[TokenKind::Close])?;
                        break;
                    },
                    Some(TokenKind::OpenTag) => children.push(self.parse_element()?),
                    Some(found) => {
                        return Err(self.error(error::UnexpectedToken {
                            expected: &[TokenKind::OpenTag, TokenKind::OpenEndTag],
                            found,
                        }));
                    },
                    None => return Err(self.error(error::UnexpectedEof)),
                }
            }
        }

        Ok(Element { tag, attributes, children })
    }

    /// Parses a complete document: an optional prolog followed by exactly one element. All the
    /// tokens must be consumed by the parser; if not, an error is returned.
    pub fn parse_document(&mut self) -> Result<Element, Error> {
        let element = self.parse_element()?;
        self.skip_ignored();
        if self.cursor == self.tokens.len() {
            Ok(element)
        } else {
            Err(Error::new(vec![self.span().start..self.eof_span().end], error::ExpectedEof))
        }
    }
}

/// Decodes the entity references in an attribute value. `offset` is the position of the value in
/// the source text, used to point at invalid entities.
fn unescape(raw: &str, offset: usize) -> Result<String, Error> {
    let mut value = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(amp) = rest.find('&') {
        value.push_str(&rest[..amp]);
        let entity_start = offset + (raw.len() - rest.len()) + amp;
        let after = &rest[amp..];

        let invalid = |len: usize| Error::new(
            vec![entity_start..entity_start + len],
            error::InvalidEntity { entity: after[..len].to_string() },
        );

        let Some(semi) = after.find(';') else {
            return Err(invalid(1));
        };
        let decoded = match &after[1..semi] {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            name if name.starts_with("#x") => u32::from_str_radix(&name[2..], 16).ok().and_then(char::from_u32),
            name if name.starts_with('#') => name[1..].parse::<u32>().ok().and_then(char::from_u32),
            _ => None,
        };

        match decoded {
            Some(ch) => value.push(ch),
            None => return Err(invalid(semi + 1)),
        }
        rest = &after[semi + 1..];
    }

    value.push_str(rest);
    Ok(value)
}

/// Parses a complete markup document into its top-level [`Element`].
pub fn parse(source: &str) -> Result<Element, Error> {
    Parser::new(source).parse_document()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn leaf_with_attributes() {
        let element = parse(r#"<expression tag="String.String" Value="a &amp; b &#65;&#x42;"/>"#).unwrap();
        assert_eq!(element, Element::new("String.String").with_attribute("Value", "a & b AB"));
    }

    #[test]
    fn nested_with_whitespace_and_prolog() {
        let source = r#"<?xml version="1.0" encoding="UTF-8"?>
            <expression tag="List.List">
                <expression tag="Math.Number" Value="1"/>
                <expression tag="List.List"></expression>
            </expression>
        "#;
        let element = parse(source).unwrap();
        assert_eq!(element, Element::new("List.List")
            .with_child(Element::new("Math.Number").with_attribute("Value", "1"))
            .with_child(Element::new("List.List")));
    }

    #[test]
    fn missing_tag() {
        let err = parse(r#"<expression Value="1"/>"#).unwrap_err();
        assert!(err.is::<error::MissingTag>());
    }

    #[test]
    fn duplicate_attribute_points_at_both() {
        let err = parse(r#"<expression tag="Symbol" Name="x" Name="y"/>"#).unwrap_err();
        assert!(err.is::<error::DuplicateAttribute>());
        assert_eq!(err.spans, vec![25..29, 34..38]);
    }

    #[test]
    fn unknown_element() {
        let err = parse(r#"<node tag="Null"/>"#).unwrap_err();
        assert!(err.is::<error::UnknownElement>());
        assert_eq!(err.spans, vec![1..5]);
    }

    #[test]
    fn invalid_entity() {
        let err = parse(r#"<expression tag="String.String" Value="&bogus;"/>"#).unwrap_err();
        assert!(err.is::<error::InvalidEntity>());
        assert_eq!(err.kind.message(), "invalid entity `&bogus;`");
        assert_eq!(err.spans, vec![39..46]);
    }

    #[test]
    fn unclosed_element() {
        let err = parse(r#"<expression tag="List.List"><expression tag="Null"/>"#).unwrap_err();
        assert!(err.is::<error::UnexpectedEof>());
    }

    #[test]
    fn trailing_garbage() {
        let err = parse(r#"<expression tag="Null"/> extra"#).unwrap_err();
        assert!(err.is::<error::ExpectedEof>());
    }

    #[test]
    fn nesting_limit() {
        fn nested(depth: usize) -> String {
            let open = r#"<expression tag="List.List">"#.repeat(depth - 1);
            let close = "</expression>".repeat(depth - 1);
            format!(r#"{}<expression tag="Null"/>{}"#, open, close)
        }

        let element = Parser::new(&nested(4)).with_max_depth(4).parse_document().unwrap();
        assert_eq!(element.children[0].children[0].children[0], Element::new("Null"));

        let err = Parser::new(&nested(5)).with_max_depth(4).parse_document().unwrap_err();
        assert!(err.is::<error::NestingTooDeep>());
        assert_eq!(err.spans, vec![112..113]);

        // far deeper than the default limit, without exhausting the stack
        let err = parse(&nested(100_000)).unwrap_err();
        assert!(err.is::<error::NestingTooDeep>());
        assert_eq!(err.kind.message(), "elements are nested too deeply");
    }
}
