pub mod token;

use logos::{Lexer, Logos};
pub use token::{Token, TokenKind};

/// Returns an iterator over the token kinds produced by the tokenizer.
pub fn tokenize(input: &str) -> Lexer<TokenKind> {
    TokenKind::lexer(input)
}

/// Returns an owned array containing all of the tokens produced by the tokenizer.
///
/// Input the lexer cannot match is kept as [`TokenKind::Symbol`] tokens, so that the parser can
/// point at it when reporting an error.
pub fn tokenize_complete(input: &str) -> Box<[Token]> {
    let mut lexer = tokenize(input);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        tokens.push(Token {
            span: lexer.span(),
            kind: result.unwrap_or(TokenKind::Symbol),
            lexeme: lexer.slice(),
        });
    }

    tokens.into_boxed_slice()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Compares the tokens produced by the tokenizer to the raw expected tokens.
    fn compare_tokens<'source, const N: usize>(input: &'source str, expected: [(TokenKind, &'source str); N]) {
        let mut lexer = tokenize(input);

        for (expected_kind, expected_lexeme) in expected.into_iter() {
            assert_eq!(lexer.next(), Some(Ok(expected_kind)));
            assert_eq!(lexer.slice(), expected_lexeme);
        }

        assert_eq!(lexer.next(), None);
    }

    #[test]
    fn self_closing_element() {
        compare_tokens(
            r#"<expression tag="Null"/>"#,
            [
                (TokenKind::OpenTag, "<"),
                (TokenKind::Name, "expression"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Name, "tag"),
                (TokenKind::Eq, "="),
                (TokenKind::Quoted, "\"Null\""),
                (TokenKind::SelfClose, "/>"),
            ],
        );
    }

    #[test]
    fn prolog_and_end_tag() {
        compare_tokens(
            "<?xml version=\"1.0\"?>\n<expression tag='List.List'></expression>",
            [
                (TokenKind::Prolog, "<?xml version=\"1.0\"?>"),
                (TokenKind::Whitespace, "\n"),
                (TokenKind::OpenTag, "<"),
                (TokenKind::Name, "expression"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Name, "tag"),
                (TokenKind::Eq, "="),
                (TokenKind::Quoted, "'List.List'"),
                (TokenKind::Close, ">"),
                (TokenKind::OpenEndTag, "</"),
                (TokenKind::Name, "expression"),
                (TokenKind::Close, ">"),
            ],
        );
    }

    #[test]
    fn stray_characters() {
        let tokens = tokenize_complete("<a # b>");
        let kinds = tokens.iter().map(|t| t.kind).collect::<Vec<_>>();
        assert_eq!(kinds, vec![
            TokenKind::OpenTag,
            TokenKind::Name,
            TokenKind::Whitespace,
            TokenKind::Symbol,
            TokenKind::Whitespace,
            TokenKind::Name,
            TokenKind::Close,
        ]);
    }
}
