use logos::Logos;
use std::ops::Range;

/// The different kinds of tokens that can be produced by the tokenizer.
#[derive(Logos, Clone, Copy, Debug, PartialEq)]
pub enum TokenKind {
    #[regex(r"[ \t\r\n]+")]
    Whitespace,

    #[regex(r"<\?[^?]*\?>")]
    Prolog,

    #[token("</")]
    OpenEndTag,

    #[token("<")]
    OpenTag,

    #[token("/>")]
    SelfClose,

    #[token(">")]
    Close,

    #[token("=")]
    Eq,

    #[regex(r"[A-Za-z_][A-Za-z0-9_.:-]*")]
    Name,

    #[regex(r#""[^"]*""#)]
    #[regex(r"'[^']*'")]
    Quoted,

    #[regex(r".", priority = 0)]
    Symbol,
}

impl TokenKind {
    /// Returns true if the token carries no meaning for the parser.
    pub fn is_ignored(self) -> bool {
        matches!(self, TokenKind::Whitespace | TokenKind::Prolog)
    }
}

/// A token produced by the tokenizer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token<'source> {
    /// The region of the source text that this token originated from.
    pub span: Range<usize>,

    /// The kind of token.
    pub kind: TokenKind,

    /// The raw lexeme that was parsed into this token.
    pub lexeme: &'source str,
}

impl Token<'_> {
    /// Returns true if the token carries no meaning for the parser.
    pub fn is_ignored(&self) -> bool {
        self.kind.is_ignored()
    }

    /// For [`TokenKind::Quoted`] tokens, returns the lexeme without its surrounding quotes.
    pub fn unquoted(&self) -> &str {
        match self.kind {
            TokenKind::Quoted => &self.lexeme[1..self.lexeme.len() - 1],
            _ => self.lexeme,
        }
    }
}
