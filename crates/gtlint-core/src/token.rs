//! Tokens produced by the lexer.

use crate::types::Span;

/// Kind of a lexical token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// End of a line.
    Newline,
    /// Indentation increased by one level.
    Indent,
    /// Indentation decreased by one level.
    Dedent,
    /// End of input.
    Eof,
    /// `*` opening a keyword line.
    KeywordStart,
    /// `>>` opening an expression line.
    ExpressionStart,
    /// `--` opening a comment.
    CommentStart,
    /// Keyword name following `*`.
    Keyword,
    /// Sub-keyword name following `*` on an indented line.
    SubKeyword,
    /// `:` after a keyword name.
    Colon,
    /// Run of plain text.
    Text,
    /// Comment body after `--`.
    Comment,
    /// Quoted string literal, quotes included.
    String,
    /// Number literal.
    Number,
    /// Identifier in an expression.
    Identifier,
    /// Operator in an expression.
    Operator,
    /// Punctuation in an expression.
    Punctuation,
    /// `{` opening an interpolation in text.
    InterpolationStart,
    /// `}` closing an interpolation in text.
    InterpolationEnd,
    /// Invalid or unterminated input.
    Error,
}

impl TokenKind {
    /// Returns true for tokens that carry layout rather than content.
    #[must_use]
    pub const fn is_structural(self) -> bool {
        matches!(self, Self::Newline | Self::Indent | Self::Dedent | Self::Eof)
    }

    /// Short human-readable name used in diagnostics.
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::Newline => "end of line",
            Self::Indent => "indentation",
            Self::Dedent => "dedent",
            Self::Eof => "end of file",
            Self::KeywordStart => "`*`",
            Self::ExpressionStart => "`>>`",
            Self::CommentStart => "comment",
            Self::Keyword => "keyword",
            Self::SubKeyword => "sub-keyword",
            Self::Colon => "`:`",
            Self::Text => "text",
            Self::Comment => "comment",
            Self::String => "string",
            Self::Number => "number",
            Self::Identifier => "identifier",
            Self::Operator => "operator",
            Self::Punctuation => "punctuation",
            Self::InterpolationStart => "`{`",
            Self::InterpolationEnd => "`}`",
            Self::Error => "invalid token",
        }
    }
}

/// A lexical token with its source text and location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Token kind.
    pub kind: TokenKind,
    /// Verbatim source text covered by the token.
    pub text: String,
    /// Location of the token.
    pub span: Span,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub fn new(kind: TokenKind, text: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
        }
    }

    /// Returns true if this is the operator `op`.
    #[must_use]
    pub fn is_operator(&self, op: &str) -> bool {
        self.kind == TokenKind::Operator && self.text == op
    }

    /// Returns true if this is the punctuation `punct`.
    #[must_use]
    pub fn is_punct(&self, punct: &str) -> bool {
        self.kind == TokenKind::Punctuation && self.text == punct
    }
}
