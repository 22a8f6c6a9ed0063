//! Abstract syntax tree.
//!
//! Every node carries a [`Span`]. Children are owned by their parent; the
//! [`crate::visit`] module walks them in declaration order.

use crate::types::Span;

/// Root of a parsed file.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    /// Top-level statements.
    pub body: Vec<Statement>,
    /// Span of the whole file.
    pub span: Span,
}

/// A statement on one line, possibly owning an indented body.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `*keyword: argument` with sub-keywords and body.
    Keyword(KeywordStatement),
    /// `>> expression`.
    Expression(ExpressionStatement),
    /// Plain text line.
    Text(TextStatement),
    /// `-- comment`.
    Comment(CommentStatement),
    /// Text line owning an indented body (an answer choice).
    AnswerOption(AnswerOption),
}

impl Statement {
    /// Span of the statement, including its body.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::Keyword(s) => s.span,
            Self::Expression(s) => s.span,
            Self::Text(s) => s.span,
            Self::Comment(s) => s.span,
            Self::AnswerOption(s) => s.span,
        }
    }
}

/// `*keyword: argument` followed by an optional indented block.
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordStatement {
    /// Keyword name as written.
    pub keyword: String,
    /// Span of the keyword name, without the `*`.
    pub keyword_span: Span,
    /// Argument after the colon.
    pub argument: Option<Argument>,
    /// Sub-keywords found directly in the body.
    pub sub_keywords: Vec<SubKeyword>,
    /// Remaining body statements.
    pub body: Vec<Statement>,
    /// Span from `*` to the end of the body.
    pub span: Span,
}

impl KeywordStatement {
    /// Returns true if the keyword is `name`, ignoring case.
    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        self.keyword.eq_ignore_ascii_case(name)
    }

    /// Returns the first sub-keyword named `name`, ignoring case.
    #[must_use]
    pub fn sub_keyword(&self, name: &str) -> Option<&SubKeyword> {
        self.sub_keywords
            .iter()
            .find(|s| s.keyword.eq_ignore_ascii_case(name))
    }
}

/// Indented `*subkeyword: argument` inside a keyword body.
#[derive(Debug, Clone, PartialEq)]
pub struct SubKeyword {
    /// Sub-keyword name as written.
    pub keyword: String,
    /// Span of the name, without the `*`.
    pub keyword_span: Span,
    /// Argument after the colon.
    pub argument: Option<Argument>,
    /// Indented body.
    pub body: Vec<Statement>,
    /// Span from `*` to the end of the body.
    pub span: Span,
}

impl SubKeyword {
    /// Returns true if the sub-keyword is `name`, ignoring case.
    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        self.keyword.eq_ignore_ascii_case(name)
    }
}

/// Keyword argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    /// Free text with interpolations.
    Text(TextContent),
    /// Expression argument (`*if`, `*while`, `*save`, ...).
    Expression(Expression),
    /// Loop header of `*for`.
    Loop(LoopArgument),
}

impl Argument {
    /// Span of the argument.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::Text(t) => t.span,
            Self::Expression(e) => e.span,
            Self::Loop(l) => l.span,
        }
    }

    /// Returns the expression if this is an expression argument.
    #[must_use]
    pub const fn as_expression(&self) -> Option<&Expression> {
        match self {
            Self::Expression(e) => Some(e),
            _ => None,
        }
    }
}

/// `a[, b] in collection`.
#[derive(Debug, Clone, PartialEq)]
pub struct LoopArgument {
    /// Loop variables, each an identifier expression.
    pub variables: Vec<Expression>,
    /// Iterated collection.
    pub collection: Expression,
    /// Span of the whole header.
    pub span: Span,
}

/// `>> expression`.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionStatement {
    /// The expression.
    pub expression: Expression,
    /// Span from `>>` to the end of the expression.
    pub span: Span,
}

/// Plain text line.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStatement {
    /// Literal runs and interpolations.
    pub parts: Vec<TextPart>,
    /// Span of the line content.
    pub span: Span,
}

/// Text with interpolations, used for text arguments and answer labels.
#[derive(Debug, Clone, PartialEq)]
pub struct TextContent {
    /// Literal runs and interpolations.
    pub parts: Vec<TextPart>,
    /// Span of the text.
    pub span: Span,
}

/// Piece of text content.
#[derive(Debug, Clone, PartialEq)]
pub enum TextPart {
    /// Literal text.
    Literal {
        /// Verbatim text.
        text: String,
        /// Location.
        span: Span,
    },
    /// `{expression}`.
    Interpolation(Expression),
}

/// `-- comment`.
#[derive(Debug, Clone, PartialEq)]
pub struct CommentStatement {
    /// Comment body after `--`, verbatim.
    pub text: String,
    /// Span from `--` to end of line.
    pub span: Span,
}

/// Text line owning an indented body.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerOption {
    /// Label text.
    pub text: TextContent,
    /// Indented body.
    pub body: Vec<Statement>,
    /// Span from the label to the end of the body.
    pub span: Span,
}

/// An expression with its location.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    /// Expression variant.
    pub kind: ExpressionKind,
    /// Location.
    pub span: Span,
}

impl Expression {
    /// Creates an expression.
    #[must_use]
    pub const fn new(kind: ExpressionKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// A `null` literal, used as the placeholder after a syntax error.
    #[must_use]
    pub fn null(span: Span) -> Self {
        Self::new(
            ExpressionKind::Literal(Literal {
                value: LiteralValue::Null,
                raw: String::new(),
                interpolations: Vec::new(),
            }),
            span,
        )
    }

    /// Returns the identifier name if this is a bare identifier.
    #[must_use]
    pub fn as_identifier(&self) -> Option<&str> {
        match &self.kind {
            ExpressionKind::Identifier(name) => Some(name),
            _ => None,
        }
    }
}

/// Expression variants.
#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionKind {
    /// `left op right`, including assignment.
    Binary {
        /// Operator.
        op: BinaryOp,
        /// Left operand.
        left: Box<Expression>,
        /// Right operand.
        right: Box<Expression>,
    },
    /// `op argument`.
    Unary {
        /// Operator.
        op: UnaryOp,
        /// Operand.
        argument: Box<Expression>,
    },
    /// `object.property` or `object::property`.
    Member {
        /// Accessed value.
        object: Box<Expression>,
        /// Property name.
        property: Identifier,
        /// True for `::` access.
        namespaced: bool,
    },
    /// `callee(arguments)`.
    Call {
        /// Called expression.
        callee: Box<Expression>,
        /// Call arguments.
        arguments: Vec<Expression>,
    },
    /// `object[index]`.
    Index {
        /// Indexed value.
        object: Box<Expression>,
        /// Index expression.
        index: Box<Expression>,
    },
    /// Variable reference.
    Identifier(String),
    /// Number, string or null literal.
    Literal(Literal),
    /// `[a, b, c]`.
    Array(Vec<Expression>),
    /// `{key -> value, ...}`.
    Object(Vec<Property>),
}

/// Property name in a member access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier {
    /// Name.
    pub name: String,
    /// Location.
    pub span: Span,
}

/// Literal value with its source text.
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    /// Parsed value.
    pub value: LiteralValue,
    /// Source text, quotes included.
    pub raw: String,
    /// `{...}` expressions embedded in a string literal.
    pub interpolations: Vec<Expression>,
}

/// Parsed literal value.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    /// Number literal.
    Number(f64),
    /// String literal without quotes.
    String(String),
    /// Placeholder produced by error recovery.
    Null,
}

/// `key -> value` entry of an object literal.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    /// Key expression.
    pub key: Expression,
    /// Value expression.
    pub value: Expression,
    /// Location.
    pub span: Span,
}

/// Binary operators, including assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    /// `=` in statement context.
    Assign,
    /// `or`
    Or,
    /// `and`
    And,
    /// `=` in condition context.
    Equal,
    /// `<`
    Less,
    /// `>`
    Greater,
    /// `<=`
    LessEqual,
    /// `>=`
    GreaterEqual,
    /// `in`
    In,
    /// `+`
    Add,
    /// `-`
    Subtract,
    /// `*`
    Multiply,
    /// `/`
    Divide,
    /// `%`
    Remainder,
}

impl BinaryOp {
    /// Source form of the operator.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Assign | Self::Equal => "=",
            Self::Or => "or",
            Self::And => "and",
            Self::Less => "<",
            Self::Greater => ">",
            Self::LessEqual => "<=",
            Self::GreaterEqual => ">=",
            Self::In => "in",
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Remainder => "%",
        }
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    /// `not`
    Not,
    /// `-`
    Negate,
}
