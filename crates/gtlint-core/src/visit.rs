//! Pre-order traversal over the AST.
//!
//! Nodes are exposed through the closed [`Node`] enum so that rules dispatch
//! with a `match` instead of implementing one method per node type.

use crate::ast::{
    AnswerOption, Argument, CommentStatement, Expression, ExpressionKind, ExpressionStatement,
    KeywordStatement, Program, Property, Statement, SubKeyword, TextContent, TextPart,
    TextStatement,
};
use crate::types::Span;

/// Borrowed view of any AST node.
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    /// File root.
    Program(&'a Program),
    /// Keyword statement.
    KeywordStatement(&'a KeywordStatement),
    /// Sub-keyword.
    SubKeyword(&'a SubKeyword),
    /// Expression statement.
    ExpressionStatement(&'a ExpressionStatement),
    /// Text line.
    TextStatement(&'a TextStatement),
    /// Text argument or answer label.
    TextContent(&'a TextContent),
    /// Comment line.
    CommentStatement(&'a CommentStatement),
    /// Answer option.
    AnswerOption(&'a AnswerOption),
    /// Keyword or sub-keyword argument.
    Argument(&'a Argument),
    /// Expression.
    Expression(&'a Expression),
    /// Object literal entry.
    Property(&'a Property),
}

impl Node<'_> {
    /// Span of the node.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::Program(n) => n.span,
            Self::KeywordStatement(n) => n.span,
            Self::SubKeyword(n) => n.span,
            Self::ExpressionStatement(n) => n.span,
            Self::TextStatement(n) => n.span,
            Self::TextContent(n) => n.span,
            Self::CommentStatement(n) => n.span,
            Self::AnswerOption(n) => n.span,
            Self::Argument(n) => n.span(),
            Self::Expression(n) => n.span,
            Self::Property(n) => n.span,
        }
    }
}

/// Visits every node of `program` in pre-order.
///
/// Children are visited in declaration order: a keyword's argument, then its
/// sub-keywords, then its body.
pub fn walk<'a, F>(program: &'a Program, f: &mut F)
where
    F: FnMut(Node<'a>),
{
    f(Node::Program(program));
    walk_statements(&program.body, f);
}

fn walk_statements<'a, F>(body: &'a [Statement], f: &mut F)
where
    F: FnMut(Node<'a>),
{
    for statement in body {
        walk_statement(statement, f);
    }
}

fn walk_statement<'a, F>(statement: &'a Statement, f: &mut F)
where
    F: FnMut(Node<'a>),
{
    match statement {
        Statement::Keyword(k) => {
            f(Node::KeywordStatement(k));
            if let Some(argument) = &k.argument {
                walk_argument(argument, f);
            }
            for sub in &k.sub_keywords {
                f(Node::SubKeyword(sub));
                if let Some(argument) = &sub.argument {
                    walk_argument(argument, f);
                }
                walk_statements(&sub.body, f);
            }
            walk_statements(&k.body, f);
        }
        Statement::Expression(e) => {
            f(Node::ExpressionStatement(e));
            walk_expression(&e.expression, f);
        }
        Statement::Text(t) => {
            f(Node::TextStatement(t));
            walk_parts(&t.parts, f);
        }
        Statement::Comment(c) => f(Node::CommentStatement(c)),
        Statement::AnswerOption(a) => {
            f(Node::AnswerOption(a));
            walk_text(&a.text, f);
            walk_statements(&a.body, f);
        }
    }
}

fn walk_argument<'a, F>(argument: &'a Argument, f: &mut F)
where
    F: FnMut(Node<'a>),
{
    f(Node::Argument(argument));
    match argument {
        Argument::Text(text) => walk_text(text, f),
        Argument::Expression(e) => walk_expression(e, f),
        Argument::Loop(header) => {
            for variable in &header.variables {
                walk_expression(variable, f);
            }
            walk_expression(&header.collection, f);
        }
    }
}

fn walk_text<'a, F>(text: &'a TextContent, f: &mut F)
where
    F: FnMut(Node<'a>),
{
    f(Node::TextContent(text));
    walk_parts(&text.parts, f);
}

fn walk_parts<'a, F>(parts: &'a [TextPart], f: &mut F)
where
    F: FnMut(Node<'a>),
{
    for part in parts {
        if let TextPart::Interpolation(e) = part {
            walk_expression(e, f);
        }
    }
}

/// Visits `expression` and its sub-expressions in pre-order.
pub fn walk_expression<'a, F>(expression: &'a Expression, f: &mut F)
where
    F: FnMut(Node<'a>),
{
    f(Node::Expression(expression));
    match &expression.kind {
        ExpressionKind::Binary { left, right, .. } => {
            walk_expression(left, f);
            walk_expression(right, f);
        }
        ExpressionKind::Unary { argument, .. } => walk_expression(argument, f),
        ExpressionKind::Member { object, .. } => walk_expression(object, f),
        ExpressionKind::Call { callee, arguments } => {
            walk_expression(callee, f);
            for argument in arguments {
                walk_expression(argument, f);
            }
        }
        ExpressionKind::Index { object, index } => {
            walk_expression(object, f);
            walk_expression(index, f);
        }
        ExpressionKind::Array(elements) => {
            for element in elements {
                walk_expression(element, f);
            }
        }
        ExpressionKind::Object(properties) => {
            for property in properties {
                f(Node::Property(property));
                walk_expression(&property.key, f);
                walk_expression(&property.value, f);
            }
        }
        ExpressionKind::Literal(literal) => {
            for interpolation in &literal.interpolations {
                walk_expression(interpolation, f);
            }
        }
        ExpressionKind::Identifier(_) => {}
    }
}
