//! Recursive-descent parser with error recovery.
//!
//! The parser never fails: malformed input yields a best-effort tree plus a
//! list of [`ParseDiagnostic`]s. Expression arguments of keywords such as
//! `*if` arrive from the lexer as text and are re-tokenized in place with
//! [`tokenize_expression_at`], so their spans still point into the file.

use crate::ast::{
    AnswerOption, Argument, BinaryOp, CommentStatement, Expression, ExpressionKind,
    ExpressionStatement, Identifier, KeywordStatement, Literal, LiteralValue, LoopArgument,
    Program, Property, Statement, SubKeyword, TextContent, TextPart, TextStatement, UnaryOp,
};
use crate::lexer::{find_closing_brace, tokenize, tokenize_expression_at};
use crate::token::{Token, TokenKind};
use crate::types::{Position, Span};
use crate::vocabulary;

/// Maximum nesting of blocks and bracketed expressions.
const MAX_DEPTH: usize = 100;

/// Maximum operator and postfix applications in one top-level expression.
const MAX_OPERATIONS: usize = 1_000;

/// A syntax error found while parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDiagnostic {
    /// Human-readable message.
    pub message: String,
    /// Location of the offending input.
    pub span: Span,
}

/// Tree and diagnostics produced by [`parse_with_diagnostics`].
#[derive(Debug, Clone)]
pub struct ParseOutput {
    /// The parsed program.
    pub program: Program,
    /// Syntax errors, in discovery order.
    pub diagnostics: Vec<ParseDiagnostic>,
}

/// Parses a token stream, discarding diagnostics.
#[must_use]
pub fn parse(tokens: &[Token]) -> Program {
    parse_with_diagnostics(tokens).program
}

/// Parses a token stream.
///
/// Accepts any sequence of tokens, including streams that do not end with
/// `Eof`.
#[must_use]
pub fn parse_with_diagnostics(tokens: &[Token]) -> ParseOutput {
    Parser::new(tokens).parse_program()
}

/// Tokenizes and parses `source`.
#[must_use]
pub fn parse_source(source: &str) -> ParseOutput {
    parse_with_diagnostics(&tokenize(source))
}

/// Whether a top-level `=` assigns or compares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Context {
    Statement,
    Condition,
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    eof: Token,
    last_end: Position,
    depth: usize,
    /// Set while a top-level expression is being parsed.
    in_expression: bool,
    operations: usize,
    diagnostics: Vec<ParseDiagnostic>,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        let end = tokens.last().map_or_else(Position::start, |t| t.span.end);
        Self::with_end(tokens, end)
    }

    fn with_end(tokens: &'a [Token], end: Position) -> Self {
        Self {
            tokens,
            pos: 0,
            eof: Token::new(TokenKind::Eof, "", Span::point(end)),
            last_end: tokens.first().map_or(end, |t| t.span.start),
            depth: 0,
            in_expression: false,
            operations: 0,
            diagnostics: Vec::new(),
        }
    }

    // --- token access ---

    fn peek(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&self.eof)
    }

    fn peek_at(&self, n: usize) -> &Token {
        self.tokens.get(self.pos + n).unwrap_or(&self.eof)
    }

    fn kind(&self) -> TokenKind {
        self.peek().kind
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.kind() == kind
    }

    fn at_operator(&self, op: &str) -> bool {
        self.peek().is_operator(op)
    }

    fn at_punct(&self, punct: &str) -> bool {
        self.peek().is_punct(punct)
    }

    fn at_line_end(&self) -> bool {
        self.kind().is_structural()
    }

    /// True where an expression cannot continue.
    fn at_boundary(&self) -> bool {
        self.at_line_end()
            || matches!(
                self.kind(),
                TokenKind::InterpolationEnd | TokenKind::CommentStart | TokenKind::Comment
            )
    }

    fn bump(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        if !token.kind.is_structural() {
            self.last_end = token.span.end;
        }
        token
    }

    fn error(&mut self, message: impl Into<String>, span: Span) {
        self.diagnostics.push(ParseDiagnostic {
            message: message.into(),
            span,
        });
    }

    fn error_here(&mut self, message: impl Into<String>) {
        let span = self.peek().span;
        self.error(message, span);
    }

    fn span_from(&self, start: Position) -> Span {
        Span::new(start, self.last_end)
    }

    fn expect_punct(&mut self, punct: &str) -> bool {
        if self.at_punct(punct) {
            self.bump();
            true
        } else {
            self.error_here(format!("expected `{punct}`"));
            false
        }
    }

    // --- statements ---

    fn parse_program(mut self) -> ParseOutput {
        let body = self.parse_block(false);
        let end = self.tokens.last().map_or_else(Position::start, |t| t.span.end);
        ParseOutput {
            program: Program {
                body,
                span: Span::new(Position::start(), end),
            },
            diagnostics: self.diagnostics,
        }
    }

    /// Parses statements until a matching `Dedent` (nested) or end of input.
    fn parse_block(&mut self, nested: bool) -> Vec<Statement> {
        let mut body = Vec::new();
        loop {
            match self.kind() {
                TokenKind::Eof => break,
                TokenKind::Newline => {
                    self.bump();
                }
                TokenKind::Dedent => {
                    self.bump();
                    if nested {
                        break;
                    }
                }
                TokenKind::Indent => self.unexpected_indent(&mut body),
                _ => body.push(self.parse_statement()),
            }
        }
        body
    }

    /// Reports a stray indent and splices the indented lines into `body`.
    fn unexpected_indent(&mut self, body: &mut Vec<Statement>) {
        let token = self.bump();
        self.error("unexpected indentation", token.span);
        if self.depth >= MAX_DEPTH {
            return;
        }
        self.depth += 1;
        let inner = self.parse_block(true);
        self.depth -= 1;
        body.extend(inner);
    }

    /// Consumes blank lines and an `Indent` if a block follows.
    fn enter_block(&mut self) -> bool {
        let mut n = 0;
        while self.peek_at(n).kind == TokenKind::Newline {
            n += 1;
        }
        if self.peek_at(n).kind != TokenKind::Indent || self.depth >= MAX_DEPTH {
            return false;
        }
        for _ in 0..=n {
            self.bump();
        }
        self.depth += 1;
        true
    }

    fn parse_statement(&mut self) -> Statement {
        match self.kind() {
            TokenKind::KeywordStart | TokenKind::Keyword | TokenKind::SubKeyword => {
                Statement::Keyword(self.parse_keyword_statement())
            }
            TokenKind::ExpressionStart => Statement::Expression(self.parse_expression_statement()),
            TokenKind::CommentStart | TokenKind::Comment => {
                Statement::Comment(self.parse_comment())
            }
            _ => self.parse_text_line(),
        }
    }

    fn parse_comment(&mut self) -> CommentStatement {
        let start = self.peek().span.start;
        if self.at(TokenKind::CommentStart) {
            self.bump();
        }
        let text = if self.at(TokenKind::Comment) {
            self.bump().text
        } else {
            String::new()
        };
        CommentStatement {
            text,
            span: self.span_from(start),
        }
    }

    fn parse_expression_statement(&mut self) -> ExpressionStatement {
        let start = self.bump().span.start;
        let expression = self.parse_standalone_expression(Context::Statement);
        let span = Span::new(start, expression.span.end);
        ExpressionStatement { expression, span }
    }

    fn parse_keyword_statement(&mut self) -> KeywordStatement {
        let header = self.parse_header();
        let mut sub_keywords = Vec::new();
        let mut body = Vec::new();
        if self.enter_block() {
            self.parse_keyword_body(&mut sub_keywords, &mut body);
            self.depth -= 1;
        }
        KeywordStatement {
            keyword: header.keyword,
            keyword_span: header.keyword_span,
            argument: header.argument,
            sub_keywords,
            body,
            span: self.span_from(header.start),
        }
    }

    fn parse_keyword_body(&mut self, subs: &mut Vec<SubKeyword>, body: &mut Vec<Statement>) {
        loop {
            match self.kind() {
                TokenKind::Eof => break,
                TokenKind::Newline => {
                    self.bump();
                }
                TokenKind::Dedent => {
                    self.bump();
                    break;
                }
                TokenKind::Indent => self.unexpected_indent(body),
                TokenKind::SubKeyword => subs.push(self.parse_sub_keyword()),
                TokenKind::KeywordStart if self.peek_at(1).kind == TokenKind::SubKeyword => {
                    subs.push(self.parse_sub_keyword());
                }
                _ => body.push(self.parse_statement()),
            }
        }
    }

    fn parse_sub_keyword(&mut self) -> SubKeyword {
        let header = self.parse_header();
        let body = if self.enter_block() {
            let body = self.parse_block(true);
            self.depth -= 1;
            body
        } else {
            Vec::new()
        };
        SubKeyword {
            keyword: header.keyword,
            keyword_span: header.keyword_span,
            argument: header.argument,
            body,
            span: self.span_from(header.start),
        }
    }

    /// Parses `*name: argument` up to the end of the line.
    fn parse_header(&mut self) -> Header {
        let start = self.peek().span.start;
        if self.at(TokenKind::KeywordStart) {
            self.bump();
        }

        let (keyword, keyword_span, is_sub) = match self.kind() {
            TokenKind::Keyword | TokenKind::SubKeyword => {
                let token = self.bump();
                let is_sub = token.kind == TokenKind::SubKeyword;
                (token.text, token.span, is_sub)
            }
            _ => {
                let at = Span::point(self.peek().span.start);
                self.error("expected keyword name after `*`", at);
                (String::new(), at, false)
            }
        };

        let argument = if self.at(TokenKind::Colon) {
            self.bump();
            self.parse_argument(&keyword.to_lowercase(), is_sub)
        } else {
            if !self.at_line_end() {
                self.error_here(format!("expected `:` after `*{keyword}`"));
            }
            None
        };
        while !self.at_line_end() {
            self.bump();
        }

        Header {
            keyword,
            keyword_span,
            argument,
            start,
        }
    }

    fn parse_argument(&mut self, name: &str, is_sub: bool) -> Option<Argument> {
        if self.at_line_end() {
            return None;
        }
        if !vocabulary::takes_expression(name, is_sub) {
            return Some(Argument::Text(self.parse_text_content()));
        }

        let tokens: &'a [Token] = self.tokens;
        let begin = self.pos;
        while !self.at_line_end() {
            self.bump();
        }
        let slice = tokens.get(begin..self.pos)?;
        let is_loop = !is_sub && name == vocabulary::LOOP_KEYWORD;
        self.parse_rescanned(slice, is_loop)
    }

    /// Re-tokenizes argument tokens as an expression and parses them with a
    /// nested parser, merging its diagnostics.
    fn parse_rescanned(&mut self, slice: &[Token], is_loop: bool) -> Option<Argument> {
        let anchor = slice.first()?.span.start;
        let end = slice.last()?.span.end;
        let raw = reconstruct(slice);
        let tokens = tokenize_expression_at(&raw, anchor);

        let mut inner = Parser::with_end(&tokens, end);
        inner.depth = self.depth;
        let argument = if is_loop {
            Argument::Loop(inner.parse_loop_argument())
        } else {
            Argument::Expression(inner.parse_standalone_expression(Context::Condition))
        };
        self.diagnostics.append(&mut inner.diagnostics);
        Some(argument)
    }

    fn parse_text_line(&mut self) -> Statement {
        let text = self.parse_text_content();
        if self.enter_block() {
            let body = self.parse_block(true);
            self.depth -= 1;
            let span = self.span_from(text.span.start);
            return Statement::AnswerOption(AnswerOption { text, body, span });
        }
        Statement::Text(TextStatement {
            parts: text.parts,
            span: text.span,
        })
    }

    fn parse_text_content(&mut self) -> TextContent {
        let start = self.peek().span.start;
        let mut parts = Vec::new();
        while !self.at_line_end() {
            let token = self.bump();
            match token.kind {
                TokenKind::InterpolationStart => {
                    let expression = self.parse_interpolation(token.span);
                    parts.push(TextPart::Interpolation(expression));
                }
                TokenKind::Error => {
                    self.error(describe_error(&token.text), token.span);
                    parts.push(TextPart::Literal {
                        text: token.text,
                        span: token.span,
                    });
                }
                _ => parts.push(TextPart::Literal {
                    text: token.text,
                    span: token.span,
                }),
            }
        }
        TextContent {
            parts,
            span: self.span_from(start),
        }
    }

    fn parse_interpolation(&mut self, open: Span) -> Expression {
        if self.at(TokenKind::InterpolationEnd) {
            let close = self.bump();
            let span = open.to(close.span);
            self.error("empty interpolation", span);
            return Expression::null(span);
        }

        let expression = if self.at_boundary() {
            self.error_here("expected expression");
            Expression::null(Span::point(open.end))
        } else {
            self.parse_expression(Context::Condition)
        };

        if !self.at(TokenKind::InterpolationEnd) {
            self.error_here("expected `}` to close interpolation");
            while !self.at_line_end() && !self.at(TokenKind::InterpolationEnd) {
                self.bump();
            }
        }
        if self.at(TokenKind::InterpolationEnd) {
            self.bump();
        }
        expression
    }

    // --- expressions ---

    /// Parses an expression that must fill the rest of the line; a trailing
    /// comment is allowed.
    fn parse_standalone_expression(&mut self, context: Context) -> Expression {
        if self.at_boundary() {
            let span = Span::point(self.peek().span.start);
            self.error("expected expression", span);
            self.skip_line();
            return Expression::null(span);
        }
        let expression = self.parse_expression(context);
        self.expect_expression_end();
        expression
    }

    fn expect_expression_end(&mut self) {
        if !self.at_boundary() {
            let token = self.peek().clone();
            self.error(
                format!(
                    "unexpected {} `{}` after expression",
                    token.kind.describe(),
                    token.text
                ),
                token.span,
            );
        }
        self.skip_line();
    }

    fn skip_line(&mut self) {
        while !self.at_line_end() {
            self.bump();
        }
    }

    fn parse_loop_argument(&mut self) -> LoopArgument {
        let start = self.peek().span.start;
        let mut variables = Vec::new();
        loop {
            if self.at(TokenKind::Identifier) {
                let token = self.bump();
                variables.push(Expression::new(
                    ExpressionKind::Identifier(token.text),
                    token.span,
                ));
            } else {
                self.error_here("expected loop variable");
                break;
            }
            if self.at_punct(",") {
                self.bump();
            } else {
                break;
            }
        }

        let collection = if self.at_operator("in") {
            self.bump();
            if self.at_boundary() {
                self.error_here("expected collection after `in`");
                Expression::null(Span::point(self.last_end))
            } else {
                self.parse_expression(Context::Condition)
            }
        } else {
            self.error_here("expected `in` in loop header");
            Expression::null(Span::point(self.peek().span.start))
        };
        let span = self.span_from(start);
        self.expect_expression_end();

        LoopArgument {
            variables,
            collection,
            span,
        }
    }

    fn parse_expression(&mut self, context: Context) -> Expression {
        if self.in_expression {
            return self.parse_expression_in(context);
        }
        self.in_expression = true;
        self.operations = 0;
        let expression = self.parse_expression_in(context);
        self.in_expression = false;
        expression
    }

    fn parse_expression_in(&mut self, context: Context) -> Expression {
        match context {
            Context::Statement => self.parse_assignment(),
            Context::Condition => self.parse_binary(0, Context::Condition),
        }
    }

    /// `a = b = c` parses as `a = (b = c)`.
    fn parse_assignment(&mut self) -> Expression {
        let mut operands = vec![self.parse_binary(0, Context::Statement)];
        while self.at_operator("=") {
            if !self.apply_operation() {
                break;
            }
            self.bump();
            operands.push(self.parse_binary(0, Context::Statement));
        }

        let mut right = operands.pop().unwrap_or_else(|| Expression::null(Span::point(self.last_end)));
        while let Some(left) = operands.pop() {
            right = binary(BinaryOp::Assign, left, right);
        }
        right
    }

    fn binary_op(&self, context: Context) -> Option<(BinaryOp, u8)> {
        let token = self.peek();
        if token.kind != TokenKind::Operator {
            return None;
        }
        let op = match token.text.as_str() {
            "or" => BinaryOp::Or,
            "and" => BinaryOp::And,
            "=" if context == Context::Condition => BinaryOp::Equal,
            "<" => BinaryOp::Less,
            ">" => BinaryOp::Greater,
            "<=" => BinaryOp::LessEqual,
            ">=" => BinaryOp::GreaterEqual,
            "in" => BinaryOp::In,
            "+" => BinaryOp::Add,
            "-" => BinaryOp::Subtract,
            "*" => BinaryOp::Multiply,
            "/" => BinaryOp::Divide,
            "%" => BinaryOp::Remainder,
            _ => return None,
        };
        Some((op, precedence(op)))
    }

    /// Precedence climbing over the binary operator table.
    fn parse_binary(&mut self, min: u8, context: Context) -> Expression {
        let mut left = self.parse_unary();
        while let Some((op, prec)) = self.binary_op(context) {
            if prec < min || !self.apply_operation() {
                break;
            }
            self.bump();
            let right = self.parse_binary(prec + 1, context);
            left = binary(op, left, right);
        }
        left
    }

    fn parse_unary(&mut self) -> Expression {
        let mut ops = Vec::new();
        loop {
            let op = if self.at_operator("not") {
                UnaryOp::Not
            } else if self.at_operator("-") {
                UnaryOp::Negate
            } else {
                break;
            };
            if !self.apply_operation() {
                break;
            }
            ops.push((op, self.bump().span.start));
        }

        let mut expression = self.parse_postfix();
        while let Some((op, start)) = ops.pop() {
            let span = Span::new(start, expression.span.end);
            expression = Expression::new(
                ExpressionKind::Unary {
                    op,
                    argument: Box::new(expression),
                },
                span,
            );
        }
        expression
    }

    fn parse_postfix(&mut self) -> Expression {
        let mut expression = self.parse_primary();
        loop {
            let postfix = self.at_punct(".")
                || self.at_operator("::")
                || self.at_punct("(")
                || self.at_punct("[");
            if !postfix || !self.apply_operation() {
                break;
            }
            if self.at_punct(".") || self.at_operator("::") {
                let namespaced = self.at_operator("::");
                self.bump();
                if !self.at(TokenKind::Identifier) {
                    self.error_here("expected property name");
                    break;
                }
                let token = self.bump();
                let span = Span::new(expression.span.start, token.span.end);
                expression = Expression::new(
                    ExpressionKind::Member {
                        object: Box::new(expression),
                        property: Identifier {
                            name: token.text,
                            span: token.span,
                        },
                        namespaced,
                    },
                    span,
                );
            } else if self.at_punct("(") {
                self.bump();
                let arguments = self.parse_list(")");
                let span = self.span_from(expression.span.start);
                expression = Expression::new(
                    ExpressionKind::Call {
                        callee: Box::new(expression),
                        arguments,
                    },
                    span,
                );
            } else if self.at_punct("[") {
                self.bump();
                let index = self.nested(|p| p.parse_expression(Context::Condition));
                self.expect_punct("]");
                let span = self.span_from(expression.span.start);
                expression = Expression::new(
                    ExpressionKind::Index {
                        object: Box::new(expression),
                        index: Box::new(index),
                    },
                    span,
                );
            } else {
                break;
            }
        }
        expression
    }

    fn parse_primary(&mut self) -> Expression {
        let token = self.peek().clone();
        match token.kind {
            TokenKind::Number => {
                self.bump();
                let value = token
                    .text
                    .parse::<f64>()
                    .map_or(LiteralValue::Null, LiteralValue::Number);
                literal(value, token, Vec::new())
            }
            TokenKind::String => {
                self.bump();
                let value = LiteralValue::String(strip_quotes(&token.text).to_string());
                let interpolations = self.parse_string_interpolations(&token);
                literal(value, token, interpolations)
            }
            TokenKind::Identifier => {
                self.bump();
                Expression::new(ExpressionKind::Identifier(token.text), token.span)
            }
            TokenKind::Punctuation if token.text == "(" => {
                self.bump();
                let inner = self.nested(|p| p.parse_expression(Context::Condition));
                self.expect_punct(")");
                inner
            }
            TokenKind::Punctuation if token.text == "[" => {
                self.bump();
                let elements = self.parse_list("]");
                Expression::new(ExpressionKind::Array(elements), self.span_from(token.span.start))
            }
            TokenKind::Punctuation if token.text == "{" => {
                self.bump();
                let properties = self.parse_properties();
                Expression::new(
                    ExpressionKind::Object(properties),
                    self.span_from(token.span.start),
                )
            }
            TokenKind::Error => {
                self.bump();
                self.error(describe_error(&token.text), token.span);
                Expression::null(token.span)
            }
            _ if self.at_boundary() => {
                let span = Span::point(token.span.start);
                self.error("expected expression", span);
                Expression::null(span)
            }
            _ => {
                self.bump();
                self.error(
                    format!("unexpected {} `{}`", token.kind.describe(), token.text),
                    token.span,
                );
                Expression::null(token.span)
            }
        }
    }

    /// Parses comma-separated expressions up to `close`; the opener is
    /// already consumed.
    fn parse_list(&mut self, close: &str) -> Vec<Expression> {
        let mut items = Vec::new();
        loop {
            if self.at_punct(close) {
                self.bump();
                break;
            }
            if self.at_boundary() {
                self.error_here(format!("expected `{close}`"));
                break;
            }
            items.push(self.nested(|p| p.parse_expression(Context::Condition)));
            if self.at_punct(",") {
                self.bump();
                continue;
            }
            if self.at_punct(close) {
                self.bump();
                break;
            }
            self.error_here(format!("expected `,` or `{close}`"));
            break;
        }
        items
    }

    fn parse_properties(&mut self) -> Vec<Property> {
        let mut properties = Vec::new();
        loop {
            if self.at_punct("}") {
                self.bump();
                break;
            }
            if self.at_boundary() {
                self.error_here("expected `}`");
                break;
            }
            let start = self.peek().span.start;
            let key = self.nested(|p| p.parse_expression(Context::Condition));
            let value = if self.at_operator("->") {
                self.bump();
                self.nested(|p| p.parse_expression(Context::Condition))
            } else {
                self.error_here("expected `->` in object literal");
                Expression::null(Span::point(self.peek().span.start))
            };
            properties.push(Property {
                key,
                value,
                span: self.span_from(start),
            });
            if self.at_punct(",") {
                self.bump();
                continue;
            }
            if self.at_punct("}") {
                self.bump();
                break;
            }
            self.error_here("expected `,` or `}`");
            break;
        }
        properties
    }

    /// Runs `f` one nesting level deeper, giving up past [`MAX_DEPTH`].
    /// Parses the `{...}` regions of a string token. A region that does not
    /// parse cleanly is literal text and yields nothing.
    fn parse_string_interpolations(&mut self, token: &Token) -> Vec<Expression> {
        let mut found = Vec::new();
        if self.depth >= MAX_DEPTH {
            return found;
        }
        let text = token.text.as_str();
        let start = token.span.start;
        let mut search = 0;
        while let Some(open) = text[search..].find('{').map(|i| search + i) {
            let Some(close) = find_closing_brace(&text[open..]).map(|i| open + i) else {
                break;
            };
            search = close + 1;
            let inner = &text[open + 1..close];
            if inner.trim().is_empty() {
                continue;
            }

            let anchor = Position::new(
                start.line,
                start.column + text[..=open].chars().count(),
                start.offset + open + 1,
            );
            let end = Position::new(
                start.line,
                anchor.column + inner.chars().count(),
                anchor.offset + inner.len(),
            );
            let tokens = tokenize_expression_at(inner, anchor);
            let mut parser = Parser::with_end(&tokens, end);
            parser.depth = self.depth + 1;
            let expression = parser.parse_standalone_expression(Context::Condition);
            if parser.diagnostics.is_empty() {
                found.push(expression);
            }
        }
        found
    }

    /// Counts one operator or postfix application against the expression
    /// budget. Once the budget is spent the rest of the line is skipped.
    fn apply_operation(&mut self) -> bool {
        if self.operations < MAX_OPERATIONS {
            self.operations += 1;
            return true;
        }
        if self.operations == MAX_OPERATIONS {
            self.operations += 1;
            self.error_here("expression is nested too deeply");
        }
        while !self.at_boundary() {
            self.bump();
        }
        false
    }

    fn nested(&mut self, f: impl FnOnce(&mut Self) -> Expression) -> Expression {
        if self.depth >= MAX_DEPTH {
            let span = self.peek().span;
            self.error("expression is nested too deeply", span);
            while !self.at_boundary() {
                self.bump();
            }
            return Expression::null(span);
        }
        self.depth += 1;
        let expression = f(self);
        self.depth -= 1;
        expression
    }
}

struct Header {
    keyword: String,
    keyword_span: Span,
    argument: Option<Argument>,
    start: Position,
}

const fn precedence(op: BinaryOp) -> u8 {
    match op {
        BinaryOp::Assign => 0,
        BinaryOp::Or => 1,
        BinaryOp::And => 2,
        BinaryOp::Equal => 3,
        BinaryOp::Less | BinaryOp::Greater | BinaryOp::LessEqual | BinaryOp::GreaterEqual => 4,
        BinaryOp::In => 5,
        BinaryOp::Add | BinaryOp::Subtract => 6,
        BinaryOp::Multiply | BinaryOp::Divide | BinaryOp::Remainder => 7,
    }
}

fn binary(op: BinaryOp, left: Expression, right: Expression) -> Expression {
    let span = left.span.to(right.span);
    Expression::new(
        ExpressionKind::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        },
        span,
    )
}

fn literal(value: LiteralValue, token: Token, interpolations: Vec<Expression>) -> Expression {
    Expression::new(
        ExpressionKind::Literal(Literal {
            value,
            raw: token.text,
            interpolations,
        }),
        token.span,
    )
}

fn strip_quotes(raw: &str) -> &str {
    let mut chars = raw.chars();
    match (chars.next(), chars.next_back()) {
        (Some(open), Some(close)) if open == close && matches!(open, '"' | '\'') => chars.as_str(),
        _ => raw,
    }
}

/// Rebuilds the source text of consecutive tokens on one line, filling gaps
/// between them with spaces so byte offsets line up.
fn reconstruct(tokens: &[Token]) -> String {
    let Some(first) = tokens.first() else {
        return String::new();
    };
    let base = first.span.start.offset;
    let mut raw = String::new();
    for token in tokens {
        let gap = token.span.start.offset.saturating_sub(base + raw.len());
        raw.extend(std::iter::repeat(' ').take(gap));
        raw.push_str(&token.text);
    }
    raw
}

fn describe_error(text: &str) -> String {
    if text.starts_with('{') {
        format!("unterminated interpolation `{text}`")
    } else if text.starts_with(['"', '\'']) {
        format!("unterminated string {text}")
    } else {
        format!("unexpected character `{text}`")
    }
}
