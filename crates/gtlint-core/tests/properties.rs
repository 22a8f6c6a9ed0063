//! Property-based tests with proptest.
//!
//! The front end must accept any input: the lexer and parser terminate on
//! arbitrary text and token streams, indentation stays balanced, rescanned
//! arguments keep their source positions, and fix application is total.

use gtlint_core::{
    apply_fixes, parse, parse_directives, parse_source, tokenize, tokenize_expression_at, Fix,
    Position, Span, Token, TokenKind,
};
use proptest::prelude::*;

// -- Strategies --

/// Text built from the characters the lexer treats specially.
fn program_like() -> impl Strategy<Value = String> {
    "[ \t\r\n*>{}a-z0-9:\"'()\\[\\],.=+<-]{0,200}"
}

/// Line-oriented source assembled from plausible lines.
fn program_lines() -> impl Strategy<Value = String> {
    let line = prop_oneof![
        "\t{0,3}\\*[a-zA-Z]{1,8}(: [a-z0-9 ><=+*]{0,12})?",
        "\t{0,3}>> [a-z]{1,4} = [a-z0-9 +*(){}\\[\\],-]{0,16}",
        "\t{0,3}-- [a-z@:, -]{0,20}",
        "\t{0,3}[A-Za-z ]{0,10}(\\{[a-z0-9 +]{0,6}\\}?)?",
        Just(String::new()),
    ];
    prop::collection::vec(line, 0..30).prop_map(|lines| lines.join("\n"))
}

/// Single-line expression text.
fn expression_text() -> impl Strategy<Value = String> {
    "[a-z0-9 +*/%<>=(),.:\\[\\]{}\"'-]{0,40}"
}

const KINDS: &[TokenKind] = &[
    TokenKind::Newline,
    TokenKind::Indent,
    TokenKind::Dedent,
    TokenKind::Eof,
    TokenKind::KeywordStart,
    TokenKind::ExpressionStart,
    TokenKind::CommentStart,
    TokenKind::Keyword,
    TokenKind::SubKeyword,
    TokenKind::Colon,
    TokenKind::Text,
    TokenKind::Comment,
    TokenKind::String,
    TokenKind::Number,
    TokenKind::Identifier,
    TokenKind::Operator,
    TokenKind::Punctuation,
    TokenKind::InterpolationStart,
    TokenKind::InterpolationEnd,
    TokenKind::Error,
];

const TEXTS: &[&str] = &[
    "", "*", ">>", "if", "for", "x", "in", "(", ")", "[", "]", "{", "}", ",", "=", "+", "-",
    "not", "1", "\"s\"", ":", "->", "::", ".",
];

/// Arbitrary token streams, with no guarantee of a trailing `Eof`.
fn token_stream() -> impl Strategy<Value = Vec<Token>> {
    let token = (0..KINDS.len(), 0..TEXTS.len()).prop_map(|(kind, text)| {
        Token::new(KINDS[kind], TEXTS[text], Span::point(Position::start()))
    });
    prop::collection::vec(token, 0..80)
}

// -- Properties --

proptest! {
    #[test]
    fn tokenize_balances_indentation(source in program_like()) {
        let tokens = tokenize(&source);
        let indents = tokens.iter().filter(|t| t.kind == TokenKind::Indent).count();
        let dedents = tokens.iter().filter(|t| t.kind == TokenKind::Dedent).count();
        prop_assert_eq!(indents, dedents);
    }

    #[test]
    fn tokenize_ends_with_single_eof(source in any::<String>()) {
        let tokens = tokenize(&source);
        prop_assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Eof));
        prop_assert_eq!(tokens.iter().filter(|t| t.kind == TokenKind::Eof).count(), 1);
        for token in &tokens {
            prop_assert!(token.span.end.offset <= source.len());
        }
    }

    #[test]
    fn tokenize_balances_structured_programs(source in program_lines()) {
        let tokens = tokenize(&source);
        let depth = tokens.iter().try_fold(0usize, |depth, t| match t.kind {
            TokenKind::Indent => Some(depth + 1),
            TokenKind::Dedent => depth.checked_sub(1),
            _ => Some(depth),
        });
        prop_assert_eq!(depth, Some(0));
    }

    #[test]
    fn parse_terminates_on_arbitrary_tokens(tokens in token_stream()) {
        let program = parse(&tokens);
        prop_assert!(program.body.len() <= tokens.len());
    }

    #[test]
    fn parse_terminates_on_arbitrary_text(source in program_lines()) {
        let output = parse_source(&source);
        for diagnostic in &output.diagnostics {
            prop_assert!(diagnostic.span.start.offset <= source.len());
        }
    }

    #[test]
    fn rescanned_tokens_stay_inside_argument(
        text in expression_text(),
        line in 1usize..50,
        column in 1usize..20,
        offset in 0usize..1000,
    ) {
        let anchor = Position::new(line, column, offset);
        for token in tokenize_expression_at(&text, anchor) {
            prop_assert!(token.span.start.offset >= offset);
            prop_assert!(token.span.end.offset <= offset + text.len());
            prop_assert_eq!(token.span.start.line, line);
        }
    }

    #[test]
    fn directives_never_panic(source in program_lines()) {
        let _ = parse_directives(&source);
    }

    #[test]
    fn apply_fixes_accounts_for_every_fix(
        source in "[a-zé \n]{0,40}",
        ranges in prop::collection::vec((0usize..48, 0usize..8, "[a-z]{0,3}"), 0..8),
    ) {
        let fixes: Vec<Fix> = ranges
            .into_iter()
            .map(|(start, len, text)| Fix::new(start, start + len, text))
            .collect();
        let outcome = apply_fixes(&source, &fixes);
        prop_assert_eq!(outcome.applied + outcome.skipped.len(), fixes.len());
        if outcome.applied == 0 {
            prop_assert_eq!(outcome.output, source);
        }
    }
}
