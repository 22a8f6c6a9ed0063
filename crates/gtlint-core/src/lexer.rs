//! Line-oriented, indentation-aware lexer.
//!
//! Each physical line is classified by its first non-tab characters:
//! `--` starts a comment, `>>` an expression, `*` a keyword (unless the line
//! is bold markup) and anything else is text with `{...}` interpolations.
//! Leading tabs drive an indentation stack that emits `Indent`/`Dedent`
//! tokens; blank lines never change indentation.

use crate::token::{Token, TokenKind};
use crate::types::{Position, Span};
use crate::vocabulary;

const EXPRESSION_SIGIL: &str = ">>";

/// Tokenizes a whole source file.
///
/// Never fails: invalid input produces `Error` tokens. The stream always
/// ends with the dedents needed to close open blocks followed by `Eof`.
#[must_use]
pub fn tokenize(source: &str) -> Vec<Token> {
    Lexer::new(source).run()
}

/// Tokenizes `text` as a standalone expression whose first character sits at
/// `anchor` in the enclosing file.
///
/// Returned spans are in original-file coordinates. Layout tokens and the
/// synthetic `>>` are dropped, so the result holds only expression tokens.
#[must_use]
pub fn tokenize_expression_at(text: &str, anchor: Position) -> Vec<Token> {
    let synthetic = format!("{EXPRESSION_SIGIL}{text}");
    let sigil = EXPRESSION_SIGIL.len();

    let remap = |pos: Position| Position {
        line: anchor.line + pos.line.saturating_sub(1),
        column: if pos.line == 1 {
            (anchor.column + pos.column).saturating_sub(1 + sigil)
        } else {
            pos.column
        },
        offset: anchor.offset + pos.offset.saturating_sub(sigil),
    };

    tokenize(&synthetic)
        .into_iter()
        .filter(|t| !t.kind.is_structural() && t.kind != TokenKind::ExpressionStart)
        .map(|t| Token {
            span: Span::new(remap(t.span.start), remap(t.span.end)),
            ..t
        })
        .collect()
}

/// Splits `source` into lines the way [`tokenize`] counts them.
///
/// A line ends at `\r\n`, `\n` or a bare `\r`; each item keeps its line
/// ending. Like [`str::lines`], no item follows a final line ending.
pub fn source_lines(source: &str) -> impl Iterator<Item = &str> {
    let mut rest = source;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        let end = match rest.find(['\n', '\r']) {
            Some(i) if rest[i..].starts_with("\r\n") => i + 2,
            Some(i) => i + 1,
            None => rest.len(),
        };
        let (line, tail) = rest.split_at(end);
        rest = tail;
        Some(line)
    })
}

/// Removes the line ending left on an item of [`source_lines`].
#[must_use]
pub fn strip_line_ending(line: &str) -> &str {
    line.strip_suffix("\r\n")
        .or_else(|| line.strip_suffix('\n'))
        .or_else(|| line.strip_suffix('\r'))
        .unwrap_or(line)
}

struct Lexer<'a> {
    src: &'a str,
    pos: usize,
    line: usize,
    col: usize,
    indents: Vec<usize>,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            line: 1,
            col: 1,
            indents: vec![0],
            tokens: Vec::new(),
        }
    }

    fn run(mut self) -> Vec<Token> {
        if self.src.starts_with('\u{feff}') {
            self.pos = '\u{feff}'.len_utf8();
        }
        while self.pos < self.src.len() {
            self.lex_line();
        }
        self.finish()
    }

    fn finish(mut self) -> Vec<Token> {
        let end = self.position();
        while self.indents.len() > 1 {
            self.indents.pop();
            self.tokens
                .push(Token::new(TokenKind::Dedent, "", Span::point(end)));
        }
        self.tokens.push(Token::new(TokenKind::Eof, "", Span::point(end)));
        self.tokens
    }

    // --- cursor ---

    fn position(&self) -> Position {
        Position::new(self.line, self.col, self.pos)
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    /// Advances over one character on the current line.
    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        self.col += 1;
        Some(c)
    }

    fn bump_n(&mut self, n: usize) {
        for _ in 0..n {
            self.bump();
        }
    }

    fn skip_inline_whitespace(&mut self, end: usize) {
        while self.pos < end && matches!(self.peek(), Some(' ' | '\t')) {
            self.bump();
        }
    }

    fn push_from(&mut self, kind: TokenKind, start: Position) {
        let text = &self.src[start.offset..self.pos];
        let span = Span::new(start, self.position());
        self.tokens.push(Token::new(kind, text, span));
    }

    fn line_end(&self) -> usize {
        self.rest()
            .find(['\n', '\r'])
            .map_or(self.src.len(), |i| self.pos + i)
    }

    // --- lines ---

    fn lex_line(&mut self) {
        let end = self.line_end();
        let content = &self.src[self.pos..end];

        if !content.trim().is_empty() {
            let line_start = self.position();
            let tabs = content.chars().take_while(|c| *c == '\t').count();
            self.bump_n(tabs);
            self.adjust_indent(tabs, line_start);
            self.skip_inline_whitespace(end);

            let rest = &self.src[self.pos..end];
            if rest.starts_with("--") {
                self.lex_comment(end);
            } else if rest.starts_with(EXPRESSION_SIGIL) {
                let start = self.position();
                self.bump_n(EXPRESSION_SIGIL.len());
                self.push_from(TokenKind::ExpressionStart, start);
                self.lex_expression(end, true);
            } else if rest.starts_with('*') {
                self.lex_keyword_line(end);
            } else {
                self.lex_text(end);
            }
        }

        // Blank lines fall through to here with the cursor still at line start.
        while self.pos < end {
            self.bump();
        }
        self.lex_newline();
    }

    fn lex_newline(&mut self) {
        if self.pos >= self.src.len() {
            return;
        }
        let start = self.position();
        if self.rest().starts_with("\r\n") {
            self.pos += 2;
        } else {
            self.pos += 1;
        }
        let text = &self.src[start.offset..self.pos];
        let end = Position::new(self.line, self.col + 1, self.pos);
        self.tokens
            .push(Token::new(TokenKind::Newline, text, Span::new(start, end)));
        self.line += 1;
        self.col = 1;
    }

    fn adjust_indent(&mut self, tabs: usize, line_start: Position) {
        let top = self.indents.last().copied().unwrap_or(0);
        if tabs > top {
            self.indents.push(tabs);
            self.push_from(TokenKind::Indent, line_start);
            return;
        }

        while self.indents.last().copied().unwrap_or(0) > tabs {
            self.indents.pop();
            self.tokens
                .push(Token::new(TokenKind::Dedent, "", Span::point(line_start)));
        }
        // Dedent to a level that was never opened: treat it as a new level.
        if self.indents.last().copied().unwrap_or(0) < tabs {
            self.indents.push(tabs);
            self.push_from(TokenKind::Indent, line_start);
        }
    }

    fn current_indent(&self) -> usize {
        self.indents.last().copied().unwrap_or(0)
    }

    fn lex_comment(&mut self, end: usize) {
        let start = self.position();
        self.bump_n(2);
        self.push_from(TokenKind::CommentStart, start);

        let body = self.position();
        while self.pos < end {
            self.bump();
        }
        self.push_from(TokenKind::Comment, body);
    }

    // --- keyword lines ---

    fn lex_keyword_line(&mut self, end: usize) {
        let line = &self.src[self.pos..end];
        let name_len: usize = line[1..]
            .chars()
            .take_while(|c| is_name_char(*c))
            .map(char::len_utf8)
            .sum();

        if name_len == 0 || is_bold_markup(line) {
            self.lex_text(end);
            return;
        }

        let start = self.position();
        self.bump();
        self.push_from(TokenKind::KeywordStart, start);

        let name_start = self.position();
        while self.pos < name_start.offset + name_len {
            self.bump();
        }
        let name = self.src[name_start.offset..self.pos].to_lowercase();
        let kind = if self.current_indent() > 0 && vocabulary::is_sub_keyword(&name) {
            TokenKind::SubKeyword
        } else {
            TokenKind::Keyword
        };
        self.push_from(kind, name_start);

        self.skip_inline_whitespace(end);
        if self.peek() == Some(':') && self.pos < end {
            let colon = self.position();
            self.bump();
            self.push_from(TokenKind::Colon, colon);
            self.skip_inline_whitespace(end);
        }
        if self.pos < end {
            self.lex_text(end);
        }
    }

    // --- text ---

    fn lex_text(&mut self, end: usize) {
        let mut run_start = self.position();
        while self.pos < end {
            if self.peek() == Some('{') {
                if self.pos > run_start.offset {
                    self.push_from(TokenKind::Text, run_start);
                }
                self.lex_interpolation(end);
                run_start = self.position();
            } else {
                self.bump();
            }
        }
        if self.pos > run_start.offset {
            self.push_from(TokenKind::Text, run_start);
        }
    }

    fn lex_interpolation(&mut self, end: usize) {
        let start = self.position();
        match find_closing_brace(&self.src[self.pos..end]) {
            Some(close) => {
                let close = self.pos + close;
                self.bump();
                self.push_from(TokenKind::InterpolationStart, start);
                self.lex_expression(close, false);
                let brace = self.position();
                self.bump();
                self.push_from(TokenKind::InterpolationEnd, brace);
            }
            None => {
                while self.pos < end {
                    self.bump();
                }
                self.push_from(TokenKind::Error, start);
            }
        }
    }

    // --- expressions ---

    fn lex_expression(&mut self, end: usize, allow_comment: bool) {
        while self.pos < end {
            let Some(c) = self.peek() else { return };
            let start = self.position();
            match c {
                ' ' | '\t' => {
                    self.bump();
                }
                '-' if allow_comment && self.peek_nth(1) == Some('-') => {
                    self.lex_comment(end);
                }
                '0'..='9' => self.lex_number(start),
                '"' | '\'' => self.lex_string(c, end, start),
                c if c.is_alphabetic() || c == '_' => self.lex_word(start),
                '<' | '>' if self.peek_nth(1) == Some('=') => {
                    self.bump_n(2);
                    self.push_from(TokenKind::Operator, start);
                }
                '-' if self.peek_nth(1) == Some('>') => {
                    self.bump_n(2);
                    self.push_from(TokenKind::Operator, start);
                }
                ':' if self.peek_nth(1) == Some(':') => {
                    self.bump_n(2);
                    self.push_from(TokenKind::Operator, start);
                }
                '+' | '-' | '*' | '/' | '%' | '=' | '<' | '>' => {
                    self.bump();
                    self.push_from(TokenKind::Operator, start);
                }
                '(' | ')' | '[' | ']' | '{' | '}' | ',' | '.' | ':' => {
                    self.bump();
                    self.push_from(TokenKind::Punctuation, start);
                }
                _ => {
                    self.bump();
                    self.push_from(TokenKind::Error, start);
                }
            }
        }
    }

    fn lex_number(&mut self, start: Position) {
        while matches!(self.peek(), Some('0'..='9')) {
            self.bump();
        }
        if self.peek() == Some('.') && matches!(self.peek_nth(1), Some('0'..='9')) {
            self.bump();
            while matches!(self.peek(), Some('0'..='9')) {
                self.bump();
            }
        }
        self.push_from(TokenKind::Number, start);
    }

    fn lex_string(&mut self, quote: char, end: usize, start: Position) {
        self.bump();
        while self.pos < end {
            if self.bump() == Some(quote) {
                self.push_from(TokenKind::String, start);
                return;
            }
        }
        self.push_from(TokenKind::Error, start);
    }

    fn lex_word(&mut self, start: Position) {
        while self.peek().is_some_and(|c| c.is_alphanumeric() || c == '_') {
            self.bump();
        }
        let word = &self.src[start.offset..self.pos];
        let kind = if matches!(word, "and" | "or" | "not" | "in") {
            TokenKind::Operator
        } else {
            TokenKind::Identifier
        };
        self.push_from(kind, start);
    }
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-'
}

/// A `*` line is bold markup when another `*` comes before the first `:`,
/// or when the line also ends with `*` (`*button: Click*`).
fn is_bold_markup(line: &str) -> bool {
    let after = &line[1..];
    match after.find('*') {
        None => false,
        Some(star) => {
            after.find(':').map_or(true, |colon| star < colon) || line.trim_end().ends_with('*')
        }
    }
}

/// Finds the byte index of the `}` matching the `{` at the start of `text`,
/// skipping quoted strings.
pub(crate) fn find_closing_brace(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    for (i, c) in text.char_indices() {
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '{' => depth += 1,
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_lines_match_token_lines() {
        let source = "a\r\nb\rc\n\r\nd";
        let lines: Vec<&str> = source_lines(source).collect();
        assert_eq!(lines, vec!["a\r\n", "b\r", "c\n", "\r\n", "d"]);
        assert_eq!(strip_line_ending(lines[0]), "a");
        assert_eq!(strip_line_ending(lines[1]), "b");

        let d = tokenize(source)
            .into_iter()
            .find(|t| t.text == "d")
            .expect("text token");
        assert_eq!(d.span.start.line, lines.len());
        assert_eq!(source_lines("x\n").count(), 1);
        assert_eq!(source_lines("").count(), 0);
    }

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).into_iter().map(|t| t.kind).collect()
    }

    fn texts(source: &str, kind: TokenKind) -> Vec<String> {
        tokenize(source)
            .into_iter()
            .filter(|t| t.kind == kind)
            .map(|t| t.text)
            .collect()
    }

    #[test]
    fn empty_source_is_just_eof() {
        assert_eq!(kinds(""), vec![TokenKind::Eof]);
    }

    #[test]
    fn bom_is_skipped() {
        let tokens = tokenize("\u{feff}hello");
        assert_eq!(tokens[0].kind, TokenKind::Text);
        assert_eq!(tokens[0].text, "hello");
        assert_eq!(tokens[0].span.start.offset, 3);
    }

    #[test]
    fn keyword_line_with_colon() {
        use TokenKind::*;
        assert_eq!(
            kinds("*question: Name?"),
            vec![KeywordStart, Keyword, Colon, Text, Eof]
        );
    }

    #[test]
    fn sub_keyword_requires_indentation() {
        let top = tokenize("*type: text");
        assert_eq!(top[1].kind, TokenKind::Keyword);

        let nested = tokenize("*question: Q\n\t*type: text");
        assert!(nested.iter().any(|t| t.kind == TokenKind::SubKeyword && t.text == "type"));
    }

    #[test]
    fn sub_keyword_lookup_ignores_case() {
        let tokens = tokenize("*question: Q\n\t*Save: x");
        assert!(tokens.iter().any(|t| t.kind == TokenKind::SubKeyword && t.text == "Save"));
    }

    #[test]
    fn bold_markup_is_text() {
        assert_eq!(texts("*bold* words", TokenKind::Text), vec!["*bold* words"]);
        assert_eq!(texts("*button: Click*", TokenKind::Text), vec!["*button: Click*"]);
        assert_eq!(kinds("* just a star")[0], TokenKind::Text);
    }

    #[test]
    fn star_after_colon_stays_keyword() {
        let tokens = tokenize("*if: x * 2");
        assert_eq!(tokens[1].kind, TokenKind::Keyword);
        assert_eq!(tokens[3].text, "x * 2");
    }

    #[test]
    fn comment_line() {
        use TokenKind::*;
        assert_eq!(kinds("-- note"), vec![CommentStart, Comment, Eof]);
        assert_eq!(texts("-- note", Comment), vec![" note"]);
    }

    #[test]
    fn expression_line_tokens() {
        let tokens = tokenize(">> total = price * 2.5");
        let summary: Vec<(TokenKind, &str)> =
            tokens.iter().map(|t| (t.kind, t.text.as_str())).collect();
        assert_eq!(
            summary,
            vec![
                (TokenKind::ExpressionStart, ">>"),
                (TokenKind::Identifier, "total"),
                (TokenKind::Operator, "="),
                (TokenKind::Identifier, "price"),
                (TokenKind::Operator, "*"),
                (TokenKind::Number, "2.5"),
                (TokenKind::Eof, ""),
            ]
        );
    }

    #[test]
    fn multi_char_operators_win() {
        assert_eq!(
            texts(">> a <= b >= c -> d :: e", TokenKind::Operator),
            vec!["<=", ">=", "->", "::"]
        );
    }

    #[test]
    fn word_operators() {
        assert_eq!(
            texts(">> not a and b or c in d", TokenKind::Operator),
            vec!["not", "and", "or", "in"]
        );
    }

    #[test]
    fn trailing_comment_in_expression() {
        use TokenKind::*;
        assert_eq!(
            kinds(">> x -- why"),
            vec![ExpressionStart, Identifier, CommentStart, Comment, Eof]
        );
    }

    #[test]
    fn unterminated_string_is_error() {
        let tokens = tokenize(">> \"abc");
        assert_eq!(tokens[1].kind, TokenKind::Error);
        assert_eq!(tokens[1].text, "\"abc");
    }

    #[test]
    fn interpolation_in_text() {
        use TokenKind::*;
        assert_eq!(
            kinds("Hello {name}!"),
            vec![Text, InterpolationStart, Identifier, InterpolationEnd, Text, Eof]
        );
    }

    #[test]
    fn interpolation_with_object_literal() {
        use TokenKind::*;
        let tokens = tokenize("{ {\"a\" -> 1} }");
        let inner: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            inner,
            vec![
                InterpolationStart,
                Punctuation,
                String,
                Operator,
                Number,
                Punctuation,
                InterpolationEnd,
                Eof
            ]
        );
    }

    #[test]
    fn unterminated_interpolation_is_single_error() {
        let tokens = tokenize("Hi {name");
        assert_eq!(tokens[0].kind, TokenKind::Text);
        assert_eq!(tokens[1].kind, TokenKind::Error);
        assert_eq!(tokens[1].text, "{name");
    }

    #[test]
    fn dedent_to_unopened_level_reopens() {
        use TokenKind::*;
        let k = kinds("a\n\t\tb\n\tc\n");
        assert_eq!(
            k,
            vec![Text, Newline, Indent, Text, Newline, Dedent, Indent, Text, Newline, Dedent, Eof]
        );
    }

    #[test]
    fn blank_lines_do_not_change_indentation() {
        use TokenKind::*;
        let k = kinds("a\n\tb\n\n\t\n\tc");
        assert_eq!(
            k,
            vec![Text, Newline, Indent, Text, Newline, Newline, Newline, Text, Dedent, Eof]
        );
    }

    #[test]
    fn crlf_newlines() {
        let tokens = tokenize("a\r\nb");
        assert_eq!(tokens[1].kind, TokenKind::Newline);
        assert_eq!(tokens[1].text, "\r\n");
        assert_eq!(tokens[2].span.start.line, 2);
        assert_eq!(tokens[2].span.start.offset, 3);
    }

    #[test]
    fn token_dump_snapshot() {
        let dump: Vec<String> = tokenize("*if: x > 5\n\tY\n")
            .iter()
            .map(|t| {
                format!(
                    "{:?} {:?} @{}:{}",
                    t.kind, t.text, t.span.start.line, t.span.start.column
                )
            })
            .collect();
        insta::assert_snapshot!(dump.join("\n"), @r#"
        KeywordStart "*" @1:1
        Keyword "if" @1:2
        Colon ":" @1:4
        Text "x > 5" @1:6
        Newline "\n" @1:11
        Indent "\t" @2:1
        Text "Y" @2:2
        Newline "\n" @2:3
        Dedent "" @3:1
        Eof "" @3:1
        "#);
    }

    #[test]
    fn rescan_maps_to_original_coordinates() {
        let source = "*if: x > 5";
        let tokens = tokenize(source);
        let argument = &tokens[3];
        let rescanned = tokenize_expression_at(&argument.text, argument.span.start);

        let summary: Vec<(&str, usize, usize)> = rescanned
            .iter()
            .map(|t| (t.text.as_str(), t.span.start.column, t.span.start.offset))
            .collect();
        assert_eq!(summary, vec![("x", 6, 5), (">", 8, 7), ("5", 10, 9)]);
        for t in &rescanned {
            assert_eq!(&source[t.span.range()], t.text);
        }
    }
}
