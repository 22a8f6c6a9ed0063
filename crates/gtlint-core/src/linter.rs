//! Linter orchestrating tokenizing, parsing, rules, directives and fixes.

use crate::ast::{KeywordStatement, Program, Statement};
use crate::config::{Config, RuleConfig, SYNTAX_ERROR_CODE, SYNTAX_ERROR_RULE};
use crate::context::RuleContext;
use crate::directives::{parse_directives, DirectiveTable};
use crate::fix::apply_fixes;
use crate::lexer::tokenize;
use crate::parser::{parse_with_diagnostics, ParseDiagnostic};
use crate::rule::{Rule, RuleBox};
use crate::types::{Issue, LintResult, Severity};
use crate::visit::{walk, Node};
use crate::vocabulary;

use std::collections::HashSet;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur while linting.
#[derive(Debug, Error)]
pub enum LintError {
    /// IO error reading a file.
    #[error("Failed to read {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Two registered rules share a name.
    #[error("Rule `{0}` is registered more than once")]
    DuplicateRule(String),
}

/// Builder for configuring a [`Linter`].
#[derive(Default)]
pub struct LinterBuilder {
    rules: Vec<RuleBox>,
    config: Option<Config>,
}

impl LinterBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rule to the linter.
    #[must_use]
    pub fn rule<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Adds a boxed rule to the linter.
    #[must_use]
    pub fn rule_box(mut self, rule: RuleBox) -> Self {
        self.rules.push(rule);
        self
    }

    /// Adds multiple boxed rules.
    #[must_use]
    pub fn rules<I>(mut self, rules: I) -> Self
    where
        I: IntoIterator<Item = RuleBox>,
    {
        self.rules.extend(rules);
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Builds the linter.
    ///
    /// # Errors
    ///
    /// Returns an error if two rules share a name.
    pub fn build(self) -> Result<Linter, LintError> {
        let mut seen = HashSet::new();
        for rule in &self.rules {
            if !seen.insert(rule.name()) {
                return Err(LintError::DuplicateRule(rule.name().to_string()));
            }
        }

        Ok(Linter {
            rules: self.rules,
            config: self.config.unwrap_or_default(),
        })
    }
}

/// Result of [`Linter::fix`].
#[derive(Debug, Clone)]
pub struct FixReport {
    /// Source text after all passes.
    pub output: String,
    /// Number of passes that applied at least one fix.
    pub passes: usize,
    /// Total number of fixes applied.
    pub applied: usize,
    /// Lint result for `output`.
    pub result: LintResult,
}

impl FixReport {
    /// Returns true if the output differs from the input.
    #[must_use]
    pub const fn changed(&self) -> bool {
        self.applied > 0
    }
}

/// The linter.
///
/// Use [`Linter::builder()`] to construct an instance.
pub struct Linter {
    rules: Vec<RuleBox>,
    config: Config,
}

impl Linter {
    /// Creates a new builder for configuring a linter.
    #[must_use]
    pub fn builder() -> LinterBuilder {
        LinterBuilder::new()
    }

    /// Returns the number of registered rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Returns the registered rules.
    #[must_use]
    pub fn rules(&self) -> &[RuleBox] {
        &self.rules
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Gets the rule configuration for a specific rule.
    #[must_use]
    pub fn rule_config(&self, rule_name: &str) -> Option<&RuleConfig> {
        self.config.rules.get(rule_name)
    }

    /// Reads and lints a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn lint_file(&self, path: impl AsRef<Path>) -> Result<LintResult, LintError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| LintError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(self.lint(path, &source))
    }

    /// Lints `source`, reporting issues against `path`.
    ///
    /// Never fails: syntax errors become `syntax-error` issues.
    #[must_use]
    pub fn lint(&self, path: impl AsRef<Path>, source: &str) -> LintResult {
        let path = path.as_ref();
        debug!("Linting: {}", path.display());

        let tokens = tokenize(source);
        let parsed = parse_with_diagnostics(&tokens);
        let directives = parse_directives(source);

        let mut issues = Vec::new();
        for rule in &self.rules {
            if !self.config.is_rule_enabled(rule.name()) {
                debug!("Skipping disabled rule: {}", rule.name());
                continue;
            }
            issues.extend(self.run_rule(rule.as_ref(), path, source, &parsed.program, &directives));
        }
        issues.extend(self.syntax_issues(&parsed.diagnostics));

        let before = issues.len();
        issues.retain(|issue| !directives.is_suppressed(issue.line(), &issue.rule));
        let markup = raw_markup_lines(&parsed.program);
        issues.retain(|issue| keep_in_markup(source, &markup, issue));
        debug!("Filtered {} suppressed issue(s)", before - issues.len());

        let result = LintResult::from_issues(path, issues);
        info!(
            "Lint complete: {} error(s), {} warning(s) in {}",
            result.error_count,
            result.warning_count,
            path.display()
        );
        result
    }

    /// Runs lint-and-fix passes until nothing fixable remains, no fix
    /// applies, or `max_fix_passes` is reached.
    #[must_use]
    pub fn fix(&self, path: impl AsRef<Path>, source: &str) -> FixReport {
        let path = path.as_ref();
        let mut text = source.to_string();
        let mut passes = 0;
        let mut applied = 0;

        loop {
            let result = self.lint(path, &text);
            let done = passes >= self.config.linter.max_fix_passes
                || !result.issues.iter().any(Issue::is_fixable);
            if done {
                return FixReport {
                    output: text,
                    passes,
                    applied,
                    result,
                };
            }

            let outcome = apply_fixes(&text, result.issues.iter().filter_map(|i| i.fix.as_ref()));
            if outcome.applied == 0 {
                return FixReport {
                    output: text,
                    passes,
                    applied,
                    result,
                };
            }
            passes += 1;
            applied += outcome.applied;
            debug!(
                "Fix pass {passes}: applied {}, skipped {}",
                outcome.applied,
                outcome.skipped.len()
            );
            text = outcome.output;
        }
    }

    fn run_rule(
        &self,
        rule: &dyn Rule,
        path: &Path,
        source: &str,
        program: &Program,
        directives: &DirectiveTable,
    ) -> Vec<Issue> {
        let severity = self
            .config
            .rule_severity(rule.name())
            .unwrap_or_else(|| rule.default_severity());
        let mut ctx = RuleContext::new(rule.name(), rule.code(), severity, path, source, directives);
        let mut visitor = rule.create_visitor();
        walk(program, &mut |node| visitor.visit(node, &mut ctx));
        visitor.finish(&mut ctx);
        ctx.into_issues()
    }

    fn syntax_issues(&self, diagnostics: &[ParseDiagnostic]) -> Vec<Issue> {
        if !self.config.linter.report_syntax_errors || !self.config.is_rule_enabled(SYNTAX_ERROR_RULE)
        {
            return Vec::new();
        }
        let severity = self
            .config
            .rule_severity(SYNTAX_ERROR_RULE)
            .unwrap_or(Severity::Error);
        diagnostics
            .iter()
            .map(|d| {
                Issue::new(
                    SYNTAX_ERROR_CODE,
                    SYNTAX_ERROR_RULE,
                    severity,
                    d.span,
                    d.message.clone(),
                )
            })
            .collect()
    }
}

/// Line ranges of raw-markup keyword bodies (`*html`).
fn raw_markup_lines(program: &Program) -> Vec<RangeInclusive<usize>> {
    let mut ranges = Vec::new();
    walk(program, &mut |node| {
        if let Node::KeywordStatement(keyword) = node {
            if let Some(range) = markup_body_lines(keyword) {
                ranges.push(range);
            }
        }
    });
    ranges
}

fn markup_body_lines(keyword: &KeywordStatement) -> Option<RangeInclusive<usize>> {
    if !vocabulary::is_raw_markup(&keyword.keyword.to_lowercase()) {
        return None;
    }
    let first = keyword.body.first().map(Statement::span)?;
    let last = keyword.body.last().map(Statement::span)?;
    Some(first.start.line..=last.end.line)
}

/// Inside raw markup, only issues within a genuine `{...}` interpolation are
/// kept. Braces holding a top-level `:` are CSS or script, not expressions.
fn keep_in_markup(source: &str, markup: &[RangeInclusive<usize>], issue: &Issue) -> bool {
    if !markup.iter().any(|r| r.contains(&issue.line())) {
        return true;
    }
    enclosing_braces(source, issue.span.start.offset)
        .is_some_and(|inner| !has_top_level_colon(inner))
}

/// Returns the text between the braces enclosing `offset` on its line.
fn enclosing_braces(source: &str, offset: usize) -> Option<&str> {
    let before = source.get(..offset)?;
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    let line_end = source[offset..]
        .find('\n')
        .map_or(source.len(), |i| offset + i);

    let mut depth = 0usize;
    let mut open = None;
    for (i, c) in source[line_start..offset].char_indices().rev() {
        match c {
            '}' => depth += 1,
            '{' if depth == 0 => {
                open = Some(line_start + i);
                break;
            }
            '{' => depth -= 1,
            _ => {}
        }
    }
    let open = open?;

    let mut depth = 0usize;
    for (i, c) in source[open..line_end].char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return source.get(open + 1..open + i);
                }
            }
            _ => {}
        }
    }
    None
}

fn has_top_level_colon(text: &str) -> bool {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            ':' if chars.peek() == Some(&':') => {
                chars.next();
            }
            ':' if depth == 0 => return true,
            _ => {}
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::ExpressionKind;
    use crate::rule::Visitor;
    use crate::types::{Fix, Span};

    /// Flags every identifier named `bad`; fix renames it to `good`.
    struct NoBad;

    impl Rule for NoBad {
        fn name(&self) -> &'static str {
            "no-bad"
        }

        fn code(&self) -> &'static str {
            "T001"
        }

        fn default_severity(&self) -> Severity {
            Severity::Warning
        }

        fn fixable(&self) -> bool {
            true
        }

        fn create_visitor(&self) -> Box<dyn Visitor + '_> {
            Box::new(NoBadVisitor)
        }
    }

    struct NoBadVisitor;

    impl Visitor for NoBadVisitor {
        fn visit(&mut self, node: Node<'_>, ctx: &mut RuleContext<'_>) {
            if let Node::Expression(e) = node {
                if matches!(&e.kind, ExpressionKind::Identifier(name) if name == "bad") {
                    ctx.report_with_fix("no bad", e.span, Fix::replace(e.span, "good"));
                }
            }
        }
    }

    /// Reports once per file from `finish`.
    struct CountStatements;

    impl Rule for CountStatements {
        fn name(&self) -> &'static str {
            "count"
        }

        fn code(&self) -> &'static str {
            "T002"
        }

        fn create_visitor(&self) -> Box<dyn Visitor + '_> {
            Box::new(CountVisitor(0))
        }
    }

    struct CountVisitor(usize);

    impl Visitor for CountVisitor {
        fn visit(&mut self, node: Node<'_>, _ctx: &mut RuleContext<'_>) {
            if matches!(node, Node::ExpressionStatement(_)) {
                self.0 += 1;
            }
        }

        fn finish(&mut self, ctx: &mut RuleContext<'_>) {
            let span = Span::default();
            ctx.report(format!("{} statements", self.0), span);
        }
    }

    fn linter() -> Linter {
        Linter::builder()
            .rule(NoBad)
            .rule(CountStatements)
            .build()
            .expect("Failed to build linter")
    }

    #[test]
    fn test_duplicate_rule_rejected() {
        let result = Linter::builder().rule(NoBad).rule(NoBad).build();
        assert!(matches!(result, Err(LintError::DuplicateRule(name)) if name == "no-bad"));
    }

    #[test]
    fn test_visitor_finish_runs_once() {
        let result = linter().lint("t.gt", ">> a = 1\n>> b = 2\n");
        let counts = result.by_rule("count");
        assert_eq!(counts.len(), 1);
        assert_eq!(counts[0].message, "2 statements");
    }

    #[test]
    fn test_disabled_rule_is_skipped() {
        let config = Config::parse("[rules.count]\nenabled = false\n").expect("config");
        let linter = Linter::builder()
            .rule(CountStatements)
            .config(config)
            .build()
            .expect("linter");
        assert!(linter.lint("t.gt", ">> a = 1").issues.is_empty());
    }

    #[test]
    fn test_severity_override() {
        let config = Config::parse("[rules.no-bad]\nseverity = \"error\"\n").expect("config");
        let linter = Linter::builder().rule(NoBad).config(config).build().expect("linter");
        let result = linter.lint("t.gt", ">> x = bad");
        assert_eq!(result.count_by_severity(), (1, 0, 0));
        assert_eq!(result.fixable_error_count, 1);
    }

    #[test]
    fn test_syntax_errors_reported_and_configurable() {
        let result = linter().lint("t.gt", ">> x = (1");
        assert_eq!(result.by_rule(SYNTAX_ERROR_RULE).len(), 1);

        let config = Config::parse("[linter]\nreport_syntax_errors = false\n").expect("config");
        let quiet = Linter::builder().config(config).build().expect("linter");
        assert!(quiet.lint("t.gt", ">> x = (1").issues.is_empty());
    }

    #[test]
    fn test_directive_suppression() {
        let source = "-- gtlint-disable-next-line no-bad\n>> x = bad\n>> y = bad\n";
        let result = linter().lint("t.gt", source);
        let lines: Vec<usize> = result.by_rule("no-bad").iter().map(|i| i.line()).collect();
        assert_eq!(lines, vec![3]);
    }

    #[test]
    fn test_html_body_keeps_only_real_interpolations() {
        let source = "*html\n\t<style>p {color: red}</style>\n\t<p>{bad}</p>\n>> z = bad\n";
        let result = linter().lint("t.gt", source);
        let lines: Vec<usize> = result.by_rule("no-bad").iter().map(|i| i.line()).collect();
        assert_eq!(lines, vec![3, 4]);
        assert!(result.by_rule(SYNTAX_ERROR_RULE).is_empty());
    }

    #[test]
    fn test_fix_runs_until_stable() {
        let report = linter().fix("t.gt", ">> x = bad + bad\n");
        assert_eq!(report.output, ">> x = good + good\n");
        assert_eq!(report.applied, 2);
        assert_eq!(report.passes, 1);
        assert!(report.changed());
        assert!(report.result.by_rule("no-bad").is_empty());
    }

    #[test]
    fn test_fix_respects_pass_limit() {
        let config = Config::parse("[linter]\nmax_fix_passes = 0\n").expect("config");
        let linter = Linter::builder().rule(NoBad).config(config).build().expect("linter");
        let report = linter.fix("t.gt", ">> x = bad");
        assert_eq!(report.output, ">> x = bad");
        assert!(!report.changed());
    }

    #[test]
    fn test_lint_file_reads_from_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("prog.gt");
        std::fs::write(&path, ">> x = bad\n").expect("write");
        let result = linter().lint_file(&path).expect("lint");
        assert_eq!(result.file_path, path);
        assert_eq!(result.by_rule("no-bad").len(), 1);

        let missing = linter().lint_file(dir.path().join("missing.gt"));
        assert!(matches!(missing, Err(LintError::Io { .. })));
    }

    #[test]
    fn test_has_top_level_colon() {
        assert!(has_top_level_colon("color: red"));
        assert!(!has_top_level_colon("a::b"));
        assert!(!has_top_level_colon("f(\"a:b\")"));
        assert!(!has_top_level_colon("{\"k\" -> x}"));
    }
}
