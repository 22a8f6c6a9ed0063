//! Core types for source positions, lint issues and results.

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Severity level for lint issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message, does not fail lint.
    Info,
    /// Warning that should be addressed.
    Warning,
    /// Error that must be fixed.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "warning" | "warn" => Ok(Self::Warning),
            "info" => Ok(Self::Info),
            other => Err(format!(
                "unknown severity `{other}`. Valid values: error, warning, info"
            )),
        }
    }
}

/// A point in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number in characters (1-indexed).
    pub column: usize,
    /// Absolute byte offset into the source.
    pub offset: usize,
}

impl Position {
    /// Creates a new position.
    #[must_use]
    pub const fn new(line: usize, column: usize, offset: usize) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }

    /// The position of the first character of a file.
    #[must_use]
    pub const fn start() -> Self {
        Self::new(1, 1, 0)
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::start()
    }
}

/// A half-open region of source text, `start.offset..end.offset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    /// First position covered by the span.
    pub start: Position,
    /// Position just past the end of the span.
    pub end: Position,
}

impl Span {
    /// Creates a new span. An `end` before `start` is clamped to `start`.
    #[must_use]
    pub fn new(start: Position, end: Position) -> Self {
        let end = if end.offset < start.offset { start } else { end };
        Self { start, end }
    }

    /// Creates an empty span at `position`.
    #[must_use]
    pub const fn point(position: Position) -> Self {
        Self {
            start: position,
            end: position,
        }
    }

    /// Returns the span from the start of `self` to the end of `other`.
    #[must_use]
    pub fn to(self, other: Self) -> Self {
        Self::new(self.start, other.end)
    }

    /// Byte range covered by this span.
    #[must_use]
    pub const fn range(&self) -> std::ops::Range<usize> {
        self.start.offset..self.end.offset
    }

    /// Length of the span in bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end.offset.saturating_sub(self.start.offset)
    }

    /// Returns true if the span covers no bytes.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if `offset` lies within `start..=end`.
    #[must_use]
    pub const fn contains_offset(&self, offset: usize) -> bool {
        self.start.offset <= offset && offset <= self.end.offset
    }
}

/// An automatic replacement of a byte range in the original source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fix {
    /// Start of the replaced range (inclusive byte offset).
    pub start: usize,
    /// End of the replaced range (exclusive byte offset).
    pub end: usize,
    /// Text inserted in place of the range.
    pub replacement: String,
}

impl Fix {
    /// Creates a fix replacing `start..end` with `replacement`.
    #[must_use]
    pub fn new(start: usize, end: usize, replacement: impl Into<String>) -> Self {
        Self {
            start,
            end,
            replacement: replacement.into(),
        }
    }

    /// Replaces the text covered by `span`.
    #[must_use]
    pub fn replace(span: Span, replacement: impl Into<String>) -> Self {
        Self::new(span.start.offset, span.end.offset, replacement)
    }

    /// Deletes the text covered by `span`.
    #[must_use]
    pub fn delete(span: Span) -> Self {
        Self::replace(span, "")
    }

    /// Inserts `text` at `offset`.
    #[must_use]
    pub fn insert(offset: usize, text: impl Into<String>) -> Self {
        Self::new(offset, offset, text)
    }

    /// Byte range replaced by this fix.
    #[must_use]
    pub const fn range(&self) -> std::ops::Range<usize> {
        self.start..self.end
    }
}

/// A lint issue reported by a rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    /// Rule code (e.g., "GT001").
    pub code: String,
    /// Rule name (e.g., "valid-keyword").
    pub rule: String,
    /// Severity of this issue.
    pub severity: Severity,
    /// Human-readable message.
    pub message: String,
    /// Location of the issue.
    pub span: Span,
    /// Optional automatic fix.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fix: Option<Fix>,
}

impl Issue {
    /// Creates a new issue.
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        rule: impl Into<String>,
        severity: Severity,
        span: Span,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            rule: rule.into(),
            severity,
            message: message.into(),
            span,
            fix: None,
        }
    }

    /// Attaches a fix to this issue.
    #[must_use]
    pub fn with_fix(mut self, fix: Fix) -> Self {
        self.fix = Some(fix);
        self
    }

    /// Line of the issue start (1-indexed).
    #[must_use]
    pub const fn line(&self) -> usize {
        self.span.start.line
    }

    /// Column of the issue start (1-indexed).
    #[must_use]
    pub const fn column(&self) -> usize {
        self.span.start.column
    }

    /// Line of the issue end (1-indexed).
    #[must_use]
    pub const fn end_line(&self) -> usize {
        self.span.end.line
    }

    /// Column of the issue end (1-indexed).
    #[must_use]
    pub const fn end_column(&self) -> usize {
        self.span.end.column
    }

    /// Returns true if the issue carries an automatic fix.
    #[must_use]
    pub const fn is_fixable(&self) -> bool {
        self.fix.is_some()
    }

    /// Formats the issue for terminal output.
    #[must_use]
    pub fn format(&self, file: &Path) -> String {
        use std::fmt::Write;
        let mut output = format!(
            "{} {} at {}:{}:{}\n",
            self.code,
            self.rule,
            file.display(),
            self.line(),
            self.column(),
        );
        let _ = writeln!(output, "  {}: {}", self.severity, self.message);
        if let Some(fix) = &self.fix {
            let _ = writeln!(output, "  = fix: replace with {:?}", fix.replacement);
        }
        output
    }
}

impl std::fmt::Display for Issue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}: {} [{}] {}",
            self.line(),
            self.column(),
            self.severity,
            self.rule,
            self.message
        )
    }
}

/// Converts an [`Issue`] to a miette Diagnostic for rich error display.
#[derive(Debug, thiserror::Error, Diagnostic)]
#[error("{message}")]
pub struct IssueDiagnostic {
    message: String,
    #[help]
    help: Option<String>,
    #[label("{label_message}")]
    span: miette::SourceSpan,
    label_message: String,
}

impl From<&Issue> for IssueDiagnostic {
    fn from(issue: &Issue) -> Self {
        Self {
            message: format!("[{}] {}", issue.code, issue.message),
            help: issue
                .fix
                .as_ref()
                .map(|fix| format!("fix available: replace with {:?}", fix.replacement)),
            span: miette::SourceSpan::from((issue.span.start.offset, issue.span.len())),
            label_message: issue.rule.clone(),
        }
    }
}

/// Result of linting one file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LintResult {
    /// Path of the linted file.
    pub file_path: PathBuf,
    /// Issues sorted by line, then column.
    pub issues: Vec<Issue>,
    /// Number of error-severity issues.
    pub error_count: usize,
    /// Number of warning-severity issues.
    pub warning_count: usize,
    /// Number of info-severity issues.
    pub info_count: usize,
    /// Number of error-severity issues carrying a fix.
    pub fixable_error_count: usize,
    /// Number of warning-severity issues carrying a fix.
    pub fixable_warning_count: usize,
}

impl LintResult {
    /// Creates a new empty result.
    #[must_use]
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
            ..Self::default()
        }
    }

    /// Builds a result from unordered issues: sorts them and tallies counts.
    ///
    /// The sort is stable, so issues on the same position keep rule order.
    #[must_use]
    pub fn from_issues(file_path: impl Into<PathBuf>, mut issues: Vec<Issue>) -> Self {
        issues.sort_by(|a, b| a.line().cmp(&b.line()).then(a.column().cmp(&b.column())));

        let mut result = Self::new(file_path);
        for issue in &issues {
            match issue.severity {
                Severity::Error => {
                    result.error_count += 1;
                    if issue.is_fixable() {
                        result.fixable_error_count += 1;
                    }
                }
                Severity::Warning => {
                    result.warning_count += 1;
                    if issue.is_fixable() {
                        result.fixable_warning_count += 1;
                    }
                }
                Severity::Info => result.info_count += 1,
            }
        }
        result.issues = issues;
        result
    }

    /// Returns true if there are any errors.
    #[must_use]
    pub const fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    /// Returns true if there are any warnings or errors.
    #[must_use]
    pub const fn has_warnings(&self) -> bool {
        self.error_count + self.warning_count > 0
    }

    /// Returns issues filtered by severity.
    #[must_use]
    pub fn by_severity(&self, severity: Severity) -> Vec<&Issue> {
        self.issues
            .iter()
            .filter(|i| i.severity == severity)
            .collect()
    }

    /// Returns issues reported by the named rule.
    #[must_use]
    pub fn by_rule(&self, rule: &str) -> Vec<&Issue> {
        self.issues.iter().filter(|i| i.rule == rule).collect()
    }

    /// Counts issues by severity as `(errors, warnings, infos)`.
    #[must_use]
    pub const fn count_by_severity(&self) -> (usize, usize, usize) {
        (self.error_count, self.warning_count, self.info_count)
    }

    /// Number of issues carrying a fix.
    #[must_use]
    pub const fn fixable_count(&self) -> usize {
        self.fixable_error_count + self.fixable_warning_count
    }

    /// Checks if any issues meet or exceed the given severity threshold.
    #[must_use]
    pub fn has_issues_at(&self, severity: Severity) -> bool {
        self.issues.iter().any(|i| i.severity >= severity)
    }

    /// Formats issues at or above `fail_on` as a human-readable report.
    #[must_use]
    pub fn format_report(&self, fail_on: Severity) -> String {
        use std::fmt::Write;

        let failing: Vec<&Issue> = self
            .issues
            .iter()
            .filter(|i| i.severity >= fail_on)
            .collect();

        let mut report = String::new();
        let _ = writeln!(
            report,
            "\n=== gtlint: {} issue(s) in {} ===\n",
            failing.len(),
            self.file_path.display()
        );
        for issue in &failing {
            let _ = writeln!(report, "{}", issue.format(&self.file_path));
        }

        let _ = writeln!(
            report,
            "Total: {} error(s), {} warning(s), {} info(s), {} fixable",
            self.error_count,
            self.warning_count,
            self.info_count,
            self.fixable_count()
        );

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span_at(line: usize, column: usize, offset: usize, len: usize) -> Span {
        Span::new(
            Position::new(line, column, offset),
            Position::new(line, column + len, offset + len),
        )
    }

    fn make_issue(severity: Severity, line: usize, column: usize) -> Issue {
        Issue::new(
            "GT001",
            "valid-keyword",
            severity,
            span_at(line, column, 0, 1),
            "Unknown keyword `*foo`",
        )
    }

    #[test]
    fn span_end_is_clamped_to_start() {
        let span = Span::new(Position::new(1, 5, 4), Position::new(1, 1, 0));
        assert_eq!(span.start, span.end);
        assert!(span.is_empty());
    }

    #[test]
    fn inverted_span_literal_has_zero_length() {
        let span = Span {
            start: Position::new(2, 9, 12),
            end: Position::new(2, 3, 6),
        };
        assert_eq!(span.len(), 0);
        assert!(span.is_empty());

        let issue = Issue::new("T1", "inverted", Severity::Error, span, "Inverted");
        let diagnostic = IssueDiagnostic::from(&issue);
        assert_eq!(diagnostic.to_string(), "[T1] Inverted");
    }

    #[test]
    fn span_to_merges_ranges() {
        let a = span_at(1, 1, 0, 3);
        let b = span_at(1, 6, 5, 2);
        assert_eq!(a.to(b).range(), 0..7);
    }

    #[test]
    fn severity_parses_aliases() {
        assert_eq!("warn".parse::<Severity>(), Ok(Severity::Warning));
        assert_eq!("ERROR".parse::<Severity>(), Ok(Severity::Error));
        assert!("critical".parse::<Severity>().is_err());
    }

    #[test]
    fn from_issues_sorts_by_line_then_column() {
        let issues = vec![
            make_issue(Severity::Error, 3, 1),
            make_issue(Severity::Warning, 1, 9),
            make_issue(Severity::Info, 1, 2),
        ];
        let result = LintResult::from_issues("test.gt", issues);
        let positions: Vec<(usize, usize)> =
            result.issues.iter().map(|i| (i.line(), i.column())).collect();
        assert_eq!(positions, vec![(1, 2), (1, 9), (3, 1)]);
    }

    #[test]
    fn from_issues_tallies_fixable_counts() {
        let fixed = make_issue(Severity::Error, 1, 1).with_fix(Fix::new(0, 1, "x"));
        let warn_fixed = make_issue(Severity::Warning, 2, 1).with_fix(Fix::new(3, 4, ""));
        let plain = make_issue(Severity::Error, 3, 1);
        let result = LintResult::from_issues("test.gt", vec![fixed, warn_fixed, plain]);

        assert_eq!(result.count_by_severity(), (2, 1, 0));
        assert_eq!(result.fixable_error_count, 1);
        assert_eq!(result.fixable_warning_count, 1);
        assert_eq!(result.fixable_count(), 2);
        assert!(result.has_errors());
    }

    #[test]
    fn has_issues_at_respects_threshold() {
        let result = LintResult::from_issues("t.gt", vec![make_issue(Severity::Warning, 1, 1)]);
        assert!(!result.has_issues_at(Severity::Error));
        assert!(result.has_issues_at(Severity::Warning));
    }

    #[test]
    fn format_report_includes_fix() {
        let issue = make_issue(Severity::Error, 1, 1).with_fix(Fix::new(1, 3, "if"));
        let result = LintResult::from_issues("prog.gt", vec![issue]);
        let report = result.format_report(Severity::Error);
        assert!(report.contains("1 issue(s)"));
        assert!(report.contains("= fix: replace with \"if\""));
        assert!(report.contains("1 fixable"));
    }

    #[test]
    fn diagnostic_carries_span_and_help() {
        let issue = Issue::new("GT004", "no-trailing-whitespace", Severity::Warning, span_at(2, 4, 10, 3), "Trailing whitespace")
            .with_fix(Fix::new(10, 13, ""));
        let diagnostic = IssueDiagnostic::from(&issue);
        assert_eq!(diagnostic.to_string(), "[GT004] Trailing whitespace");
        assert_eq!(diagnostic.span.offset(), 10);
        assert_eq!(diagnostic.span.len(), 3);
        assert!(diagnostic.help.is_some());
    }
}
