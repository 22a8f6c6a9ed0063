//! Rule to flag spaces and tabs at the end of a line.
//!
//! # Configuration
//!
//! - `skip_blank_lines`: ignore lines holding only whitespace (default: false)

use gtlint_core::{
    source_lines, strip_line_ending, Fix, Node, Position, Rule, RuleContext, Severity, Span,
    Visitor,
};

/// Rule code for no-trailing-whitespace.
pub const CODE: &str = "GT004";

/// Rule name for no-trailing-whitespace.
pub const NAME: &str = "no-trailing-whitespace";

/// Flags trailing whitespace; the fix deletes it.
#[derive(Debug, Clone)]
pub struct NoTrailingWhitespace {
    /// Ignore whitespace-only lines.
    pub skip_blank_lines: bool,
    /// Custom severity.
    pub severity: Severity,
}

impl Default for NoTrailingWhitespace {
    fn default() -> Self {
        Self::new()
    }
}

impl NoTrailingWhitespace {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            skip_blank_lines: false,
            severity: Severity::Warning,
        }
    }

    /// Sets whether whitespace-only lines are ignored.
    #[must_use]
    pub fn skip_blank_lines(mut self, skip: bool) -> Self {
        self.skip_blank_lines = skip;
        self
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

impl Rule for NoTrailingWhitespace {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Flags spaces and tabs at the end of a line"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn fixable(&self) -> bool {
        true
    }

    fn create_visitor(&self) -> Box<dyn Visitor + '_> {
        Box::new(WhitespaceVisitor { rule: self })
    }
}

struct WhitespaceVisitor<'a> {
    rule: &'a NoTrailingWhitespace,
}

impl Visitor for WhitespaceVisitor<'_> {
    fn visit(&mut self, node: Node<'_>, ctx: &mut RuleContext<'_>) {
        // Line-based: runs once, on the root.
        if !matches!(node, Node::Program(_)) {
            return;
        }

        let mut offset = 0;
        for (index, raw) in source_lines(ctx.source()).enumerate() {
            let content = strip_line_ending(raw);
            let trimmed = content.trim_end_matches([' ', '\t']);

            let blank = trimmed.is_empty() || trimmed == "\u{feff}";
            if trimmed.len() < content.len() && !(blank && self.rule.skip_blank_lines) {
                let line = index + 1;
                // The byte-order mark does not occupy a column.
                let bom = usize::from(index == 0 && content.starts_with('\u{feff}'));
                let start = Position::new(
                    line,
                    trimmed.chars().count() + 1 - bom,
                    offset + trimmed.len(),
                );
                let end = Position::new(line, content.chars().count() + 1 - bom, offset + content.len());
                let span = Span::new(start, end);
                ctx.report_with_fix("Trailing whitespace", span, Fix::delete(span));
            }
            offset += raw.len();
        }
    }
}
