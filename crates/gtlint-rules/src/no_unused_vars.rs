//! Rule to flag variables that are defined but never read.
//!
//! Variables handed to another program are declared with directives and are
//! not reported:
//!
//! ```text
//! -- @to-parent: result
//! -- @to-child: level
//! ```
//!
//! # Configuration
//!
//! - `ignore`: names never reported (default: empty)

use crate::variables::VariableUsage;
use gtlint_core::{Node, Rule, RuleContext, Severity, Visitor};
use std::collections::HashSet;

/// Rule code for no-unused-vars.
pub const CODE: &str = "GT003";

/// Rule name for no-unused-vars.
pub const NAME: &str = "no-unused-vars";

/// Flags variables that are assigned but never used.
#[derive(Debug, Clone)]
pub struct NoUnusedVars {
    /// Names never reported.
    pub ignore: HashSet<String>,
    /// Custom severity.
    pub severity: Severity,
}

impl Default for NoUnusedVars {
    fn default() -> Self {
        Self::new()
    }
}

impl NoUnusedVars {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            ignore: HashSet::new(),
            severity: Severity::Warning,
        }
    }

    /// Adds names that are never reported.
    #[must_use]
    pub fn ignore<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore.extend(names.into_iter().map(Into::into));
        self
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

impl Rule for NoUnusedVars {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Flags variables that are assigned but never used"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn create_visitor(&self) -> Box<dyn Visitor + '_> {
        Box::new(UnusedVisitor {
            rule: self,
            usage: VariableUsage::default(),
        })
    }
}

struct UnusedVisitor<'a> {
    rule: &'a NoUnusedVars,
    usage: VariableUsage,
}

impl Visitor for UnusedVisitor<'_> {
    fn visit(&mut self, node: Node<'_>, _ctx: &mut RuleContext<'_>) {
        self.usage.record(node);
    }

    fn finish(&mut self, ctx: &mut RuleContext<'_>) {
        let reads = self.usage.read_counts();
        for (name, span) in self.usage.definitions() {
            let used = reads.contains_key(name.as_str())
                || ctx.is_to_parent(name)
                || ctx.is_to_child(name)
                || self.rule.ignore.contains(name);
            if !used {
                ctx.report(format!("`{name}` is assigned but never used"), *span);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gtlint_core::{Issue, Linter};

    fn check_with(rule: NoUnusedVars, source: &str) -> Vec<Issue> {
        Linter::builder()
            .rule(rule)
            .build()
            .expect("Failed to build linter")
            .lint("test.gt", source)
            .issues
    }

    fn check_code(source: &str) -> Vec<Issue> {
        check_with(NoUnusedVars::new(), source)
    }

    #[test]
    fn test_detects_unused_assignment() {
        let issues = check_code(">> count = 1\n");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, CODE);
        assert_eq!(issues[0].severity, Severity::Warning);
        assert_eq!(issues[0].message, "`count` is assigned but never used");
    }

    #[test]
    fn test_reported_once_at_first_definition() {
        let issues = check_code(">> x = 1\n>> x = 2\n");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].line(), 1);
    }

    #[test]
    fn test_read_in_interpolation_counts() {
        assert!(check_code(">> name = \"A\"\nHello {name}\n").is_empty());
    }

    #[test]
    fn test_self_update_counts_as_read() {
        assert!(check_code(">> n = 0\n>> n = n + 1\n").is_empty());
    }

    #[test]
    fn test_unused_save_target() {
        let issues = check_code("*question: Q\n\t*save: answer\n");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].message, "`answer` is assigned but never used");
    }

    #[test]
    fn test_exported_names_are_used() {
        let source = "-- @to-parent: result\n-- @to-child: level\n>> result = 1\n>> level = 2\n";
        assert!(check_code(source).is_empty());
    }

    #[test]
    fn test_ignore_option() {
        let rule = NoUnusedVars::new().ignore(["debug"]);
        assert!(check_with(rule, ">> debug = 1\n").is_empty());
    }

    #[test]
    fn test_disable_line_directive() {
        let source = ">> scratch = 1 -- gtlint-disable-line no-unused-vars\n";
        assert!(check_code(source).is_empty());
    }
}
