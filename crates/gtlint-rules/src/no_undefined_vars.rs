//! Rule to flag variables that are read but never defined.
//!
//! Variables supplied from outside the file are declared with directives:
//!
//! ```text
//! -- @from-parent: name, email
//! -- @from-child: score
//! ```
//!
//! # Configuration
//!
//! - `globals`: names that are always defined (default: empty)

use crate::variables::VariableUsage;
use gtlint_core::{Node, Rule, RuleContext, Severity, Visitor};
use std::collections::HashSet;

/// Rule code for no-undefined-vars.
pub const CODE: &str = "GT002";

/// Rule name for no-undefined-vars.
pub const NAME: &str = "no-undefined-vars";

/// Flags reads of variables with no definition in the file.
#[derive(Debug, Clone)]
pub struct NoUndefinedVars {
    /// Names treated as always defined.
    pub globals: HashSet<String>,
    /// Custom severity.
    pub severity: Severity,
}

impl Default for NoUndefinedVars {
    fn default() -> Self {
        Self::new()
    }
}

impl NoUndefinedVars {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            globals: HashSet::new(),
            severity: Severity::Error,
        }
    }

    /// Adds names that are always defined.
    #[must_use]
    pub fn globals<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.globals.extend(names.into_iter().map(Into::into));
        self
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

impl Rule for NoUndefinedVars {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Flags variables that are used but never defined"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn create_visitor(&self) -> Box<dyn Visitor + '_> {
        Box::new(UndefinedVisitor {
            rule: self,
            usage: VariableUsage::default(),
        })
    }
}

struct UndefinedVisitor<'a> {
    rule: &'a NoUndefinedVars,
    usage: VariableUsage,
}

impl Visitor for UndefinedVisitor<'_> {
    fn visit(&mut self, node: Node<'_>, _ctx: &mut RuleContext<'_>) {
        self.usage.record(node);
    }

    fn finish(&mut self, ctx: &mut RuleContext<'_>) {
        for (name, span) in self.usage.reads() {
            let known = self.usage.is_defined(name)
                || ctx.is_from_parent(name)
                || ctx.is_from_child(name)
                || self.rule.globals.contains(name);
            if !known {
                ctx.report(format!("`{name}` is used but never defined"), *span);
            }
        }
    }
}
