//! Context handed to rule visitors.

use crate::directives::{ContractKind, DirectiveTable};
use crate::types::{Fix, Issue, Severity, Span};
use std::path::Path;

/// Context provided to a rule while it lints one file.
///
/// Collects the rule's issues and exposes the source text and directives so
/// rules can make context-aware decisions.
#[derive(Debug)]
pub struct RuleContext<'a> {
    name: &'a str,
    code: &'a str,
    severity: Severity,
    path: &'a Path,
    source: &'a str,
    directives: &'a DirectiveTable,
    issues: Vec<Issue>,
}

impl<'a> RuleContext<'a> {
    /// Creates a context for the rule `name`/`code` reporting at `severity`.
    #[must_use]
    pub fn new(
        name: &'a str,
        code: &'a str,
        severity: Severity,
        path: &'a Path,
        source: &'a str,
        directives: &'a DirectiveTable,
    ) -> Self {
        Self {
            name,
            code,
            severity,
            path,
            source,
            directives,
            issues: Vec::new(),
        }
    }

    /// Path of the linted file.
    #[must_use]
    pub const fn path(&self) -> &'a Path {
        self.path
    }

    /// Full source text of the linted file.
    #[must_use]
    pub const fn source(&self) -> &'a str {
        self.source
    }

    /// Source text covered by `span`, or `""` if out of bounds.
    #[must_use]
    pub fn slice(&self, span: Span) -> &'a str {
        self.source.get(span.range()).unwrap_or_default()
    }

    /// Directives parsed from the file.
    #[must_use]
    pub const fn directives(&self) -> &'a DirectiveTable {
        self.directives
    }

    /// Returns true if `name` is declared with `@from-parent:`.
    #[must_use]
    pub fn is_from_parent(&self, name: &str) -> bool {
        self.directives.declares(ContractKind::FromParent, name)
    }

    /// Returns true if `name` is declared with `@to-parent:`.
    #[must_use]
    pub fn is_to_parent(&self, name: &str) -> bool {
        self.directives.declares(ContractKind::ToParent, name)
    }

    /// Returns true if `name` is declared with `@from-child:`.
    #[must_use]
    pub fn is_from_child(&self, name: &str) -> bool {
        self.directives.declares(ContractKind::FromChild, name)
    }

    /// Returns true if `name` is declared with `@to-child:`.
    #[must_use]
    pub fn is_to_child(&self, name: &str) -> bool {
        self.directives.declares(ContractKind::ToChild, name)
    }

    /// Severity issues are reported at.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        self.severity
    }

    /// Reports an issue at `span`.
    pub fn report(&mut self, message: impl Into<String>, span: Span) {
        let issue = Issue::new(self.code, self.name, self.severity, span, message);
        self.issues.push(issue);
    }

    /// Reports an issue at `span` with an automatic fix.
    pub fn report_with_fix(&mut self, message: impl Into<String>, span: Span, fix: Fix) {
        let issue = Issue::new(self.code, self.name, self.severity, span, message).with_fix(fix);
        self.issues.push(issue);
    }

    /// Issues reported so far.
    #[must_use]
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    /// Consumes the context, returning the reported issues.
    #[must_use]
    pub fn into_issues(self) -> Vec<Issue> {
        self.issues
    }
}
