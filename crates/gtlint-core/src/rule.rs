//! Rule traits for defining lint rules.

use crate::context::RuleContext;
use crate::types::Severity;
use crate::visit::Node;

/// A lint rule.
///
/// A rule describes itself and creates a fresh [`Visitor`] for every linted
/// file. The linter walks the whole tree once per rule, handing each node to
/// the visitor, then calls [`Visitor::finish`].
///
/// # Example
///
/// ```ignore
/// use gtlint_core::{Node, Rule, RuleContext, Visitor};
///
/// pub struct NoGoto;
///
/// impl Rule for NoGoto {
///     fn name(&self) -> &'static str { "no-goto" }
///     fn code(&self) -> &'static str { "GT100" }
///
///     fn create_visitor(&self) -> Box<dyn Visitor> {
///         Box::new(NoGotoVisitor)
///     }
/// }
///
/// struct NoGotoVisitor;
///
/// impl Visitor for NoGotoVisitor {
///     fn visit(&mut self, node: Node<'_>, ctx: &mut RuleContext<'_>) {
///         if let Node::KeywordStatement(k) = node {
///             if k.is("goto") {
///                 ctx.report("Avoid *goto", k.keyword_span);
///             }
///         }
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Returns the kebab-case name of this rule (e.g., "no-unused-vars").
    fn name(&self) -> &'static str;

    /// Returns the rule code (e.g., "GT003").
    fn code(&self) -> &'static str;

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &'static str {
        ""
    }

    /// Returns the default severity for issues from this rule.
    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    /// Whether this rule attaches automatic fixes to its issues.
    fn fixable(&self) -> bool {
        false
    }

    /// Creates the per-file visitor.
    fn create_visitor(&self) -> Box<dyn Visitor + '_>;
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox = Box<dyn Rule>;

/// Per-file state of a rule.
pub trait Visitor {
    /// Called for every node in pre-order.
    fn visit(&mut self, node: Node<'_>, ctx: &mut RuleContext<'_>);

    /// Called once after the traversal.
    fn finish(&mut self, _ctx: &mut RuleContext<'_>) {}
}
