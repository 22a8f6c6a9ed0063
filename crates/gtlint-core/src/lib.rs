//! # gtlint-core
//!
//! Core framework for linting GuidedTrack-style programs.
//!
//! This crate provides the language front end and the rule engine:
//!
//! - [`tokenize`] for the line-oriented, indentation-aware lexer
//! - [`parse_with_diagnostics`] for the error-recovering parser
//! - [`parse_directives`] for `-- gtlint-*` and `@from-parent:` comments
//! - [`Rule`] and [`Visitor`] traits for per-file rules
//! - [`Linter`] for orchestrating lint and fix passes
//! - [`apply_fixes`] for splicing automatic fixes into source text
//!
//! ## Example
//!
//! ```ignore
//! use gtlint_core::{Linter, Severity};
//!
//! let linter = Linter::builder()
//!     .rule(MyRule::new())
//!     .build()?;
//!
//! let result = linter.lint("survey.gt", &source);
//! print!("{}", result.format_report(Severity::Warning));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Syntax tree types.
pub mod ast;
mod config;
mod context;
mod directives;
mod fix;
mod lexer;
mod linter;
mod parser;
mod rule;
mod token;
mod types;
/// Pre-order AST traversal.
pub mod visit;
/// Keyword vocabularies.
pub mod vocabulary;

pub use config::{
    Config, ConfigError, LinterConfig, RuleConfig, SYNTAX_ERROR_CODE, SYNTAX_ERROR_RULE,
};
pub use context::RuleContext;
pub use directives::{parse_directives, ContractKind, DirectiveTable, LineSuppression};
pub use fix::{apply_fixes, FixOutcome};
pub use lexer::{source_lines, strip_line_ending, tokenize, tokenize_expression_at};
pub use linter::{FixReport, LintError, Linter, LinterBuilder};
pub use parser::{parse, parse_source, parse_with_diagnostics, ParseDiagnostic, ParseOutput};
pub use rule::{Rule, RuleBox, Visitor};
pub use token::{Token, TokenKind};
pub use types::{Fix, Issue, IssueDiagnostic, LintResult, Position, Severity, Span};
pub use visit::{walk, Node};
