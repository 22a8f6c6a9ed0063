//! Variable definitions and reads collected during a traversal.
//!
//! Shared by `no-undefined-vars` and `no-unused-vars`. A name is defined by
//! an assignment target, a loop variable, or the argument of `*set` and
//! `*save`. Every other bare identifier is a read, except a called name.

use gtlint_core::ast::{Argument, BinaryOp, Expression, ExpressionKind};
use gtlint_core::{Node, Span};
use std::collections::{HashMap, HashSet};

/// Keywords and sub-keywords whose identifier argument defines a variable.
const DEFINING_KEYWORDS: &[&str] = &["set", "save"];

#[derive(Debug, Default)]
pub(crate) struct VariableUsage {
    /// Defined names with the span of their first definition.
    definitions: Vec<(String, Span)>,
    defined: HashSet<String>,
    /// Every read, in traversal order.
    reads: Vec<(String, Span)>,
    /// Start offsets of identifiers that are not reads.
    not_reads: HashSet<usize>,
}

impl VariableUsage {
    pub(crate) fn record(&mut self, node: Node<'_>) {
        match node {
            Node::KeywordStatement(k) if is_defining(&k.keyword) => {
                self.define_argument(k.argument.as_ref());
            }
            Node::SubKeyword(s) if is_defining(&s.keyword) => {
                self.define_argument(s.argument.as_ref());
            }
            Node::Argument(Argument::Loop(header)) => {
                for variable in &header.variables {
                    self.define(variable);
                }
            }
            Node::Expression(expression) => self.record_expression(expression),
            _ => {}
        }
    }

    fn record_expression(&mut self, expression: &Expression) {
        match &expression.kind {
            ExpressionKind::Binary {
                op: BinaryOp::Assign,
                left,
                ..
            } => self.define(left),
            ExpressionKind::Call { callee, .. } => {
                if callee.as_identifier().is_some() {
                    self.not_reads.insert(callee.span.start.offset);
                }
            }
            ExpressionKind::Identifier(name) => {
                if !self.not_reads.contains(&expression.span.start.offset) {
                    self.reads.push((name.clone(), expression.span));
                }
            }
            _ => {}
        }
    }

    fn define_argument(&mut self, argument: Option<&Argument>) {
        if let Some(expression) = argument.and_then(Argument::as_expression) {
            self.define(expression);
        }
    }

    fn define(&mut self, target: &Expression) {
        let Some(name) = target.as_identifier() else {
            return;
        };
        self.not_reads.insert(target.span.start.offset);
        if self.defined.insert(name.to_string()) {
            self.definitions.push((name.to_string(), target.span));
        }
    }

    pub(crate) fn is_defined(&self, name: &str) -> bool {
        self.defined.contains(name)
    }

    pub(crate) fn definitions(&self) -> &[(String, Span)] {
        &self.definitions
    }

    pub(crate) fn reads(&self) -> &[(String, Span)] {
        &self.reads
    }

    /// Number of reads per name.
    pub(crate) fn read_counts(&self) -> HashMap<&str, usize> {
        let mut counts = HashMap::new();
        for (name, _) in &self.reads {
            *counts.entry(name.as_str()).or_insert(0) += 1;
        }
        counts
    }
}

fn is_defining(keyword: &str) -> bool {
    DEFINING_KEYWORDS
        .iter()
        .any(|k| keyword.eq_ignore_ascii_case(k))
}
