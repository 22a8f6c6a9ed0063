//! Comment-based directives.
//!
//! Supports suppression and variable-contract comments such as:
//! ```text
//! -- gtlint-disable no-unused-vars -- generated block
//! -- gtlint-disable-next-line
//! >> total = 0 -- gtlint-disable-line no-unused-vars
//! -- gtformat-disable
//! -- @from-parent: name, email
//! ```
//!
//! Region directives run until the matching enable or the end of the file.

use crate::lexer::{source_lines, strip_line_ending};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::ops::Range;

/// Suppression applied to a single line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineSuppression {
    /// Every rule is suppressed.
    All,
    /// Only the named rules are suppressed.
    Rules(HashSet<String>),
}

impl LineSuppression {
    /// Returns true if `rule` is suppressed.
    #[must_use]
    pub fn suppresses(&self, rule: &str) -> bool {
        match self {
            Self::All => true,
            Self::Rules(rules) => rules.contains(rule),
        }
    }

    fn merge(&mut self, other: Self) {
        match (self, other) {
            (Self::All, _) => {}
            (this, Self::All) => *this = Self::All,
            (Self::Rules(rules), Self::Rules(more)) => rules.extend(more),
        }
    }
}

/// Kind of variable contract declared with an `@` directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContractKind {
    /// `@from-parent:` variables supplied by the calling program.
    FromParent,
    /// `@to-parent:` variables handed back to the calling program.
    ToParent,
    /// `@from-child:` variables set by a called sub-program.
    FromChild,
    /// `@to-child:` variables passed to a called sub-program.
    ToChild,
}

impl ContractKind {
    fn from_head(head: &str) -> Option<Self> {
        match head {
            "@from-parent" => Some(Self::FromParent),
            "@to-parent" => Some(Self::ToParent),
            "@from-child" => Some(Self::FromChild),
            "@to-child" => Some(Self::ToChild),
            _ => None,
        }
    }
}

/// All directives of one file.
#[derive(Debug, Clone, Default)]
pub struct DirectiveTable {
    lint: HashMap<usize, LineSuppression>,
    format: HashSet<usize>,
    from_parent: BTreeMap<String, usize>,
    to_parent: BTreeMap<String, usize>,
    from_child: BTreeMap<String, usize>,
    to_child: BTreeMap<String, usize>,
}

impl DirectiveTable {
    /// Returns true if `rule` is suppressed on `line` (1-indexed).
    #[must_use]
    pub fn is_suppressed(&self, line: usize, rule: &str) -> bool {
        self.lint.get(&line).is_some_and(|s| s.suppresses(rule))
    }

    /// Lint suppression recorded for `line`, if any.
    #[must_use]
    pub fn line_suppression(&self, line: usize) -> Option<&LineSuppression> {
        self.lint.get(&line)
    }

    /// Returns true if formatting is disabled on `line`.
    #[must_use]
    pub fn is_format_suppressed(&self, line: usize) -> bool {
        self.format.contains(&line)
    }

    /// Variables of a contract, mapped to the line declaring them.
    #[must_use]
    pub fn contract(&self, kind: ContractKind) -> &BTreeMap<String, usize> {
        match kind {
            ContractKind::FromParent => &self.from_parent,
            ContractKind::ToParent => &self.to_parent,
            ContractKind::FromChild => &self.from_child,
            ContractKind::ToChild => &self.to_child,
        }
    }

    /// Returns true if `name` is declared in the given contract.
    #[must_use]
    pub fn declares(&self, kind: ContractKind, name: &str) -> bool {
        self.contract(kind).contains_key(name)
    }

    fn suppress_line(&mut self, line: usize, suppression: LineSuppression) {
        match self.lint.get_mut(&line) {
            Some(existing) => existing.merge(suppression),
            None => {
                self.lint.insert(line, suppression);
            }
        }
    }

    fn suppress_range(&mut self, lines: Range<usize>, suppression: &LineSuppression) {
        for line in lines {
            self.suppress_line(line, suppression.clone());
        }
    }

    fn contract_mut(&mut self, kind: ContractKind) -> &mut BTreeMap<String, usize> {
        match kind {
            ContractKind::FromParent => &mut self.from_parent,
            ContractKind::ToParent => &mut self.to_parent,
            ContractKind::FromChild => &mut self.from_child,
            ContractKind::ToChild => &mut self.to_child,
        }
    }
}

/// Parsed directive comment.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Directive {
    Disable(Vec<String>),
    Enable(Vec<String>),
    DisableNextLine(Vec<String>),
    DisableLine(Vec<String>),
    FormatDisable,
    FormatEnable,
    DisableAll(Vec<String>),
    EnableAll(Vec<String>),
    Contract(ContractKind, Vec<String>),
}

/// Open `-- gtlint-disable` regions while scanning.
#[derive(Default)]
struct OpenRegions {
    all: Option<usize>,
    rules: HashMap<String, usize>,
    format: Option<usize>,
}

impl OpenRegions {
    fn disable(&mut self, line: usize, rules: Vec<String>) {
        if rules.is_empty() {
            self.all.get_or_insert(line);
        }
        for rule in rules {
            self.rules.entry(rule).or_insert(line);
        }
    }

    /// Closes regions before `line`; the enabling line itself is active.
    fn enable(&mut self, table: &mut DirectiveTable, line: usize, rules: &[String]) {
        if rules.is_empty() {
            if let Some(start) = self.all.take() {
                table.suppress_range(start..line, &LineSuppression::All);
            }
            for (rule, start) in self.rules.drain() {
                table.suppress_range(start..line, &single(rule));
            }
            return;
        }
        for rule in rules {
            if let Some(start) = self.rules.remove(rule) {
                table.suppress_range(start..line, &single(rule.clone()));
            }
        }
    }

    fn format_enable(&mut self, table: &mut DirectiveTable, line: usize) {
        if let Some(start) = self.format.take() {
            table.format.extend(start..line);
        }
    }
}

fn single(rule: String) -> LineSuppression {
    LineSuppression::Rules(HashSet::from([rule]))
}

fn suppression(rules: Vec<String>) -> LineSuppression {
    if rules.is_empty() {
        LineSuppression::All
    } else {
        LineSuppression::Rules(rules.into_iter().collect())
    }
}

/// Scans `source` for directive comments.
#[must_use]
pub fn parse_directives(source: &str) -> DirectiveTable {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);
    let mut table = DirectiveTable::default();
    let mut open = OpenRegions::default();
    let mut last_line = 0;

    for (index, raw) in source_lines(source).enumerate() {
        let line = index + 1;
        let text = strip_line_ending(raw);
        last_line = line;
        let Some(directive) = comment_text(text).and_then(parse_directive) else {
            continue;
        };

        match directive {
            Directive::Disable(rules) => open.disable(line, rules),
            Directive::Enable(rules) => open.enable(&mut table, line, &rules),
            Directive::DisableNextLine(rules) => table.suppress_line(line + 1, suppression(rules)),
            Directive::DisableLine(rules) => table.suppress_line(line, suppression(rules)),
            Directive::FormatDisable => {
                open.format.get_or_insert(line);
            }
            Directive::FormatEnable => open.format_enable(&mut table, line),
            Directive::DisableAll(rules) => {
                open.format.get_or_insert(line);
                open.disable(line, rules);
            }
            Directive::EnableAll(rules) => {
                open.format_enable(&mut table, line);
                open.enable(&mut table, line, &rules);
            }
            Directive::Contract(kind, names) => {
                for name in names {
                    table.contract_mut(kind).entry(name).or_insert(line);
                }
            }
        }
    }

    // Regions left open run to the end of the file.
    open.format_enable(&mut table, last_line + 1);
    open.enable(&mut table, last_line + 1, &[]);
    table
}

/// Returns the text after `--` for comment lines and trailing comments on
/// expression lines.
fn comment_text(line: &str) -> Option<&str> {
    let line = line.trim_start();
    if let Some(rest) = line.strip_prefix("--") {
        return Some(rest);
    }
    let expression = line.strip_prefix(">>")?;
    let mut quote: Option<char> = None;
    let mut previous_dash = false;
    for (i, c) in expression.char_indices() {
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '-' if previous_dash => return Some(&expression[i + 1..]),
            _ => {}
        }
        previous_dash = c == '-';
    }
    None
}

fn parse_directive(comment: &str) -> Option<Directive> {
    let comment = comment.trim();

    if comment.starts_with('@') {
        let colon = comment.find(':')?;
        let kind = ContractKind::from_head(comment[..colon].trim())?;
        return Some(Directive::Contract(kind, parse_list(&comment[colon + 1..])));
    }

    let (head, rest) = comment
        .split_once(char::is_whitespace)
        .unwrap_or((comment, ""));
    let rules = parse_list(rest);
    let directive = match head {
        "gtlint-disable" => Directive::Disable(rules),
        "gtlint-enable" => Directive::Enable(rules),
        "gtlint-disable-next-line" => Directive::DisableNextLine(rules),
        "gtlint-disable-line" => Directive::DisableLine(rules),
        "gtformat-disable" => Directive::FormatDisable,
        "gtformat-enable" => Directive::FormatEnable,
        "gt-disable" => Directive::DisableAll(rules),
        "gt-enable" => Directive::EnableAll(rules),
        _ => return None,
    };
    Some(directive)
}

/// Splits a comma or whitespace separated list, ignoring a `-- reason` tail.
fn parse_list(text: &str) -> Vec<String> {
    let text = text.split_once("--").map_or(text, |(list, _reason)| list);
    text.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|name| !name.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list_ignores_reason() {
        assert_eq!(
            parse_list(" a, b c -- because reasons, d"),
            vec!["a", "b", "c"]
        );
        assert!(parse_list("  ").is_empty());
    }

    #[test]
    fn test_parse_directive_heads() {
        assert_eq!(
            parse_directive(" gtlint-disable-next-line no-unused-vars"),
            Some(Directive::DisableNextLine(vec!["no-unused-vars".into()]))
        );
        assert_eq!(parse_directive(" gtformat-enable"), Some(Directive::FormatEnable));
        assert_eq!(parse_directive(" just a comment"), None);
        assert_eq!(parse_directive(" gtlint-disabled"), None);
    }

    #[test]
    fn test_contract_without_space_after_colon() {
        assert_eq!(
            parse_directive("@to-child:score,level"),
            Some(Directive::Contract(
                ContractKind::ToChild,
                vec!["score".into(), "level".into()]
            ))
        );
    }

    #[test]
    fn test_comment_text_on_expression_line() {
        assert_eq!(comment_text(">> x = 1 -- note"), Some(" note"));
        assert_eq!(comment_text(">> x = \"a -- b\""), None);
        assert_eq!(comment_text("\t-- note"), Some(" note"));
        assert_eq!(comment_text("plain -- text"), None);
    }

    #[test]
    fn test_disable_region_until_enable() {
        let source = "a\n-- gtlint-disable\nb\n-- gtlint-enable\nc\n";
        let table = parse_directives(source);
        assert!(!table.is_suppressed(1, "any"));
        assert!(table.is_suppressed(3, "any"));
        assert!(!table.is_suppressed(4, "any"));
        assert!(!table.is_suppressed(5, "any"));
    }

    #[test]
    fn test_open_region_runs_to_eof() {
        let table = parse_directives("-- gtlint-disable no-undefined-vars\na\nb");
        assert!(table.is_suppressed(3, "no-undefined-vars"));
        assert!(!table.is_suppressed(3, "valid-keyword"));
    }

    #[test]
    fn test_named_enable_closes_only_named_rules() {
        let source = "-- gtlint-disable a, b\nx\n-- gtlint-enable a\ny\n";
        let table = parse_directives(source);
        assert!(table.is_suppressed(2, "a"));
        assert!(!table.is_suppressed(4, "a"));
        assert!(table.is_suppressed(4, "b"));
    }

    #[test]
    fn test_disable_next_line_and_line() {
        let source = "-- gtlint-disable-next-line\nx\ny\n>> z = 1 -- gtlint-disable-line no-unused-vars\n";
        let table = parse_directives(source);
        assert!(table.is_suppressed(2, "anything"));
        assert!(!table.is_suppressed(3, "anything"));
        assert!(table.is_suppressed(4, "no-unused-vars"));
        assert!(!table.is_suppressed(4, "no-undefined-vars"));
    }

    #[test]
    fn test_bare_carriage_return_ends_a_line() {
        let source = "-- gtlint-disable-next-line\r>> x = 1\r>> y = 2\r\n-- gtlint-disable\ra";
        let table = parse_directives(source);
        assert!(table.is_suppressed(2, "any"));
        assert!(!table.is_suppressed(3, "any"));
        assert!(table.is_suppressed(5, "any"));
    }

    #[test]
    fn test_line_suppressions_merge() {
        let source = "-- gtlint-disable-next-line a\n>> x -- gtlint-disable-line b\n";
        let table = parse_directives(source);
        assert!(table.is_suppressed(2, "a"));
        assert!(table.is_suppressed(2, "b"));
    }

    #[test]
    fn test_gt_disable_covers_lint_and_format() {
        let source = "-- gt-disable\nx\n-- gt-enable\ny";
        let table = parse_directives(source);
        assert!(table.is_suppressed(2, "r"));
        assert!(table.is_format_suppressed(2));
        assert!(!table.is_format_suppressed(4));
    }

    #[test]
    fn test_contracts_record_first_declaration() {
        let source = "-- @from-parent: name, email\n-- @from-parent: name\n-- @to-parent: score";
        let table = parse_directives(source);
        assert_eq!(table.contract(ContractKind::FromParent).get("name"), Some(&1));
        assert!(table.declares(ContractKind::FromParent, "email"));
        assert!(table.declares(ContractKind::ToParent, "score"));
        assert!(!table.declares(ContractKind::FromChild, "score"));
    }
}
