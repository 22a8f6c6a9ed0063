//! Rule to flag unknown keywords and keywords written in the wrong case.
//!
//! # Rationale
//!
//! The runtime matches keywords exactly, so `*If:` or `*questoin:` silently
//! turn into something else. Case mistakes on known keywords carry a fix
//! that rewrites the name in lowercase.
//!
//! # Suppression
//!
//! - `-- gtlint-disable-next-line valid-keyword` comment

use gtlint_core::vocabulary;
use gtlint_core::{Fix, Node, Rule, RuleContext, Severity, Span, Visitor};

/// Rule code for valid-keyword.
pub const CODE: &str = "GT001";

/// Rule name for valid-keyword.
pub const NAME: &str = "valid-keyword";

/// Largest edit distance for which a "did you mean" hint is offered.
const MAX_SUGGESTION_DISTANCE: usize = 2;

/// Flags unknown keywords and fixes keyword case.
#[derive(Debug, Clone)]
pub struct ValidKeyword {
    /// Custom severity.
    pub severity: Severity,
}

impl Default for ValidKeyword {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidKeyword {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            severity: Severity::Error,
        }
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

impl Rule for ValidKeyword {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Flags unknown keywords and keywords not written in lowercase"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn fixable(&self) -> bool {
        true
    }

    fn create_visitor(&self) -> Box<dyn Visitor + '_> {
        Box::new(KeywordVisitor)
    }
}

struct KeywordVisitor;

impl Visitor for KeywordVisitor {
    fn visit(&mut self, node: Node<'_>, ctx: &mut RuleContext<'_>) {
        match node {
            Node::KeywordStatement(k) => check_keyword(&k.keyword, k.keyword_span, ctx),
            Node::SubKeyword(s) => check_keyword(&s.keyword, s.keyword_span, ctx),
            _ => {}
        }
    }
}

fn check_keyword(keyword: &str, span: Span, ctx: &mut RuleContext<'_>) {
    // A missing name is already a syntax error.
    if keyword.is_empty() {
        return;
    }

    let lower = keyword.to_lowercase();
    if !vocabulary::is_known(&lower) {
        let message = match suggest(&lower) {
            Some(candidate) => {
                format!("Unknown keyword `*{keyword}`, did you mean `*{candidate}`?")
            }
            None => format!("Unknown keyword `*{keyword}`"),
        };
        ctx.report(message, span);
        return;
    }

    if keyword != lower {
        let message = format!("Keyword `*{keyword}` should be written `*{lower}`");
        ctx.report_with_fix(message, span, Fix::replace(span, lower));
    }
}

/// Closest known keyword within [`MAX_SUGGESTION_DISTANCE`] edits.
fn suggest(name: &str) -> Option<&'static str> {
    vocabulary::KEYWORDS
        .iter()
        .chain(vocabulary::SUB_KEYWORDS)
        .map(|candidate| (edit_distance(name, candidate), *candidate))
        .filter(|(distance, _)| *distance <= MAX_SUGGESTION_DISTANCE)
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, candidate)| candidate)
}

fn edit_distance(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut previous: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.chars().enumerate() {
        let mut current = vec![i + 1];
        for (j, cb) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(ca != *cb);
            let insertion = current[j] + 1;
            let deletion = previous[j + 1] + 1;
            current.push(substitution.min(insertion).min(deletion));
        }
        previous = current;
    }
    previous[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use gtlint_core::{Issue, Linter};

    fn check_code(source: &str) -> Vec<Issue> {
        Linter::builder()
            .rule(ValidKeyword::new())
            .build()
            .expect("Failed to build linter")
            .lint("test.gt", source)
            .by_rule(NAME)
            .into_iter()
            .cloned()
            .collect()
    }

    #[test]
    fn test_known_keywords_pass() {
        let issues = check_code("*question: Age?\n\t*type: number\n\t*save: age\n*page\n");
        assert!(issues.is_empty());
    }

    #[test]
    fn test_unknown_keyword_with_suggestion() {
        let issues = check_code("*questoin: Age?\n");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, CODE);
        assert_eq!(
            issues[0].message,
            "Unknown keyword `*questoin`, did you mean `*question`?"
        );
        assert!(!issues[0].is_fixable());
    }

    #[test]
    fn test_unknown_keyword_without_suggestion() {
        let issues = check_code("*frobnicate: x\n");
        assert_eq!(issues[0].message, "Unknown keyword `*frobnicate`");
    }

    #[test]
    fn test_wrong_case_is_fixable() {
        let source = "*If: x\n\t*Goto: end\n";
        let issues = check_code(source);
        assert_eq!(issues.len(), 2);
        let fix = issues[0].fix.as_ref().expect("fix");
        assert_eq!(&source[fix.range()], "If");
        assert_eq!(fix.replacement, "if");
    }

    #[test]
    fn test_sub_keyword_case() {
        let issues = check_code("*question: Q\n\t*TYPE: text\n");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].message, "Keyword `*TYPE` should be written `*type`");
    }

    #[test]
    fn test_fix_is_idempotent() {
        let linter = Linter::builder()
            .rule(ValidKeyword::new())
            .build()
            .expect("linter");
        let once = linter.fix("test.gt", "*Page\n*QUESTION: Q\n");
        assert_eq!(once.output, "*page\n*question: Q\n");
        let twice = linter.fix("test.gt", &once.output);
        assert_eq!(twice.output, once.output);
        assert!(!twice.changed());
    }

    #[test]
    fn test_messages_snapshot() {
        let source = "*questoin: Q\n\t*Type: text\n*Pagee\n*clear\n";
        let rendered: Vec<String> = check_code(source).iter().map(ToString::to_string).collect();
        insta::assert_snapshot!(rendered.join("\n"), @r"
        1:2: error [valid-keyword] Unknown keyword `*questoin`, did you mean `*question`?
        2:3: error [valid-keyword] Keyword `*Type` should be written `*type`
        3:2: error [valid-keyword] Unknown keyword `*Pagee`, did you mean `*page`?
        ");
    }

    #[test]
    fn test_edit_distance() {
        assert_eq!(edit_distance("kitten", "sitting"), 3);
        assert_eq!(edit_distance("", "abc"), 3);
        assert_eq!(edit_distance("same", "same"), 0);
    }
}
