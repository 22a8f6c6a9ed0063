//! Keyword vocabularies of the language.
//!
//! All lookups take lowercase names; keywords are matched case-insensitively
//! by the lexer and flagged for case by `valid-keyword`.

/// Top-level keywords.
pub const KEYWORDS: &[&str] = &[
    "audio",
    "button",
    "chart",
    "clear",
    "component",
    "database",
    "email",
    "events",
    "experiment",
    "for",
    "goto",
    "group",
    "header",
    "html",
    "if",
    "image",
    "label",
    "list",
    "login",
    "maintain",
    "navigation",
    "page",
    "points",
    "program",
    "progress",
    "purchase",
    "question",
    "quit",
    "randomize",
    "repeat",
    "return",
    "service",
    "set",
    "settings",
    "share",
    "summary",
    "switch",
    "trigger",
    "video",
    "wait",
    "while",
];

/// Sub-keywords, only recognised on indented lines.
pub const SUB_KEYWORDS: &[&str] = &[
    "after",
    "answers",
    "before",
    "blank",
    "body",
    "cancel",
    "classes",
    "click",
    "confirm",
    "countdown",
    "data",
    "date",
    "default",
    "description",
    "error",
    "everytime",
    "hide",
    "icon",
    "identifier",
    "language",
    "max",
    "method",
    "min",
    "multiple",
    "name",
    "other",
    "path",
    "placeholder",
    "required",
    "save",
    "searchable",
    "send",
    "shuffle",
    "start",
    "subject",
    "success",
    "throwaway",
    "time",
    "tip",
    "to",
    "trigger",
    "type",
    "what",
    "when",
    "xaxis",
    "yaxis",
];

/// Keywords whose argument is an expression rather than text.
pub const EXPRESSION_KEYWORDS: &[&str] = &["if", "while", "repeat", "wait", "set", "for"];

/// Sub-keywords whose argument is an expression rather than text.
pub const EXPRESSION_SUB_KEYWORDS: &[&str] = &["save", "answers"];

/// Keyword whose argument is a loop header (`a, b in collection`).
pub const LOOP_KEYWORD: &str = "for";

/// Keywords whose body is raw markup rather than program text.
pub const RAW_MARKUP_KEYWORDS: &[&str] = &["html"];

/// Returns true if `name` is a top-level keyword.
#[must_use]
pub fn is_keyword(name: &str) -> bool {
    KEYWORDS.contains(&name)
}

/// Returns true if `name` is a sub-keyword.
#[must_use]
pub fn is_sub_keyword(name: &str) -> bool {
    SUB_KEYWORDS.contains(&name)
}

/// Returns true if `name` is a keyword or sub-keyword.
#[must_use]
pub fn is_known(name: &str) -> bool {
    is_keyword(name) || is_sub_keyword(name)
}

/// Returns true if the argument of keyword `name` is an expression.
#[must_use]
pub fn takes_expression(name: &str, sub_keyword: bool) -> bool {
    if sub_keyword {
        EXPRESSION_SUB_KEYWORDS.contains(&name)
    } else {
        EXPRESSION_KEYWORDS.contains(&name)
    }
}

/// Returns true if the body of keyword `name` is raw markup.
#[must_use]
pub fn is_raw_markup(name: &str) -> bool {
    RAW_MARKUP_KEYWORDS.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vocabularies_are_lowercase_and_sorted() {
        for list in [KEYWORDS, SUB_KEYWORDS] {
            assert!(list.iter().all(|k| *k == k.to_lowercase()));
            assert!(list.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn expression_keywords_are_known() {
        assert!(EXPRESSION_KEYWORDS.iter().all(|k| is_keyword(k)));
        assert!(EXPRESSION_SUB_KEYWORDS.iter().all(|k| is_sub_keyword(k)));
        assert!(takes_expression("if", false));
        assert!(!takes_expression("if", true));
        assert!(takes_expression("save", true));
    }

    #[test]
    fn trigger_is_both_keyword_and_sub_keyword() {
        assert!(is_keyword("trigger"));
        assert!(is_sub_keyword("trigger"));
    }
}
