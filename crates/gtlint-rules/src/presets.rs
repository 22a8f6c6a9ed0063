//! Rule presets for common configurations.

use crate::{no_trailing_whitespace, no_undefined_vars, no_unused_vars};
use crate::{NoTrailingWhitespace, NoUndefinedVars, NoUnusedVars, ValidKeyword};
use gtlint_core::{Config, RuleBox, Severity};
use tracing::debug;

/// Preset configurations for gtlint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Every built-in rule at its default severity.
    Recommended,
    /// Every built-in rule, unused variables reported as errors.
    Strict,
    /// Minimal rules for gradual adoption.
    Minimal,
}

impl Preset {
    /// Names accepted by [`Preset::from_name`].
    pub const NAMES: &'static [&'static str] = &["recommended", "strict", "minimal"];

    /// Looks up a preset by its configuration name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "recommended" => Some(Self::Recommended),
            "strict" => Some(Self::Strict),
            "minimal" => Some(Self::Minimal),
            _ => None,
        }
    }

    /// Returns the configuration name of this preset.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Recommended => "recommended",
            Self::Strict => "strict",
            Self::Minimal => "minimal",
        }
    }

    /// Returns the rules for this preset.
    #[must_use]
    pub fn rules(self) -> Vec<RuleBox> {
        match self {
            Self::Recommended => recommended_rules(),
            Self::Strict => strict_rules(),
            Self::Minimal => minimal_rules(),
        }
    }

    /// Returns the rules for this preset with per-rule options from `config`.
    ///
    /// Recognised options:
    /// - `no-undefined-vars.globals`
    /// - `no-unused-vars.ignore`
    /// - `no-trailing-whitespace.skip_blank_lines`
    ///
    /// Enablement and severity overrides are applied by the linter itself.
    #[must_use]
    pub fn configured_rules(self, config: &Config) -> Vec<RuleBox> {
        let mut undefined = NoUndefinedVars::new();
        if let Some(options) = config.rule(no_undefined_vars::NAME) {
            let globals = options.get_str_array("globals");
            debug!("{}: globals {:?}", no_undefined_vars::NAME, globals);
            undefined = undefined.globals(globals);
        }

        let mut unused = NoUnusedVars::new();
        if self == Self::Strict {
            unused = unused.severity(Severity::Error);
        }
        if let Some(options) = config.rule(no_unused_vars::NAME) {
            let ignore = options.get_str_array("ignore");
            debug!("{}: ignoring {:?}", no_unused_vars::NAME, ignore);
            unused = unused.ignore(ignore);
        }

        let mut whitespace = NoTrailingWhitespace::new();
        if let Some(options) = config.rule(no_trailing_whitespace::NAME) {
            whitespace = whitespace.skip_blank_lines(options.get_bool("skip_blank_lines", false));
        }

        match self {
            Self::Minimal => vec![Box::new(ValidKeyword::new()), Box::new(undefined)],
            Self::Recommended | Self::Strict => vec![
                Box::new(ValidKeyword::new()),
                Box::new(undefined),
                Box::new(unused),
                Box::new(whitespace),
            ],
        }
    }
}

/// Returns the recommended set of rules.
///
/// Includes:
/// - `valid-keyword` (GT001)
/// - `no-undefined-vars` (GT002)
/// - `no-unused-vars` (GT003)
/// - `no-trailing-whitespace` (GT004)
#[must_use]
pub fn recommended_rules() -> Vec<RuleBox> {
    all_rules()
}

/// Returns the strict set of rules.
///
/// Same rules as recommended, with `no-unused-vars` raised to an error.
#[must_use]
pub fn strict_rules() -> Vec<RuleBox> {
    vec![
        Box::new(ValidKeyword::new()),
        Box::new(NoUndefinedVars::new()),
        Box::new(NoUnusedVars::new().severity(Severity::Error)),
        Box::new(NoTrailingWhitespace::new()),
    ]
}

/// Returns the minimal set of rules.
///
/// For gradual adoption, only includes:
/// - `valid-keyword`
/// - `no-undefined-vars`
#[must_use]
pub fn minimal_rules() -> Vec<RuleBox> {
    vec![
        Box::new(ValidKeyword::new()),
        Box::new(NoUndefinedVars::new()),
    ]
}

/// Returns all available rules.
#[must_use]
pub fn all_rules() -> Vec<RuleBox> {
    vec![
        Box::new(ValidKeyword::new()),
        Box::new(NoUndefinedVars::new()),
        Box::new(NoUnusedVars::new()),
        Box::new(NoTrailingWhitespace::new()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(rules: &[RuleBox]) -> Vec<&'static str> {
        rules.iter().map(|r| r.name()).collect()
    }

    #[test]
    fn test_preset_rules() {
        assert_eq!(Preset::Recommended.rules().len(), 4);
        assert_eq!(Preset::Strict.rules().len(), 4);
        assert_eq!(
            names(&Preset::Minimal.rules()),
            vec!["valid-keyword", "no-undefined-vars"]
        );
    }

    #[test]
    fn test_preset_names_round_trip() {
        for name in Preset::NAMES {
            let preset = Preset::from_name(name).expect("known preset");
            assert_eq!(preset.name(), *name);
        }
        assert_eq!(Preset::from_name("paranoid"), None);
    }

    #[test]
    fn test_strict_raises_unused_vars() {
        let rules = strict_rules();
        let unused = rules
            .iter()
            .find(|r| r.name() == no_unused_vars::NAME)
            .expect("no-unused-vars");
        assert_eq!(unused.default_severity(), Severity::Error);
    }

    #[test]
    fn test_configured_rules_match_preset() {
        let config = Config::default();
        for preset in [Preset::Recommended, Preset::Strict, Preset::Minimal] {
            assert_eq!(
                names(&preset.configured_rules(&config)),
                names(&preset.rules())
            );
        }
    }

    #[test]
    fn test_configured_rules_apply_options() {
        let config = Config::parse(
            "[rules.no-unused-vars]\nignore = [\"debug\"]\n\n[rules.no-undefined-vars]\nglobals = [\"today\"]\n",
        )
        .expect("config");
        let linter = gtlint_core::Linter::builder()
            .rules(Preset::Recommended.configured_rules(&config))
            .config(config)
            .build()
            .expect("linter");
        let result = linter.lint("test.gt", ">> debug = today\n");
        assert!(result.issues.is_empty(), "{:?}", result.issues);
    }
}
