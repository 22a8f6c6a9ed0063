//! Builds a linter from a [`Config`] and checks sources against `fail_on`.

use gtlint_core::{Config, ConfigError, LintError, LintResult, Linter, Severity};
use gtlint_rules::Preset;
use std::path::Path;
use tracing::{debug, info};

/// Preset used when the configuration names none.
pub const DEFAULT_PRESET: Preset = Preset::Recommended;

/// Outcome of [`check_source`] or [`check_file`].
#[derive(Debug, Clone)]
pub struct CheckOutcome {
    /// Lint result for the checked source.
    pub result: LintResult,
    /// Severity at or above which the check fails.
    pub fail_on: Severity,
}

impl CheckOutcome {
    /// Returns true if no issue reaches `fail_on`.
    #[must_use]
    pub fn passed(&self) -> bool {
        !self.result.has_issues_at(self.fail_on)
    }

    /// Formats the issues at or above `fail_on`.
    #[must_use]
    pub fn report(&self) -> String {
        self.result.format_report(self.fail_on)
    }
}

/// Builds a linter with the configured preset, rule options and overrides.
///
/// # Errors
///
/// Returns an error if the preset is unknown.
pub fn linter_from_config(config: Config) -> Result<Linter, LintError> {
    let preset = resolve_preset(&config)?;
    let rules = preset.configured_rules(&config);
    debug!("Preset `{}` with {} rule(s)", preset.name(), rules.len());

    Linter::builder().rules(rules).config(config).build()
}

/// Lints `source` with a linter built from `config`.
///
/// # Errors
///
/// Returns an error if the preset or `fail_on` is invalid.
pub fn check_source(
    config: Config,
    path: impl AsRef<Path>,
    source: &str,
) -> Result<CheckOutcome, LintError> {
    let fail_on = config.fail_on_severity()?;
    let linter = linter_from_config(config)?;
    let result = linter.lint(path, source);
    Ok(finish(result, fail_on))
}

/// Reads and lints the file at `path` with a linter built from `config`.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the file cannot be read.
pub fn check_file(config: Config, path: impl AsRef<Path>) -> Result<CheckOutcome, LintError> {
    let fail_on = config.fail_on_severity()?;
    let linter = linter_from_config(config)?;
    let result = linter.lint_file(path)?;
    Ok(finish(result, fail_on))
}

fn finish(result: LintResult, fail_on: Severity) -> CheckOutcome {
    let outcome = CheckOutcome { result, fail_on };
    info!(
        "Check {} for {} (fail_on = {})",
        if outcome.passed() { "passed" } else { "failed" },
        outcome.result.file_path.display(),
        fail_on
    );
    outcome
}

/// Resolves the effective preset from config > default.
fn resolve_preset(config: &Config) -> Result<Preset, ConfigError> {
    match config.preset.as_deref() {
        None => Ok(DEFAULT_PRESET),
        Some(name) => Preset::from_name(name).ok_or_else(|| ConfigError::InvalidValue {
            key: "preset".to_string(),
            message: format!(
                "unknown preset `{name}`, expected one of: {}",
                Preset::NAMES.join(", ")
            ),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_preset_defaults_to_recommended() {
        let config = Config::default();
        assert_eq!(resolve_preset(&config).ok(), Some(Preset::Recommended));
    }

    #[test]
    fn resolve_preset_from_config() {
        let mut config = Config::default();
        config.preset = Some("strict".to_string());
        assert_eq!(resolve_preset(&config).ok(), Some(Preset::Strict));
    }

    #[test]
    fn resolve_preset_rejects_unknown() {
        let mut config = Config::default();
        config.preset = Some("nonexistent".to_string());
        let err = resolve_preset(&config).expect_err("unknown preset");
        assert!(err.to_string().contains("unknown preset `nonexistent`"));
    }

    #[test]
    fn minimal_preset_has_two_rules() {
        let config = Config::parse("preset = \"minimal\"").expect("config");
        let linter = linter_from_config(config).expect("linter");
        assert_eq!(linter.rule_count(), 2);
    }

    #[test]
    fn check_passes_below_fail_on() {
        let outcome = check_source(Config::default(), "a.gt", ">> x = 1\n").expect("check");
        assert_eq!(outcome.result.warning_count, 1);
        assert!(outcome.passed());
    }

    #[test]
    fn check_fails_at_fail_on() {
        let config = Config::parse("fail_on = \"warning\"").expect("config");
        let outcome = check_source(config, "a.gt", ">> x = 1\n").expect("check");
        assert!(!outcome.passed());
        assert!(outcome.report().contains("no-unused-vars"));
    }

    #[test]
    fn invalid_fail_on_is_an_error() {
        let config = Config::parse("fail_on = \"fatal\"").expect("config");
        assert!(matches!(
            check_source(config, "a.gt", ""),
            Err(LintError::Config(ConfigError::InvalidValue { .. }))
        ));
    }
}
