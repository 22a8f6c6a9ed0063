//! # gtlint
//!
//! Static analysis for GuidedTrack-style programs.
//!
//! This is the main facade crate that re-exports the core framework and the
//! built-in rules, and builds a ready-to-use linter from a [`Config`].
//!
//! ## Configuration
//!
//! ```toml
//! preset = "recommended"
//! fail_on = "warning"
//!
//! [rules.no-unused-vars]
//! ignore = ["debug"]
//!
//! [rules.no-trailing-whitespace]
//! enabled = false
//! ```
//!
//! ## Programmatic Usage
//!
//! ```rust,ignore
//! use gtlint::{check_file, Config};
//!
//! let config = Config::from_file("gtlint.toml".as_ref())?;
//! let outcome = check_file(config, "survey.gt")?;
//! if !outcome.passed() {
//!     eprint!("{}", outcome.report());
//! }
//! ```
//!
//! ## Suppression
//!
//! ```text
//! -- gtlint-disable-next-line no-undefined-vars
//! Hello {visitor}
//! ```

#![forbid(unsafe_code)]

// Re-export core types and traits
pub use gtlint_core::*;

/// Built-in rules and presets.
pub mod rules {
    pub use gtlint_rules::*;
}

mod runner;

pub use runner::{
    check_file, check_source, linter_from_config, CheckOutcome, DEFAULT_PRESET,
};
