//! # gtlint-rules
//!
//! Built-in lint rules for gtlint.
//!
//! ## Available Rules
//!
//! | Code | Name | Description |
//! |------|------|-------------|
//! | GT001 | `valid-keyword` | Flags unknown keywords; fixes keyword case |
//! | GT002 | `no-undefined-vars` | Flags variables used but never defined |
//! | GT003 | `no-unused-vars` | Flags variables assigned but never used |
//! | GT004 | `no-trailing-whitespace` | Flags and removes trailing spaces and tabs |
//!
//! ## Usage
//!
//! ```ignore
//! use gtlint_core::Linter;
//! use gtlint_rules::{NoUndefinedVars, ValidKeyword};
//!
//! let linter = Linter::builder()
//!     .rule(ValidKeyword::new())
//!     .rule(NoUndefinedVars::new().globals(["today"]))
//!     .build()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod no_trailing_whitespace;
pub mod no_undefined_vars;
pub mod no_unused_vars;
mod presets;
pub mod valid_keyword;
mod variables;

pub use no_trailing_whitespace::NoTrailingWhitespace;
pub use no_undefined_vars::NoUndefinedVars;
pub use no_unused_vars::NoUnusedVars;
pub use presets::{all_rules, minimal_rules, recommended_rules, strict_rules, Preset};
pub use valid_keyword::ValidKeyword;

/// Re-export core types for convenience.
pub use gtlint_core::{Issue, Rule, Severity};
