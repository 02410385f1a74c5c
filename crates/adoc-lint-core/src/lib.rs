//! # adoc-lint-core
//!
//! Validation engine for parsed AsciiDoc document trees.
//!
//! A [`RuleModel`] describes what a document must look like: required
//! header attributes, the section hierarchy (levels, order, occurrence,
//! title patterns) and per-kind block constraints. [`validate`] checks a
//! [`Document`] against it and returns a [`ValidationResult`] whose
//! findings carry exact, column-accurate source locations.
//!
//! - [`config`] loads rule sets from TOML into a validated model
//! - [`validate`] / [`Validator`] run the checks
//! - [`ConsoleReporter`] renders findings with source context
//!
//! ## Example
//!
//! ```ignore
//! use adoc_lint_core::{validate, ConsoleReporter, Document, RulesConfig};
//!
//! let rules = RulesConfig::from_file("adoc-lint.toml".as_ref())?;
//! let document = Document::from_json(&json)?;
//!
//! let result = validate(&document, rules.model());
//! print!("{}", ConsoleReporter::default().render(&result, &document));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod blocks;
pub mod config;
pub mod document;
pub mod eval;
mod metadata;
pub mod model;
mod report;
pub mod source;
mod structure;
mod types;
mod validator;

pub use config::{ConfigError, LoadError, RulesConfig, Settings};
pub use document::{AttributeEntry, Document, Node};
pub use metadata::validate_metadata;
pub use model::{ModelError, RuleModel};
pub use report::{render_fancy, ConsoleReporter, MessageDiagnostic, NoSource, SourceLookup};
pub use source::{Locator, SourceText};
pub use structure::{validate_structure, INTERNAL_RULE_ID};
pub use types::{
    FindingKind, Placeholder, Severity, SourceLocation, Suggestion, ValidationMessage,
    ValidationResult, ValidationResultBuilder,
};
pub use validator::{validate, Validator};
