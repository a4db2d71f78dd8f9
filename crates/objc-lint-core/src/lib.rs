//! # objc-lint-core
//!
//! Core model for linting the imports and forward declarations of
//! Objective-C headers.
//!
//! This crate provides the types and algorithms shared by every recognizer:
//!
//! - [`Recognizer`] trait for extracting one syntactic form from a header
//! - [`Analyzer`] for discovering headers and running recognizers in parallel
//! - [`Codebase`] for the declaration, availability and reference model, and
//!   the resolution that turns it into [`Issue`]s
//! - [`Config`] for severities and analyzer settings
//!
//! ## Example
//!
//! ```ignore
//! use objc_lint_core::{Analyzer, Config};
//!
//! let analyzer = Analyzer::builder()
//!     .root("./Sources")
//!     .recognizers(my_recognizers)
//!     .config(Config::default())
//!     .build()?;
//!
//! let result = analyzer.analyze()?;
//! std::process::exit(i32::from(result.exit_code()));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analyzer;
mod codebase;
mod config;
mod model;
mod recognizer;
mod resolve;
mod source;
mod types;

pub use analyzer::{Analyzer, AnalyzerBuilder, AnalyzerError};
pub use codebase::{Codebase, Model, TrackedAvailability};
pub use config::{AnalyzerConfig, Config, ConfigError, SeverityConfig, SHORT_PRAGMA, UNIQUE_PRAGMA};
pub use model::{
    Availability, CompositionKind, CompositionReference, DeclarationKind, Extraction, Forward,
    ForwardKind, ImplementingKind, ImplementingReference, Import, TypeDeclaration, TypeReference,
    UsageLevel,
};
pub use recognizer::Recognizer;
pub use source::SourceFile;
pub use types::{
    Issue, IssueDiagnostic, IssueKind, LintResult, Location, Severity, Suggestion,
};
