//! Core types for lint issues and results.

use miette::{Diagnostic, NamedSource, SourceSpan};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Severity level for lint issues.
///
/// Ordered from least to most severe, so `>=` comparisons read naturally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Not reported at all.
    Ignored,
    /// Commentary, does not fail lint.
    Note,
    /// Advisory that should be addressed.
    Warning,
    /// Error that must be fixed.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ignored => write!(f, "ignored"),
            Self::Note => write!(f, "note"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// The configurable category an issue belongs to.
///
/// Every kind maps to one severity in [`crate::Config`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueKind {
    /// A reference needs an import that is absent.
    MissingImport,
    /// A reference needs a forward declaration that is absent.
    MissingForward,
    /// An import is unused, or stronger than any reference requires.
    RedundantImport,
    /// A forward declaration is unused.
    RedundantForward,
    /// `#include` used where `#import` is expected.
    IncludeDirective,
    /// A class declared without a base class.
    RootClass,
    /// A protocol declared without incorporating another protocol.
    RootProtocol,
    /// An enumeration declared with the bare `enum` keyword.
    PlainEnum,
    /// An enumeration defined without `typedef`.
    TypedefEnum,
    /// An enumeration that is anonymous or has conflicting names.
    EnumName,
    /// A structure defined without `typedef`.
    TypedefStruct,
    /// A structure that is anonymous or has conflicting names.
    StructName,
    /// The linter could not parse part of the codebase.
    Parsing,
    /// An arbitrary typedef whose aliased type is missing or ambiguous.
    UnresolvedAlias,
    /// A resolver invariant was violated.
    Internal,
}

impl IssueKind {
    /// Every kind that can be configured, in a stable order.
    pub const CONFIGURABLE: [Self; 14] = [
        Self::MissingImport,
        Self::MissingForward,
        Self::RedundantImport,
        Self::RedundantForward,
        Self::IncludeDirective,
        Self::RootClass,
        Self::RootProtocol,
        Self::PlainEnum,
        Self::TypedefEnum,
        Self::EnumName,
        Self::TypedefStruct,
        Self::StructName,
        Self::Parsing,
        Self::UnresolvedAlias,
    ];

    /// Severity used when nothing is configured.
    #[must_use]
    pub fn default_severity(self) -> Severity {
        match self {
            Self::MissingImport
            | Self::MissingForward
            | Self::RedundantImport
            | Self::RedundantForward
            | Self::RootClass
            | Self::RootProtocol
            | Self::EnumName
            | Self::StructName => Severity::Error,
            Self::IncludeDirective | Self::PlainEnum | Self::Parsing | Self::Internal => {
                Severity::Warning
            }
            Self::TypedefEnum | Self::TypedefStruct => Severity::Ignored,
            Self::UnresolvedAlias => Severity::Note,
        }
    }

    /// Kebab-case name, as used in configuration files and CLI flags.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::MissingImport => "missing-import",
            Self::MissingForward => "missing-forward",
            Self::RedundantImport => "redundant-import",
            Self::RedundantForward => "redundant-forward",
            Self::IncludeDirective => "include-directive",
            Self::RootClass => "root-class",
            Self::RootProtocol => "root-protocol",
            Self::PlainEnum => "plain-enum",
            Self::TypedefEnum => "typedef-enum",
            Self::EnumName => "enum-name",
            Self::TypedefStruct => "typedef-struct",
            Self::StructName => "struct-name",
            Self::Parsing => "parsing",
            Self::UnresolvedAlias => "unresolved-alias",
            Self::Internal => "internal",
        }
    }
}

impl std::fmt::Display for IssueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Source code location.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// Path of the header file.
    pub file: PathBuf,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
    /// Byte offset in file (for miette integration).
    pub offset: usize,
    /// Length of the span in bytes.
    pub length: usize,
}

impl Location {
    /// Creates a new location with explicit values.
    #[must_use]
    pub fn new(file: PathBuf, line: usize, column: usize) -> Self {
        Self {
            file,
            line,
            column,
            offset: 0,
            length: 0,
        }
    }

    /// Sets the byte offset and length for this location.
    #[must_use]
    pub fn with_span(mut self, offset: usize, length: usize) -> Self {
        self.offset = offset;
        self.length = length;
        self
    }

    /// File name of the header, without its directories.
    #[must_use]
    pub fn file_name(&self) -> String {
        self.file
            .file_name()
            .map_or_else(String::new, |n| n.to_string_lossy().into_owned())
    }
}

/// A suggested fix for an issue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suggestion {
    /// Human-readable description of the fix.
    pub message: String,
}

impl Suggestion {
    /// Creates a new suggestion.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A lint issue found during analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    /// Configurable category of this issue.
    pub kind: IssueKind,
    /// Severity, resolved from configuration by the analyzer.
    pub severity: Severity,
    /// Primary location, absent for issues about the tool itself.
    pub location: Option<Location>,
    /// Human-readable message.
    pub message: String,
    /// Code unique to this type of message, appended when output is filterable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Optional suggestion for fixing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<Suggestion>,
    /// Always reported as a note, unless its kind is ignored.
    #[serde(skip)]
    pub(crate) fixed_note: bool,
}

impl Issue {
    /// Creates a new issue at a location, with the kind's default severity.
    #[must_use]
    pub fn new(kind: IssueKind, location: Location, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: kind.default_severity(),
            location: Some(location),
            message: message.into(),
            code: None,
            suggestion: None,
            fixed_note: false,
        }
    }

    /// Creates a new issue that has no source location.
    #[must_use]
    pub fn unlocated(kind: IssueKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: kind.default_severity(),
            location: None,
            message: message.into(),
            code: None,
            suggestion: None,
            fixed_note: false,
        }
    }

    /// Adds a filter code to this issue.
    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Adds a suggestion to this issue.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: Suggestion) -> Self {
        self.suggestion = Some(suggestion);
        self
    }

    /// Marks this issue as informational, whatever its kind's severity.
    #[must_use]
    pub fn as_note(mut self) -> Self {
        self.severity = Severity::Note;
        self.fixed_note = true;
        self
    }

    /// Overrides the severity of this issue.
    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Formats the issue as an Xcode build log line.
    ///
    /// `path:line:column: severity: message`, followed by two spaces and the
    /// filter code when `filterable` is set.
    #[must_use]
    pub fn format_xcode(&self, filterable: bool) -> String {
        let mut output = match &self.location {
            Some(location) => format!(
                "{}:{}:{}: {}: {}",
                location.file.display(),
                location.line,
                location.column,
                self.severity,
                self.message
            ),
            None => format!("objc-lint: {}: {}", self.severity, self.message),
        };
        if let (true, Some(code)) = (filterable, &self.code) {
            output.push_str("  ");
            output.push_str(code);
        }
        output
    }
}

impl std::fmt::Display for Issue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(location) = &self.location {
            write!(
                f,
                "{}:{}:{}: ",
                location.file.display(),
                location.line,
                location.column
            )?;
        }
        write!(f, "{} [{}] {}", self.severity, self.kind, self.message)?;
        if let Some(code) = &self.code {
            write!(f, " ({code})")?;
        }
        Ok(())
    }
}

/// Converts an Issue to a miette Diagnostic for rich error display.
#[derive(Debug, thiserror::Error, Diagnostic)]
#[error("{message}")]
pub struct IssueDiagnostic {
    message: String,
    #[help]
    help: Option<String>,
    #[source_code]
    source_code: NamedSource<String>,
    #[label("{label_message}")]
    span: Option<SourceSpan>,
    label_message: String,
}

impl IssueDiagnostic {
    /// Builds a diagnostic for `issue`, rendering `source` as the file text.
    #[must_use]
    pub fn new(issue: &Issue, source: String) -> Self {
        let name = issue
            .location
            .as_ref()
            .map_or_else(|| "objc-lint".to_string(), |l| l.file.display().to_string());
        let span = issue
            .location
            .as_ref()
            .filter(|l| l.offset + l.length <= source.len())
            .map(|l| SourceSpan::from((l.offset, l.length)));
        Self {
            message: format!("{}: {}", issue.severity, issue.message),
            help: issue.suggestion.as_ref().map(|s| s.message.clone()),
            source_code: NamedSource::new(name, source),
            span,
            label_message: issue
                .code
                .clone()
                .unwrap_or_else(|| issue.kind.to_string()),
        }
    }
}

/// Result of running lint analysis.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LintResult {
    /// All reported issues, ignored ones excluded.
    pub issues: Vec<Issue>,
    /// Number of header files checked.
    pub files_checked: usize,
}

impl LintResult {
    /// Creates a new empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.issues.iter().any(|i| i.severity == Severity::Error)
    }

    /// Returns issues of one kind.
    #[must_use]
    pub fn by_kind(&self, kind: IssueKind) -> Vec<&Issue> {
        self.issues.iter().filter(|i| i.kind == kind).collect()
    }

    /// Returns issues carrying the given filter code.
    #[must_use]
    pub fn by_code(&self, code: &str) -> Vec<&Issue> {
        self.issues
            .iter()
            .filter(|i| i.code.as_deref() == Some(code))
            .collect()
    }

    /// Counts issues by severity as `(errors, warnings, notes)`.
    #[must_use]
    pub fn count_by_severity(&self) -> (usize, usize, usize) {
        let count = |severity| self.issues.iter().filter(|i| i.severity == severity).count();
        (
            count(Severity::Error),
            count(Severity::Warning),
            count(Severity::Note),
        )
    }

    /// Process exit code: the error count, saturated to fit a status byte.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        let (errors, _, _) = self.count_by_severity();
        u8::try_from(errors).unwrap_or(u8::MAX)
    }
}
