//! Configuration types for objc-lint.

use crate::types::{Issue, IssueKind, Severity};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Pragma token recognized by default.
pub const SHORT_PRAGMA: &str = "LeanHeaders";

/// Pragma token recognized when `unique_pragma` is set.
pub const UNIQUE_PRAGMA: &str = "ca.brach.LeanHeaders";

/// Top-level configuration for objc-lint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Append a code unique to each type of message.
    #[serde(default)]
    pub filterable: bool,

    /// Recognize the namespaced pragma token instead of the short one.
    #[serde(default)]
    pub unique_pragma: bool,

    /// Severity per issue kind.
    #[serde(default)]
    pub severity: SeverityConfig,

    /// Analyzer configuration.
    #[serde(default)]
    pub analyzer: AnalyzerConfig,
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Effective severity for an issue kind.
    ///
    /// An explicit per-kind setting wins over `all`, which wins over the
    /// built-in default. Internal anomalies follow the parsing severity but
    /// are never ignored.
    #[must_use]
    pub fn severity_for(&self, kind: IssueKind) -> Severity {
        if kind == IssueKind::Internal {
            return self.severity_for(IssueKind::Parsing).max(Severity::Note);
        }
        self.severity
            .kinds
            .get(&kind)
            .copied()
            .or(self.severity.all)
            .unwrap_or_else(|| kind.default_severity())
    }

    /// Resolves the severity of each issue, dropping the ignored ones.
    #[must_use]
    pub fn apply(&self, issues: Vec<Issue>) -> Vec<Issue> {
        issues
            .into_iter()
            .filter_map(|mut issue| {
                let severity = self.severity_for(issue.kind);
                if severity == Severity::Ignored {
                    return None;
                }
                if !issue.fixed_note {
                    issue.severity = severity;
                }
                Some(issue)
            })
            .collect()
    }

    /// Sets every configurable kind to `severity`, discarding per-kind settings.
    pub fn set_all(&mut self, severity: Severity) {
        self.severity.all = Some(severity);
        self.severity.kinds.clear();
    }

    /// Sets the severity of one kind.
    pub fn set_severity(&mut self, kind: IssueKind, severity: Severity) {
        self.severity.kinds.insert(kind, severity);
    }

    /// The pragma token recognized in override directives.
    #[must_use]
    pub fn pragma_token(&self) -> &'static str {
        if self.unique_pragma {
            UNIQUE_PRAGMA
        } else {
            SHORT_PRAGMA
        }
    }
}

/// Severity settings, as found in the `[severity]` table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeverityConfig {
    /// Severity applied to every kind without its own setting.
    #[serde(default)]
    pub all: Option<Severity>,

    /// Per-kind severities.
    #[serde(flatten)]
    pub kinds: HashMap<IssueKind, Severity>,
}

/// Analyzer-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Root directory to analyze (default: current directory).
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Glob patterns to exclude from analysis.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Whether to respect .gitignore files.
    #[serde(default = "default_true")]
    pub respect_gitignore: bool,

    /// Maximum number of parallel file extractions.
    #[serde(default)]
    pub parallelism: Option<usize>,

    /// File extensions treated as headers.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            exclude: Vec::new(),
            respect_gitignore: true,
            parallelism: None,
            extensions: default_extensions(),
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_true() -> bool {
    true
}

fn default_extensions() -> Vec<String> {
    vec!["h".to_string()]
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.analyzer.respect_gitignore);
        assert!(!config.filterable);
        assert_eq!(config.analyzer.extensions, vec!["h".to_string()]);
        assert_eq!(config.severity_for(IssueKind::MissingImport), Severity::Error);
        assert_eq!(config.severity_for(IssueKind::TypedefEnum), Severity::Ignored);
        assert_eq!(config.severity_for(IssueKind::Parsing), Severity::Warning);
        assert_eq!(config.pragma_token(), "LeanHeaders");
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
filterable = true
unique_pragma = true

[severity]
all = "warning"
redundant-import = "note"

[analyzer]
root = "./Sources"
exclude = ["**/Pods/**"]
parallelism = 4
"#;

        let config = Config::parse(toml).expect("Failed to parse");
        assert!(config.filterable);
        assert_eq!(config.pragma_token(), "ca.brach.LeanHeaders");
        assert_eq!(config.analyzer.root, PathBuf::from("./Sources"));
        assert_eq!(config.analyzer.parallelism, Some(4));
        assert_eq!(config.severity_for(IssueKind::RedundantImport), Severity::Note);
        assert_eq!(config.severity_for(IssueKind::RootClass), Severity::Warning);
    }

    #[test]
    fn test_rejects_unknown_severity() {
        let result = Config::parse("[severity]\nmissing-import = \"fatal\"\n");
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn set_all_then_override() {
        let mut config = Config::default();
        config.set_severity(IssueKind::PlainEnum, Severity::Error);
        config.set_all(Severity::Note);
        config.set_severity(IssueKind::MissingForward, Severity::Error);
        assert_eq!(config.severity_for(IssueKind::PlainEnum), Severity::Note);
        assert_eq!(config.severity_for(IssueKind::MissingForward), Severity::Error);
    }

    #[test]
    fn apply_resolves_and_drops_ignored() {
        use crate::types::Location;
        let at = || Location::new(PathBuf::from("a.h"), 1, 1);
        let mut config = Config::default();
        config.set_severity(IssueKind::RootClass, Severity::Warning);
        let issues = config.apply(vec![
            Issue::new(IssueKind::RootClass, at(), "root"),
            Issue::new(IssueKind::TypedefStruct, at(), "typedef"),
            Issue::new(IssueKind::Parsing, at(), "ambiguous").as_note(),
        ]);
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].severity, Severity::Warning);
        assert_eq!(issues[1].severity, Severity::Note);

        config.set_severity(IssueKind::Parsing, Severity::Ignored);
        let issues = config.apply(vec![Issue::new(IssueKind::Parsing, at(), "x").as_note()]);
        assert!(issues.is_empty());
    }

    #[test]
    fn internal_never_ignored() {
        let mut config = Config::default();
        config.set_all(Severity::Ignored);
        assert_eq!(config.severity_for(IssueKind::Internal), Severity::Note);
        config.set_severity(IssueKind::Parsing, Severity::Error);
        assert_eq!(config.severity_for(IssueKind::Internal), Severity::Error);
    }
}
