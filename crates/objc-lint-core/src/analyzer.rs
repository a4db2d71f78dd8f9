//! Extraction coordinator: discovers headers, runs every recognizer on every
//! file in parallel, then hands the merged result to the codebase model.

use crate::codebase::Codebase;
use crate::config::Config;
use crate::model::Extraction;
use crate::recognizer::Recognizer;
use crate::source::SourceFile;
use crate::types::{Issue, IssueKind, LintResult, Location};

use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur during analysis.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// IO error resolving the root directory.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The root is missing or not a directory.
    #[error("Cannot analyze {}: not a directory", .0.display())]
    NotADirectory(PathBuf),

    /// Glob pattern error.
    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Directory walk error.
    #[error("Cannot search for header files: {0}")]
    Walk(#[from] ignore::Error),

    /// Worker pool could not be started.
    #[error("Cannot start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Builder for configuring an [`Analyzer`].
pub struct AnalyzerBuilder<R> {
    root: Option<PathBuf>,
    recognizers: Vec<R>,
    exclude_patterns: Vec<String>,
    config: Option<Config>,
    issues: Vec<Issue>,
}

impl<R> Default for AnalyzerBuilder<R> {
    fn default() -> Self {
        Self {
            root: None,
            recognizers: Vec::new(),
            exclude_patterns: Vec::new(),
            config: None,
            issues: Vec::new(),
        }
    }
}

impl<R: Recognizer> AnalyzerBuilder<R> {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the root directory to analyze.
    #[must_use]
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Adds a recognizer.
    #[must_use]
    pub fn recognizer(mut self, recognizer: R) -> Self {
        self.recognizers.push(recognizer);
        self
    }

    /// Adds several recognizers, keeping their order.
    #[must_use]
    pub fn recognizers(mut self, recognizers: impl IntoIterator<Item = R>) -> Self {
        self.recognizers.extend(recognizers);
        self
    }

    /// Adds an exclude glob pattern.
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    /// Adds multiple exclude glob patterns.
    #[must_use]
    pub fn excludes<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_patterns
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Adds issues raised before analysis, such as recognizers that failed to compile.
    #[must_use]
    pub fn issues(mut self, issues: impl IntoIterator<Item = Issue>) -> Self {
        self.issues.extend(issues);
        self
    }

    /// Builds the analyzer.
    ///
    /// # Errors
    ///
    /// Returns an error if the root is not an existing directory or an
    /// exclude pattern is invalid.
    pub fn build(self) -> Result<Analyzer<R>, AnalyzerError> {
        let config = self.config.unwrap_or_default();
        let root = self
            .root
            .unwrap_or_else(|| config.analyzer.root.clone());
        let root = match root.canonicalize() {
            Ok(resolved) if resolved.is_dir() => resolved,
            _ => return Err(AnalyzerError::NotADirectory(root)),
        };

        let exclude_patterns = self
            .exclude_patterns
            .iter()
            .chain(&config.analyzer.exclude)
            .map(|p| glob::Pattern::new(p))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Analyzer {
            root,
            recognizers: self.recognizers,
            exclude_patterns,
            config,
            issues: self.issues,
        })
    }
}

/// Orders issues by file, line and column; issues without a location come first.
fn sort_key(issue: &Issue) -> Option<(&Path, usize, usize)> {
    issue
        .location
        .as_ref()
        .map(|l| (l.file.as_path(), l.line, l.column))
}

/// Runs recognizers over every header under a root and resolves the result.
///
/// Use [`Analyzer::builder()`] to construct an instance.
pub struct Analyzer<R> {
    root: PathBuf,
    recognizers: Vec<R>,
    exclude_patterns: Vec<glob::Pattern>,
    config: Config,
    issues: Vec<Issue>,
}

impl<R: Recognizer> Analyzer<R> {
    /// Creates a new builder for configuring an analyzer.
    #[must_use]
    pub fn builder() -> AnalyzerBuilder<R> {
        AnalyzerBuilder::new()
    }

    /// Returns the root directory being analyzed.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the number of registered recognizers.
    #[must_use]
    pub fn recognizer_count(&self) -> usize {
        self.recognizers.len()
    }

    /// Analyzes all headers and returns the resolved issues.
    ///
    /// # Errors
    ///
    /// Returns an error if header discovery fails or the worker pool
    /// cannot be started. Unreadable headers are reported as issues.
    pub fn analyze(&self) -> Result<LintResult, AnalyzerError> {
        info!("Starting analysis at {}", self.root.display());

        let files = self.discover_files()?;
        info!(
            "Found {} header files, running {} recognizers",
            files.len(),
            self.recognizers.len()
        );

        let started = Instant::now();
        let mut extraction = self.extract(&files)?;
        extraction.issues.extend(self.issues.iter().cloned());
        debug!("Parsing took {:?}", started.elapsed());

        let files_checked = files.len();
        let mut codebase = Codebase::new(files, extraction);
        let mut issues = codebase.check_issues(&self.config);

        issues.sort_by(|a, b| {
            sort_key(a)
                .cmp(&sort_key(b))
                .then_with(|| a.message.cmp(&b.message))
        });

        let result = LintResult {
            issues,
            files_checked,
        };
        let (errors, warnings, notes) = result.count_by_severity();
        info!(
            "Analysis complete: {} errors, {} warnings, {} notes in {} files",
            errors, warnings, notes, files_checked
        );
        Ok(result)
    }

    /// Runs every recognizer on every file, merging into one extraction.
    fn extract(&self, files: &[PathBuf]) -> Result<Extraction, AnalyzerError> {
        let mut builder = rayon::ThreadPoolBuilder::new();
        if let Some(jobs) = self.config.analyzer.parallelism {
            builder = builder.num_threads(jobs);
        }
        let pool = builder.build()?;

        let merged = Mutex::new(Extraction::new());
        pool.install(|| {
            files.par_iter().for_each(|path| {
                let extraction = self.extract_file(path);
                merged
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .extend(extraction);
            });
        });
        Ok(merged.into_inner().unwrap_or_else(PoisonError::into_inner))
    }

    fn extract_file(&self, path: &Path) -> Extraction {
        debug!("Extracting: {}", path.display());
        let mut extraction = Extraction::new();

        let file = match SourceFile::read(path) {
            Ok(file) => file,
            Err(e) => {
                warn!("Failed to read {}: {}", path.display(), e);
                extraction.issues.push(Issue::new(
                    IssueKind::Parsing,
                    Location::new(path.to_path_buf(), 1, 1),
                    format!("Cannot read header file: {e}."),
                ));
                return extraction;
            }
        };

        for recognizer in &self.recognizers {
            extraction.extend(recognizer.recognize(&file));
        }
        extraction
    }

    /// Discovers all header files to analyze, sorted by path.
    fn discover_files(&self) -> Result<Vec<PathBuf>, AnalyzerError> {
        let respect_gitignore = self.config.analyzer.respect_gitignore;
        let mut builder = ignore::WalkBuilder::new(&self.root);
        builder
            .hidden(false)
            .ignore(respect_gitignore)
            .git_ignore(respect_gitignore)
            .git_exclude(respect_gitignore)
            .git_global(respect_gitignore)
            .require_git(false);

        let mut files = Vec::new();
        for entry in builder.build() {
            let entry = entry?;
            let path = entry.path();
            if !entry.file_type().is_some_and(|t| t.is_file()) || !self.is_header(path) {
                continue;
            }
            if self.should_exclude(path) {
                debug!("Excluding: {}", path.display());
                continue;
            }
            files.push(path.to_path_buf());
        }

        files.sort();
        Ok(files)
    }

    fn is_header(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.config.analyzer.extensions.iter().any(|e| e == ext))
    }

    /// Checks if a path should be excluded, matching both the absolute path
    /// and the path relative to the root.
    fn should_exclude(&self, path: &Path) -> bool {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        self.exclude_patterns
            .iter()
            .any(|pattern| pattern.matches_path(path) || pattern.matches_path(relative))
    }
}
