//! Check command implementation.

use anyhow::{Context, Result};
use objc_lint_core::{Analyzer, Config, LintResult};
use objc_lint_parsers::all_recognizers;
use std::path::Path;

use crate::config_resolver::ConfigSource;
use crate::{OutputFormat, SeverityArgs};

/// Command-line settings layered over the configuration file.
#[derive(Debug, Default)]
pub struct CheckOptions {
    pub format: OutputFormat,
    pub exclude: Vec<String>,
    pub jobs: Option<usize>,
    pub filterable: bool,
    pub unique_pragma: bool,
    pub severities: SeverityArgs,
}

impl CheckOptions {
    fn apply(&self, config: &mut Config) {
        config.filterable |= self.filterable;
        config.unique_pragma |= self.unique_pragma;
        if self.jobs.is_some() {
            config.analyzer.parallelism = self.jobs;
        }
        self.severities.apply(config);
    }
}

/// Loads the configuration from `source`, then applies the command-line overrides.
pub fn load_config(source: &ConfigSource, options: &CheckOptions) -> Result<Config> {
    let mut config = match source.path() {
        None => Config::default(),
        Some(path) => {
            tracing::info!("Using config: {source}");
            Config::from_file(path)
                .with_context(|| format!("Failed to load config: {}", path.display()))?
        }
    };
    options.apply(&mut config);
    Ok(config)
}

/// Lints every header under `root`.
pub fn lint(root: &Path, options: &CheckOptions, config: Config) -> Result<LintResult> {
    let (recognizers, issues) = all_recognizers(&config);

    let analyzer = Analyzer::builder()
        .root(root)
        .recognizers(recognizers)
        .issues(issues)
        .excludes(options.exclude.iter().cloned())
        .config(config)
        .build()
        .context("Failed to build analyzer")?;

    tracing::info!(
        "Analyzing {} with {} recognizers",
        analyzer.root().display(),
        analyzer.recognizer_count()
    );

    analyzer.analyze().context("Analysis failed")
}

/// Runs the check command, returning the process exit code.
pub fn run(root: &Path, options: &CheckOptions, source: &ConfigSource) -> Result<u8> {
    let config = load_config(source, options)?;
    let filterable = config.filterable;

    let result = lint(root, options, config)?;
    super::output::print(&result, options.format, filterable)?;

    Ok(result.exit_code())
}
