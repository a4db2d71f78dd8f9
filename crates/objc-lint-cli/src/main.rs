//! objc-lint CLI tool.
//!
//! Usage:
//! ```bash
//! objc-lint [OPTIONS] <ROOT>
//! objc-lint --format text --redundant-import warning ./Sources
//! ```

use anyhow::Result;
use clap::{Args, Parser};
use objc_lint_core::{Config, IssueKind, Severity};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod commands;
mod config_resolver;

/// Finds missing and unnecessary imports and forward declarations in Objective-C headers
#[derive(Parser, Debug)]
#[command(name = "objc-lint")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory searched recursively for header files
    root: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, default_value = "xcode")]
    format: OutputFormat,

    /// Exclude patterns (can be specified multiple times)
    #[arg(short, long)]
    exclude: Vec<String>,

    /// Number of headers parsed in parallel
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Append a code unique to each type of message
    #[arg(long)]
    filterable: bool,

    /// Recognize the `ca.brach.LeanHeaders` pragma instead of `LeanHeaders`
    #[arg(long)]
    unique_pragma: bool,

    #[command(flatten)]
    severities: SeverityArgs,
}

/// Output format for lint results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Xcode build log lines.
    #[default]
    Xcode,
    /// Human-readable text output.
    Text,
    /// JSON output.
    Json,
    /// Annotated source snippets.
    Fancy,
}

/// Severity accepted on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum SeverityArg {
    /// Fails the run.
    #[value(alias = "e")]
    Error,
    /// Reported, does not fail the run.
    #[value(aliases = ["w", "warn"])]
    Warning,
    /// Informational.
    #[value(alias = "n")]
    Note,
    /// Not reported.
    #[value(aliases = ["x", "i", "ignore"])]
    Ignored,
}

impl From<SeverityArg> for Severity {
    fn from(arg: SeverityArg) -> Self {
        match arg {
            SeverityArg::Error => Self::Error,
            SeverityArg::Warning => Self::Warning,
            SeverityArg::Note => Self::Note,
            SeverityArg::Ignored => Self::Ignored,
        }
    }
}

/// Per-kind severity overrides.
#[derive(Args, Debug, Default)]
#[command(next_help_heading = "Severities")]
pub struct SeverityArgs {
    /// Severity for every kind; the flags below still win
    #[arg(long, value_name = "SEVERITY")]
    all: Option<SeverityArg>,

    /// Reference needs an import that is absent
    #[arg(long, value_name = "SEVERITY")]
    missing_import: Option<SeverityArg>,

    /// Reference needs a forward declaration that is absent
    #[arg(long, value_name = "SEVERITY")]
    missing_forward: Option<SeverityArg>,

    /// Import is unused, or a forward declaration would do
    #[arg(long, value_name = "SEVERITY")]
    redundant_import: Option<SeverityArg>,

    /// Forward declaration is unused
    #[arg(long, value_name = "SEVERITY")]
    redundant_forward: Option<SeverityArg>,

    /// `#include` used instead of `#import`
    #[arg(long, value_name = "SEVERITY")]
    include_directive: Option<SeverityArg>,

    /// Class declared without a base class
    #[arg(long, value_name = "SEVERITY")]
    root_class: Option<SeverityArg>,

    /// Protocol declared without incorporating `NSObject`
    #[arg(long, value_name = "SEVERITY")]
    root_protocol: Option<SeverityArg>,

    /// Enumeration declared without `NS_ENUM` or `NS_OPTIONS`
    #[arg(long, value_name = "SEVERITY")]
    plain_enum: Option<SeverityArg>,

    /// Enumeration defined without `typedef`
    #[arg(long, value_name = "SEVERITY")]
    typedef_enum: Option<SeverityArg>,

    /// Enumeration that is anonymous or has conflicting names
    #[arg(long, value_name = "SEVERITY")]
    enum_name: Option<SeverityArg>,

    /// Structure defined without `typedef`
    #[arg(long, value_name = "SEVERITY")]
    typedef_struct: Option<SeverityArg>,

    /// Structure that is anonymous or has conflicting names
    #[arg(long, value_name = "SEVERITY")]
    struct_name: Option<SeverityArg>,

    /// Header text that could not be parsed
    #[arg(long, value_name = "SEVERITY")]
    parsing: Option<SeverityArg>,

    /// Typedef whose aliased type is missing or ambiguous
    #[arg(long, value_name = "SEVERITY")]
    unresolved_alias: Option<SeverityArg>,
}

impl SeverityArgs {
    fn per_kind(&self) -> [(IssueKind, Option<SeverityArg>); 14] {
        [
            (IssueKind::MissingImport, self.missing_import),
            (IssueKind::MissingForward, self.missing_forward),
            (IssueKind::RedundantImport, self.redundant_import),
            (IssueKind::RedundantForward, self.redundant_forward),
            (IssueKind::IncludeDirective, self.include_directive),
            (IssueKind::RootClass, self.root_class),
            (IssueKind::RootProtocol, self.root_protocol),
            (IssueKind::PlainEnum, self.plain_enum),
            (IssueKind::TypedefEnum, self.typedef_enum),
            (IssueKind::EnumName, self.enum_name),
            (IssueKind::TypedefStruct, self.typedef_struct),
            (IssueKind::StructName, self.struct_name),
            (IssueKind::Parsing, self.parsing),
            (IssueKind::UnresolvedAlias, self.unresolved_alias),
        ]
    }

    /// Writes the given flags over `config`.
    pub fn apply(&self, config: &mut Config) {
        if let Some(all) = self.all {
            config.set_all(all.into());
        }
        for (kind, severity) in self.per_kind() {
            if let Some(severity) = severity {
                config.set_severity(kind, severity.into());
            }
        }
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let source = config_resolver::resolve(&cli.root, cli.config.as_deref());
    let options = commands::check::CheckOptions {
        format: cli.format,
        exclude: cli.exclude,
        jobs: cli.jobs,
        filterable: cli.filterable,
        unique_pragma: cli.unique_pragma,
        severities: cli.severities,
    };

    let errors = commands::check::run(&cli.root, &options, &source)?;
    Ok(ExitCode::from(errors))
}
