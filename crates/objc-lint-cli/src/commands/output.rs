//! Output formatting for lint results.

use anyhow::Result;
use objc_lint_core::{IssueDiagnostic, LintResult, Severity};
use std::collections::HashMap;
use std::fmt::Write as _;
use std::path::PathBuf;

use crate::OutputFormat;

/// Print lint results in the specified format.
pub fn print(result: &LintResult, format: OutputFormat, filterable: bool) -> Result<()> {
    let rendered = match format {
        OutputFormat::Xcode => render_xcode(result, filterable),
        OutputFormat::Text => render_text(result, filterable),
        OutputFormat::Json => render_json(result)?,
        OutputFormat::Fancy => render_fancy(result),
    };
    print!("{rendered}");
    Ok(())
}

fn render_xcode(result: &LintResult, filterable: bool) -> String {
    result.issues.iter().fold(String::new(), |mut out, issue| {
        let _ = writeln!(out, "{}", issue.format_xcode(filterable));
        out
    })
}

fn render_text(result: &LintResult, filterable: bool) -> String {
    let mut out = String::new();
    let (errors, warnings, notes) = result.count_by_severity();

    for issue in &result.issues {
        let severity_indicator = match issue.severity {
            Severity::Error => "\x1b[31merror\x1b[0m",
            Severity::Warning => "\x1b[33mwarning\x1b[0m",
            Severity::Note => "\x1b[34mnote\x1b[0m",
            Severity::Ignored => "ignored",
        };

        match &issue.location {
            Some(location) => {
                let _ = writeln!(
                    out,
                    "{} at {}:{}:{}",
                    issue.kind,
                    location.file.display(),
                    location.line,
                    location.column
                );
            }
            None => {
                let _ = writeln!(out, "{}", issue.kind);
            }
        }
        let _ = write!(out, "  {}: {}", severity_indicator, issue.message);
        if let (true, Some(code)) = (filterable, &issue.code) {
            let _ = write!(out, " [{code}]");
        }
        out.push('\n');
        if let Some(suggestion) = &issue.suggestion {
            let _ = writeln!(out, "  = help: {}", suggestion.message);
        }
        out.push('\n');
    }

    let summary_color = if errors > 0 {
        "\x1b[31m"
    } else if warnings > 0 {
        "\x1b[33m"
    } else {
        "\x1b[32m"
    };
    let _ = writeln!(
        out,
        "{}Found {} error(s), {} warning(s), {} note(s) in {} file(s)\x1b[0m",
        summary_color, errors, warnings, notes, result.files_checked
    );
    out
}

fn render_json(result: &LintResult) -> Result<String> {
    let mut json = serde_json::to_string_pretty(result)?;
    json.push('\n');
    Ok(json)
}

fn render_fancy(result: &LintResult) -> String {
    let mut sources: HashMap<PathBuf, String> = HashMap::new();
    let mut out = String::new();

    for issue in &result.issues {
        let source = match &issue.location {
            Some(location) => sources
                .entry(location.file.clone())
                .or_insert_with(|| std::fs::read_to_string(&location.file).unwrap_or_default())
                .clone(),
            None => String::new(),
        };
        let report = miette::Report::new(IssueDiagnostic::new(issue, source));
        let _ = writeln!(out, "{report:?}");
    }
    out
}
