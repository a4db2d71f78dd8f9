//! Recognizer for quoted import directives.
//!
//! Only `#import "File.h"` and `#include "File.h"` name headers of the
//! codebase; angle-bracket framework imports are not tracked.
//!
//! # Issues
//!
//! - `need-import-not-include`: `#include` used instead of `#import`

use crate::common;
use crate::patterns;
use objc_lint_core::{
    Availability, Extraction, Import, Issue, IssueKind, Recognizer, SourceFile,
};
use regex::Regex;

/// Recognizer name for import directives.
pub const NAME: &str = "import-directive";

/// Recognizes `#import "..."` and `#include "..."`.
#[derive(Debug, Clone)]
pub struct ImportDirective {
    engine: Regex,
}

impl ImportDirective {
    /// Compiles the recognizer.
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern fails to compile.
    pub fn new() -> Result<Self, regex::Error> {
        let pattern = r#"\# (?P<directive> import | include ) \s* " (?P<imports> (?: \\" | [^"] )* ) ""#;
        Ok(Self {
            engine: patterns::compile(pattern)?,
        })
    }
}

impl Recognizer for ImportDirective {
    fn name(&self) -> &'static str {
        NAME
    }

    fn recognize(&self, file: &SourceFile) -> Extraction {
        let mut extraction = Extraction::new();

        for captures in self.engine.captures_iter(file.text()) {
            let Some(whole) = captures.get(0) else {
                continue;
            };
            let (Some(directive), Some(imports)) =
                (captures.name("directive"), captures.name("imports"))
            else {
                extraction.issues.push(patterns::missing_component(
                    file,
                    whole.range(),
                    "import directive",
                ));
                continue;
            };

            if directive.as_str() == "include" {
                extraction.issues.push(
                    Issue::new(
                        IssueKind::IncludeDirective,
                        file.locate_range(directive.range()),
                        "Unintentional use of the include compiler directive; switch to import to silence this warning.",
                    )
                    .with_code("need-import-not-include"),
                );
            }

            extraction.availabilities.push(Availability::Import(Import {
                location: file.locate_range(imports.range()),
                raw: common::raw(whole),
                imports_file: imports.as_str().to_string(),
            }));
        }

        extraction
    }
}
