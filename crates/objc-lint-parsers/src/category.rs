//! Recognizer for categories and class extensions.
//!
//! `@interface Base (Name) <Protocol>` adds to `Base`, so it needs the full
//! declaration of `Base` and of every listed protocol, but declares nothing.

use crate::common;
use crate::patterns::{self, identifier_list, IDENTIFIER};
use objc_lint_core::{Extraction, ImplementingKind, Recognizer, SourceFile};
use regex::Regex;

/// Recognizer name for category declarations.
pub const NAME: &str = "category-declaration";

/// Recognizes `@interface Base (Category)` and `@interface Base ()`.
#[derive(Debug, Clone)]
pub struct CategoryDeclaration {
    engine: Regex,
}

impl CategoryDeclaration {
    /// Compiles the recognizer.
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern fails to compile.
    pub fn new() -> Result<Self, regex::Error> {
        let pattern = format!(
            r"@interface \s+ (?P<baseclass> {IDENTIFIER} ) \s*
              \( \s* (?: {IDENTIFIER} \s* )? \) \s*
              (?: < \s* (?P<conformances> {list} ) \s* > \s* )?",
            list = identifier_list()
        );
        Ok(Self {
            engine: patterns::compile(&pattern)?,
        })
    }
}

impl Recognizer for CategoryDeclaration {
    fn name(&self) -> &'static str {
        NAME
    }

    fn recognize(&self, file: &SourceFile) -> Extraction {
        let mut extraction = Extraction::new();

        for captures in self.engine.captures_iter(file.text()) {
            let Some(whole) = captures.get(0) else {
                continue;
            };
            if patterns::next_non_space(file.text(), whole.end()) == Some('<') {
                continue;
            }
            let raw = common::raw(whole);

            let Some(base) = captures.name("baseclass") else {
                extraction.issues.push(patterns::missing_component(
                    file,
                    whole.range(),
                    "category declaration",
                ));
                continue;
            };
            extraction.references.extend(common::implementing(
                file,
                &raw,
                base,
                ImplementingKind::Inheritance,
            ));
            if let Some(conformances) = captures.name("conformances") {
                extraction.references.extend(common::implementing(
                    file,
                    &raw,
                    conformances,
                    ImplementingKind::Conformance,
                ));
            }
        }

        extraction
    }
}
