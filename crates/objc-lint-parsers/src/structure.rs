//! Recognizer for structure definitions.
//!
//! # Issues
//!
//! - `missing-struct-typedef`: `struct Name { ... };` without `typedef`
//! - `missing-struct-name`: an anonymous structure without `typedef`
//! - `missing-struct-typename`: `typedef struct { ... };` without a type name
//! - `conflicting-struct-name`: `typedef struct A { ... } B;`

use crate::common;
use crate::patterns::{self, IDENTIFIER};
use objc_lint_core::{DeclarationKind, Extraction, Issue, IssueKind, Recognizer, SourceFile};
use regex::Regex;

/// Recognizer name for structure definitions.
pub const NAME: &str = "structure-definition";

/// Recognizes `struct` definitions, with or without `typedef`.
#[derive(Debug, Clone)]
pub struct StructureDefinition {
    engine: Regex,
}

impl StructureDefinition {
    /// Compiles the recognizer.
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern fails to compile.
    pub fn new() -> Result<Self, regex::Error> {
        let pattern = format!(
            r"(?: (?P<isTypedef> typedef ) \s+ )?
              struct (?: \s+ (?P<plainname> {IDENTIFIER} ) )?
              \s* \{{ [^}}]* \}} \s*
              (?: (?P<typename> {IDENTIFIER} ) \s* )?
              ;"
        );
        Ok(Self {
            engine: patterns::compile(&pattern)?,
        })
    }
}

impl Recognizer for StructureDefinition {
    fn name(&self) -> &'static str {
        NAME
    }

    fn recognize(&self, file: &SourceFile) -> Extraction {
        let mut extraction = Extraction::new();

        for captures in self.engine.captures_iter(file.text()) {
            let Some(whole) = captures.get(0) else {
                continue;
            };
            let raw = common::raw(whole);
            let location = file.locate_range(whole.range());
            let plain = captures.name("plainname");

            match (captures.name("isTypedef"), captures.name("typename")) {
                (None, _) => {
                    extraction.issues.push(
                        Issue::new(
                            IssueKind::TypedefStruct,
                            location.clone(),
                            "Unintentional implicit-type structure definition; insert 'typedef ' to silence this issue.",
                        )
                        .with_code("missing-struct-typedef"),
                    );
                    match plain {
                        Some(name) => extraction.declarations.push(common::declaration(
                            file,
                            &raw,
                            name,
                            DeclarationKind::Structure,
                        )),
                        None => extraction.issues.push(
                            Issue::new(
                                IssueKind::StructName,
                                location,
                                "Unintentional anonymous structure definition; add a name to silence this issue.",
                            )
                            .with_code("missing-struct-name"),
                        ),
                    }
                }
                (Some(_), None) => extraction.issues.push(
                    Issue::new(
                        IssueKind::StructName,
                        location,
                        "Typedef structure definition missing name argument; add the second name to silence this issue.",
                    )
                    .with_code("missing-struct-typename"),
                ),
                (Some(_), Some(typename)) => match plain {
                    Some(plain) if plain.as_str() != typename.as_str() => extraction.issues.push(
                        Issue::new(
                            IssueKind::StructName,
                            file.locate_range(plain.range()),
                            "Unintentional conflicting structure definition name; change the names to silence this issue.",
                        )
                        .with_code("conflicting-struct-name"),
                    ),
                    _ => extraction.declarations.push(common::declaration(
                        file,
                        &raw,
                        typename,
                        DeclarationKind::Structure,
                    )),
                },
            }
        }

        extraction
    }
}
