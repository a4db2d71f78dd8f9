//! Recognizer for enumeration definitions.
//!
//! Accepts plain `enum`, `typedef enum`, and the Foundation macros
//! `NS_ENUM`, `NS_OPTIONS` and `NS_ERROR_ENUM`. The declared name comes from
//! the macro argument, then the typedef name, then the plain name.
//!
//! # Issues
//!
//! - `missing-enum-typedef`: no `typedef`
//! - `missing-enum-macro`: no Foundation macro, so the size is implicit
//! - `missing-enum-macroname`, `conflicting-enum-name`, `redundant-enum-name`:
//!   macro argument naming
//! - `missing-enum-typename`, `conflicting-enum-typename`: typedef naming
//! - `missing-enum-name`: an anonymous plain enumeration

use crate::common;
use crate::patterns::{self, IDENTIFIER};
use objc_lint_core::{DeclarationKind, Extraction, Issue, IssueKind, Recognizer, SourceFile};
use regex::Regex;

/// Recognizer name for enumeration definitions.
pub const NAME: &str = "enumeration-definition";

/// Recognizes `enum` and `NS_ENUM`-style definitions.
#[derive(Debug, Clone)]
pub struct EnumerationDefinition {
    engine: Regex,
}

impl EnumerationDefinition {
    /// Compiles the recognizer.
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern fails to compile.
    pub fn new() -> Result<Self, regex::Error> {
        let pattern = format!(
            r"(?: (?P<isTypedef> typedef ) \s+ )?
              (?: enum (?: \s* (?P<plainname> {IDENTIFIER} ) )? (?: \s* : \s* {IDENTIFIER} )?
                | (?P<macro> NS_ (?: (?: ERROR_ )? ENUM | OPTIONS ) )
                  \s* \( \s* {IDENTIFIER} \s* , \s* (?P<macroname> {IDENTIFIER} ) \s* \)
              ) \s*
              \{{ \s* [^}}]* \}} \s*
              (?: (?P<typename> {IDENTIFIER} ) \s* )?
              ;"
        );
        Ok(Self {
            engine: patterns::compile(&pattern)?,
        })
    }
}

fn enum_name(location: objc_lint_core::Location, message: &str, code: &str) -> Issue {
    Issue::new(IssueKind::EnumName, location, message).with_code(code)
}

impl Recognizer for EnumerationDefinition {
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
            let is_typedef = captures.name("isTypedef").is_some();
            let plain = captures.name("plainname");
            let typename = captures.name("typename");

            if !is_typedef {
                extraction.issues.push(
                    Issue::new(
                        IssueKind::TypedefEnum,
                        location.clone(),
                        "Unintentional implicit-type enumeration definition; insert 'typedef ' to silence this issue.",
                    )
                    .with_code("missing-enum-typedef"),
                );
            }

            let Some(macro_match) = captures.name("macro") else {
                extraction.issues.push(
                    Issue::new(
                        IssueKind::PlainEnum,
                        location.clone(),
                        "Unintentional implicit-size enumeration definition; use 'NS_(ENUM|OPTIONS)' to silence this issue.",
                    )
                    .with_code("missing-enum-macro"),
                );

                if is_typedef {
                    match (plain, typename) {
                        (_, None) => extraction.issues.push(enum_name(
                            location,
                            "Typedef enumeration definition missing name argument; add the second name to silence this issue.",
                            "missing-enum-typename",
                        )),
                        (Some(plain), Some(typename)) if plain.as_str() != typename.as_str() => {
                            extraction.issues.push(enum_name(
                                file.locate_range(plain.range()),
                                "Unintentional deviation of enumeration definition name; change the names to silence this issue.",
                                "conflicting-enum-typename",
                            ));
                        }
                        (_, Some(typename)) => extraction.declarations.push(common::declaration(
                            file,
                            &raw,
                            typename,
                            DeclarationKind::Enumeration,
                        )),
                    }
                } else {
                    match plain {
                        Some(plain) => extraction.declarations.push(common::declaration(
                            file,
                            &raw,
                            plain,
                            DeclarationKind::Enumeration,
                        )),
                        None => extraction.issues.push(enum_name(
                            location,
                            "Unintentional anonymous enumeration definition; add a name to silence this issue.",
                            "missing-enum-name",
                        )),
                    }
                }
                continue;
            };

            let Some(macroname) = captures.name("macroname") else {
                extraction.issues.push(enum_name(
                    file.locate_range(macro_match.range()),
                    "Macro enumeration definition missing name argument; add the second argument to silence this issue.",
                    "missing-enum-macroname",
                ));
                continue;
            };
            match typename {
                Some(typename) if typename.as_str() != macroname.as_str() => {
                    extraction.issues.push(enum_name(
                        file.locate_range(typename.range()),
                        "Unintentional conflicting enumeration definition name; remove the non-macro argument name to silence this issue.",
                        "conflicting-enum-name",
                    ));
                }
                _ => {
                    extraction.declarations.push(common::declaration(
                        file,
                        &raw,
                        macroname,
                        DeclarationKind::Enumeration,
                    ));
                    if let Some(typename) = typename {
                        extraction.issues.push(enum_name(
                            file.locate_range(typename.range()),
                            "Unintentional redundant enumeration definition name; remove the non-macro argument name to silence this issue.",
                            "redundant-enum-name",
                        ));
                    }
                }
            }
        }

        extraction
    }
}
