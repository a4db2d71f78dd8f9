//! Recognizer for override pragmas.
//!
//! `#pragma LeanHeaders (need|have) (forward|import) (class|protocol|file) Name`
//! states a requirement or an availability the patterns cannot see, such as
//! a type provided by a macro. Everything a pragma produces is located at the
//! directive.

use crate::common;
use crate::patterns;
use objc_lint_core::{
    Availability, CompositionKind, CompositionReference, Config, DeclarationKind, Extraction,
    Forward, ForwardKind, ImplementingKind, ImplementingReference, Import, Recognizer, SourceFile,
    TypeDeclaration, TypeReference,
};
use regex::Regex;

/// Recognizer name for override pragmas.
pub const NAME: &str = "pragma-override";

/// Recognizes `#pragma <token> ...` override directives.
#[derive(Debug, Clone)]
pub struct PragmaOverride {
    engine: Regex,
}

impl PragmaOverride {
    /// Compiles the recognizer for the pragma token selected in `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern fails to compile.
    pub fn new(config: &Config) -> Result<Self, regex::Error> {
        let pattern = format!(
            r"\#pragma \s+ {} \s+ (?P<command> need | have ) \s+ (?P<availability> forward | import )
              \s+ (?P<metatype> class | protocol | file ) \s+ (?P<name> \S* )",
            regex::escape(config.pragma_token())
        );
        Ok(Self {
            engine: patterns::compile(&pattern)?,
        })
    }
}

impl Recognizer for PragmaOverride {
    fn name(&self) -> &'static str {
        NAME
    }

    fn recognize(&self, file: &SourceFile) -> Extraction {
        let mut extraction = Extraction::new();

        for captures in self.engine.captures_iter(file.text()) {
            let Some(whole) = captures.get(0) else {
                continue;
            };
            let (Some(command), Some(availability), Some(metatype), Some(name)) = (
                captures.name("command"),
                captures.name("availability"),
                captures.name("metatype"),
                captures.name("name"),
            ) else {
                extraction.issues.push(patterns::missing_component(
                    file,
                    whole.range(),
                    "pragma directive",
                ));
                continue;
            };
            let location = file.locate_range(whole.range());
            let raw = common::raw(whole);
            let identifier = name.as_str().to_string();

            match (command.as_str(), availability.as_str(), metatype.as_str()) {
                (_, "forward", "file") => extraction.issues.push(patterns::parsing_issue(
                    file,
                    whole.range(),
                    "Invalid pragma directive: there is no such thing as a forward file.",
                )),
                ("need", "import", "file") => {}
                ("need", "import", metatype) => {
                    let kind = if metatype == "class" {
                        ImplementingKind::Inheritance
                    } else {
                        ImplementingKind::Conformance
                    };
                    extraction
                        .references
                        .push(TypeReference::Implementing(ImplementingReference {
                            location,
                            raw,
                            kind,
                            identifier,
                        }));
                }
                ("need", _, _) => {
                    extraction
                        .references
                        .push(TypeReference::Composition(CompositionReference {
                            location,
                            raw,
                            kind: CompositionKind::Arbitrary,
                            identifier,
                        }));
                }
                (_, "import", "file") => {
                    extraction.availabilities.push(Availability::Import(Import {
                        location,
                        raw,
                        imports_file: identifier,
                    }));
                }
                (_, "import", metatype) => {
                    let kind = if metatype == "class" {
                        DeclarationKind::Class
                    } else {
                        DeclarationKind::Protocol
                    };
                    extraction.declarations.push(TypeDeclaration {
                        location,
                        raw,
                        kind,
                        identifier,
                    });
                }
                (_, _, metatype) => {
                    let kind = if metatype == "class" {
                        ForwardKind::Class
                    } else {
                        ForwardKind::Protocol
                    };
                    extraction.availabilities.push(Availability::Forward(Forward {
                        location,
                        raw,
                        kind,
                        identifier,
                    }));
                }
            }
        }

        extraction
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use objc_lint_core::IssueKind;

    fn recognize(config: &Config, source: &str) -> Extraction {
        PragmaOverride::new(config)
            .unwrap()
            .recognize(&SourceFile::new("Pragmas.h", source))
    }

    #[test]
    fn requirements() {
        let extraction = recognize(
            &Config::default(),
            "#pragma LeanHeaders need import class Base\n\
             #pragma LeanHeaders need import protocol Delegate\n\
             #pragma LeanHeaders need forward class Model\n\
             #pragma LeanHeaders need import file Generated.h\n",
        );

        let references: Vec<_> = extraction
            .references
            .iter()
            .map(|reference| match reference {
                TypeReference::Implementing(r) => (format!("{:?}", r.kind), r.identifier.as_str()),
                TypeReference::Composition(r) => (format!("{:?}", r.kind), r.identifier.as_str()),
            })
            .collect();
        assert_eq!(
            references,
            vec![
                ("Inheritance".to_string(), "Base"),
                ("Conformance".to_string(), "Delegate"),
                ("Arbitrary".to_string(), "Model"),
            ]
        );
        assert!(extraction.availabilities.is_empty());
        assert!(extraction.issues.is_empty());
        assert_eq!(extraction.references[2].location().line, 3);
        assert_eq!(extraction.references[2].location().column, 1);
    }

    #[test]
    fn availabilities() {
        let extraction = recognize(
            &Config::default(),
            "#pragma LeanHeaders have import file Generated.h\n\
             #pragma LeanHeaders have import class Macroed\n\
             #pragma LeanHeaders have forward protocol Promised\n\
             #pragma LeanHeaders have forward file Nope.h\n",
        );

        assert_eq!(extraction.declarations.len(), 1);
        assert_eq!(extraction.declarations[0].identifier, "Macroed");
        assert_eq!(extraction.declarations[0].kind, DeclarationKind::Class);
        assert_eq!(extraction.availabilities.len(), 2);
        assert!(matches!(
            &extraction.availabilities[0],
            Availability::Import(import) if import.imports_file == "Generated.h"
        ));
        assert!(matches!(
            &extraction.availabilities[1],
            Availability::Forward(forward) if forward.kind == ForwardKind::Protocol
        ));
        assert_eq!(extraction.issues.len(), 1);
        assert_eq!(extraction.issues[0].kind, IssueKind::Parsing);
    }

    #[test]
    fn unique_token() {
        let config = Config {
            unique_pragma: true,
            ..Config::default()
        };
        let source = "#pragma LeanHeaders have import class Short\n\
                      #pragma ca.brach.LeanHeaders have import class Unique\n";
        let extraction = recognize(&config, source);
        let declared: Vec<_> = extraction
            .declarations
            .iter()
            .map(|declaration| declaration.identifier.as_str())
            .collect();
        assert_eq!(declared, vec!["Unique"]);

        let short = recognize(&Config::default(), "#pragma ca.brach.LeanHeaders have import class Unique\n");
        assert!(short.declarations.is_empty());
    }
}
