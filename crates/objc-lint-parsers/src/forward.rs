//! Recognizer for forward declarations: `@class A, B;` and `@protocol P;`.

use crate::common;
use crate::patterns::{self, identifier_list};
use objc_lint_core::{Availability, Extraction, Forward, ForwardKind, Recognizer, SourceFile};
use regex::Regex;

/// Recognizer name for forward declarations.
pub const NAME: &str = "forward-declaration";

/// Recognizes `@class` and `@protocol` forward declarations.
#[derive(Debug, Clone)]
pub struct ForwardDeclaration {
    engine: Regex,
}

impl ForwardDeclaration {
    /// Compiles the recognizer.
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern fails to compile.
    pub fn new() -> Result<Self, regex::Error> {
        let pattern = format!(
            r"@ (?P<metatype> class | protocol ) \s+ (?P<types> {} ) \s* ;",
            identifier_list()
        );
        Ok(Self {
            engine: patterns::compile(&pattern)?,
        })
    }
}

impl Recognizer for ForwardDeclaration {
    fn name(&self) -> &'static str {
        NAME
    }

    fn recognize(&self, file: &SourceFile) -> Extraction {
        let mut extraction = Extraction::new();

        for captures in self.engine.captures_iter(file.text()) {
            let Some(whole) = captures.get(0) else {
                continue;
            };
            let (Some(metatype), Some(types)) = (captures.name("metatype"), captures.name("types"))
            else {
                extraction.issues.push(patterns::missing_component(
                    file,
                    whole.range(),
                    "forward declaration",
                ));
                continue;
            };
            let kind = if metatype.as_str() == "class" {
                ForwardKind::Class
            } else {
                ForwardKind::Protocol
            };
            let raw = common::raw(whole);
            let location = file.locate_range(types.range());

            extraction
                .availabilities
                .extend(common::items(types.as_str()).map(|identifier| {
                    Availability::Forward(Forward {
                        location: location.clone(),
                        raw: raw.clone(),
                        kind,
                        identifier: identifier.to_string(),
                    })
                }));
        }

        extraction
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_section() {
        let extraction = ForwardDeclaration::new().unwrap().recognize(&SourceFile::new(
            "Forwards.h",
            "@class PromisedClass;\n\n@protocol PromisedProtocol;\n\n\
             @class MultiPromisedClassA, MultiPromisedClassB;\n\n\
             @protocol MultiPromisedProtocolA, MultiPromisedProtocolB;\n",
        ));

        let forwards: Vec<_> = extraction
            .availabilities
            .iter()
            .map(|availability| match availability {
                Availability::Forward(forward) => (forward.kind, forward.identifier.as_str()),
                Availability::Import(_) => panic!("unexpected import"),
            })
            .collect();
        assert_eq!(
            forwards,
            vec![
                (ForwardKind::Class, "PromisedClass"),
                (ForwardKind::Protocol, "PromisedProtocol"),
                (ForwardKind::Class, "MultiPromisedClassA"),
                (ForwardKind::Class, "MultiPromisedClassB"),
                (ForwardKind::Protocol, "MultiPromisedProtocolA"),
                (ForwardKind::Protocol, "MultiPromisedProtocolB"),
            ]
        );
        assert_eq!(extraction.availabilities[3].location().line, 5);
    }

    #[test]
    fn protocol_declarations_are_not_forwards() {
        let extraction = ForwardDeclaration::new()
            .unwrap()
            .recognize(&SourceFile::new("Forwards.h", "@protocol Delegate <NSObject>\n@end\n"));
        assert!(extraction.availabilities.is_empty());
    }
}
