//! Recognizer for protocol declarations.
//!
//! `@protocol Name <Incorporated, ...>` declares `Name` and needs the full
//! declaration of every incorporated protocol. `@protocol A, B;` is a forward
//! declaration and is not matched here.
//!
//! # Issues
//!
//! - `root-protocol`: a protocol that incorporates nothing

use crate::common;
use crate::patterns::{self, identifier_list, IDENTIFIER};
use objc_lint_core::{
    DeclarationKind, Extraction, ImplementingKind, Issue, IssueKind, Recognizer, SourceFile,
};
use regex::Regex;

/// Recognizer name for protocol declarations.
pub const NAME: &str = "protocol-declaration";

/// Recognizes `@protocol` declarations.
#[derive(Debug, Clone)]
pub struct ProtocolDeclaration {
    engine: Regex,
}

impl ProtocolDeclaration {
    /// Compiles the recognizer.
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern fails to compile.
    pub fn new() -> Result<Self, regex::Error> {
        let pattern = format!(
            r"@protocol \s+ (?P<protocol> {IDENTIFIER} ) \s*
              (?: < \s* (?P<incorporates> {list} ) \s* > \s* )?",
            list = identifier_list()
        );
        Ok(Self {
            engine: patterns::compile(&pattern)?,
        })
    }
}

impl Recognizer for ProtocolDeclaration {
    fn name(&self) -> &'static str {
        NAME
    }

    fn recognize(&self, file: &SourceFile) -> Extraction {
        let mut extraction = Extraction::new();

        for captures in self.engine.captures_iter(file.text()) {
            let Some(whole) = captures.get(0) else {
                continue;
            };
            if matches!(
                patterns::next_non_space(file.text(), whole.end()),
                Some('<' | ',' | ';')
            ) {
                continue;
            }
            let raw = common::raw(whole);

            let Some(protocol) = captures.name("protocol") else {
                extraction.issues.push(patterns::missing_component(
                    file,
                    whole.range(),
                    "protocol declaration",
                ));
                continue;
            };
            extraction.declarations.push(common::declaration(
                file,
                &raw,
                protocol,
                DeclarationKind::Protocol,
            ));

            match captures.name("incorporates") {
                Some(incorporates) => extraction.references.extend(common::implementing(
                    file,
                    &raw,
                    incorporates,
                    ImplementingKind::Conformance,
                )),
                None => extraction.issues.push(
                    Issue::new(
                        IssueKind::RootProtocol,
                        file.locate_range(whole.range()),
                        "Unintentional root protocol declaration; insert ' <NSObject> ' to silence this issue.",
                    )
                    .with_code("root-protocol"),
                ),
            }
        }

        extraction
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recognize(source: &str) -> Extraction {
        ProtocolDeclaration::new()
            .unwrap()
            .recognize(&SourceFile::new("Protocols.h", source))
    }

    #[test]
    fn protocol_section() {
        let extraction = recognize(
            "@protocol ExampleRootProtocol\n@end\n\n\
             @protocol ExampleProtocol <ExampleRootProtocol >\n@end\n\n\
             @protocol ExampleProtocolWithProtocols <ExampleRootProtocol, UITableViewDelegate>\n@end\n\n\
             @protocol ExampleOneLineProtocol <ExampleRootProtocol> @end\n\n\
             @protocol ExampleMultiLineProtocol\n            <ExampleRootProtocol>\n@end\n",
        );

        assert_eq!(extraction.declarations.len(), 5);
        assert_eq!(extraction.references.len(), 5);
        assert_eq!(extraction.issues.len(), 1);
        assert_eq!(extraction.issues[0].kind, IssueKind::RootProtocol);
        assert_eq!(extraction.issues[0].code.as_deref(), Some("root-protocol"));
    }

    #[test]
    fn forward_declarations_are_skipped() {
        let extraction = recognize("@protocol PromisedProtocol;\n@protocol A, B;\n");
        assert!(extraction.declarations.is_empty());
        assert!(extraction.issues.is_empty());
    }
}
