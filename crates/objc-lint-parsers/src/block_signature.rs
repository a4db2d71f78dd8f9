//! Recognizer for block signature typedefs: `typedef void (^Handler)(id value);`.

use crate::block_descriptor::{self, BlockDescriptorParser};
use crate::common;
use crate::patterns;
use objc_lint_core::{
    CompositionKind, DeclarationKind, Extraction, Recognizer, SourceFile, TypeDeclaration,
};
use regex::Regex;

/// Recognizer name for block signature definitions.
pub const NAME: &str = "block-signature-definition";

/// Recognizes typedefs of block types.
#[derive(Debug, Clone)]
pub struct BlockSignatureDefinition {
    engine: Regex,
    blocks: BlockDescriptorParser,
}

impl BlockSignatureDefinition {
    /// Compiles the recognizer.
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern fails to compile.
    pub fn new() -> Result<Self, regex::Error> {
        let pattern = format!(
            r"typedef \s+ (?P<signature> {} ) \s* ;",
            block_descriptor::pattern()
        );
        Ok(Self {
            engine: patterns::compile(&pattern)?,
            blocks: BlockDescriptorParser::new()?,
        })
    }
}

impl Recognizer for BlockSignatureDefinition {
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

            let Some(signature) = captures.name("signature") else {
                extraction.issues.push(patterns::missing_component(
                    file,
                    whole.range(),
                    "closure signature definition",
                ));
                continue;
            };
            let Some(block) = self
                .blocks
                .parse(file, signature.range(), &mut extraction.issues)
            else {
                continue;
            };
            let Some(identifier) = &block.identifier else {
                extraction.issues.push(patterns::missing_component(
                    file,
                    whole.range(),
                    "closure signature definition",
                ));
                continue;
            };

            extraction.declarations.push(TypeDeclaration {
                location: identifier.location.clone(),
                raw: raw.clone(),
                kind: DeclarationKind::BlockSignature,
                identifier: identifier.name.clone(),
            });
            extraction.references.extend(common::compositions(
                &raw,
                block.identifiers(),
                CompositionKind::BlockSignature,
            ));
        }

        extraction
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use objc_lint_core::IssueKind;

    fn recognize(source: &str) -> Extraction {
        BlockSignatureDefinition::new()
            .unwrap()
            .recognize(&SourceFile::new("Blocks.h", source))
    }

    #[test]
    fn declares_signature_and_references_its_types() {
        let extraction =
            recognize("typedef void (^CompletionHandler)(NSData * _Nullable data, NSError *error);\n");

        assert_eq!(extraction.declarations.len(), 1);
        let declaration = &extraction.declarations[0];
        assert_eq!(declaration.identifier, "CompletionHandler");
        assert_eq!(declaration.kind, DeclarationKind::BlockSignature);
        assert_eq!(declaration.location.column, 16);

        let identifiers: Vec<_> = extraction
            .references
            .iter()
            .map(|reference| reference.identifier())
            .collect();
        assert_eq!(identifiers, vec!["void", "NSData", "NSError"]);
    }

    #[test]
    fn anonymous_signature_is_reported() {
        let extraction = recognize("typedef void (^)(int);");
        assert!(extraction.declarations.is_empty());
        assert_eq!(extraction.issues.len(), 1);
        assert_eq!(extraction.issues[0].kind, IssueKind::Parsing);
        assert_eq!(
            extraction.issues[0].message,
            "Missing non-optional component from closure signature definition match."
        );
    }

    #[test]
    fn plain_typedefs_are_ignored() {
        let extraction = recognize("typedef NSString *Name;\n");
        assert!(extraction.declarations.is_empty());
        assert!(extraction.references.is_empty());
    }
}
