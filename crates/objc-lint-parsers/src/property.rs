//! Recognizer for property declarations.
//!
//! A property's type only has to be known by name, so its identifiers are
//! composition references: a forward declaration is enough for classes and
//! protocols.

use crate::block_descriptor::{self, BlockDescriptorParser};
use crate::common;
use crate::patterns::{self, list, IDENTIFIER};
use crate::type_descriptor::{self, Inclusion};
use objc_lint_core::{CompositionKind, Extraction, Recognizer, SourceFile};
use regex::Regex;

/// Recognizer name for property declarations.
pub const NAME: &str = "property-declaration";

/// Recognizes `@property` declarations of typed and block properties.
#[derive(Debug, Clone)]
pub struct PropertyDeclaration {
    engine: Regex,
    blocks: BlockDescriptorParser,
}

impl PropertyDeclaration {
    /// Compiles the recognizer.
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern fails to compile.
    pub fn new() -> Result<Self, regex::Error> {
        let pattern = format!(
            r"@property (?: \s | \s* \( \s* {attributes} \s* \) )
              (?: \s* IB (?: Outlet | Inspectable ) \s )?
              \s* (?: (?P<type> {type_pattern} ) \s* {IDENTIFIER} | (?P<block> {block_pattern} ) )
              (?: \s* {macros} | \s* {attribute} )*
              \s* ;",
            attributes = list(&patterns::property_attribute()),
            type_pattern = type_descriptor::pattern(
                Inclusion::Excluded,
                Inclusion::Optional,
                Inclusion::Optional
            ),
            block_pattern = block_descriptor::pattern(),
            macros = patterns::property_macros(),
            attribute = patterns::ATTRIBUTE,
        );
        Ok(Self {
            engine: patterns::compile(&pattern)?,
            blocks: BlockDescriptorParser::new()?,
        })
    }
}

impl Recognizer for PropertyDeclaration {
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

            if let Some(type_match) = captures.name("type") {
                match self
                    .blocks
                    .types()
                    .parse(file, type_match.range(), &mut extraction.issues)
                {
                    Some(descriptor) => extraction.references.extend(common::compositions(
                        &raw,
                        descriptor.identifiers(),
                        CompositionKind::Property,
                    )),
                    None => extraction.issues.push(patterns::parsing_issue(
                        file,
                        type_match.range(),
                        "Cannot parse type descriptor from property declaration match.",
                    )),
                }
            } else if let Some(block_match) = captures.name("block") {
                match self
                    .blocks
                    .parse(file, block_match.range(), &mut extraction.issues)
                {
                    Some(block) => extraction.references.extend(common::compositions(
                        &raw,
                        block.identifiers(),
                        CompositionKind::BlockSignature,
                    )),
                    None => extraction.issues.push(patterns::parsing_issue(
                        file,
                        block_match.range(),
                        "Cannot parse block descriptor from property declaration match.",
                    )),
                }
            } else {
                extraction.issues.push(patterns::missing_component(
                    file,
                    whole.range(),
                    "property declaration",
                ));
            }
        }

        extraction
    }
}
