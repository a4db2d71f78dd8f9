//! Recognizer for method declarations.
//!
//! Methods with omitted labels or implicit `id` types are not matched.

use crate::block_descriptor::{self, BlockDescriptorParser};
use crate::common;
use crate::patterns::{self, IDENTIFIER};
use crate::type_descriptor::{self, Inclusion};
use objc_lint_core::{CompositionKind, Extraction, Recognizer, SourceFile};
use regex::Regex;
use std::ops::Range;

/// Recognizer name for method declarations.
pub const NAME: &str = "method-declaration";

/// Recognizes class and instance method declarations.
#[derive(Debug, Clone)]
pub struct MethodDeclaration {
    engine: Regex,
    parameters: Regex,
    blocks: BlockDescriptorParser,
}

fn parameter_pattern(capture: bool) -> String {
    let type_pattern =
        type_descriptor::pattern(Inclusion::Optional, Inclusion::Optional, Inclusion::Optional);
    format!(
        r"{IDENTIFIER} \s* : \s* \( \s* (?: {} | {} ) \s* \) \s* {IDENTIFIER}",
        patterns::group("type", &type_pattern, capture),
        patterns::group("block", &block_descriptor::pattern(), capture),
    )
}

impl MethodDeclaration {
    /// Compiles the recognizer.
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern fails to compile.
    pub fn new() -> Result<Self, regex::Error> {
        let pattern = format!(
            r"(?: \+ | - ) \s* \( \s* (?P<returntype> {return_type} ) \s* \) \s*
              (?: {IDENTIFIER}
                | (?P<parameters> {parameter} (?: \s+ {parameter} )* ) (?: \s* , \s* \.\.\. )?
              )
              (?: \s* {macros} | \s* {attribute} )*
              \s* ;",
            return_type = type_descriptor::pattern(
                Inclusion::Optional,
                Inclusion::Optional,
                Inclusion::Optional
            ),
            parameter = parameter_pattern(false),
            macros = patterns::method_macros(),
            attribute = patterns::ATTRIBUTE,
        );
        Ok(Self {
            engine: patterns::compile(&pattern)?,
            parameters: patterns::compile(&parameter_pattern(true))?,
            blocks: BlockDescriptorParser::new()?,
        })
    }

    fn parameter_references(
        &self,
        file: &SourceFile,
        raw: &str,
        range: Range<usize>,
        extraction: &mut Extraction,
    ) {
        let base = range.start;
        for captures in self.parameters.captures_iter(file.slice(range)) {
            let absolute = |m: regex::Match<'_>| base + m.start()..base + m.end();

            if let Some(type_match) = captures.name("type") {
                match self
                    .blocks
                    .types()
                    .parse(file, absolute(type_match), &mut extraction.issues)
                {
                    Some(descriptor) => extraction.references.extend(common::compositions(
                        raw,
                        descriptor.identifiers(),
                        CompositionKind::Method,
                    )),
                    None => extraction.issues.push(patterns::parsing_issue(
                        file,
                        absolute(type_match),
                        "Cannot parse type descriptor from method parameter match.",
                    )),
                }
            } else if let Some(block_match) = captures.name("block") {
                match self
                    .blocks
                    .parse(file, absolute(block_match), &mut extraction.issues)
                {
                    Some(block) => extraction.references.extend(common::compositions(
                        raw,
                        block.identifiers(),
                        CompositionKind::BlockSignature,
                    )),
                    None => extraction.issues.push(patterns::parsing_issue(
                        file,
                        absolute(block_match),
                        "Cannot parse block descriptor from method parameter match.",
                    )),
                }
            } else if let Some(whole) = captures.get(0) {
                extraction.issues.push(patterns::missing_component(
                    file,
                    absolute(whole),
                    "method parameter",
                ));
            }
        }
    }
}

impl Recognizer for MethodDeclaration {
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

            match captures.name("returntype") {
                Some(return_type) => {
                    if let Some(descriptor) = self.blocks.types().parse(
                        file,
                        return_type.range(),
                        &mut extraction.issues,
                    ) {
                        extraction.references.extend(common::compositions(
                            &raw,
                            descriptor.identifiers(),
                            CompositionKind::Method,
                        ));
                    }
                }
                None => extraction.issues.push(patterns::missing_component(
                    file,
                    whole.range(),
                    "method declaration",
                )),
            }

            if let Some(parameters) = captures.name("parameters") {
                self.parameter_references(file, &raw, parameters.range(), &mut extraction);
            }
        }

        extraction
    }
}
