//! Recognizer for typedefs of named types: `typedef NSString *Name;`.
//!
//! The defined name is an alias whose kind is only known once the aliased
//! type is found elsewhere in the codebase. Qualified types such as
//! `NSArray<Foo *>` or `id<Delegate>` can only alias classes.

use crate::common;
use crate::patterns::{self, IDENTIFIER};
use crate::type_descriptor::{self, Inclusion, TypeDescriptorParser};
use objc_lint_core::{CompositionKind, DeclarationKind, Extraction, Recognizer, SourceFile};
use regex::Regex;

/// Recognizer name for arbitrary typedefs.
pub const NAME: &str = "arbitrary-typedef";

/// Recognizes typedefs that are not structure, enumeration or block definitions.
#[derive(Debug, Clone)]
pub struct ArbitraryTypedef {
    engine: Regex,
    types: TypeDescriptorParser,
}

impl ArbitraryTypedef {
    /// Compiles the recognizer.
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern fails to compile.
    pub fn new() -> Result<Self, regex::Error> {
        let pattern = format!(
            r"typedef \s+ (?P<sameas> {} ) \s* (?P<type> {IDENTIFIER} ) \s* ;",
            type_descriptor::pattern(Inclusion::Excluded, Inclusion::Optional, Inclusion::Optional)
        );
        Ok(Self {
            engine: patterns::compile(&pattern)?,
            types: TypeDescriptorParser::new()?,
        })
    }
}

impl Recognizer for ArbitraryTypedef {
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

            let (Some(sameas), Some(name)) = (captures.name("sameas"), captures.name("type"))
            else {
                extraction.issues.push(patterns::missing_component(
                    file,
                    whole.range(),
                    "arbitrary definition",
                ));
                continue;
            };
            let Some(aliased) = self
                .types
                .parse(file, sameas.range(), &mut extraction.issues)
            else {
                continue;
            };

            let kind = if aliased.is_qualified() {
                DeclarationKind::Class
            } else {
                DeclarationKind::ArbitraryAlias(aliased.identifier.name.clone())
            };
            extraction
                .declarations
                .push(common::declaration(file, &raw, name, kind));
            extraction.references.extend(common::compositions(
                &raw,
                aliased.identifiers(),
                CompositionKind::Arbitrary,
            ));
        }

        extraction
    }
}
