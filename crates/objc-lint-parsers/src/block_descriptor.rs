//! Block descriptors: `ReturnType (^name)(ParamType param, ...)`.

use crate::patterns::{self, group, list, IDENTIFIER, PREFIX_NULLABILITY};
use crate::type_descriptor::{self, Identifier, Inclusion, TypeDescriptor, TypeDescriptorParser};
use objc_lint_core::{Issue, SourceFile};
use regex::{Match, Regex};
use std::ops::Range;

/// A parsed block type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockDescriptor {
    /// The name between `(^` and `)`, when written.
    pub identifier: Option<Identifier>,
    /// What the block returns.
    pub return_type: TypeDescriptor,
    /// Parameter types, when the parameter list is not empty.
    pub parameters: Option<Vec<TypeDescriptor>>,
}

impl BlockDescriptor {
    /// Every type name in the block: return type, then parameters.
    #[must_use]
    pub fn identifiers(&self) -> Vec<&Identifier> {
        let mut identifiers = self.return_type.identifiers();
        for parameter in self.parameters.iter().flatten() {
            identifiers.extend(parameter.identifiers());
        }
        identifiers
    }
}

fn simple_type() -> String {
    type_descriptor::pattern(Inclusion::Excluded, Inclusion::Optional, Inclusion::Optional)
}

fn parameter() -> String {
    format!(r"{} (?: \s* {IDENTIFIER} )?", simple_type())
}

/// The block grammar for embedding in other patterns, without capture groups.
#[must_use]
pub fn pattern() -> String {
    build_pattern(false)
}

fn build_pattern(capture: bool) -> String {
    let return_type = group("returnType", &simple_type(), capture);
    let name = group("identifier", IDENTIFIER, capture);
    let parameters = group("parameters", &format!(r"{} \s*", list(&parameter())), capture);
    format!(
        r"{return_type} \s* \( (?: \s* NS_NOESCAPE )? \s* \^ \s* (?: (?: {PREFIX_NULLABILITY} | {name} ) \s* )? \)
          \s* \( \s* {parameters}? \)"
    )
}

/// Parses block types into [`BlockDescriptor`]s.
#[derive(Debug, Clone)]
pub struct BlockDescriptorParser {
    engine: Regex,
    parameters: Regex,
    types: TypeDescriptorParser,
}

impl BlockDescriptorParser {
    /// Compiles the block grammar.
    ///
    /// # Errors
    ///
    /// Returns an error if the grammar fails to compile.
    pub fn new() -> Result<Self, regex::Error> {
        let parameter = format!(
            r"(?P<type> {} ) (?: \s* {IDENTIFIER} )? \s* (?: , | \z )",
            simple_type()
        );
        Ok(Self {
            engine: patterns::compile(&format!("^ {} $", build_pattern(true)))?,
            parameters: patterns::compile(&parameter)?,
            types: TypeDescriptorParser::new()?,
        })
    }

    /// The type parser used for return and parameter types.
    #[must_use]
    pub fn types(&self) -> &TypeDescriptorParser {
        &self.types
    }

    /// Parses the block written in `range`.
    pub fn parse(
        &self,
        file: &SourceFile,
        range: Range<usize>,
        issues: &mut Vec<Issue>,
    ) -> Option<BlockDescriptor> {
        let text = file.slice(range.clone());
        let Some(captures) = self.engine.captures(text) else {
            issues.push(patterns::parsing_issue(
                file,
                range,
                format!("Cannot parse block descriptor from range '{text}'."),
            ));
            return None;
        };
        let base = range.start;
        let absolute = move |m: Match<'_>| base + m.start()..base + m.end();

        let identifier = captures
            .name("identifier")
            .map(|m| Identifier::new(m.as_str(), file.locate_range(absolute(m))));

        let Some(return_match) = captures.name("returnType") else {
            issues.push(patterns::missing_component(file, range, "block descriptor"));
            return None;
        };
        let Some(return_type) = self.types.parse(file, absolute(return_match), issues) else {
            issues.push(patterns::parsing_issue(
                file,
                range,
                "Cannot parse return type from block descriptor match.",
            ));
            return None;
        };

        let parameters = captures
            .name("parameters")
            .map(|m| self.parse_parameters(file, absolute(m), issues));

        Some(BlockDescriptor {
            identifier,
            return_type,
            parameters,
        })
    }

    fn parse_parameters(
        &self,
        file: &SourceFile,
        range: Range<usize>,
        issues: &mut Vec<Issue>,
    ) -> Vec<TypeDescriptor> {
        let mut parameters = Vec::new();
        for type_range in parameter_types(&self.parameters, file, range, issues) {
            if let Some(types) = self.types.safe_parse(file, type_range, issues) {
                parameters.extend(types);
            }
        }
        parameters
    }
}

/// Absolute ranges of the `type` group of each parameter matched in `range`.
fn parameter_types(
    parameter: &Regex,
    file: &SourceFile,
    range: Range<usize>,
    issues: &mut Vec<Issue>,
) -> Vec<Range<usize>> {
    let base = range.start;
    let absolute = move |m: Match<'_>| base + m.start()..base + m.end();
    let mut types = Vec::new();
    for captures in parameter.captures_iter(file.slice(range.clone())) {
        match (captures.name("type"), captures.get(0)) {
            (Some(m), _) => types.push(absolute(m)),
            (None, Some(whole)) => issues.push(patterns::missing_component(
                file,
                absolute(whole),
                "block parameter",
            )),
            (None, None) => {}
        }
    }
    types
}
