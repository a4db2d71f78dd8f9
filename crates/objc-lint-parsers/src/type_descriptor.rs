//! Type descriptors: the named types inside an Objective-C type expression.
//!
//! `NSArray<NSDictionary<NSString *, id<Baz>> *> * _Nullable` describes the
//! primary type `NSArray` specified by `NSDictionary`, which is in turn
//! specified by `NSString` and by `id` conforming to `Baz`.
//!
//! Generic specifiers are captured greedily, so a single match can swallow
//! the neighbouring parameters of a block or method. Parsing detects the
//! unbalanced `>` that results and recovers the remaining descriptors.

use crate::patterns::{self, group, identifier_list, IDENTIFIER, POSTFIX_NULLABILITY, PREFIX_NULLABILITY};
use objc_lint_core::{Issue, Location, SourceFile};
use regex::{Match, Regex};
use std::ops::Range;

/// Whether a part of the type grammar is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inclusion {
    /// The part never matches.
    Excluded,
    /// The part may be present.
    Optional,
    /// The part must be present.
    Mandatory,
}

impl Inclusion {
    fn wrap(self, pattern: &str) -> String {
        match self {
            Self::Excluded => String::new(),
            Self::Optional => format!("(?: {pattern} )?"),
            Self::Mandatory => format!("(?: {pattern} )"),
        }
    }
}

/// A name found in a type expression, with where it was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier {
    /// The name itself.
    pub name: String,
    /// Where the name (or its enclosing list) was written.
    pub location: Location,
}

impl Identifier {
    /// Creates a new identifier.
    #[must_use]
    pub fn new(name: impl Into<String>, location: Location) -> Self {
        Self {
            name: name.into(),
            location,
        }
    }
}

/// A parsed type expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor {
    /// The primary type name.
    pub identifier: Identifier,
    /// Protocols in `Type<P, Q>`, when written.
    pub conformances: Option<Vec<Identifier>>,
    /// Generic arguments in `Type<A *, B *>`, when written.
    pub specifiers: Option<Vec<TypeDescriptor>>,
}

impl TypeDescriptor {
    /// Every name in the descriptor: primary, conformances, then specifiers depth first.
    #[must_use]
    pub fn identifiers(&self) -> Vec<&Identifier> {
        let mut identifiers = Vec::new();
        self.collect_identifiers(&mut identifiers);
        identifiers
    }

    fn collect_identifiers<'a>(&'a self, identifiers: &mut Vec<&'a Identifier>) {
        identifiers.push(&self.identifier);
        identifiers.extend(self.conformances.iter().flatten());
        for specifier in self.specifiers.iter().flatten() {
            specifier.collect_identifiers(identifiers);
        }
    }

    /// Whether the type carries protocol or generic qualification.
    #[must_use]
    pub fn is_qualified(&self) -> bool {
        self.conformances.is_some() || self.specifiers.is_some()
    }
}

/// The type grammar for embedding in other patterns, without capture groups.
///
/// `nullability` governs the prefix keywords (`nullable`, `nonnull`);
/// postfix qualifiers (`_Nullable`) are always accepted.
#[must_use]
pub fn pattern(nullability: Inclusion, conformance: Inclusion, generics: Inclusion) -> String {
    build_pattern(false, nullability, conformance, generics)
}

fn build_pattern(
    capture: bool,
    nullability: Inclusion,
    conformance: Inclusion,
    generics: Inclusion,
) -> String {
    let prefix = match nullability {
        Inclusion::Optional => Inclusion::Optional.wrap(&format!(
            r"(?: const (?: \s+ {PREFIX_NULLABILITY} )? | {PREFIX_NULLABILITY} (?: \s+ const )? ) \s+"
        )),
        Inclusion::Mandatory => Inclusion::Mandatory.wrap(&format!(
            r"(?: const \s+ {PREFIX_NULLABILITY} | {PREFIX_NULLABILITY} (?: \s+ const )? ) \s+"
        )),
        Inclusion::Excluded => Inclusion::Optional.wrap(r"const \s+"),
    };

    let postfix = Inclusion::Optional.wrap(&format!(
        r"\s* (?: const (?: \s+ {POSTFIX_NULLABILITY} )? | {POSTFIX_NULLABILITY} (?: \s+ const )? )"
    ));
    let indirection = format!(r"{postfix} (?: \s* \* {postfix} )*");

    let qualification = match (conformance, generics) {
        (Inclusion::Excluded, other) | (other, Inclusion::Excluded) => other,
        (Inclusion::Optional, Inclusion::Optional) => Inclusion::Optional,
        _ => Inclusion::Mandatory,
    };
    let conformances = match conformance {
        Inclusion::Excluded => String::new(),
        _ => group("conformances", &identifier_list(), capture) + r" \s*",
    };
    let specifiers = match generics {
        Inclusion::Excluded => String::new(),
        _ => group("genericSpecifiers", r"[A-Za-z0-9_\s<>:*,]*", capture),
    };
    let qualifiers =
        qualification.wrap(&format!(r"\s* < \s* (?: {conformances} | {specifiers} ) >"));

    let primary = group("primaryIdentifier", IDENTIFIER, capture);
    format!("{prefix} {primary} {qualifiers} {indirection}")
}

/// Parses type expressions into [`TypeDescriptor`]s.
#[derive(Debug, Clone)]
pub struct TypeDescriptorParser {
    engine: Regex,
}

impl TypeDescriptorParser {
    /// Compiles the type grammar.
    ///
    /// # Errors
    ///
    /// Returns an error if the grammar fails to compile.
    pub fn new() -> Result<Self, regex::Error> {
        let pattern = build_pattern(
            true,
            Inclusion::Optional,
            Inclusion::Optional,
            Inclusion::Optional,
        );
        Ok(Self {
            engine: patterns::compile(&format!("^ {pattern} $"))?,
        })
    }

    /// Parses the single type written in `range`.
    ///
    /// Recovery from ambiguous generics can yield several descriptors; the
    /// first is returned and the rest are reported.
    pub fn parse(
        &self,
        file: &SourceFile,
        range: Range<usize>,
        issues: &mut Vec<Issue>,
    ) -> Option<TypeDescriptor> {
        let descriptors = self.safe_parse(file, range.clone(), issues)?;
        if descriptors.len() > 1 {
            issues.push(patterns::parsing_issue(
                file,
                range.clone(),
                format!(
                    "Unexpectedly found multiple type descriptors in range '{}'.",
                    file.slice(range)
                ),
            ));
        }
        descriptors.into_iter().next()
    }

    /// Parses the types written in `range`, recovering from generic
    /// specifiers that swallowed a following comma-separated type.
    pub fn safe_parse(
        &self,
        file: &SourceFile,
        range: Range<usize>,
        issues: &mut Vec<Issue>,
    ) -> Option<Vec<TypeDescriptor>> {
        let text = file.slice(range.clone());
        let Some(captures) = self.engine.captures(text) else {
            issues.push(patterns::parsing_issue(
                file,
                range,
                format!("Cannot parse type descriptor from range '{text}'."),
            ));
            return None;
        };
        let base = range.start;
        let absolute = move |m: Match<'_>| base + m.start()..base + m.end();

        let Some(primary) = captures.name("primaryIdentifier") else {
            issues.push(patterns::parsing_issue(
                file,
                range,
                "Cannot parse primary identifier from type descriptor.",
            ));
            return None;
        };
        let identifier = Identifier::new(primary.as_str(), file.locate_range(absolute(primary)));

        let conformances = captures.name("conformances").map(|m| {
            let location = file.locate_range(absolute(m));
            m.as_str()
                .split(',')
                .map(|name| Identifier::new(name.trim(), location.clone()))
                .collect()
        });

        let mut recovery = None;
        let specifiers = match captures.name("genericSpecifiers") {
            Some(m) => {
                let (specifiers, rest) = self.parse_specifiers(file, absolute(m), range.end, issues);
                recovery = rest;
                Some(specifiers)
            }
            None => None,
        };

        let mut descriptors = vec![TypeDescriptor {
            identifier,
            conformances,
            specifiers,
        }];
        if let Some(rest) = recovery {
            descriptors.extend(self.recover(file, rest, issues));
        }
        Some(descriptors)
    }

    /// Splits generic arguments at top-level commas and parses each one.
    ///
    /// An unbalanced `>` means the greedy match ran past the end of this
    /// type; the arguments are cut there and the remainder of `whole_end` is
    /// returned for recovery.
    fn parse_specifiers(
        &self,
        file: &SourceFile,
        range: Range<usize>,
        whole_end: usize,
        issues: &mut Vec<Issue>,
    ) -> (Vec<TypeDescriptor>, Option<Range<usize>>) {
        let text = file.text();
        let mut specifiers = Vec::new();
        let mut depth = 0usize;
        let mut segment_start = range.start;
        let mut end = range.end;
        let mut recovery = None;

        for (offset, character) in file.slice(range.clone()).char_indices() {
            let position = range.start + offset;
            match (character, depth) {
                (',', 0) => {
                    let segment_end =
                        segment_start + file.slice(segment_start..position).trim_end().len();
                    specifiers.extend(
                        self.safe_parse(file, segment_start..segment_end, issues)
                            .unwrap_or_default(),
                    );
                    segment_start = patterns::skip_whitespace(text, position + 1, range.end);
                }
                ('>', 0) => {
                    issues.push(
                        patterns::parsing_issue(
                            file,
                            range.clone(),
                            "Ambiguous type descriptor generic specifier, will attempt to recover.",
                        )
                        .as_note(),
                    );
                    end = position;
                    recovery = Some(position..whole_end);
                    break;
                }
                ('<', _) => depth += 1,
                ('>', _) => depth -= 1,
                _ => {}
            }
        }

        if depth == 0 {
            let segment_end = segment_start + file.slice(segment_start..end).trim_end().len();
            specifiers.extend(
                self.safe_parse(file, segment_start..segment_end, issues)
                    .unwrap_or_default(),
            );
        } else {
            issues.push(patterns::parsing_issue(
                file,
                range,
                "Improperly nested generic arguments.",
            ));
        }
        (specifiers, recovery)
    }

    /// Parses whatever follows the next comma in `rest`.
    fn recover(
        &self,
        file: &SourceFile,
        rest: Range<usize>,
        issues: &mut Vec<Issue>,
    ) -> Vec<TypeDescriptor> {
        // The cut is made at the first unbalanced `>`, so no generic
        // argument list is open before the next comma.
        let Some(comma) = file.slice(rest.clone()).find(',') else {
            return Vec::new();
        };
        let start = patterns::skip_whitespace(file.text(), rest.start + comma + 1, rest.end);
        match self.safe_parse(file, start..rest.end, issues) {
            Some(recovered) if !recovered.is_empty() => recovered,
            _ => {
                issues.push(patterns::parsing_issue(
                    file,
                    start..rest.end,
                    "Unable to recover from ambiguous type descriptor list.",
                ));
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use objc_lint_core::Severity;

    fn parser() -> TypeDescriptorParser {
        TypeDescriptorParser::new().unwrap()
    }

    fn names(descriptor: &TypeDescriptor) -> Vec<&str> {
        descriptor
            .identifiers()
            .into_iter()
            .map(|identifier| identifier.name.as_str())
            .collect()
    }

    fn parse_all(source: &str) -> (Vec<TypeDescriptor>, Vec<Issue>) {
        let file = SourceFile::new("Types.h", source);
        let mut issues = Vec::new();
        let descriptors = parser()
            .safe_parse(&file, 0..source.len(), &mut issues)
            .unwrap_or_default();
        (descriptors, issues)
    }

    /// Runs the grammar the way a recognizer embeds it: `@test <type> name;`.
    fn descriptors_in(source: &str) -> Vec<Vec<String>> {
        let type_pattern = pattern(Inclusion::Optional, Inclusion::Optional, Inclusion::Optional);
        let harness = patterns::compile(&format!(
            r"@test \s (?P<type> {type_pattern} ) \s* {IDENTIFIER} ;"
        ))
        .unwrap();
        let file = SourceFile::new("ExampleDescriptors.h", source);
        let parser = parser();
        let mut issues = Vec::new();
        let found = harness
            .captures_iter(source)
            .map(|captures| {
                let m = captures.name("type").unwrap();
                let descriptor = parser.parse(&file, m.range(), &mut issues).unwrap();
                names(&descriptor).into_iter().map(String::from).collect()
            })
            .collect();
        assert!(
            issues.iter().all(|issue| issue.severity == Severity::Note),
            "{issues:?}"
        );
        found
    }

    #[test]
    fn constant_qualifiers() {
        let found = descriptors_in(
            "@test ConstType * const varname;
             @test const PreConstType *varname;
             @test InfixConstType const *varname;
             @test ConstTypeNoSpace*const varname;
             @test IndirectedConstType *const *varname;
             @test ConstIndirectionType **const varname;
             @test DoubleConstType * const * const varname;",
        );
        let primaries: Vec<_> = found.iter().map(|names| names.join(" ")).collect();
        assert_eq!(
            primaries,
            vec![
                "ConstType",
                "PreConstType",
                "InfixConstType",
                "ConstTypeNoSpace",
                "IndirectedConstType",
                "ConstIndirectionType",
                "DoubleConstType",
            ]
        );
    }

    #[test]
    fn nullability_qualifiers() {
        let found = descriptors_in(
            "@test NullableType * _Nullable varname;
             @test NullableTypeNoSpace*_Nullable varname;
             @test id<NullableProtocol> _Nullable varname;
             @test NonNullType * _Nonnull varname;
             @test NullUnspecifiedType * _Null_unspecified varname;
             @test NullableIndirectedType * _Nullable * _Nullable varname;
             @test NonNullConstType * _Nonnull const varname;
             @test nullable PrefixNullableType *varname;",
        );
        assert_eq!(found.len(), 8);
        assert_eq!(found[2], vec!["id", "NullableProtocol"]);
        assert_eq!(found[7], vec!["PrefixNullableType"]);
    }

    #[test]
    fn conformances() {
        let found = descriptors_in(
            "@test ConformingType<Protocol> *varname;
             @test MultiConformingType<Protocol, AnotherProtocol> *varname;",
        );
        assert_eq!(
            found,
            vec![
                vec!["ConformingType", "Protocol"],
                vec!["MultiConformingType", "Protocol", "AnotherProtocol"],
            ]
        );
    }

    #[test]
    fn generic_specification() {
        let found = descriptors_in(
            "@test GenericType<SpecifingType *> *varname;
             @test NullableGenericType<SpecifingType * _Nullable> *varname;
             @test ConstGenericType<SpecifingType * const> *varname;
             @test MultiGenericType< SpecifingType*, AnotherSpecifyingType* > *varname;
             @test NestedGenericType< SpecifingType<NestedSpecifier*> * > *varname;
             @test MultiNestedGenericType< SpecifingTypeA<NestedSpecifierA*> *, SpecifingTypeB<NestedSpecifierB*> * > *varname;
             @test NestedConformanceGenericType<SpecifingType<WithConformance>*> *varname;
             @test MultiConformingGenericType< SpecifingType<WithConformance>*, AnotherSpecifyingType* > *varname;",
        );
        assert_eq!(found.len(), 8);
        assert_eq!(found[0], vec!["GenericType", "SpecifingType"]);
        assert_eq!(
            found[3],
            vec!["MultiGenericType", "SpecifingType", "AnotherSpecifyingType"]
        );
        assert_eq!(
            found[5],
            vec![
                "MultiNestedGenericType",
                "SpecifingTypeA",
                "NestedSpecifierA",
                "SpecifingTypeB",
                "NestedSpecifierB",
            ]
        );
        assert_eq!(
            found[6],
            vec!["NestedConformanceGenericType", "SpecifingType", "WithConformance"]
        );
    }

    #[test]
    fn nested_generics_and_conformances_flatten_depth_first() {
        let (descriptors, issues) = parse_all("NSArray<NSDictionary<NSString*, id<Baz>>*>");
        assert!(issues.is_empty(), "{issues:?}");
        assert_eq!(descriptors.len(), 1);
        assert_eq!(
            names(&descriptors[0]),
            vec!["NSArray", "NSDictionary", "NSString", "id", "Baz"]
        );
    }

    #[test]
    fn recovers_types_swallowed_by_greedy_generics() {
        let (descriptors, issues) = parse_all("NSArray<Foo *> *a, NSDictionary<K *, V *> *");
        assert_eq!(descriptors.len(), 2);
        assert_eq!(names(&descriptors[0]), vec!["NSArray", "Foo"]);
        assert_eq!(names(&descriptors[1]), vec!["NSDictionary", "K", "V"]);

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Note);
        assert_eq!(
            issues[0].message,
            "Ambiguous type descriptor generic specifier, will attempt to recover."
        );
    }

    #[test]
    fn keeps_descriptors_when_recovery_fails() {
        let (descriptors, issues) = parse_all("A<X *> *a, *b<Y *> *");
        assert_eq!(descriptors.len(), 1);
        assert_eq!(names(&descriptors[0]), vec!["A", "X"]);

        let unrecovered: Vec<_> = issues
            .iter()
            .filter(|issue| issue.message == "Unable to recover from ambiguous type descriptor list.")
            .collect();
        assert_eq!(unrecovered.len(), 1, "{issues:?}");
        assert_eq!(unrecovered[0].severity, Severity::Warning);
    }

    #[test]
    fn unbalanced_generics_keep_primary_identifier() {
        let (descriptors, issues) = parse_all("Foo<Bar<Baz *>");
        assert_eq!(descriptors.len(), 1);
        assert_eq!(names(&descriptors[0]), vec!["Foo"]);

        assert_eq!(issues.len(), 1, "{issues:?}");
        assert_eq!(issues[0].message, "Improperly nested generic arguments.");
        assert_eq!(issues[0].severity, Severity::Warning);
    }

    #[test]
    fn parse_reports_extra_descriptors() {
        let source = "NSArray<Foo *> *a, Bar<Baz *> *";
        let file = SourceFile::new("Types.h", source);
        let mut issues = Vec::new();
        let descriptor = parser().parse(&file, 0..source.len(), &mut issues).unwrap();

        assert_eq!(names(&descriptor), vec!["NSArray", "Foo"]);
        assert!(issues.iter().any(|issue| issue.message
            == "Unexpectedly found multiple type descriptors in range 'NSArray<Foo *> *a, Bar<Baz *> *'."));
    }

    #[test]
    fn unparsable_range_is_reported() {
        let (descriptors, issues) = parse_all("* Foo");
        assert!(descriptors.is_empty());
        assert_eq!(issues.len(), 1);
        assert_eq!(
            issues[0].message,
            "Cannot parse type descriptor from range '* Foo'."
        );
    }

    #[test]
    fn identifiers_carry_locations() {
        let (descriptors, _) = parse_all("Outer<Inner *>");
        let identifiers = descriptors[0].identifiers();
        assert_eq!(identifiers[0].location.column, 1);
        assert_eq!(identifiers[1].location.column, 7);
    }

    #[test]
    fn mandatory_qualification() {
        let regex = patterns::compile(&format!(
            "^ {} $",
            pattern(Inclusion::Excluded, Inclusion::Mandatory, Inclusion::Excluded)
        ))
        .unwrap();
        assert!(regex.is_match("id<Foo>"));
        assert!(!regex.is_match("id"));
        assert!(!regex.is_match("NSArray<Foo *>"));
    }
}
