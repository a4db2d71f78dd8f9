//! Recognizer for class interfaces.
//!
//! `@interface Name : Base <Protocol, ...>` declares `Name`, needs the full
//! declaration of `Base` and of every listed protocol.
//!
//! # Issues
//!
//! - `root-class`: an interface without a base class

use crate::common;
use crate::patterns::{self, identifier_list, IDENTIFIER};
use objc_lint_core::{
    DeclarationKind, Extraction, ImplementingKind, Issue, IssueKind, Recognizer, SourceFile,
};
use regex::Regex;

/// Recognizer name for class declarations.
pub const NAME: &str = "class-declaration";

/// Recognizes `@interface` declarations of classes.
#[derive(Debug, Clone)]
pub struct ClassDeclaration {
    engine: Regex,
}

impl ClassDeclaration {
    /// Compiles the recognizer.
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern fails to compile.
    pub fn new() -> Result<Self, regex::Error> {
        let pattern = format!(
            r"@interface \s+ (?P<class> {IDENTIFIER} ) \s*
              (?: : \s* (?P<baseclass> {IDENTIFIER} ) \s* )?
              (?: < \s* (?P<conformances> {list} ) \s* > \s* )?",
            list = identifier_list()
        );
        Ok(Self {
            engine: patterns::compile(&pattern)?,
        })
    }
}

impl Recognizer for ClassDeclaration {
    fn name(&self) -> &'static str {
        NAME
    }

    fn recognize(&self, file: &SourceFile) -> Extraction {
        let mut extraction = Extraction::new();

        for captures in self.engine.captures_iter(file.text()) {
            let Some(whole) = captures.get(0) else {
                continue;
            };
            // Categories, extensions and generic classes continue past the match.
            if matches!(
                patterns::next_non_space(file.text(), whole.end()),
                Some(':' | '<' | '(')
            ) {
                continue;
            }
            let raw = common::raw(whole);

            let Some(class) = captures.name("class") else {
                extraction.issues.push(patterns::missing_component(
                    file,
                    whole.range(),
                    "class declaration",
                ));
                continue;
            };
            extraction.declarations.push(common::declaration(
                file,
                &raw,
                class,
                DeclarationKind::Class,
            ));

            match captures.name("baseclass") {
                Some(base) => extraction.references.extend(common::implementing(
                    file,
                    &raw,
                    base,
                    ImplementingKind::Inheritance,
                )),
                None => extraction.issues.push(
                    Issue::new(
                        IssueKind::RootClass,
                        file.locate_range(whole.range()),
                        "Unintentional root class declaration; insert ' : NSObject ' to silence this issue.",
                    )
                    .with_code("root-class"),
                ),
            }

            if let Some(conformances) = captures.name("conformances") {
                extraction.references.extend(common::implementing(
                    file,
                    &raw,
                    conformances,
                    ImplementingKind::Conformance,
                ));
            }
        }

        extraction
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use objc_lint_core::TypeReference;

    fn recognize(source: &str) -> Extraction {
        ClassDeclaration::new()
            .unwrap()
            .recognize(&SourceFile::new("Classes.h", source))
    }

    fn references(extraction: &Extraction) -> Vec<(ImplementingKind, &str)> {
        extraction
            .references
            .iter()
            .map(|reference| match reference {
                TypeReference::Implementing(r) => (r.kind, r.identifier.as_str()),
                TypeReference::Composition(_) => panic!("unexpected composition"),
            })
            .collect()
    }

    #[test]
    fn derived_class_with_protocols() {
        let extraction = recognize(
            "@interface ExampleDerivedClassWithProtocols : ExampleRootClass <ExampleRootProtocol, UITableViewDelegate>\n@end\n",
        );

        assert_eq!(extraction.declarations.len(), 1);
        assert_eq!(
            extraction.declarations[0].identifier,
            "ExampleDerivedClassWithProtocols"
        );
        assert_eq!(extraction.declarations[0].kind, DeclarationKind::Class);
        assert_eq!(
            references(&extraction),
            vec![
                (ImplementingKind::Inheritance, "ExampleRootClass"),
                (ImplementingKind::Conformance, "ExampleRootProtocol"),
                (ImplementingKind::Conformance, "UITableViewDelegate"),
            ]
        );
        assert!(extraction.issues.is_empty());
    }

    #[test]
    fn multi_line_declaration() {
        let extraction = recognize(
            "@interface ExampleMultiLineClassWithProtocols\n                : NSObject\n                <ExampleProtocol, UITableViewDelegate>\n@end\n",
        );
        assert_eq!(extraction.declarations.len(), 1);
        assert_eq!(extraction.references.len(), 3);
        assert_eq!(extraction.references[0].location().line, 2);
    }

    #[test]
    fn root_class_is_reported() {
        let extraction = recognize("@interface ExampleRootClassWithProtocol <ExampleRootProtocol>\n");

        assert_eq!(extraction.declarations.len(), 1);
        assert_eq!(extraction.issues.len(), 1);
        let issue = &extraction.issues[0];
        assert_eq!(issue.kind, IssueKind::RootClass);
        assert_eq!(issue.code.as_deref(), Some("root-class"));
        insta::assert_snapshot!(issue.format_xcode(true), @"Classes.h:1:1: error: Unintentional root class declaration; insert ' : NSObject ' to silence this issue.  root-class");
    }

    #[test]
    fn categories_and_extensions_are_skipped() {
        let extraction = recognize(
            "@interface ExampleDerivedClass ()\n@interface ExampleDerivedClass (Category) <CategoryProtocol>\n",
        );
        assert!(extraction.declarations.is_empty());
        assert!(extraction.issues.is_empty());
    }

    #[test]
    fn one_line_class() {
        let extraction =
            recognize("@interface ExampleOneLineClass : NSObject @property BOOL isOneLine; @end\n");
        assert_eq!(extraction.declarations.len(), 1);
        assert_eq!(
            references(&extraction),
            vec![(ImplementingKind::Inheritance, "NSObject")]
        );
    }
}
