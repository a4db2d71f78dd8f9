//! Availability resolution: reconciles references with the declarations and
//! availabilities of the codebase, then reports what is missing or redundant.

use crate::codebase::{Codebase, Model};
use crate::config::Config;
use crate::model::{
    Availability, DeclarationKind, Forward, Import, TypeDeclaration, TypeReference, UsageLevel,
};
use crate::types::{Issue, IssueKind, Location, Suggestion};

use std::path::Path;
use std::time::Instant;
use tracing::debug;

impl Codebase {
    /// Checks every reference, then sweeps the availabilities for redundancy.
    ///
    /// Returns the issues found during extraction, model building and
    /// resolution, with severities resolved by `config` and ignored issues
    /// removed. Issues are handed out once; a second call only reports the
    /// redundancy sweep again.
    pub fn check_issues(&mut self, config: &Config) -> Vec<Issue> {
        let model = self.model();
        let mut issues = std::mem::take(&mut model.issues);

        let started = Instant::now();
        let references = std::mem::take(&mut model.references);
        for reference in &references {
            model.check_reference(reference, &mut issues);
        }
        debug!(
            "Checking {} references took {:?}",
            references.len(),
            started.elapsed()
        );
        model.references = references;

        let started = Instant::now();
        model.sweep(&mut issues);
        debug!("Checking availabilities took {:?}", started.elapsed());

        config.apply(issues)
    }
}

/// A declaration is visible to everything on later lines of its own file.
fn trivially_visible(declaration: &TypeDeclaration, location: &Location) -> bool {
    declaration.location.file == location.file && declaration.location.line < location.line
}

impl Model {
    fn check_reference(&mut self, reference: &TypeReference, issues: &mut Vec<Issue>) {
        match reference {
            TypeReference::Implementing(r) => {
                // Names declared outside the codebase are not our concern.
                let Some(declaration) = self
                    .declarations(&r.identifier)
                    .iter()
                    .find(|d| r.kind.accepts(&d.kind))
                    .cloned()
                else {
                    return;
                };
                if !self.is_full(&declaration, reference, issues) {
                    issues.push(
                        Issue::new(
                            IssueKind::MissingImport,
                            r.location.clone(),
                            format!(
                                "Missing import of \"{}\" for {} {} used in {} declaration.",
                                declaration.location.file_name(),
                                declaration.kind,
                                r.identifier,
                                r.kind
                            ),
                        )
                        .with_code("need-import-for-inheritance"),
                    );
                }
            }
            TypeReference::Composition(r) => {
                let Some(declaration) = self.declarations(&r.identifier).first().cloned() else {
                    return;
                };
                match &declaration.kind {
                    DeclarationKind::Structure
                    | DeclarationKind::Enumeration
                    | DeclarationKind::BlockSignature => {
                        if !self.is_full(&declaration, reference, issues) {
                            issues.push(
                                Issue::new(
                                    IssueKind::MissingImport,
                                    r.location.clone(),
                                    format!(
                                        "Missing import of \"{}\" for {} {} used as {} type.",
                                        declaration.location.file_name(),
                                        declaration.kind,
                                        r.identifier,
                                        r.kind
                                    ),
                                )
                                .with_code("need-import-for-typedef"),
                            );
                        }
                    }
                    DeclarationKind::ArbitraryAlias(of) => issues.push(Issue::new(
                        IssueKind::Internal,
                        declaration.location.clone(),
                        format!(
                            "Could not find declaration of {of} to deduce metatype of {}.",
                            declaration.identifier
                        ),
                    )),
                    DeclarationKind::Class | DeclarationKind::Protocol => {
                        if !self.is_forward(&declaration, reference) {
                            let code = if declaration.kind == DeclarationKind::Class {
                                "need-forward-class"
                            } else {
                                "need-forward-protocol"
                            };
                            issues.push(
                                Issue::new(
                                    IssueKind::MissingForward,
                                    r.location.clone(),
                                    format!(
                                        "Missing forward declaration of {} {} used as {} type.",
                                        declaration.kind, r.identifier, r.kind
                                    ),
                                )
                                .with_code(code),
                            );
                        }
                    }
                }
            }
        }
    }

    /// Whether `declaration` is fully available where `reference` uses it.
    fn is_full(
        &mut self,
        declaration: &TypeDeclaration,
        reference: &TypeReference,
        issues: &mut Vec<Issue>,
    ) -> bool {
        let location = reference.location();
        if trivially_visible(declaration, location) {
            return true;
        }
        let declaring_file = declaration.location.file_name();
        self.enumerate_availabilities(
            &location.file,
            |import| {
                if import.target_file_name() == declaring_file {
                    UsageLevel::Needed
                } else {
                    UsageLevel::NotReferenced
                }
            },
            |forward| {
                if let TypeReference::Implementing(r) = reference {
                    if forward.identifier == r.identifier && r.kind.accepts_forward(forward.kind) {
                        issues.push(
                            Issue::new(
                                IssueKind::MissingImport,
                                forward.location.clone(),
                                format!(
                                    "Found forward declaration when full declaration is needed for reference on line {}",
                                    r.location.line
                                ),
                            )
                            .with_code("need-import-not-forward")
                            .as_note(),
                        );
                    }
                }
                false
            },
        )
    }

    /// Whether `declaration` is at least shallowly available where `reference` uses it.
    fn is_forward(&mut self, declaration: &TypeDeclaration, reference: &TypeReference) -> bool {
        let location = reference.location();
        if trivially_visible(declaration, location) {
            return true;
        }
        let declaring_file = declaration.location.file_name();
        self.enumerate_availabilities(
            &location.file,
            |import| {
                if import.target_file_name() == declaring_file {
                    UsageLevel::Used
                } else {
                    UsageLevel::NotReferenced
                }
            },
            |forward| {
                matches!(reference, TypeReference::Composition(r) if r.identifier == forward.identifier)
                    && forward.kind.matches(&declaration.kind)
            },
        )
    }

    /// Scans the availabilities of `file` in source order, raising the usage
    /// of each match.
    ///
    /// Stops at the first availability the reference needs. Otherwise
    /// reports whether any availability was used along the way.
    fn enumerate_availabilities(
        &mut self,
        file: &Path,
        mut import_level: impl FnMut(&Import) -> UsageLevel,
        mut forward_matches: impl FnMut(&Forward) -> bool,
    ) -> bool {
        let Some(entries) = self.availabilities.get_mut(file) else {
            return false;
        };
        let mut satisfied = false;
        for entry in entries {
            let level = match &entry.availability {
                Availability::Import(import) => import_level(import),
                Availability::Forward(forward) if forward_matches(forward) => UsageLevel::Needed,
                Availability::Forward(_) => UsageLevel::NotReferenced,
            };
            match level {
                UsageLevel::Needed => {
                    entry.raise(level);
                    return true;
                }
                UsageLevel::Used => {
                    entry.raise(level);
                    satisfied = true;
                }
                UsageLevel::NotReferenced => {}
            }
        }
        satisfied
    }

    /// Reports every availability that no reference needed.
    fn sweep(&self, issues: &mut Vec<Issue>) {
        let mut files: Vec<_> = self.availabilities.iter().collect();
        files.sort_by(|a, b| a.0.cmp(b.0));

        for (_, entries) in files {
            for entry in entries {
                match (&entry.availability, entry.usage) {
                    (_, UsageLevel::Needed) => {}
                    (Availability::Import(import), UsageLevel::NotReferenced) => issues.push(
                        Issue::new(
                            IssueKind::RedundantImport,
                            import.location.clone(),
                            format!("Unnecessary import of file {}.", import.imports_file),
                        )
                        .with_code("not-needed-import"),
                    ),
                    (Availability::Forward(forward), UsageLevel::NotReferenced) => issues.push(
                        Issue::new(
                            IssueKind::RedundantForward,
                            forward.location.clone(),
                            format!(
                                "Unnecessary forward declaration of {} {}.",
                                forward.kind, forward.identifier
                            ),
                        )
                        .with_code("not-needed-forward"),
                    ),
                    (Availability::Import(import), UsageLevel::Used) => issues.push(
                        Issue::new(
                            IssueKind::RedundantImport,
                            import.location.clone(),
                            format!(
                                "Unnecessary import of file {} when only forward declarations are needed.",
                                import.imports_file
                            ),
                        )
                        .with_code("need-forward-not-import")
                        .with_suggestion(Suggestion::new(
                            "replace the import with a forward declaration",
                        )),
                    ),
                    // Only imports are ever marked as merely used.
                    (Availability::Forward(forward), UsageLevel::Used) => issues.push(Issue::new(
                        IssueKind::Internal,
                        forward.location.clone(),
                        format!(
                            "Forward declaration of {} {} was used without being needed.",
                            forward.kind, forward.identifier
                        ),
                    )),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        CompositionKind, CompositionReference, Extraction, ForwardKind, ImplementingKind,
        ImplementingReference,
    };
    use crate::types::Severity;
    use std::path::PathBuf;

    fn at(file: &str, line: usize) -> Location {
        Location::new(PathBuf::from(file), line, 1)
    }

    struct Fixture {
        headers: Vec<PathBuf>,
        extraction: Extraction,
    }

    impl Fixture {
        fn new(headers: &[&str]) -> Self {
            Self {
                headers: headers.iter().map(PathBuf::from).collect(),
                extraction: Extraction::new(),
            }
        }

        fn declare(mut self, file: &str, line: usize, kind: DeclarationKind, name: &str) -> Self {
            self.extraction.declarations.push(TypeDeclaration {
                location: at(file, line),
                raw: String::new(),
                kind,
                identifier: name.into(),
            });
            self
        }

        fn import(mut self, file: &str, line: usize, target: &str) -> Self {
            self.extraction
                .availabilities
                .push(Availability::Import(Import {
                    location: at(file, line),
                    raw: String::new(),
                    imports_file: target.into(),
                }));
            self
        }

        fn forward(mut self, file: &str, line: usize, kind: ForwardKind, name: &str) -> Self {
            self.extraction
                .availabilities
                .push(Availability::Forward(Forward {
                    location: at(file, line),
                    raw: String::new(),
                    kind,
                    identifier: name.into(),
                }));
            self
        }

        fn implement(mut self, file: &str, line: usize, kind: ImplementingKind, name: &str) -> Self {
            self.extraction
                .references
                .push(TypeReference::Implementing(ImplementingReference {
                    location: at(file, line),
                    raw: String::new(),
                    kind,
                    identifier: name.into(),
                }));
            self
        }

        fn compose(mut self, file: &str, line: usize, kind: CompositionKind, name: &str) -> Self {
            self.extraction
                .references
                .push(TypeReference::Composition(CompositionReference {
                    location: at(file, line),
                    raw: String::new(),
                    kind,
                    identifier: name.into(),
                }));
            self
        }

        fn codebase(self) -> Codebase {
            Codebase::new(self.headers, self.extraction)
        }

        fn check(self) -> Vec<Issue> {
            self.codebase().check_issues(&Config::default())
        }
    }

    fn messages(issues: &[Issue]) -> Vec<String> {
        issues.iter().map(|i| i.message.clone()).collect()
    }

    #[test]
    fn earlier_declaration_in_same_file_is_visible() {
        let issues = Fixture::new(&["/p/A.h"])
            .declare("/p/A.h", 2, DeclarationKind::Class, "Foo")
            .compose("/p/A.h", 5, CompositionKind::Property, "Foo")
            .declare("/p/A.h", 3, DeclarationKind::Structure, "Point")
            .compose("/p/A.h", 6, CompositionKind::Method, "Point")
            .check();
        assert!(issues.is_empty(), "{issues:?}");
    }

    #[test]
    fn same_line_declaration_is_not_trivially_visible() {
        let issues = Fixture::new(&["/p/A.h"])
            .declare("/p/A.h", 4, DeclarationKind::Class, "Foo")
            .compose("/p/A.h", 4, CompositionKind::Property, "Foo")
            .check();
        assert_eq!(
            messages(&issues),
            vec!["Missing forward declaration of class Foo used as a property type."]
        );
        assert_eq!(issues[0].code.as_deref(), Some("need-forward-class"));
    }

    #[test]
    fn forward_satisfies_composition() {
        let mut codebase = Fixture::new(&["/p/B.h", "/p/Foo.h"])
            .declare("/p/Foo.h", 1, DeclarationKind::Class, "Foo")
            .forward("/p/B.h", 1, ForwardKind::Class, "Foo")
            .compose("/p/B.h", 4, CompositionKind::Property, "Foo")
            .codebase();
        let issues = codebase.check_issues(&Config::default());
        assert!(issues.is_empty(), "{issues:?}");
        let entries = codebase.model().availabilities_in(Path::new("/p/B.h"));
        assert_eq!(entries[0].usage, UsageLevel::Needed);
    }

    #[test]
    fn forward_does_not_satisfy_inheritance() {
        let issues = Fixture::new(&["/p/B.h", "/p/Foo.h"])
            .declare("/p/Foo.h", 1, DeclarationKind::Class, "Foo")
            .forward("/p/B.h", 1, ForwardKind::Class, "Foo")
            .implement("/p/B.h", 3, ImplementingKind::Inheritance, "Foo")
            .check();

        let notes: Vec<_> = issues.iter().filter(|i| i.severity == Severity::Note).collect();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].code.as_deref(), Some("need-import-not-forward"));
        assert_eq!(
            notes[0].message,
            "Found forward declaration when full declaration is needed for reference on line 3"
        );

        let missing = issues
            .iter()
            .filter(|i| i.kind == IssueKind::MissingImport && i.severity == Severity::Error)
            .collect::<Vec<_>>();
        assert_eq!(missing.len(), 1);
        assert_eq!(
            missing[0].message,
            "Missing import of \"Foo.h\" for class Foo used in an inheritance declaration."
        );
        assert_eq!(missing[0].code.as_deref(), Some("need-import-for-inheritance"));

        // The forward was never needed, so the sweep reports it as well.
        assert_eq!(issues.len(), 3);
        assert_eq!(issues[2].kind, IssueKind::RedundantForward);
    }

    #[test]
    fn import_satisfies_inheritance() {
        let issues = Fixture::new(&["/p/B.h", "/p/Foo.h"])
            .declare("/p/Foo.h", 1, DeclarationKind::Class, "Foo")
            .import("/p/B.h", 1, "Foo.h")
            .implement("/p/B.h", 3, ImplementingKind::Inheritance, "Foo")
            .check();
        assert!(issues.is_empty(), "{issues:?}");
    }

    #[test]
    fn conformance_ignores_same_named_class() {
        let issues = Fixture::new(&["/p/B.h", "/p/Foo.h"])
            .declare("/p/Foo.h", 1, DeclarationKind::Class, "Foo")
            .implement("/p/B.h", 3, ImplementingKind::Conformance, "Foo")
            .check();
        assert!(issues.is_empty(), "{issues:?}");
    }

    #[test]
    fn import_stronger_than_needed() {
        let issues = Fixture::new(&["/p/C.h", "/p/D.h"])
            .declare("/p/D.h", 2, DeclarationKind::Class, "Baz")
            .import("/p/C.h", 1, "D.h")
            .compose("/p/C.h", 5, CompositionKind::Property, "Baz")
            .check();
        assert_eq!(issues.len(), 1, "{issues:?}");
        let redundant = issues
            .iter()
            .find(|i| i.kind == IssueKind::RedundantImport)
            .map(|i| (i.message.as_str(), i.code.as_deref()));
        assert_eq!(
            redundant,
            Some((
                "Unnecessary import of file D.h when only forward declarations are needed.",
                Some("need-forward-not-import")
            ))
        );
    }

    #[test]
    fn import_is_needed_when_any_reference_needs_it() {
        let mut codebase = Fixture::new(&["/p/C.h", "/p/D.h"])
            .declare("/p/D.h", 2, DeclarationKind::Class, "Baz")
            .declare("/p/D.h", 8, DeclarationKind::Enumeration, "Mode")
            .import("/p/C.h", 1, "D.h")
            .forward("/p/C.h", 2, ForwardKind::Class, "Baz")
            .compose("/p/C.h", 5, CompositionKind::Property, "Baz")
            .compose("/p/C.h", 6, CompositionKind::Method, "Mode")
            .codebase();
        let issues = codebase.check_issues(&Config::default());
        assert!(issues.is_empty(), "{issues:?}");
        let usage: Vec<_> = codebase
            .model()
            .availabilities_in(Path::new("/p/C.h"))
            .iter()
            .map(|e| e.usage)
            .collect();
        assert_eq!(usage, vec![UsageLevel::Needed, UsageLevel::Needed]);
    }

    #[test]
    fn usage_never_decreases() {
        let mut codebase = Fixture::new(&["/p/C.h", "/p/D.h"])
            .declare("/p/D.h", 2, DeclarationKind::Class, "Baz")
            .declare("/p/D.h", 8, DeclarationKind::Structure, "Size")
            .import("/p/C.h", 1, "D.h")
            .compose("/p/C.h", 5, CompositionKind::Method, "Size")
            .compose("/p/C.h", 6, CompositionKind::Property, "Baz")
            .codebase();
        let issues = codebase.check_issues(&Config::default());
        assert!(issues.is_empty(), "{issues:?}");
        assert_eq!(
            codebase.model().availabilities_in(Path::new("/p/C.h"))[0].usage,
            UsageLevel::Needed
        );
    }

    #[test]
    fn unused_forward_is_reported() {
        let issues = Fixture::new(&["/p/E.h", "/p/Q.h"])
            .declare("/p/Q.h", 1, DeclarationKind::Protocol, "Qux")
            .forward("/p/E.h", 1, ForwardKind::Protocol, "Qux")
            .check();
        assert_eq!(
            messages(&issues),
            vec!["Unnecessary forward declaration of protocol Qux."]
        );
        assert_eq!(issues[0].kind, IssueKind::RedundantForward);
    }

    #[test]
    fn unused_import_is_reported() {
        let issues = Fixture::new(&["/p/E.h", "/p/F.h"])
            .import("/p/E.h", 1, "F.h")
            .check();
        assert_eq!(messages(&issues), vec!["Unnecessary import of file F.h."]);
        assert_eq!(issues[0].code.as_deref(), Some("not-needed-import"));
    }

    #[test]
    fn value_types_need_imports() {
        let issues = Fixture::new(&["/p/A.h", "/p/Shapes.h"])
            .declare("/p/Shapes.h", 3, DeclarationKind::Structure, "Point")
            .compose("/p/A.h", 7, CompositionKind::Method, "Point")
            .check();
        insta::assert_snapshot!(
            issues[0].format_xcode(true),
            @r#"/p/A.h:7:1: error: Missing import of "Shapes.h" for structure Point used as a method return type or parameter type.  need-import-for-typedef"#
        );
    }

    #[test]
    fn alias_of_class_follows_class_rules() {
        let issues = Fixture::new(&["/p/A.h", "/p/B.h", "/p/C.h"])
            .declare("/p/A.h", 1, DeclarationKind::Class, "ExistingClass")
            .declare(
                "/p/B.h",
                1,
                DeclarationKind::ArbitraryAlias("ExistingClass".into()),
                "NewAlias",
            )
            .compose("/p/C.h", 4, CompositionKind::Property, "NewAlias")
            .check();
        assert_eq!(
            messages(&issues),
            vec!["Missing forward declaration of class NewAlias used as a property type."]
        );
    }

    #[test]
    fn unresolved_alias_reference_is_internal() {
        let issues = Fixture::new(&["/p/A.h", "/p/C.h"])
            .declare(
                "/p/A.h",
                1,
                DeclarationKind::ArbitraryAlias("NSUInteger".into()),
                "Count",
            )
            .compose("/p/C.h", 4, CompositionKind::Property, "Count")
            .check();
        let kinds: Vec<_> = issues.iter().map(|i| (i.kind, i.severity)).collect();
        assert_eq!(
            kinds,
            vec![
                (IssueKind::UnresolvedAlias, Severity::Note),
                (IssueKind::Internal, Severity::Warning),
            ]
        );
        assert_eq!(
            issues[1].message,
            "Could not find declaration of NSUInteger to deduce metatype of Count."
        );
    }

    #[test]
    fn ignored_kinds_are_dropped() {
        let mut config = Config::default();
        config.set_severity(IssueKind::RedundantImport, Severity::Ignored);
        let issues = Fixture::new(&["/p/E.h", "/p/F.h"])
            .import("/p/E.h", 1, "F.h")
            .codebase()
            .check_issues(&config);
        assert!(issues.is_empty());
    }
}
