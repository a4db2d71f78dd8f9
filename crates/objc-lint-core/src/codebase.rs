//! The codebase model: declarations keyed by name, availabilities keyed by
//! file, and the flat list of references.

use crate::model::{
    Availability, DeclarationKind, Extraction, TypeDeclaration, TypeReference, UsageLevel,
};
use crate::types::{Issue, IssueKind};

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// An availability together with the strongest use made of it so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedAvailability {
    /// The import or forward declaration.
    pub availability: Availability,
    /// Strongest requirement any reference has placed on it.
    pub usage: UsageLevel,
}

impl TrackedAvailability {
    fn new(availability: Availability) -> Self {
        Self {
            availability,
            usage: UsageLevel::NotReferenced,
        }
    }

    /// Raises the usage level; it never decreases.
    pub(crate) fn raise(&mut self, level: UsageLevel) {
        self.usage = self.usage.max(level);
    }
}

/// The post-processed collections the resolution engine works on.
#[derive(Debug, Default)]
pub struct Model {
    pub(crate) declarations: HashMap<String, Vec<TypeDeclaration>>,
    pub(crate) availabilities: HashMap<PathBuf, Vec<TrackedAvailability>>,
    pub(crate) references: Vec<TypeReference>,
    pub(crate) issues: Vec<Issue>,
}

impl Model {
    fn build(headers: &[PathBuf], extraction: Extraction) -> Self {
        let Extraction {
            mut declarations,
            availabilities,
            references,
            issues,
        } = extraction;

        declarations.sort_by(|a, b| {
            a.location
                .file
                .cmp(&b.location.file)
                .then(a.location.line.cmp(&b.location.line))
                .then(a.location.column.cmp(&b.location.column))
        });

        let mut model = Self {
            declarations: HashMap::new(),
            availabilities: HashMap::new(),
            references,
            issues,
        };
        for declaration in declarations {
            model
                .declarations
                .entry(declaration.identifier.clone())
                .or_default()
                .push(declaration);
        }

        model.resolve_aliases();
        model.retain_availabilities(headers, availabilities);
        model
    }

    /// Rewrites each alias to the kind of the single declaration it names.
    ///
    /// Lookups see the map as it was before any rewrite, so an alias of an
    /// alias stays an alias.
    fn resolve_aliases(&mut self) {
        let mut rewrites = Vec::new();
        for (identifier, candidates) in &self.declarations {
            for (index, declaration) in candidates.iter().enumerate() {
                let DeclarationKind::ArbitraryAlias(of) = &declaration.kind else {
                    continue;
                };
                match self.declarations.get(of).map_or(&[][..], Vec::as_slice) {
                    [target] => rewrites.push((identifier.clone(), index, target.kind.clone())),
                    targets => self.issues.push(
                        Issue::new(
                            IssueKind::UnresolvedAlias,
                            declaration.location.clone(),
                            format!(
                                "Unable to resolve arbitrary type definition with {} candidates.",
                                targets.len()
                            ),
                        )
                        .with_code("typedef-not-unique"),
                    ),
                }
            }
        }

        debug!("Resolved {} type aliases", rewrites.len());
        for (identifier, index, kind) in rewrites {
            if let Some(declaration) = self
                .declarations
                .get_mut(&identifier)
                .and_then(|candidates| candidates.get_mut(index))
            {
                declaration.kind = kind;
            }
        }
    }

    /// Keeps imports of real headers and forwards of real declarations.
    fn retain_availabilities(&mut self, headers: &[PathBuf], availabilities: Vec<Availability>) {
        let total = availabilities.len();
        for availability in availabilities {
            let keep = match &availability {
                Availability::Import(import) => headers
                    .iter()
                    .any(|header| header.ends_with(Path::new(&import.imports_file))),
                Availability::Forward(forward) => self
                    .declarations
                    .get(&forward.identifier)
                    .is_some_and(|candidates| {
                        candidates.iter().any(|d| forward.kind.matches(&d.kind))
                    }),
            };
            if keep {
                self.availabilities
                    .entry(availability.location().file.clone())
                    .or_default()
                    .push(TrackedAvailability::new(availability));
            }
        }

        for entries in self.availabilities.values_mut() {
            entries.sort_by_key(|e| {
                let location = e.availability.location();
                (location.line, location.column)
            });
        }

        debug!(
            "Retained {} of {} availabilities",
            self.availabilities.values().map(Vec::len).sum::<usize>(),
            total
        );
    }

    /// All declarations of a name, in (file, line) order.
    #[must_use]
    pub fn declarations(&self, identifier: &str) -> &[TypeDeclaration] {
        self.declarations
            .get(identifier)
            .map_or(&[][..], Vec::as_slice)
    }

    /// Retained availabilities of one file, in source order.
    #[must_use]
    pub fn availabilities_in(&self, file: &Path) -> &[TrackedAvailability] {
        self.availabilities
            .get(file)
            .map_or(&[][..], Vec::as_slice)
    }
}

/// A codebase of header files and everything extracted from them.
///
/// The [`Model`] is built on first access and at most once.
#[derive(Debug)]
pub struct Codebase {
    headers: Vec<PathBuf>,
    pending: Extraction,
    model: Option<Model>,
}

impl Codebase {
    /// Creates a codebase from the analyzed header paths and their merged extraction.
    #[must_use]
    pub fn new(headers: Vec<PathBuf>, extraction: Extraction) -> Self {
        Self {
            headers,
            pending: extraction,
            model: None,
        }
    }

    /// The post-processed model, built on first call.
    pub fn model(&mut self) -> &mut Model {
        self.model
            .get_or_insert_with(|| Model::build(&self.headers, std::mem::take(&mut self.pending)))
    }
}
