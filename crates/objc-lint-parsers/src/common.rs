//! Conversions from regex matches to model values.

use crate::type_descriptor::Identifier;
use objc_lint_core::{
    CompositionKind, CompositionReference, DeclarationKind, ImplementingKind,
    ImplementingReference, SourceFile, TypeDeclaration, TypeReference,
};
use regex::Match;

/// Source text of a whole match, without trailing whitespace.
pub(crate) fn raw(whole: Match<'_>) -> String {
    whole.as_str().trim_end().to_string()
}

/// Names in a comma-separated list.
pub(crate) fn items(list: &str) -> impl Iterator<Item = &str> {
    list.split(',').map(str::trim).filter(|name| !name.is_empty())
}

pub(crate) fn declaration(
    file: &SourceFile,
    raw: &str,
    name: Match<'_>,
    kind: DeclarationKind,
) -> TypeDeclaration {
    TypeDeclaration {
        location: file.locate_range(name.range()),
        raw: raw.to_string(),
        kind,
        identifier: name.as_str().to_string(),
    }
}

/// One implementing reference per name in `names`, all located at the list.
pub(crate) fn implementing(
    file: &SourceFile,
    raw: &str,
    names: Match<'_>,
    kind: ImplementingKind,
) -> Vec<TypeReference> {
    let location = file.locate_range(names.range());
    items(names.as_str())
        .map(|identifier| {
            TypeReference::Implementing(ImplementingReference {
                location: location.clone(),
                raw: raw.to_string(),
                kind,
                identifier: identifier.to_string(),
            })
        })
        .collect()
}

pub(crate) fn compositions<'a>(
    raw: &str,
    identifiers: impl IntoIterator<Item = &'a Identifier>,
    kind: CompositionKind,
) -> Vec<TypeReference> {
    identifiers
        .into_iter()
        .map(|identifier| {
            TypeReference::Composition(CompositionReference {
                location: identifier.location.clone(),
                raw: raw.to_string(),
                kind,
                identifier: identifier.name.clone(),
            })
        })
        .collect()
}
