//! Declarations, availabilities and references extracted from headers.

use crate::types::{Issue, Location};
use serde::{Deserialize, Serialize};

/// The kind of type a declaration defines.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeclarationKind {
    /// `@interface Name : Base`.
    Class,
    /// `@protocol Name`.
    Protocol,
    /// A `struct` definition.
    Structure,
    /// An `enum`, `NS_ENUM` or `NS_OPTIONS` definition.
    Enumeration,
    /// A block (closure) signature typedef.
    BlockSignature,
    /// A typedef of another named type, not yet resolved.
    ArbitraryAlias(String),
}

impl std::fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Class => write!(f, "class"),
            Self::Protocol => write!(f, "protocol"),
            Self::Structure => write!(f, "structure"),
            Self::Enumeration => write!(f, "enumeration"),
            Self::BlockSignature => write!(f, "block signature"),
            Self::ArbitraryAlias(of) => write!(f, "alias of {of}"),
        }
    }
}

/// A type definition found in a header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDeclaration {
    /// Where the declared name appears.
    pub location: Location,
    /// Source text of the whole definition.
    pub raw: String,
    /// What kind of type is declared.
    pub kind: DeclarationKind,
    /// The declared name.
    pub identifier: String,
}

/// The kind of a forward declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ForwardKind {
    /// `@class`.
    Class,
    /// `@protocol`.
    Protocol,
}

impl ForwardKind {
    /// Whether a forward of this kind can stand in for a declaration of `kind`.
    #[must_use]
    pub fn matches(self, kind: &DeclarationKind) -> bool {
        matches!(
            (self, kind),
            (Self::Class, DeclarationKind::Class) | (Self::Protocol, DeclarationKind::Protocol)
        )
    }
}

impl std::fmt::Display for ForwardKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Class => write!(f, "class"),
            Self::Protocol => write!(f, "protocol"),
        }
    }
}

/// An `#import "file"` directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Import {
    /// Where the imported file name appears.
    pub location: Location,
    /// Source text of the directive.
    pub raw: String,
    /// The literal header name between the quotes.
    pub imports_file: String,
}

impl Import {
    /// File name of the imported header, without directories.
    #[must_use]
    pub fn target_file_name(&self) -> &str {
        self.imports_file
            .rsplit('/')
            .next()
            .unwrap_or(&self.imports_file)
    }
}

/// An `@class` or `@protocol` forward declaration of one identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Forward {
    /// Where the forward declaration appears.
    pub location: Location,
    /// Source text of the declaration.
    pub raw: String,
    /// Whether a class or a protocol is forwarded.
    pub kind: ForwardKind,
    /// The forwarded name.
    pub identifier: String,
}

/// A visibility grant inside one header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Availability {
    /// Full visibility of every declaration in the imported file.
    Import(Import),
    /// Shallow visibility of one class or protocol name.
    Forward(Forward),
}

impl Availability {
    /// Location of the grant.
    #[must_use]
    pub fn location(&self) -> &Location {
        match self {
            Self::Import(i) => &i.location,
            Self::Forward(f) => &f.location,
        }
    }
}

/// How strongly an availability is relied upon.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum UsageLevel {
    /// No reference uses it.
    #[default]
    NotReferenced,
    /// Some reference uses it, but a weaker availability would do.
    Used,
    /// Some reference requires it.
    Needed,
}

/// Why an implementing reference needs its declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImplementingKind {
    /// A base class.
    Inheritance,
    /// An adopted or incorporated protocol.
    Conformance,
}

impl ImplementingKind {
    /// Whether a declaration of `kind` can satisfy this reference.
    #[must_use]
    pub fn accepts(self, kind: &DeclarationKind) -> bool {
        matches!(
            (self, kind),
            (Self::Inheritance, DeclarationKind::Class)
                | (Self::Conformance, DeclarationKind::Protocol)
        )
    }

    /// Whether a forward of `kind` names the same sort of type.
    #[must_use]
    pub fn accepts_forward(self, kind: ForwardKind) -> bool {
        matches!(
            (self, kind),
            (Self::Inheritance, ForwardKind::Class) | (Self::Conformance, ForwardKind::Protocol)
        )
    }
}

impl std::fmt::Display for ImplementingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Inheritance => write!(f, "an inheritance"),
            Self::Conformance => write!(f, "a conformance or incorporation"),
        }
    }
}

/// Where a composition reference uses its type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompositionKind {
    /// A property type.
    Property,
    /// A method return or parameter type.
    Method,
    /// A block return or parameter type.
    BlockSignature,
    /// Any other use, e.g. the aliased side of a typedef.
    Arbitrary,
}

impl std::fmt::Display for CompositionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Property => write!(f, "a property"),
            Self::Method => write!(f, "a method return type or parameter"),
            Self::BlockSignature => write!(f, "a closure return type or parameter"),
            Self::Arbitrary => write!(f, "an arbitrary"),
        }
    }
}

/// A use of a type that always needs its full declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImplementingReference {
    /// Where the name is used.
    pub location: Location,
    /// Source text of the using construct.
    pub raw: String,
    /// Inheritance or conformance.
    pub kind: ImplementingKind,
    /// The referenced name.
    pub identifier: String,
}

/// A use of a type that usually needs only a forward declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositionReference {
    /// Where the name is used.
    pub location: Location,
    /// Source text of the using construct.
    pub raw: String,
    /// The construct the name is used in.
    pub kind: CompositionKind,
    /// The referenced name.
    pub identifier: String,
}

/// A use site of a type name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeReference {
    /// Needs a full declaration.
    Implementing(ImplementingReference),
    /// Needs a shallow declaration, unless the type is a value or function type.
    Composition(CompositionReference),
}

impl TypeReference {
    /// Location of the use.
    #[must_use]
    pub fn location(&self) -> &Location {
        match self {
            Self::Implementing(r) => &r.location,
            Self::Composition(r) => &r.location,
        }
    }

    /// The referenced name.
    #[must_use]
    pub fn identifier(&self) -> &str {
        match self {
            Self::Implementing(r) => &r.identifier,
            Self::Composition(r) => &r.identifier,
        }
    }
}

/// Everything one recognizer found in one file, or the merge of many.
#[derive(Debug, Default)]
pub struct Extraction {
    /// Type definitions.
    pub declarations: Vec<TypeDeclaration>,
    /// Imports and forward declarations.
    pub availabilities: Vec<Availability>,
    /// Uses of type names.
    pub references: Vec<TypeReference>,
    /// Issues raised while recognizing.
    pub issues: Vec<Issue>,
}

impl Extraction {
    /// Creates an empty extraction.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends everything from `other`, keeping its order.
    pub fn extend(&mut self, other: Self) {
        self.declarations.extend(other.declarations);
        self.availabilities.extend(other.availabilities);
        self.references.extend(other.references);
        self.issues.extend(other.issues);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_level_is_ordered() {
        assert!(UsageLevel::NotReferenced < UsageLevel::Used);
        assert!(UsageLevel::Used < UsageLevel::Needed);
        assert_eq!(UsageLevel::default(), UsageLevel::NotReferenced);
    }

    #[test]
    fn implementing_kind_compatibility() {
        assert!(ImplementingKind::Inheritance.accepts(&DeclarationKind::Class));
        assert!(!ImplementingKind::Inheritance.accepts(&DeclarationKind::Protocol));
        assert!(ImplementingKind::Conformance.accepts(&DeclarationKind::Protocol));
        assert!(!ImplementingKind::Conformance.accepts(&DeclarationKind::Structure));
        assert!(ImplementingKind::Conformance.accepts_forward(ForwardKind::Protocol));
    }

    #[test]
    fn forward_kind_compatibility() {
        assert!(ForwardKind::Class.matches(&DeclarationKind::Class));
        assert!(!ForwardKind::Class.matches(&DeclarationKind::ArbitraryAlias("Foo".into())));
    }

    #[test]
    fn import_target_file_name_drops_directories() {
        let import = Import {
            location: Location::new("a.h".into(), 1, 1),
            raw: "#import \"Models/Widget.h\"".into(),
            imports_file: "Models/Widget.h".into(),
        };
        assert_eq!(import.target_file_name(), "Widget.h");
    }
}
