//! The closed set of header recognizers.

use crate::{
    block_signature, category, class, enumeration, forward, import, method, pragma, property,
    protocol, structure, typedef,
};
use crate::{
    ArbitraryTypedef, BlockSignatureDefinition, CategoryDeclaration, ClassDeclaration,
    EnumerationDefinition, ForwardDeclaration, ImportDirective, MethodDeclaration, PragmaOverride,
    PropertyDeclaration, ProtocolDeclaration, StructureDefinition,
};
use objc_lint_core::{Config, Extraction, Issue, IssueKind, Recognizer, SourceFile};
use tracing::warn;

/// One of the built-in recognizers.
#[derive(Debug, Clone)]
pub enum HeaderRecognizer {
    /// `@interface Name : Base`.
    Class(ClassDeclaration),
    /// `@interface Base (Category)`.
    Category(CategoryDeclaration),
    /// `@protocol Name`.
    Protocol(ProtocolDeclaration),
    /// `struct` definitions.
    Structure(StructureDefinition),
    /// `enum` and `NS_ENUM` definitions.
    Enumeration(EnumerationDefinition),
    /// Block signature typedefs.
    BlockSignature(BlockSignatureDefinition),
    /// Other typedefs.
    Typedef(ArbitraryTypedef),
    /// `@property` declarations.
    Property(PropertyDeclaration),
    /// Method declarations.
    Method(MethodDeclaration),
    /// `@class` and `@protocol` forward declarations.
    Forward(ForwardDeclaration),
    /// `#import` and `#include` directives.
    Import(ImportDirective),
    /// Override pragmas.
    Pragma(PragmaOverride),
}

impl HeaderRecognizer {
    fn inner(&self) -> &dyn Recognizer {
        match self {
            Self::Class(r) => r,
            Self::Category(r) => r,
            Self::Protocol(r) => r,
            Self::Structure(r) => r,
            Self::Enumeration(r) => r,
            Self::BlockSignature(r) => r,
            Self::Typedef(r) => r,
            Self::Property(r) => r,
            Self::Method(r) => r,
            Self::Forward(r) => r,
            Self::Import(r) => r,
            Self::Pragma(r) => r,
        }
    }
}

impl Recognizer for HeaderRecognizer {
    fn name(&self) -> &'static str {
        self.inner().name()
    }

    fn recognize(&self, file: &SourceFile) -> Extraction {
        self.inner().recognize(file)
    }
}

/// Compiles every built-in recognizer.
///
/// A recognizer whose pattern fails to compile is left out and reported as
/// an unlocated parsing issue, so the rest of the analysis still runs.
/// Structure, enumeration and block signature typedefs are registered before
/// the arbitrary typedef.
#[must_use]
pub fn all_recognizers(config: &Config) -> (Vec<HeaderRecognizer>, Vec<Issue>) {
    let mut recognizers = Vec::new();
    let mut issues = Vec::new();

    let mut register = |name: &str, compiled: Result<HeaderRecognizer, regex::Error>| match compiled
    {
        Ok(recognizer) => recognizers.push(recognizer),
        Err(error) => {
            warn!(recognizer = name, %error, "Disabling recognizer");
            issues.push(Issue::unlocated(
                IssueKind::Parsing,
                format!("Cannot compile {} parser.", name.replace('-', " ")),
            ));
        }
    };

    register(class::NAME, ClassDeclaration::new().map(HeaderRecognizer::Class));
    register(
        category::NAME,
        CategoryDeclaration::new().map(HeaderRecognizer::Category),
    );
    register(
        protocol::NAME,
        ProtocolDeclaration::new().map(HeaderRecognizer::Protocol),
    );
    register(
        structure::NAME,
        StructureDefinition::new().map(HeaderRecognizer::Structure),
    );
    register(
        enumeration::NAME,
        EnumerationDefinition::new().map(HeaderRecognizer::Enumeration),
    );
    register(
        block_signature::NAME,
        BlockSignatureDefinition::new().map(HeaderRecognizer::BlockSignature),
    );
    register(typedef::NAME, ArbitraryTypedef::new().map(HeaderRecognizer::Typedef));
    register(
        property::NAME,
        PropertyDeclaration::new().map(HeaderRecognizer::Property),
    );
    register(method::NAME, MethodDeclaration::new().map(HeaderRecognizer::Method));
    register(forward::NAME, ForwardDeclaration::new().map(HeaderRecognizer::Forward));
    register(import::NAME, ImportDirective::new().map(HeaderRecognizer::Import));
    register(
        pragma::NAME,
        PragmaOverride::new(config).map(HeaderRecognizer::Pragma),
    );

    (recognizers, issues)
}
