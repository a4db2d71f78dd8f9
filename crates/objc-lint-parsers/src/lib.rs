//! # objc-lint-parsers
//!
//! Built-in recognizers for Objective-C headers.
//!
//! Each recognizer matches one declaration form with a regular expression
//! and turns every match into declarations, availabilities and references.
//! Type expressions inside a match are broken down by the
//! [`TypeDescriptorParser`] and [`BlockDescriptorParser`].
//!
//! ## Recognizers
//!
//! | Name | Form |
//! |------|------|
//! | `class-declaration` | `@interface Name : Base <P>` |
//! | `category-declaration` | `@interface Base (Category) <P>` |
//! | `protocol-declaration` | `@protocol Name <P>` |
//! | `structure-definition` | `typedef struct Name { ... } Name;` |
//! | `enumeration-definition` | `typedef NS_ENUM(NSInteger, Name) { ... };` |
//! | `block-signature-definition` | `typedef void (^Name)(Param *param);` |
//! | `arbitrary-typedef` | `typedef Type *Name;` |
//! | `property-declaration` | `@property (attributes) Type *name;` |
//! | `method-declaration` | `- (Type *)label:(Param *)param;` |
//! | `forward-declaration` | `@class A, B;` / `@protocol P;` |
//! | `import-directive` | `#import "File.h"` |
//! | `pragma-override` | `#pragma LeanHeaders need import class Name` |
//!
//! ## Usage
//!
//! ```ignore
//! use objc_lint_core::{Analyzer, Config};
//! use objc_lint_parsers::all_recognizers;
//!
//! let config = Config::default();
//! let (recognizers, issues) = all_recognizers(&config);
//! let analyzer = Analyzer::builder()
//!     .root("./Sources")
//!     .recognizers(recognizers)
//!     .issues(issues)
//!     .config(config)
//!     .build()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod block_descriptor;
pub mod patterns;
pub mod type_descriptor;

mod block_signature;
mod category;
mod class;
mod common;
mod enumeration;
mod forward;
mod import;
mod method;
mod pragma;
mod property;
mod protocol;
mod registry;
mod structure;
mod typedef;

pub use block_descriptor::{BlockDescriptor, BlockDescriptorParser};
pub use block_signature::BlockSignatureDefinition;
pub use category::CategoryDeclaration;
pub use class::ClassDeclaration;
pub use enumeration::EnumerationDefinition;
pub use forward::ForwardDeclaration;
pub use import::ImportDirective;
pub use method::MethodDeclaration;
pub use pragma::PragmaOverride;
pub use property::PropertyDeclaration;
pub use protocol::ProtocolDeclaration;
pub use registry::{all_recognizers, HeaderRecognizer};
pub use structure::StructureDefinition;
pub use type_descriptor::{Identifier, Inclusion, TypeDescriptor, TypeDescriptorParser};
pub use typedef::ArbitraryTypedef;

/// Re-export core types for convenience.
pub use objc_lint_core::{Extraction, Recognizer, SourceFile};
