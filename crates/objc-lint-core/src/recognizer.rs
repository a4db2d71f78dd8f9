//! The recognizer trait implemented by each declaration form.

use crate::model::Extraction;
use crate::source::SourceFile;

/// Recognizes one syntactic form in a header.
///
/// A recognizer scans the whole text of one file and returns what it found
/// in source order. Recognizers are independent of each other and of other
/// files, so the analyzer runs them concurrently.
///
/// # Example
///
/// ```ignore
/// use objc_lint_core::{Extraction, Recognizer, SourceFile};
///
/// pub struct ImportCounter;
///
/// impl Recognizer for ImportCounter {
///     fn name(&self) -> &'static str { "import-counter" }
///
///     fn recognize(&self, file: &SourceFile) -> Extraction {
///         let mut extraction = Extraction::new();
///         // push availabilities found in file.text()
///         extraction
///     }
/// }
/// ```
pub trait Recognizer: Send + Sync {
    /// Returns the kebab-case name of this recognizer (e.g., "method-declaration").
    fn name(&self) -> &'static str;

    /// Extracts declarations, availabilities, references and issues from one file.
    fn recognize(&self, file: &SourceFile) -> Extraction;
}
