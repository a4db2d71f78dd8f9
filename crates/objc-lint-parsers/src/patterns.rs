//! Pattern fragments shared by the recognizers.
//!
//! Every pattern is written for verbose mode: whitespace is insignificant,
//! `#` must be escaped, and character classes are written without spaces.

use objc_lint_core::{Issue, IssueKind, SourceFile};
use regex::{Regex, RegexBuilder};
use std::ops::Range;

/// A C identifier on word boundaries.
pub const IDENTIFIER: &str = r"\b [A-Za-z] [A-Za-z0-9_]* \b";

/// Nullability keywords written before a type.
pub const PREFIX_NULLABILITY: &str = r"\b n (?: ull (?: able | _unspecified ) | onnull ) \b";

/// Nullability qualifiers written after a type or indirection.
pub const POSTFIX_NULLABILITY: &str = r"_ (?: _n | N ) (?: ull (?: able | _unspecified ) | onnull )";

/// `__attribute__((...))` clauses.
pub const ATTRIBUTE: &str = r"\b __attribute__ \( \( (?: [^)] | \) [^)] )* \) \)";

const STRING_ARGUMENT: &str = r#"" (?: \\" | [^"] )* ""#;
const VERSION_ARGUMENT: &str = r"[0-9_]+";

/// Maximum compiled size of one recognizer's program.
const SIZE_LIMIT: usize = 1 << 26;

/// Compiles a verbose-mode pattern.
///
/// # Errors
///
/// Returns an error if the pattern is invalid or exceeds the size limit.
pub fn compile(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern)
        .ignore_whitespace(true)
        .size_limit(SIZE_LIMIT)
        .dfa_size_limit(SIZE_LIMIT)
        .build()
}

/// `pattern` repeated, separated by commas.
#[must_use]
pub fn list(pattern: &str) -> String {
    format!(r"{pattern} (?: \s* , \s* {pattern} )*")
}

/// Comma-separated identifiers.
#[must_use]
pub fn identifier_list() -> String {
    list(IDENTIFIER)
}

/// Wraps a pattern in a named capture group, or a plain group when not capturing.
#[must_use]
pub fn group(name: &str, pattern: &str, capture: bool) -> String {
    if capture {
        format!("(?P<{name}> {pattern} )")
    } else {
        format!("(?: {pattern} )")
    }
}

/// Attributes accepted in a property's parenthesised attribute list.
#[must_use]
pub fn property_attribute() -> String {
    format!(
        r"(?: class | [gs]etter= {IDENTIFIER} | read (?: write | only ) | (?: non )? atomic
            | NS_NONATOMIC_IOSONLY | assign | retain | copy | weak | strong
            | unsafe_unretained | {PREFIX_NULLABILITY} )"
    )
}

fn common_macro_suffix() -> String {
    format!(
        r"(?: UNAVAILABLE | SWIFT_UNAVAILABLE \( {STRING_ARGUMENT} \) | SWIFT_NAME \( [^;]* \)
            | AVAILABLE (?: \( {VERSION_ARGUMENT} , | _MAC \( | _IOS \( | _IPHONE \( ) {VERSION_ARGUMENT} \)
            | EXTENSION_UNAVAILABLE (?: _MAC | _IOS )? \( {STRING_ARGUMENT} \) )"
    )
}

/// Macros that may trail a property declaration.
#[must_use]
pub fn property_macros() -> String {
    format!(r"NS_ {}", common_macro_suffix())
}

/// Macros that may trail a method declaration.
#[must_use]
pub fn method_macros() -> String {
    format!(
        r"NS_ (?: RETURNS_RETAINED | RETURNS_NOT_RETAINED | RETURNS_INNER_POINTER
            | AUTOMATED_REFCOUNT_UNAVAILABLE | REPLACES_RECEIVER | RELEASES_ARGUMENT
            | REQUIRES_NIL_TERMINATION | FORMAT_FUNCTION \( {VERSION_ARGUMENT} , {VERSION_ARGUMENT} \)
            | FORMAT_ARGUMENT \( {VERSION_ARGUMENT} \) | REQUIRES_SUPER | DESIGNATED_INITIALIZER
            | PROTOCOL_REQUIRES_EXPLICIT_IMPLEMENTATION | NO_TAIL_CALL | REFINED_FOR_SWIFT
            | SWIFT_NOTHROW | {} )",
        common_macro_suffix()
    )
}

/// The first non-whitespace character at or after `offset`.
#[must_use]
pub fn next_non_space(text: &str, offset: usize) -> Option<char> {
    text.get(offset..)?.chars().find(|c| !c.is_whitespace())
}

/// Offset of the first non-whitespace character in `from..to`, or `to`.
#[must_use]
pub fn skip_whitespace(text: &str, from: usize, to: usize) -> usize {
    text.get(from..to)
        .and_then(|s| s.find(|c: char| !c.is_whitespace()))
        .map_or(to, |i| from + i)
}

/// A parsing issue covering `range`.
#[must_use]
pub fn parsing_issue(file: &SourceFile, range: Range<usize>, message: impl Into<String>) -> Issue {
    Issue::new(IssueKind::Parsing, file.locate_range(range), message)
}

/// The issue raised when a match lacks a group its pattern guarantees.
#[must_use]
pub fn missing_component(file: &SourceFile, range: Range<usize>, what: &str) -> Issue {
    parsing_issue(
        file,
        range,
        format!("Missing non-optional component from {what} match."),
    )
}
