//! Header source text and the byte offset to line/column locator.

use crate::types::Location;
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// A header file loaded into memory.
///
/// Recognizers match against [`SourceFile::text`] and convert byte offsets
/// into [`Location`]s with [`SourceFile::locate`].
#[derive(Debug)]
pub struct SourceFile {
    path: PathBuf,
    text: String,
    line_starts: OnceLock<Vec<usize>>,
}

impl SourceFile {
    /// Creates a source file from already-loaded text.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
            line_starts: OnceLock::new(),
        }
    }

    /// Reads a source file from disk.
    ///
    /// Invalid UTF-8 is replaced rather than rejected, since headers in the
    /// wild are occasionally Latin-1 encoded.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn read(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let text = String::from_utf8(bytes)
            .unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned());
        Ok(Self::new(path, text))
    }

    /// Path of the file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Full text of the file.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Text covered by a byte range, or an empty string when out of bounds.
    #[must_use]
    pub fn slice(&self, range: Range<usize>) -> &str {
        self.text.get(range).unwrap_or_default()
    }

    /// Location of a byte offset, with line and column counted from 1.
    #[must_use]
    pub fn locate(&self, offset: usize) -> Location {
        let starts = self.line_starts.get_or_init(|| {
            std::iter::once(0)
                .chain(self.text.match_indices('\n').map(|(i, _)| i + 1))
                .collect()
        });
        let offset = offset.min(self.text.len());
        let line = starts.partition_point(|&start| start <= offset);
        let line_start = starts[line - 1];
        let column = self
            .text
            .get(line_start..offset)
            .map_or(offset - line_start, |s| s.chars().count())
            + 1;
        Location::new(self.path.clone(), line, column)
    }

    /// Location of a byte range, carrying its span for diagnostics.
    #[must_use]
    pub fn locate_range(&self, range: Range<usize>) -> Location {
        self.locate(range.start)
            .with_span(range.start, range.end.saturating_sub(range.start))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_line_starts_at_column_one() {
        let file = SourceFile::new("a.h", "@class Foo;\n");
        let location = file.locate(0);
        assert_eq!((location.line, location.column), (1, 1));
        assert_eq!(file.locate(7).column, 8);
    }

    #[test]
    fn counts_lines_after_newlines() {
        let file = SourceFile::new("a.h", "one\ntwo\n\nfour");
        assert_eq!(file.locate(4).line, 2);
        assert_eq!(file.locate(8).line, 3);
        let four = file.locate(9);
        assert_eq!((four.line, four.column), (4, 1));
    }

    #[test]
    fn offset_at_newline_belongs_to_its_line() {
        let file = SourceFile::new("a.h", "ab\ncd");
        let location = file.locate(2);
        assert_eq!((location.line, location.column), (1, 3));
    }

    #[test]
    fn out_of_range_offset_is_clamped() {
        let file = SourceFile::new("a.h", "ab\ncd");
        assert_eq!(file.locate(100).line, 2);
    }

    #[test]
    fn range_location_carries_span() {
        let file = SourceFile::new("dir/a.h", "#import \"B.h\"\n");
        let location = file.locate_range(9..12);
        assert_eq!(location.offset, 9);
        assert_eq!(location.length, 3);
        assert_eq!(location.file_name(), "a.h");
        assert_eq!(file.slice(9..12), "B.h");
    }
}
