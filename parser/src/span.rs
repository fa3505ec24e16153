//! Source positions.
//!
//! Every piece of the tree records a [`Range`] of byte offsets into the parsed text. Human
//! readable positions ([`Marker`]) are only computed when needed, through a [`LineIndex`].

use std::fmt;

/// A half-open range of byte offsets into the source text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Range {
    /// Offset of the first byte.
    pub start: usize,
    /// Offset one past the last byte.
    pub end: usize,
}

impl Range {
    /// Create a new [`Range`].
    #[must_use]
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "inverted range {start}..{end}");
        Self { start, end }
    }

    /// Create an empty [`Range`] at the given offset.
    #[must_use]
    pub fn empty(at: usize) -> Self {
        Self { start: at, end: at }
    }

    /// Return the length of the range, in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Return whether the range covers no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Return whether `other` lies entirely within `self`.
    #[must_use]
    pub fn contains(&self, other: Range) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Return the smallest range covering both `self` and `other`.
    #[must_use]
    pub fn union(self, other: Range) -> Range {
        Range::new(self.start.min(other.start), self.end.max(other.end))
    }

    /// Return the text the range covers in `source`.
    ///
    /// # Panics
    /// Panics if the range is out of bounds of `source` or not on character boundaries.
    #[must_use]
    pub fn slice(self, source: &str) -> &str {
        &source[self.start..self.end]
    }
}

impl From<std::ops::Range<usize>> for Range {
    fn from(value: std::ops::Range<usize>) -> Self {
        Range::new(value.start, value.end)
    }
}

/// A location in a yaml document.
#[derive(Clone, Copy, PartialEq, Debug, Eq, Default, Hash)]
pub struct Marker {
    /// The index (in bytes) in the input string.
    index: usize,
    /// The line (1-indexed).
    line: usize,
    /// The column (0-indexed, in characters).
    col: usize,
}

impl Marker {
    /// Create a new [`Marker`] at the given position.
    #[must_use]
    pub fn new(index: usize, line: usize, col: usize) -> Marker {
        Marker { index, line, col }
    }

    /// Return the index (in bytes) of the marker in the source.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Return the line of the marker in the source.
    #[must_use]
    pub fn line(&self) -> usize {
        self.line
    }

    /// Return the column of the marker in the source.
    #[must_use]
    pub fn col(&self) -> usize {
        self.col
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "byte {} line {} column {}",
            self.index,
            self.line,
            self.col + 1
        )
    }
}

/// Table of line start offsets, used to turn byte offsets into [`Marker`]s.
///
/// `\n`, `\r\n` and a lone `\r` all end a line.
#[derive(Clone, Debug)]
pub struct LineIndex<'input> {
    source: &'input str,
    starts: Vec<usize>,
}

impl<'input> LineIndex<'input> {
    /// Build the line table of `source`.
    #[must_use]
    pub fn new(source: &'input str) -> Self {
        let bytes = source.as_bytes();
        let mut starts = vec![0];
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'\r' if bytes.get(i + 1) == Some(&b'\n') => {
                    starts.push(i + 2);
                    i += 2;
                }
                b'\r' | b'\n' => {
                    starts.push(i + 1);
                    i += 1;
                }
                _ => i += 1,
            }
        }
        Self { source, starts }
    }

    /// Return the number of lines in the source.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.starts.len()
    }

    /// Return the [`Marker`] for the given byte offset.
    ///
    /// Offsets past the end of the source are clamped to its end.
    #[must_use]
    pub fn marker(&self, offset: usize) -> Marker {
        let offset = offset.min(self.source.len());
        let line = match self.starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        let line_start = self.starts[line];
        let col = self
            .source
            .get(line_start..offset)
            .map_or(offset - line_start, |text| text.chars().count());
        Marker::new(offset, line + 1, col)
    }
}

#[cfg(test)]
mod test {
    use super::{LineIndex, Marker, Range};

    #[test]
    fn test_markers() {
        let index = LineIndex::new("ab\ncd\r\nef\rgh");
        assert_eq!(index.line_count(), 4);
        assert_eq!(index.marker(0), Marker::new(0, 1, 0));
        assert_eq!(index.marker(1), Marker::new(1, 1, 1));
        assert_eq!(index.marker(3), Marker::new(3, 2, 0));
        assert_eq!(index.marker(5), Marker::new(5, 2, 2));
        assert_eq!(index.marker(7), Marker::new(7, 3, 0));
        assert_eq!(index.marker(10), Marker::new(10, 4, 0));
        assert_eq!(index.marker(100), Marker::new(12, 4, 2));
    }

    #[test]
    fn test_marker_counts_chars() {
        let index = LineIndex::new("é: 你好");
        assert_eq!(index.marker(4), Marker::new(4, 1, 3));
        assert_eq!(index.marker(4).to_string(), "byte 4 line 1 column 4");
    }

    #[test]
    fn test_range() {
        let range = Range::new(2, 5);
        assert_eq!(range.len(), 3);
        assert!(!range.is_empty());
        assert!(range.contains(Range::new(3, 5)));
        assert!(!range.contains(Range::new(1, 3)));
        assert_eq!(range.union(Range::new(7, 9)), Range::new(2, 9));
        assert_eq!(range.slice("0123456"), "234");
        assert!(Range::empty(4).is_empty());
    }
}
