//! Line classification.
//!
//! Every indentation decision of the block parser is built on [`classify`]: how many spaces
//! indent a line, and whether the line carries any content at all.

use crate::cursor::{break_len, line_end, Cursor};

/// What a single line of the source looks like.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LineInfo {
    /// Offset at which the classification started.
    pub start: usize,
    /// Number of leading spaces. Tabs are never indentation.
    pub indent: usize,
    /// Offset of the first non-space character (which may be a tab or the line break).
    pub content_start: usize,
    /// Offset of the line break ending the line, or the input length.
    pub end: usize,
    /// The line holds nothing but spaces and tabs.
    pub is_blank: bool,
    /// The first non-blank character of the line starts a comment.
    pub is_comment: bool,
}

impl LineInfo {
    /// Return the offset of the start of the following line, or the input length.
    #[must_use]
    pub fn next(&self, source: &str) -> usize {
        self.end + break_len(source, self.end)
    }

    /// Return whether the line holds structure: neither blank nor a lone comment.
    #[must_use]
    pub fn has_content(&self) -> bool {
        !self.is_blank && !self.is_comment
    }
}

/// Classify the line starting at the cursor's position.
#[must_use]
pub fn classify(cursor: &Cursor<'_>) -> LineInfo {
    classify_at(cursor.source(), cursor.pos())
}

/// Classify the line of `source` starting at `start`.
#[must_use]
pub fn classify_at(source: &str, start: usize) -> LineInfo {
    let end = line_end(source, start);
    let line = &source[start..end];
    let indent = line.bytes().take_while(|&b| b == b' ').count();
    let first = line[indent..].bytes().find(|&b| b != b' ' && b != b'\t');
    LineInfo {
        start,
        indent,
        content_start: start + indent,
        end,
        is_blank: first.is_none(),
        is_comment: first == Some(b'#'),
    }
}

/// An iterator over the lines of a text, splitting on `\n`, `\r\n` and `\r`.
///
/// Unlike [`str::lines`], a trailing line break yields a final empty line and a lone `\r` ends a
/// line.
#[derive(Clone, Debug)]
pub struct Lines<'a> {
    rest: Option<&'a str>,
}

/// Split `text` on line breaks.
#[must_use]
pub fn lines(text: &str) -> Lines<'_> {
    Lines { rest: Some(text) }
}

impl<'a> Iterator for Lines<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let rest = self.rest?;
        let end = line_end(rest, 0);
        if end == rest.len() {
            self.rest = None;
            Some(rest)
        } else {
            self.rest = Some(&rest[end + break_len(rest, end)..]);
            Some(&rest[..end])
        }
    }
}

#[cfg(test)]
mod test {
    use super::{classify_at, lines};

    #[test]
    fn test_classify() {
        let source = "  key: value\n\n   \t\n  # comment\n\tx";
        let info = classify_at(source, 0);
        assert_eq!(info.indent, 2);
        assert_eq!(info.content_start, 2);
        assert_eq!(info.end, 12);
        assert!(info.has_content());
        assert_eq!(info.next(source), 13);

        let info = classify_at(source, 13);
        assert!(info.is_blank);
        assert_eq!(info.end, 13);

        let info = classify_at(source, 14);
        assert!(info.is_blank);
        assert_eq!(info.indent, 3);

        let info = classify_at(source, 19);
        assert!(info.is_comment);
        assert!(!info.has_content());

        let info = classify_at(source, 31);
        assert_eq!(info.indent, 0);
        assert_eq!(info.content_start, 31);
        assert!(info.has_content());
        assert_eq!(info.next(source), source.len());
    }

    #[test]
    fn test_lines() {
        assert_eq!(lines("a\nb\r\nc\rd").collect::<Vec<_>>(), ["a", "b", "c", "d"]);
        assert_eq!(lines("a\n").collect::<Vec<_>>(), ["a", ""]);
        assert_eq!(lines("").collect::<Vec<_>>(), [""]);
    }
}
