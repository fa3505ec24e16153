//! Positional bookkeeping over the source text.

use crate::{
    char_traits::{is_blank, is_blank_or_breakz, is_break},
    span::{LineIndex, Marker, Range},
};

/// A position walker over the source text.
///
/// The cursor only ever stops on character boundaries. It does no parsing on its own: it peeks,
/// skips, reports where it is and can be reset to any offset it previously returned through
/// [`Cursor::pos`].
///
/// Peeking past the end of the input yields `\0`. Since `\0` may also appear in the input, loops
/// that must terminate check [`Cursor::at_end`] rather than the sentinel.
#[derive(Clone, Debug)]
pub struct Cursor<'input> {
    /// The whole input.
    source: &'input str,
    /// Current offset (in bytes) in `source`.
    pos: usize,
    /// Line table used to report [`Marker`]s.
    lines: LineIndex<'input>,
}

impl<'input> Cursor<'input> {
    /// Create a new [`Cursor`] at the start of `source`.
    #[must_use]
    pub fn new(source: &'input str) -> Self {
        Self {
            source,
            pos: 0,
            lines: LineIndex::new(source),
        }
    }

    /// Return the whole input.
    #[must_use]
    pub fn source(&self) -> &'input str {
        self.source
    }

    /// Return the current offset (in bytes).
    #[must_use]
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Move the cursor back (or forward) to an offset previously obtained from [`Cursor::pos`].
    pub fn reset(&mut self, pos: usize) {
        debug_assert!(self.source.is_char_boundary(pos));
        self.pos = pos;
    }

    /// Return whether the whole input has been consumed.
    #[must_use]
    pub fn at_end(&self) -> bool {
        self.pos >= self.source.len()
    }

    /// Return the input that has not been consumed yet.
    #[must_use]
    pub fn rest(&self) -> &'input str {
        &self.source[self.pos..]
    }

    /// Return the text covered by `range`.
    #[must_use]
    pub fn slice(&self, range: Range) -> &'input str {
        range.slice(self.source)
    }

    /// Return the next character, without consuming it, or `\0` at the end of the input.
    #[inline]
    #[must_use]
    pub fn peek(&self) -> char {
        self.rest().chars().next().unwrap_or('\0')
    }

    /// Return the `n`-th character ahead, without consuming it, or `\0` past the end.
    #[inline]
    #[must_use]
    pub fn peek_nth(&self, n: usize) -> char {
        self.rest().chars().nth(n).unwrap_or('\0')
    }

    /// Consume the next character.
    #[inline]
    pub fn skip(&mut self) {
        if let Some(c) = self.rest().chars().next() {
            self.pos += c.len_utf8();
        }
    }

    /// Consume the next `count` characters.
    pub fn skip_n(&mut self, count: usize) {
        for _ in 0..count {
            self.skip();
        }
    }

    /// Consume spaces and tabs. Return the number of characters consumed.
    pub fn skip_blanks(&mut self) -> usize {
        let count = self.rest().bytes().take_while(|&b| b == b' ' || b == b'\t').count();
        self.pos += count;
        count
    }

    /// Consume spaces only. Return the number of spaces consumed.
    pub fn skip_spaces(&mut self) -> usize {
        let count = self.rest().bytes().take_while(|&b| b == b' ').count();
        self.pos += count;
        count
    }

    /// Consume characters up to (not including) the next line break or the end of the input.
    pub fn skip_to_line_end(&mut self) {
        self.pos = self.line_end();
    }

    /// Return whether the next character is a line break.
    #[inline]
    #[must_use]
    pub fn next_is_break(&self) -> bool {
        is_break(self.peek())
    }

    /// Return whether the next character is a line break or the input is exhausted.
    #[inline]
    #[must_use]
    pub fn next_is_breakz(&self) -> bool {
        self.at_end() || self.next_is_break()
    }

    /// Return whether the `n`-th character ahead is a blank, a break or past the end.
    #[inline]
    #[must_use]
    pub fn nth_is_blank_or_breakz(&self, n: usize) -> bool {
        is_blank_or_breakz(self.peek_nth(n))
    }

    /// Consume a line break (`\n`, `\r\n` or `\r`). Return whether one was consumed.
    pub fn skip_break(&mut self) -> bool {
        match self.peek() {
            '\r' if self.peek_nth(1) == '\n' => {
                self.pos += 2;
                true
            }
            '\r' | '\n' => {
                self.pos += 1;
                true
            }
            _ => false,
        }
    }

    /// Return the offset at which the current line starts.
    #[must_use]
    pub fn line_start(&self) -> usize {
        line_start(self.source, self.pos)
    }

    /// Return the offset of the line break ending the current line, or the input length.
    #[must_use]
    pub fn line_end(&self) -> usize {
        line_end(self.source, self.pos)
    }

    /// Return whether the cursor sits right at the start of a line.
    #[must_use]
    pub fn at_line_begin(&self) -> bool {
        self.line_start() == self.pos
    }

    /// Return whether only spaces precede the cursor on its line.
    #[must_use]
    pub fn at_line_start(&self) -> bool {
        line_prefix(self.source, self.pos).bytes().all(|b| b == b' ')
    }

    /// Return the column (in characters) of the cursor on its line.
    #[must_use]
    pub fn column(&self) -> usize {
        self.column_of(self.pos)
    }

    /// Return the column (in characters) of `offset` on its line.
    #[must_use]
    pub fn column_of(&self, offset: usize) -> usize {
        line_prefix(self.source, offset).chars().count()
    }

    /// Check whether the next characters are a document indicator (`---` or `...`) at column 0.
    #[must_use]
    pub fn next_is_document_indicator(&self) -> bool {
        self.next_is_document_start() || self.next_is_document_end()
    }

    /// Check whether the next characters are a start of document (`---`) at column 0.
    #[must_use]
    pub fn next_is_document_start(&self) -> bool {
        self.next_is_marker("---")
    }

    /// Check whether the next characters are an end of document (`...`) at column 0.
    #[must_use]
    pub fn next_is_document_end(&self) -> bool {
        self.next_is_marker("...")
    }

    fn next_is_marker(&self, marker: &str) -> bool {
        self.at_line_begin() && self.rest().starts_with(marker) && self.nth_is_blank_or_breakz(3)
    }

    /// Return the character at `offset`, or `\0` past the end of the input.
    #[must_use]
    pub fn char_at(&self, offset: usize) -> char {
        self.source[offset..].chars().next().unwrap_or('\0')
    }

    /// Return the [`Marker`] of the given offset.
    #[must_use]
    pub fn marker(&self, offset: usize) -> Marker {
        self.lines.marker(offset)
    }
}

/// Return the offset at which the line containing `offset` starts.
#[must_use]
pub fn line_start(source: &str, offset: usize) -> usize {
    source[..offset]
        .rfind(['\n', '\r'])
        .map_or(0, |i| i + 1)
}

/// Return the text between the start of the line containing `offset` and `offset`.
///
/// A byte order mark opening the line is left out.
#[must_use]
pub fn line_prefix(source: &str, offset: usize) -> &str {
    let prefix = &source[line_start(source, offset)..offset];
    prefix.strip_prefix('\u{feff}').unwrap_or(prefix)
}

/// Return the offset of the line break ending the line containing `offset`.
#[must_use]
pub fn line_end(source: &str, offset: usize) -> usize {
    source[offset..]
        .find(['\n', '\r'])
        .map_or(source.len(), |i| offset + i)
}

/// Return the length in bytes of the line break at `offset` (0 if there is none).
#[must_use]
pub fn break_len(source: &str, offset: usize) -> usize {
    match source.as_bytes().get(offset..) {
        Some([b'\r', b'\n', ..]) => 2,
        Some([b'\r' | b'\n', ..]) => 1,
        _ => 0,
    }
}

/// Return whether `text` starts with a document marker (`---` or `...`) followed by a blank.
#[must_use]
pub fn is_document_marker(text: &str) -> bool {
    (text.starts_with("---") || text.starts_with("..."))
        && text[3..].chars().next().map_or(true, is_blank_or_breakz)
}

/// Return whether the character at `offset` is preceded by a blank, a line break or nothing.
#[must_use]
pub fn preceded_by_whitespace(source: &str, offset: usize) -> bool {
    source[..offset]
        .chars()
        .next_back()
        .map_or(true, |c| is_blank(c) || is_break(c))
}
