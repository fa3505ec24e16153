//! Literal (`|`) and folded (`>`) block scalars.
//!
//! A block scalar is scanned in two steps. [`scan_header`] reads the indicators following `|` or
//! `>`, then [`scan_body`] splits the following lines into content and empty lines and decides
//! where the scalar ends. [`resolve`] folds and chomps the lines into the value.

use crate::{
    char_traits::{is_blank, is_indent_indicator},
    cursor::{break_len, is_document_marker, line_end, preceded_by_whitespace},
    line::classify_at,
    node::{Chomping, ScalarStyle},
    span::Range,
};

/// The indicators of a block scalar.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Header {
    pub style: ScalarStyle,
    pub chomping: Chomping,
    /// Explicit indentation indicator, `1` to `9`.
    pub indent: Option<u8>,
    /// A comment following the indicators.
    pub comment: Option<Range>,
    /// Anything else following the indicators.
    pub extra: Option<Range>,
    /// Offset of the line break ending the header (or the input length).
    pub end: usize,
}

/// Read the header of the block scalar whose indicator (`|` or `>`) is at `start`.
pub(crate) fn scan_header(source: &str, start: usize) -> Header {
    let bytes = source.as_bytes();
    let style = if bytes[start] == b'|' {
        ScalarStyle::Literal
    } else {
        ScalarStyle::Folded
    };
    let mut pos = start + 1;
    let mut chomping = None;
    let mut indent = None;
    // Indentation and chomping indicators may come in either order.
    for _ in 0..2 {
        match bytes.get(pos) {
            Some(b'+') if chomping.is_none() => chomping = Some(Chomping::Keep),
            Some(b'-') if chomping.is_none() => chomping = Some(Chomping::Strip),
            Some(&digit) if indent.is_none() && is_indent_indicator(char::from(digit)) => {
                indent = Some(digit - b'0');
            }
            _ => break,
        }
        pos += 1;
    }

    let end = line_end(source, pos);
    let rest = &source[pos..end];
    let after = end - rest.trim_start_matches(is_blank).len();
    let (comment, extra) = if after == end {
        (None, None)
    } else if bytes[after] == b'#' && preceded_by_whitespace(source, after) {
        (Some(Range::new(after, end)), None)
    } else {
        (None, Some(Range::new(after, end)))
    };

    Header {
        style,
        chomping: chomping.unwrap_or(Chomping::Clip),
        indent,
        comment,
        extra,
        end,
    }
}

/// A line of a block scalar body.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum BodyLine {
    /// A line holding no content.
    Empty,
    /// A content line, its indentation stripped.
    Content(Range),
}

/// The lines of a block scalar.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Body {
    pub lines: Vec<BodyLine>,
    /// Index in `lines` of the last content line.
    pub last_content: Option<usize>,
    /// End of the last content line (the header end when there is none).
    pub content_end: usize,
    /// End of the last line belonging to the scalar, trailing empty lines included.
    pub end: usize,
    /// A leading empty line more indented than the detected content indentation.
    pub over_indented: Option<Range>,
}

impl Body {
    /// Return the number of empty lines after the last content line.
    pub fn trailing_empty_lines(&self) -> usize {
        self.last_content
            .map_or(self.lines.len(), |last| self.lines.len() - last - 1)
    }
}

/// Split the lines following the header ending at `header_end` into a [`Body`].
///
/// `parent` is the indentation of the enclosing node (`None` at document level), `explicit` the
/// indentation indicator. Content lines must be indented more than `parent`; with an indicator,
/// content indentation is exactly `parent + indicator`.
pub(crate) fn scan_body(
    source: &str,
    header_end: usize,
    parent: Option<usize>,
    explicit: Option<u8>,
) -> Body {
    let mut content_indent =
        explicit.map(|m| parent.map_or(usize::from(m) - 1, |n| n + usize::from(m)));
    let min_indent = parent.map_or(0, |n| n + 1);
    let mut body = Body {
        lines: vec![],
        last_content: None,
        content_end: header_end,
        end: header_end,
        over_indented: None,
    };
    let mut leading_max: Option<(usize, Range)> = None;
    let mut offset = header_end;

    loop {
        let brk = break_len(source, offset);
        if brk == 0 || offset + brk >= source.len() {
            break;
        }
        let start = offset + brk;
        let info = classify_at(source, start);
        if info.indent == 0 && is_document_marker(&source[start..]) {
            break;
        }

        let indent = match content_indent {
            // Whitespace past the content indentation is content, tabs included.
            Some(indent)
                if info.is_blank
                    && (info.indent < indent
                        || (info.indent == indent && info.content_start == info.end)) =>
            {
                body.lines.push(BodyLine::Empty);
                body.end = info.end;
                offset = info.end;
                continue;
            }
            Some(indent) if info.indent < indent => break,
            Some(indent) => indent,
            None if info.is_blank => {
                if leading_max.map_or(true, |(max, _)| info.indent > max) {
                    leading_max = Some((info.indent, Range::new(start, info.end)));
                }
                body.lines.push(BodyLine::Empty);
                body.end = info.end;
                offset = info.end;
                continue;
            }
            None if info.indent < min_indent => break,
            None => {
                if let Some((max, range)) = leading_max {
                    if max > info.indent {
                        body.over_indented = Some(range);
                    }
                }
                content_indent = Some(info.indent);
                info.indent
            }
        };

        body.last_content = Some(body.lines.len());
        body.lines
            .push(BodyLine::Content(Range::new(start + indent, info.end)));
        body.content_end = info.end;
        body.end = info.end;
        offset = info.end;
    }
    body
}

/// Fold and chomp the lines of `body` into the value of the scalar.
pub(crate) fn resolve(source: &str, body: &Body, style: ScalarStyle, chomping: Chomping) -> String {
    let Some(last) = body.last_content else {
        return match chomping {
            Chomping::Keep => "\n".repeat(body.lines.len()),
            Chomping::Strip | Chomping::Clip => String::new(),
        };
    };
    let lines = &body.lines[..=last];
    let mut out = if style == ScalarStyle::Literal {
        literal(source, lines)
    } else {
        folded(source, lines)
    };
    match chomping {
        Chomping::Strip => {
            out.pop();
        }
        Chomping::Clip => {}
        Chomping::Keep => super::push_line_feeds(&mut out, body.trailing_empty_lines()),
    }
    out
}

/// Every line, content or empty, ends with a line feed.
fn literal(source: &str, lines: &[BodyLine]) -> String {
    let mut out = String::new();
    for line in lines {
        if let BodyLine::Content(range) = line {
            out.push_str(range.slice(source));
        }
        out.push('\n');
    }
    out
}

/// A line break between two content lines that are not more indented becomes a space, unless
/// empty lines separate them. Breaks around more-indented lines are kept.
fn folded(source: &str, lines: &[BodyLine]) -> String {
    let mut out = String::new();
    let mut empty_lines = 0;
    // Whether the previous content line was more indented. `None` before the first one.
    let mut previous: Option<bool> = None;
    for line in lines {
        let BodyLine::Content(range) = line else {
            empty_lines += 1;
            continue;
        };
        let text = range.slice(source);
        let more_indented = text.starts_with([' ', '\t']);
        match previous {
            None => super::push_line_feeds(&mut out, empty_lines),
            Some(false) if !more_indented && empty_lines == 0 => out.push(' '),
            Some(false) if !more_indented => super::push_line_feeds(&mut out, empty_lines),
            Some(_) => super::push_line_feeds(&mut out, empty_lines + 1),
        }
        out.push_str(text);
        previous = Some(more_indented);
        empty_lines = 0;
    }
    out.push('\n');
    out
}
