use std::{borrow::Cow, iter::Peekable, str::CharIndices};

use super::{Folder, Issue, Resolved};
use crate::{
    char_traits::{as_hex, is_blank, is_hex},
    error::ErrorKind,
    line::lines,
    span::Range,
};

/// Resolve the value of a single-quoted scalar.
///
/// `inner` is the text between the quotes and `range` the whole scalar. Continuation lines must
/// be indented more than `indent`, when given; an under-indented line is still folded in.
pub(crate) fn resolve_single<'input>(
    inner: &'input str,
    range: Range,
    indent: Option<usize>,
) -> Resolved<'input> {
    if !inner.contains(['\n', '\r']) {
        let value = if inner.contains("''") {
            Cow::Owned(inner.replace("''", "'"))
        } else {
            Cow::Borrowed(inner)
        };
        return Resolved::clean(value);
    }

    let lines: Vec<&str> = lines(inner).collect();
    let last = lines.len() - 1;
    let mut folder = Folder::default();
    let mut under_indented = false;
    for (i, line) in lines.into_iter().enumerate() {
        let mut text = line;
        if i > 0 {
            let spaces = text.bytes().take_while(|&b| b == b' ').count();
            text = text.trim_start_matches(is_blank);
            if !text.is_empty() && indent.is_some_and(|indent| spaces <= indent) {
                under_indented = true;
            }
        }
        if i < last {
            text = text.trim_end_matches(is_blank);
        }
        folder.line(&text.replace("''", "'"));
    }

    let mut issues = vec![];
    if under_indented {
        issues.push(Issue {
            kind: ErrorKind::SingleQuotedIndentation,
            range,
        });
    }
    Resolved {
        value: Cow::Owned(folder.finish()),
        issues,
    }
}

/// Resolve the value of a double-quoted scalar.
///
/// `inner` is the text between the quotes, starting at offset `inner_start` in the source, and
/// `range` the whole scalar. Indentation is checked as for [`resolve_single`].
pub(crate) fn resolve_double<'input>(
    inner: &'input str,
    inner_start: usize,
    range: Range,
    indent: Option<usize>,
) -> Resolved<'input> {
    if !inner.contains(['\\', '\n', '\r']) {
        return Resolved::clean(Cow::Borrowed(inner));
    }

    let mut out = String::with_capacity(inner.len());
    let mut issues = vec![];
    // Length of `out` that trimming trailing whitespace before a line break must preserve.
    let mut hard = 0;
    let mut under_indented = false;
    let mut chars = inner.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => {
                let Some((_, escaped)) = chars.next() else {
                    out.push('\\');
                    hard = out.len();
                    continue;
                };
                if escaped == '\r' || escaped == '\n' {
                    if escaped == '\r' {
                        chars.next_if(|&(_, c)| c == '\n');
                    }
                    let (empty_lines, next_indent) = skip_line_prefixes(&mut chars);
                    super::push_line_feeds(&mut out, empty_lines);
                    under_indented |= is_under_indented(next_indent, indent);
                } else if let Some(unescaped) = simple_escape(escaped) {
                    out.push(unescaped);
                } else if let Some(width) = hex_escape_width(escaped) {
                    let digits = take_hex(&mut chars, width);
                    match decode_hex(&digits, width) {
                        Some(unescaped) => out.push(unescaped),
                        None => {
                            let text = format!("\\{escaped}{digits}");
                            issues.push(escape_issue(&text, inner_start + i));
                            out.push_str(&text);
                        }
                    }
                } else {
                    let text = format!("\\{escaped}");
                    issues.push(escape_issue(&text, inner_start + i));
                    out.push_str(&text);
                }
                hard = out.len();
            }
            '\r' | '\n' => {
                if c == '\r' {
                    chars.next_if(|&(_, c)| c == '\n');
                }
                out.truncate(hard);
                let (empty_lines, next_indent) = skip_line_prefixes(&mut chars);
                if next_indent.is_some() && !out.is_empty() {
                    if empty_lines == 0 {
                        out.push(' ');
                    } else {
                        super::push_line_feeds(&mut out, empty_lines);
                    }
                }
                under_indented |= is_under_indented(next_indent, indent);
                hard = out.len();
            }
            _ => {
                out.push(c);
                if !is_blank(c) {
                    hard = out.len();
                }
            }
        }
    }

    if under_indented {
        issues.push(Issue {
            kind: ErrorKind::DoubleQuotedIndentation,
            range,
        });
    }
    Resolved {
        value: Cow::Owned(out),
        issues,
    }
}

/// Skip the whitespace at the start of the lines following a line break, and any empty line.
///
/// Return the number of empty lines skipped and the indentation of the next line holding content
/// (`None` if the text ended first).
fn skip_line_prefixes(chars: &mut Peekable<CharIndices<'_>>) -> (usize, Option<usize>) {
    let mut empty_lines = 0;
    loop {
        let mut spaces = 0;
        let mut tabbed = false;
        while let Some(&(_, c)) = chars.peek() {
            match c {
                ' ' if !tabbed => spaces += 1,
                ' ' => {}
                '\t' => tabbed = true,
                _ => break,
            }
            chars.next();
        }
        match chars.peek() {
            Some(&(_, '\r' | '\n')) => {
                if chars.next().is_some_and(|(_, c)| c == '\r') {
                    chars.next_if(|&(_, c)| c == '\n');
                }
                empty_lines += 1;
            }
            Some(_) => return (empty_lines, Some(spaces)),
            None => return (empty_lines, None),
        }
    }
}

fn is_under_indented(line_indent: Option<usize>, indent: Option<usize>) -> bool {
    matches!((line_indent, indent), (Some(line), Some(indent)) if line <= indent)
}

fn simple_escape(c: char) -> Option<char> {
    Some(match c {
        '0' => '\0',
        'a' => '\x07',
        'b' => '\x08',
        't' | '\t' => '\t',
        'n' => '\n',
        'v' => '\x0b',
        'f' => '\x0c',
        'r' => '\r',
        'e' => '\x1b',
        ' ' => ' ',
        '"' => '"',
        '/' => '/',
        '\\' => '\\',
        'N' => '\u{85}',
        '_' => '\u{a0}',
        'L' => '\u{2028}',
        'P' => '\u{2029}',
        _ => return None,
    })
}

fn hex_escape_width(c: char) -> Option<usize> {
    match c {
        'x' => Some(2),
        'u' => Some(4),
        'U' => Some(8),
        _ => None,
    }
}

fn take_hex(chars: &mut Peekable<CharIndices<'_>>, width: usize) -> String {
    let mut digits = String::with_capacity(width);
    while digits.len() < width {
        match chars.next_if(|&(_, c)| is_hex(c)) {
            Some((_, c)) => digits.push(c),
            None => break,
        }
    }
    digits
}

fn decode_hex(digits: &str, width: usize) -> Option<char> {
    if digits.len() != width {
        return None;
    }
    char::from_u32(digits.chars().fold(0, |code, c| code * 16 + as_hex(c)))
}

fn escape_issue(text: &str, start: usize) -> Issue {
    Issue {
        kind: ErrorKind::InvalidEscape(text.to_owned()),
        range: Range::new(start, start + text.len()),
    }
}
