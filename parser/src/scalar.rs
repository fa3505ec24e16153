//! Scalar value resolution.
//!
//! The parser finds where a scalar starts and ends; the resolvers in this module turn the raw
//! source text of the scalar into its value, following the folding rules of its style. Issues
//! found while resolving do not stop resolution: they are returned along with a best-effort value.

pub(crate) mod block;
pub(crate) mod plain;
pub(crate) mod quoted;

use std::borrow::Cow;

use crate::{error::ErrorKind, span::Range};

/// A problem found while resolving a value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Issue {
    pub kind: ErrorKind,
    pub range: Range,
}

/// The outcome of resolving a flow scalar.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Resolved<'input> {
    pub value: Cow<'input, str>,
    pub issues: Vec<Issue>,
}

impl<'input> Resolved<'input> {
    fn clean(value: Cow<'input, str>) -> Self {
        Self {
            value,
            issues: vec![],
        }
    }
}

/// Line folding for plain and quoted scalars.
///
/// Lines are fed already trimmed. A single line break between two non-empty lines becomes a
/// space; each empty line in between becomes a line feed. Empty lines before the first and after
/// the last non-empty line are dropped.
#[derive(Debug, Default)]
struct Folder {
    out: String,
    empty_lines: usize,
    started: bool,
}

impl Folder {
    fn line(&mut self, text: &str) {
        if text.is_empty() {
            self.empty_lines += 1;
            return;
        }
        if self.started {
            self.separate();
        }
        self.out.push_str(text);
        self.started = true;
        self.empty_lines = 0;
    }

    fn separate(&mut self) {
        if self.empty_lines == 0 {
            self.out.push(' ');
        } else {
            push_line_feeds(&mut self.out, self.empty_lines);
        }
    }

    fn finish(self) -> String {
        self.out
    }
}

fn push_line_feeds(out: &mut String, count: usize) {
    out.extend(std::iter::repeat('\n').take(count));
}
