//! Documents and streams.

use crate::{
    char_traits::{is_blank, is_bom},
    cursor::is_document_marker,
    error::{CstError, ErrorKind},
    node::{Node, Token, Trivia},
    parser::{Context, Parser},
    span::Range,
};

/// A `%` directive line, kept opaque.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Directive<'input> {
    /// The directive name, without `%` (`YAML`, `TAG`, ...).
    pub name: &'input str,
    /// The whole directive, comment excluded.
    pub token: Token<'input>,
}

/// A document of a YAML stream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Document<'input> {
    /// The part of the source covered by the document.
    ///
    /// The ranges of the documents of a stream follow each other and cover the whole input.
    pub range: Range,
    /// The source text of the document.
    pub raw: &'input str,
    /// Directives preceding the document.
    pub directives: Vec<Directive<'input>>,
    /// The `---` marker, if any.
    pub start_marker: Option<Token<'input>>,
    /// The `...` marker, if any.
    pub end_marker: Option<Token<'input>>,
    /// The root node. `None` for an empty document.
    pub root: Option<Node<'input>>,
    /// Nodes following the root without being part of it.
    pub stray: Vec<Node<'input>>,
    /// Comments and blank lines not attached to any node.
    pub trivia: Vec<Trivia<'input>>,
    /// Errors not attached to any node.
    pub errors: Vec<CstError>,
}

impl<'input> Document<'input> {
    /// Return whether the document starts with `---`.
    #[must_use]
    pub fn explicit_start(&self) -> bool {
        self.start_marker.is_some()
    }

    /// Return whether the document ends with `...`.
    #[must_use]
    pub fn explicit_end(&self) -> bool {
        self.end_marker.is_some()
    }

    /// Return the root node, if the document is not empty.
    #[must_use]
    pub fn contents(&self) -> Option<&Node<'input>> {
        self.root.as_ref()
    }

    /// Return every error of the document, its nodes included, in source order.
    #[must_use]
    pub fn errors(&self) -> Vec<&CstError> {
        let mut errors: Vec<&CstError> = self.errors.iter().collect();
        for node in self.root.iter().chain(&self.stray) {
            node.collect_errors(&mut errors);
        }
        errors.sort_by_key(|error| error.range().start);
        errors
    }

    /// Return whether the document holds an error after which its structure is unreliable.
    #[must_use]
    pub fn has_fatal_error(&self) -> bool {
        self.errors().iter().any(|error| error.is_fatal())
    }
}

/// Parse a YAML stream into its documents.
///
/// Parsing never fails: errors are recorded on the tree. An empty input yields a single empty
/// document.
///
/// ```
/// let documents = yaml_cst::parse("a: 1\n---\n- b\n");
/// assert_eq!(documents.len(), 2);
/// assert_eq!(documents[1].raw, "---\n- b\n");
/// ```
#[must_use]
pub fn parse(source: &str) -> Vec<Document<'_>> {
    let mut parser = Parser::new(source);
    let mut documents = vec![];
    loop {
        documents.push(parser.parse_document());
        if parser.cursor.at_end() {
            break;
        }
    }
    documents
}

impl<'input> Parser<'input> {
    /// Parse a document, from its directives to its `...` marker or the start of the next one.
    fn parse_document(&mut self) -> Document<'input> {
        let start = self.cursor.pos();
        let bom = is_bom(self.cursor.peek());
        if bom {
            self.cursor.skip();
        }
        debug_print!("document at byte {start}");

        let mut errors = vec![];
        let directives = self.parse_directives();
        let after_bom = bom && self.cursor.pos() == start + '\u{feff}'.len_utf8();
        let start_marker = if self.cursor.next_is_document_start()
            || (after_bom && self.cursor.rest().starts_with("---") && is_document_marker(self.cursor.rest()))
        {
            let marker = self.token(self.cursor.pos(), self.cursor.pos() + 3);
            self.cursor.skip_n(3);
            Some(marker)
        } else {
            if let (Some(first), Some(last)) = (directives.first(), directives.last()) {
                let range = first.token.range.union(last.token.range);
                errors.push(self.error(ErrorKind::MissingDirectivesEnd, range));
            }
            None
        };

        let mut root: Option<Node<'input>> = None;
        let mut stray = vec![];
        loop {
            if !self.cursor.at_line_begin() && self.skip_line_tail() && !self.cursor.skip_break() {
                break;
            }
            if self.cursor.at_line_begin() {
                let Some(info) = self.skip_trivia_lines() else {
                    break;
                };
                if self.is_document_marker_line(&info) {
                    break;
                }
                if self.enter_line(info) {
                    let error = self.error(ErrorKind::TabIndentation, Range::empty(info.content_start));
                    self.pending_errors.push(error);
                }
            }

            let before = self.cursor.pos();
            let mut node = self.parse_node(Context::document());
            if self.cursor.pos() == before {
                self.cursor.skip();
            }
            if root.is_none() {
                root = Some(node);
            } else {
                let error = self.error(ErrorKind::TrailingContent, node.range);
                node.errors.push(error);
                stray.push(node);
            }
        }

        let end_marker = if self.cursor.next_is_document_end() {
            Some(self.parse_document_end())
        } else {
            None
        };

        errors.append(&mut self.pending_errors);
        let range = Range::new(start, self.cursor.pos());
        debug_print!("document closed at byte {}", range.end);
        Document {
            range,
            raw: range.slice(self.source()),
            directives,
            start_marker,
            end_marker,
            root,
            stray,
            trivia: self.take_pending(),
            errors,
        }
    }

    /// Parse the `%` lines opening a document, along with the blank and comment lines around them.
    fn parse_directives(&mut self) -> Vec<Directive<'input>> {
        let mut directives = vec![];
        while let Some(info) = self.skip_trivia_lines() {
            if info.indent != 0 || self.cursor.peek() != '%' {
                break;
            }
            let start = self.cursor.pos();
            self.cursor.skip_to_line_end();
            let line = &self.source()[start..self.cursor.pos()];
            let mut end = line.len();
            let mut previous_blank = false;
            for (i, c) in line.char_indices() {
                if c == '#' && previous_blank {
                    end = i;
                    break;
                }
                previous_blank = is_blank(c);
            }
            let text = line[..end].trim_end_matches(is_blank);
            let name = text[1..].split(is_blank).next().unwrap_or_default();
            directives.push(Directive {
                name,
                token: self.token(start, start + text.len()),
            });
            if end < line.len() {
                self.cursor.reset(start + end);
                let comment = self.take_comment();
                self.pending.push(comment);
            }
            if !self.cursor.skip_break() {
                break;
            }
        }
        directives
    }

    /// Consume `...` and the rest of its line, then the blank and comment lines following it.
    fn parse_document_end(&mut self) -> Token<'input> {
        let start = self.cursor.pos();
        let marker = self.token(start, start + 3);
        self.cursor.skip_n(3);
        self.cursor.skip_blanks();
        if self.cursor.peek() == '#' {
            let comment = self.take_comment();
            self.pending.push(comment);
        } else if !self.cursor.next_is_breakz() {
            let suffix = self.cursor.pos();
            self.cursor.skip_to_line_end();
            let error = self.error(ErrorKind::DocumentEndSuffix, Range::new(suffix, self.cursor.pos()));
            self.pending_errors.push(error);
        }
        if self.cursor.skip_break() {
            self.skip_trivia_lines();
        }
        marker
    }
}
