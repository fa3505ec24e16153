//! Block sequences and block mappings.

use super::{Context, Parent, Parser};
use crate::{
    error::{CstError, ErrorKind},
    node::{Mapping, Node, NodeKind, Pair, SeqItem, Sequence, Token, Trivia},
    span::Range,
};

/// Where the next candidate item of a block collection starts.
#[derive(Clone, Copy, Debug)]
struct ItemStart {
    /// Indentation of the item (its column when on the same line as the previous item).
    column: usize,
    /// The item follows the previous one on the same line.
    same_line: bool,
    /// The item is preceded by a tab.
    tab: bool,
}

impl<'input> Parser<'input> {
    /// Move to the next line that may hold an item of a collection indented at `indent`.
    ///
    /// Return `None`, with the cursor at the start of the line, when the collection ends: the
    /// input is exhausted, a document marker is found or the line is indented less than `indent`.
    fn next_item(&mut self, indent: usize) -> Option<ItemStart> {
        if !self.cursor.at_line_begin() {
            if !self.skip_line_tail() {
                return Some(ItemStart {
                    column: self.cursor.column(),
                    same_line: true,
                    tab: false,
                });
            }
            if !self.cursor.skip_break() {
                return None;
            }
        }
        let info = self.skip_trivia_lines()?;
        if self.is_document_marker_line(&info) || info.indent < indent {
            return None;
        }
        let tab = self.enter_line(info);
        Some(ItemStart {
            column: info.indent,
            same_line: false,
            tab,
        })
    }

    /// Return the errors to attach to an item starting at `start`.
    fn item_errors(&self, start: ItemStart, indent: usize) -> Vec<CstError> {
        let pos = self.cursor.pos();
        let mut errors = vec![];
        if start.tab {
            errors.push(self.error(ErrorKind::TabIndentation, Range::empty(pos)));
        }
        if start.same_line || start.column != indent {
            errors.push(self.error(ErrorKind::MisalignedItem, Range::empty(pos)));
        }
        errors
    }

    /// Parse the node following an item indicator, on the same line or nested on the next ones.
    ///
    /// `indicator_as_indent` allows a sequence nested at the column of the collection itself.
    fn parse_item_child(&mut self, ctx: Context, indicator_as_indent: bool) -> Option<Node<'input>> {
        self.cursor.skip_blanks();
        if self.cursor.peek() == '#' {
            let comment = self.take_comment();
            self.pending.push(comment);
        }
        if !self.cursor.next_is_breakz() {
            return Some(self.parse_node(ctx));
        }
        if !self.cursor.skip_break() {
            return None;
        }
        let info = self.skip_trivia_lines()?;
        if self.is_document_marker_line(&info) || !self.is_nested(&info, ctx.indent, indicator_as_indent)
        {
            return None;
        }
        if self.enter_line(info) {
            let error = self.error(ErrorKind::TabIndentation, Range::empty(info.content_start));
            self.pending_errors.push(error);
        }
        Some(self.parse_node(ctx))
    }

    /// Parse a block sequence whose first `-` is at the cursor.
    pub(super) fn parse_block_sequence(&mut self) -> (NodeKind<'input>, Range) {
        let start = self.cursor.pos();
        let indent = self.cursor.column();
        debug_print!("sequence at column {indent}");

        let mut items = vec![];
        let mut errors = vec![];
        loop {
            let leading = self.take_pending();
            items.push(self.parse_seq_item(indent, leading, errors));

            let Some(next) = self.next_item(indent) else {
                break;
            };
            if self.cursor.peek() != '-' || !self.cursor.nth_is_blank_or_breakz(1) {
                if !next.same_line {
                    self.cursor.reset(self.cursor.line_start());
                }
                break;
            }
            errors = self.item_errors(next, indent);
        }

        let end = items.last().map_or(start, |item| item.token.range.end);
        debug_print!("sequence at column {indent} closed with {} items", items.len());
        (
            NodeKind::Sequence(Sequence { indent, items }),
            Range::new(start, end),
        )
    }

    fn parse_seq_item(
        &mut self,
        indent: usize,
        leading: Vec<Trivia<'input>>,
        errors: Vec<CstError>,
    ) -> SeqItem<'input> {
        let start = self.cursor.pos();
        self.cursor.skip();
        let node = self.parse_item_child(Context::child(indent, Parent::SeqEntry), false);
        let end = node.as_ref().map_or(start + 1, |node| node.range.end);
        SeqItem {
            token: self.token(start, end),
            node,
            leading,
            errors,
        }
    }

    /// Parse a block mapping starting at the cursor, or at `first_key` when the mapping was found
    /// through its first implicit key.
    pub(super) fn parse_block_mapping(
        &mut self,
        first_key: Option<(usize, Node<'input>)>,
    ) -> (NodeKind<'input>, Range) {
        let start = first_key.as_ref().map_or(self.cursor.pos(), |(start, _)| *start);
        let indent = self.cursor.column_of(start);
        debug_print!("mapping at column {indent}");

        let mut pairs: Vec<Pair<'input>> = vec![];
        let mut first_key = first_key;
        let mut errors = vec![];
        loop {
            let leading = self.take_pending();
            if let Some((key_start, key)) = first_key.take() {
                pairs.push(self.parse_implicit_pair(indent, key_start, key, leading, errors));
            } else {
                let c = self.cursor.peek();
                let separated = self.cursor.nth_is_blank_or_breakz(1);
                match c {
                    '?' if separated => {
                        pairs.push(self.parse_explicit_pair(indent, leading, errors));
                    }
                    ':' if separated => {
                        // Only an explicit key waits for its value on a later line.
                        match pairs.last_mut() {
                            Some(pair) if pair.explicit && pair.value_token.is_none() => {
                                self.pending.extend(leading);
                                pair.errors.extend(errors);
                                let (token, value) = self.parse_map_value(indent);
                                pair.value_token = Some(token);
                                pair.value = value;
                            }
                            _ => {
                                self.pending.extend(leading);
                                let (token, value) = self.parse_map_value(indent);
                                pairs.push(Pair {
                                    explicit: false,
                                    key_token: None,
                                    key: None,
                                    value_token: Some(token),
                                    value,
                                    leading: vec![],
                                    errors,
                                });
                            }
                        }
                    }
                    '-' if separated => {
                        let pos = self.cursor.pos();
                        errors.push(self.error(ErrorKind::MixedCollection, Range::empty(pos)));
                        let key_start = self.cursor.pos();
                        let key = self.parse_node(key_context(indent));
                        pairs.push(Pair {
                            explicit: false,
                            key_token: Some(self.token(key_start, key.range.end)),
                            key: Some(key),
                            value_token: None,
                            value: None,
                            leading,
                            errors,
                        });
                    }
                    _ => {
                        let key_start = self.cursor.pos();
                        let key = self.parse_node(key_context(indent));
                        pairs.push(self.parse_implicit_pair(indent, key_start, key, leading, errors));
                    }
                }
            }

            let Some(next) = self.next_item(indent) else {
                break;
            };
            let value_on_key_line = next.same_line
                && self.cursor.peek() == ':'
                && pairs.last().is_some_and(|pair| pair.explicit && pair.value_token.is_none());
            errors = if value_on_key_line {
                vec![]
            } else {
                self.item_errors(next, indent)
            };
        }

        let end = pairs.last().map_or(start, |pair| pair.range().end);
        debug_print!("mapping at column {indent} closed with {} pairs", pairs.len());
        (
            NodeKind::Mapping(Mapping { indent, pairs }),
            Range::new(start, end),
        )
    }

    /// Parse `? key`, leaving the value to a following `: value` item.
    fn parse_explicit_pair(
        &mut self,
        indent: usize,
        leading: Vec<Trivia<'input>>,
        errors: Vec<CstError>,
    ) -> Pair<'input> {
        let start = self.cursor.pos();
        self.cursor.skip();
        let key = self.parse_item_child(Context::child(indent, Parent::ExplicitKey), true);
        let end = key.as_ref().map_or(start + 1, |key| key.range.end);
        Pair {
            explicit: true,
            key_token: Some(self.token(start, end)),
            key,
            value_token: None,
            value: None,
            leading,
            errors,
        }
    }

    /// Complete an entry whose implicit key has been parsed.
    fn parse_implicit_pair(
        &mut self,
        indent: usize,
        key_start: usize,
        key: Node<'input>,
        leading: Vec<Trivia<'input>>,
        mut errors: Vec<CstError>,
    ) -> Pair<'input> {
        if key.raw.contains(['\n', '\r']) {
            errors.push(self.error(ErrorKind::MultilineImplicitKey, key.range));
        }
        let key_token = self.token(key_start, key.range.end);
        let after_key = self.cursor.pos();
        self.cursor.skip_blanks();
        let (value_token, value) = if self.cursor.peek() == ':' && self.cursor.nth_is_blank_or_breakz(1) {
            let (token, value) = self.parse_map_value(indent);
            (Some(token), value)
        } else {
            self.cursor.reset(after_key);
            errors.push(self.error(ErrorKind::MissingMapValue, key.range));
            (None, None)
        };
        Pair {
            explicit: false,
            key_token: Some(key_token),
            key: Some(key),
            value_token,
            value,
            leading,
            errors,
        }
    }

    /// Parse `: value`. The cursor must be on the `:`.
    fn parse_map_value(&mut self, indent: usize) -> (Token<'input>, Option<Node<'input>>) {
        let start = self.cursor.pos();
        self.cursor.skip();
        let value = self.parse_item_child(Context::child(indent, Parent::MapValue), true);
        let end = value.as_ref().map_or(start + 1, |value| value.range.end);
        (self.token(start, end), value)
    }
}

/// The context of an implicit key of a mapping indented at `indent`.
fn key_context(indent: usize) -> Context {
    Context {
        indent: Some(indent),
        in_flow: false,
        in_collection: true,
        parent: Parent::MapKey,
    }
}
