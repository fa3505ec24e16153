//! Flow collections: `[ ... ]` and `{ ... }`.

use super::{node, Context, Parent, Parser};
use crate::{
    char_traits::{is_blank_or_breakz, is_flow},
    error::{CstError, ErrorKind},
    node::{FlowCollection, FlowKind, Node, NodeKind, Pair, Props, ScalarStyle, Token},
    span::Range,
};

impl<'input> Parser<'input> {
    /// Parse a flow collection whose opening indicator is at the cursor.
    ///
    /// Flow collections ignore indentation, except that their lines must be indented more than
    /// the enclosing block collection.
    pub(super) fn parse_flow_collection(
        &mut self,
        ctx: Context,
        errors: &mut Vec<CstError>,
    ) -> NodeKind<'input> {
        let start = self.cursor.pos();
        let (kind, close) = if self.cursor.peek() == '[' {
            (FlowKind::Sequence, ']')
        } else {
            (FlowKind::Mapping, '}')
        };
        self.cursor.skip();
        debug_print!("flow {kind:?} at byte {start}");

        let inner = Context {
            indent: ctx.indent,
            in_flow: true,
            in_collection: false,
            parent: Parent::Flow,
        };
        let mut items = vec![];
        let mut need_separator = false;
        loop {
            self.skip_flow_space(ctx.indent);
            if self.cursor.at_end() || self.cursor.next_is_document_indicator() {
                let range = Range::new(start, self.cursor.pos());
                errors.push(self.error(ErrorKind::UnterminatedFlow(close), range));
                break;
            }
            match self.cursor.peek() {
                c @ (']' | '}') => {
                    if c != close {
                        let pos = self.cursor.pos();
                        errors.push(self.error(ErrorKind::UnterminatedFlow(close), Range::new(pos, pos + 1)));
                    }
                    self.cursor.skip();
                    break;
                }
                ',' => {
                    self.cursor.skip();
                    need_separator = false;
                }
                _ => {
                    if need_separator {
                        let pos = self.cursor.pos();
                        errors.push(self.error(ErrorKind::MissingFlowSeparator, Range::empty(pos)));
                    }
                    items.push(self.parse_flow_entry(inner, kind));
                    need_separator = true;
                }
            }
        }
        errors.append(&mut self.pending_errors);
        debug_print!("flow {kind:?} closed with {} items", items.len());
        NodeKind::FlowCollection(FlowCollection { kind, items })
    }

    /// Skip whitespace, comments and line breaks between flow entries.
    ///
    /// Stops at a document marker. Lines indented no more than `indent` are recorded as errors.
    fn skip_flow_space(&mut self, indent: Option<usize>) {
        loop {
            self.cursor.skip_blanks();
            if self.cursor.peek() == '#' {
                let comment = self.take_comment();
                self.pending.push(comment);
            }
            if !self.cursor.skip_break() {
                return;
            }
            if self.cursor.next_is_document_indicator() {
                return;
            }
            let line_start = self.cursor.pos();
            let spaces = self.cursor.skip_spaces();
            let c = self.cursor.peek();
            let under_indented = indent.is_some_and(|indent| spaces <= indent);
            if under_indented && !self.cursor.next_is_breakz() && !matches!(c, ']' | '}' | '#') {
                let error = self.error(ErrorKind::FlowIndentation, Range::empty(line_start));
                self.pending_errors.push(error);
            }
        }
    }

    /// Return whether a `:` at the cursor separates a key from its value.
    ///
    /// `adjacent` allows the value to follow the `:` directly, as after a quoted key.
    fn next_is_flow_value_indicator(&self, adjacent: bool) -> bool {
        let next = self.cursor.peek_nth(1);
        self.cursor.peek() == ':' && (adjacent || is_blank_or_breakz(next) || is_flow(next))
    }

    /// Parse an entry of a flow collection: a node, or a pair.
    fn parse_flow_entry(&mut self, inner: Context, kind: FlowKind) -> Node<'input> {
        let start = self.cursor.pos();
        let c = self.cursor.peek();
        let next = self.cursor.peek_nth(1);
        let separated = is_blank_or_breakz(next) || is_flow(next);

        if c == '?' && separated {
            self.cursor.skip();
            self.skip_flow_space(inner.indent);
            let key = if self.at_flow_entry_end() || self.next_is_flow_value_indicator(false) {
                None
            } else {
                Some(self.parse_node(inner))
            };
            let key_token = self.token(start, key.as_ref().map_or(start + 1, |key| key.range.end));
            self.skip_flow_space(inner.indent);
            let (value_token, value) = if self.next_is_flow_value_indicator(false) {
                let (token, value) = self.parse_flow_value(inner);
                (Some(token), value)
            } else {
                (None, None)
            };
            return self.flow_pair(start, true, Some(key_token), key, value_token, value);
        }

        if c == ':' && separated {
            let (token, value) = self.parse_flow_value(inner);
            return self.flow_pair(start, false, None, None, Some(token), value);
        }

        let key = self.parse_node(inner);
        let after_key = self.cursor.pos();
        self.cursor.skip_blanks();
        let adjacent = match &key.kind {
            NodeKind::FlowCollection(_) => true,
            NodeKind::Scalar(scalar) => matches!(
                scalar.style,
                ScalarStyle::SingleQuoted | ScalarStyle::DoubleQuoted
            ),
            _ => false,
        };
        if self.next_is_flow_value_indicator(adjacent) {
            let key_token = self.token(start, key.range.end);
            let (token, value) = self.parse_flow_value(inner);
            return self.flow_pair(start, false, Some(key_token), Some(key), Some(token), value);
        }
        self.cursor.reset(after_key);
        if kind == FlowKind::Mapping {
            let key_token = self.token(start, key.range.end);
            return self.flow_pair(start, false, Some(key_token), Some(key), None, None);
        }
        key
    }

    /// Return whether the cursor is at the end of a flow entry.
    fn at_flow_entry_end(&self) -> bool {
        self.cursor.at_end() || matches!(self.cursor.peek(), ',' | ']' | '}')
    }

    /// Parse `: value` inside a flow collection. The cursor must be on the `:`.
    fn parse_flow_value(&mut self, inner: Context) -> (Token<'input>, Option<Node<'input>>) {
        let start = self.cursor.pos();
        self.cursor.skip();
        let after_colon = self.cursor.pos();
        self.skip_flow_space(inner.indent);
        if self.at_flow_entry_end() || self.cursor.next_is_document_indicator() {
            return (self.token(start, after_colon), None);
        }
        let value = self.parse_node(inner);
        let end = value.range.end;
        (self.token(start, end), Some(value))
    }

    /// Assemble a pair node of a flow collection.
    fn flow_pair(
        &self,
        start: usize,
        explicit: bool,
        key_token: Option<Token<'input>>,
        key: Option<Node<'input>>,
        value_token: Option<Token<'input>>,
        value: Option<Node<'input>>,
    ) -> Node<'input> {
        let pair = Pair {
            explicit,
            key_token,
            key,
            value_token,
            value,
            leading: vec![],
            errors: vec![],
        };
        let end = pair.range().end.max(start);
        node(
            self.source(),
            NodeKind::Pair(Box::new(pair)),
            Range::new(start, end),
            Props::default(),
            vec![],
            None,
            vec![],
        )
    }
}
