//! Home to the structural parser.
//!
//! The parser is a recursive descent over the source. Each block collection is a frame of the
//! call stack remembering the column its items start at; a line indented less than a frame's
//! column closes it and hands the line back to the enclosing frame. Flow collections and scalars
//! are parsed by the same [`Parser`], their values resolved by [`crate::scalar`] as soon as their
//! extent is known.

mod block;
mod flow;

use std::borrow::Cow;

use crate::{
    char_traits::{
        is_anchor_char, is_blank, is_blank_or_breakz, is_break, is_flow, is_reserved_start,
    },
    cursor::{break_len, is_document_marker, line_prefix, preceded_by_whitespace, Cursor},
    error::{CstError, ErrorKind},
    line::{classify, LineInfo},
    node::{
        Chomping, Node, NodeKind, Props, Scalar, ScalarStyle, ScalarValue, Token, Trivia,
        TriviaKind,
    },
    scalar::{self, block as block_scalar, quoted, Issue},
    span::Range,
};

/// How many nodes deep the parser descends before cutting a document short.
pub(crate) const MAX_DEPTH: usize = 64;

/// What a node is nested in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Parent {
    /// The node is the root of a document.
    Document,
    /// The node follows `- `.
    SeqEntry,
    /// The node follows `? `.
    ExplicitKey,
    /// The node is an implicit key of a block mapping.
    MapKey,
    /// The node follows the `: ` of a block mapping.
    MapValue,
    /// The node is an entry of a flow collection.
    Flow,
}

/// Where in the tree a node is being parsed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Context {
    /// The indentation of the enclosing block collection. `None` at document level.
    pub indent: Option<usize>,
    /// Whether the node is inside a flow collection.
    pub in_flow: bool,
    /// Whether the node is a key of an existing block mapping, and must not start a new one.
    pub in_collection: bool,
    pub parent: Parent,
}

impl Context {
    /// The context of the root node of a document.
    pub fn document() -> Self {
        Self {
            indent: None,
            in_flow: false,
            in_collection: false,
            parent: Parent::Document,
        }
    }

    /// The context of a node nested in a block collection indented at `indent`.
    pub fn child(indent: usize, parent: Parent) -> Self {
        Self {
            indent: Some(indent),
            in_flow: false,
            in_collection: false,
            parent,
        }
    }

    /// Return whether content at column `col` is nested in this context.
    pub fn is_indented(&self, col: usize) -> bool {
        self.indent.map_or(true, |indent| col > indent)
    }
}

/// Anchor and tag found before a node.
struct PropsScan<'input> {
    props: Props<'input>,
    /// Offset at which the properties started.
    start: usize,
    /// Offset right after the last property.
    end: usize,
    /// Whether the node starts on a line after its properties.
    crossed_line: bool,
}

/// A scalar, alias or flow collection, before it is known whether it is an implicit key.
struct Leaf<'input> {
    kind: NodeKind<'input>,
    range: Range,
    errors: Vec<CstError>,
}

/// The structural parser.
///
/// Comments and blank lines are not attached as soon as they are read: they are held in
/// `pending` until the next node or item is built, and become its leading trivia. Errors found
/// between nodes are held the same way.
pub(crate) struct Parser<'input> {
    pub(crate) cursor: Cursor<'input>,
    pub(crate) pending: Vec<Trivia<'input>>,
    pub(crate) pending_errors: Vec<CstError>,
    /// Number of nodes being parsed, from the document root to the current one.
    depth: usize,
}

impl<'input> Parser<'input> {
    /// Create a parser at the start of `source`.
    pub fn new(source: &'input str) -> Self {
        Self {
            cursor: Cursor::new(source),
            pending: vec![],
            pending_errors: vec![],
            depth: 0,
        }
    }

    /// Return the whole input.
    pub fn source(&self) -> &'input str {
        self.cursor.source()
    }

    /// Build an error of the given kind, located at `range`.
    pub fn error(&self, kind: ErrorKind, range: Range) -> CstError {
        CstError::new(kind, range, self.cursor.marker(range.start))
    }

    /// Build a token over `start..end`.
    pub fn token(&self, start: usize, end: usize) -> Token<'input> {
        Token::new(self.source(), Range::new(start, end))
    }

    /// Remove and return the trivia held for the next node.
    pub fn take_pending(&mut self) -> Vec<Trivia<'input>> {
        std::mem::take(&mut self.pending)
    }

    /// Remove and return the errors held for the next node.
    pub fn take_pending_errors(&mut self) -> Vec<CstError> {
        std::mem::take(&mut self.pending_errors)
    }

    /// Consume a comment starting at the cursor, up to the end of the line.
    pub fn take_comment(&mut self) -> Trivia<'input> {
        let start = self.cursor.pos();
        self.cursor.skip_to_line_end();
        let end = self.cursor.pos();
        if !preceded_by_whitespace(self.source(), start) {
            let error = self.error(ErrorKind::CommentWithoutSpace, Range::new(start, end));
            self.pending_errors.push(error);
        }
        Trivia {
            kind: TriviaKind::Comment,
            token: self.token(start, end),
        }
    }

    /// Skip the blank and comment lines starting at the cursor, holding them as trivia.
    ///
    /// The cursor must be at the start of a line. Return the first line holding content, with the
    /// cursor at its start, or `None` if the input ended first.
    pub fn skip_trivia_lines(&mut self) -> Option<LineInfo> {
        loop {
            if self.cursor.at_end() {
                return None;
            }
            let info = classify(&self.cursor);
            if info.has_content() {
                return Some(info);
            }
            if info.is_comment {
                self.cursor.reset(info.content_start);
                self.cursor.skip_blanks();
                let comment = self.take_comment();
                self.pending.push(comment);
            } else {
                self.pending.push(Trivia {
                    kind: TriviaKind::BlankLine,
                    token: self.token(info.start, info.end),
                });
                self.cursor.reset(info.end);
            }
            if !self.cursor.skip_break() {
                return None;
            }
        }
    }

    /// Skip blanks and a comment up to the end of the line.
    ///
    /// Return whether the line ended (or the input did). If not, the cursor is on the next content
    /// of the line.
    pub fn skip_line_tail(&mut self) -> bool {
        self.cursor.skip_blanks();
        if self.cursor.peek() == '#' {
            let comment = self.take_comment();
            self.pending.push(comment);
        }
        self.cursor.next_is_breakz()
    }

    /// Move the cursor to the content of a line returned by [`Self::skip_trivia_lines`].
    ///
    /// Return whether the content is preceded by a tab.
    pub fn enter_line(&mut self, info: LineInfo) -> bool {
        self.cursor.reset(info.content_start);
        let tab = self.cursor.peek() == '\t';
        self.cursor.skip_blanks();
        tab
    }

    /// Return whether `info` starts a document marker line.
    pub fn is_document_marker_line(&self, info: &LineInfo) -> bool {
        info.indent == 0 && is_document_marker(&self.source()[info.start..])
    }

    /// Return whether the line of `info` holds a node nested under a block collection item.
    ///
    /// With `indicator_as_indent`, a sequence at the same column as the collection is nested too,
    /// as in `key:\n- item`.
    pub fn is_nested(&self, info: &LineInfo, indent: Option<usize>, indicator_as_indent: bool) -> bool {
        let Some(indent) = indent else {
            return true;
        };
        info.indent > indent
            || (info.indent == indent
                && indicator_as_indent
                && self.cursor.char_at(info.content_start) == '-'
                && is_blank_or_breakz(self.cursor.char_at(info.content_start + 1)))
    }

    /// Return whether a `: ` value indicator follows on the current line, past blanks.
    pub fn next_is_value_indicator(&self) -> bool {
        let rest = self.cursor.rest().trim_start_matches(is_blank);
        let mut chars = rest.chars();
        chars.next() == Some(':') && chars.next().map_or(true, is_blank_or_breakz)
    }

    /// Parse a node, its properties and everything nested in it.
    ///
    /// The cursor must be on the first character of the node (or of its properties). When the
    /// node turns out to be the first key of a block mapping, the mapping is returned instead.
    ///
    /// Past [`MAX_DEPTH`] nested nodes, the rest of the line is taken as an opaque scalar
    /// carrying a fatal error, and nothing below it is parsed.
    pub fn parse_node(&mut self, ctx: Context) -> Node<'input> {
        if self.depth >= MAX_DEPTH {
            return self.parse_too_deep();
        }
        self.depth += 1;
        let node = self.parse_nested_node(ctx);
        self.depth -= 1;
        node
    }

    /// Cut a node nested too deeply: consume the rest of its line as a plain scalar.
    fn parse_too_deep(&mut self) -> Node<'input> {
        let leading = self.take_pending();
        let mut errors = self.take_pending_errors();
        let start = self.cursor.pos();
        self.cursor.skip_to_line_end();
        let range = Range::new(start, self.cursor.pos());
        debug_print!("nesting cut at byte {start}");
        errors.push(self.error(ErrorKind::NestingTooDeep(MAX_DEPTH), range));
        let raw = range.slice(self.source());
        let kind = NodeKind::Scalar(Scalar {
            style: ScalarStyle::Plain,
            chomping: None,
            indent_indicator: None,
            value: ScalarValue::Plain(Cow::Borrowed(raw)),
        });
        node(self.source(), kind, range, Props::default(), leading, None, errors)
    }

    fn parse_nested_node(&mut self, ctx: Context) -> Node<'input> {
        let leading = self.take_pending();
        let scan = self.parse_props(ctx);
        let mut errors = self.take_pending_errors();
        let source = self.source();

        let c = self.cursor.peek();
        let next = self.cursor.peek_nth(1);
        let separated = is_blank_or_breakz(next) || (ctx.in_flow && is_flow(next));
        let empty = self.cursor.next_is_breakz()
            || (ctx.in_flow && matches!(c, ',' | ']' | '}'))
            || (!scan.props.is_empty() && c == ':' && separated)
            || (c == '#' && preceded_by_whitespace(source, self.cursor.pos()));

        if !empty && !ctx.in_flow && matches!(c, '-' | '?' | ':') && is_blank_or_breakz(next) {
            let start = self.cursor.pos();
            if ctx.parent == Parent::MapValue && !self.cursor.at_line_start() {
                errors.push(self.error(ErrorKind::InlineBlockCollection, Range::empty(start)));
            }
            let (kind, range) = if c == '-' {
                self.parse_block_sequence()
            } else {
                self.parse_block_mapping(None)
            };
            return node(source, kind, range, scan.props, leading, None, errors);
        }

        let start = if empty && !scan.crossed_line {
            scan.end
        } else {
            self.cursor.pos()
        };
        let mut trailing = None;
        // Block scalars know their own end, and may leave the cursor past it.
        let mut block_end = None;
        let mut leaf_errors = vec![];
        let kind = if empty {
            NodeKind::Scalar(Scalar {
                style: ScalarStyle::Plain,
                chomping: None,
                indent_indicator: None,
                value: ScalarValue::Plain(Cow::Borrowed("")),
            })
        } else {
            match c {
                '|' | '>' if !ctx.in_flow => {
                    let (kind, comment, end) = self.parse_block_scalar(ctx, &mut leaf_errors);
                    trailing = comment;
                    block_end = Some(end);
                    kind
                }
                '[' | '{' => self.parse_flow_collection(ctx, &mut leaf_errors),
                '\'' | '"' => self.parse_quoted(ctx, &mut leaf_errors),
                '*' => self.parse_alias(&mut leaf_errors),
                _ => self.parse_plain(ctx, &mut leaf_errors),
            }
        };
        let range = if empty {
            Range::empty(start)
        } else {
            Range::new(start, block_end.unwrap_or(self.cursor.pos()))
        };

        if block_end.is_some() {
            errors.append(&mut leaf_errors);
            return node(source, kind, range, scan.props, leading, trailing, errors);
        }
        if !ctx.in_flow && !ctx.in_collection && self.next_is_value_indicator() {
            let key = Leaf {
                kind,
                range,
                errors: leaf_errors,
            };
            return self.wrap_implicit_key(ctx, scan, key, leading, errors);
        }

        errors.append(&mut leaf_errors);
        if trailing.is_none() && !ctx.in_flow {
            trailing = self.take_trailing_comment();
        }
        node(source, kind, range, scan.props, leading, trailing, errors)
    }

    /// Turn a node followed by `: ` into the first key of a new block mapping.
    fn wrap_implicit_key(
        &mut self,
        ctx: Context,
        scan: PropsScan<'input>,
        key: Leaf<'input>,
        leading: Vec<Trivia<'input>>,
        mut errors: Vec<CstError>,
    ) -> Node<'input> {
        let source = self.source();
        let on_key_line = !scan.props.is_empty() && !scan.crossed_line;
        let (key_props, map_props, key_start) = if on_key_line {
            (scan.props, Props::default(), scan.start)
        } else {
            (Props::default(), scan.props, key.range.start)
        };
        if ctx.parent == Parent::MapValue && !at_line_start(source, key_start) {
            errors.push(self.error(ErrorKind::NestedCompactMapping, Range::empty(key_start)));
        }
        let key = node(source, key.kind, key.range, key_props, vec![], None, key.errors);
        let (kind, range) = self.parse_block_mapping(Some((key_start, key)));
        node(source, kind, range, map_props, leading, None, errors)
    }

    /// Take a comment following a node on the same line. The cursor is left untouched otherwise.
    fn take_trailing_comment(&mut self) -> Option<Trivia<'input>> {
        let pos = self.cursor.pos();
        if self.cursor.skip_blanks() > 0 && self.cursor.peek() == '#' {
            return Some(self.take_comment());
        }
        self.cursor.reset(pos);
        None
    }

    /// Parse the anchor and tag preceding a node, in any order.
    ///
    /// Properties may be followed by a line break when the node starts on a more indented line.
    fn parse_props(&mut self, ctx: Context) -> PropsScan<'input> {
        let start = self.cursor.pos();
        let mut scan = PropsScan {
            props: Props::default(),
            start,
            end: start,
            crossed_line: false,
        };
        loop {
            let prop_start = self.cursor.pos();
            match self.cursor.peek() {
                '&' if scan.props.anchor.is_none() => {
                    self.cursor.skip();
                    self.skip_name();
                    if self.cursor.pos() == prop_start + 1 {
                        let error = self.error(ErrorKind::EmptyName, Range::new(prop_start, prop_start + 1));
                        self.pending_errors.push(error);
                    }
                    scan.props.anchor = Some(self.token(prop_start, self.cursor.pos()));
                }
                '!' if scan.props.tag.is_none() => {
                    self.skip_tag(ctx.in_flow);
                    scan.props.tag = Some(self.token(prop_start, self.cursor.pos()));
                }
                _ => break,
            }
            scan.end = self.cursor.pos();

            if self.cursor.skip_blanks() > 0 && self.cursor.peek() == '#' {
                let comment = self.take_comment();
                scan.props.comments.push(comment);
            }
            if !self.cursor.next_is_break() {
                if self.cursor.at_end() {
                    self.cursor.reset(scan.end);
                }
                continue;
            }

            let line_end = self.cursor.pos();
            let held = self.pending.len();
            self.cursor.skip_break();
            match self.skip_trivia_lines() {
                Some(info)
                    if !self.is_document_marker_line(&info)
                        && (ctx.in_flow
                            || self.is_nested(&info, ctx.indent, ctx.parent != Parent::SeqEntry)) =>
                {
                    let skipped: Vec<_> = self.pending.drain(held..).collect();
                    scan.props.comments.extend(skipped);
                    if self.enter_line(info) {
                        let error = self.error(ErrorKind::TabIndentation, Range::empty(info.content_start));
                        self.pending_errors.push(error);
                    }
                    scan.crossed_line = true;
                }
                _ => {
                    self.pending.truncate(held);
                    self.cursor.reset(line_end);
                    break;
                }
            }
        }
        scan
    }

    /// Consume an anchor or alias name.
    fn skip_name(&mut self) {
        while !self.cursor.at_end() && is_anchor_char(self.cursor.peek()) {
            self.cursor.skip();
        }
    }

    /// Consume a tag: `!`, `!!suffix`, `!handle!suffix`, `!suffix` or `!<verbatim>`.
    fn skip_tag(&mut self, in_flow: bool) {
        self.cursor.skip();
        if self.cursor.peek() == '<' {
            while !self.cursor.next_is_breakz() {
                let c = self.cursor.peek();
                self.cursor.skip();
                if c == '>' {
                    break;
                }
            }
            return;
        }
        while !self.cursor.next_is_breakz() {
            let c = self.cursor.peek();
            if is_blank(c) || (in_flow && is_flow(c)) {
                break;
            }
            self.cursor.skip();
        }
    }

    /// Parse `*name`.
    fn parse_alias(&mut self, errors: &mut Vec<CstError>) -> NodeKind<'input> {
        let start = self.cursor.pos();
        self.cursor.skip();
        self.skip_name();
        let end = self.cursor.pos();
        if end == start + 1 {
            errors.push(self.error(ErrorKind::EmptyName, Range::new(start, end)));
        }
        NodeKind::Alias(&self.source()[start + 1..end])
    }

    /// Parse a plain scalar, possibly spanning several lines.
    fn parse_plain(&mut self, ctx: Context, errors: &mut Vec<CstError>) -> NodeKind<'input> {
        let start = self.cursor.pos();
        let first = self.cursor.peek();
        if is_reserved_start(first) {
            errors.push(self.error(ErrorKind::ReservedIndicator(first), Range::new(start, start + first.len_utf8())));
        }

        let source = self.source();
        let mut end = self.scan_plain_line(ctx.in_flow);
        loop {
            self.cursor.skip_blanks();
            if !self.cursor.next_is_break() {
                break;
            }
            self.cursor.skip_break();
            let Some(info) = self.next_content_line() else {
                break;
            };
            if self.is_document_marker_line(&info) || (!ctx.in_flow && !ctx.is_indented(info.indent)) {
                break;
            }
            let first = source[info.content_start..].trim_start_matches(is_blank);
            let offset = source.len() - first.len();
            let mut chars = first.chars();
            let c = chars.next().unwrap_or('\0');
            let next = chars.next().unwrap_or('\0');
            if c == '#'
                || (c == ':' && (is_blank_or_breakz(next) || (ctx.in_flow && is_flow(next))))
                || (ctx.in_flow && is_flow(c))
            {
                break;
            }
            self.cursor.reset(offset);
            end = self.scan_plain_line(ctx.in_flow);
        }
        self.cursor.reset(end);

        let raw = &source[start..end];
        NodeKind::Scalar(Scalar {
            style: ScalarStyle::Plain,
            chomping: None,
            indent_indicator: None,
            value: ScalarValue::Plain(scalar::plain::resolve(raw)),
        })
    }

    /// Return the next line holding something other than whitespace, without moving the cursor.
    fn next_content_line(&self) -> Option<LineInfo> {
        let source = self.source();
        let mut start = self.cursor.pos();
        loop {
            let info = crate::line::classify_at(source, start);
            if !info.is_blank {
                return Some(info);
            }
            if info.end >= source.len() {
                return None;
            }
            start = info.next(source);
        }
    }

    /// Consume the part of a plain scalar lying on the current line.
    ///
    /// The first character is always consumed. Return the offset past the last non-blank
    /// character, where the cursor is left.
    fn scan_plain_line(&mut self, in_flow: bool) -> usize {
        let source = self.source();
        self.cursor.skip();
        let mut end = self.cursor.pos();
        while !self.cursor.at_end() {
            let c = self.cursor.peek();
            if is_break(c) {
                break;
            }
            if is_blank(c) {
                self.cursor.skip();
                continue;
            }
            if c == '#' && preceded_by_whitespace(source, self.cursor.pos()) {
                break;
            }
            if c == ':' {
                let next = self.cursor.peek_nth(1);
                if is_blank_or_breakz(next) || (in_flow && is_flow(next)) {
                    break;
                }
            }
            if in_flow && is_flow(c) {
                break;
            }
            self.cursor.skip();
            end = self.cursor.pos();
        }
        self.cursor.reset(end);
        end
    }

    /// Parse a single- or double-quoted scalar.
    fn parse_quoted(&mut self, ctx: Context, errors: &mut Vec<CstError>) -> NodeKind<'input> {
        let start = self.cursor.pos();
        let quote = self.cursor.peek();
        self.cursor.skip();
        let inner_start = self.cursor.pos();
        let mut terminated = false;
        while !self.cursor.at_end() {
            let c = self.cursor.peek();
            if c == quote {
                if quote == '\'' && self.cursor.peek_nth(1) == '\'' {
                    self.cursor.skip_n(2);
                    continue;
                }
                terminated = true;
                break;
            }
            if c == '\\' && quote == '"' {
                self.cursor.skip();
                if !self.cursor.next_is_breakz() {
                    self.cursor.skip();
                }
                continue;
            }
            if is_break(c) {
                let before = self.cursor.pos();
                self.cursor.skip_break();
                if self.cursor.next_is_document_indicator() {
                    self.cursor.reset(before);
                    break;
                }
                continue;
            }
            self.cursor.skip();
        }
        let inner_end = self.cursor.pos();
        if terminated {
            self.cursor.skip();
        }
        let range = Range::new(start, self.cursor.pos());
        if !terminated {
            errors.push(self.error(ErrorKind::UnterminatedQuote(quote), range));
        }

        let inner = &self.source()[inner_start..inner_end];
        let indent = if ctx.in_flow { None } else { ctx.indent };
        let (style, resolved) = if quote == '\'' {
            (ScalarStyle::SingleQuoted, quoted::resolve_single(inner, range, indent))
        } else {
            (
                ScalarStyle::DoubleQuoted,
                quoted::resolve_double(inner, inner_start, range, indent),
            )
        };
        let issues = self.issues_to_errors(resolved.issues);
        NodeKind::Scalar(Scalar {
            style,
            chomping: None,
            indent_indicator: None,
            value: ScalarValue::new(resolved.value, issues),
        })
    }

    /// Parse a literal or folded block scalar.
    ///
    /// Return it along with a comment of its header and the offset it ends at. Trailing empty
    /// lines kept by `+` chomping belong to the scalar: the cursor is left on the line after them.
    fn parse_block_scalar(
        &mut self,
        ctx: Context,
        errors: &mut Vec<CstError>,
    ) -> (NodeKind<'input>, Option<Trivia<'input>>, usize) {
        let source = self.source();
        let header = block_scalar::scan_header(source, self.cursor.pos());
        if let Some(extra) = header.extra {
            errors.push(self.error(ErrorKind::BlockScalarHeaderExtra, extra));
        }
        let comment = header.comment.map(|range| Trivia {
            kind: TriviaKind::Comment,
            token: Token::new(source, range),
        });

        let body = block_scalar::scan_body(source, header.end, ctx.indent, header.indent);
        let mut issues = vec![];
        if let Some(range) = body.over_indented {
            issues.push(Issue {
                kind: ErrorKind::BlockScalarLeadingIndentation,
                range,
            });
        }
        let value = block_scalar::resolve(source, &body, header.style, header.chomping);
        let end = if header.chomping == Chomping::Keep {
            body.end
        } else {
            body.content_end
        };
        if end > body.content_end {
            self.cursor.reset(end + break_len(source, end));
        } else {
            self.cursor.reset(end);
        }
        debug_print!(
            "block scalar {:?} {:?} indent {:?}, {} lines",
            header.style,
            header.chomping,
            header.indent,
            body.lines.len()
        );

        let kind = NodeKind::Scalar(Scalar {
            style: header.style,
            chomping: Some(header.chomping),
            indent_indicator: header.indent,
            value: ScalarValue::new(Cow::Owned(value), self.issues_to_errors(issues)),
        });
        (kind, comment, end)
    }

    fn issues_to_errors(&self, issues: Vec<Issue>) -> Vec<CstError> {
        issues
            .into_iter()
            .map(|issue| self.error(issue.kind, issue.range))
            .collect()
    }
}

/// Return whether only spaces precede `offset` on its line.
fn at_line_start(source: &str, offset: usize) -> bool {
    line_prefix(source, offset).bytes().all(|b| b == b' ')
}

/// Assemble a node once its extent is known.
fn node<'input>(
    source: &'input str,
    kind: NodeKind<'input>,
    range: Range,
    props: Props<'input>,
    leading: Vec<Trivia<'input>>,
    trailing: Option<Trivia<'input>>,
    errors: Vec<CstError>,
) -> Node<'input> {
    Node {
        kind,
        range,
        raw: range.slice(source),
        props,
        leading,
        trailing,
        errors,
    }
}
