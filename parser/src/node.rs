//! The concrete syntax tree.
//!
//! Nodes borrow from the source text. Each node keeps the exact slice it was parsed from, the
//! trivia (comments and blank lines) around it and the errors found while parsing it. Nodes are
//! built once, in a single forward pass, and never modified afterwards.

use std::borrow::Cow;

use crate::{
    error::{CstError, ErrorClass},
    span::Range,
};

/// A slice of the source and where it was found.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token<'input> {
    /// Where the text lies in the source.
    pub range: Range,
    /// The text itself.
    pub text: &'input str,
}

impl<'input> Token<'input> {
    /// Create a token over `range` of `source`.
    #[must_use]
    pub fn new(source: &'input str, range: Range) -> Self {
        Self {
            range,
            text: range.slice(source),
        }
    }
}

/// The kind of a [`Trivia`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TriviaKind {
    /// A comment, `#` included.
    Comment,
    /// A line holding only whitespace.
    BlankLine,
}

/// A comment or a blank line, kept for lossless reproduction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Trivia<'input> {
    /// Whether this is a comment or a blank line.
    pub kind: TriviaKind,
    /// The source text.
    pub token: Token<'input>,
}

impl<'input> Trivia<'input> {
    /// Return the text of a comment, without the leading `#`.
    #[must_use]
    pub fn comment(&self) -> Option<&'input str> {
        match self.kind {
            TriviaKind::Comment => Some(self.token.text.strip_prefix('#').unwrap_or(self.token.text)),
            TriviaKind::BlankLine => None,
        }
    }
}

/// Anchor and tag attached to a node.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Props<'input> {
    /// The anchor, `&` included.
    pub anchor: Option<Token<'input>>,
    /// The tag, `!` included.
    pub tag: Option<Token<'input>>,
    /// Comments and blank lines found among the properties.
    pub comments: Vec<Trivia<'input>>,
}

impl<'input> Props<'input> {
    /// Return the anchor name, without `&`.
    #[must_use]
    pub fn anchor_name(&self) -> Option<&'input str> {
        self.anchor.map(|anchor| &anchor.text[1..])
    }

    /// Return whether neither an anchor nor a tag is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.anchor.is_none() && self.tag.is_none()
    }
}

/// The style of a scalar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScalarStyle {
    /// A plain scalar.
    Plain,
    /// A single-quoted scalar.
    SingleQuoted,
    /// A double-quoted scalar.
    DoubleQuoted,
    /// A literal block scalar (`|`).
    Literal,
    /// A folded block scalar (`>`).
    Folded,
}

/// How the final line breaks of a block scalar are handled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Chomping {
    /// `-`: remove all trailing line breaks.
    Strip,
    /// No indicator: keep a single trailing line break.
    Clip,
    /// `+`: keep every trailing line break.
    Keep,
}

/// The resolved value of a scalar.
///
/// A scalar whose resolution raised no issue holds a [`ScalarValue::Plain`] string. Otherwise it
/// holds the best-effort value along with the value-class errors found.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScalarValue<'input> {
    /// The value resolved cleanly.
    Plain(Cow<'input, str>),
    /// The value resolved with warnings.
    WithWarnings(Cow<'input, str>, Vec<CstError>),
}

impl<'input> ScalarValue<'input> {
    /// Build a value, choosing the variant depending on whether there are errors.
    #[must_use]
    pub fn new(value: Cow<'input, str>, errors: Vec<CstError>) -> Self {
        if errors.is_empty() {
            ScalarValue::Plain(value)
        } else {
            ScalarValue::WithWarnings(value, errors)
        }
    }

    /// Return the resolved string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            ScalarValue::Plain(value) | ScalarValue::WithWarnings(value, _) => value,
        }
    }

    /// Return the errors found while resolving the value.
    #[must_use]
    pub fn errors(&self) -> &[CstError] {
        match self {
            ScalarValue::Plain(_) => &[],
            ScalarValue::WithWarnings(_, errors) => errors,
        }
    }

    /// Return whether resolving the value raised errors.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        matches!(self, ScalarValue::WithWarnings(..))
    }
}

/// A scalar node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scalar<'input> {
    /// How the scalar is written.
    pub style: ScalarStyle,
    /// The chomping of a block scalar. `None` for flow scalars.
    pub chomping: Option<Chomping>,
    /// The explicit indentation indicator of a block scalar, if any.
    pub indent_indicator: Option<u8>,
    /// The resolved value.
    pub value: ScalarValue<'input>,
}

/// A block sequence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sequence<'input> {
    /// The column at which every entry starts.
    pub indent: usize,
    /// The entries, in source order.
    pub items: Vec<SeqItem<'input>>,
}

/// A `- ` entry of a block sequence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeqItem<'input> {
    /// The entry, from `-` to the end of its node.
    pub token: Token<'input>,
    /// The node of the entry, if not empty.
    pub node: Option<Node<'input>>,
    /// Comments and blank lines preceding the entry.
    pub leading: Vec<Trivia<'input>>,
    /// Structural errors about the entry itself.
    pub errors: Vec<CstError>,
}

/// A block mapping.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mapping<'input> {
    /// The column at which every key starts.
    pub indent: usize,
    /// The entries, in source order.
    pub pairs: Vec<Pair<'input>>,
}

/// A key/value entry, in a block mapping or a flow collection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pair<'input> {
    /// Whether the key was introduced with `?`.
    pub explicit: bool,
    /// The key item: `? key` when explicit, the key node otherwise.
    pub key_token: Option<Token<'input>>,
    /// The key node. `None` for an empty key.
    pub key: Option<Node<'input>>,
    /// The value item, from `:` to the end of the value.
    pub value_token: Option<Token<'input>>,
    /// The value node. `None` when there is no `:` or nothing after it.
    pub value: Option<Node<'input>>,
    /// Comments and blank lines preceding the entry.
    pub leading: Vec<Trivia<'input>>,
    /// Structural errors about the entry itself.
    pub errors: Vec<CstError>,
}

impl<'input> Pair<'input> {
    /// Return the range covered by the entry.
    #[must_use]
    pub fn range(&self) -> Range {
        match (self.key_token, self.value_token) {
            (Some(key), Some(value)) => key.range.union(value.range),
            (Some(token), None) | (None, Some(token)) => token.range,
            (None, None) => Range::default(),
        }
    }
}

/// Whether a flow collection is a sequence or a mapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlowKind {
    /// `[ ... ]`
    Sequence,
    /// `{ ... }`
    Mapping,
}

/// A flow collection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlowCollection<'input> {
    /// Whether the collection uses brackets or braces.
    pub kind: FlowKind,
    /// The entries. Entries of a flow mapping are always [`NodeKind::Pair`] nodes.
    pub items: Vec<Node<'input>>,
}

/// The variants of [`Node`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeKind<'input> {
    /// A scalar, in any style.
    Scalar(Scalar<'input>),
    /// An alias, with its name (without `*`).
    Alias(&'input str),
    /// A block sequence.
    Sequence(Sequence<'input>),
    /// A block mapping.
    Mapping(Mapping<'input>),
    /// A key/value entry inside a flow collection.
    Pair(Box<Pair<'input>>),
    /// A flow sequence or mapping.
    FlowCollection(FlowCollection<'input>),
}

/// A node of the tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node<'input> {
    /// The variant of the node.
    pub kind: NodeKind<'input>,
    /// The range of the node itself, properties excluded.
    pub range: Range,
    /// The source text of the node, properties excluded.
    pub raw: &'input str,
    /// Anchor and tag.
    pub props: Props<'input>,
    /// Comments and blank lines found before the node.
    pub leading: Vec<Trivia<'input>>,
    /// A comment following the node on its last line.
    pub trailing: Option<Trivia<'input>>,
    /// Structural errors found while parsing the node.
    pub errors: Vec<CstError>,
}

impl<'input> Node<'input> {
    /// Return the first structural error of the node, if any.
    #[must_use]
    pub fn error(&self) -> Option<&CstError> {
        self.errors
            .iter()
            .find(|error| error.class() == ErrorClass::Structural)
    }

    /// Return the scalar data, if the node is a scalar.
    #[must_use]
    pub fn as_scalar(&self) -> Option<&Scalar<'input>> {
        match &self.kind {
            NodeKind::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }

    /// Return the sequence data, if the node is a block sequence.
    #[must_use]
    pub fn as_sequence(&self) -> Option<&Sequence<'input>> {
        match &self.kind {
            NodeKind::Sequence(sequence) => Some(sequence),
            _ => None,
        }
    }

    /// Return the mapping data, if the node is a block mapping.
    #[must_use]
    pub fn as_mapping(&self) -> Option<&Mapping<'input>> {
        match &self.kind {
            NodeKind::Mapping(mapping) => Some(mapping),
            _ => None,
        }
    }

    /// Return the flow collection data, if the node is a flow collection.
    #[must_use]
    pub fn as_flow(&self) -> Option<&FlowCollection<'input>> {
        match &self.kind {
            NodeKind::FlowCollection(flow) => Some(flow),
            _ => None,
        }
    }

    /// Return the pair data, if the node is a flow pair.
    #[must_use]
    pub fn as_pair(&self) -> Option<&Pair<'input>> {
        match &self.kind {
            NodeKind::Pair(pair) => Some(pair),
            _ => None,
        }
    }

    /// Return the resolved value, if the node is a scalar.
    #[must_use]
    pub fn str_value(&self) -> Option<&ScalarValue<'input>> {
        self.as_scalar().map(|scalar| &scalar.value)
    }

    /// Return the direct child nodes, in source order.
    #[must_use]
    pub fn children(&self) -> Vec<&Node<'input>> {
        match &self.kind {
            NodeKind::Scalar(_) | NodeKind::Alias(_) => vec![],
            NodeKind::Sequence(sequence) => sequence
                .items
                .iter()
                .filter_map(|item| item.node.as_ref())
                .collect(),
            NodeKind::Mapping(mapping) => mapping.pairs.iter().flat_map(pair_children).collect(),
            NodeKind::Pair(pair) => pair_children(pair).collect(),
            NodeKind::FlowCollection(flow) => flow.items.iter().collect(),
        }
    }

    /// Return the items of a block collection, in source order.
    ///
    /// Empty for other nodes.
    #[must_use]
    pub fn items(&self) -> Vec<Item<'_, 'input>> {
        match &self.kind {
            NodeKind::Sequence(sequence) => sequence.items(),
            NodeKind::Mapping(mapping) => mapping.items(),
            _ => vec![],
        }
    }

    /// Append every error found in this node and its descendants to `errors`.
    pub fn collect_errors<'a>(&'a self, errors: &mut Vec<&'a CstError>) {
        errors.extend(&self.errors);
        if let Some(value) = self.str_value() {
            errors.extend(value.errors());
        }
        match &self.kind {
            NodeKind::Sequence(sequence) => {
                for item in &sequence.items {
                    errors.extend(&item.errors);
                    if let Some(node) = &item.node {
                        node.collect_errors(errors);
                    }
                }
            }
            NodeKind::Mapping(mapping) => {
                for pair in &mapping.pairs {
                    collect_pair_errors(pair, errors);
                }
            }
            NodeKind::Pair(pair) => collect_pair_errors(pair, errors),
            NodeKind::FlowCollection(flow) => {
                for item in &flow.items {
                    item.collect_errors(errors);
                }
            }
            NodeKind::Scalar(_) | NodeKind::Alias(_) => {}
        }
    }
}

fn pair_children<'a, 'input>(
    pair: &'a Pair<'input>,
) -> impl Iterator<Item = &'a Node<'input>> + 'a {
    pair.key.iter().chain(pair.value.iter())
}

fn collect_pair_errors<'a>(pair: &'a Pair<'_>, errors: &mut Vec<&'a CstError>) {
    errors.extend(&pair.errors);
    for node in pair_children(pair) {
        node.collect_errors(errors);
    }
}

/// What introduces an [`Item`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Indicator {
    /// `- value`
    SeqEntry,
    /// `? key`
    ExplicitKey,
    /// `key`, the key of an implicit entry.
    ImplicitKey,
    /// `: value`
    Value,
}

/// A raw item of a block collection.
///
/// A mapping entry `key: value` is made of two items (`key` and `: value`), an explicit key
/// without value of one (`? key`).
#[derive(Clone, Copy, Debug)]
pub struct Item<'a, 'input> {
    /// What introduces the item.
    pub indicator: Indicator,
    /// The source text of the item, indicator included.
    pub token: Token<'input>,
    /// The node of the item, if not empty.
    pub node: Option<&'a Node<'input>>,
    /// Structural errors about the item itself.
    pub errors: &'a [CstError],
}

impl<'a, 'input> Item<'a, 'input> {
    /// Return the source text of the item.
    #[must_use]
    pub fn raw(&self) -> &'input str {
        self.token.text
    }

    /// Return the first error of the item, if any.
    #[must_use]
    pub fn error(&self) -> Option<&'a CstError> {
        self.errors.first()
    }
}

impl<'input> Sequence<'input> {
    /// Return the entries as [`Item`]s.
    #[must_use]
    pub fn items(&self) -> Vec<Item<'_, 'input>> {
        self.items
            .iter()
            .map(|item| Item {
                indicator: Indicator::SeqEntry,
                token: item.token,
                node: item.node.as_ref(),
                errors: &item.errors,
            })
            .collect()
    }
}

impl<'input> Mapping<'input> {
    /// Return the entries as [`Item`]s: key items and value items, in source order.
    ///
    /// Errors of an entry are reported on its first item.
    #[must_use]
    pub fn items(&self) -> Vec<Item<'_, 'input>> {
        let mut items = Vec::with_capacity(self.pairs.len() * 2);
        for pair in &self.pairs {
            let mut errors: &[CstError] = &pair.errors;
            if let Some(token) = pair.key_token {
                items.push(Item {
                    indicator: if pair.explicit {
                        Indicator::ExplicitKey
                    } else {
                        Indicator::ImplicitKey
                    },
                    token,
                    node: pair.key.as_ref(),
                    errors,
                });
                errors = &[];
            }
            if let Some(token) = pair.value_token {
                items.push(Item {
                    indicator: Indicator::Value,
                    token,
                    node: pair.value.as_ref(),
                    errors,
                });
            }
        }
        items
    }
}
