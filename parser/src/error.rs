//! Errors recorded on the tree.
//!
//! Parsing never fails as a whole. Every problem is turned into a [`CstError`] and attached to the
//! node, item or document it was found in, and parsing goes on with a best-effort structure.

use thiserror::Error;

use crate::span::{Marker, Range};

/// Whether an error concerns the shape of the tree or the value of a scalar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// Indentation violations, malformed headers, unterminated constructs.
    Structural,
    /// Scalar folding or escaping issues. The value is still resolved.
    Value,
}

/// The kinds of errors the parser records.
///
/// The message of each kind is part of the public contract and matches what other YAML CST
/// consumers expect.
#[derive(Clone, Debug, Error, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A collection item does not start at the collection's indentation.
    #[error("All collection items must start at the same column")]
    MisalignedItem,
    /// A sequence entry appears at the indentation of a mapping.
    #[error("A collection cannot be both a mapping and a sequence")]
    MixedCollection,
    /// Directives were not followed by `---`.
    #[error("Missing directives-end indicator line")]
    MissingDirectivesEnd,
    /// `...` is followed by something other than a comment.
    #[error("Document end marker line cannot have a non-comment suffix")]
    DocumentEndSuffix,
    /// More than one root node in a document.
    #[error("Document contains trailing content not separated by a ... or --- line")]
    TrailingContent,
    /// A `#` directly follows a token.
    #[error("Comments must be separated from other tokens by white space characters")]
    CommentWithoutSpace,
    /// A plain scalar starts with an indicator it may not start with.
    #[error("Plain value cannot start with reserved character {0}")]
    ReservedIndicator(char),
    /// `a: b: c`.
    #[error("Nested mappings are not allowed in compact mappings")]
    NestedCompactMapping,
    /// A block collection starts on the line of a mapping value indicator.
    #[error("Block collection must not have preceding content here")]
    InlineBlockCollection,
    /// An implicit key spans several lines.
    #[error("Implicit map keys need to be on a single line")]
    MultilineImplicitKey,
    /// A mapping entry has no `:`.
    #[error("Implicit map keys need to be followed by map values")]
    MissingMapValue,
    /// Tabs used where indentation is expected.
    #[error("Tabs are not allowed as indentation")]
    TabIndentation,
    /// A flow collection line is not indented more than its parent.
    #[error("Insufficient indentation in flow collection")]
    FlowIndentation,
    /// The flow collection was not closed by the matching indicator.
    #[error("Expected flow collection to end with {0}")]
    UnterminatedFlow(char),
    /// Two flow collection entries without a `,` between them.
    #[error("Missing , between flow collection items")]
    MissingFlowSeparator,
    /// A quoted scalar runs to the end of the document.
    #[error("Missing closing {0}quote")]
    UnterminatedQuote(char),
    /// Garbage after a block scalar's indicators.
    #[error("Block scalar header includes extra characters")]
    BlockScalarHeaderExtra,
    /// Collections nested deeper than the parser follows.
    #[error("Nodes are nested more than {0} levels deep")]
    NestingTooDeep(usize),
    /// `&` or `*` without a name.
    #[error("Anchor and alias names must not be empty")]
    EmptyName,
    /// A continuation line of a single-quoted scalar is not indented enough.
    #[error("Multi-line single-quoted string needs to be sufficiently indented")]
    SingleQuotedIndentation,
    /// A continuation line of a double-quoted scalar is not indented enough.
    #[error("Multi-line double-quoted string needs to be sufficiently indented")]
    DoubleQuotedIndentation,
    /// Unknown or malformed escape in a double-quoted scalar.
    #[error("Invalid escape sequence {0}")]
    InvalidEscape(String),
    /// Leading empty lines more indented than the auto-detected content indentation.
    #[error(
        "Block scalars with more-indented leading empty lines must use an explicit indentation indicator"
    )]
    BlockScalarLeadingIndentation,
}

impl ErrorKind {
    /// Return the [`ErrorClass`] of this kind.
    #[must_use]
    pub fn class(&self) -> ErrorClass {
        match self {
            ErrorKind::SingleQuotedIndentation
            | ErrorKind::DoubleQuotedIndentation
            | ErrorKind::InvalidEscape(_)
            | ErrorKind::BlockScalarLeadingIndentation => ErrorClass::Value,
            _ => ErrorClass::Structural,
        }
    }

    /// Return whether no valid node boundary could be established for this error.
    ///
    /// Consumers that cannot cope with partial documents should discard a document holding a
    /// fatal error.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ErrorKind::UnterminatedFlow(_)
                | ErrorKind::UnterminatedQuote(_)
                | ErrorKind::NestingTooDeep(_)
        )
    }
}

/// An error found while parsing, attached to the tree.
#[derive(Clone, Debug, Error, PartialEq, Eq, Hash)]
#[error("{kind} at {marker}")]
pub struct CstError {
    kind: ErrorKind,
    range: Range,
    marker: Marker,
}

impl CstError {
    /// Create a new error covering `range`, starting at `marker`.
    #[must_use]
    pub fn new(kind: ErrorKind, range: Range, marker: Marker) -> Self {
        Self {
            kind,
            range,
            marker,
        }
    }

    /// Return the kind of the error.
    #[must_use]
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Return the source range the error applies to.
    #[must_use]
    pub fn range(&self) -> Range {
        self.range
    }

    /// Return the position at which the error starts.
    #[must_use]
    pub fn marker(&self) -> &Marker {
        &self.marker
    }

    /// Return the message of the error, without position.
    #[must_use]
    pub fn info(&self) -> String {
        self.kind.to_string()
    }

    /// Shorthand for `self.kind().class()`.
    #[must_use]
    pub fn class(&self) -> ErrorClass {
        self.kind.class()
    }

    /// Shorthand for `self.kind().is_fatal()`.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        self.kind.is_fatal()
    }
}
