// Copyright 2015, Yuheng Chen.
// Copyright 2023, Ethiraric.
// See the LICENSE file at the top-level directory of this distribution.

//! Lossless YAML 1.2 parser producing a concrete syntax tree.
//!
//! The tree keeps every byte of the input: each node knows the exact slice of source it was parsed
//! from, along with the comments and blank lines around it. Concatenating the documents of a
//! stream gives back the input. On top of the raw text, every scalar exposes its value, resolved
//! according to the folding and chomping rules of its style.
//!
//! Parsing never fails. Problems are recorded as [`CstError`]s on the node they were found in and
//! parsing goes on with a best-effort structure. Structural errors live in [`Node::errors`], value
//! errors (bad escapes, insufficient indentation of a quoted scalar) in the scalar's
//! [`ScalarValue`].
//!
//! This crate does not compose documents into native values, nor does it follow aliases or give
//! tags and directives any meaning: it stops at the syntax tree.
//!
//! # Usage
//!
//! ```
//! use yaml_cst::{parse, ScalarValue};
//!
//! let documents = parse("key: 'two\nlines'\n");
//! let root = documents[0].root.as_ref().unwrap();
//! let items = root.items();
//! assert_eq!(items[0].raw(), "key");
//!
//! let value = items[1].node.unwrap().str_value().unwrap();
//! assert_eq!(value.as_str(), "two lines");
//! assert!(matches!(value, ScalarValue::WithWarnings(_, errors) if errors.len() == 1));
//! ```
//!
//! # Features
//! **Note:** With all features disabled, this crate's MSRV is `1.70.0`.
//!
//! #### `debug_prints`
//! Enables the `debug` module and usage of debug prints in the parser. Prints only happen when the
//! `YAML_CST_DEBUG` environment variable is set. Do not enable if you are consuming the crate
//! rather than working on it as this can significantly decrease performance.

#![warn(missing_docs, clippy::pedantic)]

mod char_traits;
#[macro_use]
mod debug;
pub mod cursor;
mod document;
mod error;
pub mod line;
mod node;
mod parser;
mod scalar;
pub mod span;

pub use crate::document::{parse, Directive, Document};
pub use crate::error::{CstError, ErrorClass, ErrorKind};
pub use crate::node::{
    Chomping, FlowCollection, FlowKind, Indicator, Item, Mapping, Node, NodeKind, Pair, Props,
    Scalar, ScalarStyle, ScalarValue, SeqItem, Sequence, Token, Trivia, TriviaKind,
};
pub use crate::span::{Marker, Range};
