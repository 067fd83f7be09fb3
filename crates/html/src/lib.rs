//! Markup documents: the element tree and the recursive-descent parser that builds it.

#![forbid(unsafe_code)]

pub mod dom;
pub mod parser;

pub use dom::{ElementNode, ElementTree};
pub use parser::{
    DEFAULT_MAX_DEPTH, Document, MarkupError, ParseError, ParseOptions, create_element,
    parse_document,
};
