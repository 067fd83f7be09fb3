//! Error types of the render pipeline.

use css::StylesheetError;
use html::MarkupError;
use thiserror::Error;

/// A node factory could not build a node.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("cannot create `{kind}` node: {reason}")]
pub struct NodeCreationError {
    pub kind: String,
    pub reason: String,
}

impl NodeCreationError {
    pub fn new(kind: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            reason: reason.into(),
        }
    }
}

/// An attribute handler rejected a value.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum AttributeApplyError {
    #[error("`{attribute}` does not accept `{value}`")]
    InvalidValue { attribute: String, value: String },
    #[error("`{attribute}` is not supported by `{kind}` nodes")]
    Unsupported { attribute: String, kind: String },
    #[error("`{attribute}`: {reason}")]
    Adapter { attribute: String, reason: String },
}

/// A node-local failure during a render; the node's subtree is missing from the output.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{message} (<{tag}> at depth {depth})")]
pub struct RenderError {
    pub message: String,
    pub tag: String,
    pub depth: usize,
}

/// Failures that abort a whole document.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DocumentError {
    #[error(transparent)]
    Markup(#[from] MarkupError),
    #[error(transparent)]
    Stylesheet(#[from] StylesheetError),
}

impl DocumentError {
    /// Message and source position of the failure.
    pub fn parts(&self) -> (String, u32, u32) {
        match self {
            Self::Markup(error) => {
                let (message, line, column) = error.parts();
                (message.to_owned(), line, column)
            }
            Self::Stylesheet(error) => {
                let (line, column) = error.position();
                (error.to_string(), line, column)
            }
        }
    }
}
