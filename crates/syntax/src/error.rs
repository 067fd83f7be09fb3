use thiserror::Error;

/// A malformed token. Carries the position where scanning of the offending token started.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{message} at {line}:{column}")]
pub struct LexError {
    /// Human readable description.
    pub message: String,
    /// 1-based line.
    pub line: u32,
    /// 1-based column.
    pub column: u32,
}

impl LexError {
    #[inline]
    pub(crate) fn new(message: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            message: message.into(),
            line,
            column,
        }
    }
}
