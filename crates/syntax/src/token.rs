//! Token types produced by the lexer.

use core::fmt;
use core::hash::{Hash, Hasher};
use serde::Serialize;

/// Kind of a lexed token. Which kinds appear depends on the grammar being scanned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    /// A retired token sitting in the pool.
    Unknown,
    /// `<name`; the value holds the lowercased tag name.
    TagOpen,
    /// An attribute name inside a start tag.
    AttrName,
    /// An entity-decoded attribute value, classified like a declaration value. Values of
    /// `id`, `class` and `style` stay text.
    AttrValue,
    /// `>` closing a start tag.
    TagEnd,
    /// `/>` closing a self-closing start tag.
    SelfClose,
    /// `</name>`; the value holds the lowercased tag name.
    TagClose,
    /// Text content between tags, trimmed.
    Text,
    /// A property name in a declaration.
    Ident,
    /// `:` between a property name and its value.
    Colon,
    /// A classified declaration value; `id` and `class` values stay text. The unit tag, if
    /// any, is in [`Token::extra`].
    StyleValue,
    /// `;` terminating a declaration.
    Semicolon,
    /// Raw selector text in front of a rule block.
    Prelude,
    /// `{`
    BlockOpen,
    /// `}`
    BlockClose,
    /// End of input.
    Eof,
}

/// Unit suffix attached to a numeric token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Unit {
    /// `px`, `dp` and `dip`: pixel-equivalent lengths.
    Px,
    /// `em`
    Em,
    /// `%`
    Percent,
}

impl Unit {
    /// Map a unit suffix (case-insensitive) to a unit tag.
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix.to_ascii_lowercase().as_str() {
            "px" | "dp" | "dip" => Some(Self::Px),
            "em" => Some(Self::Em),
            "%" => Some(Self::Percent),
            _ => None,
        }
    }

    /// Canonical suffix used when printing values.
    #[inline]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Px => "px",
            Self::Em => "em",
            Self::Percent => "%",
        }
    }
}

/// Payload of a token.
#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    Number(f64),
    Text(String),
    Bool(bool),
}

impl Eq for Literal {}

impl Hash for Literal {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Self::Number(number) => {
                0u8.hash(state);
                number.to_bits().hash(state);
            }
            Self::Text(text) => {
                1u8.hash(state);
                text.hash(state);
            }
            Self::Bool(flag) => {
                2u8.hash(state);
                flag.hash(state);
            }
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(number) => write!(formatter, "{number}"),
            Self::Text(text) => formatter.write_str(text),
            Self::Bool(flag) => write!(formatter, "{flag}"),
        }
    }
}

/// A lexed token.
///
/// Tokens are obtained from a [`TokenPool`](crate::TokenPool) and are only meaningful
/// until they are released back to it. Release takes the token by value, so a released
/// token can never be observed again through an old binding.
///
/// Equality and hashing consider `(kind, value, line, column)`; the unit tag is ignored.
#[derive(Debug)]
pub struct Token {
    pub(crate) kind: TokenKind,
    pub(crate) value: Option<Literal>,
    pub(crate) line: u32,
    pub(crate) column: u32,
    pub(crate) extra: Option<Unit>,
}

impl Token {
    pub(crate) const fn blank() -> Self {
        Self {
            kind: TokenKind::Unknown,
            value: None,
            line: 0,
            column: 0,
            extra: None,
        }
    }

    /// Reset every field so nothing from the previous use survives into the next one.
    pub(crate) fn clear(&mut self) {
        self.kind = TokenKind::Unknown;
        self.value = None;
        self.line = 0;
        self.column = 0;
        self.extra = None;
    }

    #[inline]
    pub const fn kind(&self) -> TokenKind {
        self.kind
    }

    #[inline]
    pub const fn value(&self) -> Option<&Literal> {
        self.value.as_ref()
    }

    #[inline]
    pub const fn line(&self) -> u32 {
        self.line
    }

    #[inline]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Unit tag of a numeric style value.
    #[inline]
    pub const fn extra(&self) -> Option<Unit> {
        self.extra
    }

    /// The payload as text, if it is text.
    pub fn text(&self) -> Option<&str> {
        match &self.value {
            Some(Literal::Text(text)) => Some(text),
            _ => None,
        }
    }

    /// The payload as a number; non-numeric payloads read as zero.
    pub fn number(&self) -> f64 {
        match self.value {
            Some(Literal::Number(number)) => number,
            _ => 0.0,
        }
    }

    /// The payload as a boolean; non-boolean payloads read as `false`.
    pub fn boolean(&self) -> bool {
        matches!(self.value, Some(Literal::Bool(true)))
    }

    /// Move the payload out, leaving `None` behind.
    #[inline]
    pub fn take_value(&mut self) -> Option<Literal> {
        self.value.take()
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.value == other.value
            && self.line == other.line
            && self.column == other.column
    }
}

impl Eq for Token {}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
        self.value.hash(state);
        self.line.hash(state);
        self.column.hash(state);
    }
}

impl fmt::Display for Token {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "[{:?}]", self.kind)?;
        if let Some(value) = &self.value {
            write!(formatter, ":{value}")?;
        }
        if let Some(unit) = self.extra {
            formatter.write_str(unit.suffix())?;
        }
        Ok(())
    }
}
