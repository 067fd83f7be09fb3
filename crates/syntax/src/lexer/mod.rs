//! Single-pass scanner with one token of lookahead.
//!
//! The lexer never backtracks: every grammar decides from the next character (and for
//! markup, a fixed-width prefix such as `<!--` or `</`) which token to produce.

mod markup;
mod sheet;
mod style;

use crate::error::LexError;
use crate::pool::TokenPool;
use crate::token::{Literal, Token, TokenKind, Unit};

/// Grammar entry point of a [`Lexer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Tags, attributes and text.
    Markup,
    /// `key:value;key:value` as found in `style="..."`.
    Style,
    /// Rules: a selector prelude followed by a declaration block.
    Stylesheet,
}

/// Position-tracking cursor over the source text.
#[derive(Debug)]
pub(crate) struct Cursor<'src> {
    source: &'src str,
    index: usize,
    line: u32,
    column: u32,
}

impl<'src> Cursor<'src> {
    const fn new(source: &'src str) -> Self {
        Self {
            source,
            index: 0,
            line: 1,
            column: 1,
        }
    }

    #[inline]
    fn rest(&self) -> &'src str {
        self.source.get(self.index..).unwrap_or("")
    }

    #[inline]
    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    #[inline]
    fn starts_with(&self, prefix: &str) -> bool {
        self.rest().starts_with(prefix)
    }

    #[inline]
    const fn position(&self) -> (u32, u32) {
        (self.line, self.column)
    }

    #[inline]
    const fn offset(&self) -> usize {
        self.index
    }

    fn slice(&self, start: usize) -> &'src str {
        self.source.get(start..self.index).unwrap_or("")
    }

    /// Consume one character, keeping line and column current.
    fn bump(&mut self) -> Option<char> {
        let character = self.peek()?;
        self.index = self.index.saturating_add(character.len_utf8());
        if character == '\n' {
            self.line = self.line.saturating_add(1);
            self.column = 1;
        } else {
            self.column = self.column.saturating_add(1);
        }
        Some(character)
    }

    /// Consume `prefix` if the input starts with it.
    fn eat(&mut self, prefix: &str) -> bool {
        if !self.starts_with(prefix) {
            return false;
        }
        for _ in prefix.chars() {
            self.bump();
        }
        true
    }

    /// Consume `count` bytes worth of characters.
    fn advance_bytes(&mut self, count: usize) {
        let target = self.index.saturating_add(count);
        while self.index < target && self.bump().is_some() {}
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    /// Consume a run of characters accepted by `accept`.
    fn take_while(&mut self, accept: impl Fn(char) -> bool) -> &'src str {
        let start = self.index;
        while self.peek().is_some_and(&accept) {
            self.bump();
        }
        self.slice(start)
    }
}

/// Per-grammar scanning state.
#[derive(Debug, Default)]
struct State {
    /// Inside a start tag, between `<name` and `>`/`/>`.
    in_tag: bool,
    /// Name of the start tag currently being scanned.
    open_tag: Option<String>,
    /// Raw-text element whose content is scanned next.
    raw_text: Option<String>,
    /// Declaration grammar position.
    style: StylePhase,
    /// Inside `{ ... }` of a stylesheet rule.
    in_block: bool,
    /// A prelude was produced; `{` is due next.
    block_open_pending: bool,
    /// Attribute or property name whose value is scanned next.
    pending_name: Option<String>,
}

/// Where the declaration grammar currently is.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum StylePhase {
    /// Expecting a property name, `;` or the end.
    #[default]
    Name,
    /// A property name was read; `:` must follow.
    Colon,
    /// `:` was read; a value must follow.
    Value,
}

/// Tokenizer for the markup, inline-style and stylesheet grammars.
///
/// Tokens come from the borrowed [`TokenPool`]; hand consumed tokens back with
/// [`Lexer::recycle`].
pub struct Lexer<'src, 'pool> {
    cursor: Cursor<'src>,
    pool: &'pool mut TokenPool,
    mode: Mode,
    lookahead: Option<Token>,
    state: State,
}

impl<'src, 'pool> Lexer<'src, 'pool> {
    fn new(source: &'src str, pool: &'pool mut TokenPool, mode: Mode) -> Self {
        Self {
            cursor: Cursor::new(source),
            pool,
            mode,
            lookahead: None,
            state: State::default(),
        }
    }

    /// Lexer for markup text.
    pub fn markup(source: &'src str, pool: &'pool mut TokenPool) -> Self {
        Self::new(source, pool, Mode::Markup)
    }

    /// Lexer for the content of a `style` attribute.
    pub fn style(source: &'src str, pool: &'pool mut TokenPool) -> Self {
        Self::new(source, pool, Mode::Style)
    }

    /// Lexer for a stylesheet.
    pub fn stylesheet(source: &'src str, pool: &'pool mut TokenPool) -> Self {
        Self::new(source, pool, Mode::Stylesheet)
    }

    #[inline]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    /// The pool this lexer draws from, e.g. to run a nested lexer over an attribute value.
    #[inline]
    pub fn pool_mut(&mut self) -> &mut TokenPool {
        &mut *self.pool
    }

    /// Produce the next token.
    ///
    /// # Errors
    /// Returns a [`LexError`] for malformed input.
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        if let Some(token) = self.lookahead.take() {
            return Ok(token);
        }
        self.scan()
    }

    /// Look at the next token without consuming it.
    ///
    /// # Errors
    /// Returns a [`LexError`] for malformed input.
    pub fn peek(&mut self) -> Result<&Token, LexError> {
        let token = match self.lookahead.take() {
            Some(token) => token,
            None => self.scan()?,
        };
        Ok(self.lookahead.insert(token))
    }

    /// Kind of the next token.
    ///
    /// # Errors
    /// Returns a [`LexError`] for malformed input.
    pub fn peek_kind(&mut self) -> Result<TokenKind, LexError> {
        self.peek().map(Token::kind)
    }

    /// Return a consumed token to the pool.
    #[inline]
    pub fn recycle(&mut self, token: Token) {
        self.pool.release(token);
    }

    fn scan(&mut self) -> Result<Token, LexError> {
        match self.mode {
            Mode::Markup => self.scan_markup(),
            Mode::Style => self.scan_style(false),
            Mode::Stylesheet => self.scan_sheet(),
        }
    }

    fn token(&mut self, kind: TokenKind, value: Option<Literal>, at: (u32, u32)) -> Token {
        self.pool.acquire(kind, value, at.0, at.1)
    }

    fn token_with_unit(
        &mut self,
        kind: TokenKind,
        value: Literal,
        unit: Option<Unit>,
        at: (u32, u32),
    ) -> Token {
        self.pool.acquire_with_extra(kind, Some(value), at.0, at.1, unit)
    }

    fn text_token(&mut self, kind: TokenKind, text: impl Into<String>, at: (u32, u32)) -> Token {
        self.token(kind, Some(Literal::Text(text.into())), at)
    }
}

/// Build a lex error positioned at `at`.
fn error_at(message: impl Into<String>, at: (u32, u32)) -> LexError {
    LexError::new(message, at.0, at.1)
}

/// Names whose values are kept as decoded text instead of being classified.
const TEXT_VALUED_NAMES: [&str; 3] = ["id", "class", "style"];

impl State {
    /// Whether the value about to be scanned must stay text; clears the pending name.
    fn value_keeps_text(&mut self) -> bool {
        self.pending_name
            .take()
            .is_some_and(|name| TEXT_VALUED_NAMES.contains(&name.as_str()))
    }
}

/// Characters allowed in tag and attribute names, e.g. `xlink:href`.
fn is_name_char(character: char) -> bool {
    character.is_ascii_alphanumeric() || matches!(character, '-' | '_' | ':' | '.')
}
