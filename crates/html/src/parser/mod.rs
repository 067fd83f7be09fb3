//! Recursive-descent parser from markup tokens to a [`Document`].

use crate::dom::{ElementNode, ElementTree};
use css_style_attr::{DeclarationError, parse_style_attribute};
use indextree::NodeId;
use log::{debug, warn};
use syntax::{DeclarationMap, LexError, Lexer, Token, TokenKind, TokenPool, Value};
use thiserror::Error;

/// Nesting limit used when none is configured.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Elements that never have content or a close tag.
const VOID_ELEMENTS: [&str; 6] = ["img", "br", "hr", "input", "meta", "link"];

/// A structural error in the markup.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{message} at {line}:{column}")]
pub struct ParseError {
    pub message: String,
    pub line: u32,
    pub column: u32,
}

impl ParseError {
    fn at(message: impl Into<String>, token: &Token) -> Self {
        Self {
            message: message.into(),
            line: token.line(),
            column: token.column(),
        }
    }
}

/// Anything that aborts a document parse.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MarkupError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl MarkupError {
    /// `(message, line, column)` of the failure.
    pub fn parts(&self) -> (&str, u32, u32) {
        match self {
            Self::Lex(error) => (&error.message, error.line, error.column),
            Self::Parse(error) => (&error.message, error.line, error.column),
        }
    }
}

impl From<DeclarationError> for MarkupError {
    fn from(error: DeclarationError) -> Self {
        match error {
            DeclarationError::Lex(lex) => Self::Lex(lex),
            DeclarationError::Unexpected { line, column, .. } => Self::Parse(ParseError {
                message: error.to_string(),
                line,
                column,
            }),
        }
    }
}

/// Parser settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParseOptions {
    /// Deepest allowed element nesting; top-level elements are at depth 1.
    pub max_depth: usize,
}

impl Default for ParseOptions {
    #[inline]
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// A parsed markup document.
#[derive(Debug, Default)]
pub struct Document {
    pub tree: ElementTree,
    /// Contents of `<style>` elements in document order.
    pub styles: Vec<String>,
    /// Contents of `<script>` elements in document order; never interpreted.
    pub scripts: Vec<String>,
    /// Text found outside any element, in document order.
    pub stray_text: Vec<String>,
}

impl Document {
    /// All embedded stylesheet text, joined in document order.
    pub fn style_source(&self) -> String {
        self.styles.join("\n")
    }
}

/// Parse a whole markup document.
///
/// # Errors
/// Returns a [`MarkupError`] on the first lexical or structural error.
pub fn parse_document(
    markup: &str,
    pool: &mut TokenPool,
    options: &ParseOptions,
) -> Result<Document, MarkupError> {
    let mut parser = DocumentParser {
        lexer: Lexer::markup(markup, pool),
        document: Document::default(),
        options: *options,
    };
    parser.parse_top_level()?;
    debug!(
        "parsed document: {} elements, {} style blocks, {} script blocks",
        parser.document.tree.len(),
        parser.document.styles.len(),
        parser.document.scripts.len()
    );
    Ok(parser.document)
}

/// Build a detached element from a tag and a `key: value; ...` style string, lifting `id`
/// and `class` out of the declarations. Append it to a tree with
/// [`ElementTree::append_child`] or [`ElementTree::append_root`].
///
/// # Errors
/// Returns a [`MarkupError`] if the style string is malformed.
pub fn create_element(
    tag: &str,
    style: &str,
    pool: &mut TokenPool,
) -> Result<ElementNode, MarkupError> {
    let declarations = parse_style_attribute(style, pool)?;
    Ok(ElementNode::from_attributes(tag, declarations))
}

struct DocumentParser<'src, 'pool> {
    lexer: Lexer<'src, 'pool>,
    document: Document,
    options: ParseOptions,
}

/// Where a start tag ended.
enum TagEnding {
    Open,
    SelfClosed,
}

impl DocumentParser<'_, '_> {
    fn parse_top_level(&mut self) -> Result<(), MarkupError> {
        loop {
            match self.lexer.peek_kind()? {
                TokenKind::Eof => return Ok(()),
                TokenKind::TagOpen => self.parse_element(None, 1)?,
                TokenKind::Text => {
                    let mut text = self.lexer.next_token()?;
                    warn!(
                        "text outside any element at {}:{} kept out of the tree",
                        text.line(),
                        text.column()
                    );
                    if let Some(content) = text.take_value() {
                        self.document.stray_text.push(content.to_string());
                    }
                    self.lexer.recycle(text);
                }
                _ => {
                    let token = self.lexer.next_token()?;
                    return Err(unexpected(&token).into());
                }
            }
        }
    }

    /// Parse one element and its subtree, attaching it under `parent`.
    fn parse_element(&mut self, parent: Option<NodeId>, depth: usize) -> Result<(), MarkupError> {
        let mut open = self.lexer.next_token()?;
        let tag = open.take_value().map(|literal| literal.to_string()).unwrap_or_default();
        if depth > self.options.max_depth {
            return Err(ParseError::at(
                format!(
                    "<{tag}> nested deeper than the limit of {}",
                    self.options.max_depth
                ),
                &open,
            )
            .into());
        }
        let (line, column) = (open.line(), open.column());
        self.lexer.recycle(open);

        let mut attrs = self.parse_attributes()?;
        let ending = self.parse_tag_ending()?;

        if tag == "style" || tag == "script" {
            return self.parse_raw_text_element(&tag, &ending);
        }
        if let Some(style) = attrs.remove("style") {
            let declarations = parse_style_attribute(&style.to_string(), self.lexer.pool_mut())?;
            attrs.extend_from(&declarations);
        }
        let node = ElementNode::from_attributes(&tag, attrs).at(line, column);
        let id = match parent {
            Some(parent_id) => self.document.tree.append_child(parent_id, node),
            None => self.document.tree.append_root(node),
        };

        if matches!(ending, TagEnding::SelfClosed) {
            return Ok(());
        }
        if VOID_ELEMENTS.contains(&tag.as_str()) {
            return self.skip_void_close(&tag);
        }
        self.parse_children(id, &tag, (line, column), depth)
    }

    /// `name[=value]` pairs up to the end of the start tag.
    fn parse_attributes(&mut self) -> Result<DeclarationMap, MarkupError> {
        let mut attrs = DeclarationMap::new();
        while self.lexer.peek_kind()? == TokenKind::AttrName {
            let mut name_token = self.lexer.next_token()?;
            let name = name_token
                .take_value()
                .map(|literal| literal.to_string())
                .unwrap_or_default();
            self.lexer.recycle(name_token);

            let value = if self.lexer.peek_kind()? == TokenKind::AttrValue {
                let mut value_token = self.lexer.next_token()?;
                let unit = value_token.extra();
                let literal = value_token.take_value();
                self.lexer.recycle(value_token);
                literal.map_or(Value::Bool(true), |payload| Value::from_literal(payload, unit))
            } else {
                Value::Bool(true)
            };
            attrs.insert(name, value);
        }
        Ok(attrs)
    }

    fn parse_tag_ending(&mut self) -> Result<TagEnding, MarkupError> {
        let token = self.lexer.next_token()?;
        let ending = match token.kind() {
            TokenKind::TagEnd => TagEnding::Open,
            TokenKind::SelfClose => TagEnding::SelfClosed,
            _ => return Err(unexpected(&token).into()),
        };
        self.lexer.recycle(token);
        Ok(ending)
    }

    /// Children and text up to the matching close tag.
    fn parse_children(
        &mut self,
        id: NodeId,
        tag: &str,
        opened_at: (u32, u32),
        depth: usize,
    ) -> Result<(), MarkupError> {
        loop {
            match self.lexer.peek_kind()? {
                TokenKind::TagOpen => self.parse_element(Some(id), depth.saturating_add(1))?,
                TokenKind::Text => {
                    let mut text = self.lexer.next_token()?;
                    if let Some(content) = text.take_value()
                        && let Some(node) = self.document.tree.node_mut(id)
                    {
                        node.push_text(&content.to_string());
                    }
                    self.lexer.recycle(text);
                }
                TokenKind::TagClose => {
                    let close = self.lexer.next_token()?;
                    if close.text() != Some(tag) {
                        return Err(ParseError::at(
                            format!(
                                "mismatched close tag </{}>, expected </{tag}>",
                                close.text().unwrap_or_default()
                            ),
                            &close,
                        )
                        .into());
                    }
                    self.lexer.recycle(close);
                    return Ok(());
                }
                TokenKind::Eof => {
                    return Err(ParseError {
                        message: format!("unclosed <{tag}> at end of input"),
                        line: opened_at.0,
                        column: opened_at.1,
                    }
                    .into());
                }
                _ => {
                    let token = self.lexer.next_token()?;
                    return Err(unexpected(&token).into());
                }
            }
        }
    }

    /// Accept an optional redundant `</br>`-style close tag after a void element.
    fn skip_void_close(&mut self, tag: &str) -> Result<(), MarkupError> {
        let next = self.lexer.peek()?;
        if next.kind() == TokenKind::TagClose && next.text() == Some(tag) {
            let close = self.lexer.next_token()?;
            self.lexer.recycle(close);
        }
        Ok(())
    }

    /// `<style>` and `<script>`: keep their text out of the tree.
    fn parse_raw_text_element(&mut self, tag: &str, ending: &TagEnding) -> Result<(), MarkupError> {
        if matches!(ending, TagEnding::SelfClosed) {
            return Ok(());
        }
        let mut content = String::new();
        if self.lexer.peek_kind()? == TokenKind::Text {
            let mut text = self.lexer.next_token()?;
            if let Some(literal) = text.take_value() {
                content = literal.to_string();
            }
            self.lexer.recycle(text);
        }
        let close = self.lexer.next_token()?;
        if close.kind() != TokenKind::TagClose || close.text() != Some(tag) {
            return Err(unexpected(&close).into());
        }
        self.lexer.recycle(close);
        if tag == "style" {
            self.document.styles.push(content);
        } else {
            self.document.scripts.push(content);
        }
        Ok(())
    }
}

fn unexpected(token: &Token) -> ParseError {
    let message = match (token.kind(), token.text()) {
        (TokenKind::TagClose, Some(name)) => format!("unexpected close tag </{name}>"),
        (kind, Some(text)) => format!("unexpected {kind:?} '{text}'"),
        (kind, None) => format!("unexpected {kind:?}"),
    };
    ParseError::at(message, token)
}
