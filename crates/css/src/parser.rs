//! Stylesheet parser over the pooled lexer in stylesheet mode.

use crate::types::{Rule, Stylesheet};
use css_selectors::parse_selector_list;
use css_style_attr::{DeclarationError, parse_declaration_list};
use log::{debug, warn};
use syntax::{DeclarationMap, LexError, Lexer, Token, TokenKind, TokenPool};
use thiserror::Error;

/// A structural error in a stylesheet. Selector errors are not structural: the affected
/// rule is kept and never matches.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum StylesheetError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Declaration(#[from] DeclarationError),
    #[error("unexpected {found:?} in stylesheet at {line}:{column}")]
    Unexpected {
        found: TokenKind,
        line: u32,
        column: u32,
    },
}

impl StylesheetError {
    fn unexpected(token: &Token) -> Self {
        Self::Unexpected {
            found: token.kind(),
            line: token.line(),
            column: token.column(),
        }
    }

    /// `(line, column)` of the failure.
    pub const fn position(&self) -> (u32, u32) {
        match self {
            Self::Lex(error) => (error.line, error.column),
            Self::Declaration(error) => error.position(),
            Self::Unexpected { line, column, .. } => (*line, *column),
        }
    }
}

/// Parse a stylesheet, numbering rules from 0.
///
/// # Errors
/// Returns a [`StylesheetError`] for structural errors.
pub fn parse_stylesheet(css: &str, pool: &mut TokenPool) -> Result<Stylesheet, StylesheetError> {
    parse_stylesheet_from(css, pool, 0)
}

/// Parse a stylesheet, numbering rules from `base_order`.
///
/// # Errors
/// Returns a [`StylesheetError`] for structural errors.
pub fn parse_stylesheet_from(
    css: &str,
    pool: &mut TokenPool,
    base_order: u32,
) -> Result<Stylesheet, StylesheetError> {
    let mut lexer = Lexer::stylesheet(css, pool);
    let mut sheet = Stylesheet::default();
    let mut order = base_order;
    loop {
        let mut prelude_token = lexer.next_token()?;
        match prelude_token.kind() {
            TokenKind::Eof => {
                lexer.recycle(prelude_token);
                break;
            }
            TokenKind::Prelude => {}
            _ => return Err(StylesheetError::unexpected(&prelude_token)),
        }
        let (line, column) = (prelude_token.line(), prelude_token.column());
        let prelude = prelude_token
            .take_value()
            .map(|literal| literal.to_string())
            .unwrap_or_default();
        lexer.recycle(prelude_token);

        let declarations = parse_block(&mut lexer)?;
        for (text, selector) in prelude.split(',').zip(parse_selector_list(&prelude)) {
            if let Err(error) = &selector {
                warn!("selector '{}' at {line}:{column} never matches: {error}", text.trim());
            }
            sheet.rules.push(Rule {
                prelude: text.trim().to_owned(),
                selector,
                declarations: declarations.clone(),
                source_order: order,
                line,
                column,
            });
            order = order.saturating_add(1);
        }
    }
    debug!(
        "parsed stylesheet: {} rules, {} invalid",
        sheet.len(),
        sheet.invalid_rules().count()
    );
    Ok(sheet)
}

/// `{ declarations }`.
fn parse_block(lexer: &mut Lexer<'_, '_>) -> Result<DeclarationMap, StylesheetError> {
    let open = lexer.next_token()?;
    if open.kind() != TokenKind::BlockOpen {
        return Err(StylesheetError::unexpected(&open));
    }
    lexer.recycle(open);
    let mut declarations = DeclarationMap::new();
    parse_declaration_list(lexer, &mut declarations)?;
    let close = lexer.next_token()?;
    if close.kind() != TokenKind::BlockClose {
        return Err(StylesheetError::unexpected(&close));
    }
    lexer.recycle(close);
    Ok(declarations)
}
