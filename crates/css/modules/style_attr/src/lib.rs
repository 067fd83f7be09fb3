//! Declaration lists: the content of `style="..."` attributes and of stylesheet rule blocks.
//!
//! Both are read through the pooled [`Lexer`]; an attribute value gets its own lexer in
//! style mode while a rule block is read from the stylesheet lexer that is already
//! positioned after `{`.

#![forbid(unsafe_code)]

use log::trace;
use syntax::{DeclarationMap, LexError, Lexer, Token, TokenKind, TokenPool, Value};
use thiserror::Error;

/// Failure while reading a declaration list.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DeclarationError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error("expected {expected}, found {found:?} at {line}:{column}")]
    Unexpected {
        expected: &'static str,
        found: TokenKind,
        line: u32,
        column: u32,
    },
}

impl DeclarationError {
    /// `(line, column)` of the failure.
    pub const fn position(&self) -> (u32, u32) {
        match self {
            Self::Lex(error) => (error.line, error.column),
            Self::Unexpected { line, column, .. } => (*line, *column),
        }
    }

    fn unexpected(expected: &'static str, token: &Token) -> Self {
        Self::Unexpected {
            expected,
            found: token.kind(),
            line: token.line(),
            column: token.column(),
        }
    }
}

/// Parse the value of a `style` attribute.
///
/// Property names are lowercased by the lexer. A repeated property keeps its first
/// position and its last value.
///
/// # Errors
/// Returns a [`DeclarationError`] for malformed declarations.
pub fn parse_style_attribute(
    input: &str,
    pool: &mut TokenPool,
) -> Result<DeclarationMap, DeclarationError> {
    let mut declarations = DeclarationMap::new();
    if input.trim().is_empty() {
        return Ok(declarations);
    }
    let mut lexer = Lexer::style(input, pool);
    parse_declaration_list(&mut lexer, &mut declarations)?;
    let end = lexer.next_token()?;
    if end.kind() != TokenKind::Eof {
        return Err(DeclarationError::unexpected("end of style", &end));
    }
    lexer.recycle(end);
    Ok(declarations)
}

/// Read `name: value;` pairs into `declarations` until end of input or the closing `}` of a
/// rule block. The terminating token is left in the lexer.
///
/// # Errors
/// Returns a [`DeclarationError`] for malformed declarations.
pub fn parse_declaration_list(
    lexer: &mut Lexer<'_, '_>,
    declarations: &mut DeclarationMap,
) -> Result<(), DeclarationError> {
    loop {
        match lexer.peek_kind()? {
            TokenKind::Eof | TokenKind::BlockClose => return Ok(()),
            TokenKind::Semicolon => {
                let separator = lexer.next_token()?;
                lexer.recycle(separator);
            }
            TokenKind::Ident => {
                let (name, value) = parse_declaration(lexer)?;
                trace!("declaration {name}: {value}");
                declarations.insert(name, value);
            }
            _ => {
                let token = lexer.next_token()?;
                return Err(DeclarationError::unexpected("a property name", &token));
            }
        }
    }
}

/// `Ident Colon StyleValue`.
fn parse_declaration(lexer: &mut Lexer<'_, '_>) -> Result<(String, Value), DeclarationError> {
    let mut name_token = lexer.next_token()?;
    let name = match name_token.take_value() {
        Some(literal) => literal.to_string(),
        None => return Err(DeclarationError::unexpected("a property name", &name_token)),
    };
    lexer.recycle(name_token);

    let colon = lexer.next_token()?;
    if colon.kind() != TokenKind::Colon {
        return Err(DeclarationError::unexpected("':'", &colon));
    }
    lexer.recycle(colon);

    let mut value_token = lexer.next_token()?;
    if value_token.kind() != TokenKind::StyleValue {
        return Err(DeclarationError::unexpected("a value", &value_token));
    }
    let unit = value_token.extra();
    let Some(literal) = value_token.take_value() else {
        return Err(DeclarationError::unexpected("a value", &value_token));
    };
    lexer.recycle(value_token);
    Ok((name, Value::from_literal(literal, unit)))
}
