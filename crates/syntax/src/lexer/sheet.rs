//! Stylesheet grammar: `prelude { declarations }`.

use super::{Lexer, StylePhase, error_at};
use crate::error::LexError;
use crate::token::{Token, TokenKind};

impl Lexer<'_, '_> {
    pub(super) fn scan_sheet(&mut self) -> Result<Token, LexError> {
        if self.state.block_open_pending {
            self.state.block_open_pending = false;
            self.cursor.skip_whitespace();
            let at = self.cursor.position();
            self.cursor.bump();
            self.state.in_block = true;
            self.state.style = StylePhase::Name;
            return Ok(self.token(TokenKind::BlockOpen, None, at));
        }
        self.skip_trivia()?;
        let at = self.cursor.position();
        if self.state.in_block {
            return match self.cursor.peek() {
                None => Err(error_at("unexpected end of input inside a rule block", at)),
                Some('}') if self.state.style == StylePhase::Name => {
                    self.cursor.bump();
                    self.state.in_block = false;
                    Ok(self.token(TokenKind::BlockClose, None, at))
                }
                Some('}') => Err(error_at("declaration cut short by '}'", at)),
                Some(_) => self.scan_style(true),
            };
        }
        match self.cursor.peek() {
            None => Ok(self.token(TokenKind::Eof, None, at)),
            Some('}') => Err(error_at("unexpected '}'", at)),
            Some('{') => Err(error_at("missing selector before '{'", at)),
            Some('@') => Err(error_at("at-rules are not supported", at)),
            Some(_) => self.scan_prelude(at),
        }
    }

    /// Raw selector text up to `{`.
    fn scan_prelude(&mut self, at: (u32, u32)) -> Result<Token, LexError> {
        let start = self.cursor.offset();
        loop {
            match self.cursor.peek() {
                Some('{') => break,
                Some(stray @ (';' | '}')) => {
                    return Err(error_at(
                        format!("unexpected '{stray}' in selector"),
                        self.cursor.position(),
                    ));
                }
                Some(_) => {
                    self.cursor.bump();
                }
                None => return Err(error_at("expected '{' after selector", at)),
            }
        }
        let prelude = self.cursor.slice(start).trim().to_owned();
        self.state.block_open_pending = true;
        Ok(self.text_token(TokenKind::Prelude, prelude, at))
    }
}
