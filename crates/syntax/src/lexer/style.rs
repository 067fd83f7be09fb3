//! Declaration grammar shared by `style="..."` and rule blocks.

use super::{Lexer, StylePhase, error_at};
use crate::error::LexError;
use crate::token::{Token, TokenKind};
use crate::value::classify;

impl Lexer<'_, '_> {
    /// Scan one declaration-grammar token. Inside a rule block `}` ends the value and is
    /// left for the caller.
    pub(super) fn scan_style(&mut self, in_block: bool) -> Result<Token, LexError> {
        self.skip_trivia()?;
        let at = self.cursor.position();
        let phase = self.state.style;
        let Some(character) = self.cursor.peek() else {
            return match phase {
                StylePhase::Name => Ok(self.token(TokenKind::Eof, None, at)),
                StylePhase::Colon => Err(error_at("expected ':' after property name", at)),
                StylePhase::Value => Err(error_at("missing value after ':'", at)),
            };
        };
        match (phase, character) {
            (StylePhase::Name, ';') => {
                self.cursor.bump();
                Ok(self.token(TokenKind::Semicolon, None, at))
            }
            (StylePhase::Name, _) if is_property_start(character) => {
                let name = self.cursor.take_while(is_property_char).to_ascii_lowercase();
                self.state.style = StylePhase::Colon;
                self.state.pending_name = Some(name.clone());
                Ok(self.text_token(TokenKind::Ident, name, at))
            }
            (StylePhase::Colon, ':') => {
                self.cursor.bump();
                self.state.style = StylePhase::Value;
                Ok(self.token(TokenKind::Colon, None, at))
            }
            (StylePhase::Colon, _) => Err(error_at(
                format!("expected ':' after property name, found '{character}'"),
                at,
            )),
            (StylePhase::Value, _) => self.scan_style_value(in_block, at),
            (StylePhase::Name, _) => Err(error_at(
                format!("unexpected character '{character}' in declaration"),
                at,
            )),
        }
    }

    /// Read a raw value up to `;` (or `}` in a block), honouring quotes and parentheses.
    /// Comments outside quotes are dropped from the value.
    fn scan_style_value(&mut self, in_block: bool, at: (u32, u32)) -> Result<Token, LexError> {
        let mut text = String::new();
        let mut start = self.cursor.offset();
        let mut depth = 0usize;
        while let Some(character) = self.cursor.peek() {
            match character {
                ';' if depth == 0 => break,
                '}' if depth == 0 && in_block => break,
                '/' if self.cursor.starts_with("/*") => {
                    text.push_str(self.cursor.slice(start));
                    text.push(' ');
                    let comment_at = self.cursor.position();
                    let Some(found) = self.cursor.rest().find("*/") else {
                        return Err(error_at("unterminated comment", comment_at));
                    };
                    self.cursor.advance_bytes(found.saturating_add(2));
                    start = self.cursor.offset();
                    continue;
                }
                '"' | '\'' => {
                    let quote_at = self.cursor.position();
                    self.cursor.bump();
                    while self.cursor.peek().is_some_and(|next| next != character) {
                        self.cursor.bump();
                    }
                    if self.cursor.bump().is_none() {
                        return Err(error_at("unterminated string in value", quote_at));
                    }
                    continue;
                }
                '(' => depth = depth.saturating_add(1),
                ')' => depth = depth.saturating_sub(1),
                _ => {}
            }
            self.cursor.bump();
        }
        text.push_str(self.cursor.slice(start));
        let raw = strip_important(text.trim());
        if raw.is_empty() {
            return Err(error_at("missing value after ':'", at));
        }
        self.state.style = StylePhase::Name;
        if self.state.value_keeps_text() {
            return Ok(self.text_token(TokenKind::StyleValue, raw, at));
        }
        let (literal, unit) = classify(raw);
        Ok(self.token_with_unit(TokenKind::StyleValue, literal, unit, at))
    }

    /// Skip whitespace and `/* ... */` comments.
    pub(super) fn skip_trivia(&mut self) -> Result<(), LexError> {
        loop {
            self.cursor.skip_whitespace();
            if !self.cursor.starts_with("/*") {
                return Ok(());
            }
            let at = self.cursor.position();
            let Some(found) = self.cursor.rest().find("*/") else {
                return Err(error_at("unterminated comment", at));
            };
            self.cursor.advance_bytes(found.saturating_add(2));
        }
    }
}

fn is_property_start(character: char) -> bool {
    character.is_ascii_alphabetic() || character == '-' || character == '_'
}

fn is_property_char(character: char) -> bool {
    character.is_ascii_alphanumeric() || character == '-' || character == '_'
}

/// Drop a trailing `!important`; the cascade has no importance tier.
fn strip_important(value: &str) -> &str {
    let lowered = value.to_ascii_lowercase();
    match lowered.rfind("!important") {
        Some(position) if lowered.get(position..) == Some("!important") => {
            value.get(..position).unwrap_or(value).trim_end()
        }
        _ => value,
    }
}
