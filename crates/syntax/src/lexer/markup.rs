//! Markup grammar: tags, attributes, text.

use super::{Lexer, error_at, is_name_char};
use crate::error::LexError;
use crate::token::{Token, TokenKind};
use crate::value::classify;
use std::borrow::Cow;

/// Elements whose content is raw text up to the matching close tag.
const RAW_TEXT_ELEMENTS: [&str; 2] = ["style", "script"];

impl Lexer<'_, '_> {
    pub(super) fn scan_markup(&mut self) -> Result<Token, LexError> {
        if let Some(tag) = self.state.raw_text.take()
            && let Some(token) = self.scan_raw_text(&tag)?
        {
            return Ok(token);
        }
        if self.state.in_tag {
            return self.scan_in_tag();
        }
        loop {
            let at = self.cursor.position();
            match self.cursor.peek() {
                None => return Ok(self.token(TokenKind::Eof, None, at)),
                Some('<') => {
                    if self.cursor.starts_with("<!--") {
                        self.skip_until("-->", "unterminated comment", at)?;
                    } else if self.cursor.starts_with("<!") || self.cursor.starts_with("<?") {
                        self.skip_until(">", "unterminated markup declaration", at)?;
                    } else if self.cursor.starts_with("</") {
                        return self.scan_close_tag(at);
                    } else {
                        return self.scan_open_tag(at);
                    }
                }
                Some(_) => {
                    if let Some(token) = self.scan_text()? {
                        return Ok(token);
                    }
                }
            }
        }
    }

    /// Skip everything up to and including `terminator`.
    fn skip_until(
        &mut self,
        terminator: &str,
        message: &str,
        at: (u32, u32),
    ) -> Result<(), LexError> {
        let Some(found) = self.cursor.rest().find(terminator) else {
            return Err(error_at(message, at));
        };
        self.cursor
            .advance_bytes(found.saturating_add(terminator.len()));
        Ok(())
    }

    fn scan_open_tag(&mut self, at: (u32, u32)) -> Result<Token, LexError> {
        self.cursor.bump();
        let name = self.cursor.take_while(is_name_char).to_ascii_lowercase();
        if name.is_empty() {
            return Err(error_at("expected a tag name after '<'", at));
        }
        self.state.in_tag = true;
        self.state.open_tag = Some(name.clone());
        Ok(self.text_token(TokenKind::TagOpen, name, at))
    }

    fn scan_close_tag(&mut self, at: (u32, u32)) -> Result<Token, LexError> {
        self.cursor.eat("</");
        let name = self.cursor.take_while(is_name_char).to_ascii_lowercase();
        if name.is_empty() {
            return Err(error_at("expected a tag name after '</'", at));
        }
        self.cursor.skip_whitespace();
        if !self.cursor.eat(">") {
            let found = self.cursor.peek().map_or_else(
                || "end of input".to_owned(),
                |character| format!("'{character}'"),
            );
            return Err(error_at(
                format!("expected '>' to close </{name}>, found {found}"),
                self.cursor.position(),
            ));
        }
        Ok(self.text_token(TokenKind::TagClose, name, at))
    }

    fn scan_in_tag(&mut self) -> Result<Token, LexError> {
        self.cursor.skip_whitespace();
        let at = self.cursor.position();
        let Some(character) = self.cursor.peek() else {
            let tag = self.state.open_tag.clone().unwrap_or_default();
            return Err(error_at(
                format!("unexpected end of input inside <{tag}>"),
                at,
            ));
        };
        match character {
            '>' => {
                self.cursor.bump();
                self.finish_start_tag(true);
                Ok(self.token(TokenKind::TagEnd, None, at))
            }
            '/' => {
                self.cursor.bump();
                if !self.cursor.eat(">") {
                    return Err(error_at("expected '>' after '/' in tag", at));
                }
                self.finish_start_tag(false);
                Ok(self.token(TokenKind::SelfClose, None, at))
            }
            '=' => {
                self.cursor.bump();
                self.cursor.skip_whitespace();
                self.scan_attr_value()
            }
            _ if is_name_char(character) => {
                let name = self.cursor.take_while(is_name_char).to_ascii_lowercase();
                self.state.pending_name = Some(name.clone());
                Ok(self.text_token(TokenKind::AttrName, name, at))
            }
            _ => Err(error_at(
                format!("unexpected character '{character}' in tag"),
                at,
            )),
        }
    }

    /// Leave the start tag; raw-text elements switch the next scan to raw text.
    fn finish_start_tag(&mut self, has_content: bool) {
        self.state.in_tag = false;
        self.state.pending_name = None;
        if let Some(tag) = self.state.open_tag.take()
            && has_content
            && RAW_TEXT_ELEMENTS.contains(&tag.as_str())
        {
            self.state.raw_text = Some(tag);
        }
    }

    fn scan_attr_value(&mut self) -> Result<Token, LexError> {
        let at = self.cursor.position();
        match self.cursor.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.cursor.bump();
                let start = self.cursor.offset();
                while self.cursor.peek().is_some_and(|character| character != quote) {
                    self.cursor.bump();
                }
                let raw = self.cursor.slice(start);
                if self.cursor.bump().is_none() {
                    return Err(error_at("unterminated attribute value", at));
                }
                Ok(self.attr_value_token(raw, at))
            }
            Some(character) if !character.is_whitespace() && character != '>' => {
                let raw = self.cursor.take_while(|next| {
                    !next.is_whitespace() && next != '>' && next != '"' && next != '\''
                });
                Ok(self.attr_value_token(raw, at))
            }
            _ => Err(error_at("expected an attribute value after '='", at)),
        }
    }

    fn attr_value_token(&mut self, raw: &str, at: (u32, u32)) -> Token {
        let decoded = decode_entities(raw);
        if self.state.value_keeps_text() {
            return self.text_token(TokenKind::AttrValue, decoded, at);
        }
        let (literal, unit) = classify(&decoded);
        self.token_with_unit(TokenKind::AttrValue, literal, unit, at)
    }

    /// Text up to the next `<`. Whitespace-only runs produce no token.
    fn scan_text(&mut self) -> Result<Option<Token>, LexError> {
        let start = self.cursor.offset();
        let mut at = None;
        while let Some(character) = self.cursor.peek() {
            if character == '<' {
                break;
            }
            if at.is_none() && !character.is_whitespace() {
                at = Some(self.cursor.position());
            }
            self.cursor.bump();
        }
        let Some(position) = at else {
            return Ok(None);
        };
        let text = decode_entities(self.cursor.slice(start).trim()).into_owned();
        Ok(Some(self.text_token(TokenKind::Text, text, position)))
    }

    /// Content of a raw-text element up to its close tag. Blank content produces no token.
    fn scan_raw_text(&mut self, tag: &str) -> Result<Option<Token>, LexError> {
        let at = self.cursor.position();
        let needle = format!("</{tag}");
        let Some(found) = self.cursor.rest().to_ascii_lowercase().find(&needle) else {
            return Err(error_at(format!("unterminated <{tag}> element"), at));
        };
        let content = self.cursor.rest().get(..found).unwrap_or("");
        self.cursor.advance_bytes(found);
        if content.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(self.text_token(TokenKind::Text, content.trim(), at)))
    }
}

/// Decode the handful of named entities markup authors actually use.
fn decode_entities(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(rest.get(..amp).unwrap_or(""));
        let tail = rest.get(amp..).unwrap_or("");
        let decoded = [
            ("&lt;", '<'),
            ("&gt;", '>'),
            ("&amp;", '&'),
            ("&quot;", '"'),
            ("&apos;", '\''),
            ("&nbsp;", '\u{a0}'),
        ]
        .into_iter()
        .find(|entity| tail.starts_with(entity.0));
        if let Some((entity, character)) = decoded {
            out.push(character);
            rest = tail.get(entity.len()..).unwrap_or("");
        } else {
            out.push('&');
            rest = tail.get(1..).unwrap_or("");
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}
