//! Selector parsing.

use crate::{Component, SelectorChain, SelectorError};
use core::mem::take;

/// Tokenizer output.
#[derive(Clone, Debug, PartialEq, Eq)]
enum Tok {
    /// Whitespace between two compounds.
    Descendant,
    Universal,
    Type(String),
    Class(String),
    Id(String),
}

/// Byte tokenizer over one selector (no commas).
struct SelectorTokenizer<'input> {
    input_bytes: &'input [u8],
    index: usize,
}

impl<'input> SelectorTokenizer<'input> {
    #[inline]
    const fn new(input: &'input str) -> Self {
        Self {
            input_bytes: input.as_bytes(),
            index: 0,
        }
    }

    /// Next token, `Ok(None)` at the end.
    fn next_token(&mut self) -> Result<Option<Tok>, SelectorError> {
        if self.skip_whitespace() && self.index < self.input_bytes.len() {
            return Ok(Some(Tok::Descendant));
        }
        let Some(&current) = self.input_bytes.get(self.index) else {
            return Ok(None);
        };
        match current {
            b'*' => {
                self.index = self.index.saturating_add(1);
                Ok(Some(Tok::Universal))
            }
            b'.' => self.consume_prefixed('.').map(|name| Some(Tok::Class(name))),
            b'#' => self.consume_prefixed('#').map(|name| Some(Tok::Id(name))),
            _ if is_ident_byte(current) => {
                Ok(Some(Tok::Type(self.consume_ident().to_ascii_lowercase())))
            }
            _ => Err(self.unsupported()),
        }
    }

    /// Skip ASCII whitespace, reporting whether any was seen.
    fn skip_whitespace(&mut self) -> bool {
        let start = self.index;
        while self
            .input_bytes
            .get(self.index)
            .is_some_and(u8::is_ascii_whitespace)
        {
            self.index = self.index.saturating_add(1);
        }
        self.index > start && start > 0
    }

    /// Consume an identifier of ASCII alphanumerics, '-', '_' and non-ASCII bytes.
    fn consume_ident(&mut self) -> String {
        let start = self.index;
        while self
            .input_bytes
            .get(self.index)
            .is_some_and(|&byte| is_ident_byte(byte))
        {
            self.index = self.index.saturating_add(1);
        }
        let slice = self.input_bytes.get(start..self.index).unwrap_or(&[]);
        String::from_utf8_lossy(slice).into_owned()
    }

    /// Consume `.name` or `#name`; names keep their case.
    fn consume_prefixed(&mut self, prefix: char) -> Result<String, SelectorError> {
        self.index = self.index.saturating_add(1);
        let name = self.consume_ident();
        if name.is_empty() {
            return Err(SelectorError::MissingName(prefix));
        }
        Ok(name)
    }

    fn unsupported(&self) -> SelectorError {
        let found = self
            .input_bytes
            .get(self.index..)
            .and_then(|rest| String::from_utf8_lossy(rest).chars().next())
            .unwrap_or('\u{fffd}');
        SelectorError::Unsupported {
            found,
            offset: self.index,
        }
    }
}

const fn is_ident_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' || byte >= 0x80
}

/// Parse one selector such as `div.menu #item`.
///
/// # Errors
/// [`SelectorError::Empty`] for blank input, [`SelectorError::Unsupported`] for any
/// syntax outside type/id/class/universal compounds joined by whitespace.
pub fn parse_selector(input: &str) -> Result<SelectorChain, SelectorError> {
    let mut tokens = SelectorTokenizer::new(input.trim());
    let mut written = Vec::new();
    let mut current = Component::default();
    let mut has_current = false;

    while let Some(token) = tokens.next_token()? {
        match token {
            Tok::Descendant => {
                if has_current {
                    written.push(take(&mut current));
                    has_current = false;
                }
            }
            Tok::Universal => has_current = true,
            Tok::Type(tag) => {
                if current.tag.is_some() || has_current {
                    // A type selector must open its compound.
                    return Err(SelectorError::Unsupported {
                        found: tag.chars().next().unwrap_or('\u{fffd}'),
                        offset: tokens.index.saturating_sub(tag.len()),
                    });
                }
                current.tag = Some(tag);
                has_current = true;
            }
            Tok::Class(class) => {
                current.push_class(class);
                has_current = true;
            }
            Tok::Id(id) => {
                if current.id.is_some() {
                    return Err(SelectorError::DuplicateId);
                }
                current.id = Some(id);
                has_current = true;
            }
        }
    }
    if has_current {
        written.push(current);
    }
    SelectorChain::from_written(written)
}

/// Parse a comma-separated list; each entry parses independently.
pub fn parse_selector_list(input: &str) -> Vec<Result<SelectorChain, SelectorError>> {
    input.split(',').map(parse_selector).collect()
}
