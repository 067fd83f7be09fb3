//! Declaration values and the ordered declaration map.

use crate::token::{Literal, Unit};
use alloc::vec;
use core::{fmt, mem};
use cssparser::{Parser, ParserInput, Token as CssToken};
use serde::ser::{SerializeMap as _, Serializer};
use serde::Serialize;

/// A typed attribute or declaration value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// A unitless number.
    Number(f64),
    /// A number carrying a unit tag.
    Dimension(f64, Unit),
    Bool(bool),
    Text(String),
}

impl Value {
    /// Build a value from a token payload and its unit tag.
    pub fn from_literal(literal: Literal, unit: Option<Unit>) -> Self {
        match (literal, unit) {
            (Literal::Number(number), Some(unit_tag)) => Self::Dimension(number, unit_tag),
            (Literal::Number(number), None) => Self::Number(number),
            (Literal::Bool(flag), _) => Self::Bool(flag),
            (Literal::Text(text), _) => Self::Text(text),
        }
    }

    /// Classify raw attribute text.
    pub fn parse(raw: &str) -> Self {
        let (literal, unit) = classify(raw);
        Self::from_literal(literal, unit)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Numeric magnitude of numbers and dimensions.
    pub const fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(number) | Self::Dimension(number, _) => Some(*number),
            Self::Bool(_) | Self::Text(_) => None,
        }
    }

    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(flag) => Some(*flag),
            _ => None,
        }
    }

    pub const fn unit(&self) -> Option<Unit> {
        match self {
            Self::Dimension(_, unit) => Some(*unit),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(number) => write!(formatter, "{number}"),
            Self::Dimension(number, unit) => write!(formatter, "{number}{}", unit.suffix()),
            Self::Bool(flag) => write!(formatter, "{flag}"),
            Self::Text(text) => formatter.write_str(text),
        }
    }
}

impl From<&str> for Value {
    #[inline]
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Number(number) => serializer.serialize_f64(*number),
            Self::Bool(flag) => serializer.serialize_bool(*flag),
            Self::Text(text) => serializer.serialize_str(text),
            Self::Dimension(..) => serializer.collect_str(self),
        }
    }
}

/// Classify a raw value into a token payload plus unit tag.
///
/// A lone number becomes a number, a lone number with a known unit suffix a number with a
/// unit tag, `true`/`false` a boolean and a lone quoted string its unquoted text. Anything
/// else, including numbers with unknown units, stays as the trimmed text.
pub fn classify(raw: &str) -> (Literal, Option<Unit>) {
    let trimmed = raw.trim();
    let as_text = || (Literal::Text(trimmed.to_owned()), None);

    let mut input = ParserInput::new(trimmed);
    let mut parser = Parser::new(&mut input);
    let Ok(first) = parser.next().cloned() else {
        return as_text();
    };
    if !parser.is_exhausted() {
        return as_text();
    }

    match first {
        CssToken::Number { .. } => parse_number(trimmed).map_or_else(as_text, |number| {
            (Literal::Number(number), None)
        }),
        CssToken::Percentage { .. } => trimmed
            .strip_suffix('%')
            .and_then(parse_number)
            .map_or_else(as_text, |number| {
                (Literal::Number(number), Some(Unit::Percent))
            }),
        CssToken::Dimension { ref unit, .. } => {
            let Some(unit_tag) = Unit::from_suffix(unit) else {
                return as_text();
            };
            trimmed
                .get(..trimmed.len().saturating_sub(unit.len()))
                .and_then(parse_number)
                .map_or_else(as_text, |number| (Literal::Number(number), Some(unit_tag)))
        }
        CssToken::Ident(ref ident) if ident.eq_ignore_ascii_case("true") => {
            (Literal::Bool(true), None)
        }
        CssToken::Ident(ref ident) if ident.eq_ignore_ascii_case("false") => {
            (Literal::Bool(false), None)
        }
        CssToken::QuotedString(ref text) => (Literal::Text(text.to_string()), None),
        _ => as_text(),
    }
}

/// Parse the numeric part of a token as written, keeping full `f64` precision.
fn parse_number(text: &str) -> Option<f64> {
    text.parse::<f64>().ok()
}

/// Insertion-ordered map from property or attribute name to value.
///
/// Re-inserting a name replaces its value in place, so the first insertion fixes the
/// position. Maps are small (a handful of declarations per node), so lookups are linear.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DeclarationMap {
    entries: Vec<(String, Value)>,
}

impl DeclarationMap {
    #[inline]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Insert or replace, returning the previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        let key = name.into();
        if let Some(slot) = self.entries.iter_mut().find(|entry| entry.0 == key) {
            return Some(mem::replace(&mut slot.1, value));
        }
        self.entries.push((key, value));
        None
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|entry| entry.0 == name)
            .map(|entry| &entry.1)
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Remove a name, keeping the order of the remaining entries.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        let index = self.entries.iter().position(|entry| entry.0 == name)?;
        Some(self.entries.remove(index).1)
    }

    /// Merge `other` into `self`; values from `other` win.
    pub fn extend_from(&mut self, other: &Self) {
        for (name, value) in other.iter() {
            self.insert(name, value.clone());
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries
            .iter()
            .map(|entry| (entry.0.as_str(), &entry.1))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.0.as_str())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<Name: Into<String>> FromIterator<(Name, Value)> for DeclarationMap {
    fn from_iter<I: IntoIterator<Item = (Name, Value)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (name, value) in iter {
            map.insert(name, value);
        }
        map
    }
}

impl IntoIterator for DeclarationMap {
    type Item = (String, Value);
    type IntoIter = vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Serialize for DeclarationMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
