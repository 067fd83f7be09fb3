use core::fmt;
use css_selectors::{SelectorChain, SelectorError, SelectorSource};
use syntax::DeclarationMap;

/// One selector with its declarations. A comma-separated selector list yields one rule per
/// selector, consecutive in the sheet.
#[derive(Clone, Debug, PartialEq)]
pub struct Rule {
    /// Selector text as written, trimmed.
    pub prelude: String,
    /// The parsed chain; an invalid selector never matches.
    pub selector: Result<SelectorChain, SelectorError>,
    pub declarations: DeclarationMap,
    /// Position in the sheet, increasing; later wins.
    pub source_order: u32,
    pub line: u32,
    pub column: u32,
}

impl Rule {
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.selector.is_ok()
    }
}

impl SelectorSource for Rule {
    #[inline]
    fn selector(&self) -> Option<&SelectorChain> {
        self.selector.as_ref().ok()
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{} {{", self.prelude)?;
        for (name, value) in self.declarations.iter() {
            write!(formatter, " {name}: {value};")?;
        }
        formatter.write_str(" }")
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Stylesheet {
    pub rules: Vec<Rule>,
}

impl Stylesheet {
    #[inline]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Source order to give the next appended rule.
    pub fn next_order(&self) -> u32 {
        self.rules
            .last()
            .map_or(0, |rule| rule.source_order.saturating_add(1))
    }

    /// Append every rule of `other` after this sheet's rules, renumbering their order.
    pub fn append(&mut self, other: Self) {
        let base = self.next_order();
        for (offset, mut rule) in other.rules.into_iter().enumerate() {
            rule.source_order = base.saturating_add(offset as u32);
            self.rules.push(rule);
        }
    }

    /// Rules whose selector failed to parse.
    pub fn invalid_rules(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter().filter(|rule| !rule.is_valid())
    }
}
