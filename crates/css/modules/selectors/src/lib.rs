//! Selector chains and element matching.
//!
//! A selector is a chain of compound components separated by descendant whitespace,
//! for example `div .menu #item`. The chain is stored subject-first: component 0 must
//! match the element itself and every following component must match some ancestor
//! above the element matched by the component before it.
//!
//! Supported: type, `#id`, `.class`, `*` and the descendant combinator. Everything else
//! (child or sibling combinators, attribute selectors, pseudo-classes) is rejected with
//! [`SelectorError::Unsupported`] so that the owning rule never matches.
//!
//! There is no specificity: rules apply in stylesheet order and later rules override
//! earlier ones.

mod cache;
mod matcher;
mod parser;

use core::fmt;
use smallvec::SmallVec;
use thiserror::Error;

pub use cache::{MatchCache, calc_selector_key};
pub use matcher::{SelectorSource, match_rules, matches_chain, matches_component};
pub use parser::{parse_selector, parse_selector_list};

/// Tree access needed for matching. Implement this for your element tree.
pub trait ElementAdapter {
    type Handle: Copy + Eq;

    /// Unique, stable key for caching per element.
    fn unique_key(&self, element: Self::Handle) -> u64;

    /// Parent element if any.
    fn parent(&self, element: Self::Handle) -> Option<Self::Handle>;

    /// Tag name as written in the document.
    fn tag_name(&self, element: Self::Handle) -> &str;

    /// Returns Some(id) if the element has an id, else None.
    fn element_id(&self, element: Self::Handle) -> Option<&str>;

    /// True if the element carries the given class.
    fn has_class(&self, element: Self::Handle, class: &str) -> bool;
}

/// Why a selector could not be parsed.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,
    #[error("unsupported selector syntax '{found}' at offset {offset}")]
    Unsupported { found: char, offset: usize },
    #[error("expected a name after '{0}'")]
    MissingName(char),
    #[error("component declares more than one id")]
    DuplicateId,
}

/// One compound component: every field it specifies must be present on the element.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Component {
    /// Tag name, ASCII lowercase; `None` for `*` or a bare `#id`/`.class` component.
    pub tag: Option<String>,
    pub id: Option<String>,
    /// Classes in source order, deduplicated.
    pub classes: SmallVec<String, 2>,
}

impl Component {
    /// True for `*`: the component matches any element.
    #[inline]
    pub fn is_universal(&self) -> bool {
        self.tag.is_none() && self.id.is_none() && self.classes.is_empty()
    }

    pub(crate) fn push_class(&mut self, class: String) {
        if !self.classes.contains(&class) {
            self.classes.push(class);
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_universal() {
            return formatter.write_str("*");
        }
        if let Some(tag) = &self.tag {
            formatter.write_str(tag)?;
        }
        if let Some(id) = &self.id {
            write!(formatter, "#{id}")?;
        }
        for class in &self.classes {
            write!(formatter, ".{class}")?;
        }
        Ok(())
    }
}

/// A parsed selector, subject component first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectorChain {
    components: Vec<Component>,
    key: u64,
}

impl SelectorChain {
    /// Build a chain from components written left to right, as in source text.
    ///
    /// # Errors
    /// Returns [`SelectorError::Empty`] when `written` is empty.
    pub fn from_written(written: Vec<Component>) -> Result<Self, SelectorError> {
        if written.is_empty() {
            return Err(SelectorError::Empty);
        }
        let mut components = written;
        components.reverse();
        let key = calc_selector_key(&components);
        Ok(Self { components, key })
    }

    /// The component matched against the element itself.
    #[inline]
    pub fn head(&self) -> &Component {
        // Construction guarantees at least one component.
        &self.components[0]
    }

    /// Components after the head, nearest ancestor first.
    #[inline]
    pub fn ancestors(&self) -> &[Component] {
        self.components.get(1..).unwrap_or(&[])
    }

    /// All components, subject first.
    #[inline]
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// True when the chain has no ancestor components.
    #[inline]
    pub fn is_single(&self) -> bool {
        self.components.len() == 1
    }

    /// Stable structural key, used by [`MatchCache`].
    #[inline]
    pub const fn key(&self) -> u64 {
        self.key
    }
}

impl fmt::Display for SelectorChain {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, component) in self.components.iter().rev().enumerate() {
            if index > 0 {
                formatter.write_str(" ")?;
            }
            write!(formatter, "{component}")?;
        }
        Ok(())
    }
}
