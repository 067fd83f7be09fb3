//! The node factory seam and layout hints.

use crate::error::NodeCreationError;
use core::fmt;
use css_cascade::ResolvedStyle;
use serde::Serialize;
use syntax::{Unit, Value};

/// One layout dimension.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Length {
    /// Fill the parent.
    MatchParent,
    /// Size to the content.
    #[default]
    WrapContent,
    Px(f64),
    Em(f64),
    Percent(f64),
}

impl Length {
    /// Interpret a resolved value as a length.
    ///
    /// Unitless numbers are pixels; `match_parent`/`fill_parent`/`fill` and
    /// `wrap_content`/`auto` are the keyword forms.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(number) | Value::Dimension(number, Unit::Px) => Some(Self::Px(*number)),
            Value::Dimension(number, Unit::Em) => Some(Self::Em(*number)),
            Value::Dimension(number, Unit::Percent) => Some(Self::Percent(*number)),
            Value::Text(text) => match text.to_ascii_lowercase().as_str() {
                "match_parent" | "fill_parent" | "fill" => Some(Self::MatchParent),
                "wrap_content" | "auto" => Some(Self::WrapContent),
                _ => None,
            },
            Value::Bool(_) => None,
        }
    }
}

impl fmt::Display for Length {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MatchParent => formatter.write_str("match_parent"),
            Self::WrapContent => formatter.write_str("wrap_content"),
            Self::Px(number) => write!(formatter, "{number}px"),
            Self::Em(number) => write!(formatter, "{number}em"),
            Self::Percent(number) => write!(formatter, "{number}%"),
        }
    }
}

/// Width and height a node asks of its container.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct LayoutHints {
    pub width: Length,
    pub height: Length,
}

impl LayoutHints {
    #[inline]
    pub const fn new(width: Length, height: Length) -> Self {
        Self { width, height }
    }

    #[inline]
    pub const fn wrap_content() -> Self {
        Self::new(Length::WrapContent, Length::WrapContent)
    }

    /// Full width, content height; the hints of block containers.
    #[inline]
    pub const fn block() -> Self {
        Self::new(Length::MatchParent, Length::WrapContent)
    }
}

/// Everything a factory needs to build one node.
#[derive(Clone, Copy, Debug)]
pub struct NodeSpec<'spec> {
    /// Resolved node kind, e.g. `text` or `linearbox`.
    pub kind: &'spec str,
    /// Source tag name.
    pub tag: &'spec str,
    pub id: Option<&'spec str>,
    pub text: Option<&'spec str>,
    pub style: &'spec ResolvedStyle,
    /// Depth of the source element; top-level elements are at depth 1.
    pub depth: usize,
}

/// Builds host nodes for resolved elements.
pub trait NodeFactory {
    type Node;

    /// Build the node for `spec`. `Ok(None)` means the factory has no node for this kind;
    /// the element and its subtree are left out of the render tree.
    ///
    /// # Errors
    /// A [`NodeCreationError`] drops the element's subtree and is reported as a node failure.
    fn create(&mut self, spec: &NodeSpec<'_>) -> Result<Option<Self::Node>, NodeCreationError>;

    /// Whether `node` can hold children.
    fn is_container(&self, node: &Self::Node) -> bool;

    /// Layout hints `node` gives its children, overriding the container table.
    #[inline]
    fn child_layout(&self, _node: &Self::Node) -> Option<LayoutHints> {
        None
    }
}
