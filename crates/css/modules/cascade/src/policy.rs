//! Which declarations of an ancestor's rules reach its descendants.

use std::collections::BTreeSet;

/// Properties inherited by default in CSS (subset relevant to attribute resolution).
const CSS_INHERITED: [&str; 8] = [
    "color",
    "font-size",
    "font-family",
    "font-weight",
    "font-style",
    "line-height",
    "text-align",
    "visibility",
];

/// Whether CSS inherits `property_name` by default.
pub fn is_inherited_property(property_name: &str) -> bool {
    CSS_INHERITED.contains(&property_name.to_ascii_lowercase().as_str())
}

/// Inheritance rule for declarations of rules matched by ancestors.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum InheritPolicy {
    /// Every declaration of a matched rule applies to all descendants.
    #[default]
    All,
    /// Only the listed properties apply to descendants.
    Properties(BTreeSet<String>),
}

impl InheritPolicy {
    /// The CSS inherited properties, see [`is_inherited_property`].
    pub fn css_defaults() -> Self {
        Self::only(CSS_INHERITED)
    }

    /// Inherit only `names`.
    pub fn only<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Properties(names.into_iter().map(Into::into).collect())
    }

    /// Whether `property_name` declared by an ancestor's rule reaches descendants.
    pub fn inherits(&self, property_name: &str) -> bool {
        match self {
            Self::All => true,
            Self::Properties(names) => names.contains(property_name),
        }
    }
}
