//! Tag to node-kind lookup and the container capability table.

use crate::factory::LayoutHints;
use css_cascade::ResolvedStyle;
use std::collections::HashMap;
use syntax::Value;

pub const LINEAR_BOX: &str = "linearbox";
pub const FLEX_BOX: &str = "flexbox";
pub const ABSOLUTE_BOX: &str = "box";

/// Maps source tags to node kinds.
///
/// Generic block tags (`div`, `template`) have no fixed kind; theirs follows the resolved
/// `display` value: `flex` gives [`FLEX_BOX`], `absolute` gives [`ABSOLUTE_BOX`] and
/// anything else [`LINEAR_BOX`].
#[derive(Clone, Debug)]
pub struct ViewRelations {
    kinds: HashMap<String, String>,
    display_driven: Vec<String>,
}

impl Default for ViewRelations {
    fn default() -> Self {
        let mut relations = Self::empty();
        for tag in ["div", "template"] {
            relations.register_display_driven(tag);
        }
        for tag in [
            "p", "span", "label", "a", "b", "i", "em", "strong", "h1", "h2", "h3", "h4", "h5",
            "h6",
        ] {
            relations.register(tag, "text");
        }
        for tag in ["body", "main", "section", "article", "header", "footer", "nav", "ul", "li"] {
            relations.register(tag, LINEAR_BOX);
        }
        relations.register("img", "image");
        relations.register("button", "button");
        relations.register("input", "edittext");
        relations.register("hr", "divider");
        relations.register("iframe", "webview");
        relations.register("webview", "webview");
        relations
    }
}

impl ViewRelations {
    /// A table without any tags.
    pub fn empty() -> Self {
        Self {
            kinds: HashMap::new(),
            display_driven: Vec::new(),
        }
    }

    /// Map `tag` to `kind`, replacing any earlier mapping.
    pub fn register(&mut self, tag: &str, kind: &str) -> &mut Self {
        let tag = tag.to_ascii_lowercase();
        self.display_driven.retain(|known| *known != tag);
        self.kinds.insert(tag, kind.to_owned());
        self
    }

    /// Resolve `tag` through its `display` value.
    pub fn register_display_driven(&mut self, tag: &str) -> &mut Self {
        let tag = tag.to_ascii_lowercase();
        self.kinds.remove(&tag);
        if !self.display_driven.contains(&tag) {
            self.display_driven.push(tag);
        }
        self
    }

    /// Whether `tag`'s kind follows its `display` value.
    pub fn is_display_driven(&self, tag: &str) -> bool {
        self.display_driven
            .iter()
            .any(|known| known.eq_ignore_ascii_case(tag))
    }

    /// The node kind for `tag` given its resolved style; `None` for unknown tags.
    pub fn kind_for(&self, tag: &str, style: &ResolvedStyle) -> Option<&str> {
        if self.is_display_driven(tag) {
            let display = style.get("display").and_then(Value::as_text);
            return Some(match display.map(str::to_ascii_lowercase).as_deref() {
                Some("flex") => FLEX_BOX,
                Some("absolute") => ABSOLUTE_BOX,
                _ => LINEAR_BOX,
            });
        }
        self.kinds
            .get(&tag.to_ascii_lowercase())
            .map(String::as_str)
    }
}

/// Per container kind, the layout hints its children get by default.
#[derive(Clone, Debug)]
pub struct ContainerTable {
    defaults: HashMap<String, fn() -> LayoutHints>,
}

impl Default for ContainerTable {
    fn default() -> Self {
        let mut table = Self::empty();
        for kind in [LINEAR_BOX, FLEX_BOX, ABSOLUTE_BOX] {
            table.register(kind, LayoutHints::wrap_content);
        }
        table
    }
}

impl ContainerTable {
    pub fn empty() -> Self {
        Self {
            defaults: HashMap::new(),
        }
    }

    pub fn register(&mut self, kind: &str, child_layout: fn() -> LayoutHints) -> &mut Self {
        self.defaults.insert(kind.to_owned(), child_layout);
        self
    }

    /// Whether nodes of `kind` hold children.
    pub fn is_container(&self, kind: &str) -> bool {
        self.defaults.contains_key(kind)
    }

    /// Default hints for children of a `kind` container.
    pub fn child_layout(&self, kind: &str) -> Option<LayoutHints> {
        self.defaults.get(kind).map(|constructor| constructor())
    }
}
