//! Element tree stored in an arena; nodes are immutable once parsing has finished.

mod adapter;
mod printing;

use indextree::{Arena, Node, NodeId};
use smallvec::SmallVec;
use syntax::{DeclarationMap, Value};

/// One element of the document.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ElementNode {
    tag: String,
    id: Option<String>,
    classes: SmallVec<String, 4>,
    attrs: DeclarationMap,
    text: Option<String>,
    line: u32,
    column: u32,
    key: u64,
}

impl ElementNode {
    /// A node with the given tag (lowercased) and nothing else.
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            ..Self::default()
        }
    }

    /// Build a node from a tag and an attribute map, moving `id` and `class` out of the
    /// map into their own fields.
    pub fn from_attributes(tag: &str, attrs: DeclarationMap) -> Self {
        let mut node = Self::new(tag);
        node.attrs = attrs;
        if let Some(id) = node.attrs.remove("id") {
            node.id = Some(id.to_string());
        }
        if let Some(classes) = node.attrs.remove("class") {
            for class in classes.to_string().split_whitespace() {
                node.add_class(class);
            }
        }
        node
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    #[must_use]
    pub const fn at(mut self, line: u32, column: u32) -> Self {
        self.line = line;
        self.column = column;
        self
    }

    fn add_class(&mut self, class: &str) {
        if !self.classes.iter().any(|known| known == class) {
            self.classes.push(class.to_owned());
        }
    }

    pub(crate) fn push_text(&mut self, text: &str) {
        match &mut self.text {
            Some(existing) => {
                existing.push(' ');
                existing.push_str(text);
            }
            None => self.text = Some(text.to_owned()),
        }
    }

    #[inline]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    #[inline]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Classes in source order, without duplicates.
    #[inline]
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    #[inline]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|known| known == class)
    }

    /// Inline attributes and `style` declarations, `id` and `class` excluded.
    #[inline]
    pub const fn attrs(&self) -> &DeclarationMap {
        &self.attrs
    }

    #[inline]
    pub fn attr(&self, name: &str) -> Option<&Value> {
        self.attrs.get(name)
    }

    /// Text content directly inside the element.
    #[inline]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    #[inline]
    pub const fn line(&self) -> u32 {
        self.line
    }

    #[inline]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Key unique within the owning tree, assigned on insertion.
    #[inline]
    pub const fn key(&self) -> u64 {
        self.key
    }
}

/// Ordered top-level elements and their descendants.
#[derive(Clone, Default)]
pub struct ElementTree {
    arena: Arena<ElementNode>,
    roots: Vec<NodeId>,
}

impl ElementTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `node` as the last top-level element.
    pub fn append_root(&mut self, node: ElementNode) -> NodeId {
        let id = self.insert(node);
        self.roots.push(id);
        id
    }

    /// Insert `node` as the last child of `parent`.
    pub fn append_child(&mut self, parent: NodeId, node: ElementNode) -> NodeId {
        let id = self.insert(node);
        parent.append(id, &mut self.arena);
        id
    }

    fn insert(&mut self, mut node: ElementNode) -> NodeId {
        node.key = self.arena.count() as u64;
        self.arena.new_node(node)
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Option<&mut ElementNode> {
        self.arena.get_mut(id).map(Node::get_mut)
    }

    #[inline]
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn node(&self, id: NodeId) -> Option<&ElementNode> {
        self.arena.get(id).map(Node::get)
    }

    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.arena.get(id).and_then(Node::parent)
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        id.children(&self.arena)
    }

    /// Number of elements in the tree.
    #[inline]
    pub fn len(&self) -> usize {
        self.arena.count()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Every element in document (pre-)order.
    pub fn preorder(&self) -> Vec<NodeId> {
        self.roots
            .iter()
            .flat_map(|root| root.descendants(&self.arena))
            .collect()
    }

    /// First element, in document order, carrying `id`.
    pub fn find_by_id(&self, id: &str) -> Option<NodeId> {
        self.preorder()
            .into_iter()
            .find(|&candidate| self.node(candidate).and_then(ElementNode::id) == Some(id))
    }

    /// Depth of `id` below its root; roots are at depth 1.
    pub fn depth(&self, id: NodeId) -> usize {
        id.ancestors(&self.arena).count()
    }
}
