//! The render tree: created nodes with their resolved styles and layout hints.

use crate::factory::LayoutHints;
use css_cascade::ResolvedStyle;
use indextree::{Arena, Node, NodeId};
use log::warn;
use serde_json::{Map, Value as JsonValue, json};
use std::collections::HashMap;

/// 8-bit RGBA channels.
pub type Rgba = [u8; 4];

/// One created node.
#[derive(Clone, Debug)]
pub struct RenderNode<N> {
    /// The host node built by the factory.
    pub node: N,
    pub kind: String,
    pub tag: String,
    pub id: Option<String>,
    pub text: Option<String>,
    pub style: ResolvedStyle,
    pub layout: LayoutHints,
    pub foreground: Option<Rgba>,
    pub background: Option<Rgba>,
}

/// A node left out of the render tree, with its subtree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Omission {
    pub tag: String,
    pub depth: usize,
    pub reason: String,
}

/// Created nodes in an arena, with the top-level nodes and an id registry.
#[derive(Debug)]
pub struct RenderTree<N> {
    arena: Arena<RenderNode<N>>,
    roots: Vec<NodeId>,
    ids: HashMap<String, NodeId>,
}

impl<N> Default for RenderTree<N> {
    #[inline]
    fn default() -> Self {
        Self {
            arena: Arena::new(),
            roots: Vec::new(),
            ids: HashMap::new(),
        }
    }
}

impl<N> RenderTree<N> {
    /// Add a node under `parent`, or as a top-level node. The node's id, if any, is
    /// registered; a later node with the same id replaces the earlier one in the registry.
    pub(crate) fn insert(&mut self, parent: Option<NodeId>, node: RenderNode<N>) -> NodeId {
        let id = node.id.clone();
        let handle = self.arena.new_node(node);
        match parent {
            Some(parent_id) => parent_id.append(handle, &mut self.arena),
            None => self.roots.push(handle),
        }
        if let Some(name) = id
            && let Some(previous) = self.ids.insert(name.clone(), handle)
        {
            warn!("duplicate id `{name}`: {previous:?} replaced by {handle:?}");
        }
        handle
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Option<&mut RenderNode<N>> {
        self.arena.get_mut(id).map(Node::get_mut)
    }

    pub fn node(&self, id: NodeId) -> Option<&RenderNode<N>> {
        self.arena.get(id).map(Node::get)
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        id.children(&self.arena)
    }

    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.arena.get(id).and_then(Node::parent)
    }

    /// The node registered under `id`.
    pub fn by_id(&self, id: &str) -> Option<NodeId> {
        self.ids.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.arena.count()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.count() == 0
    }

    /// All nodes in document order.
    pub fn preorder(&self) -> Vec<NodeId> {
        self.roots
            .iter()
            .flat_map(|root| root.descendants(&self.arena))
            .collect()
    }

    /// Snapshot of the tree without the host nodes.
    pub fn to_json_value(&self) -> JsonValue {
        JsonValue::Array(self.roots.iter().map(|&root| self.node_json(root)).collect())
    }

    fn node_json(&self, id: NodeId) -> JsonValue {
        let Some(node) = self.node(id) else {
            return JsonValue::Null;
        };
        let mut object = Map::new();
        object.insert("kind".to_owned(), json!(node.kind));
        object.insert("tag".to_owned(), json!(node.tag));
        if let Some(name) = &node.id {
            object.insert("id".to_owned(), json!(name));
        }
        if let Some(text) = &node.text {
            object.insert("text".to_owned(), json!(text));
        }
        object.insert("layout".to_owned(), json!(node.layout));
        if let Some(rgba) = node.foreground {
            object.insert("foreground".to_owned(), json!(rgba));
        }
        if let Some(rgba) = node.background {
            object.insert("background".to_owned(), json!(rgba));
        }
        object.insert("style".to_owned(), json!(node.style));
        let children: Vec<JsonValue> = self.children(id).map(|child| self.node_json(child)).collect();
        if !children.is_empty() {
            object.insert("children".to_owned(), JsonValue::Array(children));
        }
        JsonValue::Object(object)
    }
}
