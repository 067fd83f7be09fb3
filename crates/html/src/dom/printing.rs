use core::fmt;

use super::{ElementNode, ElementTree};
use indextree::NodeId;
use serde_json::{Map, Value, json};

fn node_to_json(tree: &ElementTree, id: NodeId) -> Value {
    let Some(node) = tree.node(id) else {
        return Value::Null;
    };
    let mut attrs = Map::new();
    for (name, value) in node.attrs().iter() {
        attrs.insert(name.to_owned(), json!(value));
    }
    let children: Vec<Value> = tree
        .children(id)
        .map(|child| node_to_json(tree, child))
        .collect();
    json!({
        "tag": node.tag(),
        "id": node.id(),
        "classes": node.classes(),
        "attrs": Value::Object(attrs),
        "text": node.text(),
        "children": children,
    })
}

fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for character in text.chars() {
        match character {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            _ => out.push(character),
        }
    }
    out
}

fn write_indent(formatter: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
    for _ in 0..depth {
        formatter.write_str("  ")?;
    }
    Ok(())
}

fn write_open_tag(formatter: &mut fmt::Formatter<'_>, node: &ElementNode) -> fmt::Result {
    write!(formatter, "<{}", node.tag())?;
    if let Some(id) = node.id() {
        write!(formatter, " id=\"{}\"", escape_text(id))?;
    }
    if !node.classes().is_empty() {
        write!(formatter, " class=\"{}\"", node.classes().join(" "))?;
    }
    for (name, value) in node.attrs().iter() {
        write!(formatter, " {name}=\"{}\"", escape_text(&value.to_string()))?;
    }
    formatter.write_str(">")
}

fn fmt_node(
    tree: &ElementTree,
    id: NodeId,
    formatter: &mut fmt::Formatter<'_>,
    depth: usize,
) -> fmt::Result {
    let Some(node) = tree.node(id) else {
        return Ok(());
    };
    write_indent(formatter, depth)?;
    write_open_tag(formatter, node)?;
    formatter.write_str("\n")?;
    if let Some(text) = node.text() {
        write_indent(formatter, depth.saturating_add(1))?;
        writeln!(formatter, "\"{}\"", escape_text(text))?;
    }
    for child in tree.children(id) {
        fmt_node(tree, child, formatter, depth.saturating_add(1))?;
    }
    write_indent(formatter, depth)?;
    writeln!(formatter, "</{}>", node.tag())
}

impl fmt::Debug for ElementTree {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(formatter, "ElementTree")?;
        for &root in self.roots() {
            fmt_node(self, root, formatter, 1)?;
        }
        Ok(())
    }
}

impl ElementTree {
    /// Deterministic JSON representation: an array of top-level elements, each
    /// `{ "tag", "id", "classes", "attrs", "text", "children" }`.
    pub fn to_json_value(&self) -> Value {
        Value::Array(
            self.roots()
                .iter()
                .map(|&root| node_to_json(self, root))
                .collect(),
        )
    }

    /// Pretty JSON string for snapshots and test comparisons.
    pub fn to_json_string(&self) -> String {
        serde_json::to_string_pretty(&self.to_json_value()).unwrap_or_else(|_| String::from("[]"))
    }
}
