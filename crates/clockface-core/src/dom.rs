#![forbid(unsafe_code)]

//! Headless display tree.
//!
//! [`Document`] is a small element arena standing in for the host document.
//! Nodes are addressed by [`NodeId`]; destroyed slots are recycled through a
//! free list. A node is either attached (it has a parent) or detached (owned
//! by whoever holds its id). Detaching never destroys.
//!
//! Every mutation is counted in [`DomStats`], which lets callers verify that
//! a reconciliation pass did no more work than necessary.
//!
//! # Usage
//!
//! ```
//! use clockface_core::dom::Document;
//!
//! let mut doc = Document::new();
//! let list = doc.create_element("ul");
//! let item = doc.create_element("li");
//! doc.set_text(item, "hello");
//! doc.append_child(list, item);
//!
//! assert_eq!(doc.to_markup(list), "<ul><li>hello</li></ul>");
//! ```

use std::collections::BTreeMap;
use std::fmt::Write as _;

/// Handle to a node in a [`Document`].
///
/// Ids of destroyed nodes may be reused by later allocations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// Raw slot index.
    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }
}

/// Mutation counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DomStats {
    /// Elements allocated.
    pub created: u64,
    /// Elements freed (subtree members included).
    pub destroyed: u64,
    /// Child attach operations.
    pub attached: u64,
    /// Child detach operations.
    pub detached: u64,
    /// Text content writes.
    pub text_writes: u64,
    /// Attribute writes.
    pub attr_writes: u64,
    /// Class list changes.
    pub class_writes: u64,
}

impl DomStats {
    /// Writes that change an existing node's content, excluding tree shape.
    #[must_use]
    pub const fn content_writes(&self) -> u64 {
        self.text_writes + self.attr_writes + self.class_writes
    }
}

#[derive(Debug, Clone)]
struct Node {
    tag: String,
    classes: Vec<String>,
    attrs: BTreeMap<String, String>,
    text: Option<String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            classes: Vec::new(),
            attrs: BTreeMap::new(),
            text: None,
            parent: None,
            children: Vec::new(),
        }
    }
}

/// Element arena with parent/child links.
#[derive(Debug, Clone, Default)]
pub struct Document {
    nodes: Vec<Option<Node>>,
    free_list: Vec<u32>,
    stats: DomStats,
}

impl Document {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.stats.created += 1;
        let node = Node::new(tag);
        if let Some(slot) = self.free_list.pop() {
            self.nodes[slot as usize] = Some(node);
            return NodeId(slot);
        }
        let slot = self.nodes.len() as u32;
        self.nodes.push(Some(node));
        NodeId(slot)
    }

    /// Whether `id` refers to a live node.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    /// Number of live nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|slot| slot.is_some()).count()
    }

    /// Whether the document has no live nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Tag name of a live node.
    #[must_use]
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.node(id).map(|n| n.tag.as_str())
    }

    /// Parent of a node, if attached.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    /// Children in order. Empty for unknown ids.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map_or(&[], |n| n.children.as_slice())
    }

    /// Append `child` as the last child of `parent`, detaching it from any
    /// previous parent first.
    ///
    /// Returns `false` (and does nothing) if either id is dead, if they are the
    /// same node, or if `child` is an ancestor of `parent`.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if parent == child || !self.contains(parent) || !self.contains(child) {
            return false;
        }
        if self.is_ancestor(child, parent) {
            return false;
        }
        self.detach(child);
        if let Some(node) = self.node_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.node_mut(parent) {
            node.children.push(child);
        }
        self.stats.attached += 1;
        #[cfg(feature = "tracing")]
        tracing::trace!(parent = parent.0, child = child.0, "dom attach");
        true
    }

    /// Detach a node from its parent. Returns `true` if it was attached.
    pub fn detach(&mut self, id: NodeId) -> bool {
        let Some(parent) = self.parent(id) else {
            return false;
        };
        if let Some(node) = self.node_mut(parent) {
            node.children.retain(|&c| c != id);
        }
        if let Some(node) = self.node_mut(id) {
            node.parent = None;
        }
        self.stats.detached += 1;
        true
    }

    /// Detach every child of `id` and return them in their former order.
    pub fn clear_children(&mut self, id: NodeId) -> Vec<NodeId> {
        let children = match self.node_mut(id) {
            Some(node) => std::mem::take(&mut node.children),
            None => return Vec::new(),
        };
        for &child in &children {
            if let Some(node) = self.node_mut(child) {
                node.parent = None;
            }
        }
        self.stats.detached += children.len() as u64;
        children
    }

    /// Detach and free a node and its whole subtree.
    ///
    /// Returns the number of nodes freed (0 for a dead id).
    pub fn destroy(&mut self, id: NodeId) -> usize {
        if !self.contains(id) {
            return 0;
        }
        self.detach(id);
        let mut stack = vec![id];
        let mut freed = 0;
        while let Some(next) = stack.pop() {
            if let Some(node) = self.nodes.get_mut(next.0 as usize).and_then(Option::take) {
                stack.extend(node.children);
                self.free_list.push(next.0);
                freed += 1;
            }
        }
        self.stats.destroyed += freed as u64;
        #[cfg(feature = "tracing")]
        tracing::trace!(root = id.0, freed, "dom destroy");
        freed
    }

    /// Text content of a node.
    #[must_use]
    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.node(id).and_then(|n| n.text.as_deref())
    }

    /// Replace the text content of a node.
    pub fn set_text(&mut self, id: NodeId, text: &str) {
        if let Some(node) = self.node_mut(id) {
            node.text = Some(text.to_string());
            self.stats.text_writes += 1;
        }
    }

    /// Attribute value.
    #[must_use]
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.node(id)
            .and_then(|n| n.attrs.get(name))
            .map(String::as_str)
    }

    /// Set an attribute.
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) {
        if let Some(node) = self.node_mut(id) {
            node.attrs.insert(name.to_string(), value.to_string());
            self.stats.attr_writes += 1;
        }
    }

    /// Whether the node carries `class`.
    #[must_use]
    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.node(id)
            .is_some_and(|n| n.classes.iter().any(|c| c == class))
    }

    /// Add a class. Returns `true` if the class list changed.
    pub fn add_class(&mut self, id: NodeId, class: &str) -> bool {
        let Some(node) = self.node_mut(id) else {
            return false;
        };
        if node.classes.iter().any(|c| c == class) {
            return false;
        }
        node.classes.push(class.to_string());
        self.stats.class_writes += 1;
        true
    }

    /// Remove a class. Returns `true` if the class list changed.
    pub fn remove_class(&mut self, id: NodeId, class: &str) -> bool {
        let Some(node) = self.node_mut(id) else {
            return false;
        };
        let before = node.classes.len();
        node.classes.retain(|c| c != class);
        if node.classes.len() == before {
            return false;
        }
        self.stats.class_writes += 1;
        true
    }

    /// Pre-order search of the subtree under `root` (inclusive) for nodes
    /// carrying `class`.
    #[must_use]
    pub fn query_class(&self, root: NodeId, class: &str) -> Vec<NodeId> {
        let mut found = Vec::new();
        self.walk(root, &mut |id, node| {
            if node.classes.iter().any(|c| c == class) {
                found.push(id);
            }
        });
        found
    }

    /// First node in the subtree under `root` whose `id` attribute matches.
    #[must_use]
    pub fn find_by_id(&self, root: NodeId, element_id: &str) -> Option<NodeId> {
        let mut found = None;
        self.walk(root, &mut |id, node| {
            if found.is_none() && node.attrs.get("id").is_some_and(|v| v == element_id) {
                found = Some(id);
            }
        });
        found
    }

    /// Concatenated text of the subtree under `root`, in pre-order.
    #[must_use]
    pub fn text_content(&self, root: NodeId) -> String {
        let mut out = String::new();
        self.walk(root, &mut |_, node| {
            if let Some(text) = &node.text {
                out.push_str(text);
            }
        });
        out
    }

    /// Mutation counters since creation or the last [`reset_stats`](Self::reset_stats).
    #[must_use]
    pub const fn stats(&self) -> DomStats {
        self.stats
    }

    /// Zero the mutation counters.
    pub fn reset_stats(&mut self) {
        self.stats = DomStats::default();
    }

    /// Deterministic HTML-like rendering of the subtree under `root`.
    ///
    /// Classes come first, then attributes in name order. Attribute values
    /// holding `data:` URIs are shortened to their media type so snapshots
    /// stay readable.
    #[must_use]
    pub fn to_markup(&self, root: NodeId) -> String {
        let mut out = String::new();
        self.write_markup(root, &mut out);
        out
    }

    fn write_markup(&self, id: NodeId, out: &mut String) {
        let Some(node) = self.node(id) else {
            return;
        };
        out.push('<');
        out.push_str(&node.tag);
        if !node.classes.is_empty() {
            let _ = write!(out, " class=\"{}\"", node.classes.join(" "));
        }
        for (name, value) in &node.attrs {
            let _ = write!(out, " {name}=\"{}\"", escape(&elide_data_uri(value)));
        }
        out.push('>');
        if let Some(text) = &node.text {
            out.push_str(&escape(text));
        }
        for &child in &node.children {
            self.write_markup(child, out);
        }
        let _ = write!(out, "</{}>", node.tag);
    }

    fn walk(&self, root: NodeId, visit: &mut dyn FnMut(NodeId, &Node)) {
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            if let Some(node) = self.node(id) {
                visit(id, node);
                stack.extend(node.children.iter().rev().copied());
            }
        }
    }

    fn is_ancestor(&self, candidate: NodeId, mut id: NodeId) -> bool {
        while let Some(parent) = self.parent(id) {
            if parent == candidate {
                return true;
            }
            id = parent;
        }
        false
    }

    #[inline]
    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0 as usize).and_then(Option::as_ref)
    }

    #[inline]
    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0 as usize).and_then(Option::as_mut)
    }
}

fn elide_data_uri(value: &str) -> std::borrow::Cow<'_, str> {
    match value.strip_prefix("data:").and_then(|rest| rest.split_once(',')) {
        Some((media, _)) => format!("data:{media},…").into(),
        None => value.into(),
    }
}

fn escape(text: &str) -> std::borrow::Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"']) {
        return text.into();
    }
    let mut out = String::with_capacity(text.len() + 8);
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out.into()
}
