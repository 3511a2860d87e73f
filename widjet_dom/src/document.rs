// Copyright 2025 the Widjet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core document implementation: structure, mutation, and queries.

use alloc::string::String;
use alloc::vec::Vec;

use crate::error::DomError;
use crate::selector::Selector;
use crate::types::{ElementData, NodeId, NodeKind};

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// An in-memory document tree.
///
/// Nodes live in a slot arena addressed by generational [`NodeId`]s. A new
/// document already contains `<html><head></head><body></body></html>` under
/// the document node; nodes created with [`Document::create_element`] and
/// friends start detached until inserted.
pub struct Document {
    nodes: Vec<Option<Node>>, // slots
    generations: Vec<u32>,    // last generation per slot (persists across frees)
    free_list: Vec<usize>,
    root: NodeId,
    document_element: NodeId,
    head: NodeId,
    body: NodeId,
}

impl core::fmt::Debug for Document {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        f.debug_struct("Document")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &self.free_list.len())
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug)]
struct Node {
    generation: u32,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    kind: NodeKind,
}

impl Node {
    fn new(generation: u32, kind: NodeKind) -> Self {
        Self {
            generation,
            parent: None,
            children: Vec::new(),
            kind,
        }
    }
}

impl Document {
    /// Create a document holding an empty `<html>` with `<head>` and `<body>`.
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            root: NodeId::new(0, 0),
            document_element: NodeId::new(0, 0),
            head: NodeId::new(0, 0),
            body: NodeId::new(0, 0),
        };
        let root = doc.alloc(NodeKind::Document);
        let html = doc.create_element("html");
        let head = doc.create_element("head");
        let body = doc.create_element("body");
        doc.link(root, html, None);
        doc.link(html, head, None);
        doc.link(html, body, None);
        doc.root = root;
        doc.document_element = html;
        doc.head = head;
        doc.body = body;
        doc
    }

    /// The document node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The `<html>` element.
    pub fn document_element(&self) -> NodeId {
        self.document_element
    }

    /// The `<head>` element.
    pub fn head(&self) -> NodeId {
        self.head
    }

    /// The `<body>` element.
    pub fn body(&self) -> NodeId {
        self.body
    }

    /// Create a detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.alloc(NodeKind::Element(ElementData::new(tag)))
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.alloc(NodeKind::Text(text.into()))
    }

    /// Create a detached comment node.
    pub fn create_comment(&mut self, text: &str) -> NodeId {
        self.alloc(NodeKind::Comment(text.into()))
    }

    /// Returns `true` if `id` refers to a live node.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    /// The kind of a live node.
    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.node(id).map(|n| &n.kind)
    }

    /// Element payload of a live element node.
    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        self.kind(id).and_then(NodeKind::as_element)
    }

    /// Returns `true` if `id` is a live element.
    pub fn is_element(&self, id: NodeId) -> bool {
        self.element(id).is_some()
    }

    /// Lowercased tag name of an element.
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(ElementData::tag)
    }

    /// Parent node, if any.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    /// Parent node if it is an element.
    pub fn parent_element(&self, id: NodeId) -> Option<NodeId> {
        self.parent(id).filter(|&p| self.is_element(p))
    }

    /// All child nodes in order (elements, text, and comments).
    pub fn child_nodes(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Element children in order.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.child_nodes(id)
            .iter()
            .copied()
            .filter(|&c| self.is_element(c))
    }

    /// First element child.
    pub fn first_element_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).next()
    }

    /// The closest preceding sibling that is an element.
    pub fn previous_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        let siblings = self.child_nodes(self.parent(id)?);
        let pos = siblings.iter().position(|&c| c == id)?;
        siblings[..pos]
            .iter()
            .rev()
            .copied()
            .find(|&c| self.is_element(c))
    }

    /// The closest following sibling that is an element.
    pub fn next_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        let siblings = self.child_nodes(self.parent(id)?);
        let pos = siblings.iter().position(|&c| c == id)?;
        siblings[pos + 1..]
            .iter()
            .copied()
            .find(|&c| self.is_element(c))
    }

    /// Append `child` as the last child of `parent`, detaching it first.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.insert_before(parent, child, None)
    }

    /// Insert `child` under `parent` before `reference` (or last when `None`).
    ///
    /// `child` is detached from its previous parent first.
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> Result<(), DomError> {
        let parent_node = self.node(parent).ok_or(DomError::StaleNode(parent))?;
        if !parent_node.kind.is_container() {
            return Err(DomError::HierarchyRequest { parent, child });
        }
        let child_node = self.node(child).ok_or(DomError::StaleNode(child))?;
        if matches!(child_node.kind, NodeKind::Document) || self.contains(child, parent) {
            return Err(DomError::HierarchyRequest { parent, child });
        }
        let mut reference = reference;
        if let Some(r) = reference {
            if self.parent(r) != Some(parent) {
                return Err(DomError::NotAChild { parent, child: r });
            }
            if r == child {
                reference = self.next_sibling(child);
            }
        }
        self.unlink(child);
        self.link(parent, child, reference);
        Ok(())
    }

    /// Remove `child` from `parent`, leaving it detached but alive.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        if !self.is_alive(parent) {
            return Err(DomError::StaleNode(parent));
        }
        if !self.is_alive(child) {
            return Err(DomError::StaleNode(child));
        }
        if self.parent(child) != Some(parent) {
            return Err(DomError::NotAChild { parent, child });
        }
        self.unlink(child);
        Ok(())
    }

    /// Detach a node from its parent; a no-op for detached or stale nodes.
    pub fn detach(&mut self, id: NodeId) {
        if self.is_alive(id) {
            self.unlink(id);
        }
    }

    /// Detach a node and free it together with its whole subtree.
    ///
    /// The document node and the initial `<html>`, `<head>`, `<body>` are
    /// only detached, never freed.
    pub fn destroy(&mut self, id: NodeId) {
        if !self.is_alive(id) {
            return;
        }
        self.unlink(id);
        self.free_subtree(id);
    }

    /// Returns `true` if `node` is `ancestor` or one of its descendants.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cur = Some(node);
        while let Some(c) = cur {
            if c == ancestor {
                return true;
            }
            cur = self.parent(c);
        }
        false
    }

    /// Returns `true` if the node is reachable from the document node.
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.is_alive(id) && self.contains(self.root, id)
    }

    /// Value of attribute `name` on an element.
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id).and_then(|el| el.attribute(name))
    }

    /// Set attribute `name` on an element.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> Result<(), DomError> {
        self.element_mut(id)?.set_attribute(name, value);
        Ok(())
    }

    /// Remove attribute `name`; returns whether it was present.
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> Result<bool, DomError> {
        Ok(self.element_mut(id)?.remove_attribute(name))
    }

    /// The `id` attribute of an element.
    pub fn element_id(&self, id: NodeId) -> Option<&str> {
        self.element(id).and_then(ElementData::id)
    }

    /// Returns `true` if the element carries `class`.
    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.element(id).is_some_and(|el| el.has_class(class))
    }

    /// Add `class` to the element's class list if missing.
    pub fn add_class(&mut self, id: NodeId, class: &str) -> Result<(), DomError> {
        let el = self.element_mut(id)?;
        if !el.has_class(class) {
            let mut value: String = el.attribute("class").unwrap_or_default().trim_end().into();
            if !value.is_empty() {
                value.push(' ');
            }
            value.push_str(class);
            el.set_attribute("class", &value);
        }
        Ok(())
    }

    /// Remove every occurrence of `class` from the element's class list.
    pub fn remove_class(&mut self, id: NodeId, class: &str) -> Result<(), DomError> {
        let el = self.element_mut(id)?;
        if el.has_class(class) {
            let value = el
                .classes()
                .filter(|&c| c != class)
                .collect::<Vec<_>>()
                .join(" ");
            el.set_attribute("class", &value);
        }
        Ok(())
    }

    /// Toggle `class`; returns `true` if the class is present afterwards.
    pub fn toggle_class(&mut self, id: NodeId, class: &str) -> Result<bool, DomError> {
        if self.has_class(id, class) {
            self.remove_class(id, class)?;
            Ok(false)
        } else {
            self.add_class(id, class)?;
            Ok(true)
        }
    }

    /// Concatenated text of all text descendants (or the node's own text).
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        match self.kind(id) {
            Some(NodeKind::Text(t) | NodeKind::Comment(t)) => out.push_str(t),
            Some(_) => {
                for d in self.descendants(id) {
                    if let Some(NodeKind::Text(t)) = self.kind(d) {
                        out.push_str(t);
                    }
                }
            }
            None => {}
        }
        out
    }

    /// Replace the node's children with a single text node.
    pub fn set_text_content(&mut self, id: NodeId, text: &str) -> Result<(), DomError> {
        let node = self.node_mut(id).ok_or(DomError::StaleNode(id))?;
        if let NodeKind::Text(t) | NodeKind::Comment(t) = &mut node.kind {
            t.clear();
            t.push_str(text);
            return Ok(());
        }
        self.clear_children(id);
        if !text.is_empty() {
            let t = self.create_text(text);
            self.link(id, t, None);
        }
        Ok(())
    }

    /// Returns `true` if `id` is an element matching `selector`.
    ///
    /// Non-element nodes never match.
    pub fn matches(&self, id: NodeId, selector: &Selector) -> bool {
        selector.matches(self, id)
    }

    /// The node itself or its nearest ancestor element matching `selector`.
    pub fn closest(&self, id: NodeId, selector: &Selector) -> Option<NodeId> {
        let mut cur = Some(id);
        while let Some(c) = cur {
            if self.matches(c, selector) {
                return Some(c);
            }
            cur = self.parent(c);
        }
        None
    }

    /// First descendant of `scope` (document order) matching `selector`.
    pub fn query_selector(&self, scope: NodeId, selector: &Selector) -> Option<NodeId> {
        self.descendants(scope).find(|&d| self.matches(d, selector))
    }

    /// All descendants of `scope` (document order) matching `selector`.
    pub fn query_selector_all(&self, scope: NodeId, selector: &Selector) -> Vec<NodeId> {
        self.descendants(scope)
            .filter(|&d| self.matches(d, selector))
            .collect()
    }

    /// Pre-order iterator over the descendants of `id`, excluding `id`.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        let stack = self.child_nodes(id).iter().rev().copied().collect();
        Descendants { doc: self, stack }
    }

    /// Deep-clone a node and its subtree; the clone is detached.
    pub fn clone_node(&mut self, id: NodeId) -> Option<NodeId> {
        let node = self.node(id)?;
        if matches!(node.kind, NodeKind::Document) {
            return None;
        }
        let kind = node.kind.clone();
        let root = self.alloc(kind);
        // (source, copy of its parent); children are pushed in reverse so
        // each parent receives them in order.
        let mut stack: Vec<(NodeId, NodeId)> = self
            .child_nodes(id)
            .iter()
            .rev()
            .map(|&c| (c, root))
            .collect();
        while let Some((source, parent)) = stack.pop() {
            let Some(node) = self.node(source) else {
                continue;
            };
            let kind = node.kind.clone();
            let copy = self.alloc(kind);
            self.link(parent, copy, None);
            stack.extend(self.child_nodes(source).iter().rev().map(|&c| (c, copy)));
        }
        Some(root)
    }

    pub(crate) fn element_mut(&mut self, id: NodeId) -> Result<&mut ElementData, DomError> {
        match self.node_mut(id) {
            Some(Node {
                kind: NodeKind::Element(el),
                ..
            }) => Ok(el),
            Some(_) => Err(DomError::NotAnElement(id)),
            None => Err(DomError::StaleNode(id)),
        }
    }

    /// Free every child of `id`.
    pub(crate) fn clear_children(&mut self, id: NodeId) {
        let children = match self.node_mut(id) {
            Some(n) => core::mem::take(&mut n.children),
            None => return,
        };
        for child in children {
            if let Some(c) = self.node_mut(child) {
                c.parent = None;
            }
            self.free_subtree(child);
        }
    }

    /// Link an already-detached `child` under `parent`.
    pub(crate) fn link(&mut self, parent: NodeId, child: NodeId, before: Option<NodeId>) {
        let Some(p) = self.node_mut(parent) else {
            return;
        };
        let at = before
            .and_then(|b| p.children.iter().position(|&c| c == b))
            .unwrap_or(p.children.len());
        p.children.insert(at, child);
        if let Some(c) = self.node_mut(child) {
            c.parent = Some(parent);
        }
    }

    fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let siblings = self.child_nodes(self.parent(id)?);
        let pos = siblings.iter().position(|&c| c == id)?;
        siblings.get(pos + 1).copied()
    }

    fn unlink(&mut self, id: NodeId) {
        let Some(parent) = self.node_mut(id).and_then(|n| n.parent.take()) else {
            return;
        };
        if let Some(p) = self.node_mut(parent) {
            p.children.retain(|&c| c != id);
        }
    }

    fn free_subtree(&mut self, id: NodeId) {
        let mut stack = alloc::vec![id];
        while let Some(id) = stack.pop() {
            if id == self.root
                || id == self.document_element
                || id == self.head
                || id == self.body
                || !self.is_alive(id)
            {
                continue;
            }
            let Some(node) = self.nodes[id.idx()].take() else {
                continue;
            };
            self.free_list.push(id.idx());
            for &child in &node.children {
                if let Some(c) = self.node_mut(child) {
                    c.parent = None;
                }
            }
            stack.extend(node.children);
        }
    }

    fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, kind));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "node indices are stored as u32 in NodeId"
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, kind)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "node indices are stored as u32 in NodeId"
            )]
            ((self.nodes.len() - 1) as u32, generation)
        };
        NodeId::new(idx, generation)
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes
            .get(id.idx())
            .and_then(Option::as_ref)
            .filter(|n| n.generation == id.1)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes
            .get_mut(id.idx())
            .and_then(Option::as_mut)
            .filter(|n| n.generation == id.1)
    }
}

/// Pre-order iterator returned by [`Document::descendants`].
#[derive(Debug)]
pub struct Descendants<'a> {
    doc: &'a Document,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let next = self.stack.pop()?;
        self.stack
            .extend(self.doc.child_nodes(next).iter().rev().copied());
        Some(next)
    }
}
