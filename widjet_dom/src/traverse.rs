// Copyright 2025 the Widjet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ancestor walks and small positional helpers.
//!
//! Walks go from a node's parent upward and stop after the document element
//! (`<html>`), so the document node itself is never yielded. For a detached
//! subtree the walk simply ends at the topmost ancestor.

use alloc::vec::Vec;

use crate::document::Document;
use crate::selector::Selector;
use crate::types::NodeId;

/// Iterator over the ancestors of a node, nearest first.
///
/// Returned by [`ancestors`].
#[derive(Clone, Debug)]
pub struct Ancestors<'a> {
    doc: &'a Document,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = if current == self.doc.document_element() {
            None
        } else {
            self.doc
                .parent(current)
                .filter(|&p| p != self.doc.root())
        };
        Some(current)
    }
}

/// Walk the ancestors of `node` from its parent up to and including the
/// document element.
pub fn ancestors(doc: &Document, node: NodeId) -> Ancestors<'_> {
    let next = doc.parent(node).filter(|&p| p != doc.root());
    Ancestors { doc, next }
}

/// Ancestors of `node` matching `selector`, nearest first.
pub fn parents(doc: &Document, node: NodeId, selector: &Selector) -> Vec<NodeId> {
    ancestors(doc, node)
        .filter(|&a| doc.matches(a, selector))
        .collect()
}

/// The nearest ancestor of `node` matching `selector`.
pub fn parent(doc: &Document, node: NodeId, selector: &Selector) -> Option<NodeId> {
    ancestors(doc, node).find(|&a| doc.matches(a, selector))
}

/// `node` itself followed by its ancestors matching `selector`.
///
/// The node is always included, whether or not it matches.
pub fn node_and_parents(doc: &Document, node: NodeId, selector: &Selector) -> Vec<NodeId> {
    let mut out = Vec::with_capacity(8);
    out.push(node);
    out.extend(ancestors(doc, node).filter(|&a| doc.matches(a, selector)));
    out
}

/// Position of `node` among its parent's element children.
///
/// Returns `None` for detached nodes and for non-element nodes.
pub fn node_index(doc: &Document, node: NodeId) -> Option<usize> {
    let parent = doc.parent(node)?;
    doc.children(parent).position(|c| c == node)
}

/// Remove `node` from its parent, if it has one. The node stays alive.
pub fn detach_node(doc: &mut Document, node: NodeId) {
    doc.detach(node);
}
