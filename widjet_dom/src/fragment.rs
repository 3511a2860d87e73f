// Copyright 2025 the Widjet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reusable scratch container for turning HTML strings into nodes.

use alloc::vec::Vec;

use crate::document::Document;
use crate::types::NodeId;

/// A caller-owned, lazily created detached container used to parse HTML
/// fragments into nodes.
///
/// The container is created on first use and emptied after every call, so
/// repeated parsing does not allocate a new container each time. Parsing
/// needs `&mut self`, which rules out nested use of one scratch.
///
/// ```
/// use widjet_dom::{Document, FragmentScratch};
///
/// let mut doc = Document::new();
/// let mut scratch = FragmentScratch::new();
/// let li = scratch.get_node(&mut doc, "<li class=item>one</li>").unwrap();
/// assert_eq!(doc.tag_name(li), Some("li"));
/// assert!(doc.parent(li).is_none());
///
/// let nodes = scratch.get_nodes(&mut doc, "<b>a</b>text<i>b</i>");
/// assert_eq!(nodes.len(), 3);
/// scratch.clear(&mut doc);
/// ```
#[derive(Debug, Default)]
pub struct FragmentScratch {
    container: Option<NodeId>,
}

impl FragmentScratch {
    /// Create an empty scratch; nothing is allocated until first use.
    pub const fn new() -> Self {
        Self { container: None }
    }

    /// Parse `html` and return its first top-level element, detached.
    ///
    /// Every other parsed node is discarded. Returns `None` when the input
    /// contains no element.
    pub fn get_node(&mut self, doc: &mut Document, html: &str) -> Option<NodeId> {
        let container = self.fill(doc, html);
        let first = doc.first_element_child(container);
        if let Some(node) = first {
            doc.detach(node);
        }
        doc.clear_children(container);
        first
    }

    /// Parse `html` and return every top-level node (elements, text, and
    /// comments) in order, detached.
    pub fn get_nodes(&mut self, doc: &mut Document, html: &str) -> Vec<NodeId> {
        let container = self.fill(doc, html);
        let nodes = doc.child_nodes(container).to_vec();
        for &node in &nodes {
            doc.detach(node);
        }
        nodes
    }

    /// Free the container. The next call creates a fresh one.
    pub fn clear(&mut self, doc: &mut Document) {
        if let Some(container) = self.container.take() {
            doc.destroy(container);
        }
    }

    fn fill(&mut self, doc: &mut Document, html: &str) -> NodeId {
        let container = match self.container {
            Some(c) if doc.is_alive(c) => c,
            _ => {
                let c = doc.create_element("div");
                self.container = Some(c);
                c
            }
        };
        doc.parse_fragment_into(container, html);
        container
    }
}
