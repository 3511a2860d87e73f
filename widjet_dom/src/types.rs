// Copyright 2025 the Widjet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the document: node identifiers, node kinds, and attributes.

use alloc::string::String;
use alloc::vec::Vec;

/// Identifier for a node in a [`Document`](crate::Document).
///
/// This is a small, copyable handle that stays stable while the node is alive
/// but becomes invalid when the underlying slot is reused.
/// It consists of a slot index and a generation counter.
///
/// ## Semantics
///
/// - On creation, a fresh slot is allocated with generation `1`.
/// - On [`Document::destroy`](crate::Document::destroy), the slot is freed; any
///   existing `NodeId` that pointed to that slot is now stale.
/// - On reuse of a freed slot, its generation is incremented, producing a new, distinct `NodeId`.
///
/// Use [`Document::is_alive`](crate::Document::is_alive) to check whether a `NodeId` still refers to a live node.
/// Stale `NodeId`s never alias a different live node because the generation must match.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// The kind of a node together with its kind-specific payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    /// The document node; the root of every connected tree.
    Document,
    /// An element such as `<div class="foo">`.
    Element(ElementData),
    /// A run of character data.
    Text(String),
    /// A `<!-- comment -->`.
    Comment(String),
}

impl NodeKind {
    /// Returns the element payload if this is an element.
    pub fn as_element(&self) -> Option<&ElementData> {
        match self {
            Self::Element(el) => Some(el),
            _ => None,
        }
    }

    /// Returns `true` if nodes of this kind may have children.
    pub fn is_container(&self) -> bool {
        matches!(self, Self::Document | Self::Element(_))
    }
}

/// A single `name="value"` attribute.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attribute {
    /// Lowercased attribute name.
    pub name: String,
    /// Attribute value; empty for boolean attributes.
    pub value: String,
}

/// Element payload: the tag name and attributes in source order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ElementData {
    pub(crate) tag: String,
    pub(crate) attributes: Vec<Attribute>,
}

impl ElementData {
    /// Create an element payload; the tag is stored lowercased.
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attributes: Vec::new(),
        }
    }

    /// Lowercased tag name.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Attributes in source order.
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Value of the attribute `name`, if present.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
            .map(|a| a.value.as_str())
    }

    /// The `id` attribute, if present.
    pub fn id(&self) -> Option<&str> {
        self.attribute("id")
    }

    /// Iterate the whitespace-separated tokens of the `class` attribute.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attribute("class")
            .unwrap_or_default()
            .split_ascii_whitespace()
    }

    /// Returns `true` if the `class` attribute contains `class`.
    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }

    pub(crate) fn set_attribute(&mut self, name: &str, value: &str) {
        if let Some(a) = self
            .attributes
            .iter_mut()
            .find(|a| a.name.eq_ignore_ascii_case(name))
        {
            a.value.clear();
            a.value.push_str(value);
        } else {
            self.attributes.push(Attribute {
                name: name.to_ascii_lowercase(),
                value: value.into(),
            });
        }
    }

    pub(crate) fn remove_attribute(&mut self, name: &str) -> bool {
        let before = self.attributes.len();
        self.attributes.retain(|a| !a.name.eq_ignore_ascii_case(name));
        before != self.attributes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_tag_is_lowercased() {
        let el = ElementData::new("DIV");
        assert_eq!(el.tag(), "div");
    }

    #[test]
    fn attributes_are_case_insensitive_and_replace_in_place() {
        let mut el = ElementData::new("input");
        el.set_attribute("Type", "text");
        el.set_attribute("name", "a");
        el.set_attribute("TYPE", "checkbox");
        assert_eq!(el.attribute("type"), Some("checkbox"));
        assert_eq!(el.attributes().len(), 2);
        assert_eq!(el.attributes()[0].name, "type");
        assert!(el.remove_attribute("type"));
        assert!(!el.remove_attribute("type"));
        assert_eq!(el.attribute("type"), None);
    }

    #[test]
    fn class_tokens_split_on_whitespace() {
        let mut el = ElementData::new("div");
        el.set_attribute("class", "  foo\tbar  baz ");
        let classes: Vec<&str> = el.classes().collect();
        assert_eq!(classes, ["foo", "bar", "baz"]);
        assert!(el.has_class("bar"));
        assert!(!el.has_class("ba"));
    }
}
