// Copyright 2025 the Widjet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Widjet DOM: an in-memory document tree with CSS selector matching.
//!
//! This crate is the DOM surface the rest of Widjet builds on. It provides:
//!
//! - [`Document`]: a slot arena of nodes addressed by generational [`NodeId`]s,
//!   with the usual structural mutations (`append_child`, `insert_before`,
//!   `remove_child`), attribute and class helpers, and text content.
//! - [`Selector`]: a CSS selector list parser and matcher, used by
//!   [`Document::matches`], [`Document::closest`], and the query helpers.
//! - HTML fragments: [`Document::set_inner_html`], [`Document::outer_html`],
//!   and [`FragmentScratch`] for turning markup into detached nodes.
//! - [`traverse`]: ancestor walks that stop at the document element, plus
//!   `node_index` and `detach_node`.
//! - [`data_attributes`] and [`InputName`] for small string-building chores.
//!
//! ## Example
//!
//! ```rust
//! use widjet_dom::{traverse, Document, FragmentScratch, Selector};
//!
//! let mut doc = Document::new();
//! let mut scratch = FragmentScratch::new();
//! let list = scratch
//!     .get_node(&mut doc, r##"<ul class="menu"><li><a href="#">Home</a></li></ul>"##)
//!     .unwrap();
//! doc.append_child(doc.body(), list).unwrap();
//!
//! let link = doc.query_selector(doc.root(), &"ul.menu a".parse().unwrap()).unwrap();
//! let menu = traverse::parent(&doc, link, &Selector::parse(".menu").unwrap());
//! assert_eq!(menu, Some(list));
//! assert_eq!(doc.text_content(link), "Home");
//! ```
//!
//! ## Node ids
//!
//! A [`NodeId`] stays valid until the node is destroyed. Freed slots are
//! reused with a bumped generation, so stale ids never alias a new node;
//! read-only accessors return `None` or empty results for them, and
//! mutations return [`DomError::StaleNode`].
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod attrs;
mod document;
mod error;
mod fragment;
mod html;
mod selector;
pub mod traverse;
mod types;

pub use attrs::{DataValue, InputName, data_attributes};
pub use document::{Descendants, Document};
pub use error::{DomError, SelectorError, SelectorErrorKind};
pub use fragment::FragmentScratch;
pub use html::parse_fragment;
pub use selector::{Combinator, Selector, Specificity};
pub use types::{Attribute, ElementData, NodeId, NodeKind};
