// Copyright 2025 the Widjet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lenient HTML fragment parsing and serialization.
//!
//! The parser never fails. It understands elements with quoted, unquoted, and
//! boolean attributes, void elements, self-closing syntax, comments, raw text
//! in `script` and `style`, and the common character references. Doctypes
//! and processing instructions are skipped. Stray end tags are ignored and
//! unclosed elements are closed at the end of input.

use alloc::string::String;
use alloc::vec::Vec;

use smallvec::SmallVec;

use crate::document::Document;
use crate::error::DomError;
use crate::types::{NodeId, NodeKind};

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

fn is_raw_text(tag: &str) -> bool {
    RAW_TEXT_ELEMENTS.contains(&tag)
}

impl Document {
    /// Serialize `id` and its subtree.
    ///
    /// The document node serializes as its children. Stale ids produce an
    /// empty string.
    pub fn outer_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.serialize(id, &mut out);
        out
    }

    /// Serialize the children of `id`.
    pub fn inner_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        for &child in self.child_nodes(id) {
            self.serialize(child, &mut out);
        }
        out
    }

    /// Replace the children of element `id` with the nodes parsed from `html`.
    pub fn set_inner_html(&mut self, id: NodeId, html: &str) -> Result<(), DomError> {
        self.element_mut(id)?;
        self.clear_children(id);
        self.parse_fragment_into(id, html);
        Ok(())
    }

    /// Parse `html` and append the resulting nodes to `parent`.
    pub(crate) fn parse_fragment_into(&mut self, parent: NodeId, html: &str) {
        FragmentParser {
            doc: self,
            src: html,
            pos: 0,
            open: SmallVec::from_elem(parent, 1),
        }
        .run();
    }

    fn serialize(&self, id: NodeId, out: &mut String) {
        let mut stack: Vec<Step> = alloc::vec![Step::Open(id)];
        while let Some(step) = stack.pop() {
            let id = match step {
                Step::Open(id) => id,
                Step::Close(id) => {
                    if let Some(tag) = self.tag_name(id) {
                        out.push_str("</");
                        out.push_str(tag);
                        out.push('>');
                    }
                    continue;
                }
            };
            match self.kind(id) {
                None => continue,
                Some(NodeKind::Document) => {}
                Some(NodeKind::Text(text)) => {
                    let raw = self
                        .parent(id)
                        .and_then(|p| self.tag_name(p))
                        .is_some_and(is_raw_text);
                    if raw {
                        out.push_str(text);
                    } else {
                        escape_into(out, text, false);
                    }
                    continue;
                }
                Some(NodeKind::Comment(text)) => {
                    out.push_str("<!--");
                    out.push_str(text);
                    out.push_str("-->");
                    continue;
                }
                Some(NodeKind::Element(el)) => {
                    out.push('<');
                    out.push_str(el.tag());
                    for attr in el.attributes() {
                        out.push(' ');
                        out.push_str(&attr.name);
                        out.push_str("=\"");
                        escape_into(out, &attr.value, true);
                        out.push('"');
                    }
                    out.push('>');
                    if is_void(el.tag()) {
                        continue;
                    }
                    stack.push(Step::Close(id));
                }
            }
            stack.extend(self.child_nodes(id).iter().rev().map(|&c| Step::Open(c)));
        }
    }
}

/// Pending work for the serializer.
#[derive(Copy, Clone)]
enum Step {
    Open(NodeId),
    Close(NodeId),
}

fn escape_into(out: &mut String, text: &str, attribute: bool) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' if !attribute => out.push_str("&lt;"),
            '>' if !attribute => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            c => out.push(c),
        }
    }
}

/// Decode character references in `text`. Unknown references are kept as-is.
pub(crate) fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.into();
    }
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        match decode_one(rest) {
            Some((c, len)) => {
                out.push(c);
                rest = &rest[len..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Decode a reference at the start of `s` (which begins with `&`).
fn decode_one(s: &str) -> Option<(char, usize)> {
    let end = s.find(';')?;
    let body = &s[1..end];
    let c = if let Some(num) = body.strip_prefix('#') {
        let code = match num.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse().ok()?,
        };
        char::from_u32(code)?
    } else {
        match body {
            "amp" => '&',
            "lt" => '<',
            "gt" => '>',
            "quot" => '"',
            "apos" => '\'',
            "nbsp" => '\u{a0}',
            "copy" => '\u{a9}',
            "hellip" => '\u{2026}',
            "mdash" => '\u{2014}',
            "ndash" => '\u{2013}',
            _ => return None,
        }
    };
    Some((c, end + 1))
}

struct FragmentParser<'a> {
    doc: &'a mut Document,
    src: &'a str,
    pos: usize,
    /// Open elements; the first entry is the fragment parent and is never popped.
    open: SmallVec<[NodeId; 8]>,
}

impl<'a> FragmentParser<'a> {
    fn run(mut self) {
        while self.pos < self.src.len() {
            let rest = &self.src[self.pos..];
            if rest.starts_with("<!--") {
                self.comment();
            } else if rest.starts_with("</") {
                self.end_tag();
            } else if rest.starts_with("<!") || rest.starts_with("<?") {
                self.skip_past('>');
            } else if rest.starts_with('<')
                && rest[1..].starts_with(|c: char| c.is_ascii_alphabetic())
            {
                self.start_tag();
            } else {
                self.text();
            }
        }
    }

    fn current(&self) -> NodeId {
        self.open.last().copied().unwrap_or_else(|| self.doc.root())
    }

    fn append(&mut self, child: NodeId) {
        let parent = self.current();
        self.doc.link(parent, child, None);
    }

    fn skip_past(&mut self, c: char) {
        match self.src[self.pos..].find(c) {
            Some(i) => self.pos += i + 1,
            None => self.pos = self.src.len(),
        }
    }

    fn text(&mut self) {
        let rest = &self.src[self.pos..];
        // A lone `<` that does not open markup is literal text.
        let skip = usize::from(rest.starts_with('<'));
        let len = rest[skip..].find('<').map_or(rest.len(), |i| i + skip);
        let text = decode_entities(&rest[..len]);
        self.pos += len;
        let node = self.doc.create_text(&text);
        self.append(node);
    }

    fn comment(&mut self) {
        let body_start = self.pos + 4;
        let (body, next) = match self.src[body_start..].find("-->") {
            Some(i) => (&self.src[body_start..body_start + i], body_start + i + 3),
            None => (&self.src[body_start..], self.src.len()),
        };
        let node = self.doc.create_comment(body);
        self.pos = next;
        self.append(node);
    }

    fn end_tag(&mut self) {
        self.pos += 2;
        let name = self.name().to_ascii_lowercase();
        self.skip_past('>');
        let found = self
            .open
            .iter()
            .skip(1)
            .rposition(|&n| self.doc.tag_name(n) == Some(name.as_str()));
        if let Some(i) = found {
            self.open.truncate(i + 1);
        }
    }

    fn start_tag(&mut self) {
        self.pos += 1;
        let tag = self.name().to_ascii_lowercase();
        let element = self.doc.create_element(&tag);
        let mut self_closing = false;
        loop {
            self.skip_ws();
            let rest = &self.src[self.pos..];
            if rest.is_empty() {
                break;
            }
            if rest.starts_with('>') {
                self.pos += 1;
                break;
            }
            if rest.starts_with("/>") {
                self.pos += 2;
                self_closing = true;
                break;
            }
            if rest.starts_with('/') {
                self.pos += 1;
                continue;
            }
            self.attribute(element);
        }
        self.append(element);
        if is_raw_text(&tag) {
            if !self_closing {
                self.raw_text(element, &tag);
            }
        } else if !self_closing && !is_void(&tag) {
            self.open.push(element);
        }
    }

    fn attribute(&mut self, element: NodeId) {
        let name = self.name();
        if name.is_empty() {
            // Not a usable name character; drop it.
            self.pos += self.src[self.pos..].chars().next().map_or(1, char::len_utf8);
            return;
        }
        self.skip_ws();
        let mut value = String::new();
        if self.src[self.pos..].starts_with('=') {
            self.pos += 1;
            self.skip_ws();
            let rest = &self.src[self.pos..];
            let raw = match rest.chars().next() {
                Some(q @ ('"' | '\'')) => {
                    let body = &rest[1..];
                    let len = body.find(q).unwrap_or(body.len());
                    self.pos += 1 + len + usize::from(len < body.len());
                    &body[..len]
                }
                _ => {
                    let len = rest
                        .find(|c: char| c.is_ascii_whitespace() || c == '>')
                        .unwrap_or(rest.len());
                    self.pos += len;
                    &rest[..len]
                }
            };
            value = decode_entities(raw);
        }
        // Duplicate attributes keep the first value.
        if let Ok(el) = self.doc.element_mut(element)
            && el.attribute(name).is_none()
        {
            el.set_attribute(name, &value);
        }
    }

    fn raw_text(&mut self, element: NodeId, tag: &str) {
        let rest = &self.src[self.pos..];
        let close = find_ascii_case_insensitive(rest, "</", tag).unwrap_or(rest.len());
        if close > 0 {
            let node = self.doc.create_text(&rest[..close]);
            self.doc.link(element, node, None);
        }
        self.pos += close;
        if self.pos < self.src.len() {
            self.skip_past('>');
        }
    }

    fn name(&mut self) -> &'a str {
        let src = self.src;
        let rest = &src[self.pos..];
        let len = rest
            .find(|c: char| c.is_ascii_whitespace() || matches!(c, '>' | '/' | '='))
            .unwrap_or(rest.len());
        self.pos += len;
        &rest[..len]
    }

    fn skip_ws(&mut self) {
        let rest = &self.src[self.pos..];
        self.pos += rest.len() - rest.trim_start_matches(|c: char| c.is_ascii_whitespace()).len();
    }
}

/// Byte offset of `prefix` immediately followed by `name` (ASCII case-insensitive).
fn find_ascii_case_insensitive(haystack: &str, prefix: &str, name: &str) -> Option<usize> {
    let needle_len = prefix.len() + name.len();
    let bytes = haystack.as_bytes();
    (0..bytes.len().saturating_sub(needle_len - 1)).find(|&i| {
        bytes[i..].starts_with(prefix.as_bytes())
            && bytes[i + prefix.len()..i + needle_len].eq_ignore_ascii_case(name.as_bytes())
    })
}

/// Parse `html` into detached top-level nodes.
///
/// The nodes are created under a temporary container which is then
/// destroyed; callers that parse repeatedly should use
/// [`FragmentScratch`](crate::FragmentScratch) instead.
pub fn parse_fragment(doc: &mut Document, html: &str) -> Vec<NodeId> {
    let container = doc.create_element("template");
    doc.parse_fragment_into(container, html);
    let nodes: Vec<NodeId> = doc.child_nodes(container).to_vec();
    for &n in &nodes {
        doc.detach(n);
    }
    doc.destroy(container);
    nodes
}
