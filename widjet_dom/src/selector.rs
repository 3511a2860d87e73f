// Copyright 2025 the Widjet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! CSS selector parsing and element matching.
//!
//! ## Supported syntax
//!
//! - Selector lists: `a, b`.
//! - Compound selectors: type (`div`), universal (`*`), `#id`, `.class`,
//!   attribute selectors (`[attr]`, `[attr=v]`, `~=`, `|=`, `^=`, `$=`, `*=`).
//! - Combinators: descendant (whitespace), child (`>`), next sibling (`+`),
//!   subsequent sibling (`~`).
//! - Pseudo-classes: `:first-child`, `:last-child`, `:only-child`, `:root`,
//!   `:empty`, and `:not(<compound>)`.
//!
//! Matching follows the usual right-to-left strategy: the rightmost compound
//! must match the element, then each combinator walks parents or preceding
//! siblings looking for the next compound to the left.
//!
//! ```
//! use widjet_dom::{Document, Selector};
//!
//! let mut doc = Document::new();
//! let list = doc.create_element("ul");
//! let item = doc.create_element("li");
//! doc.set_attribute(item, "class", "active").unwrap();
//! doc.append_child(list, item).unwrap();
//! doc.append_child(doc.body(), list).unwrap();
//!
//! let selector: Selector = "ul > li.active:first-child".parse().unwrap();
//! assert!(doc.matches(item, &selector));
//! assert!(!doc.matches(list, &selector));
//! ```

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::str::FromStr;

use smallvec::SmallVec;

use crate::document::Document;
use crate::error::{SelectorError, SelectorErrorKind};
use crate::types::{ElementData, NodeId, NodeKind};

/// Bucketed selector specificity: `(ids, classes, types)`.
///
/// The fields are ordered highest-weight-first so that derived `Ord`
/// gives CSS-like lexicographic ordering: id count outranks class count
/// (classes, attribute selectors, and pseudo-classes), which outranks type
/// selectors.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Specificity(pub u32, pub u32, pub u32);

impl core::ops::Add for Specificity {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0, self.1 + rhs.1, self.2 + rhs.2)
    }
}

/// How two compound selectors relate.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Combinator {
    /// `a b`: `b` has an ancestor matching `a`.
    Descendant,
    /// `a > b`: `b`'s parent matches `a`.
    Child,
    /// `a + b`: `b`'s previous element sibling matches `a`.
    NextSibling,
    /// `a ~ b`: some preceding element sibling of `b` matches `a`.
    SubsequentSibling,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum AttrOp {
    Exists,
    Equals,
    Includes,
    DashMatch,
    Prefix,
    Suffix,
    Substring,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct AttrSelector {
    name: String,
    op: AttrOp,
    value: String,
}

impl AttrSelector {
    fn matches(&self, el: &ElementData) -> bool {
        let Some(actual) = el.attribute(&self.name) else {
            return false;
        };
        let v = self.value.as_str();
        match self.op {
            AttrOp::Exists => true,
            AttrOp::Equals => actual == v,
            AttrOp::Includes => !v.is_empty() && actual.split_ascii_whitespace().any(|t| t == v),
            AttrOp::DashMatch => {
                actual == v || (actual.starts_with(v) && actual[v.len()..].starts_with('-'))
            }
            AttrOp::Prefix => !v.is_empty() && actual.starts_with(v),
            AttrOp::Suffix => !v.is_empty() && actual.ends_with(v),
            AttrOp::Substring => !v.is_empty() && actual.contains(v),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum PseudoClass {
    FirstChild,
    LastChild,
    OnlyChild,
    Root,
    Empty,
    Not(Box<Compound>),
}

/// A sequence of simple selectors that all apply to one element.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct Compound {
    /// `None` is the (implicit or explicit) universal selector.
    tag: Option<String>,
    ids: Vec<String>,
    classes: Vec<String>,
    attrs: Vec<AttrSelector>,
    pseudos: Vec<PseudoClass>,
}

impl Compound {
    fn matches(&self, doc: &Document, node: NodeId) -> bool {
        let Some(el) = doc.element(node) else {
            return false;
        };
        if let Some(tag) = &self.tag
            && !el.tag().eq_ignore_ascii_case(tag)
        {
            return false;
        }
        self.ids.iter().all(|id| el.id() == Some(id.as_str()))
            && self.classes.iter().all(|c| el.has_class(c))
            && self.attrs.iter().all(|a| a.matches(el))
            && self.pseudos.iter().all(|p| match p {
                PseudoClass::FirstChild => doc.previous_element_sibling(node).is_none(),
                PseudoClass::LastChild => doc.next_element_sibling(node).is_none(),
                PseudoClass::OnlyChild => {
                    doc.previous_element_sibling(node).is_none()
                        && doc.next_element_sibling(node).is_none()
                }
                PseudoClass::Root => doc.parent(node) == Some(doc.root()),
                PseudoClass::Empty => doc
                    .child_nodes(node)
                    .iter()
                    .all(|&c| matches!(doc.kind(c), Some(NodeKind::Comment(_)))),
                PseudoClass::Not(inner) => !inner.matches(doc, node),
            })
    }

    fn specificity(&self) -> Specificity {
        let count = |n: usize| u32::try_from(n).unwrap_or(u32::MAX);
        let mut spec = Specificity(
            count(self.ids.len()),
            count(self.classes.len() + self.attrs.len()),
            u32::from(self.tag.is_some()),
        );
        for p in &self.pseudos {
            spec = spec
                + match p {
                    PseudoClass::Not(inner) => inner.specificity(),
                    _ => Specificity(0, 1, 0),
                };
        }
        spec
    }

    fn is_universal(&self) -> bool {
        self.tag.is_none()
            && self.ids.is_empty()
            && self.classes.is_empty()
            && self.attrs.is_empty()
            && self.pseudos.is_empty()
    }
}

/// Compounds joined by combinators; `combinators[i]` sits between
/// `compounds[i]` and `compounds[i + 1]`.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Complex {
    compounds: SmallVec<[Compound; 2]>,
    combinators: SmallVec<[Combinator; 2]>,
}

impl Complex {
    fn matches(&self, doc: &Document, node: NodeId) -> bool {
        self.match_from(doc, node, self.compounds.len() - 1)
    }

    fn match_from(&self, doc: &Document, node: NodeId, i: usize) -> bool {
        if !self.compounds[i].matches(doc, node) {
            return false;
        }
        if i == 0 {
            return true;
        }
        match self.combinators[i - 1] {
            Combinator::Child => doc
                .parent_element(node)
                .is_some_and(|p| self.match_from(doc, p, i - 1)),
            Combinator::Descendant => {
                let mut cur = doc.parent_element(node);
                while let Some(p) = cur {
                    if self.match_from(doc, p, i - 1) {
                        return true;
                    }
                    cur = doc.parent_element(p);
                }
                false
            }
            Combinator::NextSibling => doc
                .previous_element_sibling(node)
                .is_some_and(|s| self.match_from(doc, s, i - 1)),
            Combinator::SubsequentSibling => {
                let mut cur = doc.previous_element_sibling(node);
                while let Some(s) = cur {
                    if self.match_from(doc, s, i - 1) {
                        return true;
                    }
                    cur = doc.previous_element_sibling(s);
                }
                false
            }
        }
    }

    fn specificity(&self) -> Specificity {
        self.compounds
            .iter()
            .fold(Specificity::default(), |acc, c| acc + c.specificity())
    }
}

/// A parsed selector list.
///
/// Parse with [`Selector::parse`] or [`str::parse`]; the universal selector
/// is available without parsing via [`Selector::universal`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selector {
    source: String,
    list: SmallVec<[Complex; 1]>,
}

impl Default for Selector {
    fn default() -> Self {
        Self::universal()
    }
}

impl Selector {
    /// The universal selector `*`, matching every element.
    pub fn universal() -> Self {
        let mut compounds = SmallVec::new();
        compounds.push(Compound::default());
        let mut list = SmallVec::new();
        list.push(Complex {
            compounds,
            combinators: SmallVec::new(),
        });
        Self {
            source: "*".into(),
            list,
        }
    }

    /// Parse a selector list.
    pub fn parse(source: &str) -> Result<Self, SelectorError> {
        let list = Parser {
            src: source,
            pos: 0,
            depth: 0,
        }
        .parse_list()?;
        Ok(Self {
            source: source.into(),
            list,
        })
    }

    /// The source text this selector was parsed from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns `true` if every element matches this selector.
    pub fn is_universal(&self) -> bool {
        self.list
            .iter()
            .any(|c| c.compounds.len() == 1 && c.compounds[0].is_universal())
    }

    /// Highest specificity among the entries of the list.
    pub fn specificity(&self) -> Specificity {
        self.list
            .iter()
            .map(Complex::specificity)
            .max()
            .unwrap_or_default()
    }

    /// Returns `true` if `node` is an element matching any entry of the list.
    pub fn matches(&self, doc: &Document, node: NodeId) -> bool {
        doc.is_element(node) && self.list.iter().any(|c| c.matches(doc, node))
    }
}

impl FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// How deeply `:not()` may nest.
const MAX_NESTING: usize = 32;

struct Parser<'a> {
    src: &'a str,
    pos: usize,
    /// Open `:not(` groups.
    depth: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn skip_ws(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_whitespace()) {
            self.pos += 1;
        }
        self.pos != start
    }

    fn error(&self, kind: SelectorErrorKind) -> SelectorError {
        SelectorError {
            kind,
            position: self.pos,
        }
    }

    fn unexpected(&self) -> SelectorError {
        match self.peek() {
            Some(c) => self.error(SelectorErrorKind::UnexpectedChar(c)),
            None => self.error(SelectorErrorKind::UnexpectedEnd),
        }
    }

    fn parse_list(&mut self) -> Result<SmallVec<[Complex; 1]>, SelectorError> {
        let mut list = SmallVec::new();
        loop {
            self.skip_ws();
            list.push(self.parse_complex()?);
            self.skip_ws();
            match self.peek() {
                None => return Ok(list),
                Some(',') => {
                    self.pos += 1;
                }
                Some(c) => return Err(self.error(SelectorErrorKind::UnexpectedChar(c))),
            }
        }
    }

    fn parse_complex(&mut self) -> Result<Complex, SelectorError> {
        let mut compounds = SmallVec::new();
        let mut combinators = SmallVec::new();
        match self.parse_compound()? {
            Some(first) => compounds.push(first),
            None if matches!(self.peek(), None | Some(',')) => {
                return Err(self.error(SelectorErrorKind::Empty));
            }
            None => return Err(self.unexpected()),
        }
        loop {
            let had_ws = self.skip_ws();
            let combinator = match self.peek() {
                None | Some(',') => break,
                Some('>') => Combinator::Child,
                Some('+') => Combinator::NextSibling,
                Some('~') => Combinator::SubsequentSibling,
                Some(_) if had_ws => Combinator::Descendant,
                Some(_) => return Err(self.unexpected()),
            };
            if combinator != Combinator::Descendant {
                self.pos += 1;
                self.skip_ws();
            }
            match self.parse_compound()? {
                Some(next) => compounds.push(next),
                None if matches!(self.peek(), None | Some(',')) => {
                    return Err(self.error(SelectorErrorKind::DanglingCombinator));
                }
                None => return Err(self.unexpected()),
            }
            combinators.push(combinator);
        }
        Ok(Complex {
            compounds,
            combinators,
        })
    }

    fn parse_compound(&mut self) -> Result<Option<Compound>, SelectorError> {
        let start = self.pos;
        let mut compound = Compound::default();
        if self.eat('*') {
            // Explicit universal; leaves `tag` unset.
        } else if self.at_ident_start() {
            compound.tag = Some(self.parse_ident()?.to_ascii_lowercase());
        }
        loop {
            match self.peek() {
                Some('#') => {
                    self.pos += 1;
                    compound.ids.push(self.parse_ident()?);
                }
                Some('.') => {
                    self.pos += 1;
                    compound.classes.push(self.parse_ident()?);
                }
                Some('[') => {
                    self.pos += 1;
                    compound.attrs.push(self.parse_attr()?);
                }
                Some(':') => {
                    self.pos += 1;
                    compound.pseudos.push(self.parse_pseudo()?);
                }
                _ => break,
            }
        }
        Ok((self.pos != start).then_some(compound))
    }

    fn parse_attr(&mut self) -> Result<AttrSelector, SelectorError> {
        self.skip_ws();
        let name = self.parse_ident()?.to_ascii_lowercase();
        self.skip_ws();
        let op = match self.peek() {
            Some(']') => {
                self.pos += 1;
                return Ok(AttrSelector {
                    name,
                    op: AttrOp::Exists,
                    value: String::new(),
                });
            }
            Some('=') => AttrOp::Equals,
            Some('~') => AttrOp::Includes,
            Some('|') => AttrOp::DashMatch,
            Some('^') => AttrOp::Prefix,
            Some('$') => AttrOp::Suffix,
            Some('*') => AttrOp::Substring,
            _ => return Err(self.unexpected()),
        };
        self.pos += 1;
        if op != AttrOp::Equals && !self.eat('=') {
            return Err(self.unexpected());
        }
        self.skip_ws();
        let value = match self.peek() {
            Some(q @ ('"' | '\'')) => {
                self.pos += 1;
                self.parse_quoted(q)?
            }
            _ => self.parse_ident()?,
        };
        self.skip_ws();
        if !self.eat(']') {
            return Err(self.unexpected());
        }
        Ok(AttrSelector { name, op, value })
    }

    fn parse_pseudo(&mut self) -> Result<PseudoClass, SelectorError> {
        let at = self.pos;
        let name = self.parse_ident()?.to_ascii_lowercase();
        let pseudo = match name.as_str() {
            "first-child" => PseudoClass::FirstChild,
            "last-child" => PseudoClass::LastChild,
            "only-child" => PseudoClass::OnlyChild,
            "root" => PseudoClass::Root,
            "empty" => PseudoClass::Empty,
            "not" => {
                if !self.eat('(') {
                    return Err(self.unexpected());
                }
                if self.depth == MAX_NESTING {
                    return Err(SelectorError {
                        kind: SelectorErrorKind::TooDeep,
                        position: at,
                    });
                }
                self.skip_ws();
                self.depth += 1;
                let inner = self.parse_compound();
                self.depth -= 1;
                let Some(inner) = inner? else {
                    return Err(self.unexpected());
                };
                self.skip_ws();
                if !self.eat(')') {
                    return Err(self.unexpected());
                }
                PseudoClass::Not(Box::new(inner))
            }
            _ => {
                return Err(SelectorError {
                    kind: SelectorErrorKind::UnknownPseudoClass(name),
                    position: at,
                });
            }
        };
        Ok(pseudo)
    }

    fn parse_quoted(&mut self, quote: char) -> Result<String, SelectorError> {
        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(self.error(SelectorErrorKind::UnexpectedEnd)),
                Some(c) if c == quote => return Ok(out),
                Some('\\') => match self.bump() {
                    Some(c) => out.push(c),
                    None => return Err(self.error(SelectorErrorKind::UnexpectedEnd)),
                },
                Some(c) => out.push(c),
            }
        }
    }

    fn at_ident_start(&self) -> bool {
        let rest = &self.src[self.pos..];
        let mut chars = rest.chars();
        match chars.next() {
            Some('-') => matches!(chars.next(), Some(c) if is_name_start(c) || c == '-' || c == '\\'),
            Some('\\') => true,
            Some(c) => is_name_start(c),
            None => false,
        }
    }

    fn parse_ident(&mut self) -> Result<String, SelectorError> {
        if !self.at_ident_start() {
            return Err(self.unexpected());
        }
        let mut out = String::new();
        while let Some(c) = self.peek() {
            if c == '\\' {
                self.pos += 1;
                match self.bump() {
                    Some(escaped) => out.push(escaped),
                    None => return Err(self.error(SelectorErrorKind::UnexpectedEnd)),
                }
            } else if is_name_start(c) || c.is_ascii_digit() || c == '-' {
                self.pos += c.len_utf8();
                out.push(c);
            } else {
                break;
            }
        }
        Ok(out)
    }
}

fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}
