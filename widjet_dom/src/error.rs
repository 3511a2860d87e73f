// Copyright 2025 the Widjet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types for tree mutation and selector parsing.

use alloc::string::String;

use thiserror::Error;

use crate::types::NodeId;

/// Errors raised by structural [`Document`](crate::Document) mutations.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomError {
    /// The node id does not refer to a live node.
    #[error("node {0:?} is not alive in this document")]
    StaleNode(NodeId),
    /// Inserting `child` under `parent` would create a cycle, or `parent`
    /// cannot hold children.
    #[error("cannot insert {child:?} under {parent:?}")]
    HierarchyRequest {
        /// The would-be parent.
        parent: NodeId,
        /// The node being inserted.
        child: NodeId,
    },
    /// The node is not a child of the given parent.
    #[error("{child:?} is not a child of {parent:?}")]
    NotAChild {
        /// The expected parent.
        parent: NodeId,
        /// The node that was expected to be a child.
        child: NodeId,
    },
    /// The node is not an element.
    #[error("node {0:?} is not an element")]
    NotAnElement(NodeId),
}

/// What went wrong while parsing a selector.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectorErrorKind {
    /// The selector (or one entry of a selector list) is empty.
    Empty,
    /// A character that cannot start or continue a selector.
    UnexpectedChar(char),
    /// Input ended in the middle of a construct.
    UnexpectedEnd,
    /// A combinator with nothing to its right.
    DanglingCombinator,
    /// A pseudo-class this engine does not know.
    UnknownPseudoClass(String),
    /// `:not()` groups nested too deeply.
    TooDeep,
}

/// A selector failed to parse.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{kind} at byte {position}")]
pub struct SelectorError {
    /// The failure.
    pub kind: SelectorErrorKind,
    /// Byte offset into the selector source.
    pub position: usize,
}

impl core::fmt::Display for SelectorErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Empty => f.write_str("empty selector"),
            Self::UnexpectedChar(c) => write!(f, "unexpected character {c:?}"),
            Self::UnexpectedEnd => f.write_str("unexpected end of selector"),
            Self::DanglingCombinator => f.write_str("combinator without a right-hand side"),
            Self::UnknownPseudoClass(name) => write!(f, "unknown pseudo-class `:{name}`"),
            Self::TooDeep => f.write_str("`:not()` nested too deeply"),
        }
    }
}
