// Copyright 2025 the Widjet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.

use alloc::string::String;

use thiserror::Error;
use widjet_dom::SelectorError;

/// A listener failed while handling an event.
///
/// Returned by native listeners and collected into
/// [`DispatchOutcome::errors`](crate::DispatchOutcome::errors); a failing
/// listener never stops delivery to the others.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ListenerError {
    /// A delegated listener's selector did not parse.
    #[error("invalid delegation selector {selector:?}")]
    Selector {
        /// The selector source text.
        selector: String,
        /// The parse failure.
        #[source]
        source: SelectorError,
    },
    /// The listener reported a failure of its own.
    #[error("listener failed: {0}")]
    Failed(String),
}

impl ListenerError {
    /// Build a [`ListenerError::Failed`] from a message.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

/// Probing the host's event constructor failed.
///
/// Only ever seen by [`EventHost`](crate::construct::EventHost)
/// implementations; strategy selection catches it and falls back.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("event constructor unavailable: {0}")]
pub struct ProbeError(pub String);

impl ProbeError {
    /// Build a probe error from a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}
