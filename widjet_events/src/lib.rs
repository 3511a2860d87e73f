// Copyright 2025 the Widjet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Widjet Events: delegated event listeners over a [`widjet_dom`] document.
//!
//! The crate has three layers:
//!
//! - [`Event`] and [`Listeners`]: a native event system with capture, target,
//!   and bubble phases, `once` listeners, and [`Subscription`] handles whose
//!   [`dispose`](Subscription::dispose) may be called any number of times.
//! - Delegation: [`Listeners::delegate`] and [`Listeners::delegate_matching`]
//!   attach one listener to a root that fires a callback for every node
//!   among the event target and its ancestors matching a CSS selector. The
//!   callback receives a [`DelegatedEvent`] whose stop methods are honored by
//!   all delegated listeners on the same root.
//! - [`construct`]: building events through a strategy picked once by
//!   probing an [`EventHost`](construct::EventHost).
//!
//! ## Example
//!
//! ```rust
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use widjet_dom::Document;
//! use widjet_events::construct::{dom_event, EventInit};
//! use widjet_events::Listeners;
//!
//! let mut doc = Document::new();
//! let body = doc.body();
//! doc.set_inner_html(body, r#"<div class="card"><button class="close">x</button></div>"#)
//!     .unwrap();
//! let button = doc.query_selector(body, &".close".parse().unwrap()).unwrap();
//!
//! let listeners = Listeners::new();
//! let closed = Rc::new(Cell::new(0));
//!
//! // The narrower listener is registered first and stops delegation, so
//! // the broader `.card` listener on the same root never runs.
//! let c = closed.clone();
//! let close = listeners.delegate_matching(body, "click", ".close", move |ev| {
//!     c.set(c.get() + 1);
//!     ev.stop_propagation();
//! });
//! let card = listeners.delegate_matching(body, "click", ".card", |_| {
//!     panic!("stopped by .close");
//! });
//!
//! let mut click = dom_event("click", None, EventInit::default());
//! let outcome = listeners.dispatch(&doc, button, &mut click);
//! assert!(outcome.errors.is_empty());
//! assert_eq!(closed.get(), 1);
//!
//! close.dispose();
//! card.dispose();
//! card.dispose();
//! ```
//!
//! ## Logging
//!
//! Dispatch emits [`tracing`] events: `trace` per dispatch, `debug` for
//! delegation short-circuits and strategy selection, and `warn` for listener
//! failures. No subscriber is installed.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod construct;
mod delegate;
mod error;
mod listeners;
mod types;

pub use delegate::DelegatedEvent;
pub use error::{ListenerError, ProbeError};
pub use listeners::{DispatchOutcome, ListenerFn, ListenerOptions, Listeners, Subscription};
pub use types::{DelegationState, Event, EventData, EventFlags, Phase};
