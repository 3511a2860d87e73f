// Copyright 2025 the Widjet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Selector-scoped event delegation.
//!
//! A delegated listener is one native listener on a root node. For each
//! event that reaches the root, it walks the event target and its ancestors
//! (target first, up to and including `<html>`) and calls the callback once
//! for every candidate that matches the selector.
//!
//! Several delegated listeners on the same root see consistent stop
//! semantics through the [`DelegationState`](crate::DelegationState) kept on
//! the event:
//!
//! - [`DelegatedEvent::stop_propagation`] makes every later delegated
//!   listener for this dispatch return without doing anything.
//! - [`DelegatedEvent::stop_immediate_propagation`] also ends the current
//!   candidate walk, so no further candidate is tested.
//!
//! Both forward to the native stop methods as well, so native listeners on
//! ancestors of the root stop receiving the event.
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use widjet_dom::Document;
//! use widjet_events::{Event, EventFlags, Listeners};
//!
//! let mut doc = Document::new();
//! let body = doc.body();
//! doc.set_inner_html(body, r#"<ul id="menu"><li class="item"><b>one</b></li></ul>"#).unwrap();
//! let menu = doc.first_element_child(body).unwrap();
//! let bold = doc.query_selector(menu, &"b".parse().unwrap()).unwrap();
//!
//! let listeners = Listeners::new();
//! let hits = Rc::new(RefCell::new(Vec::new()));
//! let sink = hits.clone();
//! let sub = listeners.delegate_matching(menu, "click", ".item", move |ev| {
//!     sink.borrow_mut().push(ev.matched_target());
//! });
//!
//! let mut click = Event::new("click", EventFlags::default());
//! listeners.dispatch(&doc, bold, &mut click);
//! let item = doc.parent(bold).unwrap();
//! assert_eq!(*hits.borrow(), [item]);
//! assert_eq!(click.delegation.matched_target, Some(item));
//! sub.dispose();
//! ```

use alloc::string::String;
use core::cell::OnceCell;

use smallvec::SmallVec;
use tracing::{debug, trace};
use widjet_dom::{Document, NodeId, Selector, SelectorError, traverse};

use crate::error::ListenerError;
use crate::listeners::{ListenerOptions, Listeners, Subscription};
use crate::types::{Event, EventData};

/// The view of an event handed to a delegated callback.
///
/// Wraps the native event together with the document and the candidate that
/// matched. Its stop methods record the stop in the event's delegation state
/// and then forward to the native methods.
#[derive(Debug)]
pub struct DelegatedEvent<'a> {
    event: &'a mut Event,
    document: &'a Document,
    matched: NodeId,
}

impl<'a> DelegatedEvent<'a> {
    /// The candidate that matched the selector.
    pub fn matched_target(&self) -> NodeId {
        self.matched
    }

    /// The node the event was dispatched to.
    pub fn target(&self) -> Option<NodeId> {
        self.event.target()
    }

    /// The document being dispatched in.
    pub fn document(&self) -> &'a Document {
        self.document
    }

    /// The event type.
    pub fn event_type(&self) -> &str {
        self.event.event_type()
    }

    /// The event payload, if any.
    pub fn data(&self) -> Option<&EventData> {
        self.event.data()
    }

    /// The underlying event.
    pub fn event(&self) -> &Event {
        &*self.event
    }

    /// The underlying event, mutably.
    pub fn event_mut(&mut self) -> &mut Event {
        &mut *self.event
    }

    /// See [`Event::prevent_default`].
    pub fn prevent_default(&mut self) {
        self.event.prevent_default();
    }

    /// Stop later delegated listeners for this dispatch, then stop native
    /// propagation.
    pub fn stop_propagation(&mut self) {
        self.event.delegation.propagation_stopped = true;
        self.event.stop_propagation();
    }

    /// End the candidate walk at once, then stop native propagation
    /// immediately.
    pub fn stop_immediate_propagation(&mut self) {
        self.event.delegation.immediate_propagation_stopped = true;
        self.event.stop_immediate_propagation();
    }
}

enum Scope {
    Parsed(Selector),
    Lazy {
        source: String,
        parsed: OnceCell<Result<Selector, SelectorError>>,
    },
}

impl Scope {
    fn selector(&self) -> Result<&Selector, ListenerError> {
        match self {
            Self::Parsed(selector) => Ok(selector),
            Self::Lazy { source, parsed } => parsed
                .get_or_init(|| Selector::parse(source))
                .as_ref()
                .map_err(|e| ListenerError::Selector {
                    selector: source.clone(),
                    source: e.clone(),
                }),
        }
    }
}

impl Listeners {
    /// Delegate `event_type` events under `root` to `callback`, for every
    /// element among the target and its ancestors.
    pub fn delegate<F>(&self, root: NodeId, event_type: &str, callback: F) -> Subscription
    where
        F: Fn(&mut DelegatedEvent<'_>) + 'static,
    {
        self.attach_delegate(root, event_type, Scope::Parsed(Selector::universal()), callback)
    }

    /// Delegate `event_type` events under `root` to `callback`, for every
    /// candidate matching `selector`.
    ///
    /// The selector is parsed when it is first needed. A selector that fails
    /// to parse is reported as [`ListenerError::Selector`] in every
    /// [`DispatchOutcome`](crate::DispatchOutcome) that reaches the root.
    pub fn delegate_matching<F>(
        &self,
        root: NodeId,
        event_type: &str,
        selector: &str,
        callback: F,
    ) -> Subscription
    where
        F: Fn(&mut DelegatedEvent<'_>) + 'static,
    {
        let scope = Scope::Lazy {
            source: selector.into(),
            parsed: OnceCell::new(),
        };
        self.attach_delegate(root, event_type, scope, callback)
    }

    /// Like [`Listeners::delegate_matching`] with an already parsed selector.
    pub fn delegate_selector<F>(
        &self,
        root: NodeId,
        event_type: &str,
        selector: Selector,
        callback: F,
    ) -> Subscription
    where
        F: Fn(&mut DelegatedEvent<'_>) + 'static,
    {
        self.attach_delegate(root, event_type, Scope::Parsed(selector), callback)
    }

    fn attach_delegate<F>(
        &self,
        root: NodeId,
        event_type: &str,
        scope: Scope,
        callback: F,
    ) -> Subscription
    where
        F: Fn(&mut DelegatedEvent<'_>) + 'static,
    {
        self.add(
            root,
            event_type,
            ListenerOptions::BUBBLE,
            move |doc: &Document, event: &mut Event| {
                if event.delegation.propagation_stopped {
                    debug!(
                        event_type = event.event_type(),
                        "delegation already stopped"
                    );
                    return Ok(());
                }
                let selector = scope.selector()?;
                let Some(target) = event.target() else {
                    return Ok(());
                };
                let candidates: SmallVec<[NodeId; 16]> = core::iter::once(target)
                    .chain(traverse::ancestors(doc, target))
                    .collect();
                trace!(
                    event_type = event.event_type(),
                    candidates = candidates.len(),
                    "delegated dispatch"
                );
                for node in candidates {
                    if event.delegation.immediate_propagation_stopped {
                        break;
                    }
                    if !selector.matches(doc, node) {
                        continue;
                    }
                    event.delegation.matched_target = Some(node);
                    callback(&mut DelegatedEvent {
                        event: &mut *event,
                        document: doc,
                        matched: node,
                    });
                }
                Ok(())
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EventFlags;
    use alloc::rc::Rc;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    #[test]
    fn text_targets_walk_to_their_element_ancestors() {
        let mut doc = Document::new();
        let p = doc.create_element("p");
        let text = doc.create_text("hello");
        doc.append_child(doc.body(), p).unwrap();
        doc.append_child(p, text).unwrap();

        let listeners = Listeners::new();
        let hits: Rc<RefCell<Vec<NodeId>>> = Rc::default();
        let sink = hits.clone();
        listeners.delegate(doc.root(), "click", move |ev| {
            sink.borrow_mut().push(ev.matched_target());
        });
        let mut ev = Event::new("click", EventFlags::default());
        listeners.dispatch(&doc, text, &mut ev);
        assert_eq!(
            *hits.borrow(),
            [p, doc.body(), doc.document_element()]
        );
    }

    #[test]
    fn invalid_selector_surfaces_at_dispatch_not_attach() {
        let mut doc = Document::new();
        let a = doc.create_element("a");
        doc.append_child(doc.body(), a).unwrap();

        let listeners = Listeners::new();
        let calls = Rc::new(RefCell::new(0));
        let c = calls.clone();
        listeners.delegate_matching(doc.body(), "click", "a[", move |_| {
            *c.borrow_mut() += 1;
        });
        let mut ev = Event::new("click", EventFlags::default());
        let outcome = listeners.dispatch(&doc, a, &mut ev);
        assert_eq!(*calls.borrow(), 0);
        assert!(matches!(
            outcome.errors.as_slice(),
            [ListenerError::Selector { selector, .. }] if selector == "a["
        ));
    }

    #[test]
    fn candidates_above_the_root_are_considered() {
        let mut doc = Document::new();
        let section = doc.create_element("section");
        let button = doc.create_element("button");
        doc.set_attribute(section, "class", "panel").unwrap();
        doc.append_child(doc.body(), section).unwrap();
        doc.append_child(section, button).unwrap();

        let listeners = Listeners::new();
        let hits: Rc<RefCell<Vec<NodeId>>> = Rc::default();
        let sink = hits.clone();
        // Listener on the button itself; the candidate walk still reaches
        // ancestors of the root.
        listeners.delegate_matching(button, "click", ".panel", move |ev| {
            sink.borrow_mut().push(ev.matched_target());
        });
        let mut ev = Event::new("click", EventFlags::default());
        listeners.dispatch(&doc, button, &mut ev);
        assert_eq!(*hits.borrow(), [section]);
    }

    #[test]
    fn stop_propagation_also_stops_native_bubbling() {
        let mut doc = Document::new();
        let div = doc.create_element("div");
        doc.append_child(doc.body(), div).unwrap();

        let listeners = Listeners::new();
        let body_calls = Rc::new(RefCell::new(0));
        let c = body_calls.clone();
        listeners.add(doc.body(), "click", ListenerOptions::BUBBLE, move |_, _| {
            *c.borrow_mut() += 1;
            Ok(())
        });
        listeners.delegate(div, "click", |ev| ev.stop_propagation());
        let mut ev = Event::new("click", EventFlags::default());
        listeners.dispatch(&doc, div, &mut ev);
        assert_eq!(*body_calls.borrow(), 0);
        assert!(ev.delegation.propagation_stopped);
        assert!(ev.propagation_stopped());
    }
}
