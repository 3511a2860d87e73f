// Copyright 2025 the Widjet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Native listener registry and capture/target/bubble dispatch.
//!
//! [`Listeners`] stores listeners per `(node, event type)` and delivers an
//! [`Event`] along the path from the document node down to the target and
//! back up again:
//!
//! - Capture: capture listeners on each ancestor, root first.
//! - Target: capture listeners on the target, then the others.
//! - Bubble: non-capture listeners on each ancestor, parent first, only if
//!   the event bubbles.
//!
//! [`Event::stop_propagation`] finishes the current node and then stops.
//! [`Event::stop_immediate_propagation`] stops at once. Listeners on one node
//! run in registration order; the set of listeners for a node is captured
//! when the dispatch reaches that node, so listeners added during dispatch
//! wait for the next one, while listeners disposed during dispatch do not run.
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use widjet_dom::Document;
//! use widjet_events::{Event, EventFlags, ListenerOptions, Listeners, Phase};
//!
//! let mut doc = Document::new();
//! let button = doc.create_element("button");
//! doc.append_child(doc.body(), button).unwrap();
//!
//! let listeners = Listeners::new();
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! for (node, capture) in [(doc.body(), true), (button, false), (doc.body(), false)] {
//!     let seen = seen.clone();
//!     listeners.add(node, "click", ListenerOptions { capture, once: false }, move |_, ev| {
//!         seen.borrow_mut().push(ev.phase());
//!         Ok(())
//!     });
//! }
//!
//! let mut click = Event::new("click", EventFlags::default());
//! let outcome = listeners.dispatch(&doc, button, &mut click);
//! assert!(outcome.errors.is_empty());
//! assert_eq!(*seen.borrow(), [Phase::Capture, Phase::Target, Phase::Bubble]);
//! ```

use alloc::rc::{Rc, Weak};
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};

use hashbrown::HashMap;
use smallvec::SmallVec;
use tracing::{debug, trace, warn};
use widjet_dom::{Document, NodeId};

use crate::error::ListenerError;
use crate::types::{Event, Phase};

/// Signature of a native listener.
pub type ListenerFn = dyn Fn(&Document, &mut Event) -> Result<(), ListenerError>;

/// How a listener is registered.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ListenerOptions {
    /// Run during the capture phase instead of the bubble phase.
    pub capture: bool,
    /// Remove the listener right before its first invocation.
    pub once: bool,
}

impl ListenerOptions {
    /// Bubble-phase listener that stays registered.
    pub const BUBBLE: Self = Self {
        capture: false,
        once: false,
    };

    /// Capture-phase listener that stays registered.
    pub const CAPTURE: Self = Self {
        capture: true,
        once: false,
    };
}

struct Entry {
    id: u64,
    event_type: String,
    options: ListenerOptions,
    removed: Rc<Cell<bool>>,
    callback: Rc<ListenerFn>,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    by_node: HashMap<NodeId, Vec<Entry>>,
}

impl Registry {
    fn remove(&mut self, node: NodeId, id: u64) {
        if let Some(entries) = self.by_node.get_mut(&node) {
            entries.retain(|e| e.id != id);
            if entries.is_empty() {
                self.by_node.remove(&node);
            }
        }
    }
}

/// What a listener run needs once the registry borrow is released.
struct Snapshot {
    id: u64,
    once: bool,
    removed: Rc<Cell<bool>>,
    callback: Rc<ListenerFn>,
}

/// Result of [`Listeners::dispatch`].
#[derive(Debug, Default)]
pub struct DispatchOutcome {
    /// Whether a listener called [`Event::prevent_default`].
    pub default_prevented: bool,
    /// Failures reported by listeners, in the order they happened.
    pub errors: Vec<ListenerError>,
}

/// A shared registry of native listeners.
///
/// Cloning yields another handle to the same registry.
#[derive(Clone, Default)]
pub struct Listeners {
    registry: Rc<RefCell<Registry>>,
}

impl core::fmt::Debug for Listeners {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let reg = self.registry.borrow();
        let total: usize = reg.by_node.values().map(Vec::len).sum();
        f.debug_struct("Listeners")
            .field("nodes", &reg.by_node.len())
            .field("listeners", &total)
            .finish_non_exhaustive()
    }
}

impl Listeners {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener` for `event_type` events on `node`.
    ///
    /// The returned [`Subscription`] removes the listener when disposed.
    /// Dropping it leaves the listener in place.
    pub fn add<F>(
        &self,
        node: NodeId,
        event_type: &str,
        options: ListenerOptions,
        listener: F,
    ) -> Subscription
    where
        F: Fn(&Document, &mut Event) -> Result<(), ListenerError> + 'static,
    {
        let mut reg = self.registry.borrow_mut();
        reg.next_id += 1;
        let id = reg.next_id;
        let removed = Rc::new(Cell::new(false));
        reg.by_node.entry(node).or_default().push(Entry {
            id,
            event_type: event_type.into(),
            options,
            removed: removed.clone(),
            callback: Rc::new(listener),
        });
        Subscription {
            registry: Rc::downgrade(&self.registry),
            node,
            id,
            removed,
        }
    }

    /// Number of listeners registered for `event_type` on `node`.
    pub fn listener_count(&self, node: NodeId, event_type: &str) -> usize {
        self.registry
            .borrow()
            .by_node
            .get(&node)
            .map_or(0, |entries| {
                entries.iter().filter(|e| e.event_type == event_type).count()
            })
    }

    /// Remove every listener on `node`; returns how many were removed.
    ///
    /// Their subscriptions report [`Subscription::is_disposed`] afterwards.
    /// Call this before destroying a node that still has listeners.
    pub fn remove_node(&self, node: NodeId) -> usize {
        let entries = self.registry.borrow_mut().by_node.remove(&node);
        entries.map_or(0, |entries| {
            for entry in &entries {
                entry.removed.set(true);
            }
            entries.len()
        })
    }

    /// Remove the listeners of every node that is no longer alive in `doc`;
    /// returns how many were removed.
    ///
    /// The registry holds no reference to the document, so entries for
    /// nodes freed by [`Document::destroy`] stay until they are pruned.
    pub fn prune(&self, doc: &Document) -> usize {
        let mut removed = 0;
        self.registry.borrow_mut().by_node.retain(|&node, entries| {
            if doc.is_alive(node) {
                return true;
            }
            for entry in entries.iter() {
                entry.removed.set(true);
            }
            removed += entries.len();
            false
        });
        if removed > 0 {
            debug!(removed, "pruned listeners of freed nodes");
        }
        removed
    }

    /// Deliver `event` to `target` and its ancestors.
    ///
    /// Per-dispatch state on the event (stop flags, default prevention, and
    /// [`DelegationState`](crate::DelegationState)) is cleared first, so an
    /// event may be dispatched more than once.
    pub fn dispatch(&self, doc: &Document, target: NodeId, event: &mut Event) -> DispatchOutcome {
        event.begin_dispatch(target);
        let mut path: SmallVec<[NodeId; 16]> = SmallVec::new();
        let mut cur = doc.parent(target);
        while let Some(node) = cur {
            path.push(node);
            cur = doc.parent(node);
        }
        trace!(
            event_type = event.event_type(),
            ?target,
            depth = path.len(),
            "dispatch"
        );

        let mut errors = Vec::new();
        let done = 'walk: {
            for &node in path.iter().rev() {
                self.invoke(doc, node, Phase::Capture, true, event, &mut errors);
                if event.propagation_stopped() {
                    break 'walk true;
                }
            }
            self.invoke(doc, target, Phase::Target, true, event, &mut errors);
            if !event.immediate_propagation_stopped() {
                self.invoke(doc, target, Phase::Target, false, event, &mut errors);
            }
            event.propagation_stopped() || !event.bubbles()
        };
        if !done {
            for &node in &path {
                self.invoke(doc, node, Phase::Bubble, false, event, &mut errors);
                if event.propagation_stopped() {
                    break;
                }
            }
        }
        event.end_dispatch();
        DispatchOutcome {
            default_prevented: event.default_prevented(),
            errors,
        }
    }

    fn invoke(
        &self,
        doc: &Document,
        node: NodeId,
        phase: Phase,
        capture: bool,
        event: &mut Event,
        errors: &mut Vec<ListenerError>,
    ) {
        let snapshot: SmallVec<[Snapshot; 4]> = {
            let reg = self.registry.borrow();
            let Some(entries) = reg.by_node.get(&node) else {
                return;
            };
            entries
                .iter()
                .filter(|e| e.options.capture == capture && e.event_type == event.event_type())
                .map(|e| Snapshot {
                    id: e.id,
                    once: e.options.once,
                    removed: e.removed.clone(),
                    callback: e.callback.clone(),
                })
                .collect()
        };
        if snapshot.is_empty() {
            return;
        }
        event.enter(node, phase);
        for listener in snapshot {
            if listener.removed.get() {
                continue;
            }
            if listener.once {
                listener.removed.set(true);
                self.registry.borrow_mut().remove(node, listener.id);
            }
            if let Err(error) = (listener.callback)(doc, event) {
                warn!(
                    event_type = event.event_type(),
                    ?node,
                    %error,
                    "listener failed"
                );
                errors.push(error);
            }
            if event.immediate_propagation_stopped() {
                break;
            }
        }
    }
}

/// Handle to one registered listener.
///
/// [`Subscription::dispose`] removes the listener; calling it again is a
/// no-op. Dropping the handle does not remove the listener.
pub struct Subscription {
    registry: Weak<RefCell<Registry>>,
    node: NodeId,
    id: u64,
    removed: Rc<Cell<bool>>,
}

impl core::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Subscription")
            .field("node", &self.node)
            .field("id", &self.id)
            .field("disposed", &self.removed.get())
            .finish_non_exhaustive()
    }
}

impl Subscription {
    /// Remove the listener. Later calls do nothing.
    pub fn dispose(&self) {
        if self.removed.replace(true) {
            return;
        }
        if let Some(registry) = self.registry.upgrade() {
            registry.borrow_mut().remove(self.node, self.id);
        }
    }

    /// Returns `true` once the listener is gone, whether through
    /// [`Subscription::dispose`] or a `once` listener having run.
    pub fn is_disposed(&self) -> bool {
        self.removed.get()
    }

    /// The node the listener is attached to.
    pub fn node(&self) -> NodeId {
        self.node
    }
}
