// Copyright 2025 the Widjet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The event object and its supporting types.

use alloc::rc::Rc;
use alloc::string::String;
use core::any::Any;

use widjet_dom::NodeId;

bitflags::bitflags! {
    /// Static behavior of an event, fixed at construction.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct EventFlags: u8 {
        /// The event bubbles from the target back up to the root.
        const BUBBLES    = 0b0000_0001;
        /// [`Event::prevent_default`] has an effect.
        const CANCELABLE = 0b0000_0010;
    }
}

impl Default for EventFlags {
    fn default() -> Self {
        Self::BUBBLES | Self::CANCELABLE
    }
}

/// Phase of an in-flight dispatch.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Not being dispatched.
    #[default]
    None,
    /// Walking from the root toward the target's parent.
    Capture,
    /// At the target node.
    Target,
    /// Walking from the target's parent back to the root.
    Bubble,
}

/// An opaque, cheaply clonable payload carried by an [`Event`].
#[derive(Clone)]
pub struct EventData(Rc<dyn Any>);

impl EventData {
    /// Wrap a value.
    pub fn new<T: Any>(value: T) -> Self {
        Self(Rc::new(value))
    }

    /// Borrow the payload as `T`, if that is its type.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref()
    }
}

impl core::fmt::Debug for EventData {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("EventData").finish_non_exhaustive()
    }
}

/// Stop flags tracked by delegated listeners, plus the node last matched.
///
/// These live on the [`Event`] so every delegated listener attached to the
/// same root sees them during one dispatch. They are reset when the event is
/// dispatched again and stay readable after dispatch returns.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DelegationState {
    /// Set by [`DelegatedEvent::stop_propagation`](crate::DelegatedEvent::stop_propagation).
    pub propagation_stopped: bool,
    /// Set by [`DelegatedEvent::stop_immediate_propagation`](crate::DelegatedEvent::stop_immediate_propagation).
    pub immediate_propagation_stopped: bool,
    /// The candidate most recently handed to a delegated callback.
    pub matched_target: Option<NodeId>,
}

/// A dispatchable event.
///
/// Construct with [`Event::new`] or one of the helpers in
/// [`construct`](crate::construct), then hand it to
/// [`Listeners::dispatch`](crate::Listeners::dispatch).
#[derive(Clone, Debug)]
pub struct Event {
    event_type: String,
    flags: EventFlags,
    data: Option<EventData>,
    target: Option<NodeId>,
    current_target: Option<NodeId>,
    phase: Phase,
    default_prevented: bool,
    stop_propagation: bool,
    stop_immediate: bool,
    /// Delegation bookkeeping shared by delegated listeners.
    pub delegation: DelegationState,
}

impl Event {
    /// Create an event of `event_type` with the given flags.
    pub fn new(event_type: &str, flags: EventFlags) -> Self {
        Self {
            event_type: event_type.into(),
            flags,
            data: None,
            target: None,
            current_target: None,
            phase: Phase::None,
            default_prevented: false,
            stop_propagation: false,
            stop_immediate: false,
            delegation: DelegationState::default(),
        }
    }

    /// An untyped, non-bubbling, non-cancelable event awaiting
    /// [`Event::init_event`].
    pub fn blank() -> Self {
        Self::new("", EventFlags::empty())
    }

    /// Attach a payload.
    #[must_use]
    pub fn with_data(mut self, data: EventData) -> Self {
        self.data = Some(data);
        self
    }

    /// (Re)initialize type and flags. Ignored while the event is being
    /// dispatched.
    pub fn init_event(&mut self, event_type: &str, bubbles: bool, cancelable: bool) {
        if self.phase != Phase::None {
            return;
        }
        self.event_type.clear();
        self.event_type.push_str(event_type);
        self.flags.set(EventFlags::BUBBLES, bubbles);
        self.flags.set(EventFlags::CANCELABLE, cancelable);
        self.default_prevented = false;
        self.stop_propagation = false;
        self.stop_immediate = false;
    }

    /// The event type, e.g. `"click"`.
    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    /// Construction flags.
    pub fn flags(&self) -> EventFlags {
        self.flags
    }

    /// Returns `true` if the event bubbles.
    pub fn bubbles(&self) -> bool {
        self.flags.contains(EventFlags::BUBBLES)
    }

    /// Returns `true` if the event is cancelable.
    pub fn cancelable(&self) -> bool {
        self.flags.contains(EventFlags::CANCELABLE)
    }

    /// Payload, if any.
    pub fn data(&self) -> Option<&EventData> {
        self.data.as_ref()
    }

    /// Replace the payload.
    pub fn set_data(&mut self, data: Option<EventData>) {
        self.data = data;
    }

    /// The node the event was dispatched to.
    pub fn target(&self) -> Option<NodeId> {
        self.target
    }

    /// The node whose listeners are currently running.
    pub fn current_target(&self) -> Option<NodeId> {
        self.current_target
    }

    /// Current dispatch phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Request that the default action be skipped. No effect unless the
    /// event is cancelable.
    pub fn prevent_default(&mut self) {
        if self.cancelable() {
            self.default_prevented = true;
        }
    }

    /// Returns `true` if [`Event::prevent_default`] took effect.
    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    /// Stop propagation to further nodes once the current node's listeners
    /// have run.
    pub fn stop_propagation(&mut self) {
        self.stop_propagation = true;
    }

    /// Stop propagation at once, skipping the current node's remaining
    /// listeners.
    pub fn stop_immediate_propagation(&mut self) {
        self.stop_propagation = true;
        self.stop_immediate = true;
    }

    /// Returns `true` once propagation has been stopped.
    pub fn propagation_stopped(&self) -> bool {
        self.stop_propagation
    }

    /// Returns `true` once immediate propagation has been stopped.
    pub fn immediate_propagation_stopped(&self) -> bool {
        self.stop_immediate
    }

    /// Legacy alias for [`Event::propagation_stopped`].
    pub fn cancel_bubble(&self) -> bool {
        self.stop_propagation
    }

    /// Legacy setter; `true` stops propagation, `false` is ignored.
    pub fn set_cancel_bubble(&mut self, cancel: bool) {
        if cancel {
            self.stop_propagation = true;
        }
    }

    pub(crate) fn set_flags(&mut self, flags: EventFlags) {
        self.flags = flags;
    }

    pub(crate) fn set_event_type(&mut self, event_type: &str) {
        self.event_type.clear();
        self.event_type.push_str(event_type);
    }

    /// Clear per-dispatch state and aim the event at `target`.
    pub(crate) fn begin_dispatch(&mut self, target: NodeId) {
        self.target = Some(target);
        self.current_target = None;
        self.phase = Phase::None;
        self.default_prevented = false;
        self.stop_propagation = false;
        self.stop_immediate = false;
        self.delegation = DelegationState::default();
    }

    pub(crate) fn enter(&mut self, node: NodeId, phase: Phase) {
        self.current_target = Some(node);
        self.phase = phase;
    }

    pub(crate) fn end_dispatch(&mut self) {
        self.current_target = None;
        self.phase = Phase::None;
    }
}
