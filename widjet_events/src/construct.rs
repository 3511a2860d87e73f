// Copyright 2025 the Widjet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event construction with a one-time capability probe.
//!
//! Three strategies build an [`Event`]:
//!
//! - [`Strategy::Constructor`]: [`new_event`], a direct constructor taking an
//!   init dictionary.
//! - [`Strategy::CreateEvent`]: [`create_event`], a blank event from a
//!   factory followed by [`Event::init_event`].
//! - [`Strategy::EventObject`]: [`create_event_object`], a mutable legacy
//!   object whose `cancel_bubble` reflects `bubbles == false`.
//!
//! [`dom_event`] asks an [`EventHost`] which strategy it supports, once per
//! process, and caches the answer in a [`StrategyCache`]. A failing
//! constructor probe is logged and swallowed, never returned.
//!
//! ```
//! use widjet_events::construct::{dom_event, EventInit};
//! use widjet_events::EventData;
//!
//! let ev = dom_event("ready", None, EventInit::default());
//! assert!(ev.bubbles() && ev.cancelable());
//!
//! let quiet = EventInit { bubbles: false, cancelable: false };
//! let ev = dom_event("saved", Some(EventData::new("doc-1")), quiet);
//! assert!(!ev.bubbles() && !ev.cancelable());
//! assert_eq!(ev.data().and_then(|d| d.downcast_ref::<&str>()), Some(&"doc-1"));
//! ```

use core::sync::atomic::{AtomicU8, Ordering};

use tracing::debug;

use crate::error::ProbeError;
use crate::types::{Event, EventData, EventFlags};

/// Bubbling and cancelation settings for a new event. Both default to `true`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct EventInit {
    /// Whether the event bubbles.
    pub bubbles: bool,
    /// Whether the event can be canceled.
    pub cancelable: bool,
}

impl Default for EventInit {
    fn default() -> Self {
        Self {
            bubbles: true,
            cancelable: true,
        }
    }
}

impl EventInit {
    fn flags(self) -> EventFlags {
        let mut flags = EventFlags::empty();
        flags.set(EventFlags::BUBBLES, self.bubbles);
        flags.set(EventFlags::CANCELABLE, self.cancelable);
        flags
    }
}

/// How [`dom_event`] builds events.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Strategy {
    /// [`new_event`].
    Constructor = 1,
    /// [`create_event`].
    CreateEvent = 2,
    /// [`create_event_object`].
    EventObject = 3,
}

impl Strategy {
    const fn from_u8(raw: u8) -> Option<Self> {
        match raw {
            1 => Some(Self::Constructor),
            2 => Some(Self::CreateEvent),
            3 => Some(Self::EventObject),
            _ => None,
        }
    }

    /// Build an event with this strategy.
    pub fn build(self, event_type: &str, data: Option<EventData>, init: EventInit) -> Event {
        match self {
            Self::Constructor => new_event(event_type, data, init),
            Self::CreateEvent => create_event(event_type, data, init),
            Self::EventObject => create_event_object(event_type, data, init),
        }
    }
}

/// The event capabilities of a host environment.
pub trait EventHost {
    /// Try the direct event constructor. An error means it is unavailable.
    fn probe_constructor(&self) -> Result<(), ProbeError>;

    /// Returns `true` if the host has the legacy event factory.
    fn has_create_event(&self) -> bool;
}

/// A host that supports every strategy. The probe always succeeds, so
/// [`Strategy::Constructor`] is chosen.
#[derive(Copy, Clone, Debug, Default)]
pub struct NativeHost;

impl EventHost for NativeHost {
    fn probe_constructor(&self) -> Result<(), ProbeError> {
        Ok(())
    }

    fn has_create_event(&self) -> bool {
        true
    }
}

/// Write-once storage for the chosen [`Strategy`].
#[derive(Debug, Default)]
pub struct StrategyCache(AtomicU8);

impl StrategyCache {
    /// An empty cache.
    pub const fn new() -> Self {
        Self(AtomicU8::new(0))
    }

    /// The cached strategy, if a probe has run.
    pub fn get(&self) -> Option<Strategy> {
        Strategy::from_u8(self.0.load(Ordering::Acquire))
    }

    /// Return the cached strategy, probing `host` first if nothing is cached.
    ///
    /// If two callers race, the first stored answer wins and both return it.
    pub fn resolve(&self, host: &dyn EventHost) -> Strategy {
        if let Some(strategy) = self.get() {
            return strategy;
        }
        let probed = probe(host);
        match self
            .0
            .compare_exchange(0, probed as u8, Ordering::AcqRel, Ordering::Acquire)
        {
            Ok(_) => probed,
            Err(existing) => Strategy::from_u8(existing).unwrap_or(probed),
        }
    }
}

fn probe(host: &dyn EventHost) -> Strategy {
    let strategy = match host.probe_constructor() {
        Ok(()) => Strategy::Constructor,
        Err(error) => {
            debug!(%error, "event constructor probe failed");
            if host.has_create_event() {
                Strategy::CreateEvent
            } else {
                Strategy::EventObject
            }
        }
    };
    debug!(?strategy, "event construction strategy selected");
    strategy
}

static PROCESS_STRATEGY: StrategyCache = StrategyCache::new();

/// Build an event using the process-wide strategy, probing [`NativeHost`]
/// on first use.
pub fn dom_event(event_type: &str, data: Option<EventData>, init: EventInit) -> Event {
    dom_event_with(&PROCESS_STRATEGY, &NativeHost, event_type, data, init)
}

/// Build an event using `cache`, probing `host` if `cache` is empty.
pub fn dom_event_with(
    cache: &StrategyCache,
    host: &dyn EventHost,
    event_type: &str,
    data: Option<EventData>,
    init: EventInit,
) -> Event {
    cache.resolve(host).build(event_type, data, init)
}

/// Direct construction.
pub fn new_event(event_type: &str, data: Option<EventData>, init: EventInit) -> Event {
    let mut event = Event::new(event_type, init.flags());
    event.set_data(data);
    event
}

/// Blank event plus [`Event::init_event`].
pub fn create_event(event_type: &str, data: Option<EventData>, init: EventInit) -> Event {
    let mut event = Event::blank();
    event.init_event(event_type, init.bubbles, init.cancelable);
    event.set_data(data);
    event
}

/// Legacy mutable event object. `cancel_bubble` is set when the event does
/// not bubble.
pub fn create_event_object(event_type: &str, data: Option<EventData>, init: EventInit) -> Event {
    let mut event = Event::blank();
    event.set_event_type(event_type);
    event.set_flags(init.flags());
    event.set_cancel_bubble(!init.bubbles);
    event.set_data(data);
    event
}
