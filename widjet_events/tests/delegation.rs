// Copyright 2025 the Widjet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tests for delegated listeners and event construction.
//!
//! Every test builds the same page:
//!
//! ```text
//! <div class="root">
//!   <div class="foo"><div class="child"></div></div>
//!   <div class="bar"><div class="child"></div></div>
//! </div>
//! ```

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use widjet_dom::{Document, NodeId, Selector, SelectorErrorKind};
use widjet_events::construct::{
    EventInit, create_event, create_event_object, dom_event, new_event,
};
use widjet_events::{EventData, ListenerError, ListenerOptions, Listeners};

struct Page {
    doc: Document,
    root: NodeId,
    foo: NodeId,
    foo_child: NodeId,
    bar_child: NodeId,
}

fn page() -> Page {
    let mut doc = Document::new();
    let body = doc.body();
    doc.set_inner_html(
        body,
        r#"
      <div class="root">
        <div class="foo">
          <div class="child"></div>
        </div>
        <div class="bar">
          <div class="child"></div>
        </div>
      </div>"#,
    )
    .unwrap();
    let q = |doc: &Document, s: &str| {
        doc.query_selector(doc.root(), &Selector::parse(s).unwrap())
            .unwrap()
    };
    Page {
        root: q(&doc, ".root"),
        foo: q(&doc, ".foo"),
        foo_child: q(&doc, ".foo .child"),
        bar_child: q(&doc, ".bar .child"),
        doc,
    }
}

fn counter() -> (Rc<Cell<u32>>, impl Fn(&mut widjet_events::DelegatedEvent<'_>) + 'static) {
    let count = Rc::new(Cell::new(0));
    let c = count.clone();
    (count, move |_: &mut widjet_events::DelegatedEvent<'_>| c.set(c.get() + 1))
}

fn click() -> widjet_events::Event {
    dom_event("click", None, EventInit::default())
}

#[test]
fn universal_listener_fires_whatever_the_target() {
    let p = page();
    let listeners = Listeners::new();
    let seen: Rc<RefCell<Vec<NodeId>>> = Rc::default();
    let sink = seen.clone();
    listeners.delegate(p.root, "click", move |ev| {
        sink.borrow_mut().push(ev.matched_target());
    });

    listeners.dispatch(&p.doc, p.foo_child, &mut click());

    // Target first, then every element ancestor up to `<html>`.
    assert_eq!(
        *seen.borrow(),
        [
            p.foo_child,
            p.foo,
            p.root,
            p.doc.body(),
            p.doc.document_element()
        ]
    );
}

#[test]
fn universal_listener_fires_once_for_a_lone_candidate() {
    let doc = Document::new();
    let html = doc.document_element();
    let listeners = Listeners::new();
    let (count, callback) = counter();
    listeners.delegate(html, "click", callback);
    listeners.dispatch(&doc, html, &mut click());
    assert_eq!(count.get(), 1);
}

#[test]
fn detached_target_walks_only_its_remaining_chain() {
    let mut doc = Document::new();
    let top = doc.create_element("section");
    let middle = doc.create_element("div");
    let leaf = doc.create_element("span");
    doc.append_child(top, middle).unwrap();
    doc.append_child(middle, leaf).unwrap();

    let listeners = Listeners::new();
    let seen: Rc<RefCell<Vec<NodeId>>> = Rc::default();
    let sink = seen.clone();
    listeners.delegate(top, "click", move |ev| {
        sink.borrow_mut().push(ev.matched_target());
    });
    let outcome = listeners.dispatch(&doc, leaf, &mut click());
    assert!(outcome.errors.is_empty());
    assert_eq!(*seen.borrow(), [leaf, middle, top]);
}

#[test]
fn selector_scopes_the_callback() {
    let p = page();
    let listeners = Listeners::new();
    let matched: Rc<RefCell<Vec<NodeId>>> = Rc::default();
    let sink = matched.clone();
    listeners.delegate_matching(p.root, "click", ".foo", move |ev| {
        sink.borrow_mut().push(ev.matched_target());
    });

    listeners.dispatch(&p.doc, p.bar_child, &mut click());
    assert!(matched.borrow().is_empty());

    let mut ev = click();
    listeners.dispatch(&p.doc, p.foo_child, &mut ev);
    assert_eq!(*matched.borrow(), [p.foo]);
    assert_eq!(ev.delegation.matched_target, Some(p.foo));
}

#[test]
fn stop_propagation_silences_broader_listener_on_same_root() {
    let p = page();
    let listeners = Listeners::new();
    listeners.delegate_matching(p.root, "click", ".foo .child", |ev| {
        ev.stop_propagation();
    });
    let (count, callback) = counter();
    listeners.delegate_matching(p.root, "click", ".foo", callback);

    let mut ev = click();
    listeners.dispatch(&p.doc, p.foo_child, &mut ev);
    assert_eq!(count.get(), 0);
    assert!(ev.delegation.propagation_stopped);
    assert!(!ev.delegation.immediate_propagation_stopped);
}

#[test]
fn stop_immediate_propagation_silences_sibling_listener() {
    let p = page();
    let listeners = Listeners::new();
    let first = Rc::new(Cell::new(0));
    let f = first.clone();
    listeners.delegate_matching(p.root, "click", ".foo", move |ev| {
        f.set(f.get() + 1);
        ev.stop_immediate_propagation();
    });
    let (second, callback) = counter();
    listeners.delegate_matching(p.root, "click", ".foo", callback);

    listeners.dispatch(&p.doc, p.foo_child, &mut click());
    assert_eq!(first.get(), 1);
    assert_eq!(second.get(), 0);
}

#[test]
fn stop_immediate_propagation_ends_the_candidate_walk() {
    let p = page();
    let listeners = Listeners::new();
    let hits = Rc::new(Cell::new(0));
    let h = hits.clone();
    listeners.delegate(p.root, "click", move |ev| {
        h.set(h.get() + 1);
        ev.stop_immediate_propagation();
    });
    listeners.dispatch(&p.doc, p.foo_child, &mut click());
    assert_eq!(hits.get(), 1);
}

#[test]
fn flags_are_reset_when_an_event_is_redispatched() {
    let p = page();
    let listeners = Listeners::new();
    let stopper = listeners.delegate_matching(p.root, "click", ".child", |ev| {
        ev.stop_propagation();
    });
    let (count, callback) = counter();
    listeners.delegate_matching(p.root, "click", ".foo", callback);

    let mut ev = click();
    listeners.dispatch(&p.doc, p.foo_child, &mut ev);
    assert_eq!(count.get(), 0);
    assert!(ev.delegation.propagation_stopped);

    stopper.dispose();
    listeners.dispatch(&p.doc, p.foo_child, &mut ev);
    assert_eq!(count.get(), 1);
    assert!(!ev.delegation.propagation_stopped);
}

#[test]
fn dispose_is_idempotent() {
    let p = page();
    let listeners = Listeners::new();
    let (count, callback) = counter();
    let sub = listeners.delegate(p.root, "click", callback);
    listeners.dispatch(&p.doc, p.root, &mut click());
    let before = count.get();
    assert!(before > 0);

    sub.dispose();
    sub.dispose();
    assert!(sub.is_disposed());
    listeners.dispatch(&p.doc, p.foo_child, &mut click());
    assert_eq!(count.get(), before);
    assert_eq!(listeners.listener_count(p.root, "click"), 0);
}

#[test]
fn dropping_a_subscription_keeps_the_listener() {
    let p = page();
    let listeners = Listeners::new();
    let (count, callback) = counter();
    drop(listeners.delegate_matching(p.root, "click", ".root", callback));
    listeners.dispatch(&p.doc, p.foo_child, &mut click());
    assert_eq!(count.get(), 1);
}

#[test]
fn attaching_fires_nothing() {
    let p = page();
    let listeners = Listeners::new();
    let (count, callback) = counter();
    let _sub = listeners.delegate(p.root, "click", callback);
    assert_eq!(count.get(), 0);
    // Other event types do not reach the callback either.
    listeners.dispatch(&p.doc, p.foo_child, &mut dom_event("keyup", None, EventInit::default()));
    assert_eq!(count.get(), 0);
}

#[test]
fn invalid_selector_is_reported_on_each_dispatch() {
    let p = page();
    let listeners = Listeners::new();
    let (count, callback) = counter();
    listeners.delegate_matching(p.root, "click", ".foo >", callback);
    for _ in 0..2 {
        let outcome = listeners.dispatch(&p.doc, p.foo_child, &mut click());
        assert_eq!(outcome.errors.len(), 1);
        assert!(matches!(outcome.errors[0], ListenerError::Selector { .. }));
    }
    assert_eq!(count.get(), 0);
}

#[test]
fn deeply_nested_not_is_reported_not_fatal() {
    let p = page();
    let listeners = Listeners::new();
    let (count, callback) = counter();
    let selector = ":not(".repeat(100_000);
    listeners.delegate_matching(p.root, "click", &selector, callback);
    let outcome = listeners.dispatch(&p.doc, p.foo_child, &mut click());
    assert_eq!(count.get(), 0);
    assert!(matches!(
        outcome.errors.as_slice(),
        [ListenerError::Selector { source, .. }] if source.kind == SelectorErrorKind::TooDeep
    ));
}

#[test]
fn delegated_stop_halts_native_listeners_above_the_root() {
    let p = page();
    let listeners = Listeners::new();
    let body_hits = Rc::new(Cell::new(0));
    let b = body_hits.clone();
    listeners.add(p.doc.body(), "click", ListenerOptions::BUBBLE, move |_, _| {
        b.set(b.get() + 1);
        Ok(())
    });
    listeners.delegate_matching(p.root, "click", ".foo", |ev| ev.stop_propagation());

    listeners.dispatch(&p.doc, p.bar_child, &mut click());
    assert_eq!(body_hits.get(), 1);
    listeners.dispatch(&p.doc, p.foo_child, &mut click());
    assert_eq!(body_hits.get(), 1);
}

#[test]
fn dom_event_defaults_bubble_and_cancelable() {
    let ev = dom_event("foo", None, EventInit::default());
    assert_eq!(ev.event_type(), "foo");
    assert!(ev.bubbles());
    assert!(ev.cancelable());
}

#[test]
fn dom_event_carries_data() {
    let ev = dom_event(
        "foo",
        Some(EventData::new(String::from("some event data"))),
        EventInit::default(),
    );
    let data = ev.data().and_then(|d| d.downcast_ref::<String>());
    assert_eq!(data.map(String::as_str), Some("some event data"));
}

#[test]
fn dom_event_honors_explicit_false() {
    let ev = dom_event(
        "foo",
        None,
        EventInit {
            bubbles: false,
            cancelable: false,
        },
    );
    assert!(!ev.bubbles());
    assert!(!ev.cancelable());
}

#[test]
fn individual_strategies() {
    let off = EventInit {
        bubbles: false,
        cancelable: false,
    };
    let ev = create_event("foo", None, EventInit::default());
    assert_eq!(ev.event_type(), "foo");
    assert!(ev.bubbles() && ev.cancelable());

    let ev = create_event("foo", Some(EventData::new(1_u8)), off);
    assert!(!ev.bubbles() && !ev.cancelable());
    assert!(ev.data().is_some());

    let ev = create_event_object("foo", None, EventInit::default());
    assert!(!ev.cancel_bubble());
    let ev = create_event_object("foo", Some(EventData::new(1_u8)), off);
    assert!(ev.cancel_bubble());

    let ev = new_event("foo", None, off);
    assert!(!ev.bubbles());
}
