// Copyright 2025 the Widjet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Delegated listeners basics.
//!
//! Attach a couple of selector-scoped listeners to a list container and
//! dispatch clicks at different items. Dispatch logging goes to stderr.
//!
//! Run:
//! - `cargo run -p widjet_demos --example delegation_basics`

use widjet_dom::{Document, Selector};
use widjet_events::Listeners;
use widjet_events::construct::{EventInit, dom_event};

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_writer(std::io::stderr)
        .init();

    let mut doc = Document::new();
    let body = doc.body();
    doc.set_inner_html(
        body,
        r#"<ul class="todos">
             <li class="todo"><span class="label">Write docs</span><button class="remove">x</button></li>
             <li class="todo done"><span class="label">Ship it</span><button class="remove">x</button></li>
           </ul>"#,
    )
    .unwrap();
    let list = doc
        .query_selector(body, &Selector::parse(".todos").unwrap())
        .unwrap();

    let listeners = Listeners::new();

    // Registered first so it can stop the broader `.todo` listener below.
    let remove = listeners.delegate_matching(list, "click", ".remove", |ev| {
        let item = ev.document().parent_element(ev.matched_target()).unwrap();
        println!("  remove: {}", ev.document().text_content(item));
        ev.stop_propagation();
    });
    let toggle = listeners.delegate_matching(list, "click", ".todo", |ev| {
        let done = ev.document().has_class(ev.matched_target(), "done");
        println!("  toggle: currently done = {done}");
    });
    // Never runs: the first selector fails to parse and is reported instead.
    let broken = listeners.delegate_matching(list, "click", "li >", |_| {});

    for (what, selector) in [("label", ".done .label"), ("remove button", ".todo .remove")] {
        let target = doc
            .query_selector(body, &Selector::parse(selector).unwrap())
            .unwrap();
        println!("click on {what} ({selector}):");
        let mut click = dom_event("click", None, EventInit::default());
        let outcome = listeners.dispatch(&doc, target, &mut click);
        for error in &outcome.errors {
            println!("  listener error: {error}");
        }
    }

    broken.dispose();
    toggle.dispose();
    remove.dispose();
    // Disposing again does nothing.
    remove.dispose();
    println!("listeners left on list: {}", listeners.listener_count(list, "click"));
}
