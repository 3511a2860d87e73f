// Copyright 2025 the Widjet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::cell::Cell;
use std::rc::Rc;

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use widjet_dom::{Document, NodeId};
use widjet_events::construct::{EventInit, dom_event};
use widjet_events::{ListenerOptions, Listeners};

/// A chain of `depth` nested `<div class="level">` under the body; returns the innermost.
fn nested(depth: usize) -> (Document, NodeId) {
    let mut doc = Document::new();
    let mut parent = doc.body();
    doc.set_attribute(parent, "class", "root").unwrap();
    for _ in 0..depth {
        let div = doc.create_element("div");
        doc.set_attribute(div, "class", "level").unwrap();
        doc.append_child(parent, div).unwrap();
        parent = div;
    }
    (doc, parent)
}

fn bench_native(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch/native");
    for depth in [4usize, 16, 64] {
        let (doc, leaf) = nested(depth);
        let listeners = Listeners::new();
        let hits = Rc::new(Cell::new(0_u64));
        let h = hits.clone();
        let _sub = listeners.add(doc.body(), "click", ListenerOptions::BUBBLE, move |_, _| {
            h.set(h.get() + 1);
            Ok(())
        });
        group.bench_function(BenchmarkId::from_parameter(depth), |b| {
            b.iter(|| {
                let mut ev = dom_event("click", None, EventInit::default());
                black_box(listeners.dispatch(&doc, leaf, &mut ev));
            });
        });
    }
    group.finish();
}

fn bench_delegated(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch/delegated");
    for depth in [4usize, 16, 64] {
        let (doc, leaf) = nested(depth);
        for (name, selector) in [("universal", None), ("class", Some(".level")), ("miss", Some(".nope"))] {
            let listeners = Listeners::new();
            let hits = Rc::new(Cell::new(0_u64));
            let h = hits.clone();
            let body = doc.body();
            let _sub = match selector {
                None => listeners.delegate(body, "click", move |_| h.set(h.get() + 1)),
                Some(s) => listeners.delegate_matching(body, "click", s, move |_| h.set(h.get() + 1)),
            };
            group.bench_function(BenchmarkId::new(name, depth), |b| {
                b.iter(|| {
                    let mut ev = dom_event("click", None, EventInit::default());
                    black_box(listeners.dispatch(&doc, leaf, &mut ev));
                });
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_native, bench_delegated);
criterion_main!(benches);
