// Copyright 2025 the Widjet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{
    BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main,
};
use widjet_dom::{Document, NodeId, Selector};

/// A `<ul>` of `len` items, every third one marked `.active`.
fn list(len: usize) -> (Document, Vec<NodeId>) {
    let mut doc = Document::new();
    let body = doc.body();
    let mut html = String::from(r#"<div id="app" class="panel"><ul class="menu">"#);
    for i in 0..len {
        if i % 3 == 0 {
            html.push_str(r#"<li class="item active"><a href="x">item</a></li>"#);
        } else {
            html.push_str(r#"<li class="item"><a href="x">item</a></li>"#);
        }
    }
    html.push_str("</ul></div>");
    doc.set_inner_html(body, &html).unwrap();
    let links = doc.query_selector_all(body, &"a".parse().unwrap());
    (doc, links)
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("selector/parse");
    for source in [
        "*",
        ".item",
        "#app .menu > li.item.active",
        "ul li:not(.active):first-child, a[href^=\"x\"]",
    ] {
        group.bench_with_input(BenchmarkId::from_parameter(source), source, |b, s| {
            b.iter(|| black_box(Selector::parse(black_box(s)).unwrap()));
        });
    }
    group.finish();
}

fn bench_matches(c: &mut Criterion) {
    let mut group = c.benchmark_group("selector/matches");

    // Descendant combinators walk the whole ancestor chain on a miss, so the
    // cost of `.missing a` grows with depth rather than with list length.
    for len in [64usize, 512, 4_096] {
        let (doc, links) = list(len);
        group.throughput(Throughput::Elements(len as u64));
        for source in ["a", ".active > a", "#app .menu li a", ".missing a"] {
            let selector: Selector = source.parse().unwrap();
            group.bench_with_input(BenchmarkId::new(source, len), &links, |b, links| {
                b.iter(|| {
                    let hits = links.iter().filter(|&&n| doc.matches(n, &selector)).count();
                    black_box(hits);
                });
            });
        }
    }
    group.finish();
}

fn bench_query_all(c: &mut Criterion) {
    let mut group = c.benchmark_group("selector/query_selector_all");
    for len in [64usize, 512, 4_096] {
        let (doc, _) = list(len);
        let selector: Selector = "li.active a".parse().unwrap();
        group.throughput(Throughput::Elements(len as u64));
        group.bench_function(BenchmarkId::from_parameter(len), |b| {
            b.iter(|| black_box(doc.query_selector_all(doc.root(), &selector)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_parse, bench_matches, bench_query_all);
criterion_main!(benches);
