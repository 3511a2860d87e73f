// Copyright 2025 the Widjet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree walks stay iterative: a fragment nested far deeper than the test
//! thread's stack could recurse must still serialize, clone, and free.

use widjet_dom::Document;

const DEPTH: usize = 200_000;

fn deep_document() -> Document {
    let mut doc = Document::new();
    let body = doc.body();
    doc.set_inner_html(body, &"<div>".repeat(DEPTH)).unwrap();
    doc
}

#[test]
fn deep_fragment_serializes() {
    let doc = deep_document();
    let body = doc.body();
    let html = doc.inner_html(body);
    assert_eq!(html.len(), DEPTH * "<div></div>".len());
    assert!(html.starts_with("<div><div>"));
    assert!(html.ends_with("</div></div>"));
    assert_eq!(
        doc.outer_html(body).len(),
        html.len() + "<body></body>".len()
    );
}

#[test]
fn deep_fragment_clears_and_is_reusable() {
    let mut doc = deep_document();
    let body = doc.body();
    doc.set_inner_html(body, "").unwrap();
    assert_eq!(doc.inner_html(body), "");
    assert_eq!(doc.descendants(body).count(), 0);

    // Freed slots are recycled.
    doc.set_inner_html(body, "<p>again</p>").unwrap();
    assert_eq!(doc.inner_html(body), "<p>again</p>");
}

#[test]
fn deep_fragment_clones_and_destroys() {
    let mut doc = deep_document();
    let body = doc.body();
    let top = doc.first_element_child(body).unwrap();

    let copy = doc.clone_node(top).unwrap();
    assert!(doc.parent(copy).is_none());
    assert_eq!(doc.descendants(copy).count(), DEPTH - 1);
    assert_eq!(doc.outer_html(copy), doc.outer_html(top));

    doc.destroy(copy);
    assert!(!doc.is_alive(copy));
    doc.destroy(top);
    assert!(!doc.is_alive(top));
    assert_eq!(doc.first_element_child(body), None);
}
