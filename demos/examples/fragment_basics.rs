// Copyright 2025 the Widjet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! DOM helper basics.
//!
//! Build nodes from HTML strings, move them around, and walk ancestors.
//!
//! Run:
//! - `cargo run -p widjet_demos --example fragment_basics`

use widjet_dom::traverse::{ancestors, detach_node, node_and_parents, node_index, parents};
use widjet_dom::{DataValue, Document, FragmentScratch, InputName, Selector, data_attributes};

fn main() {
    let mut doc = Document::new();
    let body = doc.body();
    let mut scratch = FragmentScratch::new();

    let attrs = data_attributes([
        ("role", DataValue::from("menu")),
        ("open", DataValue::from(true)),
        ("hidden", DataValue::from(false)),
    ]);
    let name = InputName::brackets().format(["settings", "menu", "title"]);
    let menu = scratch
        .get_node(
            &mut doc,
            &format!(r#"<nav class="menu" {attrs}><input name="{name}"></nav>"#),
        )
        .unwrap();
    doc.append_child(body, menu).unwrap();

    for item in scratch.get_nodes(&mut doc, "<a>Home</a><a>About</a><a>Contact</a>") {
        doc.append_child(menu, item).unwrap();
    }
    println!("{}", doc.outer_html(menu));

    let about = doc
        .query_selector(menu, &Selector::parse("a + a").unwrap())
        .unwrap();
    println!("About is element child {:?} of the menu", node_index(&doc, about));

    let chain: Vec<_> = ancestors(&doc, about)
        .filter_map(|n| doc.tag_name(n).map(str::to_owned))
        .collect();
    println!("ancestors: {}", chain.join(" < "));

    let anything = Selector::universal();
    println!("node and parents: {}", node_and_parents(&doc, about, &anything).len());
    let menus = parents(&doc, about, &Selector::parse(".menu").unwrap());
    println!("menus above: {}", menus.len());

    let copy = doc.clone_node(menu).unwrap();
    detach_node(&mut doc, menu);
    println!("detached menu is connected: {}", doc.is_connected(menu));
    doc.append_child(body, copy).unwrap();
    println!("body now: {}", doc.inner_html(body));

    scratch.clear(&mut doc);
}
