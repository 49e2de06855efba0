//! Walks through every operation once, printing the document as it changes.
//!
//! Run with `cargo run --example tour`.

use std::cell::Cell;
use std::rc::Rc;

use sapling::{Document, Events, Handler, each};

fn main() {
    let mut doc = Document::parse(concat!(
        "<!DOCTYPE html><html><body>",
        r#"<div id="test">"#,
        r#"<div class="test1">one</div>"#,
        r#"<div class="test2">two</div>"#,
        r#"<div class="test3">three</div>"#,
        "</div>",
        "</body></html>",
    ));

    let test = doc.find_first("#test", None).unwrap().expect("#test div");

    // creation, including table fragments that plain innerHTML would mangle
    let new_div = doc.create("<div>a fresh div</div>").expect("fragment");
    println!("created: {}", doc.outer_html(new_div));
    let tr = doc.create("<tr><td>td1</td></tr>").expect("row fragment");
    println!("created: {}", doc.outer_html(tr));

    // insertion around an anchor
    let after = doc.create("<div>after</div>").unwrap();
    doc.insert_after(test, after).unwrap();
    let before = doc.create("<div>before</div>").unwrap();
    doc.insert_before(test, before).unwrap();

    // append + wrap
    let child = doc.create("<div>child</div>").unwrap();
    doc.append(test, child).unwrap();
    let wrapper = doc.create("<div class=\"wrap\"></div>").unwrap();
    doc.wrap(child, wrapper).unwrap();
    println!("after wrap: {}", doc.inner_html(test));

    // removal
    let first = doc.find_first(".test1", None).unwrap().unwrap();
    doc.remove(first).unwrap();
    let emptied = doc.empty(test);
    println!("emptied {} element children from #test", emptied.len());

    // attributes
    doc.set_attr(test, "title", "a title").unwrap();
    println!("title = {:?}", doc.attr(test, "title"));

    // text and inner HTML
    doc.set_text(test, "some text");
    println!("text = {:?}", doc.text(test));
    doc.set_inner_html(
        test,
        concat!(
            r#"<div class="test1">child one</div>"#,
            r#"<div class="test2">child two</div>"#,
            r#"<div class="test3">child three</div>"#,
        ),
    )
    .unwrap();

    // styles: one property at a time, or a batch in order
    doc.set_styles(test, [("color", "red"), ("border", "1px solid green")])
        .unwrap();
    doc.set_style(test, "background", "#333").unwrap();
    println!("background = {:?}", doc.style(test, "background"));

    // classes
    doc.add_class(test, "blue").unwrap();
    doc.remove_class(test, "blue").unwrap();

    // events: register, dispatch, deregister by handler identity
    let mut events = Events::new();
    let clicks = Rc::new(Cell::new(0u32));
    let handler: Handler = {
        let clicks = clicks.clone();
        Rc::new(move |_event| clicks.set(clicks.get() + 1))
    };
    events.on(test, "click", handler.clone());
    events.dispatch(&doc, test, "click");
    events.off(test, "click", &handler);
    events.dispatch(&doc, test, "click");
    println!("clicked {} time(s)", clicks.get());

    // traversal
    let one = doc.find_first(".test1", None).unwrap().unwrap();
    let two = doc.find_first(".test2", None).unwrap().unwrap();
    let three = doc.find_first(".test3", None).unwrap().unwrap();
    println!("parent of .test1 is #test: {}", doc.parent(one) == Some(test));
    println!("#test has {} child nodes", doc.children(test).len());
    println!(".test1 has {} siblings", doc.siblings(one).len());
    println!("next of .test1 is .test2: {}", doc.next_element(one) == Some(two));
    println!(
        "previous of .test2 is .test1: {}",
        doc.previous_element(two) == Some(one)
    );
    println!("index of .test3 = {:?}", doc.index(three));

    // callback-style iteration over a snapshot
    let children = doc.element_children(test);
    each(&children, |node| {
        doc.set_style(node, "color", "#ff0").unwrap();
    });

    println!("final document:\n{}", doc.to_html_pretty());
}
