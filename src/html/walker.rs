//! Depth-first, document-order traversal.
//!
//! A matched node is never descended into, and neither is the content of
//! `script`, `style`, `textarea` or `template`. Every walk starts from the root
//! of a freshly parsed tree, so offsets shifted by earlier splices never leak in.

use super::document::{Document, Node};
use super::matcher::{is_eligible, is_inlinable};
use super::util::is_opaque_element;

/// All inlinable references, in document order.
pub fn collect_all(doc: &Document) -> Vec<&Node> {
    collect_by(&doc.nodes, &is_inlinable)
}

/// The first inlinable reference in document order.
pub fn find_first(doc: &Document) -> Option<&Node> {
    find_by(&doc.nodes, &is_inlinable)
}

/// The first inlinable reference starting at or after byte `from`.
pub fn find_first_from(doc: &Document, from: usize) -> Option<&Node> {
    find_by(&doc.nodes, &|node: &Node| {
        node.span().start >= from && is_inlinable(node)
    })
}

/// All structurally eligible references, including ones without a usable `src`.
pub fn collect_eligible(doc: &Document) -> Vec<&Node> {
    collect_by(&doc.nodes, &is_eligible)
}

fn collect_by<'a>(nodes: &'a [Node], pred: &impl Fn(&Node) -> bool) -> Vec<&'a Node> {
    let mut found = Vec::new();
    collect_into(nodes, pred, &mut found);
    found
}

fn collect_into<'a>(nodes: &'a [Node], pred: &impl Fn(&Node) -> bool, found: &mut Vec<&'a Node>) {
    for node in nodes {
        if pred(node) {
            found.push(node);
        } else if !is_opaque(node) {
            collect_into(node.children(), pred, found);
        }
    }
}

fn find_by<'a>(nodes: &'a [Node], pred: &impl Fn(&Node) -> bool) -> Option<&'a Node> {
    nodes.iter().find_map(|node| {
        if pred(node) {
            Some(node)
        } else if is_opaque(node) {
            None
        } else {
            find_by(node.children(), pred)
        }
    })
}

fn is_opaque(node: &Node) -> bool {
    node.as_element()
        .is_some_and(|elem| is_opaque_element(&elem.tag))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html::matcher::source_path;

    fn sources<'a>(nodes: &[&'a Node]) -> Vec<&'a str> {
        nodes.iter().filter_map(|n| source_path(*n)).collect()
    }

    #[test]
    fn test_collect_all_in_document_order() {
        let html = r#"
            <header><image inline src="a.svg"></header>
            <main>
                <section><p><image inline src="b.svg"></p></section>
                <image inline src="c.svg">
            </main>
        "#;
        let doc = Document::parse(html).unwrap();
        let found = collect_all(&doc);
        assert_eq!(sources(&found), ["a.svg", "b.svg", "c.svg"]);
    }

    #[test]
    fn test_collect_all_ignores_non_matching() {
        let html = r#"
            <img inline src="a.svg">
            <image src="b.svg">
            <image inline src="c.png">
            <image inline>
        "#;
        let doc = Document::parse(html).unwrap();
        assert!(collect_all(&doc).is_empty());
        assert_eq!(collect_eligible(&doc).len(), 2);
    }

    #[test]
    fn test_find_first() {
        let html = r#"<div><image inline><span><image inline src="x.svg"></span><image inline src="y.svg"></div>"#;
        let doc = Document::parse(html).unwrap();
        let first = find_first(&doc).expect("an inlinable image");
        assert_eq!(source_path(first), Some("x.svg"));
    }

    #[test]
    fn test_find_first_none() {
        let doc = Document::parse("<p>no icons here</p>").unwrap();
        assert!(find_first(&doc).is_none());
        assert!(collect_all(&doc).is_empty());
    }

    #[test]
    fn test_adjacent_images_both_found() {
        let html = r#"<image inline src="a.svg"><image inline src="b.svg">"#;
        let doc = Document::parse(html).unwrap();
        assert_eq!(sources(&collect_all(&doc)), ["a.svg", "b.svg"]);
    }

    #[test]
    fn test_find_first_from_skips_earlier_references() {
        let html = r#"<image inline src="a.svg"><p><image inline src="b.svg"></p>"#;
        let doc = Document::parse(html).unwrap();

        assert_eq!(find_first_from(&doc, 0).and_then(source_path), Some("a.svg"));
        assert_eq!(find_first_from(&doc, 1).and_then(source_path), Some("b.svg"));
        assert!(find_first_from(&doc, html.len()).is_none());
    }

    #[test]
    fn test_opaque_content_is_not_searched() {
        let html = r#"
            <script>var s = '<image inline src="a.svg">';</script>
            <template><image inline src="b.svg"></template>
            <textarea><image inline src="c.svg"></textarea>
            <image inline src="d.svg">
        "#;
        let doc = Document::parse(html).unwrap();
        assert_eq!(sources(&collect_all(&doc)), ["d.svg"]);
        assert_eq!(find_first(&doc).and_then(source_path), Some("d.svg"));
    }
}
