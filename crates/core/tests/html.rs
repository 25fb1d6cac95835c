use pretty_assertions::assert_eq;
use vellum_core::{Document, Node, PluginRegistry, parse_document, render_document};

#[test]
fn renders_paragraphs_and_dividers() {
    let registry = PluginRegistry::core();
    let doc = Document {
        children: vec![
            Node::paragraph("first"),
            Node::divider(),
            Node::paragraph("second"),
        ],
    };
    assert_eq!(
        render_document(&doc, &registry),
        "<p>first</p><hr><p>second</p>"
    );
}

#[test]
fn escapes_markup_in_text() {
    let registry = PluginRegistry::core();
    let doc = Document {
        children: vec![Node::paragraph("a < b && c > d")],
    };
    let html = render_document(&doc, &registry);
    assert!(html.contains("&lt;"));
    assert!(html.contains("&gt;"));
    assert!(!html.contains("a < b"));
}

#[test]
fn parses_paragraphs_back() {
    let registry = PluginRegistry::core();
    let doc = parse_document("<p>hello</p><hr><p>world</p>", &registry);

    assert_eq!(doc.children.len(), 3);
    let Node::Element(first) = &doc.children[0] else {
        panic!("expected element");
    };
    assert_eq!(first.kind, "paragraph");
    assert_eq!(first.text_content(), "hello");
    assert!(matches!(&doc.children[1], Node::Void(v) if v.kind == "divider"));
}

#[test]
fn unknown_tags_fall_back_to_paragraphs() {
    let registry = PluginRegistry::core();
    let doc = parse_document("<blockquote>quoted</blockquote>", &registry);

    assert_eq!(doc.children.len(), 1);
    let Node::Element(block) = &doc.children[0] else {
        panic!("expected element");
    };
    assert_eq!(block.kind, "paragraph");
    assert_eq!(block.text_content(), "quoted");
}

#[test]
fn round_trip_preserves_text() {
    let registry = PluginRegistry::core();
    let doc = Document {
        children: vec![Node::paragraph("alpha"), Node::paragraph("beta")],
    };
    let html = render_document(&doc, &registry);
    let parsed = parse_document(&html, &registry);
    assert_eq!(parsed, doc);
}
