use pretty_assertions::assert_eq;
use vellum_code_block::{CODE_BLOCK_KIND, CodeBlockPlugin};
use vellum_core::{
    Document, Editor, EditorPlugin, Node, PluginRegistry, Point, Selection, parse_document,
    render_document,
};

fn registry() -> PluginRegistry {
    PluginRegistry::with_extras([Box::new(CodeBlockPlugin::default()) as Box<dyn EditorPlugin>])
        .unwrap()
}

#[test]
fn set_code_block_renders_the_expected_html() {
    let registry = registry();
    let doc = Document {
        children: vec![Node::paragraph("fn main() {}")],
    };
    let mut editor = Editor::new(
        doc,
        Selection::collapsed(Point::new(vec![0, 0], 0)),
        registry,
    );
    editor
        .run_command(
            "code_block.set",
            Some(serde_json::json!({ "language": "rust" })),
        )
        .unwrap();

    assert_eq!(
        render_document(editor.doc(), editor.registry()),
        "<pre class=\"language-rust\"><code>fn main() {}</code></pre>"
    );
}

#[test]
fn code_text_is_escaped_on_the_way_out() {
    let registry = registry();
    let doc = Document {
        children: vec![Node::paragraph("if a < b && b > c {}")],
    };
    let mut editor = Editor::new(
        doc,
        Selection::collapsed(Point::new(vec![0, 0], 0)),
        registry,
    );
    editor.run_command("code_block.toggle", None).unwrap();

    let html = render_document(editor.doc(), editor.registry());
    assert!(html.contains("&lt;"));
    assert!(html.contains("&gt;"));
    assert!(!html.contains("a < b"));
}

#[test]
fn language_round_trips_through_html() {
    let registry = registry();
    let html = "<pre class=\"language-python\"><code>print(1)</code></pre>";
    let doc = parse_document(html, &registry);

    let Node::Element(block) = &doc.children[0] else {
        panic!("expected element");
    };
    assert_eq!(block.kind, CODE_BLOCK_KIND);
    assert_eq!(block.attr_str("language"), Some("python"));
    assert_eq!(block.text_content(), "print(1)");

    assert_eq!(render_document(&doc, &registry), html);
}

#[test]
fn unregistered_language_round_trips_too() {
    let registry = registry();
    let html = "<pre class=\"language-brainfuck\"><code>+-</code></pre>";
    let doc = parse_document(html, &registry);

    let Node::Element(block) = &doc.children[0] else {
        panic!("expected element");
    };
    assert_eq!(block.attr_str("language"), Some("brainfuck"));
    assert_eq!(render_document(&doc, &registry), html);
}

#[test]
fn pre_without_a_language_class_falls_back_to_the_default() {
    let registry = registry();
    let doc = parse_document("<pre><code>let x;</code></pre>", &registry);

    let Node::Element(block) = &doc.children[0] else {
        panic!("expected element");
    };
    assert_eq!(block.kind, CODE_BLOCK_KIND);
    assert_eq!(block.attr_str("language"), Some("javascript"));
    assert_eq!(block.text_content(), "let x;");
}

#[test]
fn mixed_documents_serialize_in_order() {
    let registry = registry();
    let html = "<p>before</p><pre class=\"language-go\"><code>x := 1</code></pre><p>after</p>";
    let doc = parse_document(html, &registry);
    assert_eq!(doc.children.len(), 3);
    assert_eq!(render_document(&doc, &registry), html);
}
