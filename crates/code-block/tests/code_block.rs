use vellum_code_block::CodeBlockPlugin;
use vellum_core::{
    Document, Editor, EditorPlugin, ElementNode, Marks, Node, PluginRegistry, Point, Selection,
    TextNode,
};

fn editor_with(doc: Document) -> Editor {
    let registry = PluginRegistry::with_extras([
        Box::new(CodeBlockPlugin::default()) as Box<dyn EditorPlugin>
    ])
    .unwrap();
    Editor::new(
        doc,
        Selection::collapsed(Point::new(vec![0, 0], 0)),
        registry,
    )
}

fn paragraph_editor(text: &str) -> Editor {
    editor_with(Document {
        children: vec![Node::paragraph(text)],
    })
}

fn block_kind(editor: &Editor) -> &str {
    let Node::Element(block) = &editor.doc().children[0] else {
        panic!("expected element block");
    };
    &block.kind
}

fn block_text(editor: &Editor) -> String {
    let Node::Element(block) = &editor.doc().children[0] else {
        panic!("expected element block");
    };
    block.text_content()
}

#[test]
fn toggle_converts_paragraph_and_back() {
    let mut editor = paragraph_editor("fn main() {}");

    editor.run_command("code_block.toggle", None).unwrap();
    assert_eq!(block_kind(&editor), "code_block");
    assert_eq!(block_text(&editor), "fn main() {}");

    editor.run_command("code_block.toggle", None).unwrap();
    assert_eq!(block_kind(&editor), "paragraph");
    assert_eq!(block_text(&editor), "fn main() {}");
}

#[test]
fn toggle_defaults_the_language() {
    let mut editor = paragraph_editor("x");
    editor.run_command("code_block.toggle", None).unwrap();

    let Node::Element(block) = &editor.doc().children[0] else {
        panic!("expected element block");
    };
    assert_eq!(block.attr_str("language"), Some("javascript"));
}

#[test]
fn toggle_back_drops_the_language_attribute() {
    let mut editor = paragraph_editor("x");
    editor
        .run_command(
            "code_block.toggle",
            Some(serde_json::json!({ "language": "rust" })),
        )
        .unwrap();
    editor.run_command("code_block.toggle", None).unwrap();

    let Node::Element(block) = &editor.doc().children[0] else {
        panic!("expected element block");
    };
    assert_eq!(block.kind, "paragraph");
    assert!(block.attrs.get("language").is_none());
}

#[test]
fn toggle_strips_inline_marks() {
    let mut editor = editor_with(Document {
        children: vec![Node::Element(ElementNode {
            kind: "paragraph".to_string(),
            attrs: Default::default(),
            children: vec![
                Node::text("plain "),
                Node::Text(TextNode {
                    text: "bold".to_string(),
                    marks: Marks {
                        bold: true,
                        ..Marks::default()
                    },
                }),
            ],
        })],
    });

    editor.run_command("code_block.toggle", None).unwrap();

    assert_eq!(block_text(&editor), "plain bold");
    let Node::Element(block) = &editor.doc().children[0] else {
        panic!("expected element block");
    };
    for child in &block.children {
        let Node::Text(leaf) = child else { continue };
        assert!(leaf.marks.is_plain());
    }
}

#[test]
fn set_is_a_noop_when_already_set_to_that_language() {
    let mut editor = paragraph_editor("x");
    editor
        .run_command(
            "code_block.set",
            Some(serde_json::json!({ "language": "go" })),
        )
        .unwrap();
    assert!(editor.can_undo());

    editor.undo();
    editor.redo();
    editor
        .run_command(
            "code_block.set",
            Some(serde_json::json!({ "language": "go" })),
        )
        .unwrap();

    // The repeat produced no transaction, so one undo gets back to the
    // original paragraph.
    assert!(editor.undo());
    assert_eq!(block_kind(&editor), "paragraph");
}

#[test]
fn set_language_updates_only_the_attribute() {
    let mut editor = paragraph_editor("print(1)");
    editor
        .run_command(
            "code_block.set",
            Some(serde_json::json!({ "language": "python" })),
        )
        .unwrap();
    editor
        .run_command(
            "code_block.set_language",
            Some(serde_json::json!({ "language": "ruby" })),
        )
        .unwrap();

    let Node::Element(block) = &editor.doc().children[0] else {
        panic!("expected element block");
    };
    assert_eq!(block.kind, "code_block");
    assert_eq!(block.attr_str("language"), Some("ruby"));
    assert_eq!(block.text_content(), "print(1)");
}

#[test]
fn set_language_outside_a_code_block_fails_and_leaves_the_document_alone() {
    let mut editor = paragraph_editor("just prose");
    let before = editor.doc().clone();

    let result = editor.run_command(
        "code_block.set_language",
        Some(serde_json::json!({ "language": "go" })),
    );

    assert!(result.is_err());
    assert_eq!(editor.doc(), &before);
    assert!(!editor.can_undo());
}

#[test]
fn set_language_without_an_argument_fails() {
    let mut editor = paragraph_editor("x");
    editor.run_command("code_block.set", None).unwrap();
    assert!(editor.run_command("code_block.set_language", None).is_err());
}

#[test]
fn unknown_languages_are_stored_verbatim() {
    let mut editor = paragraph_editor("x");
    editor
        .run_command(
            "code_block.set",
            Some(serde_json::json!({ "language": "brainfuck" })),
        )
        .unwrap();

    let Node::Element(block) = &editor.doc().children[0] else {
        panic!("expected element block");
    };
    assert_eq!(block.attr_str("language"), Some("brainfuck"));
    // No grammar, so no decorations either.
    assert!(editor.decorations().is_empty());
}

#[test]
fn queries_report_the_active_code_block() {
    let mut editor = paragraph_editor("x");
    assert!(
        !editor
            .run_query::<bool>("code_block.is_active", None)
            .unwrap()
    );
    assert!(
        editor
            .run_query_json("code_block.language", None)
            .unwrap()
            .is_null()
    );

    editor
        .run_command(
            "code_block.toggle",
            Some(serde_json::json!({ "language": "sql" })),
        )
        .unwrap();

    assert!(
        editor
            .run_query::<bool>("code_block.is_active", None)
            .unwrap()
    );
    assert_eq!(
        editor
            .run_query::<String>("code_block.language", None)
            .unwrap(),
        "sql"
    );
}

#[test]
fn documents_with_code_blocks_round_trip_through_json() {
    let mut editor = paragraph_editor("let x = 1;");
    editor
        .run_command(
            "code_block.set",
            Some(serde_json::json!({ "language": "rust" })),
        )
        .unwrap();

    let value = vellum_core::DocumentValue::from_document(editor.doc().clone());
    let json = value.to_json_pretty().unwrap();
    let restored = vellum_core::DocumentValue::from_json_str(&json).unwrap();
    assert_eq!(restored.into_document(), *editor.doc());
}

#[test]
fn undo_restores_the_paragraph_after_toggle() {
    let mut editor = paragraph_editor("original");
    editor.run_command("code_block.toggle", None).unwrap();
    assert_eq!(block_kind(&editor), "code_block");

    assert!(editor.undo());
    assert_eq!(block_kind(&editor), "paragraph");
    assert_eq!(block_text(&editor), "original");
}
