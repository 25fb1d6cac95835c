use vellum_code_block::{CodeBlockPlugin, CodeBlockView, ViewPatch};
use vellum_core::{
    Document, DomId, DomMutation, Editor, EditorPlugin, ElementNode, MutationKind, Node, NodeView,
    PluginRegistry, Point, Selection, ViewHost,
};

fn code_block(language: &str, text: &str) -> ElementNode {
    let mut attrs = vellum_core::Attrs::default();
    attrs.insert(
        "language".to_string(),
        serde_json::Value::String(language.to_string()),
    );
    ElementNode {
        kind: "code_block".to_string(),
        attrs,
        children: vec![Node::text(text)],
    }
}

fn view_for(el: &ElementNode) -> CodeBlockView {
    CodeBlockView::new(el, vec![0])
}

#[test]
fn construction_builds_wrapper_toolbar_and_pre() {
    let view = view_for(&code_block("rust", "fn main() {}"));
    let dom = view.dom();
    let root = view.root();

    assert!(dom.has_class(root, "vellum-code-block"));
    let children = dom.children(root);
    assert_eq!(children.len(), 2);

    let toolbar = children[0];
    assert!(dom.has_class(toolbar, "vellum-code-block-toolbar"));
    assert!(!dom.children(toolbar).is_empty());

    let pre = children[1];
    assert_eq!(dom.tag(pre), "pre");
    assert!(dom.has_class(pre, "language-rust"));
    assert_eq!(dom.text_content(pre), "fn main() {}");
}

#[test]
fn pre_ids_are_unique_per_view() {
    let a = view_for(&code_block("rust", "a"));
    let b = view_for(&code_block("rust", "b"));
    assert_ne!(a.pre_element_id(), b.pre_element_id());
}

#[test]
fn copy_text_is_reachable_through_the_pre_id() {
    let view = view_for(&code_block("go", "x := 1"));
    let pre = view.dom().element_by_id(view.pre_element_id()).unwrap();
    assert_eq!(view.dom().text_content(pre), "x := 1");
    assert_eq!(view.copy_text(), "x := 1");
}

#[test]
fn language_change_patches_in_place() {
    let mut view = view_for(&code_block("rust", "x"));
    let patch = view.apply_update(&Node::Element(code_block("python", "x")));

    assert_eq!(patch, ViewPatch::Patched);
    let pre = view.dom().element_by_id(view.pre_element_id()).unwrap();
    assert!(view.dom().has_class(pre, "language-python"));
    assert!(!view.dom().has_class(pre, "language-rust"));
}

#[test]
fn same_language_update_changes_nothing() {
    let mut view = view_for(&code_block("rust", "x"));
    let patch = view.apply_update(&Node::Element(code_block("rust", "y")));
    assert_eq!(patch, ViewPatch::Unchanged);
}

#[test]
fn kind_change_requires_recreation() {
    let mut view = view_for(&code_block("rust", "x"));
    let paragraph = Node::paragraph("x");
    assert_eq!(view.apply_update(&paragraph), ViewPatch::Recreate);
    assert!(!view.update(&paragraph));
}

#[test]
fn toolbar_events_are_stopped_and_mutations_ignored() {
    let view = view_for(&code_block("rust", "x"));
    let dom = view.dom();
    let toolbar = dom.children(view.root())[0];
    let select = dom.children(toolbar)[0];

    assert!(view.stop_event(toolbar));
    assert!(view.stop_event(select));
    assert!(view.ignore_mutation(&DomMutation {
        target: select,
        kind: MutationKind::ChildList,
    }));

    // The content region stays host-owned.
    let pre = dom.children(view.root())[1];
    assert!(!view.stop_event(pre));
    assert!(!view.ignore_mutation(&DomMutation {
        target: pre,
        kind: MutationKind::CharacterData,
    }));
}

#[test]
fn destroy_unmounts_only_the_toolbar() {
    let mut view = view_for(&code_block("rust", "x"));
    let toolbar = view.dom().children(view.root())[0];

    view.destroy();

    assert!(view.dom().children(toolbar).is_empty());
    let pre = view.dom().children(view.root())[1];
    assert_eq!(view.dom().text_content(pre), "x");
}

#[test]
fn language_change_callback_routes_through_the_command() {
    let registry = PluginRegistry::with_extras([
        Box::new(CodeBlockPlugin::default()) as Box<dyn EditorPlugin>
    ])
    .unwrap();
    let block = code_block("rust", "x");
    let doc = Document {
        children: vec![Node::Element(block.clone())],
    };
    let mut editor = Editor::new(
        doc,
        Selection::collapsed(Point::new(vec![0, 0], 0)),
        registry,
    );
    let mut view = view_for(&block);

    view.apply_language_change(&mut editor, "go").unwrap();

    let Node::Element(updated) = &editor.doc().children[0] else {
        panic!("expected element block");
    };
    assert_eq!(updated.attr_str("language"), Some("go"));
    assert_eq!(view.language(), "go");
    let pre = view.dom().element_by_id(view.pre_element_id()).unwrap();
    assert!(view.dom().has_class(pre, "language-go"));
}

#[test]
fn language_change_targets_the_views_own_block() {
    let registry = PluginRegistry::with_extras([
        Box::new(CodeBlockPlugin::default()) as Box<dyn EditorPlugin>
    ])
    .unwrap();
    let doc = Document {
        children: vec![
            Node::Element(code_block("rust", "a")),
            Node::Element(code_block("python", "b")),
        ],
    };
    // Selection sits in the first block; the view is bound to the second.
    let mut editor = Editor::new(
        doc,
        Selection::collapsed(Point::new(vec![0, 0], 0)),
        registry,
    );
    let mut view = CodeBlockView::new(&code_block("python", "b"), vec![1]);

    view.apply_language_change(&mut editor, "go").unwrap();

    let Node::Element(first) = &editor.doc().children[0] else {
        panic!("expected element block");
    };
    let Node::Element(second) = &editor.doc().children[1] else {
        panic!("expected element block");
    };
    assert_eq!(first.attr_str("language"), Some("rust"));
    assert_eq!(second.attr_str("language"), Some("go"));
    let pre = view.dom().element_by_id(view.pre_element_id()).unwrap();
    assert!(view.dom().has_class(pre, "language-go"));
}

#[test]
fn language_change_on_a_stale_binding_fails_cleanly() {
    let registry = PluginRegistry::with_extras([
        Box::new(CodeBlockPlugin::default()) as Box<dyn EditorPlugin>
    ])
    .unwrap();
    let doc = Document {
        children: vec![
            Node::Element(code_block("rust", "a")),
            Node::paragraph("no longer code"),
        ],
    };
    let mut editor = Editor::new(
        doc,
        Selection::collapsed(Point::new(vec![0, 0], 0)),
        registry,
    );
    // The view's block was replaced by a paragraph out from under it.
    let mut view = CodeBlockView::new(&code_block("python", "b"), vec![1]);

    assert!(view.apply_language_change(&mut editor, "go").is_err());

    let Node::Element(first) = &editor.doc().children[0] else {
        panic!("expected element block");
    };
    assert_eq!(first.attr_str("language"), Some("rust"));
    let pre = view.dom().element_by_id(view.pre_element_id()).unwrap();
    assert!(view.dom().has_class(pre, "language-python"));
}

#[test]
fn toolbar_updates_reuse_the_picker_elements() {
    let mut view = view_for(&code_block("rust", "x"));
    let toolbar = view.dom().children(view.root())[0];
    let mounted: Vec<DomId> = view.dom().children(toolbar).to_vec();
    let select = mounted[0];
    let options: Vec<DomId> = view.dom().children(select).to_vec();

    view.apply_update(&Node::Element(code_block("python", "x")));
    view.apply_update(&Node::Element(code_block("go", "x")));

    // Same subtree, no freshly allocated picker nodes.
    assert_eq!(view.dom().children(toolbar), &mounted[..]);
    assert_eq!(view.dom().children(select), &options[..]);

    let selected: Vec<DomId> = options
        .iter()
        .copied()
        .filter(|&o| view.dom().has_class(o, "is-selected"))
        .collect();
    assert_eq!(selected.len(), 1);
    assert!(view.dom().has_class(selected[0], "lang-go"));
}

#[test]
fn failed_language_change_leaves_the_dom_alone() {
    let registry = PluginRegistry::with_extras([
        Box::new(CodeBlockPlugin::default()) as Box<dyn EditorPlugin>
    ])
    .unwrap();
    let doc = Document {
        children: vec![Node::paragraph("prose")],
    };
    let mut editor = Editor::new(
        doc,
        Selection::collapsed(Point::new(vec![0, 0], 0)),
        registry,
    );
    let mut view = view_for(&code_block("rust", "x"));

    assert!(view.apply_language_change(&mut editor, "go").is_err());
    let pre = view.dom().element_by_id(view.pre_element_id()).unwrap();
    assert!(view.dom().has_class(pre, "language-rust"));
}

#[test]
fn view_host_manages_code_block_views() {
    let registry = PluginRegistry::with_extras([
        Box::new(CodeBlockPlugin::default()) as Box<dyn EditorPlugin>
    ])
    .unwrap();
    let doc = Document {
        children: vec![Node::paragraph("intro"), Node::Element(code_block("rust", "x"))],
    };
    let mut editor = Editor::new(
        doc,
        Selection::collapsed(Point::new(vec![0, 0], 0)),
        registry,
    );
    let mut host = ViewHost::new();

    host.sync(&editor);
    assert_eq!(host.len(), 1);
    let view = host.view(&[1]).unwrap();
    let pre = view.dom().children(view.root())[1];
    assert!(view.dom().has_class(pre, "language-rust"));

    // Move the selection into the code block, change the language, and
    // let the host patch the live view.
    editor.set_selection(Selection::collapsed(Point::new(vec![1, 0], 0)));
    editor
        .run_command(
            "code_block.set_language",
            Some(serde_json::json!({ "language": "go" })),
        )
        .unwrap();
    host.sync(&editor);

    assert_eq!(host.len(), 1);
    let view = host.view(&[1]).unwrap();
    let pre = view.dom().children(view.root())[1];
    assert!(view.dom().has_class(pre, "language-go"));

    // Toggling back to a paragraph drops the view.
    editor.run_command("code_block.toggle", None).unwrap();
    host.sync(&editor);
    assert!(host.is_empty());
}
