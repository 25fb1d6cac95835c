use std::sync::Arc;

use serde_json::Value;
use vellum_core::{
    Attrs, ChildConstraint, CommandError, CommandSpec, DecorationSource, Editor, EditorPlugin,
    ElementNode, HtmlRule, Node, NodeRole, NodeSpec, NodeViewSpec, Op, QuerySpec, Transaction,
    element_is_text_block, node_at_path,
};

use crate::config::CodeBlockConfig;
use crate::decorations::SyntaxDecorationSource;
use crate::html;
use crate::view::CodeBlockView;

pub const CODE_BLOCK_KIND: &str = "code_block";

pub struct CodeBlockPlugin {
    config: CodeBlockConfig,
}

impl Default for CodeBlockPlugin {
    fn default() -> Self {
        Self::new(CodeBlockConfig::default())
    }
}

impl CodeBlockPlugin {
    pub fn new(config: CodeBlockConfig) -> Self {
        Self { config }
    }
}

impl EditorPlugin for CodeBlockPlugin {
    fn id(&self) -> &'static str {
        "code_block"
    }

    fn node_specs(&self) -> Vec<NodeSpec> {
        vec![NodeSpec {
            kind: CODE_BLOCK_KIND.to_string(),
            role: NodeRole::Block,
            is_void: false,
            children: ChildConstraint::InlineOnly,
            plain_text_only: true,
        }]
    }

    fn commands(&self) -> Vec<CommandSpec> {
        let set_config = self.config.clone();
        let toggle_config = self.config.clone();
        vec![
            CommandSpec::new("code_block.set", "Set code block", move |editor, args| {
                let language = arg_language(&args);
                set_code_block(editor, language, &set_config)
                    .map_err(CommandError::new)
                    .and_then(|tx| apply_if_nonempty(editor, tx, "set code block"))
            })
            .description("Convert the active text block into a code block.")
            .keywords(["code block", "code", "pre", "monospace"])
            .args_example(serde_json::json!({ "language": "rust" })),
            CommandSpec::new(
                "code_block.toggle",
                "Toggle code block",
                move |editor, args| {
                    let language = arg_language(&args);
                    toggle_code_block(editor, language, &toggle_config)
                        .map_err(CommandError::new)
                        .and_then(|tx| apply_if_nonempty(editor, tx, "toggle code block"))
                },
            )
            .description("Toggle code block for the active text block.")
            .keywords(["code block", "code", "toggle"])
            .args_example(serde_json::json!({ "language": "javascript" })),
            CommandSpec::new(
                "code_block.set_language",
                "Set code block language",
                |editor, args| {
                    let Some(language) = arg_language(&args) else {
                        return Err(CommandError::new("Missing language argument"));
                    };
                    set_code_block_language(editor, language)
                        .map_err(CommandError::new)
                        .and_then(|tx| apply_if_nonempty(editor, tx, "set code block language"))
                },
            )
            .description("Change the language attribute of the active code block.")
            .keywords(["language", "syntax", "highlight"])
            .args_example(serde_json::json!({ "language": "go" })),
        ]
    }

    fn queries(&self) -> Vec<QuerySpec> {
        vec![
            QuerySpec {
                id: "code_block.is_active".to_string(),
                handler: Arc::new(|editor, _args| Ok(Value::Bool(active_code_block(editor).is_some()))),
            },
            QuerySpec {
                id: "code_block.language".to_string(),
                handler: Arc::new(|editor, _args| {
                    Ok(match active_code_block(editor) {
                        Some(el) => el
                            .attr_str("language")
                            .map(|l| Value::String(l.to_string()))
                            .unwrap_or(Value::Null),
                        None => Value::Null,
                    })
                }),
            },
        ]
    }

    fn decoration_sources(&self) -> Vec<Box<dyn DecorationSource>> {
        vec![Box::new(SyntaxDecorationSource::new(self.config.clone()))]
    }

    fn html_rules(&self) -> Vec<HtmlRule> {
        vec![html::code_block_rule(self.config.clone())]
    }

    fn node_views(&self) -> Vec<NodeViewSpec> {
        let config = self.config.clone();
        vec![NodeViewSpec {
            kind: CODE_BLOCK_KIND.to_string(),
            factory: Arc::new(move |el, path| {
                Box::new(CodeBlockView::with_config(el, path, config.clone()))
            }),
        }]
    }
}

fn arg_language(args: &Option<Value>) -> Option<String> {
    args.as_ref()
        .and_then(|v| v.get("language"))
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
}

fn apply_if_nonempty(
    editor: &mut Editor,
    tx: Transaction,
    what: &str,
) -> Result<(), CommandError> {
    if tx.is_empty() {
        return Ok(());
    }
    editor
        .apply(tx)
        .map_err(|e| CommandError::new(format!("Failed to {what}: {e:?}")))
}

/// The code block element containing the selection focus, if any.
fn active_code_block(editor: &Editor) -> Option<&ElementNode> {
    let focus = &editor.selection().focus;
    let (_, block_path) = focus.path.split_last()?;
    match node_at_path(editor.doc(), block_path)? {
        Node::Element(el) if el.kind == CODE_BLOCK_KIND => Some(el),
        _ => None,
    }
}

fn focused_text_block(
    editor: &Editor,
) -> Result<(Vec<usize>, ElementNode), String> {
    let focus = editor.selection().focus.clone();
    let block_path = focus.path.split_last().map(|(_, p)| p).unwrap_or(&[]);
    if block_path.is_empty() {
        return Err("No active block".into());
    }
    let Some(node) = node_at_path(editor.doc(), block_path).cloned() else {
        return Err("No active block".into());
    };
    let Node::Element(el) = node else {
        return Err("Active block cannot hold a code block".into());
    };
    if !element_is_text_block(&el, editor.registry()) {
        return Err("Active block cannot hold a code block".into());
    }
    Ok((block_path.to_vec(), el))
}

pub(crate) fn code_block_attrs(language: String) -> Attrs {
    let mut attrs = Attrs::default();
    attrs.insert("language".to_string(), Value::String(language));
    attrs
}

/// Stripping marks here is intentional and lossy: code blocks forbid
/// styled inline content, so bold/italic/link formatting does not survive
/// conversion and is not restored by converting back.
fn plain_children(children: Vec<Node>) -> Vec<Node> {
    children
        .into_iter()
        .map(|node| match node {
            Node::Text(t) => Node::text(t.text),
            other => other,
        })
        .collect()
}

fn set_code_block(
    editor: &mut Editor,
    language: Option<String>,
    config: &CodeBlockConfig,
) -> Result<Transaction, String> {
    let (block_path, el) = focused_text_block(editor)?;
    let selection_after = editor.selection().clone();
    let language = language.unwrap_or_else(|| config.default_language.clone());

    if el.kind == CODE_BLOCK_KIND && el.attr_str("language") == Some(language.as_str()) {
        return Ok(Transaction::new(Vec::new()).source("command:code_block.set"));
    }

    let next = Node::Element(ElementNode {
        kind: CODE_BLOCK_KIND.to_string(),
        attrs: code_block_attrs(language),
        children: plain_children(el.children),
    });

    Ok(Transaction::new(vec![
        Op::RemoveNode {
            path: block_path.clone(),
        },
        Op::InsertNode {
            path: block_path,
            node: next,
        },
    ])
    .selection_after(selection_after)
    .source("command:code_block.set"))
}

fn toggle_code_block(
    editor: &mut Editor,
    language: Option<String>,
    config: &CodeBlockConfig,
) -> Result<Transaction, String> {
    let (block_path, el) = focused_text_block(editor)?;
    let selection_after = editor.selection().clone();

    let next = if el.kind == CODE_BLOCK_KIND {
        let mut attrs = el.attrs.clone();
        attrs.remove("language");
        Node::Element(ElementNode {
            kind: "paragraph".to_string(),
            attrs,
            children: el.children,
        })
    } else {
        let language = language.unwrap_or_else(|| config.default_language.clone());
        Node::Element(ElementNode {
            kind: CODE_BLOCK_KIND.to_string(),
            attrs: code_block_attrs(language),
            children: plain_children(el.children),
        })
    };

    Ok(Transaction::new(vec![
        Op::RemoveNode {
            path: block_path.clone(),
        },
        Op::InsertNode {
            path: block_path,
            node: next,
        },
    ])
    .selection_after(selection_after)
    .source("command:code_block.toggle"))
}

fn set_code_block_language(editor: &mut Editor, language: String) -> Result<Transaction, String> {
    let focus = editor.selection().focus.clone();
    let block_path = focus.path.split_last().map(|(_, p)| p).unwrap_or(&[]);
    if block_path.is_empty() {
        return Err("No active block".into());
    }
    let Some(Node::Element(el)) = node_at_path(editor.doc(), block_path) else {
        return Err("Active block is not a code block".into());
    };
    if el.kind != CODE_BLOCK_KIND {
        return Err("Active block is not a code block".into());
    }
    if el.attr_str("language") == Some(language.as_str()) {
        return Ok(Transaction::new(Vec::new()).source("command:code_block.set_language"));
    }

    let mut set = Attrs::default();
    set.insert("language".to_string(), Value::String(language));
    Ok(Transaction::new(vec![Op::SetNodeAttrs {
        path: block_path.to_vec(),
        patch: vellum_core::AttrPatch {
            set,
            remove: Vec::new(),
        },
    }])
    .selection_after(editor.selection().clone())
    .source("command:code_block.set_language"))
}
