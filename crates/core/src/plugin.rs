use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::core::{Document, Marks, Node, Point, Selection, node_at_path};
use crate::html::HtmlRule;
use crate::ops::{Op, Path, Transaction};
use crate::view::NodeViewSpec;

#[derive(Debug, Clone)]
pub struct CommandError {
    message: String,
}

impl CommandError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Debug, Clone)]
pub struct QueryError {
    message: String,
}

impl QueryError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// A named command. Failure is surfaced as a `CommandError` the caller must
/// check; a failed command leaves the document untouched.
#[derive(Clone)]
pub struct CommandSpec {
    pub id: String,
    pub label: String,
    pub description: Option<String>,
    pub keywords: Vec<String>,
    pub args_example: Option<serde_json::Value>,
    pub handler: std::sync::Arc<
        dyn Fn(&mut crate::core::Editor, Option<serde_json::Value>) -> Result<(), CommandError>
            + Send
            + Sync,
    >,
}

impl CommandSpec {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        handler: impl Fn(
            &mut crate::core::Editor,
            Option<serde_json::Value>,
        ) -> Result<(), CommandError>
        + Send
        + Sync
        + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            description: None,
            keywords: Vec::new(),
            handler: std::sync::Arc::new(handler),
            args_example: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    pub fn args_example(mut self, args_example: serde_json::Value) -> Self {
        self.args_example = Some(args_example);
        self
    }
}

#[derive(Clone)]
pub struct QuerySpec {
    pub id: String,
    pub handler: std::sync::Arc<
        dyn Fn(
                &crate::core::Editor,
                Option<serde_json::Value>,
            ) -> Result<serde_json::Value, QueryError>
            + Send
            + Sync,
    >,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeRole {
    Block,
    Inline,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChildConstraint {
    None,
    BlockOnly,
    InlineOnly,
    Any,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSpec {
    pub kind: String,
    pub role: NodeRole,
    pub is_void: bool,
    pub children: ChildConstraint,
    /// Marks are forbidden inside this node; a normalize pass strips them.
    pub plain_text_only: bool,
}

pub trait NormalizePass: Send + Sync {
    fn id(&self) -> &'static str;
    fn run(&self, doc: &Document, registry: &PluginRegistry) -> Vec<Op>;
}

/// An inline decoration at absolute document positions. Decorations style
/// text without mutating the document and are recomputed per document scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decoration {
    pub from: usize,
    pub to: usize,
    pub class: String,
}

/// Hook invoked with the full document on every decoration scan. Sources
/// return absolute-offset decorations; order between sources is irrelevant.
pub trait DecorationSource: Send + Sync {
    fn id(&self) -> &'static str;
    fn decorations(&self, doc: &Document) -> Vec<Decoration>;
}

pub trait EditorPlugin: Send + Sync {
    fn id(&self) -> &'static str;
    fn node_specs(&self) -> Vec<NodeSpec> {
        Vec::new()
    }
    fn normalize_passes(&self) -> Vec<Box<dyn NormalizePass>> {
        Vec::new()
    }
    fn commands(&self) -> Vec<CommandSpec> {
        Vec::new()
    }
    fn queries(&self) -> Vec<QuerySpec> {
        Vec::new()
    }
    fn decoration_sources(&self) -> Vec<Box<dyn DecorationSource>> {
        Vec::new()
    }
    fn html_rules(&self) -> Vec<HtmlRule> {
        Vec::new()
    }
    fn node_views(&self) -> Vec<NodeViewSpec> {
        Vec::new()
    }
}

#[derive(Default)]
pub struct PluginRegistry {
    node_specs: HashMap<String, NodeSpec>,
    normalize_passes: Vec<Box<dyn NormalizePass>>,
    commands: HashMap<String, CommandSpec>,
    queries: HashMap<String, QuerySpec>,
    decoration_sources: Vec<Box<dyn DecorationSource>>,
    html_rules: Vec<HtmlRule>,
    node_views: HashMap<String, NodeViewSpec>,
}

impl PluginRegistry {
    pub fn new(plugins: impl IntoIterator<Item = Box<dyn EditorPlugin>>) -> Result<Self, String> {
        let mut registry = Self::default();
        for plugin in plugins {
            registry.register_plugin(plugin)?;
        }
        Ok(registry)
    }

    pub fn core() -> Self {
        let plugins: Vec<Box<dyn EditorPlugin>> = vec![
            Box::new(CoreParagraphPlugin),
            Box::new(CoreDividerPlugin),
            Box::new(CoreNormalizePlugin),
            Box::new(CoreTextPlugin),
        ];
        Self::new(plugins).expect("core registry must be valid")
    }

    /// Core plugins plus caller-provided extensions, in registration order.
    pub fn with_extras(
        extras: impl IntoIterator<Item = Box<dyn EditorPlugin>>,
    ) -> Result<Self, String> {
        let mut plugins: Vec<Box<dyn EditorPlugin>> = vec![
            Box::new(CoreParagraphPlugin),
            Box::new(CoreDividerPlugin),
            Box::new(CoreNormalizePlugin),
            Box::new(CoreTextPlugin),
        ];
        plugins.extend(extras);
        Self::new(plugins)
    }

    pub fn register_plugin(&mut self, plugin: Box<dyn EditorPlugin>) -> Result<(), String> {
        for spec in plugin.node_specs() {
            if self.node_specs.contains_key(&spec.kind) {
                return Err(format!("Duplicate node spec kind: {}", spec.kind));
            }
            self.node_specs.insert(spec.kind.clone(), spec);
        }

        self.normalize_passes.extend(plugin.normalize_passes());
        self.decoration_sources.extend(plugin.decoration_sources());
        self.html_rules.extend(plugin.html_rules());

        for view in plugin.node_views() {
            if self.node_views.contains_key(&view.kind) {
                return Err(format!("Duplicate node view kind: {}", view.kind));
            }
            self.node_views.insert(view.kind.clone(), view);
        }

        for cmd in plugin.commands() {
            if self.commands.contains_key(&cmd.id) {
                return Err(format!("Duplicate command id: {}", cmd.id));
            }
            self.commands.insert(cmd.id.clone(), cmd);
        }

        for query in plugin.queries() {
            if self.queries.contains_key(&query.id) {
                return Err(format!("Duplicate query id: {}", query.id));
            }
            self.queries.insert(query.id.clone(), query);
        }

        Ok(())
    }

    pub fn node_specs(&self) -> &HashMap<String, NodeSpec> {
        &self.node_specs
    }

    pub fn node_spec(&self, kind: &str) -> Option<&NodeSpec> {
        self.node_specs.get(kind)
    }

    pub fn commands(&self) -> &HashMap<String, CommandSpec> {
        &self.commands
    }

    pub fn command(&self, id: &str) -> Option<CommandSpec> {
        self.commands.get(id).cloned()
    }

    pub fn query(&self, id: &str) -> Option<QuerySpec> {
        self.queries.get(id).cloned()
    }

    pub fn decoration_sources(&self) -> &[Box<dyn DecorationSource>] {
        &self.decoration_sources
    }

    pub fn html_rules(&self) -> &[HtmlRule] {
        &self.html_rules
    }

    pub fn node_view(&self, kind: &str) -> Option<&NodeViewSpec> {
        self.node_views.get(kind)
    }

    pub fn normalize_passes(&self) -> &[Box<dyn NormalizePass>] {
        &self.normalize_passes
    }

    pub fn normalize(&self, doc: &Document) -> Vec<Op> {
        for pass in &self.normalize_passes {
            let ops = pass.run(doc, self);
            if !ops.is_empty() {
                return ops;
            }
        }
        Vec::new()
    }

    /// Clamps both selection endpoints to valid text positions, descending
    /// into element nodes to their first text leaf.
    pub fn normalize_selection(&self, doc: &Document, selection: &Selection) -> Selection {
        let anchor = resolve_point(doc, &selection.anchor);
        let focus = resolve_point(doc, &selection.focus);
        match (anchor, focus) {
            (Some(anchor), Some(focus)) => Selection { anchor, focus },
            _ => {
                let fallback = first_text_point(doc)
                    .unwrap_or_else(|| Point::new(vec![0, 0], 0));
                Selection::collapsed(fallback)
            }
        }
    }
}

fn resolve_point(doc: &Document, point: &Point) -> Option<Point> {
    let mut path = point.path.clone();
    loop {
        if path.is_empty() {
            return None;
        }
        match node_at_path(doc, &path) {
            Some(Node::Text(t)) => {
                return Some(Point {
                    path,
                    offset: point.offset.min(t.text.len()),
                });
            }
            Some(Node::Element(el)) => {
                return first_text_descendant(&el.children, &mut path);
            }
            Some(Node::Void(_)) | None => {
                // Walk up until something resolves.
                if let Some(last) = path.last_mut() {
                    if *last > 0 {
                        *last -= 1;
                    } else {
                        path.pop();
                    }
                }
            }
        }
    }
}

fn first_text_descendant(children: &[Node], path: &mut Path) -> Option<Point> {
    for (ix, child) in children.iter().enumerate() {
        match child {
            Node::Text(_) => {
                path.push(ix);
                return Some(Point::new(path.clone(), 0));
            }
            Node::Element(el) => {
                path.push(ix);
                if let Some(point) = first_text_descendant(&el.children, path) {
                    return Some(point);
                }
                path.pop();
            }
            Node::Void(_) => {}
        }
    }
    None
}

fn first_text_point(doc: &Document) -> Option<Point> {
    let mut path = Path::new();
    first_text_descendant(&doc.children, &mut path)
}

/// Path of the block containing the selection focus (the focus points at a
/// text leaf, so the block is its parent).
pub fn focused_block_path(selection: &Selection) -> Option<Path> {
    let focus = &selection.focus;
    let (_, parent) = focus.path.split_last()?;
    if parent.is_empty() {
        return None;
    }
    Some(parent.to_vec())
}

pub fn element_is_text_block(
    el: &crate::core::ElementNode,
    registry: &PluginRegistry,
) -> bool {
    match registry.node_spec(&el.kind).map(|s| s.children.clone()) {
        Some(ChildConstraint::InlineOnly) => true,
        Some(_) => false,
        None => el
            .children
            .iter()
            .any(|n| matches!(n, Node::Text(_) | Node::Void(_))),
    }
}

struct CoreParagraphPlugin;

impl EditorPlugin for CoreParagraphPlugin {
    fn id(&self) -> &'static str {
        "core.paragraph"
    }

    fn node_specs(&self) -> Vec<NodeSpec> {
        vec![NodeSpec {
            kind: "paragraph".to_string(),
            role: NodeRole::Block,
            is_void: false,
            children: ChildConstraint::InlineOnly,
            plain_text_only: false,
        }]
    }

    fn html_rules(&self) -> Vec<HtmlRule> {
        vec![crate::html::paragraph_rule()]
    }
}

struct CoreDividerPlugin;

impl EditorPlugin for CoreDividerPlugin {
    fn id(&self) -> &'static str {
        "core.divider"
    }

    fn node_specs(&self) -> Vec<NodeSpec> {
        vec![NodeSpec {
            kind: "divider".to_string(),
            role: NodeRole::Block,
            is_void: true,
            children: ChildConstraint::None,
            plain_text_only: false,
        }]
    }

    fn html_rules(&self) -> Vec<HtmlRule> {
        vec![crate::html::divider_rule()]
    }
}

struct CoreNormalizePlugin;

impl EditorPlugin for CoreNormalizePlugin {
    fn id(&self) -> &'static str {
        "core.normalize"
    }

    fn normalize_passes(&self) -> Vec<Box<dyn NormalizePass>> {
        vec![
            Box::new(EnsureNonEmptyDocument),
            Box::new(EnsureInlineBlocksHaveTextLeaf),
            Box::new(MergeAdjacentTextLeaves),
            Box::new(StripMarksInPlainTextBlocks),
        ]
    }
}

struct EnsureNonEmptyDocument;

impl NormalizePass for EnsureNonEmptyDocument {
    fn id(&self) -> &'static str {
        "core.ensure_non_empty_document"
    }

    fn run(&self, doc: &Document, _registry: &PluginRegistry) -> Vec<Op> {
        if doc.children.is_empty() {
            return vec![Op::InsertNode {
                path: vec![0],
                node: Node::paragraph(""),
            }];
        }
        Vec::new()
    }
}

struct EnsureInlineBlocksHaveTextLeaf;

impl NormalizePass for EnsureInlineBlocksHaveTextLeaf {
    fn id(&self) -> &'static str {
        "core.ensure_inline_only_blocks_have_text_leaf"
    }

    fn run(&self, doc: &Document, registry: &PluginRegistry) -> Vec<Op> {
        let mut ops = Vec::new();

        fn walk(
            children: &[Node],
            path: &mut Path,
            registry: &PluginRegistry,
            ops: &mut Vec<Op>,
        ) {
            for (ix, node) in children.iter().enumerate() {
                let Node::Element(el) = node else {
                    continue;
                };

                path.push(ix);

                let spec_children = registry
                    .node_spec(&el.kind)
                    .map(|s| s.children.clone())
                    .unwrap_or(ChildConstraint::Any);

                if spec_children == ChildConstraint::InlineOnly {
                    let has_text = el.children.iter().any(|n| matches!(n, Node::Text(_)));
                    if !has_text {
                        let mut insert_path = path.clone();
                        insert_path.push(0);
                        ops.push(Op::InsertNode {
                            path: insert_path,
                            node: Node::text(""),
                        });
                    }
                } else {
                    walk(&el.children, path, registry, ops);
                }

                path.pop();
            }
        }

        walk(&doc.children, &mut Vec::new(), registry, &mut ops);
        ops
    }
}

struct MergeAdjacentTextLeaves;

impl NormalizePass for MergeAdjacentTextLeaves {
    fn id(&self) -> &'static str {
        "core.merge_adjacent_text_leaves"
    }

    fn run(&self, doc: &Document, registry: &PluginRegistry) -> Vec<Op> {
        fn find(children: &[Node], path: &mut Path, registry: &PluginRegistry) -> Vec<Op> {
            for (ix, node) in children.iter().enumerate() {
                let Node::Element(el) = node else {
                    continue;
                };
                path.push(ix);

                for pair_ix in 0..el.children.len().saturating_sub(1) {
                    let (Node::Text(left), Node::Text(right)) =
                        (&el.children[pair_ix], &el.children[pair_ix + 1])
                    else {
                        continue;
                    };
                    if left.marks != right.marks {
                        continue;
                    }
                    // Drop an empty right leaf, otherwise fold it into the left.
                    let mut left_path = path.clone();
                    left_path.push(pair_ix);
                    let mut right_path = path.clone();
                    right_path.push(pair_ix + 1);

                    let mut ops = Vec::new();
                    if !right.text.is_empty() {
                        ops.push(Op::InsertText {
                            path: left_path,
                            offset: left.text.len(),
                            text: right.text.clone(),
                        });
                    }
                    ops.push(Op::RemoveNode { path: right_path });
                    path.pop();
                    return ops;
                }

                let ops = find(&el.children, path, registry);
                path.pop();
                if !ops.is_empty() {
                    return ops;
                }
            }
            Vec::new()
        }

        find(&doc.children, &mut Vec::new(), registry)
    }
}

/// Enforces the plain-text invariant for node kinds that forbid marks:
/// any marked text leaf inside them has its marks reset.
struct StripMarksInPlainTextBlocks;

impl NormalizePass for StripMarksInPlainTextBlocks {
    fn id(&self) -> &'static str {
        "core.strip_marks_in_plain_text_blocks"
    }

    fn run(&self, doc: &Document, registry: &PluginRegistry) -> Vec<Op> {
        let mut ops = Vec::new();

        for (ix, node) in doc.children.iter().enumerate() {
            let Node::Element(el) = node else {
                continue;
            };
            let plain = registry
                .node_spec(&el.kind)
                .map(|s| s.plain_text_only)
                .unwrap_or(false);
            if !plain {
                continue;
            }
            for (child_ix, child) in el.children.iter().enumerate() {
                let Node::Text(t) = child else {
                    continue;
                };
                if t.marks.is_plain() {
                    continue;
                }
                ops.push(Op::SetTextMarks {
                    path: vec![ix, child_ix],
                    marks: Marks::default(),
                });
            }
        }

        ops
    }
}

struct CoreTextPlugin;

impl EditorPlugin for CoreTextPlugin {
    fn id(&self) -> &'static str {
        "core.text"
    }

    fn commands(&self) -> Vec<CommandSpec> {
        vec![
            CommandSpec::new("text.insert", "Insert text", |editor, args| {
                let text = args
                    .as_ref()
                    .and_then(|v| v.get("text"))
                    .and_then(|v| v.as_str())
                    .unwrap_or_default()
                    .to_string();
                if text.is_empty() {
                    return Ok(());
                }
                let focus = editor.selection().focus.clone();
                let tx = Transaction::new(vec![Op::InsertText {
                    path: focus.path,
                    offset: focus.offset,
                    text,
                }])
                .source("command:text.insert");
                editor
                    .apply(tx)
                    .map_err(|e| CommandError::new(format!("Failed to insert text: {e:?}")))
            })
            .description("Insert text at the focus point.")
            .args_example(serde_json::json!({ "text": "hello" })),
            CommandSpec::new("text.delete_range", "Delete text range", |editor, args| {
                let from = args
                    .as_ref()
                    .and_then(|v| v.get("from"))
                    .and_then(|v| v.as_u64())
                    .unwrap_or(0) as usize;
                let to = args
                    .as_ref()
                    .and_then(|v| v.get("to"))
                    .and_then(|v| v.as_u64())
                    .unwrap_or(0) as usize;
                if to <= from {
                    return Ok(());
                }
                let focus = editor.selection().focus.clone();
                let tx = Transaction::new(vec![Op::RemoveText {
                    path: focus.path,
                    range: from..to,
                }])
                .source("command:text.delete_range");
                editor
                    .apply(tx)
                    .map_err(|e| CommandError::new(format!("Failed to delete text: {e:?}")))
            })
            .description("Delete a byte range of the focused text leaf.")
            .args_example(serde_json::json!({ "from": 0, "to": 3 })),
        ]
    }
}
