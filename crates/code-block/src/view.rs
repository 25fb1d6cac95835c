//! The per-node view for code blocks.
//!
//! Each view owns a DOM arena holding wrapper, toolbar, and pre/code
//! elements. The toolbar subtree is view-owned and opaque to the host;
//! the code element is the host-owned content region. Language changes
//! patch the live DOM in place, anything structural forces recreation.

use serde_json::json;
use uuid::Uuid;
use vellum_core::{
    CommandError, Dom, DomId, DomMutation, Editor, ElementNode, Node, NodeView, Path, Point,
    Selection, node_at_path,
};

use crate::config::CodeBlockConfig;
use crate::toolbar::LanguageToolbar;

/// Outcome of reconciling the view against a fresh node snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewPatch {
    /// Same kind and language. Text sync is the host's job.
    Unchanged,
    /// Same kind, new language. Toolbar re-rendered and classes swapped.
    Patched,
    /// Different kind. The host must tear this view down and rebuild.
    Recreate,
}

pub struct CodeBlockView {
    node: ElementNode,
    path: Path,
    config: CodeBlockConfig,
    dom: Dom,
    root: DomId,
    toolbar: LanguageToolbar,
    pre: DomId,
    code: DomId,
    pre_id: String,
}

impl CodeBlockView {
    pub fn new(node: &ElementNode, path: Path) -> Self {
        Self::with_config(node, path, CodeBlockConfig::default())
    }

    pub fn with_config(node: &ElementNode, path: Path, config: CodeBlockConfig) -> Self {
        let mut dom = Dom::new();

        let root = dom.create_element("div");
        dom.add_class(root, config.class_prefix.clone());

        let toolbar_el = dom.create_element("div");
        dom.add_class(toolbar_el, format!("{}-toolbar", config.class_prefix));
        dom.append_child(root, toolbar_el);

        let pre = dom.create_element("pre");
        let pre_id = format!("code-{}", Uuid::new_v4());
        dom.set_dom_id(pre, pre_id.clone());

        let code = dom.create_element("code");
        dom.set_text(code, node.text_content());
        dom.append_child(pre, code);
        dom.append_child(root, pre);

        let mut view = Self {
            node: node.clone(),
            path,
            config,
            dom,
            root,
            toolbar: LanguageToolbar::new(toolbar_el),
            pre,
            code,
            pre_id,
        };
        view.set_language_class(&view.language().to_string());
        view.render_toolbar();
        view
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current language, falling back to the configured default when the
    /// attribute is absent. Unregistered languages are kept as-is.
    pub fn language(&self) -> &str {
        self.node
            .attr_str("language")
            .unwrap_or(&self.config.default_language)
    }

    /// Stable element id of the pre element, for out-of-band text lookup.
    pub fn pre_element_id(&self) -> &str {
        &self.pre_id
    }

    /// Text a clipboard affordance would read via [`Self::pre_element_id`].
    pub fn copy_text(&self) -> String {
        self.dom.text_content(self.pre)
    }

    pub fn content_element(&self) -> DomId {
        self.code
    }

    /// True when `target` lies inside the view-owned toolbar region.
    pub fn owns(&self, target: DomId) -> bool {
        self.dom.contains(self.toolbar.container(), target)
    }

    /// Toolbar change callback: moves the selection onto this view's own
    /// block, routes the new language through the command, then patches
    /// the local DOM without waiting for the host's next sync pass. The
    /// selection move pins the command to the bound node even when the
    /// user's selection sits in another block.
    pub fn apply_language_change(
        &mut self,
        editor: &mut Editor,
        language: &str,
    ) -> Result<(), CommandError> {
        match node_at_path(editor.doc(), &self.path) {
            Some(Node::Element(el)) if el.kind == self.node.kind => {}
            _ => {
                return Err(CommandError::new(
                    "View is no longer bound to a code block",
                ));
            }
        }
        let mut focus = self.path.clone();
        focus.push(0);
        editor.set_selection(Selection::collapsed(Point::new(focus, 0)));
        editor.run_command("code_block.set_language", Some(json!({ "language": language })))?;
        self.node
            .attrs
            .insert("language".to_string(), json!(language));
        self.set_language_class(language);
        self.render_toolbar();
        Ok(())
    }

    pub fn apply_update(&mut self, node: &Node) -> ViewPatch {
        let Node::Element(el) = node else {
            return ViewPatch::Recreate;
        };
        if el.kind != self.node.kind {
            tracing::debug!(from = %self.node.kind, to = %el.kind, "code block view outdated");
            return ViewPatch::Recreate;
        }

        let language_changed = el.attr_str("language") != self.node.attr_str("language");
        self.node = el.clone();
        self.dom.set_text(self.code, self.node.text_content());

        if language_changed {
            let language = self.language().to_string();
            self.set_language_class(&language);
            self.render_toolbar();
            ViewPatch::Patched
        } else {
            ViewPatch::Unchanged
        }
    }

    fn render_toolbar(&mut self) {
        let language = self.language().to_string();
        self.toolbar
            .render(&mut self.dom, &self.config, &language, &self.pre_id);
    }

    fn set_language_class(&mut self, language: &str) {
        let stale: Vec<String> = self
            .dom
            .classes(self.pre)
            .iter()
            .filter(|c| c.starts_with(&self.config.language_class_prefix))
            .cloned()
            .collect();
        for class in stale {
            self.dom.remove_class(self.pre, &class);
        }
        self.dom
            .add_class(self.pre, self.config.language_class(language));
    }
}

impl NodeView for CodeBlockView {
    fn dom(&self) -> &Dom {
        &self.dom
    }

    fn root(&self) -> DomId {
        self.root
    }

    fn update(&mut self, node: &Node) -> bool {
        self.apply_update(node) != ViewPatch::Recreate
    }

    fn destroy(&mut self) {
        self.toolbar.unmount(&mut self.dom);
    }

    fn stop_event(&self, target: DomId) -> bool {
        self.owns(target)
    }

    fn ignore_mutation(&self, mutation: &DomMutation) -> bool {
        self.owns(mutation.target)
    }
}
