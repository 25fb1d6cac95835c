//! A headless element tree for node views.
//!
//! Views own DOM subtrees next to host-owned content subtrees; the host's
//! mutation observer and event routing consult the view's boundary
//! predicates with [`DomId`]s and [`DomMutation`]s from this arena.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DomId(usize);

#[derive(Debug, Clone)]
pub struct DomNode {
    pub tag: String,
    pub dom_id: Option<String>,
    pub classes: Vec<String>,
    pub text: String,
    children: Vec<DomId>,
    parent: Option<DomId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    ChildList,
    Attributes,
    CharacterData,
}

/// One observed DOM mutation, as the host's observer would report it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DomMutation {
    pub target: DomId,
    pub kind: MutationKind,
}

#[derive(Debug, Default)]
pub struct Dom {
    nodes: Vec<DomNode>,
}

impl Dom {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_element(&mut self, tag: impl Into<String>) -> DomId {
        let id = DomId(self.nodes.len());
        self.nodes.push(DomNode {
            tag: tag.into(),
            dom_id: None,
            classes: Vec::new(),
            text: String::new(),
            children: Vec::new(),
            parent: None,
        });
        id
    }

    pub fn append_child(&mut self, parent: DomId, child: DomId) {
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// Detaches all children. Detached subtrees stay in the arena but are
    /// unreachable from any root.
    pub fn clear_children(&mut self, parent: DomId) {
        let children = std::mem::take(&mut self.nodes[parent.0].children);
        for child in children {
            self.nodes[child.0].parent = None;
        }
    }

    pub fn set_dom_id(&mut self, node: DomId, value: impl Into<String>) {
        self.nodes[node.0].dom_id = Some(value.into());
    }

    pub fn set_text(&mut self, node: DomId, text: impl Into<String>) {
        self.nodes[node.0].text = text.into();
    }

    pub fn add_class(&mut self, node: DomId, class: impl Into<String>) {
        let class = class.into();
        let classes = &mut self.nodes[node.0].classes;
        if !classes.contains(&class) {
            classes.push(class);
        }
    }

    pub fn remove_class(&mut self, node: DomId, class: &str) {
        self.nodes[node.0].classes.retain(|c| c != class);
    }

    pub fn set_classes(&mut self, node: DomId, classes: Vec<String>) {
        self.nodes[node.0].classes = classes;
    }

    pub fn tag(&self, node: DomId) -> &str {
        &self.nodes[node.0].tag
    }

    pub fn dom_id(&self, node: DomId) -> Option<&str> {
        self.nodes[node.0].dom_id.as_deref()
    }

    pub fn classes(&self, node: DomId) -> &[String] {
        &self.nodes[node.0].classes
    }

    pub fn has_class(&self, node: DomId, class: &str) -> bool {
        self.nodes[node.0].classes.iter().any(|c| c == class)
    }

    pub fn children(&self, node: DomId) -> &[DomId] {
        &self.nodes[node.0].children
    }

    pub fn parent(&self, node: DomId) -> Option<DomId> {
        self.nodes[node.0].parent
    }

    pub fn element_by_id(&self, dom_id: &str) -> Option<DomId> {
        self.nodes
            .iter()
            .position(|n| n.dom_id.as_deref() == Some(dom_id))
            .map(DomId)
    }

    /// Concatenated text of the subtree, document order.
    pub fn text_content(&self, node: DomId) -> String {
        let mut out = String::new();
        self.collect_text(node, &mut out);
        out
    }

    fn collect_text(&self, node: DomId, out: &mut String) {
        out.push_str(&self.nodes[node.0].text);
        for &child in &self.nodes[node.0].children {
            self.collect_text(child, out);
        }
    }

    /// True when `node` is `ancestor` or lies inside its subtree.
    pub fn contains(&self, ancestor: DomId, node: DomId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.nodes[id.0].parent;
        }
        false
    }
}
