//! The node view contract and the view host.
//!
//! A node view bridges one document node to a live DOM subtree. The host
//! owns the content region of that subtree; the view owns everything else
//! and declares its region through the boundary predicates so host event
//! routing and mutation observation leave it alone.

use std::collections::HashMap;
use std::sync::Arc;

use crate::core::{Editor, ElementNode, Node};
use crate::dom::{Dom, DomId, DomMutation};
use crate::ops::Path;

pub trait NodeView: Send {
    fn dom(&self) -> &Dom;
    fn root(&self) -> DomId;

    /// Reconciles the view with a new node snapshot. Returning `false`
    /// means the view cannot patch itself and must be torn down and
    /// recreated by the host.
    fn update(&mut self, node: &Node) -> bool;

    fn destroy(&mut self) {}

    /// True for events the host input handling must not see, e.g. clicks
    /// inside a view-owned toolbar.
    fn stop_event(&self, target: DomId) -> bool {
        let _ = target;
        false
    }

    /// True for DOM mutations the host observer must not mistake for
    /// user-typed content.
    fn ignore_mutation(&self, mutation: &DomMutation) -> bool {
        let _ = mutation;
        false
    }
}

#[derive(Clone)]
pub struct NodeViewSpec {
    pub kind: String,
    pub factory: Arc<dyn Fn(&ElementNode, Path) -> Box<dyn NodeView> + Send + Sync>,
}

/// Arena of live views keyed by block path. After every transaction the
/// host calls [`ViewHost::sync`]; views that report they cannot patch are
/// destroyed and recreated in place.
#[derive(Default)]
pub struct ViewHost {
    views: HashMap<Path, Box<dyn NodeView>>,
}

impl ViewHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sync(&mut self, editor: &Editor) {
        let doc = editor.doc();
        let registry = editor.registry();
        let mut live: Vec<Path> = Vec::new();

        for (ix, node) in doc.children.iter().enumerate() {
            let Node::Element(el) = node else {
                continue;
            };
            let Some(spec) = registry.node_view(&el.kind) else {
                continue;
            };
            let path: Path = vec![ix];
            live.push(path.clone());

            let needs_create = match self.views.get_mut(&path) {
                Some(view) => {
                    if view.update(node) {
                        false
                    } else {
                        tracing::debug!(kind = %el.kind, ?path, "recreating node view");
                        view.destroy();
                        true
                    }
                }
                None => true,
            };
            if needs_create {
                self.views.insert(path.clone(), (spec.factory)(el, path));
            }
        }

        // Views whose block disappeared (or changed to an unviewed kind).
        let stale: Vec<Path> = self
            .views
            .keys()
            .filter(|path| !live.contains(path))
            .cloned()
            .collect();
        for path in stale {
            if let Some(mut view) = self.views.remove(&path) {
                view.destroy();
            }
        }
    }

    pub fn view(&self, path: &[usize]) -> Option<&dyn NodeView> {
        self.views.get(path).map(|v| v.as_ref())
    }

    pub fn view_mut(&mut self, path: &[usize]) -> Option<&mut Box<dyn NodeView>> {
        self.views.get_mut(path)
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}
