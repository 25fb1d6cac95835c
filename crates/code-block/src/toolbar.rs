//! The embedded toolbar rendered inside each code block view.
//!
//! The toolbar subtree is view-owned; the host never observes it as
//! content (see the view's boundary predicates). The picker and copy
//! button are built once and updated in place on later renders, so
//! repeated language changes do not grow the view's arena.

use vellum_core::{Dom, DomId};
use vellum_highlight::languages;

use crate::config::CodeBlockConfig;

pub struct LanguageToolbar {
    container: DomId,
    select: Option<DomId>,
}

impl LanguageToolbar {
    pub fn new(container: DomId) -> Self {
        Self {
            container,
            select: None,
        }
    }

    pub fn container(&self) -> DomId {
        self.container
    }

    /// Builds the picker and the copy affordance on the first call and
    /// re-marks the selected option on later calls. The copy button's DOM
    /// id carries the pre element's id so a clipboard handler can look up
    /// the text out of band.
    pub fn render(&mut self, dom: &mut Dom, config: &CodeBlockConfig, language: &str, pre_id: &str) {
        let select = match self.select {
            Some(select) => select,
            None => self.mount(dom, config, pre_id),
        };

        for (ix, lang) in languages().iter().enumerate() {
            let option = dom.children(select)[ix];
            let mut classes = vec![format!("lang-{}", lang.id)];
            if lang.id.eq_ignore_ascii_case(language) {
                classes.push("is-selected".to_string());
            }
            dom.set_classes(option, classes);
        }
    }

    fn mount(&mut self, dom: &mut Dom, config: &CodeBlockConfig, pre_id: &str) -> DomId {
        let select = dom.create_element("select");
        dom.add_class(select, format!("{}-language-select", config.class_prefix));
        for lang in languages() {
            let option = dom.create_element("option");
            dom.set_text(option, lang.name);
            dom.append_child(select, option);
        }
        dom.append_child(self.container, select);

        let copy = dom.create_element("button");
        dom.add_class(copy, format!("{}-copy", config.class_prefix));
        dom.set_dom_id(copy, format!("{pre_id}-copy"));
        dom.set_text(copy, "Copy");
        dom.append_child(self.container, copy);

        self.select = Some(select);
        select
    }

    pub fn unmount(&mut self, dom: &mut Dom) {
        dom.clear_children(self.container);
        self.select = None;
    }
}
