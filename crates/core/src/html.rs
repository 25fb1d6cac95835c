//! HTML serialization for documents.
//!
//! Each plugin contributes [`HtmlRule`]s pairing a node kind with a render
//! function and a parse function for the tag it serializes to. Round-trips
//! go through `scraper` for parsing and `html-escape` for emitting text.

use std::sync::Arc;

use scraper::{ElementRef, Html};

use crate::core::{Document, ElementNode, Node};
use crate::plugin::PluginRegistry;

/// An element as seen by a parse rule: tag name, class list, and the
/// flattened text content of the subtree.
#[derive(Debug, Clone)]
pub struct ParsedTag {
    pub tag: String,
    pub classes: Vec<String>,
    pub text: String,
}

#[derive(Clone)]
pub struct HtmlRule {
    pub kind: String,
    pub tag: String,
    pub render: Arc<dyn Fn(&ElementNode) -> String + Send + Sync>,
    pub parse: Arc<dyn Fn(&ParsedTag) -> Option<Node> + Send + Sync>,
}

pub fn render_document(doc: &Document, registry: &PluginRegistry) -> String {
    let mut out = String::new();
    for node in &doc.children {
        match node {
            Node::Element(el) => {
                if let Some(rule) = rule_for_kind(registry, &el.kind) {
                    out.push_str(&(rule.render)(el));
                } else {
                    out.push_str("<div>");
                    out.push_str(&escape(&el.text_content()));
                    out.push_str("</div>");
                }
            }
            Node::Void(v) => {
                if let Some(rule) = rule_for_kind(registry, &v.kind) {
                    // Void rules render from an empty element shell.
                    let shell = ElementNode {
                        kind: v.kind.clone(),
                        attrs: v.attrs.clone(),
                        children: Vec::new(),
                    };
                    out.push_str(&(rule.render)(&shell));
                }
            }
            Node::Text(t) => out.push_str(&escape(&t.text)),
        }
    }
    out
}

pub fn parse_document(html: &str, registry: &PluginRegistry) -> Document {
    let fragment = Html::parse_fragment(html);
    let mut children = Vec::new();

    for element in top_level_elements(&fragment) {
        let tag = element.value().name().to_string();
        let classes: Vec<String> = element
            .value()
            .classes()
            .map(|c| c.to_string())
            .collect();
        let text: String = element.text().collect();
        let parsed = ParsedTag { tag, classes, text };

        let node = registry
            .html_rules()
            .iter()
            .filter(|rule| rule.tag == parsed.tag)
            .find_map(|rule| (rule.parse)(&parsed))
            .unwrap_or_else(|| Node::paragraph(parsed.text.clone()));
        children.push(node);
    }

    Document { children }
}

fn top_level_elements(fragment: &Html) -> Vec<ElementRef<'_>> {
    let root = fragment.root_element();
    root.children().filter_map(ElementRef::wrap).collect()
}

fn rule_for_kind<'a>(registry: &'a PluginRegistry, kind: &str) -> Option<&'a HtmlRule> {
    registry.html_rules().iter().find(|rule| rule.kind == kind)
}

pub fn escape(text: &str) -> String {
    html_escape::encode_text(text).into_owned()
}

pub(crate) fn paragraph_rule() -> HtmlRule {
    HtmlRule {
        kind: "paragraph".to_string(),
        tag: "p".to_string(),
        render: Arc::new(|el| format!("<p>{}</p>", escape(&el.text_content()))),
        parse: Arc::new(|parsed| Some(Node::paragraph(parsed.text.clone()))),
    }
}

pub(crate) fn divider_rule() -> HtmlRule {
    HtmlRule {
        kind: "divider".to_string(),
        tag: "hr".to_string(),
        render: Arc::new(|_| "<hr>".to_string()),
        parse: Arc::new(|_| Some(Node::divider())),
    }
}
