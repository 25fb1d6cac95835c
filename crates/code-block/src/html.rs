use std::sync::Arc;

use vellum_core::{ElementNode, HtmlRule, Node, escape};

use crate::config::CodeBlockConfig;
use crate::plugin::CODE_BLOCK_KIND;

/// Serialization rule for code blocks: `<pre class="language-<id>"><code>`
/// out, any `pre` container in. The language round-trips through the class
/// prefix convention and falls back to the configured default when no
/// matching class is present.
pub fn code_block_rule(config: CodeBlockConfig) -> HtmlRule {
    let render_config = config.clone();
    HtmlRule {
        kind: CODE_BLOCK_KIND.to_string(),
        tag: "pre".to_string(),
        render: Arc::new(move |el: &ElementNode| {
            let mut open = String::from("<pre");
            if let Some(language) = el.attr_str("language") {
                if !language.is_empty() {
                    open.push_str(&format!(
                        " class=\"{}\"",
                        render_config.language_class(language)
                    ));
                }
            }
            open.push('>');
            format!("{open}<code>{}</code></pre>", escape(&el.text_content()))
        }),
        parse: Arc::new(move |parsed| {
            let language = parsed
                .classes
                .iter()
                .find_map(|class| class.strip_prefix(&config.language_class_prefix))
                .unwrap_or(&config.default_language)
                .to_string();
            Some(Node::Element(ElementNode {
                kind: CODE_BLOCK_KIND.to_string(),
                attrs: crate::plugin::code_block_attrs(language),
                children: vec![Node::text(parsed.text.clone())],
            }))
        }),
    }
}
