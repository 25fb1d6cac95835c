//! The decoration provider for code blocks.
//!
//! Runs on every document scan: each code block's text is tokenized under
//! its language and the block-local ranges are shifted to absolute
//! positions (block start plus one for the opening boundary). One token
//! tree per block; blocks are never tokenized together.

use vellum_core::{Decoration, DecorationSource, Document, visit_elements};
use vellum_highlight::{build_decorations, tokenize};

use crate::config::CodeBlockConfig;
use crate::plugin::CODE_BLOCK_KIND;

pub struct SyntaxDecorationSource {
    config: CodeBlockConfig,
}

impl SyntaxDecorationSource {
    pub fn new(config: CodeBlockConfig) -> Self {
        Self { config }
    }
}

impl DecorationSource for SyntaxDecorationSource {
    fn id(&self) -> &'static str {
        "code_block.syntax"
    }

    fn decorations(&self, doc: &Document) -> Vec<Decoration> {
        let mut out = Vec::new();

        visit_elements(doc, |el, pos| {
            if el.kind != CODE_BLOCK_KIND {
                return;
            }
            let language = el
                .attr_str("language")
                .unwrap_or(&self.config.default_language);
            let content = el.text_content();
            if content.is_empty() {
                return;
            }
            // Unregistered language: no highlighting, plain text still renders.
            let Some(tokens) = tokenize(&content, language) else {
                return;
            };
            for range in build_decorations(&tokens) {
                out.push(Decoration {
                    from: pos + 1 + range.from,
                    to: pos + 1 + range.to,
                    class: range.class,
                });
            }
        });

        out
    }
}
