//! Syntax-highlighted code blocks for vellum documents.
//!
//! Registers the `code_block` node with its commands and queries, a
//! decoration source that feeds tokenizer output back to the editor as
//! inline style ranges, pre/code HTML serialization carrying the
//! language, and a node view with an embedded language toolbar.

mod config;
mod decorations;
mod html;
mod plugin;
mod toolbar;
mod view;

pub use config::CodeBlockConfig;
pub use decorations::SyntaxDecorationSource;
pub use html::code_block_rule;
pub use plugin::{CODE_BLOCK_KIND, CodeBlockPlugin};
pub use toolbar::LanguageToolbar;
pub use view::{CodeBlockView, ViewPatch};
