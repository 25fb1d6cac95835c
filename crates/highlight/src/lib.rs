//! Syntax highlighting for code blocks: a language registry, a tokenizer
//! adapter over syntect, and a decoration builder turning token trees into
//! flat class-tagged ranges.

mod decoration;
mod registry;
mod token;
mod tokenize;

pub use crate::decoration::{DecorationRange, build_decorations};
pub use crate::registry::{DEFAULT_LANGUAGE, Language, display_name, is_registered, languages, lookup};
pub use crate::token::{Token, tokens_text_len};
pub use crate::tokenize::tokenize;
