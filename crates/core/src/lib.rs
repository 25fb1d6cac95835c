mod core;
mod dom;
mod html;
mod ops;
mod plugin;
mod position;
mod value;
mod view;

pub use crate::core::*;
pub use crate::dom::*;
pub use crate::html::{HtmlRule, ParsedTag, escape, parse_document, render_document};
pub use crate::ops::*;
pub use crate::plugin::*;
pub use crate::position::*;
pub use crate::value::*;
pub use crate::view::*;
