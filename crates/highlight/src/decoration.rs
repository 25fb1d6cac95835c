//! Converts one block's token tree into flat styling ranges.

use crate::token::Token;

/// A styling range over one code block's text, in block-local byte
/// offsets. Ranges come out non-overlapping and ascending in `from`;
/// unclassified text is left uncovered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecorationRange {
    pub from: usize,
    pub to: usize,
    pub class: String,
}

/// Depth-first walk with a running offset. Leaves under at least one typed
/// ancestor emit one range classed `"token <kinds...>"`; bare leaves only
/// advance the offset; typed wrappers emit nothing themselves. The walk is
/// inherently ordered, so no sorting pass runs afterwards.
pub fn build_decorations(tokens: &[Token]) -> Vec<DecorationRange> {
    let mut out = Vec::new();
    let mut chain: Vec<&str> = Vec::new();
    let mut offset = 0usize;
    walk(tokens, &mut chain, &mut offset, &mut out);
    out
}

fn walk<'a>(
    tokens: &'a [Token],
    chain: &mut Vec<&'a str>,
    offset: &mut usize,
    out: &mut Vec<DecorationRange>,
) {
    for token in tokens {
        match token {
            Token::Leaf(text) => {
                let len = text.len();
                if !chain.is_empty() && len > 0 {
                    out.push(DecorationRange {
                        from: *offset,
                        to: *offset + len,
                        class: class_name(chain),
                    });
                }
                *offset += len;
            }
            Token::Typed { kind, children } => {
                chain.push(kind);
                walk(children, chain, offset, out);
                chain.pop();
            }
        }
    }
}

fn class_name(chain: &[&str]) -> String {
    format!("token {}", chain.join(" "))
}
