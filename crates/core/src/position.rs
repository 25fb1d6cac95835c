//! Absolute document positions.
//!
//! Elements occupy one position for each boundary (open and close), text
//! leaves occupy their byte length, voids occupy one position. Decoration
//! sources translate block-local offsets by adding the block's start
//! position plus one for the opening boundary.

use crate::core::{Document, ElementNode, Node};

pub fn node_size(node: &Node) -> usize {
    match node {
        Node::Text(t) => t.text.len(),
        Node::Void(_) => 1,
        Node::Element(el) => 2 + el.children.iter().map(node_size).sum::<usize>(),
    }
}

/// Visits every element in document order with its absolute start position.
pub fn visit_elements<'a>(doc: &'a Document, mut f: impl FnMut(&'a ElementNode, usize)) {
    fn walk<'a>(
        children: &'a [Node],
        mut pos: usize,
        f: &mut impl FnMut(&'a ElementNode, usize),
    ) -> usize {
        for node in children {
            match node {
                Node::Element(el) => {
                    f(el, pos);
                    let inner_end = walk(&el.children, pos + 1, f);
                    pos = inner_end + 1;
                }
                other => pos += node_size(other),
            }
        }
        pos
    }

    walk(&doc.children, 0, &mut f);
}
