/// One node of a token tree.
///
/// The tree is normalized at construction: a typed token always holds a
/// list of children, never a bare string or a single unwrapped token, so
/// consumers branch on exactly two shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// An untyped span. Never decorated on its own; its classification, if
    /// any, comes from enclosing typed ancestors.
    Leaf(String),
    Typed {
        kind: String,
        children: Vec<Token>,
    },
}

impl Token {
    pub fn leaf(text: impl Into<String>) -> Self {
        Token::Leaf(text.into())
    }

    pub fn typed(kind: impl Into<String>, children: Vec<Token>) -> Self {
        Token::Typed {
            kind: kind.into(),
            children,
        }
    }

    /// A typed token over a plain string, the most common grammar output.
    pub fn typed_text(kind: impl Into<String>, text: impl Into<String>) -> Self {
        Token::Typed {
            kind: kind.into(),
            children: vec![Token::Leaf(text.into())],
        }
    }

    /// Total byte length of all leaf text in this subtree.
    pub fn text_len(&self) -> usize {
        match self {
            Token::Leaf(text) => text.len(),
            Token::Typed { children, .. } => children.iter().map(Token::text_len).sum(),
        }
    }
}

pub fn tokens_text_len(tokens: &[Token]) -> usize {
    tokens.iter().map(Token::text_len).sum()
}
