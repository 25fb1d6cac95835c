//! The tokenizer adapter.
//!
//! Wraps the syntect parser: source text is lexed line by line, the scope
//! ops are replayed into flat spans tagged with their mapped kind chains,
//! and the spans fold into the nested [`Token`] tree by grouping on shared
//! leading kinds. Pure per call; the grammar set is a shared read-only
//! global.

use syntect::parsing::{ParseState, ScopeStack, SyntaxReference};
use syntect::util::LinesWithEndings;
use thiserror::Error;

use crate::registry::{self, SYNTAX_SET};
use crate::token::Token;

#[derive(Debug, Error)]
enum TokenizeError {
    #[error(transparent)]
    Parse(#[from] syntect::parsing::ParsingError),
    #[error(transparent)]
    Scope(#[from] syntect::parsing::ScopeError),
}

/// Tokenizes `text` under the grammar registered for `language_id`.
///
/// Returns `None` when the language is not registered (no highlighting
/// available, not an error). Empty input yields an empty token list. A
/// registered language with no bundled grammar, or any parser failure,
/// yields the whole text as a single untyped token. Never panics.
pub fn tokenize(text: &str, language_id: &str) -> Option<Vec<Token>> {
    let language = registry::lookup(language_id)?;
    if text.is_empty() {
        return Some(Vec::new());
    }
    let Some(syntax) = SYNTAX_SET.find_syntax_by_token(language.grammar) else {
        return Some(vec![Token::leaf(text)]);
    };
    match tokenize_with(text, syntax) {
        Ok(tokens) => Some(tokens),
        Err(err) => {
            tracing::debug!(language = language.id, %err, "tokenizer fell back to plain text");
            Some(vec![Token::leaf(text)])
        }
    }
}

/// A contiguous run of text with the token-kind chain in effect over it.
struct Span {
    text: String,
    kinds: Vec<String>,
}

fn tokenize_with(text: &str, syntax: &SyntaxReference) -> Result<Vec<Token>, TokenizeError> {
    let mut parse_state = ParseState::new(syntax);
    let mut stack = ScopeStack::new();
    let mut spans: Vec<Span> = Vec::new();

    for line in LinesWithEndings::from(text) {
        let ops = parse_state.parse_line(line, &SYNTAX_SET)?;
        let mut last = 0;
        for (offset, op) in ops {
            if offset > last {
                push_span(&mut spans, &line[last..offset], &stack);
                last = offset;
            }
            stack.apply(&op)?;
        }
        if last < line.len() {
            push_span(&mut spans, &line[last..], &stack);
        }
    }

    Ok(fold_spans(&spans, 0))
}

fn push_span(spans: &mut Vec<Span>, text: &str, stack: &ScopeStack) {
    if text.is_empty() {
        return;
    }
    let kinds = kind_chain(stack);
    // Merge with the previous span when the chain is unchanged.
    if let Some(last) = spans.last_mut() {
        if last.kinds == kinds {
            last.text.push_str(text);
            return;
        }
    }
    spans.push(Span {
        text: text.to_string(),
        kinds,
    });
}

/// Scope prefixes mapped to token kinds, checked at atom boundaries with
/// the longest matching prefix winning. Scopes without a mapping are
/// transparent: they contribute no tree level and no styling.
const SCOPE_KINDS: &[(&str, &str)] = &[
    ("comment", "comment"),
    ("string", "string"),
    ("constant.numeric", "number"),
    ("constant.language", "boolean"),
    ("constant.character", "char"),
    ("constant", "constant"),
    ("storage.type", "keyword"),
    ("storage.modifier", "keyword"),
    ("storage", "keyword"),
    ("keyword.operator", "operator"),
    ("keyword", "keyword"),
    ("entity.name.function", "function"),
    ("entity.name.type", "class-name"),
    ("entity.name.class", "class-name"),
    ("entity.name.tag", "tag"),
    ("entity.other.attribute-name", "attr-name"),
    ("support.function", "function"),
    ("support.class", "class-name"),
    ("support.type", "class-name"),
    ("support.constant", "builtin"),
    ("variable.parameter", "parameter"),
    ("variable.function", "function"),
    ("punctuation", "punctuation"),
    ("invalid", "invalid"),
];

fn kind_for_scope(scope: &str) -> Option<&'static str> {
    let mut best: Option<(&str, &str)> = None;
    for &(prefix, kind) in SCOPE_KINDS {
        let matches = scope == prefix
            || (scope.starts_with(prefix) && scope.as_bytes().get(prefix.len()) == Some(&b'.'));
        if matches && best.is_none_or(|(b, _)| prefix.len() > b.len()) {
            best = Some((prefix, kind));
        }
    }
    best.map(|(_, kind)| kind)
}

fn kind_chain(stack: &ScopeStack) -> Vec<String> {
    let mut kinds: Vec<String> = Vec::new();
    for scope in stack.as_slice() {
        let name = scope.build_string();
        if let Some(kind) = kind_for_scope(&name) {
            if kinds.last().map(String::as_str) != Some(kind) {
                kinds.push(kind.to_string());
            }
        }
    }
    kinds
}

/// Folds flat spans into the nested tree: consecutive spans sharing the
/// same kind at `depth` become one typed token whose children are the fold
/// of the remainder of their chains.
fn fold_spans(spans: &[Span], depth: usize) -> Vec<Token> {
    let mut out = Vec::new();
    let mut ix = 0;

    while ix < spans.len() {
        if spans[ix].kinds.len() <= depth {
            let mut text = spans[ix].text.clone();
            ix += 1;
            while ix < spans.len() && spans[ix].kinds.len() <= depth {
                text.push_str(&spans[ix].text);
                ix += 1;
            }
            out.push(Token::Leaf(text));
        } else {
            let kind = spans[ix].kinds[depth].clone();
            let start = ix;
            while ix < spans.len()
                && spans[ix].kinds.len() > depth
                && spans[ix].kinds[depth] == kind
            {
                ix += 1;
            }
            out.push(Token::Typed {
                kind,
                children: fold_spans(&spans[start..ix], depth + 1),
            });
        }
    }

    out
}
