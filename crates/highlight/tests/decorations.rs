use pretty_assertions::assert_eq;
use vellum_highlight::{DecorationRange, Token, build_decorations, tokens_text_len};

#[test]
fn untyped_leaves_emit_nothing() {
    let tokens = vec![Token::leaf("plain text only")];
    assert_eq!(build_decorations(&tokens), Vec::new());
}

#[test]
fn typed_tokens_emit_ranges_at_running_offsets() {
    let tokens = vec![
        Token::typed_text("keyword", "const"),
        Token::leaf(" x = "),
        Token::typed_text("number", "1"),
        Token::typed_text("punctuation", ";"),
    ];
    assert_eq!(
        build_decorations(&tokens),
        vec![
            DecorationRange {
                from: 0,
                to: 5,
                class: "token keyword".to_string(),
            },
            DecorationRange {
                from: 10,
                to: 11,
                class: "token number".to_string(),
            },
            DecorationRange {
                from: 11,
                to: 12,
                class: "token punctuation".to_string(),
            },
        ]
    );
}

#[test]
fn nested_tokens_compound_their_class_names() {
    let tokens = vec![Token::typed(
        "string",
        vec![
            Token::leaf("\"a "),
            Token::typed(
                "interpolation",
                vec![Token::typed_text("punctuation", "${")],
            ),
            Token::leaf("\""),
        ],
    )];
    let ranges = build_decorations(&tokens);
    assert_eq!(ranges.len(), 3);
    assert_eq!(ranges[0].class, "token string");
    assert_eq!(ranges[1].class, "token string interpolation punctuation");
    assert_eq!(ranges[2].class, "token string");
}

#[test]
fn wrapper_tokens_emit_no_range_of_their_own() {
    let tokens = vec![Token::typed(
        "function",
        vec![Token::typed_text("identifier", "main")],
    )];
    let ranges = build_decorations(&tokens);
    assert_eq!(ranges.len(), 1);
    assert_eq!(ranges[0].from, 0);
    assert_eq!(ranges[0].to, 4);
    assert_eq!(ranges[0].class, "token function identifier");
}

#[test]
fn ranges_tile_without_overlap_and_cover_all_typed_text() {
    let tokens = vec![
        Token::leaf("a"),
        Token::typed_text("keyword", "bb"),
        Token::typed(
            "string",
            vec![Token::leaf("cc"), Token::typed_text("escape", "\\n")],
        ),
        Token::leaf("d"),
    ];
    let ranges = build_decorations(&tokens);
    let total = tokens_text_len(&tokens);

    let mut last_to = 0;
    for range in &ranges {
        assert!(range.from >= last_to, "ranges overlap or regress");
        assert!(range.to > range.from);
        assert!(range.to <= total);
        last_to = range.to;
    }

    let covered: usize = ranges.iter().map(|r| r.to - r.from).sum();
    // "a" and "d" are the only untyped characters.
    assert_eq!(covered, total - 2);
}

#[test]
fn empty_leaves_do_not_emit_zero_width_ranges() {
    let tokens = vec![Token::typed_text("keyword", "")];
    assert!(build_decorations(&tokens).is_empty());
}
