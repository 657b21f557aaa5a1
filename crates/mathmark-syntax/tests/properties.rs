use mathmark_syntax::{
    InlineScan, MathKind, SourceLines, delimiter_verdict, scan_block, scan_inline, tokenize,
};

/// Runs the inline rule at every position the way a host would and returns
/// the literal text it would have produced along with the math contents.
fn drive_inline(src: &str) -> (String, Vec<String>) {
    let mut text = String::new();
    let mut math = Vec::new();
    let mut pos = 0;

    while pos < src.len() {
        match scan_inline(src, pos, src.len()) {
            InlineScan::Decline => {
                let ch = src[pos..].chars().next().unwrap();
                text.push(ch);
                pos += ch.len_utf8();
            }
            InlineScan::Literal(n) => {
                text.push_str(&src[pos..pos + n]);
                pos += n;
            }
            InlineScan::Math { content, len } => {
                math.push(src[content].to_string());
                pos += len;
            }
        }
    }

    (text, math)
}

#[test]
fn test_no_dollar_no_tokens() {
    let inputs = [
        "",
        "plain text",
        "# heading\n\n* list\n* items\n",
        "\\alpha \\beta",
        "multi\nline\n\n\nparagraphs",
    ];
    for input in inputs {
        assert!(tokenize(input).is_empty(), "tokens in {:?}", input);
        for pos in 0..input.len() {
            assert_eq!(scan_inline(input, pos, input.len()), InlineScan::Decline);
        }
        let lines = SourceLines::new(input);
        for line in 0..lines.len() {
            assert!(scan_block(&lines, line, lines.len(), 0).is_none());
        }
    }
}

#[test]
fn test_price_is_literal() {
    let src = "price: $5";
    let pos = src.find('$').unwrap();
    assert!(!delimiter_verdict(src, pos, src.len()).can_close);

    let (text, math) = drive_inline(src);
    assert!(math.is_empty());
    assert_eq!(text, src);
    assert!(tokenize(src).is_empty());
}

#[test]
fn test_two_prices_stay_literal() {
    let src = "from $5 to $10";
    let (text, math) = drive_inline(src);
    assert!(math.is_empty());
    assert_eq!(text, src);
}

#[test]
fn test_simple_inline() {
    let tokens = tokenize("$x+y$");
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, MathKind::Inline);
    assert_eq!(tokens[0].content, "x+y");
}

#[test]
fn test_bare_double_dollar() {
    assert!(tokenize("$$").is_empty());
    let (text, math) = drive_inline("$$");
    assert!(math.is_empty());
    assert_eq!(text, "$$");
}

#[test]
fn test_escaped_dollars() {
    assert!(tokenize(r"\$5 and \$10").is_empty());
}

#[test]
fn test_single_line_block() {
    let tokens = tokenize("$$ E=mc^2 $$\n");
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, MathKind::Block);
    assert_eq!(tokens[0].content, "E=mc^2");
}

#[test]
fn test_multi_line_block() {
    let tokens = tokenize("$$\na = 1\nb = 2\n$$\n");
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, MathKind::Block);
    assert_eq!(tokens[0].content, "a = 1\nb = 2\n");
    assert_eq!(tokens[0].lines, Some((0, 4)));
}

#[test]
fn test_unterminated_block() {
    let lines = SourceLines::new("$$\n\\frac{1}{2}\nstill going");
    assert!(scan_block(&lines, 0, lines.len(), 0).is_none());
    assert!(tokenize("$$\n\\frac{1}{2}\nstill going").is_empty());
}

#[test]
fn test_tokenize_is_deterministic() {
    let docs = [
        "Some $a$ text\n\n$$\nb\n$$\n",
        "rendered fallback without any math at all",
        "$$ x $$\n$y$ $5 \\$ $$",
    ];
    for doc in docs {
        assert_eq!(tokenize(doc), tokenize(doc));
    }
}

#[test]
fn test_tokens_serialize() {
    let tokens = tokenize("$a$");
    let json = serde_json::to_value(&tokens).unwrap();
    assert_eq!(json[0]["kind"], "inline");
    assert_eq!(json[0]["content"], "a");
    assert_eq!(json[0]["span"]["start"], 0);
    assert!(json[0].get("lines").is_none());
}

#[test]
fn test_scanners_never_panic_on_odd_input() {
    let inputs = [
        "$", "$$$", "$$$$$", "\\", "\\$", "$\\", "$$\n", "\n$$", "é$ü$", "$\u{0}$", "  $$\n",
        "\t$$\t\n\t$$",
    ];
    for input in inputs {
        let _ = tokenize(input);
        for pos in 0..=input.len() {
            if input.is_char_boundary(pos) {
                let _ = scan_inline(input, pos, input.len());
            }
        }
    }
}
