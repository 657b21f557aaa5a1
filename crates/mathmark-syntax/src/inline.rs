//! Recogniser for `$...$` spans.

use crate::DOLLAR;
use crate::delimiter::delimiter_verdict;
use std::ops::Range;

/// Outcome of trying the inline rule at one cursor position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InlineScan {
    /// The cursor is not on a `$`; another rule should run.
    Decline,
    /// The next `n` bytes are plain text and belong to no span.
    Literal(usize),
    /// A complete span. `content` lies strictly between the delimiters and
    /// `len` counts the bytes consumed, delimiters included.
    Math { content: Range<usize>, len: usize },
}

impl InlineScan {
    /// Bytes the host should advance by, `None` on decline.
    pub fn consumed(&self) -> Option<usize> {
        match self {
            InlineScan::Decline => None,
            InlineScan::Literal(n) => Some(*n),
            InlineScan::Math { len, .. } => Some(*len),
        }
    }
}

/// Tries to match an inline span starting exactly at `pos`.
///
/// This is the whole rule; it has no side effects, so a host can use it both
/// for lookahead and for committing output. Searching never looks at or
/// beyond `pos_max`.
///
/// # Algorithm
///
/// 1. A `$` that cannot open is a literal dollar.
/// 2. Search forward for the next `$` not preceded by an odd run of
///    backslashes.
/// 3. No such `$`: the opener is a literal dollar.
/// 4. Adjacent `$$`: both dollars are literal.
/// 5. The candidate cannot close: the opener is a literal dollar, and the
///    host retries from the next byte.
/// 6. Otherwise the span matches.
pub fn scan_inline(src: &str, pos: usize, pos_max: usize) -> InlineScan {
    let bytes = src.as_bytes();
    let pos_max = pos_max.min(bytes.len());

    if pos >= pos_max || bytes[pos] != DOLLAR {
        return InlineScan::Decline;
    }

    if !delimiter_verdict(src, pos, pos_max).can_open {
        return InlineScan::Literal(1);
    }

    let start = pos + 1;
    let Some(close) = find_closing(bytes, start, pos_max) else {
        return InlineScan::Literal(1);
    };

    if close == start {
        return InlineScan::Literal(2);
    }

    if !delimiter_verdict(src, close, pos_max).can_close {
        return InlineScan::Literal(1);
    }

    InlineScan::Math {
        content: start..close,
        len: close + 1 - pos,
    }
}

/// First unescaped `$` in `bytes[from..to]`.
fn find_closing(bytes: &[u8], from: usize, to: usize) -> Option<usize> {
    let mut at = from;
    while at < to {
        let offset = bytes[at..to].iter().position(|&b| b == DOLLAR)?;
        let candidate = at + offset;
        if !is_escaped(bytes, candidate) {
            return Some(candidate);
        }
        at = candidate + 1;
    }
    None
}

/// True when an odd number of backslashes sits right before `pos`.
///
/// The walk stops at the buffer start.
pub(crate) fn is_escaped(bytes: &[u8], pos: usize) -> bool {
    let run = bytes[..pos]
        .iter()
        .rev()
        .take_while(|&&b| b == b'\\')
        .count();
    run % 2 == 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(src: &str) -> InlineScan {
        scan_inline(src, 0, src.len())
    }

    fn content(src: &str) -> Option<&str> {
        match scan(src) {
            InlineScan::Math { content, .. } => Some(&src[content]),
            _ => None,
        }
    }

    #[test]
    fn test_simple_span() {
        assert_eq!(
            scan("$x+y$"),
            InlineScan::Math {
                content: 1..4,
                len: 5
            }
        );
    }

    #[test]
    fn test_decline_off_marker() {
        assert_eq!(scan("x$y$"), InlineScan::Decline);
        assert_eq!(scan(""), InlineScan::Decline);
    }

    #[test]
    fn test_cannot_open_is_literal() {
        assert_eq!(scan("$ x$"), InlineScan::Literal(1));
    }

    #[test]
    fn test_unterminated_is_literal() {
        assert_eq!(scan("$x + y"), InlineScan::Literal(1));
    }

    #[test]
    fn test_empty_span_is_two_literals() {
        assert_eq!(scan("$$"), InlineScan::Literal(2));
        assert_eq!(scan("$$x$"), InlineScan::Literal(2));
    }

    #[test]
    fn test_closing_before_digit_is_rejected() {
        // `$5` cannot close, so the first dollar falls back to text.
        assert_eq!(scan("$a$5"), InlineScan::Literal(1));
    }

    #[test]
    fn test_closing_after_space_is_rejected() {
        assert_eq!(scan("$a $"), InlineScan::Literal(1));
    }

    #[test]
    fn test_rejected_closer_is_not_skipped() {
        // After the opener fails on `$5`, the next `$` is not searched past;
        // the host must retry from the following byte.
        assert_eq!(scan("$a $b$"), InlineScan::Literal(1));
        assert_eq!(content(&"$a $b$"[3..]), Some("b"));
    }

    #[test]
    fn test_escaped_closer_is_skipped() {
        assert_eq!(content(r"$a\$b$"), Some(r"a\$b"));
    }

    #[test]
    fn test_double_backslash_does_not_escape() {
        assert_eq!(content(r"$a\\$b"), Some(r"a\\"));
    }

    #[test]
    fn test_triple_backslash_escapes() {
        assert_eq!(scan(r"$a\\\$"), InlineScan::Literal(1));
    }

    #[test]
    fn test_search_respects_pos_max() {
        let src = "$a$";
        assert_eq!(scan_inline(src, 0, 2), InlineScan::Literal(1));
    }

    #[test]
    fn test_scan_from_middle() {
        let src = "see $\\alpha$ here";
        match scan_inline(src, 4, src.len()) {
            InlineScan::Math { content, len } => {
                assert_eq!(&src[content], "\\alpha");
                assert_eq!(len, 8);
            }
            other => panic!("expected math, got {:?}", other),
        }
    }

    #[test]
    fn test_escape_walk_stops_at_buffer_start() {
        assert!(is_escaped(br"\$", 1));
        assert!(!is_escaped(br"\\$", 2));
        assert!(!is_escaped(b"$", 0));
    }

    #[test]
    fn test_unicode_content() {
        assert_eq!(content("$α+β$"), Some("α+β"));
    }

    #[test]
    fn test_consumed() {
        assert_eq!(scan("x").consumed(), None);
        assert_eq!(scan("$$").consumed(), Some(2));
        assert_eq!(scan("$a$").consumed(), Some(3));
    }
}
