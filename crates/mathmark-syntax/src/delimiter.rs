//! Opening/closing validity of a single `$`.

/// Whether a `$` may start and/or end an inline span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelimiterVerdict {
    pub can_open: bool,
    pub can_close: bool,
}

/// Classifies the `$` at `pos` by its neighbours.
///
/// A `$` cannot close when it follows a space or tab, or when a digit comes
/// right after it (so `costs $5 and $10` stays text). It cannot open when a
/// space or tab follows it. The buffer start and `pos_max` count as boundary
/// characters and never disable either flag on their own.
///
/// All the bytes inspected are ASCII, so looking at raw bytes is safe on any
/// UTF-8 input: a continuation byte never compares equal to them.
///
/// ```
/// use mathmark_syntax::delimiter_verdict;
///
/// let v = delimiter_verdict("pay $5", 4, 6);
/// assert!(v.can_open);
/// assert!(!v.can_close);
/// ```
pub fn delimiter_verdict(src: &str, pos: usize, pos_max: usize) -> DelimiterVerdict {
    let bytes = src.as_bytes();
    debug_assert_eq!(bytes.get(pos), Some(&crate::DOLLAR));

    let prev = pos.checked_sub(1).and_then(|p| bytes.get(p)).copied();
    let next = if pos + 1 < pos_max.min(bytes.len()) {
        Some(bytes[pos + 1])
    } else {
        None
    };

    let mut verdict = DelimiterVerdict {
        can_open: true,
        can_close: true,
    };

    if matches!(prev, Some(b' ' | b'\t')) || matches!(next, Some(b'0'..=b'9')) {
        verdict.can_close = false;
    }
    if matches!(next, Some(b' ' | b'\t')) {
        verdict.can_open = false;
    }

    verdict
}
