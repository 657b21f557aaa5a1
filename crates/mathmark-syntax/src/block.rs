//! Recogniser for `$$ ... $$` display blocks.

use crate::lines::SourceLines;
use crate::{BLOCK_MARKER, Span};
use std::ops::Range;

/// A display block found by [`scan_block`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockMatch {
    /// Raw TeX with both `$$` markers removed.
    pub content: String,
    /// Lines consumed, opening and closing line included.
    pub lines: Range<usize>,
    /// Bytes from the opening `$$` to the end of the closing line.
    pub span: Span,
}

impl BlockMatch {
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }
}

/// True when the content of `line` starts with `$$`.
///
/// This is only the opener test. A line that passes may still fail to close,
/// so a host deciding whether a math block interrupts a paragraph or list
/// must ask [`scan_block`] instead.
pub fn probe_block(lines: &SourceLines<'_>, line: usize) -> bool {
    lines
        .span(line)
        .is_some_and(|span| lines.src()[span.content_start..span.end].starts_with(BLOCK_MARKER))
}

/// Tries to match a display block opening on line `start`.
///
/// `end` is the first line the scan may not look at, `blk_indent` the
/// indentation of the enclosing container. A non-blank line indented less
/// than the container ends the search, as does reaching `end`; in both cases
/// the rule declines and the host handles the lines some other way.
///
/// A block that opens and closes on the same line (`$$ E=mc^2 $$`) yields the
/// trimmed text between the markers. Otherwise the content is the rest of
/// the opening line when it is not blank, followed by a newline, then every
/// interior line with the opening line's indentation removed and a newline
/// appended, then whatever precedes the closing `$$`.
pub fn scan_block(
    lines: &SourceLines<'_>,
    start: usize,
    end: usize,
    blk_indent: usize,
) -> Option<BlockMatch> {
    let end = end.min(lines.len());
    if start >= end || !probe_block(lines, start) {
        return None;
    }

    let src = lines.src();
    let open = lines.span(start)?;
    let first = &src[open.content_start + BLOCK_MARKER.len()..open.end];

    let first_trimmed = first.trim();
    if let Some(inner) = first_trimmed.strip_suffix(BLOCK_MARKER) {
        return Some(BlockMatch {
            content: inner.trim().to_string(),
            lines: start..start + 1,
            span: Span::new(open.content_start, open.end),
        });
    }

    let mut next = start;
    let (close, last) = loop {
        next += 1;
        if next >= end {
            return None;
        }

        let line = lines.span(next)?;
        if !line.is_blank() && line.indent < blk_indent {
            return None;
        }

        let text = src[line.content_start..line.end].trim_end();
        if let Some(prefix) = text.strip_suffix(BLOCK_MARKER) {
            break (line, prefix);
        }
    };

    let mut content = String::new();
    if !first_trimmed.is_empty() {
        content.push_str(first);
        content.push('\n');
    }
    for line in start + 1..next {
        content.push_str(lines.text_after_indent(line, open.indent));
        content.push('\n');
    }
    if !last.trim().is_empty() {
        content.push_str(last);
    }

    Some(BlockMatch {
        content,
        lines: start..next + 1,
        span: Span::new(open.content_start, close.end),
    })
}
