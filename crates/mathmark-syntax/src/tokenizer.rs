//! A small driver that runs both scanners over a whole document.
//!
//! It understands just enough markdown to place the scanners the way a full
//! host would: paragraphs are separated by blank lines, fenced code blocks and
//! code spans are skipped, and a backslash before ASCII punctuation is an
//! escape that the math rule never sees. Everything else is left to the
//! real renderer.

use crate::block::{probe_block, scan_block};
use crate::inline::{InlineScan, scan_inline};
use crate::lines::SourceLines;
use crate::{DOLLAR, MathToken, Span};

/// Collects every math token in `src`, in source order.
pub fn tokenize(src: &str) -> Vec<MathToken> {
    let lines = SourceLines::new(src);
    let mut tokens = Vec::new();
    let mut paragraph: Option<Span> = None;
    let mut line = 0;

    while line < lines.len() {
        let Some(span) = lines.span(line) else {
            break;
        };

        if let Some(fence) = fence_marker(lines.content(line)) {
            flush(src, &mut paragraph, &mut tokens);
            line = skip_fence(&lines, line, fence);
            continue;
        }

        if probe_block(&lines, line) {
            if let Some(m) = scan_block(&lines, line, lines.len(), 0) {
                flush(src, &mut paragraph, &mut tokens);
                let consumed = (m.lines.start, m.lines.end);
                line = m.lines.end;
                tokens.push(MathToken::block(m.content, m.span, consumed));
                continue;
            }
        }

        if span.is_blank() {
            flush(src, &mut paragraph, &mut tokens);
        } else {
            let start = paragraph.map_or(span.content_start, |p| p.start);
            paragraph = Some(Span::new(start, span.end));
        }
        line += 1;
    }

    flush(src, &mut paragraph, &mut tokens);
    tokens
}

fn flush(src: &str, paragraph: &mut Option<Span>, tokens: &mut Vec<MathToken>) {
    if let Some(span) = paragraph.take() {
        scan_paragraph(src, span, tokens);
    }
}

/// Inline pass over one paragraph. Positions stay absolute so token spans
/// point into the original document.
fn scan_paragraph(src: &str, span: Span, tokens: &mut Vec<MathToken>) {
    let bytes = src.as_bytes();
    let end = span.end;
    let mut pos = span.start;

    while pos < end {
        match bytes[pos] {
            b'\\' if pos + 1 < end && bytes[pos + 1].is_ascii_punctuation() => pos += 2,
            b'`' => pos = skip_code_span(bytes, pos, end),
            DOLLAR => match scan_inline(src, pos, end) {
                InlineScan::Math { content, len } => {
                    tokens.push(MathToken::inline(&src[content], Span::new(pos, pos + len)));
                    pos += len;
                }
                other => pos += other.consumed().unwrap_or(1),
            },
            _ => pos += 1,
        }
    }
}

/// Returns the position after the code span opening at `pos`, or after the
/// backtick run itself when no closing run of the same length exists.
fn skip_code_span(bytes: &[u8], pos: usize, end: usize) -> usize {
    let run = bytes[pos..end].iter().take_while(|&&b| b == b'`').count();
    let mut at = pos + run;

    while at < end {
        if bytes[at] == b'`' {
            let closing = bytes[at..end].iter().take_while(|&&b| b == b'`').count();
            if closing == run {
                return at + closing;
            }
            at += closing;
        } else {
            at += 1;
        }
    }

    pos + run
}

/// A fence opener: three or more backticks or tildes.
fn fence_marker(content: &str) -> Option<&str> {
    let first = content.chars().next()?;
    if first != '`' && first != '~' {
        return None;
    }
    let len = content.chars().take_while(|&c| c == first).count();
    (len >= 3).then(|| &content[..len])
}

/// Index of the line after the fence closing the one opened on `open`.
/// An unclosed fence runs to the end of the document.
fn skip_fence(lines: &SourceLines<'_>, open: usize, fence: &str) -> usize {
    let marker = fence.as_bytes()[0] as char;
    for line in open + 1..lines.len() {
        let content = lines.content(line).trim_end();
        if content.len() >= fence.len() && content.chars().all(|c| c == marker) {
            return line + 1;
        }
    }
    lines.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MathKind;

    fn contents(src: &str) -> Vec<(MathKind, String)> {
        tokenize(src)
            .into_iter()
            .map(|t| (t.kind, t.content))
            .collect()
    }

    #[test]
    fn test_inline_and_block() {
        let src = "Let $a$ and $b$.\n\n$$\na+b\n$$\n";
        assert_eq!(
            contents(src),
            vec![
                (MathKind::Inline, "a".to_string()),
                (MathKind::Inline, "b".to_string()),
                (MathKind::Block, "a+b\n".to_string()),
            ]
        );
    }

    #[test]
    fn test_inline_span_crosses_soft_break() {
        let src = "$a +\nb$";
        assert_eq!(contents(src), vec![(MathKind::Inline, "a +\nb".to_string())]);
    }

    #[test]
    fn test_inline_span_stops_at_blank_line() {
        assert!(tokenize("$a\n\nb$").is_empty());
    }

    #[test]
    fn test_block_interrupts_paragraph() {
        let src = "intro\n$$\nx\n$$\noutro $y$";
        assert_eq!(
            contents(src),
            vec![
                (MathKind::Block, "x\n".to_string()),
                (MathKind::Inline, "y".to_string()),
            ]
        );
    }

    #[test]
    fn test_unterminated_block_falls_back_to_inline() {
        // The `$$` line declines as a block and becomes paragraph text, where
        // it is an empty inline span, i.e. literal.
        assert!(tokenize("$$\nx + 1").is_empty());
    }

    #[test]
    fn test_escaped_opener() {
        assert_eq!(contents(r"\$a$ $b$"), vec![(MathKind::Inline, "b".to_string())]);
    }

    #[test]
    fn test_code_span_hides_math() {
        assert!(tokenize("`$x$` and ``$y$``").is_empty());
        assert_eq!(contents("`` ` `` $z$").len(), 1);
    }

    #[test]
    fn test_unclosed_backticks_are_text() {
        assert_eq!(contents("`a $x$").len(), 1);
    }

    #[test]
    fn test_fenced_code_hides_math() {
        let src = "```tex\n$x$\n$$\ny\n$$\n```\n$z$";
        assert_eq!(contents(src), vec![(MathKind::Inline, "z".to_string())]);
    }

    #[test]
    fn test_unclosed_fence_runs_to_end() {
        assert!(tokenize("~~~\n$x$").is_empty());
    }

    #[test]
    fn test_spans_are_absolute() {
        let src = "ab\n\ncd $x$";
        let tokens = tokenize(src);
        assert_eq!(tokens[0].span, Span::new(7, 10));
        assert_eq!(&src[7..10], "$x$");
    }

    #[test]
    fn test_block_line_range() {
        let tokens = tokenize("a\n\n$$\nx\n$$");
        assert_eq!(tokens[0].lines, Some((2, 5)));
    }
}
