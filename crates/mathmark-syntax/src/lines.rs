//! Per-line offsets used by the block scanner.

/// Tab stops are every four columns, as in CommonMark.
const TAB_WIDTH: usize = 4;

/// Offsets of one source line. All fields are byte offsets except `indent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSpan {
    /// First byte of the line.
    pub start: usize,
    /// One past the last byte, line terminator excluded.
    pub end: usize,
    /// First byte after leading spaces and tabs.
    pub content_start: usize,
    /// Width of the leading whitespace in columns.
    pub indent: usize,
}

impl LineSpan {
    /// True when the line holds nothing but whitespace.
    pub fn is_blank(&self) -> bool {
        self.content_start >= self.end
    }
}

/// A source buffer split into lines.
///
/// Either computed from raw text with [`SourceLines::new`] or assembled from
/// a host tokenizer's own line table with [`SourceLines::from_spans`].
#[derive(Debug, Clone)]
pub struct SourceLines<'a> {
    src: &'a str,
    spans: Vec<LineSpan>,
}

impl<'a> SourceLines<'a> {
    /// Splits `src` on `\n`, treating a preceding `\r` as part of the
    /// terminator. A trailing newline does not open an extra empty line.
    pub fn new(src: &'a str) -> Self {
        let mut spans = Vec::new();
        let mut start = 0;

        while start < src.len() {
            let (end, next) = match src[start..].find('\n') {
                Some(nl) => (start + nl, start + nl + 1),
                None => (src.len(), src.len()),
            };
            let end = if end > start && src.as_bytes()[end - 1] == b'\r' {
                end - 1
            } else {
                end
            };
            spans.push(measure(src, start, end));
            start = next;
        }

        Self { src, spans }
    }

    pub fn from_spans(src: &'a str, spans: Vec<LineSpan>) -> Self {
        Self { src, spans }
    }

    pub fn src(&self) -> &'a str {
        self.src
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    pub fn span(&self, line: usize) -> Option<LineSpan> {
        self.spans.get(line).copied()
    }

    /// The whole line, indentation included.
    pub fn text(&self, line: usize) -> &'a str {
        let span = self.spans[line];
        &self.src[span.start..span.end]
    }

    /// The line without its leading indentation.
    pub fn content(&self, line: usize) -> &'a str {
        let span = self.spans[line];
        &self.src[span.content_start..span.end]
    }

    /// The line with at most `columns` of leading indentation removed.
    ///
    /// A tab that straddles the cut is dropped whole.
    pub fn text_after_indent(&self, line: usize, columns: usize) -> &'a str {
        let span = self.spans[line];
        let bytes = self.src.as_bytes();
        let mut col = 0;
        let mut at = span.start;

        while at < span.content_start && col < columns {
            col = advance_column(col, bytes[at]);
            at += 1;
        }

        &self.src[at..span.end]
    }
}

/// Builds the span for `src[start..end]`.
pub(crate) fn measure(src: &str, start: usize, end: usize) -> LineSpan {
    let bytes = src.as_bytes();
    let mut indent = 0;
    let mut content_start = start;

    while content_start < end && matches!(bytes[content_start], b' ' | b'\t') {
        indent = advance_column(indent, bytes[content_start]);
        content_start += 1;
    }

    LineSpan {
        start,
        end,
        content_start,
        indent,
    }
}

fn advance_column(col: usize, byte: u8) -> usize {
    if byte == b'\t' {
        col + TAB_WIDTH - col % TAB_WIDTH
    } else {
        col + 1
    }
}
