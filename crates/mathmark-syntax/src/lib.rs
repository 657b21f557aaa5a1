//! # mathmark syntax
//!
//! Lexical recognisers for TeX math embedded in markdown: `$...$` inline
//! spans and `$$...$$` display blocks.
//!
//! ## Overview
//!
//! The crate does not parse markdown itself. A host tokenizer (see the
//! `mathmark-render` crate for the `markdown-it` binding) calls the scanners
//! at every candidate position and either gets a decline, a run of literal
//! text, or a span of raw math content:
//!
//! - [`delimiter_verdict`] decides whether a `$` may open and/or close a span,
//!   looking only at its neighbours (`$5` never closes, `$ x` never opens).
//! - [`scan_inline`] matches `$...$` from the cursor, skipping `\$` escapes.
//! - [`scan_block`] matches `$$ ... $$` across whole lines of a
//!   [`SourceLines`] table.
//!
//! All three are pure functions of the buffer and the cursor. Malformed input
//! is never an error: an unterminated or empty span turns into literal text
//! (inline) or a decline (block).
//!
//! ## Examples
//!
//! ```
//! use mathmark_syntax::{InlineScan, scan_inline};
//!
//! let src = "$x+y$ done";
//! match scan_inline(src, 0, src.len()) {
//!     InlineScan::Math { content, len } => {
//!         assert_eq!(&src[content], "x+y");
//!         assert_eq!(len, 5);
//!     }
//!     other => panic!("unexpected {other:?}"),
//! }
//! ```
//!
//! [`tokenize`] drives both scanners over a whole document without a host,
//! which is handy for inspection and testing:
//!
//! ```
//! use mathmark_syntax::{MathKind, tokenize};
//!
//! let tokens = tokenize("Euler: $e^{i\\pi}+1=0$\n\n$$\n\\int_0^1 x\\,dx\n$$\n");
//! assert_eq!(tokens.len(), 2);
//! assert_eq!(tokens[0].kind, MathKind::Inline);
//! assert_eq!(tokens[1].kind, MathKind::Block);
//! assert_eq!(tokens[1].content, "\\int_0^1 x\\,dx\n");
//! ```

pub mod block;
pub mod delimiter;
pub mod inline;
pub mod lines;
pub mod tokenizer;

pub use block::{BlockMatch, probe_block, scan_block};
pub use delimiter::{DelimiterVerdict, delimiter_verdict};
pub use inline::{InlineScan, scan_inline};
pub use lines::{LineSpan, SourceLines};
pub use tokenizer::tokenize;

use serde::{Deserialize, Serialize};

/// The delimiter character shared by inline and block math.
pub const DOLLAR: u8 = b'$';

/// Opening and closing marker of a display block.
pub const BLOCK_MARKER: &str = "$$";

/// A byte range into the scanned source, end exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Whether a token was written as `$...$` or `$$...$$`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MathKind {
    Inline,
    Block,
}

impl MathKind {
    /// Block math typesets in display mode, inline math does not.
    pub fn display_mode(self) -> bool {
        matches!(self, MathKind::Block)
    }
}

/// A recognised math span.
///
/// `content` is the raw TeX between the delimiters and never includes them.
/// Inline tokens never carry empty content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MathToken {
    pub kind: MathKind,
    pub content: String,
    /// Bytes covered in the source, delimiters included.
    pub span: Span,
    /// Half-open line range consumed by a block token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lines: Option<(usize, usize)>,
}

impl MathToken {
    pub fn inline(content: impl Into<String>, span: Span) -> Self {
        Self {
            kind: MathKind::Inline,
            content: content.into(),
            span,
            lines: None,
        }
    }

    pub fn block(content: impl Into<String>, span: Span, lines: (usize, usize)) -> Self {
        Self {
            kind: MathKind::Block,
            content: content.into(),
            span,
            lines: Some(lines),
        }
    }
}
