//! `markdown-it` rules wrapping the scanners from `mathmark-syntax`.

use crate::renderer::{DelimitedRenderer, MathRenderer, render_math};
use markdown_it::parser::block::{BlockRule, BlockState};
use markdown_it::parser::extset::MarkdownItExt;
use markdown_it::parser::inline::{InlineRule, InlineState, Text};
use markdown_it::plugins::cmark::block::blockquote::BlockquoteScanner;
use markdown_it::plugins::cmark::inline::escape::EscapeScanner;
use markdown_it::{MarkdownIt, Node, NodeValue, Renderer};
use mathmark_syntax::{BLOCK_MARKER, BlockMatch, InlineScan, LineSpan, SourceLines, scan_block, scan_inline};
use std::sync::Arc;

/// Registers both math rules on `md`, typesetting through `renderer`.
///
/// The inline rule runs right after backslash escapes, so `\$` never reaches
/// it. The block rule runs after blockquotes, and because its lookahead
/// succeeds on any complete `$$` block, a math block can cut a paragraph,
/// reference, blockquote or list short.
pub fn add(md: &mut MarkdownIt, renderer: Arc<dyn MathRenderer>) {
    md.ext.insert(RendererExt(renderer));
    md.inline.add_rule::<MathInlineScanner>().after::<EscapeScanner>();
    md.block.add_rule::<MathBlockScanner>().after::<BlockquoteScanner>();
}

#[derive(Debug)]
struct RendererExt(Arc<dyn MathRenderer>);

impl MarkdownItExt for RendererExt {}

fn renderer_for(md: &MarkdownIt) -> Arc<dyn MathRenderer> {
    md.ext
        .get::<RendererExt>()
        .map(|ext| ext.0.clone())
        .unwrap_or_else(|| Arc::new(DelimitedRenderer))
}

/// `$...$`, rendered inline.
#[derive(Debug)]
pub struct InlineMath {
    pub content: String,
    renderer: Arc<dyn MathRenderer>,
}

impl NodeValue for InlineMath {
    fn render(&self, _: &Node, fmt: &mut dyn Renderer) {
        fmt.text_raw(&render_math(self.renderer.as_ref(), &self.content, false));
    }
}

/// `$$...$$`, rendered as its own paragraph.
#[derive(Debug)]
pub struct BlockMath {
    pub content: String,
    renderer: Arc<dyn MathRenderer>,
}

impl NodeValue for BlockMath {
    fn render(&self, _: &Node, fmt: &mut dyn Renderer) {
        fmt.cr();
        fmt.open("p", &[]);
        fmt.text_raw(&render_math(self.renderer.as_ref(), &self.content, true));
        fmt.close("p");
        fmt.cr();
    }
}

pub struct MathInlineScanner;

impl InlineRule for MathInlineScanner {
    const MARKER: char = '$';

    // Lookahead only needs the length; no node is built.
    fn check(state: &mut InlineState) -> Option<usize> {
        scan_inline(&state.src, state.pos, state.pos_max).consumed()
    }

    fn run(state: &mut InlineState) -> Option<(Node, usize)> {
        match scan_inline(&state.src, state.pos, state.pos_max) {
            InlineScan::Decline => None,
            InlineScan::Literal(len) => {
                let content = state.src[state.pos..state.pos + len].to_string();
                Some((Node::new(Text { content }), len))
            }
            InlineScan::Math { content, len } => {
                let node = InlineMath {
                    content: state.src[content].to_string(),
                    renderer: renderer_for(state.md),
                };
                Some((Node::new(node), len))
            }
        }
    }
}

pub struct MathBlockScanner;

impl MathBlockScanner {
    /// Indented four or more columns past the container: a code block.
    fn is_code_indented(state: &BlockState) -> bool {
        state.line_indent(state.line) >= 4
    }

    /// The full match at the current line. Lookahead and commit both go
    /// through here, so an unterminated `$$` never interrupts a paragraph
    /// or list that the rule would then refuse to take.
    fn scan(state: &BlockState) -> Option<BlockMatch> {
        if Self::is_code_indented(state) {
            return None;
        }
        if !state.get_line(state.line).starts_with(BLOCK_MARKER) {
            return None;
        }
        let lines = source_lines(state);
        scan_block(&lines, state.line, state.line_max, state.blk_indent)
    }
}

impl BlockRule for MathBlockScanner {
    fn check(state: &mut BlockState) -> Option<()> {
        Self::scan(state).map(|_| ())
    }

    fn run(state: &mut BlockState) -> Option<(Node, usize)> {
        let found = Self::scan(state)?;
        let node = BlockMath {
            content: found.content,
            renderer: renderer_for(state.md),
        };
        Some((Node::new(node), found.lines.len()))
    }
}

/// Mirrors the block state's line table.
fn source_lines<'s>(state: &'s BlockState) -> SourceLines<'s> {
    let src: &str = &state.src;
    let spans = state
        .line_offsets
        .iter()
        .take(state.line_max)
        .map(|offset| LineSpan {
            start: offset.line_start,
            end: offset.line_end,
            content_start: offset.first_nonspace,
            indent: offset.indent_nonspace.max(0) as usize,
        })
        .collect();
    SourceLines::from_spans(src, spans)
}
