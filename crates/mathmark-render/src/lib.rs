//! # mathmark render
//!
//! Binds the `mathmark-syntax` scanners to the [`markdown_it`] tokenizer and
//! typesets every math token through a [`MathRenderer`].
//!
//! ```
//! use mathmark_render::{DelimitedRenderer, markdown, render_document};
//! use std::sync::Arc;
//!
//! let md = markdown(Arc::new(DelimitedRenderer));
//! let html = render_document(&md, "Area: $\\pi r^2$");
//! assert!(html.contains(r#"<span class="math math-inline">\(\pi r^2\)</span>"#));
//! ```
//!
//! Typesetting errors never abort rendering: the affected expression is
//! logged and emitted as escaped source text instead.

#[cfg(feature = "katex")]
mod katex_renderer;
pub mod plugin;
pub mod renderer;

#[cfg(feature = "katex")]
pub use katex_renderer::KatexRenderer;
pub use markdown_it::common::utils::escape_html;
pub use plugin::{BlockMath, InlineMath, add};
pub use renderer::{DelimitedRenderer, MathRenderer, RenderError, render_math};

use markdown_it::MarkdownIt;
use std::sync::Arc;

/// A CommonMark parser with the math rules registered.
pub fn markdown(renderer: Arc<dyn MathRenderer>) -> MarkdownIt {
    let mut md = MarkdownIt::new();
    markdown_it::plugins::cmark::add(&mut md);
    add(&mut md, renderer);
    md
}

/// Renders a whole markdown document to HTML.
pub fn render_document(md: &MarkdownIt, src: &str) -> String {
    md.parse(src).render()
}
