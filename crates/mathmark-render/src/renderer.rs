use markdown_it::common::utils::escape_html;
use thiserror::Error;

/// Failure reported by a [`MathRenderer`].
#[derive(Debug, Error)]
pub enum RenderError {
    /// The expression could not be typeset (unknown command, bad nesting...).
    #[error("failed to typeset expression: {0}")]
    Typeset(String),
    /// The renderer itself is misconfigured.
    #[error("invalid renderer options: {0}")]
    Options(String),
}

/// Converts raw TeX to display markup.
///
/// Implementations may fail; callers go through [`render_math`], which never
/// does.
pub trait MathRenderer: Send + Sync + std::fmt::Debug {
    /// Typesets `tex`. `display_mode` is true for `$$` blocks.
    fn render(&self, tex: &str, display_mode: bool) -> Result<String, RenderError>;
}

/// Renders `tex`, falling back to the escaped source text on failure.
///
/// A broken expression must never take the surrounding document down with
/// it, so errors are logged and swallowed here.
pub fn render_math(renderer: &dyn MathRenderer, tex: &str, display_mode: bool) -> String {
    match renderer.render(tex, display_mode) {
        Ok(markup) => markup,
        Err(e) => {
            log::warn!("Math fell back to source text: {}", e);
            escape_html(tex).into_owned()
        }
    }
}

/// Leaves the TeX in place for a client-side typesetter such as KaTeX's
/// auto-render or MathJax, using the `\(...\)` and `\[...\]` delimiters.
#[derive(Debug, Clone, Default)]
pub struct DelimitedRenderer;

impl MathRenderer for DelimitedRenderer {
    fn render(&self, tex: &str, display_mode: bool) -> Result<String, RenderError> {
        let tex = escape_html(tex);
        Ok(if display_mode {
            format!(r#"<div class="math math-display">\[{}\]</div>"#, tex)
        } else {
            format!(r#"<span class="math math-inline">\({}\)</span>"#, tex)
        })
    }
}
