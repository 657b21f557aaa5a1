use crate::renderer::{MathRenderer, RenderError};
use std::collections::BTreeMap;

/// Server-side typesetting through the `katex` crate.
#[derive(Debug, Clone)]
pub struct KatexRenderer {
    /// Report parse errors instead of rendering them in `error_color`.
    pub throw_on_error: bool,
    /// Allow `\href`, `\includegraphics` and friends.
    pub trust: bool,
    /// Extra macros, e.g. `\RR` -> `\mathbb{R}`.
    pub macros: BTreeMap<String, String>,
}

impl Default for KatexRenderer {
    fn default() -> Self {
        Self {
            throw_on_error: true,
            trust: false,
            macros: BTreeMap::new(),
        }
    }
}

impl KatexRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_macro(mut self, name: impl Into<String>, body: impl Into<String>) -> Self {
        self.macros.insert(name.into(), body.into());
        self
    }

    fn opts(&self, display_mode: bool) -> Result<katex::Opts, RenderError> {
        let mut builder = katex::Opts::builder();
        builder
            .display_mode(display_mode)
            .throw_on_error(self.throw_on_error)
            .trust(self.trust);
        for (name, body) in &self.macros {
            builder.add_macro(name.clone(), body.clone());
        }
        builder
            .build()
            .map_err(|e| RenderError::Options(e.to_string()))
    }
}

impl MathRenderer for KatexRenderer {
    fn render(&self, tex: &str, display_mode: bool) -> Result<String, RenderError> {
        let opts = self.opts(display_mode)?;
        katex::render_with_opts(tex, opts).map_err(|e| RenderError::Typeset(e.to_string()))
    }
}
