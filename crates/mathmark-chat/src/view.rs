//! HTML for transcript entries.

use crate::message::{Content, Message, Role};
use markdown_it::MarkdownIt;
use mathmark_render::{MathRenderer, escape_html, markdown, render_document};
use std::sync::Arc;

/// Number of animated dots in the typing indicator.
pub const DEFAULT_TYPING_DOTS: usize = 4;

const IMAGE_STYLE: &str =
    "max-width: 100%; max-height: 400px; object-fit: contain; width: auto; height: auto;";

/// Turns messages into the markup the chat page expects.
pub struct MessageView {
    md: MarkdownIt,
    assistant_name: String,
}

impl MessageView {
    pub fn new(renderer: Arc<dyn MathRenderer>, assistant_name: impl Into<String>) -> Self {
        Self {
            md: markdown(renderer),
            assistant_name: assistant_name.into(),
        }
    }

    pub fn assistant_name(&self) -> &str {
        &self.assistant_name
    }

    /// Renders one message, markdown and math included.
    pub fn render(&self, message: &Message) -> String {
        let mut html = match message.role {
            Role::User => String::from(r#"<div class="user-message">"#),
            Role::Assistant => format!(
                r#"<div class="ai-message" data-name="{}">"#,
                escape_html(&self.assistant_name)
            ),
        };

        for content in &message.content {
            match content {
                Content::Text(text) => {
                    let body = render_document(&self.md, &reformat_indentation(text));
                    html.push_str(&format!(r#"<div class="markdown-content">{}</div>"#, body));
                }
                Content::ImageFile(url) => {
                    html.push_str(&format!(
                        r#"<img src="{}" style="{}" />"#,
                        escape_html(url),
                        IMAGE_STYLE
                    ));
                }
            }
        }

        html.push_str("</div>");
        html
    }

    /// The "`name` is typing..." placeholder shown while replies are pending.
    pub fn typing_indicator(&self, dots: usize) -> String {
        let name = escape_html(&self.assistant_name);
        format!(
            r#"<div class="ai-message" data-name="{name}"><b>{name}</b> is typing<span class="typing-dots">{}</span></div>"#,
            "<span>.</span>".repeat(dots)
        )
    }
}

/// Halves four-space indentation at the start of every line so code blocks
/// take less room in a narrow chat column.
pub fn reformat_indentation(text: &str) -> String {
    text.split_inclusive('\n')
        .map(|line| match line.strip_prefix("    ") {
            Some(rest) => format!("  {}", rest),
            None => line.to_string(),
        })
        .collect()
}
