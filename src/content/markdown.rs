//! Markdown rendering with typographic substitutions

use pulldown_cmark::{html, Options, Parser};

/// Markdown renderer
///
/// Smart punctuation is always on: straight quotes become curly quotes,
/// `--`/`---` become en/em dashes and `...` becomes an ellipsis.
#[derive(Debug, Clone)]
pub struct MarkdownRenderer {
    options: Options,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        // Front-matter is stripped before rendering, so metadata blocks stay off
        let options = Options::ENABLE_SMART_PUNCTUATION
            | Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH;
        Self { options }
    }

    /// Render markdown to HTML
    pub fn render(&self, markdown: &str) -> String {
        let parser = Parser::new_ext(markdown, self.options);
        let mut html_output = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut html_output, parser);
        html_output
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}
