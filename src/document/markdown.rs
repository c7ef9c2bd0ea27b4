//! Markdown to HTML conversion.
//!
//! Thin wrapper around pulldown-cmark; the rest of the crate treats this as
//! an opaque `render(body) -> html` function.

use pulldown_cmark::{Options, Parser, html};

/// Render a markdown body to HTML.
pub fn render(body: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(body, options);
    let mut out = String::with_capacity(body.len() * 2);
    html::push_html(&mut out, parser);
    out
}

#[cfg(test)]
mod tests {
    use super::render;

    #[test]
    fn test_paragraph() {
        assert_eq!(render("hi"), "<p>hi</p>\n");
    }

    #[test]
    fn test_heading_and_emphasis() {
        let out = render("# Title\n\nsome *em* text");
        assert!(out.contains("<h1>Title</h1>"));
        assert!(out.contains("<em>em</em>"));
    }

    #[test]
    fn test_table_extension_enabled() {
        let out = render("| a | b |\n|---|---|\n| 1 | 2 |");
        assert!(out.contains("<table>"));
    }
}
