//! Markdown to HTML.

use pulldown_cmark::{html, Event, Options, Parser};

/// Renders Markdown as an HTML fragment.
///
/// Tables and strikethrough are enabled. Raw HTML in the input is shown as
/// text rather than passed through.
///
/// ```
/// use study_buddy::server::render_markdown;
///
/// assert_eq!(render_markdown("# Guide"), "<h1>Guide</h1>\n");
/// ```
pub fn render_markdown(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(markdown, options).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });

    let mut rendered = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut rendered, parser);
    rendered
}
