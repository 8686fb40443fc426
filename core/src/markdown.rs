//! Markdown rendering for task content.

use pulldown_cmark::{html, Options, Parser};

/// Render Markdown task content to HTML via `pulldown_cmark`.
///
/// The trailing newline the renderer appends after the last block is
/// dropped so plain text comes back as exactly one `<p>` element.
pub fn render_markdown(content: &str) -> String {
    let options =
        Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS;
    let parser = Parser::new_ext(content, options);

    let mut output = String::with_capacity(content.len() + content.len() / 2);
    html::push_html(&mut output, parser);
    output.truncate(output.trim_end_matches('\n').len());
    output
}
