//! Markdown to HTML conversion.
//!
//! Post bodies, page bodies and portfolio descriptions are all stored as
//! markdown and converted here, once per entity per render.

use pulldown_cmark::{Options, Parser, html};

/// Convert a markdown document into an HTML fragment.
pub fn to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_FOOTNOTES);

    let parser = Parser::new_ext(markdown, options);
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}
