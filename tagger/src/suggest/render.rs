//! HTML render model for the suggestion list.

use std::fmt::Write;

use crate::markup::escape;

use super::SuggestionEngine;

/// Render the open list as a `<ul>`; empty when the list is closed.
///
/// Item markup is emitted as-is: labels may carry their own markup and the
/// highlight template adds more. Labels are not escaped, so callers must
/// only supply labels that are safe to embed as HTML (use
/// [`escape`](crate::markup::escape) on untrusted text first).
pub fn render_list(engine: &SuggestionEngine) -> String {
    if !engine.is_open() {
        return String::new();
    }

    let classes = &engine.config().classes;
    let mut html = String::new();
    let _ = write!(html, "<ul class=\"{}\">", escape(&classes.list));

    for (i, item) in engine.visible_items().iter().enumerate() {
        if engine.active_index() == Some(i) {
            let _ = write!(
                html,
                "<li class=\"{}\" data-index=\"{}\">",
                escape(&classes.active),
                i
            );
        } else {
            let _ = write!(html, "<li data-index=\"{}\">", i);
        }
        let _ = write!(html, "<a>{}</a></li>", item.markup);
    }

    if engine.has_more() {
        let _ = write!(html, "<li class=\"{}\"></li>", escape(&classes.more));
    }

    html.push_str("</ul>");
    html
}
