//! HTML render model for the tag container.

use std::fmt::Write;
use std::time::Instant;

use crate::markup::escape;

use super::TagInput;

/// Render the tag container: one link per tag with a remove marker, the
/// visible text input and the hidden form field.
pub fn render_tags(input: &TagInput, now: Instant) -> String {
    let classes = &input.config().classes;
    let highlighted = input.highlighted_tag(now);
    let dragged = input.drag_state().map(|d| d.from);

    let mut html = String::new();
    let _ = write!(html, "<div class=\"{}\">", escape(&classes.container));

    for (i, tag) in input.tags().iter().enumerate() {
        let mut class = classes.tag.clone();
        if highlighted == Some(tag.as_str()) {
            class.push(' ');
            class.push_str(&classes.highlight);
        }
        if dragged == Some(i) {
            class.push(' ');
            class.push_str(&classes.drag);
        }
        let _ = write!(
            html,
            "<a href=\"#\" class=\"{}\" data-index=\"{}\">{}<span>x</span></a>",
            escape(&class),
            i,
            escape(tag)
        );
    }

    let _ = write!(
        html,
        "<input type=\"text\" class=\"{}\" value=\"{}\">",
        escape(&classes.tag),
        escape(input.pending_text())
    );

    match &input.config().name {
        Some(name) => {
            let _ = write!(
                html,
                "<input type=\"hidden\" name=\"{}\" value=\"{}\">",
                escape(name),
                escape(input.form_value())
            );
        }
        None => {
            let _ = write!(
                html,
                "<input type=\"hidden\" value=\"{}\">",
                escape(input.form_value())
            );
        }
    }

    html.push_str("</div>");
    html
}
