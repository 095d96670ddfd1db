//! Tag input - an ordered list of unique tags edited through one text field.

mod autosize;
mod drag;
mod events;
mod render;
mod state;

pub use autosize::{TextMeasure, UnicodeWidthMeasure};
pub use drag::DragState;
pub use render::render_tags;
pub use state::{TagEvent, TagInput, split_tags};
