//! Suggestion dropdown - substring-filtered, debounced candidate list.

mod events;
mod filter;
mod item;
mod render;
mod state;

pub use filter::{HighlightTemplate, QueryMatcher, filter_matches, highlight};
pub use item::{Suggestion, SuggestionItem, suggestions_from_json};
pub use render::render_list;
pub use state::{DropdownState, SuggestEvent, SuggestionEngine, VisibleItem};
