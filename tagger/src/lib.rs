//! Headless suggestion dropdown and tag input widgets.
//!
//! Two cooperating components:
//!
//! - [`SuggestionEngine`] filters a candidate list against the typed query,
//!   tracks the active item and debounces updates.
//! - [`TagInput`] turns a single text field into an editor for an ordered list
//!   of unique string tags, serialized into a separator-joined form value.
//!
//! [`TagField`] wires them together the way a page would: accepting a
//! suggestion commits it as a tag. [`Driver`] runs a field on a tokio event
//! loop, sleeping until the next debounce deadline.

pub mod config;
pub mod driver;
pub mod error;
pub mod field;
pub mod input;
pub mod markup;
pub mod suggest;
pub mod tags;

pub use config::{SuggestClasses, SuggestConfig, TagClasses, TagConfig};
pub use driver::{Driver, DriverError, DriverHandle, FieldInput, FieldSnapshot};
pub use error::ConfigError;
pub use field::{FieldEvent, TagField};
pub use input::{EventResult, Key, KeyCombo, Modifiers, TextBuffer};
pub use suggest::{
    DropdownState, SuggestEvent, Suggestion, SuggestionEngine, SuggestionItem, VisibleItem,
};
pub use tags::{DragState, TagEvent, TagInput, TextMeasure, UnicodeWidthMeasure};

pub mod prelude {
    pub use crate::config::{SuggestConfig, TagConfig};
    pub use crate::field::TagField;
    pub use crate::input::{EventResult, Key, KeyCombo, Modifiers};
    pub use crate::suggest::{DropdownState, SuggestEvent, Suggestion, SuggestionEngine};
    pub use crate::tags::{TagEvent, TagInput};
}
